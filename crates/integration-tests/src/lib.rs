//! Integration tests for Dropcast.
//!
//! # Running Tests
//!
//! The pure tests (message building, command parsing) run with a plain
//! `cargo test -p dropcast-integration-tests`.
//!
//! The end-to-end tests are `#[ignore]`d because they need a running server
//! and database:
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p dropcast-cli -- migrate
//!
//! # Start the server, then:
//! cargo test -p dropcast-integration-tests -- --ignored
//! ```
//!
//! `DROPCAST_BASE_URL` overrides the server address (default
//! `http://localhost:3000`).
