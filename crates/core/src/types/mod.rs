//! Core types for Dropcast.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod platform;

pub use id::*;
pub use platform::{Platform, PlatformParseError};
