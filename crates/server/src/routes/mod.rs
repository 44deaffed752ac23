//! HTTP route handlers.

pub mod drops;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Create the application's routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(webhooks::router())
        .merge(drops::router())
}
