//! Drop publication route.
//!
//! Publication is a distinct step from drop creation: creating a drop (done
//! by the surrounding CRUD layer) never notifies anyone, and calling this
//! route is what triggers the fan-out.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use tracing::instrument;

use dropcast_core::{DropId, Platform};

use crate::error::AppError;
use crate::services::{FanoutReport, FanoutService};
use crate::state::AppState;

/// Create drop publication routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/drops/{id}/publish", post(publish_drop))
}

/// Publish a drop and fan out to its store's subscribers.
///
/// Responds with the per-invocation [`FanoutReport`]. An unknown drop is
/// 404; a ledger failure reading the subscriber list is 500 with zero
/// notifications attempted.
#[instrument(skip(state), fields(drop_id = %id))]
async fn publish_drop(
    State(state): State<AppState>,
    Path(id): Path<DropId>,
) -> Result<Json<FanoutReport>, AppError> {
    let service = FanoutService::new(state.ledger().clone(), state.telegram().clone());
    let report = service.publish_drop(id, Platform::Telegram).await?;

    Ok(Json(report))
}
