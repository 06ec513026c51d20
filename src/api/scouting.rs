use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::info;

use super::extract::{AppJson, AppPath};
use crate::ax_state::AppState;
use crate::error::Result;
use crate::infra::db::Backend;
use crate::models::schema::{AnnotationCreated, AnnotationRequest};
use crate::service;

pub async fn add_live_annotation<DB: Backend>(
    State(state): State<Arc<AppState<DB>>>,
    AppPath(scout_id): AppPath<i64>,
    AppJson(payload): AppJson<AnnotationRequest>,
) -> Result<(StatusCode, Json<AnnotationCreated>)> {
    info!("POST /scouts/{}/annotations player={}", scout_id, payload.player_id);
    let created = service::scouting::add_live_annotation(&state.db, scout_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
