use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::info;

use super::extract::AppJson;
use crate::ax_state::AppState;
use crate::error::Result;
use crate::infra::db::Backend;
use crate::models::schema::{AddStatsRequest, CreateGameRequest, GameCreated, StatsCreated};
use crate::service;

/// Game plus box score in one transaction. Not idempotent: a resubmission records a new game.
pub async fn create_game<DB: Backend>(
    State(state): State<Arc<AppState<DB>>>,
    AppJson(payload): AppJson<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameCreated>)> {
    info!("POST /games vs {} on {}", payload.opponent, payload.date);
    let created = service::games::create_game(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn add_game_stats<DB: Backend>(
    State(state): State<Arc<AppState<DB>>>,
    AppJson(payload): AppJson<AddStatsRequest>,
) -> Result<(StatusCode, Json<StatsCreated>)> {
    info!(
        "POST /players/stats game={} player={}",
        payload.game_id, payload.line.player_id
    );
    let created = service::games::add_game_stats(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
