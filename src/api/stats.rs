use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use super::extract::AppPath;
use crate::ax_state::AppState;
use crate::core::catalog::{COMPETITION_CONTEXT, PLAYER_AGGREGATE, PLAYER_GAME_LOG, STATS_DATASET};
use crate::core::composer;
use crate::error::{Error, Result};
use crate::infra::db::Backend;
use crate::models::query::ValueKind;

/// Path parameters are filters too; they go first so they lead the WHERE clause
/// and get the same type check as query filters. A blank id is never dropped.
fn with_path_filter(
    name: &str,
    id: String,
    query: Vec<(String, String)>,
) -> Result<Vec<(String, String)>> {
    if id.trim().is_empty() {
        return Err(Error::InvalidFilterValue {
            name: name.to_string(),
            value: id,
            expected: ValueKind::Integer.describe(),
        });
    }
    let mut filters = Vec::with_capacity(query.len() + 1);
    filters.push((name.to_string(), id));
    filters.extend(query);
    Ok(filters)
}

/// Season averages per player, e.g. `?position=Guard&min_avg_points=15`.
pub async fn player_aggregate<DB: Backend>(
    State(state): State<Arc<AppState<DB>>>,
    Query(filters): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>> {
    let rows = composer::run(&state.db, &PLAYER_AGGREGATE, &filters).await?;
    Ok(Json(rows))
}

pub async fn player_game_log<DB: Backend>(
    State(state): State<Arc<AppState<DB>>>,
    AppPath(player_id): AppPath<String>,
    Query(filters): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>> {
    let filters = with_path_filter("player_id", player_id, filters)?;
    let rows = composer::run(&state.db, &PLAYER_GAME_LOG, &filters).await?;
    Ok(Json(rows))
}

pub async fn stats_dataset<DB: Backend>(
    State(state): State<Arc<AppState<DB>>>,
    Query(filters): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>> {
    let rows = composer::run(&state.db, &STATS_DATASET, &filters).await?;
    Ok(Json(rows))
}

pub async fn competition_context<DB: Backend>(
    State(state): State<Arc<AppState<DB>>>,
    Query(filters): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>> {
    let rows = composer::run(&state.db, &COMPETITION_CONTEXT, &filters).await?;
    Ok(Json(rows))
}

pub async fn player_competition_context<DB: Backend>(
    State(state): State<Arc<AppState<DB>>>,
    AppPath(player_id): AppPath<String>,
    Query(filters): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>> {
    let filters = with_path_filter("player_id", player_id, filters)?;
    let rows = composer::run(&state.db, &COMPETITION_CONTEXT, &filters).await?;
    Ok(Json(rows))
}
