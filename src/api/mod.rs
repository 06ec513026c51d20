pub mod extract;
pub mod games;
pub mod scouting;
pub mod stats;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::ax_state::AppState;
use crate::infra::db::Backend;

pub fn router<DB: Backend>(state: Arc<AppState<DB>>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/players/stats/aggregate", get(stats::player_aggregate::<DB>))
        .route("/players/stats", post(games::add_game_stats::<DB>))
        .route("/players/{id}/stats/filtered", get(stats::player_game_log::<DB>))
        .route("/games", post(games::create_game::<DB>))
        .route("/analytics/datasets", get(stats::stats_dataset::<DB>))
        .route("/analytics/competition-context", get(stats::competition_context::<DB>))
        .route(
            "/analytics/competition-context/{id}",
            get(stats::player_competition_context::<DB>),
        )
        .route("/scouts/{id}/annotations", post(scouting::add_live_annotation::<DB>))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
