use chrono::NaiveTime;
use sqlx::Pool;
use tracing::{info, instrument};

use crate::core::lookup::{ensure_exists, Entity};
use crate::core::write_plan::{self, InsertStep, WritePlan};
use crate::error::{Error, Result};
use crate::infra::db::Backend;
use crate::models::schema::{AddStatsRequest, CreateGameRequest, GameCreated, StatLine, StatsCreated};

fn validate_line(line: &StatLine) -> Result<()> {
    for (name, value) in line.counters() {
        if value < 0 {
            return Err(Error::InvalidPayload(format!(
                "{} must not be negative (player {})",
                name, line.player_id
            )));
        }
    }
    Ok(())
}

/// Tip-off time as `HH:MM:SS`, or `None` when not given.
fn start_time(req: &CreateGameRequest) -> Result<Option<String>> {
    match req.start_time.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .map(|t| Some(t.format("%H:%M:%S").to_string()))
            .map_err(|_| Error::InvalidPayload(format!("startTime `{}` is not HH:MM:SS", raw))),
    }
}

/// Appends the player and counter columns of `line` to a `Game_Stats` insert.
fn with_stat_columns(step: InsertStep, line: &StatLine) -> InsertStep {
    line.counters()
        .into_iter()
        .fold(step.value("playerID", line.player_id), |step, (column, value)| {
            step.value(column, value)
        })
}

/// Records a game and its box score atomically.
///
/// Every referenced player must exist. Submitting the same payload twice records
/// two games.
#[instrument(skip(pool, req), fields(opponent = %req.opponent, lines = req.stats.len()))]
pub async fn create_game<DB: Backend>(pool: &Pool<DB>, req: &CreateGameRequest) -> Result<GameCreated> {
    let opponent = req.opponent.trim();
    if opponent.is_empty() {
        return Err(Error::InvalidPayload("opponent must not be empty".to_string()));
    }
    let tip_off = start_time(req)?;
    for line in &req.stats {
        validate_line(line)?;
    }

    let mut players: Vec<i64> = req.stats.iter().map(|l| l.player_id).collect();
    players.sort_unstable();
    players.dedup();
    for id in players {
        ensure_exists(pool, Entity::Player(id)).await?;
    }

    let mut plan = WritePlan::new();
    let game = plan.push(
        InsertStep::into_table("Game")
            .value("date", req.date.format("%Y-%m-%d").to_string())
            .value("opponent", opponent)
            .value("startTime", tip_off)
            .value("venue", req.venue.clone())
            .value("score", req.score.clone())
            .value("tournament", req.tournament.clone()),
    );
    for line in &req.stats {
        plan.push(with_stat_columns(
            InsertStep::into_table("Game_Stats").generated_id("gameID", game),
            line,
        ));
    }

    let ids = write_plan::execute(pool, &plan).await?;
    let (game_id, stat_ids) = match ids.split_first() {
        Some((game_id, stat_ids)) => (*game_id, stat_ids.to_vec()),
        None => (0, Vec::new()),
    };
    info!(game_id, stats = stat_ids.len(), "game recorded");
    Ok(GameCreated { game_id, stat_ids })
}

/// Adds one stat line to a game that is already on file.
#[instrument(skip(pool, req), fields(game_id = req.game_id, player_id = req.line.player_id))]
pub async fn add_game_stats<DB: Backend>(pool: &Pool<DB>, req: &AddStatsRequest) -> Result<StatsCreated> {
    validate_line(&req.line)?;
    ensure_exists(pool, Entity::Player(req.line.player_id)).await?;
    ensure_exists(pool, Entity::Game(req.game_id)).await?;

    let mut plan = WritePlan::new();
    plan.push(with_stat_columns(
        InsertStep::into_table("Game_Stats").value("gameID", req.game_id),
        &req.line,
    ));

    let ids = write_plan::execute(pool, &plan).await?;
    let stat_id = ids.first().copied().unwrap_or_default();
    info!(stat_id, "stat line recorded");
    Ok(StatsCreated { stat_id })
}
