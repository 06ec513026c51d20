use sqlx::Pool;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::infra::db::Backend;
use crate::models::query::SqlValue;

/// A row another write depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Player(i64),
    Game(i64),
    Scout(i64),
}

impl Entity {
    pub fn label(self) -> &'static str {
        match self {
            Entity::Player(_) => "player",
            Entity::Game(_) => "game",
            Entity::Scout(_) => "scout",
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Entity::Player(id) | Entity::Game(id) | Entity::Scout(id) => id,
        }
    }

    fn exists_sql(self) -> &'static str {
        match self {
            Entity::Player(_) => "SELECT 1 AS found FROM Players WHERE playerID = ? LIMIT 1",
            Entity::Game(_) => "SELECT 1 AS found FROM Game WHERE gameID = ? LIMIT 1",
            Entity::Scout(_) => "SELECT 1 AS found FROM Scout WHERE scoutID = ? LIMIT 1",
        }
    }
}

/// Read-only existence check, run before a write plan opens its transaction.
#[instrument(skip(pool))]
pub async fn ensure_exists<DB: Backend>(pool: &Pool<DB>, entity: Entity) -> Result<()> {
    let mut conn = pool.acquire().await?;
    let rows = DB::fetch_json(&mut *conn, entity.exists_sql(), &[SqlValue::Int(entity.id())]).await?;
    if rows.is_empty() {
        debug!("referenced {} is missing", entity.label());
        return Err(Error::NotFound {
            entity: entity.label(),
            id: entity.id(),
        });
    }
    Ok(())
}

/// Existing report a scout has filed on a player, if any.
#[instrument(skip(pool))]
pub async fn find_report<DB: Backend>(pool: &Pool<DB>, scout_id: i64, player_id: i64) -> Result<Option<i64>> {
    let mut conn = pool.acquire().await?;
    let rows = DB::fetch_json(
        &mut *conn,
        "SELECT reportID FROM PlayerReports WHERE scoutID = ? AND playerID = ? ORDER BY reportID ASC LIMIT 1",
        &[SqlValue::Int(scout_id), SqlValue::Int(player_id)],
    )
    .await?;
    Ok(rows
        .first()
        .and_then(|r| r.get("reportID"))
        .and_then(|v| v.as_i64()))
}
