#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use courtvision::ax_state::AppState;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

pub const SCHEMA: &str = r#"
CREATE TABLE Team (
    team_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    team_name TEXT NOT NULL,
    tier      TEXT
);
CREATE TABLE Players (
    playerID   INTEGER PRIMARY KEY AUTOINCREMENT,
    firstName  TEXT NOT NULL,
    lastName   TEXT NOT NULL,
    email      TEXT,
    AcctStatus TEXT DEFAULT 'active'
);
CREATE TABLE Playsin (
    playerID INTEGER NOT NULL REFERENCES Players (playerID),
    team_id  INTEGER NOT NULL REFERENCES Team (team_id),
    position TEXT,
    PRIMARY KEY (playerID, team_id)
);
CREATE TABLE Game (
    gameID     INTEGER PRIMARY KEY AUTOINCREMENT,
    date       TEXT NOT NULL,
    startTime  TEXT,
    opponent   TEXT NOT NULL,
    venue      TEXT,
    score      TEXT,
    tournament TEXT
);
CREATE TABLE Game_Stats (
    statID    INTEGER PRIMARY KEY AUTOINCREMENT,
    gameID    INTEGER NOT NULL REFERENCES Game (gameID),
    playerID  INTEGER NOT NULL REFERENCES Players (playerID),
    minutes   INTEGER NOT NULL DEFAULT 0 CHECK (minutes >= 0),
    points    INTEGER NOT NULL DEFAULT 0 CHECK (points >= 0),
    rebounds  INTEGER NOT NULL DEFAULT 0 CHECK (rebounds >= 0),
    assists   INTEGER NOT NULL DEFAULT 0 CHECK (assists >= 0),
    steals    INTEGER NOT NULL DEFAULT 0 CHECK (steals >= 0),
    blocks    INTEGER NOT NULL DEFAULT 0 CHECK (blocks >= 0),
    turnovers INTEGER NOT NULL DEFAULT 0 CHECK (turnovers >= 0),
    fouls     INTEGER NOT NULL DEFAULT 0 CHECK (fouls >= 0),
    three_pt  INTEGER NOT NULL DEFAULT 0 CHECK (three_pt >= 0)
);
CREATE TABLE Scout (
    scoutID    INTEGER PRIMARY KEY AUTOINCREMENT,
    firstName  TEXT NOT NULL,
    lastName   TEXT NOT NULL,
    email      TEXT,
    acctStatus TEXT DEFAULT 'active'
);
CREATE TABLE PlayerReports (
    reportID   INTEGER PRIMARY KEY AUTOINCREMENT,
    playerID   INTEGER NOT NULL REFERENCES Players (playerID),
    scoutID    INTEGER NOT NULL REFERENCES Scout (scoutID),
    summary    TEXT,
    strengths  TEXT,
    weaknesses TEXT
);
CREATE TABLE Annotations (
    annotationID INTEGER PRIMARY KEY AUTOINCREMENT,
    reportID     INTEGER NOT NULL REFERENCES PlayerReports (reportID),
    annotatedBy  INTEGER NOT NULL REFERENCES Scout (scoutID),
    text         TEXT NOT NULL,
    timestamp    TEXT NOT NULL DEFAULT '00:00:00'
)
"#;

/// Ana (1) and Ben (2) are guards on a D1 team, Cal (3) a forward on a D2 team,
/// Dee (4) has no games. Ana averages 15 despite a 30-point game; Ben averages 23;
/// Cal averages 15.
pub const SEED: &str = r#"
INSERT INTO Team (team_id, team_name, tier) VALUES (1, 'Huskies', 'D1'), (2, 'Owls', 'D2');
INSERT INTO Players (playerID, firstName, lastName, email) VALUES
    (1, 'Ana', 'Reyes', 'ana@example.com'),
    (2, 'Ben', 'Okafor', 'ben@example.com'),
    (3, 'Cal', 'Moore', 'cal@example.com'),
    (4, 'Dee', 'Park', 'dee@example.com');
INSERT INTO Playsin (playerID, team_id, position) VALUES
    (1, 1, 'Guard'), (2, 1, 'Guard'), (3, 2, 'Forward'), (4, 2, 'Center');
INSERT INTO Game (gameID, date, opponent) VALUES
    (1, '2024-01-10', 'Duke'), (2, '2024-01-17', 'UNC'), (3, '2024-01-24', 'Kansas');
INSERT INTO Game_Stats (gameID, playerID, minutes, points, rebounds, assists) VALUES
    (1, 1, 34, 30, 4, 2),
    (2, 1, 28, 5, 3, 3),
    (3, 1, 31, 10, 5, 4),
    (1, 2, 36, 22, 6, 7),
    (2, 2, 35, 24, 5, 8),
    (1, 3, 25, 18, 9, 1),
    (2, 3, 27, 12, 11, 2);
INSERT INTO Scout (scoutID, firstName, lastName) VALUES (1, 'Sara', 'Chin');
INSERT INTO PlayerReports (reportID, playerID, scoutID, summary, strengths, weaknesses) VALUES
    (1, 3, 1, 'Strong rebounder', 'Motor', 'Shooting')
"#;

async fn run_script(pool: &Pool<Sqlite>, script: &str) {
    for statement in script.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .unwrap_or_else(|e| panic!("failed to run `{}`: {}", statement, e));
    }
}

/// Fresh in-memory database with the schema and seed rows. One connection, kept
/// alive for the life of the pool, so every query sees the same database.
pub async fn seeded_pool() -> Pool<Sqlite> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("open in-memory sqlite");
    run_script(&pool, SCHEMA).await;
    run_script(&pool, SEED).await;
    pool
}

pub fn state(pool: &Pool<Sqlite>) -> Arc<AppState<Sqlite>> {
    Arc::new(AppState { db: pool.clone() })
}

pub async fn count(pool: &Pool<Sqlite>, sql: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(pool)
        .await
        .expect("count query")
}
