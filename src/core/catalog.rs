//! Query templates behind the read endpoints. Each one fixes the join topology,
//! the selectable columns and the allow-list of filters callers may use.

use crate::models::query::{
    AggFn, Aggregate, AggregateSpec, FilterSpec, Having, Operator, OrderKey, QueryTemplate,
    ValueKind,
};

const fn filter(
    name: &'static str,
    column: &'static str,
    operator: Operator,
    kind: ValueKind,
) -> FilterSpec {
    FilterSpec { name, column, operator, kind }
}

const AVG_POINTS: Aggregate = Aggregate { func: AggFn::Avg, column: "gs.points", alias: "avg_points" };
const AVG_REBOUNDS: Aggregate = Aggregate { func: AggFn::Avg, column: "gs.rebounds", alias: "avg_rebounds" };
const AVG_ASSISTS: Aggregate = Aggregate { func: AggFn::Avg, column: "gs.assists", alias: "avg_assists" };
const GAMES_PLAYED: Aggregate = Aggregate { func: AggFn::Count, column: "gs.gameID", alias: "games_played" };

/// Per-player season averages. `GET /players/stats/aggregate`
pub const PLAYER_AGGREGATE: QueryTemplate = QueryTemplate {
    name: "player_aggregate",
    columns: &["p.playerID", "p.firstName", "p.lastName", "pin.position", "pin.team_id", "t.team_name"],
    from: "Players p \
           JOIN Playsin pin ON p.playerID = pin.playerID \
           JOIN Team t ON pin.team_id = t.team_id \
           JOIN Game_Stats gs ON p.playerID = gs.playerID",
    filters: &[
        filter("position", "pin.position", Operator::Eq, ValueKind::Text),
        filter("team", "t.team_name", Operator::Eq, ValueKind::Text),
        filter("competition_level", "t.tier", Operator::Eq, ValueKind::Text),
        filter("min_points", "gs.points", Operator::Gte, ValueKind::Integer),
        filter("max_points", "gs.points", Operator::Lte, ValueKind::Integer),
        filter("min_assists", "gs.assists", Operator::Gte, ValueKind::Integer),
        filter("min_rebounds", "gs.rebounds", Operator::Gte, ValueKind::Integer),
    ],
    aggregate: Some(AggregateSpec {
        group_by: &["p.playerID", "p.firstName", "p.lastName", "pin.position", "pin.team_id", "t.team_name"],
        aggregates: &[AVG_POINTS, AVG_REBOUNDS, AVG_ASSISTS, GAMES_PLAYED],
        having: Some(Having {
            name: "min_avg_points",
            aggregate: AVG_POINTS,
            operator: Operator::Gte,
            kind: ValueKind::Float,
        }),
    }),
    // One row per (player, team): the team id keeps a player on two rosters ordered.
    order_by: &[
        OrderKey::desc("avg_points"),
        OrderKey::asc("p.playerID"),
        OrderKey::asc("pin.team_id"),
    ],
};

/// One player's box scores. `GET /players/{id}/stats/filtered`
pub const PLAYER_GAME_LOG: QueryTemplate = QueryTemplate {
    name: "player_game_log",
    columns: &[
        "gs.gameID", "g.date", "g.opponent", "gs.points", "gs.rebounds", "gs.assists",
        "gs.steals", "gs.blocks", "gs.minutes",
    ],
    from: "Game_Stats gs JOIN Game g ON gs.gameID = g.gameID",
    filters: &[
        filter("player_id", "gs.playerID", Operator::Eq, ValueKind::Integer),
        filter("min_points", "gs.points", Operator::Gte, ValueKind::Integer),
        filter("min_assists", "gs.assists", Operator::Gte, ValueKind::Integer),
        filter("opponent", "g.opponent", Operator::Eq, ValueKind::Text),
        filter("date_from", "g.date", Operator::Gte, ValueKind::Date),
        filter("date_to", "g.date", Operator::Lte, ValueKind::Date),
    ],
    aggregate: None,
    order_by: &[OrderKey::desc("gs.points"), OrderKey::asc("gs.gameID")],
};

/// Flat game-by-player statistics for analysts. `GET /analytics/datasets`
pub const STATS_DATASET: QueryTemplate = QueryTemplate {
    name: "stats_dataset",
    columns: &[
        "gs.statID", "gs.gameID", "gs.playerID", "g.date", "g.opponent", "p.firstName",
        "p.lastName", "gs.minutes", "gs.points", "gs.rebounds", "gs.assists", "gs.steals",
        "gs.blocks", "gs.turnovers", "gs.fouls", "gs.three_pt",
    ],
    from: "Game_Stats gs \
           JOIN Game g ON gs.gameID = g.gameID \
           JOIN Players p ON gs.playerID = p.playerID",
    filters: &[
        filter("player_id", "gs.playerID", Operator::Eq, ValueKind::Integer),
        filter("game_id", "gs.gameID", Operator::Eq, ValueKind::Integer),
        filter("opponent", "g.opponent", Operator::Eq, ValueKind::Text),
        filter("date_from", "g.date", Operator::Gte, ValueKind::Date),
        filter("date_to", "g.date", Operator::Lte, ValueKind::Date),
        filter("min_points", "gs.points", Operator::Gte, ValueKind::Integer),
        filter("min_minutes", "gs.minutes", Operator::Gte, ValueKind::Integer),
    ],
    aggregate: None,
    order_by: &[OrderKey::desc("g.date"), OrderKey::asc("gs.statID")],
};

/// Averages split by the tier of the team a player plays for.
/// `GET /analytics/competition-context[/{id}]`
pub const COMPETITION_CONTEXT: QueryTemplate = QueryTemplate {
    name: "competition_context",
    columns: &["p.playerID", "p.firstName", "p.lastName", "t.tier AS competition_level"],
    from: "Players p \
           JOIN Playsin pin ON p.playerID = pin.playerID \
           JOIN Team t ON pin.team_id = t.team_id \
           JOIN Game_Stats gs ON p.playerID = gs.playerID",
    filters: &[
        filter("player_id", "p.playerID", Operator::Eq, ValueKind::Integer),
        filter("position", "pin.position", Operator::Eq, ValueKind::Text),
        filter("competition_level", "t.tier", Operator::Eq, ValueKind::Text),
    ],
    aggregate: Some(AggregateSpec {
        group_by: &["p.playerID", "p.firstName", "p.lastName", "t.tier"],
        aggregates: &[AVG_POINTS, AVG_REBOUNDS, AVG_ASSISTS, GAMES_PLAYED],
        having: Some(Having {
            name: "min_games",
            aggregate: GAMES_PLAYED,
            operator: Operator::Gte,
            kind: ValueKind::Integer,
        }),
    }),
    order_by: &[
        OrderKey::desc("competition_level"),
        OrderKey::desc("avg_points"),
        OrderKey::asc("p.playerID"),
    ],
};

pub const ALL: &[&QueryTemplate] = &[
    &PLAYER_AGGREGATE,
    &PLAYER_GAME_LOG,
    &STATS_DATASET,
    &COMPETITION_CONTEXT,
];
