use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One player's line in a box score. Every counter is required; a missing one
/// rejects the payload rather than storing a zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatLine {
    #[serde(rename = "playerID")]
    pub player_id: i64,
    pub minutes: i64,
    pub points: i64,
    pub rebounds: i64,
    pub assists: i64,
    pub steals: i64,
    pub blocks: i64,
    pub turnovers: i64,
    pub fouls: i64,
    pub three_pt: i64,
}

impl StatLine {
    pub fn counters(&self) -> [(&'static str, i64); 9] {
        [
            ("minutes", self.minutes),
            ("points", self.points),
            ("rebounds", self.rebounds),
            ("assists", self.assists),
            ("steals", self.steals),
            ("blocks", self.blocks),
            ("turnovers", self.turnovers),
            ("fouls", self.fouls),
            ("three_pt", self.three_pt),
        ]
    }
}

/// `POST /games`: a game and the stat lines recorded in it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub date: NaiveDate,
    pub opponent: String,
    pub start_time: Option<String>,
    pub venue: Option<String>,
    pub score: Option<String>,
    pub tournament: Option<String>,
    #[serde(default)]
    pub stats: Vec<StatLine>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GameCreated {
    #[serde(rename = "gameID")]
    pub game_id: i64,
    #[serde(rename = "statIDs")]
    pub stat_ids: Vec<i64>,
}

/// `POST /players/stats`: a stat line for a game that already exists.
#[derive(Debug, Clone, Deserialize)]
pub struct AddStatsRequest {
    #[serde(rename = "gameID")]
    pub game_id: i64,
    #[serde(flatten)]
    pub line: StatLine,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsCreated {
    #[serde(rename = "statID")]
    pub stat_id: i64,
}

/// `POST /scouts/{id}/annotations`: a note taken while watching a game live.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationRequest {
    #[serde(rename = "playerID")]
    pub player_id: i64,
    pub text: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnnotationCreated {
    #[serde(rename = "annotationID")]
    pub annotation_id: i64,
    #[serde(rename = "reportID")]
    pub report_id: i64,
}
