use chrono::NaiveTime;
use sqlx::Pool;
use tracing::{info, instrument};

use crate::core::lookup::{ensure_exists, find_report, Entity};
use crate::core::write_plan::{self, InsertStep, WritePlan};
use crate::error::{Error, Result};
use crate::infra::db::Backend;
use crate::models::schema::{AnnotationCreated, AnnotationRequest};

const PLACEHOLDER_SUMMARY: &str = "Live scouting session";
const DEFAULT_TIMESTAMP: &str = "00:00:00";

fn timestamp(req: &AnnotationRequest) -> Result<String> {
    match req.timestamp.as_deref().map(str::trim) {
        None | Some("") => Ok(DEFAULT_TIMESTAMP.to_string()),
        Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .map(|t| t.format("%H:%M:%S").to_string())
            .map_err(|_| Error::InvalidPayload(format!("timestamp `{}` is not HH:MM:SS", raw))),
    }
}

/// Attaches a live note to the scout's report on a player.
///
/// If the scout has not filed a report on that player yet, a placeholder report is
/// created in the same transaction as the annotation.
#[instrument(skip(pool, req), fields(player_id = req.player_id))]
pub async fn add_live_annotation<DB: Backend>(
    pool: &Pool<DB>,
    scout_id: i64,
    req: &AnnotationRequest,
) -> Result<AnnotationCreated> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(Error::InvalidPayload("annotation text must not be empty".to_string()));
    }
    let at = timestamp(req)?;

    ensure_exists(pool, Entity::Scout(scout_id)).await?;
    ensure_exists(pool, Entity::Player(req.player_id)).await?;
    let existing = find_report(pool, scout_id, req.player_id).await?;

    let mut plan = WritePlan::new();
    let annotation = InsertStep::into_table("Annotations");
    let annotation = match existing {
        Some(report_id) => annotation.value("reportID", report_id),
        None => {
            let report = plan.push(
                InsertStep::into_table("PlayerReports")
                    .value("playerID", req.player_id)
                    .value("scoutID", scout_id)
                    .value("summary", PLACEHOLDER_SUMMARY)
                    .value("strengths", "")
                    .value("weaknesses", ""),
            );
            annotation.generated_id("reportID", report)
        }
    };
    plan.push(
        annotation
            .value("annotatedBy", scout_id)
            .value("text", text)
            .value("timestamp", at),
    );

    let ids = write_plan::execute(pool, &plan).await?;
    let annotation_id = ids.last().copied().unwrap_or_default();
    let report_id = existing.or_else(|| ids.first().copied()).unwrap_or_default();
    info!(annotation_id, report_id, created_report = existing.is_none(), "annotation recorded");
    Ok(AnnotationCreated {
        annotation_id,
        report_id,
    })
}
