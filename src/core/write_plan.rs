use sqlx::Pool;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{Error, Result};
use crate::infra::db::Backend;
use crate::models::query::SqlValue;

/// Position of a step inside the plan that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRef(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Value(SqlValue),
    /// Identifier generated by an earlier step, filled in at execution time.
    GeneratedId(StepRef),
}

#[derive(Debug, Clone)]
pub struct InsertStep {
    pub table: &'static str,
    pub columns: Vec<(&'static str, ColumnValue)>,
}

impl InsertStep {
    pub fn into_table(table: &'static str) -> Self {
        Self {
            table,
            columns: Vec::new(),
        }
    }

    pub fn value(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.columns.push((column, ColumnValue::Value(value.into())));
        self
    }

    pub fn generated_id(mut self, column: &'static str, step: StepRef) -> Self {
        self.columns.push((column, ColumnValue::GeneratedId(step)));
        self
    }

    pub fn sql(&self) -> String {
        let names: Vec<&str> = self.columns.iter().map(|(c, _)| *c).collect();
        let marks = vec!["?"; names.len()].join(", ");
        format!("INSERT INTO {} ({}) VALUES ({})", self.table, names.join(", "), marks)
    }

    fn resolve(&self, ids: &[i64]) -> Vec<SqlValue> {
        self.columns
            .iter()
            .map(|(_, v)| match v {
                ColumnValue::Value(v) => v.clone(),
                ColumnValue::GeneratedId(step) => {
                    ids.get(step.0).copied().map_or(SqlValue::Null, SqlValue::Int)
                }
            })
            .collect()
    }
}

/// Ordered inserts committed as one unit.
///
/// Plans are not deduplicated: running the same plan twice inserts two sets of rows.
#[derive(Debug, Clone, Default)]
pub struct WritePlan {
    steps: Vec<InsertStep>,
}

impl WritePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: InsertStep) -> StepRef {
        self.steps.push(step);
        StepRef(self.steps.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[InsertStep] {
        &self.steps
    }

    /// Every placeholder must point at a step that runs earlier.
    pub fn validate(&self) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            if step.columns.is_empty() {
                return Err(Error::WriteFailed {
                    step: index + 1,
                    table: step.table,
                    reason: "step has no columns".to_string(),
                });
            }
            for (column, value) in &step.columns {
                if let ColumnValue::GeneratedId(target) = value {
                    if target.0 >= index {
                        return Err(Error::WriteFailed {
                            step: index + 1,
                            table: step.table,
                            reason: format!(
                                "column {} refers to step {}, which has not run yet",
                                column,
                                target.0 + 1
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Runs `plan` in a single transaction and returns one generated id per step.
///
/// Any failing step rolls back the whole plan. The transaction guard also rolls
/// back on drop, so an early return or a cancelled future never commits.
#[instrument(skip(pool, plan), fields(steps = plan.len()))]
pub async fn execute<DB: Backend>(pool: &Pool<DB>, plan: &WritePlan) -> Result<Vec<i64>> {
    plan.validate()?;
    if plan.is_empty() {
        return Ok(Vec::new());
    }

    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(plan.len());

    for (index, step) in plan.steps.iter().enumerate() {
        let sql = step.sql();
        let params = step.resolve(&ids);
        debug!(step = index + 1, table = step.table, "insert");

        let outcome = DB::insert(&mut *tx, &sql, &params).await;
        match outcome {
            Ok(id) => ids.push(id),
            Err(e) => {
                warn!(step = index + 1, table = step.table, error = %e, "write step failed, rolling back");
                if let Err(rb) = tx.rollback().await {
                    error!(error = %rb, "explicit rollback failed, connection will be discarded");
                }
                return Err(Error::WriteFailed {
                    step: index + 1,
                    table: step.table,
                    reason: e.to_string(),
                });
            }
        }
    }

    tx.commit().await?;
    info!(ids = ?ids, "write plan committed");
    Ok(ids)
}
