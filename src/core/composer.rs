use chrono::NaiveDate;
use serde_json::Value;
use sqlx::Pool;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::infra::db::Backend;
use crate::models::query::{Direction, QueryTemplate, SqlValue, ValueKind};

/// SQL text plus its positional parameters, ready to run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedQuery {
    pub template: &'static str,
    pub sql: String,
    pub params: Vec<SqlValue>,
    /// WHERE predicates in the order they were supplied.
    pub predicates: Vec<String>,
    /// HAVING predicates; their parameters follow every WHERE parameter.
    pub having: Vec<String>,
}

/// Builds a query from `template` and caller-supplied `(name, value)` pairs.
///
/// Names must be on the template's allow-list (a WHERE filter, or the HAVING
/// threshold of its aggregation). Empty values are skipped. Only column text from
/// the template ever reaches the SQL string; values are always bound.
pub fn compose(template: &QueryTemplate, filters: &[(String, String)]) -> Result<ComposedQuery> {
    let mut predicates = Vec::new();
    let mut params = Vec::new();
    let mut having = Vec::new();
    let mut having_params = Vec::new();

    for (name, raw) in filters {
        let value = raw.trim();
        if let Some(spec) = template.filter(name) {
            if value.is_empty() {
                continue;
            }
            params.push(coerce(name, value, spec.kind)?);
            predicates.push(format!("{} {} ?", spec.column, spec.operator.as_sql()));
        } else if let Some(h) = template.having().filter(|h| h.name == name.as_str()) {
            if value.is_empty() {
                continue;
            }
            having_params.push(coerce(name, value, h.kind)?);
            having.push(format!("{} {} ?", h.aggregate.expr(), h.operator.as_sql()));
        } else {
            return Err(Error::InvalidFilter { name: name.clone() });
        }
    }

    let mut select: Vec<String> = template.columns.iter().map(|c| c.to_string()).collect();
    if let Some(agg) = &template.aggregate {
        select.extend(
            agg.aggregates
                .iter()
                .map(|a| format!("{} AS {}", a.expr(), a.alias)),
        );
    }

    let mut sql = format!("SELECT {} FROM {}", select.join(", "), template.from);
    if !predicates.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }
    if let Some(agg) = &template.aggregate {
        if !agg.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&agg.group_by.join(", "));
        }
        if !having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&having.join(" AND "));
        }
    }
    if !template.order_by.is_empty() {
        let keys: Vec<String> = template
            .order_by
            .iter()
            .map(|k| match k.direction {
                Direction::Asc => format!("{} ASC", k.expr),
                Direction::Desc => format!("{} DESC", k.expr),
            })
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&keys.join(", "));
    }

    params.extend(having_params);

    Ok(ComposedQuery {
        template: template.name,
        sql,
        params,
        predicates,
        having,
    })
}

fn coerce(name: &str, raw: &str, kind: ValueKind) -> Result<SqlValue> {
    let invalid = || Error::InvalidFilterValue {
        name: name.to_string(),
        value: raw.to_string(),
        expected: kind.describe(),
    };
    match kind {
        ValueKind::Text => Ok(SqlValue::Text(raw.to_string())),
        ValueKind::Integer => raw.parse::<i64>().map(SqlValue::Int).map_err(|_| invalid()),
        ValueKind::Float => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(SqlValue::Float)
            .ok_or_else(invalid),
        ValueKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|d| SqlValue::Text(d.format("%Y-%m-%d").to_string()))
            .map_err(|_| invalid()),
    }
}

/// Runs a composed query on one pooled connection.
#[instrument(skip(pool, query), fields(template = query.template))]
pub async fn fetch<DB: Backend>(pool: &Pool<DB>, query: &ComposedQuery) -> Result<Vec<Value>> {
    debug!(sql = %query.sql, params = query.params.len(), "running composed query");
    let mut conn = pool.acquire().await?;
    let rows = DB::fetch_json(&mut *conn, &query.sql, &query.params).await?;
    debug!(rows = rows.len(), "composed query returned");
    Ok(rows)
}

/// `compose` then `fetch`. Nothing reaches the database if composition fails.
pub async fn run<DB: Backend>(
    pool: &Pool<DB>,
    template: &QueryTemplate,
    filters: &[(String, String)],
) -> Result<Vec<Value>> {
    let query = compose(template, filters)?;
    fetch(pool, &query).await
}
