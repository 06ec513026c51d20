/// Comparison used by a single predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gte,
    Lte,
}

impl Operator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }
}

/// Type a raw filter value is coerced to before binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    Float,
    Date,
}

impl ValueKind {
    pub fn describe(self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Float => "number",
            ValueKind::Date => "date (YYYY-MM-DD)",
        }
    }
}

/// A bound statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// One allow-listed filter: the public name callers use and the column it maps to.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub name: &'static str,
    pub column: &'static str,
    pub operator: Operator,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFn {
    Avg,
    Count,
}

impl AggFn {
    pub fn as_sql(self) -> &'static str {
        match self {
            AggFn::Avg => "AVG",
            AggFn::Count => "COUNT",
        }
    }
}

/// An aggregated output column, e.g. `AVG(gs.points) AS avg_points`.
#[derive(Debug, Clone, Copy)]
pub struct Aggregate {
    pub func: AggFn,
    pub column: &'static str,
    pub alias: &'static str,
}

impl Aggregate {
    pub fn expr(&self) -> String {
        format!("{}({})", self.func.as_sql(), self.column)
    }
}

/// Post-aggregation threshold, driven by the filter named `name`.
#[derive(Debug, Clone, Copy)]
pub struct Having {
    pub name: &'static str,
    pub aggregate: Aggregate,
    pub operator: Operator,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, Copy)]
pub struct AggregateSpec {
    pub group_by: &'static [&'static str],
    pub aggregates: &'static [Aggregate],
    pub having: Option<Having>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy)]
pub struct OrderKey {
    pub expr: &'static str,
    pub direction: Direction,
}

impl OrderKey {
    pub const fn asc(expr: &'static str) -> Self {
        Self { expr, direction: Direction::Asc }
    }

    pub const fn desc(expr: &'static str) -> Self {
        Self { expr, direction: Direction::Desc }
    }
}

/// Fixed shape of one endpoint's query: columns, joins, allow-list, aggregation and ordering.
#[derive(Debug, Clone, Copy)]
pub struct QueryTemplate {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub from: &'static str,
    pub filters: &'static [FilterSpec],
    pub aggregate: Option<AggregateSpec>,
    pub order_by: &'static [OrderKey],
}

impl QueryTemplate {
    pub fn filter(&self, name: &str) -> Option<&FilterSpec> {
        self.filters.iter().find(|f| f.name == name)
    }

    pub fn having(&self) -> Option<&Having> {
        self.aggregate.as_ref().and_then(|a| a.having.as_ref())
    }
}
