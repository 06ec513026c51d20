use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use serde_json::{json, Map, Value};
use sqlx::mysql::MySqlRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

pub fn mysql_row_to_json(row: &MySqlRow) -> Value {
    let mut map = Map::new();

    for (idx, col) in row.columns().iter().enumerate() {
        let name = col.name();
        let type_info = col.type_info();
        let type_name = type_info.name(); // e.g. "INT", "DECIMAL", "VARCHAR", "DATE"

        let val = match type_name {
            "TINYINT" | "SMALLINT" | "INT" | "MEDIUMINT" | "BIGINT" => {
                let v: Option<i64> = row.try_get(idx).unwrap_or(None);
                json!(v)
            }
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "INT UNSIGNED" | "MEDIUMINT UNSIGNED"
            | "BIGINT UNSIGNED" => {
                let v: Option<u64> = row.try_get(idx).unwrap_or(None);
                json!(v)
            }
            "BOOLEAN" => {
                let v: Option<bool> = row.try_get(idx).unwrap_or(None);
                json!(v)
            }
            "FLOAT" | "DOUBLE" => {
                let v: Option<f64> = row.try_get(idx).unwrap_or(None);
                json!(v)
            }
            // AVG() comes back as DECIMAL; charts want plain numbers
            "DECIMAL" => {
                let v: Option<rust_decimal::Decimal> = row.try_get(idx).unwrap_or(None);
                json!(v.and_then(|d| d.to_f64()))
            }
            "DATE" => {
                let v: Option<NaiveDate> = row.try_get(idx).unwrap_or(None);
                json!(v.map(|d| d.to_string()))
            }
            "TIME" => {
                let v: Option<NaiveTime> = row.try_get(idx).unwrap_or(None);
                json!(v.map(|t| t.to_string()))
            }
            "DATETIME" | "TIMESTAMP" => {
                let v: Option<NaiveDateTime> = row.try_get(idx).unwrap_or(None);
                json!(v.map(|dt| dt.to_string()))
            }
            _ => {
                let v: Option<String> = row.try_get(idx).unwrap_or(None);
                json!(v)
            }
        };

        map.insert(name.to_string(), val);
    }

    Value::Object(map)
}

/// SQLite types are per value, so decode on the storage class of what came back.
pub fn sqlite_row_to_json(row: &SqliteRow) -> Value {
    let mut map = Map::new();

    for (idx, col) in row.columns().iter().enumerate() {
        let name = col.name();
        let storage_class = match row.try_get_raw(idx) {
            Ok(raw) if !raw.is_null() => raw.type_info().name().to_string(),
            _ => {
                map.insert(name.to_string(), Value::Null);
                continue;
            }
        };

        let val = match storage_class.as_str() {
            "INTEGER" => json!(row.try_get::<Option<i64>, _>(idx).unwrap_or(None)),
            "REAL" => json!(row.try_get::<Option<f64>, _>(idx).unwrap_or(None)),
            "BLOB" => Value::Null,
            _ => json!(row.try_get::<Option<String>, _>(idx).unwrap_or(None)),
        };

        map.insert(name.to_string(), val);
    }

    Value::Object(map)
}
