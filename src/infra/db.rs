use std::future::Future;

use serde_json::Value;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnection, MySqlPoolOptions};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnection, SqlitePoolOptions};
use sqlx::{Database, Pool};

use crate::infra::utils::{mysql_row_to_json, sqlite_row_to_json};
use crate::models::query::SqlValue;

/// A storage engine the service can run on.
///
/// Statement execution lives here so the rest of the crate stays generic over the
/// pool type: handlers and services take `&Pool<DB>` and never touch a concrete
/// executor. Both supported engines use `?` placeholders.
pub trait Backend: Database + Sync {
    /// Runs a SELECT and returns each row as a JSON object keyed by column name.
    fn fetch_json(
        conn: &mut Self::Connection,
        sql: &str,
        params: &[SqlValue],
    ) -> impl Future<Output = Result<Vec<Value>, sqlx::Error>> + Send;

    /// Runs an INSERT and returns the generated identifier.
    fn insert(
        conn: &mut Self::Connection,
        sql: &str,
        params: &[SqlValue],
    ) -> impl Future<Output = Result<i64, sqlx::Error>> + Send;
}

fn bind_mysql<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &[SqlValue],
) -> Query<'q, MySql, MySqlArguments> {
    for p in params {
        query = match p {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Null => query.bind(None::<i64>),
        };
    }
    query
}

fn bind_sqlite<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for p in params {
        query = match p {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Null => query.bind(None::<i64>),
        };
    }
    query
}

impl Backend for MySql {
    async fn fetch_json(
        conn: &mut MySqlConnection,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<Value>, sqlx::Error> {
        let rows = bind_mysql(sqlx::query::<MySql>(sql), params)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows.iter().map(mysql_row_to_json).collect())
    }

    async fn insert(
        conn: &mut MySqlConnection,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<i64, sqlx::Error> {
        let result = bind_mysql(sqlx::query::<MySql>(sql), params)
            .execute(&mut *conn)
            .await?;
        i64::try_from(result.last_insert_id()).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }
}

impl Backend for Sqlite {
    async fn fetch_json(
        conn: &mut SqliteConnection,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<Value>, sqlx::Error> {
        let rows = bind_sqlite(sqlx::query::<Sqlite>(sql), params)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows.iter().map(sqlite_row_to_json).collect())
    }

    async fn insert(
        conn: &mut SqliteConnection,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<i64, sqlx::Error> {
        let result = bind_sqlite(sqlx::query::<Sqlite>(sql), params)
            .execute(&mut *conn)
            .await?;
        Ok(result.last_insert_rowid())
    }
}

pub async fn connect_mysql(database_url: &str, max_connections: u32) -> Result<Pool<MySql>, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn connect_sqlite(database_url: &str, max_connections: u32) -> Result<Pool<Sqlite>, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
