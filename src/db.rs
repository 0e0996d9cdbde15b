use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::sink::Store;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Inserts rows into the job-board's Postgres tables.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `INSERT INTO table (a, b) VALUES ($1, $2)` for a row's columns.
/// Table and column names come from compiled-in profiles, never from input.
pub fn insert_sql(table: &str, row: &[(&'static str, String)]) -> String {
    let columns = row
        .iter()
        .map(|(col, _)| *col)
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=row.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})")
}

#[async_trait]
impl Store for PgStore {
    async fn insert(
        &self,
        table: &'static str,
        row: Vec<(&'static str, String)>,
    ) -> Result<(), sqlx::Error> {
        let sql = insert_sql(table, &row);
        let mut query = sqlx::query(&sql);
        for (_, value) in row {
            query = query.bind(value);
        }
        query.execute(&self.pool).await?;
        Ok(())
    }
}
