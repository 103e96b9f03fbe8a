#![cfg(test)]
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use models::db::{connect_with_config, create_schema, DatabaseConfig};

/// Fresh in-memory SQLite store with both tables created.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_secs: 5,
        acquire_timeout_secs: 5,
        auto_create_schema: true,
        ..DatabaseConfig::default()
    };
    let db = connect_with_config(&cfg).await?;
    create_schema(&db).await?;
    Ok(db)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
