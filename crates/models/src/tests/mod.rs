

/// Startup fixture loading
pub mod seed_tests;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Single-connection in-memory SQLite with the schema created from entities.
pub(crate) async fn memory_db() -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await?;
    crate::db::create_schema(&db).await?;
    Ok(db)
}
