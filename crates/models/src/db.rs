use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use tracing::info;

pub use configs::DatabaseConfig;

use crate::{comment, movie};

/// Connect using pool settings from the `[database]` section.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    info!(backend = ?db.get_database_backend(), max_connections = cfg.max_connections, "database connected");
    Ok(db)
}

/// Create `tb_movie` and `tb_comment` from the entity definitions if they are missing.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut movie_table = schema.create_table_from_entity(movie::Entity);
    movie_table.if_not_exists();
    db.execute(backend.build(&movie_table)).await?;

    let mut comment_table = schema.create_table_from_entity(comment::Entity);
    comment_table.if_not_exists();
    db.execute(backend.build(&comment_table)).await?;

    info!("schema ensured for tb_movie, tb_comment");
    Ok(())
}
