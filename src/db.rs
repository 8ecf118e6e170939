//! Database module
//!
//! Database connection and migration utilities.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;

/// Tables the account store reads and writes
const REQUIRED_TABLES: &[&str] = &["accounts"];

/// Columns of `accounts` the store depends on
const REQUIRED_COLUMNS: &[&str] = &["id", "holder_name", "balance", "seq", "updated_at"];

/// Open the connection pool described by `config`
pub async fn connect(config: &Config, database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await
}

/// Verify database connectivity
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Apply the SQL files in migrations/
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Check if required tables and columns exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(*table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    let columns: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT column_name::TEXT FROM information_schema.columns
        WHERE table_schema = 'public' AND table_name = 'accounts'
        "#,
    )
    .fetch_all(pool)
    .await?;

    for column in REQUIRED_COLUMNS {
        if !columns.iter().any(|c| c == column) {
            tracing::error!("Required column 'accounts.{}' does not exist", column);
            return Ok(false);
        }
    }

    Ok(true)
}
