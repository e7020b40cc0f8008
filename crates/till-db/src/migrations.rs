//! # Database Migrations
//!
//! The schema lives in `migrations/sqlite/NNN_description.sql` and is
//! compiled into the binary. [`crate::Database::new`] applies whatever is
//! pending before handing out repositories.
//!
//! ```text
//! 001_initial_schema.sql   staff, customers, products, transactions
//! ```
//!
//! Applied files are checksummed in `_sqlx_migrations`; never edit one, add
//! the next number instead.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations, each in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying migrations");
    MIGRATOR.run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    async fn applied(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    async fn tables(db: &Database) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name NOT LIKE 'sqlite%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_schema_created_on_connect() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(
            tables(&db).await,
            vec!["customers", "products", "staff", "transactions"]
        );
    }

    #[tokio::test]
    async fn test_rerun_is_a_no_op() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let before = applied(&db).await;
        db.run_migrations().await.unwrap();
        assert_eq!(applied(&db).await, before);
        assert!(before >= 1);
    }

    #[tokio::test]
    async fn test_disabled_migrations_leave_database_empty() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        assert!(tables(&db).await.is_empty());
    }
}
