use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use tracing::{info, warn};

const CREATE_ACTIVITIES: &str = r#"
    CREATE TABLE IF NOT EXISTS activities (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        name             TEXT    NOT NULL,
        category         TEXT,
        energy_before    INTEGER NOT NULL CHECK (energy_before BETWEEN 1 AND 10),
        energy_after     INTEGER NOT NULL CHECK (energy_after BETWEEN 1 AND 10),
        duration_minutes REAL    NOT NULL CHECK (duration_minutes > 0),
        timestamp        TEXT    NOT NULL,
        user_id          TEXT
    )
"#;

const CREATE_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_activities_user_id ON activities(user_id)";

pub const ACTIVITY_COLUMNS: &[&str] = &[
    "id",
    "name",
    "category",
    "energy_before",
    "energy_after",
    "duration_minutes",
    "timestamp",
    "user_id",
];

/// Open (creating if needed) the database file at `path`.
pub async fn connect(path: &Path) -> anyhow::Result<SqlitePool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create database directory {}", parent.display()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("open database {}", path.display()))
}

/// Create the activities table if absent and verify its columns.
///
/// Safe to run on every startup. When columns are missing the table is only
/// dropped and recreated if `reset_on_mismatch` is set; all rows are lost.
pub async fn ensure_schema(db: &SqlitePool, reset_on_mismatch: bool) -> anyhow::Result<()> {
    sqlx::query(CREATE_ACTIVITIES)
        .execute(db)
        .await
        .context("create activities table")?;

    let missing = missing_columns(db).await?;
    if !missing.is_empty() {
        if !reset_on_mismatch {
            anyhow::bail!(
                "activities table is missing columns [{}]; set RESET_ON_SCHEMA_MISMATCH=true \
                 to drop and recreate it (all stored activities will be deleted)",
                missing.join(", ")
            );
        }

        warn!(missing = %missing.join(", "), "schema mismatch, dropping activities table");
        let mut tx = db.begin().await.context("begin schema reset")?;
        sqlx::query("DROP TABLE activities")
            .execute(&mut *tx)
            .await
            .context("drop activities table")?;
        sqlx::query(CREATE_ACTIVITIES)
            .execute(&mut *tx)
            .await
            .context("recreate activities table")?;
        tx.commit().await.context("commit schema reset")?;
        warn!("activities table recreated, previous data discarded");
    }

    sqlx::query(CREATE_USER_INDEX)
        .execute(db)
        .await
        .context("create user_id index")?;

    info!("database schema is up to date");
    Ok(())
}

async fn missing_columns(db: &SqlitePool) -> anyhow::Result<Vec<&'static str>> {
    let present =
        sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info('activities')")
            .fetch_all(db)
            .await
            .context("inspect activities columns")?;

    Ok(ACTIVITY_COLUMNS
        .iter()
        .copied()
        .filter(|col| !present.iter().any(|p| p == col))
        .collect())
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // A single connection that never expires keeps the in-memory database alive.
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite")
}
