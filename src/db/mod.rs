//! SQLite storage: connection handling, the startup migration, and the
//! per-entity repository operations (`projects`, `tasks`, `expenses`,
//! `incomes`), all implemented as methods on [`Database`].

mod projects;
mod tasks;
mod expenses;
mod incomes;

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the SQLite file at `path`.
    ///
    /// Foreign keys are switched on for every pooled connection so that
    /// deleting a project cascades to its tasks, expenses and incomes.
    /// The schema is not touched here; call [`Database::migrate`] once at startup.
    pub async fn connect(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Opening database at {:?}", path);

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Apply any pending schema migrations. Safe to run repeatedly.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        info!("Database schema is up to date");
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Connect to the configured database and bring its schema up to date
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::connect(config.database_path()).await?;
    db.migrate().await?;
    Ok(db)
}

/// Fail with a referential error unless `project_id` names an existing project
async fn ensure_project(conn: &mut SqliteConnection, project_id: i64) -> Result<()> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM projects WHERE id = ?")
        .bind(project_id)
        .fetch_optional(&mut *conn)
        .await?;

    if found.is_none() {
        debug!(project_id, "rejecting write for unknown project");
        return Err(Error::Referential { project_id });
    }
    Ok(())
}

/// Unicode-aware case-insensitive substring test; a missing value counts as empty
fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .unwrap_or_default()
        .to_lowercase()
        .contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::contains_ignore_case;

    #[test]
    fn substring_match_folds_non_ascii_case() {
        assert!(contains_ignore_case(Some("José Ángel"), "ángel"));
        assert!(contains_ignore_case(Some("MÜLLER Bau"), "müller"));
        assert!(contains_ignore_case(Some("Home Depot"), "DEPOT"));
        assert!(!contains_ignore_case(Some("Home Depot"), "lowe"));
        assert!(!contains_ignore_case(None, "x"));
        assert!(contains_ignore_case(None, ""));
    }
}
