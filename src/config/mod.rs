use std::path::{Path, PathBuf};

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Environment variable prefix for every setting
pub const ENV_PREFIX: &str = "TRACKER_";

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Directory receipts are copied into
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Fallback tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data").join("app.db")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("data").join("uploads")
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            upload_dir: default_upload_dir(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize `TRACKER_`-prefixed variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::prefixed(ENV_PREFIX).from_env::<Config>()?;

        Ok(config)
    }

    /// Build a config from explicit key/value pairs, as if they were the environment
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX).from_iter::<_, Config>(pairs)?;
        Ok(config)
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Replace the database path, e.g. from a `--db` flag
    pub fn with_database_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.database_path = path;
        }
        self
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_pairs(Vec::new()).unwrap();
        assert_eq!(config.database_path(), Path::new("data/app.db"));
        assert_eq!(config.upload_dir(), Path::new("data/uploads"));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn prefixed_variables_override_defaults() {
        let config = Config::from_pairs(pairs(&[
            ("TRACKER_DATABASE_PATH", "/tmp/jobs.db"),
            ("TRACKER_LOG_FILTER", "job_tracker=debug"),
            ("DATABASE_PATH", "/ignored.db"),
        ]))
        .unwrap();

        assert_eq!(config.database_path(), Path::new("/tmp/jobs.db"));
        assert_eq!(config.upload_dir(), Path::new("data/uploads"));
        assert_eq!(config.log_filter, "job_tracker=debug");
    }

    #[test]
    fn cli_path_wins_over_environment() {
        let config = Config::from_pairs(pairs(&[("TRACKER_DATABASE_PATH", "/tmp/a.db")]))
            .unwrap()
            .with_database_path(Some(PathBuf::from("/tmp/b.db")));
        assert_eq!(config.database_path(), Path::new("/tmp/b.db"));

        let unchanged = Config::default().with_database_path(None);
        assert_eq!(unchanged.database_path(), Path::new("data/app.db"));
    }
}
