use chrono::NaiveDate;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::{label_column, ProjectStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub notes: Option<String>,
}

/// Fields supplied when creating a project
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub notes: Option<String>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_client(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }
}

impl<'r> FromRow<'r, SqliteRow> for Project {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            client_name: row.try_get("client_name")?,
            address: row.try_get("address")?,
            start_date: row.try_get("start_date")?,
            target_date: row.try_get("target_date")?,
            status: label_column(row, "status")?,
            notes: row.try_get("notes")?,
        })
    }
}
