use chrono::NaiveDate;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::{label_column, TaskStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub assignee: Option<String>,
    pub hours_est: f64,
    pub hours_spent: f64,
}

#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub assignee: Option<String>,
    pub hours_est: f64,
    pub hours_spent: f64,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_hours(mut self, hours_est: f64, hours_spent: f64) -> Self {
        self.hours_est = hours_est;
        self.hours_spent = hours_spent;
        self
    }
}

/// Optional restrictions on a task listing.
///
/// An empty `statuses` list places no restriction on status. `assignee`
/// matches as a case-insensitive substring; tasks without an assignee are
/// treated as having an empty one.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub statuses: Vec<TaskStatus>,
    pub assignee: Option<String>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
}

impl TaskFilter {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            statuses: vec![status],
            ..Self::default()
        }
    }

    pub fn assignee(needle: impl Into<String>) -> Self {
        Self {
            assignee: Some(needle.into()),
            ..Self::default()
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Task {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            status: label_column(row, "status")?,
            due_date: row.try_get("due_date")?,
            assignee: row.try_get("assignee")?,
            hours_est: row.try_get("hours_est")?,
            hours_spent: row.try_get("hours_spent")?,
        })
    }
}
