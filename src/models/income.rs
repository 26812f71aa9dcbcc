use chrono::NaiveDate;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::{label_column, PaymentMethod};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Income {
    pub id: i64,
    pub project_id: i64,
    pub source: Option<String>,
    pub description: Option<String>,
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Default)]
pub struct NewIncome {
    pub source: Option<String>,
    pub description: Option<String>,
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
}

impl NewIncome {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl<'r> FromRow<'r, SqliteRow> for Income {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            source: row.try_get("source")?,
            description: row.try_get("description")?,
            amount: row.try_get("amount")?,
            date: row.try_get("date")?,
            payment_method: label_column(row, "payment_method")?,
        })
    }
}
