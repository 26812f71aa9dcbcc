use chrono::NaiveDate;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::{label_column, ExpenseCategory, PaymentMethod};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    pub id: i64,
    pub project_id: i64,
    pub category: ExpenseCategory,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub receipt_filename: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewExpense {
    pub category: ExpenseCategory,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub receipt_filename: Option<String>,
}

impl NewExpense {
    pub fn new(category: ExpenseCategory, amount: f64) -> Self {
        Self {
            category,
            amount,
            ..Self::default()
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }
}

/// Optional restrictions on an expense listing; the default lists everything
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub categories: Vec<ExpenseCategory>,
    pub vendor: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl<'r> FromRow<'r, SqliteRow> for Expense {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            category: label_column(row, "category")?,
            vendor: row.try_get("vendor")?,
            description: row.try_get("description")?,
            amount: row.try_get("amount")?,
            date: row.try_get("date")?,
            payment_method: label_column(row, "payment_method")?,
            receipt_filename: row.try_get("receipt_filename")?,
        })
    }
}
