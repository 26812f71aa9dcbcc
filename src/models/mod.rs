//! Records stored by the tracker and the fixed label sets their fields draw from.

mod labels;
mod project;
mod task;
mod expense;
mod income;

pub use labels::{ExpenseCategory, PaymentMethod, ProjectStatus, TaskStatus};
pub use project::{NewProject, Project};
pub use task::{NewTask, Task, TaskFilter};
pub use expense::{Expense, ExpenseFilter, NewExpense};
pub use income::{Income, NewIncome};

use std::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::error::ValidationError;

/// Read a text column and parse it into one of the label enums
pub(crate) fn label_column<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = ValidationError>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: ValidationError| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
