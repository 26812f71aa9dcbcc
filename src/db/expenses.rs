use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, warn};

use super::{contains_ignore_case, ensure_project, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseFilter, NewExpense};
use crate::validation::validate_expense;

impl Database {
    pub async fn create_expense(&self, project_id: i64, expense: &NewExpense) -> Result<i64> {
        if let Err(e) = validate_expense(expense) {
            warn!(project_id, "Rejected expense: {}", e);
            return Err(e.into());
        }

        let mut tx = self.get_pool().begin().await?;
        ensure_project(&mut tx, project_id).await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO expenses (project_id, category, vendor, description, amount, date, payment_method, receipt_filename)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(project_id)
        .bind(expense.category.as_str())
        .bind(expense.vendor.as_deref())
        .bind(expense.description.as_deref())
        .bind(expense.amount)
        .bind(expense.date)
        .bind(expense.payment_method.as_str())
        .bind(expense.receipt_filename.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Error::from_insert(e, project_id))?;

        tx.commit().await?;

        debug!(id, project_id, amount = expense.amount, "created expense");
        Ok(id)
    }

    /// Expenses for one project, latest date first (ties broken by newest id)
    pub async fn list_expenses(
        &self,
        project_id: i64,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, project_id, category, vendor, description, amount, date, payment_method, receipt_filename \
             FROM expenses WHERE project_id = ",
        );
        query.push_bind(project_id);

        if !filter.categories.is_empty() {
            query.push(" AND category IN (");
            let mut categories = query.separated(", ");
            for category in &filter.categories {
                categories.push_bind(category.as_str());
            }
            categories.push_unseparated(")");
        }

        if let Some(from) = filter.date_from {
            query.push(" AND date >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            query.push(" AND date <= ").push_bind(to);
        }

        query.push(" ORDER BY date DESC, id DESC");

        let mut expenses = query
            .build_query_as::<Expense>()
            .fetch_all(self.get_pool())
            .await?;

        if let Some(needle) = &filter.vendor {
            expenses.retain(|e| contains_ignore_case(e.vendor.as_deref(), needle));
        }

        Ok(expenses)
    }
}
