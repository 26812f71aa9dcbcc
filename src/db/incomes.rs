use tracing::{debug, warn};

use super::{ensure_project, Database};
use crate::error::{Error, Result};
use crate::models::{Income, NewIncome};
use crate::validation::validate_income;

impl Database {
    pub async fn create_income(&self, project_id: i64, income: &NewIncome) -> Result<i64> {
        if let Err(e) = validate_income(income) {
            warn!(project_id, "Rejected income: {}", e);
            return Err(e.into());
        }

        let mut tx = self.get_pool().begin().await?;
        ensure_project(&mut tx, project_id).await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO incomes (project_id, source, description, amount, date, payment_method)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(project_id)
        .bind(income.source.as_deref())
        .bind(income.description.as_deref())
        .bind(income.amount)
        .bind(income.date)
        .bind(income.payment_method.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Error::from_insert(e, project_id))?;

        tx.commit().await?;

        debug!(id, project_id, amount = income.amount, "created income");
        Ok(id)
    }

    /// Incomes for one project, latest date first (ties broken by newest id)
    pub async fn list_incomes(&self, project_id: i64) -> Result<Vec<Income>> {
        let incomes = sqlx::query_as::<_, Income>(
            r#"
            SELECT id, project_id, source, description, amount, date, payment_method
            FROM incomes
            WHERE project_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(incomes)
    }
}
