use tracing::{debug, warn};

use super::Database;
use crate::error::{Error, Result};
use crate::models::{ExpenseFilter, NewProject, Project, TaskFilter};
use crate::reporting::{compute_dashboard, Dashboard};
use crate::validation::validate_project;

const PROJECT_COLUMNS: &str =
    "id, name, client_name, address, start_date, target_date, status, notes";

impl Database {
    pub async fn create_project(&self, project: &NewProject) -> Result<i64> {
        if let Err(e) = validate_project(project) {
            warn!("Rejected project: {}", e);
            return Err(e.into());
        }

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO projects (name, client_name, address, start_date, target_date, status, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&project.name)
        .bind(project.client_name.as_deref())
        .bind(project.address.as_deref())
        .bind(project.start_date)
        .bind(project.target_date)
        .bind(project.status.as_str())
        .bind(project.notes.as_deref())
        .fetch_one(self.get_pool())
        .await?;

        debug!(id, name = %project.name, "created project");
        Ok(id)
    }

    /// All projects, newest first
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id DESC"
        ))
        .fetch_all(self.get_pool())
        .await?;

        Ok(projects)
    }

    pub async fn get_project(&self, id: i64) -> Result<Project> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?
        .ok_or(Error::NotFound { entity: "Project", id })
    }

    /// Delete a project; its tasks, expenses and incomes go with it.
    ///
    /// Returns `false` when no project had that id.
    pub async fn delete_project(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!(id, deleted, "delete project");
        Ok(deleted)
    }

    pub async fn count_projects(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(self.get_pool())
            .await?;
        Ok(count)
    }

    /// Dashboard metrics computed from the project's current records
    pub async fn project_dashboard(&self, project_id: i64) -> Result<Dashboard> {
        self.get_project(project_id).await?;

        let tasks = self.list_tasks(project_id, &TaskFilter::default()).await?;
        let expenses = self
            .list_expenses(project_id, &ExpenseFilter::default())
            .await?;
        let incomes = self.list_incomes(project_id).await?;

        Ok(compute_dashboard(&tasks, &expenses, &incomes))
    }
}
