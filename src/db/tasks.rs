use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, warn};

use super::{contains_ignore_case, ensure_project, Database};
use crate::error::{Error, Result};
use crate::models::{NewTask, Task, TaskFilter};
use crate::validation::validate_task;

impl Database {
    pub async fn create_task(&self, project_id: i64, task: &NewTask) -> Result<i64> {
        if let Err(e) = validate_task(task) {
            warn!(project_id, "Rejected task: {}", e);
            return Err(e.into());
        }

        let mut tx = self.get_pool().begin().await?;
        ensure_project(&mut tx, project_id).await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO tasks (project_id, title, description, status, due_date, assignee, hours_est, hours_spent)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(project_id)
        .bind(&task.title)
        .bind(task.description.as_deref())
        .bind(task.status.as_str())
        .bind(task.due_date)
        .bind(task.assignee.as_deref())
        .bind(task.hours_est)
        .bind(task.hours_spent)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Error::from_insert(e, project_id))?;

        tx.commit().await?;

        debug!(id, project_id, "created task");
        Ok(id)
    }

    /// Tasks for one project, newest first, narrowed by `filter`
    pub async fn list_tasks(&self, project_id: i64, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, project_id, title, description, status, due_date, assignee, hours_est, hours_spent \
             FROM tasks WHERE project_id = ",
        );
        query.push_bind(project_id);

        if !filter.statuses.is_empty() {
            query.push(" AND status IN (");
            let mut statuses = query.separated(", ");
            for status in &filter.statuses {
                statuses.push_bind(status.as_str());
            }
            statuses.push_unseparated(")");
        }

        if let Some(from) = filter.due_from {
            query.push(" AND due_date >= ").push_bind(from);
        }
        if let Some(to) = filter.due_to {
            query.push(" AND due_date <= ").push_bind(to);
        }

        query.push(" ORDER BY id DESC");

        let mut tasks = query
            .build_query_as::<Task>()
            .fetch_all(self.get_pool())
            .await?;

        // SQLite's lower() only folds ASCII
        if let Some(needle) = &filter.assignee {
            tasks.retain(|t| contains_ignore_case(t.assignee.as_deref(), needle));
        }

        Ok(tasks)
    }
}
