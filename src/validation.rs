//! Input checks run before anything reaches storage.
//!
//! These functions only look at the values they are given, so callers can
//! validate a form without a database handle.

use crate::error::ValidationError;
use crate::models::{NewExpense, NewIncome, NewProject, NewTask};

pub fn validate_project(project: &NewProject) -> Result<(), ValidationError> {
    require_text("name", &project.name)
}

pub fn validate_task(task: &NewTask) -> Result<(), ValidationError> {
    require_text("title", &task.title)?;
    require_non_negative("hours_est", task.hours_est)?;
    require_non_negative("hours_spent", task.hours_spent)
}

pub fn validate_expense(expense: &NewExpense) -> Result<(), ValidationError> {
    require_non_negative("amount", expense.amount)
}

pub fn validate_income(income: &NewIncome) -> Result<(), ValidationError> {
    require_non_negative("amount", income.amount)
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;

    #[test]
    fn project_name_must_have_content() {
        assert!(validate_project(&NewProject::new("Kitchen remodel - Smith")).is_ok());
        assert_eq!(
            validate_project(&NewProject::new("   ")),
            Err(ValidationError::Required { field: "name" })
        );
        assert!(validate_project(&NewProject::default()).is_err());
    }

    #[test]
    fn task_needs_title_and_non_negative_hours() {
        assert!(validate_task(&NewTask::new("Demo cabinets").with_hours(4.0, 0.0)).is_ok());
        assert_eq!(
            validate_task(&NewTask::new("")),
            Err(ValidationError::Required { field: "title" })
        );
        assert_eq!(
            validate_task(&NewTask::new("Tile").with_hours(-1.0, 0.0)),
            Err(ValidationError::Negative { field: "hours_est", value: -1.0 })
        );
        assert_eq!(
            validate_task(&NewTask::new("Tile").with_hours(1.0, -0.5)),
            Err(ValidationError::Negative { field: "hours_spent", value: -0.5 })
        );
    }

    #[test]
    fn amounts_must_be_finite_and_non_negative() {
        assert!(validate_expense(&NewExpense::new(ExpenseCategory::Materials, 0.0)).is_ok());
        assert!(validate_income(&NewIncome::new(1500.0)).is_ok());

        assert_eq!(
            validate_expense(&NewExpense::new(ExpenseCategory::Fuel, -0.01)),
            Err(ValidationError::Negative { field: "amount", value: -0.01 })
        );
        assert_eq!(
            validate_income(&NewIncome::new(f64::NAN)),
            Err(ValidationError::NotFinite { field: "amount" })
        );
        assert!(validate_income(&NewIncome::new(f64::INFINITY)).is_err());
    }
}
