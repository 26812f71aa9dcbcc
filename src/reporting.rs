//! Per-project dashboard metrics.

use serde::Serialize;

use crate::models::{Expense, Income, Task, TaskStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub income_total: f64,
    pub expense_total: f64,
    /// Income minus expenses; negative when the job is losing money
    pub profit: f64,
    pub tasks_done: usize,
    pub tasks_total: usize,
    /// Share of tasks marked Done, 0..=100 for well-formed data. Not clamped.
    pub percent_done: f64,
    pub hours_est_total: f64,
    pub hours_spent_total: f64,
}

impl Dashboard {
    /// Completion as a fraction clamped to `[0, 1]`, for progress gauges only
    pub fn progress_ratio(&self) -> f64 {
        let ratio = self.percent_done / 100.0;
        if ratio.is_nan() {
            return 0.0;
        }
        ratio.clamp(0.0, 1.0)
    }
}

pub fn compute_dashboard(tasks: &[Task], expenses: &[Expense], incomes: &[Income]) -> Dashboard {
    let income_total = round_cents(total(incomes.iter().map(|i| i.amount)));
    let expense_total = round_cents(total(expenses.iter().map(|e| e.amount)));

    let tasks_total = tasks.len();
    let tasks_done = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Done)
        .count();
    let percent_done = if tasks_total > 0 {
        tasks_done as f64 / tasks_total as f64 * 100.0
    } else {
        0.0
    };

    Dashboard {
        income_total,
        expense_total,
        profit: round_cents(income_total - expense_total),
        tasks_done,
        tasks_total,
        percent_done,
        hours_est_total: total(tasks.iter().map(|t| t.hours_est)),
        hours_spent_total: total(tasks.iter().map(|t| t.hours_spent)),
    }
}

/// Sum starting from positive zero; `Iterator::sum` over no floats yields `-0.0`
fn total(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, v| acc + v)
}

/// Round to two decimal places
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render an amount as `$1,234.56`, with a leading minus for losses
pub fn format_currency(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();

    let digits = (cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseCategory, PaymentMethod};

    fn task(id: i64, status: TaskStatus) -> Task {
        Task {
            id,
            project_id: 1,
            title: format!("Task {id}"),
            description: None,
            status,
            due_date: None,
            assignee: None,
            hours_est: 2.0,
            hours_spent: 1.5,
        }
    }

    fn expense(amount: f64) -> Expense {
        Expense {
            id: 1,
            project_id: 1,
            category: ExpenseCategory::Materials,
            vendor: Some("Home Depot".to_string()),
            description: None,
            amount,
            date: None,
            payment_method: PaymentMethod::BusinessCard,
            receipt_filename: None,
        }
    }

    fn income(amount: f64) -> Income {
        Income {
            id: 1,
            project_id: 1,
            source: Some("Invoice #123".to_string()),
            description: None,
            amount,
            date: None,
            payment_method: PaymentMethod::Other,
        }
    }

    #[test]
    fn empty_inputs_give_all_zero_metrics() {
        let dashboard = compute_dashboard(&[], &[], &[]);
        assert_eq!(dashboard, Dashboard::default());
        assert_eq!(dashboard.percent_done, 0.0);
        assert_eq!(dashboard.progress_ratio(), 0.0);
    }

    #[test]
    fn empty_totals_are_positive_zero() {
        let dashboard = compute_dashboard(&[], &[], &[]);
        assert!(dashboard.income_total.is_sign_positive());
        assert!(dashboard.expense_total.is_sign_positive());
        assert!(dashboard.profit.is_sign_positive());
        assert_eq!(
            format!("{:.1} est / {:.1} spent", dashboard.hours_est_total, dashboard.hours_spent_total),
            "0.0 est / 0.0 spent"
        );
    }

    #[test]
    fn profit_is_income_minus_expenses() {
        let incomes = [income(600.0), income(400.0)];
        let expenses = [expense(150.25), expense(249.75)];

        let dashboard = compute_dashboard(&[], &expenses, &incomes);
        assert_eq!(dashboard.income_total, 1000.0);
        assert_eq!(dashboard.expense_total, 400.0);
        assert_eq!(dashboard.profit, 600.0);
    }

    #[test]
    fn profit_can_go_negative() {
        let dashboard = compute_dashboard(&[], &[expense(250.0)], &[income(100.0)]);
        assert_eq!(dashboard.profit, -150.0);
    }

    #[test]
    fn totals_are_rounded_to_cents() {
        let dashboard = compute_dashboard(&[], &[expense(0.1), expense(0.2)], &[]);
        assert_eq!(dashboard.expense_total, 0.3);
        assert_eq!(dashboard.profit, -0.3);
    }

    #[test]
    fn percent_done_counts_done_tasks() {
        let tasks = [
            task(1, TaskStatus::Done),
            task(2, TaskStatus::Done),
            task(3, TaskStatus::InProgress),
            task(4, TaskStatus::Done),
        ];

        let dashboard = compute_dashboard(&tasks, &[], &[]);
        assert_eq!(dashboard.tasks_done, 3);
        assert_eq!(dashboard.tasks_total, 4);
        assert_eq!(dashboard.percent_done, 75.0);
        assert_eq!(dashboard.progress_ratio(), 0.75);
        assert_eq!(dashboard.hours_est_total, 8.0);
        assert_eq!(dashboard.hours_spent_total, 6.0);
    }

    #[test]
    fn progress_ratio_is_clamped_but_percent_is_not() {
        let dashboard = Dashboard {
            percent_done: 130.0,
            ..Dashboard::default()
        };
        assert_eq!(dashboard.percent_done, 130.0);
        assert_eq!(dashboard.progress_ratio(), 1.0);

        let negative = Dashboard {
            percent_done: -5.0,
            ..Dashboard::default()
        };
        assert_eq!(negative.progress_ratio(), 0.0);
    }

    #[test]
    fn formats_currency_with_grouping() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(5.5), "$5.50");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-150.0), "-$150.00");
    }
}
