//! CSV export of project listings.
//!
//! Each writer emits a header row named after the record's fields followed
//! by one row per record, in the order given.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::models::{Expense, Income, Task};

const TASK_FIELDS: &[&str] = &[
    "id", "project_id", "title", "description", "status", "due_date", "assignee", "hours_est",
    "hours_spent",
];

const EXPENSE_FIELDS: &[&str] = &[
    "id", "project_id", "category", "vendor", "description", "amount", "date", "payment_method",
    "receipt_filename",
];

const INCOME_FIELDS: &[&str] = &[
    "id", "project_id", "source", "description", "amount", "date", "payment_method",
];

pub fn write_tasks<W: Write>(out: W, tasks: &[Task]) -> Result<()> {
    write_records(out, TASK_FIELDS, tasks)
}

pub fn write_expenses<W: Write>(out: W, expenses: &[Expense]) -> Result<()> {
    write_records(out, EXPENSE_FIELDS, expenses)
}

pub fn write_incomes<W: Write>(out: W, incomes: &[Income]) -> Result<()> {
    write_records(out, INCOME_FIELDS, incomes)
}

/// The header is written up front so an empty listing still yields one line
fn write_records<W: Write, T: Serialize>(out: W, header: &[&str], records: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(header)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::{ExpenseCategory, PaymentMethod, TaskStatus};

    #[test]
    fn expenses_export_with_header_and_labels() {
        let expenses = vec![Expense {
            id: 7,
            project_id: 2,
            category: ExpenseCategory::Materials,
            vendor: Some("Home Depot".to_string()),
            description: Some("Thinset mortar, 5 bags".to_string()),
            amount: 87.45,
            date: NaiveDate::from_ymd_opt(2024, 8, 3),
            payment_method: PaymentMethod::BusinessCard,
            receipt_filename: None,
        }];

        let mut buf = Vec::new();
        write_expenses(&mut buf, &expenses).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "id,project_id,category,vendor,description,amount,date,payment_method,receipt_filename\n\
             7,2,Materials,Home Depot,\"Thinset mortar, 5 bags\",87.45,2024-08-03,Business Card,\n"
        );
    }

    #[test]
    fn tasks_export_uses_status_labels() {
        let tasks = vec![Task {
            id: 1,
            project_id: 2,
            title: "Demo cabinets".to_string(),
            description: None,
            status: TaskStatus::ToDo,
            due_date: None,
            assignee: Some("Tyler".to_string()),
            hours_est: 6.0,
            hours_spent: 0.5,
        }];

        let mut buf = Vec::new();
        write_tasks(&mut buf, &tasks).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("id,project_id,title,description,status,due_date,assignee,hours_est,hours_spent")
        );
        assert_eq!(lines.next(), Some("1,2,Demo cabinets,,To Do,,Tyler,6.0,0.5"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_listing_writes_only_the_header() {
        let mut buf = Vec::new();
        write_incomes(&mut buf, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "id,project_id,source,description,amount,date,payment_method\n"
        );

        let mut buf = Vec::new();
        write_expenses(&mut buf, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "id,project_id,category,vendor,description,amount,date,payment_method,receipt_filename\n"
        );
    }

    #[test]
    fn header_matches_serialized_income_fields() {
        let incomes = vec![Income {
            id: 3,
            project_id: 2,
            source: Some("Deposit".to_string()),
            description: None,
            amount: 2000.0,
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
            payment_method: PaymentMethod::Check,
        }];

        let mut buf = Vec::new();
        write_incomes(&mut buf, &incomes).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "id,project_id,source,description,amount,date,payment_method\n\
             3,2,Deposit,,2000.0,2024-06-01,Check\n"
        );
    }
}
