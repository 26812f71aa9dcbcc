use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};

use job_tracker::config::Config;
use job_tracker::export;
use job_tracker::models::{
    ExpenseCategory, ExpenseFilter, NewExpense, NewIncome, NewProject, NewTask, PaymentMethod,
    ProjectStatus, TaskFilter, TaskStatus,
};
use job_tracker::receipts::ReceiptStore;
use job_tracker::reporting::format_currency;
use job_tracker::Database;

#[derive(Debug, Parser)]
#[command(name = "job-tracker", version, about = "Track remodeling projects, tasks, expenses and income")]
pub struct Cli {
    /// SQLite database file (overrides TRACKER_DATABASE_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the database and apply the schema
    Init,
    #[command(subcommand)]
    Project(ProjectCommand),
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Expense(ExpenseCommand),
    #[command(subcommand)]
    Income(IncomeCommand),
    /// Show income, expenses, profit and task progress for a project
    Dashboard { project: i64 },
    /// Write a project's records as CSV
    Export {
        kind: ExportKind,
        project: i64,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Browse project dashboards interactively (default)
    Tui,
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Defaults to today
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Defaults to today
        #[arg(long)]
        target: Option<NaiveDate>,
        #[arg(long, default_value_t = ProjectStatus::Planned)]
        status: ProjectStatus,
        #[arg(long)]
        notes: Option<String>,
    },
    List,
    Show { id: i64 },
    /// Delete a project together with its tasks, expenses and income
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    Add {
        project: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = TaskStatus::ToDo)]
        status: TaskStatus,
        /// Defaults to today
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        hours_est: f64,
        #[arg(long, default_value_t = 0.0)]
        hours_spent: f64,
    },
    List {
        project: i64,
        /// Repeat to allow several statuses
        #[arg(long)]
        status: Vec<TaskStatus>,
        /// Case-insensitive substring of the assignee
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        due_from: Option<NaiveDate>,
        #[arg(long)]
        due_to: Option<NaiveDate>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ExpenseCommand {
    Add {
        project: i64,
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value_t = ExpenseCategory::Other)]
        category: ExpenseCategory,
        #[arg(long)]
        vendor: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Expenses usually go on the business card, so the prompt default
        /// differs from `NewExpense::default()` (Other)
        #[arg(long, default_value_t = PaymentMethod::BusinessCard)]
        payment: PaymentMethod,
        /// File to copy into the receipts directory
        #[arg(long)]
        receipt: Option<PathBuf>,
    },
    List {
        project: i64,
        #[arg(long)]
        category: Vec<ExpenseCategory>,
        /// Case-insensitive substring of the vendor
        #[arg(long)]
        vendor: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[derive(Debug, Subcommand)]
pub enum IncomeCommand {
    Add {
        project: i64,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value_t = PaymentMethod::Other)]
        payment: PaymentMethod,
    },
    List { project: i64 },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportKind {
    Tasks,
    Expenses,
    Incomes,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn run_project(db: &Database, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::Add {
            name,
            client,
            address,
            start,
            target,
            status,
            notes,
        } => {
            let project = NewProject {
                name,
                client_name: client,
                address,
                start_date: Some(start.unwrap_or_else(today)),
                target_date: Some(target.unwrap_or_else(today)),
                status,
                notes,
            };
            let id = db.create_project(&project).await?;
            println!("Project added (id {id}).");
        }
        ProjectCommand::List => {
            let projects = db.list_projects().await?;
            if projects.is_empty() {
                println!("No projects yet.");
            }
            for p in projects {
                println!(
                    "{:>4}  {:<32} {:<12} {:<20} {}",
                    p.id,
                    p.name,
                    p.status,
                    p.client_name.unwrap_or_default(),
                    date_or_dash(p.target_date),
                );
            }
        }
        ProjectCommand::Show { id } => {
            let p = db.get_project(id).await?;
            println!("[{}] {}", p.id, p.name);
            println!("  Client:  {}", p.client_name.as_deref().unwrap_or("-"));
            println!("  Address: {}", p.address.as_deref().unwrap_or("-"));
            println!("  Dates:   {} to {}", date_or_dash(p.start_date), date_or_dash(p.target_date));
            println!("  Status:  {}", p.status);
            if let Some(notes) = p.notes.filter(|n| !n.is_empty()) {
                println!("  Notes:   {notes}");
            }
        }
        ProjectCommand::Delete { id } => {
            if db.delete_project(id).await? {
                println!("Project {id} deleted.");
            } else {
                println!("No project with id {id}.");
            }
        }
    }
    Ok(())
}

pub async fn run_task(db: &Database, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::Add {
            project,
            title,
            description,
            status,
            due,
            assignee,
            hours_est,
            hours_spent,
        } => {
            let task = NewTask {
                title,
                description,
                status,
                due_date: Some(due.unwrap_or_else(today)),
                assignee,
                hours_est,
                hours_spent,
            };
            let id = db.create_task(project, &task).await?;
            println!("Task added (id {id}).");
        }
        TaskCommand::List {
            project,
            status,
            assignee,
            due_from,
            due_to,
        } => {
            let filter = TaskFilter {
                statuses: status,
                assignee,
                due_from,
                due_to,
            };
            for t in db.list_tasks(project, &filter).await? {
                println!(
                    "{:>4}  {:<12} {:<32} {:<10} {:<14} {:>5.1}/{:<5.1}",
                    t.id,
                    t.status,
                    t.title,
                    date_or_dash(t.due_date),
                    t.assignee.unwrap_or_default(),
                    t.hours_spent,
                    t.hours_est,
                );
            }
        }
    }
    Ok(())
}

pub async fn run_expense(db: &Database, config: &Config, command: ExpenseCommand) -> Result<()> {
    match command {
        ExpenseCommand::Add {
            project,
            amount,
            category,
            vendor,
            description,
            date,
            payment,
            receipt,
        } => {
            let mut expense = NewExpense {
                category,
                vendor,
                description,
                amount,
                date: Some(date.unwrap_or_else(today)),
                payment_method: payment,
                receipt_filename: None,
            };
            // Copy the receipt only for valid input against an existing project
            job_tracker::validation::validate_expense(&expense)?;
            db.get_project(project).await?;
            if let Some(path) = receipt {
                let store = ReceiptStore::new(config.upload_dir());
                expense.receipt_filename = Some(store.store(&path)?);
            }
            let id = db.create_expense(project, &expense).await?;
            println!("Expense added (id {id}).");
        }
        ExpenseCommand::List {
            project,
            category,
            vendor,
            from,
            to,
        } => {
            let filter = ExpenseFilter {
                categories: category,
                vendor,
                date_from: from,
                date_to: to,
            };
            for e in db.list_expenses(project, &filter).await? {
                println!(
                    "{:>4}  {:<10} {:<14} {:<20} {:>12}  {}",
                    e.id,
                    date_or_dash(e.date),
                    e.category,
                    e.vendor.unwrap_or_default(),
                    format_currency(e.amount),
                    e.description.unwrap_or_default(),
                );
            }
        }
    }
    Ok(())
}

pub async fn run_income(db: &Database, command: IncomeCommand) -> Result<()> {
    match command {
        IncomeCommand::Add {
            project,
            amount,
            source,
            description,
            date,
            payment,
        } => {
            let income = NewIncome {
                source,
                description,
                amount,
                date: Some(date.unwrap_or_else(today)),
                payment_method: payment,
            };
            let id = db.create_income(project, &income).await?;
            println!("Income added (id {id}).");
        }
        IncomeCommand::List { project } => {
            for i in db.list_incomes(project).await? {
                println!(
                    "{:>4}  {:<10} {:<24} {:>12}  {}",
                    i.id,
                    date_or_dash(i.date),
                    i.source.unwrap_or_default(),
                    format_currency(i.amount),
                    i.description.unwrap_or_default(),
                );
            }
        }
    }
    Ok(())
}

pub async fn run_dashboard(db: &Database, project_id: i64) -> Result<()> {
    let project = db.get_project(project_id).await?;
    let d = db.project_dashboard(project_id).await?;

    println!("{}", project.name);
    println!("  Total Income:   {}", format_currency(d.income_total));
    println!("  Total Expenses: {}", format_currency(d.expense_total));
    println!("  Profit:         {}", format_currency(d.profit));
    println!("  Hours:          {:.1} est / {:.1} spent", d.hours_est_total, d.hours_spent_total);
    println!("  {}", progress_bar(d.progress_ratio(), 30));
    println!(
        "  Tasks Done: {}/{} ({:.0}%)",
        d.tasks_done, d.tasks_total, d.percent_done
    );
    Ok(())
}

pub async fn run_export(
    db: &Database,
    kind: ExportKind,
    project_id: i64,
    out: Option<PathBuf>,
) -> Result<()> {
    db.get_project(project_id).await?;

    let writer: Box<dyn io::Write> = match &out {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };

    match kind {
        ExportKind::Tasks => {
            let tasks = db.list_tasks(project_id, &TaskFilter::default()).await?;
            export::write_tasks(writer, &tasks)?;
        }
        ExportKind::Expenses => {
            let expenses = db.list_expenses(project_id, &ExpenseFilter::default()).await?;
            export::write_expenses(writer, &expenses)?;
        }
        ExportKind::Incomes => {
            let incomes = db.list_incomes(project_id).await?;
            export::write_incomes(writer, &incomes)?;
        }
    }

    if let Some(path) = out {
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}

fn date_or_dash(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 4), "[----]");
        assert_eq!(progress_bar(0.75, 4), "[###-]");
        assert_eq!(progress_bar(1.0, 4), "[####]");
    }

    #[test]
    fn parses_filters_and_labels() {
        let cli = Cli::try_parse_from([
            "job-tracker",
            "--db",
            "/tmp/jobs.db",
            "task",
            "list",
            "3",
            "--status",
            "Done",
            "--status",
            "in progress",
            "--assignee",
            "tyler",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("/tmp/jobs.db")));
        match cli.command {
            Some(Command::Task(TaskCommand::List { project, status, assignee, .. })) => {
                assert_eq!(project, 3);
                assert_eq!(status, vec![TaskStatus::Done, TaskStatus::InProgress]);
                assert_eq!(assignee.as_deref(), Some("tyler"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_category() {
        let result = Cli::try_parse_from([
            "job-tracker", "expense", "add", "1", "--amount", "10", "--category", "Snacks",
        ]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn receipt_is_not_copied_for_unknown_project() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::connect(&dir.path().join("app.db")).await.unwrap();
        db.migrate().await.unwrap();

        let source = dir.path().join("lumber.jpg");
        std::fs::write(&source, b"jpeg bytes").unwrap();
        let config = Config {
            upload_dir: dir.path().join("uploads"),
            ..Config::default()
        };

        let command = ExpenseCommand::Add {
            project: 404,
            amount: 25.0,
            category: ExpenseCategory::Materials,
            vendor: None,
            description: None,
            date: None,
            payment: PaymentMethod::BusinessCard,
            receipt: Some(source),
        };

        let err = run_expense(&db, &config, command).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<job_tracker::Error>(),
            Some(job_tracker::Error::NotFound { entity: "Project", id: 404 })
        ));
        assert!(!config.upload_dir().exists());
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["job-tracker"]).unwrap();
        assert!(cli.command.is_none());
    }
}
