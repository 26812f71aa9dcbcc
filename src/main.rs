mod cli;
mod ui;

use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use job_tracker::config::{self, Config};
use job_tracker::{db, Database};

use crate::cli::{Cli, Command};
use crate::ui::dashboard::{handle_input, render_dashboard, DashboardAction, DashboardState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Load configuration
    let config = config::init()?.with_database_path(args.db.clone());
    init_tracing(&config);

    // Connect and bring the schema up to date before any command runs
    let db = db::init(&config).await?;
    info!("Database ready at {:?}", config.database_path());

    let result = match args.command {
        Some(Command::Init) => {
            println!("Database initialized at {}", config.database_path().display());
            Ok(())
        }
        Some(Command::Project(cmd)) => cli::run_project(&db, cmd).await,
        Some(Command::Task(cmd)) => cli::run_task(&db, cmd).await,
        Some(Command::Expense(cmd)) => cli::run_expense(&db, &config, cmd).await,
        Some(Command::Income(cmd)) => cli::run_income(&db, cmd).await,
        Some(Command::Dashboard { project }) => cli::run_dashboard(&db, project).await,
        Some(Command::Export { kind, project, out }) => {
            cli::run_export(&db, kind, project, out).await
        }
        Some(Command::Tui) | None => run_tui(&db).await,
    };

    db.close().await;
    result
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_tui(db: &Database) -> Result<()> {
    let projects = db.list_projects().await?;
    let mut state = DashboardState::new(projects);
    state.refresh(db).await?;

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut state, db).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut DashboardState,
    db: &Database,
) -> Result<()> {
    loop {
        terminal.draw(|f| render_dashboard(f, state))?;

        match handle_input(state)? {
            Some(DashboardAction::Quit) => break,
            Some(DashboardAction::SelectionChanged) => state.refresh(db).await?,
            None => {}
        }
    }

    Ok(())
}
