use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use job_tracker::models::{Project, Task, TaskFilter};
use job_tracker::reporting::{format_currency, Dashboard};
use job_tracker::Database;

/// Number of tasks shown under the metrics
const RECENT_TASKS: usize = 8;

// Project list on the left, selected project's metrics on the right
pub struct DashboardState {
    projects: Vec<Project>,
    list_state: ListState,
    dashboard: Option<Dashboard>,
    recent_tasks: Vec<Task>,
}

impl DashboardState {
    pub fn new(projects: Vec<Project>) -> Self {
        let mut list_state = ListState::default();
        if !projects.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            projects,
            list_state,
            dashboard: None,
            recent_tasks: Vec::new(),
        }
    }

    pub fn next(&mut self) {
        if self.projects.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.projects.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.projects.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) | None => self.projects.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.list_state.selected().and_then(|i| self.projects.get(i))
    }

    pub fn selected_project_id(&self) -> Option<i64> {
        self.selected_project().map(|p| p.id)
    }

    /// Reload metrics and recent tasks for the selected project
    pub async fn refresh(&mut self, db: &Database) -> Result<()> {
        match self.selected_project_id() {
            Some(id) => {
                self.dashboard = Some(db.project_dashboard(id).await?);
                let mut tasks = db.list_tasks(id, &TaskFilter::default()).await?;
                tasks.truncate(RECENT_TASKS);
                self.recent_tasks = tasks;
            }
            None => {
                self.dashboard = None;
                self.recent_tasks.clear();
            }
        }
        Ok(())
    }
}

pub enum DashboardAction {
    Quit,
    SelectionChanged,
}

pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, state: &mut DashboardState) {
    let size = frame.size();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)].as_ref())
        .split(rows[0]);

    let items: Vec<ListItem> = state
        .projects
        .iter()
        .map(|project| {
            ListItem::new(Spans::from(vec![
                Span::raw(format!("[{}] ", project.id)),
                Span::raw(&project.name),
                Span::styled(
                    format!(" ({})", project.status),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let projects_list = List::new(items)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(projects_list, columns[0], &mut state.list_state);

    match (state.selected_project(), &state.dashboard) {
        (Some(project), Some(dashboard)) => {
            render_metrics(frame, columns[1], project, dashboard, &state.recent_tasks)
        }
        _ => {
            let empty = Paragraph::new("No projects yet. Add one with `job-tracker project add`.")
                .block(Block::default().title("Dashboard").borders(Borders::ALL));
            frame.render_widget(empty, columns[1]);
        }
    }

    let help = Paragraph::new("<Up/Down> Select project | <Q> Quit")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, rows[1]);
}

fn render_metrics<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    project: &Project,
    dashboard: &Dashboard,
    tasks: &[Task],
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(7),
                Constraint::Length(3),
                Constraint::Min(3),
            ]
            .as_ref(),
        )
        .split(area);

    let profit_color = if dashboard.profit < 0.0 { Color::Red } else { Color::Green };
    let client = project.client_name.as_deref().unwrap_or("-");

    let cards = Paragraph::new(vec![
        Spans::from(vec![Span::raw("Client:         "), Span::raw(client)]),
        Spans::from(vec![
            Span::raw("Total Income:   "),
            Span::raw(format_currency(dashboard.income_total)),
        ]),
        Spans::from(vec![
            Span::raw("Total Expenses: "),
            Span::raw(format_currency(dashboard.expense_total)),
        ]),
        Spans::from(vec![
            Span::raw("Profit:         "),
            Span::styled(
                format_currency(dashboard.profit),
                Style::default().fg(profit_color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Spans::from(format!(
            "Hours:          {:.1} est / {:.1} spent",
            dashboard.hours_est_total, dashboard.hours_spent_total
        )),
    ])
    .block(
        Block::default()
            .title(project.name.as_str())
            .borders(Borders::ALL),
    );
    frame.render_widget(cards, chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(dashboard.progress_ratio())
        .label(format!(
            "Tasks Done: {}/{} ({:.0}%)",
            dashboard.tasks_done, dashboard.tasks_total, dashboard.percent_done
        ));
    frame.render_widget(gauge, chunks[1]);

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let assignee = task.assignee.as_deref().unwrap_or("unassigned");
            ListItem::new(Spans::from(vec![
                Span::styled(
                    format!("{:<12}", task.status.as_str()),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(&task.title),
                Span::styled(format!(" ({assignee})"), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let task_list = List::new(items).block(Block::default().title("Recent Tasks").borders(Borders::ALL));
    frame.render_widget(task_list, chunks[2]);
}

pub fn handle_input(state: &mut DashboardState) -> Result<Option<DashboardAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(DashboardAction::Quit)),
            KeyCode::Down => {
                state.next();
                return Ok(Some(DashboardAction::SelectionChanged));
            }
            KeyCode::Up => {
                state.previous();
                return Ok(Some(DashboardAction::SelectionChanged));
            }
            _ => {}
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use job_tracker::models::ProjectStatus;

    fn project(id: i64) -> Project {
        Project {
            id,
            name: format!("Project {id}"),
            client_name: None,
            address: None,
            start_date: None,
            target_date: None,
            status: ProjectStatus::Planned,
            notes: None,
        }
    }

    #[test]
    fn selection_wraps_in_both_directions() {
        let mut state = DashboardState::new(vec![project(3), project(2), project(1)]);
        assert_eq!(state.selected_project_id(), Some(3));

        state.previous();
        assert_eq!(state.selected_project_id(), Some(1));
        state.next();
        assert_eq!(state.selected_project_id(), Some(3));
        state.next();
        assert_eq!(state.selected_project_id(), Some(2));
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut state = DashboardState::new(Vec::new());
        state.next();
        state.previous();
        assert_eq!(state.selected_project_id(), None);
    }
}
