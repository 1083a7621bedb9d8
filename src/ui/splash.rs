//! Startup checklist
//!
//! Shown while the configuration is read and the first tables are fetched.
//! Each step is listed with its state so a slow or failing catalog API is
//! visible before the main screen opens.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// One step of the startup sequence, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStep {
    Config,
    Client,
    Categories,
    Products,
    Colors,
}

impl StartupStep {
    pub const ALL: [StartupStep; 5] = [
        StartupStep::Config,
        StartupStep::Client,
        StartupStep::Categories,
        StartupStep::Products,
        StartupStep::Colors,
    ];

    fn label(self) -> &'static str {
        match self {
            StartupStep::Config => "Read configuration",
            StartupStep::Client => "Prepare API client",
            StartupStep::Categories => "Fetch categories",
            StartupStep::Products => "Fetch products",
            StartupStep::Colors => "Fetch colors",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepState {
    Waiting,
    Running,
    Done,
    /// Finished with an error; startup continues and the main screen shows it
    Failed(String),
    Skipped,
}

impl StepState {
    fn mark(&self) -> Span<'static> {
        match self {
            StepState::Waiting => Span::styled("[ ]", Style::default().fg(Color::DarkGray)),
            StepState::Running => Span::styled("[~]", Style::default().fg(Color::Yellow)),
            StepState::Done => Span::styled("[x]", Style::default().fg(Color::Green)),
            StepState::Failed(_) => Span::styled("[!]", Style::default().fg(Color::Red)),
            StepState::Skipped => Span::styled("[-]", Style::default().fg(Color::DarkGray)),
        }
    }
}

/// Startup progress for the splash screen
pub struct SplashState {
    api_url: Option<String>,
    steps: [StepState; 5],
}

impl SplashState {
    pub fn new() -> Self {
        Self {
            api_url: None,
            steps: std::array::from_fn(|_| StepState::Waiting),
        }
    }

    pub fn set_api_url(&mut self, url: &str) {
        self.api_url = Some(url.to_string());
    }

    pub fn start(&mut self, step: StartupStep) {
        self.steps[step.index()] = StepState::Running;
    }

    pub fn finish<E: std::fmt::Display>(&mut self, step: StartupStep, outcome: Result<(), &E>) {
        self.steps[step.index()] = match outcome {
            Ok(()) => StepState::Done,
            Err(e) => StepState::Failed(e.to_string()),
        };
    }

    pub fn skip(&mut self, step: StartupStep) {
        self.steps[step.index()] = StepState::Skipped;
    }

    pub fn state(&self, step: StartupStep) -> &StepState {
        &self.steps[step.index()]
    }

    /// Steps no longer waiting or running
    fn settled(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| !matches!(s, StepState::Waiting | StepState::Running))
            .count()
    }
}

impl Default for SplashState {
    fn default() -> Self {
        Self::new()
    }
}

fn centered(area: Rect, height: u16) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(rows[1])[1]
}

pub fn render(f: &mut Frame, state: &SplashState) {
    // title, url, blank, five steps, blank, footer, borders
    let area = centered(f.area(), 12);

    let title = format!(
        " tcat {}/{} ",
        state.settled(),
        StartupStep::ALL.len()
    );
    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let mut lines = vec![
        Line::from(Span::styled(
            "Terminal console for the product catalog",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            state
                .api_url
                .as_deref()
                .map(|url| format!("API: {}", url))
                .unwrap_or_default(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    for step in StartupStep::ALL {
        let st = state.state(step);
        let mut spans = vec![st.mark(), Span::raw(" "), Span::raw(step.label())];
        match st {
            StepState::Failed(reason) => spans.push(Span::styled(
                format!("  {}", reason),
                Style::default().fg(Color::Red),
            )),
            StepState::Skipped => spans.push(Span::styled(
                "  (loaded when opened)",
                Style::default().fg(Color::DarkGray),
            )),
            _ => {},
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Ctrl+C to abort",
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}
