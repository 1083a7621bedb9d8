//! Header Component
//!
//! Displays the API endpoint, current table and available actions.

use crate::app::App;
use crate::VERSION;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" tcat v{} ", VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    // Row 1: API endpoint
    let endpoint = Line::from(vec![
        Span::styled(" API: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.client.base_url(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(endpoint), rows[0]);

    // Row 2: Current table and count
    let table = app.table();
    let mut resource_spans = vec![
        Span::styled(" Resource: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            table.kind().plural(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Count: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            table.filtered_len().to_string(),
            Style::default().fg(Color::White),
        ),
    ];
    if table.total_len() != table.filtered_len() {
        resource_spans.push(Span::styled(
            format!(" (filtered from {})", table.total_len()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if !table.server_filter().is_empty() {
        resource_spans.push(Span::styled(
            format!("  [{}]", table.server_filter()),
            Style::default().fg(Color::Green),
        ));
    }
    if table.is_busy() {
        resource_spans.push(Span::styled(
            "  busy",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(resource_spans)), rows[1]);

    // Row 3: Actions
    let action_style = if app.readonly || table.is_busy() {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut actions = vec![
        Span::styled(" Actions:", Style::default().fg(Color::DarkGray)),
        Span::styled(" [a]Add ", action_style),
        Span::styled(" [e]Edit ", action_style),
        Span::styled(" [x]Delete ", Style::default().fg(Color::Red)),
    ];
    if table.supports_upload() {
        actions.push(Span::styled(" [u]Upload ", action_style));
    }
    if let Some(sub) = table.sub_resource() {
        actions.push(Span::styled(
            format!(" [{}]{} ", sub.shortcut, sub.display_name),
            Style::default().fg(Color::Cyan),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(actions)), rows[2]);

    // Row 4: Help hint
    let help_line = Line::from(vec![
        Span::styled(
            " ?:help  /:filter  1/2/3:tables  n:notifications  q:quit",
            Style::default().fg(Color::DarkGray),
        ),
        if app.readonly {
            Span::styled(
                "  [READ-ONLY]",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw("")
        },
    ]);
    f.render_widget(Paragraph::new(help_line), rows[3]);
}
