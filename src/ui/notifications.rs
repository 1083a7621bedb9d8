//! Notifications Panel UI
//!
//! Renders the notifications history panel overlay.

use crate::app::App;
use crate::notification::{Notification, NotificationStatus};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

/// Render the notifications history panel as an overlay
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    // Center the panel (80% width, 70% height)
    let popup_width = (area.width as f32 * 0.8) as u16;
    let popup_height = (area.height as f32 * 0.7) as u16;
    let popup_x = (area.width - popup_width) / 2;
    let popup_y = (area.height - popup_height) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    f.render_widget(Clear, popup_area);

    let pending = app.notification_manager.pending_count();
    let title = if pending > 0 {
        format!(" Notifications History [{} pending] ", pending)
    } else {
        " Notifications History ".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(popup_area);
    f.render_widget(block, popup_area);

    if app.notification_manager.notifications.is_empty() {
        let msg = Paragraph::new("No notifications yet")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(msg, inner_area);
        return;
    }

    let header_cells = [" STATUS", " MESSAGE", " TARGET", " DURATION", " TIME AGO"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });
    let header = Row::new(header_cells).height(1);

    let rows = app.notification_manager.notifications.iter().map(|notif| {
        let status_color = status_color(&notif.status);

        Row::new(vec![
            Cell::from(format!(" {}", notif.status.icon())).style(Style::default().fg(status_color)),
            Cell::from(format!(" {}", truncate(&message(notif), 60))),
            Cell::from(format!(" {}", truncate(&notif.target, 24))),
            Cell::from(format!(" {}", notif.duration_display())),
            Cell::from(format!(" {}", format_time_ago(notif.created_at.elapsed()))),
        ])
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Min(30),
        Constraint::Length(26),
        Constraint::Length(10),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths).header(header).row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    state.select(Some(app.notifications_selected));

    f.render_stateful_widget(table, inner_area, &mut state);

    // Render help text at bottom
    let help_area = Rect::new(
        popup_area.x + 1,
        popup_area.y + popup_area.height.saturating_sub(1),
        popup_area.width.saturating_sub(2),
        1,
    );
    let help = Line::from(vec![
        Span::styled("j/k", Style::default().fg(Color::Yellow)),
        Span::raw(": navigate  "),
        Span::styled("c", Style::default().fg(Color::Yellow)),
        Span::raw(": clear all  "),
        Span::styled("q/n/Esc", Style::default().fg(Color::Yellow)),
        Span::raw(": close"),
    ]);
    let help_para = Paragraph::new(help).alignment(Alignment::Center);
    f.render_widget(help_para, help_area);
}

pub fn status_color(status: &NotificationStatus) -> Color {
    match status {
        NotificationStatus::Pending => Color::Yellow,
        NotificationStatus::Success => Color::Green,
        NotificationStatus::Error(_) => Color::Red,
    }
}

/// Headline plus error detail, if any
fn message(notif: &Notification) -> String {
    match &notif.status {
        NotificationStatus::Error(err) => format!("{}: {}", notif.headline(), err),
        _ => notif.headline(),
    }
}

/// Format elapsed time as human-readable string
fn format_time_ago(elapsed: std::time::Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

/// Truncate string for display
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_time_ago() {
        assert_eq!(format_time_ago(Duration::from_secs(5)), "5s ago");
        assert_eq!(format_time_ago(Duration::from_secs(125)), "2m ago");
        assert_eq!(format_time_ago(Duration::from_secs(7300)), "2h ago");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long target name", 10), "a very ...");
    }
}
