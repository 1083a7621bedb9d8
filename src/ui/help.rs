//! Help Overlay
//!
//! Shows keyboard shortcuts.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j/k, ↑/↓", "Move up/down"),
            ("gg / G", "Go to top / bottom"),
            ("Ctrl+d/u", "Page down/up"),
            ("1 / 2 / 3", "Categories / Products / Colors"),
            ("p", "Products of selected category"),
            ("c", "Colors of selected product"),
            ("b/Backspace", "Go back"),
        ],
    ),
    (
        "Views",
        &[
            ("Enter/d", "View details"),
            ("R", "Refresh current table"),
            ("/", "Search by name (Esc clears)"),
            ("n", "Notification history"),
        ],
    ),
    (
        "Actions",
        &[
            ("a", "Add"),
            ("e", "Edit selected"),
            ("u", "Upload images"),
            ("x/Delete", "Delete selected (destructive)"),
        ],
    ),
    (
        "Dialogs",
        &[
            ("Tab/Shift+Tab", "Next/previous field"),
            ("Enter", "Submit / confirm"),
            ("Esc", "Cancel"),
        ],
    ),
];

pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(70, 80, area);

    f.render_widget(Clear, popup_area);

    let mut help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (title, keys) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            *title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (key, action) in keys.iter() {
            let destructive = action.contains("destructive");
            help_text.push(Line::from(vec![
                Span::styled(
                    format!("  {:<14}", key),
                    Style::default().fg(if destructive { Color::Red } else { Color::Yellow }),
                ),
                Span::raw(*action),
            ]));
        }
        help_text.push(Line::from(""));
    }

    if app.readonly {
        help_text.push(Line::from(Span::styled(
            "Read-only mode: actions are disabled",
            Style::default().fg(Color::Yellow),
        )));
        help_text.push(Line::from(""));
    }

    help_text.push(Line::from(vec![
        Span::styled("  ?/Esc         ", Style::default().fg(Color::Yellow)),
        Span::raw("Close help"),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  q             ", Style::default().fg(Color::Yellow)),
        Span::raw("Quit application"),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    f.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
