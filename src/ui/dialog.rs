//! Dialog Components
//!
//! Add/edit forms, delete confirmation, image upload and warning dialogs.

use crate::app::{App, Mode};
use crate::resource::{Dialog, FormState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    match app.mode {
        Mode::Dialog => render_table_dialog(f, app),
        Mode::Warning => render_warning_dialog(f, app),
        _ => {},
    }
}

fn render_table_dialog(f: &mut Frame, app: &App) {
    let (Some(dialog), Some(title)) = (app.dialog(), app.dialog_title()) else {
        return;
    };

    // Request in flight: the dialog stays up until it settles
    let busy = app.table().is_busy();

    match dialog {
        Dialog::Delete { label, .. } => render_delete_dialog(f, title, label, busy),
        Dialog::Upload { label, form, .. } => {
            let hint = format!("Images for '{}'", label);
            render_form_dialog(f, title, Some(&hint), form, busy);
        },
        Dialog::Add { form } | Dialog::Edit { form, .. } => {
            render_form_dialog(f, title, None, form, busy);
        },
    }
}

fn render_form_dialog(f: &mut Frame, title: &str, hint: Option<&str>, form: &FormState, busy: bool) {
    let area = f.area();
    let height = (form.fields.len() as u16 * 3 + 6).min(area.height);
    let popup_area = centered_fixed(60, height, area);

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let mut lines = Vec::new();
    if let Some(hint) = hint {
        lines.push(Line::from(Span::styled(
            format!(" {}", hint),
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focused;
        let label = if field.required {
            format!(" {} *", field.label)
        } else {
            format!(" {}", field.label)
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(if focused { Color::Yellow } else { Color::Gray }),
        )));

        let value = if focused {
            format!(" > {}_", field.value)
        } else {
            format!("   {}", field.value)
        };
        lines.push(Line::from(Span::styled(
            value,
            if focused {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            },
        )));
        lines.push(Line::from(""));
    }

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }
    if busy {
        lines.push(Line::from(Span::styled(
            " Sending... (Esc hides this dialog)",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            " Tab: next field | Enter: submit | Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_delete_dialog(f: &mut Frame, title: &str, label: &str, busy: bool) {
    let area = f.area();
    let popup_area = centered_rect(50, 25, area);

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let content_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(inner);

    let message = Paragraph::new(Line::from(Span::styled(
        format!("Delete '{}'? This cannot be undone.", label),
        Style::default().fg(Color::White),
    )))
    .alignment(Alignment::Center);
    f.render_widget(message, content_chunks[0]);

    if busy {
        f.render_widget(
            Paragraph::new(Span::styled("Deleting...", Style::default().fg(Color::Yellow)))
                .alignment(Alignment::Center),
            content_chunks[2],
        );
        return;
    }

    let buttons = Line::from(vec![
        Span::raw("  "),
        Span::styled(
            " Yes (y) ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("    "),
        Span::styled(" No (n) ", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
    ]);
    f.render_widget(
        Paragraph::new(buttons).alignment(Alignment::Center),
        content_chunks[2],
    );
}

fn render_warning_dialog(f: &mut Frame, app: &App) {
    let Some(message) = &app.warning_message else {
        return;
    };

    let area = f.area();
    let popup_area = centered_rect(50, 20, area);

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " Warning ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter or Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(content).alignment(Alignment::Center);
    f.render_widget(paragraph, inner);
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

/// Horizontally percentage-sized, vertically fixed-height popup
fn centered_fixed(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
