//! Terminal User Interface rendering module
//!
//! Renders the catalog tables, dialogs and overlays with ratatui.
//!
//! # Architecture
//!
//! - [`splash`] - Startup splash screen
//! - `header` - Header bar with endpoint, table and action hints
//! - `help` - Help overlay showing keybindings
//! - `dialog` - Add/edit/delete/upload dialogs and warnings
//! - `notifications` - Notification history panel
//!
//! # Virtual Scrolling
//!
//! Only visible rows are rendered, with a scrollbar indicating position.
//!
//! # JSON Highlighting
//!
//! The describe view provides syntax highlighting for JSON output:
//! - Keys in cyan
//! - Strings in green
//! - Numbers in light blue
//! - Booleans in magenta
//! - Null values in dark gray

mod dialog;
mod header;
mod help;
mod notifications;
pub mod splash;

use crate::app::{App, Mode};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        Table, TableState,
    },
    Frame,
};

pub fn render(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Header (multi-line)
            Constraint::Min(1),    // Main content (table or describe)
            Constraint::Length(1), // Footer/crumb
        ])
        .split(f.area());

    header::render(f, app, chunks[0]);

    match app.mode {
        Mode::Describe => render_describe_view(f, app, chunks[1]),
        _ => render_main_content(f, app, chunks[1]),
    }

    render_crumb(f, app, chunks[2]);

    // Overlays
    match app.mode {
        Mode::Help => help::render(f, app),
        Mode::Dialog | Mode::Warning => dialog::render(f, app),
        Mode::Notifications => notifications::render(f, app),
        _ => {},
    }
}

fn render_main_content(f: &mut Frame, app: &mut App, area: Rect) {
    // If filter is active or has text, show filter input above table
    let show_filter = app.filter_active || !app.table().filter_text().is_empty();

    if show_filter {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        render_filter_bar(f, app, chunks[0]);
        render_table(f, app, chunks[1]);
    } else {
        render_table(f, app, area);
    }
}

fn render_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let cursor_style = if app.filter_active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text = app.table().filter_text();
    let filter_display = if app.filter_active {
        format!("/{}_", text)
    } else {
        format!("/{}", text)
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(filter_display, cursor_style)]));
    f.render_widget(paragraph, area);
}

/// Render the current resource table with virtual scrolling
fn render_table(f: &mut Frame, app: &mut App, area: Rect) {
    let title = {
        let table = app.table();
        let count = table.filtered_len();
        let total = table.total_len();
        let scope = app
            .parent_context
            .as_ref()
            .map(|p| format!("({})", p.display_name))
            .unwrap_or_default();

        if table.filter_text().is_empty() {
            format!(" {}{}[{}] ", table.kind().plural(), scope, count)
        } else {
            format!(" {}{}[{}/{}] ", table.kind().plural(), scope, count, total)
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    // Calculate viewport - account for header row
    let visible_height = (inner_area.height as usize).saturating_sub(1);
    app.update_viewport(visible_height);
    app.ensure_visible();

    let table = app.table();
    let total_items = table.filtered_len();

    if total_items == 0 {
        let msg = if !table.is_loaded() {
            "Loading..."
        } else if table.filter_text().is_empty() {
            "No items"
        } else {
            "No items match the filter"
        };
        let paragraph = Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, inner_area);
        return;
    }

    let needs_scrollbar = total_items > visible_height;

    // Adjust table area for scrollbar if needed
    let table_area = if needs_scrollbar {
        Rect {
            width: inner_area.width.saturating_sub(1),
            ..inner_area
        }
    } else {
        inner_area
    };

    let range = app.visible_range();
    let columns = table.columns();

    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|col| {
            Cell::from(format!(" {}", col.header)).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    let header = Row::new(header_cells).height(1);

    // Build only visible rows (virtual scrolling)
    let rows: Vec<Row> = table
        .rows(range.clone())
        .into_iter()
        .map(|cells| {
            Row::new(
                cells
                    .into_iter()
                    .map(|value| Cell::from(format!(" {}", truncate_string(&value, 38))))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let widths: Vec<Constraint> = columns
        .iter()
        .map(|col| Constraint::Percentage(col.width))
        .collect();

    let widget = Table::new(rows, widths).header(header).row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    // Adjust selected index for virtual scrolling
    let selected = table.selected();
    let mut state = TableState::default();
    if selected >= range.start && selected < range.end {
        state.select(Some(selected - range.start));
    }

    f.render_stateful_widget(widget, table_area, &mut state);

    if needs_scrollbar {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .symbols(symbols::scrollbar::VERTICAL)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        let mut scrollbar_state = ScrollbarState::new(total_items.saturating_sub(visible_height))
            .position(app.scroll_offset);

        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

/// Truncate string for display (Unicode-safe)
fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

fn render_describe_view(f: &mut Frame, app: &App, area: Rect) {
    let json = app
        .describe_json()
        .unwrap_or_else(|| "No item selected".to_string());

    let lines: Vec<Line> = json.lines().map(highlight_json_line).collect();
    let total_lines = lines.len();

    let title = format!(" {} Details ", app.current.display_name());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let visible_lines = inner_area.height as usize;
    let max_scroll = total_lines.saturating_sub(visible_lines);
    let scroll = app.describe_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines).scroll((scroll as u16, 0));
    f.render_widget(paragraph, inner_area);

    if total_lines > visible_lines {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(max_scroll + visible_lines).position(scroll);
        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

/// Apply JSON syntax highlighting to a single line
fn highlight_json_line(line: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = line.chars().peekable();
    let mut current = String::new();
    let mut is_key = true;

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if !current.is_empty() {
                    spans.push(Span::raw(std::mem::take(&mut current)));
                }

                let mut string_content = String::from("\"");
                while let Some(&next_c) = chars.peek() {
                    chars.next();
                    string_content.push(next_c);
                    if next_c == '"' {
                        break;
                    }
                    if next_c == '\\' {
                        if let Some(&escaped) = chars.peek() {
                            chars.next();
                            string_content.push(escaped);
                        }
                    }
                }

                let style = if is_key {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Green)
                };
                spans.push(Span::styled(string_content, style));
            },
            ':' => {
                current.push(c);
                spans.push(Span::styled(
                    std::mem::take(&mut current),
                    Style::default().fg(Color::White),
                ));
                is_key = false;
            },
            ',' => {
                flush_value(&mut spans, &mut current);
                spans.push(Span::styled(",", Style::default().fg(Color::White)));
                is_key = true;
            },
            '{' | '}' | '[' | ']' => {
                flush_value(&mut spans, &mut current);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::Yellow)));
                if c == '{' || c == '[' {
                    is_key = c == '{';
                }
            },
            ' ' | '\t' => {
                flush_value(&mut spans, &mut current);
                spans.push(Span::raw(c.to_string()));
            },
            _ => current.push(c),
        }
    }

    flush_value(&mut spans, &mut current);
    Line::from(spans)
}

fn flush_value(spans: &mut Vec<Span<'static>>, current: &mut String) {
    if !current.is_empty() {
        let style = get_json_value_style(current);
        spans.push(Span::styled(std::mem::take(current), style));
    }
}

/// Get style for JSON values (numbers, booleans, null)
fn get_json_value_style(value: &str) -> Style {
    let trimmed = value.trim();
    if trimmed == "null" {
        Style::default().fg(Color::DarkGray)
    } else if trimmed == "true" || trimmed == "false" {
        Style::default().fg(Color::Magenta)
    } else if trimmed.parse::<f64>().is_ok() {
        Style::default().fg(Color::LightBlue)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_crumb(f: &mut Frame, app: &App, area: Rect) {
    let crumb_display = app.get_breadcrumb().join(" > ");

    // Sub-resource and back hints
    let shortcuts_hint = if app.mode == Mode::Normal {
        let mut hints = Vec::new();
        if let Some(sub) = app.table().sub_resource() {
            hints.push(format!("{}:{}", sub.shortcut, sub.display_name));
        }
        if app.parent_context.is_some() {
            hints.push("b:back".to_string());
        }
        if hints.is_empty() {
            String::new()
        } else {
            format!(" | {}", hints.join(" "))
        }
    } else {
        String::new()
    };

    let toast = app.notification_manager.current_toast();
    let toast_text = toast.map(|notif| notif.toast_message(app.notification_manager.detail_level));

    let notification_indicator = {
        let pending = app.notification_manager.pending_count();
        if pending > 0 {
            format!(" [↻{}]", pending)
        } else if app.notification_manager.has_notifications() {
            " [n]".to_string()
        } else {
            String::new()
        }
    };

    let status_text = if let Some(err) = &app.error_message {
        format!("Error: {}", err)
    } else if let Some(ref toast) = toast_text {
        toast.clone()
    } else if app.table().is_busy() {
        "Sending request...".to_string()
    } else if app.mode == Mode::Describe {
        "j/k: scroll | q/d/Esc: back".to_string()
    } else if app.filter_active {
        "Type to filter | Enter: apply | Esc: clear".to_string()
    } else {
        shortcuts_hint
    };

    let style = if app.error_message.is_some() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if let Some(notif) = toast {
        Style::default().fg(notifications::status_color(&notif.status))
    } else if app.table().is_busy() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let crumb = Line::from(vec![
        Span::styled(
            format!("<{}>", crumb_display),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(status_text, style),
        Span::styled(notification_indicator, Style::default().fg(Color::DarkGray)),
    ]);

    f.render_widget(Paragraph::new(crumb), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_is_char_safe() {
        assert_eq!(truncate_string("Chaussures", 20), "Chaussures");
        assert_eq!(truncate_string("ééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_highlight_json_line_styles() {
        let line = highlight_json_line(r#"  "name": "Shoes","#);
        let key = line.spans.iter().find(|s| s.content == "\"name\"").unwrap();
        assert_eq!(key.style.fg, Some(Color::Cyan));
        let value = line.spans.iter().find(|s| s.content == "\"Shoes\"").unwrap();
        assert_eq!(value.style.fg, Some(Color::Green));

        let line = highlight_json_line(r#"  "id": 42"#);
        let number = line.spans.iter().find(|s| s.content == "42").unwrap();
        assert_eq!(number.style.fg, Some(Color::LightBlue));
    }
}
