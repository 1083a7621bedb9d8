//! Event Handling
//!
//! Keyboard and event handling for tcat.

use crate::app::{App, Mode};
use crate::resource::{Dialog, DialogPurpose, ResourceKind};
use anyhow::Result;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use std::time::Duration;

/// Handle events, returns true if app should quit
pub async fn handle_events(app: &mut App) -> Result<bool> {
    if poll(Duration::from_millis(100))? {
        if let Event::Key(key) = read()? {
            return handle_key_event(app, key.code, key.modifiers).await;
        }
    }
    Ok(false)
}

pub async fn handle_key_event(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<bool> {
    // Global quit shortcut
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, code, modifiers).await,
        Mode::Help => handle_help_mode(app, code),
        Mode::Dialog => handle_dialog_mode(app, code, modifiers),
        Mode::Warning => handle_warning_mode(app, code),
        Mode::Describe => handle_describe_mode(app, code, modifiers),
        Mode::Notifications => handle_notifications_mode(app, code),
    }
}

async fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Double-g goes to top
    if code == KeyCode::Char('g') {
        if let Some((KeyCode::Char('g'), time)) = app.last_key_press {
            if time.elapsed() < Duration::from_millis(1000) {
                app.go_to_top();
                app.last_key_press = None;
                return Ok(false);
            }
        }
        app.last_key_press = Some((code, std::time::Instant::now()));
        return Ok(false);
    }

    // Clear last key press for non-g keys
    app.last_key_press = None;

    // Handle filter input first
    if app.filter_active {
        match code {
            KeyCode::Esc => {
                app.clear_filter();
            },
            KeyCode::Enter => {
                app.filter_active = false;
            },
            KeyCode::Backspace => {
                app.pop_filter_char();
            },
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                app.push_filter_char(c);
            },
            _ => {},
        }
        return Ok(false);
    }

    // Load failures are already surfaced through `error_message`
    match code {
        // Quit
        KeyCode::Char('q') => return Ok(true),

        // Navigation - vim style + accessible alternatives
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Home => app.go_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.go_to_bottom(),
        KeyCode::PageDown => app.page_down(10),
        KeyCode::PageUp => app.page_up(10),

        // Ctrl+D/U for page navigation
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_down(10);
        },
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_up(10);
        },

        // Top-level tables
        KeyCode::Char('1') => {
            let _ = app.navigate_to_resource(ResourceKind::Category).await;
        },
        KeyCode::Char('2') => {
            let _ = app.navigate_to_resource(ResourceKind::Product).await;
        },
        KeyCode::Char('3') => {
            let _ = app.navigate_to_resource(ResourceKind::Color).await;
        },

        // Refresh
        KeyCode::Char('R') => {
            let _ = app.refresh_current().await;
        },

        // Describe
        KeyCode::Enter | KeyCode::Char('d') => {
            app.enter_describe_mode().await;
        },

        // Filter
        KeyCode::Char('/') => {
            app.filter_active = true;
        },

        // Help / notifications
        KeyCode::Char('?') => {
            app.enter_help_mode();
        },
        KeyCode::Char('n') => {
            app.enter_notifications_mode();
        },

        // Back navigation
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('b') => {
            if app.parent_context.is_some() {
                let _ = app.navigate_back().await;
            }
        },

        // CRUD dialogs
        KeyCode::Char('a') => app.open_dialog(None),
        KeyCode::Char('e') => app.open_dialog(Some(DialogPurpose::Edit)),
        KeyCode::Delete | KeyCode::Char('x') => app.open_dialog(Some(DialogPurpose::Delete)),
        KeyCode::Char('u') => app.open_dialog(Some(DialogPurpose::Upload)),

        // Sub-resource shortcut
        KeyCode::Char(c) => {
            let is_sub = app
                .table()
                .sub_resource()
                .is_some_and(|sub| sub.shortcut == c);
            if is_sub && app.table().selected_id().is_some() {
                let _ = app.navigate_to_sub_resource().await;
            }
        },

        _ => {},
    }

    Ok(false)
}

fn handle_dialog_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Request in flight: the form is frozen, Esc only hides the dialog
    if app.table().is_busy() {
        if code == KeyCode::Esc {
            app.close_dialog();
        }
        return Ok(false);
    }

    if app.dialog().is_some_and(Dialog::destructive) {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => app.close_dialog(),
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => app.submit_dialog(),
            _ => {},
        }
        return Ok(false);
    }

    match code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => app.submit_dialog(),
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.dialog_mut().and_then(Dialog::form_mut) {
                form.focus_next();
            }
        },
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.dialog_mut().and_then(Dialog::form_mut) {
                form.focus_previous();
            }
        },
        KeyCode::Backspace => {
            if let Some(form) = app.dialog_mut().and_then(Dialog::form_mut) {
                form.backspace();
            }
        },
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(form) = app.dialog_mut().and_then(Dialog::form_mut) {
                form.push_char(c);
            }
        },
        _ => {},
    }
    Ok(false)
}

fn handle_help_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.exit_mode();
        },
        _ => {},
    }
    Ok(false)
}

fn handle_warning_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Enter => {
            app.exit_mode();
        },
        _ => {},
    }
    Ok(false)
}

fn handle_notifications_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    let count = app.notification_manager.notifications.len();
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('n') => {
            app.exit_mode();
        },
        KeyCode::Char('j') | KeyCode::Down => {
            if app.notifications_selected + 1 < count {
                app.notifications_selected += 1;
            }
        },
        KeyCode::Char('k') | KeyCode::Up => {
            app.notifications_selected = app.notifications_selected.saturating_sub(1);
        },
        KeyCode::Char('c') => {
            app.clear_notifications();
        },
        _ => {},
    }
    Ok(false)
}

fn handle_describe_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
            app.exit_mode();
        },
        KeyCode::Char('j') | KeyCode::Down => {
            app.describe_scroll = app.describe_scroll.saturating_add(1);
        },
        KeyCode::Char('k') | KeyCode::Up => {
            app.describe_scroll = app.describe_scroll.saturating_sub(1);
        },
        KeyCode::PageDown => {
            app.describe_scroll = app.describe_scroll.saturating_add(10);
        },
        KeyCode::PageUp => {
            app.describe_scroll = app.describe_scroll.saturating_sub(10);
        },
        KeyCode::Char('d') => {
            if modifiers.contains(KeyModifiers::CONTROL) {
                app.describe_scroll = app.describe_scroll.saturating_add(10);
            } else {
                app.exit_mode();
            }
        },
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.describe_scroll = app.describe_scroll.saturating_sub(10);
        },
        KeyCode::Char('g') | KeyCode::Home => {
            app.describe_scroll = 0;
        },
        KeyCode::Char('G') | KeyCode::End => {
            app.describe_scroll_to_bottom(30); // Approximate visible lines
        },
        _ => {},
    }
    Ok(false)
}
