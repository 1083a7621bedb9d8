//! Application State
//!
//! Owns the three resource tables and everything around them: the current
//! screen mode, drill-down navigation, describe data and notifications.

use crate::api::CatalogClient;
use crate::config::Config;
use crate::error::{format_api_error, CrudError, FetchError};
use crate::model::{Category, Color, ListFilter, Product};
use crate::notification::{DetailLevel, NotificationManager, OperationType};
use crate::resource::{
    Dialog, DialogPurpose, Resource, ResourceKind, ResourceTable, TableHandle,
};
use crossterm::event::KeyCode;
use serde_json::Value;
use std::ops::Range;
use std::time::{Duration, Instant};

// =========================================================================
// Configuration Constants
// =========================================================================

/// Default viewport height (will be updated during render based on terminal size)
const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Rows kept between the cursor and the viewport edge
const SCROLL_MARGIN: usize = 2;

/// Application modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,        // Viewing list
    Help,          // ? help popup
    Dialog,        // Add/edit/delete/upload dialog of the current table
    Warning,       // Warning/info dialog (OK only)
    Describe,      // Viewing JSON details of selected item
    Notifications, // Notifications history panel
}

/// Parent row a table was drilled into from
#[derive(Debug, Clone, PartialEq)]
pub struct ParentContext {
    pub kind: ResourceKind,
    pub id: i64,
    pub display_name: String,
    /// Server filter the child table had before the drill-down
    pub previous_filter: ListFilter,
}

/// Run `$body` with `$t` bound to the concrete table for `$kind`
macro_rules! with_table {
    ($app:expr, $kind:expr, $t:ident => $body:expr) => {
        match $kind {
            ResourceKind::Category => {
                let $t = &mut $app.categories;
                $body
            },
            ResourceKind::Product => {
                let $t = &mut $app.products;
                $body
            },
            ResourceKind::Color => {
                let $t = &mut $app.colors;
                $body
            },
        }
    };
}

pub struct App {
    pub client: CatalogClient,
    pub categories: ResourceTable<Category>,
    pub products: ResourceTable<Product>,
    pub colors: ResourceTable<Color>,
    pub current: ResourceKind,
    pub mode: Mode,
    pub filter_active: bool,

    // Navigation
    pub parent_context: Option<ParentContext>,
    pub navigation_stack: Vec<ParentContext>,

    pub error_message: Option<String>,
    pub warning_message: Option<String>,
    pub describe_scroll: usize,
    pub describe_data: Option<Value>,

    pub config: Config,
    pub last_key_press: Option<(KeyCode, Instant)>,
    pub readonly: bool,

    pub notification_manager: NotificationManager,
    pub notifications_selected: usize,

    // Virtual scrolling
    pub viewport_height: usize,
    pub scroll_offset: usize,
}

impl App {
    pub fn new(client: CatalogClient, config: Config, readonly: bool) -> Self {
        // Initialize notification manager with config settings
        let mut notification_manager = NotificationManager::new();
        notification_manager.detail_level =
            DetailLevel::from_str(&config.notifications.detail_level);
        notification_manager.toast_duration =
            Duration::from_secs(config.notifications.toast_duration_secs);
        notification_manager.max_history = config.notifications.max_history.max(1);

        let categories = ResourceTable::new(client.clone()).with_readonly(readonly);
        let mut products = ResourceTable::new(client.clone()).with_readonly(readonly);
        let mut colors = ResourceTable::new(client.clone()).with_readonly(readonly);
        // Foreign-key checks follow the parent tables' loads and deletes
        products.link_parent(categories.known_ids());
        colors.link_parent(products.known_ids());

        Self {
            categories,
            products,
            colors,
            client,
            current: ResourceKind::Category,
            mode: Mode::Normal,
            filter_active: false,
            parent_context: None,
            navigation_stack: Vec::new(),
            error_message: None,
            warning_message: None,
            describe_scroll: 0,
            describe_data: None,
            config,
            last_key_press: None,
            readonly,
            notification_manager,
            notifications_selected: 0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            scroll_offset: 0,
        }
    }

    // =========================================================================
    // Table Access
    // =========================================================================

    pub fn table(&self) -> &dyn TableHandle {
        self.table_for(self.current)
    }

    pub fn table_mut(&mut self) -> &mut dyn TableHandle {
        match self.current {
            ResourceKind::Category => &mut self.categories,
            ResourceKind::Product => &mut self.products,
            ResourceKind::Color => &mut self.colors,
        }
    }

    pub fn table_for(&self, kind: ResourceKind) -> &dyn TableHandle {
        match kind {
            ResourceKind::Category => &self.categories,
            ResourceKind::Product => &self.products,
            ResourceKind::Color => &self.colors,
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load one table with its active server filter
    pub async fn load(&mut self, kind: ResourceKind) -> Result<(), FetchError> {
        let result = with_table!(self, kind, t => t.load(&mut self.notification_manager).await);

        match &result {
            Ok(()) => self.error_message = None,
            Err(e) => self.error_message = Some(format_api_error(e)),
        }
        result
    }

    pub async fn refresh_current(&mut self) -> Result<(), FetchError> {
        self.load(self.current).await
    }

    // =========================================================================
    // Search Filter
    // =========================================================================

    pub fn push_filter_char(&mut self, c: char) {
        let mut term = self.table().filter_text().to_string();
        term.push(c);
        self.table_mut().apply_text_filter(&term);
        self.scroll_offset = 0;
    }

    pub fn pop_filter_char(&mut self) {
        let mut term = self.table().filter_text().to_string();
        term.pop();
        self.table_mut().apply_text_filter(&term);
        self.scroll_offset = 0;
    }

    pub fn clear_filter(&mut self) {
        self.table_mut().clear_text_filter();
        self.filter_active = false;
        self.scroll_offset = 0;
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    pub fn next(&mut self) {
        self.table_mut().next();
    }

    pub fn previous(&mut self) {
        self.table_mut().previous();
    }

    pub fn go_to_top(&mut self) {
        self.table_mut().go_to_top();
        self.scroll_offset = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.table_mut().go_to_bottom();
    }

    pub fn page_down(&mut self, page_size: usize) {
        self.table_mut().page_down(page_size);
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.table_mut().page_up(page_size);
    }

    pub fn update_viewport(&mut self, height: usize) {
        self.viewport_height = height.max(1);
    }

    /// Adjust scroll offset so the selected row stays visible
    pub fn ensure_visible(&mut self) {
        let selected = self.table().selected();
        let len = self.table().filtered_len();
        self.scroll_offset =
            scroll_for(selected, self.scroll_offset, self.viewport_height, len);
    }

    pub fn visible_range(&self) -> Range<usize> {
        let len = self.table().filtered_len();
        let start = self.scroll_offset.min(len);
        let end = (start + self.viewport_height).min(len);
        start..end
    }

    // =========================================================================
    // Modes
    // =========================================================================

    pub fn enter_help_mode(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn enter_notifications_mode(&mut self) {
        self.notifications_selected = 0;
        self.mode = Mode::Notifications;
    }

    pub fn clear_notifications(&mut self) {
        self.notification_manager.clear();
        self.notifications_selected = 0;
    }

    pub fn show_warning(&mut self, message: &str) {
        self.warning_message = Some(message.to_string());
        self.mode = Mode::Warning;
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
        self.warning_message = None;
        self.describe_data = None;
    }

    /// Fetch the selected entity by id and show it as JSON; falls back to
    /// the cached row when the fetch fails.
    pub async fn enter_describe_mode(&mut self) {
        let Some(id) = self.table().selected_id() else {
            return;
        };

        self.mode = Mode::Describe;
        self.describe_scroll = 0;

        let kind = self.current;
        match with_table!(self, kind, t => describe(t, id).await) {
            Ok(value) => self.describe_data = Some(value),
            Err(e) => {
                tracing::warn!("Describe {} {} failed: {}", kind, id, e);
                let notice = self.notification_manager.create_notification(
                    OperationType::Load,
                    kind,
                    format!("#{}", id),
                );
                self.notification_manager.mark_error(notice, format_api_error(&e));
                self.describe_data = self.table().selected_json();
            },
        }
    }

    pub fn describe_json(&self) -> Option<String> {
        self.describe_data
            .as_ref()
            .and_then(|v| serde_json::to_string_pretty(v).ok())
    }

    pub fn describe_line_count(&self) -> usize {
        self.describe_json().map(|s| s.lines().count()).unwrap_or(0)
    }

    pub fn describe_scroll_to_bottom(&mut self, visible_lines: usize) {
        self.describe_scroll = self.describe_line_count().saturating_sub(visible_lines);
    }

    // =========================================================================
    // Dialogs
    // =========================================================================

    /// Open the add dialog (`None`) or a row dialog for the selected entity
    pub fn open_dialog(&mut self, purpose: Option<DialogPurpose>) {
        if self.readonly {
            self.show_warning(&CrudError::ReadOnly.to_string());
            return;
        }
        if self.table().is_busy() {
            self.error_message = Some(CrudError::Busy.to_string());
            return;
        }
        if purpose == Some(DialogPurpose::Upload) && !self.table().supports_upload() {
            self.error_message = Some(format!("{} does not support image uploads", self.current));
            return;
        }

        let opened = match purpose {
            None => self.table_mut().open_add(),
            Some(p) => self.table_mut().open_for_selected(p),
        };
        if opened {
            self.error_message = None;
            self.mode = Mode::Dialog;
        }
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.table().view().dialog()
    }

    pub fn dialog_title(&self) -> Option<&str> {
        self.table().view().modal.title()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut Dialog> {
        self.table_mut().view_mut().dialog_mut()
    }

    pub fn close_dialog(&mut self) {
        self.table_mut().close_dialog();
        self.mode = Mode::Normal;
    }

    /// Start the open dialog's request. The outcome is picked up by
    /// [`App::poll_pending_operations`]; until then the dialog stays open and
    /// the table reports busy.
    pub fn submit_dialog(&mut self) {
        let kind = self.current;
        let result = with_table!(self, kind, t => t.spawn_dialog(&mut self.notification_manager));

        match result {
            None => self.mode = Mode::Normal,
            Some(Ok(())) => self.error_message = None,
            Some(Err(e)) => self.on_failure(kind, e),
        }
    }

    /// Settle mutations whose remote call has finished
    pub fn poll_pending_operations(&mut self) {
        for kind in ResourceKind::ALL {
            while let Some(settled) =
                with_table!(self, kind, t => t.poll_settled(&mut self.notification_manager))
            {
                match settled.result {
                    Ok(_) => {
                        self.error_message = None;
                        if kind == self.current {
                            self.ensure_visible();
                        }
                    },
                    Err(e) => {
                        tracing::debug!("{} {} settled with an error", kind, settled.operation.display_name());
                        self.on_failure(kind, e);
                    },
                }
            }
        }

        if self.mode == Mode::Dialog && self.dialog().is_none() {
            self.mode = Mode::Normal;
        }
    }

    fn on_failure(&mut self, kind: ResourceKind, err: CrudError) {
        let has_form = self
            .table_for(kind)
            .view()
            .dialog()
            .is_some_and(|d| d.form().is_some());

        match err {
            CrudError::ReadOnly => {
                with_table!(self, kind, t => t.close_dialog());
                self.show_warning(&CrudError::ReadOnly.to_string());
            },
            CrudError::Busy => {
                self.error_message = Some(CrudError::Busy.to_string());
            },
            // Shown inside the still-open form
            _ if has_form => {},
            e => {
                // Delete dialogs have no form, and a dismissed dialog has nowhere to show it
                with_table!(self, kind, t => t.close_dialog());
                self.error_message = Some(match &e {
                    CrudError::Fetch(fetch) => format_api_error(fetch),
                    other => other.to_string(),
                });
            },
        }

        if self.mode == Mode::Dialog && self.dialog().is_none() {
            self.mode = Mode::Normal;
        }
    }

    // =========================================================================
    // Resource Navigation
    // =========================================================================

    /// Switch to a top-level table with no server filter
    pub async fn navigate_to_resource(&mut self, kind: ResourceKind) -> Result<(), FetchError> {
        self.parent_context = None;
        self.navigation_stack.clear();
        self.current = kind;
        self.mode = Mode::Normal;
        self.filter_active = false;
        self.scroll_offset = 0;
        with_table!(self, kind, t => t.set_filter(ListFilter::new()));

        tracing::info!("Switched to {} table", kind);
        if let Err(e) = self.config.set_last_resource(kind.key()) {
            tracing::warn!("Failed to save last resource to config: {}", e);
        }

        self.refresh_current().await
    }

    /// Drill into the child table of the selected row
    pub async fn navigate_to_sub_resource(&mut self) -> Result<(), FetchError> {
        let Some(sub) = self.table().sub_resource() else {
            return Ok(());
        };
        let Some(id) = self.table().selected_id() else {
            return Ok(());
        };
        let display_name = self
            .table()
            .selected_name()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| id.to_string());

        let previous_filter = self.table_for(sub.kind).server_filter().clone();

        if let Some(ctx) = self.parent_context.take() {
            self.navigation_stack.push(ctx);
        }
        self.parent_context = Some(ParentContext {
            kind: self.current,
            id,
            display_name,
            previous_filter,
        });

        with_table!(self, sub.kind, t => t.set_filter(ListFilter::by(sub.filter_param, id)));
        self.current = sub.kind;
        self.filter_active = false;
        self.scroll_offset = 0;

        tracing::info!("Drilled into {} for {} {}", sub.display_name, self.parent_kind_name(), id);
        self.refresh_current().await
    }

    pub async fn navigate_back(&mut self) -> Result<(), FetchError> {
        let Some(parent) = self.parent_context.take() else {
            return Ok(());
        };

        let child = self.current;
        with_table!(self, child, t => t.set_filter(parent.previous_filter.clone()));

        self.parent_context = self.navigation_stack.pop();
        self.current = parent.kind;
        self.filter_active = false;
        self.scroll_offset = 0;
        self.refresh_current().await
    }

    fn parent_kind_name(&self) -> &'static str {
        self.parent_context
            .as_ref()
            .map(|p| p.kind.display_name())
            .unwrap_or("")
    }

    pub fn get_breadcrumb(&self) -> Vec<String> {
        let mut path: Vec<String> = self
            .navigation_stack
            .iter()
            .chain(self.parent_context.iter())
            .map(|ctx| format!("{}:{}", ctx.kind.key(), ctx.display_name))
            .collect();

        path.push(self.current.plural().to_lowercase());
        path
    }
}

async fn describe<R: Resource>(table: &ResourceTable<R>, id: i64) -> Result<Value, FetchError> {
    let entity = table.fetch_one(id).await?;
    serde_json::to_value(entity)
        .map_err(|e| FetchError::transport(format!("Failed to encode {}: {}", R::KIND, e)))
}

/// Scroll offset keeping `selected` inside the viewport with a small margin
fn scroll_for(selected: usize, offset: usize, viewport: usize, len: usize) -> usize {
    let mut offset = offset;
    if selected < offset + SCROLL_MARGIN {
        offset = selected.saturating_sub(SCROLL_MARGIN);
    }
    if selected >= offset + viewport.saturating_sub(SCROLL_MARGIN) {
        offset = selected.saturating_sub(viewport.saturating_sub(SCROLL_MARGIN + 1));
    }
    offset.min(len.saturating_sub(viewport))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryRef;

    fn app() -> App {
        let client = CatalogClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        App::new(client, Config::default(), false)
    }

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.into(),
            products: vec![],
        }
    }

    fn product(id: i64, name: &str, category_id: i64) -> Product {
        Product {
            id,
            name: name.into(),
            sub_name: String::new(),
            description: String::new(),
            category_id,
            photos: vec![],
            category: Some(CategoryRef {
                id: Some(category_id),
                name: "Shoes".into(),
            }),
            colors: vec![],
        }
    }

    #[test]
    fn test_scroll_keeps_selection_visible() {
        assert_eq!(scroll_for(0, 5, 10, 100), 0);
        let offset = scroll_for(50, 30, 10, 100);
        assert!(50 >= offset && 50 < offset + 10);
        assert_eq!(scroll_for(99, 0, 10, 100), 90);
        assert_eq!(scroll_for(3, 0, 10, 4), 0);
    }

    #[test]
    fn test_filter_typing_narrows_current_table() {
        let mut app = app();
        app.categories
            .store
            .replace(vec![category(1, "Shoes"), category(2, "Hats")]);

        app.push_filter_char('s');
        app.push_filter_char('h');
        assert_eq!(app.table().filtered_len(), 1);
        app.pop_filter_char();
        assert_eq!(app.table().filter_text(), "s");
        assert_eq!(app.table().filtered_len(), 2);
        app.clear_filter();
        assert_eq!(app.table().filter_text(), "");
    }

    #[test]
    fn test_parent_tables_feed_foreign_key_checks() {
        let mut app = app();
        app.categories.known_ids().replace([1]);

        let payload = crate::model::ProductPayload {
            name: "Runner".into(),
            sub_name: String::new(),
            description: String::new(),
            category_id: 2,
        };
        let err = tokio_test::block_on(app.products.create(payload, &mut app.notification_manager))
            .unwrap_err();
        assert_eq!(err.to_string(), "Category 2 does not exist");

        app.products.known_ids().replace([7]);
        let payload = crate::model::ColorPayload {
            name: "Red".into(),
            hex_code: None,
            product_id: 8,
        };
        let err = tokio_test::block_on(app.colors.create(payload, &mut app.notification_manager))
            .unwrap_err();
        assert_eq!(err.to_string(), "Product 8 does not exist");
    }

    #[test]
    fn test_submitted_dialog_settles_through_polling() {
        tokio_test::block_on(async {
            let mut app = app();
            app.categories.store.replace(vec![category(1, "Shoes")]);
            app.open_dialog(Some(DialogPurpose::Delete));
            assert_eq!(app.mode, Mode::Dialog);

            app.submit_dialog();
            assert!(app.table().is_busy());
            // Busy tables refuse new dialogs but keep filtering
            app.open_dialog(None);
            assert_eq!(app.error_message.as_deref(), Some("Another operation is still in progress"));
            app.push_filter_char('s');
            assert_eq!(app.table().filtered_len(), 1);

            for _ in 0..200 {
                app.poll_pending_operations();
                if !app.table().is_busy() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }

            // Nothing listens on the test address: the delete fails and the
            // dialog closes with the error on the status line
            assert!(!app.table().is_busy());
            assert_eq!(app.mode, Mode::Normal);
            assert!(app.dialog().is_none());
            assert!(app.error_message.is_some());
        });
    }

    #[test]
    fn test_open_dialog_readonly_shows_warning() {
        let client = CatalogClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let mut app = App::new(client, Config::default(), true);
        app.open_dialog(None);
        assert_eq!(app.mode, Mode::Warning);
        assert_eq!(
            app.warning_message.as_deref(),
            Some("Read-only mode: actions are disabled")
        );
        assert!(!app.table().view().is_open());
    }

    #[test]
    fn test_open_upload_on_category_is_refused() {
        let mut app = app();
        app.categories.store.replace(vec![category(1, "Shoes")]);
        app.open_dialog(Some(DialogPurpose::Upload));
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(
            app.error_message.as_deref(),
            Some("Category does not support image uploads")
        );
    }

    #[test]
    fn test_open_and_close_dialog() {
        let mut app = app();
        app.current = ResourceKind::Product;
        app.products.store.replace(vec![product(7, "Runner", 1)]);

        app.open_dialog(Some(DialogPurpose::Edit));
        assert_eq!(app.mode, Mode::Dialog);
        assert_eq!(app.dialog_title(), Some("Edit Product"));
        assert!(matches!(app.dialog(), Some(Dialog::Edit { id: 7, .. })));

        app.close_dialog();
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.dialog().is_none());
    }

    #[test]
    fn test_breadcrumb() {
        let mut app = app();
        assert_eq!(app.get_breadcrumb(), vec!["categories"]);

        app.parent_context = Some(ParentContext {
            kind: ResourceKind::Category,
            id: 1,
            display_name: "Shoes".into(),
            previous_filter: ListFilter::new(),
        });
        app.current = ResourceKind::Product;
        assert_eq!(app.get_breadcrumb(), vec!["category:Shoes", "products"]);
    }
}
