//! CRUD controller for one resource table
//!
//! Mediates dialog submissions to the catalog API and keeps the table's
//! [`ResourceStore`] in step with the server. A mutation runs in three steps:
//! [`ResourceTable::begin`] claims the table and runs the local checks,
//! [`ResourceTable::run`] sends the request and reloads, and
//! [`ResourceTable::settle`] applies the outcome. The middle step needs no
//! access to the table, so the event loop runs it on a spawned task and keeps
//! drawing. The [`BusyGuard`] travels with the request until it is settled,
//! so a second mutation on the same table is refused until then. Errors are
//! logged, turned into a notification and returned; nothing here panics or
//! retries.

use super::{
    ColumnDef, Dialog, Resource, ResourceKind, ResourceStore, SubResourceDef, TableView, ViewAction,
};
use crate::api::{CatalogClient, UploadFile};
use crate::error::{format_api_error, CrudError, FetchError, ValidationError};
use crate::model::ListFilter;
use crate::notification::{NotificationManager, OperationType};
use serde_json::Value;
use std::collections::HashSet;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

/// Extensions accepted by the upload dialog, with their MIME types
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("svg", "image/svg+xml"),
];

/// MIME type for an image path, by extension
pub fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Split the upload dialog's comma-separated path list. A path containing
/// commas can be wrapped in double quotes.
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in input.chars() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => paths.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    paths.push(current);

    paths
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Holds a table's busy flag; the flag is released on drop, whatever the
/// outcome of the operation.
#[derive(Debug)]
pub struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    /// Take the flag, or `None` if it is already held
    pub fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: Arc::clone(flag) })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Ids of one resource known to exist.
///
/// A table publishes its ids here on every load and delete; tables whose
/// payloads reference that resource hold a clone and check foreign keys
/// against it. Unknown (`None`) until a complete listing has been seen.
#[derive(Debug, Clone, Default)]
pub struct KnownIds(Arc<RwLock<Option<HashSet<i64>>>>);

impl KnownIds {
    fn read(&self) -> RwLockReadGuard<'_, Option<HashSet<i64>>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<HashSet<i64>>> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// `None` while no complete listing has been seen
    pub fn contains(&self, id: i64) -> Option<bool> {
        self.read().as_ref().map(|ids| ids.contains(&id))
    }

    /// Replace with a complete listing
    pub fn replace(&self, ids: impl IntoIterator<Item = i64>) {
        *self.write() = Some(ids.into_iter().collect());
    }

    /// Add ids from a partial listing. A partial listing alone never makes
    /// the set known.
    pub fn extend(&self, ids: impl IntoIterator<Item = i64>) {
        if let Some(known) = self.write().as_mut() {
            known.extend(ids);
        }
    }

    pub fn remove(&self, id: i64) {
        if let Some(known) = self.write().as_mut() {
            known.remove(&id);
        }
    }
}

/// Remote half of a mutation
pub enum Request<R: Resource> {
    Create(R::Payload),
    Update(i64, R::Payload),
    Delete(i64),
    Upload(i64, Vec<UploadFile>),
    /// Files still on disk; read by whoever sends the request
    UploadPaths(i64, Vec<PathBuf>),
}

impl<R: Resource> Request<R> {
    pub fn operation(&self) -> OperationType {
        match self {
            Self::Create(_) => OperationType::Create,
            Self::Update(..) => OperationType::Update,
            Self::Delete(_) => OperationType::Delete,
            Self::Upload(..) | Self::UploadPaths(..) => OperationType::Upload,
        }
    }

    fn entity_id(&self) -> Option<i64> {
        match self {
            Self::Create(_) => None,
            Self::Update(id, _) | Self::Delete(id) | Self::Upload(id, _) | Self::UploadPaths(id, _) => {
                Some(*id)
            },
        }
    }
}

/// A mutation that passed the local checks and holds the table's busy flag
pub struct Pending<R: Resource> {
    guard: BusyGuard,
    notice: Uuid,
    request: Request<R>,
    filter: ListFilter,
}

/// Outcome of a mutation's remote call, plus the reload that follows a
/// successful one
pub struct Completion<R> {
    guard: BusyGuard,
    notice: Uuid,
    operation: OperationType,
    entity_id: Option<i64>,
    filter: ListFilter,
    result: Result<Value, CrudError>,
    reload: Option<Result<Vec<R>, FetchError>>,
}

/// A finished mutation as reported to the app
#[derive(Debug)]
pub struct Settled {
    pub operation: OperationType,
    pub result: Result<Value, CrudError>,
}

pub struct ResourceTable<R: Resource> {
    client: CatalogClient,
    pub store: ResourceStore<R>,
    pub view: TableView,
    /// Server-side filter used by every (re)load
    filter: ListFilter,
    /// Filter that produced the current store contents
    loaded_filter: Option<ListFilter>,
    /// This table's ids, shared with child tables
    known: KnownIds,
    /// Ids of the resource this table's payloads reference
    parent: Option<KnownIds>,
    busy: Arc<AtomicBool>,
    readonly: bool,
    completed_tx: UnboundedSender<Completion<R>>,
    completed_rx: UnboundedReceiver<Completion<R>>,
}

impl<R: Resource> ResourceTable<R> {
    pub fn new(client: CatalogClient) -> Self {
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();
        Self {
            client,
            store: ResourceStore::new(),
            view: TableView::default(),
            filter: ListFilter::new(),
            loaded_filter: None,
            known: KnownIds::default(),
            parent: None,
            busy: Arc::new(AtomicBool::new(false)),
            readonly: false,
            completed_tx,
            completed_rx,
        }
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: ListFilter) {
        self.filter = filter;
    }

    /// Handle on this table's ids, for linking child tables
    pub fn known_ids(&self) -> KnownIds {
        self.known.clone()
    }

    /// Check payload foreign keys against `parent`
    pub fn link_parent(&mut self, parent: KnownIds) {
        self.parent = Some(parent);
    }

    /// True while a mutating operation holds the table
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the table for a mutating operation
    pub fn try_begin(&self) -> Result<BusyGuard, CrudError> {
        if self.readonly {
            return Err(CrudError::ReadOnly);
        }
        BusyGuard::acquire(&self.busy).ok_or_else(|| {
            tracing::warn!("{} table busy, operation refused", R::KIND);
            CrudError::Busy
        })
    }

    /// Dispatch a view transition
    pub fn dispatch(&mut self, action: ViewAction<R>) -> bool {
        self.view.reduce(action)
    }

    // =========================================================================
    // Load
    // =========================================================================

    /// Fetch the list with the active server filter and replace the store.
    ///
    /// On failure the previous list and filtered view are kept.
    pub async fn load(&mut self, notices: &mut NotificationManager) -> Result<(), FetchError> {
        match R::load(&self.client, &self.filter).await {
            Ok(items) => {
                self.apply_load(items);
                Ok(())
            },
            Err(e) => {
                self.report_load_error(notices, &e);
                Err(e)
            },
        }
    }

    /// Replace the server filter, then load
    pub async fn load_with(
        &mut self,
        filter: ListFilter,
        notices: &mut NotificationManager,
    ) -> Result<(), FetchError> {
        self.filter = filter;
        self.load(notices).await
    }

    /// Fetch one entity by id (describe view)
    pub async fn fetch_one(&self, id: i64) -> Result<R, FetchError> {
        self.client.get::<R>(id).await
    }

    fn apply_load(&mut self, items: Vec<R>) {
        tracing::debug!("Loaded {} {} ({})", items.len(), R::KIND.plural(), self.filter);
        let current: HashSet<i64> = items.iter().map(Resource::id).collect();

        if self.filter.is_empty() {
            self.known.replace(current.iter().copied());
        } else {
            // Same server filter as last time: whatever vanished is gone
            if self.loaded_filter.as_ref() == Some(&self.filter) {
                for id in self.store.ids().into_iter().filter(|id| !current.contains(id)) {
                    self.known.remove(id);
                }
            }
            self.known.extend(current.iter().copied());
        }

        self.store.replace(items);
        self.loaded_filter = Some(self.filter.clone());
    }

    fn report_load_error(&self, notices: &mut NotificationManager, e: &FetchError) {
        tracing::error!("Failed to load {}: {}", R::KIND.plural(), e);
        let id = notices.create_notification(OperationType::Load, R::KIND, "");
        notices.mark_error(id, format_api_error(e));
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub async fn create(
        &mut self,
        payload: R::Payload,
        notices: &mut NotificationManager,
    ) -> Result<Value, CrudError> {
        self.perform(Request::Create(payload), notices).await
    }

    /// Full-record replace of entity `entity_id`
    pub async fn update(
        &mut self,
        entity_id: i64,
        payload: R::Payload,
        notices: &mut NotificationManager,
    ) -> Result<Value, CrudError> {
        self.perform(Request::Update(entity_id, payload), notices).await
    }

    /// Delete entity `entity_id`. Callers reach this through the delete
    /// dialog ([`ResourceTable::submit_dialog`]); the list is only reloaded
    /// when the server confirms the delete.
    pub async fn remove(
        &mut self,
        entity_id: i64,
        notices: &mut NotificationManager,
    ) -> Result<(), CrudError> {
        self.perform(Request::Delete(entity_id), notices).await.map(|_| ())
    }

    /// Upload image files for entity `entity_id`.
    ///
    /// Count and type checks run before anything is sent.
    pub async fn upload_images(
        &mut self,
        entity_id: i64,
        files: Vec<UploadFile>,
        notices: &mut NotificationManager,
    ) -> Result<Value, CrudError> {
        self.perform(Request::Upload(entity_id, files), notices).await
    }

    /// Read `paths` from disk and upload them
    pub async fn upload_paths(
        &mut self,
        entity_id: i64,
        paths: &[PathBuf],
        notices: &mut NotificationManager,
    ) -> Result<Value, CrudError> {
        self.perform(Request::UploadPaths(entity_id, paths.to_vec()), notices).await
    }

    /// Submit whichever dialog is open and wait for the outcome. `None` when
    /// no dialog is open.
    ///
    /// Successful submissions close the dialog; failures leave it open with
    /// the error shown in its form.
    pub async fn submit_dialog(
        &mut self,
        notices: &mut NotificationManager,
    ) -> Option<Result<(), CrudError>> {
        let request = match self.dialog_request(notices)? {
            Ok(request) => request,
            Err(e) => return Some(Err(e)),
        };
        Some(self.perform(request, notices).await.map(|_| ()))
    }

    /// Like [`ResourceTable::submit_dialog`], but the remote call runs on its
    /// own task; the dialog stays open until [`ResourceTable::poll_settled`]
    /// reports the outcome.
    pub fn spawn_dialog(&mut self, notices: &mut NotificationManager) -> Option<Result<(), CrudError>> {
        let request = match self.dialog_request(notices)? {
            Ok(request) => request,
            Err(e) => return Some(Err(e)),
        };
        Some(self.spawn(request, notices))
    }

    /// Run local checks, then send `request` from a spawned task
    pub fn spawn(&mut self, request: Request<R>, notices: &mut NotificationManager) -> Result<(), CrudError> {
        let pending = self.begin(request, notices)?;
        let client = self.client.clone();
        let completed = self.completed_tx.clone();

        tokio::spawn(async move {
            let done = Self::run(client, pending).await;
            // The receiver lives as long as the table
            let _ = completed.send(done);
        });
        Ok(())
    }

    /// Settle the next finished spawned mutation, if any
    pub fn poll_settled(&mut self, notices: &mut NotificationManager) -> Option<Settled> {
        let done = self.completed_rx.try_recv().ok()?;
        let operation = done.operation;
        let result = self.settle(done, notices);
        Some(Settled { operation, result })
    }

    /// Claim the table, record the notification and run the local checks
    pub fn begin(
        &mut self,
        request: Request<R>,
        notices: &mut NotificationManager,
    ) -> Result<Pending<R>, CrudError> {
        let guard = self.try_begin()?;
        let notice = notices.create_notification(request.operation(), R::KIND, self.target_label(&request));

        let checked = match &request {
            Request::Create(payload) | Request::Update(_, payload) => self.check_payload(payload),
            Request::Delete(_) => Ok(()),
            Request::Upload(_, files) => check_upload::<R>(files),
            Request::UploadPaths(_, paths) => check_paths::<R>(paths),
        };
        if let Err(e) = checked {
            return Err(self.fail(notices, notice, e.into()));
        }

        Ok(Pending {
            guard,
            notice,
            request,
            filter: self.filter.clone(),
        })
    }

    /// Send a pending request, then reload with the filter it started under
    pub async fn run(client: CatalogClient, pending: Pending<R>) -> Completion<R> {
        let Pending {
            guard,
            notice,
            request,
            filter,
        } = pending;
        let operation = request.operation();
        let entity_id = request.entity_id();

        let result = match request {
            Request::Create(payload) => client.create::<R>(&payload).await.map_err(CrudError::from),
            Request::Update(id, payload) => client.update::<R>(id, &payload).await.map_err(CrudError::from),
            Request::Delete(id) => client
                .delete::<R>(id)
                .await
                .map(|()| Value::Null)
                .map_err(CrudError::from),
            Request::Upload(id, files) => client.upload_images::<R>(id, files).await.map_err(CrudError::from),
            Request::UploadPaths(id, paths) => match read_images(&paths).await {
                Ok(files) => client.upload_images::<R>(id, files).await.map_err(CrudError::from),
                Err(e) => Err(e.into()),
            },
        };

        let reload = match result {
            Ok(_) => Some(R::load(&client, &filter).await),
            Err(_) => None,
        };

        Completion {
            guard,
            notice,
            operation,
            entity_id,
            filter,
            result,
            reload,
        }
    }

    /// Apply a finished mutation: reload the store, close the dialog and
    /// notify on success; surface the error otherwise. Releases the busy flag.
    pub fn settle(&mut self, done: Completion<R>, notices: &mut NotificationManager) -> Result<Value, CrudError> {
        let Completion {
            guard,
            notice,
            operation,
            entity_id,
            filter,
            result,
            reload,
        } = done;

        let outcome = match result {
            Ok(body) => {
                tracing::info!("{} {} {}", R::KIND, operation.past_tense(), target_id(entity_id, &body));
                match reload {
                    Some(Ok(items)) if filter == self.filter => self.apply_load(items),
                    Some(Ok(_)) => tracing::debug!("Dropping {} reload for a replaced filter", R::KIND),
                    // The mutation already went through; the failed reload reports itself
                    Some(Err(e)) => self.report_load_error(notices, &e),
                    None => {},
                }
                match (operation, entity_id) {
                    (OperationType::Delete, Some(id)) => self.known.remove(id),
                    (OperationType::Update, Some(id)) => self.known.extend([id]),
                    (OperationType::Create, _) => self.known.extend(body.get("id").and_then(Value::as_i64)),
                    _ => {},
                }
                self.view.reduce::<R>(ViewAction::Close);
                notices.mark_success(notice);
                Ok(body)
            },
            Err(CrudError::Fetch(e)) if operation == OperationType::Upload => {
                let message = if e.message.trim().is_empty() {
                    "Failed to upload images".to_string()
                } else {
                    e.message.clone()
                };
                tracing::error!("Upload for {} {} failed: {}", R::KIND, target_id(entity_id, &serde_json::Value::Null), message);
                notices.mark_error(notice, message.clone());
                self.set_form_error(message);
                Err(e.into())
            },
            Err(e) => Err(self.fail(notices, notice, e)),
        };

        drop(guard);
        outcome
    }

    async fn perform(
        &mut self,
        request: Request<R>,
        notices: &mut NotificationManager,
    ) -> Result<Value, CrudError> {
        let pending = self.begin(request, notices)?;
        let done = Self::run(self.client.clone(), pending).await;
        self.settle(done, notices)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Request built from the open dialog. `None` when no dialog is open.
    fn dialog_request(&mut self, notices: &mut NotificationManager) -> Option<Result<Request<R>, CrudError>> {
        let request = match self.view.dialog()? {
            Dialog::Add { form } => R::payload_from_form(&form.values())
                .map(Request::Create)
                .map_err(|e| (OperationType::Create, e)),
            Dialog::Edit { id, form } => R::payload_from_form(&form.values())
                .map(|payload| Request::Update(*id, payload))
                .map_err(|e| (OperationType::Update, e)),
            Dialog::Delete { id, .. } => Ok(Request::Delete(*id)),
            Dialog::Upload { id, form, .. } => Ok(Request::UploadPaths(
                *id,
                parse_path_list(form.value("files").unwrap_or_default()),
            )),
        };
        Some(request.map_err(|(operation, e)| self.reject_form(notices, operation, e)))
    }

    fn target_label(&self, request: &Request<R>) -> String {
        match request {
            Request::Create(payload) | Request::Update(_, payload) => R::payload_name(payload).to_string(),
            Request::Delete(id) | Request::Upload(id, _) | Request::UploadPaths(id, _) => self
                .store
                .find(*id)
                .map(|e| e.name().to_string())
                .unwrap_or_else(|| format!("#{}", id)),
        }
    }

    fn check_payload(&self, payload: &R::Payload) -> Result<(), ValidationError> {
        R::validate(payload)?;

        if let (Some(parent_id), Some(known), Some(parent)) =
            (R::payload_parent_id(payload), &self.parent, R::PARENT)
        {
            if known.contains(parent_id) == Some(false) {
                return Err(ValidationError::new(format!(
                    "{} {} does not exist",
                    parent, parent_id
                )));
            }
        }
        Ok(())
    }

    /// Failure path: log, notify, surface in the open form
    fn fail(&mut self, notices: &mut NotificationManager, id: Uuid, err: CrudError) -> CrudError {
        let message = match &err {
            CrudError::Fetch(e) => format_api_error(e),
            other => other.to_string(),
        };
        match &err {
            CrudError::Validation(_) => tracing::warn!("{} rejected: {}", R::KIND, message),
            _ => tracing::error!("{} operation failed: {}", R::KIND, err),
        }
        notices.mark_error(id, message.clone());
        self.set_form_error(message);
        err
    }

    fn reject_form(
        &mut self,
        notices: &mut NotificationManager,
        operation: OperationType,
        err: ValidationError,
    ) -> CrudError {
        let id = notices.create_notification(operation, R::KIND, "");
        self.fail(notices, id, err.into())
    }

    fn set_form_error(&mut self, message: String) {
        if let Some(form) = self.view.dialog_mut().and_then(Dialog::form_mut) {
            form.set_error(message);
        }
    }
}

fn target_id(entity_id: Option<i64>, body: &Value) -> String {
    entity_id
        .or_else(|| body.get("id").and_then(Value::as_i64))
        .map(|id| id.to_string())
        .unwrap_or_default()
}

/// Type-erased access to a [`ResourceTable`] for rendering and key handling.
///
/// Everything synchronous lives here; async operations go through the
/// concrete table.
pub trait TableHandle {
    fn kind(&self) -> ResourceKind;
    fn columns(&self) -> &'static [ColumnDef];
    /// Cell text for filtered rows in `range`
    fn rows(&self, range: Range<usize>) -> Vec<Vec<String>>;
    fn filtered_len(&self) -> usize;
    fn total_len(&self) -> usize;
    fn is_loaded(&self) -> bool;
    fn is_busy(&self) -> bool;
    fn server_filter(&self) -> &ListFilter;

    fn selected(&self) -> usize;
    fn select(&mut self, position: usize);
    fn next(&mut self);
    fn previous(&mut self);
    fn go_to_top(&mut self);
    fn go_to_bottom(&mut self);
    fn page_down(&mut self, page_size: usize);
    fn page_up(&mut self, page_size: usize);

    fn filter_text(&self) -> &str;
    fn apply_text_filter(&mut self, term: &str);
    fn clear_text_filter(&mut self);

    fn selected_id(&self) -> Option<i64>;
    fn selected_name(&self) -> Option<String>;
    /// Cached JSON of the selected row
    fn selected_json(&self) -> Option<Value>;
    fn sub_resource(&self) -> Option<&'static SubResourceDef>;
    fn supports_upload(&self) -> bool;

    fn view(&self) -> &TableView;
    fn view_mut(&mut self) -> &mut TableView;
    fn open_add(&mut self) -> bool;
    /// Open edit/delete/upload for the selected row
    fn open_for_selected(&mut self, purpose: DialogPurpose) -> bool;
    fn close_dialog(&mut self) -> bool;
}

/// Row-targeted dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPurpose {
    Edit,
    Delete,
    Upload,
}

impl<R: Resource> TableHandle for ResourceTable<R> {
    fn kind(&self) -> ResourceKind {
        R::KIND
    }

    fn columns(&self) -> &'static [ColumnDef] {
        R::columns()
    }

    fn rows(&self, range: Range<usize>) -> Vec<Vec<String>> {
        range
            .filter_map(|pos| self.store.get_filtered(pos))
            .map(Resource::row)
            .collect()
    }

    fn filtered_len(&self) -> usize {
        self.store.filtered_len()
    }

    fn total_len(&self) -> usize {
        self.store.items().len()
    }

    fn is_loaded(&self) -> bool {
        self.store.is_loaded()
    }

    fn is_busy(&self) -> bool {
        ResourceTable::is_busy(self)
    }

    fn server_filter(&self) -> &ListFilter {
        &self.filter
    }

    fn selected(&self) -> usize {
        self.store.selected
    }

    fn select(&mut self, position: usize) {
        if position < self.store.filtered_len() {
            self.store.selected = position;
        }
    }

    fn next(&mut self) {
        self.store.next();
    }

    fn previous(&mut self) {
        self.store.previous();
    }

    fn go_to_top(&mut self) {
        self.store.go_to_top();
    }

    fn go_to_bottom(&mut self) {
        self.store.go_to_bottom();
    }

    fn page_down(&mut self, page_size: usize) {
        self.store.page_down(page_size);
    }

    fn page_up(&mut self, page_size: usize) {
        self.store.page_up(page_size);
    }

    fn filter_text(&self) -> &str {
        self.store.filter_text()
    }

    fn apply_text_filter(&mut self, term: &str) {
        self.store.apply_text_filter(term);
    }

    fn clear_text_filter(&mut self) {
        self.store.clear_text_filter();
    }

    fn selected_id(&self) -> Option<i64> {
        self.store.selected_item().map(Resource::id)
    }

    fn selected_name(&self) -> Option<String> {
        self.store.selected_item().map(|e| e.name().to_string())
    }

    fn selected_json(&self) -> Option<Value> {
        self.store
            .selected_item()
            .and_then(|e| serde_json::to_value(e).ok())
    }

    fn sub_resource(&self) -> Option<&'static SubResourceDef> {
        R::sub_resource()
    }

    fn supports_upload(&self) -> bool {
        R::UPLOAD.is_some()
    }

    fn view(&self) -> &TableView {
        &self.view
    }

    fn view_mut(&mut self) -> &mut TableView {
        &mut self.view
    }

    fn open_add(&mut self) -> bool {
        self.dispatch(ViewAction::OpenAdd)
    }

    fn open_for_selected(&mut self, purpose: DialogPurpose) -> bool {
        let Some(entity) = self.store.selected_item().cloned() else {
            return false;
        };
        let action = match purpose {
            DialogPurpose::Edit => ViewAction::OpenEdit(entity),
            DialogPurpose::Delete => ViewAction::OpenDelete(entity),
            DialogPurpose::Upload => ViewAction::OpenUpload(entity),
        };
        self.dispatch(action)
    }

    fn close_dialog(&mut self) -> bool {
        self.dispatch(ViewAction::Close)
    }
}

fn check_count<R: Resource>(count: usize) -> Result<(), ValidationError> {
    match R::UPLOAD {
        Some(spec) => spec.check_count(count),
        None => Err(ValidationError::new(format!(
            "{} does not support image uploads",
            R::KIND
        ))),
    }
}

fn check_upload<R: Resource>(files: &[UploadFile]) -> Result<(), ValidationError> {
    check_count::<R>(files.len())?;
    if files.iter().any(|f| !f.mime.starts_with("image/")) {
        return Err(ValidationError::new("Only image files can be uploaded"));
    }
    Ok(())
}

async fn read_image(path: &Path) -> Result<UploadFile, ValidationError> {
    let mime = image_mime(path).ok_or_else(|| ValidationError::new("Only image files can be uploaded"))?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ValidationError::new(format!("Could not read {}: {}", path.display(), e)))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(UploadFile::new(file_name, mime, bytes))
}

/// Count and extension checks for files still on disk
fn check_paths<R: Resource>(paths: &[PathBuf]) -> Result<(), ValidationError> {
    check_count::<R>(paths.len())?;
    if paths.iter().any(|p| image_mime(p).is_none()) {
        return Err(ValidationError::new("Only image files can be uploaded"));
    }
    Ok(())
}

async fn read_images(paths: &[PathBuf]) -> Result<Vec<UploadFile>, ValidationError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(read_image(path).await?);
    }
    Ok(files)
}
