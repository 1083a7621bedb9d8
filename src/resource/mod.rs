//! Resource abstraction layer
//!
//! Category, Product and Color share one CRUD shape. Each implements
//! [`Resource`], which carries everything the generic layers need: REST path,
//! upload capability, form fields, table columns and payload conversion.
//!
//! # Architecture
//!
//! - [`registry`] - Static definitions and the three `Resource` impls
//! - [`store`] - Authoritative list plus derived filtered view
//! - [`form`] - Text form state for add/edit dialogs
//! - [`view`] - Per-table dialog state and its reducer
//! - [`table`] - CRUD controller: load/create/update/remove/upload with busy gating,
//!   run inline or on a spawned task

pub mod form;
pub mod registry;
pub mod store;
pub mod table;
pub mod view;

use crate::api::CatalogClient;
use crate::error::{FetchError, ValidationError};
use crate::model::ListFilter;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::future::Future;

pub use form::FormState;
pub use registry::{ColumnDef, FieldDef, SubResourceDef};
pub use store::ResourceStore;
pub use table::{
    BusyGuard, Completion, DialogPurpose, KnownIds, Pending, Request, ResourceTable, Settled, TableHandle,
};
pub use view::{Dialog, TableView, ViewAction};

/// The three catalog resource types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Category,
    Product,
    Color,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [Self::Category, Self::Product, Self::Color];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Product => "product",
            Self::Color => "color",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "category" | "categories" => Some(Self::Category),
            "product" | "products" => Some(Self::Product),
            "color" | "colors" => Some(Self::Color),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Product => "Product",
            Self::Color => "Color",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Self::Category => "Categories",
            Self::Product => "Products",
            Self::Color => "Colors",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Image upload capability of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSpec {
    /// Path segment, `PATCH /<path>/{id}`
    pub path: &'static str,
    /// Multipart field name, repeated once per file
    pub field: &'static str,
    pub max_files: usize,
    /// Exactly `max_files` must be sent
    pub exact: bool,
}

impl UploadSpec {
    /// Check a file count against this capability
    pub fn check_count(&self, count: usize) -> Result<(), ValidationError> {
        if count == 0 {
            return Err(ValidationError::new("Please select files to upload"));
        }
        if self.exact && count != self.max_files {
            return Err(ValidationError::new(format!(
                "Exactly {} file required",
                self.max_files
            )));
        }
        if count > self.max_files {
            return Err(ValidationError::new(format!(
                "Maximum {} files allowed",
                self.max_files
            )));
        }
        Ok(())
    }
}

/// Capability set of a CRUD-managed catalog resource
pub trait Resource: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Full-record body for create/update
    type Payload: Serialize + Clone + fmt::Debug + PartialEq + Send + Sync + 'static;

    const KIND: ResourceKind;
    /// REST collection path, e.g. `product`
    const PATH: &'static str;
    /// `None` when the resource has no image endpoint
    const UPLOAD: Option<UploadSpec>;
    /// Resource that payloads reference through [`Resource::payload_parent_id`]
    const PARENT: Option<ResourceKind>;

    fn id(&self) -> i64;

    /// Primary name field, matched by the search filter
    fn name(&self) -> &str;

    fn to_payload(&self) -> Self::Payload;

    /// Field-level checks on a payload (required fields, formats)
    fn validate(payload: &Self::Payload) -> Result<(), ValidationError>;

    /// Foreign key the payload points at, if any
    fn payload_parent_id(payload: &Self::Payload) -> Option<i64>;

    fn payload_name(payload: &Self::Payload) -> &str;

    /// Editable form fields, in display order
    fn form_fields() -> &'static [FieldDef];

    /// Current values for [`Resource::form_fields`], used to pre-fill edit dialogs
    fn form_values(&self) -> Vec<String>;

    /// Parse form values (same order as [`Resource::form_fields`]) into a payload
    fn payload_from_form(values: &[String]) -> Result<Self::Payload, ValidationError>;

    fn columns() -> &'static [ColumnDef];

    /// Cell text for [`Resource::columns`]
    fn row(&self) -> Vec<String>;

    /// Child resource reachable from a selected row
    fn sub_resource() -> Option<&'static SubResourceDef> {
        None
    }

    /// Fetch the list shown in this resource's table
    fn load(
        client: &CatalogClient,
        filter: &ListFilter,
    ) -> impl Future<Output = Result<Vec<Self>, FetchError>> + Send;
}
