//! tcat - terminal console for a product catalog REST API
//!
//! Categories, products and colors are listed, searched, created, edited,
//! deleted and given images through one generic CRUD layer.
//!
//! # Layers
//!
//! - [`api`] - HTTP gateway to the catalog service
//! - [`resource`] - Resource trait, per-table store, view state and CRUD controller
//! - [`app`] / [`event`] / [`ui`] - Terminal application state, key handling and rendering

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod modal;
pub mod model;
pub mod notification;
pub mod resource;
pub mod ui;

/// Version injected at compile time via TCAT_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("TCAT_VERSION") {
    Some(v) => v,
    None => "dev",
};
