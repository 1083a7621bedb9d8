//! Catalog API interaction module
//!
//! # Module Structure
//!
//! - [`client`] - Endpoint layer: list/get/create/update/delete/upload per resource
//! - [`http`] - HTTP utilities: base URL handling, status checks, body decoding
//!
//! # Example
//!
//! ```ignore
//! use tcat::api::CatalogClient;
//! use tcat::model::{ListFilter, Product};
//!
//! async fn example() -> Result<(), tcat::error::FetchError> {
//!     let client = CatalogClient::new("http://localhost:8000", std::time::Duration::from_secs(30))?;
//!     let products: Vec<Product> = client.list(&ListFilter::by("categoryId", 1)).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;

pub use client::{CatalogClient, UploadFile};
