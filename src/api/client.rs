//! Catalog API client
//!
//! Endpoint layer over [`ApiHttpClient`]. Every resource shares the same
//! REST shape, so the CRUD calls are generic over [`Resource`]; the path
//! segments and upload field names come from the resource's definition.

use super::http::ApiHttpClient;
use crate::error::FetchError;
use crate::model::{Category, ListFilter};
use crate::resource::{Resource, UploadSpec};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

/// Image file staged for a multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    fn into_part(self) -> Result<Part, FetchError> {
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)
            .map_err(|e| FetchError::transport(format!("Invalid MIME type: {}", e)))
    }
}

/// Main catalog client
#[derive(Clone)]
pub struct CatalogClient {
    pub http: ApiHttpClient,
}

impl CatalogClient {
    /// Create a new client for the API at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            http: ApiHttpClient::new(base_url, timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    // =========================================================================
    // Generic resource endpoints
    // =========================================================================

    /// `GET /<resource>?<filter>`
    pub async fn list<R: Resource>(&self, filter: &ListFilter) -> Result<Vec<R>, FetchError> {
        self.http.get(R::PATH, filter).await
    }

    /// `GET /<resource>/{id}`
    pub async fn get<R: Resource>(&self, id: i64) -> Result<R, FetchError> {
        self.http.get(&item_path(R::PATH, id), &ListFilter::new()).await
    }

    /// `POST /<resource>`
    pub async fn create<R: Resource>(&self, payload: &R::Payload) -> Result<Value, FetchError> {
        self.http.post(R::PATH, payload).await
    }

    /// `PUT /<resource>/{id}`
    pub async fn update<R: Resource>(&self, id: i64, payload: &R::Payload) -> Result<Value, FetchError> {
        self.http.put(&item_path(R::PATH, id), payload).await
    }

    /// `DELETE /<resource>/{id}`
    pub async fn delete<R: Resource>(&self, id: i64) -> Result<(), FetchError> {
        self.http.delete(&item_path(R::PATH, id)).await
    }

    /// `PATCH /<upload path>/{id}` with one multipart part per file.
    ///
    /// Callers validate file counts first; this only sends.
    pub async fn upload_images<R: Resource>(
        &self,
        id: i64,
        files: Vec<UploadFile>,
    ) -> Result<Value, FetchError> {
        let Some(spec) = R::UPLOAD else {
            return Err(FetchError::transport(format!(
                "{} does not accept image uploads",
                R::KIND.display_name()
            )));
        };
        self.upload_with(&spec, id, files).await
    }

    async fn upload_with(
        &self,
        spec: &UploadSpec,
        id: i64,
        files: Vec<UploadFile>,
    ) -> Result<Value, FetchError> {
        let mut form = Form::new();
        for file in files {
            form = form.part(spec.field, file.into_part()?);
        }
        self.http.patch_multipart(&item_path(spec.path, id), form).await
    }

    // =========================================================================
    // Joined view
    // =========================================================================

    /// `GET /all` - categories with their products nested
    pub async fn fetch_all(&self) -> Result<Vec<Category>, FetchError> {
        self.http.get("all", &ListFilter::new()).await
    }
}

fn item_path(base: &str, id: i64) -> String {
    format!("{}/{}", base, id)
}
