//! Blob store: named objects (XML artifacts) in one bucket.
//!
//! ```ignore
//! let blobs = InMemoryBlobStore::new("xml-storage");
//! blobs.upload("P1/roadmap.xml", xml, UploadOptions::xml()).await?;
//! let names = blobs.list("P1/").await?;
//! let content = blobs.download("P1/roadmap.xml").await?;
//! ```

mod in_memory;

#[cfg(feature = "http")]
mod rest;

use async_trait::async_trait;
use thiserror::Error;

pub use in_memory::InMemoryBlobStore;

#[cfg(feature = "http")]
pub use rest::RestBlobStore;

/// Bucket used when configuration names none.
pub const DEFAULT_BUCKET: &str = "xml-storage";

/// Options for `BlobStore::upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Overwrite an existing object instead of failing.
    pub upsert: bool,
    pub content_type: String,
}

impl UploadOptions {
    /// Overwriting upload of an XML document.
    pub fn xml() -> Self {
        Self {
            upsert: true,
            content_type: "application/xml".into(),
        }
    }
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            upsert: false,
            content_type: "application/octet-stream".into(),
        }
    }
}

/// Error type for blob store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlobError {
    #[error("object not found: {bucket}/{path}")]
    NotFound { bucket: String, path: String },
    #[error("object already exists: {bucket}/{path}")]
    Conflict { bucket: String, path: String },
    #[error("invalid object path: {0:?}")]
    InvalidPath(String),
    #[error("blob store error ({status}): {message}")]
    Remote { status: u16, message: String },
    #[error("blob store connection failed: {0}")]
    Connection(String),
    #[error("blob storage error: {0}")]
    Storage(String),
}

/// Object storage scoped to a single bucket.
#[async_trait]
pub trait BlobStore: Send + Sync {
    fn bucket(&self) -> &str;

    /// Object paths starting with `prefix`, sorted.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, BlobError>;

    async fn download(&self, path: &str) -> Result<String, BlobError>;

    async fn upload(
        &self,
        path: &str,
        content: String,
        options: UploadOptions,
    ) -> Result<(), BlobError>;
}

/// Reject empty paths and paths escaping the bucket.
pub(crate) fn check_path(path: &str) -> Result<&str, BlobError> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() || trimmed.split('/').any(|segment| segment == "..") {
        return Err(BlobError::InvalidPath(path.to_string()));
    }
    Ok(trimmed)
}
