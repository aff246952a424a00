use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{check_path, BlobError, BlobStore, UploadOptions};

struct StoredBlob {
    content: String,
    content_type: String,
}

/// BTreeMap-backed blob store for testing and development.
#[derive(Clone)]
pub struct InMemoryBlobStore {
    bucket: String,
    objects: Arc<RwLock<BTreeMap<String, StoredBlob>>>,
}

impl InMemoryBlobStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Content type recorded for `path`, if the object exists.
    pub fn content_type(&self, path: &str) -> Option<String> {
        let objects = self.objects.read().ok()?;
        objects.get(path).map(|blob| blob.content_type.clone())
    }

    fn poisoned() -> BlobError {
        BlobError::Storage("lock poisoned".into())
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, BlobError> {
        let objects = self.objects.read().map_err(|_| Self::poisoned())?;
        Ok(objects
            .keys()
            .filter(|path| path.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn download(&self, path: &str) -> Result<String, BlobError> {
        let path = check_path(path)?;
        let objects = self.objects.read().map_err(|_| Self::poisoned())?;
        objects
            .get(path)
            .map(|blob| blob.content.clone())
            .ok_or_else(|| BlobError::NotFound {
                bucket: self.bucket.clone(),
                path: path.to_string(),
            })
    }

    async fn upload(
        &self,
        path: &str,
        content: String,
        options: UploadOptions,
    ) -> Result<(), BlobError> {
        let path = check_path(path)?;
        let mut objects = self.objects.write().map_err(|_| Self::poisoned())?;
        if !options.upsert && objects.contains_key(path) {
            return Err(BlobError::Conflict {
                bucket: self.bucket.clone(),
                path: path.to_string(),
            });
        }
        objects.insert(
            path.to_string(),
            StoredBlob {
                content,
                content_type: options.content_type,
            },
        );
        Ok(())
    }
}
