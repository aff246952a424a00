//! RestBlobStore - object storage over the hosted storage REST API.
//! Requires the `http` feature.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{check_path, BlobError, BlobStore, UploadOptions};

#[derive(Deserialize)]
struct ListedObject {
    name: String,
}

/// Blob store backed by `{url}/storage/v1`.
///
/// - `list`     → `POST /object/list/{bucket}` with `{ prefix }`
/// - `download` → `GET /object/{bucket}/{path}`
/// - `upload`   → `POST /object/{bucket}/{path}` with `x-upsert`
#[derive(Clone)]
pub struct RestBlobStore {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl RestBlobStore {
    pub fn new(url: &str, api_key: &str, bucket: impl Into<String>) -> Result<Self, BlobError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| BlobError::Connection(format!("invalid api key: {}", e)))?;
        let apikey = HeaderValue::from_str(api_key)
            .map_err(|e| BlobError::Connection(format!("invalid api key: {}", e)))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("apikey", apikey);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| BlobError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("{}/storage/v1", url.trim_end_matches('/')),
            bucket: bucket.into(),
        })
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/object/{}/{}", self.base_url, self.bucket, path)
    }

    async fn check(&self, path: &str, response: Response) -> Result<Response, BlobError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(BlobError::NotFound {
                bucket: self.bucket.clone(),
                path: path.to_string(),
            });
        }
        if status == StatusCode::CONFLICT {
            return Err(BlobError::Conflict {
                bucket: self.bucket.clone(),
                path: path.to_string(),
            });
        }
        Err(BlobError::Remote {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl BlobStore for RestBlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, BlobError> {
        // The listing API takes a folder prefix and returns names relative to it.
        let (folder, partial) = match prefix.rfind('/') {
            Some(i) => (&prefix[..i], &prefix[i + 1..]),
            None => ("", prefix),
        };
        let response = self
            .client
            .post(format!("{}/object/list/{}", self.base_url, self.bucket))
            .json(&json!({ "prefix": folder, "limit": 1000, "search": partial }))
            .send()
            .await
            .map_err(|e| BlobError::Connection(e.to_string()))?;
        let response = self.check(prefix, response).await?;
        let objects: Vec<ListedObject> = response.json().await.map_err(|e| BlobError::Remote {
            status: 200,
            message: format!("malformed listing: {}", e),
        })?;

        let mut names: Vec<String> = objects
            .into_iter()
            .map(|o| {
                if folder.is_empty() {
                    o.name
                } else {
                    format!("{}/{}", folder, o.name)
                }
            })
            .filter(|name| name.starts_with(prefix))
            .collect();
        names.sort();
        Ok(names)
    }

    async fn download(&self, path: &str) -> Result<String, BlobError> {
        let path = check_path(path)?;
        let response = self
            .client
            .get(self.object_url(path))
            .send()
            .await
            .map_err(|e| BlobError::Connection(e.to_string()))?;
        let response = self.check(path, response).await?;
        response
            .text()
            .await
            .map_err(|e| BlobError::Connection(e.to_string()))
    }

    async fn upload(
        &self,
        path: &str,
        content: String,
        options: UploadOptions,
    ) -> Result<(), BlobError> {
        let path = check_path(path)?;
        let response = self
            .client
            .post(self.object_url(path))
            .header(CONTENT_TYPE, options.content_type)
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(content)
            .send()
            .await
            .map_err(|e| BlobError::Connection(e.to_string()))?;
        self.check(path, response).await?;
        Ok(())
    }
}
