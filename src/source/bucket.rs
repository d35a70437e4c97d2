//! Bucket source parsed from a URL (S3 or local filesystem)

use crate::error::{Error, Result};
use crate::types::JsonValue;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectMeta, ObjectStore};
use std::sync::Arc;

/// Source bucket parsed from a URL
#[derive(Debug, Clone)]
pub struct BucketSource {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Key prefix within the bucket
    prefix: Option<ObjectPath>,
    /// Original URL scheme for logging
    scheme: String,
}

impl BucketSource {
    /// Parse a source URL and create the appropriate object store
    ///
    /// Supported formats:
    /// - `s3://bucket/prefix/` - AWS S3 (credentials from environment)
    /// - `/local/path/` or `./path/` - Local filesystem
    pub fn parse(url: &str) -> Result<Self> {
        if url.starts_with("s3://") {
            Self::parse_s3(url)
        } else {
            Self::parse_local(url)
        }
    }

    /// Parse an S3 URL
    fn parse_s3(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("s3://")
            .ok_or_else(|| Error::config(format!("Invalid s3 URL: {url}")))?;

        let (bucket, prefix) = match without_scheme.find('/') {
            Some(idx) => (
                &without_scheme[..idx],
                without_scheme[idx + 1..].trim_end_matches('/'),
            ),
            None => (without_scheme, ""),
        };

        if bucket.is_empty() {
            return Err(Error::config(format!("Missing bucket name in URL: {url}")));
        }

        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: (!prefix.is_empty()).then(|| ObjectPath::from(prefix)),
            scheme: "s3".to_string(),
        })
    }

    /// Parse a local filesystem path
    fn parse_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to open local store {path}: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: None,
            scheme: "file".to_string(),
        })
    }

    /// Check if this is a cloud source (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Get the scheme (s3, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// List every object under the source prefix, sorted by key.
    ///
    /// Sorting makes runs deterministic; object stores do not guarantee a
    /// listing order across providers.
    pub async fn list_objects(&self) -> Result<Vec<ObjectMeta>> {
        let mut objects: Vec<ObjectMeta> = self
            .store
            .list(self.prefix.as_ref())
            .try_collect()
            .await
            .map_err(|e| Error::storage(format!("Failed to list bucket: {e}")))?;

        objects.sort_by(|a, b| a.location.as_ref().cmp(b.location.as_ref()));
        Ok(objects)
    }

    /// Fetch one object and parse it as a JSON payload
    pub async fn fetch_payload(&self, key: &ObjectPath) -> Result<JsonValue> {
        let bytes = self
            .store
            .get(key)
            .await
            .map_err(|e| Error::storage(format!("Failed to fetch {key}: {e}")))?
            .bytes()
            .await
            .map_err(|e| Error::storage(format!("Failed to read {key}: {e}")))?;

        let payload: JsonValue = serde_json::from_slice(&bytes)?;
        Ok(payload)
    }
}

/// Filter a listing down to the keys ending in the literal suffix `.json`.
///
/// Everything else in the bucket is ignored.
pub fn filter_json_keys(objects: &[ObjectMeta]) -> Vec<ObjectPath> {
    objects
        .iter()
        .filter(|meta| meta.location.as_ref().ends_with(".json"))
        .map(|meta| meta.location.clone())
        .collect()
}
