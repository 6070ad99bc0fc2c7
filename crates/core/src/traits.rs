//! ObjectStore trait definition
//!
//! This trait defines the interface for S3-compatible storage operations.
//! It keeps the browser decoupled from the specific S3 SDK implementation.

use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Metadata for an object, a common prefix, or a bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Full object key, common prefix, or bucket name
    pub key: String,

    /// Size in bytes (None for prefixes and buckets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,

    /// Last modified timestamp (creation date for buckets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,

    /// ETag (usually MD5 for single-part uploads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Storage class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// Whether this is a common prefix rather than an object
    pub is_dir: bool,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for an object
    pub fn file(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: Some(size),
            last_modified: None,
            etag: None,
            storage_class: None,
            is_dir: false,
        }
    }

    /// Create a new ObjectInfo for a common prefix
    pub fn dir(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size_bytes: None,
            last_modified: None,
            etag: None,
            storage_class: None,
            is_dir: true,
        }
    }

    /// Create a new ObjectInfo for a bucket
    pub fn bucket(name: impl Into<String>) -> Self {
        Self::dir(name)
    }

    /// Set the last modified timestamp
    pub fn with_last_modified(mut self, ts: Timestamp) -> Self {
        self.last_modified = Some(ts);
        self
    }

    /// Size in bytes, 0 for prefixes
    pub fn size(&self) -> u64 {
        self.size_bytes.unwrap_or(0).max(0) as u64
    }
}

/// One page of a list operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListResult {
    /// Common prefixes (`is_dir`) and objects, in key order
    pub items: Vec<ObjectInfo>,

    /// Whether more pages are available
    pub truncated: bool,

    /// Continuation token for the next page
    pub continuation_token: Option<String>,
}

/// Options for a single list request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    /// Prefix to filter by
    pub prefix: Option<String>,

    /// Delimiter for grouping (usually "/"); `None` lists recursively
    pub delimiter: Option<String>,

    /// Maximum number of keys to return per request
    pub max_keys: Option<i32>,

    /// Continuation token for pagination
    pub continuation_token: Option<String>,
}

/// Outcome of a bulk delete request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteResult {
    /// Keys the store confirmed as deleted
    pub deleted: Vec<String>,

    /// Keys the store refused, with its reason
    pub failed: Vec<(String, String)>,
}

/// Trait for S3-compatible storage operations
///
/// Implemented by the S3 adapter and by [`crate::MemoryStore`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List buckets visible to the credentials
    async fn list_buckets(&self) -> Result<Vec<ObjectInfo>>;

    /// Fetch one page of keys in a bucket
    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListResult>;

    /// Get object content as bytes
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Store an object, replacing any existing one with the same key
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo>;

    /// Delete one object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Delete up to 1000 objects in one request
    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<DeleteResult>;
}
