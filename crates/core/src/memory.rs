//! In-memory object store
//!
//! A flat, sorted key map with S3 listing semantics: prefix filtering,
//! delimiter grouping into common prefixes, and paginated results. Used by
//! tests, and handy for trying the browser without a server.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use jiff::Timestamp;

use crate::error::{Error, Result};
use crate::traits::{DeleteResult, ListOptions, ListResult, ObjectInfo, ObjectStore};

const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    last_modified: Timestamp,
}

#[derive(Debug, Default)]
struct State {
    buckets: BTreeMap<String, BTreeMap<String, StoredObject>>,
    failing_keys: HashSet<String>,
    list_calls: usize,
}

/// An in-memory implementation of `ObjectStore`
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<State>,
    page_size: usize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Cap every list page at `page_size` entries, regardless of `max_keys`
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Create a bucket if missing
    pub fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.lock()?.buckets.entry(bucket.to_string()).or_default();
        Ok(())
    }

    /// Seed an object directly, creating the bucket if needed
    pub fn insert(&self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) -> Result<()> {
        let mut state = self.lock()?;
        state.buckets.entry(bucket.to_string()).or_default().insert(
            key.to_string(),
            StoredObject {
                data: data.into(),
                last_modified: Timestamp::now(),
            },
        );
        Ok(())
    }

    /// Make every write, read or delete of `key` fail
    pub fn fail_key(&self, key: &str) -> Result<()> {
        self.lock()?.failing_keys.insert(key.to_string());
        Ok(())
    }

    /// All keys currently stored in a bucket, sorted
    pub fn keys(&self, bucket: &str) -> Result<Vec<String>> {
        let state = self.lock()?;
        Ok(state
            .buckets
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default())
    }

    /// Number of `list_objects` requests served so far
    pub fn list_calls(&self) -> Result<usize> {
        Ok(self.lock()?.list_calls)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| Error::General("memory store lock poisoned".into()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn no_such_bucket(bucket: &str) -> Error {
    Error::StoreUnavailable(format!("NoSuchBucket: {bucket}"))
}

fn check_key(state: &State, key: &str) -> Result<()> {
    if state.failing_keys.contains(key) {
        return Err(Error::StoreUnavailable(format!("injected failure for {key}")));
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_buckets(&self) -> Result<Vec<ObjectInfo>> {
        let state = self.lock()?;
        Ok(state.buckets.keys().map(ObjectInfo::bucket).collect())
    }

    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListResult> {
        let mut state = self.lock()?;
        state.list_calls += 1;
        let objects = state.buckets.get(bucket).ok_or_else(|| no_such_bucket(bucket))?;

        let prefix = options.prefix.unwrap_or_default();
        let delimiter = options.delimiter.filter(|d| !d.is_empty());
        let limit = options
            .max_keys
            .map_or(self.page_size, |m| (m.max(1) as usize).min(self.page_size));

        // Entries are keyed by the string S3 orders them by: the object key, or
        // the common prefix that swallowed it.
        let mut seen_prefixes = BTreeSet::new();
        let mut entries: Vec<ObjectInfo> = Vec::new();
        for (key, object) in objects.range(prefix.clone()..) {
            let Some(rest) = key.strip_prefix(prefix.as_str()) else {
                break;
            };
            if let Some(delim) = delimiter.as_deref() {
                if let Some(pos) = rest.find(delim) {
                    let common = format!("{prefix}{}", &rest[..pos + delim.len()]);
                    if seen_prefixes.insert(common.clone()) {
                        entries.push(ObjectInfo::dir(common));
                    }
                    continue;
                }
            }
            entries.push(
                ObjectInfo::file(key.clone(), object.data.len() as i64)
                    .with_last_modified(object.last_modified),
            );
        }

        let start = match options.continuation_token.as_deref() {
            Some(token) => entries.partition_point(|e| e.key.as_str() <= token),
            None => 0,
        };
        let page: Vec<ObjectInfo> = entries.iter().skip(start).take(limit).cloned().collect();
        let truncated = start + page.len() < entries.len();
        let continuation_token = if truncated {
            page.last().map(|e| e.key.clone())
        } else {
            None
        };

        Ok(ListResult {
            items: page,
            truncated,
            continuation_token,
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let state = self.lock()?;
        check_key(&state, key)?;
        let objects = state.buckets.get(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        objects
            .get(key)
            .map(|o| o.data.clone())
            .ok_or_else(|| Error::NoSuchRemoteFile(key.to_string()))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        _content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        let mut state = self.lock()?;
        check_key(&state, key)?;
        let objects = state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;
        let now = Timestamp::now();
        let info = ObjectInfo::file(key, data.len() as i64).with_last_modified(now);
        objects.insert(
            key.to_string(),
            StoredObject {
                data,
                last_modified: now,
            },
        );
        Ok(info)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let mut state = self.lock()?;
        check_key(&state, key)?;
        let objects = state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;
        // S3 deletes are idempotent
        objects.remove(key);
        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<DeleteResult> {
        let mut state = self.lock()?;
        let failing = state.failing_keys.clone();
        let objects = state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;

        let mut result = DeleteResult::default();
        for key in keys {
            if failing.contains(&key) {
                result.failed.push((key, "AccessDenied".to_string()));
            } else {
                objects.remove(&key);
                result.deleted.push(key);
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert("b", "docs/readme.txt", "0123456789").unwrap();
        store.insert("b", "docs/img/", "").unwrap();
        store.insert("b", "images/logo.png", vec![0u8; 500]).unwrap();
        store.insert("b", "top.txt", "x").unwrap();
        store
    }

    fn delimited(prefix: &str) -> ListOptions {
        ListOptions {
            prefix: Some(prefix.to_string()),
            delimiter: Some("/".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_delimiter_groups_common_prefixes() {
        let store = seeded();
        let page = store.list_objects("b", delimited("")).await.unwrap();
        let keys: Vec<_> = page.items.iter().map(|i| (i.key.as_str(), i.is_dir)).collect();
        assert_eq!(
            keys,
            [("docs/", true), ("images/", true), ("top.txt", false)]
        );
        assert!(!page.truncated);
    }

    #[tokio::test]
    async fn test_recursive_listing() {
        let store = seeded();
        let options = ListOptions {
            prefix: Some("docs/".to_string()),
            ..Default::default()
        };
        let page = store.list_objects("b", options).await.unwrap();
        let keys: Vec<_> = page.items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["docs/img/", "docs/readme.txt"]);
    }

    #[tokio::test]
    async fn test_pagination_tokens() {
        let store = seeded().with_page_size(2);
        let first = store.list_objects("b", delimited("")).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert!(first.truncated);
        assert_eq!(first.continuation_token.as_deref(), Some("images/"));

        let second = store
            .list_objects(
                "b",
                ListOptions {
                    continuation_token: first.continuation_token,
                    ..delimited("")
                },
            )
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].key, "top.txt");
        assert!(!second.truncated);
        assert!(second.continuation_token.is_none());
    }

    #[tokio::test]
    async fn test_missing_bucket_is_store_error() {
        let store = MemoryStore::new();
        let err = store.list_objects("nope", delimited("")).await.unwrap_err();
        assert!(err.is_store_error());
    }

    #[tokio::test]
    async fn test_bulk_delete_reports_failures() {
        let store = seeded();
        store.fail_key("top.txt").unwrap();
        let result = store
            .delete_objects("b", vec!["docs/img/".into(), "top.txt".into()])
            .await
            .unwrap();
        assert_eq!(result.deleted, ["docs/img/"]);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(
            store.keys("b").unwrap(),
            ["docs/readme.txt", "images/logo.png", "top.txt"]
        );
    }
}
