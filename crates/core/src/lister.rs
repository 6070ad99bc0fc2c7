//! Key lister
//!
//! Turns the store's paginated, delimiter-grouped listing into the immediate
//! children of one virtual directory.

use std::sync::Arc;

use tracing::debug;

use crate::entry::{sort_entries, DirEntry};
use crate::error::Result;
use crate::path::DirPath;
use crate::traits::{ListOptions, ObjectInfo, ObjectStore};

/// Keys requested per list call
pub const DEFAULT_PAGE_SIZE: i32 = 1000;

/// How listing results are filtered into entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingPolicy {
    /// Show zero-length objects whose key does not end in `/`.
    ///
    /// Such keys are indistinguishable from directory placeholders in some
    /// tools and are hidden by default.
    pub show_empty_objects: bool,

    /// Keys requested per list call
    pub page_size: i32,
}

impl Default for ListingPolicy {
    fn default() -> Self {
        Self {
            show_empty_objects: false,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Lists one bucket through an [`ObjectStore`]
#[derive(Clone)]
pub struct KeyLister {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    policy: ListingPolicy,
}

impl std::fmt::Debug for KeyLister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyLister")
            .field("bucket", &self.bucket)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl KeyLister {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            policy: ListingPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ListingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Immediate children of `dir`, subdirectories first
    pub async fn list_children(&self, dir: &DirPath) -> Result<Vec<DirEntry>> {
        let items = self.fetch_all(dir.as_str(), Some("/")).await?;

        let mut entries = Vec::with_capacity(items.len());
        let mut hidden = 0usize;
        for item in items {
            let Some(rest) = dir.relative(&item.key) else {
                continue;
            };
            if item.is_dir {
                let name = rest.strip_suffix('/').unwrap_or(rest);
                // "a//b" style keys produce an empty segment nobody can cd into
                if name.is_empty() || name.contains('/') {
                    debug!(key = %item.key, "skipping unnavigable common prefix");
                    continue;
                }
                entries.push(DirEntry::subdirectory(name));
            } else if rest.is_empty() {
                // The directory's own marker
                continue;
            } else if item.size() > 0 || (self.policy.show_empty_objects && !rest.ends_with('/')) {
                entries.push(DirEntry::object(rest, item.size(), item.last_modified));
            } else {
                hidden += 1;
            }
        }
        if hidden > 0 {
            debug!(prefix = %dir, hidden, "hid zero-length objects from listing");
        }

        sort_entries(&mut entries);
        entries.dedup_by(|a, b| a.kind() == b.kind() && a.name() == b.name());
        Ok(entries)
    }

    /// True iff at least one key begins with `prefix`
    pub async fn exists(&self, prefix: &DirPath) -> Result<bool> {
        if prefix.is_root() {
            return Ok(true);
        }
        let options = ListOptions {
            prefix: Some(prefix.as_str().to_string()),
            max_keys: Some(1),
            ..Default::default()
        };
        let page = self.store.list_objects(&self.bucket, options).await?;
        Ok(!page.items.is_empty())
    }

    /// Every key under `prefix`, recursively, in key order
    pub async fn list_recursive(&self, prefix: &DirPath) -> Result<Vec<ObjectInfo>> {
        self.fetch_all(prefix.as_str(), None).await
    }

    async fn fetch_all(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
    ) -> Result<Vec<ObjectInfo>> {
        let mut items = Vec::new();
        let mut continuation_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let options = ListOptions {
                prefix: (!prefix.is_empty()).then(|| prefix.to_string()),
                delimiter: delimiter.map(str::to_string),
                max_keys: Some(self.policy.page_size),
                continuation_token: continuation_token.take(),
            };
            let page = self.store.list_objects(&self.bucket, options).await?;
            pages += 1;
            items.extend(page.items);

            match page.continuation_token {
                Some(token) if page.truncated => continuation_token = Some(token),
                _ => break,
            }
        }

        debug!(bucket = %self.bucket, prefix, pages, count = items.len(), "listed keys");
        Ok(items)
    }
}
