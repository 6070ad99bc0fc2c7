//! Navigator
//!
//! Holds the session's current directory and its cached listing. The listing
//! is always a fresh query of the store, never a persistent tree: it is
//! refetched on every `cd` and after every mutation.

use tracing::{debug, info};

use crate::entry::{find_entry, DirEntry, EntryKind};
use crate::error::{Error, Result};
use crate::lister::KeyLister;
use crate::path::DirPath;

/// Current path plus its listing, bound to one bucket
#[derive(Debug)]
pub struct Navigator {
    lister: KeyLister,
    current: DirPath,
    listing: Vec<DirEntry>,
}

impl Navigator {
    /// Start at the bucket root with an initial listing
    pub async fn open(lister: KeyLister) -> Result<Self> {
        let mut navigator = Self {
            lister,
            current: DirPath::root(),
            listing: Vec::new(),
        };
        navigator.refresh().await?;
        info!(bucket = navigator.bucket(), "opened bucket");
        Ok(navigator)
    }

    pub fn bucket(&self) -> &str {
        self.lister.bucket()
    }

    pub fn lister(&self) -> &KeyLister {
        &self.lister
    }

    pub fn current_path(&self) -> &DirPath {
        &self.current
    }

    /// Listing of the current path as of the last refresh
    pub fn listing(&self) -> &[DirEntry] {
        &self.listing
    }

    /// Re-fetch the listing of the current path
    pub async fn refresh(&mut self) -> Result<()> {
        self.listing = self.lister.list_children(&self.current).await?;
        debug!(path = %self.current, entries = self.listing.len(), "refreshed listing");
        Ok(())
    }

    /// Change directory
    ///
    /// Accepts `..`, `~` or `/` for root, a listed subdirectory name, or any
    /// relative path that exists in the bucket. A single trailing `/` is
    /// ignored. On failure the current path is left unchanged.
    pub async fn cd(&mut self, name: &str) -> Result<()> {
        let target = self.resolve_target(name).await?;
        if target == self.current {
            // `..` at root is a no-op, but still picks up external changes
            return self.refresh().await;
        }

        let listing = self.lister.list_children(&target).await?;
        debug!(from = %self.current, to = %target, "changed directory");
        self.current = target;
        self.listing = listing;
        Ok(())
    }

    async fn resolve_target(&self, name: &str) -> Result<DirPath> {
        match name {
            ".." | "../" => Ok(self.current.parent().unwrap_or_default()),
            "~" | "/" | "~/" => Ok(DirPath::root()),
            _ => {
                let trimmed = name.strip_suffix('/').unwrap_or(name);
                if find_entry(&self.listing, trimmed, EntryKind::Directory).is_some() {
                    return self.current.child(trimmed);
                }
                let target = self
                    .current
                    .join(trimmed)
                    .map_err(|_| Error::NoSuchDirectory(name.to_string()))?;
                if self.lister.exists(&target).await? {
                    Ok(target)
                } else {
                    Err(Error::NoSuchDirectory(name.to_string()))
                }
            }
        }
    }
}
