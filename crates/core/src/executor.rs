//! Operation executor
//!
//! Upload, download, mkdir and delete against the navigator's current
//! directory. Batches run item by item; one item's failure is recorded in the
//! [`Report`] and never stops its siblings. Destructive operations ask an
//! injected [`Confirm`] first.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::entry::{find_entry, DirEntry, EntryKind};
use crate::error::{Error, Result};
use crate::navigator::Navigator;
use crate::path::validate_segment;
use crate::resolver::resolve;

/// Maximum keys per bulk delete request (S3 limit)
pub const DELETE_BATCH_SIZE: usize = 1000;

/// Asks the user to approve a destructive action
pub trait Confirm {
    /// Return true to proceed
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Which operation produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Download,
    Mkdir,
    /// Deletion of one file or a glob batch of files
    Delete,
    /// Recursive deletion of a directory prefix
    DeleteDirectory,
}

/// One item that could not be processed
#[derive(Debug)]
pub struct Failure {
    /// Key or local path the item refers to
    pub target: String,
    pub error: Error,
}

/// Aggregate outcome of an operation
#[derive(Debug)]
pub struct Report {
    pub operation: Operation,
    /// Keys or local paths processed successfully
    pub succeeded: Vec<String>,
    pub failed: Vec<Failure>,
    /// Count shown to the user; for directory deletes only non-empty objects
    pub counted: usize,
    /// The user declined the confirmation prompt
    pub cancelled: bool,
    /// Re-listing the directory after the mutation failed; the items above
    /// were still processed
    pub refresh_error: Option<Error>,
}

impl Report {
    fn new(operation: Operation) -> Self {
        Self {
            operation,
            succeeded: Vec::new(),
            failed: Vec::new(),
            counted: 0,
            cancelled: false,
            refresh_error: None,
        }
    }

    fn cancelled(operation: Operation) -> Self {
        Self {
            cancelled: true,
            ..Self::new(operation)
        }
    }

    fn success(&mut self, target: String) {
        self.succeeded.push(target);
        self.counted += 1;
    }

    fn failure(&mut self, target: String, error: Error) {
        warn!(target = %target, error = %error, "operation item failed");
        self.failed.push(Failure { target, error });
    }

    pub fn is_complete_success(&self) -> bool {
        !self.cancelled && self.failed.is_empty()
    }
}

/// Re-list after a mutation; a failure is kept on the report, not returned
async fn refresh_after(navigator: &mut Navigator, report: &mut Report) {
    if let Err(e) = navigator.refresh().await {
        warn!(path = %navigator.current_path(), error = %e, "listing not refreshed after mutation");
        report.refresh_error = Some(e);
    }
}

/// Runs mutating and transfer operations for one navigator
#[derive(Debug)]
pub struct Executor<'a> {
    navigator: &'a mut Navigator,
    local_dir: PathBuf,
}

impl<'a> Executor<'a> {
    pub fn new(navigator: &'a mut Navigator) -> Self {
        Self {
            navigator,
            local_dir: PathBuf::from("."),
        }
    }

    /// Resolve relative local paths against `dir` instead of the working directory
    pub fn with_local_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_dir = dir.into();
        self
    }

    /// Upload local files matching `local_pattern` into the current directory
    pub async fn upload(&mut self, local_pattern: &str, remote_name: Option<&str>) -> Result<Report> {
        let sources = self.expand_local(local_pattern);
        if sources.is_empty() {
            return Err(Error::NoSuchLocalFile(local_pattern.to_string()));
        }
        if sources.len() > 1 && remote_name.is_some() {
            return Err(Error::AmbiguousRename("remote_name".into()));
        }
        if let Some(name) = remote_name {
            validate_remote_name(name)?;
        }

        let mut report = Report::new(Operation::Upload);
        for source in sources {
            let name = match remote_name {
                Some(name) => name.to_string(),
                None => basename(&source),
            };
            let key = self.navigator.current_path().key_for(&name);
            match self.upload_one(&source, &key).await {
                Ok(()) => report.success(key),
                Err(e) => report.failure(source.display().to_string(), e),
            }
        }

        refresh_after(&mut *self.navigator, &mut report).await;
        Ok(report)
    }

    async fn upload_one(&self, source: &Path, key: &str) -> Result<()> {
        let data = std::fs::read(source)?;
        let content_type = mime_guess::from_path(source)
            .first()
            .map(|m| m.essence_str().to_string());
        let lister = self.navigator.lister();
        debug!(source = %source.display(), key, size = data.len(), "uploading");
        lister
            .store()
            .put_object(lister.bucket(), key, data, content_type)
            .await?;
        Ok(())
    }

    /// Download files matching `pattern` from the current directory
    pub async fn download(&mut self, pattern: &str, local_name: Option<&str>) -> Result<Report> {
        let resolution = resolve(self.navigator.listing(), pattern, EntryKind::File);
        if resolution.is_empty() {
            return Err(Error::NoSuchRemoteFile(pattern.to_string()));
        }
        if resolution.len() > 1 && local_name.is_some() {
            return Err(Error::AmbiguousRename("local_name".into()));
        }

        let mut report = Report::new(Operation::Download);
        for entry in resolution.into_entries() {
            let key = self.navigator.current_path().key_for(entry.name());
            let destination = self.local_destination(entry.name(), local_name);
            match self.download_one(&key, &destination).await {
                Ok(()) => report.success(destination.display().to_string()),
                Err(e) => report.failure(key, e),
            }
        }
        Ok(report)
    }

    async fn download_one(&self, key: &str, destination: &Path) -> Result<()> {
        let lister = self.navigator.lister();
        let data = lister.store().get_object(lister.bucket(), key).await?;
        debug!(key, destination = %destination.display(), size = data.len(), "downloaded");
        std::fs::write(destination, data)?;
        Ok(())
    }

    /// Create an empty directory marker in the current directory
    pub async fn mkdir(&mut self, name: &str) -> Result<Report> {
        let name = name.strip_suffix('/').unwrap_or(name);
        validate_segment(name)?;

        let target = self.navigator.current_path().child(name)?;
        let listed = find_entry(self.navigator.listing(), name, EntryKind::Directory).is_some();
        if listed || self.navigator.lister().exists(&target).await? {
            return Err(Error::AlreadyExists(format!("{name}/")));
        }

        let lister = self.navigator.lister();
        lister
            .store()
            .put_object(lister.bucket(), target.as_str(), Vec::new(), None)
            .await?;

        let mut report = Report::new(Operation::Mkdir);
        report.success(target.as_str().to_string());
        refresh_after(&mut *self.navigator, &mut report).await;
        Ok(report)
    }

    /// Delete a file, a directory (recursively), or a glob of files
    ///
    /// Names resolve as an exact file first, then an exact directory, then a
    /// glob over files.
    pub async fn delete(&mut self, name: &str, confirm: &mut dyn Confirm) -> Result<Report> {
        let listing = self.navigator.listing();

        let mut report = if let Some(file) = find_entry(listing, name, EntryKind::File).cloned() {
            let prompt = format!("Are you sure you want to delete {name}? (y/n) ");
            if !confirm.confirm(&prompt) {
                return Ok(Report::cancelled(Operation::Delete));
            }
            self.delete_files(&[file]).await
        } else if let Some(dir) = find_directory(listing, name) {
            let prompt =
                format!("'{dir}/' is a directory. Are you sure you want to delete it? (y/n) ");
            if !confirm.confirm(&prompt) {
                return Ok(Report::cancelled(Operation::DeleteDirectory));
            }
            self.delete_directory(&dir).await?
        } else {
            let matches = resolve(listing, name, EntryKind::File).into_entries();
            if matches.is_empty() {
                return Err(Error::NoSuchFile(name.to_string()));
            }
            let prompt = format!(
                "Are you sure you want to delete {} file(s)? (y/n) ",
                matches.len()
            );
            if !confirm.confirm(&prompt) {
                return Ok(Report::cancelled(Operation::Delete));
            }
            self.delete_files(&matches).await
        };

        if !report.succeeded.is_empty() {
            refresh_after(&mut *self.navigator, &mut report).await;
        }
        Ok(report)
    }

    async fn delete_files(&self, entries: &[DirEntry]) -> Report {
        let lister = self.navigator.lister();
        let mut report = Report::new(Operation::Delete);
        for entry in entries {
            let key = self.navigator.current_path().key_for(entry.name());
            match lister.store().delete_object(lister.bucket(), &key).await {
                Ok(()) => report.success(key),
                Err(e) => report.failure(key, e),
            }
        }
        report
    }

    async fn delete_directory(&self, name: &str) -> Result<Report> {
        let lister = self.navigator.lister();
        let prefix = self.navigator.current_path().child(name)?;
        let objects = lister.list_recursive(&prefix).await?;
        if objects.is_empty() {
            return Err(Error::NoSuchFile(format!("{name}/")));
        }
        debug!(prefix = %prefix, keys = objects.len(), "deleting directory");

        let mut report = Report::new(Operation::DeleteDirectory);
        for chunk in objects.chunks(DELETE_BATCH_SIZE) {
            let keys: Vec<String> = chunk.iter().map(|o| o.key.clone()).collect();
            match lister.store().delete_objects(lister.bucket(), keys).await {
                Ok(result) => {
                    for key in result.deleted {
                        let non_empty = chunk.iter().any(|o| o.key == key && o.size() > 0);
                        report.succeeded.push(key);
                        if non_empty {
                            report.counted += 1;
                        }
                    }
                    for (key, reason) in result.failed {
                        report.failure(key, Error::StoreUnavailable(reason));
                    }
                }
                Err(e) => {
                    let reason = e.to_string();
                    for object in chunk {
                        report.failure(object.key.clone(), Error::StoreUnavailable(reason.clone()));
                    }
                }
            }
        }
        Ok(report)
    }

    fn expand_local(&self, pattern: &str) -> Vec<PathBuf> {
        let literal = self.local_dir.join(pattern);
        if literal.is_file() {
            return vec![literal];
        }

        let full_pattern = literal.to_string_lossy().into_owned();
        match glob::glob(&full_pattern) {
            Ok(paths) => paths
                .filter_map(|p| match p {
                    Ok(path) => Some(path),
                    Err(e) => {
                        warn!(error = %e, "skipping unreadable local path");
                        None
                    }
                })
                .filter(|p| p.is_file())
                .collect(),
            Err(e) => {
                debug!(pattern, error = %e, "invalid local glob");
                Vec::new()
            }
        }
    }

    fn local_destination(&self, remote_name: &str, local_name: Option<&str>) -> PathBuf {
        match local_name {
            Some(name) => {
                let path = self.local_dir.join(name);
                if path.is_dir() {
                    path.join(remote_name)
                } else {
                    path
                }
            }
            None => self.local_dir.join(remote_name),
        }
    }
}

/// Find a subdirectory by `name` or by `name` without its trailing `/`
fn find_directory(listing: &[DirEntry], name: &str) -> Option<String> {
    std::iter::once(name)
        .chain(name.strip_suffix('/'))
        .find_map(|candidate| find_entry(listing, candidate, EntryKind::Directory))
        .map(|e| e.name().to_string())
}

fn validate_remote_name(name: &str) -> Result<()> {
    if name.is_empty() || name.ends_with('/') || name.split('/').any(str::is_empty) {
        return Err(Error::InvalidPath(format!("'{name}' is not a valid object name")));
    }
    Ok(())
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
