//! Directory entries
//!
//! One level of a virtual directory is a list of [`DirEntry`] values derived
//! from a delimited listing. Subdirectories and objects are distinct variants.

use jiff::Timestamp;

/// Which kind of entry a command operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Common-prefix groupings
    Directory,
    /// Leaf objects
    File,
}

/// An immediate child of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirEntry {
    /// At least one key exists under `<path><name>/`
    Subdirectory { name: String },
    /// The object `<path><name>`
    Object {
        name: String,
        size: u64,
        last_modified: Option<Timestamp>,
    },
}

impl DirEntry {
    pub fn subdirectory(name: impl Into<String>) -> Self {
        DirEntry::Subdirectory { name: name.into() }
    }

    pub fn object(name: impl Into<String>, size: u64, last_modified: Option<Timestamp>) -> Self {
        DirEntry::Object {
            name: name.into(),
            size,
            last_modified,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DirEntry::Subdirectory { name } | DirEntry::Object { name, .. } => name,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            DirEntry::Subdirectory { .. } => EntryKind::Directory,
            DirEntry::Object { .. } => EntryKind::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == EntryKind::Directory
    }

    /// Object size; `None` for subdirectories
    pub fn size(&self) -> Option<u64> {
        match self {
            DirEntry::Subdirectory { .. } => None,
            DirEntry::Object { size, .. } => Some(*size),
        }
    }

    pub fn last_modified(&self) -> Option<Timestamp> {
        match self {
            DirEntry::Subdirectory { .. } => None,
            DirEntry::Object { last_modified, .. } => *last_modified,
        }
    }
}

/// Sort a listing for display: subdirectories first, then by name
pub fn sort_entries(entries: &mut [DirEntry]) {
    entries.sort_by(|a, b| {
        b.is_dir()
            .cmp(&a.is_dir())
            .then_with(|| a.name().cmp(b.name()))
    });
}

/// Find an entry of the given kind by exact name
pub fn find_entry<'a>(entries: &'a [DirEntry], name: &str, kind: EntryKind) -> Option<&'a DirEntry> {
    entries
        .iter()
        .find(|e| e.kind() == kind && e.name() == name)
}
