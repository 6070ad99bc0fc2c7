//! Virtual directory paths
//!
//! A [`DirPath`] is a normalized key prefix: either empty (the bucket root) or
//! one or more non-empty segments, each followed by `/`.

use crate::error::{Error, Result};

/// A normalized prefix denoting a virtual directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DirPath {
    prefix: String,
}

impl DirPath {
    /// The bucket root
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a prefix, accepting an optional trailing `/`
    ///
    /// `"a/b"`, `"a/b/"` and `"/a/b/"` all yield `a/b/`. Empty segments
    /// (`"a//b"`) are rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim_start_matches('/');
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        let mut path = Self::root();
        if trimmed.is_empty() {
            return Ok(path);
        }
        for segment in trimmed.split('/') {
            path = path.child(segment)?;
        }
        Ok(path)
    }

    /// The prefix string, empty or ending in `/`
    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// Whether this is the bucket root
    pub fn is_root(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Iterate over the segments, outermost first
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.prefix.split_terminator('/')
    }

    /// Number of segments (0 at root)
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Name of the innermost segment, `None` at root
    pub fn name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Get the parent path (one level up); root has no parent
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let key = self.prefix.trim_end_matches('/');
        let prefix = match key.rfind('/') {
            Some(pos) => key[..=pos].to_string(),
            None => String::new(),
        };
        Some(Self { prefix })
    }

    /// Descend into a single child segment
    pub fn child(&self, segment: &str) -> Result<Self> {
        validate_segment(segment)?;
        Ok(Self {
            prefix: format!("{}{segment}/", self.prefix),
        })
    }

    /// Append a relative path of one or more segments (`"a/b"`)
    pub fn join(&self, relative: &str) -> Result<Self> {
        let relative = DirPath::parse(relative)?;
        Ok(Self {
            prefix: format!("{}{}", self.prefix, relative.prefix),
        })
    }

    /// Full object key for a leaf name in this directory
    pub fn key_for(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    /// Strip this prefix from a full key, returning the remainder
    pub fn relative<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.prefix.as_str())
    }
}

impl std::fmt::Display for DirPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.prefix)
    }
}

/// Check that a name can be used as one path segment
pub fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::InvalidPath("empty path segment".into()));
    }
    if segment.contains('/') {
        return Err(Error::InvalidPath(format!(
            "'{segment}' must not contain '/'"
        )));
    }
    Ok(())
}
