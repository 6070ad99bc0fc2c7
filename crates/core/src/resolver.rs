//! Pattern resolver
//!
//! Resolves a user-supplied name or shell glob against one directory listing.
//! An exact name always wins over glob expansion.

use glob::{MatchOptions, Pattern};

use crate::entry::{find_entry, DirEntry, EntryKind};

/// Entries selected by a name or pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Entry whose name equals the pattern
    pub exact: Option<DirEntry>,
    /// Glob matches in listing order; empty when `exact` is set
    pub glob: Vec<DirEntry>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.exact.is_none() && self.glob.is_empty()
    }

    /// Number of selected entries
    pub fn len(&self) -> usize {
        if self.exact.is_some() { 1 } else { self.glob.len() }
    }

    /// All selected entries
    pub fn into_entries(self) -> Vec<DirEntry> {
        match self.exact {
            Some(entry) => vec![entry],
            None => self.glob,
        }
    }
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Resolve `pattern` against entries of `kind` in `listing`
///
/// A pattern that is not a valid glob (e.g. an unclosed `[`) can still match
/// exactly, but never expands.
pub fn resolve(listing: &[DirEntry], pattern: &str, kind: EntryKind) -> Resolution {
    if let Some(entry) = find_entry(listing, pattern, kind) {
        return Resolution {
            exact: Some(entry.clone()),
            glob: Vec::new(),
        };
    }

    let glob = match Pattern::new(pattern) {
        Ok(compiled) => listing
            .iter()
            .filter(|e| e.kind() == kind && compiled.matches_with(e.name(), MATCH_OPTIONS))
            .cloned()
            .collect(),
        Err(e) => {
            tracing::debug!(pattern, error = %e, "not a valid glob");
            Vec::new()
        }
    };

    Resolution { exact: None, glob }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<DirEntry> {
        vec![
            DirEntry::subdirectory("archive"),
            DirEntry::object("a.txt", 1, None),
            DirEntry::object("abc.log", 3, None),
            DirEntry::object("b.txt", 2, None),
        ]
    }

    fn names(entries: &[DirEntry]) -> Vec<&str> {
        entries.iter().map(DirEntry::name).collect()
    }

    #[test]
    fn test_glob_star_over_files() {
        let res = resolve(&listing(), "a*", EntryKind::File);
        assert!(res.exact.is_none());
        assert_eq!(names(&res.glob), ["a.txt", "abc.log"]);
        assert_eq!(res.len(), 2);
    }

    #[test]
    fn test_exact_wins_over_glob() {
        let res = resolve(&listing(), "a.txt", EntryKind::File);
        assert_eq!(res.exact.as_ref().map(DirEntry::name), Some("a.txt"));
        assert!(res.glob.is_empty());
        assert_eq!(res.into_entries().len(), 1);
    }

    #[test]
    fn test_literal_name_with_glob_characters() {
        let mut entries = listing();
        entries.push(DirEntry::object("*.txt", 4, None));
        let res = resolve(&entries, "*.txt", EntryKind::File);
        assert_eq!(res.exact.as_ref().map(DirEntry::name), Some("*.txt"));
        assert!(res.glob.is_empty());
    }

    #[test]
    fn test_kind_filter() {
        let res = resolve(&listing(), "a*", EntryKind::Directory);
        assert_eq!(names(&res.glob), ["archive"]);

        let res = resolve(&listing(), "archive", EntryKind::File);
        assert!(res.is_empty());
    }

    #[test]
    fn test_question_mark_and_class() {
        let res = resolve(&listing(), "?.txt", EntryKind::File);
        assert_eq!(names(&res.glob), ["a.txt", "b.txt"]);

        let res = resolve(&listing(), "[b]*", EntryKind::File);
        assert_eq!(names(&res.glob), ["b.txt"]);
    }

    #[test]
    fn test_no_match_and_invalid_pattern() {
        assert!(resolve(&listing(), "*.csv", EntryKind::File).is_empty());
        assert!(resolve(&listing(), "[a", EntryKind::File).is_empty());
    }
}
