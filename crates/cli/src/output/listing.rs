//! Directory listing rendering

use comfy_table::{presets, CellAlignment, Table};
use s3b_core::DirEntry;

/// Width of the name column in the short listing
const NAME_WIDTH: usize = 30;

fn size_column(entry: &DirEntry) -> String {
    match entry.size() {
        Some(size) => humansize::format_size(size, humansize::BINARY),
        None => "<dir>".to_string(),
    }
}

fn display_name(entry: &DirEntry) -> String {
    if entry.is_dir() {
        format!("{}/", entry.name())
    } else {
        entry.name().to_string()
    }
}

fn date_column(entry: &DirEntry) -> String {
    entry
        .last_modified()
        .map(|d| d.strftime("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Render a listing as printable lines
///
/// `limit` truncates the output with a hint to run `l` for the full list.
/// `long` adds the last-modified column.
pub fn render_listing(entries: &[DirEntry], limit: Option<usize>, long: bool) -> Vec<String> {
    if entries.is_empty() {
        return vec!["  (directory is empty)".to_string()];
    }

    let shown = limit.unwrap_or(entries.len()).min(entries.len());
    let mut lines = vec![format!("({} items)", entries.len())];

    if long {
        let mut table = Table::new();
        table.load_preset(presets::NOTHING);
        for entry in &entries[..shown] {
            table.add_row(vec![display_name(entry), size_column(entry), date_column(entry)]);
        }
        if let Some(column) = table.column_mut(1) {
            column.set_cell_alignment(CellAlignment::Right);
        }
        lines.extend(table.lines());
    } else {
        lines.extend(entries[..shown].iter().map(|entry| {
            format!(
                "  {:width$} {:>10}",
                display_name(entry),
                size_column(entry),
                width = NAME_WIDTH
            )
        }));
    }

    if shown < entries.len() {
        lines.push("  ...".to_string());
        lines.push("  (command 'l' to see the full list)".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<DirEntry> {
        vec![
            DirEntry::subdirectory("img"),
            DirEntry::object("readme.txt", 10, None),
            DirEntry::object("video.mp4", 3 * 1024 * 1024, None),
        ]
    }

    #[test]
    fn test_empty_directory() {
        assert_eq!(render_listing(&[], None, false), ["  (directory is empty)"]);
    }

    #[test]
    fn test_short_listing_columns() {
        let lines = render_listing(&entries(), None, false);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "(3 items)");
        assert_eq!(lines[1], format!("  {:30} {:>10}", "img/", "<dir>"));
        assert_eq!(lines[2], format!("  {:30} {:>10}", "readme.txt", "10 B"));
        assert_eq!(lines[3], format!("  {:30} {:>10}", "video.mp4", "3 MiB"));
    }

    #[test]
    fn test_truncated_listing() {
        let lines = render_listing(&entries(), Some(1), false);
        assert_eq!(lines[0], "(3 items)");
        assert!(lines[1].starts_with("  img/"));
        assert_eq!(&lines[2..], ["  ...", "  (command 'l' to see the full list)"]);
    }

    #[test]
    fn test_long_listing_has_dates() {
        let ts: jiff::Timestamp = "2024-05-06T07:08:09Z".parse().unwrap();
        let entries = vec![DirEntry::object("a.txt", 1, Some(ts))];
        let lines = render_listing(&entries, None, true);
        assert_eq!(lines[0], "(1 items)");
        assert!(lines[1].contains("a.txt"));
        assert!(lines[1].contains("1 B"));
        assert!(lines[1].contains("2024-05-06 07:08:09"));
    }
}
