//! Output formatting utilities
//!
//! Colored status messages, directory listings, operation summaries and
//! progress spinners.

mod formatter;
mod listing;
mod progress;
mod report;

pub use formatter::Formatter;
pub use listing::render_listing;
pub use progress::ProgressBar;
pub use report::{failure_lines, summarize};

/// Output configuration derived from CLI flags and the config file
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Disable colored output
    pub no_color: bool,
    /// Disable progress spinners
    pub no_progress: bool,
}
