//! Progress spinner for batch operations
//!
//! Multi-file transfers and recursive deletes can take a while; a spinner
//! shows they are running. Suppressed with --no-progress or when stderr is
//! not a terminal.

use super::OutputConfig;

/// Progress spinner wrapper
#[derive(Debug)]
pub struct ProgressBar {
    bar: Option<indicatif::ProgressBar>,
}

impl ProgressBar {
    /// Create a spinner for indeterminate progress
    pub fn spinner(config: &OutputConfig, message: &str) -> Self {
        let bar = if config.no_progress {
            None
        } else {
            let bar = indicatif::ProgressBar::new_spinner();
            if let Ok(style) = indicatif::ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                bar.set_style(style);
            }
            bar.set_message(message.to_string());
            bar.enable_steady_tick(std::time::Duration::from_millis(100));
            Some(bar)
        };

        Self { bar }
    }

    /// Finish and clear the spinner
    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Check if the spinner is visible
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        self.finish_and_clear();
    }
}
