//! Output formatter for the interactive session
//!
//! Ensures consistent status messages across all commands.

use console::Style;

use super::OutputConfig;

/// Formatter for REPL output
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && console::colors_enabled()
    }

    fn paint(&self, style: Style, text: &str) -> String {
        style
            .force_styling(self.colors_enabled())
            .apply_to(text)
            .to_string()
    }

    /// Output a success message
    pub fn success(&self, message: &str) {
        println!("{} {message}", self.paint(Style::new().blue(), "[SUCCESS]"));
    }

    /// Output an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {message}", self.paint(Style::new().red(), "[FAIL]"));
    }

    /// Output a warning message
    pub fn warning(&self, message: &str) {
        eprintln!("{} {message}", self.paint(Style::new().yellow(), "[WARN]"));
    }

    /// Print a command's usage line
    pub fn usage(&self, usage: &str) {
        println!("\n  {usage}\n");
    }

    /// Print a line of text
    pub fn println(&self, message: &str) {
        println!("{message}");
    }

    /// Bold text, used for listing names and menu indices
    pub fn bold(&self, text: &str) -> String {
        self.paint(Style::new().bold(), text)
    }

    /// The REPL prompt: `<bucket> ~/path$ `
    pub fn prompt(&self, bucket: &str, path: &str) -> String {
        format!(
            "{} {}",
            self.paint(Style::new().green(), &format!("<{bucket}>")),
            self.paint(Style::new().magenta(), &format!("~/{path}$ "))
        )
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
