//! Interactive shell
//!
//! Reads one line at a time, dispatches it against the navigator and prints
//! the outcome. A failing command never ends the session; its exit code is
//! returned to the caller for logging and tests.

use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use s3b_core::{Confirm, Error, Executor, Navigator, Report};
use tracing::debug;

use super::parse::{self, Command, HELP};
use crate::exit_code::ExitCode;
use crate::output::{failure_lines, render_listing, summarize, Formatter, ProgressBar};

/// Whether the session keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue(ExitCode),
    Quit,
}

/// How an interactive session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ended {
    /// `q` or end of input
    Quit,
    /// Ctrl+C at the prompt or inside a confirmation
    Interrupted,
}

/// Confirmation answered on the line editor; only `y` or `Y` approves
struct EditorConfirm<'a> {
    editor: &'a mut DefaultEditor,
    interrupted: bool,
}

impl Confirm for EditorConfirm<'_> {
    fn confirm(&mut self, prompt: &str) -> bool {
        match self.editor.readline(prompt) {
            Ok(answer) => answer.trim().eq_ignore_ascii_case("y"),
            Err(ReadlineError::Interrupted) => {
                self.interrupted = true;
                false
            }
            Err(e) => {
                debug!(error = %e, "confirmation aborted");
                false
            }
        }
    }
}

/// One browsing session over a bucket
#[derive(Debug)]
pub struct Shell {
    navigator: Navigator,
    formatter: Formatter,
    listing_limit: usize,
    local_dir: PathBuf,
}

impl Shell {
    pub fn new(navigator: Navigator, formatter: Formatter, listing_limit: usize) -> Self {
        Self {
            navigator,
            formatter,
            listing_limit,
            local_dir: PathBuf::from("."),
        }
    }

    /// Resolve local files for up/down against `dir`
    pub fn with_local_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_dir = dir.into();
        self
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn prompt(&self) -> String {
        self.formatter
            .prompt(self.navigator.bucket(), self.navigator.current_path().as_str())
    }

    /// Read and execute lines until `q`, end of input or Ctrl+C
    pub async fn run(&mut self, editor: &mut DefaultEditor) -> rustyline::Result<Ended> {
        loop {
            let line = match editor.readline(&self.prompt()) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => return Ok(Ended::Interrupted),
                Err(ReadlineError::Eof) => return Ok(Ended::Quit),
                Err(e) => return Err(e),
            };
            if !line.trim().is_empty() {
                if let Err(e) = editor.add_history_entry(line.as_str()) {
                    debug!(error = %e, "history not updated");
                }
            }

            let mut confirm = EditorConfirm {
                editor: &mut *editor,
                interrupted: false,
            };
            let flow = self.execute(&line, &mut confirm).await;
            if confirm.interrupted {
                return Ok(Ended::Interrupted);
            }
            if flow == Flow::Quit {
                return Ok(Ended::Quit);
            }
        }
    }

    /// Execute one input line
    pub async fn execute(&mut self, line: &str, confirm: &mut dyn Confirm) -> Flow {
        let command = parse::parse_line(line);
        debug!(?command, "dispatching");

        let code = match command {
            Command::Empty => ExitCode::Success,
            Command::Quit => return Flow::Quit,
            Command::Help => {
                self.formatter.usage(HELP);
                ExitCode::Success
            }
            Command::Unknown(_) => {
                self.formatter.usage(HELP);
                ExitCode::UsageError
            }
            Command::Usage(usage) => {
                self.formatter.usage(usage);
                ExitCode::UsageError
            }
            Command::List { long } => match self.navigator.refresh().await {
                Ok(()) => {
                    self.print_listing(None, long);
                    ExitCode::Success
                }
                Err(e) => self.fail(&e),
            },
            Command::Cd(name) => self.cd(&name).await,
            Command::Upload { local, remote } => self.upload(&local, remote.as_deref()).await,
            Command::Download { remote, local } => self.download(&remote, local.as_deref()).await,
            Command::Mkdir(name) => self.mkdir(&name).await,
            Command::Remove(name) => self.remove(&name, confirm).await,
            Command::Shell(cmd) => self.shell_escape(&cmd),
        };
        Flow::Continue(code)
    }

    async fn cd(&mut self, name: &str) -> ExitCode {
        match self.navigator.cd(name).await {
            Ok(()) => {
                self.print_overview();
                ExitCode::Success
            }
            Err(e) => self.fail(&e),
        }
    }

    async fn upload(&mut self, local: &str, remote: Option<&str>) -> ExitCode {
        let spinner = ProgressBar::spinner(self.formatter.config(), &format!("uploading {local}"));
        let result = Executor::new(&mut self.navigator)
            .with_local_dir(self.local_dir.clone())
            .upload(local, remote)
            .await;
        spinner.finish_and_clear();
        match result {
            Ok(report) => self.print_report(&report),
            Err(e) => self.fail(&e),
        }
    }

    async fn download(&mut self, remote: &str, local: Option<&str>) -> ExitCode {
        let spinner = ProgressBar::spinner(self.formatter.config(), &format!("downloading {remote}"));
        let result = Executor::new(&mut self.navigator)
            .with_local_dir(self.local_dir.clone())
            .download(remote, local)
            .await;
        spinner.finish_and_clear();
        match result {
            Ok(report) => self.print_report(&report),
            Err(e) => self.fail(&e),
        }
    }

    async fn mkdir(&mut self, name: &str) -> ExitCode {
        match Executor::new(&mut self.navigator).mkdir(name).await {
            Ok(report) => {
                let code = self.print_report(&report);
                if report.refresh_error.is_none() {
                    self.print_overview();
                }
                code
            }
            Err(e) => self.fail(&e),
        }
    }

    async fn remove(&mut self, name: &str, confirm: &mut dyn Confirm) -> ExitCode {
        match Executor::new(&mut self.navigator).delete(name, confirm).await {
            Ok(report) => {
                let code = self.print_report(&report);
                if !report.succeeded.is_empty() && report.refresh_error.is_none() {
                    self.print_overview();
                }
                code
            }
            Err(e) => self.fail(&e),
        }
    }

    fn shell_escape(&self, cmd: &str) -> ExitCode {
        if cmd.is_empty() {
            self.formatter.usage("usage: !command");
            return ExitCode::UsageError;
        }

        #[cfg(windows)]
        let status = std::process::Command::new("cmd").arg("/C").arg(cmd).status();
        #[cfg(not(windows))]
        let status = std::process::Command::new("sh").arg("-c").arg(cmd).status();

        match status {
            Ok(status) if status.success() => ExitCode::Success,
            Ok(status) => {
                self.formatter.warning(&format!("'{cmd}' exited with {status}"));
                ExitCode::GeneralError
            }
            Err(e) => {
                self.formatter.error(&format!("Failed to run '{cmd}': {e}"));
                ExitCode::GeneralError
            }
        }
    }

    /// Print the current directory, truncated to the listing limit
    pub fn print_overview(&self) {
        self.print_listing(Some(self.listing_limit), false);
    }

    fn print_listing(&self, limit: Option<usize>, long: bool) {
        for line in render_listing(self.navigator.listing(), limit, long) {
            self.formatter.println(&line);
        }
    }

    fn print_report(&self, report: &Report) -> ExitCode {
        if report.cancelled {
            self.formatter.println("  cancelled");
            return ExitCode::Success;
        }
        if let Some(summary) = summarize(report) {
            self.formatter.success(&summary);
        }
        for line in failure_lines(report) {
            self.formatter.error(&line);
        }
        if let Some(e) = &report.refresh_error {
            self.formatter
                .warning(&format!("Listing may be out of date, run 'l' to retry: {e}"));
        }
        if !report.failed.is_empty() {
            ExitCode::GeneralError
        } else if report.refresh_error.is_some() {
            ExitCode::NetworkError
        } else {
            ExitCode::Success
        }
    }

    fn fail(&self, error: &Error) -> ExitCode {
        self.formatter.error(&error.to_string());
        ExitCode::from_error(error)
    }
}
