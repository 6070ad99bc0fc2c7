//! Exit code definitions for s3b
//!
//! The process exit code reflects how the session ended. Inside the REPL the
//! same codes classify each command's outcome without ending the session.

use s3b_core::Error;

/// Exit codes for the s3b application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// General/unspecified error, or a batch with failed items
    GeneralError = 1,

    /// User input error: invalid arguments, ambiguous rename, bad config
    UsageError = 2,

    /// Store unreachable or rejected the request
    NetworkError = 3,

    /// Credentials missing or rejected
    AuthError = 4,

    /// Bucket, directory, file or pattern match not found
    NotFound = 5,

    /// Target already exists
    Conflict = 6,

    /// Session ended by Ctrl+C
    Interrupted = 130,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create exit code from i32 value
    ///
    /// Returns None if the value doesn't correspond to a known exit code.
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::NetworkError),
            4 => Some(Self::AuthError),
            5 => Some(Self::NotFound),
            6 => Some(Self::Conflict),
            130 => Some(Self::Interrupted),
            _ => None,
        }
    }

    /// Classify a core error
    pub fn from_error(error: &Error) -> Self {
        Self::from_i32(error.exit_code()).unwrap_or(Self::GeneralError)
    }

    /// Get a human-readable description of the exit code
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::GeneralError => "General error",
            Self::UsageError => "Invalid arguments",
            Self::NetworkError => "Store unavailable",
            Self::AuthError => "Authentication failure",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Resource already exists",
            Self::Interrupted => "Session interrupted",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}
