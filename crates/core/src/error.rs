//! Error types for s3b-core
//!
//! Every command-level failure the browser can report is a variant here, so the
//! REPL can print it and return to the prompt. A few variants are only fatal at
//! startup (credentials, configuration).

use thiserror::Error;

/// Result type alias for s3b-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for s3b-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// The object store rejected or could not serve a request
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// `cd` target is neither listed nor present in the bucket
    #[error("No such dir in the current path: {0}")]
    NoSuchDirectory(String),

    /// Local glob matched nothing
    #[error("No such file in local: {0}")]
    NoSuchLocalFile(String),

    /// Remote name or pattern matched no file
    #[error("No such file in the current path: {0}")]
    NoSuchRemoteFile(String),

    /// `rm` target matched no file or directory
    #[error("No such file or directory in the current path: {0}")]
    NoSuchFile(String),

    /// Directory already exists
    #[error("Directory already exists: {0}")]
    AlreadyExists(String),

    /// A rename target was given for a multi-item batch
    #[error("Cannot set {0} if more than one file matched")]
    AmbiguousRename(String),

    /// Bucket named with `--bucket` is not in the account
    #[error("No such bucket: {0}")]
    NoSuchBucket(String),

    /// Name cannot be used as a path segment
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credentials could not be resolved
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_)
            | Error::Config(_)
            | Error::AmbiguousRename(_)
            | Error::InvalidUrl(_)
            | Error::TomlParse(_) => 2, // UsageError
            Error::StoreUnavailable(_) => 3, // NetworkError
            Error::Auth(_) => 4,             // AuthError
            Error::NoSuchDirectory(_)
            | Error::NoSuchLocalFile(_)
            | Error::NoSuchRemoteFile(_)
            | Error::NoSuchFile(_)
            | Error::NoSuchBucket(_) => 5, // NotFound
            Error::AlreadyExists(_) => 6, // Conflict
            _ => 1,                       // GeneralError
        }
    }

    /// Whether the error came from the store boundary rather than user input
    pub const fn is_store_error(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }
}
