//! s3b-core: Core library for the s3b object store browser
//!
//! This crate presents a bucket's flat key namespace as a directory tree:
//! - Path and directory entry model
//! - ObjectStore trait for S3 operations, plus an in-memory implementation
//! - Key lister over paginated, delimiter-grouped listings
//! - Navigator holding the current path and its listing
//! - Glob resolution and the upload/download/mkdir/delete executor
//! - Configuration management
//!
//! This crate is independent of any specific S3 SDK.

pub mod config;
pub mod entry;
pub mod error;
pub mod executor;
pub mod lister;
pub mod memory;
pub mod navigator;
pub mod path;
pub mod resolver;
pub mod traits;

pub use config::{Config, ConfigManager};
pub use entry::{DirEntry, EntryKind};
pub use error::{Error, Result};
pub use executor::{Confirm, Executor, Failure, Operation, Report};
pub use lister::{KeyLister, ListingPolicy};
pub use memory::MemoryStore;
pub use navigator::Navigator;
pub use path::DirPath;
pub use resolver::{resolve, Resolution};
pub use traits::{DeleteResult, ListOptions, ListResult, ObjectInfo, ObjectStore};
