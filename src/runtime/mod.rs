//! Runtime abstraction for the filesystem reads the matchers perform.
//!
//! Matchers only ever read: the package manifest and the listing of the
//! binary-installation directory. Both go through [`Runtime`] so tests can
//! substitute a [`MockRuntime`] instead of building fixtures on disk.
//!
//! # Structure
//!
//! - `fs` - File system operations backed by `std::fs`

mod fs;

use anyhow::Result;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// List the entry names of a directory, without recursing.
    /// Every entry counts, regardless of its file type.
    fn read_dir_names(&self, path: &Path) -> Result<Vec<String>>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn read_dir_names(&self, path: &Path) -> Result<Vec<String>> {
        self.read_dir_names_impl(path)
    }
}
