//! # Wildcard Directory
//!
//! Management of the wildcard root: a tree of `.txt` files, one candidate value
//! per line, referenced from prompts as `__name__`.
//!
//! Every caller-supplied path is resolved lexically against the root with
//! [`resolve_within`] before any filesystem access; paths that would leave the
//! root fail with [`WildcardError::InvalidPath`].
//!
//! There is no locking: overlapping writes, or a cleanup running alongside a
//! create or delete, can race.
//!
//! # Examples
//!
//! ```rust
//! use plab_core::wildcards::WildcardManager;
//! use tempfile::TempDir;
//!
//! let temp_dir = TempDir::new().unwrap();
//! let manager = WildcardManager::new(temp_dir.path());
//!
//! let path = manager.create_file("hair/colors").unwrap();
//! assert_eq!(path, "hair/colors.txt");
//! manager.write_file(&path, "red\nblue\n").unwrap();
//! assert_eq!(manager.read_file(&path).unwrap(), "red\nblue\n");
//! ```

mod maintenance;
mod path;
mod tree;

pub use maintenance::CleanupReport;
pub use path::{relative_display, resolve_within};
pub use tree::{build_tree, DirEntryInfo, DirSource, FsSource, WildcardNode};

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Quarantine directory for relocated duplicates, directly under the root.
pub const DUPLICATES_DIR: &str = "duplicates";

const WILDCARD_EXTENSION: &str = ".txt";

#[derive(Debug, Error)]
pub enum WildcardError {
    #[error("Invalid path: '{0}' escapes the wildcard root")]
    InvalidPath(String),
    #[error("Wildcard file not found: {0}")]
    NotFound(String),
    #[error("Wildcard file already exists: {0}")]
    Conflict(String),
    #[error("IO error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{operation} aborted at '{failed}' after {} completed change(s): {source}", .completed.len())]
    BatchAborted {
        operation: &'static str,
        /// Paths already changed before the failure.
        completed: Vec<String>,
        /// Path whose I/O failed.
        failed: String,
        /// Paths planned for the failing step that were not touched.
        skipped: Vec<String>,
        #[source]
        source: io::Error,
    },
}

impl WildcardError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        WildcardError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub(crate) fn is_wildcard_file(name: &str) -> bool {
    name.ends_with(WILDCARD_EXTENSION)
}

/// Operations on a wildcard root fixed at construction.
#[derive(Debug, Clone)]
pub struct WildcardManager {
    root: PathBuf,
}

impl WildcardManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, relative: &str) -> Result<PathBuf, WildcardError> {
        resolve_within(&self.root, relative)
    }

    /// The folder/file listing. A missing root lists as empty.
    pub fn list_tree(&self) -> Result<Vec<WildcardNode>, WildcardError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let source = FsSource {
            root: self.root.clone(),
        };
        build_tree(&source).map_err(|e| WildcardError::io(&self.root, e))
    }

    pub fn read_file(&self, relative: &str) -> Result<String, WildcardError> {
        let path = self.existing_file(relative)?;
        fs::read_to_string(&path).map_err(|e| WildcardError::io(&path, e))
    }

    /// Overwrites an existing file. Never creates one.
    pub fn write_file(&self, relative: &str, content: &str) -> Result<(), WildcardError> {
        let path = self.existing_file(relative)?;
        fs::write(&path, content).map_err(|e| WildcardError::io(&path, e))?;
        log::debug!("Wrote {} byte(s) to wildcard '{}'", content.len(), relative);
        Ok(())
    }

    /// Creates an empty file, appending `.txt` when missing and creating parent
    /// folders as needed. Returns the relative path of the new file.
    pub fn create_file(&self, relative: &str) -> Result<String, WildcardError> {
        let relative = if is_wildcard_file(relative) {
            relative.to_string()
        } else {
            format!("{}{}", relative, WILDCARD_EXTENSION)
        };
        let path = self.resolve(&relative)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| WildcardError::io(parent, e))?;
        }
        if path.exists() {
            return Err(WildcardError::Conflict(relative));
        }

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(WildcardError::Conflict(relative));
            }
            Err(e) => return Err(WildcardError::io(&path, e)),
        }

        let created = relative_display(&self.root, &path);
        log::debug!("Created wildcard '{}'", created);
        Ok(created)
    }

    /// Removes an existing file. Folders left empty stay until [`Self::cleanup`].
    pub fn delete_file(&self, relative: &str) -> Result<(), WildcardError> {
        let path = self.existing_file(relative)?;
        fs::remove_file(&path).map_err(|e| WildcardError::io(&path, e))?;
        log::debug!("Deleted wildcard '{}'", relative);
        Ok(())
    }

    /// Moves content duplicates under [`DUPLICATES_DIR`], keeping the first
    /// copy of each content in place. Returns the moved paths.
    pub fn relocate_duplicates(&self) -> Result<Vec<String>, WildcardError> {
        maintenance::relocate_duplicates(&self.root)
    }

    /// Removes empty and non-`.txt` files, then empty folders, then the
    /// quarantine directory. Irreversible.
    pub fn cleanup(&self) -> Result<CleanupReport, WildcardError> {
        maintenance::cleanup(&self.root)
    }

    fn existing_file(&self, relative: &str) -> Result<PathBuf, WildcardError> {
        let path = self.resolve(relative)?;
        if !path.is_file() {
            return Err(WildcardError::NotFound(relative.to_string()));
        }
        Ok(path)
    }
}
