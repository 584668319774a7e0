//! Per-file snapshot taken while walking the root.

use crate::file_category::extension_of;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Name suffixes that mark a file as disposable.
const TEMP_SUFFIXES: [&str; 3] = [".bak", ".temp", ".swp"];

/// Name prefix of Office lock files.
const TEMP_PREFIX: &str = "~$";

/// A regular file seen during a walk, with the attributes used to classify it.
///
/// Entries are recomputed on every run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path to the file.
    pub path: PathBuf,
    /// The final path component, byte for byte. Destinations are built
    /// from this.
    pub file_name: OsString,
    /// Lossy UTF-8 copy of `file_name`, for pattern checks and display.
    pub name: String,
    /// Lowercased text after the last `.` (the whole name if there is none).
    pub extension: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileEntry {
    /// Builds an entry from a path and the size reported by its metadata.
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_default();
        let name = file_name.to_string_lossy().to_string();
        let extension = extension_of(&name);

        Self {
            path,
            file_name,
            name,
            extension,
            size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True for names starting with `.`.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// True for `~$` lock files and `.bak`, `.temp`, `.swp` leftovers.
    ///
    /// Matching is case-sensitive: `notes.BAK` is not temporary.
    pub fn is_temp(&self) -> bool {
        is_temp_name(&self.name)
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Checks a bare file name against the temporary-file patterns.
pub fn is_temp_name(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX) || TEMP_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}
