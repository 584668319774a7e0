//! Directory organization: category folders, temp cleanup and file moves.
//!
//! A run has two phases. First every category folder is created and the
//! whole tree under the root is walked into a snapshot of [`FileEntry`]
//! values. Then each entry is classified into an [`Action`] and the actions
//! are executed one by one. Nothing acts on the tree while it is being
//! walked, so files moved into category folders are never seen twice.
//!
//! Any filesystem error aborts the run. Files already moved or deleted stay
//! that way.

use crate::config::ExcludeMatcher;
use crate::file_category::Category;
use crate::file_entry::FileEntry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Errors that can occur during file organization operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// The root path does not exist or is not a directory.
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a category directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read a directory while walking the tree.
    WalkFailed {
        path: PathBuf,
        source: walkdir::Error,
    },
    /// Failed to read a file's metadata.
    MetadataFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to delete a temporary file.
    DeleteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::WalkFailed { path, source } => {
                write!(f, "Failed to walk {}: {}", path.display(), source)
            }
            Self::MetadataFailed { path, source } => {
                write!(f, "Failed to read metadata of {}: {}", path.display(), source)
            }
            Self::DeleteFailed { path, source } => {
                write!(f, "Failed to delete {}: {}", path.display(), source)
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidBasePath { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::MetadataFailed { source, .. }
            | Self::DeleteFailed { source, .. } => Some(source),
            Self::WalkFailed { source, .. } => Some(source),
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Why a file is left where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    /// Matched a configured exclusion rule.
    Excluded,
    /// Its extension has no category.
    Uncategorized,
    /// It already sits in its category folder.
    AlreadyInPlace,
}

/// What a run does with one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Delete a temporary file.
    DeleteTemp { path: PathBuf },
    /// Move a file into a category folder, replacing any file of the same
    /// name already there.
    Move {
        from: PathBuf,
        to: PathBuf,
        category: Category,
    },
    /// Leave the file untouched.
    Keep { path: PathBuf, reason: KeepReason },
}

/// Tally of what a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeReport {
    /// Temporary files deleted.
    pub deleted: usize,
    /// Files moved, keyed by destination category.
    pub moved: BTreeMap<Category, usize>,
    /// Files left in place.
    pub kept: usize,
}

impl OrganizeReport {
    /// Counts one completed action.
    pub fn record(&mut self, action: &Action) {
        match action {
            Action::DeleteTemp { .. } => self.deleted += 1,
            Action::Move { category, .. } => *self.moved.entry(*category).or_insert(0) += 1,
            Action::Keep { .. } => self.kept += 1,
        }
    }

    pub fn total_moved(&self) -> usize {
        self.moved.values().sum()
    }
}

/// Organizes the files below one root directory.
pub struct FileOrganizer {
    root: PathBuf,
    exclude: ExcludeMatcher,
}

impl FileOrganizer {
    /// Creates an organizer for `root` with no exclusion rules.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_exclusions(root, ExcludeMatcher::default())
    }

    /// Creates an organizer that leaves files matched by `exclude` alone.
    pub fn with_exclusions(root: impl Into<PathBuf>, exclude: ExcludeMatcher) -> Self {
        Self {
            root: root.into(),
            exclude,
        }
    }

    /// Path of the folder owned by `category`.
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.dir_name())
    }

    /// Checks that the root exists and is a directory.
    pub fn validate_root(&self) -> OrganizeResult<()> {
        let metadata = fs::metadata(&self.root).map_err(|e| OrganizeError::InvalidBasePath {
            path: self.root.clone(),
            source: e,
        })?;

        if !metadata.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: self.root.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "base path is not a directory",
                ),
            });
        }

        Ok(())
    }

    /// Creates every category folder under the root, including `empty_files`.
    ///
    /// Folders are created whether or not any file will land in them.
    /// Returns the folders that did not exist before.
    pub fn ensure_category_dirs(&self) -> OrganizeResult<Vec<PathBuf>> {
        self.validate_root()?;

        let mut created = Vec::new();
        for category in Category::ALL {
            let dir = self.category_dir(category);
            if dir.is_dir() {
                continue;
            }
            fs::create_dir_all(&dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: dir.clone(),
                source: e,
            })?;
            log::debug!("created {}", dir.display());
            created.push(dir);
        }

        Ok(created)
    }

    /// Walks the root and collects every regular, non-hidden file.
    ///
    /// Only the file's own name decides whether it is hidden; the walk still
    /// descends into dot-directories. Symlinks are not followed and are not
    /// collected.
    pub fn snapshot(&self) -> OrganizeResult<Vec<FileEntry>> {
        self.validate_root()?;

        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| OrganizeError::WalkFailed {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone()),
                source: e,
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let metadata = entry.metadata().map_err(|e| OrganizeError::MetadataFailed {
                path: entry.path().to_path_buf(),
                source: e.into(),
            })?;

            let file = FileEntry::new(entry.into_path(), metadata.len());
            if file.is_hidden() {
                continue;
            }
            entries.push(file);
        }

        log::debug!(
            "snapshot of {} holds {} files",
            self.root.display(),
            entries.len()
        );
        Ok(entries)
    }

    /// Decides what to do with one file. First matching rule wins:
    /// exclusion, temporary file, empty file, known extension.
    pub fn classify(&self, entry: &FileEntry) -> Action {
        if self.exclude.is_excluded(&self.root, entry.path()) {
            return Action::Keep {
                path: entry.path.clone(),
                reason: KeepReason::Excluded,
            };
        }

        if entry.is_temp() {
            return Action::DeleteTemp {
                path: entry.path.clone(),
            };
        }

        let category = if entry.is_empty() {
            Some(Category::Empty)
        } else {
            Category::from_extension(&entry.extension)
        };

        let Some(category) = category else {
            return Action::Keep {
                path: entry.path.clone(),
                reason: KeepReason::Uncategorized,
            };
        };

        let destination = self.category_dir(category).join(&entry.file_name);
        if destination == entry.path {
            return Action::Keep {
                path: entry.path.clone(),
                reason: KeepReason::AlreadyInPlace,
            };
        }

        Action::Move {
            from: entry.path.clone(),
            to: destination,
            category,
        }
    }

    /// Snapshots the tree and classifies every file without touching disk.
    pub fn plan(&self) -> OrganizeResult<Vec<Action>> {
        Ok(self
            .snapshot()?
            .iter()
            .map(|entry| self.classify(entry))
            .collect())
    }

    /// Performs one planned action and returns what was actually done.
    ///
    /// A planned move is re-classified from the file's current metadata
    /// first: an earlier move in the same run may have replaced the file,
    /// so the snapshot can be stale.
    pub fn execute(&self, action: &Action) -> OrganizeResult<Action> {
        match action {
            Action::DeleteTemp { path } => {
                fs::remove_file(path).map_err(|e| OrganizeError::DeleteFailed {
                    path: path.clone(),
                    source: e,
                })?;
                log::debug!("deleted {}", path.display());
                Ok(action.clone())
            }
            Action::Move { from, .. } => {
                let current = self.refresh(from)?;
                let action = self.classify(&current);
                match &action {
                    Action::Move { from, to, .. } => {
                        Self::move_file(from, to)?;
                        log::debug!("moved {} to {}", from.display(), to.display());
                    }
                    _ => log::debug!("{} changed since the snapshot, skipping", from.display()),
                }
                Ok(action)
            }
            Action::Keep { .. } => Ok(action.clone()),
        }
    }

    /// Full run: create folders, snapshot, then execute every action.
    ///
    /// Stops at the first failure.
    pub fn run(&self) -> OrganizeResult<OrganizeReport> {
        self.ensure_category_dirs()?;

        let mut report = OrganizeReport::default();
        for action in self.plan()? {
            let done = self.execute(&action)?;
            report.record(&done);
        }

        log::info!(
            "organized {}: {} deleted, {} moved, {} kept",
            self.root.display(),
            report.deleted,
            report.total_moved(),
            report.kept
        );
        Ok(report)
    }

    /// Re-reads one file's metadata.
    fn refresh(&self, path: &Path) -> OrganizeResult<FileEntry> {
        let metadata = fs::metadata(path).map_err(|e| OrganizeError::MetadataFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(FileEntry::new(path, metadata.len()))
    }

    /// Renames `from` to `to`, replacing an existing file at `to`.
    fn move_file(from: &Path, to: &Path) -> OrganizeResult<()> {
        fs::rename(from, to).map_err(|e| OrganizeError::FileMoveFailure {
            source: from.to_path_buf(),
            destination: to.to_path_buf(),
            source_error: e,
        })
    }
}
