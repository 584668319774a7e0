//! tidyup - directory sorting and CSV cleanup
//!
//! This library sorts the files under a root directory into one folder per
//! known extension, deletes temporary files, parks empty files in
//! `empty_files/`, and then cleans the CSV files collected in `csv_files/`
//! (duplicate rows removed, missing cells filled, headers normalized).

pub mod cli;
pub mod config;
pub mod csv_cleaner;
pub mod file_category;
pub mod file_entry;
pub mod file_organizer;
pub mod output;

pub use config::{ConfigError, ExcludeMatcher, TidyConfig};
pub use csv_cleaner::{CleanError, CleanReport, CleanSummary, CsvCleaner, Table};
pub use file_category::Category;
pub use file_entry::FileEntry;
pub use file_organizer::{Action, FileOrganizer, OrganizeError, OrganizeReport};

pub use cli::{TidyCommand, run_cli};
