//! Command orchestration for tidyup.
//!
//! This module ties the pieces together:
//! - Configuration loading
//! - Directory organization (or a dry-run preview of it)
//! - Cleaning of the CSV files collected in `csv_files/`
//!
//! Organizer failures abort the command. CSV failures are reported per file
//! and never abort.

use crate::config::TidyConfig;
use crate::csv_cleaner::{CleanReport, CsvCleaner};
use crate::file_category::Category;
use crate::file_organizer::{Action, FileOrganizer, KeepReason, OrganizeReport};
use crate::output::OutputFormatter;
use std::collections::BTreeMap;
use std::path::Path;

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TidyCommand {
    /// Organize the tree, then clean `csv_files/`.
    Full {
        /// If true, only preview the organization; nothing is cleaned.
        dry_run: bool,
    },
    /// Organize the tree only.
    Organize { dry_run: bool },
    /// Clean `csv_files/` only.
    Clean,
}

/// Runs a command against `root` using the configuration lookup defaults.
///
/// ```no_run
/// use tidyup::cli::{run_cli, TidyCommand};
/// use std::path::Path;
///
/// if let Err(e) = run_cli(TidyCommand::Full { dry_run: false }, Path::new("/path/to/dir")) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: TidyCommand, root: &Path) -> Result<(), String> {
    run_cli_with_config(command, root, None)
}

/// Runs a command with an optional explicit configuration file.
pub fn run_cli_with_config(
    command: TidyCommand,
    root: &Path,
    config_path: Option<&Path>,
) -> Result<(), String> {
    let config = TidyConfig::load(config_path, root)
        .map_err(|e| format!("Error loading configuration: {}", e))?;

    match command {
        TidyCommand::Full { dry_run: true } | TidyCommand::Organize { dry_run: true } => {
            organize_directory_dry_run(root, &config)
        }
        TidyCommand::Full { dry_run: false } => {
            organize_directory(root, &config)?;
            clean_csv_files(root, &config);
            OutputFormatter::success("All tasks complete!");
            Ok(())
        }
        TidyCommand::Organize { dry_run: false } => organize_directory(root, &config).map(|_| ()),
        TidyCommand::Clean => {
            clean_csv_files(root, &config);
            Ok(())
        }
    }
}

/// Organizes files under `root` into category folders.
///
/// Creates every category folder first, snapshots the tree, then deletes,
/// moves or keeps each file, printing one line per change. The first
/// filesystem error ends the run.
pub fn organize_directory(root: &Path, config: &TidyConfig) -> Result<OrganizeReport, String> {
    OutputFormatter::info(&format!("Organizing contents of: {}", root.display()));

    let exclude = config
        .exclude_matcher()
        .map_err(|e| format!("Error compiling exclusion rules: {}", e))?;
    let organizer = FileOrganizer::with_exclusions(root, exclude);

    let created = organizer
        .ensure_category_dirs()
        .map_err(|e| e.to_string())?;
    for dir in &created {
        OutputFormatter::plain(&format!("Created folder: {}", dir.display()));
    }

    let actions = organizer.plan().map_err(|e| e.to_string())?;
    let pb = OutputFormatter::create_progress_bar(actions.len() as u64);
    let mut report = OrganizeReport::default();

    for action in &actions {
        let done = match organizer.execute(action) {
            Ok(done) => done,
            Err(e) => {
                pb.abandon();
                return Err(e.to_string());
            }
        };
        pb.suspend(|| describe_action(&done, false));
        report.record(&done);
        pb.inc(1);
    }
    pb.finish_and_clear();

    OutputFormatter::summary_table(&folder_counts(&report), report.deleted, report.kept);
    OutputFormatter::success("File management and cleanup complete.");
    Ok(report)
}

/// Shows what [`organize_directory`] would do without changing anything.
pub fn organize_directory_dry_run(root: &Path, config: &TidyConfig) -> Result<(), String> {
    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", root.display()));

    let exclude = config
        .exclude_matcher()
        .map_err(|e| format!("Error compiling exclusion rules: {}", e))?;
    let organizer = FileOrganizer::with_exclusions(root, exclude);
    let actions = organizer.plan().map_err(|e| e.to_string())?;

    let missing: Vec<_> = Category::ALL
        .iter()
        .map(|category| organizer.category_dir(*category))
        .filter(|dir| !dir.is_dir())
        .collect();
    for dir in &missing {
        OutputFormatter::dry_run_notice(&format!("Would create folder: {}", dir.display()));
    }

    if actions.is_empty() {
        OutputFormatter::plain("No files found to organize.");
    }

    let mut report = OrganizeReport::default();
    for action in &actions {
        describe_action(action, true);
        report.record(action);
    }

    OutputFormatter::summary_table(&folder_counts(&report), report.deleted, report.kept);
    OutputFormatter::success("Dry run complete. No files were modified.");
    OutputFormatter::plain(&format!(
        "Run 'tidyup {}' (without --dry-run) to apply these changes.",
        root.display()
    ));
    Ok(())
}

/// Cleans every `.csv` file in `<root>/csv_files`.
///
/// Each failure is printed and recorded; the remaining files are still
/// cleaned.
pub fn clean_csv_files(root: &Path, config: &TidyConfig) -> CleanReport {
    let folder = root.join(Category::Csv.dir_name());
    let cleaner = CsvCleaner::new(config.cleaner.missing_value.clone());
    let mut report = CleanReport::default();

    let files = match CsvCleaner::csv_files_in(&folder) {
        Ok(files) => files,
        Err(e) => {
            OutputFormatter::error(&format!(
                "Error reading folder {}: {}",
                folder.display(),
                e
            ));
            return report;
        }
    };

    if files.is_empty() {
        log::info!("no CSV files in {}", folder.display());
        return report;
    }

    OutputFormatter::header("CSV CLEANING");
    for path in &files {
        let result = cleaner.clean_file(path);
        match &result {
            Ok(summary) => OutputFormatter::clean_summary(path, summary),
            Err(e) => OutputFormatter::clean_failure(e),
        }
        report.record(path, result);
    }

    if !report.is_complete_success() {
        OutputFormatter::warning(&format!(
            "{} of {} CSV files could not be cleaned.",
            report.failed.len(),
            files.len()
        ));
    }

    report
}

/// Prints one line for an action; kept files only go to the debug log.
fn describe_action(action: &Action, dry_run: bool) {
    let line = match action {
        Action::DeleteTemp { path } => format!("Deleting temporary file: {}", path.display()),
        Action::Move { from, category, .. } => {
            let name = from
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if *category == Category::Empty {
                format!("Moving empty file {} to {}/", name, category.dir_name())
            } else {
                format!("Moving {} to {}/", name, category.dir_name())
            }
        }
        Action::Keep { path, reason } => {
            let why = match reason {
                KeepReason::Excluded => "excluded",
                KeepReason::Uncategorized => "uncategorized",
                KeepReason::AlreadyInPlace => "already in place",
            };
            log::debug!("keeping {} ({})", path.display(), why);
            return;
        }
    };

    if dry_run {
        OutputFormatter::dry_run_notice(&format!("Would run: {}", line));
    } else {
        OutputFormatter::plain(&line);
    }
}

fn folder_counts(report: &OrganizeReport) -> BTreeMap<String, usize> {
    report
        .moved
        .iter()
        .map(|(category, count)| (category.dir_name().to_string(), *count))
        .collect()
}
