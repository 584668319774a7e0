//! Console output.
//!
//! All user-facing progress lines go through [`OutputFormatter`] so styling
//! stays consistent. Diagnostics for troubleshooting go through `log`.

use crate::csv_cleaner::{CleanError, CleanSummary};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::Path;

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidyup::output::OutputFormatter;
    /// OutputFormatter::success("Cleaned data saved");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark, to stderr.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidyup::output::OutputFormatter;
    /// OutputFormatter::error("Failed to move file");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidyup::output::OutputFormatter;
    /// OutputFormatter::warning("No csv_files folder to clean");
    /// ```
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidyup::output::OutputFormatter;
    /// OutputFormatter::info("Organizing /data/inbox");
    /// ```
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a bold section header preceded by a blank line.
    ///
    /// # Arguments
    ///
    /// * `header` - The header text
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidyup::output::OutputFormatter;
    /// OutputFormatter::header("CSV CLEANING");
    /// ```
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a yellow line prefixed with `[DRY RUN]`.
    ///
    /// # Arguments
    ///
    /// * `message` - What would happen
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidyup::output::OutputFormatter;
    /// OutputFormatter::dry_run_notice("Would move a.txt to txt_files");
    /// ```
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for `total` steps.
    ///
    /// Print through [`ProgressBar::suspend`] while it is live so lines do
    /// not collide with the bar.
    ///
    /// # Arguments
    ///
    /// * `total` - Number of planned actions
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidyup::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(10);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints the per-folder tally of an organize run.
    ///
    /// ```no_run
    /// use tidyup::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("csv_files".to_string(), 3);
    /// counts.insert("empty_files".to_string(), 1);
    /// OutputFormatter::summary_table(&counts, 2, 5);
    /// ```
    pub fn summary_table(folder_counts: &BTreeMap<String, usize>, deleted: usize, kept: usize) {
        Self::header("SUMMARY");

        let total: usize = folder_counts.values().sum();
        let width = folder_counts
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max("Left in place".len());

        println!("{:<width$} | {}", "Folder".bold(), "Files".bold(), width = width);
        println!("{}", "-".repeat(width + 10));

        for (folder, count) in folder_counts {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Moved".bold(),
            total.to_string().green().bold(),
            plural(total),
            width = width
        );
        println!(
            "{:<width$} | {} {}",
            "Deleted",
            deleted.to_string().red(),
            plural(deleted),
            width = width
        );
        println!(
            "{:<width$} | {} {}",
            "Left in place",
            kept,
            plural(kept),
            width = width
        );
    }

    /// Prints the result lines for one cleaned CSV file.
    ///
    /// # Arguments
    ///
    /// * `path` - The file that was rewritten
    /// * `summary` - What the cleaning pass changed
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidyup::csv_cleaner::CleanSummary;
    /// use tidyup::output::OutputFormatter;
    /// use std::path::Path;
    ///
    /// let summary = CleanSummary { duplicates_removed: 1, missing_filled: 2, rows: 10, columns: 3 };
    /// OutputFormatter::clean_summary(Path::new("csv_files/survey.csv"), &summary);
    /// ```
    pub fn clean_summary(path: &Path, summary: &CleanSummary) {
        Self::plain(&format!("Cleaning CSV file: {}", path.display()));
        Self::plain(&format!(
            "  Removed {} duplicate {}.",
            summary.duplicates_removed,
            if summary.duplicates_removed == 1 { "row" } else { "rows" }
        ));
        Self::plain(&format!(
            "  Found {} missing {}.",
            summary.missing_filled,
            if summary.missing_filled == 1 { "value" } else { "values" }
        ));
        Self::success(&saved_message(path, summary));
    }

    /// Reports a CSV file that could not be cleaned. The run goes on.
    pub fn clean_failure(error: &CleanError) {
        Self::error(&error.to_string());
    }
}

fn saved_message(path: &Path, summary: &CleanSummary) -> String {
    format!(
        "Cleaned data saved to: {} ({} {}, {} {})",
        path.display(),
        summary.rows,
        if summary.rows == 1 { "row" } else { "rows" },
        summary.columns,
        if summary.columns == 1 { "column" } else { "columns" }
    )
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
