//! In-memory CSV cleaning.
//!
//! A file is read whole into a [`Table`], cleaned, and written back over
//! itself. Cleaning removes duplicate rows, fills missing cells with a
//! sentinel and normalizes column names. Cells stay text; nothing is
//! type-coerced.
//!
//! Failures are per file: [`CsvCleaner::clean_file`] returns a
//! [`CleanError`] instead of aborting, so callers can move on to the next
//! file.

use crate::config::DEFAULT_MISSING_VALUE;
use csv::{ReaderBuilder, Writer};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// One cell; `None` marks a missing value (an empty field in the file).
pub type Cell = Option<String>;

/// What went wrong while cleaning a file.
#[derive(Debug)]
pub enum CleanErrorKind {
    /// Reading, writing or listing failed.
    Io(io::Error),
    /// The CSV parser or writer rejected the data (including invalid UTF-8).
    Csv(csv::Error),
    /// The file has no header row.
    NoHeader,
    /// A data row has more fields than the header.
    RowTooLong {
        line: u64,
        expected: usize,
        found: usize,
    },
}

impl std::fmt::Display for CleanErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{}", e),
            Self::Csv(e) => write!(f, "{}", e),
            Self::NoHeader => write!(f, "no columns to parse from file"),
            Self::RowTooLong {
                line,
                expected,
                found,
            } => write!(
                f,
                "expected {} fields in line {}, saw {}",
                expected, line, found
            ),
        }
    }
}

impl From<io::Error> for CleanErrorKind {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for CleanErrorKind {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

/// A failed cleaning of one file.
#[derive(Debug)]
pub struct CleanError {
    pub path: PathBuf,
    pub cause: CleanErrorKind,
}

impl CleanError {
    fn new(path: &Path, cause: impl Into<CleanErrorKind>) -> Self {
        Self {
            path: path.to_path_buf(),
            cause: cause.into(),
        }
    }
}

impl std::fmt::Display for CleanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error cleaning file {}: {}", self.path.display(), self.cause)
    }
}

impl std::error::Error for CleanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            CleanErrorKind::Io(e) => Some(e),
            CleanErrorKind::Csv(e) => Some(e),
            _ => None,
        }
    }
}

/// What cleaning changed in one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub duplicates_removed: usize,
    pub missing_filled: usize,
    /// Rows written back.
    pub rows: usize,
    pub columns: usize,
}

/// Outcome of cleaning every CSV file in a folder.
#[derive(Debug, Default)]
pub struct CleanReport {
    pub cleaned: Vec<(PathBuf, CleanSummary)>,
    pub failed: Vec<CleanError>,
}

impl CleanReport {
    pub fn record(&mut self, path: &Path, result: Result<CleanSummary, CleanError>) {
        match result {
            Ok(summary) => self.cleaned.push((path.to_path_buf(), summary)),
            Err(e) => self.failed.push(e),
        }
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A CSV file held in memory: a header row and rows of cells.
///
/// Every row has exactly one cell per header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Builds a table, fitting every row to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Parses CSV text whose first row holds the column names.
    ///
    /// Empty fields become missing cells. Rows shorter than the header are
    /// padded with missing cells; longer rows are an error.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, CleanErrorKind> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(CleanErrorKind::NoHeader);
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            if record.len() > headers.len() {
                return Err(CleanErrorKind::RowTooLong {
                    line: record.position().map(|p| p.line()).unwrap_or(0),
                    expected: headers.len(),
                    found: record.len(),
                });
            }

            let mut row: Vec<Cell> = record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect();
            row.resize(headers.len(), None);
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Reads a table from disk. The file is closed before this returns.
    pub fn read(path: &Path) -> Result<Self, CleanErrorKind> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Removes rows equal to an earlier row, keeping first occurrences in
    /// order. Returns how many rows were removed.
    pub fn drop_duplicates(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }

    pub fn count_missing(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| cell.is_none()).count()
    }

    /// Replaces every missing cell with `value`. Returns how many were filled.
    pub fn fill_missing(&mut self, value: &str) -> usize {
        let mut filled = 0;
        for cell in self.rows.iter_mut().flatten() {
            if cell.is_none() {
                *cell = Some(value.to_string());
                filled += 1;
            }
        }
        filled
    }

    /// Lowercases every column name and turns each space into `_`.
    pub fn normalize_headers(&mut self) {
        for header in &mut self.headers {
            *header = normalize_header(header);
        }
    }

    /// Serializes the table as CSV, without any index column.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CleanErrorKind> {
        let mut wtr = Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Writes the table to `path`, replacing its contents.
    pub fn write(&self, path: &Path) -> Result<(), CleanErrorKind> {
        let file = File::create(path)?;
        self.write_to(file)
    }
}

/// Column name normalization: lowercase, spaces to underscores.
///
/// Tabs, other whitespace and punctuation are kept as they are.
pub fn normalize_header(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Runs the cleaning pipeline over CSV files.
#[derive(Debug, Clone)]
pub struct CsvCleaner {
    missing_value: String,
}

impl Default for CsvCleaner {
    fn default() -> Self {
        Self::new(DEFAULT_MISSING_VALUE)
    }
}

impl CsvCleaner {
    /// Creates a cleaner that fills missing cells with `missing_value`.
    pub fn new(missing_value: impl Into<String>) -> Self {
        Self {
            missing_value: missing_value.into(),
        }
    }

    /// Cleans a table in place: dedupe, fill, then rename columns.
    ///
    /// Duplicates are found before filling, so a row with a missing cell is
    /// not a duplicate of one holding the sentinel.
    pub fn clean_table(&self, table: &mut Table) -> CleanSummary {
        let duplicates_removed = table.drop_duplicates();
        let missing_filled = table.fill_missing(&self.missing_value);
        table.normalize_headers();

        CleanSummary {
            duplicates_removed,
            missing_filled,
            rows: table.rows.len(),
            columns: table.headers.len(),
        }
    }

    /// Cleans one CSV file and writes the result back to the same path.
    ///
    /// Any failure is returned with the file's path; nothing panics. A parse
    /// failure leaves the file untouched.
    pub fn clean_file(&self, path: &Path) -> Result<CleanSummary, CleanError> {
        let mut table = Table::read(path).map_err(|e| CleanError::new(path, e))?;
        let summary = self.clean_table(&mut table);
        table.write(path).map_err(|e| CleanError::new(path, e))?;

        log::debug!(
            "cleaned {}: {} duplicates, {} missing",
            path.display(),
            summary.duplicates_removed,
            summary.missing_filled
        );
        Ok(summary)
    }

    /// Lists the `.csv` files directly inside `folder`, sorted by name.
    ///
    /// The suffix check is case-sensitive. A missing folder yields no files.
    pub fn csv_files_in(folder: &Path) -> io::Result<Vec<PathBuf>> {
        if !folder.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(folder)? {
            let entry = entry?;
            let is_csv = entry.file_name().to_string_lossy().ends_with(".csv");
            if is_csv && entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}
