//! File categorization by extension.
//!
//! Every known extension owns a destination folder named `<ext>_files`
//! directly under the organized root. Zero-byte files get their own
//! `empty_files` folder. Anything else has no category and stays put.
//!
//! # Examples
//!
//! ```
//! use tidyup::file_category::{Category, extension_of};
//!
//! assert_eq!(Category::from_extension("csv"), Some(Category::Csv));
//! assert_eq!(Category::from_extension("gz"), None);
//! assert_eq!(extension_of("report.CSV"), "csv");
//! assert_eq!(Category::Empty.dir_name(), "empty_files");
//! ```

/// A destination category for organized files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Csv,
    Txt,
    Pdf,
    Docx,
    Jpg,
    Png,
    Mp3,
    Wav,
    Mp4,
    Avi,
    Mkv,
    /// Zero-byte files, whatever their extension.
    Empty,
}

impl Category {
    /// Categories selected by file extension, in folder creation order.
    pub const KNOWN: [Category; 11] = [
        Category::Csv,
        Category::Txt,
        Category::Pdf,
        Category::Docx,
        Category::Jpg,
        Category::Png,
        Category::Mp3,
        Category::Wav,
        Category::Mp4,
        Category::Avi,
        Category::Mkv,
    ];

    /// Every category that owns a folder under the root.
    pub const ALL: [Category; 12] = [
        Category::Csv,
        Category::Txt,
        Category::Pdf,
        Category::Docx,
        Category::Jpg,
        Category::Png,
        Category::Mp3,
        Category::Wav,
        Category::Mp4,
        Category::Avi,
        Category::Mkv,
        Category::Empty,
    ];

    /// Looks up the category for an already lowercased extension.
    pub fn from_extension(extension: &str) -> Option<Category> {
        Self::KNOWN
            .iter()
            .copied()
            .find(|category| category.extension() == Some(extension))
    }

    /// The extension this category matches, `None` for [`Category::Empty`].
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Category::Csv => Some("csv"),
            Category::Txt => Some("txt"),
            Category::Pdf => Some("pdf"),
            Category::Docx => Some("docx"),
            Category::Jpg => Some("jpg"),
            Category::Png => Some("png"),
            Category::Mp3 => Some("mp3"),
            Category::Wav => Some("wav"),
            Category::Mp4 => Some("mp4"),
            Category::Avi => Some("avi"),
            Category::Mkv => Some("mkv"),
            Category::Empty => None,
        }
    }

    /// Returns the folder name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidyup::file_category::Category;
    ///
    /// assert_eq!(Category::Mp3.dir_name(), "mp3_files");
    /// assert_eq!(Category::Empty.dir_name(), "empty_files");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Csv => "csv_files",
            Category::Txt => "txt_files",
            Category::Pdf => "pdf_files",
            Category::Docx => "docx_files",
            Category::Jpg => "jpg_files",
            Category::Png => "png_files",
            Category::Mp3 => "mp3_files",
            Category::Wav => "wav_files",
            Category::Mp4 => "mp4_files",
            Category::Avi => "avi_files",
            Category::Mkv => "mkv_files",
            Category::Empty => "empty_files",
        }
    }
}

/// Returns the lowercased text after the last `.` in `file_name`.
///
/// A name without any `.` is its own extension, so `notes` yields `notes`
/// and never matches a known category. Only the final suffix counts:
/// `data.tar.gz` yields `gz`.
pub fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or(file_name)
        .to_lowercase()
}
