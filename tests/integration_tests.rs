use tidyup::cli::{TidyCommand, run_cli_with_config};
/// Integration tests for tidyup
///
/// These tests run whole commands against temporary directories and check
/// the resulting tree and CSV contents.
///
/// Test categories:
/// 1. Folder layout
/// 2. Temporary and empty files
/// 3. Extension classification
/// 4. Dry-run mode
/// 5. CSV cleaning
/// 6. Configuration
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CATEGORY_DIRS: [&str; 12] = [
    "csv_files",
    "txt_files",
    "pdf_files",
    "docx_files",
    "jpg_files",
    "png_files",
    "mp3_files",
    "wav_files",
    "mp4_files",
    "avi_files",
    "mkv_files",
    "empty_files",
];

// ============================================================================
// Test Utilities
// ============================================================================

struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file (and any parent directories) under the fixture root.
    fn create_file(&self, rel_path: &str, content: &[u8]) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write file");
    }

    fn create_text_file(&self, rel_path: &str, content: &str) {
        self.create_file(rel_path, content.as_bytes());
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    fn run(&self, command: TidyCommand) -> Result<(), String> {
        run_cli_with_config(command, self.path(), None)
    }

    /// Run a command and fail the test if it reports an error.
    fn run_ok(&self, command: TidyCommand) {
        if let Err(e) = self.run(command) {
            panic!("{:?} failed: {}", command, e);
        }
    }

    fn run_full(&self) {
        self.run_ok(TidyCommand::Full { dry_run: false });
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// All files under the root, relative to it, sorted.
    fn list_files_recursive(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        Self::walk_dir(self.path(), &mut files);
        let mut files: Vec<_> = files
            .into_iter()
            .map(|p| p.strip_prefix(self.path()).unwrap().to_path_buf())
            .collect();
        files.sort();
        files
    }

    fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    files.push(path);
                } else if path.is_dir() {
                    Self::walk_dir(&path, files);
                }
            }
        }
    }

    fn count_dirs(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .count()
    }
}

// ============================================================================
// Test Suite 1: Folder Layout
// ============================================================================

#[test]
fn test_empty_directory_gets_all_folders() {
    let fixture = TestFixture::new();
    fixture.run_full();

    for dir in CATEGORY_DIRS {
        fixture.assert_dir_exists(dir);
    }
    assert_eq!(fixture.count_dirs(), 12);
    assert!(fixture.list_files_recursive().is_empty());
}

#[test]
fn test_rerun_is_stable() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.txt", "a");
    fixture.create_text_file("b.pdf", "b");

    fixture.run_full();
    let first = fixture.list_files_recursive();
    fixture.run_full();

    assert_eq!(fixture.list_files_recursive(), first);
    assert_eq!(fixture.count_dirs(), 12);
}

#[test]
fn test_missing_root_fails() {
    let result = run_cli_with_config(
        TidyCommand::Full { dry_run: false },
        Path::new("/definitely/not/here"),
        None,
    );
    assert!(result.is_err());
}

// ============================================================================
// Test Suite 2: Temporary and Empty Files
// ============================================================================

#[test]
fn test_temp_files_are_deleted_everywhere() {
    let fixture = TestFixture::new();
    fixture.create_text_file("~$lock", "x");
    fixture.create_text_file("a.bak", "x");
    fixture.create_text_file("nested/b.temp", "x");
    fixture.create_text_file("nested/deeper/c.swp", "x");

    fixture.run_full();

    let names: Vec<_> = fixture
        .list_files_recursive()
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .collect();
    for temp in ["~$lock", "a.bak", "b.temp", "c.swp"] {
        assert!(!names.contains(&temp.to_string()), "{} should be gone", temp);
    }
}

#[test]
fn test_empty_temp_file_is_deleted_not_moved() {
    let fixture = TestFixture::new();
    fixture.create_file("zero.bak", b"");

    fixture.run_full();

    fixture.assert_file_not_exists("zero.bak");
    fixture.assert_file_not_exists("empty_files/zero.bak");
}

#[test]
fn test_empty_files_move_to_empty_folder() {
    let fixture = TestFixture::new();
    fixture.create_file("blank.txt", b"");
    fixture.create_file("sub/blank.csv", b"");
    fixture.create_file("noext", b"");

    fixture.run_full();

    fixture.assert_file_exists("empty_files/blank.txt");
    fixture.assert_file_exists("empty_files/blank.csv");
    fixture.assert_file_exists("empty_files/noext");
    fixture.assert_file_not_exists("blank.txt");
    fixture.assert_file_not_exists("sub/blank.csv");
    fixture.assert_file_not_exists("noext");
}

#[test]
fn test_hidden_files_are_untouched() {
    let fixture = TestFixture::new();
    fixture.create_text_file(".env", "SECRET=1");
    fixture.create_file(".empty.txt", b"");
    fixture.create_text_file(".swap.swp", "x");

    fixture.run_full();

    fixture.assert_file_exists(".env");
    fixture.assert_file_exists(".empty.txt");
    fixture.assert_file_exists(".swap.swp");
}

// ============================================================================
// Test Suite 3: Extension Classification
// ============================================================================

#[test]
fn test_known_extensions_are_sorted() {
    let fixture = TestFixture::new();
    for name in [
        "a.csv", "a.txt", "a.pdf", "a.docx", "a.jpg", "a.png", "a.mp3", "a.wav", "a.mp4",
        "a.avi", "a.mkv",
    ] {
        fixture.create_text_file(name, "data");
    }

    fixture.run_ok(TidyCommand::Organize { dry_run: false });

    for (name, dir) in [
        ("a.csv", "csv_files"),
        ("a.txt", "txt_files"),
        ("a.pdf", "pdf_files"),
        ("a.docx", "docx_files"),
        ("a.jpg", "jpg_files"),
        ("a.png", "png_files"),
        ("a.mp3", "mp3_files"),
        ("a.wav", "wav_files"),
        ("a.mp4", "mp4_files"),
        ("a.avi", "avi_files"),
        ("a.mkv", "mkv_files"),
    ] {
        fixture.assert_file_exists(&format!("{}/{}", dir, name));
        fixture.assert_file_not_exists(name);
    }
}

#[test]
fn test_extension_match_is_case_insensitive() {
    let fixture = TestFixture::new();
    fixture.create_text_file("report.CSV", "a\n1\n");

    fixture.run_full();

    fixture.assert_file_exists("csv_files/report.CSV");
    fixture.assert_file_not_exists("report.CSV");
}

#[test]
fn test_unknown_and_extensionless_files_stay() {
    let fixture = TestFixture::new();
    fixture.create_text_file("notes", "remember");
    fixture.create_text_file("data.tar.gz", "zzz");
    fixture.create_text_file("sub/photo.jpeg", "img");

    fixture.run_full();

    fixture.assert_file_exists("notes");
    fixture.assert_file_exists("data.tar.gz");
    fixture.assert_file_exists("sub/photo.jpeg");
}

#[test]
fn test_nested_files_are_pulled_up() {
    let fixture = TestFixture::new();
    fixture.create_text_file("projects/2024/summary.pdf", "pdf");
    fixture.create_text_file("music/track.wav", "wav");

    fixture.run_full();

    fixture.assert_file_exists("pdf_files/summary.pdf");
    fixture.assert_file_exists("wav_files/track.wav");
    fixture.assert_dir_exists("projects/2024");
}

#[test]
fn test_same_name_collision_overwrites() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a/dup.txt", "first");
    fixture.create_text_file("b/dup.txt", "second");

    fixture.run_full();

    // Snapshot order is sorted, so b/dup.txt lands last
    assert_eq!(fixture.read("txt_files/dup.txt"), "second");
    fixture.assert_file_not_exists("a/dup.txt");
    fixture.assert_file_not_exists("b/dup.txt");
}

#[test]
fn test_empty_file_overwritten_by_earlier_move_stays() {
    let fixture = TestFixture::new();
    fixture.create_file("txt_files/r.txt", b"");
    fixture.create_text_file("a/r.txt", "real content");

    fixture.run_ok(TidyCommand::Organize { dry_run: false });

    assert_eq!(fixture.read("txt_files/r.txt"), "real content");
    fixture.assert_file_not_exists("empty_files/r.txt");
    fixture.assert_file_not_exists("a/r.txt");
}

#[cfg(unix)]
#[test]
fn test_non_utf8_names_do_not_collide() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = TestFixture::new();
    let first = OsStr::from_bytes(b"a\xff.txt");
    let second = OsStr::from_bytes(b"a\xfe.txt");
    fs::write(fixture.path().join(first), "one").unwrap();
    fs::write(fixture.path().join(second), "two").unwrap();

    fixture.run_ok(TidyCommand::Organize { dry_run: false });

    let txt_dir = fixture.path().join("txt_files");
    assert_eq!(fs::read(txt_dir.join(first)).unwrap(), b"one");
    assert_eq!(fs::read(txt_dir.join(second)).unwrap(), b"two");
    assert_eq!(fixture.list_files_recursive().len(), 2);
}

// ============================================================================
// Test Suite 4: Dry-Run Mode
// ============================================================================

#[test]
fn test_dry_run_changes_nothing() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.txt", "a");
    fixture.create_text_file("b.bak", "b");
    fixture.create_file("c.pdf", b"");
    fixture.create_text_file("d.csv", "A,A\n1,1\n1,1\n");

    let before = fixture.list_files_recursive();
    fixture.run_ok(TidyCommand::Full { dry_run: true });

    assert_eq!(fixture.list_files_recursive(), before);
    assert_eq!(fixture.count_dirs(), 0, "Dry-run should not create directories");
    assert_eq!(fixture.read("d.csv"), "A,A\n1,1\n1,1\n");
}

#[test]
fn test_dry_run_then_real_run() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.txt", "a");

    fixture.run_ok(TidyCommand::Organize { dry_run: true });
    fixture.assert_file_exists("a.txt");

    fixture.run_ok(TidyCommand::Organize { dry_run: false });
    fixture.assert_file_exists("txt_files/a.txt");
}

// ============================================================================
// Test Suite 5: CSV Cleaning
// ============================================================================

#[test]
fn test_csv_is_cleaned_after_organizing() {
    let fixture = TestFixture::new();
    fixture.create_text_file("survey.csv", "Col One,Col Two\nA,1\nA,1\nB,\n");

    fixture.run_full();

    fixture.assert_file_not_exists("survey.csv");
    assert_eq!(
        fixture.read("csv_files/survey.csv"),
        "col_one,col_two\nA,1\nB,N/A\n"
    );
}

#[test]
fn test_cleaning_is_idempotent() {
    let fixture = TestFixture::new();
    fixture.create_text_file("survey.csv", "Col One,Col Two\nA,1\nA,1\nB,\n");

    fixture.run_full();
    let first = fixture.read("csv_files/survey.csv");

    fixture.run_ok(TidyCommand::Clean);
    assert_eq!(fixture.read("csv_files/survey.csv"), first);
}

#[test]
fn test_bad_csv_does_not_stop_others() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a_broken.csv", "a,b\n1,2,3\n");
    fixture.create_file("b_binary.csv", b"name\n\xff\xfe\n");
    fixture.create_text_file("c_fine.csv", "First Name\nAnn\nAnn\n");

    let result = fixture.run(TidyCommand::Full { dry_run: false });
    assert!(result.is_ok(), "CSV failures must not fail the run");

    assert_eq!(fixture.read("csv_files/a_broken.csv"), "a,b\n1,2,3\n");
    assert_eq!(fixture.read("csv_files/c_fine.csv"), "first_name\nAnn\n");
}

#[test]
fn test_uppercase_csv_suffix_is_moved_but_not_cleaned() {
    let fixture = TestFixture::new();
    fixture.create_text_file("LOUD.CSV", "Col A\nx\nx\n");

    fixture.run_full();

    assert_eq!(fixture.read("csv_files/LOUD.CSV"), "Col A\nx\nx\n");
}

#[test]
fn test_clean_only_leaves_tree_alone() {
    let fixture = TestFixture::new();
    fixture.create_text_file("loose.txt", "x");
    fixture.create_text_file("csv_files/t.csv", "K\n1\n1\n");

    fixture.run_ok(TidyCommand::Clean);

    fixture.assert_file_exists("loose.txt");
    assert_eq!(fixture.read("csv_files/t.csv"), "k\n1\n");
}

// ============================================================================
// Test Suite 6: Configuration
// ============================================================================

#[test]
fn test_root_config_excludes_files() {
    let fixture = TestFixture::new();
    fixture.create_text_file(
        ".tidyup.toml",
        "[organizer.exclude]\nfilenames = [\"keep.bak\"]\npatterns = [\"vault/**\"]\n",
    );
    fixture.create_text_file("keep.bak", "x");
    fixture.create_text_file("vault/secret.txt", "x");
    fixture.create_text_file("loose.txt", "x");

    fixture.run_full();

    fixture.assert_file_exists("keep.bak");
    fixture.assert_file_exists("vault/secret.txt");
    fixture.assert_file_exists("txt_files/loose.txt");
    fixture.assert_file_exists(".tidyup.toml");
}

#[test]
fn test_explicit_config_sets_missing_value() {
    let fixture = TestFixture::new();
    let config_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = config_dir.path().join("tidyup.toml");
    fs::write(&config_path, "[cleaner]\nmissing_value = \"unknown\"\n").unwrap();
    fixture.create_text_file("t.csv", "a,b\n1,\n");

    run_cli_with_config(
        TidyCommand::Full { dry_run: false },
        fixture.path(),
        Some(&config_path),
    )
    .expect("run should succeed");

    assert_eq!(fixture.read("csv_files/t.csv"), "a,b\n1,unknown\n");
}

#[test]
fn test_missing_explicit_config_fails() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.txt", "a");

    let result = run_cli_with_config(
        TidyCommand::Full { dry_run: false },
        fixture.path(),
        Some(Path::new("/no/such/config.toml")),
    );

    assert!(result.is_err());
    fixture.assert_file_exists("a.txt");
}
