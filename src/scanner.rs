use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never holding sources worth documenting
const SKIPPED_DIRS: &[&str] = &["target"];

/// Collects the `.rs` files below a project root.
///
/// Files come back in a stable order (sorted by path within each directory,
/// depth first), so chapters and books are emitted in the same order on every
/// run.
///
/// # Example
///
/// ```no_run
/// use apidoc_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let result = FileScanner::new(PathBuf::from("./my-service")).scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    skipped_dirs: Vec<String>,
}

/// Files found by a scan plus the entries that could not be read
pub struct ScanResult {
    pub rust_files: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            skipped_dirs: SKIPPED_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Skip another directory name wherever it appears in the tree
    pub fn skip_dir(mut self, name: impl Into<String>) -> Self {
        self.skipped_dirs.push(name.into());
        self
    }

    /// Walks the tree below the root.
    ///
    /// Hidden entries and skipped directories are pruned. Unreadable entries
    /// are logged and reported in [`ScanResult::warnings`].
    ///
    /// # Errors
    ///
    /// Returns an error if the root itself cannot be read.
    pub fn scan(&self) -> Result<ScanResult> {
        std::fs::read_dir(&self.root_path)
            .with_context(|| format!("Failed to read directory: {}", self.root_path.display()))?;

        let mut rust_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.path() == self.root_path || !self.is_pruned(e));

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() && is_rust_file(entry.path()) => {
                    rust_files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        debug!(
            "Scanned {}: {} Rust files",
            self.root_path.display(),
            rust_files.len()
        );
        Ok(ScanResult {
            rust_files,
            warnings,
        })
    }

    /// Directories below the root named one of `names`, at most `max_depth`
    /// levels down, in the same stable order as [`FileScanner::scan`].
    ///
    /// Hidden and skipped directories are neither matched nor descended into.
    ///
    /// # Errors
    ///
    /// Returns an error if the root itself cannot be read.
    pub fn find_dirs(&self, names: &[&str], max_depth: usize) -> Result<Vec<PathBuf>> {
        std::fs::read_dir(&self.root_path)
            .with_context(|| format!("Failed to read directory: {}", self.root_path.display()))?;

        let walker = WalkDir::new(&self.root_path)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.path() == self.root_path || (e.file_type().is_dir() && !self.is_pruned(e))
            });

        let mut dirs = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) if names.iter().any(|n| entry.file_name() == *n) => {
                    debug!("Found module directory {}", entry.path().display());
                    dirs.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => warn!("Failed to access path: {}", e),
            }
        }
        Ok(dirs)
    }

    fn is_pruned(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.')
            || (entry.file_type().is_dir() && self.skipped_dirs.iter().any(|d| *d == name))
    }
}

fn is_rust_file(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("rs")
}
