use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Parses controller and model sources with `syn`.
///
/// Parsing is the only step that touches file contents. Everything after it
/// works on [`ParsedFile`] values, first lowered into the declaration tree and
/// indexed by type name.
///
/// # Example
///
/// ```no_run
/// use apidoc_from_source::parser::AstParser;
/// use std::path::PathBuf;
///
/// let batch = AstParser::parse_all(&[PathBuf::from("src/user_controller.rs")]);
/// println!("{} parsed, {} skipped", batch.parsed.len(), batch.failed.len());
/// ```
pub struct AstParser;

/// A source file together with its syntax tree
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub syntax_tree: syn::File,
}

impl ParsedFile {
    /// Parses in-memory source text attributed to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid Rust.
    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> Result<Self> {
        let path = path.into();
        let syntax_tree = syn::parse_file(source)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;
        Ok(Self { path, syntax_tree })
    }
}

/// Outcome of parsing a set of files
#[derive(Debug, Default)]
pub struct ParseBatch {
    /// Files that parsed, in input order
    pub parsed: Vec<ParsedFile>,
    /// Files that could not be read or parsed
    pub failed: Vec<PathBuf>,
}

impl AstParser {
    /// Reads and parses a single source file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the Rust source file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid Rust
    /// syntax.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        ParsedFile::from_source(path, &content)
    }

    /// Parses every file, skipping the ones that fail.
    ///
    /// A broken file only costs the endpoints declared in it, so failures are
    /// logged and recorded rather than returned.
    ///
    /// # Arguments
    ///
    /// * `paths` - Source files, usually from [`crate::scanner::FileScanner`]
    ///
    /// # Returns
    ///
    /// The parsed files in input order plus the paths that were skipped.
    pub fn parse_all(paths: &[PathBuf]) -> ParseBatch {
        let mut batch = ParseBatch::default();
        for path in paths {
            match Self::parse_file(path) {
                Ok(parsed) => batch.parsed.push(parsed),
                Err(e) => {
                    warn!("Skipping {}: {:#}", path.display(), e);
                    batch.failed.push(path.clone());
                }
            }
        }
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            batch.parsed.len(),
            batch.failed.len()
        );
        batch
    }
}
