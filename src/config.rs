//! Project configuration loaded from a YAML file.
//!
//! Every key is optional. Command-line flags are applied on top of the loaded
//! values by the CLI before anything is scanned.

use crate::error::{Error, Result};
use crate::filter::PathFilter;
use crate::render::OutputFormat;
use crate::strategy::Framework;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Identifier used when the configuration does not name the project
pub const DEFAULT_ID: &str = "api";

/// How far below the project root module directories are looked for
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// A source root documented as a project of its own
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    /// Name of the module directory below the project root
    pub dir_name: String,
    /// Replaces the top-level `urlPrefix` for this module
    #[serde(default)]
    pub url_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocConfig {
    pub id: String,
    /// Display name; falls back to `id`
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    /// Framework name; detected from the sources when absent
    pub framework: Option<String>,
    /// Prepended to every chapter base path
    pub url_prefix: String,
    #[serde(alias = "urlOnly")]
    pub only_patterns: Vec<String>,
    #[serde(alias = "urlExclude")]
    pub exclude_patterns: Vec<String>,
    /// YAML file holding more only-patterns
    #[serde(alias = "urlOnlyYmlPath")]
    pub only_patterns_file: Option<PathBuf>,
    /// YAML file holding more exclude-patterns
    #[serde(alias = "urlExcludeYmlPath")]
    pub exclude_patterns_file: Option<PathBuf>,
    /// Output directory for rendered files
    pub build_path: Option<PathBuf>,
    pub formats: Vec<OutputFormat>,
    /// Module directories; empty means the project root is the only source root
    pub modules: Vec<ModuleConfig>,
    pub max_depth: usize,
    /// Also write the AsciiDoc of every project into one file
    pub merge_to_one_file: bool,
    /// Stem of the merged file; falls back to `id`
    pub merge_file_name: Option<String>,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_ID.to_string(),
            name: None,
            description: None,
            version: None,
            framework: None,
            url_prefix: String::new(),
            only_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            only_patterns_file: None,
            exclude_patterns_file: None,
            build_path: None,
            formats: vec![OutputFormat::Asciidoc],
            modules: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            merge_to_one_file: false,
            merge_file_name: None,
        }
    }
}

impl DocConfig {
    /// Load a configuration file.
    ///
    /// Relative pattern-file and build paths are resolved against the
    /// directory holding the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for file in [
            &mut config.only_patterns_file,
            &mut config.exclude_patterns_file,
            &mut config.build_path,
        ]
        .into_iter()
        .flatten()
        {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
        Ok(config)
    }

    /// Parse configuration text. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| Error::InvalidConfig(format!("malformed configuration: {}", e)))
    }

    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
            .to_string()
    }

    pub fn merge_file_name(&self) -> &str {
        self.merge_file_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }

    /// Configuration of one module run: the module directory names the
    /// project and may replace the URL prefix
    pub fn for_module(&self, module: &ModuleConfig) -> DocConfig {
        DocConfig {
            id: module.dir_name.clone(),
            name: Some(module.dir_name.clone()),
            url_prefix: module
                .url_prefix
                .clone()
                .unwrap_or_else(|| self.url_prefix.clone()),
            modules: Vec::new(),
            merge_to_one_file: false,
            merge_file_name: None,
            ..self.clone()
        }
    }

    /// The configured framework, if one is named
    pub fn framework(&self) -> Result<Option<Framework>> {
        self.framework
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(Framework::from_name)
            .transpose()
    }

    /// Build the path filter from the inline lists and the pattern files.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern file cannot be read or a pattern is
    /// malformed.
    pub fn path_filter(&self) -> Result<PathFilter> {
        let only = merged_patterns(&self.only_patterns, self.only_patterns_file.as_deref())?;
        let exclude =
            merged_patterns(&self.exclude_patterns, self.exclude_patterns_file.as_deref())?;
        PathFilter::new(only.as_slice(), exclude.as_slice())
    }

    /// Check everything that would otherwise fail halfway through a run
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidConfig("id must not be empty".to_string()));
        }
        if self.formats.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one output format is required".to_string(),
            ));
        }
        check_url_prefix(&self.url_prefix)?;
        if self.max_depth == 0 {
            return Err(Error::InvalidConfig("maxDepth must be at least 1".to_string()));
        }
        for module in &self.modules {
            let dir_name = module.dir_name.trim();
            if dir_name.is_empty() || dir_name.contains(['/', '\\']) {
                return Err(Error::InvalidConfig(format!(
                    "module dirName must be a plain directory name: '{}'",
                    module.dir_name
                )));
            }
            if let Some(prefix) = &module.url_prefix {
                check_url_prefix(prefix)?;
            }
        }
        if self.merge_to_one_file && !self.formats.contains(&OutputFormat::Asciidoc) {
            return Err(Error::InvalidConfig(
                "mergeToOneFile requires the asciidoc format".to_string(),
            ));
        }
        self.framework()?;
        self.path_filter()?;
        Ok(())
    }
}

fn check_url_prefix(prefix: &str) -> Result<()> {
    if !prefix.is_empty() && !prefix.starts_with('/') {
        return Err(Error::InvalidConfig(format!(
            "urlPrefix must start with '/': {}",
            prefix
        )));
    }
    Ok(())
}

fn merged_patterns(inline: &[String], file: Option<&Path>) -> Result<Vec<String>> {
    let mut patterns = inline.to_vec();
    if let Some(file) = file {
        debug!("Reading patterns from {}", file.display());
        let content = fs::read_to_string(file).map_err(|e| {
            Error::InvalidConfig(format!("cannot read {}: {}", file.display(), e))
        })?;
        if !content.trim().is_empty() {
            let listed: Vec<String> = serde_yaml::from_str(&content).map_err(|e| {
                Error::InvalidConfig(format!(
                    "{} must hold a list of patterns: {}",
                    file.display(),
                    e
                ))
            })?;
            patterns.extend(listed);
        }
    }
    Ok(patterns)
}
