//! Renderers turning a filtered [`Project`] into output files.
//!
//! Renderers never write to disk themselves. They return [`RenderedFile`]s and
//! the caller decides whether those go to an output directory or stdout.

pub mod asciidoc;

use crate::schema::Project;
use crate::serializer::{serialize_json, serialize_yaml};
use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use asciidoc::AsciidocRender;

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// AsciiDoc markup, one file per book
    Asciidoc,
    /// JSON export of the document model
    Json,
    /// YAML export of the document model
    Yaml,
}

impl OutputFormat {
    pub fn renderer(self) -> Box<dyn ProjectRender> {
        match self {
            OutputFormat::Asciidoc => Box::new(AsciidocRender),
            OutputFormat::Json => Box::new(JsonRender),
            OutputFormat::Yaml => Box::new(YamlRender),
        }
    }
}

/// A rendered document and the path it should be written to, relative to
/// the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
}

impl RenderedFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Turns a project into output documents.
///
/// Implementations receive a project that has already been filtered, so
/// they render every chapter and section they are given.
pub trait ProjectRender {
    fn render(&self, project: &Project) -> Result<Vec<RenderedFile>>;
}

/// Exports the whole project as `{id}.json`
pub struct JsonRender;

impl ProjectRender for JsonRender {
    fn render(&self, project: &Project) -> Result<Vec<RenderedFile>> {
        let content = serialize_json(project)?;
        Ok(vec![RenderedFile::new(format!("{}.json", project.id), content)])
    }
}

/// Exports the whole project as `{id}.yaml`
pub struct YamlRender;

impl ProjectRender for YamlRender {
    fn render(&self, project: &Project) -> Result<Vec<RenderedFile>> {
        let content = serialize_yaml(project)?;
        Ok(vec![RenderedFile::new(format!("{}.yaml", project.id), content)])
    }
}
