use crate::config::DocConfig;
use crate::declaration::{lower_file, SourceUnit};
use crate::detector::FrameworkDetector;
use crate::engine::DocEngine;
use crate::parser::AstParser;
use crate::render::{asciidoc, OutputFormat, RenderedFile};
use crate::scanner::FileScanner;
use crate::schema::Project;
use crate::serializer::write_to_file;
use crate::strategy::Framework;
use crate::type_resolver::SourceIndex;
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Configuration file picked up from the project root when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "apidoc.yml";

/// HTTP API documentation from Spring-style annotated Rust sources
#[derive(Parser, Debug)]
#[command(name = "apidoc-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Configuration file (defaults to PROJECT_PATH/apidoc.yml when present)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Output format; repeat for several
    #[arg(short = 'f', long = "format", value_enum)]
    pub formats: Vec<OutputFormat>,

    /// Output directory (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Source framework (if not specified, auto-detect)
    #[arg(short = 'w', long = "framework", value_enum)]
    pub framework: Option<Framework>,

    /// Only document paths matching this pattern; repeatable
    #[arg(long = "only", value_name = "PATTERN")]
    pub only: Vec<String>,

    /// Skip paths matching this pattern; repeatable
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Prefix prepended to every documented path
    #[arg(long = "url-prefix", value_name = "PREFIX")]
    pub url_prefix: Option<String>,

    /// Project identifier, used in output file names
    #[arg(long = "id")]
    pub id: Option<String>,

    /// Project display name
    #[arg(long = "name")]
    pub name: Option<String>,

    /// Documented API version
    #[arg(long = "version-label", value_name = "VERSION")]
    pub version_label: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Validate already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }
    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }
    if let Some(config) = &args.config_path {
        if !config.is_file() {
            anyhow::bail!("Config file does not exist: {}", config.display());
        }
    }

    info!("Project path: {}", args.project_path.display());
    Ok(args)
}

/// Load the configuration file and apply command-line overrides.
///
/// The result is validated, so malformed patterns and unknown frameworks are
/// reported before any source is scanned.
pub fn load_config(args: &CliArgs) -> Result<DocConfig> {
    let default_path = args.project_path.join(DEFAULT_CONFIG_FILE);
    let config_path = match &args.config_path {
        Some(path) => Some(path.clone()),
        None if default_path.is_file() => Some(default_path),
        None => None,
    };

    let mut config = match &config_path {
        Some(path) => {
            info!("Using configuration {}", path.display());
            DocConfig::load(path)
                .with_context(|| format!("Failed to load configuration: {}", path.display()))?
        }
        None => DocConfig::default(),
    };
    apply_overrides(&mut config, args);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn apply_overrides(config: &mut DocConfig, args: &CliArgs) {
    if let Some(id) = &args.id {
        config.id = id.clone();
    }
    if let Some(name) = &args.name {
        config.name = Some(name.clone());
    }
    if let Some(version) = &args.version_label {
        config.version = Some(version.clone());
    }
    if let Some(prefix) = &args.url_prefix {
        config.url_prefix = prefix.clone();
    }
    if !args.only.is_empty() {
        config.only_patterns = args.only.clone();
        config.only_patterns_file = None;
    }
    if !args.exclude.is_empty() {
        config.exclude_patterns = args.exclude.clone();
        config.exclude_patterns_file = None;
    }
    if !args.formats.is_empty() {
        config.formats = args.formats.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.build_path = Some(dir.clone());
    }
}

/// Extract and filter the documentation project of a source tree.
///
/// `framework` wins over the configured one; with neither, the framework is
/// detected from the sources.
pub fn generate(
    project_path: &Path,
    config: &DocConfig,
    framework: Option<Framework>,
) -> Result<Project> {
    info!("Scanning project directory...");
    let scan_result = FileScanner::new(project_path.to_path_buf()).scan()?;
    info!("Found {} Rust files", scan_result.rust_files.len());
    if scan_result.rust_files.is_empty() {
        anyhow::bail!("No Rust files found in the project directory");
    }

    info!("Parsing Rust files...");
    let batch = AstParser::parse_all(&scan_result.rust_files);
    if batch.parsed.is_empty() {
        anyhow::bail!("No files could be parsed successfully");
    }
    if !batch.failed.is_empty() {
        warn!("{} files could not be parsed", batch.failed.len());
    }

    let units: Vec<SourceUnit> = batch.parsed.iter().map(lower_file).collect();
    let index = SourceIndex::new(&batch.parsed);
    debug!("Indexed {} type declarations", index.len());

    let framework = match framework.or(config.framework()?) {
        Some(framework) => framework,
        None => {
            info!("Detecting source framework...");
            FrameworkDetector::require(&units).context(concat!(
                "Please specify a framework using --framework option.\n",
                "Supported frameworks: spring"
            ))?
        }
    };
    info!("Framework: {:?}", framework);

    let engine = DocEngine::for_framework(framework);
    let mut project = engine.build_project(config, &units, &index);
    project.retain_renderable(&config.path_filter()?);
    Ok(project)
}

/// Extract one project per source root.
///
/// Without configured modules the project path is the only source root.
/// Otherwise every module directory found within `maxDepth` levels becomes a
/// project of its own. A module that fails is logged and skipped.
pub fn generate_all(
    project_path: &Path,
    config: &DocConfig,
    framework: Option<Framework>,
) -> Result<Vec<Project>> {
    if config.modules.is_empty() {
        return Ok(vec![generate(project_path, config, framework)?]);
    }

    let names: Vec<&str> = config.modules.iter().map(|m| m.dir_name.trim()).collect();
    let dirs = FileScanner::new(project_path.to_path_buf()).find_dirs(&names, config.max_depth)?;
    for name in &names {
        if !dirs.iter().any(|d| d.file_name().is_some_and(|f| f == *name)) {
            warn!("Module directory {} not found within depth {}", name, config.max_depth);
        }
    }

    let mut projects = Vec::new();
    for dir in &dirs {
        let Some(module) = config
            .modules
            .iter()
            .find(|m| dir.file_name().is_some_and(|f| f == m.dir_name.trim()))
        else {
            continue;
        };
        info!("Documenting module {}", dir.display());
        match generate(dir, &config.for_module(module), framework) {
            Ok(project) => projects.push(project),
            Err(e) => warn!("Skipping module {}: {:#}", dir.display(), e),
        }
    }

    if projects.is_empty() {
        anyhow::bail!("No module directory produced documentation");
    }
    Ok(projects)
}

/// Render a project in every configured format
pub fn render(project: &Project, formats: &[OutputFormat]) -> Result<Vec<RenderedFile>> {
    let mut files = Vec::new();
    for format in formats {
        info!("Rendering {:?}...", format);
        files.extend(format.renderer().render(project)?);
    }
    Ok(files)
}

/// Render every project, plus the merged AsciiDoc file when configured
pub fn render_all(projects: &[Project], config: &DocConfig) -> Result<Vec<RenderedFile>> {
    let mut files = Vec::new();
    let mut books = Vec::new();
    for project in projects {
        for format in &config.formats {
            let rendered = format.renderer().render(project)?;
            if *format == OutputFormat::Asciidoc {
                books.extend(rendered.iter().cloned());
            }
            files.extend(rendered);
        }
    }

    if config.merge_to_one_file && !books.is_empty() {
        files.push(asciidoc::merge(config.merge_file_name(), &books));
    }
    Ok(files)
}

/// Write rendered files below `output_dir`, or to stdout without one
pub fn write_output(files: &[RenderedFile], output_dir: Option<&Path>) -> Result<()> {
    for file in files {
        match output_dir {
            Some(dir) => {
                let path = dir.join(&file.path);
                write_to_file(&file.content, &path)?;
                info!("Wrote {}", path.display());
            }
            None => println!("{}", file.content),
        }
    }
    Ok(())
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let config = load_config(&args)?;
    let projects = generate_all(&args.project_path, &config, args.framework)?;

    let sections: usize = projects.iter().map(|p| p.sections().count()).sum();
    if sections == 0 {
        warn!("No endpoints left to document");
    }

    let files = render_all(&projects, &config)?;
    write_output(&files, config.build_path.as_deref())?;

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Projects: {}", projects.len());
    info!(
        "  - Books: {}",
        projects.iter().map(|p| p.books.len()).sum::<usize>()
    );
    info!(
        "  - Chapters: {}",
        projects.iter().map(|p| p.chapters().count()).sum::<usize>()
    );
    info!("  - Sections: {}", sections);
    info!("  - Files: {}", files.len());
    Ok(())
}
