//! HTTP API documentation extracted from annotated Rust sources.
//!
//! Controller-like `impl` and `trait` blocks carrying a Spring-style attribute
//! dialect (`#[rest_controller]`, `#[request_mapping("/users")]`,
//! `#[get_mapping("/{id}")]`, ...) are read without compiling or running the
//! service. Their handlers become sections of a Project → Book → Chapter →
//! Section document, with request and response fields flattened into rows.
//!
//! # Architecture
//!
//! 1. [`scanner`] - finds `.rs` files below a project root
//! 2. [`parser`] - parses them with `syn`
//! 3. [`declaration`] - lowers syntax trees into classes, methods and doc tags
//! 4. [`type_resolver`] - indexes struct, enum and alias declarations by name
//! 5. [`resolver`] - turns type references into [`description::TypeDescription`] trees
//! 6. [`strategy`] - framework dialects populating chapters and sections
//! 7. [`engine`] - drives a strategy over all declarations into a [`schema::Project`]
//! 8. [`filter`] - path patterns deciding which sections are emitted
//! 9. [`render`] - AsciiDoc, JSON and YAML output
//!
//! # Example Usage
//!
//! ```no_run
//! use apidoc_from_source::{
//!     config::DocConfig,
//!     declaration::lower_file,
//!     engine::DocEngine,
//!     parser::AstParser,
//!     render::{OutputFormat, ProjectRender},
//!     scanner::FileScanner,
//!     strategy::Framework,
//!     type_resolver::SourceIndex,
//! };
//! use std::path::PathBuf;
//!
//! let scan = FileScanner::new(PathBuf::from("./my-service")).scan().unwrap();
//! let batch = AstParser::parse_all(&scan.rust_files);
//! let units: Vec<_> = batch.parsed.iter().map(lower_file).collect();
//! let index = SourceIndex::new(&batch.parsed);
//!
//! let config = DocConfig::default();
//! let mut project = DocEngine::for_framework(Framework::Spring)
//!     .build_project(&config, &units, &index);
//! project.retain_renderable(&config.path_filter().unwrap());
//!
//! for file in OutputFormat::Asciidoc.renderer().render(&project).unwrap() {
//!     println!("{}", file.content);
//! }
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod config;
pub mod declaration;
pub mod description;
pub mod detector;
pub mod engine;
pub mod error;
pub mod filter;
pub mod parser;
pub mod render;
pub mod resolver;
pub mod scanner;
pub mod schema;
pub mod serializer;
pub mod strategy;
pub mod type_resolver;
pub mod uri;
