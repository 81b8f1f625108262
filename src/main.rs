//! Command-line tool generating HTTP API documentation from annotated Rust
//! sources.
//!
//! # Usage
//!
//! ```bash
//! apidoc-from-source [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Write AsciiDoc books to `build/`:
//! ```bash
//! apidoc-from-source ./my-service -o build
//! ```
//!
//! Print a JSON export of the `/users` endpoints only:
//! ```bash
//! apidoc-from-source ./my-service -f json --only '/users/**'
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! apidoc-from-source ./my-service -v
//! ```

use anyhow::Result;
use apidoc_from_source::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("apidoc-from-source starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Documentation generated successfully");
    Ok(())
}
