//! # sizr
//!
//! Show how much disk space each dependency of a Node.js project takes.
//!
//! The tool reads `package.json`, measures every declared dependency under
//! `node_modules/` and prints a table colored by size (green below 1 MiB,
//! yellow below 10 MiB, red above) followed by the total.
//!
//! ## Usage
//!
//! ```bash
//! # Report on the current directory
//! sizr
//!
//! # Another project, without colors
//! sizr ~/work/app --no-color
//!
//! # Machine-readable output
//! sizr --json
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use sizr::Reporter;
use std::process::exit;

/// Entry point for the sizr application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err:#}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed, or if the
/// report cannot be written to stdout.
fn inner_main() -> Result<()> {
    let args = Cli::parse();

    Reporter::new(args.report_options()).run()?;

    Ok(())
}
