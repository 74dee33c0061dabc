//! Command-line interface definition and argument parsing.
//!
//! Every argument is optional. Without any, the report runs in the current
//! directory with colored output, which is what [`ReportOptions::default`]
//! describes.

use std::path::PathBuf;

use clap::Parser;

use sizr::config::{OutputMode, ReportOptions};

/// Main command-line interface structure.
#[derive(Parser)]
#[command(name = "sizr")]
#[command(about = "Show the on-disk size of every dependency declared in package.json")]
#[command(version)]
pub(crate) struct Cli {
    /// Project directory containing package.json and node_modules/
    ///
    /// Defaults to the current directory.
    dir: Option<PathBuf>,

    /// Print the report as JSON instead of a table
    ///
    /// Diagnostics are still written to stderr.
    #[arg(long, conflicts_with = "no_color")]
    json: bool,

    /// Disable colored output
    ///
    /// The `NO_COLOR` environment variable is honored as well.
    #[arg(long)]
    no_color: bool,

    /// The number of threads used to measure packages
    ///
    /// A value of 0 uses the default number of threads (typically the number of CPU cores).
    #[arg(short = 't', long, default_value_t = 0)]
    threads: usize,
}

impl Cli {
    /// Output mode selected by the flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.no_color {
            OutputMode::Plain
        } else {
            OutputMode::Colored
        }
    }

    /// Build the report options, using defaults for anything not given.
    pub(crate) fn report_options(&self) -> ReportOptions {
        let defaults = ReportOptions::default();

        ReportOptions {
            root: self.dir.clone().unwrap_or(defaults.root),
            output: self.output_mode(),
            threads: self.threads,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sizr").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_arguments_match_defaults() {
        let options = parse(&[]).report_options();
        let defaults = ReportOptions::default();

        assert_eq!(options.root, defaults.root);
        assert_eq!(options.manifest, defaults.manifest);
        assert_eq!(options.modules_dir, defaults.modules_dir);
        assert_eq!(options.output, OutputMode::Colored);
        assert_eq!(options.threads, 0);
    }

    #[test]
    fn test_directory_and_flags() {
        let options = parse(&["/work/app", "--no-color", "-t", "4"]).report_options();

        assert_eq!(options.root, PathBuf::from("/work/app"));
        assert_eq!(options.output, OutputMode::Plain);
        assert_eq!(options.threads, 4);
    }

    #[test]
    fn test_json_flag() {
        assert_eq!(parse(&["--json"]).report_options().output, OutputMode::Json);
    }

    #[test]
    fn test_json_conflicts_with_no_color() {
        assert!(Cli::try_parse_from(["sizr", "--json", "--no-color"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
