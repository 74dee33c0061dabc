//! Report orchestration.
//!
//! A run goes through a fixed sequence: load the manifest, merge the
//! dependency sections, measure every install directory, then print one line
//! per package followed by the total. Only the first step can fail the run;
//! every later failure is reported on the error stream and skipped.

use std::io::{self, Write};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::{
    config::{OutputMode, ReportOptions},
    manifest::{DependencySpec, Manifest},
    output::JsonReport,
    package::{Package, PackageError, Packages},
    utils::{WalkIssue, format_size},
};

/// First line of the table.
pub const HEADER: &str = "Package Sizes:";

/// Line printed below the header and above the total.
pub const SEPARATOR: &str = "======================================";

/// Label of the final line.
pub const TOTAL_LABEL: &str = "Total size:";

/// Result of a finished report run.
#[derive(Debug, Default)]
pub struct ReportSummary {
    /// Packages that made it into the report, in report order.
    pub packages: Packages,

    /// Sum of the sizes of `packages`, in bytes.
    pub total_size: u64,

    /// Number of dependencies skipped because of a per-package error.
    pub failed: usize,
}

impl ReportSummary {
    fn record(&mut self, package: Package) {
        self.total_size = self.total_size.saturating_add(package.size);
        self.packages.push(package);
    }
}

/// Runs the dependency size report.
#[derive(Debug, Default)]
pub struct Reporter {
    options: ReportOptions,
}

impl Reporter {
    /// Create a reporter with the given options.
    #[must_use]
    pub const fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Run the report against the process' stdout and stderr.
    ///
    /// # Errors
    ///
    /// See [`Reporter::run_with`].
    pub fn run(&self) -> Result<ReportSummary> {
        let stdout = io::stdout();
        let stderr = io::stderr();

        self.run_with(&mut stdout.lock(), &mut stderr.lock())
    }

    /// Run the report, writing the report to `out` and diagnostics to `err`.
    ///
    /// # Errors
    ///
    /// Fails if the manifest cannot be read or parsed, if the measuring
    /// thread pool cannot be built, or if the header, separator or total
    /// cannot be written. Failures for individual packages are reported on
    /// `err` and counted in [`ReportSummary::failed`] instead.
    pub fn run_with<O, E>(&self, out: &mut O, err: &mut E) -> Result<ReportSummary>
    where
        O: Write,
        E: Write,
    {
        let manifest = Manifest::load(&self.options.manifest_path()).with_context(|| {
            format!("Could not read {} file", self.options.manifest.display())
        })?;

        let results = self.measure(manifest.merged_dependencies())?;

        match self.options.output {
            OutputMode::Json => self.render_json(results, out, err),
            OutputMode::Colored | OutputMode::Plain => self.render_table(results, out, err),
        }
    }

    /// Measure all dependencies, on a dedicated pool if a thread count was set.
    fn measure(&self, specs: Vec<DependencySpec>) -> Result<Vec<Result<Package, PackageError>>> {
        let modules_dir = self.options.modules_path();

        if self.options.threads == 0 {
            return Ok(Packages::measure_all(specs, &modules_dir));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.threads)
            .build()
            .context("Failed to build the measuring thread pool")?;

        Ok(pool.install(|| Packages::measure_all(specs, &modules_dir)))
    }

    fn render_table<O, E>(
        &self,
        results: Vec<Result<Package, PackageError>>,
        out: &mut O,
        err: &mut E,
    ) -> Result<ReportSummary>
    where
        O: Write,
        E: Write,
    {
        let colored = self.options.output == OutputMode::Colored;
        let mut summary = ReportSummary::default();

        writeln!(out, "{HEADER}")?;
        writeln!(out, "{SEPARATOR}")?;

        for result in results {
            let package = match result {
                Ok(package) => package,
                Err(e) => {
                    self.package_failed(&mut summary, &e, err);
                    continue;
                }
            };

            self.report_walk_issues(&package.issues, err);

            let line = if colored {
                package
                    .report_line()
                    .color(package.tier().color())
                    .to_string()
            } else {
                package.report_line()
            };

            if let Err(source) = writeln!(out, "{line}") {
                let e = PackageError::Output {
                    name: package.name,
                    source,
                };
                self.package_failed(&mut summary, &e, err);
                continue;
            }

            summary.record(package);
        }

        let total = format_size(summary.total_size);

        writeln!(out, "{SEPARATOR}")?;
        if colored {
            writeln!(out, "{} {total}", TOTAL_LABEL.bold())?;
        } else {
            writeln!(out, "{TOTAL_LABEL} {total}")?;
        }
        out.flush()?;

        Ok(summary)
    }

    fn render_json<O, E>(
        &self,
        results: Vec<Result<Package, PackageError>>,
        out: &mut O,
        err: &mut E,
    ) -> Result<ReportSummary>
    where
        O: Write,
        E: Write,
    {
        let mut summary = ReportSummary::default();

        for result in results {
            match result {
                Ok(package) => {
                    self.report_walk_issues(&package.issues, err);
                    summary.record(package);
                }
                Err(e) => self.package_failed(&mut summary, &e, err),
            }
        }

        serde_json::to_writer_pretty(&mut *out, &JsonReport::from_summary(&summary))?;
        writeln!(out)?;
        out.flush()?;

        Ok(summary)
    }

    fn package_failed<E: Write>(&self, summary: &mut ReportSummary, e: &PackageError, err: &mut E) {
        summary.failed += 1;
        self.diagnose(
            err,
            &format!("Error processing package {}: {e}", e.package_name()),
        );
    }

    fn report_walk_issues<E: Write>(&self, issues: &[WalkIssue], err: &mut E) {
        for issue in issues {
            self.diagnose(
                err,
                &format!(
                    "Error reading directory {}: {}",
                    issue.path.display(),
                    issue.message
                ),
            );
        }
    }

    /// Print one diagnostic line. A failing error stream is ignored since
    /// there is nowhere left to report it.
    fn diagnose<E: Write>(&self, err: &mut E, message: &str) {
        let _ = if self.options.output == OutputMode::Plain {
            writeln!(err, "{message}")
        } else {
            writeln!(err, "{}", message.red())
        };
    }
}

/// Run the report with default options, as the `sizr` binary does without
/// arguments: `package.json` and `node_modules/` in the current directory.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed. The caller
/// decides how to exit; the binary prints the error and exits with status 1.
pub fn run_report() -> Result<ReportSummary> {
    Reporter::default().run()
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use tempfile::TempDir;

    use super::*;

    fn project(manifest: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("package.json"), manifest).unwrap();
        tmp
    }

    fn install(root: &Path, name: &str, bytes: usize) {
        let dir = root.join("node_modules").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.js"), vec![b'x'; bytes]).unwrap();
    }

    fn reporter(root: &Path, output: OutputMode) -> Reporter {
        Reporter::new(ReportOptions {
            root: root.to_path_buf(),
            output,
            ..ReportOptions::default()
        })
    }

    fn run(reporter: &Reporter) -> (Result<ReportSummary>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = reporter.run_with(&mut out, &mut err);

        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_single_dependency_table() {
        let tmp = project(r#"{ "dependencies": { "left-pad": "1.0.0" } }"#);
        install(tmp.path(), "left-pad", 2048);

        let (result, out, err) = run(&reporter(tmp.path(), OutputMode::Plain));
        let summary = result.unwrap();

        let expected = format!(
            "{HEADER}\n{SEPARATOR}\n{:<30} {:>10}\n{SEPARATOR}\nTotal size: 2.00 KB\n",
            "left-pad", "2.00 KB"
        );
        assert_eq!(out, expected);
        assert!(err.is_empty());
        assert_eq!(summary.total_size, 2048);
        assert_eq!(summary.packages.len(), 1);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let tmp = TempDir::new().unwrap();

        let (result, out, _) = run(&reporter(tmp.path(), OutputMode::Plain));

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.starts_with("Could not read package.json file"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_manifest_is_fatal() {
        let tmp = project("{ \"dependencies\": ");

        let (result, out, _) = run(&reporter(tmp.path(), OutputMode::Plain));

        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_install_dir_counts_as_zero() {
        let tmp = project(r#"{ "dependencies": { "ghost": "^1.0.0", "real": "1.0.0" } }"#);
        install(tmp.path(), "real", 100);

        let (result, out, err) = run(&reporter(tmp.path(), OutputMode::Plain));
        let summary = result.unwrap();

        assert!(out.contains(&format!("{:<30} {:>10}", "ghost", "0.00 B")));
        assert!(out.ends_with("Total size: 100.00 B\n"));
        assert!(err.starts_with("Error reading directory "));
        assert!(err.contains("ghost"));
        assert_eq!(summary.packages.len(), 2);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_invalid_name_is_skipped() {
        let tmp = project(r#"{ "dependencies": { "../outside": "1.0.0", "ok": "1.0.0" } }"#);
        install(tmp.path(), "ok", 10);

        let (result, out, err) = run(&reporter(tmp.path(), OutputMode::Plain));
        let summary = result.unwrap();

        assert!(!out.contains("outside"));
        assert!(out.contains("ok"));
        assert!(err.contains("Error processing package ../outside:"));
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_size, 10);
    }

    #[test]
    fn test_lines_follow_merge_order() {
        let tmp = project(
            r#"{
  "dependencies": { "b-dep": "1", "a-dep": "1" },
  "devDependencies": { "c-dep": "1", "a-dep": "2" }
}"#,
        );
        for name in ["a-dep", "b-dep", "c-dep"] {
            install(tmp.path(), name, 1);
        }

        let (result, out, _) = run(&reporter(tmp.path(), OutputMode::Plain));
        let summary = result.unwrap();

        let names: Vec<&str> = summary
            .packages
            .as_slice()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["b-dep", "a-dep", "c-dep"]);
        assert_eq!(summary.packages.as_slice()[1].version, "2");

        let b = out.find("b-dep").unwrap();
        let a = out.find("a-dep").unwrap();
        let c = out.find("c-dep").unwrap();
        assert!(b < a && a < c);
    }

    #[test]
    fn test_runs_are_idempotent() {
        let tmp = project(r#"{ "dependencies": { "x": "1" }, "devDependencies": { "y": "1" } }"#);
        install(tmp.path(), "x", 3000);
        install(tmp.path(), "y", 5_000_000);
        let reporter = reporter(tmp.path(), OutputMode::Plain);

        let (first, first_out, _) = run(&reporter);
        let (second, second_out, _) = run(&reporter);

        assert_eq!(first_out, second_out);
        assert_eq!(first.unwrap().total_size, second.unwrap().total_size);
    }

    #[test]
    fn test_dedicated_thread_pool() {
        let tmp = project(r#"{ "dependencies": { "x": "1", "y": "1" } }"#);
        install(tmp.path(), "x", 10);
        install(tmp.path(), "y", 20);
        let reporter = Reporter::new(ReportOptions {
            root: tmp.path().to_path_buf(),
            output: OutputMode::Plain,
            threads: 2,
            ..ReportOptions::default()
        });

        let (result, _, _) = run(&reporter);

        assert_eq!(result.unwrap().total_size, 30);
    }

    #[test]
    fn test_colored_lines_follow_tiers() {
        colored::control::set_override(true);

        let tmp = project(
            r#"{ "dependencies": { "tiny": "1", "medium": "1" }, "devDependencies": { "huge": "1" } }"#,
        );
        install(tmp.path(), "tiny", 2048);
        install(tmp.path(), "medium", 2 * 1024 * 1024);
        install(tmp.path(), "huge", 12 * 1024 * 1024);

        let (result, out, _) = run(&reporter(tmp.path(), OutputMode::Colored));
        result.unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[2].starts_with("\u{1b}[32m") && lines[2].contains("tiny"));
        assert!(lines[3].starts_with("\u{1b}[33m") && lines[3].contains("medium"));
        assert!(lines[4].starts_with("\u{1b}[31m") && lines[4].contains("huge"));
        assert!(lines[2].ends_with("\u{1b}[0m"));
        assert!(out.contains("\u{1b}[1mTotal size:\u{1b}[0m"));
    }

    #[test]
    fn test_json_output() {
        let tmp = project(r#"{ "dependencies": { "left-pad": "1.0.0", "/abs": "1" } }"#);
        install(tmp.path(), "left-pad", 2048);

        let (result, out, err) = run(&reporter(tmp.path(), OutputMode::Json));
        result.unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["packages"][0]["name"], "left-pad");
        assert_eq!(value["packages"][0]["size_formatted"], "2.00 KB");
        assert_eq!(value["packages"][0]["tier"], "small");
        assert_eq!(value["summary"]["total_size"], 2048);
        assert_eq!(value["summary"]["failed"], 1);
        assert!(err.contains("Error processing package /abs"));
    }

    #[test]
    fn test_failed_line_write_skips_package() {
        /// Rejects any write that mentions the given package.
        struct Rejecting(Vec<u8>);

        impl Write for Rejecting {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                if buf.windows(7).any(|w| w == b"skip-me") {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
                }
                self.0.extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let tmp = project(r#"{ "dependencies": { "skip-me": "1", "keep": "1" } }"#);
        install(tmp.path(), "skip-me", 10);
        install(tmp.path(), "keep", 20);
        let mut out = Rejecting(Vec::new());
        let mut err = Vec::new();

        let summary = reporter(tmp.path(), OutputMode::Plain)
            .run_with(&mut out, &mut err)
            .unwrap();

        let out = String::from_utf8(out.0).unwrap();
        let err = String::from_utf8(err).unwrap();
        assert!(out.ends_with("Total size: 20.00 B\n"));
        assert!(err.contains("Error processing package skip-me: failed to write report line"));
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.packages.len(), 1);
    }

    #[test]
    fn test_broken_output_stream_is_fatal() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let tmp = project(r#"{ "dependencies": { "x": "1" } }"#);
        install(tmp.path(), "x", 10);
        let mut err = Vec::new();

        let result = reporter(tmp.path(), OutputMode::Plain).run_with(&mut Broken, &mut err);

        assert!(result.is_err());
    }
}
