//! `validate` command: check configuration files without running them.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::ConfigLoader;
use crate::error::{ConfigError, EnigmaError, Severity, ValidationIssue};

/// Validation outcome for one file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// The file checked.
    pub path: PathBuf,
    /// Whether the file passed (warnings fail it under `--strict`).
    pub valid: bool,
    /// Errors found.
    pub errors: Vec<ValidationIssue>,
    /// Warnings found.
    pub warnings: Vec<ValidationIssue>,
}

/// Totals across all files.
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    /// Files checked.
    pub total: usize,
    /// Files that passed.
    pub valid: usize,
    /// Files that failed.
    pub invalid: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    files: &'a [FileReport],
    summary: Summary,
}

/// Validates every file and prints a report.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] with the errors of every failing file
/// if any file fails, or [`EnigmaError::Json`] if the JSON report cannot be
/// rendered.
pub fn run(args: &ValidateArgs) -> Result<(), EnigmaError> {
    let loader = ConfigLoader::with_defaults();
    let reports: Vec<FileReport> = args
        .files
        .iter()
        .map(|path| check_file(&loader, path, args.strict))
        .collect();

    let summary = Summary {
        total: reports.len(),
        valid: reports.iter().filter(|r| r.valid).count(),
        invalid: reports.iter().filter(|r| !r.valid).count(),
    };

    match args.format {
        OutputFormat::Human => print_human(&reports, &summary),
        OutputFormat::Json => {
            let report = Report {
                files: &reports,
                summary,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    let strict = args.strict;
    let failures: Vec<ValidationIssue> = reports
        .into_iter()
        .filter(|r| !r.valid)
        .flat_map(move |r| {
            let path = r.path.display().to_string();
            r.errors
                .into_iter()
                .chain(r.warnings)
                .filter(move |issue| issue.severity == Severity::Error || strict)
                .map(move |issue| ValidationIssue {
                    path: format!("{path}: {}", issue.path),
                    ..issue
                })
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation { errors: failures }.into())
    }
}

/// Loads one file and turns any failure into issues.
fn check_file(loader: &ConfigLoader, path: &Path, strict: bool) -> FileReport {
    tracing::info!(file = %path.display(), "validating configuration");

    let (errors, warnings) = match loader.load(path).and_then(|loaded| {
        loaded.config.build()?;
        Ok(loaded.warnings)
    }) {
        Ok(warnings) => (Vec::new(), warnings),
        Err(ConfigError::Validation { errors }) => (errors, Vec::new()),
        Err(e) => (
            vec![ValidationIssue {
                path: String::new(),
                message: e.to_string(),
                severity: Severity::Error,
            }],
            Vec::new(),
        ),
    };

    let valid = errors.is_empty() && (!strict || warnings.is_empty());
    FileReport {
        path: path.to_path_buf(),
        valid,
        errors,
        warnings,
    }
}

fn print_human(reports: &[FileReport], summary: &Summary) {
    for report in reports {
        let status = if report.valid { "ok" } else { "FAILED" };
        println!("{}: {status}", report.path.display());
        for issue in report.errors.iter().chain(&report.warnings) {
            println!("  {issue}");
        }
    }
    println!(
        "{} file(s) checked, {} valid, {} invalid",
        summary.total, summary.valid, summary.invalid
    );
}
