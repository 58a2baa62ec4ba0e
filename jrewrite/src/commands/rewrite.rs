//! Batch rewrite command.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::TransformsConfig;
use crate::output::{create_progress_bar, print_rewrite_summary};
use crate::save::{save, SaveOutcome};
use crate::style::StyleOptions;
use crate::transforms::{callback_table, from_config};
use crate::tree::CompilationUnit;
use crate::utils::{collect_java_files, normalize_display_path, output_path};
use crate::visit::{traverse, CallbackError, CallbackTable};

/// Where rewritten files go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Destination {
    /// Saved text is written to the command's writer, one file after another.
    #[default]
    Stdout,
    /// Files are saved below a directory, keeping their relative paths.
    OutDir(PathBuf),
    /// Rewritten files replace their input; suppressed files are removed.
    InPlace,
    /// Nothing is written.
    DryRun,
}

/// Options for the rewrite command.
#[derive(Debug, Clone, Default)]
pub struct RewriteOptions {
    /// Files or directories to process.
    pub targets: Vec<PathBuf>,
    /// Folders to skip besides the defaults.
    pub exclude: Vec<String>,
    /// Folders to walk even when excluded.
    pub include: Vec<String>,
    /// Output destination.
    pub destination: Destination,
    /// Render options for every unit.
    pub style: StyleOptions,
    /// Transforms to apply.
    pub transforms: TransformsConfig,
    /// Emit a JSON summary instead of text.
    pub json: bool,
    /// List unchanged files too.
    pub verbose: bool,
}

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Saved text equals the input.
    Unchanged,
    /// Saved text differs from the input.
    Rewritten,
    /// A top-level type was dropped, so there is no output.
    Suppressed,
    /// The file could not be read, parsed or written.
    Failed,
}

/// Result of rewriting one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Input file, normalized for display.
    pub file: String,
    /// Outcome.
    pub status: FileStatus,
    /// Where the output went, when it went to a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Constructs kept verbatim because they have no mutable counterpart.
    pub unsupported: usize,
    /// Nodes visited by the transforms.
    pub visited: usize,
    /// Failed callbacks; the file is still saved.
    pub callback_errors: Vec<CallbackError>,
    /// Why the file failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Saved text, for JSON output to stdout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl FileReport {
    /// An empty report for `file`.
    #[must_use]
    pub fn new(file: String, status: FileStatus) -> Self {
        Self {
            file,
            status,
            destination: None,
            unsupported: 0,
            visited: 0,
            callback_errors: Vec::new(),
            error: None,
            output: None,
        }
    }
}

/// Totals of a rewrite run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RewriteSummary {
    /// Files processed.
    pub total_files: usize,
    /// Files whose text changed.
    pub rewritten: usize,
    /// Files saved as they were.
    pub unchanged: usize,
    /// Files with no output.
    pub suppressed: usize,
    /// Files that failed.
    pub failed: usize,
    /// Whether nothing was written.
    pub dry_run: bool,
    /// Per-file results, in processing order.
    pub files: Vec<FileReport>,
}

impl RewriteSummary {
    /// Adds a file's result to the totals.
    pub fn push(&mut self, report: FileReport) {
        self.total_files += 1;
        match report.status {
            FileStatus::Unchanged => self.unchanged += 1,
            FileStatus::Rewritten => self.rewritten += 1,
            FileStatus::Suppressed => self.suppressed += 1,
            FileStatus::Failed => self.failed += 1,
        }
        self.files.push(report);
    }

    /// Whether any file failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Rewrites every Java file below the targets.
///
/// Each file is parsed, run through the configured transforms in one
/// traversal and saved. A file that fails is recorded in the summary and
/// the batch goes on.
///
/// # Errors
///
/// Returns an error if the transform settings are invalid or the summary
/// cannot be written.
pub fn run_rewrite<W: Write>(options: &RewriteOptions, mut writer: W) -> Result<RewriteSummary> {
    let transforms = from_config(&options.transforms).context("invalid transform settings")?;
    debug!(
        transforms = ?transforms.iter().map(|t| t.name()).collect::<Vec<_>>(),
        "transforms configured"
    );
    let mut table = callback_table(&transforms);

    let mut inputs = Vec::new();
    for target in &options.targets {
        let (files, _) =
            collect_java_files(target, &options.exclude, &options.include, options.verbose);
        inputs.extend(files.into_iter().map(|file| (file, target.clone())));
    }
    info!(files = inputs.len(), "rewriting");

    let mut summary = RewriteSummary {
        dry_run: options.destination == Destination::DryRun,
        ..RewriteSummary::default()
    };
    let pb = create_progress_bar(inputs.len() as u64);
    for (file, root) in &inputs {
        pb.set_message(normalize_display_path(file));
        let report = match rewrite_file(file, root, &mut table, options, &mut writer) {
            Ok(report) => report,
            Err(err) => {
                warn!(file = %file.display(), error = %format!("{err:#}"), "rewrite failed");
                FileReport {
                    error: Some(format!("{err:#}")),
                    ..FileReport::new(normalize_display_path(file), FileStatus::Failed)
                }
            }
        };
        summary.push(report);
        pb.inc(1);
    }
    pb.finish_and_clear();

    if options.json {
        serde_json::to_writer_pretty(&mut writer, &summary)?;
        writeln!(writer)?;
    } else if options.destination == Destination::Stdout {
        print_rewrite_summary(&mut std::io::stderr(), &summary, options.verbose)?;
    } else {
        print_rewrite_summary(&mut writer, &summary, options.verbose)?;
    }
    Ok(summary)
}

fn rewrite_file<W: Write>(
    file: &Path,
    root: &Path,
    table: &mut CallbackTable,
    options: &RewriteOptions,
    writer: &mut W,
) -> Result<FileReport> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let mut unit = CompilationUnit::parse(&source)
        .with_context(|| format!("failed to parse {}", file.display()))?;
    unit.set_options(options.style.clone());
    unit.set_path(file);

    let traversal = traverse(&mut unit, table);
    let (outcome, text) = save(&mut unit);
    let status = match outcome {
        SaveOutcome::Suppressed => FileStatus::Suppressed,
        SaveOutcome::Rendered if text != source => FileStatus::Rewritten,
        SaveOutcome::Verbatim | SaveOutcome::Rendered => FileStatus::Unchanged,
    };
    debug!(file = %file.display(), ?status, visited = traversal.visited, "file processed");

    let mut report = FileReport {
        unsupported: unit.unsupported_nodes(),
        visited: traversal.visited,
        callback_errors: traversal.errors,
        ..FileReport::new(normalize_display_path(file), status)
    };

    match &options.destination {
        Destination::Stdout if options.json => {
            if outcome.wrote_output() {
                report.output = Some(text);
            }
        }
        Destination::Stdout => {
            writer.write_all(text.as_bytes())?;
            writer.flush()?;
        }
        Destination::OutDir(dir) => {
            let dest = output_path(file, root, dir);
            if outcome.wrote_output() {
                write_file(&dest, &text)?;
                report.destination = Some(normalize_display_path(&dest));
            }
        }
        Destination::InPlace => match status {
            FileStatus::Rewritten => {
                write_file(file, &text)?;
                report.destination = Some(normalize_display_path(file));
            }
            FileStatus::Suppressed => {
                fs::remove_file(file)
                    .with_context(|| format!("failed to remove {}", file.display()))?;
            }
            FileStatus::Unchanged | FileStatus::Failed => {}
        },
        Destination::DryRun => {}
    }
    Ok(report)
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}
