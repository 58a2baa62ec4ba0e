//! Human-readable CLI output: colored summaries and progress bars.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;

use crate::commands::{FileStatus, InspectReport, RewriteSummary};

/// Print the exclusion list in styled format.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_exclusion_list(writer: &mut impl Write, folders: &[String]) -> std::io::Result<()> {
    if folders.is_empty() {
        let mut defaults: Vec<&str> = crate::constants::DEFAULT_EXCLUDE_FOLDERS()
            .iter()
            .copied()
            .collect();
        defaults.sort_unstable();
        writeln!(
            writer,
            "{} {}",
            "[OK] Using default exclusions only:".green(),
            defaults.join(", ").dimmed()
        )?;
    } else {
        writeln!(writer, "{} {}", "Excluding:".yellow().bold(), folders.join(", "))?;
    }
    Ok(())
}

/// Create a progress bar over `total` files.
///
/// In test mode, returns a hidden progress bar to avoid polluting test output.
#[must_use]
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if cfg!(test) {
        pb.set_draw_target(ProgressDrawTarget::hidden());
        return pb;
    }
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb
}

fn status_label(status: FileStatus) -> colored::ColoredString {
    match status {
        FileStatus::Unchanged => "Unchanged:".dimmed(),
        FileStatus::Rewritten => "Rewritten:".green(),
        FileStatus::Suppressed => "Suppressed:".yellow(),
        FileStatus::Failed => "Failed:".red().bold(),
    }
}

/// Print one line per file and the totals of a rewrite run.
///
/// Unchanged files are listed only when `verbose` is set.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_rewrite_summary(
    writer: &mut impl Write,
    summary: &RewriteSummary,
    verbose: bool,
) -> std::io::Result<()> {
    for file in &summary.files {
        if file.status == FileStatus::Unchanged && !verbose {
            continue;
        }
        write!(writer, "{} {}", status_label(file.status), file.file)?;
        if let Some(dest) = &file.destination {
            write!(writer, " -> {dest}")?;
        }
        writeln!(writer)?;
        if let Some(error) = &file.error {
            writeln!(writer, "  {}", error.red())?;
        }
        for error in &file.callback_errors {
            writeln!(writer, "  {} {error}", "callback:".yellow())?;
        }
        if file.unsupported > 0 {
            writeln!(
                writer,
                "  {}",
                format!("{} unsupported construct(s) kept verbatim", file.unsupported).dimmed()
            )?;
        }
    }

    fn pill(label: &str, count: usize, bad: bool) -> String {
        if count > 0 && bad {
            format!("{}: {}", label, count.to_string().red().bold())
        } else {
            format!("{}: {}", label, count.to_string().green())
        }
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "{}  {}  {}  {}",
        pill("Rewritten", summary.rewritten, false),
        pill("Unchanged", summary.unchanged, false),
        pill("Suppressed", summary.suppressed, false),
        pill("Failed", summary.failed, true),
    )?;
    let mode = if summary.dry_run { " (dry run)" } else { "" };
    writeln!(
        writer,
        "{}",
        format!(
            "Processed {} files{mode}",
            summary.total_files.to_string().bold()
        )
        .dimmed()
    )?;
    Ok(())
}

/// Print the per-file counts of an inspect run.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_inspect_report(
    writer: &mut impl Write,
    report: &InspectReport,
) -> std::io::Result<()> {
    for file in &report.files {
        match &file.error {
            Some(error) => writeln!(writer, "{} {} {}", "Failed:".red().bold(), file.file, error)?,
            None => {
                let unsupported = if file.unsupported > 0 {
                    file.unsupported.to_string().yellow().bold()
                } else {
                    file.unsupported.to_string().green()
                };
                writeln!(
                    writer,
                    "{}  nodes: {}  types: {}  unsupported: {}",
                    file.file.bold(),
                    file.nodes,
                    file.types,
                    unsupported
                )?;
            }
        }
    }
    writeln!(
        writer,
        "{}",
        format!(
            "Inspected {} files: {} nodes, {} unsupported",
            report.files.len(),
            report.total_nodes,
            report.total_unsupported
        )
        .dimmed()
    )?;
    Ok(())
}
