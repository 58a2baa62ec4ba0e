//! Shared entry point for the `jrewrite` binaries.

use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::{Cli, Commands, StyleArgs, TransformArgs};
use crate::commands::{run_inspect, run_rewrite, Destination, RewriteOptions};
use crate::config::{Config, StyleConfig, TransformsConfig};

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise `--verbose` selects debug events for this
/// crate and warnings are shown by default. A subscriber installed earlier
/// (by a test harness, say) is left in place.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "jrewrite=debug" } else { "jrewrite=warn" })
    });
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Run jrewrite with the given arguments (without the program name).
///
/// # Errors
///
/// Returns an error if the command fails to run.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run jrewrite with the given arguments, writing output to `writer`.
///
/// Returns the process exit code: 0 on success, 1 on a usage error, a
/// missing path or any file that failed.
///
/// # Errors
///
/// Returns an error if the transform settings are invalid or writing the
/// output fails.
pub fn run_with_args_to<W: Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["jrewrite".to_owned()];
    program_args.extend(args);
    let cli = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                write!(writer, "{e}")?;
                writer.flush()?;
                return Ok(0);
            }
            _ => {
                eprint!("{e}");
                return Ok(1);
            }
        },
    };
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Rewrite {
            paths,
            output,
            transforms,
            style,
        } => {
            let targets = paths.targets();
            if let Some(code) = check_paths_exist(&targets) {
                return Ok(code);
            }
            let config = load_config(&targets);
            debug!(config = ?config.config_file_path, "configuration");

            let mut style_config = config.jrewrite.style.clone();
            style_config.merge(&style_overrides(&style));
            let style = match style_config.to_options() {
                Ok(options) => options,
                Err(err) => {
                    eprintln!("Error: {err}");
                    return Ok(1);
                }
            };
            let mut transforms_config = config.jrewrite.transforms.clone();
            transforms_config.merge(&transform_overrides(&transforms));

            let destination = if let Some(dir) = output.out_dir {
                Destination::OutDir(dir)
            } else if output.in_place {
                Destination::InPlace
            } else if output.dry_run {
                Destination::DryRun
            } else {
                Destination::Stdout
            };
            let options = RewriteOptions {
                targets,
                exclude: merged(config.jrewrite.exclude_folders.as_deref(), &paths.exclude),
                include: merged(config.jrewrite.include_folders.as_deref(), &paths.include),
                destination,
                style,
                transforms: transforms_config,
                json: output.json,
                verbose: cli.verbose,
            };
            let summary = run_rewrite(&options, &mut *writer)?;
            Ok(i32::from(summary.has_failures()))
        }
        Commands::Inspect { paths, json } => {
            let targets = paths.targets();
            if let Some(code) = check_paths_exist(&targets) {
                return Ok(code);
            }
            let config = load_config(&targets);
            let exclude = merged(config.jrewrite.exclude_folders.as_deref(), &paths.exclude);
            let include = merged(config.jrewrite.include_folders.as_deref(), &paths.include);
            let report = run_inspect(&targets, &exclude, &include, json, &mut *writer)?;
            Ok(i32::from(report.files.iter().any(|f| f.error.is_some())))
        }
    }
}

fn check_paths_exist(targets: &[PathBuf]) -> Option<i32> {
    let missing = targets.iter().find(|p| !p.exists())?;
    eprintln!(
        "Error: The file or directory '{}' does not exist.",
        missing.display()
    );
    Some(1)
}

/// Config from the first target upwards.
fn load_config(targets: &[PathBuf]) -> Config {
    let start = targets
        .first()
        .map_or(Path::new("."), PathBuf::as_path);
    Config::load_from_path(start)
}

fn merged(from_config: Option<&[String]>, from_cli: &[String]) -> Vec<String> {
    let mut folders = from_config.map(<[String]>::to_vec).unwrap_or_default();
    folders.extend(from_cli.iter().cloned());
    folders
}

fn style_overrides(args: &StyleArgs) -> StyleConfig {
    StyleConfig {
        indent_size: args.indent_size,
        continuation_indent_size: args.continuation_indent_size,
        word_wrap_column: args.word_wrap_column,
        preserve_leading_comment: args.no_leading_comment.then_some(false),
    }
}

fn transform_overrides(args: &TransformArgs) -> TransformsConfig {
    TransformsConfig {
        rename: args.rename.iter().cloned().collect(),
        remove_imports: args.remove_imports.clone(),
        ignore_annotated: args.ignore_annotated.clone(),
    }
}
