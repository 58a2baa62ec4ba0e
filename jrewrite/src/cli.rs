use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.jrewrite.toml):
  Looked up from the first path upwards. Command-line flags win.

  [jrewrite]
  exclude_folders = [\"generated\", \"legacy\"]
  include_folders = [\"build\"]   # Force-include these

  [jrewrite.style]
  indent_size = 4                # Spaces per nesting level (0-100)
  continuation_indent_size = 8   # Extra spaces on wrapped lines (0-100)
  word_wrap_column = 120         # Keywords past this column wrap (>= 60)
  preserve_leading_comment = true

  [jrewrite.transforms]
  rename = { oldName = \"newName\" }
  remove_imports = [\"java.util.*\"]  # `*` matches one segment
  ignore_annotated = [\"Generated\"]  # Annotated declarations are dropped
";

/// Input paths shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct PathArgs {
    /// Files or directories to process.
    /// Defaults to the current directory.
    pub paths: Vec<PathBuf>,

    /// Exclude folders (in addition to the defaults).
    #[arg(long, short = 'e', alias = "exclude-folder")]
    pub exclude: Vec<String>,

    /// Force-include folders that are excluded by default.
    #[arg(long, alias = "include-folder")]
    pub include: Vec<String>,
}

impl PathArgs {
    /// The given paths, or the current directory when none were given.
    #[must_use]
    pub fn targets(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.paths.clone()
        }
    }
}

/// Where rewritten files go.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct OutputArgs {
    /// Write rewritten files below this directory, mirroring their
    /// relative paths.
    #[arg(long, short = 'o', conflicts_with_all = ["in_place", "dry_run"])]
    pub out_dir: Option<PathBuf>,

    /// Overwrite the input files. Suppressed files are deleted.
    #[arg(long, short = 'i', conflicts_with = "dry_run")]
    pub in_place: bool,

    /// Only report what would change.
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Output a JSON summary.
    #[arg(long)]
    pub json: bool,
}

/// Built-in transforms selected on the command line.
#[derive(Args, Debug, Default, Clone)]
pub struct TransformArgs {
    /// Rename an identifier, written `OLD=NEW`. Repeatable.
    #[arg(long, value_name = "OLD=NEW", value_parser = parse_rename)]
    pub rename: Vec<(String, String)>,

    /// Remove imports matching a pattern such as `java.util.*`. Repeatable.
    #[arg(long = "remove-import", value_name = "PATTERN")]
    pub remove_imports: Vec<String>,

    /// Drop declarations carrying this annotation. Repeatable.
    #[arg(long = "ignore-annotated", value_name = "NAME")]
    pub ignore_annotated: Vec<String>,
}

/// Render options overriding `[jrewrite.style]`.
#[derive(Args, Debug, Default, Clone)]
pub struct StyleArgs {
    /// Spaces per nesting level.
    #[arg(long = "indent", value_name = "N")]
    pub indent_size: Option<usize>,

    /// Extra spaces on wrapped lines.
    #[arg(long = "continuation-indent", value_name = "N")]
    pub continuation_indent_size: Option<usize>,

    /// Column past which keywords wrap.
    #[arg(long = "wrap", value_name = "N")]
    pub word_wrap_column: Option<usize>,

    /// Drop the text before the first declaration of rewritten files.
    #[arg(long)]
    pub no_leading_comment: bool,
}

fn parse_rename(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((from, to)) if !from.is_empty() && !to.is_empty() => {
            Ok((from.trim().to_owned(), to.trim().to_owned()))
        }
        _ => Err(format!("expected OLD=NEW, got `{value}`")),
    }
}

/// Command line interface configuration using `clap`.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "jrewrite - Layout-preserving source rewriting for Java",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    #[command(subcommand)]
    /// The subcommand to execute.
    pub command: Commands,

    /// Log debug events to stderr (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply transforms to Java files and save them
    Rewrite {
        /// Input paths.
        #[command(flatten)]
        paths: PathArgs,

        /// Output destination.
        #[command(flatten)]
        output: OutputArgs,

        /// Transforms to apply, on top of the configuration file.
        #[command(flatten)]
        transforms: TransformArgs,

        /// Render options, on top of the configuration file.
        #[command(flatten)]
        style: StyleArgs,
    },
    /// Report node and unsupported-construct counts per file
    Inspect {
        /// Input paths.
        #[command(flatten)]
        paths: PathArgs,

        /// Output JSON.
        #[arg(long)]
        json: bool,
    },
}
