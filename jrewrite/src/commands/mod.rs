//! Commands module - CLI subcommand implementations.

mod inspect;
mod rewrite;

pub use inspect::{run_inspect, InspectFile, InspectReport};
pub use rewrite::{
    run_rewrite, Destination, FileReport, FileStatus, RewriteOptions, RewriteSummary,
};
