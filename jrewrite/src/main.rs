//! Main binary entry point for jrewrite.
//!
//! This binary delegates to the shared `entry_point::run_with_args()` so it
//! behaves exactly like the `jrewrite` binary of the CLI crate.

use anyhow::Result;

fn main() -> Result<()> {
    let code = jrewrite::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
