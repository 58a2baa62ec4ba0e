//! Utilities module for jrewrite.

mod paths;

pub use paths::{
    collect_java_files, is_excluded, is_java_file, normalize_display_path, output_path,
};
