//! Core library for the jrewrite source rewriting engine.
//!
//! A Java file is parsed once into an immutable concrete syntax tree and
//! mirrored into a mutable tree of typed nodes. Scripts edit the mutable
//! tree; saving re-emits only what was touched and copies everything else
//! from the original text, so formatting and comments survive.

#![allow(
    clippy::too_many_arguments,
    clippy::similar_names,
    clippy::format_push_string,
    clippy::map_unwrap_or,
    clippy::items_after_statements
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

/// Module wrapping the Tree-sitter Java parser and the immutable tree.
pub mod cst;

/// Module resolving row/column/byte positions of immutable nodes.
pub mod position;

/// Module defining the mutable tree, its node kinds and its setters.
pub mod tree;

/// Module building the mutable tree from the immutable one.
pub mod mirror;

/// Module defining render options and output sinks.
pub mod style;

/// Module emitting mutable nodes as source text.
pub mod render;

/// Module splicing edited children into original node text.
pub mod splice;

/// Module assembling a whole compilation unit on save.
pub mod save;

/// Module running kind-keyed callbacks over the mutable tree.
pub mod visit;

/// Module containing the built-in transforms.
pub mod transforms;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants and regex patterns.
pub mod constants;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for handling CLI commands and their execution logic.
pub mod commands;

/// Module defining the entry point shared by the binaries.
pub mod entry_point;

/// Module for CLI output formatting with colored text and progress bars.
pub mod output;

/// Module containing utility functions.
pub mod utils;
