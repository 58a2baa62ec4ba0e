//! CST (Concrete Syntax Tree) module: the immutable side of the engine.
//!
//! This module wraps Tree-sitter's Java grammar and provides:
//! - An owned, flat copy of the parse tree addressed by [`CstId`]
//! - Byte-range and row/column lookup through [`crate::position::PositionLookup`]
//! - Comment extraction, so re-rendered containers keep their comments
//!
//! # Design Principles
//!
//! - **Parse once**: the tree is never edited; edits live on the mirror
//! - **Byte-range anchored**: verbatim output is a slice of the original source
//! - **Comments are trivia**: they are never mirrored as nodes

mod comments;
mod parser;

pub use comments::{
    dangling_comments, extract_comments, header_end, leading_comments, trailing_comment,
    Comment,
};
pub use parser::{CstError, CstId, CstNode, CstParser, CstTree, CstTreeBuilder, Point};
