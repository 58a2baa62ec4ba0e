//! Tree-sitter based CST parser for Java source code.
//!
//! The tree-sitter tree is copied into a flat, owned [`CstTree`] so the rest
//! of the engine can hold plain [`CstId`] handles instead of borrowing the
//! parser's tree.

use tree_sitter::{Parser, TreeCursor};

use crate::position::{Position, PositionLookup};

/// A point in source code (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    /// Zero-indexed row number
    pub row: usize,
    /// Zero-indexed column (byte offset within line)
    pub column: usize,
}

impl From<tree_sitter::Point> for Point {
    fn from(p: tree_sitter::Point) -> Self {
        Self {
            row: p.row,
            column: p.column,
        }
    }
}

/// Handle of a node inside a [`CstTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CstId(pub u32);

impl CstId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A CST node with exact source location
#[derive(Debug, Clone)]
pub struct CstNode {
    /// Node kind (e.g., "class_declaration", "identifier", "{")
    pub kind: &'static str,
    /// Field name under which the parent holds this node
    pub field: Option<&'static str>,
    /// Start byte offset (inclusive)
    pub start_byte: usize,
    /// End byte offset (exclusive)
    pub end_byte: usize,
    /// Start point (row, column)
    pub start_point: Point,
    /// End point (row, column)
    pub end_point: Point,
    /// Whether this is a named node (vs anonymous like punctuation)
    pub is_named: bool,
    /// Whether this node is an extra (comments)
    pub is_extra: bool,
    /// Whether this node is a syntax error or a missing token
    pub is_error: bool,
    /// Parent node
    pub parent: Option<CstId>,
    /// Child nodes, in source order
    pub children: Vec<CstId>,
}

impl CstNode {
    /// Check if this node's range contains the given byte offset
    #[must_use]
    pub fn contains_byte(&self, byte: usize) -> bool {
        byte >= self.start_byte && byte < self.end_byte
    }

    /// Whether this node is a comment.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, "line_comment" | "block_comment" | "comment")
    }
}

/// A parsed, immutable CST tree together with its source
#[derive(Debug, Clone)]
pub struct CstTree {
    nodes: Vec<CstNode>,
    root: CstId,
    source: String,
}

impl CstTree {
    /// Root node id
    #[must_use]
    pub fn root(&self) -> CstId {
        self.root
    }

    /// Original source code
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// `"\r\n"` when the first line of the source ends that way, else `"\n"`.
    #[must_use]
    pub fn line_separator(&self) -> &'static str {
        match self.source.find('\n') {
            Some(nl) if self.source[..nl].ends_with('\r') => "\r\n",
            _ => "\n",
        }
    }

    /// Number of nodes in the tree
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node lookup
    #[must_use]
    pub fn node(&self, id: CstId) -> &CstNode {
        &self.nodes[id.index()]
    }

    /// Node lookup that tolerates foreign ids
    #[must_use]
    pub fn get(&self, id: CstId) -> Option<&CstNode> {
        self.nodes.get(id.index())
    }

    /// Node kind
    #[must_use]
    pub fn kind(&self, id: CstId) -> &'static str {
        self.node(id).kind
    }

    /// Extract a slice of source code by byte range
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &str {
        self.source.get(start..end).unwrap_or_default()
    }

    /// Source text covered by a node
    #[must_use]
    pub fn text(&self, id: CstId) -> &str {
        let node = self.node(id);
        self.slice(node.start_byte, node.end_byte)
    }

    /// All children, named or not, including comments
    pub fn children(&self, id: CstId) -> impl Iterator<Item = CstId> + '_ {
        self.node(id).children.iter().copied()
    }

    /// Named children, skipping comments and other extras
    pub fn named_children(&self, id: CstId) -> impl Iterator<Item = CstId> + '_ {
        self.children(id).filter(move |&c| {
            let n = self.node(c);
            n.is_named && !n.is_extra && !n.is_comment()
        })
    }

    /// First child stored under `field`
    #[must_use]
    pub fn child_by_field(&self, id: CstId, field: &str) -> Option<CstId> {
        self.children_by_field(id, field).next()
    }

    /// Every child stored under `field`
    pub fn children_by_field<'a>(
        &'a self,
        id: CstId,
        field: &'a str,
    ) -> impl Iterator<Item = CstId> + 'a {
        self.children(id)
            .filter(move |&c| self.node(c).field == Some(field))
    }

    /// First named child of the given kind
    #[must_use]
    pub fn child_of_kind(&self, id: CstId, kind: &str) -> Option<CstId> {
        self.named_children(id).find(|&c| self.kind(c) == kind)
    }

    /// Whether an anonymous token such as `static` or `*` appears directly under `id`
    #[must_use]
    pub fn has_token(&self, id: CstId, token: &str) -> bool {
        self.children(id).any(|c| {
            let n = self.node(c);
            !n.is_named && n.kind == token
        })
    }

    /// Whether any node in the tree is an error or missing token
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.nodes.iter().any(|n| n.is_error)
    }

    /// Find the smallest node containing the given byte range
    #[must_use]
    pub fn find_smallest_covering(&self, start: usize, end: usize) -> Option<CstId> {
        let root = self.node(self.root);
        if root.start_byte > start || root.end_byte < end {
            return None;
        }
        let mut current = self.root;
        'descend: loop {
            for &child in &self.node(current).children {
                let n = self.node(child);
                if n.start_byte <= start && n.end_byte >= end {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// Find all nodes of a specific kind, in source order
    #[must_use]
    pub fn find_by_kind(&self, kind: &str) -> Vec<CstId> {
        let mut result = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.kind == kind {
                result.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        result
    }
}

impl PositionLookup for CstTree {
    fn position_of(&self, id: CstId) -> Position {
        match self.get(id) {
            Some(node) => Position::new(
                node.start_byte,
                node.end_byte,
                node.start_point.row + 1,
                node.start_point.column,
            ),
            None => Position::INVALID,
        }
    }

    fn source_text(&self) -> &str {
        &self.source
    }
}

/// Error during CST parsing
#[derive(Debug, thiserror::Error)]
pub enum CstError {
    /// Failed to create parser
    #[error("Failed to create CST parser: {0}")]
    ParserCreation(String),
    /// Failed to parse source
    #[error("Failed to parse source as Java")]
    ParseFailed,
}

/// Tree-sitter based CST parser
pub struct CstParser {
    parser: Parser,
}

impl CstParser {
    /// Create a new CST parser for Java
    ///
    /// # Errors
    /// Returns error if parser creation fails
    pub fn new() -> Result<Self, CstError> {
        let mut parser = Parser::new();

        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| CstError::ParserCreation(e.to_string()))?;

        Ok(Self { parser })
    }

    /// Parse source code into a CST
    ///
    /// # Errors
    /// Returns error if parsing fails
    pub fn parse(&mut self, source: &str) -> Result<CstTree, CstError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(CstError::ParseFailed)?;

        let mut nodes = Vec::new();
        let mut cursor = tree.walk();
        let root = copy_subtree(&mut cursor, &mut nodes, None);

        Ok(CstTree {
            nodes,
            root,
            source: source.to_owned(),
        })
    }
}

fn copy_subtree(
    cursor: &mut TreeCursor<'_>,
    nodes: &mut Vec<CstNode>,
    parent: Option<CstId>,
) -> CstId {
    let node = cursor.node();
    let id = CstId(u32::try_from(nodes.len()).unwrap_or(u32::MAX));
    nodes.push(CstNode {
        kind: node.kind(),
        field: None,
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        start_point: node.start_position().into(),
        end_point: node.end_position().into(),
        is_named: node.is_named(),
        is_extra: node.is_extra(),
        is_error: node.is_error() || node.is_missing(),
        parent,
        children: Vec::new(),
    });

    if cursor.goto_first_child() {
        loop {
            let field = cursor.field_name();
            let child = copy_subtree(cursor, nodes, Some(id));
            nodes[child.index()].field = field;
            nodes[id.index()].children.push(child);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
    id
}

/// Builds a [`CstTree`] by hand.
///
/// Used for trees that do not come from tree-sitter, such as fixtures that
/// exercise node kinds the grammar never produces.
#[derive(Debug)]
pub struct CstTreeBuilder {
    nodes: Vec<CstNode>,
    source: String,
}

impl CstTreeBuilder {
    /// Starts a tree over `source`.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            source: source.into(),
        }
    }

    /// Adds a named node spanning `start..end`, attached under `parent`.
    pub fn node(
        &mut self,
        kind: &'static str,
        field: Option<&'static str>,
        start: usize,
        end: usize,
        parent: Option<CstId>,
    ) -> CstId {
        self.push(kind, field, start, end, parent, true)
    }

    /// Adds an anonymous token spanning `start..end`, attached under `parent`.
    pub fn token(&mut self, kind: &'static str, start: usize, end: usize, parent: CstId) -> CstId {
        self.push(kind, None, start, end, Some(parent), false)
    }

    fn push(
        &mut self,
        kind: &'static str,
        field: Option<&'static str>,
        start: usize,
        end: usize,
        parent: Option<CstId>,
        is_named: bool,
    ) -> CstId {
        let id = CstId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        let start_point = self.point_at(start);
        let end_point = self.point_at(end);
        self.nodes.push(CstNode {
            kind,
            field,
            start_byte: start,
            end_byte: end,
            start_point,
            end_point,
            is_named,
            is_extra: matches!(kind, "line_comment" | "block_comment"),
            is_error: kind == "ERROR",
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    fn point_at(&self, offset: usize) -> Point {
        let before = self.source.get(..offset).unwrap_or(&self.source);
        let row = before.matches('\n').count();
        let column = before.rfind('\n').map_or(offset, |nl| offset - nl - 1);
        Point { row, column }
    }

    /// Finishes the tree; the first node added is the root.
    #[must_use]
    pub fn build(self) -> CstTree {
        CstTree {
            nodes: self.nodes,
            root: CstId(0),
            source: self.source,
        }
    }
}
