//! The mutable side of the engine.
//!
//! A [`CompilationUnit`] owns an arena of [`Node`]s mirrored from one parsed
//! file. Nodes are addressed by [`NodeId`]; the parent relation is a plain
//! index, so the tree has no reference cycles and navigation is cheap.
//!
//! Every node carries an [`Action`] and a dirty flag:
//! - mirrored nodes start as [`Action::NoChange`], synthetic ones as
//!   [`Action::Change`]
//! - any effective setter moves a node to `Change` and marks it and all of
//!   its ancestors dirty
//! - [`Action::Ignore`] is sticky and only dirties the ancestors

mod build;
mod data;
mod edit;
mod error;
pub mod kind;

use std::path::{Path, PathBuf};

use smallvec::SmallVec;

pub use data::{Action, Field, LiteralValue, Node, NodeData, NodeId};
pub use edit::NodeMut;
pub use error::MutationError;
pub use kind::{Category, ClassKind, Modifier, NodeKind, TreeKind, TypeKind};

pub(crate) use data::Slot;

use crate::cst::{CstError, CstParser, CstTree};
use crate::position::{Position, PositionLookup};
use crate::style::{StringStyleWriter, StyleOptions};

/// One source file: the immutable tree plus its mutable mirror.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    nodes: Vec<Node>,
    root: NodeId,
    cst: CstTree,
    options: StyleOptions,
    unsupported_nodes: usize,
    path: Option<PathBuf>,
}

impl CompilationUnit {
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        root: NodeId,
        cst: CstTree,
        unsupported_nodes: usize,
    ) -> Self {
        Self {
            nodes,
            root,
            cst,
            options: StyleOptions::default(),
            unsupported_nodes,
            path: None,
        }
    }

    /// Parses `source` and mirrors it.
    ///
    /// # Errors
    /// Returns an error if the parser cannot be created or fails.
    pub fn parse(source: &str) -> Result<Self, CstError> {
        let tree = CstParser::new()?.parse(source)?;
        Ok(crate::mirror::mirror_unit(tree))
    }

    /// The compilation-unit node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node lookup.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub(crate) fn get(&self, id: NodeId) -> Result<&Node, MutationError> {
        self.nodes
            .get(id.index())
            .ok_or(MutationError::UnknownNode(id))
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, MutationError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(MutationError::UnknownNode(id))
    }

    /// Kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(Node::kind)
    }

    /// Payload of a node.
    #[must_use]
    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.node(id).map(Node::data)
    }

    /// Direct children in source order; empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: NodeId) -> SmallVec<[NodeId; 4]> {
        self.node(id)
            .map(|n| n.data.children())
            .unwrap_or_default()
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    /// Action of a node.
    #[must_use]
    pub fn action(&self, id: NodeId) -> Option<Action> {
        self.node(id).map(Node::action)
    }

    /// Whether a node is dirty.
    #[must_use]
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(Node::is_dirty)
    }

    /// Whether a node is marked [`Action::Ignore`].
    #[must_use]
    pub fn is_ignored(&self, id: NodeId) -> bool {
        self.action(id) == Some(Action::Ignore)
    }

    /// The immutable tree this unit mirrors.
    #[must_use]
    pub fn cst(&self) -> &CstTree {
        &self.cst
    }

    /// Original source text.
    #[must_use]
    pub fn source(&self) -> &str {
        self.cst.source()
    }

    /// Line separator of the original source, reused for rendered text.
    #[must_use]
    pub fn line_separator(&self) -> &'static str {
        self.cst.line_separator()
    }

    /// Active render options.
    #[must_use]
    pub fn options(&self) -> &StyleOptions {
        &self.options
    }

    /// Replaces the render options.
    pub fn set_options(&mut self, options: StyleOptions) {
        self.options = options;
    }

    /// How many subtrees the mirror dropped because their kind is unsupported.
    #[must_use]
    pub fn unsupported_nodes(&self) -> usize {
        self.unsupported_nodes
    }

    /// Path the unit was read from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Records the path the unit was read from.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// Starts an edit of `id`.
    ///
    /// # Errors
    /// Returns [`MutationError::UnknownNode`] for ids outside the arena.
    pub fn edit(&mut self, id: NodeId) -> Result<NodeMut<'_>, MutationError> {
        self.get(id)?;
        Ok(NodeMut::new(self, id))
    }

    /// Marks `id` and every ancestor dirty.
    pub fn mark_dirty(&mut self, id: NodeId) {
        mark_dirty(&mut self.nodes, id);
    }

    /// Marks `id` as ignored. The node itself is not dirtied, its ancestors are.
    ///
    /// # Errors
    /// Returns [`MutationError::UnknownNode`] for ids outside the arena.
    pub fn set_ignored(&mut self, id: NodeId) -> Result<(), MutationError> {
        let node = self.get_mut(id)?;
        node.action = Action::Ignore;
        if let Some(parent) = node.parent {
            mark_dirty(&mut self.nodes, parent);
        }
        Ok(())
    }

    /// Marks the root ignored once its output has been suppressed.
    pub(crate) fn ignore_root(&mut self) {
        if let Some(root) = self.nodes.get_mut(self.root.index()) {
            root.action = Action::Ignore;
        }
    }

    /// Removes `id` from its parent's field, leaving it detached.
    ///
    /// The parent becomes [`Action::Change`]. Detaching the root or an
    /// already detached node does nothing.
    ///
    /// # Errors
    /// Fails with [`MutationError::RequiredField`] when the node fills a
    /// required field of its parent.
    pub fn detach(&mut self, id: NodeId) -> Result<(), MutationError> {
        let Some(parent) = self.get(id)?.parent else {
            return Ok(());
        };
        let parent_node = self.get_mut(parent)?;
        let kind = parent_node.kind();
        for &field in parent_node.data.fields() {
            match parent_node.data.slot_mut(field) {
                Some(Slot::Required(value, _)) if *value == id => {
                    return Err(MutationError::RequiredField {
                        kind,
                        field: field.as_str(),
                    });
                }
                Some(Slot::Optional(value, _)) if *value == Some(id) => *value = None,
                Some(Slot::List(values, _)) => values.retain(|&c| c != id),
                _ => {}
            }
        }
        if parent_node.action != Action::Ignore {
            parent_node.action = Action::Change;
        }
        self.nodes[id.index()].parent = None;
        mark_dirty(&mut self.nodes, parent);
        Ok(())
    }

    /// Copies the subtree rooted at `id`. The copy is detached and keeps the
    /// originals, actions and dirty flags of the source nodes.
    ///
    /// # Errors
    /// Returns [`MutationError::UnknownNode`] for ids outside the arena.
    pub fn deep_clone(&mut self, id: NodeId) -> Result<NodeId, MutationError> {
        self.get(id)?;
        Ok(self.clone_subtree(id))
    }

    fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let source = self.nodes[id.index()].clone();
        let mut data = source.data;
        for &field in data.fields() {
            match data.slot_mut(field) {
                Some(Slot::Required(value, _)) => *value = self.clone_subtree(*value),
                Some(Slot::Optional(value, _)) => {
                    if let Some(child) = *value {
                        *value = Some(self.clone_subtree(child));
                    }
                }
                Some(Slot::List(values, _)) => {
                    for value in values.iter_mut() {
                        *value = self.clone_subtree(*value);
                    }
                }
                None => {}
            }
        }
        let children = data.children();
        let copy = self.alloc(Node {
            data,
            parent: None,
            action: source.action,
            dirty: source.dirty,
            original: source.original,
        });
        for child in children {
            self.nodes[child.index()].parent = Some(copy);
        }
        copy
    }

    /// Position of the node's original in the source; invalid for synthetic nodes.
    #[must_use]
    pub fn original_position(&self, id: NodeId) -> Position {
        self.node(id)
            .and_then(Node::original)
            .map_or(Position::INVALID, |original| self.cst.position_of(original))
    }

    /// Original source text of a mirrored node.
    #[must_use]
    pub fn original_text(&self, id: NodeId) -> Option<&str> {
        let original = self.node(id)?.original?;
        self.cst.original_text(original)
    }

    /// Renders a node into a plain string, without indentation or wrapping.
    #[must_use]
    pub fn preview(&self, id: NodeId) -> String {
        let mut writer = StringStyleWriter::new().with_line_separator(self.line_separator());
        crate::render::write_node(self, id, &mut writer);
        writer.into_string()
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// `id` and every node below it, in pre-order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.node(id).is_none() {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).into_iter().rev());
        }
        out
    }

    /// Every attached node of `kind`, in pre-order.
    #[must_use]
    pub fn find_all(&self, kind: NodeKind) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| self.kind(id) == Some(kind))
            .collect()
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Checks that `child` may be installed into `field` of `parent`.
    ///
    /// With `reattach`, a child already owned by `parent` is accepted; this
    /// is how a list reorders its own members.
    pub(crate) fn check_attachable(
        &self,
        parent: Option<NodeId>,
        kind: NodeKind,
        field: Field,
        category: Category,
        child: NodeId,
        reattach: bool,
    ) -> Result<(), MutationError> {
        let node = self.get(child)?;
        if !node.kind().fits(category) {
            return Err(MutationError::InvalidChild {
                kind,
                field: field.as_str(),
                found: node.kind(),
            });
        }
        if let Some(owner) = node.parent {
            if !(reattach && Some(owner) == parent) {
                return Err(MutationError::AlreadyAttached {
                    child,
                    parent: owner,
                });
            }
        }
        if child == self.root {
            return Err(MutationError::Cycle {
                child,
                parent: parent.unwrap_or(child),
            });
        }
        // A node under construction has no ancestors yet.
        if let Some(parent) = parent {
            if child == parent || self.ancestors(parent).any(|a| a == child) {
                return Err(MutationError::Cycle { child, parent });
            }
        }
        Ok(())
    }
}

/// Sets the dirty flag on `id` and walks the parent chain up to the root.
fn mark_dirty(nodes: &mut [Node], id: NodeId) {
    let mut current = Some(id);
    while let Some(id) = current {
        let Some(node) = nodes.get_mut(id.index()) else {
            break;
        };
        node.dirty = true;
        current = node.parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(source: &str) -> CompilationUnit {
        CompilationUnit::parse(source).unwrap()
    }

    #[test]
    fn test_mark_dirty_walks_to_root() {
        let mut unit = unit("class A { void m() { a(); b(); } }");
        let calls = unit.find_all(NodeKind::MethodInvocation);
        unit.mark_dirty(calls[0]);
        assert!(unit.is_dirty(calls[0]));
        assert!(unit.is_dirty(unit.root()));
        assert!(!unit.is_dirty(calls[1]));
    }

    #[test]
    fn test_ignore_does_not_dirty_node() {
        let mut unit = unit("import a.B;\nclass A {}\n");
        let import = unit.find_all(NodeKind::Import)[0];
        unit.set_ignored(import).unwrap();
        assert!(unit.is_ignored(import));
        assert!(!unit.is_dirty(import));
        assert!(unit.is_dirty(unit.root()));
    }

    #[test]
    fn test_detach_optional_child() {
        let mut unit = unit("class A { void m() { return x; } }");
        let ret = unit.find_all(NodeKind::Return)[0];
        let ident = unit.find_all(NodeKind::Ident)[0];
        unit.detach(ident).unwrap();
        assert_eq!(unit.parent(ident), None);
        assert_eq!(unit.action(ret), Some(Action::Change));
        assert!(unit.children(ret).is_empty());
        assert!(unit.is_dirty(unit.root()));
    }

    #[test]
    fn test_detach_required_child_fails() {
        let mut unit = unit("class A { void m() { if (x) y(); } }");
        let stmt = unit.find_all(NodeKind::If)[0];
        let condition = unit.children(stmt)[0];
        let err = unit.detach(condition).unwrap_err();
        assert!(matches!(err, MutationError::RequiredField { field: "condition", .. }));
        assert_eq!(unit.parent(condition), Some(stmt));
        assert_eq!(unit.action(stmt), Some(Action::NoChange));
    }

    #[test]
    fn test_deep_clone_keeps_originals() {
        let mut unit = unit("class A { int x = 1 + 2; }");
        let binary = unit.find_all(NodeKind::Binary)[0];
        let copy = unit.deep_clone(binary).unwrap();
        assert_ne!(copy, binary);
        assert_eq!(unit.parent(copy), None);
        assert_eq!(unit.original_text(copy), Some("1 + 2"));
        let children = unit.children(copy);
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|&c| unit.parent(c) == Some(copy)));
    }

    #[test]
    fn test_original_position() {
        let unit = unit("class A {\n  int x;\n}\n");
        let decl = unit.find_all(NodeKind::VariableDecl)[0];
        let pos = unit.original_position(decl);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 2);
        assert_eq!(pos.length(), 6);
    }

    #[test]
    fn test_ancestors() {
        let unit = unit("class A { void m() { x(); } }");
        let call = unit.find_all(NodeKind::MethodInvocation)[0];
        let kinds: Vec<_> = unit
            .ancestors(call)
            .filter_map(|a| unit.kind(a))
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::ExpressionStmt,
                NodeKind::Block,
                NodeKind::MethodDecl,
                NodeKind::ClassDecl,
                NodeKind::CompilationUnit,
            ]
        );
    }
}
