//! Emission of the mutable tree.
//!
//! Every node goes through [`Renderer::node`], which picks one of three
//! modes:
//! - ignored nodes emit nothing
//! - untouched nodes copy their original text, reindented to the writer
//! - partially edited nodes splice their edited children into the original
//!   text; changed and synthetic nodes go through the kind-specific writers
//!   in the submodules
//!
//! A node writer never emits its own leading indent. Containers put each
//! item on a fresh line and indent it, and carry along the comments that sit
//! between items in the source.

mod decl;
mod expr;
mod stmt;
mod types;

use rustc_hash::FxHashSet;

use crate::cst::{dangling_comments, leading_comments, trailing_comment, Comment, CstId};
use crate::splice::{line_indent, splice_node};
use crate::style::{StandardStyleWriter, StyleWriter};
use crate::tree::{Action, CompilationUnit, NodeData, NodeId, NodeKind};

/// Writes `id` through the emission protocol.
pub fn write_node(unit: &CompilationUnit, id: NodeId, out: &mut dyn StyleWriter) {
    Renderer::new(unit, out).node(id);
}

/// Renders `id` with the unit's style options at depth zero.
#[must_use]
pub fn render_to_string(unit: &CompilationUnit, id: NodeId) -> String {
    let mut writer =
        StandardStyleWriter::new(unit.options().clone()).with_line_separator(unit.line_separator());
    write_node(unit, id, &mut writer);
    writer.into_string()
}

/// Renders `id` for insertion into original text whose line is indented
/// with `base_indent`.
#[must_use]
pub fn render_nested(unit: &CompilationUnit, id: NodeId, base_indent: &str) -> String {
    let mut writer = StandardStyleWriter::nested(unit.options().clone(), base_indent)
        .with_line_separator(unit.line_separator());
    write_node(unit, id, &mut writer);
    writer.into_string()
}

/// Whether a container separates its items the way class bodies do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spacing {
    Members,
    Statements,
}

/// Walks one unit and writes it to a [`StyleWriter`].
pub struct Renderer<'u, 'w> {
    unit: &'u CompilationUnit,
    out: &'w mut dyn StyleWriter,
    /// Start offsets of comments already carried over; a cloned item must
    /// not repeat the comments of its source.
    emitted: FxHashSet<usize>,
}

impl<'u, 'w> Renderer<'u, 'w> {
    /// A renderer over `unit` writing to `out`.
    pub fn new(unit: &'u CompilationUnit, out: &'w mut dyn StyleWriter) -> Self {
        Self {
            unit,
            out,
            emitted: FxHashSet::default(),
        }
    }

    /// Emits one node and, through it, its subtree.
    pub fn node(&mut self, id: NodeId) {
        let Some(node) = self.unit.node(id) else {
            return;
        };
        match (node.action(), node.original()) {
            (Action::Ignore, _) => {}
            (Action::NoChange, Some(original)) if !node.is_dirty() => {
                let text = self.unit.cst().text(original);
                self.verbatim(text, original);
            }
            (Action::NoChange, Some(original)) => match splice_node(self.unit, id) {
                Some(text) => self.verbatim(&text, original),
                None => self.structured(id),
            },
            _ => self.structured(id),
        }
    }

    fn verbatim(&mut self, text: &str, original: CstId) {
        let tree = self.unit.cst();
        let indent = line_indent(tree.source(), tree.node(original).start_byte);
        self.out.append_verbatim_reindented(text, indent);
    }

    fn structured(&mut self, id: NodeId) {
        let Some(data) = self.unit.data(id) else {
            return;
        };
        match data {
            NodeData::CompilationUnit { .. } => self.compilation_unit(0),
            NodeData::Package { annotations, name } => self.package(annotations, name),
            NodeData::Import {
                name,
                is_static,
                on_demand,
            } => self.import(name, *is_static, *on_demand),
            NodeData::Module {
                annotations,
                open,
                name,
                directives,
            } => self.module(id, annotations, *open, name, directives),
            NodeData::Requires { .. }
            | NodeData::Exports { .. }
            | NodeData::Opens { .. }
            | NodeData::Uses { .. }
            | NodeData::Provides { .. } => self.directive(data),
            NodeData::ClassDecl { .. } => self.class_decl(id, data),
            NodeData::ClassBody { members } => {
                let container = self.original(id);
                self.body(members, container, Spacing::Members);
            }
            NodeData::EnumConstant {
                modifiers,
                name,
                arguments,
                body,
            } => self.enum_constant(*modifiers, name, arguments, *body),
            NodeData::MethodDecl { .. } => self.method_decl(data),
            NodeData::VariableDecl {
                modifiers,
                ty,
                declarators,
            } => self.variable_decl(*modifiers, *ty, declarators),
            NodeData::VariableDeclarator {
                name,
                dimensions,
                init,
            } => self.variable_declarator(name, *dimensions, *init),
            NodeData::Parameter { .. } => self.parameter(data),
            NodeData::Initializer { is_static, body } => {
                if *is_static {
                    self.out.append("static ");
                }
                self.node(*body);
            }
            NodeData::Modifiers { flags, annotations } => self.modifiers(id, flags, annotations),
            NodeData::Annotation { name, arguments } => self.annotation(name, arguments),
            NodeData::ElementValuePair { key, value } => {
                self.out.append(key);
                self.out.append(" = ");
                self.node(*value);
            }
            NodeData::TypeParameter {
                annotations,
                name,
                bounds,
            } => self.type_parameter(annotations, name, bounds),
            NodeData::Block { statements } => {
                let container = self.original(id);
                self.body(statements, container, Spacing::Statements);
            }
            NodeData::ExpressionStmt { .. }
            | NodeData::If { .. }
            | NodeData::While { .. }
            | NodeData::DoWhile { .. }
            | NodeData::For { .. }
            | NodeData::ForEach { .. }
            | NodeData::Return { .. }
            | NodeData::Break { .. }
            | NodeData::Continue { .. }
            | NodeData::Throw { .. }
            | NodeData::Try { .. }
            | NodeData::Catch { .. }
            | NodeData::Switch { .. }
            | NodeData::Case { .. }
            | NodeData::Labeled { .. }
            | NodeData::Synchronized { .. }
            | NodeData::Assert { .. }
            | NodeData::Yield { .. }
            | NodeData::Empty => self.statement(id, data),
            NodeData::PrimitiveType { .. }
            | NodeData::TypeName { .. }
            | NodeData::ParameterizedType { .. }
            | NodeData::ArrayType { .. }
            | NodeData::Wildcard { .. }
            | NodeData::UnionType { .. }
            | NodeData::IntersectionType { .. }
            | NodeData::AnnotatedType { .. }
            | NodeData::RecordPattern { .. }
            | NodeData::BindingPattern { .. } => self.type_or_pattern(data),
            _ => self.expression(data),
        }
    }

    fn original(&self, id: NodeId) -> Option<CstId> {
        self.unit.node(id).and_then(|n| n.original())
    }

    fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.unit.kind(id)
    }

    /// The items of `ids` that are not ignored.
    fn visible(&self, ids: &[NodeId]) -> Vec<NodeId> {
        ids.iter()
            .copied()
            .filter(|&id| !self.unit.is_ignored(id))
            .collect()
    }

    fn present(&self, id: Option<NodeId>) -> Option<NodeId> {
        id.filter(|&id| !self.unit.is_ignored(id))
    }

    fn list(&mut self, ids: &[NodeId], separator: &str) {
        for (i, id) in self.visible(ids).into_iter().enumerate() {
            if i > 0 {
                self.out.append(separator);
            }
            self.node(id);
        }
    }

    fn comma_list(&mut self, ids: &[NodeId]) {
        self.list(ids, ", ");
    }

    /// `(a, b)`, always with the parentheses.
    fn arguments(&mut self, ids: &[NodeId]) {
        self.out.append_open_paren();
        self.comma_list(ids);
        self.out.append_close_paren();
    }

    /// `<A, B>`, or nothing for an empty list.
    fn angle_list(&mut self, ids: &[NodeId]) {
        if self.visible(ids).is_empty() {
            return;
        }
        self.out.append_less_than();
        self.comma_list(ids);
        self.out.append_greater_than();
    }

    /// ` keyword a, b`, or nothing for an empty list. The keyword may wrap.
    fn clause(&mut self, keyword: &str, ids: &[NodeId], separator: &str) {
        if self.visible(ids).is_empty() {
            return;
        }
        self.out.append_space();
        self.out.append_keyword(keyword);
        self.out.append_space();
        self.list(ids, separator);
    }

    fn dims(&mut self, count: u8) {
        for _ in 0..count {
            self.out.append("[]");
        }
    }

    /// A braced list of items, one per line, with the comments of the
    /// original container carried over. An empty container renders `{}`.
    fn body(&mut self, items: &[NodeId], container: Option<CstId>, spacing: Spacing) {
        let items = self.visible(items);
        let dangling = container
            .map(|c| dangling_comments(self.unit.cst(), c))
            .unwrap_or_default();
        if items.is_empty() && dangling.is_empty() {
            self.out.append("{}");
            return;
        }
        self.out.append_open_brace();
        self.out.increase_depth();
        self.items(&items, spacing);
        self.comments_on_own_lines(&dangling);
        self.out.decrease_depth();
        self.out.append_line_separator();
        self.out.append_indent();
        self.out.append_close_brace();
    }

    /// Each item on its own line at the current depth, blank lines kept
    /// where the source had them.
    fn items(&mut self, items: &[NodeId], spacing: Spacing) {
        let mut previous = None;
        for &item in items {
            self.out.append_line_separator();
            if let Some(previous) = previous {
                if self.blank_line_between(previous, item, spacing) {
                    self.out.append_line_separator();
                }
            }
            self.item(item, 0);
            previous = Some(item);
        }
    }

    /// One item at the start of a fresh line: its leading comments, the
    /// indent, the node and its trailing comment.
    fn item(&mut self, item: NodeId, skip_before: usize) {
        self.leading_comments(item, skip_before);
        self.out.append_indent();
        self.node(item);
        self.trailing_comment(item);
    }

    /// The own-line comments in front of `item`, each on its own line.
    /// Comments that start before `skip_before` are left out.
    fn leading_comments(&mut self, item: NodeId, skip_before: usize) {
        let Some(original) = self.original(item) else {
            return;
        };
        let comments: Vec<Comment> = leading_comments(self.unit.cst(), original)
            .into_iter()
            .filter(|c| c.start_byte >= skip_before && self.emitted.insert(c.start_byte))
            .collect();
        for comment in &comments {
            self.out.append_indent();
            self.comment(comment);
            self.out.append_line_separator();
        }
    }

    fn trailing_comment(&mut self, item: NodeId) {
        if let Some(comment) = self
            .original(item)
            .and_then(|original| trailing_comment(self.unit.cst(), original))
            .filter(|c| self.emitted.insert(c.start_byte))
        {
            self.out.append_space();
            self.comment(&comment);
        }
    }

    fn comments_on_own_lines(&mut self, comments: &[Comment]) {
        for comment in comments {
            if !self.emitted.insert(comment.start_byte) {
                continue;
            }
            self.out.append_line_separator();
            self.out.append_indent();
            self.comment(comment);
        }
    }

    fn comment(&mut self, comment: &Comment) {
        let indent = line_indent(self.unit.source(), comment.start_byte);
        self.out.append_verbatim_reindented(&comment.text, indent);
    }

    fn blank_line_between(&self, previous: NodeId, next: NodeId, spacing: Spacing) -> bool {
        let tree = self.unit.cst();
        match (self.original(previous), self.original(next)) {
            (Some(a), Some(b)) => {
                let end = tree.node(a).end_byte;
                let start = leading_comments(tree, b)
                    .first()
                    .map_or(tree.node(b).start_byte, |c| c.start_byte);
                let Some(gap) = self.unit.source().get(end..start) else {
                    return false;
                };
                let lines: Vec<&str> = gap.split('\n').collect();
                lines.len() > 2 && lines[1..lines.len() - 1].iter().any(|l| l.trim().is_empty())
            }
            _ => {
                spacing == Spacing::Members
                    && [previous, next].into_iter().any(|id| {
                        matches!(
                            self.kind(id),
                            Some(NodeKind::MethodDecl | NodeKind::ClassDecl)
                        )
                    })
            }
        }
    }
}
