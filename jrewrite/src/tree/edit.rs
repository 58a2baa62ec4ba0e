//! Field setters.
//!
//! Every setter follows the same contract:
//! - setting the value already installed is a no-op (no action, dirty or
//!   parent change)
//! - an effective change reparents the new child, detaches the old one, sets
//!   the node to [`Action::Change`] and marks it dirty up to the root
//! - a rejected value leaves the node untouched
//!
//! Setters consume and return the [`NodeMut`] so edits chain with `?`.

use compact_str::CompactString;

use super::data::{Action, Field, LiteralValue, NodeData, NodeId, Slot};
use super::error::MutationError;
use super::kind::{
    Category, Modifier, NodeKind, TreeKind, TypeKind, BINARY_OPERATORS,
    COMPOUND_ASSIGNMENT_OPERATORS, LITERAL_KINDS, PRIMITIVE_KINDS, UNARY_OPERATORS,
    WILDCARD_KINDS,
};
use super::CompilationUnit;

/// Snapshot of a field before it is written.
enum Current {
    Required(NodeId),
    Optional(Option<NodeId>),
    List(Vec<NodeId>),
}

/// An in-progress edit of one node.
pub struct NodeMut<'a> {
    unit: &'a mut CompilationUnit,
    id: NodeId,
}

impl std::fmt::Debug for NodeMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeMut")
            .field("id", &self.id)
            .field("kind", &self.unit.kind(self.id))
            .finish()
    }
}

impl<'a> NodeMut<'a> {
    pub(crate) fn new(unit: &'a mut CompilationUnit, id: NodeId) -> Self {
        Self { unit, id }
    }

    /// The node being edited.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Kind of the node being edited.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.data().kind()
    }

    fn data(&self) -> &NodeData {
        &self.unit.nodes[self.id.index()].data
    }

    fn data_mut(&mut self) -> &mut NodeData {
        &mut self.unit.nodes[self.id.index()].data
    }

    fn no_field(&self, field: &'static str) -> MutationError {
        MutationError::NoSuchField {
            kind: self.kind(),
            field,
        }
    }

    fn unsupported(&self, field: &'static str, value: impl std::fmt::Debug) -> MutationError {
        MutationError::KindNotSupported {
            kind: self.kind(),
            field,
            value: format!("{value:?}"),
        }
    }

    fn inspect(&mut self, field: Field) -> Result<(Current, Category), MutationError> {
        let missing = self.no_field(field.as_str());
        match self.data_mut().slot_mut(field) {
            Some(Slot::Required(value, category)) => Ok((Current::Required(*value), category)),
            Some(Slot::Optional(value, category)) => Ok((Current::Optional(*value), category)),
            Some(Slot::List(values, category)) => Ok((Current::List(values.clone()), category)),
            None => Err(missing),
        }
    }

    /// Records an effective change: `Change` unless ignored, then dirty up the chain.
    fn touch(&mut self) {
        let node = &mut self.unit.nodes[self.id.index()];
        if node.action != Action::Ignore {
            node.action = Action::Change;
        }
        self.unit.mark_dirty(self.id);
    }

    fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) {
        self.unit.nodes[child.index()].parent = parent;
    }

    /// Sets a single-child field. `None` clears an optional field.
    ///
    /// # Errors
    /// - [`MutationError::NoSuchField`] if the kind has no such single field
    /// - [`MutationError::RequiredField`] when clearing a required field
    /// - [`MutationError::InvalidChild`], [`MutationError::AlreadyAttached`],
    ///   [`MutationError::Cycle`] or [`MutationError::UnknownNode`] for a bad child
    pub fn set_child(mut self, field: Field, child: Option<NodeId>) -> Result<Self, MutationError> {
        let kind = self.kind();
        let (current, category) = self.inspect(field)?;
        let previous = match current {
            Current::Required(value) => {
                if child.is_none() {
                    return Err(MutationError::RequiredField {
                        kind,
                        field: field.as_str(),
                    });
                }
                Some(value)
            }
            Current::Optional(value) => value,
            Current::List(_) => return Err(self.no_field(field.as_str())),
        };
        if previous == child {
            return Ok(self);
        }
        if let Some(new) = child {
            self.unit
                .check_attachable(Some(self.id), kind, field, category, new, false)?;
        }

        match self.data_mut().slot_mut(field) {
            Some(Slot::Required(value, _)) => {
                if let Some(new) = child {
                    *value = new;
                }
            }
            Some(Slot::Optional(value, _)) => *value = child,
            _ => {}
        }
        if let Some(old) = previous {
            self.set_parent(old, None);
        }
        if let Some(new) = child {
            self.set_parent(new, Some(self.id));
        }
        self.touch();
        Ok(self)
    }

    /// Replaces the contents of a list field.
    ///
    /// Members already in the list may be reordered or dropped; dropped
    /// members become detached.
    ///
    /// # Errors
    /// - [`MutationError::NoSuchField`] if the kind has no such list field
    /// - [`MutationError::AlreadyAttached`] for a child owned elsewhere or
    ///   listed twice
    /// - [`MutationError::InvalidChild`], [`MutationError::Cycle`] or
    ///   [`MutationError::UnknownNode`] for a bad child
    pub fn set_children(
        mut self,
        field: Field,
        children: Vec<NodeId>,
    ) -> Result<Self, MutationError> {
        let kind = self.kind();
        let (current, category) = self.inspect(field)?;
        let Current::List(previous) = current else {
            return Err(self.no_field(field.as_str()));
        };
        if previous == children {
            return Ok(self);
        }
        for (i, &child) in children.iter().enumerate() {
            if children[..i].contains(&child) {
                return Err(MutationError::AlreadyAttached {
                    child,
                    parent: self.id,
                });
            }
            let reattach = previous.contains(&child);
            self.unit
                .check_attachable(Some(self.id), kind, field, category, child, reattach)?;
        }

        if let Some(Slot::List(values, _)) = self.data_mut().slot_mut(field) {
            values.clone_from(&children);
        }
        for old in previous.iter().filter(|old| !children.contains(*old)) {
            self.set_parent(*old, None);
        }
        for &child in &children {
            self.set_parent(child, Some(self.id));
        }
        self.touch();
        Ok(self)
    }

    /// Appends a child to a list field.
    ///
    /// # Errors
    /// Same as [`NodeMut::set_children`].
    pub fn push_child(self, field: Field, child: NodeId) -> Result<Self, MutationError> {
        let mut children = self.list(field)?;
        children.push(child);
        self.set_children(field, children)
    }

    /// Inserts a child into a list field; `index` past the end appends.
    ///
    /// # Errors
    /// Same as [`NodeMut::set_children`].
    pub fn insert_child(
        self,
        field: Field,
        index: usize,
        child: NodeId,
    ) -> Result<Self, MutationError> {
        let mut children = self.list(field)?;
        children.insert(index.min(children.len()), child);
        self.set_children(field, children)
    }

    /// Removes a child from a list field; removing a non-member is a no-op.
    ///
    /// # Errors
    /// Same as [`NodeMut::set_children`].
    pub fn remove_child(self, field: Field, child: NodeId) -> Result<Self, MutationError> {
        let mut children = self.list(field)?;
        children.retain(|&c| c != child);
        self.set_children(field, children)
    }

    fn list(&self, field: Field) -> Result<Vec<NodeId>, MutationError> {
        let mut data = self.data().clone();
        match data.slot_mut(field) {
            Some(Slot::List(values, _)) => Ok(std::mem::take(values)),
            _ => Err(self.no_field(field.as_str())),
        }
    }

    /// Renames the node. Applies to every kind with a primary name, such
    /// as declarations, identifiers, member selections and type names.
    ///
    /// # Errors
    /// [`MutationError::NoSuchField`] for kinds without a name.
    pub fn set_name(mut self, name: &str) -> Result<Self, MutationError> {
        let missing = self.no_field("name");
        let slot = self.data_mut().name_mut().ok_or(missing)?;
        if slot.as_str() == name {
            return Ok(self);
        }
        *slot = CompactString::from(name);
        self.touch();
        Ok(self)
    }

    /// Sets the operator of a binary, unary or compound assignment node.
    ///
    /// # Errors
    /// [`MutationError::KindNotSupported`] for operators outside the node's
    /// legal subset, [`MutationError::NoSuchField`] for other kinds.
    pub fn set_operator(mut self, operator: TreeKind) -> Result<Self, MutationError> {
        let legal: &[TreeKind] = match self.data() {
            NodeData::Binary { .. } => &BINARY_OPERATORS,
            NodeData::Unary { .. } => &UNARY_OPERATORS,
            NodeData::CompoundAssignment { .. } => &COMPOUND_ASSIGNMENT_OPERATORS,
            _ => return Err(self.no_field("operator")),
        };
        if !legal.contains(&operator) {
            return Err(self.unsupported("operator", operator));
        }
        let changed = match self.data_mut() {
            NodeData::Binary { operator: op, .. }
            | NodeData::Unary { operator: op, .. }
            | NodeData::CompoundAssignment { operator: op, .. } => {
                let changed = *op != operator;
                *op = operator;
                changed
            }
            _ => false,
        };
        if changed {
            self.touch();
        }
        Ok(self)
    }

    /// Sets the kind and value of a literal. The value, when present, must
    /// match the kind; a null literal carries no value.
    ///
    /// # Errors
    /// [`MutationError::KindNotSupported`] for kinds outside the literal
    /// subset or a mismatched value, [`MutationError::NoSuchField`] for
    /// non-literals.
    pub fn set_literal(
        mut self,
        kind: TreeKind,
        value: Option<LiteralValue>,
    ) -> Result<Self, MutationError> {
        if !matches!(self.data(), NodeData::Literal { .. }) {
            return Err(self.no_field("value"));
        }
        if !LITERAL_KINDS.contains(&kind) {
            return Err(self.unsupported("kind", kind));
        }
        if let Some(value) = &value {
            if value.kind() != kind {
                return Err(self.unsupported("value", value));
            }
        }
        let changed = match self.data_mut() {
            NodeData::Literal {
                kind: current_kind,
                value: current_value,
            } => {
                let changed = *current_kind != kind || *current_value != value;
                *current_kind = kind;
                *current_value = value;
                changed
            }
            _ => false,
        };
        if changed {
            self.touch();
        }
        Ok(self)
    }

    /// Sets the kind of a primitive type.
    ///
    /// # Errors
    /// [`MutationError::KindNotSupported`] for non-primitive type kinds.
    pub fn set_primitive(mut self, primitive: TypeKind) -> Result<Self, MutationError> {
        if !matches!(self.data(), NodeData::PrimitiveType { .. }) {
            return Err(self.no_field("kind"));
        }
        if !PRIMITIVE_KINDS.contains(&primitive) {
            return Err(self.unsupported("kind", primitive));
        }
        if let NodeData::PrimitiveType { kind } = self.data_mut() {
            if *kind == primitive {
                return Ok(self);
            }
            *kind = primitive;
        }
        self.touch();
        Ok(self)
    }

    /// Sets the kind of a wildcard.
    ///
    /// # Errors
    /// [`MutationError::KindNotSupported`] for non-wildcard kinds.
    pub fn set_wildcard_kind(mut self, wildcard: TreeKind) -> Result<Self, MutationError> {
        if !matches!(self.data(), NodeData::Wildcard { .. }) {
            return Err(self.no_field("kind"));
        }
        if !WILDCARD_KINDS.contains(&wildcard) {
            return Err(self.unsupported("kind", wildcard));
        }
        if let NodeData::Wildcard { kind, .. } = self.data_mut() {
            if *kind == wildcard {
                return Ok(self);
            }
            *kind = wildcard;
        }
        self.touch();
        Ok(self)
    }

    /// Adds a modifier keyword to a modifiers node.
    ///
    /// # Errors
    /// [`MutationError::NoSuchField`] for other kinds.
    pub fn add_modifier(mut self, modifier: Modifier) -> Result<Self, MutationError> {
        let missing = self.no_field("flags");
        let NodeData::Modifiers { flags, .. } = self.data_mut() else {
            return Err(missing);
        };
        if flags.contains(&modifier) {
            return Ok(self);
        }
        flags.push(modifier);
        flags.sort();
        self.touch();
        Ok(self)
    }

    /// Removes a modifier keyword from a modifiers node.
    ///
    /// # Errors
    /// [`MutationError::NoSuchField`] for other kinds.
    pub fn remove_modifier(mut self, modifier: Modifier) -> Result<Self, MutationError> {
        let missing = self.no_field("flags");
        let NodeData::Modifiers { flags, .. } = self.data_mut() else {
            return Err(missing);
        };
        if !flags.contains(&modifier) {
            return Ok(self);
        }
        flags.retain(|&m| m != modifier);
        self.touch();
        Ok(self)
    }

    /// Sets or clears the label of a `break` or `continue`.
    ///
    /// # Errors
    /// [`MutationError::NoSuchField`] for other kinds.
    pub fn set_label(mut self, label: Option<&str>) -> Result<Self, MutationError> {
        let missing = self.no_field("label");
        let (NodeData::Break { label: current } | NodeData::Continue { label: current }) =
            self.data_mut()
        else {
            return Err(missing);
        };
        if current.as_deref() == label {
            return Ok(self);
        }
        *current = label.map(CompactString::from);
        self.touch();
        Ok(self)
    }

    /// Sets the `static` flag of an import, initializer or `requires` directive.
    ///
    /// # Errors
    /// [`MutationError::NoSuchField`] for other kinds.
    pub fn set_static(mut self, value: bool) -> Result<Self, MutationError> {
        let missing = self.no_field("is_static");
        let (NodeData::Import { is_static, .. }
        | NodeData::Initializer { is_static, .. }
        | NodeData::Requires { is_static, .. }) = self.data_mut()
        else {
            return Err(missing);
        };
        if *is_static == value {
            return Ok(self);
        }
        *is_static = value;
        self.touch();
        Ok(self)
    }

    /// Sets whether an import ends in `.*`.
    ///
    /// # Errors
    /// [`MutationError::NoSuchField`] for other kinds.
    pub fn set_on_demand(mut self, value: bool) -> Result<Self, MutationError> {
        let missing = self.no_field("on_demand");
        let NodeData::Import { on_demand, .. } = self.data_mut() else {
            return Err(missing);
        };
        if *on_demand == value {
            return Ok(self);
        }
        *on_demand = value;
        self.touch();
        Ok(self)
    }

    /// Sets the bracket count of a declarator, parameter or array type.
    ///
    /// # Errors
    /// [`MutationError::KindNotSupported`] for a zero-dimension array type,
    /// [`MutationError::NoSuchField`] for other kinds.
    pub fn set_dimensions(mut self, value: u8) -> Result<Self, MutationError> {
        if value == 0 && matches!(self.data(), NodeData::ArrayType { .. }) {
            return Err(self.unsupported("dimensions", value));
        }
        let missing = self.no_field("dimensions");
        let (NodeData::VariableDeclarator { dimensions, .. }
        | NodeData::Parameter { dimensions, .. }
        | NodeData::ArrayType { dimensions, .. }) = self.data_mut()
        else {
            return Err(missing);
        };
        if *dimensions == value {
            return Ok(self);
        }
        *dimensions = value;
        self.touch();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(source: &str) -> CompilationUnit {
        CompilationUnit::parse(source).unwrap()
    }

    #[test]
    fn test_same_name_is_noop() {
        let mut unit = unit("class A { int x; }");
        let decl = unit.find_all(NodeKind::VariableDeclarator)[0];
        unit.edit(decl).unwrap().set_name("x").unwrap();
        assert_eq!(unit.action(decl), Some(Action::NoChange));
        assert!(!unit.is_dirty(unit.root()));
    }

    #[test]
    fn test_rename_marks_change() {
        let mut unit = unit("class A { int x; }");
        let decl = unit.find_all(NodeKind::VariableDeclarator)[0];
        unit.edit(decl).unwrap().set_name("y").unwrap();
        assert_eq!(unit.action(decl), Some(Action::Change));
        assert!(unit.is_dirty(decl));
        assert!(unit.is_dirty(unit.root()));
        assert_eq!(unit.data(decl).and_then(NodeData::name), Some("y"));
    }

    #[test]
    fn test_shift_operator_rejected() {
        let mut unit = unit("class A { int x = 1 + 2; }");
        let binary = unit.find_all(NodeKind::Binary)[0];
        let err = unit
            .edit(binary)
            .unwrap()
            .set_operator(TreeKind::LeftShift)
            .err()
            .unwrap();
        assert!(matches!(err, MutationError::KindNotSupported { .. }));
        assert!(matches!(
            unit.data(binary),
            Some(NodeData::Binary {
                operator: TreeKind::Plus,
                ..
            })
        ));
        assert_eq!(unit.action(binary), Some(Action::NoChange));
    }

    #[test]
    fn test_set_required_child_to_none_fails() {
        let mut unit = unit("class A { int x = 1 + 2; }");
        let binary = unit.find_all(NodeKind::Binary)[0];
        let err = unit
            .edit(binary)
            .unwrap()
            .set_child(Field::Left, None)
            .err()
            .unwrap();
        assert_eq!(
            err,
            MutationError::RequiredField {
                kind: NodeKind::Binary,
                field: "left"
            }
        );
    }

    #[test]
    fn test_set_child_reparents() {
        let mut unit = unit("class A { int x = 1 + 2; }");
        let binary = unit.find_all(NodeKind::Binary)[0];
        let old_left = unit.children(binary)[0];
        let replacement = unit.ident("y").unwrap();
        unit.edit(binary)
            .unwrap()
            .set_child(Field::Left, Some(replacement))
            .unwrap();
        assert_eq!(unit.parent(replacement), Some(binary));
        assert_eq!(unit.parent(old_left), None);
        assert_eq!(unit.children(binary)[0], replacement);
    }

    #[test]
    fn test_attached_child_rejected() {
        let mut unit = unit("class A { int x = a + b; }");
        let binary = unit.find_all(NodeKind::Binary)[0];
        let right = unit.children(binary)[1];
        let err = unit
            .edit(binary)
            .unwrap()
            .set_child(Field::Left, Some(right))
            .err()
            .unwrap();
        assert!(matches!(err, MutationError::AlreadyAttached { .. }));
    }

    #[test]
    fn test_statement_field_rejects_expression() {
        let mut unit = unit("class A { void m() { if (a) b(); } }");
        let stmt = unit.find_all(NodeKind::If)[0];
        let ident = unit.ident("c").unwrap();
        let err = unit
            .edit(stmt)
            .unwrap()
            .set_child(Field::ThenBranch, Some(ident))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            MutationError::InvalidChild {
                found: NodeKind::Ident,
                ..
            }
        ));
        assert_eq!(unit.parent(ident), None);
    }

    #[test]
    fn test_cycle_rejected() {
        let mut unit = unit("class A { int x = (a + b); }");
        let parens = unit.find_all(NodeKind::Parens)[0];
        let copy = unit.deep_clone(parens).unwrap();
        let inner = unit.children(copy)[0];
        let err = unit
            .edit(inner)
            .unwrap()
            .set_child(Field::Left, Some(copy))
            .err()
            .unwrap();
        assert_eq!(
            err,
            MutationError::Cycle {
                child: copy,
                parent: inner
            }
        );
    }

    #[test]
    fn test_reorder_list() {
        let mut unit = unit("class A { void m() { a(); b(); } }");
        let block = unit.find_all(NodeKind::Block)[0];
        let mut stmts = unit.children(block).to_vec();
        stmts.reverse();
        unit.edit(block)
            .unwrap()
            .set_children(Field::Statements, stmts.clone())
            .unwrap();
        assert_eq!(unit.children(block).to_vec(), stmts);
        assert!(stmts.iter().all(|&s| unit.parent(s) == Some(block)));
    }

    #[test]
    fn test_literal_kind_validation() {
        let mut unit = unit("class A { int x = 1; }");
        let lit = unit.find_all(NodeKind::Literal)[0];
        let err = unit
            .edit(lit)
            .unwrap()
            .set_literal(TreeKind::TextBlock, None)
            .err()
            .unwrap();
        assert!(matches!(err, MutationError::KindNotSupported { .. }));
        let err = unit
            .edit(lit)
            .unwrap()
            .set_literal(TreeKind::LongLiteral, Some(LiteralValue::Int(2)))
            .err()
            .unwrap();
        assert!(matches!(err, MutationError::KindNotSupported { .. }));
        assert_eq!(unit.action(lit), Some(Action::NoChange));

        unit.edit(lit)
            .unwrap()
            .set_literal(TreeKind::IntLiteral, Some(LiteralValue::Int(1)))
            .unwrap();
        assert_eq!(unit.action(lit), Some(Action::NoChange));
    }

    #[test]
    fn test_primitive_and_wildcard_subsets() {
        let mut unit = unit("class A { java.util.List<?> x; int y; }");
        let prim = unit.find_all(NodeKind::PrimitiveType)[0];
        assert!(unit
            .edit(prim)
            .unwrap()
            .set_primitive(TypeKind::Declared)
            .is_err());
        unit.edit(prim)
            .unwrap()
            .set_primitive(TypeKind::Long)
            .unwrap();
        let wildcard = unit.find_all(NodeKind::Wildcard)[0];
        assert!(unit
            .edit(wildcard)
            .unwrap()
            .set_wildcard_kind(TreeKind::Plus)
            .is_err());
    }

    #[test]
    fn test_ignore_is_sticky() {
        let mut unit = unit("class A { int x; }");
        let decl = unit.find_all(NodeKind::VariableDeclarator)[0];
        unit.set_ignored(decl).unwrap();
        unit.edit(decl).unwrap().set_name("y").unwrap();
        assert_eq!(unit.action(decl), Some(Action::Ignore));
        assert!(unit.is_dirty(decl));
    }

    #[test]
    fn test_unknown_field() {
        let mut unit = unit("class A { int x; }");
        let decl = unit.find_all(NodeKind::VariableDeclarator)[0];
        let err = unit
            .edit(decl)
            .unwrap()
            .set_child(Field::Condition, None)
            .err()
            .unwrap();
        assert!(matches!(err, MutationError::NoSuchField { .. }));
    }
}
