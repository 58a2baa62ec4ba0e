//! Factories for synthetic nodes.
//!
//! Synthetic nodes have no original and start as `Change`, so they
//! always go through the structured writer. They are created detached and
//! become part of the tree once a setter installs them.

use compact_str::CompactString;

use super::data::{LiteralValue, Node, NodeData, NodeId, Slot};
use super::error::MutationError;
use super::kind::{
    TreeKind, TypeKind, BINARY_OPERATORS, COMPOUND_ASSIGNMENT_OPERATORS, LITERAL_KINDS,
    PRIMITIVE_KINDS, UNARY_OPERATORS, WILDCARD_KINDS,
};
use super::CompilationUnit;

impl CompilationUnit {
    /// Adds a synthetic node built from `data`.
    ///
    /// Every child named by `data` must exist, be detached and fit its field;
    /// enum-like values must lie in their legal subsets.
    ///
    /// # Errors
    /// The same errors the setters raise for the offending field.
    pub fn create(&mut self, mut data: NodeData) -> Result<NodeId, MutationError> {
        validate_values(&data)?;
        let kind = data.kind();
        let mut seen: Vec<NodeId> = Vec::new();
        for &field in data.fields() {
            let (ids, category) = match data.slot_mut(field) {
                Some(Slot::Required(value, category)) => (vec![*value], category),
                Some(Slot::Optional(value, category)) => {
                    (value.iter().copied().collect(), category)
                }
                Some(Slot::List(values, category)) => (values.clone(), category),
                None => continue,
            };
            for child in ids {
                if seen.contains(&child) {
                    return Err(MutationError::AlreadyAttached {
                        child,
                        parent: child,
                    });
                }
                self.check_attachable(None, kind, field, category, child, false)?;
                seen.push(child);
            }
        }

        let children = data.children();
        let id = self.alloc(Node::new(data, None));
        for child in children {
            if let Ok(node) = self.get_mut(child) {
                node.parent = Some(id);
            }
        }
        Ok(id)
    }

    /// A simple name: identifier, `this` or `super`.
    ///
    /// # Errors
    /// Never fails for leaf nodes; kept fallible for uniformity.
    pub fn ident(&mut self, name: &str) -> Result<NodeId, MutationError> {
        self.create(NodeData::Ident { name: name.into() })
    }

    /// A class or interface type name, possibly qualified.
    ///
    /// # Errors
    /// Never fails for leaf nodes.
    pub fn type_name(&mut self, name: &str) -> Result<NodeId, MutationError> {
        self.create(NodeData::TypeName { name: name.into() })
    }

    /// A primitive type.
    ///
    /// # Errors
    /// [`MutationError::KindNotSupported`] for non-primitive kinds.
    pub fn primitive_type(&mut self, kind: TypeKind) -> Result<NodeId, MutationError> {
        self.create(NodeData::PrimitiveType { kind })
    }

    /// A literal holding `value`.
    ///
    /// # Errors
    /// Never fails; every value has a legal kind.
    pub fn literal(&mut self, value: LiteralValue) -> Result<NodeId, MutationError> {
        self.create(NodeData::Literal {
            kind: value.kind(),
            value: Some(value),
        })
    }

    /// The `null` literal.
    ///
    /// # Errors
    /// Never fails.
    pub fn null_literal(&mut self) -> Result<NodeId, MutationError> {
        self.create(NodeData::Literal {
            kind: TreeKind::NullLiteral,
            value: None,
        })
    }

    /// `left operator right`.
    ///
    /// # Errors
    /// Fails for operators outside the binary subset or non-expression operands.
    pub fn binary(
        &mut self,
        operator: TreeKind,
        left: NodeId,
        right: NodeId,
    ) -> Result<NodeId, MutationError> {
        self.create(NodeData::Binary {
            operator,
            left,
            right,
        })
    }

    /// A unary expression.
    ///
    /// # Errors
    /// Fails for operators outside the unary subset or a non-expression operand.
    pub fn unary(&mut self, operator: TreeKind, operand: NodeId) -> Result<NodeId, MutationError> {
        self.create(NodeData::Unary { operator, operand })
    }

    /// `target = value`.
    ///
    /// # Errors
    /// Fails for non-expression operands.
    pub fn assignment(&mut self, target: NodeId, value: NodeId) -> Result<NodeId, MutationError> {
        self.create(NodeData::Assignment { target, value })
    }

    /// `(expression)`.
    ///
    /// # Errors
    /// Fails for a non-expression operand.
    pub fn parens(&mut self, expression: NodeId) -> Result<NodeId, MutationError> {
        self.create(NodeData::Parens { expression })
    }

    /// `target.name`.
    ///
    /// # Errors
    /// Fails when `target` is neither an expression nor a type.
    pub fn field_access(&mut self, target: NodeId, name: &str) -> Result<NodeId, MutationError> {
        self.create(NodeData::FieldAccess {
            target,
            name: name.into(),
        })
    }

    /// `target.name(arguments)`, or `name(arguments)` without a target.
    ///
    /// # Errors
    /// Fails for a bad target or non-expression arguments.
    pub fn method_invocation(
        &mut self,
        target: Option<NodeId>,
        name: &str,
        arguments: Vec<NodeId>,
    ) -> Result<NodeId, MutationError> {
        self.create(NodeData::MethodInvocation {
            target,
            type_arguments: Vec::new(),
            name: name.into(),
            arguments,
        })
    }

    /// `new class_type(arguments)`.
    ///
    /// # Errors
    /// Fails for a non-type class or non-expression arguments.
    pub fn new_class(
        &mut self,
        class_type: NodeId,
        arguments: Vec<NodeId>,
    ) -> Result<NodeId, MutationError> {
        self.create(NodeData::NewClass {
            outer: None,
            type_arguments: Vec::new(),
            class_type,
            arguments,
            body: None,
        })
    }

    /// `expression;`.
    ///
    /// # Errors
    /// Fails for a non-expression operand.
    pub fn expression_stmt(&mut self, expression: NodeId) -> Result<NodeId, MutationError> {
        self.create(NodeData::ExpressionStmt { expression })
    }

    /// `return expression;`.
    ///
    /// # Errors
    /// Fails for a non-expression operand.
    pub fn return_stmt(&mut self, expression: Option<NodeId>) -> Result<NodeId, MutationError> {
        self.create(NodeData::Return { expression })
    }

    /// `{ statements }`.
    ///
    /// # Errors
    /// Fails for non-statement members.
    pub fn block(&mut self, statements: Vec<NodeId>) -> Result<NodeId, MutationError> {
        self.create(NodeData::Block { statements })
    }

    /// `ty name = init;` as a local variable or field declaration.
    ///
    /// # Errors
    /// Fails for a non-type `ty` or non-expression `init`.
    pub fn variable(
        &mut self,
        ty: NodeId,
        name: &str,
        init: Option<NodeId>,
    ) -> Result<NodeId, MutationError> {
        let declarator = self.create(NodeData::VariableDeclarator {
            name: name.into(),
            dimensions: 0,
            init,
        })?;
        self.create(NodeData::VariableDecl {
            modifiers: None,
            ty,
            declarators: vec![declarator],
        })
    }

    /// `import name;`, optionally static and/or on demand.
    ///
    /// # Errors
    /// Never fails for leaf nodes.
    pub fn import(
        &mut self,
        name: &str,
        is_static: bool,
        on_demand: bool,
    ) -> Result<NodeId, MutationError> {
        self.create(NodeData::Import {
            name: CompactString::from(name),
            is_static,
            on_demand,
        })
    }

    /// A marker annotation `@name`.
    ///
    /// # Errors
    /// Never fails for leaf nodes.
    pub fn annotation(&mut self, name: &str) -> Result<NodeId, MutationError> {
        self.create(NodeData::Annotation {
            name: name.into(),
            arguments: Vec::new(),
        })
    }
}

fn validate_values(data: &NodeData) -> Result<(), MutationError> {
    let kind = data.kind();
    let reject = |field: &'static str, value: String| MutationError::KindNotSupported {
        kind,
        field,
        value,
    };
    match data {
        NodeData::Binary { operator, .. } if !BINARY_OPERATORS.contains(operator) => {
            Err(reject("operator", format!("{operator:?}")))
        }
        NodeData::Unary { operator, .. } if !UNARY_OPERATORS.contains(operator) => {
            Err(reject("operator", format!("{operator:?}")))
        }
        NodeData::CompoundAssignment { operator, .. }
            if !COMPOUND_ASSIGNMENT_OPERATORS.contains(operator) =>
        {
            Err(reject("operator", format!("{operator:?}")))
        }
        NodeData::Literal { kind: literal, .. } if !LITERAL_KINDS.contains(literal) => {
            Err(reject("kind", format!("{literal:?}")))
        }
        NodeData::Literal {
            kind: literal,
            value: Some(value),
        } if value.kind() != *literal => Err(reject("value", format!("{value:?}"))),
        NodeData::PrimitiveType { kind: primitive } if !PRIMITIVE_KINDS.contains(primitive) => {
            Err(reject("kind", format!("{primitive:?}")))
        }
        NodeData::Wildcard { kind: wildcard, .. } if !WILDCARD_KINDS.contains(wildcard) => {
            Err(reject("kind", format!("{wildcard:?}")))
        }
        NodeData::ArrayType { dimensions: 0, .. } => Err(reject("dimensions", "0".to_owned())),
        _ => Ok(()),
    }
}
