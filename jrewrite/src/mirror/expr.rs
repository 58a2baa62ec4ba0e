//! Expressions, patterns and types.

use compact_str::CompactString;

use super::Mirror;
use crate::cst::CstId;
use crate::tree::{NodeData, NodeId, NodeKind, TreeKind, TypeKind};

impl Mirror<'_> {
    fn type_arguments(&mut self, id: CstId) -> Vec<NodeId> {
        let tree = self.tree;
        match tree
            .child_by_field(id, "type_arguments")
            .or_else(|| tree.child_of_kind(id, "type_arguments"))
        {
            Some(args) => self.mirror_named_children(args),
            None => Vec::new(),
        }
    }

    fn arguments(&mut self, id: CstId) -> Vec<NodeId> {
        match self.tree.child_by_field(id, "arguments") {
            Some(args) => self.mirror_named_children(args),
            None => Vec::new(),
        }
    }

    fn operator(&self, id: CstId) -> &'static str {
        self.tree
            .child_by_field(id, "operator")
            .map_or("", |op| self.tree.kind(op))
    }

    pub(super) fn field_access(&mut self, id: CstId) -> Option<NodeData> {
        if self.tree.kind(id) == "class_literal" {
            return Some(NodeData::FieldAccess {
                target: self.first_named(id)?,
                name: CompactString::const_new("class"),
            });
        }
        Some(NodeData::FieldAccess {
            target: self.mirror_field(id, "object")?,
            name: self.field_text(id, "field"),
        })
    }

    pub(super) fn method_invocation(&mut self, id: CstId) -> NodeData {
        let target = self.mirror_field(id, "object");
        let type_arguments = self.type_arguments(id);
        NodeData::MethodInvocation {
            target,
            type_arguments,
            name: self.field_text(id, "name"),
            arguments: self.arguments(id),
        }
    }

    pub(super) fn new_class(&mut self, id: CstId) -> Option<NodeData> {
        let tree = self.tree;
        let new_at = tree
            .children(id)
            .find(|&c| tree.kind(c) == "new")
            .map_or(0, |c| tree.node(c).start_byte);
        let outer = tree
            .named_children(id)
            .find(|&c| tree.node(c).end_byte <= new_at && tree.node(c).field.is_none());
        let outer = self.mirror(outer);
        let type_arguments = self.type_arguments(id);
        let class_type = self.mirror_field(id, "type")?;
        let arguments = self.arguments(id);
        let body = tree
            .child_of_kind(id, "class_body")
            .map(|body| self.class_body(body));
        Some(NodeData::NewClass {
            outer,
            type_arguments,
            class_type,
            arguments,
            body,
        })
    }

    pub(super) fn new_array(&mut self, id: CstId) -> NodeData {
        let tree = self.tree;
        let element_type = self.mirror_field(id, "type");
        let mut dimensions = Vec::new();
        let mut extra_dims = 0;
        for dim in tree.children_by_field(id, "dimensions") {
            if tree.kind(dim) == "dimensions_expr" {
                dimensions.extend(self.first_named(dim));
            } else {
                extra_dims += self.dimensions(Some(dim));
            }
        }
        NodeData::NewArray {
            element_type,
            dimensions,
            extra_dims,
            initializer: self.mirror_field(id, "value"),
        }
    }

    pub(super) fn binary(&mut self, id: CstId) -> Option<NodeData> {
        let operator = TreeKind::from_binary_symbol(self.operator(id))?;
        Some(NodeData::Binary {
            operator,
            left: self.mirror_field(id, "left")?,
            right: self.mirror_field(id, "right")?,
        })
    }

    pub(super) fn unary(&mut self, id: CstId) -> Option<NodeData> {
        let tree = self.tree;
        if tree.kind(id) == "unary_expression" {
            let operator = TreeKind::from_unary_symbol(self.operator(id), true)?;
            return Some(NodeData::Unary {
                operator,
                operand: self.mirror_field(id, "operand")?,
            });
        }
        let first = tree.children(id).next()?;
        let prefix = !tree.node(first).is_named;
        let symbol = tree
            .children(id)
            .find(|&c| !tree.node(c).is_named)
            .map_or("", |c| tree.kind(c));
        let operator = TreeKind::from_unary_symbol(symbol, prefix)?;
        Some(NodeData::Unary {
            operator,
            operand: self.first_named(id)?,
        })
    }

    pub(super) fn assignment(&mut self, id: CstId) -> Option<NodeData> {
        let symbol = self.operator(id);
        let compound = if symbol == "=" {
            None
        } else {
            Some(TreeKind::from_assignment_symbol(symbol)?)
        };
        let target = self.mirror_field(id, "left")?;
        let value = self.mirror_field(id, "right")?;
        Some(match compound {
            None => NodeData::Assignment { target, value },
            Some(operator) => NodeData::CompoundAssignment {
                operator,
                target,
                value,
            },
        })
    }

    pub(super) fn conditional(&mut self, id: CstId) -> Option<NodeData> {
        Some(NodeData::Conditional {
            condition: self.mirror_field(id, "condition")?,
            then_value: self.mirror_field(id, "consequence")?,
            else_value: self.mirror_field(id, "alternative")?,
        })
    }

    pub(super) fn type_cast(&mut self, id: CstId) -> Option<NodeData> {
        let tree = self.tree;
        let types = self.mirror_all(tree.children_by_field(id, "type"));
        if types.is_empty() {
            return None;
        }
        Some(NodeData::TypeCast {
            types,
            expression: self.mirror_field(id, "value")?,
        })
    }

    pub(super) fn instance_of(&mut self, id: CstId) -> Option<NodeData> {
        let tree = self.tree;
        let expression = self.mirror_field(id, "left")?;
        let target = tree
            .child_by_field(id, "right")
            .or_else(|| tree.child_by_field(id, "pattern"));
        Some(NodeData::InstanceOf {
            expression,
            target: self.mirror(target)?,
            binding: tree
                .child_by_field(id, "name")
                .map(|name| self.text(name)),
            is_final: tree.has_token(id, "final"),
        })
    }

    pub(super) fn array_access(&mut self, id: CstId) -> Option<NodeData> {
        Some(NodeData::ArrayAccess {
            array: self.mirror_field(id, "array")?,
            index: self.mirror_field(id, "index")?,
        })
    }

    pub(super) fn lambda(&mut self, id: CstId) -> Option<NodeData> {
        let tree = self.tree;
        let params = tree.child_by_field(id, "parameters")?;
        let (parameters, parenthesized) = match tree.kind(params) {
            "identifier" => (vec![self.inferred_parameter(params)], false),
            "inferred_parameters" => {
                let names: Vec<CstId> = tree.named_children(params).collect();
                let parameters = names
                    .into_iter()
                    .map(|name| self.inferred_parameter(name))
                    .collect();
                (parameters, true)
            }
            _ => (self.mirror_named_children(params), true),
        };
        Some(NodeData::Lambda {
            parameters,
            parenthesized,
            body: self.mirror_field(id, "body")?,
        })
    }

    /// An untyped lambda parameter, mirrored from its bare identifier.
    fn inferred_parameter(&mut self, name: CstId) -> NodeId {
        let data = NodeData::Parameter {
            modifiers: None,
            ty: None,
            varargs: false,
            name: self.text(name),
            dimensions: 0,
            init: None,
        };
        self.alloc(data, Some(name))
    }

    pub(super) fn member_reference(&mut self, id: CstId) -> Option<NodeData> {
        let tree = self.tree;
        let separator = tree
            .children(id)
            .find(|&c| tree.kind(c) == "::")
            .map(|c| tree.node(c).start_byte)?;
        let target = tree.named_children(id).next();
        let target = self.mirror(target)?;
        let name = if tree.has_token(id, "new") {
            CompactString::const_new("new")
        } else {
            tree.named_children(id)
                .filter(|&c| {
                    tree.node(c).start_byte > separator && tree.kind(c) == "identifier"
                })
                .last()
                .map(|c| self.text(c))
                .unwrap_or_default()
        };
        Some(NodeData::MemberReference {
            target,
            type_arguments: self.type_arguments(id),
            name,
        })
    }

    pub(super) fn record_pattern(&mut self, id: CstId) -> Option<NodeData> {
        let tree = self.tree;
        let head = tree.named_children(id).next()?;
        let ty = if tree.kind(head) == "identifier" {
            let name = self.name_text(head);
            self.alloc(NodeData::TypeName { name }, Some(head))
        } else {
            self.mirror(Some(head))?
        };
        let components = self.mirror_container(id, "record_pattern_body");
        Some(NodeData::RecordPattern { ty, components })
    }

    /// Type patterns, record pattern components and `_`.
    pub(super) fn binding_pattern(&mut self, id: CstId) -> NodeData {
        let tree = self.tree;
        if tree.kind(id) == "underscore_pattern" {
            return NodeData::BindingPattern {
                modifiers: None,
                ty: None,
                name: CompactString::const_new("_"),
            };
        }
        if let Some(inner) = tree.child_of_kind(id, "underscore_pattern") {
            return self.binding_pattern(inner);
        }
        let modifiers = tree.child_of_kind(id, "modifiers");
        let modifiers = self.mirror(modifiers);
        let ty = tree.named_children(id).find(|&c| {
            matches!(NodeKind::from_cst_kind(tree.kind(c)), Some(k) if k.is_type())
        });
        let ty = self.mirror(ty);
        let name = tree
            .named_children(id)
            .filter(|&c| tree.kind(c) == "identifier")
            .last()
            .map(|c| self.text(c))
            .unwrap_or_default();
        NodeData::BindingPattern {
            modifiers,
            ty,
            name,
        }
    }

    pub(super) fn primitive_type(&mut self, id: CstId) -> Option<NodeData> {
        let kind = TypeKind::from_keyword(self.tree.text(id).trim())?;
        Some(NodeData::PrimitiveType { kind })
    }

    pub(super) fn parameterized_type(&mut self, id: CstId) -> Option<NodeData> {
        let base = self.first_named(id)?;
        Some(NodeData::ParameterizedType {
            base,
            type_arguments: self.type_arguments(id),
        })
    }

    pub(super) fn array_type(&mut self, id: CstId) -> Option<NodeData> {
        let element = self.mirror_field(id, "element")?;
        let dims = self.tree.child_by_field(id, "dimensions");
        Some(NodeData::ArrayType {
            element,
            dimensions: self.dimensions(dims).max(1),
        })
    }

    pub(super) fn wildcard(&mut self, id: CstId) -> NodeData {
        let tree = self.tree;
        let kind = if tree.child_of_kind(id, "super").is_some() {
            TreeKind::SuperWildcard
        } else if tree.has_token(id, "extends") {
            TreeKind::ExtendsWildcard
        } else {
            TreeKind::UnboundedWildcard
        };
        let bound = tree.named_children(id).find(|&c| {
            matches!(NodeKind::from_cst_kind(tree.kind(c)), Some(k) if k.is_type())
        });
        NodeData::Wildcard {
            kind,
            bound: self.mirror(bound),
        }
    }

    pub(super) fn annotated_type(&mut self, id: CstId) -> Option<NodeData> {
        let tree = self.tree;
        let annotations = self.annotations(id);
        let ty = tree.named_children(id).find(|&c| {
            matches!(NodeKind::from_cst_kind(tree.kind(c)), Some(k) if k.is_type())
        });
        Some(NodeData::AnnotatedType {
            annotations,
            ty: self.mirror(ty)?,
        })
    }
}
