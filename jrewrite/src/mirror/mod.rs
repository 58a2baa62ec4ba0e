//! Tree mirroring pass.
//!
//! Walks the immutable [`CstTree`] once and builds the node-for-node mutable
//! arena of a [`CompilationUnit`]. Every mirrored node remembers the
//! [`CstId`] it came from, which is what later lets untouched nodes render
//! verbatim.
//!
//! Grammar kinds with no mutable counterpart are dropped together with their
//! subtree; each dropped subtree root bumps the unit's unsupported-node
//! counter once. Comments and anonymous tokens are trivia and never count.

mod decl;
mod expr;
mod literal;
mod stmt;

use compact_str::CompactString;
use tracing::warn;

use crate::cst::{CstId, CstTree};
use crate::tree::{Action, CompilationUnit, Node, NodeData, NodeId, NodeKind};

/// Mirrors a parsed tree into a fresh [`CompilationUnit`].
#[must_use]
pub fn mirror_unit(tree: CstTree) -> CompilationUnit {
    let (nodes, root, unsupported) = {
        let mut mirror = Mirror::new(&tree);
        let root = match mirror.mirror(Some(tree.root())) {
            Some(root) if mirror.nodes[root.index()].kind() == NodeKind::CompilationUnit => root,
            _ => mirror.alloc(
                NodeData::CompilationUnit {
                    package: None,
                    imports: Vec::new(),
                    types: Vec::new(),
                    module: None,
                },
                Some(tree.root()),
            ),
        };
        (mirror.nodes, root, mirror.unsupported)
    };
    if unsupported > 0 {
        warn!(unsupported, "mirrored unit dropped unsupported constructs");
    }
    CompilationUnit::from_parts(nodes, root, tree, unsupported)
}

/// Arena under construction.
pub(crate) struct Mirror<'t> {
    tree: &'t CstTree,
    nodes: Vec<Node>,
    unsupported: usize,
}

impl<'t> Mirror<'t> {
    fn new(tree: &'t CstTree) -> Self {
        Self {
            tree,
            nodes: Vec::with_capacity(tree.len() / 2),
            unsupported: 0,
        }
    }

    /// Mirrors one immutable node. `None` in gives `None` out, as does an
    /// unsupported kind or a node whose required child could not be mirrored.
    pub(crate) fn mirror(&mut self, id: Option<CstId>) -> Option<NodeId> {
        let id = id?;
        let node = self.tree.node(id);
        if node.is_comment() || !node.is_named {
            return None;
        }
        if matches!(node.kind, "module_directive" | "pattern") {
            let inner = self.tree.named_children(id).next();
            return self.mirror(inner);
        }
        let Some(kind) = NodeKind::from_cst_kind(node.kind) else {
            self.unsupported(id);
            return None;
        };
        let data = self.build(kind, id)?;
        Some(self.alloc(data, Some(id)))
    }

    fn build(&mut self, kind: NodeKind, id: CstId) -> Option<NodeData> {
        match kind {
            NodeKind::CompilationUnit => Some(self.compilation_unit(id)),
            NodeKind::Package => Some(self.package(id)),
            NodeKind::Import => Some(self.import(id)),
            NodeKind::Module => Some(self.module(id)),
            NodeKind::Requires => Some(self.requires(id)),
            NodeKind::Exports | NodeKind::Opens => Some(self.exports(kind, id)),
            NodeKind::Uses | NodeKind::Provides => Some(self.provides(kind, id)),
            NodeKind::ClassDecl => Some(self.class_decl(id)),
            NodeKind::EnumConstant => Some(self.enum_constant(id)),
            NodeKind::MethodDecl => Some(self.method_decl(id)),
            NodeKind::VariableDecl => self.variable_decl(id),
            NodeKind::VariableDeclarator => Some(self.variable_declarator(id)),
            NodeKind::Parameter => self.parameter(id),
            NodeKind::Initializer => self.initializer(id),
            NodeKind::Modifiers => Some(self.modifiers(id)),
            NodeKind::Annotation => Some(self.annotation(id)),
            NodeKind::ElementValuePair => self.element_value_pair(id),
            NodeKind::TypeParameter => Some(self.type_parameter(id)),
            NodeKind::Block => Some(NodeData::Block {
                statements: self.statements(id),
            }),
            NodeKind::ExpressionStmt => self.expression_stmt(id),
            NodeKind::If => self.if_stmt(id),
            NodeKind::While => self.while_stmt(id),
            NodeKind::DoWhile => self.do_while(id),
            NodeKind::For => self.for_stmt(id),
            NodeKind::ForEach => self.for_each(id),
            NodeKind::Return => Some(NodeData::Return {
                expression: self.first_named(id),
            }),
            NodeKind::Break => Some(NodeData::Break {
                label: self.label(id),
            }),
            NodeKind::Continue => Some(NodeData::Continue {
                label: self.label(id),
            }),
            NodeKind::Throw => Some(NodeData::Throw {
                expression: self.first_named(id)?,
            }),
            NodeKind::Try => self.try_stmt(id),
            NodeKind::Catch => self.catch_clause(id),
            NodeKind::Switch => self.switch(id),
            NodeKind::Case => Some(self.case(id)),
            NodeKind::Labeled => self.labeled(id),
            NodeKind::Synchronized => self.synchronized(id),
            NodeKind::Assert => self.assert(id),
            NodeKind::Yield => Some(NodeData::Yield {
                value: self.first_named(id)?,
            }),
            NodeKind::Ident => Some(NodeData::Ident {
                name: self.text(id),
            }),
            NodeKind::FieldAccess => self.field_access(id),
            NodeKind::MethodInvocation => Some(self.method_invocation(id)),
            NodeKind::NewClass => self.new_class(id),
            NodeKind::NewArray => Some(self.new_array(id)),
            NodeKind::ArrayInit => Some(NodeData::ArrayInit {
                elements: self.mirror_named_children(id),
            }),
            NodeKind::Literal => {
                let (kind, value) = literal::decode(self.tree.kind(id), self.tree.text(id));
                Some(NodeData::Literal { kind, value })
            }
            NodeKind::Binary => self.binary(id),
            NodeKind::Unary => self.unary(id),
            NodeKind::Assignment => self.assignment(id),
            NodeKind::Conditional => self.conditional(id),
            NodeKind::Parens => Some(NodeData::Parens {
                expression: self.first_named(id)?,
            }),
            NodeKind::TypeCast => self.type_cast(id),
            NodeKind::InstanceOf => self.instance_of(id),
            NodeKind::ArrayAccess => self.array_access(id),
            NodeKind::Lambda => self.lambda(id),
            NodeKind::MemberReference => self.member_reference(id),
            NodeKind::RecordPattern => self.record_pattern(id),
            NodeKind::BindingPattern => Some(self.binding_pattern(id)),
            NodeKind::PrimitiveType => self.primitive_type(id),
            NodeKind::TypeName => Some(NodeData::TypeName {
                name: self.name_text(id),
            }),
            NodeKind::ParameterizedType => self.parameterized_type(id),
            NodeKind::ArrayType => self.array_type(id),
            NodeKind::Wildcard => Some(self.wildcard(id)),
            NodeKind::UnionType => Some(NodeData::UnionType {
                alternatives: self.mirror_named_children(id),
            }),
            NodeKind::AnnotatedType => self.annotated_type(id),
            // Built directly by their parents, never looked up by grammar kind.
            NodeKind::ClassBody
            | NodeKind::CompoundAssignment
            | NodeKind::IntersectionType
            | NodeKind::Empty => None,
        }
    }

    /// Pushes a node and links the children it lists back to it.
    fn alloc(&mut self, data: NodeData, original: Option<CstId>) -> NodeId {
        let children = data.children();
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node::new(data, original));
        for child in children {
            self.nodes[child.index()].parent = Some(id);
        }
        id
    }

    /// Allocates a node that has no immutable counterpart of its own but
    /// still describes untouched source, such as the call inside an explicit
    /// constructor invocation.
    fn alloc_unchanged(&mut self, data: NodeData) -> NodeId {
        let id = self.alloc(data, None);
        self.nodes[id.index()].action = Action::NoChange;
        id
    }

    fn unsupported(&mut self, id: CstId) {
        let node = self.tree.node(id);
        warn!(
            kind = node.kind,
            line = node.start_point.row + 1,
            "unsupported construct dropped from mirror"
        );
        self.unsupported += 1;
    }

    fn mirror_field(&mut self, id: CstId, field: &str) -> Option<NodeId> {
        let child = self.tree.child_by_field(id, field);
        self.mirror(child)
    }

    fn mirror_all(&mut self, ids: impl IntoIterator<Item = CstId>) -> Vec<NodeId> {
        ids.into_iter()
            .filter_map(|id| self.mirror(Some(id)))
            .collect()
    }

    fn mirror_named_children(&mut self, id: CstId) -> Vec<NodeId> {
        let tree = self.tree;
        self.mirror_all(tree.named_children(id))
    }

    fn first_named(&mut self, id: CstId) -> Option<NodeId> {
        let child = self.tree.named_children(id).next();
        self.mirror(child)
    }

    /// Named children of the first child of kind `container`.
    fn mirror_container(&mut self, id: CstId, container: &str) -> Vec<NodeId> {
        match self.tree.child_of_kind(id, container) {
            Some(inner) => self.mirror_named_children(inner),
            None => Vec::new(),
        }
    }

    fn text(&self, id: CstId) -> CompactString {
        CompactString::from(self.tree.text(id))
    }

    /// Text of a possibly qualified name with whitespace removed.
    fn name_text(&self, id: CstId) -> CompactString {
        self.tree
            .text(id)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }

    fn field_text(&self, id: CstId, field: &str) -> CompactString {
        self.tree
            .child_by_field(id, field)
            .map(|c| self.name_text(c))
            .unwrap_or_default()
    }

    /// Number of `[]` pairs in a `dimensions` node.
    fn dimensions(&self, id: Option<CstId>) -> u8 {
        id.map_or(0, |id| {
            let count = self.tree.children(id).filter(|&c| self.tree.kind(c) == "[").count();
            u8::try_from(count).unwrap_or(u8::MAX)
        })
    }

    /// Every child of kind `identifier`, `scoped_identifier` or a type name, as text.
    fn names(&self, id: CstId) -> Vec<CompactString> {
        self.tree
            .named_children(id)
            .filter(|&c| {
                matches!(
                    self.tree.kind(c),
                    "identifier"
                        | "scoped_identifier"
                        | "type_identifier"
                        | "scoped_type_identifier"
                )
            })
            .map(|c| self.name_text(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{CstParser, CstTreeBuilder};
    use crate::tree::{LiteralValue, TreeKind};

    fn unit(source: &str) -> CompilationUnit {
        mirror_unit(CstParser::new().unwrap().parse(source).unwrap())
    }

    #[test]
    fn test_top_level_shape() {
        let unit = unit("package a.b;\nimport java.util.*;\nimport static x.Y.z;\nclass A {}\ninterface B {}\n");
        let NodeData::CompilationUnit {
            package,
            imports,
            types,
            module,
        } = unit.data(unit.root()).unwrap()
        else {
            panic!("root is not a compilation unit");
        };
        assert_eq!(unit.data(package.unwrap()).unwrap().name(), Some("a.b"));
        assert_eq!(imports.len(), 2);
        assert_eq!(
            unit.data(imports[0]),
            Some(&NodeData::Import {
                name: "java.util".into(),
                is_static: false,
                on_demand: true
            })
        );
        assert_eq!(
            unit.data(imports[1]),
            Some(&NodeData::Import {
                name: "x.Y.z".into(),
                is_static: true,
                on_demand: false
            })
        );
        assert_eq!(types.len(), 2);
        assert!(module.is_none());
        assert_eq!(unit.unsupported_nodes(), 0);
    }

    #[test]
    fn test_parents_are_linked() {
        let unit = unit("class A { int f(int x) { return x + 1; } }");
        for id in unit.descendants(unit.root()) {
            for child in unit.children(id) {
                assert_eq!(unit.parent(child), Some(id));
            }
        }
        assert_eq!(unit.parent(unit.root()), None);
    }

    #[test]
    fn test_every_node_starts_unchanged_and_clean() {
        let unit = unit("class A { void m() { foo(1, \"s\"); } }");
        for id in unit.descendants(unit.root()) {
            assert_eq!(unit.action(id), Some(Action::NoChange));
            assert!(!unit.is_dirty(id));
        }
    }

    #[test]
    fn test_compound_assignment() {
        let unit = unit("class A { void m() { x += 2; y = 3; } }");
        let compound = unit.find_all(NodeKind::CompoundAssignment);
        assert_eq!(compound.len(), 1);
        assert!(matches!(
            unit.data(compound[0]),
            Some(NodeData::CompoundAssignment {
                operator: TreeKind::PlusAssignment,
                ..
            })
        ));
        assert_eq!(unit.find_all(NodeKind::Assignment).len(), 1);
    }

    #[test]
    fn test_conditions_drop_parentheses() {
        let unit = unit("class A { void m() { if ((a)) b(); } }");
        let stmt = unit.find_all(NodeKind::If)[0];
        let condition = unit.children(stmt)[0];
        assert_eq!(unit.kind(condition), Some(NodeKind::Parens));
        assert_eq!(unit.original_text(condition), Some("(a)"));
    }

    #[test]
    fn test_lambda_parameters() {
        let unit = unit("class A { Object f = x -> x; Object g = (a, b) -> { }; }");
        let lambdas = unit.find_all(NodeKind::Lambda);
        let NodeData::Lambda {
            parameters,
            parenthesized,
            ..
        } = unit.data(lambdas[0]).unwrap()
        else {
            panic!("not a lambda");
        };
        assert!(!parenthesized);
        assert_eq!(unit.data(parameters[0]).unwrap().name(), Some("x"));
        let NodeData::Lambda {
            parameters,
            parenthesized,
            ..
        } = unit.data(lambdas[1]).unwrap()
        else {
            panic!("not a lambda");
        };
        assert!(parenthesized);
        assert_eq!(parameters.len(), 2);
    }

    #[test]
    fn test_explicit_constructor_invocation() {
        let unit = unit("class A extends B { A(int x) { super(x); } }");
        let call = unit.find_all(NodeKind::MethodInvocation)[0];
        assert_eq!(unit.data(call).unwrap().name(), Some("super"));
        assert_eq!(unit.action(call), Some(Action::NoChange));
        assert_eq!(
            unit.kind(unit.parent(call).unwrap()),
            Some(NodeKind::ExpressionStmt)
        );
    }

    #[test]
    fn test_catch_types() {
        let unit = unit("class A { void m() { try { } catch (IOException | RuntimeException e) { } catch (Exception e) { } } }");
        let params: Vec<_> = unit
            .find_all(NodeKind::Catch)
            .into_iter()
            .map(|c| unit.children(c)[0])
            .collect();
        let first_ty = unit.children(params[0])[0];
        assert_eq!(unit.kind(first_ty), Some(NodeKind::UnionType));
        let second_ty = unit.children(params[1])[0];
        assert_eq!(unit.kind(second_ty), Some(NodeKind::TypeName));
    }

    #[test]
    fn test_class_literal_and_constructor_reference() {
        let unit = unit("class A { Object a = String.class; Object b = ArrayList::new; }");
        let access = unit.find_all(NodeKind::FieldAccess)[0];
        assert_eq!(unit.data(access).unwrap().name(), Some("class"));
        let reference = unit.find_all(NodeKind::MemberReference)[0];
        assert_eq!(unit.data(reference).unwrap().name(), Some("new"));
    }

    #[test]
    fn test_literals_decoded() {
        let unit = unit("class A { long a = 10L; char c = 'x'; Object n = null; }");
        let values: Vec<_> = unit
            .find_all(NodeKind::Literal)
            .into_iter()
            .filter_map(|id| match unit.data(id) {
                Some(NodeData::Literal { value, .. }) => Some(value.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            values,
            vec![
                Some(LiteralValue::Long(10)),
                Some(LiteralValue::Char('x')),
                None
            ]
        );
    }

    #[test]
    fn test_empty_statements_and_comments() {
        let unit = unit("class A { void m() { ; // note\n a(); } }");
        let block = unit.find_all(NodeKind::Block)[0];
        let kinds: Vec<_> = unit
            .children(block)
            .into_iter()
            .filter_map(|c| unit.kind(c))
            .collect();
        assert_eq!(kinds, vec![NodeKind::Empty, NodeKind::ExpressionStmt]);
        assert_eq!(unit.unsupported_nodes(), 0);
    }

    #[test]
    fn test_enum_and_record() {
        let unit = unit("enum E { A, B(1) { }; void m() {} }\nrecord P(int x, int y) {}\n");
        let constants = unit.find_all(NodeKind::EnumConstant);
        assert_eq!(constants.len(), 2);
        assert_eq!(unit.find_all(NodeKind::ClassBody).len(), 1);
        let decls = unit.find_all(NodeKind::ClassDecl);
        let NodeData::ClassDecl {
            record_components, ..
        } = unit.data(decls[1]).unwrap()
        else {
            panic!("not a class");
        };
        assert_eq!(record_components.len(), 2);
    }

    #[test]
    fn test_unsupported_counted_once() {
        let unit = unit("class A { void m(A this) {} }");
        assert_eq!(unit.unsupported_nodes(), 1);
        assert_eq!(unit.find_all(NodeKind::Parameter).len(), 0);
    }

    #[test]
    fn test_unknown_kind_from_builder() {
        let source = "class A {}\nfoo bar;";
        let mut builder = CstTreeBuilder::new(source);
        let root = builder.node("program", None, 0, source.len(), None);
        let class = builder.node("class_declaration", None, 0, 10, Some(root));
        builder.token("class", 0, 5, class);
        builder.node("identifier", Some("name"), 6, 7, Some(class));
        builder.node("class_body", Some("body"), 8, 10, Some(class));
        let odd = builder.node("mystery_declaration", None, 11, source.len(), Some(root));
        builder.node("identifier", None, 11, 14, Some(odd));
        let unit = mirror_unit(builder.build());
        assert_eq!(unit.unsupported_nodes(), 1);
        assert_eq!(unit.find_all(NodeKind::ClassDecl).len(), 1);
    }
}
