//! Expressions.

use crate::tree::{NodeData, NodeId};

use super::Renderer;

impl Renderer<'_, '_> {
    pub(super) fn expression(&mut self, data: &NodeData) {
        match data {
            NodeData::Ident { name } => self.out.append(name),
            NodeData::FieldAccess { target, name } => {
                self.node(*target);
                self.out.append_dot();
                self.out.append(name);
            }
            NodeData::MethodInvocation {
                target,
                type_arguments,
                name,
                arguments,
            } => {
                if let Some(target) = self.present(*target) {
                    self.node(target);
                    self.out.append_dot();
                }
                self.angle_list(type_arguments);
                self.out.append(name);
                self.arguments(arguments);
            }
            NodeData::NewClass {
                outer,
                type_arguments,
                class_type,
                arguments,
                body,
            } => self.new_class(*outer, type_arguments, *class_type, arguments, *body),
            NodeData::NewArray {
                element_type,
                dimensions,
                extra_dims,
                initializer,
            } => self.new_array(*element_type, dimensions, *extra_dims, *initializer),
            NodeData::ArrayInit { elements } => {
                if self.visible(elements).is_empty() {
                    self.out.append("{}");
                } else {
                    self.out.append_open_brace();
                    self.comma_list(elements);
                    self.out.append_close_brace();
                }
            }
            NodeData::Literal { kind, value } => self.out.append_literal(*kind, value.as_ref()),
            NodeData::Binary {
                operator,
                left,
                right,
            } => self.infix(*left, operator.symbol(), *right),
            NodeData::Unary { operator, operand } => {
                if operator.is_postfix() {
                    self.node(*operand);
                    self.out.append(operator.symbol());
                } else {
                    self.out.append(operator.symbol());
                    self.node(*operand);
                }
            }
            NodeData::Assignment { target, value } => self.infix(*target, "=", *value),
            NodeData::CompoundAssignment {
                operator,
                target,
                value,
            } => self.infix(*target, operator.symbol(), *value),
            NodeData::Conditional {
                condition,
                then_value,
                else_value,
            } => {
                self.node(*condition);
                self.out.append(" ? ");
                self.node(*then_value);
                self.out.append(" : ");
                self.node(*else_value);
            }
            NodeData::Parens { expression } => {
                self.out.append_open_paren();
                self.node(*expression);
                self.out.append_close_paren();
            }
            NodeData::TypeCast { types, expression } => {
                self.out.append_open_paren();
                self.list(types, " & ");
                self.out.append(") ");
                self.node(*expression);
            }
            NodeData::InstanceOf {
                expression,
                target,
                binding,
                is_final,
            } => {
                self.node(*expression);
                self.out.append(" instanceof ");
                if *is_final {
                    self.out.append("final ");
                }
                self.node(*target);
                if let Some(binding) = binding {
                    self.out.append_space();
                    self.out.append(binding);
                }
            }
            NodeData::ArrayAccess { array, index } => {
                self.node(*array);
                self.out.append_open_bracket();
                self.node(*index);
                self.out.append_close_bracket();
            }
            NodeData::Lambda {
                parameters,
                parenthesized,
                body,
            } => {
                if *parenthesized || self.visible(parameters).len() != 1 {
                    self.arguments(parameters);
                } else {
                    self.comma_list(parameters);
                }
                self.out.append(" -> ");
                self.node(*body);
            }
            NodeData::MemberReference {
                target,
                type_arguments,
                name,
            } => {
                self.node(*target);
                self.out.append("::");
                self.angle_list(type_arguments);
                self.out.append(name);
            }
            _ => {}
        }
    }

    fn infix(&mut self, left: NodeId, operator: &str, right: NodeId) {
        self.node(left);
        self.out.append_space();
        self.out.append(operator);
        self.out.append_space();
        self.node(right);
    }

    fn new_class(
        &mut self,
        outer: Option<NodeId>,
        type_arguments: &[NodeId],
        class_type: NodeId,
        arguments: &[NodeId],
        body: Option<NodeId>,
    ) {
        if let Some(outer) = self.present(outer) {
            self.node(outer);
            self.out.append_dot();
        }
        self.out.append("new ");
        if !self.visible(type_arguments).is_empty() {
            self.angle_list(type_arguments);
            self.out.append_space();
        }
        self.node(class_type);
        self.arguments(arguments);
        if let Some(body) = self.present(body) {
            self.out.append_space();
            self.node(body);
        }
    }

    /// Without an element type only the initializer is written.
    fn new_array(
        &mut self,
        element_type: Option<NodeId>,
        dimensions: &[NodeId],
        extra_dims: u8,
        initializer: Option<NodeId>,
    ) {
        if let Some(element_type) = self.present(element_type) {
            self.out.append("new ");
            self.node(element_type);
            for dimension in self.visible(dimensions) {
                self.out.append_open_bracket();
                self.node(dimension);
                self.out.append_close_bracket();
            }
            self.dims(extra_dims);
            if self.present(initializer).is_some() {
                self.out.append_space();
            }
        }
        if let Some(initializer) = self.present(initializer) {
            self.node(initializer);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::{CompilationUnit, Field, LiteralValue, NodeData, NodeKind, TreeKind};

    fn unit(source: &str) -> CompilationUnit {
        CompilationUnit::parse(source).unwrap()
    }

    #[test]
    fn test_synthetic_expressions() {
        let mut unit = unit("class A {}");
        let a = unit.ident("a").unwrap();
        let b = unit.ident("b").unwrap();
        let sum = unit.binary(TreeKind::Plus, a, b).unwrap();
        let parens = unit.parens(sum).unwrap();
        let neg = unit.unary(TreeKind::UnaryMinus, parens).unwrap();
        assert_eq!(unit.preview(neg), "-(a + b)");

        let i = unit.ident("i").unwrap();
        let inc = unit.unary(TreeKind::PostfixIncrement, i).unwrap();
        assert_eq!(unit.preview(inc), "i++");

        let list = unit.ident("list").unwrap();
        let text = unit.literal(LiteralValue::String("a\"b".into())).unwrap();
        let call = unit.method_invocation(Some(list), "add", vec![text]).unwrap();
        assert_eq!(unit.preview(call), "list.add(\"a\\\"b\")");

        let ty = unit.type_name("StringBuilder").unwrap();
        let cap = unit.literal(LiteralValue::Int(16)).unwrap();
        let new = unit.new_class(ty, vec![cap]).unwrap();
        assert_eq!(unit.preview(new), "new StringBuilder(16)");
    }

    #[test]
    fn test_compound_assignment_operator_change() {
        let mut unit = unit("class A { void m() { total += delta; } }");
        let assign = unit.find_all(NodeKind::CompoundAssignment)[0];
        unit.edit(assign)
            .unwrap()
            .set_operator(TreeKind::MinusAssignment)
            .unwrap();
        let stmt = unit.find_all(NodeKind::ExpressionStmt)[0];
        assert_eq!(unit.preview(stmt), "total -= delta;");
    }

    #[test]
    fn test_lambda_and_method_reference() {
        let mut unit = unit("class A { Object f = (x, y) -> x; Object g = String::valueOf; }");
        let lambda = unit.find_all(NodeKind::Lambda)[0];
        let z = unit.ident("z").unwrap();
        unit.edit(lambda)
            .unwrap()
            .set_child(Field::Body, Some(z))
            .unwrap();
        assert_eq!(unit.preview(lambda), "(x, y) -> z");
        let reference = unit.find_all(NodeKind::MemberReference)[0];
        unit.edit(reference).unwrap().set_name("format").unwrap();
        assert_eq!(unit.preview(reference), "String::format");
    }

    #[test]
    fn test_new_array_forms() {
        let mut unit = unit("class A { int[] a = {1, 2}; int[][] b = new int[3][]; }");
        let inits = unit.find_all(NodeKind::ArrayInit);
        let three = unit.literal(LiteralValue::Int(3)).unwrap();
        unit.edit(inits[0])
            .unwrap()
            .push_child(Field::Elements, three)
            .unwrap();
        assert_eq!(unit.preview(inits[0]), "{1, 2, 3}");

        let array = unit.find_all(NodeKind::NewArray)[0];
        let four = unit.literal(LiteralValue::Int(4)).unwrap();
        let old = unit.children(array)[1];
        unit.edit(array)
            .unwrap()
            .set_children(Field::Dimensions, vec![four])
            .unwrap();
        assert_eq!(unit.parent(old), None);
        assert_eq!(unit.preview(array), "new int[4][]");
    }

    #[test]
    fn test_instance_of_pattern() {
        let mut unit = unit("class A { boolean t = o instanceof String s; }");
        let test = unit.find_all(NodeKind::InstanceOf)[0];
        let other = unit.ident("other").unwrap();
        unit.edit(test)
            .unwrap()
            .set_child(Field::Expression, Some(other))
            .unwrap();
        let rendered = unit.preview(test);
        assert!(rendered.starts_with("other instanceof String"), "{rendered}");
        assert!(matches!(
            unit.data(test),
            Some(NodeData::InstanceOf { .. })
        ));
    }
}
