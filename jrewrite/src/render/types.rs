//! Types and patterns.

use crate::tree::{NodeData, TreeKind};

use super::Renderer;

impl Renderer<'_, '_> {
    pub(super) fn type_or_pattern(&mut self, data: &NodeData) {
        match data {
            NodeData::PrimitiveType { kind } => self.out.append(kind.keyword()),
            NodeData::TypeName { name } => self.out.append(name),
            NodeData::ParameterizedType {
                base,
                type_arguments,
            } => {
                self.node(*base);
                // `Foo<>` keeps its diamond.
                if self.visible(type_arguments).is_empty() {
                    self.out.append("<>");
                } else {
                    self.angle_list(type_arguments);
                }
            }
            NodeData::ArrayType {
                element,
                dimensions,
            } => {
                self.node(*element);
                self.dims(*dimensions);
            }
            NodeData::Wildcard { kind, bound } => {
                self.out.append_char('?');
                let Some(bound) = self.present(*bound) else {
                    return;
                };
                match kind {
                    TreeKind::ExtendsWildcard => self.out.append(" extends "),
                    TreeKind::SuperWildcard => self.out.append(" super "),
                    _ => return,
                }
                self.node(bound);
            }
            NodeData::UnionType { alternatives } => self.list(alternatives, " | "),
            NodeData::IntersectionType { bounds } => self.list(bounds, " & "),
            NodeData::AnnotatedType { annotations, ty } => {
                for annotation in self.visible(annotations) {
                    self.node(annotation);
                    self.out.append_space();
                }
                self.node(*ty);
            }
            NodeData::RecordPattern { ty, components } => {
                self.node(*ty);
                self.arguments(components);
            }
            NodeData::BindingPattern {
                modifiers,
                ty,
                name,
            } => {
                self.modifiers_prefix(*modifiers);
                if let Some(ty) = self.present(*ty) {
                    self.node(ty);
                    self.out.append_space();
                }
                self.out.append(name);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::{CompilationUnit, Field, NodeKind, TreeKind, TypeKind};

    fn unit(source: &str) -> CompilationUnit {
        CompilationUnit::parse(source).unwrap()
    }

    #[test]
    fn test_wildcard_kind_change() {
        let mut unit = unit("class A { List<? extends Number> xs; }");
        let wildcard = unit.find_all(NodeKind::Wildcard)[0];
        unit.edit(wildcard)
            .unwrap()
            .set_wildcard_kind(TreeKind::SuperWildcard)
            .unwrap();
        let decl = unit.find_all(NodeKind::VariableDecl)[0];
        assert_eq!(unit.preview(decl), "List<? super Number> xs;");

        unit.edit(wildcard)
            .unwrap()
            .set_child(Field::Bound, None)
            .unwrap();
        assert_eq!(unit.preview(wildcard), "?");
    }

    #[test]
    fn test_primitive_and_array_types() {
        let mut unit = unit("class A { int x; int[][] grid; }");
        let primitive = unit.find_all(NodeKind::PrimitiveType)[0];
        unit.edit(primitive)
            .unwrap()
            .set_primitive(TypeKind::Long)
            .unwrap();
        let array = unit.find_all(NodeKind::ArrayType)[0];
        unit.edit(array).unwrap().set_dimensions(1).unwrap();
        let decls = unit.find_all(NodeKind::VariableDecl);
        assert_eq!(unit.preview(decls[0]), "long x;");
        assert_eq!(unit.preview(decls[1]), "int[] grid;");
    }

    #[test]
    fn test_synthetic_parameterized_type() {
        let mut unit = unit("class A {}");
        let base = unit.type_name("Map").unwrap();
        let key = unit.type_name("String").unwrap();
        let value = unit.type_name("Integer").unwrap();
        let ty = unit
            .create(crate::tree::NodeData::ParameterizedType {
                base,
                type_arguments: vec![key, value],
            })
            .unwrap();
        assert_eq!(unit.preview(ty), "Map<String, Integer>");
    }

    #[test]
    fn test_binding_pattern_rename() {
        let source = "class A { void m(Object o) { if (o instanceof Point(int x, var y)) {} } }";
        let mut unit = unit(source);
        let bindings = unit.find_all(NodeKind::BindingPattern);
        let y = bindings
            .iter()
            .copied()
            .find(|&b| unit.data(b).and_then(|d| d.name()) == Some("y"))
            .unwrap();
        unit.edit(y).unwrap().set_name("z").unwrap();
        let pattern = unit.find_all(NodeKind::RecordPattern)[0];
        assert_eq!(unit.preview(pattern), "Point(int x, var z)");
    }
}
