//! Declarations: the unit, modules, types, members and their parts.

use compact_str::CompactString;

use super::Mirror;
use crate::cst::CstId;
use crate::tree::{ClassKind, Modifier, NodeData, NodeId, NodeKind};

impl Mirror<'_> {
    pub(super) fn compilation_unit(&mut self, id: CstId) -> NodeData {
        let mut package = None;
        let mut imports = Vec::new();
        let mut types = Vec::new();
        let mut module = None;
        let tree = self.tree;
        for child in tree.named_children(id) {
            match NodeKind::from_cst_kind(tree.kind(child)) {
                Some(NodeKind::Package) => package = self.mirror(Some(child)),
                Some(NodeKind::Import) => imports.extend(self.mirror(Some(child))),
                Some(NodeKind::ClassDecl) => types.extend(self.mirror(Some(child))),
                Some(NodeKind::Module) => module = self.mirror(Some(child)),
                _ => self.unsupported(child),
            }
        }
        NodeData::CompilationUnit {
            package,
            imports,
            types,
            module,
        }
    }

    pub(super) fn package(&mut self, id: CstId) -> NodeData {
        let annotations = self.annotations(id);
        let name = self.names(id).into_iter().next().unwrap_or_default();
        NodeData::Package { annotations, name }
    }

    pub(super) fn import(&mut self, id: CstId) -> NodeData {
        NodeData::Import {
            name: self.names(id).into_iter().next().unwrap_or_default(),
            is_static: self.tree.has_token(id, "static"),
            on_demand: self.tree.child_of_kind(id, "asterisk").is_some(),
        }
    }

    pub(super) fn module(&mut self, id: CstId) -> NodeData {
        let annotations = self.annotations(id);
        let directives = match self.tree.child_by_field(id, "body") {
            Some(body) => self.mirror_named_children(body),
            None => Vec::new(),
        };
        NodeData::Module {
            annotations,
            open: self.tree.has_token(id, "open"),
            name: self.field_text(id, "name"),
            directives,
        }
    }

    pub(super) fn requires(&mut self, id: CstId) -> NodeData {
        let tree = self.tree;
        let modifier = |word: &str| {
            tree.named_children(id)
                .any(|c| tree.kind(c) == "requires_modifier" && tree.text(c) == word)
        };
        NodeData::Requires {
            is_static: modifier("static"),
            is_transitive: modifier("transitive"),
            module: self.names(id).into_iter().last().unwrap_or_default(),
        }
    }

    pub(super) fn exports(&mut self, kind: NodeKind, id: CstId) -> NodeData {
        let mut names = self.names(id).into_iter();
        let package = names.next().unwrap_or_default();
        let modules = names.collect();
        if kind == NodeKind::Opens {
            NodeData::Opens { package, modules }
        } else {
            NodeData::Exports { package, modules }
        }
    }

    pub(super) fn provides(&mut self, kind: NodeKind, id: CstId) -> NodeData {
        let mut names = self.names(id).into_iter();
        let service = names.next().unwrap_or_default();
        if kind == NodeKind::Uses {
            NodeData::Uses { service }
        } else {
            NodeData::Provides {
                service,
                implementations: names.collect(),
            }
        }
    }

    pub(super) fn class_decl(&mut self, id: CstId) -> NodeData {
        let tree = self.tree;
        let kind = match tree.kind(id) {
            "interface_declaration" => ClassKind::Interface,
            "enum_declaration" => ClassKind::Enum,
            "record_declaration" => ClassKind::Record,
            "annotation_type_declaration" => ClassKind::Annotation,
            _ => ClassKind::Class,
        };
        let modifiers = self.modifiers_of(id);
        let name = self.field_text(id, "name");
        let type_parameters = self.type_parameters(id);
        let record_components = match tree.child_by_field(id, "parameters") {
            Some(params) => self.mirror_named_children(params),
            None => Vec::new(),
        };

        let extends = if let Some(superclass) = tree.child_by_field(id, "superclass") {
            self.mirror_named_children(superclass)
        } else if let Some(list) = tree.child_of_kind(id, "extends_interfaces") {
            self.mirror_container(list, "type_list")
        } else {
            Vec::new()
        };
        let implements = match tree.child_by_field(id, "interfaces") {
            Some(list) => self.mirror_container(list, "type_list"),
            None => Vec::new(),
        };
        let permits = match tree.child_of_kind(id, "permits") {
            Some(list) => self.mirror_container(list, "type_list"),
            None => Vec::new(),
        };

        let mut enum_constants = Vec::new();
        let mut members = Vec::new();
        if let Some(body) = tree.child_by_field(id, "body") {
            if tree.kind(body) == "enum_body" {
                for child in tree.named_children(body) {
                    match tree.kind(child) {
                        "enum_constant" => enum_constants.extend(self.mirror(Some(child))),
                        "enum_body_declarations" => members = self.members(child),
                        _ => self.unsupported(child),
                    }
                }
            } else {
                members = self.members(body);
            }
        }

        NodeData::ClassDecl {
            modifiers,
            kind,
            name,
            type_parameters,
            record_components,
            extends,
            implements,
            permits,
            enum_constants,
            members,
        }
    }

    /// Members of a class, interface, annotation or enum body.
    fn members(&mut self, body: CstId) -> Vec<NodeId> {
        let tree = self.tree;
        let mut members = Vec::new();
        for child in tree.named_children(body) {
            if tree.kind(child) == "block" {
                // Instance initializer: the initializer and its block share the source range.
                if let Some(block) = self.mirror(Some(child)) {
                    members.push(self.alloc(
                        NodeData::Initializer {
                            is_static: false,
                            body: block,
                        },
                        Some(child),
                    ));
                }
            } else {
                members.extend(self.mirror(Some(child)));
            }
        }
        members
    }

    /// An anonymous class or enum constant body.
    pub(super) fn class_body(&mut self, id: CstId) -> NodeId {
        let members = self.members(id);
        self.alloc(NodeData::ClassBody { members }, Some(id))
    }

    pub(super) fn enum_constant(&mut self, id: CstId) -> NodeData {
        let tree = self.tree;
        let modifiers = self.modifiers_of(id);
        let arguments = match tree.child_by_field(id, "arguments") {
            Some(args) => self.mirror_named_children(args),
            None => Vec::new(),
        };
        let body = tree
            .child_by_field(id, "body")
            .map(|body| self.class_body(body));
        NodeData::EnumConstant {
            modifiers,
            name: self.field_text(id, "name"),
            arguments,
            body,
        }
    }

    pub(super) fn method_decl(&mut self, id: CstId) -> NodeData {
        let tree = self.tree;
        let kind = tree.kind(id);
        let modifiers = self.modifiers_of(id);
        let type_parameters = self.type_parameters(id);
        let return_type = match kind {
            "method_declaration" | "annotation_type_element_declaration" => {
                self.mirror_field(id, "type")
            }
            _ => None,
        };
        let name = self.field_text(id, "name");
        let parameters = match tree.child_by_field(id, "parameters") {
            Some(params) => self.mirror_named_children(params),
            None => Vec::new(),
        };
        let throws = self.mirror_container(id, "throws");
        let default_value = self.mirror_field(id, "value");
        let body = self.mirror_field(id, "body");
        NodeData::MethodDecl {
            modifiers,
            type_parameters,
            return_type,
            name,
            parameters,
            throws,
            default_value,
            body,
            compact: kind == "compact_constructor_declaration",
        }
    }

    pub(super) fn variable_decl(&mut self, id: CstId) -> Option<NodeData> {
        let tree = self.tree;
        let modifiers = self.modifiers_of(id);
        let ty = self.mirror_field(id, "type")?;
        let declarators = self.mirror_all(tree.children_by_field(id, "declarator"));
        Some(NodeData::VariableDecl {
            modifiers,
            ty,
            declarators,
        })
    }

    pub(super) fn variable_declarator(&mut self, id: CstId) -> NodeData {
        let dims = self.tree.child_by_field(id, "dimensions");
        NodeData::VariableDeclarator {
            name: self.field_text(id, "name"),
            dimensions: self.dimensions(dims),
            init: self.mirror_field(id, "value"),
        }
    }

    /// Formal, spread, catch and resource parameters.
    pub(super) fn parameter(&mut self, id: CstId) -> Option<NodeData> {
        let tree = self.tree;
        let modifiers = self.modifiers_of(id);
        match tree.kind(id) {
            "spread_parameter" => {
                let ty = tree.named_children(id).find(|&c| {
                    matches!(NodeKind::from_cst_kind(tree.kind(c)), Some(k) if k.is_type())
                });
                let ty = self.mirror(ty);
                let declarator = tree.child_of_kind(id, "variable_declarator")?;
                let dims = tree.child_by_field(declarator, "dimensions");
                Some(NodeData::Parameter {
                    modifiers,
                    ty,
                    varargs: true,
                    name: self.field_text(declarator, "name"),
                    dimensions: self.dimensions(dims),
                    init: None,
                })
            }
            "catch_formal_parameter" => {
                let ty = tree.child_of_kind(id, "catch_type")?;
                let ty = if tree.named_children(ty).count() == 1 {
                    self.first_named(ty)
                } else {
                    self.mirror(Some(ty))
                };
                let dims = tree.child_by_field(id, "dimensions");
                Some(NodeData::Parameter {
                    modifiers,
                    ty: Some(ty?),
                    varargs: false,
                    name: self.field_text(id, "name"),
                    dimensions: self.dimensions(dims),
                    init: None,
                })
            }
            _ => {
                let ty = self.mirror_field(id, "type");
                let dims = tree.child_by_field(id, "dimensions");
                Some(NodeData::Parameter {
                    modifiers,
                    ty,
                    varargs: false,
                    name: self.field_text(id, "name"),
                    dimensions: self.dimensions(dims),
                    init: self.mirror_field(id, "value"),
                })
            }
        }
    }

    pub(super) fn initializer(&mut self, id: CstId) -> Option<NodeData> {
        let block = self.tree.child_of_kind(id, "block");
        Some(NodeData::Initializer {
            is_static: true,
            body: self.mirror(block)?,
        })
    }

    pub(super) fn modifiers(&mut self, id: CstId) -> NodeData {
        let tree = self.tree;
        let mut flags: Vec<Modifier> = tree
            .children(id)
            .filter(|&c| !tree.node(c).is_named)
            .filter_map(|c| Modifier::from_keyword(tree.kind(c)))
            .collect();
        flags.sort_unstable();
        NodeData::Modifiers {
            flags,
            annotations: self.mirror_named_children(id),
        }
    }

    pub(super) fn annotation(&mut self, id: CstId) -> NodeData {
        let arguments = match self.tree.child_by_field(id, "arguments") {
            Some(args) => self.mirror_named_children(args),
            None => Vec::new(),
        };
        NodeData::Annotation {
            name: self.field_text(id, "name"),
            arguments,
        }
    }

    pub(super) fn element_value_pair(&mut self, id: CstId) -> Option<NodeData> {
        Some(NodeData::ElementValuePair {
            key: self.field_text(id, "key"),
            value: self.mirror_field(id, "value")?,
        })
    }

    pub(super) fn type_parameter(&mut self, id: CstId) -> NodeData {
        let annotations = self.annotations(id);
        let name = self
            .tree
            .child_of_kind(id, "type_identifier")
            .or_else(|| self.tree.child_of_kind(id, "identifier"))
            .map(|c| self.text(c))
            .unwrap_or_default();
        let bounds = self.mirror_container(id, "type_bound");
        NodeData::TypeParameter {
            annotations,
            name,
            bounds,
        }
    }

    fn modifiers_of(&mut self, id: CstId) -> Option<NodeId> {
        let modifiers = self.tree.child_of_kind(id, "modifiers");
        self.mirror(modifiers)
    }

    fn type_parameters(&mut self, id: CstId) -> Vec<NodeId> {
        self.mirror_container(id, "type_parameters")
    }

    /// Annotations listed directly under `id`.
    pub(super) fn annotations(&mut self, id: CstId) -> Vec<NodeId> {
        let tree = self.tree;
        let annotations: Vec<CstId> = tree
            .named_children(id)
            .filter(|&c| matches!(tree.kind(c), "annotation" | "marker_annotation"))
            .collect();
        self.mirror_all(annotations)
    }

    pub(super) fn label(&self, id: CstId) -> Option<CompactString> {
        self.tree
            .child_of_kind(id, "identifier")
            .map(|c| self.text(c))
    }
}
