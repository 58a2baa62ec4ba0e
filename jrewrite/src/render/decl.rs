//! Declarations and the compilation unit.

use crate::cst::{dangling_comments, CstId};
use crate::tree::{Action, ClassKind, Modifier, NodeData, NodeId, NodeKind};

use super::{Renderer, Spacing};

impl Renderer<'_, '_> {
    /// Package, imports, type declarations and module, in that order.
    ///
    /// Comments in front of top-level nodes are carried along unless they
    /// start before `skip_before`, the end of the already copied header.
    pub(crate) fn compilation_unit(&mut self, skip_before: usize) {
        let Some(NodeData::CompilationUnit {
            package,
            imports,
            types,
            module,
        }) = self.unit.data(self.unit.root())
        else {
            return;
        };

        if let Some(package) = self.present(*package) {
            self.item(package, skip_before);
            self.out.append_line_separator();
            self.out.append_line_separator();
        }

        let imports = self.visible(imports);
        for &import in &imports {
            self.item(import, skip_before);
            self.out.append_line_separator();
        }
        if !imports.is_empty() {
            self.out.append_line_separator();
        }

        for (i, ty) in self.visible(types).into_iter().enumerate() {
            if i > 0 {
                self.out.append_line_separator();
            }
            self.item(ty, skip_before);
            self.out.append_line_separator();
        }

        if let Some(module) = self.present(*module) {
            self.item(module, skip_before);
            self.out.append_line_separator();
        }

        let tree = self.unit.cst();
        for comment in dangling_comments(tree, tree.root()) {
            if comment.start_byte >= skip_before && self.emitted.insert(comment.start_byte) {
                self.comment(&comment);
                self.out.append_line_separator();
            }
        }
    }

    pub(super) fn package(&mut self, annotations: &[NodeId], name: &str) {
        for annotation in self.visible(annotations) {
            self.node(annotation);
            self.out.append_line_separator();
            self.out.append_indent();
        }
        self.out.append("package ");
        self.out.append(name);
        self.out.append_semicolon();
    }

    pub(super) fn import(&mut self, name: &str, is_static: bool, on_demand: bool) {
        self.out.append("import ");
        if is_static {
            self.out.append("static ");
        }
        self.out.append(name);
        if on_demand {
            self.out.append(".*");
        }
        self.out.append_semicolon();
    }

    pub(super) fn module(
        &mut self,
        id: NodeId,
        annotations: &[NodeId],
        open: bool,
        name: &str,
        directives: &[NodeId],
    ) {
        for annotation in self.visible(annotations) {
            self.node(annotation);
            self.out.append_line_separator();
            self.out.append_indent();
        }
        if open {
            self.out.append("open ");
        }
        self.out.append("module ");
        self.out.append(name);
        self.out.append_space();
        let body = self.field_of_original(id, "body");
        self.body(directives, body, Spacing::Statements);
    }

    pub(super) fn directive(&mut self, data: &NodeData) {
        match data {
            NodeData::Requires {
                is_static,
                is_transitive,
                module,
            } => {
                self.out.append("requires ");
                if *is_static {
                    self.out.append("static ");
                }
                if *is_transitive {
                    self.out.append("transitive ");
                }
                self.out.append(module);
            }
            NodeData::Exports { package, modules } => {
                self.qualified_directive("exports", package, "to", modules);
            }
            NodeData::Opens { package, modules } => {
                self.qualified_directive("opens", package, "to", modules);
            }
            NodeData::Uses { service } => {
                self.out.append("uses ");
                self.out.append(service);
            }
            NodeData::Provides {
                service,
                implementations,
            } => self.qualified_directive("provides", service, "with", implementations),
            _ => return,
        }
        self.out.append_semicolon();
    }

    fn qualified_directive<S: AsRef<str>>(
        &mut self,
        keyword: &str,
        subject: &str,
        joiner: &str,
        names: &[S],
    ) {
        self.out.append(keyword);
        self.out.append_space();
        self.out.append(subject);
        if names.is_empty() {
            return;
        }
        self.out.append_space();
        self.out.append_keyword(joiner);
        self.out.append_space();
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.out.append(", ");
            }
            self.out.append(name.as_ref());
        }
    }

    pub(super) fn class_decl(&mut self, id: NodeId, data: &NodeData) {
        let NodeData::ClassDecl {
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
        } = data
        else {
            return;
        };
        self.modifiers_prefix(*modifiers);
        self.out.append(kind.keyword());
        self.out.append_space();
        self.out.append(name);
        self.angle_list(type_parameters);
        if *kind == ClassKind::Record {
            self.arguments(record_components);
        }
        self.clause("extends", extends, ", ");
        self.clause("implements", implements, ", ");
        self.clause("permits", permits, ", ");
        self.out.append_space();

        let body = self.field_of_original(id, "body");
        if *kind == ClassKind::Enum {
            self.enum_body(enum_constants, members, body);
        } else {
            self.body(members, body, Spacing::Members);
        }
    }

    /// Constants separated by commas, then `;` and the members.
    fn enum_body(&mut self, constants: &[NodeId], members: &[NodeId], body: Option<CstId>) {
        let tree = self.unit.cst();
        let constants = self.visible(constants);
        let members = self.visible(members);
        let declarations = body.and_then(|b| tree.child_of_kind(b, "enum_body_declarations"));
        let container = if members.is_empty() {
            body
        } else {
            declarations.or(body)
        };
        let dangling = container
            .map(|c| dangling_comments(tree, c))
            .unwrap_or_default();
        if constants.is_empty() && members.is_empty() && dangling.is_empty() {
            self.out.append("{}");
            return;
        }

        self.out.append_open_brace();
        self.out.increase_depth();
        for (i, &constant) in constants.iter().enumerate() {
            self.out.append_line_separator();
            self.leading_comments(constant, 0);
            self.out.append_indent();
            self.node(constant);
            if i + 1 < constants.len() {
                self.out.append_comma();
            } else if !members.is_empty() {
                self.out.append_semicolon();
            }
            self.trailing_comment(constant);
        }
        if !members.is_empty() {
            if constants.is_empty() {
                self.out.append_line_separator();
                self.out.append_indent();
                self.out.append_semicolon();
            }
            self.out.append_line_separator();
            self.items(&members, Spacing::Members);
        }
        self.comments_on_own_lines(&dangling);
        self.out.decrease_depth();
        self.out.append_line_separator();
        self.out.append_indent();
        self.out.append_close_brace();
    }

    pub(super) fn enum_constant(
        &mut self,
        modifiers: Option<NodeId>,
        name: &str,
        arguments: &[NodeId],
        body: Option<NodeId>,
    ) {
        self.modifiers_prefix(modifiers);
        self.out.append(name);
        if !arguments.is_empty() {
            self.arguments(arguments);
        }
        if let Some(body) = self.present(body) {
            self.out.append_space();
            self.node(body);
        }
    }

    pub(super) fn method_decl(&mut self, data: &NodeData) {
        let NodeData::MethodDecl {
            modifiers,
            type_parameters,
            return_type,
            name,
            parameters,
            throws,
            default_value,
            body,
            compact,
        } = data
        else {
            return;
        };
        self.modifiers_prefix(*modifiers);
        if !self.visible(type_parameters).is_empty() {
            self.angle_list(type_parameters);
            self.out.append_space();
        }
        if let Some(return_type) = self.present(*return_type) {
            self.node(return_type);
            self.out.append_space();
        }
        self.out.append(name);
        if !compact {
            self.arguments(parameters);
        }
        self.clause("throws", throws, ", ");
        if let Some(value) = self.present(*default_value) {
            self.out.append(" default ");
            self.node(value);
        }
        match self.present(*body) {
            Some(body) => {
                self.out.append_space();
                self.node(body);
            }
            None => self.out.append_semicolon(),
        }
    }

    pub(super) fn variable_decl(
        &mut self,
        modifiers: Option<NodeId>,
        ty: NodeId,
        declarators: &[NodeId],
    ) {
        self.modifiers_prefix(modifiers);
        self.node(ty);
        self.out.append_space();
        self.comma_list(declarators);
        self.out.append_semicolon();
    }

    pub(super) fn variable_declarator(&mut self, name: &str, dimensions: u8, init: Option<NodeId>) {
        self.out.append(name);
        self.dims(dimensions);
        if let Some(init) = self.present(init) {
            self.out.append(" = ");
            self.node(init);
        }
    }

    pub(super) fn parameter(&mut self, data: &NodeData) {
        let NodeData::Parameter {
            modifiers,
            ty,
            varargs,
            name,
            dimensions,
            init,
        } = data
        else {
            return;
        };
        self.modifiers_prefix(*modifiers);
        if let Some(ty) = self.present(*ty) {
            self.node(ty);
            if *varargs {
                self.out.append("...");
            }
            self.out.append_space();
        }
        self.out.append(name);
        self.dims(*dimensions);
        if let Some(init) = self.present(*init) {
            self.out.append(" = ");
            self.node(init);
        }
    }

    /// Annotations then flags. Annotations of type, method and field
    /// declarations go on their own lines.
    pub(super) fn modifiers(&mut self, id: NodeId, flags: &[Modifier], annotations: &[NodeId]) {
        let own_line = self.annotations_on_own_line(id);
        for annotation in self.visible(annotations) {
            self.node(annotation);
            if own_line {
                self.out.append_line_separator();
                self.out.append_indent();
            } else {
                self.out.append_space();
            }
        }
        for (i, flag) in flags.iter().enumerate() {
            if i > 0 {
                self.out.append_space();
            }
            self.out.append(flag.keyword());
        }
    }

    fn annotations_on_own_line(&self, modifiers: NodeId) -> bool {
        let Some(owner) = self.unit.parent(modifiers) else {
            return false;
        };
        match self.kind(owner) {
            Some(NodeKind::ClassDecl | NodeKind::MethodDecl) => true,
            Some(NodeKind::VariableDecl) => matches!(
                self.unit.parent(owner).and_then(|p| self.kind(p)),
                Some(NodeKind::ClassDecl | NodeKind::ClassBody)
            ),
            _ => false,
        }
    }

    /// Emits a modifiers child and separates it from what follows. Nothing
    /// is written when there is nothing to show.
    pub(super) fn modifiers_prefix(&mut self, modifiers: Option<NodeId>) {
        let Some(id) = self.present(modifiers) else {
            return;
        };
        let Some(NodeData::Modifiers { flags, annotations }) = self.unit.data(id) else {
            return;
        };
        if flags.is_empty() && self.visible(annotations).is_empty() {
            return;
        }
        let copied = self.unit.action(id) == Some(Action::NoChange);
        self.node(id);
        if copied && self.line_break_after(id) {
            self.out.append_line_separator();
            self.out.append_indent();
        } else {
            self.out.append_space_if_needed();
        }
    }

    /// Whether the original text of `id` is followed by a line break.
    fn line_break_after(&self, id: NodeId) -> bool {
        let Some(original) = self.original(id) else {
            return false;
        };
        let end = self.unit.cst().node(original).end_byte;
        self.unit.source()[end..]
            .chars()
            .take_while(|c| c.is_whitespace())
            .any(|c| c == '\n')
    }

    pub(super) fn annotation(&mut self, name: &str, arguments: &[NodeId]) {
        self.out.append_char('@');
        self.out.append(name);
        if !arguments.is_empty() {
            self.arguments(arguments);
        }
    }

    pub(super) fn type_parameter(&mut self, annotations: &[NodeId], name: &str, bounds: &[NodeId]) {
        for annotation in self.visible(annotations) {
            self.node(annotation);
            self.out.append_space();
        }
        self.out.append(name);
        self.clause("extends", bounds, " & ");
    }

    fn field_of_original(&self, id: NodeId, field: &str) -> Option<CstId> {
        self.original(id)
            .and_then(|original| self.unit.cst().child_by_field(original, field))
    }
}
