//! Statements.

use crate::tree::{NodeData, NodeId, NodeKind};

use super::{Renderer, Spacing};

impl Renderer<'_, '_> {
    pub(super) fn statement(&mut self, id: NodeId, data: &NodeData) {
        match data {
            NodeData::ExpressionStmt { expression } => {
                self.node(*expression);
                self.out.append_semicolon();
            }
            NodeData::If {
                condition,
                then_branch,
                else_branch,
            } => self.if_stmt(*condition, *then_branch, *else_branch),
            NodeData::While { condition, body } => {
                self.out.append("while ");
                self.parenthesized(*condition);
                self.out.append_space();
                self.node(*body);
            }
            NodeData::DoWhile { body, condition } => {
                self.out.append("do ");
                self.node(*body);
                self.out.append(" while ");
                self.parenthesized(*condition);
                self.out.append_semicolon();
            }
            NodeData::For {
                init,
                condition,
                update,
                body,
            } => self.for_stmt(init, *condition, update, *body),
            NodeData::ForEach {
                modifiers,
                ty,
                name,
                expression,
                body,
            } => {
                self.out.append("for (");
                self.modifiers_prefix(*modifiers);
                self.node(*ty);
                self.out.append_space();
                self.out.append(name);
                self.out.append(" : ");
                self.node(*expression);
                self.out.append(") ");
                self.node(*body);
            }
            NodeData::Return { expression } => self.keyword_stmt("return", *expression),
            NodeData::Throw { expression } => self.keyword_stmt("throw", Some(*expression)),
            NodeData::Yield { value } => self.keyword_stmt("yield", Some(*value)),
            NodeData::Break { label } => self.jump("break", label.as_deref()),
            NodeData::Continue { label } => self.jump("continue", label.as_deref()),
            NodeData::Try {
                resources,
                body,
                catches,
                finally,
            } => self.try_stmt(resources, *body, catches, *finally),
            NodeData::Catch { parameter, body } => {
                self.out.append("catch ");
                self.parenthesized(*parameter);
                self.out.append_space();
                self.node(*body);
            }
            NodeData::Switch { selector, cases } => self.switch(id, *selector, cases),
            NodeData::Case {
                labels,
                is_default,
                guard,
                rule,
                statements,
            } => self.case(labels, *is_default, *guard, *rule, statements),
            NodeData::Labeled { label, body } => {
                self.out.append(label);
                self.out.append(": ");
                self.node(*body);
            }
            NodeData::Synchronized { lock, body } => {
                self.out.append("synchronized ");
                self.parenthesized(*lock);
                self.out.append_space();
                self.node(*body);
            }
            NodeData::Assert { condition, detail } => {
                self.out.append("assert ");
                self.node(*condition);
                if let Some(detail) = self.present(*detail) {
                    self.out.append(" : ");
                    self.node(detail);
                }
                self.out.append_semicolon();
            }
            NodeData::Empty => self.out.append_semicolon(),
            _ => {}
        }
    }

    fn parenthesized(&mut self, id: NodeId) {
        self.out.append_open_paren();
        self.node(id);
        self.out.append_close_paren();
    }

    fn keyword_stmt(&mut self, keyword: &str, expression: Option<NodeId>) {
        self.out.append(keyword);
        if let Some(expression) = self.present(expression) {
            self.out.append_space();
            self.node(expression);
        }
        self.out.append_semicolon();
    }

    fn jump(&mut self, keyword: &str, label: Option<&str>) {
        self.out.append(keyword);
        if let Some(label) = label {
            self.out.append_space();
            self.out.append(label);
        }
        self.out.append_semicolon();
    }

    /// `else` follows a block on the same line and anything else on the next.
    fn if_stmt(&mut self, condition: NodeId, then_branch: NodeId, else_branch: Option<NodeId>) {
        self.out.append("if ");
        self.parenthesized(condition);
        self.out.append_space();
        self.node(then_branch);
        let Some(else_branch) = self.present(else_branch) else {
            return;
        };
        if self.kind(then_branch) == Some(NodeKind::Block) {
            self.out.append_space();
        } else {
            self.out.append_line_separator();
            self.out.append_indent();
        }
        self.out.append("else ");
        self.node(else_branch);
    }

    /// A declaration in the init slot brings its own `;`.
    fn for_stmt(
        &mut self,
        init: &[NodeId],
        condition: Option<NodeId>,
        update: &[NodeId],
        body: NodeId,
    ) {
        self.out.append("for (");
        let init = self.visible(init);
        match init.as_slice() {
            [decl] if self.kind(*decl) == Some(NodeKind::VariableDecl) => self.node(*decl),
            _ => {
                self.comma_list(&init);
                self.out.append_semicolon();
            }
        }
        if let Some(condition) = self.present(condition) {
            self.out.append_space();
            self.node(condition);
        }
        self.out.append_semicolon();
        if !self.visible(update).is_empty() {
            self.out.append_space();
            self.comma_list(update);
        }
        self.out.append(") ");
        self.node(body);
    }

    fn try_stmt(
        &mut self,
        resources: &[NodeId],
        body: NodeId,
        catches: &[NodeId],
        finally: Option<NodeId>,
    ) {
        self.out.append("try ");
        if !self.visible(resources).is_empty() {
            self.out.append_open_paren();
            self.list(resources, "; ");
            self.out.append(") ");
        }
        self.node(body);
        for catch in self.visible(catches) {
            self.out.append_space();
            self.node(catch);
        }
        if let Some(finally) = self.present(finally) {
            self.out.append(" finally ");
            self.node(finally);
        }
    }

    fn switch(&mut self, id: NodeId, selector: NodeId, cases: &[NodeId]) {
        self.out.append("switch ");
        self.parenthesized(selector);
        self.out.append_space();
        let body = self
            .original(id)
            .and_then(|original| self.unit.cst().child_by_field(original, "body"));
        self.body(cases, body, Spacing::Statements);
    }

    /// `case a, b when g -> body` for rules; `case a:` followed by the
    /// statements one level deeper for groups.
    fn case(
        &mut self,
        labels: &[NodeId],
        is_default: bool,
        guard: Option<NodeId>,
        rule: bool,
        statements: &[NodeId],
    ) {
        let labels = self.visible(labels);
        if labels.is_empty() {
            self.out.append("default");
        } else {
            self.out.append("case ");
            self.comma_list(&labels);
            if is_default {
                self.out.append(", default");
            }
        }
        if let Some(guard) = self.present(guard) {
            self.out.append(" when ");
            self.node(guard);
        }
        if rule {
            self.out.append(" -> ");
            self.list(statements, " ");
            return;
        }
        self.out.append_char(':');
        self.out.increase_depth();
        let statements = self.visible(statements);
        self.items(&statements, Spacing::Statements);
        self.out.decrease_depth();
    }
}
