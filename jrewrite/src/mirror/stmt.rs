//! Statements.

use super::Mirror;
use crate::cst::CstId;
use crate::tree::{NodeData, NodeId};

impl Mirror<'_> {
    /// Statements of a block, constructor body or switch group. A bare `;`
    /// becomes an empty statement.
    pub(super) fn statements(&mut self, id: CstId) -> Vec<NodeId> {
        let tree = self.tree;
        let mut statements = Vec::new();
        for child in tree.children(id) {
            let node = tree.node(child);
            if !node.is_named && node.kind == ";" {
                statements.push(self.alloc(NodeData::Empty, Some(child)));
            } else if node.is_named && !matches!(node.kind, "switch_label") {
                statements.extend(self.mirror(Some(child)));
            }
        }
        statements
    }

    /// A condition field, without the parentheses the grammar wraps it in.
    fn condition(&mut self, id: CstId, field: &str) -> Option<NodeId> {
        let tree = self.tree;
        let child = tree
            .child_by_field(id, field)
            .or_else(|| tree.child_of_kind(id, "parenthesized_expression"))?;
        if tree.kind(child) == "parenthesized_expression" {
            self.first_named(child)
        } else {
            self.mirror(Some(child))
        }
    }

    pub(super) fn expression_stmt(&mut self, id: CstId) -> Option<NodeData> {
        if self.tree.kind(id) != "explicit_constructor_invocation" {
            return Some(NodeData::ExpressionStmt {
                expression: self.first_named(id)?,
            });
        }
        let tree = self.tree;
        let target = self.mirror_field(id, "object");
        let type_arguments = match tree.child_of_kind(id, "type_arguments") {
            Some(args) => self.mirror_named_children(args),
            None => Vec::new(),
        };
        let name = self.field_text(id, "constructor");
        let arguments = match tree.child_by_field(id, "arguments") {
            Some(args) => self.mirror_named_children(args),
            None => Vec::new(),
        };
        let call = self.alloc_unchanged(NodeData::MethodInvocation {
            target,
            type_arguments,
            name,
            arguments,
        });
        Some(NodeData::ExpressionStmt { expression: call })
    }

    pub(super) fn if_stmt(&mut self, id: CstId) -> Option<NodeData> {
        Some(NodeData::If {
            condition: self.condition(id, "condition")?,
            then_branch: self.mirror_field(id, "consequence")?,
            else_branch: self.mirror_field(id, "alternative"),
        })
    }

    pub(super) fn while_stmt(&mut self, id: CstId) -> Option<NodeData> {
        Some(NodeData::While {
            condition: self.condition(id, "condition")?,
            body: self.mirror_field(id, "body")?,
        })
    }

    pub(super) fn do_while(&mut self, id: CstId) -> Option<NodeData> {
        let body = self.mirror_field(id, "body")?;
        Some(NodeData::DoWhile {
            body,
            condition: self.condition(id, "condition")?,
        })
    }

    pub(super) fn for_stmt(&mut self, id: CstId) -> Option<NodeData> {
        let tree = self.tree;
        let init = self.mirror_all(tree.children_by_field(id, "init"));
        let condition = self.mirror_field(id, "condition");
        let update = self.mirror_all(tree.children_by_field(id, "update"));
        Some(NodeData::For {
            init,
            condition,
            update,
            body: self.mirror_field(id, "body")?,
        })
    }

    pub(super) fn for_each(&mut self, id: CstId) -> Option<NodeData> {
        let modifiers = self.tree.child_of_kind(id, "modifiers");
        let modifiers = self.mirror(modifiers);
        let ty = self.mirror_field(id, "type")?;
        let expression = self.mirror_field(id, "value")?;
        Some(NodeData::ForEach {
            modifiers,
            ty,
            name: self.field_text(id, "name"),
            expression,
            body: self.mirror_field(id, "body")?,
        })
    }

    pub(super) fn try_stmt(&mut self, id: CstId) -> Option<NodeData> {
        let tree = self.tree;
        let mut resources = Vec::new();
        if let Some(spec) = tree.child_by_field(id, "resources") {
            for resource in tree.named_children(spec) {
                let mirrored = if tree.child_by_field(resource, "type").is_some() {
                    self.mirror(Some(resource))
                } else {
                    self.first_named(resource)
                };
                resources.extend(mirrored);
            }
        }
        let body = self.mirror_field(id, "body")?;
        let catch_ids: Vec<CstId> = tree
            .named_children(id)
            .filter(|&c| tree.kind(c) == "catch_clause")
            .collect();
        let catches = self.mirror_all(catch_ids);
        let finally = match tree.child_of_kind(id, "finally_clause") {
            Some(clause) => {
                let block = tree.child_of_kind(clause, "block");
                self.mirror(block)
            }
            None => None,
        };
        Some(NodeData::Try {
            resources,
            body,
            catches,
            finally,
        })
    }

    pub(super) fn catch_clause(&mut self, id: CstId) -> Option<NodeData> {
        let parameter = self.tree.child_of_kind(id, "catch_formal_parameter");
        Some(NodeData::Catch {
            parameter: self.mirror(parameter)?,
            body: self.mirror_field(id, "body")?,
        })
    }

    pub(super) fn switch(&mut self, id: CstId) -> Option<NodeData> {
        let selector = self.condition(id, "condition")?;
        let cases = match self.tree.child_by_field(id, "body") {
            Some(body) => self.mirror_named_children(body),
            None => Vec::new(),
        };
        Some(NodeData::Switch { selector, cases })
    }

    /// A statement group or a rule. Several labels in one group are merged.
    pub(super) fn case(&mut self, id: CstId) -> NodeData {
        let tree = self.tree;
        let rule = tree.kind(id) == "switch_rule";
        let mut labels = Vec::new();
        let mut is_default = false;
        let mut guard = None;
        for label in tree.named_children(id).filter(|&c| tree.kind(c) == "switch_label") {
            is_default |= tree.has_token(label, "default");
            for child in tree.named_children(label) {
                if tree.kind(child) == "guard" {
                    guard = self.first_named(child);
                } else {
                    labels.extend(self.mirror(Some(child)));
                }
            }
        }
        let statements = self.statements(id);
        NodeData::Case {
            labels,
            is_default,
            guard,
            rule,
            statements,
        }
    }

    pub(super) fn labeled(&mut self, id: CstId) -> Option<NodeData> {
        let label = self.label(id)?;
        let body = self.tree.named_children(id).nth(1);
        Some(NodeData::Labeled {
            label,
            body: self.mirror(body)?,
        })
    }

    pub(super) fn synchronized(&mut self, id: CstId) -> Option<NodeData> {
        Some(NodeData::Synchronized {
            lock: self.condition(id, "lock")?,
            body: self.mirror_field(id, "body")?,
        })
    }

    pub(super) fn assert(&mut self, id: CstId) -> Option<NodeData> {
        let tree = self.tree;
        let mut parts = tree.named_children(id);
        let condition = parts.next();
        let detail = parts.next();
        Some(NodeData::Assert {
            condition: self.mirror(condition)?,
            detail: self.mirror(detail),
        })
    }
}
