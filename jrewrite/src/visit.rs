//! Callback-driven traversal of the mutable tree.
//!
//! Edits are expressed as callbacks keyed by node kind. [`traverse`] walks
//! the unit pre-order and hands each node to the callbacks registered for
//! its kind, then to the catch-all ones. Children are read only after a
//! node's callbacks ran, so replacements made by a callback are visited
//! and removed children are not.

use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::tree::{CompilationUnit, NodeId, NodeKind};

/// A callback run on one node. It may edit anything in the unit.
pub type Callback = Box<dyn FnMut(&mut CompilationUnit, NodeId) -> anyhow::Result<()>>;

/// Callbacks keyed by node kind, plus callbacks for every node.
#[derive(Default)]
pub struct CallbackTable {
    by_kind: FxHashMap<NodeKind, Vec<Callback>>,
    any: Vec<Callback>,
}

impl CallbackTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for nodes of `kind`. Callbacks for one kind run
    /// in registration order.
    pub fn on<F>(&mut self, kind: NodeKind, callback: F) -> &mut Self
    where
        F: FnMut(&mut CompilationUnit, NodeId) -> anyhow::Result<()> + 'static,
    {
        self.by_kind.entry(kind).or_default().push(Box::new(callback));
        self
    }

    /// Registers `callback` for every node, after the kind-specific ones.
    pub fn on_any<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnMut(&mut CompilationUnit, NodeId) -> anyhow::Result<()> + 'static,
    {
        self.any.push(Box::new(callback));
        self
    }

    /// Moves every callback of `other` into this table, after the existing
    /// ones.
    pub fn extend(&mut self, other: Self) {
        for (kind, callbacks) in other.by_kind {
            self.by_kind.entry(kind).or_default().extend(callbacks);
        }
        self.any.extend(other.any);
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum::<usize>() + self.any.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn run(
        &mut self,
        unit: &mut CompilationUnit,
        id: NodeId,
        kind: NodeKind,
        report: &mut TraversalReport,
    ) {
        let specific = self.by_kind.get_mut(&kind).into_iter().flatten();
        for callback in specific.chain(self.any.iter_mut()) {
            if let Err(err) = callback(unit, id) {
                warn!(node = %id, %kind, error = %err, "callback failed");
                report.errors.push(CallbackError {
                    kind,
                    node: id,
                    message: format!("{err:#}"),
                });
            }
        }
    }
}

impl std::fmt::Debug for CallbackTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackTable")
            .field("kinds", &self.by_kind.keys().collect::<Vec<_>>())
            .field("any", &self.any.len())
            .finish()
    }
}

/// A callback that returned an error. Traversal went on regardless.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("callback on {kind} {node} failed: {message}")]
pub struct CallbackError {
    /// Kind of the node being visited.
    pub kind: NodeKind,
    /// The node being visited.
    pub node: NodeId,
    /// The callback's error, with its causes.
    pub message: String,
}

/// What a traversal did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TraversalReport {
    /// Nodes handed to the callbacks.
    pub visited: usize,
    /// Callback failures, in visit order.
    pub errors: Vec<CallbackError>,
}

impl TraversalReport {
    /// Whether every callback succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Walks `unit` pre-order from the root and runs `table` on every node.
///
/// Ignored nodes are not visited and a node ignored by its own callbacks is
/// not descended into. Nodes detached by an earlier callback are skipped.
pub fn traverse(unit: &mut CompilationUnit, table: &mut CallbackTable) -> TraversalReport {
    let mut report = TraversalReport::default();
    let root = unit.root();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if id != root && unit.parent(id).is_none() {
            continue;
        }
        let Some(kind) = unit.kind(id) else {
            continue;
        };
        if unit.is_ignored(id) {
            continue;
        }
        report.visited += 1;
        table.run(unit, id, kind, &mut report);
        if unit.is_ignored(id) {
            continue;
        }
        stack.extend(unit.children(id).into_iter().rev());
    }
    debug!(
        visited = report.visited,
        errors = report.errors.len(),
        "traversal finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::save::save;

    fn unit(source: &str) -> CompilationUnit {
        CompilationUnit::parse(source).unwrap()
    }

    #[test]
    fn test_pre_order_with_kind_and_any() {
        let mut unit = unit("class A { void m() { f(); } }");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut table = CallbackTable::new();
        let log = Rc::clone(&seen);
        table.on(NodeKind::MethodDecl, move |unit, id| {
            let name = unit.data(id).and_then(|d| d.name()).unwrap_or_default();
            log.borrow_mut().push(format!("method {name}"));
            Ok(())
        });
        let log = Rc::clone(&seen);
        table.on_any(move |unit, id| {
            if let Some(kind) = unit.kind(id) {
                log.borrow_mut().push(kind.to_string());
            }
            Ok(())
        });
        let report = traverse(&mut unit, &mut table);
        assert!(report.is_clean());
        let seen = seen.borrow();
        let method = seen.iter().position(|s| s == "method m").unwrap();
        assert_eq!(seen[0], NodeKind::CompilationUnit.to_string());
        assert_eq!(seen[method + 1], NodeKind::MethodDecl.to_string());
        assert_eq!(report.visited, unit.descendants(unit.root()).len());
    }

    #[test]
    fn test_errors_are_collected() {
        let mut unit = unit("class A { int x; int y; }");
        let mut table = CallbackTable::new();
        table.on(NodeKind::VariableDeclarator, |unit, id| {
            let name = unit.data(id).and_then(|d| d.name()).unwrap_or_default();
            anyhow::ensure!(name != "x", "refusing {name}");
            unit.edit(id)?.set_name("z")?;
            Ok(())
        });
        let report = traverse(&mut unit, &mut table);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, NodeKind::VariableDeclarator);
        assert_eq!(report.errors[0].message, "refusing x");
        let (_, text) = save(&mut unit);
        assert_eq!(text, "class A { int x; int z; }\n");
    }

    #[test]
    fn test_replaced_children_are_visited() {
        let mut unit = unit("class A { void m() { a(); } }");
        let mut table = CallbackTable::new();
        table.on(NodeKind::Block, |unit, id| {
            let call = unit.method_invocation(None, "b", Vec::new())?;
            let stmt = unit.expression_stmt(call)?;
            unit.edit(id)?
                .set_children(crate::tree::Field::Statements, vec![stmt])?;
            Ok(())
        });
        let names = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&names);
        table.on(NodeKind::MethodInvocation, move |unit, id| {
            let name = unit.data(id).and_then(|d| d.name()).unwrap_or_default();
            log.borrow_mut().push(name.to_owned());
            Ok(())
        });
        traverse(&mut unit, &mut table);
        assert_eq!(*names.borrow(), vec!["b".to_owned()]);
    }

    #[test]
    fn test_ignored_subtree_is_skipped() {
        let mut unit = unit("class A { void m() { a(); } void n() { b(); } }");
        let mut table = CallbackTable::new();
        table.on(NodeKind::MethodDecl, |unit, id| {
            if unit.data(id).and_then(|d| d.name()) == Some("m") {
                unit.set_ignored(id)?;
            }
            Ok(())
        });
        let calls = Rc::new(RefCell::new(0));
        let count = Rc::clone(&calls);
        table.on(NodeKind::MethodInvocation, move |_, _| {
            *count.borrow_mut() += 1;
            Ok(())
        });
        traverse(&mut unit, &mut table);
        assert_eq!(*calls.borrow(), 1);
        let (_, text) = save(&mut unit);
        assert_eq!(text, "class A { void n() { b(); } }\n");
    }

    #[test]
    fn test_extend_merges_tables() {
        let mut first = CallbackTable::new();
        first.on(NodeKind::Ident, |_, _| Ok(()));
        let mut second = CallbackTable::new();
        second.on(NodeKind::Ident, |_, _| Ok(())).on_any(|_, _| Ok(()));
        first.extend(second);
        assert_eq!(first.len(), 3);
        assert!(!first.is_empty());
    }
}
