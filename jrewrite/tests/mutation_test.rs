//! Editing the mutable tree: actions, dirty propagation and refused edits.
#![allow(clippy::unwrap_used)]

use jrewrite::save::{save, SaveOutcome};
use jrewrite::tree::{
    Action, CompilationUnit, Field, LiteralValue, Modifier, MutationError, NodeData, NodeKind,
    TreeKind,
};

const SOURCE: &str = "class Calc {\n    int add(int a, int b) {\n        log(a);\n        return a + b;\n    }\n\n    int sub(int a, int b) {\n        return a - b;\n    }\n}\n";

fn parse() -> CompilationUnit {
    CompilationUnit::parse(SOURCE).unwrap()
}

fn method(unit: &CompilationUnit, name: &str) -> jrewrite::tree::NodeId {
    unit.find_all(NodeKind::MethodDecl)
        .into_iter()
        .find(|&m| unit.data(m).and_then(NodeData::name) == Some(name))
        .unwrap()
}

#[test]
fn test_same_value_setters_are_no_ops() {
    let mut unit = parse();
    let add = method(&unit, "add");
    let binary = unit.find_all(NodeKind::Binary)[0];
    unit.edit(add).unwrap().set_name("add").unwrap();
    unit.edit(binary)
        .unwrap()
        .set_operator(TreeKind::Plus)
        .unwrap();
    for id in unit.descendants(unit.root()) {
        assert_eq!(unit.action(id), Some(Action::NoChange));
        assert!(!unit.is_dirty(id));
    }
    assert_eq!(save(&mut unit).0, SaveOutcome::Verbatim);
}

#[test]
fn test_dirty_walks_up_and_leaves_siblings() {
    let mut unit = parse();
    let add = method(&unit, "add");
    let sub = method(&unit, "sub");
    let binary = unit.find_all(NodeKind::Binary)[0];
    unit.edit(binary)
        .unwrap()
        .set_operator(TreeKind::Multiply)
        .unwrap();

    assert_eq!(unit.action(binary), Some(Action::Change));
    for ancestor in unit.ancestors(binary).collect::<Vec<_>>() {
        assert!(unit.is_dirty(ancestor));
        assert_eq!(unit.action(ancestor), Some(Action::NoChange));
    }
    assert!(unit.is_dirty(add));
    assert!(!unit.is_dirty(sub));
    let log = unit.find_all(NodeKind::ExpressionStmt)[0];
    assert!(!unit.is_dirty(log));

    let (outcome, text) = save(&mut unit);
    assert_eq!(outcome, SaveOutcome::Rendered);
    assert_eq!(text, SOURCE.replace("a + b", "a * b"));
}

#[test]
fn test_refused_edit_leaves_node_untouched() {
    let mut unit = parse();
    let binary = unit.find_all(NodeKind::Binary)[0];
    let err = unit
        .edit(binary)
        .unwrap()
        .set_operator(TreeKind::LogicalComplement)
        .unwrap_err();
    assert!(matches!(err, MutationError::KindNotSupported { field: "operator", .. }));
    assert_eq!(
        unit.data(binary),
        Some(&NodeData::Binary {
            operator: TreeKind::Plus,
            left: unit.children(binary)[0],
            right: unit.children(binary)[1],
        })
    );
    assert_eq!(unit.action(binary), Some(Action::NoChange));
    assert!(!unit.is_dirty(unit.root()));

    let ret = unit.find_all(NodeKind::Return)[0];
    let err = unit.edit(ret).unwrap().set_name("x").unwrap_err();
    assert!(matches!(err, MutationError::NoSuchField { .. }));
}

#[test]
fn test_attached_node_cannot_be_reused() {
    let mut unit = parse();
    let idents = unit.find_all(NodeKind::Ident);
    let binary = unit.find_all(NodeKind::Binary)[0];
    let err = unit
        .edit(binary)
        .unwrap()
        .set_child(Field::Left, Some(idents[0]))
        .unwrap_err();
    assert!(matches!(err, MutationError::AlreadyAttached { .. }));

    let copy = unit.deep_clone(idents[0]).unwrap();
    unit.edit(binary)
        .unwrap()
        .set_child(Field::Left, Some(copy))
        .unwrap();
    assert_eq!(unit.parent(copy), Some(binary));
}

#[test]
fn test_cycle_is_refused() {
    let mut unit = parse();
    let x = unit.ident("x").unwrap();
    let inner = unit.parens(x).unwrap();
    let outer = unit.parens(inner).unwrap();
    let err = unit
        .edit(inner)
        .unwrap()
        .set_child(Field::Expression, Some(outer))
        .unwrap_err();
    assert_eq!(err, MutationError::Cycle { child: outer, parent: inner });
    assert_eq!(unit.parent(x), Some(inner));

    let block = unit.find_all(NodeKind::Block)[0];
    let stmt = unit.find_all(NodeKind::ExpressionStmt)[0];
    let err = unit
        .edit(stmt)
        .unwrap()
        .set_child(Field::Expression, Some(block))
        .unwrap_err();
    assert!(matches!(err, MutationError::InvalidChild { found: NodeKind::Block, .. }));
    assert_eq!(unit.action(stmt), Some(Action::NoChange));
}

#[test]
fn test_synthetic_statement_is_rendered_in_place() {
    let mut unit = parse();
    let sub = method(&unit, "sub");
    let block = unit.children(sub)
        .into_iter()
        .find(|&c| unit.kind(c) == Some(NodeKind::Block))
        .unwrap();
    let a = unit.ident("a").unwrap();
    let call = unit.method_invocation(None, "log", vec![a]).unwrap();
    let stmt = unit.expression_stmt(call).unwrap();
    assert_eq!(unit.action(stmt), Some(Action::Change));
    unit.edit(block)
        .unwrap()
        .insert_child(Field::Statements, 0, stmt)
        .unwrap();

    let (_, text) = save(&mut unit);
    assert_eq!(
        text,
        SOURCE.replace(
            "        return a - b;",
            "        log(a);\n        return a - b;"
        )
    );
}

#[test]
fn test_literal_and_modifier_edits() {
    let mut unit = CompilationUnit::parse("class A {\n    private int limit = 10;\n}\n").unwrap();
    let literal = unit.find_all(NodeKind::Literal)[0];
    unit.edit(literal)
        .unwrap()
        .set_literal(TreeKind::LongLiteral, Some(LiteralValue::Long(20)))
        .unwrap();
    assert_eq!(unit.preview(literal), "20L");

    let modifiers = unit.find_all(NodeKind::Modifiers)[0];
    unit.edit(modifiers)
        .unwrap()
        .add_modifier(Modifier::Final)
        .unwrap();
    let (_, text) = save(&mut unit);
    assert_eq!(text, "class A {\n    private final int limit = 20L;\n}\n");
}

#[test]
fn test_ignore_is_sticky() {
    let mut unit = parse();
    let stmt = unit.find_all(NodeKind::ExpressionStmt)[0];
    unit.set_ignored(stmt).unwrap();
    let call = unit.children(stmt)[0];
    unit.edit(call).unwrap().set_name("trace").unwrap();
    assert_eq!(unit.action(stmt), Some(Action::Ignore));

    let (_, text) = save(&mut unit);
    assert_eq!(text, SOURCE.replace("        log(a);\n", ""));
}
