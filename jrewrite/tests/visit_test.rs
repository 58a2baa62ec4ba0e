//! Callback traversal driving real edits.
#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::rc::Rc;

use jrewrite::save::{save, SaveOutcome};
use jrewrite::transforms::{callback_table, from_config};
use jrewrite::tree::{CompilationUnit, NodeData, NodeKind, TreeKind};
use jrewrite::config::TransformsConfig;
use jrewrite::visit::{traverse, CallbackTable};

const SOURCE: &str = "package p;\n\nimport java.util.List;\nimport org.slf4j.Logger;\n\npublic class Counter {\n    private int count;\n\n    // Bumps the counter.\n    public void bump(int by) {\n        count = count + by;\n        LOG.debug(\"bumped\");\n    }\n\n    @Deprecated\n    public void reset() {\n        count = 0;\n    }\n}\n";

#[test]
fn test_counting_callbacks() {
    let mut unit = CompilationUnit::parse(SOURCE).unwrap();
    let kinds = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&kinds);
    let mut table = CallbackTable::new();
    table.on(NodeKind::MethodDecl, move |unit, id| {
        seen.borrow_mut()
            .push(unit.data(id).and_then(NodeData::name).unwrap_or_default().to_owned());
        Ok(())
    });
    let report = traverse(&mut unit, &mut table);
    assert!(report.is_clean());
    assert_eq!(*kinds.borrow(), vec!["bump", "reset"]);
    assert_eq!(report.visited, unit.descendants(unit.root()).len());
    assert_eq!(save(&mut unit).0, SaveOutcome::Verbatim);
}

#[test]
fn test_operator_rewrite_callback() {
    let mut unit = CompilationUnit::parse(SOURCE).unwrap();
    let mut table = CallbackTable::new();
    table.on(NodeKind::Binary, |unit, id| {
        unit.edit(id)?.set_operator(TreeKind::Minus)?;
        Ok(())
    });
    traverse(&mut unit, &mut table);
    let (_, text) = save(&mut unit);
    assert_eq!(text, SOURCE.replace("count + by", "count - by"));
}

#[test]
fn test_failing_callback_is_reported() {
    let mut unit = CompilationUnit::parse(SOURCE).unwrap();
    let mut table = CallbackTable::new();
    table.on(NodeKind::Return, |_, _| anyhow::bail!("never called"));
    table.on(NodeKind::Literal, |unit, id| {
        // Literals have no name.
        unit.edit(id)?.set_name("x")?;
        Ok(())
    });
    let report = traverse(&mut unit, &mut table);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.iter().all(|e| e.kind == NodeKind::Literal));
    assert!(report.errors[0].message.contains("no field `name`"));
}

#[test]
fn test_all_transforms_in_one_pass() {
    let mut config = TransformsConfig::default();
    config.rename.insert("count".into(), "total".into());
    config.remove_imports.push("org.slf4j.*".into());
    config.ignore_annotated.push("Deprecated".into());
    let transforms = from_config(&config).unwrap();
    let mut table = callback_table(&transforms);

    let mut unit = CompilationUnit::parse(SOURCE).unwrap();
    let report = traverse(&mut unit, &mut table);
    assert!(report.is_clean(), "{:?}", report.errors);
    let (outcome, text) = save(&mut unit);
    assert_eq!(outcome, SaveOutcome::Rendered);
    assert_eq!(
        text,
        "package p;\n\nimport java.util.List;\n\npublic class Counter {\n    private int total;\n\n    // Bumps the counter.\n    public void bump(int by) {\n        total = total + by;\n        LOG.debug(\"bumped\");\n    }\n}\n"
    );
}
