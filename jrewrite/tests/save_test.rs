//! Saving edited units: suppression, import removal and layout.
#![allow(clippy::unwrap_used)]

use jrewrite::save::{save, save_to_path, save_to_writer, SaveOutcome};
use jrewrite::style::StyleOptions;
use jrewrite::tree::{CompilationUnit, Field, NodeKind};
use tempfile::TempDir;

const FILE: &str = "/*\n * Licensed under the Apache License.\n */\npackage org.acme;\n\nimport java.util.List;\nimport java.util.Map;\nimport org.acme.internal.Helper;\n\n/** Entry point. */\npublic class Main {\n    public static void main(String[] args) {\n        Helper.run(args);\n    }\n}\n";

fn parse(source: &str) -> CompilationUnit {
    CompilationUnit::parse(source).unwrap()
}

#[test]
fn test_removing_an_import_keeps_the_sections() {
    let mut unit = parse(FILE);
    let helper = unit.find_all(NodeKind::Import)[2];
    unit.set_ignored(helper).unwrap();
    let (outcome, text) = save(&mut unit);
    assert_eq!(outcome, SaveOutcome::Rendered);
    assert_eq!(text, FILE.replace("import org.acme.internal.Helper;\n", ""));
    assert!(text.contains("import java.util.List;\nimport java.util.Map;\n\n/** Entry point. */"));
}

#[test]
fn test_removing_every_import() {
    let mut unit = parse(FILE);
    for import in unit.find_all(NodeKind::Import) {
        unit.set_ignored(import).unwrap();
    }
    let (_, text) = save(&mut unit);
    assert!(!text.contains("import"));
    assert!(text.starts_with("/*\n * Licensed under the Apache License.\n */\npackage org.acme;\n\n"));
    assert!(text.ends_with("public class Main {\n    public static void main(String[] args) {\n        Helper.run(args);\n    }\n}\n"));
}

#[test]
fn test_ignored_type_suppresses_everything() {
    let mut unit = parse(FILE);
    let class = unit.find_all(NodeKind::ClassDecl)[0];
    unit.set_ignored(class).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out").join("Main.java");
    assert_eq!(save_to_path(&mut unit, &path).unwrap(), SaveOutcome::Suppressed);
    assert!(!path.exists());

    let mut sink = Vec::new();
    assert_eq!(
        save_to_writer(&mut unit, &mut sink).unwrap(),
        SaveOutcome::Suppressed
    );
    assert!(sink.is_empty());
}

#[test]
fn test_second_type_ignored_still_suppresses() {
    let mut unit = parse("class A {}\n\nclass B {}\n");
    let b = unit.find_all(NodeKind::ClassDecl)[1];
    unit.set_ignored(b).unwrap();
    assert_eq!(save(&mut unit), (SaveOutcome::Suppressed, String::new()));
}

#[test]
fn test_module_directive_removed() {
    let mut unit = parse("module org.acme {\n    requires java.base;\n    exports org.acme;\n}\n");
    let requires = unit.find_all(NodeKind::Requires)[0];
    unit.set_ignored(requires).unwrap();
    let (outcome, text) = save(&mut unit);
    assert_eq!(outcome, SaveOutcome::Rendered);
    assert_eq!(text, "module org.acme {\n    exports org.acme;\n}\n");
}

#[test]
fn test_ignored_module_alone_is_omitted() {
    let mut unit = parse("module org.acme {\n    requires java.base;\n}\n");
    let module = unit.find_all(NodeKind::Module)[0];
    unit.set_ignored(module).unwrap();
    assert_eq!(save(&mut unit), (SaveOutcome::Rendered, String::new()));
}

#[test]
fn test_leading_comment_dropped_on_request() {
    let mut unit = parse(FILE);
    unit.set_options(
        StyleOptions::builder()
            .preserve_leading_comment(false)
            .build()
            .unwrap(),
    );
    let map = unit.find_all(NodeKind::Import)[1];
    unit.set_ignored(map).unwrap();
    let (_, text) = save(&mut unit);
    assert!(text.starts_with("package org.acme;\n\nimport java.util.List;\nimport org.acme.internal.Helper;\n"));
    assert!(!text.contains("Licensed"));
}

#[test]
fn test_saved_file_on_disk() {
    let mut unit = parse(FILE);
    let call = unit.find_all(NodeKind::MethodInvocation)[0];
    unit.edit(call).unwrap().set_name("start").unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("org/acme/Main.java");
    assert_eq!(save_to_path(&mut unit, &path).unwrap(), SaveOutcome::Rendered);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        FILE.replace("Helper.run(args)", "Helper.start(args)")
    );
}

const CRLF: &str = "package p;\r\n\r\nimport a.B;\r\nimport a.C;\r\n\r\nclass A {\r\n  void m() {\r\n    a();\r\n    b();\r\n  }\r\n}\r\n";

fn only_crlf(text: &str) -> bool {
    !text.replace("\r\n", "").contains(['\r', '\n'])
}

#[test]
fn test_edited_crlf_file_keeps_crlf() {
    let mut unit = parse(CRLF);
    let call = unit.find_all(NodeKind::MethodInvocation)[0];
    unit.edit(call).unwrap().set_name("z").unwrap();
    let (outcome, text) = save(&mut unit);
    assert_eq!(outcome, SaveOutcome::Rendered);
    assert_eq!(text, CRLF.replace("a();", "z();"));
}

#[test]
fn test_restructured_crlf_file_keeps_crlf() {
    let mut unit = parse(CRLF);
    let import = unit.find_all(NodeKind::Import)[0];
    unit.set_ignored(import).unwrap();
    let block = unit.find_all(NodeKind::Block)[0];
    let statements = unit.children(block);
    unit.edit(block)
        .unwrap()
        .set_children(Field::Statements, vec![statements[1], statements[0]])
        .unwrap();

    let (_, text) = save(&mut unit);
    assert!(only_crlf(&text), "{text:?}");
    assert!(text.starts_with("package p;\r\n\r\nimport a.C;\r\n\r\nclass A {\r\n"));
    assert!(text.find("b();").unwrap() < text.find("a();").unwrap());
    assert!(text.ends_with("}\r\n"));
}
