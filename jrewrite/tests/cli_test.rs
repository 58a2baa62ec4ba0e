//! End-to-end runs of the binary.
#![allow(clippy::unwrap_used)]

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn jrewrite() -> Result<Command> {
    let mut cmd = Command::cargo_bin("jrewrite-bin")?;
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    Ok(cmd)
}

fn project() -> Result<TempDir> {
    let temp = TempDir::new()?;
    let src = temp.path().join("src/main/java/acme");
    fs::create_dir_all(&src)?;
    fs::write(
        src.join("Greeter.java"),
        "package acme;\n\nimport java.util.List;\nimport java.util.Map;\n\npublic class Greeter {\n    String greet(String name) {\n        return \"Hello, \" + name;\n    }\n}\n",
    )?;
    fs::write(
        src.join("Generated.java"),
        "package acme;\n\n@Generated\nclass Generated {}\n",
    )?;
    fs::create_dir_all(temp.path().join("target"))?;
    fs::write(temp.path().join("target/Stale.java"), "class Stale {}\n")?;
    Ok(temp)
}

#[test]
fn test_help_mentions_config() -> Result<()> {
    jrewrite()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rewrite"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains(".jrewrite.toml"));
    Ok(())
}

#[test]
fn test_rewrite_single_file_to_stdout() -> Result<()> {
    let temp = project()?;
    let file = temp.path().join("src/main/java/acme/Greeter.java");
    jrewrite()?
        .arg("rewrite")
        .arg(&file)
        .args(["--rename", "name=who"])
        .assert()
        .success()
        .stdout(predicate::str::contains("String greet(String who) {"))
        .stdout(predicate::str::contains("return \"Hello, \" + who;"))
        .stdout(predicate::str::contains("import java.util.Map;"));
    // Stdout mode never touches the input.
    assert!(fs::read_to_string(&file)?.contains("String name"));
    Ok(())
}

#[test]
fn test_rewrite_out_dir() -> Result<()> {
    let temp = project()?;
    let out = temp.path().join("out");
    jrewrite()?
        .arg("rewrite")
        .arg(temp.path().join("src"))
        .arg("--out-dir")
        .arg(&out)
        .args(["--remove-import", "java.util.Map"])
        .args(["--ignore-annotated", "Generated"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rewritten:"))
        .stdout(predicate::str::contains("Suppressed:"));

    let greeter = fs::read_to_string(out.join("main/java/acme/Greeter.java"))?;
    assert_eq!(
        greeter,
        "package acme;\n\nimport java.util.List;\n\npublic class Greeter {\n    String greet(String name) {\n        return \"Hello, \" + name;\n    }\n}\n"
    );
    assert!(!out.join("main/java/acme/Generated.java").exists());
    Ok(())
}

#[test]
fn test_rewrite_in_place_from_config() -> Result<()> {
    let temp = project()?;
    fs::write(
        temp.path().join(".jrewrite.toml"),
        "[jrewrite.transforms]\nrename = { greet = \"welcome\" }\n",
    )?;
    jrewrite()?
        .arg("rewrite")
        .arg(temp.path())
        .arg("--in-place")
        .assert()
        .success();

    let greeter = fs::read_to_string(temp.path().join("src/main/java/acme/Greeter.java"))?;
    assert!(greeter.contains("String welcome(String name) {"));
    // Default exclusions keep build output out of the walk.
    assert_eq!(
        fs::read_to_string(temp.path().join("target/Stale.java"))?,
        "class Stale {}\n"
    );
    Ok(())
}

#[test]
fn test_dry_run_json() -> Result<()> {
    let temp = project()?;
    let output = jrewrite()?
        .arg("rewrite")
        .arg(temp.path())
        .args(["--dry-run", "--json", "--ignore-annotated", "@Generated"])
        .output()?;
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["total_files"], 2);
    assert_eq!(json["suppressed"], 1);
    assert_eq!(json["unchanged"], 1);
    assert_eq!(json["dry_run"], true);
    assert!(temp
        .path()
        .join("src/main/java/acme/Generated.java")
        .exists());
    Ok(())
}

#[test]
fn test_inspect_json() -> Result<()> {
    let temp = project()?;
    let output = jrewrite()?
        .arg("inspect")
        .arg(temp.path().join("src/main/java/acme/Greeter.java"))
        .arg("--json")
        .output()?;
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["files"][0]["types"], 1);
    assert_eq!(json["files"][0]["unsupported"], 0);
    assert_eq!(json["files"][0]["kinds"]["Import"], 2);
    Ok(())
}

#[test]
fn test_missing_path_fails() -> Result<()> {
    jrewrite()?
        .args(["rewrite", "does/not/exist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
    Ok(())
}

#[test]
fn test_invalid_rename_target_fails() -> Result<()> {
    let temp = project()?;
    jrewrite()?
        .arg("rewrite")
        .arg(temp.path())
        .args(["--dry-run", "--rename", "name=class"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reserved word"));
    Ok(())
}
