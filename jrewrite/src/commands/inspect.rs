//! Inspect command: what the mirror makes of each file.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::output::print_inspect_report;
use crate::tree::{CompilationUnit, NodeData, NodeKind};
use crate::utils::{collect_java_files, normalize_display_path};

/// Counts for one file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InspectFile {
    /// Input file, normalized for display.
    pub file: String,
    /// Mirrored nodes, the root included.
    pub nodes: usize,
    /// Top-level type declarations.
    pub types: usize,
    /// Dropped subtrees with no mutable counterpart.
    pub unsupported: usize,
    /// Mirrored nodes per kind.
    pub kinds: BTreeMap<NodeKind, usize>,
    /// Why the file could not be inspected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Counts for a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InspectReport {
    /// Per-file counts.
    pub files: Vec<InspectFile>,
    /// Sum of mirrored nodes.
    pub total_nodes: usize,
    /// Sum of unsupported subtrees.
    pub total_unsupported: usize,
}

/// Parses every Java file below `targets` and reports its node counts.
///
/// # Errors
///
/// Returns an error if writing the report fails.
pub fn run_inspect<W: Write>(
    targets: &[PathBuf],
    exclude: &[String],
    include: &[String],
    json: bool,
    mut writer: W,
) -> Result<InspectReport> {
    let mut report = InspectReport::default();
    for target in targets {
        let (files, _) = collect_java_files(target, exclude, include, false);
        for file in files {
            let entry = inspect_file(&file).unwrap_or_else(|err| InspectFile {
                file: normalize_display_path(&file),
                error: Some(format!("{err:#}")),
                ..InspectFile::default()
            });
            report.total_nodes += entry.nodes;
            report.total_unsupported += entry.unsupported;
            report.files.push(entry);
        }
    }

    if json {
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
    } else {
        print_inspect_report(&mut writer, &report)?;
    }
    Ok(report)
}

fn inspect_file(file: &Path) -> Result<InspectFile> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let unit = CompilationUnit::parse(&source)
        .with_context(|| format!("failed to parse {}", file.display()))?;

    let mut kinds = BTreeMap::new();
    for id in unit.descendants(unit.root()) {
        if let Some(kind) = unit.kind(id) {
            *kinds.entry(kind).or_insert(0) += 1;
        }
    }
    let types = match unit.data(unit.root()) {
        Some(NodeData::CompilationUnit { types, .. }) => types.len(),
        _ => 0,
    };
    Ok(InspectFile {
        file: normalize_display_path(file),
        nodes: unit.len(),
        types,
        unsupported: unit.unsupported_nodes(),
        kinds,
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_inspect_counts() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("A.java"),
            "import java.util.List;\n\nclass A { int x; }\nclass B {}\n",
        )
        .unwrap();

        let mut out = Vec::new();
        let report = run_inspect(&[dir.path().to_path_buf()], &[], &[], true, &mut out).unwrap();
        let file = &report.files[0];
        assert_eq!(file.types, 2);
        assert_eq!(file.unsupported, 0);
        assert_eq!(file.kinds[&NodeKind::ClassDecl], 2);
        assert_eq!(file.kinds[&NodeKind::Import], 1);
        assert_eq!(report.total_nodes, file.nodes);

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["files"][0]["types"], 2);
        assert_eq!(json["files"][0]["kinds"]["ClassDecl"], 2);
    }
}
