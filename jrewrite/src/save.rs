//! Unit assembly: turns an edited [`CompilationUnit`] back into source text.
//!
//! An untouched unit is copied byte for byte. An edited one is assembled
//! from its top-level nodes, each going through the per-node emission in
//! [`crate::render`]. A unit whose top-level type was ignored produces no
//! output at all, which callers must tell apart from an empty file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::cst::header_end;
use crate::render::Renderer;
use crate::style::{StandardStyleWriter, StyleWriter};
use crate::tree::{Action, CompilationUnit, NodeData, NodeId};

/// What a save produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    /// The source was copied unchanged.
    Verbatim,
    /// At least part of the unit was re-emitted.
    Rendered,
    /// A top-level type was ignored; nothing was written.
    Suppressed,
}

impl SaveOutcome {
    /// Whether anything was written.
    #[must_use]
    pub const fn wrote_output(self) -> bool {
        !matches!(self, Self::Suppressed)
    }
}

/// Failures while writing a saved unit.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The sink could not be written or flushed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Destination, or `<stream>` for writers without a path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl SaveError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Assembles the unit's text.
///
/// Returns [`SaveOutcome::Suppressed`] with an empty string when a
/// top-level type is ignored; the root is then marked ignored as well.
pub fn save(unit: &mut CompilationUnit) -> (SaveOutcome, String) {
    let root = unit.root();
    if unit.action(root) != Some(Action::Change) && !unit.is_dirty(root) {
        debug!("unit unchanged, copying verbatim");
        return (SaveOutcome::Verbatim, unit.source().to_owned());
    }

    if let Some(ignored) = ignored_type(unit) {
        info!(node = %ignored, "top-level type ignored, suppressing output");
        unit.ignore_root();
        return (SaveOutcome::Suppressed, String::new());
    }

    let mut writer =
        StandardStyleWriter::new(unit.options().clone()).with_line_separator(unit.line_separator());
    let first = first_original_start(unit);
    let skip_before = if unit.options().preserve_leading_comment() {
        if let Some(start) = first {
            writer.append_verbatim(&unit.source()[..start]);
        }
        first.unwrap_or(0)
    } else {
        header_end(unit.cst()).unwrap_or(0)
    };
    Renderer::new(unit, &mut writer).compilation_unit(skip_before);
    (SaveOutcome::Rendered, writer.into_string())
}

/// Saves the unit into `out` and flushes it, whatever the outcome.
///
/// # Errors
/// [`SaveError::Io`] when writing or flushing fails.
pub fn save_to_writer<W: Write>(
    unit: &mut CompilationUnit,
    out: &mut W,
) -> Result<SaveOutcome, SaveError> {
    let (outcome, text) = save(unit);
    let path = unit
        .path()
        .map_or_else(|| PathBuf::from("<stream>"), Path::to_path_buf);
    let written = out.write_all(text.as_bytes());
    let flushed = out.flush();
    written
        .and(flushed)
        .map_err(|source| SaveError::io(path, source))?;
    Ok(outcome)
}

/// Saves the unit to `path`. A suppressed unit leaves the file untouched
/// and does not create it.
///
/// # Errors
/// [`SaveError::Io`] when the file cannot be written.
pub fn save_to_path(unit: &mut CompilationUnit, path: &Path) -> Result<SaveOutcome, SaveError> {
    let (outcome, text) = save(unit);
    if outcome.wrote_output() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SaveError::io(parent, source))?;
        }
        fs::write(path, text).map_err(|source| SaveError::io(path, source))?;
    }
    Ok(outcome)
}

fn ignored_type(unit: &CompilationUnit) -> Option<NodeId> {
    let Some(NodeData::CompilationUnit { types, .. }) = unit.data(unit.root()) else {
        return None;
    };
    types.iter().copied().find(|&ty| unit.is_ignored(ty))
}

/// Start of the first top-level node that came from the source, ignored
/// or not.
fn first_original_start(unit: &CompilationUnit) -> Option<usize> {
    unit.children(unit.root())
        .into_iter()
        .filter_map(|child| unit.node(child)?.original())
        .map(|original| unit.cst().node(original).start_byte)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleOptions;
    use crate::tree::NodeKind;

    fn unit(source: &str) -> CompilationUnit {
        CompilationUnit::parse(source).unwrap()
    }

    const SOURCE: &str = "/*\n * License.\n */\npackage a.b;\n\nimport java.util.List;\nimport java.util.Map;\n\n/** Docs. */\npublic class A {\n    int x;\n}\n";

    #[test]
    fn test_untouched_unit_is_verbatim() {
        let mut unit = unit("class   A{int x ;}");
        let (outcome, text) = save(&mut unit);
        assert_eq!(outcome, SaveOutcome::Verbatim);
        assert_eq!(text, "class   A{int x ;}");
    }

    #[test]
    fn test_ignored_type_suppresses() {
        let mut unit = unit(SOURCE);
        let class = unit.find_all(NodeKind::ClassDecl)[0];
        unit.set_ignored(class).unwrap();
        let (outcome, text) = save(&mut unit);
        assert_eq!(outcome, SaveOutcome::Suppressed);
        assert!(text.is_empty());
        assert!(unit.is_ignored(unit.root()));
    }

    #[test]
    fn test_removed_import_keeps_layout() {
        let mut unit = unit(SOURCE);
        let list = unit.find_all(NodeKind::Import)[0];
        unit.set_ignored(list).unwrap();
        let (outcome, text) = save(&mut unit);
        assert_eq!(outcome, SaveOutcome::Rendered);
        assert_eq!(text, SOURCE.replace("import java.util.List;\n", ""));
    }

    #[test]
    fn test_header_dropped_without_leading_comment() {
        let mut unit = unit(SOURCE);
        let options = StyleOptions::builder()
            .preserve_leading_comment(false)
            .build()
            .unwrap();
        unit.set_options(options);
        let map = unit.find_all(NodeKind::Import)[1];
        unit.set_ignored(map).unwrap();
        let (_, text) = save(&mut unit);
        assert!(text.starts_with("package a.b;\n\nimport java.util.List;\n\n/** Docs. */\n"));
    }

    #[test]
    fn test_ignored_package_alone_is_omitted() {
        let mut unit = unit(SOURCE);
        let package = unit.find_all(NodeKind::Package)[0];
        unit.set_ignored(package).unwrap();
        let (outcome, text) = save(&mut unit);
        assert_eq!(outcome, SaveOutcome::Rendered);
        assert!(!text.contains("package"));
        assert!(text.starts_with("/*\n * License.\n */\nimport java.util.List;"));
    }

    #[test]
    fn test_save_to_writer_flushes() {
        struct Sink {
            data: Vec<u8>,
            flushed: bool,
        }
        impl Write for Sink {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.data.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                self.flushed = true;
                Ok(())
            }
        }

        let mut unit = unit(SOURCE);
        let class = unit.find_all(NodeKind::ClassDecl)[0];
        unit.set_ignored(class).unwrap();
        let mut sink = Sink {
            data: Vec::new(),
            flushed: false,
        };
        let outcome = save_to_writer(&mut unit, &mut sink).unwrap();
        assert!(!outcome.wrote_output());
        assert!(sink.flushed);
        assert!(sink.data.is_empty());
    }

    #[test]
    fn test_save_to_path_skips_suppressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("A.java");
        let mut unit = unit(SOURCE);
        let outcome = save_to_path(&mut unit, &path).unwrap();
        assert_eq!(outcome, SaveOutcome::Verbatim);
        assert_eq!(fs::read_to_string(&path).unwrap(), SOURCE);

        let other = dir.path().join("B.java");
        let class = unit.find_all(NodeKind::ClassDecl)[0];
        unit.set_ignored(class).unwrap();
        assert_eq!(
            save_to_path(&mut unit, &other).unwrap(),
            SaveOutcome::Suppressed
        );
        assert!(!other.exists());
    }
}
