//! Import removal.

use regex::Regex;

use super::{Transform, TransformError};
use crate::constants::get_import_pattern_re;
use crate::tree::{CompilationUnit, NodeData, NodeId, NodeKind};
use crate::visit::CallbackTable;

/// Compiles an import pattern. Segments are matched literally except `*`,
/// which stands for exactly one segment.
///
/// # Errors
/// [`TransformError::InvalidPattern`] for anything but dotted identifiers
/// and `*` segments.
pub fn glob_to_regex(pattern: &str) -> Result<Regex, TransformError> {
    if !get_import_pattern_re().is_match(pattern) {
        return Err(TransformError::InvalidPattern(pattern.to_owned()));
    }
    let body = pattern
        .split('.')
        .map(|segment| {
            if segment == "*" {
                r"[^.]+".to_owned()
            } else {
                regex::escape(segment)
            }
        })
        .collect::<Vec<_>>()
        .join(r"\.");
    Regex::new(&format!("^{body}$")).map_err(|_| TransformError::InvalidPattern(pattern.to_owned()))
}

/// Ignores the imports matching any of a set of patterns.
///
/// An import is matched as written: `java.util.*` for an on-demand import,
/// `java.util.List` otherwise. Static imports match the same way.
#[derive(Debug, Clone)]
pub struct RemoveImports {
    patterns: Vec<Regex>,
}

impl RemoveImports {
    /// Compiles every pattern.
    ///
    /// # Errors
    /// The first invalid pattern.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, TransformError> {
        let patterns = patterns
            .iter()
            .map(|p| glob_to_regex(p.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    /// Whether an import written as `text` is removed.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    fn apply(&self, unit: &mut CompilationUnit, id: NodeId) -> anyhow::Result<()> {
        let Some(NodeData::Import {
            name, on_demand, ..
        }) = unit.data(id)
        else {
            return Ok(());
        };
        let text = if *on_demand {
            format!("{name}.*")
        } else {
            name.to_string()
        };
        if self.matches(&text) {
            unit.set_ignored(id)?;
        }
        Ok(())
    }
}

impl Transform for RemoveImports {
    fn name(&self) -> &'static str {
        "remove-imports"
    }

    fn register(&self, table: &mut CallbackTable) {
        let remove = self.clone();
        table.on(NodeKind::Import, move |unit, id| remove.apply(unit, id));
    }
}
