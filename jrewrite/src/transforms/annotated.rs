//! Dropping annotated declarations.

use compact_str::CompactString;

use super::{Transform, TransformError};
use crate::constants::get_identifier_re;
use crate::tree::{CompilationUnit, NodeData, NodeId, NodeKind};
use crate::visit::CallbackTable;

const DECLARATIONS: [NodeKind; 4] = [
    NodeKind::ClassDecl,
    NodeKind::MethodDecl,
    NodeKind::VariableDecl,
    NodeKind::EnumConstant,
];

/// Ignores every declaration carrying one of the given annotations. An
/// ignored top-level type suppresses the whole file on save.
///
/// Names match on their last segment, so `Generated` also matches
/// `@javax.annotation.Generated`.
#[derive(Debug, Clone)]
pub struct IgnoreAnnotated {
    names: Vec<CompactString>,
}

impl IgnoreAnnotated {
    /// Validates the annotation names; a leading `@` is accepted.
    ///
    /// # Errors
    /// [`TransformError::InvalidIdentifier`] for a name that is not a
    /// dotted identifier.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self, TransformError> {
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let bare = name.trim_start_matches('@');
            let last = bare.rsplit('.').next().unwrap_or(bare);
            if !bare.split('.').all(|s| get_identifier_re().is_match(s)) {
                return Err(TransformError::InvalidIdentifier(name.to_owned()));
            }
            out.push(CompactString::from(last));
        }
        Ok(Self { names: out })
    }

    fn annotated(&self, unit: &CompilationUnit, id: NodeId) -> bool {
        let modifiers = match unit.data(id) {
            Some(
                NodeData::ClassDecl { modifiers, .. }
                | NodeData::MethodDecl { modifiers, .. }
                | NodeData::VariableDecl { modifiers, .. }
                | NodeData::EnumConstant { modifiers, .. },
            ) => *modifiers,
            _ => None,
        };
        let Some(NodeData::Modifiers { annotations, .. }) = modifiers.and_then(|m| unit.data(m))
        else {
            return false;
        };
        annotations.iter().any(|&annotation| {
            let Some(NodeData::Annotation { name, .. }) = unit.data(annotation) else {
                return false;
            };
            let last = name.rsplit('.').next().unwrap_or(name);
            self.names.iter().any(|n| n.as_str() == last)
        })
    }
}

impl Transform for IgnoreAnnotated {
    fn name(&self) -> &'static str {
        "ignore-annotated"
    }

    fn register(&self, table: &mut CallbackTable) {
        for kind in DECLARATIONS {
            let ignore = self.clone();
            table.on(kind, move |unit: &mut CompilationUnit, id| {
                if ignore.annotated(unit, id) {
                    unit.set_ignored(id)?;
                }
                Ok(())
            });
        }
    }
}
