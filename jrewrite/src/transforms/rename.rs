//! Identifier renaming.

use compact_str::CompactString;

use super::{Transform, TransformError};
use crate::constants::{get_identifier_re, get_reserved_words};
use crate::tree::{CompilationUnit, NodeData, NodeId, NodeKind};
use crate::visit::CallbackTable;

/// Kinds whose whole name is one identifier.
const SIMPLE_NAMES: [NodeKind; 12] = [
    NodeKind::Ident,
    NodeKind::FieldAccess,
    NodeKind::MethodInvocation,
    NodeKind::MemberReference,
    NodeKind::ClassDecl,
    NodeKind::MethodDecl,
    NodeKind::VariableDeclarator,
    NodeKind::Parameter,
    NodeKind::EnumConstant,
    NodeKind::TypeParameter,
    NodeKind::ForEach,
    NodeKind::BindingPattern,
];

/// Renames declarations and references of one identifier.
///
/// Qualified type names and single-type imports are renamed in their last
/// segment, so `a.b.Old` becomes `a.b.New`. On-demand imports name a
/// package and are left alone.
#[derive(Debug, Clone)]
pub struct Rename {
    from: CompactString,
    to: CompactString,
}

impl Rename {
    /// Validates both names.
    ///
    /// # Errors
    /// [`TransformError::InvalidIdentifier`] for a name that is not an
    /// identifier, [`TransformError::ReservedWord`] for a keyword target.
    pub fn new(from: &str, to: &str) -> Result<Self, TransformError> {
        for name in [from, to] {
            if !get_identifier_re().is_match(name) {
                return Err(TransformError::InvalidIdentifier(name.to_owned()));
            }
        }
        if get_reserved_words().contains(to) {
            return Err(TransformError::ReservedWord(to.to_owned()));
        }
        Ok(Self {
            from: from.into(),
            to: to.into(),
        })
    }

    /// New name for the node, if it refers to the renamed identifier.
    fn renamed(&self, data: &NodeData) -> Option<String> {
        match data {
            NodeData::TypeName { name } => self.last_segment(name),
            NodeData::Import {
                name,
                on_demand: false,
                ..
            } => self.last_segment(name),
            other if SIMPLE_NAMES.contains(&other.kind()) => {
                (other.name() == Some(self.from.as_str())).then(|| self.to.to_string())
            }
            _ => None,
        }
    }

    fn last_segment(&self, name: &str) -> Option<String> {
        let (prefix, last) = match name.rsplit_once('.') {
            Some((prefix, last)) => (Some(prefix), last),
            None => (None, name),
        };
        if last != self.from.as_str() {
            return None;
        }
        Some(match prefix {
            Some(prefix) => format!("{prefix}.{}", self.to),
            None => self.to.to_string(),
        })
    }

    fn apply(&self, unit: &mut CompilationUnit, id: NodeId) -> anyhow::Result<()> {
        let Some(name) = unit.data(id).and_then(|data| self.renamed(data)) else {
            return Ok(());
        };
        unit.edit(id)?.set_name(&name)?;
        Ok(())
    }
}

impl Transform for Rename {
    fn name(&self) -> &'static str {
        "rename"
    }

    fn register(&self, table: &mut CallbackTable) {
        let rename = self.clone();
        table.on_any(move |unit, id| rename.apply(unit, id));
    }
}
