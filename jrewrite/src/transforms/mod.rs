//! Built-in transforms.
//!
//! Each transform registers callbacks on a [`CallbackTable`]; the rewrite
//! command runs them all in one traversal per file.

mod annotated;
mod imports;
mod rename;

pub use annotated::IgnoreAnnotated;
pub use imports::{glob_to_regex, RemoveImports};
pub use rename::Rename;

use thiserror::Error;

use crate::config::TransformsConfig;
use crate::visit::CallbackTable;

/// A configured transform that can add itself to a callback table.
pub trait Transform {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Registers the transform's callbacks.
    fn register(&self, table: &mut CallbackTable);
}

/// A transform that cannot be built from its settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Not a Java identifier.
    #[error("`{0}` is not a valid identifier")]
    InvalidIdentifier(String),
    /// A keyword used as a rename target.
    #[error("`{0}` is a reserved word")]
    ReservedWord(String),
    /// Not a dotted import pattern.
    #[error("`{0}` is not a valid import pattern")]
    InvalidPattern(String),
}

/// Builds every transform named in `config`, renames first.
///
/// # Errors
/// The first setting that does not form a valid transform.
pub fn from_config(config: &TransformsConfig) -> Result<Vec<Box<dyn Transform>>, TransformError> {
    let mut transforms: Vec<Box<dyn Transform>> = Vec::new();
    for (from, to) in &config.rename {
        transforms.push(Box::new(Rename::new(from, to)?));
    }
    if !config.remove_imports.is_empty() {
        transforms.push(Box::new(RemoveImports::new(&config.remove_imports)?));
    }
    if !config.ignore_annotated.is_empty() {
        transforms.push(Box::new(IgnoreAnnotated::new(&config.ignore_annotated)?));
    }
    Ok(transforms)
}

/// One table holding the callbacks of every transform, in order.
#[must_use]
pub fn callback_table(transforms: &[Box<dyn Transform>]) -> CallbackTable {
    let mut table = CallbackTable::new();
    for transform in transforms {
        transform.register(&mut table);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let mut config = TransformsConfig::default();
        config.rename.insert("a".into(), "b".into());
        config.rename.insert("c".into(), "d".into());
        config.remove_imports.push("java.util.*".into());
        let transforms = from_config(&config).unwrap();
        let names: Vec<_> = transforms.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["rename", "rename", "remove-imports"]);
        assert_eq!(callback_table(&transforms).len(), 3);
    }

    #[test]
    fn test_from_config_rejects_bad_rename() {
        let mut config = TransformsConfig::default();
        config.rename.insert("a".into(), "class".into());
        assert!(matches!(
            from_config(&config),
            Err(TransformError::ReservedWord(word)) if word == "class"
        ));
    }
}
