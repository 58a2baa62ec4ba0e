use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::CONFIG_FILENAME;
use crate::style::{ConfigError, StyleOptions, StyleOptionsBuilder};

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The `[jrewrite]` section.
    pub jrewrite: JRewriteConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Configuration options for jrewrite.
pub struct JRewriteConfig {
    /// List of folders to exclude.
    pub exclude_folders: Option<Vec<String>>,
    /// List of folders to include even when excluded by default.
    pub include_folders: Option<Vec<String>>,
    /// Render options, `[jrewrite.style]`.
    #[serde(default)]
    pub style: StyleConfig,
    /// Built-in transforms, `[jrewrite.transforms]`.
    #[serde(default)]
    pub transforms: TransformsConfig,
}

/// Render options as written in the file. Unset keys keep their defaults.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct StyleConfig {
    /// Spaces per depth level.
    pub indent_size: Option<usize>,
    /// Extra spaces on wrapped lines.
    pub continuation_indent_size: Option<usize>,
    /// Column past which keywords wrap.
    pub word_wrap_column: Option<usize>,
    /// Whether the text before the first declaration is kept.
    pub preserve_leading_comment: Option<bool>,
}

impl StyleConfig {
    /// Sets every key present in `self` on `builder`.
    #[must_use]
    pub fn apply(&self, mut builder: StyleOptionsBuilder) -> StyleOptionsBuilder {
        if let Some(value) = self.indent_size {
            builder = builder.indent_size(value);
        }
        if let Some(value) = self.continuation_indent_size {
            builder = builder.continuation_indent_size(value);
        }
        if let Some(value) = self.word_wrap_column {
            builder = builder.word_wrap_column(value);
        }
        if let Some(value) = self.preserve_leading_comment {
            builder = builder.preserve_leading_comment(value);
        }
        builder
    }

    /// Overlays the keys set in `other`.
    pub fn merge(&mut self, other: &Self) {
        self.indent_size = other.indent_size.or(self.indent_size);
        self.continuation_indent_size = other
            .continuation_indent_size
            .or(self.continuation_indent_size);
        self.word_wrap_column = other.word_wrap_column.or(self.word_wrap_column);
        self.preserve_leading_comment = other
            .preserve_leading_comment
            .or(self.preserve_leading_comment);
    }

    /// Validated options.
    ///
    /// # Errors
    /// [`ConfigError`] for out-of-range values.
    pub fn to_options(&self) -> Result<StyleOptions, ConfigError> {
        self.apply(StyleOptions::builder()).build()
    }
}

/// Built-in transforms as written in the file.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct TransformsConfig {
    /// Identifier renames, old name to new name.
    #[serde(default)]
    pub rename: BTreeMap<String, String>,
    /// Import patterns to remove; `*` matches one dotted segment.
    #[serde(default)]
    pub remove_imports: Vec<String>,
    /// Annotation names whose declarations are dropped.
    #[serde(default)]
    pub ignore_annotated: Vec<String>,
}

impl TransformsConfig {
    /// Adds the entries of `other`. Its renames win over existing ones.
    pub fn merge(&mut self, other: &Self) {
        self.rename
            .extend(other.rename.iter().map(|(k, v)| (k.clone(), v.clone())));
        for pattern in &other.remove_imports {
            if !self.remove_imports.contains(pattern) {
                self.remove_imports.push(pattern.clone());
            }
        }
        for name in &other.ignore_annotated {
            if !self.ignore_annotated.contains(name) {
                self.ignore_annotated.push(name.clone());
            }
        }
    }

    /// Whether no transform is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rename.is_empty() && self.remove_imports.is_empty() && self.ignore_annotated.is_empty()
    }
}

impl Config {
    /// Loads configuration from the current directory upwards.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// A file that cannot be read or parsed is skipped with a warning and
    /// the search goes on in the parent directory.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                match Self::from_file(&candidate) {
                    Ok(config) => {
                        debug!(path = %candidate.display(), "loaded configuration");
                        return config;
                    }
                    Err(err) => {
                        warn!(
                            path = %candidate.display(),
                            error = %err,
                            "ignoring configuration file"
                        );
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }

    /// Parses one configuration file.
    ///
    /// # Errors
    /// Fails when the file cannot be read or is not valid TOML for this
    /// schema.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config = toml::from_str::<Config>(&content)?;
        config.config_file_path = Some(path.to_path_buf());
        Ok(config)
    }
}
