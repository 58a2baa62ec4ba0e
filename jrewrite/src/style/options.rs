//! Render options.

/// Largest accepted indent or continuation indent.
pub const MAX_INDENT: usize = 100;

/// Smallest accepted word-wrap column.
pub const MIN_WRAP_COLUMN: usize = 60;

/// Out-of-range render option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Indent size above [`MAX_INDENT`].
    #[error("indent size must be between 0 and {MAX_INDENT}, got {0}")]
    IndentSize(usize),
    /// Continuation indent size above [`MAX_INDENT`].
    #[error("continuation indent size must be between 0 and {MAX_INDENT}, got {0}")]
    ContinuationIndentSize(usize),
    /// Word-wrap column below [`MIN_WRAP_COLUMN`].
    #[error("word wrap column must be at least {MIN_WRAP_COLUMN}, got {0}")]
    WordWrapColumn(usize),
}

/// Sealed render options. Built through [`StyleOptionsBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOptions {
    indent_size: usize,
    continuation_indent_size: usize,
    word_wrap_column: usize,
    preserve_leading_comment: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            continuation_indent_size: 8,
            word_wrap_column: 120,
            preserve_leading_comment: true,
        }
    }
}

impl StyleOptions {
    /// Starts a builder seeded with the defaults.
    #[must_use]
    pub fn builder() -> StyleOptionsBuilder {
        StyleOptionsBuilder::default()
    }

    /// Spaces per depth level.
    #[must_use]
    pub fn indent_size(&self) -> usize {
        self.indent_size
    }

    /// Extra spaces on wrapped lines.
    #[must_use]
    pub fn continuation_indent_size(&self) -> usize {
        self.continuation_indent_size
    }

    /// Column past which keywords wrap.
    #[must_use]
    pub fn word_wrap_column(&self) -> usize {
        self.word_wrap_column
    }

    /// Whether the text before the first declaration is kept.
    #[must_use]
    pub fn preserve_leading_comment(&self) -> bool {
        self.preserve_leading_comment
    }
}

/// Collects and validates render options.
#[derive(Debug, Clone, Default)]
pub struct StyleOptionsBuilder {
    indent_size: Option<usize>,
    continuation_indent_size: Option<usize>,
    word_wrap_column: Option<usize>,
    preserve_leading_comment: Option<bool>,
}

impl StyleOptionsBuilder {
    /// Spaces per depth level, 0 to 100.
    #[must_use]
    pub fn indent_size(mut self, value: usize) -> Self {
        self.indent_size = Some(value);
        self
    }

    /// Extra spaces on wrapped lines, 0 to 100.
    #[must_use]
    pub fn continuation_indent_size(mut self, value: usize) -> Self {
        self.continuation_indent_size = Some(value);
        self
    }

    /// Wrap column, at least 60.
    #[must_use]
    pub fn word_wrap_column(mut self, value: usize) -> Self {
        self.word_wrap_column = Some(value);
        self
    }

    /// Keep or drop the leading comment block.
    #[must_use]
    pub fn preserve_leading_comment(mut self, value: bool) -> Self {
        self.preserve_leading_comment = Some(value);
        self
    }

    /// Seals the options.
    ///
    /// # Errors
    /// Returns the first out-of-range value.
    pub fn build(self) -> Result<StyleOptions, ConfigError> {
        let defaults = StyleOptions::default();
        let indent_size = self.indent_size.unwrap_or(defaults.indent_size);
        if indent_size > MAX_INDENT {
            return Err(ConfigError::IndentSize(indent_size));
        }
        let continuation_indent_size = self
            .continuation_indent_size
            .unwrap_or(defaults.continuation_indent_size);
        if continuation_indent_size > MAX_INDENT {
            return Err(ConfigError::ContinuationIndentSize(continuation_indent_size));
        }
        let word_wrap_column = self.word_wrap_column.unwrap_or(defaults.word_wrap_column);
        if word_wrap_column < MIN_WRAP_COLUMN {
            return Err(ConfigError::WordWrapColumn(word_wrap_column));
        }
        Ok(StyleOptions {
            indent_size,
            continuation_indent_size,
            word_wrap_column,
            preserve_leading_comment: self
                .preserve_leading_comment
                .unwrap_or(defaults.preserve_leading_comment),
        })
    }
}
