//! Text sinks used by the renderer.
//!
//! Output accumulates as completed lines plus one in-progress line. Two
//! policies implement [`StyleWriter`]:
//! - [`StandardStyleWriter`] tracks depth, base indent and word wrap; it
//!   writes files and nested re-renders
//! - [`StringStyleWriter`] only accumulates text; it backs previews
//!
//! Lines are joined with the writer's line separator, `\n` unless the unit
//! being rendered uses `\r\n`. Verbatim text is re-split so a CRLF source
//! keeps CRLF everywhere.

use super::escape::{quote_char, quote_string, quote_text_block};
use super::options::StyleOptions;
use crate::tree::{LiteralValue, TreeKind};

/// Line-oriented output sink.
pub trait StyleWriter {
    /// Appends text to the current line. `text` must not contain newlines.
    fn append(&mut self, text: &str);

    /// Ends the current line.
    fn append_line_separator(&mut self);

    /// Text of the in-progress line.
    fn current_line(&self) -> &str;

    /// Appends a keyword, wrapping first if it would cross the wrap column.
    fn append_keyword(&mut self, keyword: &str);

    /// Emits the indent for the current depth.
    fn append_indent(&mut self);

    /// Emits the indent for a wrapped line.
    fn append_continuation_indent(&mut self);

    /// Enters a nested level.
    fn increase_depth(&mut self);

    /// Leaves a nested level.
    fn decrease_depth(&mut self);

    /// Indent text that [`StyleWriter::append_indent`] would emit.
    fn indent_string(&self) -> String;

    /// Everything written so far.
    fn contents(&self) -> String;

    /// Appends one character.
    fn append_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.append(c.encode_utf8(&mut buf));
    }

    /// Appends one space.
    fn append_space(&mut self) {
        self.append(" ");
    }

    /// Appends `count` spaces.
    fn append_spaces(&mut self, count: usize) {
        self.append(&" ".repeat(count));
    }

    /// Appends a space unless the line is empty or already ends in whitespace.
    fn append_space_if_needed(&mut self) {
        let line = self.current_line();
        if !line.is_empty() && !line.ends_with(char::is_whitespace) {
            self.append_space();
        }
    }

    /// `{`
    fn append_open_brace(&mut self) {
        self.append_char('{');
    }

    /// `}`
    fn append_close_brace(&mut self) {
        self.append_char('}');
    }

    /// `(`
    fn append_open_paren(&mut self) {
        self.append_char('(');
    }

    /// `)`
    fn append_close_paren(&mut self) {
        self.append_char(')');
    }

    /// `[`
    fn append_open_bracket(&mut self) {
        self.append_char('[');
    }

    /// `]`
    fn append_close_bracket(&mut self) {
        self.append_char(']');
    }

    /// `<`
    fn append_less_than(&mut self) {
        self.append_char('<');
    }

    /// `>`
    fn append_greater_than(&mut self) {
        self.append_char('>');
    }

    /// `,`
    fn append_comma(&mut self) {
        self.append_char(',');
    }

    /// `;`
    fn append_semicolon(&mut self) {
        self.append_char(';');
    }

    /// `.`
    fn append_dot(&mut self) {
        self.append_char('.');
    }

    /// A double-quoted, escaped string literal.
    fn append_string_literal(&mut self, text: &str) {
        self.append_verbatim(&quote_string(text));
    }

    /// A single-quoted, escaped character literal.
    fn append_char_literal(&mut self, c: char) {
        self.append(&quote_char(c));
    }

    /// A literal of `kind`; a missing value renders the kind's default.
    fn append_literal(&mut self, kind: TreeKind, value: Option<&LiteralValue>) {
        self.append_verbatim(&literal_text(kind, value));
    }

    /// Appends text that may span lines, exactly as given apart from its
    /// line separators.
    fn append_verbatim(&mut self, text: &str) {
        let mut lines = split_lines(text);
        if let Some(first) = lines.next() {
            self.append(first);
        }
        for line in lines {
            self.append_line_separator();
            self.append(line);
        }
    }

    /// Appends original text that was indented with `original_indent`,
    /// moving its continuation lines to the current indent.
    fn append_verbatim_reindented(&mut self, text: &str, original_indent: &str) {
        let indent = self.indent_string();
        if indent == original_indent || !text.contains('\n') {
            self.append_verbatim(text);
            return;
        }
        let mut lines = split_lines(text);
        if let Some(first) = lines.next() {
            self.append(first);
        }
        for line in lines {
            self.append_line_separator();
            match line.strip_prefix(original_indent) {
                Some(rest) if !line.trim().is_empty() => {
                    self.append(&indent);
                    self.append(rest);
                }
                _ => self.append(line),
            }
        }
    }
}

/// Lines of `text`, each without its `\n` or `\r\n` terminator.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find('\n') {
            Some(nl) => {
                rest = Some(&current[nl + 1..]);
                let line = &current[..nl];
                Some(line.strip_suffix('\r').unwrap_or(line))
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

/// Source text of a literal.
#[must_use]
pub fn literal_text(kind: TreeKind, value: Option<&LiteralValue>) -> String {
    match value {
        Some(LiteralValue::Int(v)) => v.to_string(),
        Some(LiteralValue::Long(v)) => format!("{v}L"),
        Some(LiteralValue::Float(v)) => float_text(*v),
        Some(LiteralValue::Double(v)) => double_text(*v),
        Some(LiteralValue::Boolean(v)) => v.to_string(),
        Some(LiteralValue::Char(c)) => quote_char(*c),
        Some(LiteralValue::String(s)) if kind == TreeKind::TextBlock => quote_text_block(s),
        Some(LiteralValue::String(s)) => quote_string(s),
        None => match kind {
            TreeKind::IntLiteral => "0".to_owned(),
            TreeKind::LongLiteral => "0L".to_owned(),
            TreeKind::FloatLiteral => "0.0F".to_owned(),
            TreeKind::DoubleLiteral => "0.0".to_owned(),
            TreeKind::BooleanLiteral => "false".to_owned(),
            TreeKind::CharLiteral => quote_char('\0'),
            _ => "null".to_owned(),
        },
    }
}

fn float_text(value: f32) -> String {
    if value.is_nan() {
        "Float.NaN".to_owned()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "POSITIVE" } else { "NEGATIVE" };
        format!("Float.{sign}_INFINITY")
    } else {
        format!("{value:?}F")
    }
}

fn double_text(value: f64) -> String {
    if value.is_nan() {
        "Double.NaN".to_owned()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "POSITIVE" } else { "NEGATIVE" };
        format!("Double.{sign}_INFINITY")
    } else {
        format!("{value:?}")
    }
}

/// Completed lines plus the in-progress one.
#[derive(Debug, Clone)]
struct LineBuffer {
    lines: Vec<String>,
    current: String,
    separator: &'static str,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            current: String::new(),
            separator: "\n",
        }
    }
}

impl LineBuffer {
    fn push_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
    }

    fn contents(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push_str(self.separator);
        }
        out.push_str(&self.current);
        out
    }
}

/// Depth-aware writer with word wrap, used for files.
#[derive(Debug, Clone)]
pub struct StandardStyleWriter {
    buf: LineBuffer,
    options: StyleOptions,
    depth: usize,
    base_indent: String,
}

impl StandardStyleWriter {
    /// A writer at depth zero with no base indent.
    #[must_use]
    pub fn new(options: StyleOptions) -> Self {
        Self::nested(options, String::new())
    }

    /// A writer whose indents start from `base_indent`, for re-rendering a
    /// node that sits inside untouched text.
    #[must_use]
    pub fn nested(options: StyleOptions, base_indent: impl Into<String>) -> Self {
        Self {
            buf: LineBuffer::default(),
            options,
            depth: 0,
            base_indent: base_indent.into(),
        }
    }

    /// Joins lines with `separator` instead of `\n`.
    #[must_use]
    pub fn with_line_separator(mut self, separator: &'static str) -> Self {
        self.buf.separator = separator;
        self
    }

    /// Current depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Consumes the writer and returns its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buf.contents()
    }
}

impl StyleWriter for StandardStyleWriter {
    fn append(&mut self, text: &str) {
        self.buf.current.push_str(text);
    }

    fn append_line_separator(&mut self) {
        self.buf.push_line();
    }

    fn current_line(&self) -> &str {
        &self.buf.current
    }

    fn append_keyword(&mut self, keyword: &str) {
        let width = self.buf.current.chars().count() + keyword.chars().count();
        let has_text = !self.buf.current.trim().is_empty();
        if has_text && width > self.options.word_wrap_column() {
            let trimmed = self.buf.current.trim_end().len();
            self.buf.current.truncate(trimmed);
            self.append_line_separator();
            self.append_indent();
            self.append_continuation_indent();
        }
        self.append(keyword);
    }

    fn append_indent(&mut self) {
        let indent = self.indent_string();
        self.append(&indent);
    }

    fn append_continuation_indent(&mut self) {
        self.append_spaces(self.options.continuation_indent_size());
    }

    fn increase_depth(&mut self) {
        self.depth += 1;
    }

    fn decrease_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn indent_string(&self) -> String {
        let mut indent = self.base_indent.clone();
        indent.push_str(&" ".repeat(self.depth * self.options.indent_size()));
        indent
    }

    fn contents(&self) -> String {
        self.buf.contents()
    }
}

/// Plain accumulator without depth or wrapping, used for previews.
#[derive(Debug, Clone, Default)]
pub struct StringStyleWriter {
    buf: LineBuffer,
}

impl StringStyleWriter {
    /// An empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins lines with `separator` instead of `\n`.
    #[must_use]
    pub fn with_line_separator(mut self, separator: &'static str) -> Self {
        self.buf.separator = separator;
        self
    }

    /// Consumes the writer and returns its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buf.contents()
    }
}

impl StyleWriter for StringStyleWriter {
    fn append(&mut self, text: &str) {
        self.buf.current.push_str(text);
    }

    fn append_line_separator(&mut self) {
        self.buf.push_line();
    }

    fn current_line(&self) -> &str {
        &self.buf.current
    }

    fn append_keyword(&mut self, keyword: &str) {
        self.append(keyword);
    }

    fn append_indent(&mut self) {}

    fn append_continuation_indent(&mut self) {}

    fn increase_depth(&mut self) {}

    fn decrease_depth(&mut self) {}

    fn indent_string(&self) -> String {
        String::new()
    }

    fn contents(&self) -> String {
        self.buf.contents()
    }
}
