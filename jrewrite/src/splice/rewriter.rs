//! Text edits over one window of a source file.
//!
//! Edits are recorded with absolute file offsets and must fall inside the
//! window. `finish` sorts them and copies the window once, front to back.
//!
//! # Usage
//!
//! ```
//! use jrewrite::splice::{Edit, SpliceBuffer};
//!
//! let source = "class A { int a = b; }";
//! let mut buffer = SpliceBuffer::new(source, 10..20);
//! buffer.push(Edit::replace(18..19, "c"));
//! assert_eq!(buffer.finish().unwrap(), "int a = c;");
//! ```

use std::ops::Range;

/// Replacement of one byte range of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Replaced bytes, absolute in the source.
    pub range: Range<usize>,
    /// Text written in their place.
    pub text: String,
}

impl Edit {
    /// Writes `text` over `range`.
    #[must_use]
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Removes `range`.
    #[must_use]
    pub fn delete(range: Range<usize>) -> Self {
        Self::replace(range, String::new())
    }
}

/// Rejected edit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    /// The edit is inverted or not inside the window.
    #[error("edit {range:?} leaves the window {window:?}")]
    OutsideWindow {
        /// Range of the bad edit.
        range: Range<usize>,
        /// Window being rewritten.
        window: Range<usize>,
    },
    /// An edit boundary falls inside a UTF-8 sequence.
    #[error("edit {range:?} splits a character")]
    NotCharBoundary {
        /// Range of the bad edit.
        range: Range<usize>,
    },
    /// Two edits share a byte.
    #[error("edits {first:?} and {second:?} overlap")]
    Overlap {
        /// Earlier edit in source order.
        first: Range<usize>,
        /// Later edit in source order.
        second: Range<usize>,
    },
}

/// Edits collected against `source[window]`.
#[derive(Debug)]
pub struct SpliceBuffer<'a> {
    source: &'a str,
    window: Range<usize>,
    edits: Vec<Edit>,
}

impl<'a> SpliceBuffer<'a> {
    /// Starts an empty edit set for `source[window]`.
    #[must_use]
    pub fn new(source: &'a str, window: Range<usize>) -> Self {
        Self {
            source,
            window,
            edits: Vec::new(),
        }
    }

    /// Queues one edit.
    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    fn check(&self, edit: &Edit) -> Result<(), RewriteError> {
        let Range { start, end } = edit.range;
        if start > end || start < self.window.start || end > self.window.end {
            return Err(RewriteError::OutsideWindow {
                range: edit.range.clone(),
                window: self.window.clone(),
            });
        }
        if !self.source.is_char_boundary(start) || !self.source.is_char_boundary(end) {
            return Err(RewriteError::NotCharBoundary {
                range: edit.range.clone(),
            });
        }
        Ok(())
    }

    /// The window with every edit applied.
    ///
    /// Two insertions at the same offset keep the order they were pushed in.
    ///
    /// # Errors
    /// Returns the first edit outside the window or splitting a character,
    /// or the first pair of edits sharing a byte.
    pub fn finish(mut self) -> Result<String, RewriteError> {
        for edit in &self.edits {
            self.check(edit)?;
        }
        // Stable: equal starts stay in push order.
        self.edits.sort_by_key(|edit| edit.range.start);

        let mut out = String::with_capacity(self.window.len());
        let mut cursor = self.window.start;
        let mut previous: Option<&Range<usize>> = None;
        for edit in &self.edits {
            if let Some(prev) = previous {
                if edit.range.start < prev.end {
                    return Err(RewriteError::Overlap {
                        first: prev.clone(),
                        second: edit.range.clone(),
                    });
                }
            }
            out.push_str(&self.source[cursor..edit.range.start]);
            out.push_str(&edit.text);
            cursor = edit.range.end;
            previous = Some(&edit.range);
        }
        out.push_str(&self.source[cursor..self.window.end]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str, edits: Vec<Edit>) -> Result<String, RewriteError> {
        let mut buffer = SpliceBuffer::new(source, 0..source.len());
        for edit in edits {
            buffer.push(edit);
        }
        buffer.finish()
    }

    #[test]
    fn test_edits_in_any_order() {
        let text = run(
            "f(a, b, c)",
            vec![Edit::replace(8..9, "z"), Edit::replace(2..3, "x")],
        );
        assert_eq!(text.unwrap(), "f(x, b, z)");
    }

    #[test]
    fn test_window_uses_absolute_offsets() {
        let source = "{\n    return a + b;\n}";
        let mut buffer = SpliceBuffer::new(source, 6..19);
        buffer.push(Edit::replace(15..16, "*"));
        assert_eq!(buffer.finish().unwrap(), "return a * b;");
    }

    #[test]
    fn test_deletion_and_insertion() {
        let text = run(
            "import a.B;\nimport c.D;\n",
            vec![Edit::delete(0..12), Edit::replace(24..24, "import e.F;\n")],
        );
        assert_eq!(text.unwrap(), "import c.D;\nimport e.F;\n");
    }

    #[test]
    fn test_insertions_at_one_offset_keep_order() {
        let text = run(
            "();",
            vec![Edit::replace(1..1, "a"), Edit::replace(1..1, ", b")],
        );
        assert_eq!(text.unwrap(), "(a, b);");
    }

    #[test]
    fn test_overlap_is_rejected() {
        let err = run(
            "return a + b;",
            vec![Edit::replace(11..12, "d"), Edit::replace(7..12, "c")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            RewriteError::Overlap {
                first: 7..12,
                second: 11..12
            }
        );
    }

    #[test]
    fn test_edit_outside_window() {
        let mut buffer = SpliceBuffer::new("int x = 1;", 4..9);
        buffer.push(Edit::delete(0..3));
        assert!(matches!(
            buffer.finish(),
            Err(RewriteError::OutsideWindow { .. })
        ));
    }

    #[test]
    fn test_char_boundary() {
        let err = run("s = \"é\";", vec![Edit::delete(6..7)]).unwrap_err();
        assert_eq!(err, RewriteError::NotCharBoundary { range: 6..7 });
    }
}
