//! Splice rendering for partially edited nodes.
//!
//! A node that is unchanged itself but has edited or ignored descendants is
//! emitted as its original text with the ranges of those children replaced.
//! Everything outside the replaced ranges stays byte-identical.
//!
//! - a changed child is re-rendered in place, indented like its original line
//! - an ignored child is cut out; when it sits alone on its lines the lines
//!   go too, together with the comments directly above it
//! - an ignored item of a comma-separated list takes one adjacent comma along
//!
//! When the edits cannot be applied cleanly the caller falls back to the
//! structured writer.

mod rewriter;

use std::ops::Range;

use tracing::debug;

pub use rewriter::{Edit, RewriteError, SpliceBuffer};

use crate::cst::{leading_comments, CstId, CstTree};
use crate::tree::{Action, CompilationUnit, NodeId};

/// Offset of the first byte of the line containing `byte`.
#[must_use]
pub fn line_start(source: &str, byte: usize) -> usize {
    source
        .get(..byte)
        .and_then(|before| before.rfind('\n'))
        .map_or(0, |nl| nl + 1)
}

/// Offset of the newline ending the line containing `byte`, or the source length.
#[must_use]
pub fn line_end(source: &str, byte: usize) -> usize {
    source
        .get(byte..)
        .and_then(|after| after.find('\n'))
        .map_or(source.len(), |nl| byte + nl)
}

/// Leading spaces and tabs of the line containing `byte`.
#[must_use]
pub fn line_indent(source: &str, byte: usize) -> &str {
    let start = line_start(source, byte);
    let line = source.get(start..).unwrap_or_default();
    let width = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..width]
}

/// Original text of `id` with its edited and ignored children spliced in.
///
/// Returns `None` when the node has no original, when a child to replace has
/// no original inside the node's range, or when the edits collide.
#[must_use]
pub fn splice_node(unit: &CompilationUnit, id: NodeId) -> Option<String> {
    let tree = unit.cst();
    let original = unit.node(id)?.original()?;
    let outer = tree.get(original)?;
    let bounds = outer.start_byte..outer.end_byte;
    let source = tree.source();

    let mut edits = Vec::new();
    // Adjacent ignored siblings are cut as one span.
    let mut run: Option<(CstId, CstId)> = None;
    for child in unit.children(id) {
        let node = unit.node(child)?;
        if node.action() == Action::NoChange && !node.is_dirty() {
            continue;
        }
        let child_original = node.original()?;
        let range = tree.get(child_original)?;
        if range.start_byte < bounds.start || range.end_byte > bounds.end {
            return None;
        }
        if node.action() == Action::Ignore {
            let joins = run.is_some_and(|(_, last)| {
                only_separator(source, tree.node(last).end_byte, range.start_byte)
            });
            run = match run {
                Some((first, _)) if joins => Some((first, child_original)),
                Some((first, last)) => {
                    edits.push(deletion(tree, first, last, &bounds));
                    Some((child_original, child_original))
                }
                None => Some((child_original, child_original)),
            };
        } else {
            let indent = line_indent(source, range.start_byte);
            let text = crate::render::render_nested(unit, child, indent);
            edits.push(Edit::replace(range.start_byte..range.end_byte, text));
        }
    }

    if let Some((first, last)) = run {
        edits.push(deletion(tree, first, last, &bounds));
    }

    let mut buffer = SpliceBuffer::new(source, bounds);
    for edit in edits {
        buffer.push(edit);
    }
    match buffer.finish() {
        Ok(text) => Some(text),
        Err(err) => {
            debug!(node = %id, %err, "splice failed, rendering structurally");
            None
        }
    }
}

/// Whether `source[from..to]` holds nothing but whitespace and at most one comma.
fn only_separator(source: &str, from: usize, to: usize) -> bool {
    source
        .get(from..to)
        .map(str::trim)
        .is_some_and(|gap| gap.is_empty() || gap == ",")
}

/// The edit removing the ignored children `first..=last`, widened to whole
/// lines or an adjacent comma where that keeps the surrounding text well
/// formed.
fn deletion(tree: &CstTree, first: CstId, last: CstId, bounds: &Range<usize>) -> Edit {
    let source = tree.source();
    let (start, end) = (tree.node(first).start_byte, tree.node(last).end_byte);

    let first_line = line_start(source, start).max(bounds.start);
    let last_line = line_end(source, end);
    let before = &source[first_line..start];
    let rest = source.get(end..last_line).unwrap_or_default().trim();
    let rest = rest.strip_prefix(',').map_or(rest, str::trim_start);
    let whole_line = before.trim().is_empty()
        && last_line < bounds.end
        && (rest.is_empty() || rest.starts_with("//"));

    if whole_line {
        let mut from = first_line;
        for comment in leading_comments(tree, first) {
            if comment.start_byte >= bounds.start {
                from = from.min(line_start(source, comment.start_byte).max(bounds.start));
            }
        }
        let mut to = last_line + 1;
        let prev_blank = from > bounds.start && is_blank_line_before(source, from, bounds.start);
        if prev_blank {
            let next_end = line_end(source, to);
            if next_end < bounds.end && source[to..next_end].trim().is_empty() {
                to = next_end + 1;
            } else if source[to..bounds.end].trim().len() <= 1 {
                from = line_start(source, from - 1);
            }
        }
        // The last item of a list leaves a dangling separator behind.
        let after_comma = source[end..last_line].trim_start().starts_with(',');
        if !after_comma {
            if let Some(comma) = preceding_comma(source, from, bounds.start) {
                return Edit::delete(comma..to.saturating_sub(1));
            }
        }
        return Edit::delete(from..to);
    }

    let tail = &source[end..bounds.end];
    let gap = tail.len() - tail.trim_start().len();
    if tail.trim_start().starts_with(',') {
        let comma_end = end + gap + 1;
        let spaces = source[comma_end..bounds.end]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .count();
        return Edit::delete(start..comma_end + spaces);
    }
    if let Some(comma) = preceding_comma(source, start, bounds.start) {
        return Edit::delete(comma..end);
    }
    let trailing = source[end..bounds.end]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();
    Edit::delete(start..end + trailing)
}

/// Offset of a `,` that precedes `at` with only whitespace between.
fn preceding_comma(source: &str, at: usize, floor: usize) -> Option<usize> {
    let before = source.get(floor..at)?;
    let trimmed = before.trim_end();
    trimmed
        .ends_with(',')
        .then(|| floor + trimmed.len() - 1)
}

/// Whether the line ending just before `at` holds only whitespace.
fn is_blank_line_before(source: &str, at: usize, floor: usize) -> bool {
    if at == 0 || at <= floor {
        return false;
    }
    let prev_start = line_start(source, at - 1);
    prev_start >= floor && source[prev_start..at].trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    fn unit(source: &str) -> CompilationUnit {
        CompilationUnit::parse(source).unwrap()
    }

    #[test]
    fn test_line_helpers() {
        let source = "a\n    b c\n";
        assert_eq!(line_start(source, 7), 2);
        assert_eq!(line_end(source, 7), 9);
        assert_eq!(line_indent(source, 7), "    ");
        assert_eq!(line_indent(source, 0), "");
    }

    #[test]
    fn test_splice_renamed_child() {
        let mut unit = unit("class A {\n  void m() {\n    foo( a,b );\n  }\n}\n");
        let call = unit.find_all(NodeKind::MethodInvocation)[0];
        unit.edit(call).unwrap().set_name("bar").unwrap();
        let stmt = unit.parent(call).unwrap();
        let block = unit.parent(stmt).unwrap();
        assert_eq!(
            splice_node(&unit, block).unwrap(),
            "{\n    bar(a, b);\n  }"
        );
    }

    #[test]
    fn test_splice_removes_whole_line_with_comment() {
        let source = "class A {\n  void m() {\n    a();\n    // drop me\n    b();\n    c();\n  }\n}\n";
        let mut unit = unit(source);
        let stmts = unit.find_all(NodeKind::ExpressionStmt);
        unit.set_ignored(stmts[1]).unwrap();
        let block = unit.parent(stmts[1]).unwrap();
        assert_eq!(
            splice_node(&unit, block).unwrap(),
            "{\n    a();\n    c();\n  }"
        );
    }

    fn ident_named(unit: &CompilationUnit, name: &str) -> NodeId {
        unit.find_all(NodeKind::Ident)
            .into_iter()
            .find(|&i| unit.data(i).unwrap().name() == Some(name))
            .unwrap()
    }

    #[test]
    fn test_splice_removes_inline_list_item() {
        let mut unit = unit("class A { void m() { f(a, b, c); } }");
        let b = ident_named(&unit, "b");
        let c = ident_named(&unit, "c");
        unit.set_ignored(b).unwrap();
        let call = unit.parent(b).unwrap();
        assert_eq!(splice_node(&unit, call).unwrap(), "f(a, c)");
        unit.set_ignored(c).unwrap();
        assert_eq!(splice_node(&unit, call).unwrap(), "f(a)");
    }

    #[test]
    fn test_adjacent_ignored_arguments_cut_together() {
        let source = "class A {\n  void m() {\n    f(a,   b, c); // keep\n  }\n}\n";
        let mut unit = unit(source);
        unit.set_ignored(ident_named(&unit, "b")).unwrap();
        unit.set_ignored(ident_named(&unit, "c")).unwrap();
        let call = unit.find_all(NodeKind::MethodInvocation)[0];
        assert_eq!(splice_node(&unit, call).unwrap(), "f(a)");
        let (_, text) = crate::save::save(&mut unit);
        assert_eq!(text, source.replace("f(a,   b, c)", "f(a)"));
    }

    #[test]
    fn test_adjacent_ignored_statements_cut_together() {
        let source = "class A {\n  void m() {\n    a();\n    b();\n    c();\n    d();\n  }\n}\n";
        let mut unit = unit(source);
        let stmts = unit.find_all(NodeKind::ExpressionStmt);
        unit.set_ignored(stmts[1]).unwrap();
        unit.set_ignored(stmts[2]).unwrap();
        let block = unit.parent(stmts[1]).unwrap();
        assert_eq!(
            splice_node(&unit, block).unwrap(),
            "{\n    a();\n    d();\n  }"
        );
    }

    #[test]
    fn test_splice_last_line_item_takes_comma() {
        let source = "enum E {\n    A,\n    B\n}\n";
        let mut unit = unit(source);
        let constants = unit.find_all(NodeKind::EnumConstant);
        unit.set_ignored(constants[1]).unwrap();
        let decl = unit.parent(constants[1]).unwrap();
        assert_eq!(splice_node(&unit, decl).unwrap(), "enum E {\n    A\n}");
    }

    #[test]
    fn test_splice_collapses_blank_lines() {
        let source = "class A {\n  int a;\n\n  int b;\n\n  int c;\n}\n";
        let mut unit = unit(source);
        let fields = unit.find_all(NodeKind::VariableDecl);
        unit.set_ignored(fields[1]).unwrap();
        let decl = unit.parent(fields[1]).unwrap();
        assert_eq!(
            splice_node(&unit, decl).unwrap(),
            "class A {\n  int a;\n\n  int c;\n}"
        );
    }

    #[test]
    fn test_splice_requires_original() {
        let mut unit = unit("class A {}");
        let ident = unit.ident("x").unwrap();
        assert_eq!(splice_node(&unit, ident), None);
    }
}
