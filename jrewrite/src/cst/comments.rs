//! Comment extraction from Java source using CST.
//!
//! Tree-sitter captures comments as extra nodes, making extraction reliable.
//! Structured re-rendering uses these helpers to carry comments that sit
//! between list items along with the item they precede.

use super::parser::{CstId, CstTree};

/// A comment extracted from source code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// The comment text (including `//` or `/*` prefix)
    pub text: String,
    /// Start byte offset
    pub start_byte: usize,
    /// End byte offset
    pub end_byte: usize,
    /// Line number (1-indexed)
    pub line: usize,
    /// Whether this comment is inline (after code on same line)
    pub is_inline: bool,
}

impl Comment {
    fn from_node(tree: &CstTree, id: CstId) -> Self {
        let node = tree.node(id);
        let source = tree.source();
        let line_start = source[..node.start_byte]
            .rfind('\n')
            .map_or(0, |pos| pos + 1);
        let before_comment = &source[line_start..node.start_byte];
        Self {
            text: tree.text(id).to_owned(),
            start_byte: node.start_byte,
            end_byte: node.end_byte,
            line: node.start_point.row + 1,
            is_inline: before_comment.chars().any(|c| !c.is_whitespace()),
        }
    }

    /// Check if this comment is immediately before the given byte position
    /// (no code between)
    #[must_use]
    pub fn is_attached_before(&self, byte_pos: usize, source: &str) -> bool {
        if self.end_byte > byte_pos {
            return false;
        }
        source[self.end_byte..byte_pos]
            .chars()
            .all(char::is_whitespace)
    }
}

/// Extract all comments from a CST tree, in source order
#[must_use]
pub fn extract_comments(tree: &CstTree) -> Vec<Comment> {
    let mut ids: Vec<CstId> = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        if node.is_comment() {
            ids.push(id);
        }
        stack.extend(node.children.iter().rev().copied());
    }
    ids.into_iter()
        .map(|id| Comment::from_node(tree, id))
        .collect()
}

/// Comments that directly precede `id` among its siblings.
///
/// Walks backwards from `id` and stops at the first non-comment sibling, so
/// only the contiguous run of own-line comments in front of the node is
/// returned. A comment trailing the previous sibling on its line belongs to
/// that sibling and is skipped.
#[must_use]
pub fn leading_comments(tree: &CstTree, id: CstId) -> Vec<Comment> {
    let Some(parent) = tree.node(id).parent else {
        return Vec::new();
    };
    let siblings = &tree.node(parent).children;
    let Some(index) = siblings.iter().position(|&s| s == id) else {
        return Vec::new();
    };

    let mut run = Vec::new();
    for &sibling in siblings[..index].iter().rev() {
        if !tree.node(sibling).is_comment() {
            break;
        }
        run.push(sibling);
    }
    run.reverse();

    run.into_iter()
        .map(|c| Comment::from_node(tree, c))
        .filter(|c| !c.is_inline)
        .collect()
}

/// The comment trailing `id` on the line it ends on, if any.
///
/// A list separator between the node and the comment is skipped, so
/// `A, // note` attaches `// note` to `A`.
#[must_use]
pub fn trailing_comment(tree: &CstTree, id: CstId) -> Option<Comment> {
    let node = tree.node(id);
    let siblings = &tree.node(node.parent?).children;
    let index = siblings.iter().position(|&s| s == id)?;
    let row = node.end_point.row;
    for &sibling in &siblings[index + 1..] {
        let next = tree.node(sibling);
        if next.is_comment() {
            return (next.start_point.row == row).then(|| Comment::from_node(tree, sibling));
        }
        if next.is_named || !matches!(next.kind, "," | ";") {
            return None;
        }
    }
    None
}

/// Comments after the last non-comment child of a container such as a block.
///
/// These have no following node to attach to and would otherwise be lost
/// when the container is re-rendered.
#[must_use]
pub fn dangling_comments(tree: &CstTree, container: CstId) -> Vec<Comment> {
    let children = &tree.node(container).children;
    let mut run = Vec::new();
    for &child in children.iter().rev() {
        let node = tree.node(child);
        if node.is_comment() {
            run.push(child);
        } else if node.is_named {
            break;
        }
    }
    run.reverse();
    run.into_iter()
        .map(|c| Comment::from_node(tree, c))
        .filter(|c| !c.is_inline)
        .collect()
}

/// End offset of the file header: the run of comments before the first
/// non-comment node of the file.
#[must_use]
pub fn header_end(tree: &CstTree) -> Option<usize> {
    let mut end = None;
    for child in tree.children(tree.root()) {
        let node = tree.node(child);
        if !node.is_comment() {
            break;
        }
        end = Some(node.end_byte);
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::CstParser;

    fn parse(source: &str) -> CstTree {
        CstParser::new().unwrap().parse(source).unwrap()
    }

    #[test]
    fn test_extract_comments() {
        let tree = parse("// one\nclass A { /* two */ }\n");
        let comments = extract_comments(&tree);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "// one");
        assert_eq!(comments[0].line, 1);
        assert!(!comments[0].is_inline);
        assert!(comments[1].is_inline);
    }

    #[test]
    fn test_leading_comments_in_block() {
        let source = "class A {\n  void m() {\n    a();\n    // why\n    b();\n  }\n}\n";
        let tree = parse(source);
        let stmts = tree.find_by_kind("expression_statement");
        assert_eq!(stmts.len(), 2);
        assert!(leading_comments(&tree, stmts[0]).is_empty());
        let leading = leading_comments(&tree, stmts[1]);
        assert_eq!(leading.len(), 1);
        assert_eq!(leading[0].text, "// why");
    }

    #[test]
    fn test_dangling_comments() {
        let source = "class A {\n  void m() {\n    a();\n    // tail\n  }\n}\n";
        let tree = parse(source);
        let block = tree.find_by_kind("block")[0];
        let dangling = dangling_comments(&tree, block);
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].text, "// tail");
    }

    #[test]
    fn test_trailing_comment() {
        let source = "enum E {\n  A, // first\n  B\n  // own line\n}\n";
        let tree = parse(source);
        let constants = tree.find_by_kind("enum_constant");
        let trailing = trailing_comment(&tree, constants[0]).unwrap();
        assert_eq!(trailing.text, "// first");
        assert!(trailing_comment(&tree, constants[1]).is_none());
    }

    #[test]
    fn test_header_end() {
        let source = "/* license */\n// more\npackage a;\n";
        let tree = parse(source);
        assert_eq!(header_end(&tree), Some(source.find("package").unwrap() - 1));
        assert_eq!(header_end(&parse("package a;\n")), None);
    }

    #[test]
    fn test_attached_before() {
        let source = "// c\nint x;";
        let tree = parse(source);
        let comments = extract_comments(&tree);
        assert!(comments[0].is_attached_before(5, source));
    }
}
