//! Phase 2: Indent Parser
//!
//! Builds a tree of lines from the scanner output. A line's children are the
//! lines that follow it at a strictly greater indent, up to the next line at
//! its own indent or shallower. Open indentation levels live on an explicit
//! stack of frames, so nesting depth is bounded by memory rather than by the
//! call stack. One line of pushback hands a dedented line back to the caller
//! of [`parse_level`].

use crate::error::{ErrorKind, Result};
use crate::scanner::{Line, LineSource};
use std::cmp::Ordering;

/// A parsed line together with the lines nested under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode {
    pub line: Line,
    pub children: Vec<ParseNode>,
}

/// The top-level nodes of a file, in order.
pub type FileParse = Vec<ParseNode>;

impl ParseNode {
    fn leaf(line: Line) -> Self {
        Self {
            line,
            children: Vec::new(),
        }
    }

    /// The line text without indentation.
    pub fn content(&self) -> &str {
        &self.line.content
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl Drop for ParseNode {
    // Flatten before dropping so deep trees don't recurse through drop glue.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Options for the indent parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting depth below the top level, unlimited when `None`.
    pub max_depth: Option<usize>,
}

/// Parse all lines at `expected_indent` and deeper.
///
/// Stops at the first line indented less than `expected_indent`, which is
/// left in `source` for the caller, or at end of input.
pub fn parse_level(expected_indent: usize, source: &mut LineSource) -> Result<Vec<ParseNode>> {
    parse_nested(expected_indent, None, source)
}

/// Parse a whole source text starting at indent 0.
pub fn parse_file(input: &str, options: &ParseOptions) -> Result<FileParse> {
    let mut source = LineSource::new(input);
    parse_nested(0, options.max_depth, &mut source)
}

/// One open indentation level and the nodes read at it so far.
struct Frame {
    indent: usize,
    nodes: Vec<ParseNode>,
}

fn parse_nested(
    expected_indent: usize,
    max_depth: Option<usize>,
    source: &mut LineSource,
) -> Result<Vec<ParseNode>> {
    let mut stack = vec![Frame {
        indent: expected_indent,
        nodes: Vec::new(),
    }];

    while let Some(line) = source.next_line()? {
        // Close every nested level the line dedents out of
        while stack.len() > 1 && line.indent < stack[stack.len() - 1].indent {
            close_level(&mut stack);
        }

        let depth = stack.len() - 1;
        let frame = &mut stack[depth];
        match line.indent.cmp(&frame.indent) {
            Ordering::Less => {
                // Belongs to the caller's level
                source.undo();
                break;
            }
            Ordering::Equal => frame.nodes.push(ParseNode::leaf(line)),
            Ordering::Greater => {
                let Some(previous) = frame.nodes.last() else {
                    return Err(source.error(ErrorKind::InvalidIndentation));
                };
                source.check(previous.is_leaf(), ErrorKind::DuplicateNesting)?;
                if let Some(max) = max_depth {
                    source.check(depth < max, ErrorKind::TooMuchIndentation)?;
                }
                stack.push(Frame {
                    indent: line.indent,
                    nodes: vec![ParseNode::leaf(line)],
                });
            }
        }
    }

    while stack.len() > 1 {
        close_level(&mut stack);
    }
    Ok(stack.pop().map(|frame| frame.nodes).unwrap_or_default())
}

/// Pop the innermost level and hand its nodes to the line that opened it.
fn close_level(stack: &mut Vec<Frame>) {
    if let Some(frame) = stack.pop() {
        if let Some(owner) = stack.last_mut().and_then(|parent| parent.nodes.last_mut()) {
            owner.children = frame.nodes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Render a parse as nested `[content, [children]]` for compact asserts.
    fn shape(nodes: &[ParseNode]) -> String {
        let items: Vec<String> = nodes
            .iter()
            .map(|n| format!("[{}, {}]", n.content(), shape(&n.children)))
            .collect();
        format!("[{}]", items.join(", "))
    }

    fn parse(input: &str) -> Result<FileParse> {
        parse_file(input, &ParseOptions::default())
    }

    #[test]
    fn test_nesting_and_dedent() {
        let tree = parse("a\n    b\n        c\n    d\n").unwrap();
        assert_eq!(shape(&tree), "[[a, [[b, [[c, []]]], [d, []]]]]");
    }

    #[test]
    fn test_dedent_closes_several_levels() {
        let tree = parse("a\n  b\n    c\n      d\ne\n").unwrap();
        assert_eq!(shape(&tree), "[[a, [[b, [[c, [[d, []]]]]]]], [e, []]]");
    }

    #[test]
    fn test_siblings_keep_order() {
        let tree = parse("x\ny\n  y1\n  y2\nz\n").unwrap();
        assert_eq!(shape(&tree), "[[x, []], [y, [[y1, []], [y2, []]]], [z, []]]");
        assert_eq!(tree[1].children[1].line.line_no, 4);
    }

    #[test]
    fn test_comments_and_blanks_are_transparent() {
        let plain = parse("a\n    b\n        c\n    d\n").unwrap();
        let noisy = parse(
            "# leading\na\n\n    b\n  # odd indent comment\n        c\n\n\n    d\n# end\n",
        )
        .unwrap();
        assert_eq!(shape(&plain), shape(&noisy));
    }

    #[test]
    fn test_first_line_indented() {
        let err = parse("    a\n").unwrap_err();
        assert_eq!(err, ErrorKind::InvalidIndentation.at(1));
    }

    #[test]
    fn test_error_line_shifts_with_comments() {
        let err = parse("# one\n\n# three\n    a\n").unwrap_err();
        assert_eq!(err, ErrorKind::InvalidIndentation.at(4));
    }

    #[test]
    fn test_duplicate_nesting() {
        // `c` re-opens a level under `a` after `b` already did
        let err = parse("a\n        b\n    c\n").unwrap_err();
        assert_eq!(err, ErrorKind::DuplicateNesting.at(3));
    }

    #[test]
    fn test_max_depth() {
        let options = ParseOptions { max_depth: Some(1) };
        assert!(parse_file("a\n    b\n", &options).is_ok());
        let err = parse_file("a\n    b\n        c\n", &options).unwrap_err();
        assert_eq!(err, ErrorKind::TooMuchIndentation.at(3));

        let flat = ParseOptions { max_depth: Some(0) };
        let err = parse_file("a\n    b\n", &flat).unwrap_err();
        assert_eq!(err, ErrorKind::TooMuchIndentation.at(2));
    }

    #[test]
    fn test_parse_level_leaves_dedent_in_source() {
        let mut source = LineSource::new("  a\n  b\nc\n");
        let nodes = parse_level(2, &mut source).unwrap();
        assert_eq!(shape(&nodes), "[[a, []], [b, []]]");
        let rest = source.next_line().unwrap().unwrap();
        assert_eq!(rest.content, "c");
        assert_eq!(rest.indent, 0);
    }

    #[test]
    fn test_deep_nesting_without_limit() {
        let levels = 5000;
        let input: String = (0..levels).map(|i| format!("{}n{}\n", " ".repeat(i), i)).collect();
        let tree = parse(&input).unwrap();

        let mut depth = 0;
        let mut node = &tree[0];
        while let Some(child) = node.children.first() {
            assert_eq!(node.children.len(), 1);
            node = child;
            depth += 1;
        }
        assert_eq!(depth, levels - 1);
        assert_eq!(node.content(), format!("n{}", levels - 1));
        assert_eq!(node.line.line_no, levels);
    }

    #[test]
    fn test_dedent_between_levels() {
        // `d` sits between the indents of `a` and `b`
        let err = parse("a\n    b\n        c\n      d\n").unwrap_err();
        assert_eq!(err, ErrorKind::DuplicateNesting.at(4));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_scanner_errors_propagate() {
        let err = parse("a\n    b").unwrap_err();
        assert_eq!(err, ErrorKind::MalformedInput.at(2));
    }
}
