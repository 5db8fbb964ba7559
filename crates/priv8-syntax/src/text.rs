//! Bounds-checked text and position accessors for syntax nodes.
//!
//! Byte offsets come from the parser, which evolves independently of the
//! buffers callers hand in. Every accessor here therefore checks the node's
//! range against the buffer and resolves bad ranges to an empty value instead
//! of failing.

use std::borrow::Cow;
use std::fmt::Write as _;

use tree_sitter::Node;

use crate::position::point_to_one_based;

/// Rendered by [`position_text`] when no node is given.
pub const UNKNOWN_POSITION: &str = "unknown position";

/// Longest node text, in bytes, that [`node_to_string`] prints untruncated.
const DEBUG_TEXT_LIMIT: usize = 40;
/// Bytes kept when the debug text is truncated; the marker fills the rest.
const DEBUG_TEXT_KEEP: usize = 37;
const ELLIPSIS: &[u8] = b"...";

/// Returns the node's bytes when its range lies inside `source`.
pub(crate) fn checked_span<'s>(node: Node<'_>, source: &'s [u8]) -> Option<&'s [u8]> {
    source.get(node.start_byte()..node.end_byte())
}

/// Returns the raw bytes spanned by a node.
///
/// Yields an empty slice when the node is absent or when its range is
/// inverted or reaches past the end of `source`.
#[must_use]
pub fn node_bytes<'s, 't>(node: impl Into<Option<Node<'t>>>, source: &'s [u8]) -> &'s [u8] {
    node.into()
        .and_then(|present| checked_span(present, source))
        .unwrap_or_default()
}

/// Returns the text spanned by a node.
///
/// The source is treated as arbitrary bytes; invalid UTF-8 sequences are
/// replaced rather than rejected. Absent nodes and out-of-range offsets yield
/// an empty string.
///
/// # Examples
///
/// ```
/// use priv8_syntax::{BuiltinGrammar, GrammarRegistry, node_text};
///
/// let mut registry = GrammarRegistry::new();
/// registry.load_builtin(BuiltinGrammar::Bash)?;
/// let parsed = registry.parse("bash", "echo hello")?;
///
/// assert_eq!(node_text(parsed.root_node(), parsed.source()), "echo hello");
/// assert_eq!(node_text(parsed.root_node(), b"echo"), "");
/// # Ok::<(), priv8_syntax::SyntaxError>(())
/// ```
#[must_use]
pub fn node_text<'s, 't>(node: impl Into<Option<Node<'t>>>, source: &'s [u8]) -> Cow<'s, str> {
    String::from_utf8_lossy(node_bytes(node, source))
}

/// Renders a node's span as `line R1:C1 to R2:C2` using one-based rows and
/// columns.
///
/// Returns [`UNKNOWN_POSITION`] when no node is given.
#[must_use]
pub fn position_text<'t>(node: impl Into<Option<Node<'t>>>) -> String {
    let Some(present) = node.into() else {
        return UNKNOWN_POSITION.to_owned();
    };

    let (start_line, start_column) = point_to_one_based(present.start_position());
    let (end_line, end_column) = point_to_one_based(present.end_position());
    format!("line {start_line}:{start_column} to {end_line}:{end_column}")
}

/// Pretty-prints a node and its named descendants for debugging.
///
/// Each level lists the node type, its zero-based range, its text (when a
/// source is given), and its child counts, followed by the named children
/// indented by two further spaces. Text longer than 40 bytes is cut to 37
/// bytes plus `...`; the cut is byte-based and may split a multi-byte
/// character.
///
/// The output format is diagnostic only and may change.
#[must_use]
pub fn node_to_string<'t>(
    node: impl Into<Option<Node<'t>>>,
    source: Option<&[u8]>,
    indent: &str,
) -> String {
    let Some(present) = node.into() else {
        return format!("{indent}<nil>");
    };

    let mut out = String::new();
    write_node(&mut out, present, source, indent)
        .map(|()| out)
        .unwrap_or_default()
}

fn write_node(
    out: &mut String,
    node: Node<'_>,
    source: Option<&[u8]>,
    indent: &str,
) -> std::fmt::Result {
    let start = node.start_position();
    let end = node.end_position();
    writeln!(out, "{indent}Type: {}", node.kind())?;
    writeln!(
        out,
        "{indent}Range: ({},{}) - ({},{})",
        start.row, start.column, end.row, end.column
    )?;

    if let Some(bytes) = source {
        let text = debug_text(node_bytes(node, bytes));
        writeln!(out, "{indent}Text: \"{}\"", text.escape_ascii())?;
    }

    writeln!(out, "{indent}Children: {}", node.child_count())?;

    if node.child_count() > 0 {
        writeln!(out, "{indent}Named Children: {}", node.named_child_count())?;

        let child_indent = format!("{indent}  ");
        let mut cursor = node.walk();
        for (position, child) in node.named_children(&mut cursor).enumerate() {
            writeln!(out, "{indent}Named Child {position}:")?;
            write_node(out, child, source, &child_indent)?;
        }
    }

    Ok(())
}

fn debug_text(bytes: &[u8]) -> Cow<'_, [u8]> {
    match bytes.get(..DEBUG_TEXT_KEEP) {
        Some(kept) if bytes.len() > DEBUG_TEXT_LIMIT => {
            let mut truncated = kept.to_vec();
            truncated.extend_from_slice(ELLIPSIS);
            Cow::Owned(truncated)
        }
        _ => Cow::Borrowed(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    use crate::grammar::BuiltinGrammar;
    use crate::parser::{ParsedSource, Parser};

    #[fixture]
    fn bash() -> Parser {
        Parser::new("bash", &BuiltinGrammar::Bash.language()).expect("parser init")
    }

    fn first_of_kind<'t>(parsed: &'t ParsedSource, kind: &str) -> Node<'t> {
        crate::walker::find_nodes_of_type(parsed.root_node(), kind)
            .into_iter()
            .next()
            .expect("node of kind")
    }

    #[rstest]
    fn node_text_returns_exact_span(mut bash: Parser) {
        let parsed = bash.parse("NAME=value\necho $NAME").expect("parse");
        let name = first_of_kind(&parsed, "variable_name");

        assert_eq!(node_text(name, parsed.source()), "NAME");
    }

    #[rstest]
    fn node_text_is_empty_when_range_exceeds_source(mut bash: Parser) {
        let parsed = bash.parse("echo hello world").expect("parse");

        assert_eq!(node_text(parsed.root_node(), b"echo"), "");
        assert!(node_bytes(parsed.root_node(), b"").is_empty());
    }

    #[test]
    fn node_text_is_empty_for_absent_node() {
        assert_eq!(node_text(None::<Node<'_>>, b"anything"), "");
    }

    #[rstest]
    fn node_text_replaces_invalid_utf8(mut bash: Parser) {
        let parsed = bash.parse(b"echo \xff".as_slice()).expect("parse");

        assert_eq!(node_bytes(parsed.root_node(), parsed.source()), b"echo \xff");
        assert_eq!(node_text(parsed.root_node(), parsed.source()), "echo \u{fffd}");
    }

    #[rstest]
    fn position_text_is_one_based(mut bash: Parser) {
        let parsed = bash.parse("echo one\nTOKEN=abc").expect("parse");
        let assignment = first_of_kind(&parsed, "variable_assignment");

        assert_eq!(position_text(assignment), "line 2:1 to 2:10");
    }

    #[test]
    fn position_text_has_sentinel_for_absent_node() {
        assert_eq!(position_text(None::<Node<'_>>), "unknown position");
    }

    #[rstest]
    fn node_to_string_truncates_long_text(mut bash: Parser) {
        let comment = format!("#{}", "x".repeat(40));
        assert_eq!(comment.len(), 41);
        let parsed = bash.parse(comment.as_str()).expect("parse");
        let node = first_of_kind(&parsed, "comment");

        let dump = node_to_string(node, Some(parsed.source()), "");
        let expected = format!("Text: \"#{}...\"\n", "x".repeat(36));
        assert!(dump.contains(&expected), "unexpected dump: {dump}");
    }

    #[rstest]
    fn node_to_string_keeps_text_at_limit(mut bash: Parser) {
        let comment = format!("#{}", "y".repeat(39));
        let parsed = bash.parse(comment.as_str()).expect("parse");
        let node = first_of_kind(&parsed, "comment");

        let dump = node_to_string(node, Some(parsed.source()), "");
        assert!(dump.contains(&format!("Text: \"{comment}\"\n")));
    }

    #[rstest]
    fn node_to_string_indents_named_children(mut bash: Parser) {
        let parsed = bash.parse("A=1").expect("parse");

        let dump = node_to_string(parsed.root_node(), None, "");
        assert!(dump.starts_with("Type: program\n"));
        assert!(dump.contains("Named Child 0:\n  Type: variable_assignment\n"));
        assert!(!dump.contains("Text:"));
    }

    #[test]
    fn node_to_string_marks_absent_node() {
        assert_eq!(node_to_string(None::<Node<'_>>, None, "    "), "    <nil>");
    }

    #[test]
    fn debug_text_splits_multibyte_characters_on_bytes() {
        let text = "é".repeat(21);
        let truncated = debug_text(text.as_bytes());

        assert_eq!(truncated.len(), DEBUG_TEXT_KEEP + ELLIPSIS.len());
        assert_eq!(truncated.get(..DEBUG_TEXT_KEEP), text.as_bytes().get(..DEBUG_TEXT_KEEP));
    }
}
