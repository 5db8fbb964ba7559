//! Predicate-driven search over syntax trees.
//!
//! All searches share one pre-order traversal: a parent is visited before its
//! children, and children are visited left to right across every child, named
//! or anonymous. Results therefore come back in a stable, reproducible order.
//! An absent root yields an empty result.

use tree_sitter::Node;

use crate::text::checked_span;

/// Finds every node, at any depth, whose type equals `kind`.
///
/// # Examples
///
/// ```
/// use priv8_syntax::{BuiltinGrammar, GrammarRegistry, find_nodes_of_type, node_text};
///
/// let mut registry = GrammarRegistry::new();
/// registry.load_builtin(BuiltinGrammar::Bash)?;
/// let parsed = registry.parse("bash", "A=1\nB=2")?;
///
/// let names: Vec<_> = find_nodes_of_type(parsed.root_node(), "variable_name")
///     .into_iter()
///     .map(|node| node_text(node, parsed.source()).into_owned())
///     .collect();
/// assert_eq!(names, ["A", "B"]);
/// # Ok::<(), priv8_syntax::SyntaxError>(())
/// ```
#[must_use]
pub fn find_nodes_of_type<'t>(root: impl Into<Option<Node<'t>>>, kind: &str) -> Vec<Node<'t>> {
    find_nodes_matching(root, |node| node.kind() == kind)
}

/// Finds every node for which `predicate` returns true.
pub fn find_nodes_matching<'t, P>(
    root: impl Into<Option<Node<'t>>>,
    mut predicate: P,
) -> Vec<Node<'t>>
where
    P: FnMut(Node<'t>) -> bool,
{
    let mut results = Vec::new();
    visit_preorder(root, |node| {
        if predicate(node) {
            results.push(node);
        }
    });
    results
}

/// Finds every node whose text satisfies `predicate`.
///
/// Nodes whose byte range does not fit inside `source` never match.
pub fn find_nodes_by_text<'t, P>(
    root: impl Into<Option<Node<'t>>>,
    source: &[u8],
    mut predicate: P,
) -> Vec<Node<'t>>
where
    P: FnMut(&str) -> bool,
{
    find_nodes_matching(root, |node| {
        checked_span(node, source).is_some_and(|bytes| predicate(&String::from_utf8_lossy(bytes)))
    })
}

/// Finds every node whose text contains `needle`.
///
/// Containment is inherited: when a leaf contains the needle, so do all of
/// its ancestors, and each of them is returned.
#[must_use]
pub fn find_nodes_containing_text<'t>(
    root: impl Into<Option<Node<'t>>>,
    source: &[u8],
    needle: &str,
) -> Vec<Node<'t>> {
    find_nodes_by_text(root, source, |text| text.contains(needle))
}

/// Visits `root` and all of its descendants in pre-order.
///
/// Uses a tree cursor instead of recursion so deeply nested scripts cannot
/// exhaust the stack. The cursor is bounded to `root` and never climbs above
/// it.
pub(crate) fn visit_preorder<'t>(
    root: impl Into<Option<Node<'t>>>,
    mut visit: impl FnMut(Node<'t>),
) {
    let Some(start) = root.into() else {
        return;
    };

    let mut cursor = start.walk();
    loop {
        visit(cursor.node());

        if cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}
