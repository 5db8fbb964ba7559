//! Query execution and owned match sets.
//!
//! Tree-sitter hands out matches through a streaming cursor whose items are
//! only valid until the next step. [`execute`] drains that cursor into a
//! [`MatchSet`] so results can be stored, compared, and iterated freely for
//! as long as the tree lives.

use std::ops::Range;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

/// A single captured node within a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCapture<'t> {
    name: String,
    index: u32,
    node: Node<'t>,
}

impl<'t> QueryCapture<'t> {
    /// Returns the capture name as written in the pattern, without `@`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the capture index within the query.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Returns the captured node.
    #[must_use]
    pub const fn node(&self) -> Node<'t> {
        self.node
    }

    /// Returns the byte range of the captured node.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.node.byte_range()
    }
}

/// One occurrence of a query pattern and the nodes it captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMatch<'t> {
    pattern_index: usize,
    captures: Vec<QueryCapture<'t>>,
}

impl<'t> QueryMatch<'t> {
    /// Returns the index of the pattern within the query that matched.
    #[must_use]
    pub const fn pattern_index(&self) -> usize {
        self.pattern_index
    }

    /// Returns the captures in the order Tree-sitter reported them.
    #[must_use]
    pub fn captures(&self) -> &[QueryCapture<'t>] {
        &self.captures
    }

    /// Returns the first capture with the given name.
    #[must_use]
    pub fn capture(&self, name: &str) -> Option<&QueryCapture<'t>> {
        self.captures.iter().find(|capture| capture.name == name)
    }
}

/// Ordered matches from one query execution over one tree or subtree.
///
/// The order is the query engine's traversal order and is reproducible for a
/// fixed tree and query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet<'t> {
    matches: Vec<QueryMatch<'t>>,
}

impl<'t> MatchSet<'t> {
    /// Returns the number of matches.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.matches.len()
    }

    /// Returns true when the query matched nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Iterates over the matches in order.
    pub fn iter(&self) -> std::slice::Iter<'_, QueryMatch<'t>> {
        self.matches.iter()
    }

    /// Returns the matches as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[QueryMatch<'t>] {
        &self.matches
    }

    /// Yields every capture named `name`, in match order.
    pub fn captures_named<'s>(
        &'s self,
        name: &'s str,
    ) -> impl Iterator<Item = &'s QueryCapture<'t>> + 's {
        self.matches
            .iter()
            .flat_map(|m| m.captures.iter())
            .filter(move |capture| capture.name == name)
    }
}

impl<'t> IntoIterator for MatchSet<'t> {
    type Item = QueryMatch<'t>;
    type IntoIter = std::vec::IntoIter<QueryMatch<'t>>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

impl<'s, 't> IntoIterator for &'s MatchSet<'t> {
    type Item = &'s QueryMatch<'t>;
    type IntoIter = std::slice::Iter<'s, QueryMatch<'t>>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Runs `query` over the subtree rooted at `root`.
///
/// The cursor only descends into `root`, so the cost is bounded by the size
/// of that subtree plus the number of matches. `source` is consulted for text
/// predicates such as `#eq?`.
pub(crate) fn execute<'t>(query: &Query, root: Node<'t>, source: &[u8]) -> MatchSet<'t> {
    let names = query.capture_names();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, root, source);

    let mut collected = Vec::new();
    while let Some(found) = matches.next() {
        let captures = found
            .captures
            .iter()
            .map(|capture| QueryCapture {
                name: names
                    .get(capture.index as usize)
                    .map(|name| (*name).to_owned())
                    .unwrap_or_default(),
                index: capture.index,
                node: capture.node,
            })
            .collect();
        collected.push(QueryMatch {
            pattern_index: found.pattern_index,
            captures,
        });
    }

    MatchSet { matches: collected }
}
