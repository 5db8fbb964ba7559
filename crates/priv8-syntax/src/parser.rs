//! Tree-sitter parsing wrapper with node indexing.
//!
//! A [`Parser`] is bound to one grammar. Each call to [`Parser::parse`] yields
//! a [`ParsedSource`] that owns the tree and a copy of the source bytes, so
//! nodes borrowed from it can never outlive the buffer their offsets refer to.
//!
//! Every parse receives a fresh [`TreeGeneration`], and every node in the tree
//! is numbered in pre-order. The pair forms a [`NodeKey`], which identifies a
//! node within the process without relying on memory addresses.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tree_sitter::Node;

use crate::annotation::PrivacyNode;
use crate::error::SyntaxError;
use crate::position::point_to_one_based;
use crate::walker::visit_preorder;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Monotonically increasing identifier assigned to each parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TreeGeneration(u64);

impl TreeGeneration {
    fn fresh() -> Self {
        Self(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw generation number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TreeGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a node: the parse it belongs to and its pre-order index.
///
/// Keys are comparable and serialisable, and they stay meaningful only
/// within the process that produced the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeKey {
    /// The parse the node belongs to.
    pub generation: TreeGeneration,
    /// Pre-order position of the node in its tree; the root is 0.
    pub index: u32,
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.generation, self.index)
    }
}

/// Result of parsing a source buffer.
///
/// Tree-sitter is error-tolerant, so a parse result may contain both a valid
/// tree and error nodes.
pub struct ParsedSource {
    tree: tree_sitter::Tree,
    source: Vec<u8>,
    grammar: String,
    generation: TreeGeneration,
    /// Tree-sitter node id to pre-order index.
    index: HashMap<usize, u32>,
}

impl ParsedSource {
    fn new(tree: tree_sitter::Tree, source: Vec<u8>, grammar: String) -> Self {
        let mut index = HashMap::new();
        let mut next: u32 = 0;
        visit_preorder(tree.root_node(), |node| {
            index.insert(node.id(), next);
            next = next.saturating_add(1);
        });

        Self {
            tree,
            source,
            grammar,
            generation: TreeGeneration::fresh(),
            index,
        }
    }

    /// Returns the parsed syntax tree.
    #[must_use]
    pub const fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// Returns the root node of the syntax tree.
    #[must_use]
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Returns the bytes that were parsed.
    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Returns the name of the grammar used for the parse.
    #[must_use]
    pub fn grammar(&self) -> &str {
        &self.grammar
    }

    /// Returns the generation assigned to this parse.
    #[must_use]
    pub const fn generation(&self) -> TreeGeneration {
        self.generation
    }

    /// Returns the number of nodes in the tree, named and anonymous.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    /// Returns the key for a node of this tree.
    ///
    /// Returns `None` for nodes that belong to another tree.
    #[must_use]
    pub fn node_key(&self, node: Node<'_>) -> Option<NodeKey> {
        let index = *self.index.get(&node.id())?;
        Some(NodeKey {
            generation: self.generation,
            index,
        })
    }

    /// Wraps a node of this tree in a fresh [`PrivacyNode`].
    ///
    /// Returns `None` for nodes that belong to another tree.
    #[must_use]
    pub fn annotate<'t>(&'t self, node: Node<'t>) -> Option<PrivacyNode<'t>> {
        self.node_key(node).map(|key| PrivacyNode::new(node, key))
    }

    /// Returns whether the tree contains any `ERROR` or `MISSING` nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Collects all syntax errors found in the tree, in pre-order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        visit_preorder(self.tree.root_node(), |node| {
            if node.is_error() || node.is_missing() {
                errors.push(SyntaxErrorInfo::from_node(node, &self.source));
            }
        });
        errors
    }
}

impl fmt::Debug for ParsedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedSource")
            .field("grammar", &self.grammar)
            .field("generation", &self.generation)
            .field("source_len", &self.source.len())
            .field("node_count", &self.index.len())
            .finish_non_exhaustive()
    }
}

/// Information about a syntax error found during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Byte range of the error in the source.
    pub byte_range: Range<usize>,
    /// Line number (one-based) where the error starts.
    pub line: u32,
    /// Column number (one-based) where the error starts.
    pub column: u32,
    /// A snippet of the problematic source text.
    pub context: String,
    /// Human-readable description of the error.
    pub message: String,
}

impl SyntaxErrorInfo {
    fn from_node(node: Node<'_>, source: &[u8]) -> Self {
        let byte_range = node.byte_range();

        // Extract context: the text of the error node, truncated if too long
        let context = source
            .get(byte_range.clone())
            .map(|bytes| {
                let text = String::from_utf8_lossy(bytes);
                if text.len() > 50 {
                    let truncated: String = text.chars().take(47).collect();
                    format!("{truncated}...")
                } else {
                    text.into_owned()
                }
            })
            .unwrap_or_default();

        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "syntax error".to_owned()
        };

        let (line, column) = point_to_one_based(node.start_position());

        Self {
            byte_range,
            line,
            column,
            context,
            message,
        }
    }
}

/// Tree-sitter parser bound to a single grammar.
///
/// Obtain one from [`GrammarRegistry::create_parser`]. Parsers do not share
/// state, so each caller can hold its own.
///
/// [`GrammarRegistry::create_parser`]: crate::GrammarRegistry::create_parser
pub struct Parser {
    inner: tree_sitter::Parser,
    grammar: String,
}

impl Parser {
    /// Creates a parser for `language`, reporting errors under `grammar`.
    ///
    /// # Errors
    ///
    /// Returns an error if Tree-sitter rejects the grammar, for example
    /// because its ABI version is incompatible with the linked runtime.
    pub fn new(grammar: &str, language: &tree_sitter::Language) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(language)
            .map_err(|e| SyntaxError::parser_init(grammar, e.to_string()))?;

        Ok(Self {
            inner,
            grammar: grammar.to_owned(),
        })
    }

    /// Returns the name of the grammar this parser is bound to.
    #[must_use]
    pub fn grammar(&self) -> &str {
        &self.grammar
    }

    /// Parses a source buffer.
    ///
    /// The buffer is treated as arbitrary bytes and is copied into the
    /// result. Syntax errors do not fail the parse; use
    /// [`ParsedSource::has_errors`] to check for them.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParseFailure`] if Tree-sitter produces no tree.
    pub fn parse(&mut self, source: impl Into<Vec<u8>>) -> Result<ParsedSource, SyntaxError> {
        let bytes = source.into();
        let tree = self
            .inner
            .parse(&bytes, None)
            .ok_or_else(|| SyntaxError::parse_failure(&self.grammar))?;

        let parsed = ParsedSource::new(tree, bytes, self.grammar.clone());
        tracing::debug!(
            grammar = %self.grammar,
            generation = %parsed.generation,
            nodes = parsed.node_count(),
            has_errors = parsed.has_errors(),
            "parsed source"
        );
        Ok(parsed)
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("grammar", &self.grammar)
            .finish_non_exhaustive()
    }
}
