//! Error types for grammar, query, and parsing operations.
//!
//! Every fallible operation in this crate returns [`SyntaxError`]. Conditions
//! that are expected at tree edges (out-of-range byte offsets, absent nodes)
//! are not errors; the accessors resolve them to empty or sentinel values.

use thiserror::Error;

/// Errors from the grammar registry, the query engine, and the parser.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// The grammar handle or its name cannot be loaded.
    #[error("invalid grammar '{grammar}': {reason}")]
    InvalidGrammar {
        /// Name the grammar was to be registered under.
        grammar: String,
        /// Why the handle was rejected.
        reason: String,
    },

    /// No grammar has been loaded under this name.
    #[error("grammar '{grammar}' is not loaded")]
    GrammarNotFound {
        /// The grammar name that was looked up.
        grammar: String,
    },

    /// The grammar is loaded but has no query with this name.
    #[error("query '{query}' is not registered for grammar '{grammar}'")]
    QueryNotFound {
        /// The grammar the query was looked up under.
        grammar: String,
        /// The query name that was looked up.
        query: String,
    },

    /// Pattern text failed to compile against the grammar.
    #[error("failed to compile query '{query}' for grammar '{grammar}': {source}")]
    QueryCompile {
        /// The grammar the pattern was compiled against.
        grammar: String,
        /// The name the query was to be registered under.
        query: String,
        /// Diagnostic reported by the Tree-sitter query compiler.
        #[source]
        source: tree_sitter::QueryError,
    },

    /// The Tree-sitter parser rejected the grammar.
    #[error("failed to initialise parser for '{grammar}': {message}")]
    ParserInit {
        /// The grammar that failed to initialise.
        grammar: String,
        /// Description of the failure.
        message: String,
    },

    /// The parser produced no tree for the source.
    #[error("failed to parse source with grammar '{grammar}'")]
    ParseFailure {
        /// The grammar used for the attempt.
        grammar: String,
    },
}

impl SyntaxError {
    /// Creates an invalid grammar error.
    #[must_use]
    pub fn invalid_grammar(grammar: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGrammar {
            grammar: grammar.into(),
            reason: reason.into(),
        }
    }

    /// Creates a grammar-not-found error.
    #[must_use]
    pub fn grammar_not_found(grammar: impl Into<String>) -> Self {
        Self::GrammarNotFound {
            grammar: grammar.into(),
        }
    }

    /// Creates a query-not-found error.
    #[must_use]
    pub fn query_not_found(grammar: impl Into<String>, query: impl Into<String>) -> Self {
        Self::QueryNotFound {
            grammar: grammar.into(),
            query: query.into(),
        }
    }

    /// Creates a query compilation error wrapping the compiler diagnostic.
    #[must_use]
    pub fn query_compile(
        grammar: impl Into<String>,
        query: impl Into<String>,
        source: tree_sitter::QueryError,
    ) -> Self {
        Self::QueryCompile {
            grammar: grammar.into(),
            query: query.into(),
            source,
        }
    }

    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(grammar: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParserInit {
            grammar: grammar.into(),
            message: message.into(),
        }
    }

    /// Creates a parse failure error.
    #[must_use]
    pub fn parse_failure(grammar: impl Into<String>) -> Self {
        Self::ParseFailure {
            grammar: grammar.into(),
        }
    }

    /// Returns true for both not-found cases: an unknown grammar or an
    /// unknown query under a loaded grammar.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GrammarNotFound { .. } | Self::QueryNotFound { .. }
        )
    }
}
