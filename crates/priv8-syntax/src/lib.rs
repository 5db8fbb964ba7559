//! Syntax-aware substrate for locating and annotating sensitive content in
//! scripts.
//!
//! This crate sits between Tree-sitter, which turns bytes into concrete
//! syntax trees, and a policy layer that decides what counts as sensitive.
//! It provides:
//!
//! - **Grammar registry** via [`GrammarRegistry`]: grammars keyed by name,
//!   each with its own set of named, compiled queries
//! - **Query execution** via [`GrammarRegistry::execute_query`], producing an
//!   ordered [`MatchSet`]
//! - **Tree search** via [`find_nodes_of_type`], [`find_nodes_matching`],
//!   [`find_nodes_by_text`], and [`find_nodes_containing_text`]
//! - **Text access** via [`node_text`], [`position_text`], and the debug
//!   printer [`node_to_string`], all bounds-checked against the source
//! - **Annotations** via [`PrivacyNode`], which marks a node as a finding
//!
//! The crate decides nothing about what is sensitive and never rewrites the
//! source.
//!
//! # Example
//!
//! ```
//! use priv8_syntax::{BuiltinGrammar, GrammarRegistry};
//!
//! let mut registry = GrammarRegistry::new();
//! registry.load_builtin(BuiltinGrammar::Bash)?;
//! registry.register_query(
//!     "bash",
//!     "assignments",
//!     "(variable_assignment name: (variable_name) @name)",
//! )?;
//!
//! let parsed = registry.parse("bash", "DB_PASSWORD=hunter2\necho done")?;
//! let matches =
//!     registry.execute_query("bash", "assignments", parsed.root_node(), parsed.source())?;
//!
//! let findings: Vec<_> = matches
//!     .captures_named("name")
//!     .filter_map(|capture| parsed.annotate(capture.node()))
//!     .map(|found| found.with_issue_type("credential").with_sensitivity(8))
//!     .collect();
//!
//! assert_eq!(findings.len(), 1);
//! assert_eq!(findings[0].position_text(), "line 1:1 to 1:12");
//! # Ok::<(), priv8_syntax::SyntaxError>(())
//! ```

mod annotation;
mod error;
mod grammar;
mod parser;
mod position;
mod query;
mod registry;
mod text;
mod walker;

pub use annotation::{ContextValue, DEFAULT_SENSITIVITY, PrivacyNode};
pub use error::SyntaxError;
pub use grammar::{BuiltinGrammar, GrammarNameError};
pub use parser::{NodeKey, ParsedSource, Parser, SyntaxErrorInfo, TreeGeneration};
pub use query::{MatchSet, QueryCapture, QueryMatch};
pub use registry::GrammarRegistry;
pub use text::{UNKNOWN_POSITION, node_bytes, node_text, node_to_string, position_text};
pub use walker::{
    find_nodes_by_text, find_nodes_containing_text, find_nodes_matching, find_nodes_of_type,
};

/// Re-exported so callers can name node and grammar types without adding
/// their own `tree-sitter` dependency.
pub use tree_sitter::{Language, Node};

#[cfg(test)]
mod tests;
