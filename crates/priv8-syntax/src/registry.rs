//! Catalogue of loaded grammars and their compiled queries.
//!
//! The registry is an ordinary value: construct it, load grammars, register
//! queries, then share it by reference. Loading and registration take
//! `&mut self`, so the borrow checker enforces a single writer. Once those
//! calls are done, every other operation takes `&self` and the registry can
//! be read from several threads at once.

use std::collections::HashMap;

use tree_sitter::{Language, Node, Query};

use crate::error::SyntaxError;
use crate::grammar::BuiltinGrammar;
use crate::parser::{ParsedSource, Parser};
use crate::query::{MatchSet, execute};

struct GrammarEntry {
    language: Language,
    queries: HashMap<String, Query>,
}

/// Grammars keyed by name, each with its own set of named queries.
#[derive(Default)]
pub struct GrammarRegistry {
    grammars: HashMap<String, GrammarEntry>,
}

impl GrammarRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `language` under `name`.
    ///
    /// Loading under a name that is already in use replaces the previous
    /// grammar and discards its queries.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::InvalidGrammar`] when `name` is blank, when the
    /// grammar's ABI version is outside the range the linked Tree-sitter
    /// runtime supports, or when the grammar defines no node kinds.
    pub fn load_grammar(&mut self, name: &str, language: Language) -> Result<(), SyntaxError> {
        validate_grammar(name, &language)?;

        let replaced = self
            .grammars
            .insert(
                name.to_owned(),
                GrammarEntry {
                    language,
                    queries: HashMap::new(),
                },
            )
            .is_some();
        tracing::debug!(grammar = name, replaced, "loaded grammar");
        Ok(())
    }

    /// Loads a bundled grammar under its canonical name.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`GrammarRegistry::load_grammar`].
    pub fn load_builtin(&mut self, grammar: BuiltinGrammar) -> Result<(), SyntaxError> {
        self.load_grammar(grammar.name(), grammar.language())
    }

    /// Returns the grammar loaded under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::GrammarNotFound`] if nothing is loaded under
    /// `name`.
    pub fn grammar(&self, name: &str) -> Result<&Language, SyntaxError> {
        self.entry(name).map(|entry| &entry.language)
    }

    /// Returns whether a grammar is loaded under `name`.
    #[must_use]
    pub fn contains_grammar(&self, name: &str) -> bool {
        self.grammars.contains_key(name)
    }

    /// Returns the names of all loaded grammars, sorted.
    #[must_use]
    pub fn grammar_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.grammars.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Compiles `pattern` against a loaded grammar and stores it as
    /// `query_name`, replacing any query of the same name.
    ///
    /// A pattern that fails to compile leaves the grammar's queries
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::GrammarNotFound`] if the grammar is not loaded,
    /// or [`SyntaxError::QueryCompile`] carrying the compiler diagnostic if
    /// the pattern is invalid.
    pub fn register_query(
        &mut self,
        grammar: &str,
        query_name: &str,
        pattern: &str,
    ) -> Result<(), SyntaxError> {
        let entry = self
            .grammars
            .get_mut(grammar)
            .ok_or_else(|| SyntaxError::grammar_not_found(grammar))?;

        let query = Query::new(&entry.language, pattern).map_err(|error| {
            tracing::warn!(grammar, query = query_name, %error, "query failed to compile");
            SyntaxError::query_compile(grammar, query_name, error)
        })?;

        tracing::debug!(
            grammar,
            query = query_name,
            patterns = query.pattern_count(),
            "registered query"
        );
        entry.queries.insert(query_name.to_owned(), query);
        Ok(())
    }

    /// Returns a registered query.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::GrammarNotFound`] if the grammar is not loaded,
    /// or [`SyntaxError::QueryNotFound`] if the grammar is loaded but has no
    /// query called `query_name`.
    pub fn query(&self, grammar: &str, query_name: &str) -> Result<&Query, SyntaxError> {
        self.entry(grammar)?
            .queries
            .get(query_name)
            .ok_or_else(|| SyntaxError::query_not_found(grammar, query_name))
    }

    /// Returns the names of the queries registered for a grammar, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::GrammarNotFound`] if the grammar is not loaded.
    pub fn query_names(&self, grammar: &str) -> Result<Vec<&str>, SyntaxError> {
        let mut names: Vec<_> = self
            .entry(grammar)?
            .queries
            .keys()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        Ok(names)
    }

    /// Creates an independent parser bound to a loaded grammar.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::GrammarNotFound`] if the grammar is not loaded,
    /// or [`SyntaxError::ParserInit`] if Tree-sitter rejects it.
    pub fn create_parser(&self, grammar: &str) -> Result<Parser, SyntaxError> {
        Parser::new(grammar, self.grammar(grammar)?)
    }

    /// Parses `source` with a fresh parser for `grammar`.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`GrammarRegistry::create_parser`] and
    /// [`Parser::parse`].
    pub fn parse(
        &self,
        grammar: &str,
        source: impl Into<Vec<u8>>,
    ) -> Result<ParsedSource, SyntaxError> {
        self.create_parser(grammar)?.parse(source)
    }

    /// Runs a registered query over the subtree rooted at `root`.
    ///
    /// `source` must be the buffer the tree was parsed from; it is read when
    /// the query uses text predicates. Zero matches is an empty set, not an
    /// error. Repeated runs over the same tree return identical sets.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`GrammarRegistry::query`].
    pub fn execute_query<'t>(
        &self,
        grammar: &str,
        query_name: &str,
        root: Node<'t>,
        source: &[u8],
    ) -> Result<MatchSet<'t>, SyntaxError> {
        let query = self.query(grammar, query_name)?;
        let matches = execute(query, root, source);
        tracing::debug!(
            grammar,
            query = query_name,
            root = root.kind(),
            matches = matches.len(),
            "executed query"
        );
        Ok(matches)
    }

    fn entry(&self, grammar: &str) -> Result<&GrammarEntry, SyntaxError> {
        self.grammars
            .get(grammar)
            .ok_or_else(|| SyntaxError::grammar_not_found(grammar))
    }
}

impl std::fmt::Debug for GrammarRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarRegistry")
            .field("grammars", &self.grammar_names())
            .finish()
    }
}

fn validate_grammar(name: &str, language: &Language) -> Result<(), SyntaxError> {
    check_grammar_shape(name, language.abi_version(), language.node_kind_count())
}

/// Checks the parts of a grammar handle that can be wrong without being
/// null: its name, its ABI version, and whether it defines any node kinds.
fn check_grammar_shape(name: &str, abi: usize, node_kinds: usize) -> Result<(), SyntaxError> {
    const SUPPORTED_ABI: std::ops::RangeInclusive<usize> =
        tree_sitter::MIN_COMPATIBLE_LANGUAGE_VERSION..=tree_sitter::LANGUAGE_VERSION;

    if name.trim().is_empty() {
        return Err(SyntaxError::invalid_grammar(name, "grammar name is empty"));
    }

    if !SUPPORTED_ABI.contains(&abi) {
        return Err(SyntaxError::invalid_grammar(
            name,
            format!(
                "ABI version {abi} is outside the supported range {}..={}",
                SUPPORTED_ABI.start(),
                SUPPORTED_ABI.end()
            ),
        ));
    }

    if node_kinds == 0 {
        return Err(SyntaxError::invalid_grammar(
            name,
            "grammar defines no node kinds",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> GrammarRegistry {
        let mut registry = GrammarRegistry::new();
        registry
            .load_builtin(BuiltinGrammar::Bash)
            .expect("load bash");
        registry
            .load_builtin(BuiltinGrammar::Python)
            .expect("load python");
        registry
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_names_are_invalid(#[case] name: &str) {
        let mut registry = GrammarRegistry::new();
        let err = registry
            .load_grammar(name, BuiltinGrammar::Bash.language())
            .expect_err("blank name");

        assert!(matches!(err, SyntaxError::InvalidGrammar { .. }));
        assert!(registry.grammar_names().is_empty());
    }

    #[rstest]
    #[case(0, 10)]
    #[case(tree_sitter::MIN_COMPATIBLE_LANGUAGE_VERSION - 1, 10)]
    #[case(tree_sitter::LANGUAGE_VERSION + 1, 10)]
    fn abi_outside_runtime_range_is_invalid(#[case] abi: usize, #[case] node_kinds: usize) {
        let err = check_grammar_shape("bash", abi, node_kinds).expect_err("bad abi");

        assert!(matches!(
            err,
            SyntaxError::InvalidGrammar { ref reason, .. }
                if reason.contains(&format!("ABI version {abi}"))
        ));
    }

    #[test]
    fn grammar_without_node_kinds_is_invalid() {
        let err = check_grammar_shape("bash", tree_sitter::LANGUAGE_VERSION, 0)
            .expect_err("no node kinds");

        assert_eq!(
            err.to_string(),
            "invalid grammar 'bash': grammar defines no node kinds"
        );
    }

    #[rstest]
    #[case(BuiltinGrammar::Bash)]
    #[case(BuiltinGrammar::Python)]
    #[case(BuiltinGrammar::Rust)]
    #[case(BuiltinGrammar::TypeScript)]
    fn bundled_grammars_pass_validation(#[case] grammar: BuiltinGrammar) {
        let language = grammar.language();
        let checked =
            check_grammar_shape(grammar.name(), language.abi_version(), language.node_kind_count());

        assert!(checked.is_ok());
    }

    #[rstest]
    fn loaded_grammars_are_listed(registry: GrammarRegistry) {
        assert_eq!(registry.grammar_names(), ["bash", "python"]);
        assert!(registry.contains_grammar("bash"));
        assert!(registry.grammar("bash").is_ok());
    }

    #[rstest]
    fn unknown_grammar_is_not_found(registry: GrammarRegistry) {
        let err = registry.grammar("cobol").expect_err("not loaded");
        assert!(matches!(err, SyntaxError::GrammarNotFound { ref grammar } if grammar == "cobol"));
        assert!(err.is_not_found());
    }

    #[rstest]
    fn reloading_replaces_grammar_and_drops_queries(mut registry: GrammarRegistry) {
        registry
            .register_query("bash", "comments", "(comment) @comment")
            .expect("register");

        registry
            .load_grammar("bash", BuiltinGrammar::Bash.language())
            .expect("reload");

        let err = registry.query("bash", "comments").expect_err("dropped");
        assert!(matches!(err, SyntaxError::QueryNotFound { .. }));
    }

    #[rstest]
    fn queries_are_scoped_to_their_grammar(mut registry: GrammarRegistry) {
        registry
            .register_query("bash", "q", "(comment) @comment")
            .expect("register");

        assert!(registry.query("bash", "q").is_ok());
        let err = registry.query("python", "q").expect_err("other grammar");
        assert!(matches!(
            err,
            SyntaxError::QueryNotFound { ref grammar, .. } if grammar == "python"
        ));
    }

    #[rstest]
    fn not_found_cases_are_distinguishable(registry: GrammarRegistry) {
        let missing_grammar = registry.query("cobol", "q").expect_err("grammar");
        let missing_query = registry.query("bash", "q").expect_err("query");

        assert!(matches!(missing_grammar, SyntaxError::GrammarNotFound { .. }));
        assert!(matches!(missing_query, SyntaxError::QueryNotFound { .. }));
    }

    #[rstest]
    fn registering_against_unknown_grammar_fails(mut registry: GrammarRegistry) {
        let err = registry
            .register_query("cobol", "q", "(comment) @c")
            .expect_err("not loaded");
        assert!(matches!(err, SyntaxError::GrammarNotFound { .. }));
    }

    #[rstest]
    #[case("(variable_assignment")]
    #[case("(no_such_node) @x")]
    #[case("(variable_assignment nonsense: (word)) @x")]
    fn compile_failure_leaves_queries_unchanged(
        mut registry: GrammarRegistry,
        #[case] pattern: &str,
    ) {
        registry
            .register_query("bash", "q", "(comment) @comment")
            .expect("register");
        let before = registry.query("bash", "q").expect("query").pattern_count();

        let err = registry
            .register_query("bash", "q", pattern)
            .expect_err("invalid pattern");
        assert!(matches!(err, SyntaxError::QueryCompile { .. }));

        let after = registry.query("bash", "q").expect("still registered");
        assert_eq!(after.pattern_count(), before);
        assert_eq!(after.capture_names(), ["comment"]);
        assert_eq!(registry.query_names("bash").expect("names"), ["q"]);
    }

    #[rstest]
    fn compile_error_quotes_diagnostic(mut registry: GrammarRegistry) {
        let err = registry
            .register_query("bash", "broken", "(no_such_node) @x")
            .expect_err("invalid pattern");

        let SyntaxError::QueryCompile { ref source, .. } = err else {
            panic!("expected compile error, got {err:?}");
        };
        assert!(err.to_string().ends_with(&source.to_string()));
        assert!(err.to_string().contains("broken"));
    }

    #[rstest]
    fn parsers_are_independent(registry: GrammarRegistry) {
        let mut first = registry.create_parser("bash").expect("parser");
        let mut second = registry.create_parser("bash").expect("parser");

        let a = first.parse("echo a").expect("parse");
        let b = second.parse("A=1").expect("parse");
        assert_eq!(a.root_node().child(0).map(|n| n.kind()), Some("command"));
        assert_eq!(
            b.root_node().child(0).map(|n| n.kind()),
            Some("variable_assignment")
        );
    }

    #[rstest]
    fn create_parser_requires_loaded_grammar(registry: GrammarRegistry) {
        let err = registry.create_parser("cobol").expect_err("not loaded");
        assert!(err.is_not_found());
    }

    #[rstest]
    fn execute_query_returns_empty_set_without_matches(mut registry: GrammarRegistry) {
        registry
            .register_query("bash", "comments", "(comment) @comment")
            .expect("register");
        let parsed = registry.parse("bash", "echo hi").expect("parse");

        let matches = registry
            .execute_query("bash", "comments", parsed.root_node(), parsed.source())
            .expect("execute");
        assert!(matches.is_empty());
    }

    #[rstest]
    fn execute_query_propagates_not_found(registry: GrammarRegistry) {
        let parsed = registry.parse("bash", "echo hi").expect("parse");

        let err = registry
            .execute_query("bash", "missing", parsed.root_node(), parsed.source())
            .expect_err("not registered");
        assert!(matches!(err, SyntaxError::QueryNotFound { .. }));
    }
}
