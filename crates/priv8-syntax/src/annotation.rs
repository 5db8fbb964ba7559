//! Privacy annotations attached to syntax nodes.
//!
//! A [`PrivacyNode`] marks one node as a finding. The engine never creates
//! annotations on its own; a policy layer decides which nodes deserve one and
//! fills in the issue type, sensitivity, replacement, and context. None of
//! those fields are validated here: their vocabularies belong to the policy.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tree_sitter::Node;

use crate::parser::NodeKey;
use crate::text::{node_text, position_text};

/// Sensitivity assigned to new annotations ("medium" on the 0-10 scale).
pub const DEFAULT_SENSITIVITY: u8 = 5;

/// A value in an annotation's context map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// Free-form text.
    Text(String),
    /// A signed integer.
    Integer(i64),
    /// A boolean flag.
    Flag(bool),
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Flag(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// A syntax node marked as a sensitive-data finding.
///
/// The annotation borrows its node, so the tree it came from must outlive it.
#[derive(Debug, Clone)]
pub struct PrivacyNode<'t> {
    node: Node<'t>,
    key: NodeKey,
    /// Policy-defined category of the finding.
    pub issue_type: String,
    /// Policy-defined severity, conventionally 0 to 10.
    pub sensitivity: u8,
    /// Proposed replacement text; empty when none has been decided.
    pub replacement_value: String,
    /// Policy-specific metadata.
    pub context: BTreeMap<String, ContextValue>,
}

impl<'t> PrivacyNode<'t> {
    /// Creates an annotation with default sensitivity, no replacement, and
    /// an empty context.
    ///
    /// Prefer [`ParsedSource::annotate`], which derives `key` from the tree.
    ///
    /// [`ParsedSource::annotate`]: crate::ParsedSource::annotate
    #[must_use]
    pub const fn new(node: Node<'t>, key: NodeKey) -> Self {
        Self {
            node,
            key,
            issue_type: String::new(),
            sensitivity: DEFAULT_SENSITIVITY,
            replacement_value: String::new(),
            context: BTreeMap::new(),
        }
    }

    /// Returns the annotated node.
    #[must_use]
    pub const fn node(&self) -> Node<'t> {
        self.node
    }

    /// Returns the identity of the annotated node.
    ///
    /// The key disambiguates annotations within one parse in this process.
    /// It is not a content fingerprint: do not persist it or compare it
    /// across parses.
    #[must_use]
    pub const fn id(&self) -> NodeKey {
        self.key
    }

    /// Sets the issue type.
    #[must_use]
    pub fn with_issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = issue_type.into();
        self
    }

    /// Sets the sensitivity.
    #[must_use]
    pub const fn with_sensitivity(mut self, sensitivity: u8) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Sets the proposed replacement.
    #[must_use]
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement_value = replacement.into();
        self
    }

    /// Adds or replaces a context entry.
    pub fn insert_context(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.context.insert(key.into(), value.into());
    }

    /// Returns the node's text within `source`; see [`node_text`].
    #[must_use]
    pub fn text<'s>(&self, source: &'s [u8]) -> Cow<'s, str> {
        node_text(self.node, source)
    }

    /// Returns the node's one-based position; see [`position_text`].
    #[must_use]
    pub fn position_text(&self) -> String {
        position_text(self.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    use crate::grammar::BuiltinGrammar;
    use crate::parser::{ParsedSource, Parser};
    use crate::walker::find_nodes_of_type;

    #[fixture]
    fn parsed() -> ParsedSource {
        let mut parser =
            Parser::new("bash", &BuiltinGrammar::Bash.language()).expect("parser init");
        parser
            .parse("DB_PASSWORD=hunter2\nAPI_TOKEN=abc")
            .expect("parse")
    }

    #[rstest]
    fn new_annotation_has_defaults(parsed: ParsedSource) {
        let annotation = parsed.annotate(parsed.root_node()).expect("annotation");

        assert_eq!(annotation.sensitivity, 5);
        assert_eq!(annotation.replacement_value, "");
        assert!(annotation.issue_type.is_empty());
        assert!(annotation.context.is_empty());
    }

    #[rstest]
    fn annotations_on_distinct_nodes_have_distinct_ids(parsed: ParsedSource) {
        let ids: Vec<_> = find_nodes_of_type(parsed.root_node(), "variable_name")
            .into_iter()
            .filter_map(|node| parsed.annotate(node))
            .map(|annotation| annotation.id())
            .collect();

        assert_eq!(ids.len(), 2);
        assert_ne!(ids.first(), ids.get(1));
    }

    #[rstest]
    fn annotation_reads_text_and_position(parsed: ParsedSource) {
        let node = find_nodes_of_type(parsed.root_node(), "variable_name")
            .into_iter()
            .nth(1)
            .expect("second name");
        let annotation = parsed.annotate(node).expect("annotation");

        assert_eq!(annotation.text(parsed.source()), "API_TOKEN");
        assert_eq!(annotation.position_text(), "line 2:1 to 2:10");
    }

    #[rstest]
    fn fields_accept_values_outside_conventional_range(parsed: ParsedSource) {
        let mut annotation = parsed
            .annotate(parsed.root_node())
            .expect("annotation")
            .with_issue_type("anything-goes")
            .with_sensitivity(200)
            .with_replacement("<redacted>");
        annotation.insert_context("variable", "DB_PASSWORD");
        annotation.insert_context("line", 1_i64);
        annotation.insert_context("exported", false);

        assert_eq!(annotation.sensitivity, 200);
        assert_eq!(
            annotation.context.get("line"),
            Some(&ContextValue::Integer(1))
        );
        assert_eq!(
            annotation.context.get("exported"),
            Some(&ContextValue::Flag(false))
        );
    }

    #[rstest]
    fn foreign_nodes_cannot_be_annotated(parsed: ParsedSource) {
        let mut parser =
            Parser::new("bash", &BuiltinGrammar::Bash.language()).expect("parser init");
        let other = parser.parse("echo unrelated").expect("parse");
        let foreign = find_nodes_of_type(other.root_node(), "word")
            .into_iter()
            .last()
            .expect("word");

        assert!(parsed.annotate(foreign).is_none());
    }

    #[test]
    fn context_values_display_plainly() {
        let rendered: Vec<_> = [
            ContextValue::from("x"),
            ContextValue::from(7_i64),
            ContextValue::from(true),
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        assert_eq!(rendered, ["x", "7", "true"]);
    }
}
