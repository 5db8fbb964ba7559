//! Demonstration credential policy for bash scripts.
//!
//! The policy flags two things: assignments whose variable name mentions a
//! credential keyword, and comments that mention one. Matching is
//! case-insensitive on the keyword list below.

use priv8_syntax::{
    BuiltinGrammar, GrammarRegistry, Node, ParsedSource, PrivacyNode, SyntaxError, node_text,
};

/// Grammar the policy queries are written for.
pub(crate) const GRAMMAR: BuiltinGrammar = BuiltinGrammar::Bash;

/// Variable-name fragments that mark a value as a credential.
pub(crate) const CREDENTIAL_KEYWORDS: &[&str] = &[
    "PASSWORD",
    "PASSWD",
    "SECRET",
    "TOKEN",
    "API_KEY",
    "PRIVATE_KEY",
    "ACCESS_KEY",
];

/// Issue type for credential assignments.
pub(crate) const CREDENTIAL: &str = "credential";
/// Issue type for comments mentioning credentials.
pub(crate) const CREDENTIAL_COMMENT: &str = "credential_comment";

const CREDENTIAL_SENSITIVITY: u8 = 8;
const COMMENT_SENSITIVITY: u8 = 3;
const REDACTED: &str = "<redacted>";

const ASSIGNMENTS: &str = "credential_assignments";
const ASSIGNMENTS_PATTERN: &str = "(variable_assignment name: (variable_name) @name) @assignment";
const COMMENTS: &str = "credential_comments";
const COMMENTS_PATTERN: &str = "(comment) @comment";

/// Loads the bash grammar and registers the policy queries.
pub(crate) fn install(registry: &mut GrammarRegistry) -> Result<(), SyntaxError> {
    registry.load_builtin(GRAMMAR)?;
    registry.register_query(GRAMMAR.name(), ASSIGNMENTS, ASSIGNMENTS_PATTERN)?;
    registry.register_query(GRAMMAR.name(), COMMENTS, COMMENTS_PATTERN)
}

/// Runs the policy over `parsed` and returns findings in source order.
pub(crate) fn scan<'t>(
    registry: &GrammarRegistry,
    parsed: &'t ParsedSource,
) -> Result<Vec<PrivacyNode<'t>>, SyntaxError> {
    let root = parsed.root_node();
    let source = parsed.source();
    let mut findings = Vec::new();

    let assignments = registry.execute_query(GRAMMAR.name(), ASSIGNMENTS, root, source)?;
    for found in &assignments {
        let (Some(name), Some(assignment)) = (found.capture("name"), found.capture("assignment"))
        else {
            continue;
        };
        let variable = node_text(name.node(), source);
        let Some(keyword) = credential_keyword(&variable) else {
            continue;
        };
        let target = assignment
            .node()
            .child_by_field_name("value")
            .unwrap_or_else(|| assignment.node());
        if let Some(candidate) = annotate(parsed, target, CREDENTIAL, keyword) {
            let mut finding = candidate
                .with_sensitivity(CREDENTIAL_SENSITIVITY)
                .with_replacement(REDACTED);
            finding.insert_context("variable", variable.into_owned());
            findings.push(finding);
        }
    }

    let comments = registry.execute_query(GRAMMAR.name(), COMMENTS, root, source)?;
    for comment in comments.captures_named("comment") {
        let Some(keyword) = credential_keyword(&node_text(comment.node(), source)) else {
            continue;
        };
        if let Some(finding) = annotate(parsed, comment.node(), CREDENTIAL_COMMENT, keyword) {
            findings.push(finding.with_sensitivity(COMMENT_SENSITIVITY));
        }
    }

    findings.sort_by_key(|finding| finding.node().start_byte());
    tracing::debug!(findings = findings.len(), "credential policy scan complete");
    Ok(findings)
}

/// Returns the first keyword contained in `text`, ignoring ASCII case.
pub(crate) fn credential_keyword(text: &str) -> Option<&'static str> {
    let upper = text.to_ascii_uppercase();
    CREDENTIAL_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| upper.contains(*keyword))
}

fn annotate<'t>(
    parsed: &'t ParsedSource,
    node: Node<'t>,
    issue_type: &str,
    keyword: &str,
) -> Option<PrivacyNode<'t>> {
    let line = i64::try_from(node.start_position().row)
        .map_or(i64::MAX, |row| row.saturating_add(1));
    let mut finding = parsed.annotate(node)?.with_issue_type(issue_type);
    finding.insert_context("keyword", keyword);
    finding.insert_context("line", line);
    Some(finding)
}
