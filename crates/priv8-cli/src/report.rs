//! Findings report rendering.
//!
//! Reports never echo the sensitive text itself: each finding is labelled
//! by its variable name, or by the keyword that triggered it.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use priv8_syntax::{ContextValue, ParsedSource, PrivacyNode};
use serde::Serialize;

use crate::cli::ReportFormat;
use crate::errors::AppError;

#[derive(Debug, Serialize)]
struct Report<'a> {
    file: String,
    grammar: &'a str,
    syntax_errors: usize,
    findings: Vec<FindingRecord<'a>>,
}

#[derive(Debug, Serialize)]
struct FindingRecord<'a> {
    id: String,
    issue_type: &'a str,
    sensitivity: u8,
    position: String,
    node_kind: &'a str,
    replacement: &'a str,
    context: &'a BTreeMap<String, ContextValue>,
}

impl<'a> FindingRecord<'a> {
    fn new(finding: &'a PrivacyNode<'_>) -> Self {
        Self {
            id: finding.id().to_string(),
            issue_type: &finding.issue_type,
            sensitivity: finding.sensitivity,
            position: finding.position_text(),
            node_kind: finding.node().kind(),
            replacement: &finding.replacement_value,
            context: &finding.context,
        }
    }

    fn label(&self) -> String {
        self.context
            .get("variable")
            .or_else(|| self.context.get("keyword"))
            .map_or_else(|| self.node_kind.to_owned(), ToString::to_string)
    }
}

/// Writes the findings for `file` in the requested format.
pub(crate) fn write_report<W: Write>(
    out: &mut W,
    format: ReportFormat,
    file: &Path,
    parsed: &ParsedSource,
    findings: &[PrivacyNode<'_>],
) -> Result<(), AppError> {
    let report = Report {
        file: file.display().to_string(),
        grammar: parsed.grammar(),
        syntax_errors: parsed.errors().len(),
        findings: findings.iter().map(FindingRecord::new).collect(),
    };

    match format {
        ReportFormat::Human => write_human(out, &report),
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report).map_err(AppError::SerialiseReport)?;
            writeln!(out).map_err(AppError::Emit)
        }
    }
}

fn write_human<W: Write>(out: &mut W, report: &Report<'_>) -> Result<(), AppError> {
    writeln!(out, "priv8 report for {} ({})", report.file, report.grammar).map_err(AppError::Emit)?;
    for finding in &report.findings {
        writeln!(
            out,
            "  {}  {}  sensitivity {}  {}",
            finding.position,
            finding.issue_type,
            finding.sensitivity,
            finding.label()
        )
        .map_err(AppError::Emit)?;
    }
    writeln!(
        out,
        "{} finding(s), {} syntax error(s)",
        report.findings.len(),
        report.syntax_errors
    )
    .map_err(AppError::Emit)
}
