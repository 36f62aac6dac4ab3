#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use donor_ir::{Module, Span, SpanRange};
use donor_verify::{DonationErrorKind, FunctionFailure, VerifyReport};
use miette::{IntoDiagnostic, SourceCode};
use serde::Serialize;

pub const REPORT_SCHEMA: &str = "donor.verify.v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LineCol {
    /// 1-based
    pub line: usize,
    /// 1-based
    pub col: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteReport {
    pub op: u32,
    pub name: String,
    pub span: SpanRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_col: Option<LineCol>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub function: String,
    pub kind: DonationErrorKind,
    pub message: String,
    pub span: SpanRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_col: Option<LineCol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<SiteReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReportJson {
    pub schema: &'static str,
    pub input: String,
    pub module: String,
    pub ok: bool,
    pub functions: usize,
    pub checked: usize,
    pub skipped: usize,
    pub failures: Vec<FailureReport>,
}

/// Position of `span` in the module's source text. Spans that fall outside
/// the text get none.
fn line_col(source: Option<&str>, span: Span) -> Option<LineCol> {
    let contents = source?.read_span(&span, 0, 0).ok()?;
    Some(LineCol {
        line: contents.line() + 1,
        col: contents.column() + 1,
    })
}

fn failure_report(failure: &FunctionFailure, source: Option<&str>) -> FailureReport {
    let e = &failure.error;
    FailureReport {
        function: e.function().to_string(),
        kind: e.kind(),
        message: e.to_string(),
        span: e.span().into(),
        line_col: line_col(source, e.span()),
        origin: e.origin().map(|o| SiteReport {
            op: o.id.0,
            name: o.name.clone(),
            span: o.span.into(),
            line_col: line_col(source, o.span),
        }),
    }
}

pub fn build_report(
    input: &Path,
    module: &Module,
    report: &VerifyReport,
    source: Option<&str>,
) -> VerifyReportJson {
    VerifyReportJson {
        schema: REPORT_SCHEMA,
        input: input.display().to_string(),
        module: module.name.clone(),
        ok: report.is_ok(),
        functions: report.functions,
        checked: report.checked,
        skipped: report.skipped,
        failures: report
            .failures
            .iter()
            .map(|f| failure_report(f, source))
            .collect(),
    }
}

pub fn write_report(report: &VerifyReportJson, out: &Path) -> miette::Result<()> {
    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).into_diagnostic()?;
    }
    let text = serde_json::to_string_pretty(report).into_diagnostic()?;
    fs::write(out, text).into_diagnostic()?;
    Ok(())
}
