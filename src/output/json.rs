//! JSON output formatter

use super::Formatter;
use crate::core::{AnalysisResult, Diagnostic};
use serde::Serialize;

/// JSON formatter
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    diagnostics: Vec<JsonDiagnostic<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    rule_id: &'a str,
    severity: &'a str,
    message: &'a str,
    file: String,
    line: usize,
    column: usize,
    end_line: usize,
    end_column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<JsonFix<'a>>,
}

#[derive(Serialize)]
struct JsonFix<'a> {
    description: &'a str,
    start: usize,
    end: usize,
    replacement: &'a str,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    errors: usize,
    warnings: usize,
    fixable: usize,
    files: usize,
}

fn to_json_diagnostic(diag: &Diagnostic) -> JsonDiagnostic<'_> {
    JsonDiagnostic {
        rule_id: &diag.rule_id,
        severity: diag.severity.as_str(),
        message: &diag.message,
        file: diag.location.file.display().to_string(),
        line: diag.location.range.start.line,
        column: diag.location.range.start.character,
        end_line: diag.location.range.end.line,
        end_column: diag.location.range.end.character,
        help: diag.help.as_deref(),
        fix: diag.fix.as_ref().map(|fix| JsonFix {
            description: &fix.description,
            start: fix.start,
            end: fix.end,
            replacement: &fix.replacement,
        }),
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, result: &AnalysisResult) -> String {
        let output = JsonOutput {
            diagnostics: result.diagnostics.iter().map(to_json_diagnostic).collect(),
            summary: JsonSummary {
                total: result.len(),
                errors: result.error_count(),
                warnings: result.warning_count(),
                fixable: result.fixable_count(),
                files: result.files.len(),
            },
        };

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        serde_json::to_string(&to_json_diagnostic(diagnostic)).unwrap_or_else(|_| "{}".to_string())
    }
}
