//! Human-readable text output formatter

use super::Formatter;
use crate::core::{AnalysisResult, Diagnostic, Severity};

/// Text formatter with optional color support
pub struct TextFormatter {
    colored: bool,
}

impl TextFormatter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn severity_color(&self, severity: Severity) -> &'static str {
        if !self.colored {
            return "";
        }
        match severity {
            Severity::Error => "\x1b[1;31m",   // Bold red
            Severity::Warning => "\x1b[1;33m", // Bold yellow
        }
    }

    fn reset(&self) -> &'static str {
        if self.colored { "\x1b[0m" } else { "" }
    }

    fn bold(&self) -> &'static str {
        if self.colored { "\x1b[1m" } else { "" }
    }

    fn dim(&self) -> &'static str {
        if self.colored { "\x1b[2m" } else { "" }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, result: &AnalysisResult) -> String {
        let mut output = String::new();

        for diag in &result.diagnostics {
            output.push_str(&self.format_diagnostic(diag));
            output.push('\n');
        }

        let errors = result.error_count();
        let warnings = result.warning_count();
        let fixable = result.fixable_count();

        if errors > 0 || warnings > 0 {
            output.push('\n');
            let mut parts = Vec::new();
            if errors > 0 {
                parts.push(format!(
                    "{}{} error{}{}",
                    self.severity_color(Severity::Error),
                    errors,
                    if errors == 1 { "" } else { "s" },
                    self.reset()
                ));
            }
            if warnings > 0 {
                parts.push(format!(
                    "{}{} warning{}{}",
                    self.severity_color(Severity::Warning),
                    warnings,
                    if warnings == 1 { "" } else { "s" },
                    self.reset()
                ));
            }
            output.push_str(&format!("Found {}\n", parts.join(", ")));
            if fixable > 0 {
                output.push_str(&format!(
                    "{}{} fixable with --fix{}\n",
                    self.dim(),
                    fixable,
                    self.reset()
                ));
            }
        }

        output
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}{}:{}:{}:{} ",
            self.bold(),
            diag.location.file.display(),
            diag.location.range.start.line,
            diag.location.range.start.character,
            self.reset()
        ));

        output.push_str(&format!(
            "{}{}{}[{}]: ",
            self.severity_color(diag.severity),
            diag.severity.as_str(),
            self.reset(),
            diag.rule_id
        ));

        output.push_str(&diag.message);

        if let Some(help) = &diag.help {
            output.push_str(&format!("\n  {}help: {}{}", self.dim(), help, self.reset()));
        }

        if let Some(fix) = &diag.fix {
            output.push_str(&format!(
                "\n  {}fix: {}{}",
                self.dim(),
                fix.description,
                self.reset()
            ));
        }

        output
    }
}
