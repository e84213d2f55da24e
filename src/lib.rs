//! yoda-lint - A configurable comparison-order linter
//!
//! Enforces an operand-order convention on comparisons: "yoda" order
//! (literal first, `5 === x`) or "normal" order (literal last,
//! `x === 5`), with dedicated handling for range tests like
//! `lo <= x && x <= hi` and automatic fixes built from verbatim
//! source text.
//!
//! # Example
//!
//! ```
//! use yoda_lint::core::ScriptDocument;
//! use yoda_lint::rule::{OrderMode, Settings, YodaRule};
//! use std::path::Path;
//!
//! let source = "if (x === 5) { run(); }";
//! let doc = ScriptDocument::parse(source, Path::new("app.js")).unwrap();
//! let rule = YodaRule::new(Settings::new(OrderMode::Yoda));
//!
//! for diag in rule.check(&doc) {
//!     println!("{}: {}", diag.rule_id, diag.message);
//! }
//! ```

pub mod config;
pub mod core;
pub mod fixes;
pub mod output;
pub mod rule;
pub mod syntax;

// Re-export main types
pub use crate::config::{Config, ConfigError, MinSeverity, CONFIG_FILE_NAME};
pub use crate::core::{
    AnalysisResult, Diagnostic, Fix, Location, Position, Range, ScriptDocument, Severity,
    SuppressionContext,
};
pub use crate::fixes::{FixEngine, FixError, FixPreview, FixResult};
pub use crate::output::{get_formatter, Formatter, JsonFormatter, OutputFormat, TextFormatter};
pub use crate::rule::{
    NotInRangeMode, OptionsError, OrderMode, RangeMode, Settings, YodaRule,
};
pub use crate::syntax::{ParseError, Parser};

use std::path::Path;

/// Run the rule on a parsed document, applying the config's rule
/// filters, severity overrides, and inline suppressions
pub fn analyze(doc: &ScriptDocument<'_>, rule: &YodaRule, config: &Config) -> AnalysisResult {
    let mut result = AnalysisResult::new();
    result.add_file(doc.file().to_path_buf());
    result.extend(rule.check(doc));

    result.diagnostics.retain(|d| config.is_rule_enabled(&d.rule_id));

    for diag in &mut result.diagnostics {
        if let Some(severity) = config.severity_override(&diag.rule_id) {
            diag.severity = severity;
        }
    }

    result.filter_by_severity(config.min_severity.as_severity());

    let suppressions = SuppressionContext::parse(doc.source());
    if suppressions.has_suppressions() {
        result
            .diagnostics
            .retain(|d| !suppressions.is_suppressed(&d.rule_id, d.location.range.start.line));
    }

    result
}

/// Error from single-source analysis
#[derive(Debug)]
pub enum AnalyzeError {
    Parse(ParseError),
    Options(OptionsError),
}

impl std::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{}", e),
            Self::Options(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AnalyzeError {}

/// Parse and analyze a single source string
pub fn analyze_source(
    source: &str,
    file: &Path,
    config: &Config,
) -> Result<AnalysisResult, AnalyzeError> {
    let doc = ScriptDocument::parse(source, file).map_err(AnalyzeError::Parse)?;
    let settings = config.settings().map_err(AnalyzeError::Options)?;
    let rule = YodaRule::new(settings);
    Ok(analyze(&doc, &rule, config))
}

/// Analyze multiple files. Files that fail to read produce an error;
/// files that fail to parse are skipped and reported in the returned
/// skip list so the pass never aborts on foreign syntax.
pub fn analyze_project(
    files: &[&Path],
    config: &Config,
) -> Result<(Vec<AnalysisResult>, Vec<(std::path::PathBuf, ParseError)>), String> {
    let settings = config.settings().map_err(|e| e.to_string())?;
    let rule = YodaRule::new(settings);

    let mut results = Vec::new();
    let mut skipped = Vec::new();

    for file in files {
        if config.is_excluded(file) {
            continue;
        }

        let source = std::fs::read_to_string(file)
            .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;

        match ScriptDocument::parse(&source, file) {
            Ok(doc) => {
                let result = analyze(&doc, &rule, config);
                if !result.diagnostics.is_empty() {
                    results.push(result);
                }
            }
            Err(e) => skipped.push((file.to_path_buf(), e)),
        }
    }

    Ok((results, skipped))
}

/// Analyze multiple files in parallel
///
/// Uses rayon for parallel processing; faster for large projects.
pub fn analyze_project_parallel(
    files: &[&Path],
    config: &Config,
) -> Result<(Vec<AnalysisResult>, Vec<(std::path::PathBuf, ParseError)>), String> {
    use rayon::prelude::*;

    let settings = config.settings().map_err(|e| e.to_string())?;
    let rule = YodaRule::new(settings);

    let files_to_analyze: Vec<_> = files.iter().filter(|f| !config.is_excluded(f)).collect();

    let per_file: Result<Vec<_>, String> = files_to_analyze
        .par_iter()
        .map(|file| {
            let source = std::fs::read_to_string(file)
                .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;

            match ScriptDocument::parse(&source, file) {
                Ok(doc) => Ok((Some(analyze(&doc, &rule, config)), None)),
                Err(e) => Ok((None, Some((file.to_path_buf(), e)))),
            }
        })
        .collect();

    let mut results = Vec::new();
    let mut skipped = Vec::new();
    for (result, skip) in per_file? {
        if let Some(result) = result {
            if !result.diagnostics.is_empty() {
                results.push(result);
            }
        }
        if let Some(skip) = skip {
            skipped.push(skip);
        }
    }

    Ok((results, skipped))
}
