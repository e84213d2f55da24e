//! Fix application engine
//!
//! Fixes are byte-span text replacements. Application is bottom-up so
//! earlier spans stay valid while later ones are rewritten; fixes that
//! overlap an already-applied one are skipped and reported in the
//! result so a second lint pass can pick them up.

use crate::core::{Diagnostic, Fix};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Error during fix application
#[derive(Debug)]
pub struct FixError {
    pub message: String,
    pub file: PathBuf,
}

impl std::fmt::Display for FixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

impl std::error::Error for FixError {}

/// Preview of what a fix would change
#[derive(Debug, Clone)]
pub struct FixPreview {
    pub file: PathBuf,
    pub rule_id: String,
    pub description: String,
    pub line: usize,
    pub before: String,
    pub after: String,
}

/// Result of applying fixes to a file
#[derive(Debug)]
pub struct FixResult {
    pub file: PathBuf,
    pub fixes_applied: usize,
    pub fixes_skipped: usize,
    pub new_content: String,
}

/// Engine for collecting and applying fixes
pub struct FixEngine {
    fixes: HashMap<PathBuf, Vec<(Diagnostic, Fix)>>,
}

impl FixEngine {
    pub fn new() -> Self {
        Self {
            fixes: HashMap::new(),
        }
    }

    /// Collect fixes from diagnostics
    pub fn collect_fixes(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            if let Some(fix) = &diag.fix {
                self.fixes
                    .entry(diag.location.file.clone())
                    .or_default()
                    .push((diag.clone(), fix.clone()));
            }
        }
    }

    /// Get the number of fixes available
    pub fn fix_count(&self) -> usize {
        self.fixes.values().map(|v| v.len()).sum()
    }

    /// Files that have at least one fix collected
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.fixes.keys().map(|p| p.as_path())
    }

    /// Preview fixes for a file without touching it
    pub fn preview(&self, file: &Path, source: &str) -> Vec<FixPreview> {
        let mut previews = Vec::new();

        if let Some(fixes) = self.fixes.get(file) {
            for (diag, fix) in fixes {
                if let Some(preview) = create_preview(source, diag, fix) {
                    previews.push(preview);
                }
            }
        }

        previews.sort_by_key(|p| p.line);
        previews
    }

    /// Apply all fixes for a file, returning the rewritten content
    pub fn apply(&self, file: &Path, source: &str) -> Result<FixResult, FixError> {
        let fixes = match self.fixes.get(file) {
            Some(f) => f,
            None => {
                return Ok(FixResult {
                    file: file.to_path_buf(),
                    fixes_applied: 0,
                    fixes_skipped: 0,
                    new_content: source.to_string(),
                })
            }
        };

        // Bottom-up so earlier offsets remain valid
        let mut sorted: Vec<&Fix> = fixes.iter().map(|(_, fix)| fix).collect();
        sorted.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

        let mut content = source.to_string();
        let mut applied = 0;
        let mut skipped = 0;
        // End of the last applied fix, moving toward the file start
        let mut floor = usize::MAX;

        for fix in sorted {
            if fix.start > fix.end || fix.end > content.len() {
                return Err(FixError {
                    message: format!(
                        "fix span {}..{} is outside the file (len {})",
                        fix.start,
                        fix.end,
                        content.len()
                    ),
                    file: file.to_path_buf(),
                });
            }
            if fix.end > floor {
                skipped += 1;
                continue;
            }
            content.replace_range(fix.start..fix.end, &fix.replacement);
            floor = fix.start;
            applied += 1;
        }

        Ok(FixResult {
            file: file.to_path_buf(),
            fixes_applied: applied,
            fixes_skipped: skipped,
            new_content: content,
        })
    }
}

impl Default for FixEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn create_preview(source: &str, diag: &Diagnostic, fix: &Fix) -> Option<FixPreview> {
    let line_idx = diag.location.range.start.line.checked_sub(1)?;

    // True byte offset of the line, so CRLF terminators don't shift it
    let mut line_start = 0;
    for _ in 0..line_idx {
        line_start += source[line_start..].find('\n')? + 1;
    }
    let rest = &source[line_start..];
    let line_end = line_start + rest.find('\n').unwrap_or(rest.len());
    let before = source[line_start..line_end].trim_end_matches('\r').to_string();

    // Line-local rendering; multi-line fixes fall back to the raw text
    let after = if fix.start >= line_start && fix.end <= line_start + before.len() {
        let mut after = before.clone();
        after.replace_range(fix.start - line_start..fix.end - line_start, &fix.replacement);
        after
    } else {
        fix.replacement.clone()
    };

    Some(FixPreview {
        file: diag.location.file.clone(),
        rule_id: diag.rule_id.clone(),
        description: fix.description.clone(),
        line: diag.location.range.start.line,
        before,
        after,
    })
}
