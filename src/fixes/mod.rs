//! Applying suggested rewrites to source files
//!
//! Fixes are byte-span replacements collected from diagnostics and
//! applied bottom-up so earlier edits never shift later spans.

mod engine;

pub use engine::{FixEngine, FixError, FixPreview, FixResult};
