//! Core infrastructure for lint analysis

pub mod document;
pub mod suppression;
pub mod types;

pub use document::ScriptDocument;
pub use suppression::SuppressionContext;
pub use types::*;
