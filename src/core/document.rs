//! Script document wrapper around the parsed syntax tree

use std::path::{Path, PathBuf};

use super::types::{Location, Range};
use crate::syntax::{ParseError, Parser, Program, Span};

/// A parsed source file
pub struct ScriptDocument<'a> {
    source: &'a str,
    program: Program,
    file: PathBuf,
}

impl<'a> ScriptDocument<'a> {
    /// Parse a source file
    pub fn parse(source: &'a str, file: &Path) -> Result<Self, ParseError> {
        let program = Parser::parse(source)?;
        Ok(Self {
            source,
            program,
            file: file.to_path_buf(),
        })
    }

    /// Get the source text
    pub fn source(&self) -> &str {
        self.source
    }

    /// Get the file path
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Get the parsed program
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Slice the exact source text of a span (preserves formatting)
    pub fn slice(&self, span: Span) -> &str {
        &self.source[span.start.min(self.source.len())..span.end.min(self.source.len())]
    }

    /// Convert a span to a line/column range
    pub fn span_range(&self, span: Span) -> Range {
        Range::from_span(self.source, span)
    }

    /// Build a full location for a span
    pub fn location(&self, span: Span) -> Location {
        Location::new(self.file.clone(), self.span_range(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_slice() {
        let source = "if (x === 5) run();";
        let doc = ScriptDocument::parse(source, Path::new("test.js")).unwrap();
        assert_eq!(doc.source(), source);
        assert_eq!(doc.slice(Span::new(4, 11)), "x === 5");
        assert_eq!(doc.program().body.len(), 1);
    }

    #[test]
    fn test_parse_error() {
        let result = ScriptDocument::parse("if (x ===", Path::new("bad.js"));
        assert!(result.is_err());
    }

    #[test]
    fn test_span_range() {
        let source = "f();\nif (x === 5) run();";
        let doc = ScriptDocument::parse(source, Path::new("test.js")).unwrap();
        let range = doc.span_range(Span::new(9, 16));
        assert_eq!(range.start.line, 2);
        assert_eq!(range.start.character, 5);
    }

    #[test]
    fn test_location_carries_file() {
        let doc = ScriptDocument::parse("x === 5", Path::new("dir/test.js")).unwrap();
        let location = doc.location(Span::new(0, 7));
        assert_eq!(location.file, PathBuf::from("dir/test.js"));
        assert_eq!(location.range.start.line, 1);
    }

    #[test]
    fn test_slice_clamps_out_of_bounds() {
        let doc = ScriptDocument::parse("x", Path::new("test.js")).unwrap();
        assert_eq!(doc.slice(Span::new(0, 100)), "x");
    }
}
