//! Lexer for the script subset

use super::ast::Span;
use super::parser::ParseError;

/// Token kinds produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),

    // Keywords
    If,
    Else,
    While,
    Return,
    Const,
    Let,
    Var,
    True,
    False,
    Null,

    // Operators
    EqEq,
    EqEqEq,
    NotEq,
    NotEqEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Bang,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Dot,
    Question,
    Colon,

    Eof,
}

/// A token with its source span
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Tokenizes source text into a flat token stream
pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    /// Tokenize the whole input; the last token is always `Eof`
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let at_end = token.kind == TokenKind::Eof;
            tokens.push(token);
            if at_end {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_trivia()?;

        let start = self.pos;
        let byte = match self.bytes.get(self.pos) {
            Some(b) => *b,
            None => return Ok(Token::new(TokenKind::Eof, Span::new(start, start))),
        };

        let kind = match byte {
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b',' => self.single(TokenKind::Comma),
            b';' => self.single(TokenKind::Semi),
            b'.' => self.single(TokenKind::Dot),
            b'?' => self.single(TokenKind::Question),
            b':' => self.single(TokenKind::Colon),
            b'+' => self.single(TokenKind::Plus),
            b'-' => self.single(TokenKind::Minus),
            b'*' => self.single(TokenKind::Star),
            b'/' => self.single(TokenKind::Slash),
            b'%' => self.single(TokenKind::Percent),
            b'=' => {
                if self.peek_is(1, b'=') && self.peek_is(2, b'=') {
                    self.pos += 3;
                    TokenKind::EqEqEq
                } else if self.peek_is(1, b'=') {
                    self.pos += 2;
                    TokenKind::EqEq
                } else {
                    self.pos += 1;
                    TokenKind::Assign
                }
            }
            b'!' => {
                if self.peek_is(1, b'=') && self.peek_is(2, b'=') {
                    self.pos += 3;
                    TokenKind::NotEqEq
                } else if self.peek_is(1, b'=') {
                    self.pos += 2;
                    TokenKind::NotEq
                } else {
                    self.pos += 1;
                    TokenKind::Bang
                }
            }
            b'<' => {
                if self.peek_is(1, b'=') {
                    self.pos += 2;
                    TokenKind::Le
                } else {
                    self.pos += 1;
                    TokenKind::Lt
                }
            }
            b'>' => {
                if self.peek_is(1, b'=') {
                    self.pos += 2;
                    TokenKind::Ge
                } else {
                    self.pos += 1;
                    TokenKind::Gt
                }
            }
            b'&' => {
                if self.peek_is(1, b'&') {
                    self.pos += 2;
                    TokenKind::AndAnd
                } else {
                    return Err(ParseError::new("unexpected character '&'", start));
                }
            }
            b'|' => {
                if self.peek_is(1, b'|') {
                    self.pos += 2;
                    TokenKind::OrOr
                } else {
                    return Err(ParseError::new("unexpected character '|'", start));
                }
            }
            b'\'' | b'"' => self.string(byte)?,
            b'0'..=b'9' => self.number()?,
            b if b.is_ascii_alphabetic() || b == b'_' || b == b'$' => self.ident_or_keyword(),
            _ => {
                let ch = self.source[self.pos..].chars().next().unwrap_or('?');
                return Err(ParseError::new(
                    format!("unexpected character '{}'", ch),
                    start,
                ));
            }
        };

        Ok(Token::new(kind, Span::new(start, self.pos)))
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn peek_is(&self, ahead: usize, byte: u8) -> bool {
        self.bytes.get(self.pos + ahead) == Some(&byte)
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.bytes.get(self.pos) {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.peek_is(1, b'/') => {
                    while let Some(b) = self.bytes.get(self.pos) {
                        if *b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek_is(1, b'*') => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        match self.bytes.get(self.pos) {
                            Some(b'*') if self.peek_is(1, b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(_) => self.pos += 1,
                            None => {
                                return Err(ParseError::new("unterminated block comment", start))
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn string(&mut self, quote: u8) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.bytes.get(self.pos) {
                Some(b) if *b == quote => {
                    self.pos += 1;
                    return Ok(TokenKind::Str(value));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    let ch = match self.bytes.get(self.pos) {
                        Some(b'n') => '\n',
                        Some(b't') => '\t',
                        Some(b'\\') => '\\',
                        Some(b'\'') => '\'',
                        Some(b'"') => '"',
                        Some(_) => self.source[self.pos..].chars().next().unwrap(),
                        None => return Err(ParseError::new("unterminated string", start)),
                    };
                    value.push(ch);
                    self.pos += ch.len_utf8();
                }
                Some(b'\n') | None => {
                    return Err(ParseError::new("unterminated string", start));
                }
                Some(_) => {
                    let ch = self.source[self.pos..].chars().next().unwrap();
                    value.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }
    }

    fn number(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        while matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.bytes.get(self.pos) == Some(&b'.')
            && matches!(self.bytes.get(self.pos + 1), Some(b) if b.is_ascii_digit())
        {
            self.pos += 1;
            while matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = &self.source[start..self.pos];
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| ParseError::new(format!("invalid number '{}'", text), start))
    }

    fn ident_or_keyword(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(
            self.bytes.get(self.pos),
            Some(b) if b.is_ascii_alphanumeric() || *b == b'_' || *b == b'$'
        ) {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        match text {
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "return" => TokenKind::Return,
            "const" => TokenKind::Const,
            "let" => TokenKind::Let,
            "var" => TokenKind::Var,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Ident(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("== === != !== < <= > >="),
            vec![
                TokenKind::EqEq,
                TokenKind::EqEqEq,
                TokenKind::NotEq,
                TokenKind::NotEqEq,
                TokenKind::Lt,
                TokenKind::Le,
                TokenKind::Gt,
                TokenKind::Ge,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(
            kinds("a && b || !c"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::AndAnd,
                TokenKind::Ident("b".to_string()),
                TokenKind::OrOr,
                TokenKind::Bang,
                TokenKind::Ident("c".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("5 3.14 10"),
            vec![
                TokenKind::Number(5.0),
                TokenKind::Number(3.14),
                TokenKind::Number(10.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            kinds(r#"'abc' "d\"e""#),
            vec![
                TokenKind::Str("abc".to_string()),
                TokenKind::Str("d\"e".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escaped_multibyte_char() {
        assert_eq!(
            kinds(r"'caf\é' 'naïve'"),
            vec![
                TokenKind::Str("café".to_string()),
                TokenKind::Str("naïve".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("if else while const true false null"),
            vec![
                TokenKind::If,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::Const,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Null,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            kinds("foo _bar $baz x2"),
            vec![
                TokenKind::Ident("foo".to_string()),
                TokenKind::Ident("_bar".to_string()),
                TokenKind::Ident("$baz".to_string()),
                TokenKind::Ident("x2".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("a // line comment\n/* block */ b"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Ident("b".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::new("x === 5").tokenize().unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 1));
        assert_eq!(tokens[1].span, Span::new(2, 5));
        assert_eq!(tokens[2].span, Span::new(6, 7));
    }

    #[test]
    fn test_unterminated_string() {
        assert!(Lexer::new("'abc").tokenize().is_err());
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert!(Lexer::new("/* nope").tokenize().is_err());
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("a # b").tokenize().unwrap_err();
        assert!(err.to_string().contains("unexpected character"));
    }

    #[test]
    fn test_lone_ampersand_rejected() {
        assert!(Lexer::new("a & b").tokenize().is_err());
        assert!(Lexer::new("a | b").tokenize().is_err());
    }
}
