//! Lexer — Phase 1 of the CDL pipeline.
//!
//! Converts a CDL source string into a flat token stream. Whitespace is
//! insignificant outside comments; `#` and `/* ... */` comments are
//! stripped entirely, `#!` doc comments are preserved as
//! [`TokenKind::DocComment`] tokens. The only context-sensitivity here is
//! entering "Miller-index mode" on `{` and "point-group mode" on a `[`
//! immediately following a system keyword (see module docs on
//! [`crate::parser::miller`] for how the Miller payload is later decoded).

mod token;

pub use token::{Token, TokenKind};

use crate::catalog;
use crate::error::{Position, SyntaxError};

/// Tokenize `text` into a flat stream ending in [`TokenKind::Eof`].
pub fn tokenize(text: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(text).run()
}

struct Lexer {
    chars: Vec<char>,
    idx: usize,
    line: usize,
    column: usize,
    last_was_system: bool,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            idx: 0,
            line: 1,
            column: 1,
            last_was_system: false,
            tokens: Vec::new(),
        }
    }

    fn pos(&self) -> Position {
        Position::new(self.idx, self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.idx + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.idx += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, start: Position, len: usize) {
        self.last_was_system = matches!(kind, TokenKind::System(_));
        self.tokens.push(Token::new(kind, start, len));
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        loop {
            self.skip_insignificant_whitespace();
            let start = self.pos();
            let Some(c) = self.peek() else {
                self.tokens.push(Token::new(TokenKind::Eof, start, 0));
                break;
            };

            match c {
                '#' => {
                    self.last_was_system = false;
                    self.lex_comment()?;
                    continue;
                }
                '/' if self.peek_at(1) == Some('*') => {
                    self.last_was_system = false;
                    self.skip_block_comment(start)?;
                    continue;
                }
                '{' => {
                    self.advance();
                    self.push(TokenKind::LBrace, start, 1);
                    self.lex_miller_payload()?;
                }
                '[' if self.last_was_system => {
                    self.advance();
                    self.push(TokenKind::LBracket, start, 1);
                    self.lex_point_group()?;
                }
                '[' => {
                    self.advance();
                    self.push(TokenKind::LBracket, start, 1);
                }
                ']' => {
                    self.advance();
                    self.push(TokenKind::RBracket, start, 1);
                }
                '}' => {
                    self.advance();
                    self.push(TokenKind::RBrace, start, 1);
                }
                '(' => {
                    self.advance();
                    self.push(TokenKind::LParen, start, 1);
                }
                ')' => {
                    self.advance();
                    self.push(TokenKind::RParen, start, 1);
                }
                ':' => {
                    self.advance();
                    self.push(TokenKind::Colon, start, 1);
                }
                '+' => {
                    self.advance();
                    self.push(TokenKind::Plus, start, 1);
                }
                '|' => {
                    self.advance();
                    self.push(TokenKind::Pipe, start, 1);
                }
                '@' => {
                    self.advance();
                    self.push(TokenKind::At, start, 1);
                }
                ',' => {
                    self.advance();
                    self.push(TokenKind::Comma, start, 1);
                }
                '>' => {
                    self.advance();
                    self.push(TokenKind::Gt, start, 1);
                }
                '~' => {
                    self.advance();
                    self.push(TokenKind::Tilde, start, 1);
                }
                ';' => {
                    self.advance();
                    self.push(TokenKind::Semicolon, start, 1);
                }
                '$' => {
                    self.advance();
                    self.push(TokenKind::Dollar, start, 1);
                }
                '=' => {
                    self.advance();
                    self.push(TokenKind::Equals, start, 1);
                }
                c if c.is_ascii_digit() => self.lex_number(start)?,
                '-' if self.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(false) => {
                    self.lex_number(start)?
                }
                c if c.is_alphabetic() || c == '_' => self.lex_identifier(start),
                other => {
                    self.advance();
                    return Err(SyntaxError::UnexpectedChar { pos: start, ch: other });
                }
            }
        }
        Ok(self.tokens)
    }

    fn skip_insignificant_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' || c == '\n' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn lex_comment(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos();
        self.advance(); // '#'
        if self.peek() == Some('!') {
            self.advance(); // '!'
            let mut body = String::new();
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                body.push(c);
                self.advance();
            }
            let text = body.trim().to_string();
            let len = self.idx - start.offset;
            self.push(TokenKind::DocComment(text), start, len);
        } else {
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.advance();
            }
        }
        Ok(())
    }

    fn skip_block_comment(&mut self, start: Position) -> Result<(), SyntaxError> {
        self.advance(); // '/'
        self.advance(); // '*'
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some('*'), Some('/')) => {
                    self.advance();
                    self.advance();
                    return Ok(());
                }
                (Some(_), _) => {
                    self.advance();
                }
                (None, _) => {
                    return Err(SyntaxError::UnterminatedBracket { pos: start, open: '*' })
                }
            }
        }
    }

    fn lex_number(&mut self, start: Position) -> Result<(), SyntaxError> {
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.advance();
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(false)
        {
            is_float = true;
            text.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let len = self.idx - start.offset;
        if is_float {
            let value: f64 = text.parse().map_err(|_| SyntaxError::MalformedMillerPayload {
                pos: start,
                detail: format!("invalid float literal '{}'", text),
            })?;
            self.push(TokenKind::Float(value), start, len);
        } else {
            let value: i64 = text.parse().map_err(|_| SyntaxError::MalformedMillerPayload {
                pos: start,
                detail: format!("invalid integer literal '{}'", text),
            })?;
            self.push(TokenKind::Integer(value), start, len);
        }
        Ok(())
    }

    fn lex_identifier(&mut self, start: Position) {
        let mut text = String::new();
        loop {
            match self.peek() {
                Some(c) if c.is_alphanumeric() || c == '_' => {
                    text.push(c);
                    self.advance();
                }
                // A hyphen continues the identifier only when followed by
                // another identifier character, producing a single token for
                // hyphen-joined chains like `pink-white-green`. The parser
                // splits such a token back into a `FeatureValue::ColorSpec`.
                Some('-')
                    if self
                        .peek_at(1)
                        .map(|c| c.is_alphanumeric() || c == '_')
                        .unwrap_or(false) =>
                {
                    text.push('-');
                    self.advance();
                }
                _ => break,
            }
        }
        let len = self.idx - start.offset;
        let kind = if text == "amorphous" {
            TokenKind::Amorphous
        } else if catalog::is_crystal_system(&text) {
            TokenKind::System(text)
        } else {
            TokenKind::Identifier(text)
        };
        self.push(kind, start, len);
    }

    /// Scans the raw Miller payload between `{` and `}` and emits it as a
    /// single [`TokenKind::MillerPayload`] token, followed by the closing
    /// [`TokenKind::RBrace`]. The dense-vs-space-separated decision is left
    /// to `parser::miller`.
    fn lex_miller_payload(&mut self) -> Result<(), SyntaxError> {
        let open_pos = self.pos();
        let payload_start = self.pos();
        let mut text = String::new();
        loop {
            match self.peek() {
                Some('}') => break,
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
                None => {
                    return Err(SyntaxError::UnterminatedBracket {
                        pos: open_pos,
                        open: '{',
                    })
                }
            }
        }
        let len = self.idx - payload_start.offset;
        self.push(TokenKind::MillerPayload(text.trim().to_string()), payload_start, len);
        let close_pos = self.pos();
        self.advance(); // '}'
        self.push(TokenKind::RBrace, close_pos, 1);
        Ok(())
    }

    /// Scans the raw point-group symbol between `[` and `]`, only entered
    /// when the previous token was a system keyword.
    fn lex_point_group(&mut self) -> Result<(), SyntaxError> {
        let open_pos = self.pos();
        let payload_start = self.pos();
        let mut text = String::new();
        loop {
            match self.peek() {
                Some(']') => break,
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
                None => {
                    return Err(SyntaxError::UnterminatedBracket {
                        pos: open_pos,
                        open: '[',
                    })
                }
            }
        }
        let len = self.idx - payload_start.offset;
        self.push(TokenKind::PointGroup(text.trim().to_string()), payload_start, len);
        let close_pos = self.pos();
        self.advance(); // ']'
        self.push(TokenKind::RBracket, close_pos, 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_simple_crystalline_header() {
        let ks = kinds("cubic[m3m]:{111}");
        assert_eq!(
            ks,
            vec![
                TokenKind::System("cubic".to_string()),
                TokenKind::LBracket,
                TokenKind::PointGroup("m3m".to_string()),
                TokenKind::RBracket,
                TokenKind::Colon,
                TokenKind::LBrace,
                TokenKind::MillerPayload("111".to_string()),
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn recognizes_amorphous_keyword() {
        let ks = kinds("amorphous[opalescent]:{botryoidal}");
        assert!(matches!(ks[0], TokenKind::Amorphous));
    }

    #[test]
    fn separated_miller_payload_is_captured_raw() {
        let ks = kinds("trigonal[32]:{10-10}");
        assert!(matches!(&ks[6], TokenKind::MillerPayload(s) if s == "10-10"));
    }

    #[test]
    fn space_separated_payload_preserves_spaces() {
        let ks = kinds("hexagonal:{12 3 4}");
        assert!(matches!(&ks[3], TokenKind::MillerPayload(s) if s == "12 3 4"));
    }

    #[test]
    fn doc_comment_is_preserved_plain_comment_is_stripped() {
        let ks = kinds("#! a doc comment\n# plain\ncubic:{111}");
        assert!(matches!(&ks[0], TokenKind::DocComment(s) if s == "a doc comment"));
        assert!(matches!(ks[1], TokenKind::System(_)));
    }

    #[test]
    fn block_comment_is_stripped() {
        let ks = kinds("/* note */cubic:{111}");
        assert!(matches!(ks[0], TokenKind::System(_)));
    }

    #[test]
    fn unterminated_brace_is_a_lex_error() {
        let err = tokenize("cubic:{111").unwrap_err();
        assert!(matches!(err, SyntaxError::UnterminatedBracket { open: '{', .. }));
    }

    #[test]
    fn unknown_character_is_a_lex_error() {
        let err = tokenize("cubic:{111}^").unwrap_err();
        assert!(matches!(err, SyntaxError::UnexpectedChar { ch: '^', .. }));
    }

    #[test]
    fn negative_float_literal() {
        let ks = kinds("-3.5");
        assert_eq!(ks[0], TokenKind::Float(-3.5));
    }
}
