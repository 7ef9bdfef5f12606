//! Parser — Phase 2 of the CDL pipeline.
//!
//! A recursive-descent consumer of the token stream that produces a typed
//! [`crate::ast::Description`]. Form expressions are parsed by an explicit
//! precedence climber (see [`expr`]) implementing the seven-level table
//! from the language specification. No error recovery is attempted: the
//! first unrecoverable mismatch is returned immediately.

mod expr;
pub mod miller;

use std::collections::HashMap;

use crate::ast::*;
use crate::catalog;
use crate::error::{Position, SyntaxError};
use crate::lexer::{Token, TokenKind};

/// Maximum number of `$name` substitutions performed while expanding a
/// single document, guarding against cyclic definitions.
const MAX_REFERENCE_EXPANSIONS: usize = 16;

pub fn parse(text: &str) -> Result<Description, SyntaxError> {
    let tokens = crate::lexer::tokenize(text)?;
    let mut parser = Parser::new(tokens);
    let description = parser.parse_document()?;
    parser.expect_eof()?;
    Ok(description)
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    definitions: HashMap<String, Vec<Token>>,
    doc_comments: Vec<String>,
    expansions: usize,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            definitions: HashMap::new(),
            doc_comments: Vec::new(),
            expansions: 0,
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn peek_kind_at(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn expect_eof(&mut self) -> Result<(), SyntaxError> {
        if matches!(self.peek().kind, TokenKind::Eof) {
            Ok(())
        } else {
            let tok = self.peek().clone();
            Err(SyntaxError::UnexpectedToken {
                pos: tok.pos,
                found: tok.kind.describe(),
                expected: vec!["end of input".to_string()],
            })
        }
    }

    fn unexpected(&self, expected: &[&str]) -> SyntaxError {
        let tok = self.peek();
        if matches!(tok.kind, TokenKind::Eof) {
            SyntaxError::UnexpectedEof {
                pos: tok.pos,
                expected: expected.iter().map(|s| s.to_string()).collect(),
            }
        } else {
            SyntaxError::UnexpectedToken {
                pos: tok.pos,
                found: tok.kind.describe(),
                expected: expected.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    fn expect_colon(&mut self) -> Result<(), SyntaxError> {
        if matches!(self.peek().kind, TokenKind::Colon) {
            self.advance();
            Ok(())
        } else {
            let pos = self.peek().pos;
            Err(SyntaxError::MissingColon { pos })
        }
    }

    fn expect_identifier(&mut self) -> Result<(String, Position), SyntaxError> {
        match &self.peek().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let pos = self.peek().pos;
                self.advance();
                Ok((name, pos))
            }
            _ => Err(self.unexpected(&["identifier"])),
        }
    }

    /// Substitutes a `$name` reference in place with the raw tokens captured
    /// at its definition site, then continues parsing from the same
    /// position. Called wherever a form expression is expected.
    fn expand_reference_if_present(&mut self) -> Result<(), SyntaxError> {
        if !matches!(self.peek().kind, TokenKind::Dollar) {
            return Ok(());
        }
        let dollar_pos = self.peek().pos;
        self.advance();
        let (name, _) = self.expect_identifier().map_err(|_| SyntaxError::UnexpectedToken {
            pos: dollar_pos,
            found: "'$'".to_string(),
            expected: vec!["reference name".to_string()],
        })?;
        let mut def_tokens = self
            .definitions
            .get(&name)
            .cloned()
            .ok_or_else(|| SyntaxError::UndefinedReference { pos: dollar_pos, name: name.clone() })?;
        self.expansions += 1;
        if self.expansions > MAX_REFERENCE_EXPANSIONS {
            return Err(SyntaxError::DefinitionCycle { pos: dollar_pos, name });
        }
        if matches!(def_tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            def_tokens.pop();
        }
        let insert_at = self.pos;
        for (i, tok) in def_tokens.into_iter().enumerate() {
            self.tokens.insert(insert_at + i, tok);
        }
        Ok(())
    }

    /// Document = prelude (definitions, doc comments) + one material
    /// description.
    pub(crate) fn parse_document(&mut self) -> Result<Description, SyntaxError> {
        self.parse_prelude()?;
        match &self.peek().kind {
            TokenKind::System(_) => self.parse_crystalline().map(Description::Crystalline),
            TokenKind::Amorphous => self.parse_amorphous().map(Description::Amorphous),
            TokenKind::Eof => Err(self.unexpected(&["system keyword", "'amorphous'"])),
            _ => Err(self.unexpected(&["system keyword", "'amorphous'"])),
        }
    }

    fn doc_comment(&self) -> Option<String> {
        if self.doc_comments.is_empty() {
            None
        } else {
            Some(self.doc_comments.join("\n"))
        }
    }

    fn parse_prelude(&mut self) -> Result<(), SyntaxError> {
        loop {
            match &self.peek().kind {
                TokenKind::DocComment(text) => {
                    self.doc_comments.push(text.clone());
                    self.advance();
                }
                TokenKind::At => self.parse_definition()?,
                TokenKind::System(_) | TokenKind::Amorphous | TokenKind::Eof => return Ok(()),
                _ => return Err(self.unexpected(&["definition", "system keyword", "'amorphous'"])),
            }
        }
    }

    /// `@name = expr`, captured as a raw token slice and stored for later
    /// `$name` substitution. The expression runs until the next top-level
    /// definition, the material description, or end of input.
    fn parse_definition(&mut self) -> Result<(), SyntaxError> {
        self.advance(); // '@'
        let (name, _) = self.expect_identifier()?;
        match self.peek().kind {
            TokenKind::Equals => {
                self.advance();
            }
            _ => return Err(self.unexpected(&["'='"])),
        }

        let mut expr_tokens = Vec::new();
        loop {
            if self.starts_new_definition() {
                break;
            }
            match &self.peek().kind {
                TokenKind::System(_) | TokenKind::Amorphous | TokenKind::Eof => break,
                _ => expr_tokens.push(self.advance()),
            }
        }
        expr_tokens.push(Token::new(TokenKind::Eof, self.peek().pos, 0));
        self.definitions.insert(name, expr_tokens);
        Ok(())
    }

    /// Peeks for `@ identifier =`, the start of a new top-level definition.
    fn starts_new_definition(&self) -> bool {
        matches!(self.peek().kind, TokenKind::At)
            && matches!(self.peek_kind_at(1), TokenKind::Identifier(_))
            && matches!(self.peek_kind_at(2), TokenKind::Equals)
    }

    fn parse_crystalline(&mut self) -> Result<CrystallineDescription, SyntaxError> {
        let system = match self.advance().kind {
            TokenKind::System(name) => name,
            _ => unreachable!("checked by caller"),
        };

        let point_group = if matches!(self.peek().kind, TokenKind::LBracket) {
            self.advance();
            let group = match &self.peek().kind {
                TokenKind::PointGroup(s) => s.clone(),
                _ => return Err(self.unexpected(&["point group symbol"])),
            };
            self.advance();
            self.expect(TokenKind::RBracket, &["']'"])?;
            group
        } else {
            catalog::default_point_group(&system).unwrap_or_default().to_string()
        };

        self.expect_colon()?;

        if matches!(self.peek().kind, TokenKind::Eof | TokenKind::System(_) | TokenKind::Amorphous) {
            return Err(SyntaxError::EmptyFormList { pos: self.peek().pos });
        }
        let forms = self.parse_plus_expr(&system)?;

        let (modifications, twin, phenomenon) = self.parse_modifier_chain(&system)?;

        Ok(CrystallineDescription {
            system,
            point_group,
            forms,
            modifications,
            twin,
            phenomenon,
            doc_comment: self.doc_comment(),
        })
    }

    fn parse_amorphous(&mut self) -> Result<AmorphousDescription, SyntaxError> {
        self.advance(); // 'amorphous'

        let subtype = if matches!(self.peek().kind, TokenKind::LBracket) {
            self.advance();
            let (name, _) = self.expect_identifier()?;
            self.expect(TokenKind::RBracket, &["']'"])?;
            Some(name)
        } else {
            None
        };

        self.expect_colon()?;
        self.expect(TokenKind::LBrace, &["'{'"])?;

        let mut shapes = Vec::new();
        loop {
            let (name, _) = self.expect_identifier()?;
            shapes.push(name);
            if matches!(self.peek().kind, TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RBrace, &["'}'"])?;

        let features = if matches!(self.peek().kind, TokenKind::LBracket) {
            Some(self.parse_feature_list()?)
        } else {
            None
        };

        let phenomenon = if matches!(self.peek().kind, TokenKind::Pipe)
            && matches!(self.peek_kind_at(1), TokenKind::Identifier(n) if n == "phenomenon")
        {
            self.advance(); // '|'
            Some(self.parse_phenomenon_clause()?)
        } else {
            None
        };

        Ok(AmorphousDescription {
            subtype,
            shapes,
            features,
            phenomenon,
            doc_comment: self.doc_comment(),
        })
    }

    /// `( | modification(...) | twin(...) )* ( | phenomenon[...] )?`, the
    /// level-6 modifier chain trailing a crystalline form expression.
    fn parse_modifier_chain(
        &mut self,
        _system: &str,
    ) -> Result<(Vec<Modification>, Option<TwinSpec>, Option<PhenomenonSpec>), SyntaxError> {
        let mut modifications = Vec::new();
        let mut twin = None;
        let mut phenomenon = None;

        while matches!(self.peek().kind, TokenKind::Pipe) {
            self.advance();
            match &self.peek().kind {
                TokenKind::Identifier(n) if n == "twin" => {
                    twin = Some(self.parse_twin_clause()?);
                }
                TokenKind::Identifier(n) if n == "phenomenon" => {
                    phenomenon = Some(self.parse_phenomenon_clause()?);
                }
                TokenKind::Identifier(_) => {
                    modifications.push(self.parse_modification()?);
                }
                _ => return Err(self.unexpected(&["modification", "twin(...)", "phenomenon[...]"])),
            }
        }

        Ok((modifications, twin, phenomenon))
    }

    fn expect(&mut self, kind: TokenKind, expected: &[&str]) -> Result<Token, SyntaxError> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }
}
