//! The precedence climber for form expressions (levels 1-5 of the table in
//! the language specification) plus the grammar fragments that hang off a
//! primary: feature lists, twin clauses, modifications, and phenomena.
//!
//! ```text
//! level 1  @        scale            left   (tightest)
//! level 2  [...]    features         left, postfix
//! level 3  >        nested growth    right
//! level 4  ~        aggregate        left
//! level 5  +        form addition    left   (loosest climbed here)
//! ```
//!
//! Each level's parse function calls the next-tighter level for its
//! operand(s), so a tighter operator ends up nested inside a looser one —
//! e.g. `a + b > c` parses as `a + (b > c)` because `parse_plus` calls
//! `parse_tilde` calls `parse_gt`, and `>` is consumed before `parse_tilde`
//! ever looks for a trailing `~`.

use super::miller;
use super::Parser;
use crate::ast::*;
use crate::catalog;
use crate::error::SyntaxError;
use crate::lexer::TokenKind;

impl Parser {
    /// Level 5: `+`-joined sequence of terms, left-associative. This is the
    /// "top-level form tree" stored directly on `CrystallineDescription`,
    /// and is also what a grouped expression's parentheses contain.
    pub(super) fn parse_plus_expr(&mut self, system: &str) -> Result<Vec<FormNode>, SyntaxError> {
        let mut terms = vec![self.parse_tilde(system)?];
        while matches!(self.peek_kind(), TokenKind::Plus) {
            self.advance();
            terms.push(self.parse_tilde(system)?);
        }
        Ok(terms)
    }

    /// Level 4: optional trailing `~ arrangement[count] [@spacing] [[orientation[, param]]]`.
    fn parse_tilde(&mut self, system: &str) -> Result<FormNode, SyntaxError> {
        let inner = self.parse_gt(system)?;
        if !matches!(self.peek_kind(), TokenKind::Tilde) {
            return Ok(inner);
        }
        self.advance();
        let (arrangement, _) = self.expect_identifier()?;
        self.expect(TokenKind::LBracket, &["'['"])?;
        let count = self.expect_count()?;
        self.expect(TokenKind::RBracket, &["']'"])?;

        let spacing = self.try_parse_spacing()?;

        let mut orientation = None;
        let mut orientation_param = None;
        if matches!(self.peek_kind(), TokenKind::LBracket) {
            self.advance();
            let (name, _) = self.expect_identifier()?;
            orientation = Some(name);
            if matches!(self.peek_kind(), TokenKind::Comma) {
                self.advance();
                orientation_param = Some(self.expect_number()?);
            }
            self.expect(TokenKind::RBracket, &["']'"])?;
        }

        Ok(FormNode::AggregateSpec(Box::new(AggregateSpec {
            inner,
            arrangement,
            count,
            spacing,
            orientation,
            orientation_param,
        })))
    }

    /// `@spacing`, e.g. `@2mm`: a number token immediately followed (no
    /// whitespace) by an identifier unit is folded into one spacing string.
    fn try_parse_spacing(&mut self) -> Result<Option<String>, SyntaxError> {
        if !matches!(self.peek_kind(), TokenKind::At) {
            return Ok(None);
        }
        self.advance();
        let num_tok = match self.peek_kind().clone() {
            TokenKind::Integer(n) => {
                let tok = self.advance();
                (tok, n.to_string())
            }
            TokenKind::Float(n) => {
                let tok = self.advance();
                (tok, n.to_string())
            }
            _ => return Err(self.unexpected(&["spacing value"])),
        };
        let (tok, mut text) = num_tok;
        if let TokenKind::Identifier(unit) = self.peek_kind().clone() {
            if tok.pos.offset + tok.len == self.peek().pos.offset {
                text.push_str(&unit);
                self.advance();
            }
        }
        Ok(Some(text))
    }

    /// Level 3: `>` nested growth, right-associative.
    fn parse_gt(&mut self, system: &str) -> Result<FormNode, SyntaxError> {
        let base = self.parse_bracket_postfix(system)?;
        if !matches!(self.peek_kind(), TokenKind::Gt) {
            return Ok(base);
        }
        self.advance();
        let overgrowth = self.parse_gt(system)?;
        Ok(FormNode::NestedGrowth(Box::new(NestedGrowth { base, overgrowth })))
    }

    /// Level 2: optional postfix `[features]`.
    fn parse_bracket_postfix(&mut self, system: &str) -> Result<FormNode, SyntaxError> {
        let inner = self.parse_at_postfix(system)?;
        if !matches!(self.peek_kind(), TokenKind::LBracket) {
            return Ok(inner);
        }
        let features = self.parse_feature_list()?;
        match inner {
            FormNode::CrystalForm(mut f) => {
                f.features = Some(features);
                Ok(FormNode::CrystalForm(f))
            }
            FormNode::FormGroup(mut g) => {
                g.features = Some(features);
                Ok(FormNode::FormGroup(g))
            }
            _ => Err(self.unexpected(&["a form or group to attach features to"])),
        }
    }

    /// Level 1: optional postfix `@scale`.
    fn parse_at_postfix(&mut self, system: &str) -> Result<FormNode, SyntaxError> {
        let inner = self.parse_primary(system)?;
        if !matches!(self.peek_kind(), TokenKind::At) {
            return Ok(inner);
        }
        self.advance();
        let scale = self.expect_number()?;
        match inner {
            FormNode::CrystalForm(mut f) => {
                f.scale = scale;
                Ok(FormNode::CrystalForm(f))
            }
            _ => Err(self.unexpected(&["a crystal form to scale"])),
        }
    }

    /// Primary: a Miller literal, a named form, a labeled form, a `$name`
    /// reference, or a grouped expression.
    fn parse_primary(&mut self, system: &str) -> Result<FormNode, SyntaxError> {
        self.expand_reference_if_present()?;

        if matches!(self.peek_kind(), TokenKind::LParen) {
            return self.parse_group(system);
        }

        if let TokenKind::Identifier(name) = self.peek_kind().clone() {
            if matches!(self.peek_kind_at(1), TokenKind::Colon)
                && matches!(self.peek_kind_at(2), TokenKind::LBrace | TokenKind::Identifier(_))
            {
                self.advance(); // label
                self.advance(); // ':'
                let mut inner = self.parse_miller_or_named(system)?;
                if let FormNode::CrystalForm(ref mut f) = inner {
                    f.label = Some(name);
                }
                return Ok(inner);
            }
        }

        self.parse_miller_or_named(system)
    }

    fn parse_miller_or_named(&mut self, system: &str) -> Result<FormNode, SyntaxError> {
        match self.peek_kind().clone() {
            TokenKind::LBrace => {
                self.advance();
                let pos = self.peek().pos;
                let payload = match self.peek_kind().clone() {
                    TokenKind::MillerPayload(s) => s,
                    _ => return Err(self.unexpected(&["Miller payload"])),
                };
                self.advance();
                self.expect(TokenKind::RBrace, &["'}'"])?;
                let idx = miller::decode(&payload, pos)?;
                Ok(FormNode::CrystalForm(CrystalForm::new(idx)))
            }
            TokenKind::Identifier(name) => {
                let pos = self.peek().pos;
                self.advance();
                match catalog::resolve_named_form(system, &name) {
                    Some(idx) => {
                        let mut form = CrystalForm::new(idx);
                        form.name = Some(name);
                        Ok(FormNode::CrystalForm(form))
                    }
                    None => Err(SyntaxError::UnexpectedToken {
                        pos,
                        found: format!("identifier '{}'", name),
                        expected: vec!["a named form".to_string()],
                    }),
                }
            }
            _ => Err(self.unexpected(&["Miller index", "named form", "group"])),
        }
    }

    /// `(` form-expr `)`, optionally carrying a trailing `[features]` and a
    /// `| twin(...)` clause (which may appear either just before the
    /// closing paren or just after it — both attach to the group).
    fn parse_group(&mut self, system: &str) -> Result<FormNode, SyntaxError> {
        self.advance(); // '('
        let members = self.parse_plus_expr(system)?;

        let mut twin = None;
        if matches!(self.peek_kind(), TokenKind::Pipe) && self.peek_is_twin_clause() {
            self.advance();
            twin = Some(self.parse_twin_clause()?);
        }
        self.expect(TokenKind::RParen, &["')'"])?;

        let mut features = None;
        if matches!(self.peek_kind(), TokenKind::LBracket) {
            features = Some(self.parse_feature_list()?);
        }
        if twin.is_none() && matches!(self.peek_kind(), TokenKind::Pipe) && self.peek_is_twin_clause() {
            self.advance();
            twin = Some(self.parse_twin_clause()?);
        }

        Ok(FormNode::FormGroup(FormGroup {
            members,
            features,
            label: None,
            twin,
        }))
    }

    fn peek_is_twin_clause(&self) -> bool {
        matches!(self.peek_kind_at(1), TokenKind::Identifier(n) if n == "twin")
            && matches!(self.peek_kind_at(2), TokenKind::LParen)
    }

    /// `twin(` either `identifier [, integer]` or `[h,k,l], number [, type]` `)`.
    /// Expects the current token to be the `twin` identifier.
    pub(super) fn parse_twin_clause(&mut self) -> Result<TwinSpec, SyntaxError> {
        self.advance(); // 'twin'
        self.expect(TokenKind::LParen, &["'('"])?;

        if matches!(self.peek_kind(), TokenKind::LBracket) {
            self.advance();
            let h = self.expect_integer()?;
            self.expect(TokenKind::Comma, &["','"])?;
            let k = self.expect_integer()?;
            self.expect(TokenKind::Comma, &["','"])?;
            let l = self.expect_integer()?;
            self.expect(TokenKind::RBracket, &["']'"])?;
            self.expect(TokenKind::Comma, &["','"])?;
            let angle = self.expect_number()?;
            let twin_type = if matches!(self.peek_kind(), TokenKind::Comma) {
                self.advance();
                Some(self.expect_identifier()?.0)
            } else {
                None
            };
            self.expect(TokenKind::RParen, &["')'"])?;
            Ok(TwinSpec::Custom { axis: (h, k, l), angle, twin_type })
        } else {
            let (law, _) = self.expect_identifier()?;
            let repeat = if matches!(self.peek_kind(), TokenKind::Comma) {
                self.advance();
                Some(self.expect_integer()?)
            } else {
                None
            };
            self.expect(TokenKind::RParen, &["')'"])?;
            Ok(TwinSpec::Named { law, repeat })
        }
    }

    /// `identifier(` parameter (`,` parameter)* `)`, a modification clause.
    /// Expects the current token to be the modification's kind identifier.
    pub(super) fn parse_modification(&mut self) -> Result<Modification, SyntaxError> {
        let (kind, _) = self.expect_identifier()?;
        self.expect(TokenKind::LParen, &["'('"])?;
        let params = self.parse_named_param_list(TokenKind::RParen)?;
        self.expect(TokenKind::RParen, &["')'"])?;
        Ok(Modification { kind, params })
    }

    /// `phenomenon[` identifier (`,` param)* `]`. Expects the current token
    /// to be the `phenomenon` identifier.
    pub(super) fn parse_phenomenon_clause(&mut self) -> Result<PhenomenonSpec, SyntaxError> {
        self.advance(); // 'phenomenon'
        self.expect(TokenKind::LBracket, &["'['"])?;
        let (kind, _) = self.expect_identifier()?;
        let mut params = Vec::new();
        while matches!(self.peek_kind(), TokenKind::Comma) {
            self.advance();
            let (name, _) = self.expect_identifier()?;
            self.expect(TokenKind::Colon, &["':'"])?;
            let value = self.parse_param_value()?;
            params.push((name, value));
        }
        self.expect(TokenKind::RBracket, &["']'"])?;
        Ok(PhenomenonSpec { kind, params })
    }

    fn parse_named_param_list(&mut self, terminator: TokenKind) -> Result<Vec<(String, ParamValue)>, SyntaxError> {
        let mut params = Vec::new();
        if self.peek_kind() == &terminator {
            return Ok(params);
        }
        loop {
            let (name, _) = self.expect_identifier()?;
            self.expect(TokenKind::Colon, &["':'"])?;
            let value = self.parse_param_value()?;
            params.push((name, value));
            if matches!(self.peek_kind(), TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(params)
    }

    fn parse_param_value(&mut self) -> Result<ParamValue, SyntaxError> {
        match self.peek_kind().clone() {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(ParamValue::Number(n as f64))
            }
            TokenKind::Float(n) => {
                self.advance();
                Ok(ParamValue::Number(n))
            }
            TokenKind::Identifier(s) => {
                self.advance();
                Ok(ParamValue::Identifier(s))
            }
            _ => Err(self.unexpected(&["number", "identifier"])),
        }
    }

    /// `[` feature (`,` feature)* `]`.
    pub(super) fn parse_feature_list(&mut self) -> Result<Vec<Feature>, SyntaxError> {
        self.expect(TokenKind::LBracket, &["'['"])?;
        let mut features = Vec::new();
        loop {
            let (name, _) = self.expect_identifier()?;
            let mut values = Vec::new();
            if matches!(self.peek_kind(), TokenKind::Colon) {
                self.advance();
                loop {
                    values.push(self.parse_feature_value()?);
                    if self.peek_starts_value() {
                        continue;
                    }
                    break;
                }
            }
            features.push(Feature { name, values });
            if matches!(self.peek_kind(), TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RBracket, &["']'"])?;
        Ok(features)
    }

    fn peek_starts_value(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Integer(_) | TokenKind::Float(_) | TokenKind::Identifier(_)
        )
    }

    fn parse_feature_value(&mut self) -> Result<FeatureValue, SyntaxError> {
        match self.peek_kind().clone() {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(FeatureValue::Integer(n as i32))
            }
            TokenKind::Float(n) => {
                self.advance();
                Ok(FeatureValue::Float(n))
            }
            TokenKind::Identifier(s) => {
                self.advance();
                if s.contains('-') {
                    Ok(FeatureValue::ColorSpec(s.split('-').map(|p| p.to_string()).collect()))
                } else {
                    Ok(FeatureValue::Identifier(s))
                }
            }
            _ => Err(self.unexpected(&["feature value"])),
        }
    }

    fn expect_integer(&mut self) -> Result<i32, SyntaxError> {
        match self.peek_kind().clone() {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(n as i32)
            }
            _ => Err(self.unexpected(&["integer"])),
        }
    }

    /// Accepts any integer literal, negative included: the grammar admits
    /// any count, and it is the validator's job (`check_aggregate`) to
    /// reject a negative one.
    fn expect_count(&mut self) -> Result<i64, SyntaxError> {
        Ok(self.expect_integer()? as i64)
    }

    fn expect_number(&mut self) -> Result<f64, SyntaxError> {
        match self.peek_kind().clone() {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(n as f64)
            }
            TokenKind::Float(n) => {
                self.advance();
                Ok(n)
            }
            _ => Err(self.unexpected(&["number"])),
        }
    }
}
