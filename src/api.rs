//! CDL processing API.
//!
//! Pure functions over CDL source text: no I/O, no process exits, no
//! logging. Each call is self-contained — tokenize, parse, validate — and
//! returns a structured result for the caller to format however it likes.

use crate::ast::Description;
use crate::error::CdlError;
use crate::lexer::TokenKind;
use crate::{catalog, parser, validator};

/// Parses and validates `text`, returning the typed tree on success.
pub fn parse(text: &str) -> Result<Description, CdlError> {
    let description = parser::parse(text)?;
    validator::validate_tree(&description)?;
    Ok(description)
}

/// Runs [`parse`] and reduces the result to a boolean plus an optional
/// human-readable diagnostic, for callers that only need a pass/fail.
pub fn validate(text: &str) -> (bool, Option<String>) {
    match parse(text) {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    }
}

/// Splits a `;`-joined variant expression into its alternatives and parses
/// each independently, returning one [`Description`] per alternative.
///
/// Variant syntax is a single top-level parenthesized group containing
/// `;`-separated sub-expressions, e.g. `cubic[m3m]:({111}; {100})`. This is
/// resolved at the token level, not in the grammar proper: each alternative
/// is substituted for the group and parsed as an ordinary single
/// description, so the recursive-descent parser itself never needs to know
/// about `;`.
pub fn parse_variants(text: &str) -> Result<Vec<Description>, CdlError> {
    let tokens = crate::lexer::tokenize(text)?;
    let Some((group_start, group_end, alternatives)) = split_variant_group(&tokens) else {
        return Ok(vec![parse(text)?]);
    };

    let mut results = Vec::with_capacity(alternatives.len());
    for alt in alternatives {
        // Keep the enclosing parens so any postfix `[features]`/`| twin(...)`
        // after the group still attaches to the whole alternative, not just
        // its last term.
        let mut spliced = tokens[..=group_start].to_vec();
        spliced.extend(alt);
        spliced.extend(tokens[group_end..].iter().cloned());
        let rebuilt = render_tokens_as_group(&spliced);
        results.push(parse(&rebuilt)?);
    }
    Ok(results)
}

/// Finds a single top-level `(...)` group containing one or more top-level
/// `;` separators and returns its token-index bounds (inclusive of the
/// parens) plus the token slices for each `;`-separated alternative
/// (excluding the parens themselves).
type Alternatives = Vec<Vec<crate::lexer::Token>>;

fn split_variant_group(tokens: &[crate::lexer::Token]) -> Option<(usize, usize, Alternatives)> {
    let open = tokens.iter().position(|t| matches!(t.kind, TokenKind::LParen))?;
    let mut depth = 0usize;
    let mut close = None;
    let mut semicolons = Vec::new();
    for (i, tok) in tokens.iter().enumerate().skip(open) {
        match tok.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            TokenKind::Semicolon if depth == 1 => semicolons.push(i),
            _ => {}
        }
    }
    let close = close?;
    if semicolons.is_empty() {
        return None;
    }

    let mut bounds = vec![open + 1];
    bounds.extend(semicolons.iter().map(|i| i + 1));
    let mut alternatives = Vec::new();
    for (idx, &start) in bounds.iter().enumerate() {
        let end = semicolons.get(idx).copied().unwrap_or(close);
        alternatives.push(tokens[start..end].to_vec());
    }
    Some((open, close, alternatives))
}

/// `parse_variants` rebuilds source text rather than re-entering the token
/// stream directly, keeping `parser::parse` as the single entry point that
/// ever constructs a `Parser`. This renders a token slice back into CDL
/// surface syntax good enough to re-tokenize identically.
fn render_tokens_as_group(tokens: &[crate::lexer::Token]) -> String {
    let mut out = String::new();
    for tok in tokens {
        if matches!(tok.kind, TokenKind::Eof) {
            break;
        }
        match &tok.kind {
            TokenKind::System(s) => out.push_str(s),
            TokenKind::Amorphous => out.push_str("amorphous"),
            TokenKind::Identifier(s) => out.push_str(s),
            TokenKind::PointGroup(s) => {
                out.push('[');
                out.push_str(s);
                out.push(']');
            }
            TokenKind::Integer(n) => out.push_str(&n.to_string()),
            TokenKind::Float(n) => out.push_str(&n.to_string()),
            TokenKind::LBrace => out.push('{'),
            TokenKind::RBrace => out.push('}'),
            TokenKind::LBracket => out.push('['),
            TokenKind::RBracket => out.push(']'),
            TokenKind::LParen => out.push('('),
            TokenKind::RParen => out.push(')'),
            TokenKind::Colon => out.push(':'),
            TokenKind::Plus => out.push_str(" + "),
            TokenKind::Pipe => out.push_str(" | "),
            TokenKind::At => out.push('@'),
            TokenKind::Comma => out.push(','),
            TokenKind::Gt => out.push('>'),
            TokenKind::Tilde => out.push('~'),
            TokenKind::Semicolon => out.push(';'),
            TokenKind::Dollar => out.push('$'),
            TokenKind::Equals => out.push('='),
            TokenKind::MillerPayload(s) => out.push_str(s),
            TokenKind::DocComment(_) | TokenKind::Eof => {}
        }
    }
    out
}

/// The recognized crystal systems, `amorphous` included.
pub fn crystal_systems() -> &'static [&'static str] {
    catalog::CRYSTAL_SYSTEMS
}

/// The point groups permitted for `system`, or `None` if unrecognized.
pub fn point_groups_for(system: &str) -> Option<&'static [&'static str]> {
    catalog::point_groups_for(system)
}

pub fn twin_laws() -> &'static [&'static str] {
    catalog::TWIN_LAWS
}

pub fn named_form_names(system: &str) -> Vec<&'static str> {
    catalog::named_form_names(system)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_semantically_invalid_input() {
        let err = parse("cubic[6/mmm]:{111}").unwrap_err();
        assert!(matches!(err, CdlError::Validation(_)));
    }

    #[test]
    fn validate_reports_success_and_failure() {
        assert_eq!(validate("cubic[m3m]:{111}"), (true, None));
        let (ok, msg) = validate("cubic[m3m]:");
        assert!(!ok);
        assert!(msg.is_some());
    }

    #[test]
    fn parse_variants_splits_semicolon_alternatives() {
        let variants = parse_variants("cubic[m3m]:({111}; {100})").unwrap();
        assert_eq!(variants.len(), 2);
    }

    #[test]
    fn parse_variants_is_identity_without_semicolons() {
        let variants = parse_variants("cubic[m3m]:{111}").unwrap();
        assert_eq!(variants.len(), 1);
    }
}
