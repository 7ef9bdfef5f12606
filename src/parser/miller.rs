//! Decodes the raw Miller payload captured by the lexer between `{` and `}`
//! into a [`MillerIndex`].
//!
//! Two literal shapes are supported, disambiguated by whether the payload
//! contains whitespace (per the design notes: "if the first non-sign
//! character is followed by a space before `}`, treat as space-separated,
//! otherwise as dense" — checking for any internal whitespace is equivalent
//! for well-formed input and avoids re-deriving the peek logic here):
//!
//! - **Dense**: `10-11` or `111` — each digit, optionally preceded by `-`,
//!   is one signed index.
//! - **Space-separated**: `12 3 4` — each whitespace-separated signed
//!   integer is one index.
//!
//! A 4-index payload is read in the conventional Miller-Bravais order
//! `h k i l`: the third value is `i`, not `l`.

use crate::ast::MillerIndex;
use crate::error::{Position, SyntaxError};

pub fn decode(raw: &str, pos: Position) -> Result<MillerIndex, SyntaxError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SyntaxError::MalformedMillerPayload {
            pos,
            detail: "empty Miller payload".to_string(),
        });
    }

    let values = if trimmed.chars().any(|c| c.is_whitespace()) {
        decode_separated(trimmed)
    } else {
        decode_dense(trimmed)
    }
    .map_err(|detail| SyntaxError::MalformedMillerPayload { pos, detail })?;

    match values.len() {
        3 => Ok(MillerIndex::new_3(values[0], values[1], values[2])),
        4 => Ok(MillerIndex::new_4(values[0], values[1], values[3], values[2])),
        n => Err(SyntaxError::MalformedMillerPayload {
            pos,
            detail: format!("expected 3 or 4 indices, got {}", n),
        }),
    }
}

fn decode_dense(s: &str) -> Result<Vec<i32>, String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '-' {
            let Some(d) = chars.get(i + 1).and_then(|c| c.to_digit(10)) else {
                return Err(format!("dangling '-' at position {} in dense Miller payload", i));
            };
            out.push(-(d as i32));
            i += 2;
        } else if let Some(d) = chars[i].to_digit(10) {
            out.push(d as i32);
            i += 1;
        } else {
            return Err(format!(
                "unexpected character '{}' in dense Miller payload",
                chars[i]
            ));
        }
    }
    Ok(out)
}

fn decode_separated(s: &str) -> Result<Vec<i32>, String> {
    s.split_whitespace()
        .map(|tok| tok.parse::<i32>().map_err(|_| format!("invalid index '{}'", tok)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> Position {
        Position::new(0, 1, 1)
    }

    #[test]
    fn dense_three_index() {
        let idx = decode("111", p()).unwrap();
        assert_eq!(idx.as_triple(), (1, 1, 1));
        assert!(idx.i.is_none());
    }

    #[test]
    fn dense_four_index_hkil_order() {
        let idx = decode("10-10", p()).unwrap();
        assert_eq!((idx.h, idx.k, idx.i, idx.l), (1, 0, Some(-1), 0));
    }

    #[test]
    fn dense_four_index_second_case() {
        let idx = decode("10-11", p()).unwrap();
        assert_eq!((idx.h, idx.k, idx.i, idx.l), (1, 0, Some(-1), 1));
    }

    #[test]
    fn miller_bravais_invariant_holds_for_decoded_examples() {
        for raw in ["10-10", "10-11"] {
            let idx = decode(raw, p()).unwrap();
            assert_eq!(idx.i.unwrap(), -(idx.h + idx.k));
        }
    }

    #[test]
    fn separated_form() {
        let idx = decode("12 3 4", p()).unwrap();
        assert_eq!(idx.as_triple(), (12, 3, 4));
    }

    #[test]
    fn separated_four_index() {
        let idx = decode("1 0 -1 0", p()).unwrap();
        assert_eq!((idx.h, idx.k, idx.i, idx.l), (1, 0, Some(-1), 0));
    }

    #[test]
    fn wrong_count_is_malformed() {
        let err = decode("11", p()).unwrap_err();
        assert!(matches!(err, SyntaxError::MalformedMillerPayload { .. }));
    }

    #[test]
    fn empty_payload_is_malformed() {
        let err = decode("", p()).unwrap_err();
        assert!(matches!(err, SyntaxError::MalformedMillerPayload { .. }));
    }
}
