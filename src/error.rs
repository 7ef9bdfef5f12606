//! Error types for the CDL front-end.
//!
//! Two taxa, matching the two places a CDL string can fail: the lexer/parser
//! (syntax) and the validator (semantics). Both carry the earliest offending
//! source position. No recovery is attempted by either phase; the first
//! failure wins.

use std::fmt;

/// A source position: byte offset plus 1-based line/column for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Failures raised by the lexer or the parser: malformed input before any
/// semantic question is even asked.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxError {
    UnexpectedChar {
        pos: Position,
        ch: char,
    },
    UnterminatedBracket {
        pos: Position,
        open: char,
    },
    MissingColon {
        pos: Position,
    },
    UnexpectedToken {
        pos: Position,
        found: String,
        expected: Vec<String>,
    },
    MalformedMillerPayload {
        pos: Position,
        detail: String,
    },
    EmptyFormList {
        pos: Position,
    },
    DefinitionCycle {
        pos: Position,
        name: String,
    },
    UndefinedReference {
        pos: Position,
        name: String,
    },
    UnexpectedEof {
        pos: Position,
        expected: Vec<String>,
    },
}

impl SyntaxError {
    pub fn position(&self) -> Position {
        match self {
            SyntaxError::UnexpectedChar { pos, .. }
            | SyntaxError::UnterminatedBracket { pos, .. }
            | SyntaxError::MissingColon { pos }
            | SyntaxError::UnexpectedToken { pos, .. }
            | SyntaxError::MalformedMillerPayload { pos, .. }
            | SyntaxError::EmptyFormList { pos }
            | SyntaxError::DefinitionCycle { pos, .. }
            | SyntaxError::UndefinedReference { pos, .. }
            | SyntaxError::UnexpectedEof { pos, .. } => *pos,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::UnexpectedChar { pos, ch } => {
                write!(f, "{}: unexpected character '{}'", pos, ch)
            }
            SyntaxError::UnterminatedBracket { pos, open } => {
                write!(f, "{}: unterminated '{}'", pos, open)
            }
            SyntaxError::MissingColon { pos } => write!(f, "{}: expected ':'", pos),
            SyntaxError::UnexpectedToken {
                pos,
                found,
                expected,
            } => {
                write!(f, "{}: unexpected {}, expected one of {}", pos, found, expected.join(", "))
            }
            SyntaxError::MalformedMillerPayload { pos, detail } => {
                write!(f, "{}: malformed Miller index: {}", pos, detail)
            }
            SyntaxError::EmptyFormList { pos } => {
                write!(f, "{}: form expression must not be empty", pos)
            }
            SyntaxError::DefinitionCycle { pos, name } => {
                write!(f, "{}: cyclic reference to '${}'", pos, name)
            }
            SyntaxError::UndefinedReference { pos, name } => {
                write!(f, "{}: reference to undefined '${}'", pos, name)
            }
            SyntaxError::UnexpectedEof { pos, expected } => {
                write!(
                    f,
                    "{}: unexpected end of input, expected one of {}",
                    pos,
                    expected.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Failures raised by the validator: the tree is syntactically well-formed
/// but violates a domain constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    UnknownSystem(String),
    PointGroupNotPermitted { system: String, group: String },
    MillerBravaisViolation { h: i32, k: i32, i: i32 },
    FourIndexOutsideHexagonal { system: String },
    UnknownTwinLaw(String),
    BadRepeatCount(i32),
    UnknownAggregateArrangement(String),
    UnknownAggregateOrientation(String),
    UnknownModificationKind(String),
    UnknownAmorphousSubtype(String),
    UnknownAmorphousShape(String),
    NegativeAggregateCount,
    NegativeScale(f64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownSystem(name) => {
                write!(f, "unknown crystal system '{}'", name)
            }
            ValidationError::PointGroupNotPermitted { system, group } => {
                write!(f, "point group '{}' is not valid for system '{}'", group, system)
            }
            ValidationError::MillerBravaisViolation { h, k, i } => write!(
                f,
                "Miller-Bravais constraint violated: i={} but -(h+k)={}",
                i,
                -(h + k)
            ),
            ValidationError::FourIndexOutsideHexagonal { system } => write!(
                f,
                "4-index Miller-Bravais form is not valid for system '{}'",
                system
            ),
            ValidationError::UnknownTwinLaw(name) => write!(f, "unknown twin law '{}'", name),
            ValidationError::BadRepeatCount(n) => {
                write!(f, "twin repeat count must be >= 2, got {}", n)
            }
            ValidationError::UnknownAggregateArrangement(name) => {
                write!(f, "unknown aggregate arrangement '{}'", name)
            }
            ValidationError::UnknownAggregateOrientation(name) => {
                write!(f, "unknown aggregate orientation '{}'", name)
            }
            ValidationError::UnknownModificationKind(name) => {
                write!(f, "unknown modification kind '{}'", name)
            }
            ValidationError::UnknownAmorphousSubtype(name) => {
                write!(f, "unknown amorphous subtype '{}'", name)
            }
            ValidationError::UnknownAmorphousShape(name) => {
                write!(f, "unknown amorphous shape '{}'", name)
            }
            ValidationError::NegativeAggregateCount => {
                write!(f, "aggregate count must not be negative")
            }
            ValidationError::NegativeScale(n) => {
                write!(f, "scale factor must not be negative, got {}", n)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// The umbrella failure returned by the facade.
#[derive(Debug, Clone, PartialEq)]
pub enum CdlError {
    Syntax(SyntaxError),
    Validation(ValidationError),
}

impl fmt::Display for CdlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdlError::Syntax(e) => write!(f, "syntax error: {}", e),
            CdlError::Validation(e) => write!(f, "invalid: {}", e),
        }
    }
}

impl std::error::Error for CdlError {}

impl From<SyntaxError> for CdlError {
    fn from(e: SyntaxError) -> Self {
        CdlError::Syntax(e)
    }
}

impl From<ValidationError> for CdlError {
    fn from(e: ValidationError) -> Self {
        CdlError::Validation(e)
    }
}
