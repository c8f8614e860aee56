use std::fmt;

use crate::model::Loc;

/// A parse-stage failure, named after the construct or expectation that
/// was violated. Unsupported-but-recognized proto2/service/map/option
/// constructs get their own variant so the diagnostic can name exactly what
/// was rejected, reported alongside its location as
/// `ParserErrorWithLocation { error, line, col }`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParserError {
    UnexpectedCharacter(char),
    UnterminatedStringLiteral,
    UnterminatedBlockComment,
    InvalidIntegerLiteral(String),
    UnexpectedToken { expected: String, found: String },
    UnexpectedEof { expected: String },
    MissingSyntaxDeclaration,
    UnknownSyntax(String),
    UnsupportedConstruct(String),
    DuplicatePackage,
    InvalidFieldNumber(i64),
    MissingEnumZeroValue(String),
    InvalidReservedRange(i64, i64),
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserError::UnexpectedCharacter(c) => write!(f, "unexpected character '{}'", c),
            ParserError::UnterminatedStringLiteral => write!(f, "unterminated string literal"),
            ParserError::UnterminatedBlockComment => write!(f, "unterminated block comment"),
            ParserError::InvalidIntegerLiteral(s) => write!(f, "invalid integer literal '{}'", s),
            ParserError::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            ParserError::UnexpectedEof { expected } => {
                write!(f, "unexpected end of file, expected {}", expected)
            }
            ParserError::MissingSyntaxDeclaration => {
                write!(f, "missing mandatory `syntax = \"proto3\";` declaration")
            }
            ParserError::UnknownSyntax(s) => {
                write!(f, "unsupported syntax \"{}\"; only proto3 is supported", s)
            }
            ParserError::UnsupportedConstruct(name) => {
                write!(f, "unsupported construct: `{}` is not part of proto3", name)
            }
            ParserError::DuplicatePackage => {
                write!(f, "a file may declare at most one `package` statement")
            }
            ParserError::InvalidFieldNumber(n) => write!(
                f,
                "field number {} is out of range (must be 1..536870911, excluding 19000..19999)",
                n
            ),
            ParserError::MissingEnumZeroValue(name) => {
                write!(f, "enum `{}` must declare a value for 0 (proto3 requirement)", name)
            }
            ParserError::InvalidReservedRange(from, to) => {
                write!(f, "invalid reserved range {} to {}", from, to)
            }
        }
    }
}

impl std::error::Error for ParserError {}

/// A [`ParserError`] paired with the line/column it was raised at.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserErrorWithLocation {
    pub error: ParserError,
    pub line: u32,
    pub col: u32,
}

impl ParserErrorWithLocation {
    pub fn new(error: ParserError, loc: Loc) -> ParserErrorWithLocation {
        ParserErrorWithLocation {
            error,
            line: loc.line,
            col: loc.col,
        }
    }
}

impl fmt::Display for ParserErrorWithLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.col, self.error)
    }
}

impl std::error::Error for ParserErrorWithLocation {}
