use std::fmt;

/// Category of a failure produced while decoding a wire-format stream.
///
/// Mirrors the categorized error style used throughout the codegen and
/// parser crates: a small closed enum rather than a free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// A varint ran past the 10-byte limit without its continuation bit clearing.
    MalformedVarint,
    /// The stream ended before the expected number of bytes were available.
    Truncated,
    /// A length-delimited field declared a negative length.
    NegativeLength,
}

/// An error encountered while decoding a message from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    message: String,
}

impl DecodeError {
    pub fn malformed_varint() -> DecodeError {
        DecodeError {
            kind: DecodeErrorKind::MalformedVarint,
            message: "malformed varint: continuation bit never cleared within 10 bytes".to_owned(),
        }
    }

    pub fn truncated() -> DecodeError {
        DecodeError {
            kind: DecodeErrorKind::Truncated,
            message: "truncated stream: fewer bytes available than required".to_owned(),
        }
    }

    pub fn negative_length(len: i64) -> DecodeError {
        DecodeError {
            kind: DecodeErrorKind::NegativeLength,
            message: format!("length-delimited field declared negative length {}", len),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DecodeError {}

/// Raised when a presence-aware accessor is called on a field that was
/// never set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceError {
    pub field: &'static str,
}

impl fmt::Display for PresenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field \"{}\" isn't initialized", self.field)
    }
}

impl std::error::Error for PresenceError {}
