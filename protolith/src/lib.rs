//! Runtime support for protolith-generated code.
//!
//! This crate is the small bottom layer holding the byte-stream codec
//! primitives (`varint`, `wire`), the presence-and-error types (`error`),
//! and the `Message` trait that ties a generated struct's
//! `write`/`read`/`len` trio together (`message`). The schema parser and
//! code generator live in the sibling `protolith-parser` and
//! `protolith-codegen` crates; this crate has no dependency on either —
//! code generated by them depends on this crate, not the other way around.

pub mod error;
pub mod message;
pub mod names;
pub mod stream;
pub mod varint;
pub mod wire;

pub use error::{DecodeError, DecodeErrorKind, PresenceError};
pub use message::{len, write, Message};
pub use stream::{ByteStream, CursorStream};
pub use wire::WireType;
