//! Lexing and parsing of proto3 source text into a schema tree.
//!
//! This crate stops at syntax: it builds the tree described in [`model`]
//! and rejects constructs proto3 itself disallows (`optional`, `required`,
//! `extensions`, `extend`, `service`, `option`, `map`, missing enum zero
//! value). It does not resolve type references or check for duplicate or
//! reserved field names/numbers across a whole message — that is
//! `protolith-codegen`'s job.

pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;

pub use error::{ParserError, ParserErrorWithLocation};
pub use model::{
    Enum, EnumVal, Field, FieldOrOneof, Loc, Oneof, Package, ProtoDef, ProtoType, Reserved,
    ScalarType, WithLoc,
};
pub use parser::parse;
