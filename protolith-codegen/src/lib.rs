//! Resolves a parsed proto3 schema tree (from `protolith-parser`) and emits
//! the Rust source text that implements it against the `protolith`
//! runtime: one struct per message, one enum per message's `oneof`, plain
//! enums for proto3 `enum`, and a `protolith::Message` impl per message.

pub mod code_writer;
pub mod generate;
pub mod resolve;
pub mod types;

pub use generate::generate;
pub use resolve::{resolve, ResolvedSchema, TypeKind, ValidationError};

/// Parse, resolve, and generate in one call — the entry point
/// `protolith-build` drives for each configured input file.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let proto_def = protolith_parser::parse(source)?;
    let schema = resolve(proto_def)?;
    log::debug!(
        "resolved {} package(s), {} type(s)",
        schema.proto_def.packages.len(),
        schema.type_kinds.len()
    );
    Ok(generate(&schema))
}

#[derive(Debug)]
pub enum CompileError {
    Parser(protolith_parser::ParserErrorWithLocation),
    Validation(ValidationError),
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Parser(e) => write!(f, "{}", e),
            CompileError::Validation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<protolith_parser::ParserErrorWithLocation> for CompileError {
    fn from(e: protolith_parser::ParserErrorWithLocation) -> CompileError {
        CompileError::Parser(e)
    }
}

impl From<ValidationError> for CompileError {
    fn from(e: ValidationError) -> CompileError {
        CompileError::Validation(e)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn compiles_a_simple_message() {
        let source = r#"
            syntax = "proto3";
            package demo;
            message Point {
                int32 x = 1;
                int32 y = 2;
            }
        "#;
        let out = compile(source).unwrap();
        assert!(out.contains("pub struct Point"));
        assert!(out.contains("impl protolith::Message for Point"));
        assert!(out.contains("pub struct PointInit"));
    }

    #[test]
    fn compiles_oneof_and_repeated_and_nested_message() {
        let source = r#"
            syntax = "proto3";
            package demo;
            message Inner {
                string label = 1;
            }
            message Outer {
                repeated int32 values = 1;
                Inner inner = 2;
                oneof payload {
                    int32 number = 3;
                    string text = 4;
                }
            }
        "#;
        let out = compile(source).unwrap();
        assert!(out.contains("pub struct Outer"));
        assert!(out.contains("pub enum OuterPayload"));
        assert!(out.contains("Number(i32)"));
        assert!(out.contains("Text(String)"));
        assert!(out.contains("Option<Box<Inner>>"));
        assert!(out.contains("Vec<i32>"));
    }

    #[test]
    fn emits_presence_checked_getter_alongside_has_and_reset() {
        let source = r#"
            syntax = "proto3";
            message Point {
                int32 x = 1;
            }
        "#;
        let out = compile(source).unwrap();
        assert!(out.contains("fn get_x(&self) -> Result<&i32, protolith::PresenceError>"));
        assert!(out.contains("fn has_x(&self) -> bool"));
        assert!(out.contains("fn reset_x(&mut self)"));
    }

    #[test]
    fn rejects_unresolved_type_reference() {
        let source = r#"
            syntax = "proto3";
            message M { Missing m = 1; }
        "#;
        let err = compile(source).unwrap_err();
        assert!(matches!(err, CompileError::Validation(ValidationError::UnresolvedTypeReference { .. })));
    }
}
