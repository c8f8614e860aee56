//! Two-pass semantic resolution: gather every message/enum's fully
//! qualified name, then rewrite each field's type reference to the FQN it
//! names, enforcing the duplicate/reserved-name/number rules along the way.
//!
//! Mirrors the shape of `protobuf-codegen-pure`'s `model.rs` scope walk,
//! scaled down to proto3's single-package, no-imports world: one file in,
//! one resolved tree out.

use std::collections::HashMap;
use std::fmt;

use protolith_parser::{Enum, Field, FieldOrOneof, Message, Package, ProtoDef, ProtoType, Reserved};

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    UnresolvedTypeReference { message: String, type_name: String },
    DuplicateFieldName { message: String, name: String },
    DuplicateFieldNumber { message: String, number: i32 },
    ReservedFieldName { message: String, name: String },
    ReservedFieldNumber { message: String, number: i32 },
    DuplicateTypeName { name: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnresolvedTypeReference { message, type_name } => write!(
                f,
                "message `{}` references unknown type `{}`",
                message, type_name
            ),
            ValidationError::DuplicateFieldName { message, name } => {
                write!(f, "message `{}` declares field `{}` more than once", message, name)
            }
            ValidationError::DuplicateFieldNumber { message, number } => write!(
                f,
                "message `{}` uses field number {} more than once",
                message, number
            ),
            ValidationError::ReservedFieldName { message, name } => write!(
                f,
                "message `{}` declares field `{}`, which is reserved",
                message, name
            ),
            ValidationError::ReservedFieldNumber { message, number } => write!(
                f,
                "message `{}` uses field number {}, which is reserved",
                message, number
            ),
            ValidationError::DuplicateTypeName { name } => {
                write!(f, "`{}` is declared more than once", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Message,
    Enum,
}

/// A resolved schema: the parsed tree, plus a lookup table from every
/// fully-qualified message/enum name to its kind, needed by the code
/// generator to decide whether a `Named` field type is a message (boxed
/// behind `Option<Box<T>>`) or an enum (`Option<T>` with an `i32` default).
pub struct ResolvedSchema {
    pub proto_def: ProtoDef,
    pub type_kinds: HashMap<String, TypeKind>,
}

/// Resolve and validate a parsed [`ProtoDef`], rewriting every field's
/// [`ProtoType::Named`] to the fully-qualified name it refers to.
pub fn resolve(mut proto_def: ProtoDef) -> Result<ResolvedSchema, ValidationError> {
    let mut type_kinds = HashMap::new();
    for package in &proto_def.packages {
        gather_names(&package.name, &package.messages, &package.enums, &mut type_kinds)?;
    }

    for package in &mut proto_def.packages {
        for m in &mut package.messages {
            resolve_message(&package.name, &package.name, &mut m.t, &type_kinds)?;
        }
    }

    Ok(ResolvedSchema { proto_def, type_kinds })
}

fn join(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_owned()
    } else {
        format!("{}.{}", scope, name)
    }
}

fn gather_names(
    scope: &str,
    messages: &[protolith_parser::WithLoc<Message>],
    enums: &[protolith_parser::WithLoc<Enum>],
    out: &mut HashMap<String, TypeKind>,
) -> Result<(), ValidationError> {
    for m in messages {
        let fqn = join(scope, &m.t.name);
        if out.insert(fqn.clone(), TypeKind::Message).is_some() {
            return Err(ValidationError::DuplicateTypeName { name: fqn });
        }
        gather_names(&fqn, &m.t.messages, &m.t.enums, out)?;
    }
    for e in enums {
        let fqn = join(scope, &e.t.name);
        if out.insert(fqn.clone(), TypeKind::Enum).is_some() {
            return Err(ValidationError::DuplicateTypeName { name: fqn });
        }
    }
    Ok(())
}

/// Resolve one message in place: its own fields, then recurse into nested
/// messages with their own scope appended.
fn resolve_message(
    package: &str,
    scope: &str,
    message: &mut Message,
    type_kinds: &HashMap<String, TypeKind>,
) -> Result<(), ValidationError> {
    let fqn = join(scope, &message.name);
    validate_fields(&fqn, message)?;

    for entry in &mut message.fields {
        match &mut entry.t {
            FieldOrOneof::Field(field) => resolve_field(package, &fqn, &fqn, field, type_kinds)?,
            FieldOrOneof::Oneof(oneof) => {
                for f in &mut oneof.fields {
                    resolve_field(package, &fqn, &fqn, &mut f.t, type_kinds)?;
                }
            }
        }
    }

    for nested in &mut message.messages {
        resolve_message(package, &fqn, &mut nested.t, type_kinds)?;
    }

    Ok(())
}

fn resolve_field(
    package: &str,
    message_fqn: &str,
    enclosing_scope: &str,
    field: &mut Field,
    type_kinds: &HashMap<String, TypeKind>,
) -> Result<(), ValidationError> {
    let name = match &field.proto_type {
        ProtoType::Scalar(_) => return Ok(()),
        ProtoType::Named(name) => name.clone(),
    };

    let resolved = if let Some(absolute) = name.strip_prefix('.') {
        if type_kinds.contains_key(absolute) {
            Some(absolute.to_owned())
        } else {
            None
        }
    } else {
        lookup_relative(enclosing_scope, package, &name, type_kinds)
    };

    match resolved {
        Some(fqn) => {
            field.proto_type = ProtoType::Named(fqn);
            Ok(())
        }
        None => Err(ValidationError::UnresolvedTypeReference {
            message: message_fqn.to_owned(),
            type_name: name,
        }),
    }
}

/// Search from the innermost scope outward, then the package scope, then
/// (for a file with no `package` statement) the bare name itself.
fn lookup_relative(
    scope: &str,
    package: &str,
    name: &str,
    type_kinds: &HashMap<String, TypeKind>,
) -> Option<String> {
    let mut current = scope;
    loop {
        let candidate = join(current, name);
        if type_kinds.contains_key(&candidate) {
            return Some(candidate);
        }
        match current.rfind('.') {
            Some(idx) => current = &current[..idx],
            None => break,
        }
    }
    if !package.is_empty() && current != package {
        let candidate = join(package, name);
        if type_kinds.contains_key(&candidate) {
            return Some(candidate);
        }
    }
    if type_kinds.contains_key(name) {
        return Some(name.to_owned());
    }
    None
}

fn validate_fields(message_fqn: &str, message: &Message) -> Result<(), ValidationError> {
    let fields = message.flattened_fields();

    let mut seen_names: HashMap<&str, ()> = HashMap::new();
    let mut seen_numbers: HashMap<i32, ()> = HashMap::new();
    for field in &fields {
        if seen_names.insert(field.name.as_str(), ()).is_some() {
            return Err(ValidationError::DuplicateFieldName {
                message: message_fqn.to_owned(),
                name: field.name.clone(),
            });
        }
        if seen_numbers.insert(field.number, ()).is_some() {
            return Err(ValidationError::DuplicateFieldNumber {
                message: message_fqn.to_owned(),
                number: field.number,
            });
        }
    }

    for field in &fields {
        for reserved in &message.reserved {
            match reserved {
                Reserved::Name(reserved_name) if reserved_name == &field.name => {
                    return Err(ValidationError::ReservedFieldName {
                        message: message_fqn.to_owned(),
                        name: field.name.clone(),
                    });
                }
                Reserved::Number(n) if *n == field.number => {
                    return Err(ValidationError::ReservedFieldNumber {
                        message: message_fqn.to_owned(),
                        number: field.number,
                    });
                }
                Reserved::Range(from, to) if field.number >= *from && field.number <= *to => {
                    return Err(ValidationError::ReservedFieldNumber {
                        message: message_fqn.to_owned(),
                        number: field.number,
                    });
                }
                _ => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(source: &str) -> ProtoDef {
        protolith_parser::parse(source).unwrap()
    }

    #[test]
    fn resolves_sibling_message_reference() {
        let def = parse(
            r#"
            syntax = "proto3";
            package p;
            message A { B b = 1; }
            message B { int32 n = 1; }
            "#,
        );
        let resolved = resolve(def).unwrap();
        let a = &resolved.proto_def.packages[0].messages[0].t;
        match &a.field_by_name("b").unwrap().proto_type {
            ProtoType::Named(n) => assert_eq!(n, "p.B"),
            _ => panic!("expected Named"),
        }
        assert_eq!(resolved.type_kinds.get("p.B"), Some(&TypeKind::Message));
    }

    #[test]
    fn unresolved_reference_is_an_error() {
        let def = parse(
            r#"
            syntax = "proto3";
            message A { Missing m = 1; }
            "#,
        );
        let err = resolve(def).unwrap_err();
        assert!(matches!(err, ValidationError::UnresolvedTypeReference { .. }));
    }

    #[test]
    fn duplicate_field_number_is_rejected() {
        let def = parse(
            r#"
            syntax = "proto3";
            message A {
                int32 a = 1;
                int32 b = 1;
            }
            "#,
        );
        let err = resolve(def).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateFieldNumber { .. }));
    }

    #[test]
    fn reserved_number_conflicts_with_field() {
        let def = parse(
            r#"
            syntax = "proto3";
            message A {
                reserved 1;
                int32 a = 1;
            }
            "#,
        );
        let err = resolve(def).unwrap_err();
        assert!(matches!(err, ValidationError::ReservedFieldNumber { .. }));
    }

    #[test]
    fn absolute_reference_skips_scope_search() {
        let def = parse(
            r#"
            syntax = "proto3";
            package p;
            message A { .p.B b = 1; }
            message B { int32 n = 1; }
            "#,
        );
        let resolved = resolve(def).unwrap();
        let a = &resolved.proto_def.packages[0].messages[0].t;
        match &a.field_by_name("b").unwrap().proto_type {
            ProtoType::Named(n) => assert_eq!(n, "p.B"),
            _ => panic!("expected Named"),
        }
    }

    #[test]
    fn nested_message_can_reference_outer_sibling() {
        let def = parse(
            r#"
            syntax = "proto3";
            package p;
            message Outer {
                message Inner {
                    Sibling s = 1;
                }
                message Sibling { int32 n = 1; }
            }
            "#,
        );
        let resolved = resolve(def).unwrap();
        let outer = &resolved.proto_def.packages[0].messages[0].t;
        let inner = &outer.messages[0].t;
        match &inner.field_by_name("s").unwrap().proto_type {
            ProtoType::Named(n) => assert_eq!(n, "p.Outer.Sibling"),
            _ => panic!("expected Named"),
        }
    }
}
