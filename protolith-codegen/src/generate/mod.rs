//! Orchestrates code generation: walks the resolved schema tree and emits
//! one Rust source string covering every message and enum it contains.

pub mod enum_;
pub mod field;
pub mod message;
pub mod oneof;

use protolith_parser::{Enum, Message, WithLoc};

use crate::code_writer::CodeWriter;
use crate::resolve::ResolvedSchema;

/// Turn a fully-qualified proto name (`pkg.Outer.Inner`) into the flat Rust
/// identifier this generator gives it (`Outer_Inner`), the same way
/// `rust-protobuf` flattens nested message names rather than nesting Rust
/// modules to match proto scoping.
pub(crate) fn rust_ident_for_fqn(fqn: &str, package: &str) -> String {
    let local = if package.is_empty() {
        fqn
    } else {
        fqn.strip_prefix(package)
            .and_then(|s| s.strip_prefix('.'))
            .unwrap_or(fqn)
    };
    local.replace('.', "_")
}

pub(crate) fn pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Generate the full source text for one compiled `.proto` file.
pub fn generate(schema: &ResolvedSchema) -> String {
    let mut w = CodeWriter::new();
    w.write_line("// @generated by protolith-build. Do not edit by hand.");
    w.write_line("#![allow(dead_code, non_camel_case_types)]");
    w.write_line("");

    for package in &schema.proto_def.packages {
        generate_enums(&mut w, &package.enums, &package.name);
        generate_messages(&mut w, &package.messages, &package.name, schema);
    }

    w.into_string()
}

fn generate_enums(w: &mut CodeWriter, enums: &[WithLoc<Enum>], package: &str) {
    for en in enums {
        let fqn = if package.is_empty() {
            en.t.name.clone()
        } else {
            format!("{}.{}", package, en.t.name)
        };
        let rust_name = rust_ident_for_fqn(&fqn, package);
        enum_::generate_enum(w, &en.t, &rust_name);
        w.write_line("");
    }
}

fn generate_enums_nested(w: &mut CodeWriter, enums: &[WithLoc<Enum>], parent_fqn: &str, package: &str) {
    for en in enums {
        let fqn = format!("{}.{}", parent_fqn, en.t.name);
        let rust_name = rust_ident_for_fqn(&fqn, package);
        enum_::generate_enum(w, &en.t, &rust_name);
        w.write_line("");
    }
}

fn generate_messages(w: &mut CodeWriter, messages: &[WithLoc<Message>], package: &str, schema: &ResolvedSchema) {
    for m in messages {
        let fqn = if package.is_empty() {
            m.t.name.clone()
        } else {
            format!("{}.{}", package, m.t.name)
        };
        let rust_name = rust_ident_for_fqn(&fqn, package);
        message::generate_message(w, &m.t, &rust_name, schema, package);
        w.write_line("");

        generate_enums_nested(w, &m.t.enums, &fqn, package);
        generate_messages_nested(w, &m.t.messages, &fqn, package, schema);
    }
}

/// Like [`generate_messages`] but takes the already-built parent FQN
/// directly, since nested messages don't have their own package prefix to
/// re-derive.
fn generate_messages_nested(
    w: &mut CodeWriter,
    messages: &[WithLoc<Message>],
    parent_fqn: &str,
    package: &str,
    schema: &ResolvedSchema,
) {
    for m in messages {
        let fqn = format!("{}.{}", parent_fqn, m.t.name);
        let rust_name = rust_ident_for_fqn(&fqn, package);
        message::generate_message(w, &m.t, &rust_name, schema, package);
        w.write_line("");

        generate_enums_nested(w, &m.t.enums, &fqn, package);
        generate_messages_nested(w, &m.t.messages, &fqn, package, schema);
    }
}
