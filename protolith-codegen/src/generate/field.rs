//! Per-field code generation: the struct slot type, the `Init` slot type,
//! and the read/write/encoded_len fragments, parameterized over whether the
//! field is singular, repeated, or a oneof member.
//!
//! Presence is represented as `Option<T>` per field rather than a bitset —
//! `Option` already is the presence flag, so a parallel bitset would only
//! duplicate state that can get out of sync with it.

use protolith_parser::{Field, ProtoType, ScalarType};

use crate::code_writer::CodeWriter;
use crate::resolve::{ResolvedSchema, TypeKind};
use crate::types::{is_packable, mapping_for, LenExpr, WireType};

use super::rust_ident_for_fqn;

#[derive(Debug, Clone)]
pub enum ValueKind {
    Scalar(ScalarType),
    Enum(String),
    Message(String),
}

pub fn value_kind(proto_type: &ProtoType, schema: &ResolvedSchema, package: &str) -> ValueKind {
    match proto_type {
        ProtoType::Scalar(s) => ValueKind::Scalar(*s),
        ProtoType::Named(fqn) => match schema.type_kinds.get(fqn) {
            Some(TypeKind::Enum) => ValueKind::Enum(rust_ident_for_fqn(fqn, package)),
            _ => ValueKind::Message(rust_ident_for_fqn(fqn, package)),
        },
    }
}

pub fn bare_rust_type(kind: &ValueKind) -> String {
    match kind {
        ValueKind::Scalar(s) => mapping_for(*s).rust_type.to_owned(),
        ValueKind::Enum(name) => name.clone(),
        ValueKind::Message(name) => name.clone(),
    }
}

pub(crate) fn wire_type(kind: &ValueKind) -> WireType {
    match kind {
        ValueKind::Scalar(s) => mapping_for(*s).wire_type,
        ValueKind::Enum(_) => WireType::Varint,
        ValueKind::Message(_) => WireType::LengthDelimited,
    }
}

fn is_rust_keyword(name: &str) -> bool {
    matches!(
        name,
        "type" | "match" | "move" | "fn" | "impl" | "trait" | "struct" | "enum" | "box" | "ref" | "loop"
    )
}

pub fn field_rust_name(field: &Field) -> String {
    if is_rust_keyword(&field.name) {
        format!("{}_", field.name)
    } else {
        field.name.clone()
    }
}

/// The field's storage type inside the generated struct: `Option<T>` for a
/// singular scalar/enum, `Option<Box<T>>` for a singular message (so the
/// struct doesn't need to be infinitely sized for self-referential
/// schemas), `Vec<T>` for any repeated field.
pub fn struct_field_type(field: &Field, schema: &ResolvedSchema, package: &str) -> String {
    let kind = value_kind(&field.proto_type, schema, package);
    let bare = bare_rust_type(&kind);
    if field.repeated {
        format!("Vec<{}>", bare)
    } else {
        match kind {
            ValueKind::Message(_) => format!("Option<Box<{}>>", bare),
            _ => format!("Option<{}>", bare),
        }
    }
}

/// The `Init` struct's slot type for this field: unwrapped `T`/`Vec<T>` so
/// a literal construction only needs to name the values that matter,
/// mirroring the way `struct_field_type` wraps presence in `Option`. A
/// singular sub-message slot is `Option<Box<T>>`, matching the record
/// struct's own slot exactly, since `new()` assigns `init.<field>` straight
/// into it without an intermediate boxing step.
pub fn init_field_type(field: &Field, schema: &ResolvedSchema, package: &str) -> String {
    let kind = value_kind(&field.proto_type, schema, package);
    let bare = bare_rust_type(&kind);
    if field.repeated {
        format!("Vec<{}>", bare)
    } else {
        match kind {
            ValueKind::Message(_) => format!("Option<Box<{}>>", bare),
            _ => format!("Option<{}>", bare),
        }
    }
}

pub(crate) fn read_value_expr(kind: &ValueKind, stream_var: &str) -> String {
    match kind {
        ValueKind::Scalar(s) => format!("{}({})?", mapping_for(*s).read_fn, stream_var),
        ValueKind::Enum(name) => format!(
            "{}::from_i32(protolith::varint::read_int32({})?)",
            name, stream_var
        ),
        ValueKind::Message(name) => format!(
            "{{ let len = protolith::varint::read_varint({stream})? as u32; \
             if len == 0 {{ {name}::default() }} else {{ {name}::read_from({stream}, len)? }} }}",
            stream = stream_var,
            name = name
        ),
    }
}

/// `value_expr` is always a reference in the generated call sites (bound
/// through `if let Some(v) = &self.field` or `for v in &self.field`), so
/// the `Copy` scalar writers need an explicit deref; `String`/`Vec<u8>`
/// coerce to `&str`/`&[u8]` on their own and enums copy out through the
/// method-call auto-deref.
pub(crate) fn write_value_stmt(kind: &ValueKind, stream_var: &str, value_expr: &str) -> String {
    match kind {
        ValueKind::Scalar(s) => {
            let m = mapping_for(*s);
            match m.len_expr {
                // `write_string`/`write_length_delimited` take `&str`/`&[u8]`;
                // `&String`/`&Vec<u8>` coerce on their own, and `*v` would try
                // to move a non-`Copy` value out of the reference.
                LenExpr::LengthDelimited => format!("{}({}, {});", m.write_fn, stream_var, value_expr),
                _ => format!("{}({}, *({}));", m.write_fn, stream_var, value_expr),
            }
        }
        ValueKind::Enum(_) => format!(
            "protolith::varint::write_int32({}, {}.value());",
            stream_var, value_expr
        ),
        ValueKind::Message(_) => format!(
            "{{ let size = protolith::message::len({value}); \
             protolith::varint::write_varint({stream}, size as u64); \
             {value}.write_to({stream}); }}",
            stream = stream_var,
            value = value_expr
        ),
    }
}

pub(crate) fn value_len_expr(kind: &ValueKind, value_expr: &str) -> String {
    match kind {
        ValueKind::Scalar(s) => match mapping_for(*s).len_expr {
            LenExpr::Fn(f) => format!("{}(*({}))", f, value_expr),
            LenExpr::Const(n) => n.to_string(),
            LenExpr::LengthDelimited => format!(
                "{{ let n = {}.len() as u32; protolith::varint::varint_len(n as u64) + n }}",
                value_expr
            ),
        },
        ValueKind::Enum(_) => format!("protolith::varint::int32_len({}.value())", value_expr),
        ValueKind::Message(_) => format!(
            "{{ let n = protolith::message::len({value}); \
             protolith::varint::varint_len(n as u64) + n }}",
            value = value_expr
        ),
    }
}

/// Emit this field's entry in the generated struct body.
pub fn write_struct_entry(w: &mut CodeWriter, field: &Field, schema: &ResolvedSchema, package: &str) {
    w.field_entry(&field_rust_name(field), &struct_field_type(field, schema, package));
}

pub fn write_init_struct_entry(w: &mut CodeWriter, field: &Field, schema: &ResolvedSchema, package: &str) {
    w.field_entry(&field_rust_name(field), &init_field_type(field, schema, package));
}

pub fn write_init_default_arm(w: &mut CodeWriter, field: &Field) {
    let name = field_rust_name(field);
    w.write_line(&format!("{}: init.{},", name, name));
}

/// Emit the `match field_number { N => { ... } }` arm that reads this
/// field's wire payload and stores it on `target` (the local variable the
/// enclosing `read_from` is building up — it has no `self` to write into,
/// since decoding starts from `Default::default()` rather than an existing
/// receiver).
pub fn write_read_arm(w: &mut CodeWriter, field: &Field, schema: &ResolvedSchema, package: &str, target: &str) {
    let kind = value_kind(&field.proto_type, schema, package);
    let name = field_rust_name(field);
    w.case_block(&field.number.to_string(), |w| {
        if field.repeated && is_packable_kind(&kind) {
            w.if_stmt("wire_type == protolith::wire::WireType::LengthDelimited as u32", |w| {
                w.write_line("let packed_len = protolith::varint::read_varint(stream)? as u64;");
                w.write_line("let end = stream.position() + packed_len;");
                w.while_loop_lt("stream.position()", "end", |w| {
                    w.write_line(&format!(
                        "{}.{}.push({});",
                        target,
                        name,
                        read_value_expr(&kind, "stream")
                    ));
                });
            });
            w.write_line("else {");
            w.indented(|w| {
                w.write_line(&format!(
                    "{}.{}.push({});",
                    target,
                    name,
                    read_value_expr(&kind, "stream")
                ));
            });
            w.write_line("}");
        } else if field.repeated {
            w.write_line(&format!(
                "{}.{}.push({});",
                target,
                name,
                read_value_expr(&kind, "stream")
            ));
        } else {
            match &kind {
                ValueKind::Message(_) => {
                    w.write_line(&format!(
                        "{}.{} = Some(Box::new({}));",
                        target,
                        name,
                        read_value_expr(&kind, "stream")
                    ));
                }
                _ => {
                    w.write_line(&format!(
                        "{}.{} = Some({});",
                        target,
                        name,
                        read_value_expr(&kind, "stream")
                    ));
                }
            }
        }
    });
}

pub(crate) fn is_packable_kind(kind: &ValueKind) -> bool {
    match kind {
        ValueKind::Scalar(s) => is_packable(*s),
        ValueKind::Enum(_) => true,
        ValueKind::Message(_) => false,
    }
}

/// Emit the statements that write this field's tag(s) and payload into
/// `write_to`.
pub fn write_write_stmts(w: &mut CodeWriter, field: &Field, schema: &ResolvedSchema, package: &str) {
    let kind = value_kind(&field.proto_type, schema, package);
    let name = field_rust_name(field);
    let wt = wire_type(&kind);

    if field.repeated && is_packable_kind(&kind) {
        w.if_stmt(&format!("!self.{}.is_empty()", name), |w| {
            w.write_tag_stmt(field.number, WireType::LengthDelimited);
            w.write_line(&format!(
                "let packed_len: u32 = self.{}.iter().map(|v| {}).sum();",
                name,
                value_len_expr(&kind, "v")
            ));
            w.write_line("protolith::varint::write_varint(stream, packed_len as u64);");
            w.write_line(&format!("for v in &self.{} {{", name));
            w.indented(|w| {
                w.write_line(&write_value_stmt(&kind, "stream", "v"));
            });
            w.write_line("}");
        });
    } else if field.repeated {
        w.write_line(&format!("for v in &self.{} {{", name));
        w.indented(|w| {
            w.write_tag_stmt(field.number, wt);
            w.write_line(&write_value_stmt(&kind, "stream", "v"));
        });
        w.write_line("}");
    } else {
        w.if_let_stmt("Some(v)", &format!("&self.{}", name), |w| {
            w.write_tag_stmt(field.number, wt);
            let value_expr = match &kind {
                ValueKind::Message(_) => "v.as_ref()",
                _ => "v",
            };
            w.write_line(&write_value_stmt(&kind, "stream", value_expr));
        });
    }
}

/// Emit the expression added to `my_size` in `encoded_len` for this field.
pub fn write_len_stmt(w: &mut CodeWriter, field: &Field, schema: &ResolvedSchema, package: &str) {
    let kind = value_kind(&field.proto_type, schema, package);
    let name = field_rust_name(field);
    let wt = wire_type(&kind);
    let tag_len_expr = format!("protolith::wire::tag_len({}, {})", field.number, wt.as_protolith_variant());

    if field.repeated && is_packable_kind(&kind) {
        w.if_stmt(&format!("!self.{}.is_empty()", name), |w| {
            w.write_line(&format!(
                "let packed_len: u32 = self.{}.iter().map(|v| {}).sum();",
                name,
                value_len_expr(&kind, "v")
            ));
            w.write_line(&format!(
                "my_size += {} + protolith::varint::varint_len(packed_len as u64) + packed_len;",
                tag_len_expr
            ));
        });
    } else if field.repeated {
        w.write_line(&format!("for v in &self.{} {{", name));
        w.indented(|w| {
            w.write_line(&format!("my_size += {} + {};", tag_len_expr, value_len_expr(&kind, "v")));
        });
        w.write_line("}");
    } else {
        w.if_let_stmt("Some(v)", &format!("&self.{}", name), |w| {
            let value_expr = match &kind {
                ValueKind::Message(_) => "v.as_ref()",
                _ => "v",
            };
            w.write_line(&format!("my_size += {} + {};", tag_len_expr, value_len_expr(&kind, value_expr)));
        });
    }
}

/// Emit `has_<field>`/`reset_<field>` accessor methods, plus — for a
/// singular field — a presence-checked `get_<field>` hook returning
/// `protolith::PresenceError` on an unset read, the explicit accessor pair
/// the spec's "hidden field names + presence" design note calls for. The
/// struct slot stays a public `Option<T>`/`Vec<T>` for direct, ergonomic
/// access (and is what `get_<field>` itself reads from); `get_<field>` exists
/// alongside it for callers that want the failure surfaced as a typed error
/// rather than matched out of an `Option`.
pub fn write_presence_methods(w: &mut CodeWriter, field: &Field, schema: &ResolvedSchema, package: &str) {
    let name = field_rust_name(field);
    if field.repeated {
        w.pub_fn(&format!("has_{}(&self) -> bool", name), |w| {
            w.write_line(&format!("!self.{}.is_empty()", name));
        });
        w.pub_fn(&format!("reset_{}(&mut self)", name), |w| {
            w.write_line(&format!("self.{}.clear();", name));
        });
    } else {
        let kind = value_kind(&field.proto_type, schema, package);
        let bare = bare_rust_type(&kind);
        w.pub_fn(&format!("has_{}(&self) -> bool", name), |w| {
            w.write_line(&format!("self.{}.is_some()", name));
        });
        w.pub_fn(
            &format!("get_{}(&self) -> Result<&{}, protolith::PresenceError>", name, bare),
            |w| {
                let accessor = match &kind {
                    ValueKind::Message(_) => format!("self.{}.as_deref()", name),
                    _ => format!("self.{}.as_ref()", name),
                };
                w.write_line(&format!(
                    "{}.ok_or(protolith::PresenceError {{ field: \"{}\" }})",
                    accessor, field.name
                ));
            },
        );
        w.pub_fn(&format!("reset_{}(&mut self)", name), |w| {
            w.write_line(&format!("self.{} = None;", name));
        });
    }
}
