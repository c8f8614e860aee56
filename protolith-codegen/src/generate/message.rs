//! Generates one message's Rust struct, its `Init` constructor struct, and
//! its `protolith::Message` implementation (`write_to`/`encoded_len`/
//! `read_from`), plus `has_`/`reset_` presence accessors.

use protolith_parser::{FieldOrOneof, Message, Oneof};

use crate::code_writer::CodeWriter;
use crate::resolve::ResolvedSchema;

use super::field::{self, value_kind, wire_type};
use super::oneof::{self, oneof_enum_name};
use super::pascal_case;

pub fn generate_message(w: &mut CodeWriter, message: &Message, rust_name: &str, schema: &ResolvedSchema, package: &str) {
    let init_name = format!("{}Init", rust_name);

    w.derive(&["Clone", "PartialEq", "Default"]);
    w.pub_struct(rust_name, |w| {
        for entry in &message.fields {
            match entry {
                protolith_parser::WithLoc { t: FieldOrOneof::Field(f), .. } => {
                    field::write_struct_entry(w, f, schema, package)
                }
                protolith_parser::WithLoc { t: FieldOrOneof::Oneof(o), .. } => {
                    w.field_entry(&o.name, &format!("Option<{}>", oneof_enum_name(rust_name, o)));
                }
            }
        }
    });
    w.write_line("");

    write_debug_impl(w, message, rust_name);
    w.write_line("");

    for entry in &message.fields {
        if let FieldOrOneof::Oneof(o) = &entry.t {
            oneof::generate_oneof_enum(w, o, &oneof_enum_name(rust_name, o), schema, package);
            w.write_line("");
        }
    }

    w.derive(&["Debug", "Clone", "PartialEq", "Default"]);
    w.pub_struct(&init_name, |w| {
        for entry in &message.fields {
            match &entry.t {
                FieldOrOneof::Field(f) => field::write_init_struct_entry(w, f, schema, package),
                FieldOrOneof::Oneof(o) => {
                    w.field_entry(&o.name, &format!("Option<{}>", oneof_enum_name(rust_name, o)));
                }
            }
        }
    });
    w.write_line("");

    w.impl_self_block(rust_name, |w| {
        w.pub_fn(&format!("new(init: {}) -> {}", init_name, rust_name), |w| {
            w.block(rust_name, |w| {
                for entry in &message.fields {
                    match &entry.t {
                        FieldOrOneof::Field(f) => field::write_init_default_arm(w, f),
                        FieldOrOneof::Oneof(o) => w.write_line(&format!("{}: init.{},", o.name, o.name)),
                    }
                }
            });
        });
        w.write_line("");

        for entry in &message.fields {
            match &entry.t {
                FieldOrOneof::Field(f) => {
                    field::write_presence_methods(w, f, schema, package);
                    w.write_line("");
                }
                FieldOrOneof::Oneof(o) => {
                    write_oneof_presence_methods(w, o, rust_name);
                    w.write_line("");
                }
            }
        }
    });
    w.write_line("");

    w.impl_block("protolith::Message", rust_name, |w| {
        w.def_fn("write_to<S: protolith::ByteStream>(&self, stream: &mut S) -> usize", |w| {
            w.write_line("let start = stream.position();");
            for entry in &message.fields {
                match &entry.t {
                    FieldOrOneof::Field(f) => field::write_write_stmts(w, f, schema, package),
                    FieldOrOneof::Oneof(o) => write_oneof_write_stmt(w, o, rust_name, schema, package),
                }
            }
            w.write_line("(stream.position() - start) as usize");
        });
        w.write_line("");

        w.def_fn("encoded_len(&self) -> u32", |w| {
            w.write_line("let mut my_size = 0u32;");
            for entry in &message.fields {
                match &entry.t {
                    FieldOrOneof::Field(f) => field::write_len_stmt(w, f, schema, package),
                    FieldOrOneof::Oneof(o) => write_oneof_len_stmt(w, o, rust_name, schema, package),
                }
            }
            w.write_line("my_size");
        });
        w.write_line("");

        w.def_fn(
            "read_from<S: protolith::ByteStream>(stream: &mut S, max_size: u32) -> Result<Self, protolith::DecodeError>",
            |w| {
                w.write_line(&format!("let mut msg = {}::default();", rust_name));
                w.write_line("let start = stream.position();");
                // max_size == 0 means "read until end of stream" (top-level
                // calls with no a priori length); a nonzero bound always
                // wins once reached, even if the stream has more to give.
                w.write_line(
                    "while !stream.at_end() && (max_size == 0 || stream.position() - start < max_size as u64) {",
                );
                w.indented(|w| {
                    w.write_line("let (field_number, wire_type) = protolith::wire::read_tag(stream)?;");
                    w.match_block("field_number", |w| {
                        for entry in &message.fields {
                            match &entry.t {
                                FieldOrOneof::Field(f) => field::write_read_arm(w, f, schema, package, "msg"),
                                FieldOrOneof::Oneof(o) => write_oneof_read_arms(w, o, rust_name, schema, package),
                            }
                        }
                        w.case_block("_", |w| {
                            w.write_line("protolith::wire::skip_field(stream, field_number, wire_type)?;");
                        });
                    });
                });
                w.write_line("}");
                w.write_line("Ok(msg)");
            },
        );
    });
}

/// Hand-written in place of `#[derive(Debug)]` so that an unset field is left
/// out of the output entirely rather than printed as `None` — the generated
/// struct's `Option`/`Vec` slots are an implementation detail of presence
/// tracking, not part of the message's logical shape.
fn write_debug_impl(w: &mut CodeWriter, message: &Message, rust_name: &str) {
    w.impl_block("std::fmt::Debug", rust_name, |w| {
        w.def_fn(
            "fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result",
            |w| {
                w.write_line(&format!("let mut d = f.debug_struct(\"{}\");", rust_name));
                for entry in &message.fields {
                    match &entry.t {
                        FieldOrOneof::Field(field) => {
                            let name = field::field_rust_name(field);
                            if field.repeated {
                                w.if_stmt(&format!("!self.{}.is_empty()", name), |w| {
                                    w.write_line(&format!("d.field(\"{}\", &self.{});", field.name, name));
                                });
                            } else {
                                w.if_let_stmt("Some(v)", &format!("&self.{}", name), |w| {
                                    w.write_line(&format!("d.field(\"{}\", v);", field.name));
                                });
                            }
                        }
                        FieldOrOneof::Oneof(o) => {
                            w.if_let_stmt("Some(v)", &format!("&self.{}", o.name), |w| {
                                w.write_line(&format!("d.field(\"{}\", v);", o.name));
                            });
                        }
                    }
                }
                w.write_line("d.finish()");
            },
        );
    });
}

fn write_oneof_presence_methods(w: &mut CodeWriter, oneof: &Oneof, message_rust_name: &str) {
    let enum_name = oneof_enum_name(message_rust_name, oneof);
    w.pub_fn(&format!("has_{}(&self) -> bool", oneof.name), |w| {
        w.write_line(&format!("self.{}.is_some()", oneof.name));
    });
    w.pub_fn(
        &format!("get_{}(&self) -> Result<&{}, protolith::PresenceError>", oneof.name, enum_name),
        |w| {
            w.write_line(&format!(
                "self.{}.as_ref().ok_or(protolith::PresenceError {{ field: \"{}\" }})",
                oneof.name, oneof.name
            ));
        },
    );
    w.pub_fn(&format!("reset_{}(&mut self)", oneof.name), |w| {
        w.write_line(&format!("self.{} = None;", oneof.name));
    });
}

fn write_oneof_read_arms(w: &mut CodeWriter, oneof: &Oneof, message_rust_name: &str, schema: &ResolvedSchema, package: &str) {
    let enum_name = oneof_enum_name(message_rust_name, oneof);
    for member in &oneof.fields {
        let kind = value_kind(&member.t.proto_type, schema, package);
        let variant = pascal_case(&member.t.name);
        w.case_block(&member.t.number.to_string(), |w| {
            let boxed = matches!(kind, field::ValueKind::Message(_));
            let value_expr = field::read_value_expr(&kind, "stream");
            let wrapped = if boxed {
                format!("Box::new({})", value_expr)
            } else {
                value_expr
            };
            w.write_line(&format!(
                "msg.{} = Some({}::{}({}));",
                oneof.name, enum_name, variant, wrapped
            ));
        });
    }
}

fn write_oneof_write_stmt(w: &mut CodeWriter, oneof: &Oneof, message_rust_name: &str, schema: &ResolvedSchema, package: &str) {
    let enum_name = oneof_enum_name(message_rust_name, oneof);
    w.if_let_stmt("Some(v)", &format!("&self.{}", oneof.name), |w| {
        w.match_block("v", |w| {
            for member in &oneof.fields {
                let kind = value_kind(&member.t.proto_type, schema, package);
                let variant = pascal_case(&member.t.name);
                let boxed = matches!(kind, field::ValueKind::Message(_));
                let pattern = format!("{}::{}(v)", enum_name, variant);
                w.case_block(&pattern, |w| {
                    w.write_tag_stmt(member.t.number, wire_type(&kind));
                    let value_expr = if boxed { "v.as_ref()" } else { "v" };
                    w.write_line(&field::write_value_stmt(&kind, "stream", value_expr));
                });
            }
        });
    });
}

fn write_oneof_len_stmt(w: &mut CodeWriter, oneof: &Oneof, message_rust_name: &str, schema: &ResolvedSchema, package: &str) {
    let enum_name = oneof_enum_name(message_rust_name, oneof);
    w.if_let_stmt("Some(v)", &format!("&self.{}", oneof.name), |w| {
        w.match_block("v", |w| {
            for member in &oneof.fields {
                let kind = value_kind(&member.t.proto_type, schema, package);
                let variant = pascal_case(&member.t.name);
                let boxed = matches!(kind, field::ValueKind::Message(_));
                let pattern = format!("{}::{}(v)", enum_name, variant);
                let tag_len_expr = format!(
                    "protolith::wire::tag_len({}, {})",
                    member.t.number,
                    wire_type(&kind).as_protolith_variant()
                );
                let value_expr = if boxed { "v.as_ref()" } else { "v" };
                w.case_block(&pattern, |w| {
                    w.write_line(&format!(
                        "my_size += {} + {};",
                        tag_len_expr,
                        field::value_len_expr(&kind, value_expr)
                    ));
                });
            }
        });
    });
}
