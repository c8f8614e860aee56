//! A proto3 `oneof` becomes a tagged-variant sum type: `Option<OneofEnum>`
//! on the parent message. Setting any member replaces the whole `Option`
//! with a fresh `Some(variant)`, so the members can never disagree about
//! which one is set — unlike a bitset-per-field scheme, the type system
//! enforces it.

use protolith_parser::Oneof;

use crate::code_writer::CodeWriter;
use crate::resolve::ResolvedSchema;

use super::field::{bare_rust_type, value_kind, ValueKind};
use super::pascal_case;

pub fn oneof_enum_name(message_rust_name: &str, oneof: &Oneof) -> String {
    format!("{}{}", message_rust_name, pascal_case(&oneof.name))
}

pub fn generate_oneof_enum(
    w: &mut CodeWriter,
    oneof: &Oneof,
    enum_name: &str,
    schema: &ResolvedSchema,
    package: &str,
) {
    w.derive(&["Debug", "Clone", "PartialEq"]);
    w.pub_enum(enum_name, |w| {
        for field in &oneof.fields {
            let kind = value_kind(&field.t.proto_type, schema, package);
            let bare = bare_rust_type(&kind);
            let payload = match kind {
                ValueKind::Message(_) => format!("Box<{}>", bare),
                _ => bare,
            };
            w.write_line(&format!("{}({}),", pascal_case(&field.t.name), payload));
        }
    });
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_variants_in_pascal_case() {
        assert_eq!(pascal_case("sub_message"), "SubMessage");
        assert_eq!(pascal_case("id"), "Id");
    }
}
