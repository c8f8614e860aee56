//! Generates a proto3 `enum` as a Rust enum plus an `Unrecognized(i32)`
//! variant: proto3 enums are open on the wire (a peer may send a number
//! this schema never declared), so decode is total rather than falling
//! back to the zero value — the raw number round-trips through
//! `Unrecognized` instead of being silently discarded.

use protolith_parser::Enum;

use crate::code_writer::CodeWriter;

pub fn generate_enum(w: &mut CodeWriter, en: &Enum, rust_name: &str) {
    w.derive(&["Debug", "Clone", "Copy", "PartialEq", "Eq"]);
    w.pub_enum(rust_name, |w| {
        for value in &en.values {
            w.write_line(&format!("{},", value.name));
        }
        w.write_line("Unrecognized(i32),");
    });

    w.impl_self_block(rust_name, |w| {
        w.pub_fn("value(self) -> i32", |w| {
            w.match_block("self", |w| {
                for value in &en.values {
                    w.case_block(&format!("{}::{}", rust_name, value.name), |w| {
                        w.write_line(&value.number.to_string());
                    });
                }
                w.case_block(&format!("{}::Unrecognized(v)", rust_name), |w| {
                    w.write_line("v");
                });
            });
        });
        w.write_line("");

        w.pub_fn(&format!("from_i32(value: i32) -> {}", rust_name), |w| {
            w.match_block("value", |w| {
                for value in &en.values {
                    w.case_block(&value.number.to_string(), |w| {
                        w.write_line(&format!("{}::{}", rust_name, value.name));
                    });
                }
                w.case_block("other", |w| {
                    w.write_line(&format!("{}::Unrecognized(other)", rust_name));
                });
            });
        });
    });

    let zero = en
        .value_for_zero()
        .expect("proto3 enums always declare a zero value");
    w.impl_block("Default", rust_name, |w| {
        w.def_fn(&format!("default() -> {}", rust_name), |w| {
            w.write_line(&format!("{}::{}", rust_name, zero.name));
        });
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use protolith_parser::EnumVal;

    #[test]
    fn emits_variants_and_unrecognized_sentinel() {
        let en = Enum {
            name: "Status".to_owned(),
            values: vec![
                EnumVal { name: "UNKNOWN".to_owned(), number: 0 },
                EnumVal { name: "ACTIVE".to_owned(), number: 1 },
            ],
        };
        let mut w = CodeWriter::new();
        generate_enum(&mut w, &en, "Status");
        let out = w.into_string();
        assert!(out.contains("UNKNOWN,"));
        assert!(out.contains("Unrecognized(i32),"));
        assert!(out.contains("Status::UNKNOWN => {"));
        assert!(out.contains("impl Default for Status"));
    }
}
