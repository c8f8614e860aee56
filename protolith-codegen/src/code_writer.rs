//! A small indentation-tracking text writer, in the same spirit as
//! `protobuf-codegen`'s `CodeWriter`: generated Rust source is built up as
//! plain text with `w.write_line`/`w.pub_struct`/`w.def_fn`/`w.match_block`
//! rather than via token-tree construction, because the generator here runs
//! as an ordinary library call from a build script or test harness, not a
//! proc-macro.

pub struct CodeWriter {
    indent: usize,
    out: String,
}

impl CodeWriter {
    pub fn new() -> CodeWriter {
        CodeWriter {
            indent: 0,
            out: String::new(),
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    pub fn write_line(&mut self, line: &str) {
        if line.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(line);
        self.out.push('\n');
    }

    pub fn comment(&mut self, text: &str) {
        self.write_line(&format!("// {}", text));
    }

    pub fn doc_comment(&mut self, text: &str) {
        self.write_line(&format!("/// {}", text));
    }

    pub fn derive(&mut self, traits: &[&str]) {
        self.write_line(&format!("#[derive({})]", traits.join(", ")));
    }

    pub fn indented<F>(&mut self, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.indent += 1;
        cb(self);
        self.indent -= 1;
    }

    /// `<header> {` / body / `}`
    pub fn block<F>(&mut self, header: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.write_line(&format!("{} {{", header));
        self.indented(cb);
        self.write_line("}");
    }

    /// `<header> {` / body / `}` followed by a trailing comma, for use
    /// inside match arms or array/struct literals.
    pub fn block_comma<F>(&mut self, header: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.write_line(&format!("{} {{", header));
        self.indented(cb);
        self.write_line("},");
    }

    pub fn pub_struct<F>(&mut self, name: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.block(&format!("pub struct {}", name), cb);
    }

    pub fn pub_enum<F>(&mut self, name: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.block(&format!("pub enum {}", name), cb);
    }

    pub fn field_entry(&mut self, name: &str, ty: &str) {
        self.write_line(&format!("pub {}: {},", name, ty));
    }

    pub fn impl_block<F>(&mut self, trait_name: &str, type_name: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.block(&format!("impl {} for {}", trait_name, type_name), cb);
    }

    pub fn impl_generic_block<F>(&mut self, trait_name: &str, generics: &str, type_name: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.block(
            &format!("impl{} {} for {}", generics, trait_name, type_name),
            cb,
        );
    }

    pub fn impl_self_block<F>(&mut self, type_name: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.block(&format!("impl {}", type_name), cb);
    }

    pub fn def_fn<F>(&mut self, sig: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.block(&format!("fn {}", sig), cb);
    }

    pub fn pub_fn<F>(&mut self, sig: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.block(&format!("pub fn {}", sig), cb);
    }

    pub fn match_block<F>(&mut self, expr: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.block(&format!("match {}", expr), cb);
    }

    pub fn case_block<F>(&mut self, pattern: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.block_comma(&format!("{} =>", pattern), cb);
    }

    pub fn if_stmt<F>(&mut self, cond: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.block(&format!("if {}", cond), cb);
    }

    pub fn if_let_stmt<F>(&mut self, pattern: &str, expr: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.block(&format!("if let {} = {}", pattern, expr), cb);
    }

    pub fn while_loop_lt<F>(&mut self, lhs: &str, rhs: &str, cb: F)
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.block(&format!("while {} < {}", lhs, rhs), cb);
    }

    /// Write a field tag: `write_varint(stream, make_tag(number, wire_type) as u64);`
    pub fn write_tag_stmt(&mut self, field_number: i32, wire_type: crate::types::WireType) {
        self.write_line(&format!(
            "protolith::varint::write_varint(stream, protolith::wire::make_tag({}, {}) as u64);",
            field_number,
            wire_type.as_protolith_variant()
        ));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nested_blocks_indent_correctly() {
        let mut w = CodeWriter::new();
        w.pub_struct("Foo", |w| {
            w.field_entry("n", "i32");
        });
        assert_eq!(w.into_string(), "pub struct Foo {\n    pub n: i32,\n}\n");
    }

    #[test]
    fn match_and_case_blocks_nest() {
        let mut w = CodeWriter::new();
        w.match_block("x", |w| {
            w.case_block("1", |w| {
                w.write_line("a()");
            });
        });
        let expected = "match x {\n    1 => {\n        a()\n    },\n}\n";
        assert_eq!(w.into_string(), expected);
    }
}
