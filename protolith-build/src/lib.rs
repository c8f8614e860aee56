//! The entry point a `build.rs` calls: read one or more `.proto` files,
//! compile each to a Rust source file under `OUT_DIR`, the way
//! `protoc-rust`'s `Codegen` builder drives `protoc` plus codegen in one
//! call, except there is no subprocess here — `protolith-parser` and
//! `protolith-codegen` run in-process.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum Error {
    Compile(protolith_codegen::CompileError),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Compile(e) => write!(f, "{}", e),
            Error::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<protolith_codegen::CompileError> for Error {
    fn from(e: protolith_codegen::CompileError) -> Error {
        Error::Compile(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

/// Compile proto3 source text directly to a Rust source string, without
/// touching the filesystem. Useful for tests and for callers that want to
/// embed the generated code some other way than a `build.rs` output file.
pub fn compile_protos(source: &str) -> Result<String, Error> {
    Ok(protolith_codegen::compile(source)?)
}

/// Read `path`, compile it, and return the generated Rust source text.
pub fn compile_protos_file<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let source = fs::read_to_string(path)?;
    compile_protos(&source)
}

fn rust_file_name(proto_path: &Path) -> PathBuf {
    let stem = proto_path.file_stem().unwrap_or_default();
    let mut out = PathBuf::from(stem);
    out.set_extension("rs");
    out
}

/// Builder mirroring `protoc-rust`'s `Codegen`: configure one or more
/// `.proto` inputs and an output directory, then call [`Codegen::run`].
#[derive(Debug, Default)]
pub struct Codegen {
    inputs: Vec<PathBuf>,
    out_dir: Option<PathBuf>,
    print_output: bool,
}

impl Codegen {
    pub fn new() -> Codegen {
        Codegen::default()
    }

    pub fn input<P: Into<PathBuf>>(mut self, path: P) -> Codegen {
        self.inputs.push(path.into());
        self
    }

    pub fn inputs<P: Into<PathBuf>, I: IntoIterator<Item = P>>(mut self, paths: I) -> Codegen {
        self.inputs.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn out_dir<P: Into<PathBuf>>(mut self, path: P) -> Codegen {
        self.out_dir = Some(path.into());
        self
    }

    /// Diagnostic toggle: when set, the full generated Rust source text for
    /// each input is logged at `info` level before being written out, so it
    /// can be inspected without digging through `OUT_DIR` by hand.
    pub fn print_output(mut self, value: bool) -> Codegen {
        self.print_output = value;
        self
    }

    /// Compile every configured input and write the generated `.rs` files
    /// into `out_dir`. Returns an error on the first input that fails to
    /// read, parse, resolve, or be written back out.
    pub fn run(self) -> Result<(), Error> {
        let out_dir = self
            .out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(std::env::var("OUT_DIR").unwrap_or_default()));

        for input in &self.inputs {
            let generated = compile_protos_file(input)?;
            if self.print_output {
                log::info!(
                    "protolith-build: emitted artifact for {}:\n{}",
                    input.display(),
                    generated
                );
            }
            let out_path = out_dir.join(rust_file_name(input));
            fs::write(&out_path, &generated)?;
            log::info!("compiled {} -> {}", input.display(), out_path.display());
        }
        Ok(())
    }
}

/// Re-export a single generated message from `generated` into the calling
/// module's own namespace, the way a `build.rs` consumer would otherwise
/// write `pub use generated::Foo;` by hand for every message it wants
/// public. `name` is the message's flattened Rust identifier exactly as
/// [`protolith_codegen::generate`] emits it (dots replaced by underscores).
///
/// Re-exports the record type (its `new`/`read_from` associated functions
/// and `has_*`/`reset_*` accessors are already public the moment the struct
/// itself is) and its companion `<name>Init` constructor-argument type.
/// There is no separate `init_<Name>`/`read_<Name>` free function to
/// re-export — this generator emits those as associated functions on the
/// type instead (see DESIGN.md) — and `write`/`len` live once in the
/// `protolith` crate, not per message, so they need no re-export here
/// either. Sub-message and enum types are deliberately left out.
pub fn export_message(name: &str) -> String {
    format!("pub use generated::{{{name}, {name}Init}};\n", name = name)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn export_message_re_exports_record_and_init_types() {
        assert_eq!(
            export_message("Point"),
            "pub use generated::{Point, PointInit};\n"
        );
    }

    #[test]
    fn compile_protos_returns_generated_source() {
        let source = r#"
            syntax = "proto3";
            message Empty {}
        "#;
        let out = compile_protos(source).unwrap();
        assert!(out.contains("pub struct Empty"));
    }

    #[test]
    fn rust_file_name_swaps_extension() {
        assert_eq!(rust_file_name(Path::new("foo/bar.proto")), PathBuf::from("bar.rs"));
    }
}
