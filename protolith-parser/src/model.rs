//! The schema tree the parser produces and the resolver mutates in place.
//!
//! This is a rust-transcription of the handful of `descriptor.proto`
//! concepts this spec actually needs — packages, messages, enums, fields,
//! oneofs, reserved ranges — the same relationship `protobuf-codegen-pure`'s
//! own `model.rs` bears to the full `descriptor.proto`, scaled down to
//! proto3-only, no groups/options/extensions/services/maps.

use std::fmt;

/// A source location, for diagnostics only — never consulted by the
/// resolver or code generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Loc {
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Wraps a node with the location it started at.
#[derive(Debug, Clone, PartialEq)]
pub struct WithLoc<T> {
    pub loc: Loc,
    pub t: T,
}

impl<T> WithLoc<T> {
    pub fn new(t: T, loc: Loc) -> WithLoc<T> {
        WithLoc { t, loc }
    }
}

/// The built-in proto3 scalar types. Every one of these is a keyword the
/// resolver must never treat as an unresolved reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Bool,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Float,
    Double,
    String,
    Bytes,
}

impl ScalarType {
    /// The proto keyword this variant was parsed from.
    pub fn keyword(self) -> &'static str {
        match self {
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
            ScalarType::Sint32 => "sint32",
            ScalarType::Sint64 => "sint64",
            ScalarType::Bool => "bool",
            ScalarType::Fixed32 => "fixed32",
            ScalarType::Fixed64 => "fixed64",
            ScalarType::Sfixed32 => "sfixed32",
            ScalarType::Sfixed64 => "sfixed64",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<ScalarType> {
        Some(match keyword {
            "int32" => ScalarType::Int32,
            "int64" => ScalarType::Int64,
            "uint32" => ScalarType::Uint32,
            "uint64" => ScalarType::Uint64,
            "sint32" => ScalarType::Sint32,
            "sint64" => ScalarType::Sint64,
            "bool" => ScalarType::Bool,
            "fixed32" => ScalarType::Fixed32,
            "fixed64" => ScalarType::Fixed64,
            "sfixed32" => ScalarType::Sfixed32,
            "sfixed64" => ScalarType::Sfixed64,
            "float" => ScalarType::Float,
            "double" => ScalarType::Double,
            "string" => ScalarType::String,
            "bytes" => ScalarType::Bytes,
            _ => return None,
        })
    }
}

/// A field's declared type, before or after resolution.
///
/// Before the resolver runs, `Named` holds whatever dotted or bare
/// identifier the source text spelled out. After it runs, every `Named`
/// has been rewritten to the fully-qualified name of the enum or message it
/// refers to — the resolver never leaves a reference unresolved, it only
/// ever rewrites one or fails outright.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtoType {
    Scalar(ScalarType),
    Named(String),
}

/// A single message field (not counting oneof membership, which is
/// represented separately — see [`FieldOrOneof`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub proto_type: ProtoType,
    pub number: i32,
    pub repeated: bool,
}

/// A oneof group: its members share a single presence slot on the parent
/// message but each keeps its own field number.
#[derive(Debug, Clone, PartialEq)]
pub struct Oneof {
    pub name: String,
    pub fields: Vec<WithLoc<Field>>,
}

/// A message body entry: either a plain field or a oneof group.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOrOneof {
    Field(Field),
    Oneof(Oneof),
}

/// A `reserved` declaration: either a name string or a number/number-range.
#[derive(Debug, Clone, PartialEq)]
pub enum Reserved {
    Name(String),
    Number(i32),
    Range(i32, i32),
}

/// A single `enum` value (`identifier = number`).
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVal {
    pub name: String,
    pub number: i32,
}

/// An `enum` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    /// Local name before resolution; fully-qualified name after.
    pub name: String,
    pub values: Vec<EnumVal>,
}

impl Enum {
    pub fn value_for_zero(&self) -> Option<&EnumVal> {
        self.values.iter().find(|v| v.number == 0)
    }
}

/// A `message` declaration, possibly containing nested messages and enums.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message {
    /// Local name before resolution; fully-qualified name after.
    pub name: String,
    pub fields: Vec<WithLoc<FieldOrOneof>>,
    pub reserved: Vec<Reserved>,
    pub messages: Vec<WithLoc<Message>>,
    pub enums: Vec<WithLoc<Enum>>,
}

impl Message {
    /// All directly-declared fields, with oneof members flattened inline —
    /// the view the resolver's duplicate/reserved checks operate over.
    pub fn flattened_fields(&self) -> Vec<&Field> {
        self.fields
            .iter()
            .flat_map(|entry| match &entry.t {
                FieldOrOneof::Field(f) => vec![f],
                FieldOrOneof::Oneof(oneof) => oneof.fields.iter().map(|f| &f.t).collect(),
            })
            .collect()
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.flattened_fields().into_iter().find(|f| f.name == name)
    }
}

/// A package: a dotted name (possibly empty, for a file with no `package`
/// statement) plus its top-level messages and enums.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Package {
    pub name: String,
    pub messages: Vec<WithLoc<Message>>,
    pub enums: Vec<WithLoc<Enum>>,
}

/// The root of a parsed `.proto` file: an ordered list of packages (in
/// practice always exactly one, since this parser only accepts a single
/// `package` statement per file, but the type stays a list for generality).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProtoDef {
    pub packages: Vec<Package>,
}
