//! Maps a proto3 scalar type to the Rust type, the wire type it is encoded
//! with, and the `protolith::varint` function names the generated
//! read/write/encoded_len bodies call. Built fresh per compilation rather
//! than cached globally, the way `rust_types_values.rs` builds its
//! `RustType` per field.

use protolith_parser::ScalarType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    Fixed32,
}

impl WireType {
    pub fn as_protolith_variant(self) -> &'static str {
        match self {
            WireType::Varint => "protolith::WireType::Varint",
            WireType::Fixed64 => "protolith::WireType::Fixed64",
            WireType::LengthDelimited => "protolith::WireType::LengthDelimited",
            WireType::Fixed32 => "protolith::WireType::Fixed32",
        }
    }
}

/// Whether a repeated field of this scalar type is wire-packed when it has
/// no explicit packing override (proto3's default for numeric scalars).
pub fn is_packable(scalar: ScalarType) -> bool {
    !matches!(scalar, ScalarType::String | ScalarType::Bytes)
}

/// How to compute the wire length of one value of a scalar type. Varint
/// encodings need a real length function since they vary per value; fixed
/// encodings and `bool` cost a compile-time-known constant.
#[derive(Debug, Clone, Copy)]
pub enum LenExpr {
    Fn(&'static str),
    Const(u32),
    /// The value's own byte length plus the varint length prefix —
    /// computed inline at the call site rather than through a named
    /// function, since the content length is already in hand there.
    LengthDelimited,
}

#[derive(Debug, Clone, Copy)]
pub struct TypeMapping {
    pub rust_type: &'static str,
    pub wire_type: WireType,
    pub read_fn: &'static str,
    pub write_fn: &'static str,
    pub len_expr: LenExpr,
}

pub fn mapping_for(scalar: ScalarType) -> TypeMapping {
    match scalar {
        ScalarType::Int32 => TypeMapping {
            rust_type: "i32",
            wire_type: WireType::Varint,
            read_fn: "protolith::varint::read_int32",
            write_fn: "protolith::varint::write_int32",
            len_expr: LenExpr::Fn("protolith::varint::int32_len"),
        },
        ScalarType::Int64 => TypeMapping {
            rust_type: "i64",
            wire_type: WireType::Varint,
            read_fn: "protolith::varint::read_int64",
            write_fn: "protolith::varint::write_int64",
            len_expr: LenExpr::Fn("protolith::varint::int64_len"),
        },
        ScalarType::Uint32 => TypeMapping {
            rust_type: "u32",
            wire_type: WireType::Varint,
            read_fn: "protolith::varint::read_uint32",
            write_fn: "protolith::varint::write_uint32",
            len_expr: LenExpr::Fn("protolith::varint::uint32_len"),
        },
        ScalarType::Uint64 => TypeMapping {
            rust_type: "u64",
            wire_type: WireType::Varint,
            read_fn: "protolith::varint::read_uint64",
            write_fn: "protolith::varint::write_uint64",
            len_expr: LenExpr::Fn("protolith::varint::uint64_len"),
        },
        ScalarType::Sint32 => TypeMapping {
            rust_type: "i32",
            wire_type: WireType::Varint,
            read_fn: "protolith::varint::read_zigzag32",
            write_fn: "protolith::varint::write_zigzag32",
            len_expr: LenExpr::Fn("protolith::varint::zigzag32_len"),
        },
        ScalarType::Sint64 => TypeMapping {
            rust_type: "i64",
            wire_type: WireType::Varint,
            read_fn: "protolith::varint::read_zigzag64",
            write_fn: "protolith::varint::write_zigzag64",
            len_expr: LenExpr::Fn("protolith::varint::zigzag64_len"),
        },
        ScalarType::Bool => TypeMapping {
            rust_type: "bool",
            wire_type: WireType::Varint,
            read_fn: "protolith::varint::read_bool",
            write_fn: "protolith::varint::write_bool",
            len_expr: LenExpr::Const(1),
        },
        ScalarType::Fixed32 => TypeMapping {
            rust_type: "u32",
            wire_type: WireType::Fixed32,
            read_fn: "protolith::varint::read_fixed32",
            write_fn: "protolith::varint::write_fixed32",
            len_expr: LenExpr::Const(4),
        },
        ScalarType::Fixed64 => TypeMapping {
            rust_type: "u64",
            wire_type: WireType::Fixed64,
            read_fn: "protolith::varint::read_fixed64",
            write_fn: "protolith::varint::write_fixed64",
            len_expr: LenExpr::Const(8),
        },
        ScalarType::Sfixed32 => TypeMapping {
            rust_type: "i32",
            wire_type: WireType::Fixed32,
            read_fn: "protolith::varint::read_sfixed32",
            write_fn: "protolith::varint::write_sfixed32",
            len_expr: LenExpr::Const(4),
        },
        ScalarType::Sfixed64 => TypeMapping {
            rust_type: "i64",
            wire_type: WireType::Fixed64,
            read_fn: "protolith::varint::read_sfixed64",
            write_fn: "protolith::varint::write_sfixed64",
            len_expr: LenExpr::Const(8),
        },
        ScalarType::Float => TypeMapping {
            rust_type: "f32",
            wire_type: WireType::Fixed32,
            read_fn: "protolith::varint::read_float",
            write_fn: "protolith::varint::write_float",
            len_expr: LenExpr::Const(4),
        },
        ScalarType::Double => TypeMapping {
            rust_type: "f64",
            wire_type: WireType::Fixed64,
            read_fn: "protolith::varint::read_double",
            write_fn: "protolith::varint::write_double",
            len_expr: LenExpr::Const(8),
        },
        ScalarType::String => TypeMapping {
            rust_type: "String",
            wire_type: WireType::LengthDelimited,
            read_fn: "protolith::varint::read_string",
            write_fn: "protolith::varint::write_string",
            len_expr: LenExpr::LengthDelimited,
        },
        ScalarType::Bytes => TypeMapping {
            rust_type: "Vec<u8>",
            wire_type: WireType::LengthDelimited,
            read_fn: "protolith::varint::read_length_delimited",
            write_fn: "protolith::varint::write_length_delimited",
            len_expr: LenExpr::LengthDelimited,
        },
    }
}

/// `fixed32`/`fixed64` always cost a constant number of bytes per value,
/// independent of the value — used when sizing packed repeated fields.
pub fn fixed_len(wire_type: WireType) -> Option<u32> {
    match wire_type {
        WireType::Fixed32 => Some(4),
        WireType::Fixed64 => Some(8),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn int32_maps_to_varint_wire_type() {
        let m = mapping_for(ScalarType::Int32);
        assert_eq!(m.wire_type, WireType::Varint);
        assert_eq!(m.rust_type, "i32");
    }

    #[test]
    fn fixed64_has_constant_length() {
        assert_eq!(fixed_len(WireType::Fixed64), Some(8));
        assert_eq!(fixed_len(WireType::Varint), None);
    }

    #[test]
    fn bytes_is_not_packable() {
        assert!(!is_packable(ScalarType::Bytes));
        assert!(is_packable(ScalarType::Int32));
    }
}
