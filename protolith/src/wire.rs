//! Tag encoding and the unknown-field skip routine.

use crate::error::DecodeError;
use crate::stream::ByteStream;
use crate::varint;

/// The low 3 bits of a protobuf tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    /// Deprecated group start. Never produced; skipped as unknown if read.
    StartGroup = 3,
    /// Deprecated group end. Never produced; skipped as unknown if read.
    EndGroup = 4,
    Fixed32 = 5,
}

impl WireType {
    pub fn from_u32(value: u32) -> Option<WireType> {
        match value {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            3 => Some(WireType::StartGroup),
            4 => Some(WireType::EndGroup),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }
}

/// Combine a field number and wire type into a tag varint value.
pub fn make_tag(field_number: u32, wire_type: WireType) -> u32 {
    (field_number << 3) | wire_type as u32
}

/// Split a decoded tag varint into `(field_number, wire_type)`.
pub fn split_tag(tag: u32) -> (u32, u32) {
    (tag >> 3, tag & 0x7)
}

/// Number of bytes the tag for `(field_number, wire_type)` occupies.
pub fn tag_len(field_number: u32, wire_type: WireType) -> u32 {
    varint::varint_len(make_tag(field_number, wire_type) as u64)
}

/// Read a tag and split it into `(field_number, wire_type)` in one step.
pub fn read_tag<S: ByteStream>(stream: &mut S) -> Result<(u32, u32), DecodeError> {
    let tag = varint::read_varint(stream)? as u32;
    Ok(split_tag(tag))
}

/// Consume and discard the payload of a field whose number was not
/// recognized by the generated reader, based on its wire type. Proto3
/// forward compatibility relies on this never failing the decode.
///
/// Start-group (3) is honored structurally: nested tags are consumed and
/// recursively skipped until the matching end-group for `field_number` is
/// found, even though protolith never emits groups itself.
pub fn skip_field<S: ByteStream>(
    stream: &mut S,
    field_number: u32,
    wire_type: u32,
) -> Result<(), DecodeError> {
    match WireType::from_u32(wire_type) {
        Some(WireType::Varint) => {
            varint::read_varint(stream)?;
        }
        Some(WireType::Fixed64) => {
            stream.read_n(8)?;
        }
        Some(WireType::LengthDelimited) => {
            varint::read_length_delimited(stream)?;
        }
        Some(WireType::Fixed32) => {
            stream.read_n(4)?;
        }
        Some(WireType::StartGroup) => {
            skip_group(stream, field_number)?;
        }
        Some(WireType::EndGroup) => {
            // An end-group with no matching start is malformed input; treat
            // it the same as a truncated stream rather than panicking.
            return Err(DecodeError::truncated());
        }
        None => return Err(DecodeError::truncated()),
    }
    Ok(())
}

fn skip_group<S: ByteStream>(stream: &mut S, group_field_number: u32) -> Result<(), DecodeError> {
    loop {
        if stream.at_end() {
            return Err(DecodeError::truncated());
        }
        let (field_number, wire_type) = read_tag(stream)?;
        if wire_type == WireType::EndGroup as u32 && field_number == group_field_number {
            return Ok(());
        }
        skip_field(stream, field_number, wire_type)?;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stream::CursorStream;

    #[test]
    fn tag_roundtrip() {
        let tag = make_tag(5, WireType::LengthDelimited);
        assert_eq!(split_tag(tag), (5, 2));
    }

    #[test]
    fn skip_varint_field() {
        let mut s = CursorStream::new();
        varint::write_varint(&mut s, 42);
        s.set_position(0);
        skip_field(&mut s, 7, WireType::Varint as u32).unwrap();
        assert!(s.at_end());
    }

    #[test]
    fn skip_length_delimited_field() {
        let mut s = CursorStream::new();
        varint::write_length_delimited(&mut s, b"hello");
        s.set_position(0);
        skip_field(&mut s, 7, WireType::LengthDelimited as u32).unwrap();
        assert!(s.at_end());
    }
}
