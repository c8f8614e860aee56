//! The trait every generated message type implements, plus the two
//! polymorphic entry points (`write`, `len`) that act over any generated
//! message type — these live here, once, rather than being re-emitted per
//! message the way the per-field encode/decode calls are.

use crate::error::DecodeError;
use crate::stream::ByteStream;
use crate::varint;

/// Implemented by every struct the code generator emits for a `message`
/// declaration.
///
/// Encode is total: a well-typed instance always has a byte representation,
/// so `write_to`/`encoded_len` return plain values rather than `Result`.
/// Decode can fail (truncated stream, malformed varint, ...), so `read_from`
/// returns a `Result`.
pub trait Message: Sized {
    /// Write this message's fields to `stream`, without any outer length
    /// prefix. Returns the number of bytes written.
    fn write_to<S: ByteStream>(&self, stream: &mut S) -> usize;

    /// Byte length this message would occupy on the wire, with no outer
    /// length prefix. Must agree exactly with `write_to`'s return value.
    fn encoded_len(&self) -> u32;

    /// Read a new instance from `stream`. `max_size` bounds how many bytes
    /// may be consumed; `0` means "read until end of stream" (used for
    /// top-level, non-embedded messages).
    fn read_from<S: ByteStream>(stream: &mut S, max_size: u32) -> Result<Self, DecodeError>;
}

/// Write `msg` to `stream`, optionally prepending its encoded length as a
/// varint (used when a message is embedded inside another as a
/// length-delimited field). Returns the total number of bytes written,
/// including the prefix if one was written.
pub fn write<M: Message, S: ByteStream>(stream: &mut S, msg: &M, prepend_length: bool) -> usize {
    if prepend_length {
        let size = msg.encoded_len();
        varint::write_varint(stream, size as u64);
        varint::varint_len(size as u64) as usize + msg.write_to(stream)
    } else {
        msg.write_to(stream)
    }
}

/// Byte length `msg` occupies on the wire, with no outer length prefix.
pub fn len<M: Message>(msg: &M) -> u32 {
    msg.encoded_len()
}
