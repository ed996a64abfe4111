//! Length prefixes for strings, byte sequences, sequences and maps.
use crate::{
    config::Config,
    error::{
        encode_preallocation_size_limit, pointer_sized_decode_error, preallocation_size_limit,
        unexpected_end, DecodeResult, EncodeResult,
    },
    int_encoding::{decode_u64, encode_u64},
    io::{Reader, Writer},
};

/// Smallest encoded size of one element of a byte string.
pub const BYTE: usize = 1;
/// Smallest encoded size of one sequence element (a bare kind byte).
pub const SEQ_ELEMENT: usize = 1;
/// Smallest encoded size of one map entry (two bare kind bytes).
pub const MAP_ENTRY: usize = 2;

#[inline]
pub fn write_len(writer: &mut impl Writer, len: usize) {
    encode_u64(len as u64, writer)
}

/// Check a length about to be written against the limit [`read_len`] applies, so a
/// value the encoder accepts is one the decoder accepts.
#[inline]
pub fn check_len<C: Config>(len: usize, min_element_size: usize) -> EncodeResult<()> {
    let needed = len
        .checked_mul(min_element_size)
        .ok_or_else(|| encode_preallocation_size_limit(usize::MAX, C::PREALLOCATION_SIZE_LIMIT))?;
    if needed > C::PREALLOCATION_SIZE_LIMIT {
        return Err(encode_preallocation_size_limit(
            needed,
            C::PREALLOCATION_SIZE_LIMIT,
        ));
    }
    Ok(())
}

/// Read a length prefix for a collection whose elements occupy at least
/// `min_element_size` bytes each.
///
/// The implied size is checked against `C::PREALLOCATION_SIZE_LIMIT` and against the
/// bytes left in `reader`, so a hostile length never drives an allocation.
#[inline]
pub fn read_len<C: Config>(
    reader: &mut impl Reader,
    min_element_size: usize,
) -> DecodeResult<usize> {
    let len = decode_u64(reader)
        .and_then(|len| usize::try_from(len).map_err(|_| pointer_sized_decode_error()))?;
    let needed = len
        .checked_mul(min_element_size)
        .ok_or_else(|| preallocation_size_limit(usize::MAX, C::PREALLOCATION_SIZE_LIMIT))?;
    if needed > C::PREALLOCATION_SIZE_LIMIT {
        return Err(preallocation_size_limit(
            needed,
            C::PREALLOCATION_SIZE_LIMIT,
        ));
    }
    let remaining = reader.remaining();
    if needed > remaining {
        return Err(unexpected_end(needed - remaining));
    }
    Ok(len)
}
