//! Variable length integer encoding.
//!
//! Unsigned integers are written as LEB128: seven bits per byte, least significant
//! group first, high bit set on every byte but the last. Signed integers are
//! zigzag-mapped onto unsigned ones first so that small negative numbers stay short.
use crate::{
    error::{DecodeError, DecodeResult},
    io::{Reader, Writer},
};

/// Maximum number of bytes a `u64` occupies when varint encoded.
pub const MAX_VARINT_LEN: usize = 10;

/// Encode `val` as a varint.
#[inline]
pub fn encode_u64(mut val: u64, writer: &mut impl Writer) {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let mut len = 0;
    loop {
        let byte = (val & 0x7f) as u8;
        val >>= 7;
        if val == 0 {
            buf[len] = byte;
            len += 1;
            break;
        }
        buf[len] = byte | 0x80;
        len += 1;
    }
    writer.write(&buf[..len]);
}

/// Decode a varint `u64`.
///
/// Errors if the source ends mid-varint or the encoding does not fit in 64 bits.
#[inline]
pub fn decode_u64(reader: &mut impl Reader) -> DecodeResult<u64> {
    let mut val = 0u64;
    for i in 0..MAX_VARINT_LEN {
        let byte = reader.read_byte()?;
        let group = u64::from(byte & 0x7f);
        // The tenth byte may only carry the single remaining bit.
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(DecodeError::VarIntOverflow);
        }
        val |= group << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(val);
        }
    }
    Err(DecodeError::VarIntOverflow)
}

/// Map a signed integer onto an unsigned one: 0, -1, 1, -2, ... become 0, 1, 2, 3, ...
#[inline]
pub const fn zigzag(val: i64) -> u64 {
    if val < 0 {
        (!(val as u64)) * 2 + 1
    } else {
        (val as u64) * 2
    }
}

/// Inverse of [`zigzag`].
#[inline]
pub const fn unzigzag(n: u64) -> i64 {
    if n % 2 == 0 {
        // positive number
        (n / 2) as i64
    } else {
        // negative number
        // !m * 2 + 1 = n
        // !m = (n - 1) / 2
        // since n is odd, floor(n / 2) = floor((n - 1) / 2)
        !(n / 2) as i64
    }
}

#[inline]
pub fn encode_i64(val: i64, writer: &mut impl Writer) {
    encode_u64(zigzag(val), writer)
}

#[inline]
pub fn decode_i64(reader: &mut impl Reader) -> DecodeResult<i64> {
    decode_u64(reader).map(unzigzag)
}

#[cfg(test)]
mod tests {
    use {super::*, crate::proptest_config::proptest_cfg, proptest::prelude::*};

    fn encoded(val: u64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_u64(val, &mut out);
        out
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encoded(0), [0x00]);
        assert_eq!(encoded(1), [0x01]);
        assert_eq!(encoded(127), [0x7f]);
        assert_eq!(encoded(128), [0x80, 0x01]);
        assert_eq!(encoded(300), [0xac, 0x02]);
        assert_eq!(encoded(u64::MAX).len(), MAX_VARINT_LEN);
    }

    #[test]
    fn zigzag_order() {
        assert_eq!(zigzag(0), 0);
        assert_eq!(zigzag(-1), 1);
        assert_eq!(zigzag(1), 2);
        assert_eq!(zigzag(-2), 3);
        assert_eq!(zigzag(i64::MAX), u64::MAX - 1);
        assert_eq!(zigzag(i64::MIN), u64::MAX);
    }

    #[test]
    fn rejects_eleven_byte_varint() {
        let bytes = [0xffu8; 11];
        assert!(matches!(
            decode_u64(&mut &bytes[..]),
            Err(DecodeError::VarIntOverflow)
        ));
    }

    #[test]
    fn rejects_overflowing_last_byte() {
        let mut bytes = [0xffu8; MAX_VARINT_LEN];
        bytes[MAX_VARINT_LEN - 1] = 0x02;
        assert!(matches!(
            decode_u64(&mut &bytes[..]),
            Err(DecodeError::VarIntOverflow)
        ));
    }

    #[test]
    fn truncated_varint() {
        let bytes = [0x80u8, 0x80];
        assert!(matches!(
            decode_u64(&mut &bytes[..]),
            Err(DecodeError::UnexpectedEnd(1))
        ));
    }

    proptest! {
        #![proptest_config(proptest_cfg())]

        #[test]
        fn varint_u64_consumes_exactly_its_bytes(val in any::<u64>(), tail in proptest::collection::vec(any::<u8>(), 0..=8)) {
            let mut bytes = encoded(val);
            let len = bytes.len();
            bytes.extend_from_slice(&tail);
            let mut src = bytes.as_slice();
            prop_assert_eq!(decode_u64(&mut src).unwrap(), val);
            prop_assert_eq!(src, &bytes[len..]);
        }

        #[test]
        fn varint_i64(val in any::<i64>()) {
            let mut bytes = Vec::new();
            encode_i64(val, &mut bytes);
            prop_assert_eq!(decode_i64(&mut bytes.as_slice()).unwrap(), val);
        }
    }
}
