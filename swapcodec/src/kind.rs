//! Kind bytes that prefix every encoded value.
use crate::error::{invalid_kind, DecodeError};

/// Leading byte of an encoded value, naming the shape of its payload.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Unit = 0x00,
    None = 0x01,
    Some = 0x02,
    False = 0x03,
    True = 0x04,
    Int = 0x05,
    Uint = 0x06,
    F32 = 0x07,
    F64 = 0x08,
    Char = 0x09,
    Str = 0x0a,
    Bytes = 0x0b,
    Seq = 0x0c,
    Map = 0x0d,
    Struct = 0x0e,
    Variant = 0x0f,
}

impl Kind {
    #[inline]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_bool(val: bool) -> Self {
        if val {
            Kind::True
        } else {
            Kind::False
        }
    }
}

impl TryFrom<u8> for Kind {
    type Error = DecodeError;

    #[inline]
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            0x00 => Kind::Unit,
            0x01 => Kind::None,
            0x02 => Kind::Some,
            0x03 => Kind::False,
            0x04 => Kind::True,
            0x05 => Kind::Int,
            0x06 => Kind::Uint,
            0x07 => Kind::F32,
            0x08 => Kind::F64,
            0x09 => Kind::Char,
            0x0a => Kind::Str,
            0x0b => Kind::Bytes,
            0x0c => Kind::Seq,
            0x0d => Kind::Map,
            0x0e => Kind::Struct,
            0x0f => Kind::Variant,
            _ => return Err(invalid_kind(byte)),
        })
    }
}
