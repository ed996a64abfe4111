//! Error types and helpers.
use {
    core::{fmt::Display, str::Utf8Error},
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Unsupported type: {0}")]
    UnsupportedType(&'static str),
    #[error("Sequences and maps must have a known length")]
    SequenceMustHaveLength,
    #[error("Value nesting exceeded depth limit of {0}")]
    DepthLimitExceeded(usize),
    #[error("Length exceeded preallocation limit of {limit} bytes (needed {needed} bytes)")]
    PreallocationSizeLimit { needed: usize, limit: usize },
    #[error("Custom error: {0}")]
    Custom(String),
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unexpected end of input: needed {0} more bytes")]
    UnexpectedEnd(usize),
    #[error("Invalid kind byte: {0:#04x}")]
    InvalidKind(u8),
    #[error("Varint does not fit in 64 bits")]
    VarIntOverflow,
    #[error("Could not cast integer type to pointer sized type")]
    PointerSizedReadError,
    #[error(transparent)]
    InvalidUtf8Encoding(#[from] Utf8Error),
    #[error("Invalid char scalar value: {0:#x}")]
    InvalidChar(u32),
    #[error("Reference to undefined type id {0}")]
    UnknownType(usize),
    #[error("Reference to undefined member {index} of type id {type_id}")]
    UnknownMember { type_id: usize, index: usize },
    #[error("Definition of {what} {id} skips ahead of the next free id {next}")]
    OutOfOrderDefinition {
        what: &'static str,
        id: usize,
        next: usize,
    },
    #[error("Definition of {what} {id} as `{found}` conflicts with known `{known}`")]
    ConflictingDefinition {
        what: &'static str,
        id: usize,
        known: String,
        found: String,
    },
    #[error("Struct end marker where a member was expected")]
    UnexpectedEndMarker,
    #[error(
        "Encoded length exceeded preallocation limit of {limit} bytes (needed {needed} bytes)"
    )]
    PreallocationSizeLimit { needed: usize, limit: usize },
    #[error("Value nesting exceeded depth limit of {0}")]
    DepthLimitExceeded(usize),
    #[error("Custom error: {0}")]
    Custom(String),
}

pub type Result<T> = core::result::Result<T, Error>;
pub type EncodeResult<T> = core::result::Result<T, EncodeError>;
pub type DecodeResult<T> = core::result::Result<T, DecodeError>;

impl serde::ser::Error for EncodeError {
    #[cold]
    fn custom<T: Display>(msg: T) -> Self {
        EncodeError::Custom(msg.to_string())
    }
}

impl serde::de::Error for DecodeError {
    #[cold]
    fn custom<T: Display>(msg: T) -> Self {
        DecodeError::Custom(msg.to_string())
    }
}

impl Error {
    /// Whether the failure happened while encoding.
    pub fn is_encode(&self) -> bool {
        matches!(self, Error::Encode(_))
    }

    /// Whether the failure happened while decoding.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }
}

#[cold]
pub const fn unsupported_type(name: &'static str) -> EncodeError {
    EncodeError::UnsupportedType(name)
}

#[cold]
pub const fn encode_depth_limit(limit: usize) -> EncodeError {
    EncodeError::DepthLimitExceeded(limit)
}

#[cold]
pub const fn encode_preallocation_size_limit(needed: usize, limit: usize) -> EncodeError {
    EncodeError::PreallocationSizeLimit { needed, limit }
}

#[cold]
pub const fn unexpected_end(needed: usize) -> DecodeError {
    DecodeError::UnexpectedEnd(needed)
}

#[cold]
pub const fn invalid_kind(byte: u8) -> DecodeError {
    DecodeError::InvalidKind(byte)
}

#[cold]
pub const fn pointer_sized_decode_error() -> DecodeError {
    DecodeError::PointerSizedReadError
}

#[cold]
pub const fn invalid_char(val: u32) -> DecodeError {
    DecodeError::InvalidChar(val)
}

#[cold]
pub const fn unknown_type(id: usize) -> DecodeError {
    DecodeError::UnknownType(id)
}

#[cold]
pub const fn unknown_member(type_id: usize, index: usize) -> DecodeError {
    DecodeError::UnknownMember { type_id, index }
}

#[cold]
pub const fn preallocation_size_limit(needed: usize, limit: usize) -> DecodeError {
    DecodeError::PreallocationSizeLimit { needed, limit }
}

#[cold]
pub const fn decode_depth_limit(limit: usize) -> DecodeError {
    DecodeError::DepthLimitExceeded(limit)
}
