//! swapcodec is a buffer-reusing encoder/decoder over a self-describing binary format.
//!
//! A [`Codec`] keeps one encoder and one decoder alive for its whole lifetime and points
//! them at caller-owned buffers for the duration of each call. Encoding appends into the
//! caller's [`BytesMut`](bytes::BytesMut), using its spare capacity before allocating;
//! decoding consumes one value from the front of a [`Bytes`](bytes::Bytes) and hands back
//! the rest without copying, so several values can be packed into one buffer and read
//! back in order.
//!
//! # Quickstart
//!
//! Anything implementing `serde`'s traits can be encoded.
//!
//! ```
//! # use {bytes::BytesMut, serde::{Deserialize, Serialize}, swapcodec::Codec};
//! let codec = Codec::new();
//!
//! let buf = codec.encode(&1234i32, BytesMut::new()).unwrap();
//! let (value, rest) = codec.decode::<i32>(buf.freeze()).unwrap();
//! assert_eq!(value, 1234);
//! assert!(rest.is_empty());
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Entry {
//!     a: String,
//!     b: u32,
//! }
//!
//! // Reuse one buffer for a sequence of values.
//! let mut buf = BytesMut::with_capacity(64);
//! codec.encode_into(&Entry { a: "aaa".into(), b: 123 }, &mut buf).unwrap();
//! codec.encode_into(&Entry { a: "bbb".into(), b: 456 }, &mut buf).unwrap();
//!
//! let (first, rest) = codec.decode::<Entry>(buf.freeze()).unwrap();
//! assert_eq!(first, Entry { a: "aaa".into(), b: 123 });
//! assert!(!rest.is_empty());
//! let (second, rest) = codec.decode::<Entry>(rest).unwrap();
//! assert_eq!(second, Entry { a: "bbb".into(), b: 456 });
//! assert!(rest.is_empty());
//! ```
//!
//! # Type descriptors
//!
//! The format is self-describing: the first time a struct or enum type goes out, its
//! name and member names go with it, and later values of the type refer back to them by
//! number. Both ends remember what crossed the stream, so bytes are meant to be decoded
//! in the order they were encoded. Where that cannot be guaranteed (concurrent use,
//! out-of-order delivery), call [`Codec::register`] with a sample of each struct and
//! enum variant before real traffic.
//!
//! ```
//! # use {bytes::BytesMut, serde::{Deserialize, Serialize}, swapcodec::Codec};
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! enum Event {
//!     Started { id: u64 },
//!     Stopped(u64),
//! }
//!
//! let codec = Codec::new();
//! codec.register(&Event::Started { id: 0 }).unwrap();
//! codec.register(&Event::Stopped(0)).unwrap();
//!
//! let started = codec.encode(&Event::Started { id: 1 }, BytesMut::new()).unwrap();
//! let stopped = codec.encode(&Event::Stopped(1), BytesMut::new()).unwrap();
//!
//! // Decoding in reverse order works because both ends already know `Event`.
//! let (event, _) = codec.decode::<Event>(stopped.freeze()).unwrap();
//! assert_eq!(event, Event::Stopped(1));
//! let (event, _) = codec.decode::<Event>(started.freeze()).unwrap();
//! assert_eq!(event, Event::Started { id: 1 });
//! ```
//!
//! # Limits
//!
//! 128-bit integers, sequences and maps whose length is not known up front, and values
//! nested deeper than the configured depth cannot be encoded. Decoding rejects lengths
//! above the configured preallocation limit before allocating. Both limits are set
//! through [`config::Configuration`].
pub mod config;
pub mod error;
pub mod io;
mod codec;
mod de;
mod int_encoding;
mod kind;
mod len;
#[cfg(test)]
mod proptest_config;
mod registry;
mod ser;
pub use {
    codec::Codec,
    error::{DecodeError, EncodeError, Error, Result},
};
