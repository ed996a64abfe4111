//! [`Reader`] and [`Writer`] contracts, their in-memory implementations, and the
//! [`SwapBuffer`] the codec drives both directions through.
use crate::error::{unexpected_end, DecodeResult};

/// Byte sink for the stream encoder.
///
/// In-memory sinks always accept the whole input, so `write` reports the number of
/// bytes written rather than a result. Implementations grow their storage only when
/// the existing capacity cannot hold `src`.
pub trait Writer {
    /// Append `src` and return the number of bytes written (always `src.len()`).
    fn write(&mut self, src: &[u8]) -> usize;
}

/// Byte source for the stream decoder.
///
/// # Advancement semantics
/// - `read` copies up to `dst.len()` bytes from the front and advances past them.
/// - `read_exact`, `read_byte` and `read_array` advance only by what they return,
///   and report [`DecodeError::UnexpectedEnd`](crate::error::DecodeError::UnexpectedEnd)
///   when the source runs dry.
pub trait Reader {
    /// Copy as many bytes as fit into `dst`, advance past them, and return the count.
    fn read(&mut self, dst: &mut [u8]) -> usize;

    /// Number of unread bytes.
    fn remaining(&self) -> usize;

    /// Copy and consume exactly `dst.len()` bytes.
    #[inline]
    fn read_exact(&mut self, dst: &mut [u8]) -> DecodeResult<()> {
        if self.remaining() < dst.len() {
            return Err(unexpected_end(dst.len() - self.remaining()));
        }
        let n = self.read(dst);
        debug_assert_eq!(n, dst.len());
        Ok(())
    }

    /// Copy and consume exactly `N` bytes.
    #[inline]
    fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        self.read_exact(&mut out)?;
        Ok(out)
    }

    /// Consume a single byte.
    #[inline]
    fn read_byte(&mut self) -> DecodeResult<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }
}

impl<W: Writer + ?Sized> Writer for &mut W {
    #[inline]
    fn write(&mut self, src: &[u8]) -> usize {
        (**self).write(src)
    }
}

impl<R: Reader + ?Sized> Reader for &mut R {
    #[inline]
    fn read(&mut self, dst: &mut [u8]) -> usize {
        (**self).read(dst)
    }

    #[inline]
    fn remaining(&self) -> usize {
        (**self).remaining()
    }
}

mod buf;
mod slice;
mod swap;
mod vec;
pub use swap::SwapBuffer;
