use {
    super::*,
    bytes::{Buf, Bytes, BytesMut},
};

/// Appends into the spare capacity of a [`BytesMut`], reserving only when it runs out.
impl Writer for BytesMut {
    #[inline]
    fn write(&mut self, src: &[u8]) -> usize {
        self.extend_from_slice(src);
        src.len()
    }
}

/// Reads from the front of a [`Bytes`] handle. Advancing only moves the handle's start,
/// so the remainder keeps sharing the original allocation.
impl Reader for Bytes {
    #[inline]
    fn read(&mut self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.len());
        dst[..n].copy_from_slice(&self[..n]);
        self.advance(n);
        n
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.len()
    }
}
