use {
    super::*,
    bytes::{Bytes, BytesMut},
    core::mem,
};

/// In-memory sink/source whose backing storage is swapped in from the caller for the
/// duration of one operation and handed back afterwards.
///
/// The write side is a [`BytesMut`] that is appended to; the read side is a [`Bytes`]
/// that is consumed from the front. Neither side allocates on its own: adopting a
/// buffer moves the caller's handle in, releasing moves it back out, and a fresh or
/// [reset](SwapBuffer::reset) buffer holds no storage at all.
///
/// The buffer itself does no synchronization. Whoever owns it (the
/// [`Codec`](crate::Codec)) is responsible for making sure only one operation sees it
/// at a time.
///
/// # Examples
///
/// ```
/// # use {bytes::{Bytes, BytesMut}, swapcodec::io::{Reader, SwapBuffer, Writer}};
/// let mut buf = SwapBuffer::new();
///
/// buf.adopt_sink(BytesMut::with_capacity(16));
/// buf.write(b"hello");
/// let written = buf.release_sink();
/// assert_eq!(&written[..], b"hello");
///
/// buf.adopt_source(Bytes::from_static(b"hello world"));
/// let mut word = [0u8; 6];
/// buf.read(&mut word);
/// assert_eq!(&word, b"hello ");
/// assert_eq!(&buf.release_source()[..], b"world");
/// ```
#[derive(Debug, Default)]
pub struct SwapBuffer {
    sink: BytesMut,
    source: Bytes,
}

impl SwapBuffer {
    pub fn new() -> Self {
        Self {
            sink: BytesMut::new(),
            source: Bytes::new(),
        }
    }

    /// Point the write side at `dst`. Subsequent writes append after `dst`'s current
    /// contents, reusing its spare capacity.
    #[inline]
    pub fn adopt_sink(&mut self, dst: BytesMut) {
        debug_assert!(self.sink.is_empty(), "sink adopted while still holding data");
        self.sink = dst;
    }

    /// Hand the write side back, leaving the buffer without storage.
    #[inline]
    pub fn release_sink(&mut self) -> BytesMut {
        mem::take(&mut self.sink)
    }

    /// Point the read side at `src`.
    #[inline]
    pub fn adopt_source(&mut self, src: Bytes) {
        debug_assert!(self.source.is_empty(), "source adopted while still holding data");
        self.source = src;
    }

    /// Hand back whatever has not been read yet. The returned handle is a suffix of the
    /// adopted one and shares its storage.
    #[inline]
    pub fn release_source(&mut self) -> Bytes {
        mem::take(&mut self.source)
    }

    /// Bytes currently held on the write side.
    #[inline]
    pub fn written(&self) -> &[u8] {
        &self.sink
    }

    /// Drop whatever either side holds.
    #[inline]
    pub fn reset(&mut self) {
        self.sink = BytesMut::new();
        self.source = Bytes::new();
    }

    /// Whether both sides are empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sink.is_empty() && self.source.is_empty()
    }
}

impl Writer for SwapBuffer {
    #[inline]
    fn write(&mut self, src: &[u8]) -> usize {
        self.sink.write(src)
    }
}

impl Reader for SwapBuffer {
    #[inline]
    fn read(&mut self, dst: &mut [u8]) -> usize {
        self.source.read(dst)
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.source.len()
    }
}
