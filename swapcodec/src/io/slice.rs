use super::*;

/// In-memory [`Reader`] over a borrowed slice. Reading shrinks the slice from the front,
/// so whatever is left after a decode is the unconsumed suffix.
///
/// # Examples
/// ```
/// # use swapcodec::io::Reader;
/// let bytes = [1u8, 2, 3, 4];
/// let mut src = &bytes[..];
/// let mut dst = [0u8; 3];
/// assert_eq!(src.read(&mut dst), 3);
/// assert_eq!(dst, [1, 2, 3]);
/// assert_eq!(src, &[4]);
/// ```
impl Reader for &[u8] {
    #[inline]
    fn read(&mut self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.len());
        let (head, rest) = self.split_at(n);
        dst[..n].copy_from_slice(head);
        *self = rest;
        n
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.len()
    }
}
