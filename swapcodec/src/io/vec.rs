use super::*;

/// Writer implementation for `Vec<u8>` that appends to the vector. The vector will grow as needed.
///
/// # Examples
///
/// Writing to an existing vector.
/// ```
/// # use swapcodec::io::Writer;
/// let mut vec = vec![1, 2, 3];
/// let written = vec.write(&[4, 5, 6]);
/// assert_eq!(written, 3);
/// assert_eq!(vec, &[1, 2, 3, 4, 5, 6]);
/// ```
impl Writer for Vec<u8> {
    #[inline]
    fn write(&mut self, src: &[u8]) -> usize {
        self.extend_from_slice(src);
        src.len()
    }
}
