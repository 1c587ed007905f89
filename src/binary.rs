//! Big-endian binary types shared by the reader and the writer.

/// Read binary data
pub mod read;

/// Write binary data
pub mod write;

/// Calculate the length required to 32-bit (long) align data of length `len`
///
/// Every table in an sfnt file starts on a four byte boundary.
///
/// ```
/// use fontname::binary::long_align;
///
/// assert_eq!(long_align(123), 124);
/// assert_eq!(long_align(124), 124);
/// ```
pub const fn long_align(len: usize) -> usize {
    (len + 3) / 4 * 4
}

#[derive(Copy, Clone)]
pub enum U16Be {}

#[derive(Copy, Clone)]
pub enum U32Be {}
