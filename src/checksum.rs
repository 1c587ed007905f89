#![deny(missing_docs)]

use std::num::Wrapping;

use crate::binary::read::ReadScope;
use crate::binary::U32Be;
use crate::error::ParseError;

/// The value the checksum of a whole font must equal once `checkSumAdjustment` is filled in.
pub const FONT_CHECKSUM_MAGIC: u32 = 0xB1B0AFBA;

/// Calculate a checksum of `data` according to the OpenType table checksum algorithm
///
/// A trailing partial word is treated as if it were zero padded, matching the padding written
/// between tables.
///
/// https://docs.microsoft.com/en-us/typography/opentype/spec/otff#calculating-checksums
pub fn table_checksum(data: &[u8]) -> Result<Wrapping<u32>, ParseError> {
    let whole_words = data.len() / 4;
    let mut ctxt = ReadScope::new(data).ctxt();
    let array = ctxt.read_array::<U32Be>(whole_words)?;
    let mut sum: Wrapping<u32> = array.iter().map(Wrapping).sum();

    let tail = &data[whole_words * 4..];
    if !tail.is_empty() {
        let mut last = [0; 4];
        last[..tail.len()].copy_from_slice(tail);
        sum += Wrapping(u32::from_be_bytes(last));
    }

    Ok(sum)
}

/// Calculate the `head` table `checkSumAdjustment` for a font whose checksum, computed with the
/// adjustment set to zero, is `font_checksum`.
pub fn check_sum_adjustment(font_checksum: Wrapping<u32>) -> u32 {
    (Wrapping(FONT_CHECKSUM_MAGIC) - font_checksum).0
}

#[cfg(test)]
mod tests {
    use super::Wrapping;

    #[test]
    fn test_table_checksum() {
        let data = [0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 4];

        assert_eq!(super::table_checksum(&data).unwrap(), Wrapping(10));
    }

    #[test]
    fn test_table_checksum_overflow() {
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 2];

        assert_eq!(super::table_checksum(&data).unwrap(), Wrapping(1));
    }

    #[test]
    fn test_table_checksum_unaligned() {
        let data = [0, 0, 0, 1, 0x01, 0x02];

        assert_eq!(
            super::table_checksum(&data).unwrap(),
            Wrapping(1 + 0x0102_0000)
        );
    }

    #[test]
    fn test_check_sum_adjustment() {
        let adjustment = super::check_sum_adjustment(Wrapping(0xB1B0AFBB));
        assert_eq!(adjustment, u32::MAX);
        assert_eq!(
            (Wrapping(0xB1B0AFBB) + Wrapping(adjustment)).0,
            super::FONT_CHECKSUM_MAGIC
        );
    }
}
