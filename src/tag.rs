//! Four byte sfnt table tags.

use std::fmt;

/// Generate a 4-byte font table tag from byte string, e.g. `tag!(b"name") == 0x6E616D65`
macro_rules! tag {
    ($w:expr) => {
        tag(*$w)
    };
}

/// Wrapper that formats a tag as its four characters, or as hex if they are not printable.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct DisplayTag(pub u32);

const fn tag(chars: [u8; 4]) -> u32 {
    u32::from_be_bytes(chars)
}

impl fmt::Display for DisplayTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_be_bytes();
        if bytes.iter().all(|b| b.is_ascii() && !b.is_ascii_control()) {
            let s: String = bytes.iter().copied().map(char::from).collect();
            s.fmt(f)
        } else {
            write!(f, "0x{:08x}", self.0)
        }
    }
}

impl fmt::Debug for DisplayTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_string().fmt(f)
    }
}

pub const DSIG: u32 = tag!(b"DSIG");
pub const HEAD: u32 = tag!(b"head");
pub const MAXP: u32 = tag!(b"maxp");
pub const NAME: u32 = tag!(b"name");
pub const OS_2: u32 = tag!(b"OS/2");
pub const OTTO: u32 = tag!(b"OTTO");
pub const POST: u32 = tag!(b"post");
pub const TTCF: u32 = tag!(b"ttcf");
