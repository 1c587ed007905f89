//! Derive font names from font filenames.
//!
//! A filename such as `Roboto Mono Bold Italic.ttf` is split on single spaces. The first
//! `family_word_count` words form the family name and the remaining words form the variant
//! (style) name.

use std::path::Path;

use crate::error::{MalformedFilename, PathError};

/// Number of leading filename words treated as the family name.
pub const FAMILY_WORD_COUNT: usize = 1;

/// File extensions of fonts that can be renamed.
pub const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

/// Family and variant names derived from a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingData {
    pub family: String,
    /// `family` with all spaces removed
    pub family_compact: String,
    /// May be empty when the filename has no words after the family
    pub variant: String,
    /// `variant` with all spaces removed
    pub variant_compact: String,
}

impl NamingData {
    pub fn new(family: String, variant: String) -> Self {
        NamingData {
            family_compact: compact(&family),
            variant_compact: compact(&variant),
            family,
            variant,
        }
    }

    /// Full font name (nameID 4).
    ///
    /// The family and variant are always joined with a space, so an empty variant leaves a
    /// trailing space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.family, self.variant)
    }

    /// PostScript name (nameID 6).
    ///
    /// The compact family and variant are always joined with a hyphen, so an empty variant
    /// leaves a trailing hyphen.
    pub fn postscript_name(&self) -> String {
        format!("{}-{}", self.family_compact, self.variant_compact)
    }
}

fn compact(name: &str) -> String {
    name.chars().filter(|&c| c != ' ').collect()
}

/// Split `basename` into family and variant names.
///
/// The first `family_word_count` space separated words are the family, the rest are the
/// variant. Words are separated by exactly one space; a doubled, leading, or trailing space
/// yields an empty word. An empty word in the family, or fewer words than
/// `family_word_count`, is an error.
///
/// ```
/// use fontname::naming;
///
/// let naming = naming::parse("Source Sans Pro Bold", 2).unwrap();
/// assert_eq!(naming.family, "Source Sans");
/// assert_eq!(naming.variant, "Pro Bold");
/// assert_eq!(naming.postscript_name(), "SourceSans-ProBold");
/// ```
pub fn parse(basename: &str, family_word_count: usize) -> Result<NamingData, MalformedFilename> {
    let malformed = || MalformedFilename {
        basename: basename.to_owned(),
        family_word_count,
    };

    let tokens: Vec<&str> = basename.split(' ').collect();
    if family_word_count == 0 || tokens.len() < family_word_count {
        return Err(malformed());
    }

    let (family, variant) = tokens.split_at(family_word_count);
    if family.iter().any(|token| token.is_empty()) {
        return Err(malformed());
    }

    Ok(NamingData::new(family.join(" "), variant.join(" ")))
}

/// Return the filename of `path` without its extension.
///
/// Only `.ttf` and `.otf` files are accepted.
pub fn basename(path: &Path) -> Result<&str, PathError> {
    let extension = path.extension().ok_or(PathError::UnsupportedExtension)?;
    if !FONT_EXTENSIONS.iter().any(|ext| extension == *ext) {
        return Err(PathError::UnsupportedExtension);
    }
    path.file_stem()
        .ok_or(PathError::UnsupportedExtension)?
        .to_str()
        .ok_or(PathError::NotUtf8)
}
