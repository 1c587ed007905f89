//! Rename fonts to match their filenames.
//!
//! `rewrite` updates the family (1), subfamily (2), full name (4) and PostScript name (6)
//! records of a name table. `rename_font` and `rename_fonts` apply it to font files on disk.

use std::path::Path;

use log::{debug, info, warn};

use crate::container::FontContainer;
use crate::error::{BatchError, ContainerError, PathError, RenameError};
use crate::naming::{self, NamingData, FAMILY_WORD_COUNT};
use crate::tables::name::owned::{NameRecord, NameString};
use crate::tables::name::NameId;

/// What to do when a font in a batch cannot be renamed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Stop at the first failure. Fonts already renamed stay renamed.
    #[default]
    Abort,
    /// Try every font and report all failures at the end.
    Continue,
}

/// Settings for renaming fonts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RenameOptions {
    /// Number of leading filename words that make up the family name
    pub family_word_count: usize,
    pub on_error: BatchPolicy,
}

impl Default for RenameOptions {
    fn default() -> Self {
        RenameOptions {
            family_word_count: FAMILY_WORD_COUNT,
            on_error: BatchPolicy::default(),
        }
    }
}

/// Update every family, subfamily, full name, and PostScript name record to the names in
/// `naming`.
///
/// Records are matched on name ID alone, so every platform, encoding and language variant of a
/// name receives the same new value. All other records are left untouched. Returns the number
/// of records updated.
pub fn rewrite(records: &mut [NameRecord], naming: &NamingData) -> usize {
    let full_name = naming.full_name();
    let postscript_name = naming.postscript_name();

    let mut updated = 0;
    for record in records.iter_mut() {
        let string = match record.name_id {
            NameId::FAMILY => naming.family.as_str(),
            NameId::SUBFAMILY => naming.variant.as_str(),
            NameId::FULL_NAME => full_name.as_str(),
            NameId::POSTSCRIPT_NAME => postscript_name.as_str(),
            _ => continue,
        };
        record.string = NameString::from(string);
        updated += 1;
    }

    updated
}

/// Rename the font at `path` to match its filename, saving it in place.
pub fn rename_font(path: &Path, options: &RenameOptions) -> Result<(), RenameError> {
    let path_error = |err| RenameError::Path(path.to_path_buf(), err);
    if !path.exists() {
        return Err(path_error(PathError::NotFound));
    }
    if !path.is_file() {
        return Err(path_error(PathError::NotAFile));
    }
    let basename = naming::basename(path).map_err(path_error)?;
    let naming = naming::parse(basename, options.family_word_count)
        .map_err(|err| RenameError::MalformedFilename(path.to_path_buf(), err))?;
    debug!("'{}': {:?}", path.display(), naming);

    let mut font = FontContainer::open(path).map_err(|err| match err {
        ContainerError::Parse(err) => RenameError::Parse(path.to_path_buf(), err),
        ContainerError::Io(err) => RenameError::Open(path.to_path_buf(), err),
        ContainerError::Write(err) => RenameError::Encode(path.to_path_buf(), err),
    })?;
    let old_name = font
        .name_table()
        .string_for_id(NameId::FULL_NAME)
        .map(String::from);

    if rewrite(font.name_records_mut(), &naming) == 0 {
        warn!(
            "'{}' has no family, style, full or PostScript name records to rename",
            path.display()
        );
    }

    font.save(path).map_err(|err| match err {
        ContainerError::Write(err) => RenameError::Encode(path.to_path_buf(), err),
        ContainerError::Io(err) => RenameError::Save(path.to_path_buf(), err),
        ContainerError::Parse(err) => RenameError::Encode(path.to_path_buf(), err.into()),
    })?;

    match old_name {
        Some(old_name) => info!(
            "renamed '{}' to '{}' in {}",
            old_name,
            naming.full_name(),
            path.display()
        ),
        None => info!("renamed {} to '{}'", path.display(), naming.full_name()),
    }
    Ok(())
}

/// Rename each font in `paths` in turn.
///
/// With `BatchPolicy::Abort` processing stops at the first failure, which is the only entry in
/// the returned error. With `BatchPolicy::Continue` every path is attempted.
pub fn rename_fonts<P: AsRef<Path>>(paths: &[P], options: &RenameOptions) -> Result<(), BatchError> {
    if paths.is_empty() {
        return Err(BatchError {
            failures: vec![RenameError::NoInput],
        });
    }

    let mut failures = Vec::new();
    for path in paths {
        if let Err(err) = rename_font(path.as_ref(), options) {
            match options.on_error {
                BatchPolicy::Abort => {
                    return Err(BatchError {
                        failures: vec![err],
                    })
                }
                BatchPolicy::Continue => {
                    warn!("{}", err);
                    failures.push(err);
                }
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(BatchError { failures })
    }
}
