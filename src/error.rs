//! Error types

use crate::binary::read::ReadEof;
use crate::tag::DisplayTag;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that originate when parsing binary data
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ParseError {
    BadEof,
    BadValue,
    BadVersion,
    BadOffset,
    BadIndex,
    MissingTable(u32),
    NotImplemented,
}

impl From<ReadEof> for ParseError {
    fn from(_error: ReadEof) -> Self {
        ParseError::BadEof
    }
}

impl From<std::num::TryFromIntError> for ParseError {
    fn from(_error: std::num::TryFromIntError) -> Self {
        ParseError::BadValue
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BadEof => write!(f, "end of data reached unexpectedly"),
            ParseError::BadValue => write!(f, "invalid value"),
            ParseError::BadVersion => write!(f, "unexpected data version"),
            ParseError::BadOffset => write!(f, "invalid data offset"),
            ParseError::BadIndex => write!(f, "invalid data index"),
            ParseError::MissingTable(tag) => {
                write!(f, "font is missing '{}' table", DisplayTag(*tag))
            }
            ParseError::NotImplemented => write!(f, "feature not implemented"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors that originate when writing binary data
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum WriteError {
    BadValue,
    NotImplemented,
    PlaceholderMismatch,
}

impl From<std::num::TryFromIntError> for WriteError {
    fn from(_error: std::num::TryFromIntError) -> Self {
        WriteError::BadValue
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::BadValue => write!(f, "write: bad value"),
            WriteError::NotImplemented => write!(f, "writing in this format is not implemented"),
            WriteError::PlaceholderMismatch => {
                write!(f, "data written to placeholder did not match expected size")
            }
        }
    }
}

impl std::error::Error for WriteError {}

/// Enum that can hold read (`ParseError`) and write errors
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ReadWriteError {
    Read(ParseError),
    Write(WriteError),
}

impl From<ParseError> for ReadWriteError {
    fn from(error: ParseError) -> Self {
        ReadWriteError::Read(error)
    }
}

impl From<WriteError> for ReadWriteError {
    fn from(error: WriteError) -> Self {
        ReadWriteError::Write(error)
    }
}

impl fmt::Display for ReadWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadWriteError::Read(err) => write!(f, "read error: {}", err),
            ReadWriteError::Write(err) => write!(f, "write error: {}", err),
        }
    }
}

impl std::error::Error for ReadWriteError {}

/// Errors opening or saving a `FontContainer`
#[derive(Debug)]
pub enum ContainerError {
    Io(io::Error),
    /// The font data could not be parsed
    Parse(ParseError),
    /// The font could not be serialized
    Write(ReadWriteError),
}

impl From<io::Error> for ContainerError {
    fn from(error: io::Error) -> Self {
        ContainerError::Io(error)
    }
}

impl From<ParseError> for ContainerError {
    fn from(error: ParseError) -> Self {
        ContainerError::Parse(error)
    }
}

impl From<ReadWriteError> for ContainerError {
    fn from(error: ReadWriteError) -> Self {
        ContainerError::Write(error)
    }
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::Io(err) => write!(f, "I/O error: {}", err),
            ContainerError::Parse(err) => write!(f, "parse error: {}", err),
            ContainerError::Write(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ContainerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContainerError::Io(err) => Some(err),
            ContainerError::Parse(err) => Some(err),
            ContainerError::Write(err) => Some(err),
        }
    }
}

/// A font filename that cannot be split into family and variant
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MalformedFilename {
    /// The filename, without directory or extension
    pub basename: String,
    /// Number of leading words the family name was expected to have
    pub family_word_count: usize,
}

impl fmt::Display for MalformedFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' cannot be split into a {}-word family name and a variant, \
             make sure your font filenames are in the right format",
            self.basename, self.family_word_count
        )
    }
}

impl std::error::Error for MalformedFilename {}

/// Problems with a font path detected before the font is opened
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum PathError {
    NotFound,
    NotAFile,
    UnsupportedExtension,
    NotUtf8,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::NotFound => write!(f, "path does not exist"),
            PathError::NotAFile => write!(f, "path is not a regular file"),
            PathError::UnsupportedExtension => write!(f, "not a ttf or otf font file"),
            PathError::NotUtf8 => write!(f, "filename is not valid UTF-8"),
        }
    }
}

impl std::error::Error for PathError {}

/// Error returned when renaming a single font file
#[derive(Debug)]
pub enum RenameError {
    /// No font paths were supplied
    NoInput,
    Path(PathBuf, PathError),
    MalformedFilename(PathBuf, MalformedFilename),
    /// The font file could not be read
    Open(PathBuf, io::Error),
    /// The font data could not be parsed
    Parse(PathBuf, ParseError),
    /// The updated font could not be serialized
    Encode(PathBuf, ReadWriteError),
    /// The updated font could not be written back
    Save(PathBuf, io::Error),
}

impl RenameError {
    /// The font path this error relates to, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            RenameError::NoInput => None,
            RenameError::Path(path, _)
            | RenameError::MalformedFilename(path, _)
            | RenameError::Open(path, _)
            | RenameError::Parse(path, _)
            | RenameError::Encode(path, _)
            | RenameError::Save(path, _) => Some(path),
        }
    }
}

impl fmt::Display for RenameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenameError::NoInput => write!(f, "no font files were supplied"),
            RenameError::Path(path, PathError::NotFound | PathError::NotAFile) => write!(
                f,
                "the path '{}' does not appear to be a valid file path",
                path.display()
            ),
            RenameError::Path(path, PathError::UnsupportedExtension) => write!(
                f,
                "make sure file '{}' is a ttf or otf font file",
                path.display()
            ),
            RenameError::Path(path, err) => write!(f, "'{}': {}", path.display(), err),
            RenameError::MalformedFilename(path, err) => {
                write!(f, "'{}': {}", path.display(), err)
            }
            RenameError::Open(path, err) => {
                write!(f, "unable to read '{}': {}", path.display(), err)
            }
            RenameError::Parse(path, err) => {
                write!(f, "unable to parse font '{}': {}", path.display(), err)
            }
            RenameError::Encode(path, err) => write!(
                f,
                "unable to write new name to OpenType tables for '{}': {}",
                path.display(),
                err
            ),
            RenameError::Save(path, err) if err.kind() == io::ErrorKind::PermissionDenied => {
                write!(
                    f,
                    "unable to write new name to OpenType tables for '{}', \
                     check the file permissions for the font file you are trying to rename",
                    path.display()
                )
            }
            RenameError::Save(path, err) => {
                write!(f, "unable to save '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for RenameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenameError::NoInput => None,
            RenameError::Path(_, err) => Some(err),
            RenameError::MalformedFilename(_, err) => Some(err),
            RenameError::Open(_, err) | RenameError::Save(_, err) => Some(err),
            RenameError::Parse(_, err) => Some(err),
            RenameError::Encode(_, err) => Some(err),
        }
    }
}

/// Every failure from a batch that was allowed to run to completion
#[derive(Debug)]
pub struct BatchError {
    pub failures: Vec<RenameError>,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} font(s) could not be renamed", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "\n  {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchError {}
