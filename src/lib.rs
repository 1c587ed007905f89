#![warn(rust_2018_idioms)]

//! Rename the name table of OpenType and TrueType fonts to match their filenames.
//!
//! A font named `Roboto Mono Bold Italic.ttf` has its family, subfamily, full, and PostScript
//! name records rewritten from the words of its filename and is saved back in place. Every
//! other table in the font is preserved byte for byte.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use fontname::rename::{self, RenameOptions};
//!
//! let options = RenameOptions::default();
//! rename::rename_font(Path::new("Roboto Mono Bold Italic.ttf"), &options)?;
//! # Ok::<(), fontname::error::RenameError>(())
//! ```

/// Reading and writing of binary data.
pub mod binary;
/// Checksum calculation routines.
pub mod checksum;
pub mod container;
pub mod error;
pub mod naming;
pub mod rename;
pub mod tables;
pub mod tag;
