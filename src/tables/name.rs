//! `name` table parsing and writing.
//!
//! <https://docs.microsoft.com/en-us/typography/opentype/spec/name>
//!
//! The table is read into the borrowed `NameTable`, which mirrors the binary layout, and then
//! decoded into `owned::NameTable`, where every record carries its string so that it can be
//! edited and written back.

use std::fmt;

use encoding_rs::{Encoding, BIG5, EUC_KR, GBK, MACINTOSH, SHIFT_JIS, UTF_16BE, X_MAC_CYRILLIC};

use crate::binary::read::{ReadArray, ReadBinary, ReadCtxt, ReadFrom, ReadScope};
use crate::binary::write::{WriteBinary, WriteContext};
use crate::binary::U16Be;
use crate::error::{ParseError, WriteError};

/// Platform identifiers used by name records.
pub struct PlatformId;

impl PlatformId {
    pub const UNICODE: u16 = 0;
    pub const MACINTOSH: u16 = 1;
    pub const WINDOWS: u16 = 3;
}

/// The semantic role of a name record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameId(pub u16);

impl NameId {
    pub const COPYRIGHT: NameId = NameId(0);
    pub const FAMILY: NameId = NameId(1);
    pub const SUBFAMILY: NameId = NameId(2);
    pub const UNIQUE_ID: NameId = NameId(3);
    pub const FULL_NAME: NameId = NameId(4);
    pub const VERSION: NameId = NameId(5);
    pub const POSTSCRIPT_NAME: NameId = NameId(6);
    pub const TYPOGRAPHIC_FAMILY: NameId = NameId(16);
    pub const TYPOGRAPHIC_SUBFAMILY: NameId = NameId(17);
}

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            NameId::COPYRIGHT => write!(f, "copyright notice"),
            NameId::FAMILY => write!(f, "family name"),
            NameId::SUBFAMILY => write!(f, "subfamily name"),
            NameId::UNIQUE_ID => write!(f, "unique identifier"),
            NameId::FULL_NAME => write!(f, "full name"),
            NameId::VERSION => write!(f, "version string"),
            NameId::POSTSCRIPT_NAME => write!(f, "PostScript name"),
            NameId::TYPOGRAPHIC_FAMILY => write!(f, "typographic family name"),
            NameId::TYPOGRAPHIC_SUBFAMILY => write!(f, "typographic subfamily name"),
            NameId(id) => write!(f, "name {}", id),
        }
    }
}

/// `name` table, as laid out in the font file
pub struct NameTable<'a> {
    pub string_storage: ReadScope<'a>,
    pub name_records: ReadArray<'a, NameRecord>,
    pub opt_langtag_records: Option<ReadArray<'a, LangTagRecord>>,
}

/// Record within the `name` table
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub length: u16,
    pub offset: u16,
}

/// Language-tag record within the `name` table
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LangTagRecord {
    pub length: u16,
    pub offset: u16,
}

impl ReadBinary for NameTable<'_> {
    type HostType<'a> = NameTable<'a>;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<NameTable<'a>, ParseError> {
        let scope = ctxt.scope();

        let format = ctxt.read_u16be()?;
        ctxt.check_version(format <= 1)?;
        let count = usize::from(ctxt.read_u16be()?);
        let string_offset = usize::from(ctxt.read_u16be()?);
        let string_storage = scope.offset(string_offset);
        let name_records = ctxt.read_array::<NameRecord>(count)?;
        let opt_langtag_records = if format > 0 {
            let langtag_count = usize::from(ctxt.read_u16be()?);
            let langtag_records = ctxt.read_array::<LangTagRecord>(langtag_count)?;
            Some(langtag_records)
        } else {
            None
        };

        Ok(NameTable {
            string_storage,
            name_records,
            opt_langtag_records,
        })
    }
}

impl ReadFrom for NameRecord {
    type ReadType = ((U16Be, U16Be, U16Be), (U16Be, U16Be, U16Be));
    fn read_from(
        ((platform_id, encoding_id, language_id), (name_id, length, offset)): (
            (u16, u16, u16),
            (u16, u16, u16),
        ),
    ) -> Self {
        NameRecord {
            platform_id,
            encoding_id,
            language_id,
            name_id,
            length,
            offset,
        }
    }
}

impl WriteBinary for NameRecord {
    type Output = ();

    fn write<C: WriteContext>(ctxt: &mut C, record: NameRecord) -> Result<(), WriteError> {
        U16Be::write(ctxt, record.platform_id)?;
        U16Be::write(ctxt, record.encoding_id)?;
        U16Be::write(ctxt, record.language_id)?;
        U16Be::write(ctxt, record.name_id)?;
        U16Be::write(ctxt, record.length)?;
        U16Be::write(ctxt, record.offset)?;

        Ok(())
    }
}

impl ReadFrom for LangTagRecord {
    type ReadType = (U16Be, U16Be);
    fn read_from((length, offset): (u16, u16)) -> Self {
        LangTagRecord { length, offset }
    }
}

impl WriteBinary for LangTagRecord {
    type Output = ();

    fn write<C: WriteContext>(ctxt: &mut C, record: LangTagRecord) -> Result<(), WriteError> {
        U16Be::write(ctxt, record.length)?;
        U16Be::write(ctxt, record.offset)?;

        Ok(())
    }
}

impl<'a> NameTable<'a> {
    fn string_data(&self, length: u16, offset: u16) -> Result<&'a [u8], ParseError> {
        self.string_storage
            .offset_length(usize::from(offset), usize::from(length))
            .map(|scope| scope.data())
    }

    /// Decode every record into an editable `owned::NameTable`.
    pub fn to_owned(&self) -> Result<owned::NameTable, ParseError> {
        let name_records = self
            .name_records
            .iter()
            .map(|record| -> Result<owned::NameRecord, ParseError> {
                let data = self.string_data(record.length, record.offset)?;
                Ok(owned::NameRecord {
                    platform_id: record.platform_id,
                    encoding_id: record.encoding_id,
                    language_id: record.language_id,
                    name_id: NameId(record.name_id),
                    string: owned::NameString::decode(
                        record.platform_id,
                        record.encoding_id,
                        data,
                    ),
                })
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        let lang_tags = match &self.opt_langtag_records {
            Some(records) => Some(
                records
                    .iter()
                    .map(|record| {
                        self.string_data(record.length, record.offset)
                            .map(|data| data.to_vec())
                    })
                    .collect::<Result<Vec<_>, ParseError>>()?,
            ),
            None => None,
        };

        Ok(owned::NameTable {
            name_records,
            lang_tags,
        })
    }
}

/// Text encodings that name record strings can be stored in.
#[derive(Debug, Copy, Clone, PartialEq)]
enum NameEncoding {
    Utf16Be,
    AppleRoman,
    /// Legacy multi-byte and Macintosh script encodings. These are only ever encoded, records
    /// already in them are kept as bytes so that they cannot change unless rewritten.
    Legacy(&'static Encoding),
}

/// The encoding used for strings of records with the given platform and encoding ID.
///
/// Macintosh Roman records are always treated as Mac OS Roman, including those for Icelandic,
/// Turkish, Croatian and Romanian (language IDs 15, 17, 18 and 37) whose fonts may use the
/// regional Mac variants of the encoding. `encoding_rs` has no codecs for those variants, so
/// non-ASCII names written to such records follow the Mac OS Roman mapping. Windows Johab
/// (encoding 6) is likewise unsupported.
fn name_encoding(platform_id: u16, encoding_id: u16) -> Option<NameEncoding> {
    match (platform_id, encoding_id) {
        (PlatformId::UNICODE, _) => Some(NameEncoding::Utf16Be),
        // Windows; Symbol, Unicode BMP, Unicode full repertoire
        (PlatformId::WINDOWS, 0 | 1 | 10) => Some(NameEncoding::Utf16Be),
        // Windows; ShiftJIS, PRC, Big5, Wansung
        (PlatformId::WINDOWS, 2) => Some(NameEncoding::Legacy(SHIFT_JIS)),
        (PlatformId::WINDOWS, 3) => Some(NameEncoding::Legacy(GBK)),
        (PlatformId::WINDOWS, 4) => Some(NameEncoding::Legacy(BIG5)),
        (PlatformId::WINDOWS, 5) => Some(NameEncoding::Legacy(EUC_KR)),
        (PlatformId::MACINTOSH, 0) => Some(NameEncoding::AppleRoman),
        (PlatformId::MACINTOSH, 1) => Some(NameEncoding::Legacy(SHIFT_JIS)),
        (PlatformId::MACINTOSH, 2) => Some(NameEncoding::Legacy(BIG5)),
        (PlatformId::MACINTOSH, 3) => Some(NameEncoding::Legacy(EUC_KR)),
        (PlatformId::MACINTOSH, 7) => Some(NameEncoding::Legacy(X_MAC_CYRILLIC)),
        (PlatformId::MACINTOSH, 25) => Some(NameEncoding::Legacy(GBK)),
        _ => None,
    }
}

/// Preference for a record when several hold the same name, higher is better.
fn score_record(platform_id: u16, encoding_id: u16, language_id: u16) -> usize {
    match (platform_id, encoding_id, language_id) {
        // Windows; Unicode full repertoire
        (3, 10, _) => 1000,
        // Unicode; Unicode full repertoire
        (0, 6, 0) => 900,
        // Unicode; Unicode 2.0 and onwards semantics, Unicode full repertoire
        (0, 4, 0) => 800,
        // Windows; Unicode BMP, US English first
        (3, 1, 0x409) => 750,
        (3, 1, _) => 700,
        (0, _, _) => 500,
        // Windows, Symbol
        (3, 0, _) => 200,
        // Apple Roman, English first
        (1, 0, 0) => 150,
        (1, 0, _) => 100,
        _ => 0,
    }
}

pub mod owned {
    //! Editable `name` table.

    use std::borrow::Cow;

    use rustc_hash::FxHashMap;

    use super::{
        name_encoding, score_record, Encoding, LangTagRecord, NameEncoding, NameId, U16Be,
        WriteBinary, WriteContext, WriteError, MACINTOSH, UTF_16BE,
    };

    /// `name` table with decoded strings
    #[derive(Debug, Clone, PartialEq)]
    pub struct NameTable {
        pub name_records: Vec<NameRecord>,
        /// Language tag strings of a format 1 table, stored as UTF-16BE
        pub lang_tags: Option<Vec<Vec<u8>>>,
    }

    /// A single name string together with the platform, encoding and language it is for.
    #[derive(Debug, Clone, PartialEq)]
    pub struct NameRecord {
        pub platform_id: u16,
        pub encoding_id: u16,
        pub language_id: u16,
        pub name_id: NameId,
        pub string: NameString,
    }

    /// The payload of a name record.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum NameString {
        /// Text that is encoded for the record's platform when written
        Text(String),
        /// Raw bytes in an encoding that is not decoded, written back verbatim
        Bytes(Vec<u8>),
    }

    impl NameString {
        pub(super) fn decode(platform_id: u16, encoding_id: u16, data: &[u8]) -> NameString {
            let text = match name_encoding(platform_id, encoding_id) {
                Some(NameEncoding::Utf16Be) => UTF_16BE
                    .decode_without_bom_handling_and_without_replacement(data)
                    .map(Cow::into_owned),
                Some(NameEncoding::AppleRoman) => Some(
                    MACINTOSH
                        .decode_without_bom_handling(data)
                        .0
                        .into_owned(),
                ),
                Some(NameEncoding::Legacy(_)) | None => None,
            };
            match text {
                Some(text) => NameString::Text(text),
                None => NameString::Bytes(data.to_vec()),
            }
        }

        fn encode(&self, platform_id: u16, encoding_id: u16) -> Result<Cow<'_, [u8]>, WriteError> {
            let text = match self {
                NameString::Text(text) => text,
                NameString::Bytes(data) => return Ok(Cow::Borrowed(data)),
            };
            match name_encoding(platform_id, encoding_id) {
                Some(NameEncoding::Utf16Be) => Ok(Cow::Owned(
                    text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
                )),
                Some(NameEncoding::AppleRoman) => encode_legacy(MACINTOSH, text),
                Some(NameEncoding::Legacy(encoding)) => encode_legacy(encoding, text),
                None => Err(WriteError::NotImplemented),
            }
        }
    }

    /// Encode `text` with a non-Unicode encoding, failing if any character cannot be represented.
    fn encode_legacy(
        encoding: &'static Encoding,
        text: &str,
    ) -> Result<Cow<'static, [u8]>, WriteError> {
        let (data, _, had_errors) = encoding.encode(text);
        if had_errors {
            Err(WriteError::BadValue)
        } else {
            Ok(Cow::Owned(data.into_owned()))
        }
    }

    impl From<&str> for NameString {
        fn from(text: &str) -> Self {
            NameString::Text(text.to_owned())
        }
    }

    impl From<String> for NameString {
        fn from(text: String) -> Self {
            NameString::Text(text)
        }
    }

    impl NameRecord {
        /// The decoded string of this record, `None` if it is held as raw bytes.
        pub fn text(&self) -> Option<&str> {
            match &self.string {
                NameString::Text(text) => Some(text),
                NameString::Bytes(_) => None,
            }
        }
    }

    impl NameTable {
        /// Return the best decoded string for `name_id`, preferring Unicode records.
        pub fn string_for_id(&self, name_id: NameId) -> Option<&str> {
            self.name_records
                .iter()
                .filter(|record| record.name_id == name_id)
                .filter_map(|record| {
                    let score =
                        score_record(record.platform_id, record.encoding_id, record.language_id);
                    record.text().map(|text| (score, text))
                })
                // max_by_key returns the last maximum, reverse to keep the first
                .rev()
                .max_by_key(|(score, _)| *score)
                .map(|(_, text)| text)
        }
    }

    /// Accumulates string data, sharing storage between identical strings.
    #[derive(Default)]
    struct StringStorage {
        data: Vec<u8>,
        offsets: FxHashMap<Vec<u8>, u16>,
    }

    impl StringStorage {
        /// Add `string`, returning its (length, offset) within the storage area.
        fn add(&mut self, string: &[u8]) -> Result<(u16, u16), WriteError> {
            let length = u16::try_from(string.len())?;
            if let Some(&offset) = self.offsets.get(string) {
                return Ok((length, offset));
            }
            let offset = u16::try_from(self.data.len())?;
            self.data.extend_from_slice(string);
            self.offsets.insert(string.to_vec(), offset);
            Ok((length, offset))
        }
    }

    impl WriteBinary<&Self> for NameTable {
        type Output = ();

        fn write<C: WriteContext>(ctxt: &mut C, name: &NameTable) -> Result<(), WriteError> {
            let mut storage = StringStorage::default();
            let mut records = Vec::with_capacity(name.name_records.len());
            for record in &name.name_records {
                let data = record
                    .string
                    .encode(record.platform_id, record.encoding_id)?;
                let (length, offset) = storage.add(&data)?;
                records.push(super::NameRecord {
                    platform_id: record.platform_id,
                    encoding_id: record.encoding_id,
                    language_id: record.language_id,
                    name_id: record.name_id.0,
                    length,
                    offset,
                });
            }
            let lang_tag_records = match &name.lang_tags {
                Some(lang_tags) => Some(
                    lang_tags
                        .iter()
                        .map(|tag| {
                            storage
                                .add(tag)
                                .map(|(length, offset)| LangTagRecord { length, offset })
                        })
                        .collect::<Result<Vec<_>, WriteError>>()?,
                ),
                None => None,
            };

            let format = lang_tag_records.as_ref().map_or(0u16, |_| 1);
            U16Be::write(ctxt, format)?;
            U16Be::write(ctxt, u16::try_from(records.len())?)?; // count
            let string_offset = ctxt.placeholder::<U16Be, _>()?;
            ctxt.write_iter::<super::NameRecord, _>(records.into_iter())?;

            if let Some(lang_tag_records) = lang_tag_records {
                U16Be::write(ctxt, u16::try_from(lang_tag_records.len())?)?; // lang_tag_count
                ctxt.write_iter::<LangTagRecord, _>(lang_tag_records.into_iter())?;
            }

            let storage_offset = u16::try_from(ctxt.bytes_written())?;
            ctxt.write_placeholder(string_offset, storage_offset)?;
            ctxt.write_bytes(&storage.data)?;

            Ok(())
        }
    }
}
