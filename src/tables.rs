//! OpenType font file structure: the offset table and its table records.

pub mod name;

use crate::binary::read::{ReadArray, ReadBinary, ReadCtxt, ReadFrom, ReadScope};
use crate::binary::write::{WriteBinary, WriteContext};
use crate::binary::U32Be;
use crate::error::{ParseError, WriteError};
use crate::tag;

use std::borrow::Cow;

/// Magic value identifying a CFF font (`OTTO`)
pub const CFF_MAGIC: u32 = tag::OTTO;

/// Magic number identifying TrueType 1.0
///
/// The version number 1.0 as a 16.16 fixed-point value, indicating TrueType glyph data.
pub const TTF_MAGIC: u32 = 0x00010000;

/// Magic value identifying a TrueType font collection `ttcf`
pub const TTCF_MAGIC: u32 = tag::TTCF;

/// `head.magicNumber`
pub const HEAD_MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// Byte offset of `checkSumAdjustment` within the `head` table.
pub const HEAD_CHECK_SUM_ADJUSTMENT_OFFSET: usize = 8;

/// Byte offset of `magicNumber` within the `head` table.
const HEAD_MAGIC_NUMBER_OFFSET: usize = 12;

pub trait FontTableProvider {
    /// Return data for the specified table if present
    fn table_data(&self, tag: u32) -> Result<Option<Cow<'_, [u8]>>, ParseError>;

    fn has_table(&self, tag: u32) -> bool;

    fn read_table_data(&self, tag: u32) -> Result<Cow<'_, [u8]>, ParseError> {
        self.table_data(tag)?.ok_or(ParseError::MissingTable(tag))
    }
}

pub struct OpenTypeFont<'a> {
    pub scope: ReadScope<'a>,
    pub data: OpenTypeData<'a>,
}

/// An OpenTypeFont containing a single font or a collection of fonts
///
/// Collections are only recognised, their member fonts are not read.
pub enum OpenTypeData<'a> {
    Single(OffsetTable<'a>),
    Collection,
}

/// OpenType Offset Table
///
/// <https://docs.microsoft.com/en-us/typography/opentype/spec/otff#organization-of-an-opentype-font>
#[derive(Clone)]
pub struct OffsetTable<'a> {
    pub sfnt_version: u32,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
    pub table_records: ReadArray<'a, TableRecord>,
}

pub struct OffsetTableFontProvider<'a> {
    scope: ReadScope<'a>,
    offset_table: OffsetTable<'a>,
}

/// An entry in the Offset Table
///
/// <https://docs.microsoft.com/en-us/typography/opentype/spec/otff#organization-of-an-opentype-font>
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TableRecord {
    pub table_tag: u32,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

impl<'a> OpenTypeFont<'a> {
    /// Obtain a table provider for a font that is not part of a collection.
    ///
    /// Collections are recognised but not supported; they return `ParseError::NotImplemented`.
    pub fn table_provider(&self) -> Result<OffsetTableFontProvider<'a>, ParseError> {
        match &self.data {
            OpenTypeData::Single(offset_table) => Ok(OffsetTableFontProvider {
                offset_table: offset_table.clone(),
                scope: self.scope,
            }),
            OpenTypeData::Collection => Err(ParseError::NotImplemented),
        }
    }
}

impl ReadBinary for OpenTypeFont<'_> {
    type HostType<'a> = OpenTypeFont<'a>;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<OpenTypeFont<'a>, ParseError> {
        let scope = ctxt.scope();
        let mut peek = ctxt.clone();
        let magic = peek.read_u32be()?;
        match magic {
            TTF_MAGIC | CFF_MAGIC => {
                let offset_table = ctxt.read::<OffsetTable<'_>>()?;
                let font = OpenTypeData::Single(offset_table);
                Ok(OpenTypeFont { scope, data: font })
            }
            TTCF_MAGIC => Ok(OpenTypeFont {
                scope,
                data: OpenTypeData::Collection,
            }),
            _ => Err(ParseError::BadVersion),
        }
    }
}

impl ReadBinary for OffsetTable<'_> {
    type HostType<'a> = OffsetTable<'a>;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<OffsetTable<'a>, ParseError> {
        let sfnt_version = ctxt.read_u32be()?;
        match sfnt_version {
            TTF_MAGIC | CFF_MAGIC => {
                let num_tables = ctxt.read_u16be()?;
                let search_range = ctxt.read_u16be()?;
                let entry_selector = ctxt.read_u16be()?;
                let range_shift = ctxt.read_u16be()?;
                let table_records = ctxt.read_array::<TableRecord>(usize::from(num_tables))?;
                Ok(OffsetTable {
                    sfnt_version,
                    search_range,
                    entry_selector,
                    range_shift,
                    table_records,
                })
            }
            _ => Err(ParseError::BadVersion),
        }
    }
}

impl<'a> OffsetTable<'a> {
    pub fn find_table_record(&self, tag: u32) -> Option<TableRecord> {
        self.table_records
            .iter()
            .find(|table_record| table_record.table_tag == tag)
    }

    pub fn read_table(
        &self,
        scope: &ReadScope<'a>,
        tag: u32,
    ) -> Result<Option<ReadScope<'a>>, ParseError> {
        match self.find_table_record(tag) {
            Some(table_record) => table_record.read_table(scope).map(Some),
            None => Ok(None),
        }
    }
}

impl<'a> OffsetTableFontProvider<'a> {
    pub fn sfnt_version(&self) -> u32 {
        self.offset_table.sfnt_version
    }

    /// Tags of the tables in this font, in table directory order.
    pub fn table_tags(&self) -> Vec<u32> {
        self.offset_table
            .table_records
            .iter()
            .map(|record| record.table_tag)
            .collect()
    }

    /// Borrow the data of the table with `tag` directly from the font file.
    pub fn table_scope(&self, tag: u32) -> Result<Option<ReadScope<'a>>, ParseError> {
        self.offset_table.read_table(&self.scope, tag)
    }
}

impl<'a> FontTableProvider for OffsetTableFontProvider<'a> {
    fn table_data(&self, tag: u32) -> Result<Option<Cow<'_, [u8]>>, ParseError> {
        self.table_scope(tag)
            .map(|scope| scope.map(|scope| Cow::Borrowed(scope.data())))
    }

    fn has_table(&self, tag: u32) -> bool {
        self.offset_table.find_table_record(tag).is_some()
    }
}

impl ReadFrom for TableRecord {
    type ReadType = ((U32Be, U32Be), (U32Be, U32Be));
    fn read_from(((table_tag, checksum), (offset, length)): ((u32, u32), (u32, u32))) -> Self {
        TableRecord {
            table_tag,
            checksum,
            offset,
            length,
        }
    }
}

impl WriteBinary<&Self> for TableRecord {
    type Output = ();

    fn write<C: WriteContext>(ctxt: &mut C, table: &TableRecord) -> Result<(), WriteError> {
        U32Be::write(ctxt, table.table_tag)?;
        U32Be::write(ctxt, table.checksum)?;
        U32Be::write(ctxt, table.offset)?;
        U32Be::write(ctxt, table.length)?;

        Ok(())
    }
}

impl TableRecord {
    pub const SIZE: usize = 16;

    pub fn read_table<'a>(&self, scope: &ReadScope<'a>) -> Result<ReadScope<'a>, ParseError> {
        let offset = usize::try_from(self.offset)?;
        let length = usize::try_from(self.length)?;
        scope.offset_length(offset, length)
    }
}

/// Check that `data` looks like a `head` table: long enough and with the expected magic number.
pub fn check_head_table(data: &[u8]) -> Result<(), ParseError> {
    let mut ctxt = ReadScope::new(data).ctxt();
    let major_version = ctxt.read_u16be()?;
    ctxt.check_version(major_version == 1)?;
    let magic_number = ReadScope::new(data)
        .offset(HEAD_MAGIC_NUMBER_OFFSET)
        .read::<U32Be>()?;
    ctxt.check(magic_number == HEAD_MAGIC_NUMBER)
}
