//! A font file held in memory as a set of tables with an editable `name` table.
//!
//! Opening a font copies out every table; the `name` table is decoded so that its records can
//! be changed. Writing the font back produces a new table directory sorted by tag, 4-byte
//! aligned tables, fresh table checksums, and an updated `head.checkSumAdjustment`. All other
//! tables are written back exactly as they were read.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::num::Wrapping;
use std::path::Path;

use itertools::Itertools;
use log::{debug, warn};

use crate::binary::read::ReadScope;
use crate::binary::write::{Placeholder, WriteBinary, WriteBuffer, WriteContext};
use crate::binary::{long_align, U16Be, U32Be};
use crate::checksum;
use crate::error::{ContainerError, ParseError, ReadWriteError, WriteError};
use crate::tables::name::{self, owned::NameRecord, owned::NameTable};
use crate::tables::{
    self, FontTableProvider, OpenTypeFont, TableRecord, HEAD_CHECK_SUM_ADJUSTMENT_OFFSET,
};
use crate::tag::{self, DisplayTag};

/// An sfnt font whose `name` records can be edited.
#[derive(Debug, Clone)]
pub struct FontContainer {
    sfnt_version: u32,
    /// Every table except `name`, keyed by tag
    tables: BTreeMap<u32, Vec<u8>>,
    name: NameTable,
}

struct FontBuilder {
    sfnt_version: u32,
    tables: BTreeMap<u32, WriteBuffer>,
}

struct FontBuilderWithHead {
    inner: FontBuilder,
    check_sum_adjustment: Placeholder<U32Be, u32>,
}

struct TaggedBuffer {
    tag: u32,
    buffer: WriteBuffer,
}

struct OrderedTables {
    tables: Vec<TaggedBuffer>,
    checksum: Wrapping<u32>,
}

impl FontContainer {
    /// Read and parse the font at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ContainerError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        debug!("read {} bytes from '{}'", data.len(), path.display());
        let font = FontContainer::from_bytes(&data)?;
        Ok(font)
    }

    /// Parse a font from `data`.
    ///
    /// The font must be a single TrueType or CFF flavoured sfnt with `head` and `name` tables.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ParseError> {
        let fontfile = ReadScope::new(data).read::<OpenTypeFont<'_>>()?;
        let provider = fontfile.table_provider()?;

        let name_data = provider.read_table_data(tag::NAME)?;
        let name = ReadScope::new(&name_data)
            .read::<name::NameTable<'_>>()?
            .to_owned()?;
        tables::check_head_table(&provider.read_table_data(tag::HEAD)?)?;

        let mut tables = BTreeMap::new();
        for tag in provider.table_tags() {
            if tag == tag::NAME {
                continue;
            }
            if tables.contains_key(&tag) {
                warn!("duplicate '{}' table, keeping the first", DisplayTag(tag));
                continue;
            }
            if let Some(scope) = provider.table_scope(tag)? {
                tables.insert(tag, scope.data().to_vec());
            }
        }
        debug!(
            "parsed font with {} tables and {} name records",
            tables.len() + 1,
            name.name_records.len()
        );

        Ok(FontContainer {
            sfnt_version: provider.sfnt_version(),
            tables,
            name,
        })
    }

    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    pub fn name_table(&self) -> &NameTable {
        &self.name
    }

    pub fn name_records(&self) -> &[NameRecord] {
        &self.name.name_records
    }

    /// Mutable access to the name records. Changes are written out by `to_bytes` and `save`.
    pub fn name_records_mut(&mut self) -> &mut [NameRecord] {
        &mut self.name.name_records
    }

    /// Serialize the font.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReadWriteError> {
        if self.tables.contains_key(&tag::DSIG) {
            warn!("font has a DSIG table, its digital signature will no longer be valid");
        }

        let mut builder = FontBuilder::new(self.sfnt_version);
        for (&tag, data) in &self.tables {
            if tag != tag::HEAD {
                builder.add_table::<_, ReadScope<'_>>(tag, ReadScope::new(data))?;
            }
        }
        builder.add_table::<_, NameTable>(tag::NAME, &self.name)?;

        let head = self
            .tables
            .get(&tag::HEAD)
            .ok_or(ParseError::MissingTable(tag::HEAD))?;
        let builder = builder.add_head_table(head)?;
        builder.data()
    }

    /// Serialize the font and write it to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ContainerError> {
        let path = path.as_ref();
        let data = self.to_bytes()?;
        fs::write(path, &data)?;
        debug!("wrote {} bytes to '{}'", data.len(), path.display());
        Ok(())
    }
}

impl FontTableProvider for FontContainer {
    fn table_data(&self, tag: u32) -> Result<Option<Cow<'_, [u8]>>, ParseError> {
        if tag == tag::NAME {
            let mut buffer = WriteBuffer::new();
            NameTable::write(&mut buffer, &self.name).map_err(|_| ParseError::BadValue)?;
            return Ok(Some(Cow::Owned(buffer.into_inner())));
        }
        Ok(self.tables.get(&tag).map(|data| Cow::Borrowed(data.as_slice())))
    }

    fn has_table(&self, tag: u32) -> bool {
        tag == tag::NAME || self.tables.contains_key(&tag)
    }
}

impl FontBuilder {
    pub fn new(sfnt_version: u32) -> Self {
        FontBuilder {
            sfnt_version,
            tables: BTreeMap::new(),
        }
    }

    pub fn add_table<HostType, T: WriteBinary<HostType>>(
        &mut self,
        tag: u32,
        table: HostType,
    ) -> Result<T::Output, ReadWriteError> {
        debug_assert_ne!(tag, tag::HEAD, "head table must use add_head_table");

        let mut buffer = WriteBuffer::new();
        let output = T::write(&mut buffer, table)?;
        self.tables.insert(tag, buffer);

        Ok(output)
    }

    /// Add the `head` table with its `checkSumAdjustment` left to be filled in by `data`.
    pub fn add_head_table(mut self, head: &[u8]) -> Result<FontBuilderWithHead, ReadWriteError> {
        let before = head
            .get(..HEAD_CHECK_SUM_ADJUSTMENT_OFFSET)
            .ok_or(ParseError::BadEof)?;
        let after = head
            .get(HEAD_CHECK_SUM_ADJUSTMENT_OFFSET + 4..)
            .ok_or(ParseError::BadEof)?;

        let mut buffer = WriteBuffer::new();
        buffer.write_bytes(before)?;
        let placeholder = buffer.placeholder::<U32Be, _>()?;
        buffer.write_bytes(after)?;
        self.tables.insert(tag::HEAD, buffer);

        Ok(FontBuilderWithHead {
            inner: self,
            check_sum_adjustment: placeholder,
        })
    }
}

impl FontBuilderWithHead {
    /// Returns a `Vec<u8>` containing the built font
    pub fn data(mut self) -> Result<Vec<u8>, ReadWriteError> {
        let mut font = WriteBuffer::new();

        self.write_offset_table(&mut font)?;
        let table_offset =
            long_align(self.inner.tables.len() * TableRecord::SIZE + font.bytes_written());

        // Add tables in desired order
        let mut ordered_tables = self.write_table_directory(&mut font)?;

        // pad
        let length = font.bytes_written();
        let padded_length = long_align(length);
        debug_assert_eq!(
            padded_length, table_offset,
            "offset after writing table directory is not at expected position"
        );
        font.write_zeros(padded_length - length)?;

        let headers_checksum = checksum::table_checksum(font.bytes())?;
        let adjustment =
            checksum::check_sum_adjustment(headers_checksum + ordered_tables.checksum);

        // Write out the font tables
        let mut placeholder = Some(self.check_sum_adjustment);
        for TaggedBuffer { tag, buffer } in ordered_tables.tables.iter_mut() {
            if *tag == tag::HEAD {
                if let Some(placeholder) = placeholder.take() {
                    buffer.write_placeholder(placeholder, adjustment)?;
                }
            }
            font.write_bytes(buffer.bytes())?;
        }

        Ok(font.into_inner())
    }

    fn write_offset_table(&self, font: &mut WriteBuffer) -> Result<(), WriteError> {
        let num_tables = u16::try_from(self.inner.tables.len())?;
        let n = max_power_of_2(num_tables);
        let search_range = (1 << n) * 16;
        let entry_selector = n;
        let range_shift = num_tables * 16 - search_range;

        U32Be::write(font, self.inner.sfnt_version)?;
        U16Be::write(font, num_tables)?;
        U16Be::write(font, search_range)?;
        U16Be::write(font, entry_selector)?;
        U16Be::write(font, range_shift)?;

        Ok(())
    }

    fn write_table_directory(
        &mut self,
        font: &mut WriteBuffer,
    ) -> Result<OrderedTables, ReadWriteError> {
        let mut tables = Vec::with_capacity(self.inner.tables.len());
        let mut checksum = Wrapping(0);
        let mut table_offset =
            long_align(self.inner.tables.len() * TableRecord::SIZE + font.bytes_written());

        let tags = self.inner.tables.keys().cloned().collect_vec();
        for tag in tags {
            if let Some(mut table) = self.inner.tables.remove(&tag) {
                let length = table.len();
                let padded_length = long_align(length);
                table.write_zeros(padded_length - length)?;

                let table_checksum = checksum::table_checksum(table.bytes())?;
                checksum += table_checksum;

                let record = TableRecord {
                    table_tag: tag,
                    checksum: table_checksum.0,
                    offset: u32::try_from(table_offset).map_err(WriteError::from)?,
                    length: u32::try_from(length).map_err(WriteError::from)?,
                };

                table_offset += padded_length;
                TableRecord::write(font, &record)?;
                tables.push(TaggedBuffer { tag, buffer: table });
            }
        }

        Ok(OrderedTables { tables, checksum })
    }
}

/// Calculate the maximum power of 2 that is <= num
fn max_power_of_2(num: u16) -> u16 {
    15u16.saturating_sub(num.leading_zeros() as u16)
}
