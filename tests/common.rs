/// A name record: platform, encoding, language, name ID and string.
///
/// Macintosh (platform 1) strings are written as single bytes and must be ASCII, Windows
/// Shift-JIS (platform 3, encoding 2) strings as Shift-JIS, and all others as UTF-16BE.
pub type TestRecord<'a> = (u16, u16, u16, u16, &'a str);

/// Records for a typical font with a Macintosh Roman and a Windows Unicode copy of each name.
pub const TEST_FONT_RECORDS: &[TestRecord<'static>] = &[
    (1, 0, 0, 0, "Copyright 2020 Example Foundry"),
    (1, 0, 0, 1, "Sample"),
    (1, 0, 0, 2, "Regular"),
    (1, 0, 0, 3, "1.000;EXMP;Sample-Regular"),
    (1, 0, 0, 4, "Sample Regular"),
    (1, 0, 0, 5, "Version 1.000"),
    (1, 0, 0, 6, "Sample-Regular"),
    (3, 1, 0x409, 0, "Copyright 2020 Example Foundry"),
    (3, 1, 0x409, 1, "Sample"),
    (3, 1, 0x409, 2, "Regular"),
    (3, 1, 0x409, 3, "1.000;EXMP;Sample-Regular"),
    (3, 1, 0x409, 4, "Sample Regular"),
    (3, 1, 0x409, 5, "Version 1.000"),
    (3, 1, 0x409, 6, "Sample-Regular"),
    (3, 1, 0x40C, 1, "Échantillon"),
];

/// Build a format 0 `name` table holding `records` in order.
pub fn name_table(records: &[TestRecord<'_>]) -> Vec<u8> {
    let mut data = Vec::new();
    let mut storage = Vec::new();
    data.extend_from_slice(&0u16.to_be_bytes());
    data.extend_from_slice(&(records.len() as u16).to_be_bytes());
    data.extend_from_slice(&(6 + records.len() as u16 * 12).to_be_bytes());
    for &(platform_id, encoding_id, language_id, name_id, string) in records {
        let bytes: Vec<u8> = match (platform_id, encoding_id) {
            (1, _) => {
                assert!(string.is_ascii(), "Macintosh test strings must be ASCII");
                string.bytes().collect()
            }
            (3, 2) => encoding_rs::SHIFT_JIS.encode(string).0.into_owned(),
            _ => string.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        };
        for value in [
            platform_id,
            encoding_id,
            language_id,
            name_id,
            bytes.len() as u16,
            storage.len() as u16,
        ] {
            data.extend_from_slice(&value.to_be_bytes());
        }
        storage.extend_from_slice(&bytes);
    }
    data.extend_from_slice(&storage);
    data
}

/// A 54 byte version 1.0 `head` table with `checkSumAdjustment` set to zero.
pub fn head_table() -> Vec<u8> {
    let mut data = Vec::with_capacity(54);
    data.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
    data.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // fontRevision
    data.extend_from_slice(&0u32.to_be_bytes()); // checkSumAdjustment
    data.extend_from_slice(&0x5F0F_3CF5u32.to_be_bytes()); // magicNumber
    data.extend_from_slice(&0x000Bu16.to_be_bytes()); // flags
    data.extend_from_slice(&1000u16.to_be_bytes()); // unitsPerEm
    data.extend_from_slice(&3_600_000_000i64.to_be_bytes()); // created
    data.extend_from_slice(&3_700_000_000i64.to_be_bytes()); // modified
    for value in [-50i16, -200, 950, 800] {
        data.extend_from_slice(&value.to_be_bytes()); // xMin, yMin, xMax, yMax
    }
    data.extend_from_slice(&0u16.to_be_bytes()); // macStyle
    data.extend_from_slice(&8u16.to_be_bytes()); // lowestRecPPEM
    data.extend_from_slice(&2i16.to_be_bytes()); // fontDirectionHint
    data.extend_from_slice(&0i16.to_be_bytes()); // indexToLocFormat
    data.extend_from_slice(&0i16.to_be_bytes()); // glyphDataFormat
    data
}

/// Assemble an sfnt with the supplied tables, in the order given.
///
/// Table checksums are left as zero.
pub fn sfnt(sfnt_version: u32, tables: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let entry_selector = 15u16.saturating_sub(num_tables.leading_zeros() as u16);
    let search_range = (1u16 << entry_selector) * 16;

    let mut data = Vec::new();
    data.extend_from_slice(&sfnt_version.to_be_bytes());
    for value in [
        num_tables,
        search_range,
        entry_selector,
        num_tables * 16 - search_range,
    ] {
        data.extend_from_slice(&value.to_be_bytes());
    }

    let mut offset = 12 + tables.len() * 16;
    for (tag, table) in tables {
        data.extend_from_slice(&tag[..]);
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&(offset as u32).to_be_bytes());
        data.extend_from_slice(&(table.len() as u32).to_be_bytes());
        offset += (table.len() + 3) & !3;
    }
    for (_, table) in tables {
        data.extend_from_slice(table);
        data.resize((data.len() + 3) & !3, 0);
    }
    data
}

/// A small TrueType font with `head`, `name` and a few opaque tables.
///
/// The table directory is deliberately not sorted by tag, and `post` has a length that is not a
/// multiple of four.
pub fn test_font() -> Vec<u8> {
    let name = name_table(TEST_FONT_RECORDS);
    let head = head_table();
    let maxp: &[u8] = &[0x00, 0x00, 0x50, 0x00, 0x00, 0x02];
    let post: &[u8] = &[0x00, 0x03, 0x00, 0x00, 0xFF, 0xFE, 0x7F];
    let os2: &[u8] = &[0x00, 0x04, 0x01, 0xF4];
    sfnt(
        0x0001_0000,
        &[
            (b"name", &name[..]),
            (b"maxp", maxp),
            (b"head", &head[..]),
            (b"post", post),
            (b"OS/2", os2),
        ],
    )
}
