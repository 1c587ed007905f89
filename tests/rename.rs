mod common;

use std::fs;
use std::num::Wrapping;
use std::path::{Path, PathBuf};

use fontname::checksum::{self, FONT_CHECKSUM_MAGIC};
use fontname::container::FontContainer;
use fontname::error::{PathError, RenameError};
use fontname::naming::FAMILY_WORD_COUNT;
use fontname::rename::{self, BatchPolicy, RenameOptions};
use fontname::tables::name::owned::NameString;
use fontname::tables::name::NameId;
use fontname::tables::FontTableProvider;
use fontname::tag;
use tempfile::TempDir;

use crate::common::{head_table, name_table, sfnt, test_font};

fn write_font(dir: &TempDir, filename: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(filename);
    fs::write(&path, data).expect("unable to write test font");
    path
}

fn names(path: &Path, name_id: NameId) -> Vec<Option<String>> {
    let font = FontContainer::open(path).expect("unable to open renamed font");
    font.name_records()
        .iter()
        .filter(|record| record.name_id == name_id)
        .map(|record| record.text().map(String::from))
        .collect()
}

fn all(text: &str, count: usize) -> Vec<Option<String>> {
    vec![Some(text.to_string()); count]
}

#[test]
fn rename_single_word_family() {
    let dir = TempDir::new().unwrap();
    let path = write_font(&dir, "Roboto Mono Bold Italic.ttf", &test_font());

    rename::rename_font(&path, &RenameOptions::default()).unwrap();

    assert_eq!(names(&path, NameId::FAMILY), all("Roboto", 3));
    assert_eq!(names(&path, NameId::SUBFAMILY), all("Mono Bold Italic", 2));
    assert_eq!(
        names(&path, NameId::FULL_NAME),
        all("Roboto Mono Bold Italic", 2)
    );
    assert_eq!(
        names(&path, NameId::POSTSCRIPT_NAME),
        all("Roboto-MonoBoldItalic", 2)
    );
    assert_eq!(
        names(&path, NameId::VERSION),
        all("Version 1.000", 2),
        "other names should not change"
    );
}

#[test]
fn rename_two_word_family() {
    let dir = TempDir::new().unwrap();
    let path = write_font(&dir, "Source Sans Pro Bold.otf", &test_font());
    let options = RenameOptions {
        family_word_count: 2,
        ..RenameOptions::default()
    };

    rename::rename_font(&path, &options).unwrap();

    assert_eq!(names(&path, NameId::FAMILY), all("Source Sans", 3));
    assert_eq!(names(&path, NameId::SUBFAMILY), all("Pro Bold", 2));
    assert_eq!(
        names(&path, NameId::FULL_NAME),
        all("Source Sans Pro Bold", 2)
    );
    assert_eq!(
        names(&path, NameId::POSTSCRIPT_NAME),
        all("SourceSans-ProBold", 2)
    );
}

#[test]
fn rename_family_only() {
    let dir = TempDir::new().unwrap();
    let path = write_font(&dir, "Inter.ttf", &test_font());

    rename::rename_font(&path, &RenameOptions::default()).unwrap();

    assert_eq!(names(&path, NameId::FAMILY), all("Inter", 3));
    assert_eq!(names(&path, NameId::SUBFAMILY), all("", 2));
    assert_eq!(names(&path, NameId::FULL_NAME), all("Inter ", 2));
    assert_eq!(names(&path, NameId::POSTSCRIPT_NAME), all("Inter-", 2));
}

#[test]
fn renamed_font_is_valid() {
    let dir = TempDir::new().unwrap();
    let original = test_font();
    let path = write_font(&dir, "Roboto Mono Bold Italic.ttf", &original);

    rename::rename_font(&path, &RenameOptions::default()).unwrap();

    let data = fs::read(&path).unwrap();
    assert_eq!(
        checksum::table_checksum(&data).unwrap(),
        Wrapping(FONT_CHECKSUM_MAGIC)
    );

    let before = FontContainer::from_bytes(&original).unwrap();
    let after = FontContainer::from_bytes(&data).unwrap();
    for tag in [tag::MAXP, tag::POST, tag::OS_2] {
        assert_eq!(
            after.read_table_data(tag).unwrap(),
            before.read_table_data(tag).unwrap()
        );
    }
}

#[test]
fn rename_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = write_font(&dir, "Roboto Mono Bold Italic.ttf", &test_font());

    rename::rename_font(&path, &RenameOptions::default()).unwrap();
    let once = fs::read(&path).unwrap();
    rename::rename_font(&path, &RenameOptions::default()).unwrap();
    let twice = fs::read(&path).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn undecodable_records_are_preserved() {
    let dir = TempDir::new().unwrap();
    let mut name = name_table(&[
        (3, 1, 0x409, 1, "Sample"),
        (3, 1, 0x409, 6, "Sample-Regular"),
    ]);
    // Append a Windows Shift-JIS copyright record pointing at raw bytes
    name[3] = 3; // count
    name[5] += 12; // string offset
    let storage_len = (name.len() - 30) as u16;
    let record = [
        0, 3, 0, 2, 0x04, 0x11, 0, 0, 0, 2,
        (storage_len >> 8) as u8,
        storage_len as u8,
    ];
    let mut data = name[..30].to_vec();
    data.extend_from_slice(&record);
    data.extend_from_slice(&name[30..]);
    data.extend_from_slice(&[0x82, 0xA0]);

    let head = head_table();
    let font = sfnt(0x0001_0000, &[(b"head", &head[..]), (b"name", &data[..])]);
    let path = write_font(&dir, "Roboto Bold.ttf", &font);

    rename::rename_font(&path, &RenameOptions::default()).unwrap();

    let font = FontContainer::open(&path).unwrap();
    let copyright = font
        .name_records()
        .iter()
        .find(|record| record.name_id == NameId::COPYRIGHT)
        .unwrap();
    assert_eq!(copyright.string, NameString::Bytes(vec![0x82, 0xA0]));
    assert_eq!(names(&path, NameId::POSTSCRIPT_NAME), all("Roboto-Bold", 1));
}

#[test]
fn rename_windows_shift_jis_records() {
    let dir = TempDir::new().unwrap();
    let name = name_table(&[
        (3, 1, 0x409, 1, "Sample"),
        (3, 1, 0x409, 6, "Sample-Regular"),
        (3, 2, 0x411, 1, "サンプル"),
        (3, 2, 0x411, 4, "サンプル 標準"),
    ]);
    let head = head_table();
    let font = sfnt(0x0001_0000, &[(b"head", &head[..]), (b"name", &name[..])]);
    let path = write_font(&dir, "ノト Bold.ttf", &font);

    rename::rename_font(&path, &RenameOptions::default()).unwrap();

    let font = FontContainer::open(&path).unwrap();
    let shift_jis = font
        .name_records()
        .iter()
        .filter(|record| record.encoding_id == 2)
        .map(|record| record.string.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        shift_jis,
        vec![
            NameString::Bytes(vec![0x83, 0x6D, 0x83, 0x67]),
            NameString::Bytes(vec![0x83, 0x6D, 0x83, 0x67, b' ', b'B', b'o', b'l', b'd']),
        ]
    );
    assert_eq!(
        names(&path, NameId::FAMILY),
        vec![Some(String::from("ノト")), None]
    );
}

#[test]
fn unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let data = test_font();
    let path = write_font(&dir, "Roboto Bold.woff", &data);

    let err = rename::rename_font(&path, &RenameOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        RenameError::Path(_, PathError::UnsupportedExtension)
    ));
    assert_eq!(fs::read(&path).unwrap(), data, "file should not be modified");
}

#[test]
fn missing_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Roboto Bold.ttf");

    let err = rename::rename_font(&path, &RenameOptions::default()).unwrap_err();

    assert!(matches!(err, RenameError::Path(_, PathError::NotFound)));
    assert_eq!(err.path(), Some(&path));
    assert!(err.to_string().contains("does not appear to be a valid file path"));
}

#[test]
fn directory_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Roboto Bold.ttf");
    fs::create_dir(&path).unwrap();

    let err = rename::rename_font(&path, &RenameOptions::default()).unwrap_err();

    assert!(matches!(err, RenameError::Path(_, PathError::NotAFile)));
}

#[test]
fn malformed_filename() {
    let dir = TempDir::new().unwrap();
    let path = write_font(&dir, "Inter.ttf", &test_font());
    let options = RenameOptions {
        family_word_count: 2,
        ..RenameOptions::default()
    };

    let err = rename::rename_font(&path, &options).unwrap_err();

    match err {
        RenameError::MalformedFilename(_, err) => {
            assert_eq!(err.basename, "Inter");
            assert_eq!(err.family_word_count, 2);
        }
        _ => panic!("expected a malformed filename error, got {:?}", err),
    }
}

#[test]
fn not_a_font() {
    let dir = TempDir::new().unwrap();
    let path = write_font(&dir, "Roboto Bold.ttf", b"this is not a font");

    let err = rename::rename_font(&path, &RenameOptions::default()).unwrap_err();

    assert!(matches!(err, RenameError::Parse(..)));
}

#[test]
fn batch_aborts_on_first_error() {
    let dir = TempDir::new().unwrap();
    let first = write_font(&dir, "Roboto Bold.ttf", &test_font());
    let bad = dir.path().join("Missing Bold.ttf");
    let last = write_font(&dir, "Inter Thin.ttf", &test_font());

    let err = rename::rename_fonts(&[&first, &bad, &last], &RenameOptions::default()).unwrap_err();

    assert_eq!(err.failures.len(), 1);
    assert_eq!(err.failures[0].path(), Some(&bad));
    assert_eq!(names(&first, NameId::FAMILY), all("Roboto", 3));
    assert_eq!(
        names(&last, NameId::FAMILY),
        vec![
            Some(String::from("Sample")),
            Some(String::from("Sample")),
            Some(String::from("Échantillon")),
        ]
    );
}

#[test]
fn batch_continues_after_errors() {
    let dir = TempDir::new().unwrap();
    let bad_extension = write_font(&dir, "Roboto Bold.woff2", &test_font());
    let good = write_font(&dir, "Roboto Bold.ttf", &test_font());
    let missing = dir.path().join("Missing Bold.ttf");
    let options = RenameOptions {
        on_error: BatchPolicy::Continue,
        ..RenameOptions::default()
    };

    let err = rename::rename_fonts(&[&bad_extension, &good, &missing], &options).unwrap_err();

    assert_eq!(err.failures.len(), 2);
    assert_eq!(err.failures[0].path(), Some(&bad_extension));
    assert_eq!(err.failures[1].path(), Some(&missing));
    assert_eq!(names(&good, NameId::FAMILY), all("Roboto", 3));
}

#[test]
fn batch_success() {
    let dir = TempDir::new().unwrap();
    let paths = ["Roboto Bold.ttf", "Roboto Italic.otf"]
        .iter()
        .map(|filename| write_font(&dir, filename, &test_font()))
        .collect::<Vec<_>>();

    rename::rename_fonts(&paths, &RenameOptions::default()).unwrap();

    assert_eq!(names(&paths[1], NameId::SUBFAMILY), all("Italic", 2));
    assert_eq!(RenameOptions::default().family_word_count, FAMILY_WORD_COUNT);
}

#[cfg(unix)]
#[test]
fn read_only_font() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = write_font(&dir, "Roboto Bold.ttf", &test_font());
    fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();
    if fs::OpenOptions::new().write(true).open(&path).is_ok() {
        // Running with privileges that ignore file permissions
        return;
    }

    let err = rename::rename_font(&path, &RenameOptions::default()).unwrap_err();

    assert!(matches!(err, RenameError::Save(..)));
    assert!(err.to_string().contains("check the file permissions"));
}
