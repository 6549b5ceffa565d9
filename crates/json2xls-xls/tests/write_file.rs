//! File-level behaviour of XlsWriter: atomic replacement, file modes and failure cleanup.

use std::fs;

use json2xls_core::Workbook;
use json2xls_xls::{XlsReader, XlsWriteOptions, XlsWriter, MAX_CELL_CHARS};

fn one_cell(text: &str) -> Workbook {
    let mut wb = Workbook::new();
    wb.worksheet_mut(0).unwrap().set_text_at(0, 0, text).unwrap();
    wb
}

fn dir_entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_write_file_creates_readable_xls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xls");

    XlsWriter::write_file(&one_cell("hello"), &path).unwrap();

    let wb = XlsReader::read_file(&path).unwrap();
    assert_eq!(wb.worksheet(0).unwrap().text_at(0, 0), "hello");
    // No temporary files left behind
    assert_eq!(dir_entries(dir.path()), vec!["out.xls"]);
}

#[test]
fn test_write_file_replaces_existing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xls");
    fs::write(&path, b"old contents").unwrap();

    XlsWriter::write_file(&one_cell("new"), &path).unwrap();

    let wb = XlsReader::read_file(&path).unwrap();
    assert_eq!(wb.worksheet(0).unwrap().text_at(0, 0), "new");
}

#[test]
fn test_failed_write_leaves_destination_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xls");
    fs::write(&path, b"previous").unwrap();

    let too_long = "z".repeat(MAX_CELL_CHARS + 1);
    assert!(XlsWriter::write_file(&one_cell(&too_long), &path).is_err());

    assert_eq!(fs::read(&path).unwrap(), b"previous");
    assert_eq!(dir_entries(dir.path()), vec!["out.xls"]);
}

#[test]
fn test_missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.xls");

    let err = XlsWriter::write_file(&one_cell("x"), &path).unwrap_err();
    assert!(matches!(err, json2xls_xls::XlsError::Io(_)));
    assert!(!path.exists());
}

#[test]
fn test_non_atomic_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("direct.xls");
    let options = XlsWriteOptions {
        atomic: false,
        ..Default::default()
    };

    XlsWriter::write_file_with_options(&one_cell("direct"), &path, &options).unwrap();
    let wb = XlsReader::read_file(&path).unwrap();
    assert_eq!(wb.worksheet(0).unwrap().text_at(0, 0), "direct");
}

#[test]
fn test_write_to_vec() {
    let mut buf = Vec::new();
    XlsWriter::write(&one_cell("buffered"), &mut buf, &XlsWriteOptions::default()).unwrap();
    let wb = XlsReader::read(std::io::Cursor::new(buf)).unwrap();
    assert_eq!(wb.worksheet(0).unwrap().text_at(0, 0), "buffered");
}

#[cfg(unix)]
mod permissions {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn mode(path: &std::path::Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn test_new_file_gets_default_create_mode() {
        let dir = tempfile::tempdir().unwrap();
        // A file created the plain way shows what the umask allows
        let plain = dir.path().join("plain");
        fs::write(&plain, b"").unwrap();

        let path = dir.path().join("out.xls");
        XlsWriter::write_file(&one_cell("mode"), &path).unwrap();

        assert_eq!(mode(&path), mode(&plain));
    }

    #[test]
    fn test_replaced_file_keeps_its_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xls");
        fs::write(&path, b"old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        XlsWriter::write_file(&one_cell("mode"), &path).unwrap();

        assert_eq!(mode(&path), 0o640);
        let wb = XlsReader::read_file(&path).unwrap();
        assert_eq!(wb.worksheet(0).unwrap().text_at(0, 0), "mode");
    }
}
