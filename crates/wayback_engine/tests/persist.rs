use std::fs;

use tempfile::TempDir;
use wayback_engine::{ensure_output_dir, AtomicFileWriter};

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("media");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_bytes() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write_bytes("IMG.jpg", &[0xFF, 0xD8, 0xFF, 0x01]).unwrap();
    assert_eq!(first.file_name().unwrap(), "IMG.jpg");
    assert_eq!(fs::read(&first).unwrap(), vec![0xFF, 0xD8, 0xFF, 0x01]);

    // Replace existing
    let second = writer.write_bytes("IMG.jpg", &[0xFF, 0xD8, 0xFF, 0x02]).unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), vec![0xFF, 0xD8, 0xFF, 0x02]);
}

#[test]
fn text_write_goes_through_the_same_path() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    let path = writer.write("report.txt", "summary\n").unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), "summary\n");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write_bytes("IMG.jpg", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("IMG.jpg").exists());
}
