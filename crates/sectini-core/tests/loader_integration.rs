//! Integration tests for the sectini-core loader.
//!
//! These tests go through the public API only, with real files in a unique
//! temp directory, exercising the parser, the document, the typed accessors,
//! the append writer and the file-backed diagnostics sink together.

use std::fs;
use std::path::PathBuf;

use sectini_core::{parse_document, FileSink, IniLoader, MemorySink, NullSink};
use uuid::Uuid;

/// Creates a fresh directory for one test.
fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sectini_it_{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

const SP2: &str = "\
; connection settings
[connect]
log_server_ip=127.0.0.1
port=9000
;disabled=1
[connect]
log_server_ip=10.0.0.1

[render]
\twidth = 1920
height=1080
scale=0.75
vsync=1
vsync=0
fullscreen=true
";

#[test]
fn test_end_to_end_file_with_diagnostics_log() {
    // Arrange
    let dir = scratch_dir();
    let source = dir.join("sp2.ini");
    fs::write(&source, SP2).unwrap();
    let log_dir = dir.join("log");

    // Act
    let mut loader = IniLoader::open(&source, FileSink::for_source(&source, &log_dir))
        .expect("open must succeed");
    loader.select_section("connect");

    // Assert: first-wins values
    assert_eq!(loader.load_string("log_server_ip", ""), "127.0.0.1");
    assert_eq!(loader.load_int("port", 0), 9000);
    assert_eq!(loader.raw("disabled"), None);

    loader.select_section("render");
    assert_eq!(loader.load_int("width", 0), 1920);
    assert_eq!(loader.load_float("scale", 1.0), 0.75);
    assert!(loader.load_bool("vsync", false));
    assert!(!loader.load_bool("fullscreen", true));

    // Assert: the log file holds exactly this pass
    let log = fs::read_to_string(log_dir.join("sp2.ini.log")).expect("log file written");
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 4, "unexpected log: {log}");
    assert!(lines[0].starts_with("load start: "));
    assert_eq!(lines[1], "duplicate section found: connect");
    assert_eq!(lines[2], "duplicate key found: render - vsync");
    assert!(lines[3].starts_with("load complete: "));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_reload_truncates_diagnostics_log() {
    // Arrange
    let dir = scratch_dir();
    let source = dir.join("app.ini");
    fs::write(&source, "[a]\nx=1\nx=2\n").unwrap();
    let sink = FileSink::for_source(&source, &dir);
    let log_path = sink.path().to_path_buf();
    let mut loader = IniLoader::open(&source, sink).unwrap();
    let first = fs::read_to_string(&log_path).unwrap();

    // Act: fix the file and reload
    fs::write(&source, "[a]\nx=1\n").unwrap();
    loader.reload().unwrap();
    let second = fs::read_to_string(&log_path).unwrap();

    // Assert
    assert!(first.contains("duplicate key found: a - x"));
    assert!(!second.contains("duplicate"));
    assert_eq!(second.lines().count(), 2);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_append_then_reload_round_trip() {
    // Arrange
    let dir = scratch_dir();
    let source = dir.join("app.ini");
    fs::write(&source, "[connect]\nport=9000\n").unwrap();
    let mut loader = IniLoader::open(&source, NullSink).unwrap();
    loader.select_section("connect");

    // Act
    loader.write_value("newkey", "5").unwrap();
    let before_reload = loader.load_int("newkey", -1);
    loader.reload().unwrap();
    let after_reload = loader.load_int("newkey", -1);

    // Assert
    assert_eq!(before_reload, -1);
    assert_eq!(after_reload, 5);
    assert_eq!(
        fs::read_to_string(&source).unwrap(),
        "[connect]\nport=9000\nnewkey=5\n"
    );

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_appending_existing_key_is_reported_as_duplicate_on_reload() {
    let dir = scratch_dir();
    let source = dir.join("app.ini");
    fs::write(&source, "[connect]\nport=9000\n").unwrap();
    let mut loader = IniLoader::open(&source, MemorySink::new()).unwrap();
    loader.select_section("connect");

    loader.write_value("port", "1").unwrap();
    loader.reload().unwrap();

    assert_eq!(loader.load_int("port", 0), 9000);
    assert!(loader
        .sink()
        .lines()
        .iter()
        .any(|l| l == "duplicate key found: connect - port"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_source_then_created_and_reloaded() {
    let dir = scratch_dir();
    let source = dir.join("later.ini");
    let mut loader = IniLoader::open(&source, MemorySink::new()).unwrap();
    assert!(loader.document().is_empty());
    assert_eq!(loader.sink().lines().len(), 1);

    fs::write(&source, "[a]\nx=1\n").unwrap();
    loader.reload().unwrap();

    assert_eq!(loader.document().get("a", "x"), Some("1"));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_directory_as_source_is_a_read_error() {
    let dir = scratch_dir();
    let result = IniLoader::open(&dir, NullSink);
    assert!(result.is_err());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_parse_is_deterministic_for_same_bytes() {
    let a = parse_document(SP2, &mut NullSink);
    let b = parse_document(SP2, &mut NullSink);
    assert_eq!(a, b);
    assert_eq!(
        a.section_names().collect::<Vec<_>>(),
        vec!["connect", "render"]
    );
}
