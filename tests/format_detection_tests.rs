use forage_data::format_detection::parse_delimiter_override;
use forage_data::{resolve_delimiter, sniff_delimiter, DelimiterError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a fixture file inside a scratch directory
fn create_temp_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path
}

#[test]
fn test_detect_comma_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_temp_file(
        &dir,
        "meta.csv",
        b"taxonKey,scientificName,commonName\n5362054,Urtica dioica,Stinging nettle\n",
    );

    assert_eq!(sniff_delimiter(&path).unwrap(), b',');
}

#[test]
fn test_detect_tab_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_temp_file(
        &dir,
        "occurrence.txt",
        b"gbifID\ttaxonKey\tspecies\n1\t5362054\tUrtica dioica\n",
    );

    assert_eq!(sniff_delimiter(&path).unwrap(), b'\t');
}

#[test]
fn test_tab_file_with_commas_in_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_temp_file(
        &dir,
        "occurrence.tsv",
        b"gbifID\tlocality\ttaxonKey\n1\tPeoria, IL\t5362054\n2\tPekin, IL\t5362054\n",
    );

    assert_eq!(sniff_delimiter(&path).unwrap(), b'\t');
}

#[test]
fn test_comma_wins_ties_and_empty_files() {
    let dir = tempfile::tempdir().unwrap();
    let tie = create_temp_file(&dir, "tie.csv", b"a\tb,c\n");
    let empty = create_temp_file(&dir, "empty.csv", b"");

    assert_eq!(sniff_delimiter(&tie).unwrap(), b',');
    assert_eq!(sniff_delimiter(&empty).unwrap(), b',');
}

#[test]
fn test_sample_is_limited_to_file_head() {
    let dir = tempfile::tempdir().unwrap();
    let mut content = b"name,notes\n".to_vec();
    content.extend(std::iter::repeat(b'x').take(8192));
    content.extend(std::iter::repeat(b'\t').take(64));
    let path = create_temp_file(&dir, "long.csv", &content);

    assert_eq!(sniff_delimiter(&path).unwrap(), b',');
}

#[test]
fn test_invalid_utf8_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_temp_file(&dir, "latin1.tsv", b"name\tnote\n\xe9t\xe9\tcaf\xe9\n");

    assert_eq!(sniff_delimiter(&path).unwrap(), b'\t');
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(sniff_delimiter(&dir.path().join("nope.csv")).is_err());
}

#[test]
fn test_override_always_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_temp_file(&dir, "comma.csv", b"a,b,c\n1,2,3\n");

    assert_eq!(resolve_delimiter(&path, Some("\\t")).unwrap(), b'\t');
    assert_eq!(resolve_delimiter(&path, Some(";")).unwrap(), b';');
    assert_eq!(resolve_delimiter(&path, Some("")).unwrap(), b',');
    assert_eq!(resolve_delimiter(&path, None).unwrap(), b',');
}

#[test]
fn test_override_does_not_need_readable_file() {
    assert_eq!(
        resolve_delimiter(Path::new("does/not/exist.tsv"), Some("\\t")).unwrap(),
        b'\t'
    );
}

#[test]
fn test_bad_override_is_rejected() {
    assert_eq!(
        parse_delimiter_override(Some("tab")),
        Err(DelimiterError::NotSingleByte("tab".to_string()))
    );

    let dir = tempfile::tempdir().unwrap();
    let path = create_temp_file(&dir, "comma.csv", b"a,b\n");
    let err = resolve_delimiter(&path, Some("||")).unwrap_err();
    assert!(err.downcast_ref::<DelimiterError>().is_some());
    fs::remove_file(&path).unwrap();
}
