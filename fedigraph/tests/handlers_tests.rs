// Tests for instance-file loading and line parsing

use fedigraph::handlers::{load_instances_from_file, parse_instance_line};
use std::fs;

// ============================================================================
// Line parsing
// ============================================================================

#[test]
fn test_parse_bare_hostname() {
    assert_eq!(
        parse_instance_line("mastodon.example"),
        Some("mastodon.example".to_string())
    );
}

#[test]
fn test_parse_trims_whitespace() {
    assert_eq!(
        parse_instance_line("  mastodon.example  "),
        Some("mastodon.example".to_string())
    );
}

#[test]
fn test_parse_strips_https_scheme() {
    assert_eq!(
        parse_instance_line("https://mastodon.example"),
        Some("mastodon.example".to_string())
    );
}

#[test]
fn test_parse_strips_http_scheme() {
    assert_eq!(
        parse_instance_line("http://mastodon.example"),
        Some("mastodon.example".to_string())
    );
}

#[test]
fn test_parse_strips_trailing_path() {
    assert_eq!(
        parse_instance_line("https://mastodon.example/about"),
        Some("mastodon.example".to_string())
    );
}

#[test]
fn test_parse_keeps_port() {
    assert_eq!(
        parse_instance_line("mastodon.example:8443"),
        Some("mastodon.example:8443".to_string())
    );
}

#[test]
fn test_parse_skips_blank_lines() {
    assert_eq!(parse_instance_line(""), None);
    assert_eq!(parse_instance_line("   "), None);
}

#[test]
fn test_parse_skips_comments() {
    assert_eq!(parse_instance_line("# my favourite instances"), None);
}

#[test]
fn test_parse_rejects_garbage() {
    assert_eq!(parse_instance_line("not a hostname"), None);
}

// ============================================================================
// File loading
// ============================================================================

#[test]
fn test_load_instances_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("instances.txt");
    fs::write(
        &path,
        "# comment\n\
         mastodon.example\n\
         \n\
         https://other.example/about\n",
    )
    .unwrap();

    let instances = load_instances_from_file(&path).unwrap();

    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].name, "mastodon.example");
    assert_eq!(instances[0].users, 0);
    assert_eq!(instances[1].name, "other.example");
}

#[test]
fn test_load_skips_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("instances.txt");
    fs::write(
        &path,
        "mastodon.example\nhttps://mastodon.example\nother.example\n",
    )
    .unwrap();

    let instances = load_instances_from_file(&path).unwrap();

    assert_eq!(instances.len(), 2);
}

#[test]
fn test_load_empty_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("instances.txt");
    fs::write(&path, "# only comments\n\n").unwrap();

    assert!(load_instances_from_file(&path).is_err());
}

#[test]
fn test_load_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_instances_from_file(&dir.path().join("nope.txt")).unwrap_err();

    assert!(err.contains("Failed to read"));
}
