//! Tests for the whole-document entry points.

use std::fs;

use larch_html::{
    LoadError, ParseError, ParseOptions, load_document, load_document_with_options,
    parse_html_string, parse_html_with_options, write_tree,
};

#[test]
fn test_parse_html_string_bundles_everything() {
    let doc = parse_html_string("<ul><li>A</li></oops><li>B</li></ul>").unwrap();

    assert_eq!(doc.tokens.len(), 7);
    assert_eq!(doc.dom.registry().len(), 2);
    assert_eq!(doc.parse_issues, vec!["unmatched closing tag </oops> ignored"]);
    assert!(doc.source_path.as_os_str().is_empty());
}

#[test]
fn test_parse_with_options_strict() {
    let options = ParseOptions {
        strict: true,
        ..ParseOptions::default()
    };
    let err = parse_html_with_options("<ul></li></ul>", options).unwrap_err();

    assert!(matches!(err, ParseError::UnmatchedClosingTag { .. }));
}

#[test]
fn test_load_document_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.html");
    fs::write(&path, "<html><body><p class=\"x\">hi</p></body></html>").unwrap();

    let doc = load_document(&path).unwrap();

    assert_eq!(doc.source_path, path);
    assert_eq!(doc.dom.find_by_class("x").len(), 1);
    assert!(doc.html_source.starts_with("<html>"));
}

#[test]
fn test_load_document_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.html");

    let err = load_document(&path).unwrap_err();

    assert!(matches!(err, LoadError::FileError { .. }));
    assert!(err.to_string().starts_with("failed to read"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_load_document_parse_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orphan.html");
    fs::write(&path, "<br><div></div>").unwrap();

    let err = load_document(&path).unwrap_err();
    assert!(matches!(err, LoadError::Parse(ParseError::OrphanElement { .. })));

    let options = ParseOptions {
        skip_orphans: true,
        ..ParseOptions::default()
    };
    let doc = load_document_with_options(&path, options).unwrap();
    assert_eq!(doc.parse_issues.len(), 1);
}

#[test]
fn test_write_tree_outline() {
    let doc = parse_html_string(r#"<ul class="menu"><li>A</li><li hidden>B</li></ul>"#).unwrap();
    let root = doc.dom.root().unwrap();

    let mut out = String::new();
    write_tree(&mut out, &doc.dom, root, 0).unwrap();

    assert_eq!(out, "<ul class=\"menu\">\n  <li> \"A\"\n  <li hidden> \"B\"\n");
}
