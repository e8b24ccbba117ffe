//! Tests for the warning log-file sink.
//!
//! The sink is process-global, so everything touching it lives in one test.

use larch_common::warning::{clear_warnings, close_log_file, set_log_file, warn_once};

#[test]
fn test_log_file_receives_every_warning() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("larch.log");
    std::fs::write(&path, "previous run\n").expect("seed log file");

    set_log_file(&path).expect("open log file");
    warn_once("Tree Builder", "unmatched closing tag </span>");
    // Deduplicated on stderr, but still logged.
    warn_once("Tree Builder", "unmatched closing tag </span>");
    clear_warnings();
    warn_once("Tokenizer", "tag <p has no closing '>'");
    close_log_file();
    warn_once("Tokenizer", "not logged after close");

    let log = std::fs::read_to_string(&path).expect("read log file");
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(
        lines,
        vec![
            "previous run",
            "[Tree Builder] unmatched closing tag </span>",
            "[Tree Builder] unmatched closing tag </span>",
            "[Tokenizer] tag <p has no closing '>'",
        ]
    );
}
