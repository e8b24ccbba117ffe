//! Parser warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the tokenizer and tree builder to report recoverable problems such
//! as unmatched closing tags. Every warning can additionally be appended to a
//! log file with [`set_log_file`].

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Optional append-mode sink that receives every warning line.
static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding either lock cannot leave the data half-written.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Warn about a recoverable problem (prints once per unique message)
///
/// The log file, if one is set, receives every occurrence.
///
/// # Example
/// ```ignore
/// warn_once("Tree Builder", "unmatched closing tag </span>");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");

    if let Some(file) = lock(&LOG_FILE).as_mut() {
        // Losing a log line must never abort a parse.
        let _ = writeln!(file, "{key}");
    }

    let should_print = lock(&WARNED).get_or_insert_with(HashSet::new).insert(key);

    if should_print {
        eprintln!("{}", format!("[Larch {component}] ⚠ {message}").yellow());
    }
}

/// Clear all recorded warnings (call when parsing a new document)
pub fn clear_warnings() {
    if let Some(set) = lock(&WARNED).as_mut() {
        set.clear();
    }
}

/// Mirror every subsequent warning into `path`, appending to existing content.
///
/// Replaces any previously configured log file.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be created or opened.
pub fn set_log_file(path: impl AsRef<Path>) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    *lock(&LOG_FILE) = Some(file);
    Ok(())
}

/// Stop mirroring warnings into the log file.
pub fn close_log_file() {
    *lock(&LOG_FILE) = None;
}
