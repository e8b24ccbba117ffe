//! Whole-document entry points: parse a string or a file in one call.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use larch_common::warning::clear_warnings;
use larch_dom::DomTree;

use crate::parser::{HTMLParser, ParseError, ParseOptions};
use crate::tokenizer::{HTMLTokenizer, RawTag};

/// A fully parsed document plus the intermediate data used to build it.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Original markup.
    pub html_source: String,

    /// File the markup came from; empty for in-memory input.
    pub source_path: PathBuf,

    /// Tokenizer output (for debugging).
    pub tokens: Vec<RawTag>,

    /// The tree, its root and its registry.
    pub dom: DomTree,

    /// Recoverable issues, rendered.
    pub parse_issues: Vec<String>,
}

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file
    #[error("failed to read '{}'", .path.display())]
    FileError {
        /// The path that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The markup was read but could not be turned into a tree.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Parse an HTML string with default options.
///
/// # Errors
///
/// Returns the tree builder's [`ParseError`].
pub fn parse_html_string(html: &str) -> Result<ParsedDocument, ParseError> {
    parse_html_with_options(html, ParseOptions::default())
}

/// Parse an HTML string.
///
/// Warning de-duplication is reset first, so each document reports its own
/// problems.
///
/// # Errors
///
/// Returns the tree builder's [`ParseError`].
pub fn parse_html_with_options(
    html: &str,
    options: ParseOptions,
) -> Result<ParsedDocument, ParseError> {
    clear_warnings();

    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    let tokens = tokenizer.into_tokens();

    let parser = HTMLParser::new(tokens.clone()).with_options(options);
    let (dom, issues) = parser.run_with_issues()?;

    Ok(ParsedDocument {
        html_source: html.to_string(),
        source_path: PathBuf::new(),
        tokens,
        dom,
        parse_issues: issues.into_iter().map(|i| i.message).collect(),
    })
}

/// Read a whole file and parse it with default options.
///
/// # Errors
///
/// Returns [`LoadError::FileError`] if the file can't be read and
/// [`LoadError::Parse`] if the markup can't be built into a tree.
pub fn load_document(path: impl AsRef<Path>) -> Result<ParsedDocument, LoadError> {
    load_document_with_options(path, ParseOptions::default())
}

/// Read a whole file and parse it.
///
/// # Errors
///
/// See [`load_document`].
pub fn load_document_with_options(
    path: impl AsRef<Path>,
    options: ParseOptions,
) -> Result<ParsedDocument, LoadError> {
    let path = path.as_ref();
    let html_source = fs::read_to_string(path).map_err(|source| LoadError::FileError {
        path: path.to_path_buf(),
        source,
    })?;

    let mut doc = parse_html_with_options(&html_source, options)?;
    doc.source_path = path.to_path_buf();
    Ok(doc)
}
