//! Lenient HTML tokenizer and tree builder for the Larch parser.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** - splits markup at every `<` into raw tag descriptors,
//!   dropping comments and doctype declarations
//! - **Tree Builder** - one pass over the descriptors with a stack of open
//!   elements, a fixed list of void elements, and a root + registry result
//! - **Document loading** - parse a string or read a whole file first
//!
//! # Not Implemented
//!
//! - Encoding detection and character reference decoding
//! - Implied end tags (only the fixed void list closes itself)
//! - Raw-text handling for `<script>` and `<style>`
//! - Browser-compatible error recovery

/// Whole-document entry points.
pub mod document;
/// Tree construction.
pub mod parser;
/// Markup tokenizer.
pub mod tokenizer;

pub use document::{
    LoadError, ParsedDocument, load_document, load_document_with_options, parse_html_string,
    parse_html_with_options,
};
pub use parser::{HTMLParser, ParseError, ParseIssue, ParseOptions, print_tree, write_tree};
pub use tokenizer::{Attribute, HTMLTokenizer, RawTag, TagKind, VoidTag};
