//! Markup tokenizer.
//!
//! Turns source text into an ordered list of raw tag descriptors, one per
//! `<` in the input, skipping comments and doctype declarations.

/// Descriptor and attribute types produced by the tokenizer.
pub mod token;
/// The splitting tokenizer itself.
pub mod core;

pub use self::core::HTMLTokenizer;
pub use token::{Attribute, RawTag, TagKind, VoidTag};
