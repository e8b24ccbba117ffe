//! Tree construction from raw tag descriptors.

/// The single-pass tree builder.
pub mod core;

pub use self::core::{
    HTMLParser, ParseError, ParseIssue, ParseOptions, print_tree, write_tree,
};
