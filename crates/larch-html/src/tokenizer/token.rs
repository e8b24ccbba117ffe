use core::fmt;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// One `name` or `name=value` token from a tag header.
///
/// A token without `=` is a bare attribute and has no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Everything before the first `=`.
    pub name: String,
    /// Everything after the first `=`, minus one surrounding pair of `"`.
    pub value: Option<String>,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self {
            name,
            value: Some(value),
        }
    }

    /// Create a bare attribute such as `disabled`.
    #[must_use]
    pub const fn bare(name: String) -> Self {
        Self { name, value: None }
    }
}

/// Elements that never contain children and never need a closing tag.
///
/// Matching is exact and case-sensitive: `IMG` is an ordinary element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr)]
pub enum VoidTag {
    /// `<img>`
    #[strum(serialize = "img")]
    Img,
    /// `<link>`
    #[strum(serialize = "link")]
    Link,
    /// `<meta>`
    #[strum(serialize = "meta")]
    Meta,
    /// `<br>`
    #[strum(serialize = "br")]
    Br,
    /// `<br/>`, whose slash the whitespace split leaves glued to the name.
    #[strum(serialize = "br/")]
    BrSlash,
    /// `<area>`
    #[strum(serialize = "area")]
    Area,
    /// `<base>`
    #[strum(serialize = "base")]
    Base,
    /// `<col>`
    #[strum(serialize = "col")]
    Col,
    /// `<input>`
    #[strum(serialize = "input")]
    Input,
}

impl VoidTag {
    /// Whether `tag` names a void element.
    #[must_use]
    pub fn is_void(tag: &str) -> bool {
        tag.parse::<Self>().is_ok()
    }

    /// All void tag names, in declaration order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::iter().map(<&'static str>::from)
    }
}

/// How the tree builder treats a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TagKind {
    /// A tag name starting with `/`.
    Close,
    /// A member of [`VoidTag`].
    Void,
    /// Anything else; it opens an element.
    Open,
}

/// A raw tag descriptor: one `<...` fragment of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    /// First whitespace-separated token of the header. Closing tags keep
    /// their leading `/`.
    pub name: String,
    /// Remaining header tokens, in source order.
    pub attributes: Vec<Attribute>,
    /// Text after the first `>` of the fragment.
    pub content: String,
    /// False when the fragment had no `>` at all.
    pub terminated: bool,
}

impl RawTag {
    /// Classify this descriptor for tree construction.
    #[must_use]
    pub fn kind(&self) -> TagKind {
        if self.name.starts_with('/') {
            TagKind::Close
        } else if VoidTag::is_void(&self.name) {
            TagKind::Void
        } else {
            TagKind::Open
        }
    }

    /// For a closing descriptor, the name of the element it closes.
    #[must_use]
    pub fn closing_target(&self) -> Option<&str> {
        self.name.strip_prefix('/')
    }
}

impl fmt::Display for RawTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for attr in &self.attributes {
            match &attr.value {
                Some(value) => write!(f, " {}=\"{value}\"", attr.name)?,
                None => write!(f, " {}", attr.name)?,
            }
        }
        if self.terminated {
            write!(f, ">")?;
        }
        if !self.content.is_empty() {
            write!(f, "{:?}", self.content)?;
        }
        Ok(())
    }
}
