use larch_common::warning::warn_once;

use super::token::{Attribute, RawTag};

/// Splits markup into [`RawTag`] descriptors.
///
/// The scan is deliberately naive: the source is cut at every `<`, each piece
/// is cut once more at its first `>`, and the header is split on whitespace.
/// Comments and doctype declarations (pieces starting with `!`) are dropped.
/// Quoted attribute values containing whitespace are therefore split into
/// several tokens.
pub struct HTMLTokenizer {
    input: String,
    token_stream: Vec<RawTag>,
}

impl HTMLTokenizer {
    /// Create a tokenizer over a complete document.
    #[must_use]
    pub const fn new(input: String) -> Self {
        Self {
            input,
            token_stream: Vec::new(),
        }
    }

    /// Tokenize the whole input. Running twice replaces the previous result.
    ///
    /// Text before the first `<` is a fragment like any other and, unless it
    /// is blank, comes out as a header-only descriptor.
    pub fn run(&mut self) {
        self.token_stream = self
            .input
            .split('<')
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty() && !fragment.starts_with('!'))
            .map(Self::tokenize_fragment)
            .collect();
    }

    /// Descriptors produced by the last [`HTMLTokenizer::run`].
    #[must_use]
    pub fn tokens(&self) -> &[RawTag] {
        &self.token_stream
    }

    /// Consume the tokenizer, returning its descriptors.
    #[must_use]
    pub fn into_tokens(self) -> Vec<RawTag> {
        self.token_stream
    }

    fn tokenize_fragment(fragment: &str) -> RawTag {
        let (header, content, terminated) = match fragment.split_once('>') {
            Some((header, content)) => (header, content, true),
            None => {
                warn_once("Tokenizer", &format!("tag <{fragment} has no closing '>'"));
                (fragment, "", false)
            }
        };

        let mut words = header.split_whitespace();
        // The header may be empty, as in `<>text`.
        let name = words.next().unwrap_or_default().to_string();
        let attributes = words.map(Self::parse_attribute).collect();

        RawTag {
            name,
            attributes,
            content: content.to_string(),
            terminated,
        }
    }

    /// `name=value` splits at the first `=`; anything without `=` is bare.
    fn parse_attribute(word: &str) -> Attribute {
        match word.split_once('=') {
            Some((name, value)) => {
                let value = value.strip_prefix('"').unwrap_or(value);
                let value = value.strip_suffix('"').unwrap_or(value);
                Attribute::new(name.to_string(), value.to_string())
            }
            None => Attribute::bare(word.to_string()),
        }
    }
}
