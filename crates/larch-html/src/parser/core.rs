use std::fmt;
use std::iter;

use thiserror::Error;

use larch_common::warning::warn_once;
use larch_dom::{AttributesMap, DomError, DomTree, Node, NodeId};

use crate::tokenizer::{Attribute, RawTag, TagKind};

/// A recoverable problem noticed while building the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// Index into the descriptor stream where this issue was encountered.
    pub token_index: usize,
    /// False for purely informational issues such as elements left open at
    /// end of input.
    pub is_error: bool,
}

/// Structural failures that stop the tree builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An element arrived while there was no open element to attach it to,
    /// e.g. a void element before the first normal element.
    #[error("<{tag}> at token {token_index} has no open element to attach to")]
    OrphanElement {
        /// Tag name of the offending descriptor.
        tag: String,
        /// Its index in the descriptor stream.
        token_index: usize,
    },

    /// A closing tag that matches no open or previously built element. Only
    /// raised in strict mode; otherwise it is recorded as a [`ParseIssue`].
    #[error("closing tag </{tag}> at token {token_index} matches no element")]
    UnmatchedClosingTag {
        /// Name the closing tag referred to, without the `/`.
        tag: String,
        /// Its index in the descriptor stream.
        token_index: usize,
    },

    /// Attaching a new element was rejected by the tree.
    #[error(transparent)]
    Tree(#[from] DomError),
}

/// Tree builder knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Turn unmatched closing tags into [`ParseError::UnmatchedClosingTag`].
    pub strict: bool,
    /// Drop orphan elements (with a warning) instead of failing.
    pub skip_orphans: bool,
}

/// Builds a [`DomTree`] from a descriptor stream in one pass.
///
/// The first normal element becomes the root. Every later element is
/// attached to the current parent, which is the innermost open element, or
/// the root when nothing else is open. Normal elements are pushed onto the
/// stack of open elements; void elements never are. A closing tag pops the
/// innermost open element with the same name and everything above it. A
/// closing tag for an element that was already closed makes that element's
/// parent the current parent again.
///
/// The root itself is never on the stack, so its own closing tag leaves it as
/// the insertion point and any trailing markup still lands inside it.
pub struct HTMLParser {
    /// Open elements below the root, innermost last.
    stack_of_open_elements: Vec<NodeId>,

    /// Tree under construction; root and registry live here.
    tree: DomTree,

    /// Input descriptors from the tokenizer.
    tokens: Vec<RawTag>,

    /// Current position in the descriptor stream.
    token_index: usize,

    /// Issues encountered so far.
    issues: Vec<ParseIssue>,

    options: ParseOptions,
}

impl HTMLParser {
    /// Create a new parser from a descriptor stream.
    #[must_use]
    pub fn new(tokens: Vec<RawTag>) -> Self {
        Self {
            stack_of_open_elements: Vec::new(),
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            issues: Vec::new(),
            options: ParseOptions::default(),
        }
    }

    /// Replace all options at once.
    #[must_use]
    pub const fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Enable strict mode - unmatched closing tags become errors.
    #[must_use]
    pub const fn with_strict_mode(mut self) -> Self {
        self.options.strict = true;
        self
    }

    /// Skip orphan elements instead of failing the parse.
    #[must_use]
    pub const fn with_skip_orphans(mut self) -> Self {
        self.options.skip_orphans = true;
        self
    }

    /// Get all parse issues encountered so far.
    #[must_use]
    pub fn get_issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// The tree as built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Record a parse issue.
    ///
    /// Logs via larch-common's warning system and stores the issue for later
    /// retrieval.
    fn parse_warning(&mut self, message: String, is_error: bool) {
        warn_once("Tree Builder", &message);
        self.issues.push(ParseIssue {
            message,
            token_index: self.token_index,
            is_error,
        });
    }

    /// Consume the remaining descriptors.
    ///
    /// On failure the tree keeps everything built before the offending
    /// descriptor; retrieve it with [`HTMLParser::into_document`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::OrphanElement`] unless orphans are skipped,
    /// [`ParseError::UnmatchedClosingTag`] in strict mode, and
    /// [`ParseError::Tree`] if the tree refuses an attachment.
    pub fn parse(&mut self) -> Result<(), ParseError> {
        while self.token_index < self.tokens.len() {
            let token = self.tokens[self.token_index].clone();
            self.process_token(&token)?;
            self.token_index += 1;
        }
        self.report_unclosed_elements();
        Ok(())
    }

    /// Give up the parser and keep its tree, complete or not.
    #[must_use]
    pub fn into_document(self) -> DomTree {
        self.tree
    }

    /// Run the parser and return the tree.
    ///
    /// # Errors
    ///
    /// See [`HTMLParser::parse`].
    pub fn run(mut self) -> Result<DomTree, ParseError> {
        self.parse()?;
        Ok(self.tree)
    }

    /// Run the parser and return both the tree and any parse issues.
    ///
    /// # Errors
    ///
    /// See [`HTMLParser::parse`].
    pub fn run_with_issues(mut self) -> Result<(DomTree, Vec<ParseIssue>), ParseError> {
        self.parse()?;
        Ok((self.tree, self.issues))
    }

    fn process_token(&mut self, token: &RawTag) -> Result<(), ParseError> {
        match token.kind() {
            TagKind::Close => self.handle_closing_tag(token.closing_target().unwrap_or_default()),
            TagKind::Void => self.handle_void_element(token),
            TagKind::Open => self.handle_open_element(token),
        }
    }

    /// Where the next element goes: the innermost open element, else the root.
    fn current_parent(&self) -> Option<NodeId> {
        self.stack_of_open_elements
            .last()
            .copied()
            .or_else(|| self.tree.root())
    }

    /// Bare attributes map to the empty string; repeats keep the last value.
    fn attributes_to_map(attributes: &[Attribute]) -> AttributesMap {
        attributes
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone().unwrap_or_default()))
            .collect()
    }

    fn create_element(&mut self, token: &RawTag) -> NodeId {
        self.tree.alloc(Node::new(
            token.name.as_str(),
            token.content.as_str(),
            Self::attributes_to_map(&token.attributes),
        ))
    }

    /// Attach a fresh element under `parent` and register it.
    fn insert_element(&mut self, parent: NodeId, token: &RawTag) -> Result<NodeId, ParseError> {
        let element_id = self.create_element(token);
        self.tree.add_child(parent, element_id)?;
        self.tree.register(element_id);
        Ok(element_id)
    }

    fn handle_closing_tag(&mut self, tag_name: &str) -> Result<(), ParseError> {
        // Innermost first, so nested same-name elements close one at a time.
        let tree = &self.tree;
        let matched = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| tree.tag(id) == Some(tag_name));
        if let Some(pos) = matched {
            self.stack_of_open_elements.truncate(pos);
            return Ok(());
        }

        // Re-closing an element that is no longer open resumes at its parent.
        let latest = self
            .tree
            .registry()
            .iter()
            .rev()
            .copied()
            .find(|&id| tree.tag(id) == Some(tag_name));
        if let Some(parent) = latest.and_then(|id| self.tree.parent(id)) {
            self.reopen_at(parent);
            return Ok(());
        }

        if self.tree.root().and_then(|root| self.tree.tag(root)) == Some(tag_name) {
            return Ok(());
        }

        if self.options.strict {
            return Err(ParseError::UnmatchedClosingTag {
                tag: tag_name.to_string(),
                token_index: self.token_index,
            });
        }
        self.parse_warning(format!("unmatched closing tag </{tag_name}> ignored"), true);
        Ok(())
    }

    /// Rebuild the stack of open elements so that `parent` is the current
    /// parent. The stack always holds the path from below the root down to
    /// the insertion point; it is empty when `parent` is the root.
    fn reopen_at(&mut self, parent: NodeId) {
        let root = self.tree.root();
        let mut path: Vec<NodeId> = iter::once(parent)
            .chain(self.tree.ancestors(parent))
            .take_while(|&id| Some(id) != root)
            .collect();
        path.reverse();
        self.stack_of_open_elements = path;
    }

    fn handle_void_element(&mut self, token: &RawTag) -> Result<(), ParseError> {
        let Some(parent) = self.current_parent() else {
            return self.orphan(token);
        };
        let _ = self.insert_element(parent, token)?;
        Ok(())
    }

    fn handle_open_element(&mut self, token: &RawTag) -> Result<(), ParseError> {
        match self.current_parent() {
            None => {
                let root = self.create_element(token);
                self.tree.set_root(root);
            }
            Some(parent) => {
                let element_id = self.insert_element(parent, token)?;
                self.stack_of_open_elements.push(element_id);
            }
        }
        Ok(())
    }

    fn orphan(&mut self, token: &RawTag) -> Result<(), ParseError> {
        if self.options.skip_orphans {
            self.parse_warning(
                format!("<{}> has no open element to attach to; dropped", token.name),
                true,
            );
            return Ok(());
        }
        Err(ParseError::OrphanElement {
            tag: token.name.clone(),
            token_index: self.token_index,
        })
    }

    /// Elements still open at end of input stay where they are.
    fn report_unclosed_elements(&mut self) {
        let unclosed: Vec<String> = self
            .stack_of_open_elements
            .iter()
            .filter_map(|&id| self.tree.tag(id).map(str::to_string))
            .collect();
        for tag in unclosed {
            self.parse_warning(format!("<{tag}> was never closed"), false);
        }
    }
}

/// Write an indented outline of the subtree at `id` into `out`.
///
/// # Errors
///
/// Propagates errors from the underlying writer.
pub fn write_tree(out: &mut impl fmt::Write, tree: &DomTree, id: NodeId, indent: usize) -> fmt::Result {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return Ok(());
    };

    if node.attributes.is_empty() {
        write!(out, "{prefix}<{}>", node.tag)?;
    } else {
        let mut attrs: Vec<String> = node
            .attributes
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    k.clone()
                } else {
                    format!("{k}=\"{v}\"")
                }
            })
            .collect();
        attrs.sort();
        write!(out, "{prefix}<{} {}>", node.tag, attrs.join(" "))?;
    }
    if !node.content.is_empty() {
        let display = node.content.replace('\n', "\\n");
        write!(out, " \"{display}\"")?;
    }
    writeln!(out)?;

    for &child_id in tree.children(id) {
        write_tree(out, tree, child_id, indent + 1)?;
    }
    Ok(())
}

/// Print a tree outline for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_tree(&mut out, tree, id, indent);
    print!("{out}");
}
