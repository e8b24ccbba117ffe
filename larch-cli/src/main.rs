//! Larch CLI
//!
//! Parses an HTML file (or an inline string), prints the resulting tree and
//! runs tag, id, and class lookups against it.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::{Value, json};

use larch_common::warning::set_log_file;
use larch_dom::{DomTree, NodeId};
use larch_html::{
    ParseOptions, ParsedDocument, VoidTag, load_document_with_options, parse_html_with_options,
    print_tree,
};

/// Larch - lenient HTML-to-tree parser
#[derive(Parser, Debug)]
#[command(name = "larch")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the element outline of a file
    larch page.html

    # Parse inline HTML and look up every <li>
    larch --html '<ul><li>A</li><li>B</li></ul>' --tag li

    # Dump the tree as JSON, logging warnings to a file
    larch page.html --json --log-file larch.log
"#)]
struct Cli {
    /// Path to HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Show tokenizer descriptors
    #[arg(short, long)]
    tokens: bool,

    /// Print the tree as JSON instead of an outline
    #[arg(short, long)]
    json: bool,

    /// Print the flat registry, one diagnostic line per node
    #[arg(short, long)]
    flat: bool,

    /// Find all elements with this tag
    #[arg(long, value_name = "TAG")]
    tag: Option<String>,

    /// Find the first element with this id
    #[arg(long, value_name = "ID")]
    id: Option<String>,

    /// Find all elements with exactly this class attribute
    #[arg(long, value_name = "CLASS")]
    class: Option<String>,

    /// Treat unmatched closing tags as errors
    #[arg(long)]
    strict: bool,

    /// Drop elements that have no open parent instead of failing
    #[arg(long)]
    skip_orphans: bool,

    /// Also append every warning to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_file) = &cli.log_file {
        set_log_file(log_file)
            .with_context(|| format!("cannot open log file '{}'", log_file.display()))?;
    }

    let options = ParseOptions {
        strict: cli.strict,
        skip_orphans: cli.skip_orphans,
    };
    let doc = match (&cli.html, &cli.path) {
        (Some(html), _) => parse_html_with_options(html, options)?,
        (None, Some(path)) => load_document_with_options(path, options)?,
        (None, None) => bail!("no input file or --html provided (see --help)"),
    };

    if cli.tokens {
        print_tokens(&doc);
    }

    let queried = cli.tag.is_some() || cli.id.is_some() || cli.class.is_some();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&document_to_json(&doc.dom))?);
    } else if cli.flat {
        print!("{}", doc.dom);
    } else if !queried {
        println!("{}", "=== Tree ===".bold());
        match doc.dom.root() {
            Some(root) => print_tree(&doc.dom, root, 0),
            None => println!("(no root element)"),
        }
    }

    if let Some(tag) = &cli.tag {
        print_matches(&doc.dom, &format!("tag {tag:?}"), &doc.dom.find_by_tag(tag));
    }
    if let Some(id) = &cli.id {
        let found: Vec<NodeId> = doc.dom.find_by_id(id).into_iter().collect();
        print_matches(&doc.dom, &format!("id {id:?}"), &found);
    }
    if let Some(class) = &cli.class {
        print_matches(&doc.dom, &format!("class {class:?}"), &doc.dom.find_by_class(class));
    }

    if !doc.parse_issues.is_empty() {
        eprintln!("{} parse issue(s)", doc.parse_issues.len());
    }

    Ok(())
}

fn print_tokens(doc: &ParsedDocument) {
    println!("{}", format!("=== Tokens ({}) ===", doc.tokens.len()).bold());
    for (i, token) in doc.tokens.iter().enumerate() {
        println!("  {i:3}: {:<5} {token}", token.kind().dimmed());
    }
    let void_tags: Vec<&str> = VoidTag::names().collect();
    println!("  void tags: {}", void_tags.join(", ").dimmed());
    println!();
}

fn print_matches(tree: &DomTree, label: &str, ids: &[NodeId]) {
    println!("{}", format!("=== {label}: {} match(es) ===", ids.len()).bold());
    for &id in ids {
        println!("{}", tree.display_node(id).green());
    }
}

fn node_to_json(tree: &DomTree, id: NodeId) -> Value {
    let node = &tree[id];
    let children: Vec<Value> = node
        .children
        .iter()
        .map(|&child| node_to_json(tree, child))
        .collect();
    json!({
        "id": id,
        "tag": node.tag,
        "content": node.content,
        "attributes": node.attributes,
        "children": children,
    })
}

fn document_to_json(tree: &DomTree) -> Value {
    json!({
        "root": tree.root().map(|root| node_to_json(tree, root)),
        "registry": tree.registry(),
    })
}
