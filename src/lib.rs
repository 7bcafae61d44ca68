//! Treewick is a library to parse Newick tree statements into rooted tree
//! graphs over a shared taxon namespace.
//!
//! This crate offers configurable parser functionality for the Newick tree
//! notation, as found in raw Newick files and in the TREES block of NEXUS
//! files. Core functionality provided:
//! - Newick: Parse each tree statement in a file or single Newick strings,
//!   eagerly or lazily (providing an iterator).
//! - Taxa: Leaf labels (and optionally internal labels) resolve against a
//!   shared, append-only [TaxonNamespace](model::TaxonNamespace), so trees
//!   over the same units share taxon identities. The namespace can be
//!   closed to restrict parsing to known taxa.
//! - Comments: Inline `[...]` comments are classified into rooting
//!   directives (`[&R]`/`[&U]`), tree weights (`[&W 1/2]`), structured
//!   `key=value` metadata, and verbatim comments on the owning tree or
//!   node. See [newick::comment].
//! - Configurability: rooting policy, edge length type and suppression,
//!   metadata extraction, weight tracking, label case and underscore
//!   handling, taxon suppression per node kind, duplicate labels. See
//!   [NewickTreeParser](newick::NewickTreeParser).
//! - Errors report the exact 1-based line and column of the offending
//!   token, plus a short excerpt of the upcoming input.
//!
//! Limitations:
//! - Only the tree-statement grammar is handled; NEXUS block structure
//!   (TAXA, TRANSLATE, character matrices) is not interpreted
//! - Trees are read-only results; writing Newick is not provided
//!
//! # Usage patterns
//! Can parse trees in two main ways:
//! 1. Quick access with default settings via [parse_newick_str] and
//!    [parse_newick_file].
//! 2. Configure a [NewickTreeParser](newick::NewickTreeParser) for full
//!    control over rooting, taxa, comments, etc., and feed it a
//!    [Tokenizer](parser::Tokenizer) over any byte source.
//!
//! ## Example Default Configuration
//!
//! Parse a single Newick string:
//! ```
//! use treewick::parse_newick_str;
//!
//! let tree = parse_newick_str("((A:0.1,B:0.2):0.3,C:0.4);").unwrap();
//! assert_eq!(tree.num_leaves(), 3);
//! ```
//!
//! Parse a Newick file:
//! ```no_run
//! use treewick::parse_newick_file;
//!
//! let (trees, taxa) = parse_newick_file("phylo.trees").unwrap();
//! println!("Loaded {} trees over {} taxa", trees.len(), taxa.num_taxa());
//! ```
//!
//! ## Example Parser Configuration
//!
//! For more control, configure a parser yourself:
//! ```
//! use treewick::newick::{NewickTreeParser, RootingPolicy};
//! use treewick::parser::Tokenizer;
//!
//! let mut tokenizer = Tokenizer::for_str("[&W 1/2](A,(B,C));");
//! let mut parser = NewickTreeParser::new()
//!     .with_rooting(RootingPolicy::ForceRooted)
//!     .with_tree_weights();
//!
//! let tree = parser.parse_next(&mut tokenizer)?.expect("one statement");
//! assert_eq!(tree.is_rooted(), Some(true));
//! assert_eq!(tree.weight(), Some(0.5));
//! # Ok::<(), treewick::parser::ParseError>(())
//! ```

pub mod model;
pub mod newick;
pub mod parser;

use crate::model::TaxonNamespace;
use crate::model::Tree;
use crate::parser::parsing_error::ParseError;
use std::path::Path;

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string using default settings, returning the first
/// [Tree] it describes.
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParseError> {
    newick::parse_str(newick)
}

/// Parse a file containing a semicolon-separated list of tree statements
/// using default settings, returning all trees together with their shared
/// [TaxonNamespace].
///
/// See [`newick::parse_file`] for full documentation of this convenience function.
pub fn parse_newick_file<P: AsRef<Path>>(
    path: P,
) -> Result<(Vec<Tree>, TaxonNamespace), ParseError> {
    newick::parse_file(path)
}
