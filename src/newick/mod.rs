//! Newick tree-statement parsing.
//!
//! This module provides [NewickTreeParser] to parse Newick tree statements
//! (from raw Newick files, or as extracted from the TREES block of a NEXUS
//! file) into [Tree](crate::model::Tree) structures, resolving labels
//! against a shared [TaxonNamespace](crate::model::TaxonNamespace).
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_str`] - parses the first tree statement of a string
//! * [`parse_file`] - parses a file, returns all [Tree](crate::model::Tree)s
//!   plus their shared [TaxonNamespace](crate::model::TaxonNamespace)
//!
//! # Full API
//! For more control, configure a [NewickTreeParser] and provide data via a
//! [Tokenizer](crate::parser::Tokenizer):
//! * [`NewickTreeParser::parse_next`] - parse a single statement
//! * [`NewickTreeParser::parse_all`] - parse all statements until EOF
//! * [`NewickTreeParser::into_iter`] - obtain an iterator over trees
//!
//! # Format
//! Tree statements follow this grammar:
//! * `stream ::= { statement }`
//! * `statement ::= '(' node_list ')' [label] [':' length] ';'`
//! * `node_list ::= node { ',' node }`
//! * `node ::= '(' node_list ')' [label] [':' length]`
//!   `| label [':' length] | (empty)`
//!
//! Furthermore:
//! * Whitespace can occur between any two tokens, just not within an
//!   unquoted label or a length
//! * `[...]` comments can occur wherever whitespace can; their
//!   classification (rooting directives, weights, metadata, free text)
//!   is described in the [comment] module
//! * An empty `node` production yields a blank child: leading, trailing,
//!   and doubled separators are all tolerated (e.g. `(,A,,B)` describes
//!   four children), since consecutive separators are a common artifact
//!   in polytomy-bearing files
//! * Labels are single-quoted when they contain structural characters;
//!   unquoted underscores read as spaces unless configured otherwise

pub mod comment;
mod defs;
pub mod parser;

pub use comment::{CommentField, classify};
pub use parser::{EdgeLengthType, NewickTreeParser, RootingPolicy, TreeIterator};

use crate::model::{TaxonNamespace, Tree};
use crate::parser::parsing_error::{ParseError, ParseErrorKind};
use crate::parser::tokenizer::Tokenizer;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a Newick file eagerly and returns all trees together with their
/// shared [TaxonNamespace].
///
/// This is a convenience function to parse a file containing a
/// semicolon-separated list of tree statements, using default settings and
/// thus not requiring configuration of a parser.
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
///   with a semicolon-separated list of tree statements
///
/// # Returns
/// * `(Vec<Tree>, TaxonNamespace)` - All parsed trees and their shared taxa
/// * [ParseError] - If file reading fails or a statement is invalid
///
/// # Example
/// ```no_run
/// use treewick::newick::parse_file;
///
/// let (trees, taxa) = parse_file("anseriformes.nwk")?;
/// println!("Parsed {} trees over {} taxa", trees.len(), taxa.num_taxa());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<(Vec<Tree>, TaxonNamespace), ParseError> {
    let mut tokenizer = Tokenizer::from_file_buffered(path)?;

    let mut parser = NewickTreeParser::new();
    let trees = parser.parse_all(&mut tokenizer)?;
    Ok((trees, parser.into_namespace()))
}

/// Parses the first tree statement of a Newick string.
///
/// This is a convenience function for quick parsing of a single statement
/// using default settings and thus not requiring configuration of a parser.
///
/// # Arguments
/// * `newick` - The Newick format string to parse
///
/// # Returns
/// * [Tree] - Tree parsed from the string
/// * [ParseError] - If the string holds no valid tree statement
///
/// # Example
/// ```
/// use treewick::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));")?;
/// assert_eq!(tree.num_leaves(), 3);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParseError> {
    let mut tokenizer = Tokenizer::for_str(newick.as_ref());
    let mut parser = NewickTreeParser::new();
    match parser.parse_next(&mut tokenizer)? {
        Some(tree) => Ok(tree),
        None => Err(ParseError::from_tokenizer(
            ParseErrorKind::IncompleteTreeStatement("no tree statement found in input".to_string()),
            &mut tokenizer,
        )),
    }
}
