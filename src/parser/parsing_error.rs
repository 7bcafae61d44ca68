//! Error types for Newick tree-statement parsing.
//!
//! This module provides [ParseError] and [ParseErrorKind] for representing
//! and reporting errors that occur while tokenizing and parsing tree
//! statements. Every error carries the 1-based line and column where it was
//! detected plus a short excerpt of the upcoming input.

use crate::parser::byte_source::ByteSource;
use crate::parser::tokenizer::Tokenizer;
use std::error::Error;
use std::fmt;

/// Default length of context excerpt attached to parse errors
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSE ERROR KIND
// =#========================================================================€=
/// Error kinds that can occur while parsing Newick tree statements.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    /// Underlying I/O failure while opening or reading a source.
    #[error("IO error - {0}")]
    Io(String),

    /// A required structural token is absent, e.g. a tree statement that
    /// does not open with '('.
    #[error("invalid token - {0}")]
    InvalidToken(String),

    /// Grammar violation within a statement: a second label on one node,
    /// '(' directly following a label, or an unparsable edge length.
    #[error("malformed tree statement - {0}")]
    MalformedStatement(String),

    /// The stream or statement ended before the terminating ';'.
    #[error("incomplete tree statement - {0}")]
    IncompleteTreeStatement(String),

    /// A repeated taxon label was encountered while duplicates are disallowed.
    #[error("duplicate taxon label '{0}'")]
    DuplicateLabel(String),

    /// A label could not be resolved against a closed taxon namespace.
    #[error("could not resolve label - {0}")]
    UnresolvedLabel(String),

    /// A '[' comment was opened but never closed.
    #[error("unclosed comment")]
    UnclosedComment,

    /// A quoted label was opened but never closed.
    #[error("unclosed quoted label")]
    UnclosedQuote,
}

// =#========================================================================#=
// PARSE ERROR
// =#========================================================================$=
/// Parsing error with positional information (1-based line/column and a
/// short excerpt of the input following the error position).
#[derive(Debug)]
pub struct ParseError {
    kind: ParseErrorKind,
    line: usize,
    column: usize,
    context: String,
}

impl ParseError {
    /// Create a ParseError with an explicit position and context.
    pub(crate) fn new(kind: ParseErrorKind, line: usize, column: usize, context: String) -> Self {
        Self {
            kind,
            line,
            column,
            context,
        }
    }

    /// Create a ParseError positioned at the tokenizer's current token
    /// (or its cursor, if no token has been read yet).
    pub(crate) fn from_tokenizer<S: ByteSource>(
        kind: ParseErrorKind,
        tokenizer: &mut Tokenizer<S>,
    ) -> Self {
        let (line, column) = tokenizer.err_position();
        Self {
            kind,
            line,
            column,
            context: tokenizer.err_context(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for InvalidToken
    pub(crate) fn invalid_token<S: ByteSource>(tokenizer: &mut Tokenizer<S>, msg: String) -> Self {
        Self::from_tokenizer(ParseErrorKind::InvalidToken(msg), tokenizer)
    }

    /// Convenience constructor for MalformedStatement
    pub(crate) fn malformed_statement<S: ByteSource>(
        tokenizer: &mut Tokenizer<S>,
        msg: String,
    ) -> Self {
        Self::from_tokenizer(ParseErrorKind::MalformedStatement(msg), tokenizer)
    }

    /// Convenience constructor for IncompleteTreeStatement
    pub(crate) fn incomplete_statement<S: ByteSource>(
        tokenizer: &mut Tokenizer<S>,
        msg: String,
    ) -> Self {
        Self::from_tokenizer(ParseErrorKind::IncompleteTreeStatement(msg), tokenizer)
    }

    /// Convenience constructor for DuplicateLabel
    pub(crate) fn duplicate_label<S: ByteSource>(
        tokenizer: &mut Tokenizer<S>,
        label: String,
    ) -> Self {
        Self::from_tokenizer(ParseErrorKind::DuplicateLabel(label), tokenizer)
    }

    /// Convenience constructor for UnresolvedLabel
    pub(crate) fn unresolved_label<S: ByteSource>(
        tokenizer: &mut Tokenizer<S>,
        msg: String,
    ) -> Self {
        Self::from_tokenizer(ParseErrorKind::UnresolvedLabel(msg), tokenizer)
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Get the 1-based line where the error occurred
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the 1-based column where the error occurred
    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.kind, self.line, self.column
        )?;

        // Additional context if available
        if !self.context.is_empty() {
            write!(f, "\n  Context: {}", self.context)?;
        }

        Ok(())
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError {
            kind: ParseErrorKind::Io(err.to_string()),
            line: 0, // No position for IO errors
            column: 0,
            context: String::new(),
        }
    }
}
