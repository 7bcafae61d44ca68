//! Token-level scanner for Newick tree statements.
//!
//! This module provides [Tokenizer], which turns a [ByteSource] into a
//! stream of [Token]s while capturing `[...]` comments on a side channel.
//! The tokenizer is the only owner of the stream cursor: advancing is the
//! sole mutator of position, and every token records the 1-based line and
//! column of its first character.
//!
//! Comments accumulate between tokens until they are explicitly drained via
//! [drain_comments](Tokenizer::drain_comments). Comments that are not drained
//! at one decision point leak into the next drain, so a comment always
//! attaches to whatever entity is constructed next.

use crate::parser::buffered_byte_source::BufferedByteSource;
use crate::parser::byte_source::ByteSource;
use crate::parser::in_memory_byte_source::InMemoryByteSource;
use crate::parser::parsing_error::{ParseError, ParseErrorKind};
use std::path::Path;

/// Characters that always form single-character structural tokens.
///
/// A stray ']' outside a comment stands alone as well, so the scanner can
/// never stall on it.
const STRUCTURAL_TOKEN_BYTES: &[u8] = b"(),:;]";

/// Characters that terminate an unquoted label (besides whitespace).
const LABEL_DELIMITERS: &[u8] = b"()[],:;'";

// =#========================================================================#=
// TOKEN
// =#========================================================================#=
/// A single token produced by the [Tokenizer].
///
/// Tokens are ephemeral: the tokenizer owns exactly one at a time, and each
/// call to [advance](Tokenizer::advance) replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token text, without enclosing quotes
    text: String,
    /// Whether the token was single-quote delimited
    quoted: bool,
    /// 1-based line of the token's first character
    line: usize,
    /// 1-based column of the token's first character
    column: usize,
}

impl Token {
    /// Returns the token text (without enclosing quotes, with `''` unescaped).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the token was quote-delimited.
    ///
    /// Quoting protects a label from underscore folding and from being
    /// mistaken for a structural token.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Returns the 1-based line of the token's first character.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 1-based column of the token's first character.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns whether this token is the unquoted structural character `ch`.
    pub(crate) fn is_char(&self, ch: char) -> bool {
        !self.quoted && self.text.len() == 1 && self.text.chars().next() == Some(ch)
    }
}

// =#========================================================================#=
// TOKENIZER
// =#========================================================================$=
/// Scanner turning a byte stream into Newick tokens.
///
/// # Token classes
/// - Structural: the single characters `(` `)` `,` `:` `;`
/// - Quoted labels: single-quote delimited, with `''` escaping a quote
/// - Unquoted labels: maximal runs up to whitespace, a structural character,
///   `[`, or `'`
///
/// `[...]` comments may appear between any two tokens. They are not tokens
/// themselves; their bodies (without brackets) accumulate on a side channel
/// until [drain_comments](Self::drain_comments) is called.
///
/// # Contract
/// - [current](Self::current) peeks without consuming
/// - [advance](Self::advance) moves to the next token, `Ok(None)` at end
/// - [require_advance](Self::require_advance) moves and fails with a
///   positioned error if no token remains
/// - The stream is single-pass; there is no way to rewind
pub struct Tokenizer<S: ByteSource> {
    source: S,
    /// 1-based line of the next unread byte
    line: usize,
    /// 1-based column of the next unread byte
    column: usize,
    current: Option<Token>,
    comments: Vec<String>,
}

impl Tokenizer<InMemoryByteSource> {
    /// Creates a tokenizer over an in-memory string.
    pub fn for_str(input: &str) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.as_bytes().to_vec()))
    }

    /// Creates a tokenizer over an in-memory byte slice.
    pub fn from_bytes(input: &[u8]) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.to_vec()))
    }

    /// Creates a tokenizer reading the whole file at `path` into memory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::new(InMemoryByteSource::from_file(path)?))
    }
}

impl Tokenizer<BufferedByteSource> {
    /// Creates a tokenizer streaming the file at `path` through a buffered
    /// reader, for files too large to hold in memory.
    pub fn from_file_buffered<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::new(BufferedByteSource::from_file(path)?))
    }
}

impl<S: ByteSource> Tokenizer<S> {
    /// Creates a new tokenizer over the given byte source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            line: 1,
            column: 1,
            current: None,
            comments: Vec::new(),
        }
    }

    /// Peeks at the current token without consuming it.
    ///
    /// Returns `None` before the first [advance](Self::advance) and after the
    /// stream is exhausted.
    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Returns whether the current token is the unquoted structural
    /// character `ch`.
    pub fn current_is(&self, ch: char) -> bool {
        self.current.as_ref().is_some_and(|t| t.is_char(ch))
    }

    /// Returns whether the current token was quote-delimited.
    pub fn is_quoted(&self) -> bool {
        self.current.as_ref().is_some_and(|t| t.is_quoted())
    }

    /// Returns whether the underlying stream is exhausted.
    ///
    /// The current token (if any) stays valid; `is_at_end` only says that no
    /// further token will follow it.
    pub fn is_at_end(&mut self) -> bool {
        self.source.is_eof()
    }

    /// Returns and clears all comments captured since the previous drain.
    ///
    /// Comment order is preserved. Comments left undrained at one decision
    /// point are deliberately included in the next drain.
    pub fn drain_comments(&mut self) -> Vec<String> {
        std::mem::take(&mut self.comments)
    }

    /// Discards all captured comments without returning them.
    pub(crate) fn clear_comments(&mut self) {
        self.comments.clear();
    }

    /// Moves to the next token.
    ///
    /// # Returns
    /// * `Ok(Some(token))` - The new current token
    /// * `Ok(None)` - The stream is exhausted
    /// * `Err(ParseError)` - An unclosed comment or quoted label
    pub fn advance(&mut self) -> Result<Option<&Token>, ParseError> {
        self.current = self.read_token()?;
        Ok(self.current.as_ref())
    }

    /// Moves to the next token, failing if none remains.
    ///
    /// # Errors
    /// Returns an [IncompleteTreeStatement](ParseErrorKind::IncompleteTreeStatement)
    /// error positioned at the stream cursor if the stream is exhausted.
    pub fn require_advance(&mut self) -> Result<&Token, ParseError> {
        self.advance()?;
        let (line, column) = (self.line, self.column);
        match self.current {
            Some(ref token) => Ok(token),
            None => Err(ParseError::new(
                ParseErrorKind::IncompleteTreeStatement(
                    "unexpected end of stream while a tree statement is open".to_string(),
                ),
                line,
                column,
                String::new(),
            )),
        }
    }

    /// Position for error reporting: the current token's start if one
    /// exists, otherwise the stream cursor.
    pub(crate) fn err_position(&self) -> (usize, usize) {
        match self.current {
            Some(ref token) => (token.line, token.column),
            None => (self.line, self.column),
        }
    }

    /// Excerpt of the upcoming input for error reporting.
    pub(crate) fn err_context(&mut self, k: usize) -> String {
        String::from_utf8_lossy(&self.source.get_context(k)).into_owned()
    }

    /// Consumes one byte, maintaining the line/column cursor.
    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.source.next_byte()?;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(byte)
    }

    /// Reads the next token, capturing any comments encountered on the way.
    fn read_token(&mut self) -> Result<Option<Token>, ParseError> {
        loop {
            while let Some(b) = self.source.peek() {
                if b.is_ascii_whitespace() {
                    self.next_byte();
                } else {
                    break;
                }
            }

            match self.source.peek() {
                None => return Ok(None),
                Some(b'[') => self.capture_comment()?,
                Some(b'\'') => return self.read_quoted_token().map(Some),
                Some(b) if STRUCTURAL_TOKEN_BYTES.contains(&b) => {
                    let (line, column) = (self.line, self.column);
                    self.next_byte();
                    return Ok(Some(Token {
                        text: (b as char).to_string(),
                        quoted: false,
                        line,
                        column,
                    }));
                }
                Some(_) => return self.read_unquoted_token().map(Some),
            }
        }
    }

    /// Captures a `[...]` comment body onto the side channel.
    ///
    /// Expects the cursor at the opening '['. The brackets themselves are
    /// not part of the captured body.
    fn capture_comment(&mut self) -> Result<(), ParseError> {
        let (line, column) = (self.line, self.column);
        self.next_byte(); // consume '['

        let mut comment = String::new();
        loop {
            match self.next_byte() {
                Some(b']') => break,
                Some(b) => comment.push(b as char),
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnclosedComment,
                        line,
                        column,
                        String::new(),
                    ));
                }
            }
        }

        self.comments.push(comment);
        Ok(())
    }

    /// Reads a quoted label enclosed in single quotes with escape support.
    ///
    /// Single quotes within the label are escaped by doubling them
    /// (e.g., `'Wilson''s'` becomes `Wilson's`).
    fn read_quoted_token(&mut self) -> Result<Token, ParseError> {
        let (line, column) = (self.line, self.column);
        self.next_byte(); // consume opening '

        let mut text = String::new();
        loop {
            match self.next_byte() {
                Some(b'\'') => {
                    // Two single quotes in a row are an escaped literal quote
                    if self.source.peek() == Some(b'\'') {
                        text.push('\'');
                        self.next_byte();
                    } else {
                        break;
                    }
                }
                Some(b) => text.push(b as char),
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnclosedQuote,
                        line,
                        column,
                        String::new(),
                    ));
                }
            }
        }

        Ok(Token {
            text,
            quoted: true,
            line,
            column,
        })
    }

    /// Reads an unquoted label up to the next delimiter.
    fn read_unquoted_token(&mut self) -> Result<Token, ParseError> {
        let (line, column) = (self.line, self.column);

        let mut text = String::new();
        while let Some(b) = self.source.peek() {
            if b.is_ascii_whitespace() || LABEL_DELIMITERS.contains(&b) {
                break;
            }
            text.push(b as char);
            self.next_byte();
        }

        Ok(Token {
            text,
            quoted: false,
            line,
            column,
        })
    }
}

// =#========================================================================#=
// TESTS - TOKENIZER
// =#========================================================================$=
#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        let mut tokenizer = Tokenizer::for_str(input);
        let mut collected = Vec::new();
        while let Some(token) = tokenizer.advance().unwrap() {
            collected.push(token.text().to_string());
        }
        collected
    }

    #[test]
    fn test_structural_and_label_tokens() {
        assert_eq!(
            texts("(A,B:1.0);"),
            vec!["(", "A", ",", "B", ":", "1.0", ")", ";"]
        );
    }

    #[test]
    fn test_whitespace_between_tokens() {
        assert_eq!(
            texts("( A ,\n  B ) ;"),
            vec!["(", "A", ",", "B", ")", ";"]
        );
    }

    #[test]
    fn test_token_positions_are_one_based() {
        let mut tokenizer = Tokenizer::for_str("(A,\nBee);");
        let token = tokenizer.advance().unwrap().unwrap();
        assert_eq!((token.line(), token.column()), (1, 1)); // '('
        tokenizer.advance().unwrap(); // 'A'
        tokenizer.advance().unwrap(); // ','
        let token = tokenizer.advance().unwrap().unwrap();
        assert_eq!(token.text(), "Bee");
        assert_eq!((token.line(), token.column()), (2, 1));
    }

    #[test]
    fn test_quoted_label_with_escaped_quote() {
        let mut tokenizer = Tokenizer::for_str("'Wilson''s_Storm-petrel'");
        let token = tokenizer.advance().unwrap().unwrap();
        assert_eq!(token.text(), "Wilson's_Storm-petrel");
        assert!(token.is_quoted());
    }

    #[test]
    fn test_comments_accumulate_until_drained() {
        let mut tokenizer = Tokenizer::for_str("[one](A[two][three],B);");
        tokenizer.advance().unwrap(); // '(' - captures [one]
        assert_eq!(tokenizer.drain_comments(), vec!["one"]);
        tokenizer.advance().unwrap(); // 'A'
        tokenizer.advance().unwrap(); // ',' - captures [two] and [three]
        assert_eq!(tokenizer.drain_comments(), vec!["two", "three"]);
        assert!(tokenizer.drain_comments().is_empty());
    }

    #[test]
    fn test_undrained_comments_leak_into_next_drain() {
        let mut tokenizer = Tokenizer::for_str("[a](A[b],B);");
        tokenizer.advance().unwrap(); // '('
        tokenizer.advance().unwrap(); // 'A'
        tokenizer.advance().unwrap(); // ','
        // [a] was never drained, so it arrives together with [b]
        assert_eq!(tokenizer.drain_comments(), vec!["a", "b"]);
    }

    #[test]
    fn test_unclosed_comment_is_an_error() {
        let mut tokenizer = Tokenizer::for_str("(A,B[oops");
        let mut result = Ok(None);
        for _ in 0..8 {
            result = tokenizer.advance().map(|t| t.cloned());
            if result.is_err() {
                break;
            }
        }
        let err = result.unwrap_err();
        assert_eq!(*err.kind(), ParseErrorKind::UnclosedComment);
    }

    #[test]
    fn test_require_advance_at_end_of_stream() {
        let mut tokenizer = Tokenizer::for_str("A");
        tokenizer.advance().unwrap();
        let err = tokenizer.require_advance().unwrap_err();
        assert!(matches!(
            err.kind(),
            ParseErrorKind::IncompleteTreeStatement(_)
        ));
    }
}
