//! Byte source abstractions for the tokenizer.
//!
//! This module provides the [ByteSource] trait, which abstracts over the
//! different ways the tokenizer can pull bytes from a Newick data source.

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================T=
/// Trait defining the interface for byte sources consumed by the
/// [Tokenizer](crate::parser::Tokenizer).
///
/// This trait abstracts over different ways of accessing byte data:
/// - In-memory byte buffers (strings, `Vec<u8>`, whole files)
/// - Buffered reading from files (`BufReader<File>`)
///
/// By using this trait, the same tokenizer and parser logic works both for
/// small inputs loaded entirely into memory and for large tree files streamed
/// from disk. The stream is strictly forward-only: a tokenizer consumes each
/// byte at most once and never seeks back.
pub trait ByteSource {
    /// Peek at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    fn peek(&mut self) -> Option<u8>;

    /// Get the current byte and advance the position (consume it).
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns up to `k` bytes from the current position for error context,
    /// without consuming them.
    ///
    /// Implementations may return fewer than `k` bytes if the end of data is
    /// near or if their internal buffer holds less.
    ///
    /// # Arguments
    /// * `k` - Maximum number of bytes to retrieve
    fn get_context(&mut self, k: usize) -> Vec<u8>;

    /// Check if at end of data.
    ///
    /// # Returns
    /// `true` if at or beyond the end of data, `false` otherwise
    fn is_eof(&mut self) -> bool;
}
