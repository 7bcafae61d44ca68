//! Buffered reader implementation of byte source for the tokenizer.
//!
//! This module provides [BufferedByteSource], which wraps a file in a
//! [BufReader] for efficient streaming I/O. Use this for large tree files
//! where loading everything into memory would be impractical.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::parser::byte_source::ByteSource;

// =#========================================================================#=
// BUFFERED BYTE SOURCE
// =#========================================================================$=
/// A buffered byte source for streaming large files.
///
/// Uses [BufReader] for efficient disk I/O. Since the tokenizer only ever
/// peeks a single byte ahead, no additional buffering layer is needed; error
/// context is limited to whatever the reader currently holds, which is plenty
/// for the short excerpts attached to parse errors.
pub struct BufferedByteSource {
    /// Underlying reader of file, handles getting chunks from file
    reader: BufReader<File>,
}

impl BufferedByteSource {
    /// Creates a new buffered byte source from a file path.
    ///
    /// # Arguments
    /// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<BufferedByteSource> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(Self { reader })
    }
}

impl ByteSource for BufferedByteSource {
    fn peek(&mut self) -> Option<u8> {
        let buf = self.reader.fill_buf().ok()?;
        buf.first().copied()
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.reader.consume(1);
        Some(byte)
    }

    fn get_context(&mut self, k: usize) -> Vec<u8> {
        match self.reader.fill_buf() {
            Ok(buf) => buf[..k.min(buf.len())].to_vec(),
            Err(_) => Vec::new(),
        }
    }

    fn is_eof(&mut self) -> bool {
        match self.reader.fill_buf() {
            Ok(buf) => buf.is_empty(),
            Err(_) => true,
        }
    }
}
