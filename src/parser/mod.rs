//! Low-level parsing machinery: byte sources, the tokenizer, and errors.
pub(crate) mod buffered_byte_source;
pub(crate) mod byte_source;
pub(crate) mod in_memory_byte_source;
pub mod parsing_error;
pub mod tokenizer;

pub use buffered_byte_source::BufferedByteSource;
pub use byte_source::ByteSource;
pub use in_memory_byte_source::InMemoryByteSource;
pub use parsing_error::{ParseError, ParseErrorKind};
pub use tokenizer::{Token, Tokenizer};
