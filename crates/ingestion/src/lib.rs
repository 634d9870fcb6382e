//! # Ingestion
//!
//! Input stream chunking.
//!
//! Responsibilities:
//! - Wrap the input byte stream
//! - Produce fixed-size blocks (block mode)
//! - Produce newline-delimited records bounded by a line capacity (line mode)
//!
//! ## Usage Example
//!
//! ```no_run
//! use ingestion::{InputReader, ReaderConfig};
//!
//! let mut reader = InputReader::new(std::io::stdin(), ReaderConfig::default());
//! while let Some(chunk) = reader.next_chunk().unwrap() {
//!     // Fan out chunk.to_wire()
//! }
//! ```

mod config;
mod error;
mod reader;

// Re-exports
pub use config::{ReaderConfig, ReaderStats};
pub use contracts::{Chunk, ChunkKind, ReplicationMode};
pub use error::{IngestionError, Result};
pub use reader::InputReader;
