//! # Contracts
//!
//! Shared interface types for the teeline workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Data model
//! - A [`Chunk`] is an immutable byte sequence handed to every sink
//! - A [`RunConfig`] is the validated input to the replicator core
//! - [`ChunkSink`] is the output interface implemented by file sinks

mod chunk;
mod config;
mod error;
mod sink;

pub use chunk::*;
pub use config::*;
pub use error::*;
pub use sink::*;
