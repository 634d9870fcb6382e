//! ChunkSink trait - output interface for replicated chunks
//!
//! Defines the abstract interface for sinks.

use crate::ContractError;

/// Destination for replicated bytes
///
/// All sink implementations must implement this trait.
pub trait ChunkSink: Send {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write bytes and make them durable before returning
    ///
    /// # Errors
    /// Returns [`ContractError::WriteFailed`] (should include context)
    fn write(&mut self, bytes: &[u8]) -> Result<(), ContractError>;

    /// Flush buffered bytes and release the destination
    fn close(&mut self) -> Result<(), ContractError>;
}
