//! InputReader - turns a byte stream into chunks

use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};
use contracts::{Chunk, ContractError, ReplicationMode};
use tracing::{debug, trace};

use crate::config::{ReaderConfig, ReaderStats};

/// Chunking reader over the input stream
///
/// Reads block until data, end-of-input or an error arrives.
pub struct InputReader<R> {
    inner: R,
    config: ReaderConfig,
    /// Bytes read but not yet emitted (line mode)
    pending: BytesMut,
    eof: bool,
    stats: ReaderStats,
}

impl<R: Read> InputReader<R> {
    pub fn new(inner: R, config: ReaderConfig) -> Self {
        Self {
            inner,
            config,
            pending: BytesMut::with_capacity(config.line_capacity + 1),
            eof: false,
            stats: ReaderStats::default(),
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    /// Next chunk, or `None` at end-of-input
    ///
    /// # Errors
    /// [`ContractError::ReadFailed`] on any read error other than `Interrupted`
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, ContractError> {
        let chunk = match self.config.mode {
            ReplicationMode::Block => self.next_block()?,
            ReplicationMode::Line => self.next_line()?,
        };

        if let Some(ref chunk) = chunk {
            self.stats.chunks += 1;
            self.stats.bytes += chunk.len() as u64;
            if chunk.is_truncated() {
                self.stats.truncated_lines += 1;
            }
            trace!(len = chunk.len(), kind = ?chunk.kind, "Chunk read");
        }

        Ok(chunk)
    }

    fn next_block(&mut self) -> Result<Option<Chunk>, ContractError> {
        let mut buf = BytesMut::zeroed(self.config.block_size);
        let n = self.read_some(&mut buf)?;
        if n == 0 {
            debug!("End of input");
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some(Chunk::block(buf.freeze())))
    }

    fn next_line(&mut self) -> Result<Option<Chunk>, ContractError> {
        let capacity = self.config.line_capacity;

        loop {
            // A terminator (`\n` or `\r\n`) right after `capacity` bytes still
            // ends a whole record
            let limit = if self.pending.get(capacity) == Some(&b'\r') {
                capacity + 2
            } else {
                capacity + 1
            };
            let window = self.pending.len().min(limit);
            if let Some(pos) = self.pending[..window].iter().position(|&b| b == b'\n') {
                let mut line = self.pending.split_to(pos);
                self.pending.advance(1);
                if line.last() == Some(&b'\r') {
                    line.truncate(line.len() - 1);
                }
                return Ok(Some(Chunk::line(line.freeze())));
            }

            if self.pending.len() >= limit {
                let prefix = self.pending.split_to(capacity);
                return Ok(Some(Chunk::truncated_line(prefix.freeze())));
            }

            if self.eof {
                if self.pending.is_empty() {
                    debug!("End of input");
                    return Ok(None);
                }
                // Unterminated last line
                let rest = self.pending.split();
                return Ok(Some(Chunk::line(rest.freeze())));
            }

            self.fill()?;
        }
    }

    /// Read one more block into `pending`
    fn fill(&mut self) -> Result<(), ContractError> {
        let mut buf = vec![0u8; self.config.block_size];
        let n = self.read_some(&mut buf)?;
        if n == 0 {
            self.eof = true;
        } else {
            self.pending.extend_from_slice(&buf[..n]);
        }
        Ok(())
    }

    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize, ContractError> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ContractError::ReadFailed(e)),
            }
        }
    }
}
