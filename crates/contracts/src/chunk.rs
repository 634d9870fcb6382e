//! Chunk - the unit of replication

use bytes::{BufMut, Bytes, BytesMut};

/// How a chunk was produced by the input reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// Fixed-size block, replicated verbatim
    Block,
    /// Newline-delimited record (terminator stripped)
    Line,
    /// Prefix of a record that exceeded the reader's line capacity
    TruncatedLine,
}

/// Immutable byte sequence read from the input stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub data: Bytes,
    pub kind: ChunkKind,
}

impl Chunk {
    /// Create a block chunk
    pub fn block(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            kind: ChunkKind::Block,
        }
    }

    /// Create a line record
    pub fn line(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            kind: ChunkKind::Line,
        }
    }

    /// Create a truncated line record
    pub fn truncated_line(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            kind: ChunkKind::TruncatedLine,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether this chunk is a line record cut at the reader's capacity
    pub fn is_truncated(&self) -> bool {
        self.kind == ChunkKind::TruncatedLine
    }

    /// Bytes as they must land in every sink.
    ///
    /// Blocks are returned verbatim. Line records (truncated or not) get
    /// exactly one trailing newline.
    pub fn to_wire(&self) -> Bytes {
        match self.kind {
            ChunkKind::Block => self.data.clone(),
            ChunkKind::Line | ChunkKind::TruncatedLine => {
                let mut buf = BytesMut::with_capacity(self.data.len() + 1);
                buf.put_slice(&self.data);
                buf.put_u8(b'\n');
                buf.freeze()
            }
        }
    }
}
