//! FileSink - writes replicated bytes to a destination file

use contracts::{ChunkSink, ContractError};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Sink that owns one destination file and its buffered writer
pub struct FileSink {
    name: String,
    path: PathBuf,
    /// `None` once closed
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    /// Open a destination file
    ///
    /// A missing file is created. An existing file is truncated unless
    /// `append` is set.
    ///
    /// # Errors
    /// [`ContractError::SinkOpenFailed`] on bad path or permission denied
    #[instrument(name = "file_sink_open", skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, append: bool) -> Result<Self, ContractError> {
        let path = path.as_ref();

        let mut options = OpenOptions::new();
        options.write(true).create(true);
        if append {
            options.append(true);
        } else {
            options.truncate(true);
        }

        let file = options
            .open(path)
            .map_err(|e| ContractError::sink_open(path, e))?;

        debug!(path = %path.display(), append, "FileSink opened");

        Ok(Self {
            name: path.display().to_string(),
            path: path.to_path_buf(),
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    fn closed_error(&self) -> ContractError {
        ContractError::write_failed(
            &self.path,
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink already closed"),
        )
    }
}

impl ChunkSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    /// Buffer and flush synchronously, so readers of the file see data promptly
    #[instrument(name = "file_sink_write", skip(self, bytes), fields(sink = %self.name))]
    fn write(&mut self, bytes: &[u8]) -> Result<(), ContractError> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(self.closed_error());
        };

        writer
            .write_all(bytes)
            .and_then(|()| writer.flush())
            .map_err(|e| ContractError::write_failed(&self.path, e))
    }

    /// Best-effort flush, then release the handle. A second call is a no-op.
    #[instrument(name = "file_sink_close", skip(self), fields(sink = %self.name))]
    fn close(&mut self) -> Result<(), ContractError> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };

        let result = writer
            .flush()
            .map_err(|e| ContractError::write_failed(&self.path, e));
        // Dropping the writer releases the handle even if the flush failed
        drop(writer);

        debug!(sink = %self.name, "FileSink closed");
        result
    }
}
