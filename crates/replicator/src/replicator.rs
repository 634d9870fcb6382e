//! Replicator - orchestrates input → sink set (+ echo)

use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Instant;

use contracts::{ContractError, RunConfig};
use dispatcher::SinkSet;
use ingestion::{InputReader, ReaderConfig};
use tracing::{debug, error, info, instrument, warn};

use crate::outputs::{EchoOutput, Outputs};
use crate::shutdown::ShutdownController;
use crate::state::{Phase, RunState};
use crate::stats::RunSummary;

/// Stream replicator
///
/// One instance per run. The [`ShutdownController`] obtained from
/// [`Replicator::controller`] is the only way the interrupt path reaches
/// the outputs.
pub struct Replicator {
    config: RunConfig,
    state: Arc<RunState>,
    controller: ShutdownController,
    phase: Phase,
}

impl Replicator {
    pub fn new(config: RunConfig) -> Self {
        let state = Arc::new(RunState::from(&config));
        let controller = ShutdownController::new(Arc::clone(&state));
        Self {
            config,
            state,
            controller,
            phase: Phase::Idle,
        }
    }

    /// Handle for the interrupt listener
    pub fn controller(&self) -> ShutdownController {
        self.controller.clone()
    }

    pub fn state(&self) -> &Arc<RunState> {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "Phase transition");
        self.phase = next;
    }

    /// Run to completion
    ///
    /// `echo` receives the replicated bytes when echo is enabled and is
    /// dropped unused otherwise.
    #[instrument(name = "replicator_run", skip_all, fields(mode = ?self.config.mode, outputs = self.config.outputs.len()))]
    pub fn run<R, W>(mut self, input: R, echo: W) -> RunSummary
    where
        R: Read,
        W: Write + Send + 'static,
    {
        let start = Instant::now();
        let mut summary = RunSummary::default();

        // Idle
        let reader_config = ReaderConfig::from(&self.config);
        if let Err(e) = reader_config.validate() {
            error!(error = %ContractError::from(e), "Invalid reader configuration");
            self.state.fail();
            return self.terminate(summary, start);
        }

        let sinks = match SinkSet::open_all(&self.config.outputs, self.config.append) {
            Ok(sinks) => sinks,
            Err(e) => {
                error!(error = %e, "Nothing to replicate to");
                self.state.fail();
                return self.terminate(summary, start);
            }
        };
        summary.sinks_opened = sinks.len();

        let echo = self.state.echo_enabled.then(|| EchoOutput::new(echo));
        if !self.controller.install(Outputs::new(sinks, echo)) {
            summary.interrupted = true;
            return self.terminate(summary, start);
        }

        // Streaming
        self.transition(Phase::Streaming);
        let mut reader = InputReader::new(input, reader_config);
        self.stream(&mut reader, &mut summary);
        let stats = reader.stats();
        summary.chunks = stats.chunks;
        summary.bytes = stats.bytes;
        summary.truncated_lines = stats.truncated_lines;

        // Draining
        self.transition(Phase::Draining);
        match self.controller.drain() {
            Some(report) => {
                summary.sinks_failed = report.sinks_total - report.sinks_active;
                if !report.close.is_clean() {
                    warn!(errors = report.close.errors.len(), "Some sinks failed to close cleanly");
                }
            }
            None => summary.interrupted = true,
        }

        self.terminate(summary, start)
    }

    fn stream<R: Read>(&mut self, reader: &mut InputReader<R>, summary: &mut RunSummary) {
        let capacity = reader.config().line_capacity;

        loop {
            let chunk = match reader.next_chunk() {
                Ok(Some(chunk)) => chunk,
                Ok(None) => {
                    debug!("End of input, draining");
                    return;
                }
                Err(e) => {
                    error!(error = %e, "Fatal read error, draining");
                    self.state.fail();
                    return;
                }
            };

            if chunk.is_truncated() {
                warn!(error = %ContractError::line_too_long(capacity), "Continuing with truncated record");
                observability::record_line_too_long();
            }

            let wire = chunk.to_wire();
            let replicated = self.controller.with_outputs(|outputs| {
                let outcome = outputs.replicate(&wire);
                (outcome, outputs.sinks().active_count())
            });
            let Some((outcome, active_sinks)) = replicated else {
                // Interrupt path drained underneath us
                summary.interrupted = true;
                return;
            };

            observability::record_chunk_replicated(wire.len(), active_sinks);
            if outcome.delivered == 0 && !outcome.newly_failed.is_empty() {
                warn!("Every sink has failed; input is still consumed");
            }
        }
    }

    fn terminate(mut self, mut summary: RunSummary, start: Instant) -> RunSummary {
        self.transition(Phase::Terminated);
        summary.phase = self.phase;
        summary.status = self.state.status();
        summary.duration = start.elapsed();

        observability::record_run_status(summary.status);
        info!(
            status = summary.status,
            chunks = summary.chunks,
            bytes = summary.bytes,
            sinks_opened = summary.sinks_opened,
            sinks_failed = summary.sinks_failed,
            truncated_lines = summary.truncated_lines,
            interrupted = summary.interrupted,
            duration_secs = summary.duration.as_secs_f64(),
            "Replication finished"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown::InterruptSignal;
    use crate::state::{EXIT_FAILURE, EXIT_SUCCESS};
    use contracts::ReplicationMode;
    use std::fs;
    use std::io::{self, Cursor};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> Vec<u8> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Yields `chunks` one per read, then fails
    struct ThenFail {
        chunks: Vec<&'static [u8]>,
    }

    impl Read for ThenFail {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.chunks.is_empty() {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "device gone"));
            }
            let chunk = self.chunks.remove(0);
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    /// Delivers an interrupt through the controller after `after` reads
    struct InterruptingReader {
        controller: ShutdownController,
        reads: usize,
        after: usize,
    }

    impl Read for InterruptingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.reads == self.after {
                self.controller.interrupt(InterruptSignal::Interrupt);
            }
            self.reads += 1;
            buf[..4].copy_from_slice(b"tick");
            Ok(4)
        }
    }

    fn config(outputs: Vec<PathBuf>, mode: ReplicationMode) -> RunConfig {
        RunConfig {
            mode,
            ..RunConfig::new(outputs)
        }
    }

    #[test]
    fn test_block_mode_is_byte_exact_with_echo() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        let input: Vec<u8> = (0..10_000u32).map(|i| (i * 7 % 256) as u8).collect();
        let echo = SharedBuf::default();

        let replicator = Replicator::new(config(vec![a.clone(), b.clone()], ReplicationMode::Block));
        let summary = replicator.run(Cursor::new(input.clone()), echo.clone());

        assert_eq!(summary.status, EXIT_SUCCESS);
        assert_eq!(summary.phase, Phase::Terminated);
        assert_eq!(summary.bytes, input.len() as u64);
        assert_eq!(fs::read(&a).unwrap(), input);
        assert_eq!(fs::read(&b).unwrap(), input);
        assert_eq!(echo.contents(), input);
    }

    #[test]
    fn test_echo_disabled_keeps_primary_output_clean() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let echo = SharedBuf::default();

        let mut cfg = config(vec![out.clone()], ReplicationMode::Block);
        cfg.echo = false;
        let summary = Replicator::new(cfg).run(Cursor::new(b"quiet".to_vec()), echo.clone());

        assert!(summary.is_success());
        assert_eq!(fs::read(&out).unwrap(), b"quiet");
        assert!(echo.contents().is_empty());
    }

    #[test]
    fn test_line_mode_two_sinks() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");

        let summary = Replicator::new(config(vec![a.clone(), b.clone()], ReplicationMode::Line))
            .run(Cursor::new(b"a\nb\n".to_vec()), io::sink());

        assert!(summary.is_success());
        assert_eq!(summary.chunks, 2);
        assert_eq!(fs::read(&a).unwrap(), b"a\nb\n");
        assert_eq!(fs::read(&b).unwrap(), b"a\nb\n");
    }

    #[test]
    fn test_line_too_long_is_not_fatal() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("long.txt");
        let echo = SharedBuf::default();

        let mut cfg = config(vec![out.clone()], ReplicationMode::Line);
        cfg.line_capacity = 4;
        let summary = Replicator::new(cfg).run(Cursor::new(b"abcdef\nok\n".to_vec()), echo.clone());

        assert!(summary.is_success());
        assert_eq!(summary.truncated_lines, 1);
        assert_eq!(fs::read(&out).unwrap(), b"abcd\nef\nok\n");
        assert_eq!(echo.contents(), b"abcd\nef\nok\n");
    }

    #[test]
    fn test_append_and_truncate() {
        let dir = tempdir().unwrap();
        let appended = dir.path().join("appended.txt");
        let replaced = dir.path().join("replaced.txt");
        fs::write(&appended, b"OLD").unwrap();
        fs::write(&replaced, b"OLD").unwrap();

        let mut cfg = config(vec![appended.clone()], ReplicationMode::Block);
        cfg.append = true;
        Replicator::new(cfg).run(Cursor::new(b"NEW".to_vec()), io::sink());

        let cfg = config(vec![replaced.clone()], ReplicationMode::Block);
        Replicator::new(cfg).run(Cursor::new(b"NEW".to_vec()), io::sink());

        assert_eq!(fs::read(&appended).unwrap(), b"OLDNEW");
        assert_eq!(fs::read(&replaced).unwrap(), b"NEW");
    }

    #[test]
    fn test_empty_sink_set_exits_with_failure() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("missing").join("out.txt");
        let echo = SharedBuf::default();

        let summary = Replicator::new(config(vec![bad.clone()], ReplicationMode::Block))
            .run(Cursor::new(b"never written".to_vec()), echo.clone());

        assert_eq!(summary.status, EXIT_FAILURE);
        assert_eq!(summary.phase, Phase::Terminated);
        assert_eq!(summary.chunks, 0);
        assert!(!bad.exists());
        assert!(echo.contents().is_empty());
    }

    #[test]
    fn test_read_error_drains_with_failure() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("partial.txt");
        let reader = ThenFail {
            chunks: vec![b"first ", b"second"],
        };

        let summary =
            Replicator::new(config(vec![out.clone()], ReplicationMode::Block)).run(reader, io::sink());

        assert_eq!(summary.status, EXIT_FAILURE);
        assert!(!summary.interrupted);
        assert_eq!(fs::read(&out).unwrap(), b"first second");
    }

    #[test]
    fn test_interrupt_mid_stream_closes_once() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("interrupted.txt");

        let replicator = Replicator::new(config(vec![out.clone()], ReplicationMode::Block));
        let controller = replicator.controller();
        let reader = InterruptingReader {
            controller: controller.clone(),
            reads: 0,
            after: 3,
        };

        let summary = replicator.run(reader, io::sink());

        assert_eq!(summary.status, EXIT_FAILURE);
        assert!(summary.interrupted);
        assert_eq!(controller.drain_count(), 1);
        assert_eq!(fs::read(&out).unwrap(), b"tickticktick");
    }

    #[test]
    fn test_ignored_interrupt_does_not_stop_run() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("ignored.txt");

        let mut cfg = config(vec![out.clone()], ReplicationMode::Block);
        cfg.ignore_interrupts = true;
        let replicator = Replicator::new(cfg);
        let controller = replicator.controller();
        controller.interrupt(InterruptSignal::Interrupt);

        let summary = replicator.run(Cursor::new(b"kept going".to_vec()), io::sink());

        assert!(summary.is_success());
        assert!(!summary.interrupted);
        assert_eq!(controller.drain_count(), 1);
        assert_eq!(fs::read(&out).unwrap(), b"kept going");
    }
}
