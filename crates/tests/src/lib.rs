//! # Integration Tests
//!
//! End-to-end tests across the workspace.
//!
//! Covers:
//! - Contract smoke tests
//! - config → replicator → files, without a terminal or signals
//! - Failure isolation with real file sinks

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let config = contracts::RunConfig::new(Vec::new());
        assert_eq!(config.mode, contracts::ReplicationMode::Block);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::io::{self, Cursor, Write};
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use config_loader::{ConfigFormat, ConfigLoader, ModeSelector, RunOptions};
    use replicator::{
        InterruptOutcome, InterruptSignal, Phase, Replicator, EXIT_FAILURE, EXIT_SUCCESS,
    };
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn bytes(&self) -> Vec<u8> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn options(files: Vec<PathBuf>) -> RunOptions {
        RunOptions {
            files,
            ..Default::default()
        }
    }

    /// End-to-end: CLI options → ConfigLoader → Replicator → files + echo
    ///
    /// Verifies:
    /// 1. Glob paths never reach the core
    /// 2. Every file and the echo carry the same bytes as the input
    #[test]
    fn test_e2e_block_replication() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.out");
        let b = dir.path().join("b.out");
        let glob = dir.path().join("*.out");

        let config =
            ConfigLoader::build(None, options(vec![a.clone(), glob, b.clone()]), false).unwrap();
        assert_eq!(config.outputs, vec![a.clone(), b.clone()]);

        let input: Vec<u8> = (0..50_000u32).map(|i| (i % 253) as u8).collect();
        let echo = Captured::default();
        let summary = Replicator::new(config).run(Cursor::new(input.clone()), echo.clone());

        assert_eq!(summary.status, EXIT_SUCCESS);
        assert_eq!(summary.sinks_opened, 2);
        assert_eq!(fs::read(&a).unwrap(), input);
        assert_eq!(fs::read(&b).unwrap(), input);
        assert_eq!(echo.bytes(), input);
    }

    #[test]
    fn test_e2e_line_mode_from_profile() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.log");
        let b = dir.path().join("b.log");
        let profile = format!(
            "outputs = [{:?}, {:?}]\nmode = \"line\"\nline_capacity = 8\n",
            a.display().to_string(),
            b.display().to_string()
        );

        let profile = ConfigLoader::load_profile_from_str(&profile, ConfigFormat::Toml).unwrap();
        let config = ConfigLoader::build(Some(profile), RunOptions::default(), false).unwrap();

        let summary = Replicator::new(config).run(
            Cursor::new(b"a\r\nb\nthis line is long\nend".to_vec()),
            io::sink(),
        );

        let expected = b"a\nb\nthis lin\ne is lon\ng\nend\n";
        assert!(summary.is_success());
        assert_eq!(summary.truncated_lines, 2);
        assert_eq!(fs::read(&a).unwrap(), expected);
        assert_eq!(fs::read(&b).unwrap(), expected);
    }

    #[test]
    fn test_e2e_append_across_runs() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("journal.txt");

        for chunk in [&b"one\n"[..], b"two\n"] {
            let config = ConfigLoader::build(
                None,
                RunOptions {
                    append: true,
                    no_echo: true,
                    ..options(vec![out.clone()])
                },
                false,
            )
            .unwrap();
            Replicator::new(config).run(Cursor::new(chunk.to_vec()), io::sink());
        }

        assert_eq!(fs::read(&out).unwrap(), b"one\ntwo\n");
    }

    #[test]
    fn test_e2e_bad_destination_is_skipped() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("no_such_dir").join("bad.txt");

        let config =
            ConfigLoader::build(None, options(vec![bad.clone(), good.clone()]), false).unwrap();
        let summary = Replicator::new(config).run(Cursor::new(b"payload".to_vec()), io::sink());

        assert_eq!(summary.status, EXIT_SUCCESS);
        assert_eq!(summary.sinks_opened, 1);
        assert_eq!(fs::read(&good).unwrap(), b"payload");
        assert!(!bad.exists());
    }

    #[test]
    fn test_e2e_all_destinations_invalid() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("missing").join("out.txt");
        let echo = Captured::default();

        let config = ConfigLoader::build(None, options(vec![bad]), false).unwrap();
        let summary = Replicator::new(config).run(Cursor::new(b"lost".to_vec()), echo.clone());

        assert_eq!(summary.status, EXIT_FAILURE);
        assert_eq!(summary.phase, Phase::Terminated);
        assert!(echo.bytes().is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_e2e_failing_sink_is_isolated() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let c = dir.path().join("c.txt");

        let config = ConfigLoader::build(
            None,
            RunOptions {
                mode: Some(ModeSelector::Block),
                block_size: Some(4),
                ..options(vec![a.clone(), PathBuf::from("/dev/full"), c.clone()])
            },
            false,
        )
        .unwrap();

        let summary =
            Replicator::new(config).run(Cursor::new(b"0123456789".to_vec()), io::sink());

        assert_eq!(summary.status, EXIT_SUCCESS);
        assert_eq!(summary.sinks_failed, 1);
        assert_eq!(fs::read(&a).unwrap(), b"0123456789");
        assert_eq!(fs::read(&c).unwrap(), b"0123456789");
    }

    #[test]
    fn test_e2e_interrupt_from_another_thread() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.txt");

        let config = ConfigLoader::build(None, options(vec![out.clone()]), false).unwrap();
        let replicator = Replicator::new(config);
        let controller = replicator.controller();

        // Input that never ends on its own
        let (mut tx, rx) = pipe_pair();
        tx.write_all(b"before signal").unwrap();

        let worker = std::thread::spawn(move || replicator.run(rx, io::sink()));

        // Wait until the bytes were accepted by the sink
        wait_until(|| fs::read(&out).map(|b| b == b"before signal").unwrap_or(false));

        assert_eq!(
            controller.interrupt(InterruptSignal::Interrupt),
            InterruptOutcome::Shutdown { code: EXIT_FAILURE }
        );
        assert_eq!(fs::read(&out).unwrap(), b"before signal");

        // Unblock the reader so the worker can observe the drain
        tx.write_all(b"after signal").unwrap();
        drop(tx);

        let summary = worker.join().unwrap();
        assert_eq!(summary.status, EXIT_FAILURE);
        assert!(summary.interrupted);
        assert_eq!(controller.drain_count(), 1);
        assert_eq!(fs::read(&out).unwrap(), b"before signal");
    }

    /// In-memory blocking pipe
    fn pipe_pair() -> (PipeWriter, PipeReader) {
        let (tx, rx) = std::sync::mpsc::channel::<Vec<u8>>();
        (PipeWriter(tx), PipeReader { rx, buf: Vec::new() })
    }

    struct PipeWriter(std::sync::mpsc::Sender<Vec<u8>>);

    impl Write for PipeWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .send(buf.to_vec())
                .map_err(|_| io::Error::from(io::ErrorKind::BrokenPipe))?;
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct PipeReader {
        rx: std::sync::mpsc::Receiver<Vec<u8>>,
        buf: Vec<u8>,
    }

    impl io::Read for PipeReader {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            if self.buf.is_empty() {
                match self.rx.recv() {
                    Ok(bytes) => self.buf = bytes,
                    Err(_) => return Ok(0),
                }
            }
            let n = out.len().min(self.buf.len());
            out[..n].copy_from_slice(&self.buf[..n]);
            self.buf.drain(..n);
            Ok(n)
        }
    }

    fn wait_until(mut cond: impl FnMut() -> bool) {
        for _ in 0..500 {
            if cond() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        panic!("condition not met in time");
    }
}
