//! Rotated-log reading
//!
//! Snapshots a directory of rotated log files at construction, orders them
//! by modification time, and on [`LogReader::read`] streams every line whose
//! timestamp falls inside the requested window: the boundary file is entered
//! at the offset located by the time index, every later file is copied in
//! full.
//!
//! The reader relies on two properties of rotated access logs: lines within
//! a file are non-decreasing in timestamp, and a file's modification time is
//! the timestamp of its last line. Violating them yields wrong output, never
//! a hang.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::cancel::CancelToken;
use crate::config::ReaderConfig;
use crate::error::{Error, Result};
use crate::index::LogFile;
use crate::metrics::MetricsCollector;
use crate::seek::SEEK_BUFFER_LEN;

/// Clock used to derive the window threshold; overridable for tests
pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Immutable snapshot of one log file, taken at reader construction
#[derive(Debug, Clone)]
pub(crate) struct FileMeta {
    /// File name within the log directory
    name: String,
    /// Modification time, normalized to UTC
    mod_time: DateTime<Utc>,
    /// Size in bytes at snapshot time
    size: u64,
}

/// Reads the last N minutes' worth of log lines from a directory of
/// rotated log files
pub struct LogReader {
    cfg: ReaderConfig,
    files: Vec<FileMeta>,
    clock: Clock,
    metrics: Arc<MetricsCollector>,
}

impl std::fmt::Debug for LogReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogReader")
            .field("cfg", &self.cfg)
            .field("files", &self.files)
            .finish_non_exhaustive()
    }
}

impl LogReader {
    /// Snapshot the directory and build a reader.
    ///
    /// Direct children that are not regular files are skipped. The snapshot
    /// is taken once; files created or touched afterwards are not observed.
    pub fn new(cfg: ReaderConfig) -> Result<Self> {
        cfg.validate()?;

        let entries =
            fs::read_dir(&cfg.directory).map_err(|e| Error::directory(&cfg.directory, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::directory(&cfg.directory, e))?;
            let metadata = entry
                .metadata()
                .map_err(|e| Error::directory(&cfg.directory, e))?;
            if !metadata.is_file() {
                continue;
            }

            files.push(FileMeta {
                name: entry.file_name().to_string_lossy().into_owned(),
                mod_time: DateTime::<Utc>::from(metadata.modified()?),
                size: metadata.len(),
            });
        }

        // Modification time is the canonical order across rotated files;
        // rotation stamps each file with its last line's timestamp.
        files.sort_by(|a, b| a.mod_time.cmp(&b.mod_time));
        debug!("snapshotted {} files in {}", files.len(), cfg.directory.display());

        Ok(Self {
            cfg,
            files,
            clock: Box::new(Utc::now),
            metrics: Arc::new(MetricsCollector::new()),
        })
    }

    /// Override the clock used to compute the window threshold
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    /// Metrics collected across this reader's operations
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        Arc::clone(&self.metrics)
    }

    /// Stream every log line from the last `last_n_minutes` to `sink`.
    ///
    /// Output is ordered by file modification time, then byte order within
    /// each file, and preserves line bytes exactly. A token signaled before
    /// work starts (or between files) makes the read return successfully
    /// with whatever was already written.
    pub fn read<W: Write>(&self, cancel: &CancelToken, sink: W) -> Result<()> {
        if cancel.is_cancelled() {
            return Ok(());
        }
        let started = Instant::now();

        let threshold = (self.clock)() - Duration::minutes(i64::from(self.cfg.last_n_minutes));

        // The boundary file is the oldest file still modified at or after
        // the threshold; everything before it ended too early to matter.
        let Some(first) = self.files.iter().position(|f| f.mod_time >= threshold) else {
            debug!("no file modified at or after {}", threshold);
            return Ok(());
        };

        let mut sink = BufWriter::new(sink);

        let boundary = &self.files[first];
        let mut log_file = LogFile::new(self.open(boundary)?);

        let search_started = Instant::now();
        let offset = log_file.index_time(threshold)?;
        self.metrics.increment_searches();
        self.metrics.record_search_duration(search_started.elapsed());
        debug!("first in-range offset in {} is {}", boundary.name, offset);

        if offset >= 0 {
            let mut file = log_file.into_inner();
            file.seek(SeekFrom::Start(offset as u64))?;
            self.stream_lines(BufReader::with_capacity(SEEK_BUFFER_LEN, file), &mut sink)?;
            self.metrics.increment_files_streamed();
        } else {
            // Nothing in range in the boundary file: the window can only
            // open in a later file, and only if one was still being written
            // at the threshold instant.
            match self.files.get(first + 1) {
                Some(next) if threshold <= next.mod_time => {}
                _ => {
                    self.metrics.record_read_duration(started.elapsed());
                    return Ok(());
                }
            }
        }

        for meta in &self.files[first + 1..] {
            if cancel.is_cancelled() {
                break;
            }
            let file = self.open(meta)?;
            self.stream_lines(BufReader::with_capacity(SEEK_BUFFER_LEN, file), &mut sink)?;
            self.metrics.increment_files_streamed();
        }

        sink.flush()?;
        self.metrics.record_read_duration(started.elapsed());
        Ok(())
    }

    fn open(&self, meta: &FileMeta) -> Result<File> {
        let path = self.cfg.directory.join(&meta.name);
        debug!("opening {} ({} bytes)", path.display(), meta.size);
        File::open(&path).map_err(|e| Error::open(&path, e))
    }

    /// Copy lines to the sink, preserving terminators and flushing after
    /// each line so the tail shows up promptly.
    fn stream_lines<R: BufRead, W: Write>(&self, mut reader: R, sink: &mut W) -> Result<()> {
        let mut line = Vec::new();
        loop {
            line.clear();
            let n = reader.read_until(b'\n', &mut line)?;
            if n == 0 {
                break;
            }
            sink.write_all(&line)?;
            sink.flush()?;
            self.metrics.increment_lines_emitted();
            self.metrics.add_bytes_emitted(n);
        }
        Ok(())
    }
}
