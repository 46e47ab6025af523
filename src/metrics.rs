//! Read-path metrics
//!
//! Counters describing what a reader did: searches run, files streamed,
//! lines and bytes emitted, and how long the work took.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Metrics collector shared by a reader's operations
#[derive(Debug)]
pub struct MetricsCollector {
    /// Number of time-index searches run
    search_count: AtomicUsize,
    /// Number of files streamed to the sink
    files_streamed: AtomicUsize,
    /// Number of log lines emitted
    lines_emitted: AtomicUsize,
    /// Total bytes emitted
    bytes_emitted: AtomicUsize,

    /// Total search duration in nanoseconds
    search_duration_ns: AtomicU64,
    /// Total read duration in nanoseconds
    read_duration_ns: AtomicU64,
    /// Duration of the most recent read
    last_read_duration: Mutex<Duration>,

    /// When this collector was created
    start_time: Instant,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            search_count: AtomicUsize::new(0),
            files_streamed: AtomicUsize::new(0),
            lines_emitted: AtomicUsize::new(0),
            bytes_emitted: AtomicUsize::new(0),
            search_duration_ns: AtomicU64::new(0),
            read_duration_ns: AtomicU64::new(0),
            last_read_duration: Mutex::new(Duration::from_secs(0)),
            start_time: Instant::now(),
        }
    }

    /// Increment the search count
    pub fn increment_searches(&self) {
        self.search_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the streamed-file count
    pub fn increment_files_streamed(&self) {
        self.files_streamed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the emitted-line count
    pub fn increment_lines_emitted(&self) {
        self.lines_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Add emitted bytes
    pub fn add_bytes_emitted(&self, bytes: usize) {
        self.bytes_emitted.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record the duration of one time-index search
    pub fn record_search_duration(&self, duration: Duration) {
        self.search_duration_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Record the duration of one complete read
    pub fn record_read_duration(&self, duration: Duration) {
        self.read_duration_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        *self.last_read_duration.lock() = duration;
    }

    /// Snapshot the current counters
    pub fn snapshot(&self) -> ReadStats {
        ReadStats {
            search_count: self.search_count.load(Ordering::Relaxed),
            files_streamed: self.files_streamed.load(Ordering::Relaxed),
            lines_emitted: self.lines_emitted.load(Ordering::Relaxed),
            bytes_emitted: self.bytes_emitted.load(Ordering::Relaxed),
            total_search_duration: Duration::from_nanos(
                self.search_duration_ns.load(Ordering::Relaxed),
            ),
            total_read_duration: Duration::from_nanos(
                self.read_duration_ns.load(Ordering::Relaxed),
            ),
            last_read_duration: *self.last_read_duration.lock(),
            uptime: self.start_time.elapsed(),
        }
    }
}

/// Point-in-time view of a [`MetricsCollector`]
#[derive(Debug, Clone, Default)]
pub struct ReadStats {
    /// Number of time-index searches run
    pub search_count: usize,
    /// Number of files streamed to the sink
    pub files_streamed: usize,
    /// Number of log lines emitted
    pub lines_emitted: usize,
    /// Total bytes emitted
    pub bytes_emitted: usize,
    /// Total time spent in time-index searches
    pub total_search_duration: Duration,
    /// Total time spent in reads
    pub total_read_duration: Duration,
    /// Duration of the most recent read
    pub last_read_duration: Duration,
    /// Age of the collector
    pub uptime: Duration,
}
