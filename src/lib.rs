//! Time-indexed reading of rotated web-server access logs
//!
//! logseek emits every Apache Common Log Format line written in the last N
//! minutes from a directory of rotated log files. Instead of scanning each
//! file from the top, it binary-searches byte offsets of the boundary file —
//! snapping every probe to a line start and comparing the line's embedded
//! timestamp — so a multi-gigabyte file costs a handful of reads, then
//! streams the located tail and every later file to a sink.
//!
//! # Example
//!
//! ```no_run
//! use logseek::{CancelToken, LogReader, ReaderConfig};
//!
//! fn main() -> logseek::Result<()> {
//!     let cfg = ReaderConfig::new()
//!         .with_directory("/var/log/http")
//!         .with_last_n_minutes(5);
//!
//!     let reader = LogReader::new(cfg)?;
//!     reader.read(&CancelToken::new(), std::io::stdout().lock())
//! }
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod index;
pub mod metrics;
pub mod reader;
pub mod seek;

pub use cancel::CancelToken;
pub use config::ReaderConfig;
pub use error::{Error, Result};
pub use index::{parse_log_time, LogFile};
pub use metrics::{MetricsCollector, ReadStats};
pub use reader::LogReader;
pub use seek::{seek_line, Whence, SEEK_BUFFER_LEN};
