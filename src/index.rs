//! Time index over a single log file
//!
//! Locates the first line of a timestamp-sorted Apache Common Log Format
//! file whose timestamp is at or after a target instant, by binary search
//! over byte positions snapped to line boundaries. Cost is O(log size)
//! probes, each reading one line, so a multi-gigabyte file resolves in a
//! handful of reads.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use log::trace;
use regex::Regex;

use crate::error::{Error, Result};
use crate::seek::{seek_line, Whence, SEEK_BUFFER_LEN};

/// Name of the capture group holding the bracketed datetime field
const DATE_TIME_GROUP: &str = "datetime";

/// Parse format for the datetime field, e.g. `03/Mar/2022:10:00:10 +0000`
pub const DATE_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Apache Common Log Format line shape. Only the datetime capture is
/// consumed; the remaining groups pin down the surrounding structure.
static LOG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(\S+) (\S+) (\S+) \[(?P<datetime>[\w:/]+\s[+\-]\d{4})\] "(\S+)\s?(\S+)?\s?(\S+)?" (\d{3}|-) (\d+|-)\s?"?([^"]*)"?\s?"?([^"]*)?"?$"#,
    )
    .expect("log line pattern is valid")
});

/// Extract the timestamp of a single log line, normalized to UTC.
///
/// Fails with [`Error::InvalidLogFormat`] when the line does not match the
/// Common Log Format shape, and with [`Error::InvalidTimestamp`] when the
/// bracketed field matched but does not parse as a real instant (for
/// example a day of 36).
pub fn parse_log_time(line: &str) -> Result<DateTime<Utc>> {
    let captures = LOG_LINE
        .captures(line)
        .ok_or_else(|| Error::invalid_log_format(line))?;

    let datetime = captures
        .name(DATE_TIME_GROUP)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::invalid_log_format(line))?;

    let parsed = DateTime::parse_from_str(datetime, DATE_TIME_FORMAT)
        .map_err(|e| Error::invalid_timestamp(line, e))?;

    Ok(parsed.with_timezone(&Utc))
}

/// A timestamp-sorted log file open for indexed reading
pub struct LogFile {
    file: File,
}

impl LogFile {
    /// Wrap an open log file
    pub fn new(file: File) -> Self {
        Self { file }
    }

    /// Unwrap the underlying file, leaving its cursor untouched
    pub fn into_inner(self) -> File {
        self.file
    }

    /// Return the byte offset of the first line whose timestamp is at or
    /// after `target`, or −1 when no line qualifies.
    ///
    /// Requires the file's lines to be non-decreasing in timestamp; the
    /// search always narrows its range, so unsorted input yields a wrong
    /// offset but never a loop. Any probed line that is not well-formed
    /// aborts the search with an error.
    pub fn index_time(&mut self, target: DateTime<Utc>) -> Result<i64> {
        let size = self.file.metadata()?.len();

        // Both bounds stay on line boundaries, so snapping a midpoint back
        // to its line start can never cross either of them. Every line
        // before `top` is older than the target; the first line at or after
        // it, if one exists, starts in [top, bottom).
        let mut top: u64 = 0;
        let mut bottom: u64 = size;

        while top < bottom {
            let middle = top + (bottom - top) / 2;
            self.file.seek(SeekFrom::Start(middle))?;
            let line_start = seek_line(&mut self.file, 0, Whence::Current)?;

            let line = self.read_line_at(line_start)?;
            if line.is_empty() {
                // Probe ran off the end of the file.
                return Ok(-1);
            }

            let text = String::from_utf8_lossy(trim_line_ending(&line));
            let line_time = parse_log_time(&text)?;
            trace!("probe at offset {}: {}", line_start, line_time);

            if line_time < target {
                top = line_start + line.len() as u64;
            } else {
                bottom = line_start;
            }
        }

        if top == size {
            return Ok(-1);
        }
        Ok(top as i64)
    }

    /// Read one full line starting at `offset`, terminator included
    fn read_line_at(&mut self, offset: u64) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(offset))?;
        let mut reader = BufReader::with_capacity(SEEK_BUFFER_LEN, &mut self.file);
        let mut line = Vec::new();
        reader.read_until(b'\n', &mut line)?;
        Ok(line)
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
