//! Line-boundary seeking
//!
//! Repositions a file offset onto a line boundary by counting newline bytes
//! forward or backward from a reference point. This is the primitive the
//! time index uses to snap binary-search midpoints to the start of the line
//! that contains them.

use std::io::{Read, Seek, SeekFrom};

use crate::error::Result;

/// Buffer size for line scans
pub const SEEK_BUFFER_LEN: usize = 32 * 1024;

/// Reference point for [`seek_line`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Beginning of the file
    Start,
    /// Current position of the file cursor
    Current,
    /// End of the file
    End,
}

impl From<Whence> for SeekFrom {
    fn from(whence: Whence) -> Self {
        match whence {
            Whence::Start => SeekFrom::Start(0),
            Whence::Current => SeekFrom::Current(0),
            Whence::End => SeekFrom::End(0),
        }
    }
}

/// Move the file cursor to a line boundary and return the new offset.
///
/// The reference point is resolved by a zero-byte seek relative to `whence`,
/// then the scan counts `|lines|` newline bytes outward from there:
///
/// - `lines > 0` advances past exactly that many newlines and lands on the
///   byte immediately after the last one. If the file ends first, the
///   end-of-file offset is returned.
/// - `lines == 0` moves to the start of the current line. The backward scan
///   starts its counter at −1 so the terminator of the current line is not
///   counted.
/// - `lines < 0` scans backward past `|lines|` further newlines, landing at
///   the start of the line that many lines above the current one. If the
///   scan reaches the beginning of the file first, offset 0 is returned.
///
/// The returned offset is always a line boundary: either 0 or the byte
/// immediately after a newline (or end-of-file in the forward case).
///
/// Scans read 32 KiB at a time. Backward scans seek one buffer back before
/// the first read and double the seek-back step from the second read on, so
/// already-scanned bytes are never fetched twice; once the next step would
/// cross byte 0, the remaining prefix is read in a single final pass.
pub fn seek_line<F>(file: &mut F, lines: i64, whence: Whence) -> Result<u64>
where
    F: Read + Seek,
{
    let seek_back = lines < 1;
    let wanted = lines.unsigned_abs() as i64;
    // Backward scans start one behind so that `lines == 0` stops at the
    // current line's start instead of consuming its terminator.
    let mut matched: i64 = if seek_back { -1 } else { 0 };

    let mut pos = file.seek(whence.into())?;
    let mut buf = vec![0u8; SEEK_BUFFER_LEN];
    // Unread prefix below the backward scan window.
    let mut left = pos;
    let mut step = -(SEEK_BUFFER_LEN as i64);

    let mut pass = 0;
    loop {
        pass += 1;
        if seek_back {
            // From the second pass on the cursor sits a full buffer past the
            // window we just scanned, so the step back has to cover both.
            if pass == 2 {
                step *= 2;
            }

            if pos as i64 + step <= 0 {
                // The next step would cross byte 0: read what is left of the
                // prefix in one final pass.
                buf = vec![0u8; left as usize];
                pos = file.seek(SeekFrom::Start(0))?;
                left = 0;
            } else {
                left -= SEEK_BUFFER_LEN as u64;
                pos = file.seek(SeekFrom::Current(step))?;
            }
        }

        let n = file.read(&mut buf)?;
        if n == 0 {
            // Out of bytes before the count completed.
            let fallback = if seek_back {
                file.seek(SeekFrom::Start(0))?
            } else {
                file.seek(SeekFrom::End(0))?
            };
            return Ok(fallback);
        }

        for i in 0..n {
            let idx = if seek_back { n - i - 1 } else { i };
            if buf[idx] == b'\n' {
                matched += 1;
            }
            if matched == wanted {
                // The cursor is at the end of the buffer; step back to the
                // byte just past the matched newline.
                let offset = if seek_back {
                    file.seek(SeekFrom::Current(-(i as i64)))?
                } else {
                    file.seek(SeekFrom::Current(i as i64 + 1 - n as i64))?
                };
                return Ok(offset);
            }
        }

        if seek_back && left == 0 {
            return Ok(file.seek(SeekFrom::Start(0))?);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const DATA: &str = "some\ntest\nstring\n";

    fn cursor_at(pos: u64) -> Cursor<Vec<u8>> {
        let mut cursor = Cursor::new(DATA.as_bytes().to_vec());
        cursor.seek(SeekFrom::Start(pos)).unwrap();
        cursor
    }

    #[test]
    fn test_seek_line_scenarios() {
        let cases: &[(&str, i64, Whence, u64)] = &[
            ("zero goes to current line start", 0, Whence::Current, 5),
            ("forward three from current", 3, Whence::Current, 17),
            ("forward three from end", 3, Whence::End, 17),
            ("forward three from start", 3, Whence::Start, 17),
            ("forward two from start", 2, Whence::Start, 10),
            ("backward two from start clamps", -2, Whence::Start, 0),
            ("forward one from current", 1, Whence::Current, 10),
        ];

        for (name, lines, whence, expected) in cases {
            let mut cursor = cursor_at(8);
            let offset = seek_line(&mut cursor, *lines, *whence).unwrap();
            assert_eq!(offset, *expected, "{}", name);
        }
    }

    #[test]
    fn test_seek_line_backward_from_end() {
        let mut cursor = cursor_at(8);
        assert_eq!(seek_line(&mut cursor, -1, Whence::End).unwrap(), 10);

        let mut cursor = cursor_at(8);
        assert_eq!(seek_line(&mut cursor, -2, Whence::End).unwrap(), 5);

        // More lines than the file holds clamps to the beginning.
        let mut cursor = cursor_at(8);
        assert_eq!(seek_line(&mut cursor, -100, Whence::Current).unwrap(), 0);
    }

    #[test]
    fn test_seek_line_at_boundaries() {
        // Snapping from byte 0 stays at byte 0.
        let mut cursor = cursor_at(0);
        assert_eq!(seek_line(&mut cursor, 0, Whence::Start).unwrap(), 0);

        // Snapping at end-of-file lands on the boundary after the final
        // newline.
        let mut cursor = cursor_at(0);
        assert_eq!(
            seek_line(&mut cursor, 0, Whence::End).unwrap(),
            DATA.len() as u64
        );

        // Forward past the last line stops at end-of-file.
        let mut cursor = cursor_at(0);
        assert_eq!(
            seek_line(&mut cursor, 99, Whence::Start).unwrap(),
            DATA.len() as u64
        );
    }

    #[test]
    fn test_snap_is_idempotent_and_line_aligned() {
        let bytes = DATA.as_bytes();
        for pos in 0..=bytes.len() as u64 {
            let mut cursor = cursor_at(pos);
            let snapped = seek_line(&mut cursor, 0, Whence::Current).unwrap();

            assert!(snapped <= pos);
            assert!(snapped == 0 || bytes[snapped as usize - 1] == b'\n');

            let again = seek_line(&mut cursor, 0, Whence::Current).unwrap();
            assert_eq!(snapped, again, "snap must be idempotent at {}", pos);
        }
    }

    #[test]
    fn test_backward_scan_across_buffers() {
        // 12,000 lines of 8 bytes each: the backward scan has to walk more
        // than one 32 KiB window and finish with a clamped final pass.
        let mut data = Vec::with_capacity(12_000 * 8);
        for _ in 0..12_000 {
            data.extend_from_slice(b"0123456\n");
        }
        let mut cursor = Cursor::new(data);

        let offset = seek_line(&mut cursor, -5000, Whence::End).unwrap();
        assert_eq!(offset, 7000 * 8);

        let offset = seek_line(&mut cursor, -20_000, Whence::End).unwrap();
        assert_eq!(offset, 0);
    }
}
