//! Two-line character display port and diff-aware frame output.
//!
//! Screens are composed into a [`Frame`] every poll; [`FrameCache`]
//! compares it with what was last written and only rewrites rows whose
//! text changed. Rows are always rewritten whole, padded to the display
//! width so stale characters never survive.

use crate::config::{DISPLAY_COLS, DISPLAY_ROWS};
use crate::error::{Error, Result};
use core::fmt::{self, Write};
use heapless::String;

/// One display row.
pub type Line = String<DISPLAY_COLS>;

/// Output device: fixed-width text rows.
pub trait DisplayPort {
    fn clear(&mut self) -> Result<()>;

    /// Replace the whole of row `row` with `text`.
    fn write_line(&mut self, row: usize, text: &str) -> Result<()>;
}

/// Writer that silently truncates at the line width.
struct Truncating<'a>(&'a mut Line);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Content of the whole display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    lines: [Line; DISPLAY_ROWS],
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame with both rows set from plain text.
    pub fn text(top: &str, bottom: &str) -> Self {
        let mut frame = Self::new();
        frame.set(0, top);
        frame.set(1, bottom);
        frame
    }

    /// Replace row `row` with `text`, truncated to the width.
    pub fn set(&mut self, row: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            let _ = Truncating(line).write_str(text);
        }
    }

    /// Replace row `row` with formatted text, truncated to the width.
    pub fn write(&mut self, row: usize, args: fmt::Arguments<'_>) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            let _ = Truncating(line).write_fmt(args);
        }
    }

    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map(|l| l.as_str()).unwrap_or("")
    }
}

/// Remembers the last rows written so identical frames cost nothing.
#[derive(Default)]
pub struct FrameCache {
    written: [Option<Line>; DISPLAY_ROWS],
    writes: u32,
}

impl FrameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the rows of `frame` that differ from the display.
    ///
    /// Returns the number of rows written.
    pub fn present<D: DisplayPort + ?Sized>(&mut self, display: &mut D, frame: &Frame) -> Result<usize> {
        let mut written = 0;
        for (row, line) in frame.lines.iter().enumerate() {
            let padded = pad(line);
            if self.written[row].as_ref() == Some(&padded) {
                continue;
            }
            display.write_line(row, padded.as_str())?;
            self.written[row] = Some(padded);
            self.writes = self.writes.wrapping_add(1);
            written += 1;
        }
        Ok(written)
    }

    /// Clear the device and forget what it showed.
    pub fn clear<D: DisplayPort + ?Sized>(&mut self, display: &mut D) -> Result<()> {
        self.invalidate();
        display.clear()
    }

    /// Force the next `present` to rewrite every row.
    pub fn invalidate(&mut self) {
        self.written = Default::default();
    }

    /// Total row writes issued.
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

fn pad(line: &Line) -> Line {
    let mut out = line.clone();
    while out.push(' ').is_ok() {}
    out
}

/// Check a row index against the display geometry.
pub fn check_row(row: usize) -> Result<()> {
    if row < DISPLAY_ROWS {
        Ok(())
    } else {
        Err(Error::InvalidRow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        rows: [Line; DISPLAY_ROWS],
        writes: usize,
        clears: usize,
    }

    impl DisplayPort for Recorder {
        fn clear(&mut self) -> Result<()> {
            self.clears += 1;
            self.rows = Default::default();
            Ok(())
        }

        fn write_line(&mut self, row: usize, text: &str) -> Result<()> {
            check_row(row)?;
            self.rows[row].clear();
            self.rows[row].push_str(text).map_err(|_| Error::BufferOverflow)?;
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn long_text_is_truncated_to_width() {
        let frame = Frame::text("0123456789abcdefXYZ", "ok");
        assert_eq!(frame.line(0), "0123456789abcdef");
        assert_eq!(frame.line(1), "ok");
        assert_eq!(frame.line(5), "");
    }

    #[test]
    fn identical_frame_is_not_rewritten() {
        let mut lcd = Recorder::default();
        let mut cache = FrameCache::new();
        let frame = Frame::text("Avg T: 21.5C", "Avg H: 50.0%");

        assert_eq!(cache.present(&mut lcd, &frame), Ok(2));
        assert_eq!(cache.present(&mut lcd, &frame), Ok(0));
        assert_eq!(lcd.writes, 2);
        assert_eq!(lcd.rows[0].as_str(), "Avg T: 21.5C    ");
    }

    #[test]
    fn only_changed_row_is_rewritten() {
        let mut lcd = Recorder::default();
        let mut cache = FrameCache::new();
        cache.present(&mut lcd, &Frame::text("Mode: Auto", "Time 10:00:00")).unwrap();
        assert_eq!(cache.present(&mut lcd, &Frame::text("Mode: Auto", "Time 10:00:01")), Ok(1));
        assert_eq!(lcd.rows[1].as_str(), "Time 10:00:01   ");
    }

    #[test]
    fn clear_forces_full_rewrite() {
        let mut lcd = Recorder::default();
        let mut cache = FrameCache::new();
        let frame = Frame::text("a", "b");
        cache.present(&mut lcd, &frame).unwrap();
        cache.clear(&mut lcd).unwrap();
        assert_eq!(lcd.clears, 1);
        assert_eq!(cache.present(&mut lcd, &frame), Ok(2));
        assert_eq!(cache.writes(), 4);
    }

    #[test]
    fn formatted_rows() {
        let mut frame = Frame::new();
        frame.write(0, format_args!("T {:>5.1}C", 21.34f32));
        assert_eq!(frame.line(0), "T  21.3C");
    }
}
