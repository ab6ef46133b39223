//! Operator console plumbing.
//!
//! Bytes arriving from a serial link are assembled into [`CommandLine`]s by
//! [`LineAssembler`], pushed through a [`queue`] to the single owner of the
//! controller state, and acknowledged with the [`status`] surface.

use core::fmt;
use core::str;

use heapless::{String, Vec};

pub mod queue;
pub mod status;

pub use queue::{
    BoundedCommandQueue, COMMAND_QUEUE_DEPTH, CommandDequeueError, CommandEnqueueError,
    CommandQueueConsumer, CommandQueueProducer,
};
pub use status::{OverrideProgress, StatusFormatter, StatusSnapshot};

/// Maximum number of bytes accepted on a single console line (excluding terminator).
pub const MAX_LINE_LEN: usize = 96;

/// One completed operator line.
pub type CommandLine = String<MAX_LINE_LEN>;

/// Errors surfaced while assembling console input.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConsoleError {
    /// Input exceeded [`MAX_LINE_LEN`]; the partial line was dropped.
    LineOverflow,
    /// The completed line was not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::LineOverflow => {
                write!(f, "line longer than {MAX_LINE_LEN} bytes discarded")
            }
            ConsoleError::InvalidUtf8 => f.write_str("line is not valid utf-8"),
        }
    }
}

/// Turns a raw byte stream into terminated command lines.
///
/// CR or LF ends a line (so CRLF yields one line), backspace and DEL erase
/// the previous byte, and empty lines are skipped. Once a line overflows the
/// rest of it is swallowed up to the next terminator.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buffer: Vec<u8, MAX_LINE_LEN>,
    discarding: bool,
}

impl LineAssembler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Feeds one byte, returning a line when a terminator completes it.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::LineOverflow`] the first time a line grows past
    /// [`MAX_LINE_LEN`], and [`ConsoleError::InvalidUtf8`] when a completed
    /// line does not decode.
    pub fn push(&mut self, byte: u8) -> Result<Option<CommandLine>, ConsoleError> {
        match byte {
            b'\r' | b'\n' => {
                if self.discarding {
                    self.discarding = false;
                    return Ok(None);
                }
                self.finish_line()
            }
            _ if self.discarding => Ok(None),
            0x08 | 0x7f => {
                self.buffer.pop();
                Ok(None)
            }
            value => {
                if self.buffer.push(value).is_err() {
                    self.buffer.clear();
                    self.discarding = true;
                    return Err(ConsoleError::LineOverflow);
                }
                Ok(None)
            }
        }
    }

    /// Number of bytes buffered for the line in progress.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Drops any partially assembled line.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    fn finish_line(&mut self) -> Result<Option<CommandLine>, ConsoleError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let result = str::from_utf8(&self.buffer)
            .map_err(|_| ConsoleError::InvalidUtf8)
            .and_then(|text| {
                let mut line = CommandLine::new();
                line.push_str(text)
                    .map_err(|_| ConsoleError::LineOverflow)?;
                Ok(Some(line))
            });
        self.buffer.clear();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(assembler: &mut LineAssembler, bytes: &[u8]) -> Option<CommandLine> {
        let mut last = None;
        for &byte in bytes {
            if let Some(line) = assembler.push(byte).expect("no console error") {
                last = Some(line);
            }
        }
        last
    }

    #[test]
    fn crlf_yields_single_line() {
        let mut assembler = LineAssembler::new();
        let line = feed(&mut assembler, b"RGY\r\n").expect("line");
        assert_eq!(line.as_str(), "RGY");
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn backspace_erases_previous_byte() {
        let mut assembler = LineAssembler::new();
        let line = feed(&mut assembler, b"RX\x08G\x7fY\n").expect("line");
        assert_eq!(line.as_str(), "RY");
    }

    #[test]
    fn empty_lines_are_skipped() {
        let mut assembler = LineAssembler::new();
        assert_eq!(feed(&mut assembler, b"\r\n\n"), None);
    }

    #[test]
    fn overflow_discards_rest_of_line() {
        let mut assembler = LineAssembler::new();
        for _ in 0..MAX_LINE_LEN {
            assert_eq!(assembler.push(b'R'), Ok(None));
        }
        assert_eq!(assembler.push(b'R'), Err(ConsoleError::LineOverflow));
        assert_eq!(assembler.push(b'G'), Ok(None));
        assert_eq!(assembler.push(b'\n'), Ok(None));

        let line = feed(&mut assembler, b"G\n").expect("line after overflow");
        assert_eq!(line.as_str(), "G");
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let mut assembler = LineAssembler::new();
        assert_eq!(assembler.push(0xff), Ok(None));
        assert_eq!(assembler.push(b'\n'), Err(ConsoleError::InvalidUtf8));
        assert_eq!(assembler.pending(), 0);
    }
}
