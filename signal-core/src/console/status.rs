//! Shared status surface for the operator console.
//!
//! The firmware acknowledges each console line with a status summary and the
//! emulator prints the same lines for `:status`. [`StatusFormatter`] keeps the
//! textual rendering consistent across front-ends.

use core::fmt;

use crate::phases::{Direction, IndicatorPair, Phase, RunMode};

/// Playback position of an active override.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverrideProgress {
    pub cursor: usize,
    pub len: usize,
}

impl OverrideProgress {
    #[must_use]
    pub const fn new(cursor: usize, len: usize) -> Self {
        Self { cursor, len }
    }
}

/// Point-in-time view of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub phase: Phase,
    pub indicators: IndicatorPair,
    pub mode: RunMode,
    pub direction: Direction,
    pub paused: bool,
    pub progress: Option<OverrideProgress>,
}

impl StatusSnapshot {
    /// Snapshot matching the boot state.
    #[must_use]
    pub const fn boot() -> Self {
        Self {
            phase: Phase::Red,
            indicators: Phase::Red.indicators(),
            mode: RunMode::Auto,
            direction: Direction::Forward,
            paused: false,
            progress: None,
        }
    }
}

/// Helper that renders a [`StatusSnapshot`] into human-readable lines.
#[derive(Clone, Copy, Debug)]
pub struct StatusFormatter<'a> {
    snapshot: &'a StatusSnapshot,
}

impl<'a> StatusFormatter<'a> {
    #[must_use]
    pub const fn new(snapshot: &'a StatusSnapshot) -> Self {
        Self { snapshot }
    }

    /// Writes the phase line (e.g. `signal phase=yellow indicators=1/1`).
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn write_phase_line<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        write!(
            writer,
            "signal phase={} indicators={}",
            self.snapshot.phase, self.snapshot.indicators
        )
    }

    /// Writes the mode line (e.g. `mode=auto direction=forward paused=false`).
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn write_mode_line<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        write!(
            writer,
            "mode={} direction={} paused={}",
            self.snapshot.mode, self.snapshot.direction, self.snapshot.paused
        )
    }

    /// Writes the override line (e.g. `override 1/3` or `override n/a`).
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn write_override_line<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        match self.snapshot.progress {
            Some(progress) => write!(writer, "override {}/{}", progress.cursor, progress.len),
            None => writer.write_str("override n/a"),
        }
    }

    /// Writes the compact single-line form used to acknowledge console input.
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn write_summary<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        self.write_phase_line(writer)?;
        writer.write_char(' ')?;
        self.write_mode_line(writer)?;
        writer.write_char(' ')?;
        self.write_override_line(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;

    #[test]
    fn renders_boot_snapshot() {
        let snapshot = StatusSnapshot::boot();
        let formatter = StatusFormatter::new(&snapshot);

        let mut phase: String<64> = String::new();
        formatter.write_phase_line(&mut phase).expect("fits");
        assert_eq!(phase.as_str(), "signal phase=red indicators=1/0");

        let mut mode: String<64> = String::new();
        formatter.write_mode_line(&mut mode).expect("fits");
        assert_eq!(mode.as_str(), "mode=auto direction=forward paused=false");

        let mut progress: String<64> = String::new();
        formatter.write_override_line(&mut progress).expect("fits");
        assert_eq!(progress.as_str(), "override n/a");
    }

    #[test]
    fn summary_includes_override_progress() {
        let snapshot = StatusSnapshot {
            phase: Phase::Yellow,
            indicators: Phase::Yellow.indicators(),
            mode: RunMode::Manual,
            direction: Direction::Backward,
            paused: true,
            progress: Some(OverrideProgress::new(1, 3)),
        };

        let mut line: String<128> = String::new();
        StatusFormatter::new(&snapshot)
            .write_summary(&mut line)
            .expect("fits");
        assert_eq!(
            line.as_str(),
            "signal phase=yellow indicators=1/1 mode=manual direction=backward paused=true override 1/3"
        );
    }
}
