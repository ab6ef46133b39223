//! Phase state machine shared by firmware and host targets.
//!
//! [`PhaseController`] exclusively owns the [`SystemState`] and the
//! [`SignalOutput`] it drives. Callers never mutate state directly: they tick
//! it, submit overrides and pause or resume it, and every one of those calls
//! validates fully before any field changes.

use crate::console::{OverrideProgress, StatusSnapshot};
use crate::phases::{self, Direction, DwellClass, IndicatorPair, Phase, RunMode};

pub mod sequence;

pub use sequence::{
    MAX_OVERRIDE_STEPS, OverrideError, OverrideSequence, OverrideSteps, parse_override,
};

/// Abstraction over the two physical indicators.
pub trait SignalOutput {
    /// Drives indicator `a` (red) and `b` (green) to the requested levels.
    fn set(&mut self, a: bool, b: bool);
}

/// Signal output that performs no hardware interaction.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopSignalOutput;

impl NoopSignalOutput {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SignalOutput for NoopSignalOutput {
    fn set(&mut self, _: bool, _: bool) {}
}

/// State captured when pause is asserted and restored verbatim on resume.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PauseSnapshot {
    pub phase: Phase,
    pub direction: Direction,
    pub mode: RunMode,
    pub cursor: usize,
}

/// Everything the state machine knows.
///
/// `pause` is `Some` exactly while paused and `sequence` is `Some` exactly
/// while `mode` is [`RunMode::Manual`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SystemState {
    pub phase: Phase,
    pub direction: Direction,
    pub mode: RunMode,
    pub pause: Option<PauseSnapshot>,
    pub sequence: Option<OverrideSequence>,
}

impl SystemState {
    /// Boot state: Red, moving forward, automatic, running.
    #[must_use]
    pub const fn boot() -> Self {
        Self {
            phase: Phase::Red,
            direction: Direction::Forward,
            mode: RunMode::Auto,
            pause: None,
            sequence: None,
        }
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::boot()
    }
}

/// A phase asserted by one tick.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PhaseStep {
    pub phase: Phase,
    /// Dwell that applies before the next tick.
    pub dwell: DwellClass,
    /// Set when this tick consumed the final override symbol.
    pub override_completed: bool,
}

/// Result of calling [`PhaseController::tick`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TickOutcome {
    /// Paused; nothing changed.
    Frozen,
    Advanced(PhaseStep),
}

/// Single-owner phase state machine.
pub struct PhaseController<D> {
    state: SystemState,
    output: D,
}

impl<D> PhaseController<D>
where
    D: SignalOutput,
{
    /// Takes ownership of the output and lights the boot phase.
    pub fn new(mut output: D) -> Self {
        let state = SystemState::boot();
        let indicators = state.phase.indicators();
        output.set(indicators.a, indicators.b);
        Self { state, output }
    }

    /// Advances to the next phase unless paused.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.pause.is_some() {
            return TickOutcome::Frozen;
        }

        let step = match self.state.mode {
            RunMode::Manual => self.next_manual(),
            RunMode::Auto => None,
        };
        let step = step.unwrap_or_else(|| self.next_auto());

        self.assert_phase(step.phase);
        TickOutcome::Advanced(step)
    }

    fn next_manual(&mut self) -> Option<PhaseStep> {
        let sequence = self.state.sequence.as_mut()?;
        let phase = sequence.advance()?;
        let override_completed = sequence.is_finished();

        if override_completed {
            self.state.sequence = None;
            self.state.mode = RunMode::Auto;
        }

        Some(PhaseStep {
            phase,
            dwell: DwellClass::Manual,
            override_completed,
        })
    }

    fn next_auto(&mut self) -> PhaseStep {
        let (phase, direction) = phases::bounce(self.state.phase, self.state.direction);
        self.state.direction = direction;
        self.state.mode = RunMode::Auto;
        self.state.sequence = None;

        PhaseStep {
            phase,
            dwell: DwellClass::Auto,
            override_completed: false,
        }
    }

    fn assert_phase(&mut self, phase: Phase) {
        self.state.phase = phase;
        let indicators = phase.indicators();
        self.output.set(indicators.a, indicators.b);
    }

    /// Parses operator text and installs it as the active override.
    ///
    /// # Errors
    ///
    /// Any [`OverrideError`]; the running mode and sequence are untouched.
    pub fn submit_override(&mut self, symbols: &str) -> Result<(), OverrideError> {
        let sequence = parse_override(symbols)?;
        self.submit(sequence)
    }

    /// Replaces any active override with `sequence`, starting at its first
    /// symbol on the next tick. The current phase is left lit until then.
    ///
    /// While paused the pause snapshot is rewritten too, so resuming begins
    /// the new override.
    ///
    /// # Errors
    ///
    /// [`OverrideError::EmptySequence`] when `sequence` has no symbols.
    pub fn submit(&mut self, mut sequence: OverrideSequence) -> Result<(), OverrideError> {
        if sequence.is_empty() {
            return Err(OverrideError::EmptySequence);
        }

        sequence.seek(0);
        self.state.sequence = Some(sequence);
        self.state.mode = RunMode::Manual;
        if let Some(snapshot) = self.state.pause.as_mut() {
            snapshot.mode = RunMode::Manual;
            snapshot.cursor = 0;
        }
        Ok(())
    }

    /// Freezes ticking. Returns `false` when already paused.
    pub fn pause(&mut self) -> bool {
        if self.state.pause.is_some() {
            return false;
        }

        self.state.pause = Some(PauseSnapshot {
            phase: self.state.phase,
            direction: self.state.direction,
            mode: self.state.mode,
            cursor: self.cursor().unwrap_or(0),
        });
        true
    }

    /// Restores the pause snapshot. Returns `false` when not paused.
    pub fn resume(&mut self) -> bool {
        let Some(snapshot) = self.state.pause.take() else {
            return false;
        };

        self.state.phase = snapshot.phase;
        self.state.direction = snapshot.direction;
        self.state.mode = snapshot.mode;
        match snapshot.mode {
            RunMode::Manual => {
                if let Some(sequence) = self.state.sequence.as_mut() {
                    sequence.seek(snapshot.cursor);
                }
            }
            RunMode::Auto => self.state.sequence = None,
        }
        true
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[must_use]
    pub fn indicators(&self) -> IndicatorPair {
        self.state.phase.indicators()
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    #[must_use]
    pub fn mode(&self) -> RunMode {
        self.state.mode
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.pause.is_some()
    }

    /// Cursor of the active override, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.state.sequence.as_ref().map(OverrideSequence::cursor)
    }

    #[must_use]
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    #[must_use]
    pub fn output(&self) -> &D {
        &self.output
    }

    /// Captures the status surface rendered by the console front-ends.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            phase: self.state.phase,
            indicators: self.indicators(),
            mode: self.state.mode,
            direction: self.state.direction,
            paused: self.is_paused(),
            progress: self
                .state
                .sequence
                .as_ref()
                .map(|sequence| OverrideProgress::new(sequence.cursor(), sequence.len())),
        }
    }
}
