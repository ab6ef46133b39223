//! Signal phase data structures shared by firmware and host targets.
//!
//! The controller uses these definitions to drive the phase state machine
//! without embedding any MCU-specific knowledge. Everything in this module is
//! `no_std` friendly so the same data can be compiled for both the STM32
//! firmware and the host-side emulator.

use core::fmt;

pub mod dwell;

pub use dwell::{AUTO_DWELL, ConfigError, DwellClass, DwellConfig, MANUAL_DWELL};

/// Number of distinct [`Phase`] variants.
pub const PHASE_COUNT: usize = 3;

/// Which indicator(s) of the fixture are asserted.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    Red,
    Yellow,
    Green,
}

impl Phase {
    /// Deterministic index for lookups into [`ALL_PHASES`].
    #[must_use]
    pub const fn as_index(self) -> usize {
        match self {
            Phase::Red => 0,
            Phase::Yellow => 1,
            Phase::Green => 2,
        }
    }

    /// Attempts to construct a [`Phase`] from a raw index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Phase::Red),
            1 => Some(Phase::Yellow),
            2 => Some(Phase::Green),
            _ => None,
        }
    }

    /// Maps an operator symbol (`R`, `Y`, `G`, any case) to a phase.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'R' | 'r' => Some(Phase::Red),
            'Y' | 'y' => Some(Phase::Yellow),
            'G' | 'g' => Some(Phase::Green),
            _ => None,
        }
    }

    /// Canonical upper-case operator symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Phase::Red => 'R',
            Phase::Yellow => 'Y',
            Phase::Green => 'G',
        }
    }

    /// Indicator levels driven for this phase. Yellow asserts both.
    #[must_use]
    pub const fn indicators(self) -> IndicatorPair {
        match self {
            Phase::Red => IndicatorPair::new(true, false),
            Phase::Yellow => IndicatorPair::new(true, true),
            Phase::Green => IndicatorPair::new(false, true),
        }
    }

    /// Lower-case label used by logs and the status surface.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Phase::Red => "red",
            Phase::Yellow => "yellow",
            Phase::Green => "green",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compile-time catalog of every phase, ordered by [`Phase::as_index`].
pub const ALL_PHASES: [Phase; PHASE_COUNT] = [Phase::Red, Phase::Yellow, Phase::Green];

/// Levels for the two physical indicators (`a` = red lamp, `b` = green lamp).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct IndicatorPair {
    pub a: bool,
    pub b: bool,
}

impl IndicatorPair {
    #[must_use]
    pub const fn new(a: bool, b: bool) -> Self {
        Self { a, b }
    }

    /// Decodes an indicator pair back into the phase it encodes.
    ///
    /// Returns `None` for the dark pair, which no phase drives.
    #[must_use]
    pub const fn phase(self) -> Option<Phase> {
        match (self.a, self.b) {
            (true, false) => Some(Phase::Red),
            (true, true) => Some(Phase::Yellow),
            (false, true) => Some(Phase::Green),
            (false, false) => None,
        }
    }
}

impl fmt::Display for IndicatorPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", u8::from(self.a), u8::from(self.b))
    }
}

/// Traversal order deciding which phase follows Yellow.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether phases come from the automatic bounce or an override sequence.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RunMode {
    Auto,
    Manual,
}

impl RunMode {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RunMode::Auto => "auto",
            RunMode::Manual => "manual",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Applies one step of the automatic Red → Yellow → Green → Yellow → Red bounce.
///
/// Leaving Red always sets [`Direction::Forward`] and leaving Green always
/// sets [`Direction::Backward`]; Yellow follows whatever direction is set.
#[must_use]
pub const fn bounce(current: Phase, direction: Direction) -> (Phase, Direction) {
    match (current, direction) {
        (Phase::Red, _) => (Phase::Yellow, Direction::Forward),
        (Phase::Yellow, Direction::Forward) => (Phase::Green, Direction::Forward),
        (Phase::Yellow, Direction::Backward) => (Phase::Red, Direction::Backward),
        (Phase::Green, _) => (Phase::Yellow, Direction::Backward),
    }
}
