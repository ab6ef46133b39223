//! Operator override sequences and the symbol grammar that produces them.

use core::fmt;

use heapless::Vec;
use winnow::combinator::alt;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::one_of;

use crate::console::MAX_LINE_LEN;
use crate::phases::Phase;

/// Upper bound on symbols in one override; a console line can never hold more.
pub const MAX_OVERRIDE_STEPS: usize = MAX_LINE_LEN;

/// Backing storage for the phases of an override.
pub type OverrideSteps = Vec<Phase, MAX_OVERRIDE_STEPS>;

/// Reasons an override command is rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OverrideError {
    /// Character outside `R`/`Y`/`G` at the given (zero based) symbol position.
    InvalidSymbol { symbol: char, position: usize },
    /// Command carried no symbols.
    EmptySequence,
    /// Command holds more symbols than the sequence can store.
    TooLong { capacity: usize },
}

impl fmt::Display for OverrideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideError::InvalidSymbol { symbol, position } => {
                write!(f, "invalid symbol {symbol:?} at position {position}")
            }
            OverrideError::EmptySequence => f.write_str("empty override sequence"),
            OverrideError::TooLong { capacity } => {
                write!(f, "override longer than {capacity} symbols")
            }
        }
    }
}

/// Ordered phases to play back plus the index of the next one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OverrideSequence {
    steps: OverrideSteps,
    cursor: usize,
}

impl OverrideSequence {
    /// Builds a sequence from already decoded phases.
    pub fn from_phases(phases: &[Phase]) -> Result<Self, OverrideError> {
        if phases.is_empty() {
            return Err(OverrideError::EmptySequence);
        }

        let steps = Vec::from_slice(phases).map_err(|_| OverrideError::TooLong {
            capacity: MAX_OVERRIDE_STEPS,
        })?;

        Ok(Self { steps, cursor: 0 })
    }

    #[must_use]
    pub fn steps(&self) -> &[Phase] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false` for a constructed sequence; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the phase the cursor points at without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<Phase> {
        self.steps.get(self.cursor).copied()
    }

    /// Consumes the phase at the cursor.
    pub fn advance(&mut self) -> Option<Phase> {
        let phase = self.peek()?;
        self.cursor += 1;
        Some(phase)
    }

    /// `true` once every phase has been consumed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    pub(crate) fn seek(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.steps.len());
    }
}

fn phase_symbol(input: &mut &str) -> Result<Phase, ErrMode<ContextError>> {
    alt((
        one_of(['R', 'r']).value(Phase::Red),
        one_of(['Y', 'y']).value(Phase::Yellow),
        one_of(['G', 'g']).value(Phase::Green),
    ))
    .parse_next(input)
}

/// Parses operator text such as `RGY` into an [`OverrideSequence`].
///
/// Surrounding whitespace (including a trailing line terminator) is ignored.
/// Anything else outside `R`/`Y`/`G` rejects the whole line.
pub fn parse_override(line: &str) -> Result<OverrideSequence, OverrideError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(OverrideError::EmptySequence);
    }

    let mut input = trimmed;
    let mut steps = OverrideSteps::new();
    let mut position = 0;

    while let Some(symbol) = input.chars().next() {
        let phase = phase_symbol
            .parse_next(&mut input)
            .map_err(|_| OverrideError::InvalidSymbol { symbol, position })?;
        steps.push(phase).map_err(|_| OverrideError::TooLong {
            capacity: MAX_OVERRIDE_STEPS,
        })?;
        position += 1;
    }

    Ok(OverrideSequence { steps, cursor: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_case_symbols() {
        let sequence = parse_override("rGy\r\n").expect("valid override");
        assert_eq!(
            sequence.steps(),
            &[Phase::Red, Phase::Green, Phase::Yellow]
        );
        assert_eq!(sequence.cursor(), 0);
    }

    #[test]
    fn reports_first_invalid_symbol() {
        assert_eq!(
            parse_override("RX"),
            Err(OverrideError::InvalidSymbol {
                symbol: 'X',
                position: 1
            })
        );
        assert_eq!(
            parse_override("R G"),
            Err(OverrideError::InvalidSymbol {
                symbol: ' ',
                position: 1
            })
        );
    }

    #[test]
    fn blank_line_is_empty_sequence() {
        assert_eq!(parse_override(""), Err(OverrideError::EmptySequence));
        assert_eq!(parse_override("  \t"), Err(OverrideError::EmptySequence));
        assert_eq!(
            OverrideSequence::from_phases(&[]),
            Err(OverrideError::EmptySequence)
        );
    }

    #[test]
    fn rejects_lines_past_capacity() {
        let mut line: heapless::String<{ MAX_OVERRIDE_STEPS + 1 }> = heapless::String::new();
        for _ in 0..=MAX_OVERRIDE_STEPS {
            line.push('g').expect("fits");
        }
        assert_eq!(
            parse_override(&line),
            Err(OverrideError::TooLong {
                capacity: MAX_OVERRIDE_STEPS
            })
        );
    }

    #[test]
    fn advance_walks_to_completion() {
        let mut sequence =
            OverrideSequence::from_phases(&[Phase::Green, Phase::Red]).expect("valid");
        assert_eq!(sequence.advance(), Some(Phase::Green));
        assert!(!sequence.is_finished());
        assert_eq!(sequence.advance(), Some(Phase::Red));
        assert!(sequence.is_finished());
        assert_eq!(sequence.advance(), None);
    }
}
