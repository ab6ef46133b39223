//! Edge-triggered pause toggle.
//!
//! Each debounced edge flips between paused and running. The toggle keeps its
//! own logical flag so a stray edge while the controller is already in the
//! target state still alternates cleanly on the next press.

use core::fmt;
use core::time::Duration;

use crate::controller::{PhaseController, SignalOutput};

/// Settle window applied by the edge source before reporting a press.
pub const PAUSE_DEBOUNCE: Duration = Duration::from_millis(50);

/// What a single edge did.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PauseTransition {
    Paused,
    Resumed,
}

impl fmt::Display for PauseTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PauseTransition::Paused => "paused",
            PauseTransition::Resumed => "resumed",
        })
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PauseToggle {
    paused: bool,
}

impl PauseToggle {
    #[must_use]
    pub const fn new() -> Self {
        Self { paused: false }
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Handles one edge, pausing or resuming `controller`.
    pub fn on_edge<D: SignalOutput>(
        &mut self,
        controller: &mut PhaseController<D>,
    ) -> PauseTransition {
        self.paused = !self.paused;
        if self.paused {
            controller.pause();
            PauseTransition::Paused
        } else {
            controller.resume();
            PauseTransition::Resumed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::NoopSignalOutput;

    #[test]
    fn edges_alternate() {
        let mut controller = PhaseController::new(NoopSignalOutput::new());
        let mut toggle = PauseToggle::new();

        assert_eq!(toggle.on_edge(&mut controller), PauseTransition::Paused);
        assert!(controller.is_paused());
        assert_eq!(toggle.on_edge(&mut controller), PauseTransition::Resumed);
        assert!(!controller.is_paused());
        assert_eq!(toggle.on_edge(&mut controller), PauseTransition::Paused);
        assert!(toggle.is_paused());
    }
}
