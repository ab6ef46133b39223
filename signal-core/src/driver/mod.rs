//! Deadline-based cycle driver.
//!
//! [`CycleDriver`] owns the [`PhaseController`] and the telemetry ring and
//! turns wall-clock progress into ticks. It never sleeps itself: the caller
//! waits until [`CycleDriver::next_deadline`] (or until a pause edge or a
//! console line arrives, whichever is first) and then calls back in. Firmware
//! does that with `select` over an embassy timer and its channels, the
//! emulator with `recv_timeout`.

use core::ops::Add;
use core::time::Duration;

use crate::console::{CommandDequeueError, CommandQueueConsumer, StatusSnapshot};
use crate::controller::{
    OverrideError, PhaseController, SignalOutput, TickOutcome, parse_override,
};
use crate::pause::{PauseToggle, PauseTransition};
use crate::phases::{DwellClass, DwellConfig};
use crate::telemetry::{TelemetryInstant, TelemetryRecorder};

/// What happened to a console line handed to [`CycleDriver::submit_line`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CommandDisposition {
    /// Override installed; playback starts on the next tick.
    Accepted { steps: usize },
    /// Blank line; nothing changed.
    Ignored,
}

/// Drives a [`PhaseController`] from a monotonic clock.
pub struct CycleDriver<TInstant, D>
where
    TInstant: Copy,
{
    controller: PhaseController<D>,
    toggle: PauseToggle,
    dwell: DwellConfig,
    current_dwell: DwellClass,
    deadline: Option<TInstant>,
    telemetry: TelemetryRecorder<TInstant>,
}

impl<TInstant, D> CycleDriver<TInstant, D>
where
    TInstant: Copy + Ord + Add<Duration, Output = TInstant> + TelemetryInstant,
    D: SignalOutput,
{
    /// Takes ownership of the signal output; the boot phase is lit immediately.
    pub fn new(output: D, dwell: DwellConfig) -> Self {
        Self {
            controller: PhaseController::new(output),
            toggle: PauseToggle::new(),
            dwell,
            current_dwell: DwellClass::Auto,
            deadline: None,
            telemetry: TelemetryRecorder::new(),
        }
    }

    /// Arms the first deadline so the boot phase holds for a full dwell.
    pub fn start(&mut self, now: TInstant) -> Option<TInstant> {
        self.telemetry
            .record_phase(self.controller.phase(), self.current_dwell, now);
        self.arm(now);
        self.deadline
    }

    /// Ticks once if the deadline has passed and returns the next deadline.
    ///
    /// `None` means nothing is scheduled (paused or not started).
    pub fn poll(&mut self, now: TInstant) -> Option<TInstant> {
        let deadline = self.deadline?;
        if now < deadline {
            return Some(deadline);
        }

        match self.controller.tick() {
            TickOutcome::Frozen => self.deadline = None,
            TickOutcome::Advanced(step) => {
                self.current_dwell = step.dwell;
                self.telemetry.record_phase(step.phase, step.dwell, now);
                if step.override_completed {
                    self.telemetry.record_override_completed(now);
                }

                let next = deadline + self.dwell.for_class(step.dwell);
                self.deadline = if next > now {
                    Some(next)
                } else {
                    Some(now + self.dwell.for_class(step.dwell))
                };
            }
        }

        self.deadline
    }

    /// Handles one debounced pause edge.
    ///
    /// Pausing cancels the remainder of the current dwell; resuming restores
    /// the captured state and holds it for a full dwell.
    pub fn toggle_pause(&mut self, now: TInstant) -> PauseTransition {
        let transition = self.toggle.on_edge(&mut self.controller);
        match transition {
            PauseTransition::Paused => self.deadline = None,
            PauseTransition::Resumed => self.arm(now),
        }
        self.telemetry.record_pause(transition, now);
        transition
    }

    /// Parses and installs an override line. The deadline is left alone.
    ///
    /// # Errors
    ///
    /// [`OverrideError::InvalidSymbol`] or [`OverrideError::TooLong`]; the
    /// rejection is recorded in telemetry and the previous override keeps
    /// playing.
    pub fn submit_line(
        &mut self,
        line: &str,
        now: TInstant,
    ) -> Result<CommandDisposition, OverrideError> {
        let sequence = match parse_override(line) {
            Ok(sequence) => sequence,
            Err(OverrideError::EmptySequence) => return Ok(CommandDisposition::Ignored),
            Err(error) => {
                self.telemetry.record_override_rejected(error, now);
                return Err(error);
            }
        };

        let steps = sequence.len();
        self.controller.submit(sequence)?;
        self.telemetry.record_override_accepted(steps, now);
        Ok(CommandDisposition::Accepted { steps })
    }

    /// Submits every queued line in FIFO order, returning how many were taken.
    ///
    /// Rejected lines are recorded in telemetry and do not stop the drain.
    ///
    /// # Errors
    ///
    /// Propagates consumer failures; lines taken before the failure stay applied.
    pub fn drain_commands<C>(
        &mut self,
        consumer: &mut C,
        now: TInstant,
    ) -> Result<usize, CommandDequeueError<C::Error>>
    where
        C: CommandQueueConsumer,
    {
        let mut taken = 0;
        while let Some(line) = consumer.try_dequeue()? {
            taken += 1;
            // Rejections are already in the telemetry ring.
            let _ = self.submit_line(&line, now);
        }
        Ok(taken)
    }

    fn arm(&mut self, now: TInstant) {
        self.deadline = Some(now + self.dwell.for_class(self.current_dwell));
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<TInstant> {
        self.deadline
    }

    #[must_use]
    pub fn controller(&self) -> &PhaseController<D> {
        &self.controller
    }

    #[must_use]
    pub fn telemetry(&self) -> &TelemetryRecorder<TInstant> {
        &self.telemetry
    }

    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        self.controller.status()
    }
}
