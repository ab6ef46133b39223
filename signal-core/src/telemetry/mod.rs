//! Telemetry event catalog and ring buffer shared by firmware and host targets.
//!
//! The core never logs. Instead the cycle driver records structured events
//! here; front-ends read the newest record back and log it with whatever
//! facility their target has.

use core::{fmt, time::Duration};

use heapless::{HistoryBuf, OldestOrdered};

use crate::controller::OverrideError;
use crate::pause::PauseTransition;
use crate::phases::{DwellClass, Phase};

/// Identifier assigned to every record, wrapping on overflow.
pub type EventId = u32;

/// Total number of telemetry entries retained in memory.
pub const TELEMETRY_RING_CAPACITY: usize = 64;

/// Discriminated telemetry events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TelemetryEventKind {
    PhaseAsserted(Phase),
    Paused,
    Resumed,
    OverrideAccepted,
    OverrideRejected,
    OverrideCompleted,
}

impl fmt::Display for TelemetryEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryEventKind::PhaseAsserted(phase) => write!(f, "phase-asserted {phase}"),
            TelemetryEventKind::Paused => f.write_str("paused"),
            TelemetryEventKind::Resumed => f.write_str("resumed"),
            TelemetryEventKind::OverrideAccepted => f.write_str("override-accepted"),
            TelemetryEventKind::OverrideRejected => f.write_str("override-rejected"),
            TelemetryEventKind::OverrideCompleted => f.write_str("override-completed"),
        }
    }
}

/// Payloads carried alongside telemetry events.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TelemetryPayload {
    /// No additional metadata accompanies the event.
    None,
    Phase(PhaseTelemetry),
    Override(OverrideTelemetry),
    Rejection(OverrideError),
}

/// Details of a phase assertion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PhaseTelemetry {
    pub dwell: DwellClass,
    pub elapsed_since_previous: Option<Duration>,
}

/// Size of an accepted override.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverrideTelemetry {
    pub steps: u8,
}

/// Trait implemented by monotonic instant wrappers used for telemetry tracking.
pub trait TelemetryInstant: Copy {
    /// Returns the saturating duration from `earlier` to `self`.
    fn saturating_duration_since(&self, earlier: Self) -> Duration;
}

/// Telemetry record stored in the ring buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TelemetryRecord<TInstant>
where
    TInstant: Copy,
{
    pub id: EventId,
    pub timestamp: TInstant,
    pub event: TelemetryEventKind,
    pub details: TelemetryPayload,
}

/// Telemetry ring buffer type alias.
pub type TelemetryRing<TInstant, const CAPACITY: usize = TELEMETRY_RING_CAPACITY> =
    HistoryBuf<TelemetryRecord<TInstant>, CAPACITY>;

/// Records telemetry events into a fixed-size ring buffer.
pub struct TelemetryRecorder<TInstant, const CAPACITY: usize = TELEMETRY_RING_CAPACITY>
where
    TInstant: Copy,
{
    ring: TelemetryRing<TInstant, CAPACITY>,
    last_phase_at: Option<TInstant>,
    next_event_id: EventId,
}

impl<TInstant, const CAPACITY: usize> TelemetryRecorder<TInstant, CAPACITY>
where
    TInstant: TelemetryInstant,
{
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
            last_phase_at: None,
            next_event_id: 0,
        }
    }

    /// Returns an iterator over the recorded telemetry in chronological order.
    pub fn oldest_first(&self) -> OldestOrdered<'_, TelemetryRecord<TInstant>> {
        self.ring.oldest_ordered()
    }

    /// Returns the most recent telemetry record, if available.
    #[must_use]
    pub fn latest(&self) -> Option<&TelemetryRecord<TInstant>> {
        self.ring.recent()
    }

    /// Records carrying an id of at least `first`, oldest first.
    pub fn records_from(
        &self,
        first: EventId,
    ) -> impl Iterator<Item = &TelemetryRecord<TInstant>> + '_ {
        self.ring
            .oldest_ordered()
            .filter(move |record| record.id >= first)
    }

    /// Id that the next recorded event will receive.
    #[must_use]
    pub const fn next_event_id(&self) -> EventId {
        self.next_event_id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Records a phase assertion with the time since the previous one.
    pub fn record_phase(&mut self, phase: Phase, dwell: DwellClass, timestamp: TInstant) -> EventId {
        let elapsed = self
            .last_phase_at
            .map(|previous| timestamp.saturating_duration_since(previous));
        self.last_phase_at = Some(timestamp);

        self.record(
            TelemetryEventKind::PhaseAsserted(phase),
            TelemetryPayload::Phase(PhaseTelemetry {
                dwell,
                elapsed_since_previous: elapsed,
            }),
            timestamp,
        )
    }

    pub fn record_pause(&mut self, transition: PauseTransition, timestamp: TInstant) -> EventId {
        let event = match transition {
            PauseTransition::Paused => TelemetryEventKind::Paused,
            PauseTransition::Resumed => TelemetryEventKind::Resumed,
        };
        self.record(event, TelemetryPayload::None, timestamp)
    }

    pub fn record_override_accepted(&mut self, steps: usize, timestamp: TInstant) -> EventId {
        let steps = u8::try_from(steps).unwrap_or(u8::MAX);
        self.record(
            TelemetryEventKind::OverrideAccepted,
            TelemetryPayload::Override(OverrideTelemetry { steps }),
            timestamp,
        )
    }

    pub fn record_override_rejected(&mut self, error: OverrideError, timestamp: TInstant) -> EventId {
        self.record(
            TelemetryEventKind::OverrideRejected,
            TelemetryPayload::Rejection(error),
            timestamp,
        )
    }

    pub fn record_override_completed(&mut self, timestamp: TInstant) -> EventId {
        self.record(
            TelemetryEventKind::OverrideCompleted,
            TelemetryPayload::None,
            timestamp,
        )
    }

    /// Records an arbitrary telemetry event with the supplied payload.
    pub fn record(
        &mut self,
        event: TelemetryEventKind,
        payload: TelemetryPayload,
        timestamp: TInstant,
    ) -> EventId {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);

        self.ring.write(TelemetryRecord {
            id,
            timestamp,
            event,
            details: payload,
        });

        id
    }
}

impl<TInstant, const CAPACITY: usize> Default for TelemetryRecorder<TInstant, CAPACITY>
where
    TInstant: TelemetryInstant,
{
    fn default() -> Self {
        Self::new()
    }
}
