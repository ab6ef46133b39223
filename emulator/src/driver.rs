//! Host-side owner of the cycle driver.
//!
//! A single thread owns the [`CycleDriver`]; the stdin session only talks to
//! it through [`DriverEvent`]s, and dwell waits are `recv_timeout` calls so
//! pause and commands interrupt them immediately.

use std::ops::Add;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use signal_core::console::{CommandLine, StatusSnapshot};
use signal_core::controller::SignalOutput;
use signal_core::driver::CycleDriver;
use signal_core::phases::DwellConfig;
use signal_core::telemetry::{
    EventId, TelemetryEventKind, TelemetryInstant, TelemetryPayload, TelemetryRecorder,
};

/// Monotonic host clock accepted by the core driver.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct HostInstant(Instant);

impl HostInstant {
    #[must_use]
    pub fn now() -> Self {
        Self(Instant::now())
    }
}

impl Add<Duration> for HostInstant {
    type Output = HostInstant;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl TelemetryInstant for HostInstant {
    fn saturating_duration_since(&self, earlier: Self) -> Duration {
        self.0.saturating_duration_since(earlier.0)
    }
}

/// Messages accepted by the driver thread.
pub enum DriverEvent {
    Command(CommandLine),
    Pause,
    Status(Sender<StatusSnapshot>),
    Shutdown,
}

/// Starts the driver thread and returns its event sender.
pub fn spawn<D>(output: D, config: DwellConfig) -> (Sender<DriverEvent>, JoinHandle<()>)
where
    D: SignalOutput + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let handle = thread::spawn(move || run(CycleDriver::new(output, config), &receiver));
    (sender, handle)
}

fn run<D: SignalOutput>(
    mut driver: CycleDriver<HostInstant, D>,
    events: &Receiver<DriverEvent>,
) {
    let started_at = HostInstant::now();
    let mut deadline = driver.start(started_at);
    let mut logged = log_records_from(driver.telemetry(), 0, started_at);

    loop {
        let event = match deadline {
            Some(at) => match events.recv_timeout(at.saturating_duration_since(HostInstant::now()))
            {
                Ok(event) => Some(event),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match events.recv() {
                Ok(event) => Some(event),
                Err(_) => break,
            },
        };

        let now = HostInstant::now();
        match event {
            None => deadline = driver.poll(now),
            Some(DriverEvent::Command(line)) => {
                // Rejections are logged from telemetry below.
                let _ = driver.submit_line(&line, now);
            }
            Some(DriverEvent::Pause) => {
                driver.toggle_pause(now);
                deadline = driver.next_deadline();
            }
            Some(DriverEvent::Status(reply)) => {
                let _ = reply.send(driver.status());
            }
            Some(DriverEvent::Shutdown) => break,
        }

        logged = log_records_from(driver.telemetry(), logged, started_at);
    }
}

/// Prints new telemetry records. Phase changes are already drawn by the output.
fn log_records_from(
    recorder: &TelemetryRecorder<HostInstant>,
    first: EventId,
    started_at: HostInstant,
) -> EventId {
    for record in recorder.records_from(first) {
        if matches!(record.event, TelemetryEventKind::PhaseAsserted(_)) {
            continue;
        }

        let offset = record.timestamp.saturating_duration_since(started_at);
        let detail = match record.details {
            TelemetryPayload::Override(details) => format!(" steps={}", details.steps),
            TelemetryPayload::Rejection(error) => format!(" reason=\"{error}\""),
            TelemetryPayload::None | TelemetryPayload::Phase(_) => String::new(),
        };
        println!(
            "\rtelemetry:{} +{}ms{detail}",
            record.event,
            offset.as_millis()
        );
    }
    recorder.next_event_id()
}
