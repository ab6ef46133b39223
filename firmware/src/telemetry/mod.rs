#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Logging helpers for telemetry recorded by the cycle driver.
//!
//! Records are rendered into a bounded line and emitted over defmt on the
//! target or stdout on the host so bring-up logs look the same on both.

use core::fmt::Write;

use heapless::String;
use signal_core::console::ConsoleError;
use signal_core::controller::OverrideError;
use signal_core::phases::DwellClass;
use signal_core::telemetry::{
    EventId, TelemetryEventKind, TelemetryPayload, TelemetryRecord, TelemetryRecorder,
};

use crate::signals::FirmwareInstant;

/// Upper bound on a rendered telemetry line.
pub const LOG_LINE_LEN: usize = 96;

pub type LogLine = String<LOG_LINE_LEN>;

/// Severity assigned to a rendered record.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Severity {
    Info,
    Warn,
}

/// Renders a record as `telemetry:<event> t=<us>us ...`.
pub fn describe(record: &TelemetryRecord<FirmwareInstant>) -> (Severity, LogLine) {
    let mut line = LogLine::new();
    // Overflow only truncates the log line.
    let _ = write!(
        line,
        "telemetry:{} t={}us",
        record.event,
        record.timestamp.as_micros()
    );

    match record.details {
        TelemetryPayload::None => {}
        TelemetryPayload::Phase(details) => {
            let dwell = match details.dwell {
                DwellClass::Auto => "auto",
                DwellClass::Manual => "manual",
            };
            let _ = write!(line, " dwell={dwell}");
            if let Some(elapsed) = details.elapsed_since_previous {
                let _ = write!(line, " delta={}us", elapsed.as_micros());
            }
        }
        TelemetryPayload::Override(details) => {
            let _ = write!(line, " steps={}", details.steps);
        }
        TelemetryPayload::Rejection(error) => {
            let _ = write!(line, " reason=\"{error}\"");
        }
    }

    let severity = match record.event {
        TelemetryEventKind::OverrideRejected => Severity::Warn,
        _ => Severity::Info,
    };
    (severity, line)
}

/// Logs every record with an id of at least `first` and returns the next id to log.
pub fn log_records_from(
    recorder: &TelemetryRecorder<FirmwareInstant>,
    first: EventId,
) -> EventId {
    for record in recorder.records_from(first) {
        let (severity, line) = describe(record);
        emit(severity, line.as_str());
    }
    recorder.next_event_id()
}

/// Logs a console framing problem.
pub fn log_console_error(error: ConsoleError) {
    let mut line = LogLine::new();
    let _ = write!(line, "console: {error}");
    emit(Severity::Warn, line.as_str());
}

/// Logs a line the console refused to forward.
pub fn log_rejected_line(command: &str, error: OverrideError) {
    let mut line = LogLine::new();
    let _ = write!(line, "console: rejected {command:?}: {error}");
    emit(Severity::Warn, line.as_str());
}

/// Logs a line dropped because the controller queue is full.
pub fn log_queue_full(command: &str) {
    let mut line = LogLine::new();
    let _ = write!(line, "console: queue full, dropped {command:?}");
    emit(Severity::Warn, line.as_str());
}

#[cfg(target_os = "none")]
fn emit(severity: Severity, line: &str) {
    match severity {
        Severity::Info => defmt::info!("{=str}", line),
        Severity::Warn => defmt::warn!("{=str}", line),
    }
}

#[cfg(not(target_os = "none"))]
fn emit(severity: Severity, line: &str) {
    match severity {
        Severity::Info => println!("{line}"),
        Severity::Warn => println!("warn: {line}"),
    }
}
