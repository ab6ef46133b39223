#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Shared status storage for the firmware target.
//!
//! The controller task publishes a [`StatusSnapshot`] into lightweight
//! atomics after every change so the console task can acknowledge input
//! without touching the cycle driver.

use portable_atomic::{AtomicBool, AtomicU8, Ordering};
use signal_core::console::{OverrideProgress, StatusSnapshot};
use signal_core::phases::{Direction, Phase, RunMode};

/// `0` marks "no override".
const NO_OVERRIDE: u8 = 0;

static PHASE: AtomicU8 = AtomicU8::new(0);
static MANUAL: AtomicBool = AtomicBool::new(false);
static BACKWARD: AtomicBool = AtomicBool::new(false);
static PAUSED: AtomicBool = AtomicBool::new(false);
static OVERRIDE_CURSOR: AtomicU8 = AtomicU8::new(0);
static OVERRIDE_LEN: AtomicU8 = AtomicU8::new(NO_OVERRIDE);

fn truncate(value: usize) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

/// Stores the latest controller view.
pub fn publish(snapshot: &StatusSnapshot) {
    PHASE.store(truncate(snapshot.phase.as_index()), Ordering::Relaxed);
    MANUAL.store(snapshot.mode == RunMode::Manual, Ordering::Relaxed);
    BACKWARD.store(snapshot.direction == Direction::Backward, Ordering::Relaxed);
    PAUSED.store(snapshot.paused, Ordering::Relaxed);
    match snapshot.progress {
        Some(progress) => {
            OVERRIDE_CURSOR.store(truncate(progress.cursor), Ordering::Relaxed);
            OVERRIDE_LEN.store(truncate(progress.len), Ordering::Relaxed);
        }
        None => {
            OVERRIDE_CURSOR.store(0, Ordering::Relaxed);
            OVERRIDE_LEN.store(NO_OVERRIDE, Ordering::Relaxed);
        }
    }
}

/// Rebuilds a [`StatusSnapshot`] from the stored atomics.
pub fn snapshot() -> StatusSnapshot {
    let phase = Phase::from_index(usize::from(PHASE.load(Ordering::Relaxed))).unwrap_or(Phase::Red);
    let progress = match OVERRIDE_LEN.load(Ordering::Relaxed) {
        NO_OVERRIDE => None,
        len => Some(OverrideProgress::new(
            usize::from(OVERRIDE_CURSOR.load(Ordering::Relaxed)),
            usize::from(len),
        )),
    };

    StatusSnapshot {
        phase,
        indicators: phase.indicators(),
        mode: if MANUAL.load(Ordering::Relaxed) {
            RunMode::Manual
        } else {
            RunMode::Auto
        },
        direction: if BACKWARD.load(Ordering::Relaxed) {
            Direction::Backward
        } else {
            Direction::Forward
        },
        paused: PAUSED.load(Ordering::Relaxed),
        progress,
    }
}
