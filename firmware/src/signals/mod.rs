#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Channel plumbing and clock adapter binding `signal-core` to Embassy.
//!
//! Every task talks to the controller task through the bounded channels
//! aliased here; the controller task is the only place the cycle driver lives.

use core::ops::Add;
use core::time::Duration as CoreDuration;

#[cfg(not(target_os = "none"))]
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
#[cfg(target_os = "none")]
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender, TryReceiveError, TrySendError};
use embassy_time::{Duration, Instant};
use signal_core::console::{
    COMMAND_QUEUE_DEPTH, CommandDequeueError, CommandEnqueueError, CommandLine,
    CommandQueueConsumer, CommandQueueProducer,
};
use signal_core::telemetry::TelemetryInstant;

pub mod console;

/// Depth of the pause edge queue; edges beyond this are dropped by the sender.
pub const PAUSE_QUEUE_DEPTH: usize = 2;

#[cfg(target_os = "none")]
pub type SignalMutex = ThreadModeRawMutex;
#[cfg(not(target_os = "none"))]
pub type SignalMutex = NoopRawMutex;

/// Queue carrying operator lines from the console task to the controller task.
pub type CommandQueue = Channel<SignalMutex, CommandLine, COMMAND_QUEUE_DEPTH>;
pub type CommandSender<'a> = Sender<'a, SignalMutex, CommandLine, COMMAND_QUEUE_DEPTH>;
pub type CommandReceiver<'a> = Receiver<'a, SignalMutex, CommandLine, COMMAND_QUEUE_DEPTH>;

/// One debounced press of the pause button.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PauseEdge;

/// Queue carrying debounced pause edges to the controller task.
pub type PauseQueue = Channel<SignalMutex, PauseEdge, PAUSE_QUEUE_DEPTH>;

/// Embassy instant usable as the cycle driver's clock.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct FirmwareInstant(Instant);

impl FirmwareInstant {
    #[cfg(target_os = "none")]
    pub fn now() -> Self {
        Self(Instant::now())
    }

    pub const fn into_embassy(self) -> Instant {
        self.0
    }

    pub const fn as_micros(self) -> u64 {
        self.0.as_micros()
    }
}

impl From<Instant> for FirmwareInstant {
    fn from(value: Instant) -> Self {
        Self(value)
    }
}

impl Add<CoreDuration> for FirmwareInstant {
    type Output = FirmwareInstant;

    fn add(self, rhs: CoreDuration) -> Self::Output {
        let micros = u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX);
        Self(
            self.0
                .checked_add(Duration::from_micros(micros))
                .unwrap_or(Instant::MAX),
        )
    }
}

impl TelemetryInstant for FirmwareInstant {
    fn saturating_duration_since(&self, earlier: Self) -> CoreDuration {
        self.0
            .checked_duration_since(earlier.0)
            .map_or(CoreDuration::ZERO, |elapsed| {
                CoreDuration::from_micros(elapsed.as_micros())
            })
    }
}

/// Exposes the channel sender as a `signal-core` queue producer.
pub struct CommandProducer<'a> {
    sender: CommandSender<'a>,
}

impl<'a> CommandProducer<'a> {
    pub fn new(sender: CommandSender<'a>) -> Self {
        Self { sender }
    }
}

impl CommandQueueProducer for CommandProducer<'_> {
    type Error = ();

    fn try_enqueue(&mut self, line: CommandLine) -> Result<(), CommandEnqueueError<Self::Error>> {
        self.sender
            .try_send(line)
            .map_err(|TrySendError::Full(_)| CommandEnqueueError::QueueFull)
    }

    fn capacity(&self) -> Option<usize> {
        Some(COMMAND_QUEUE_DEPTH)
    }
}

/// Exposes the channel receiver as a `signal-core` queue consumer.
pub struct CommandConsumer<'a> {
    receiver: CommandReceiver<'a>,
}

impl<'a> CommandConsumer<'a> {
    pub fn new(receiver: CommandReceiver<'a>) -> Self {
        Self { receiver }
    }

    /// Waits for the next line.
    pub async fn receive(&self) -> CommandLine {
        self.receiver.receive().await
    }
}

impl CommandQueueConsumer for CommandConsumer<'_> {
    type Error = ();

    fn try_dequeue(&mut self) -> Result<Option<CommandLine>, CommandDequeueError<Self::Error>> {
        match self.receiver.try_receive() {
            Ok(line) => Ok(Some(line)),
            Err(TryReceiveError::Empty) => Ok(None),
        }
    }
}
