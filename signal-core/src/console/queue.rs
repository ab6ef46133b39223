//! Queue abstractions carrying operator lines to the controller owner.
//!
//! Producers (a UART task, a stdin reader) and the single consumer (the task
//! that owns the controller) only agree on these traits, so firmware channels,
//! std channels and the in-memory [`BoundedCommandQueue`] are interchangeable.
//! Lines are delivered strictly FIFO with no coalescing; a later override wins
//! because submitting always replaces the active sequence.

use heapless::Deque;

use super::CommandLine;

/// Default depth for console command queues.
pub const COMMAND_QUEUE_DEPTH: usize = 4;

/// Error surfaced when enqueueing into the command queue fails.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CommandEnqueueError<E = ()> {
    /// Queue has reached its maximum capacity.
    QueueFull,
    /// Queue has been disconnected from its consumer.
    Disconnected,
    /// Transport-specific failure.
    Other(E),
}

/// Error surfaced when dequeueing from the command queue fails.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CommandDequeueError<E = ()> {
    /// Queue has been disconnected from its producers.
    Disconnected,
    /// Transport-specific failure.
    Other(E),
}

/// Trait implemented by producers that push lines toward the controller.
pub trait CommandQueueProducer {
    /// Transport-specific error type.
    type Error;

    /// Attempts to enqueue a line without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`CommandEnqueueError::QueueFull`] when no slot is free and
    /// [`CommandEnqueueError::Disconnected`] when the consumer is gone.
    fn try_enqueue(&mut self, line: CommandLine) -> Result<(), CommandEnqueueError<Self::Error>>;

    /// Returns the queue capacity if it is known.
    fn capacity(&self) -> Option<usize> {
        None
    }
}

/// Trait implemented by the consumer draining lines in FIFO order.
pub trait CommandQueueConsumer {
    /// Transport-specific error type.
    type Error;

    /// Attempts to dequeue a line without blocking.
    ///
    /// Returns `Ok(Some(line))` when a line was available, `Ok(None)` when the
    /// queue is currently empty, or an error when the transport failed.
    ///
    /// # Errors
    ///
    /// [`CommandDequeueError::Disconnected`] once every producer is gone.
    fn try_dequeue(&mut self) -> Result<Option<CommandLine>, CommandDequeueError<Self::Error>>;
}

/// In-memory FIFO implementing both queue halves.
#[derive(Debug, Default)]
pub struct BoundedCommandQueue<const N: usize = COMMAND_QUEUE_DEPTH> {
    lines: Deque<CommandLine, N>,
}

impl<const N: usize> BoundedCommandQueue<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Deque::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<const N: usize> CommandQueueProducer for BoundedCommandQueue<N> {
    type Error = ();

    fn try_enqueue(&mut self, line: CommandLine) -> Result<(), CommandEnqueueError<Self::Error>> {
        self.lines
            .push_back(line)
            .map_err(|_| CommandEnqueueError::QueueFull)
    }

    fn capacity(&self) -> Option<usize> {
        Some(N)
    }
}

impl<const N: usize> CommandQueueConsumer for BoundedCommandQueue<N> {
    type Error = ();

    fn try_dequeue(&mut self) -> Result<Option<CommandLine>, CommandDequeueError<Self::Error>> {
        Ok(self.lines.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> CommandLine {
        let mut line = CommandLine::new();
        line.push_str(text).expect("fits");
        line
    }

    #[test]
    fn preserves_fifo_order_without_coalescing() {
        let mut queue: BoundedCommandQueue<3> = BoundedCommandQueue::new();
        queue.try_enqueue(line("RGY")).expect("slot");
        queue.try_enqueue(line("RGY")).expect("slot");
        queue.try_enqueue(line("G")).expect("slot");
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.try_dequeue(), Ok(Some(line("RGY"))));
        assert_eq!(queue.try_dequeue(), Ok(Some(line("RGY"))));
        assert_eq!(queue.try_dequeue(), Ok(Some(line("G"))));
        assert_eq!(queue.try_dequeue(), Ok(None));
    }

    #[test]
    fn full_queue_rejects_new_lines() {
        let mut queue: BoundedCommandQueue<1> = BoundedCommandQueue::new();
        assert_eq!(queue.capacity(), Some(1));
        queue.try_enqueue(line("R")).expect("slot");
        assert_eq!(
            queue.try_enqueue(line("G")),
            Err(CommandEnqueueError::QueueFull)
        );
    }
}
