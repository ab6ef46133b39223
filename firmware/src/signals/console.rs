//! Screening and replies for the UART console.
//!
//! The console task checks each framed line with the override grammar before
//! it reaches the controller task, so the operator hears about a bad line on
//! the same wire it was typed on.

use core::fmt::Write;

use heapless::String;
use signal_core::console::{ConsoleError, StatusFormatter, StatusSnapshot};
use signal_core::controller::{OverrideError, parse_override};

/// Upper bound on one reply, terminator included.
pub const REPLY_LEN: usize = 160;

pub type ConsoleReply = String<REPLY_LEN>;

/// What the console does with one framed line.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineVerdict {
    /// Well-formed override; hand it to the controller task.
    Forward { steps: usize },
    /// Whitespace only; dropped without a reply.
    Blank,
    Rejected(OverrideError),
}

/// Applies the override grammar to a framed line.
pub fn screen(line: &str) -> LineVerdict {
    match parse_override(line) {
        Ok(sequence) => LineVerdict::Forward {
            steps: sequence.len(),
        },
        Err(OverrideError::EmptySequence) => LineVerdict::Blank,
        Err(error) => LineVerdict::Rejected(error),
    }
}

/// Result of handling one line, as reported back to the operator.
#[derive(Copy, Clone, Debug)]
pub enum ConsoleOutcome<'a> {
    Queued {
        steps: usize,
        status: &'a StatusSnapshot,
    },
    Busy,
    Rejected(OverrideError),
    Framing(ConsoleError),
}

/// Renders the CRLF-terminated reply for `outcome`.
pub fn render_reply(outcome: ConsoleOutcome<'_>) -> ConsoleReply {
    let mut reply = ConsoleReply::new();
    // Overflow only truncates the reply.
    let _ = match outcome {
        ConsoleOutcome::Queued { steps, status } => write!(reply, "queued {steps} steps; ")
            .and_then(|()| StatusFormatter::new(status).write_summary(&mut reply)),
        ConsoleOutcome::Busy => reply.write_str("busy; command dropped"),
        ConsoleOutcome::Rejected(error) => write!(reply, "error: {error}"),
        ConsoleOutcome::Framing(error) => write!(reply, "error: {error}"),
    };
    let _ = reply.push_str("\r\n");
    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screening_matches_the_override_grammar() {
        assert_eq!(screen("rgy"), LineVerdict::Forward { steps: 3 });
        assert_eq!(screen("  "), LineVerdict::Blank);
        assert_eq!(
            screen("RX"),
            LineVerdict::Rejected(OverrideError::InvalidSymbol {
                symbol: 'X',
                position: 1
            })
        );
    }

    #[test]
    fn rejected_line_is_reported_to_the_operator() {
        let LineVerdict::Rejected(error) = screen("RX") else {
            panic!("RX must be rejected");
        };
        assert_eq!(
            render_reply(ConsoleOutcome::Rejected(error)).as_str(),
            "error: invalid symbol 'X' at position 1\r\n"
        );
    }

    #[test]
    fn queued_reply_carries_step_count_and_status() {
        let status = StatusSnapshot::boot();
        assert_eq!(
            render_reply(ConsoleOutcome::Queued {
                steps: 3,
                status: &status
            })
            .as_str(),
            "queued 3 steps; signal phase=red indicators=1/0 mode=auto direction=forward paused=false override n/a\r\n"
        );
    }

    #[test]
    fn busy_and_framing_replies() {
        assert_eq!(
            render_reply(ConsoleOutcome::Busy).as_str(),
            "busy; command dropped\r\n"
        );
        assert_eq!(
            render_reply(ConsoleOutcome::Framing(ConsoleError::InvalidUtf8)).as_str(),
            format!("error: {}\r\n", ConsoleError::InvalidUtf8)
        );
    }
}
