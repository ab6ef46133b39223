use std::io;
use std::sync::mpsc::{self, Sender};
use std::time::Duration;

use signal_core::console::{CommandLine, ConsoleError, StatusFormatter, StatusSnapshot};

use crate::driver::DriverEvent;

const STATUS_TIMEOUT: Duration = Duration::from_secs(1);

pub const HELP_TOPICS: &[&str] = &[
    "<R|Y|G>...   - play the phases once, then resume auto cycling",
    ":pause       - toggle pause, as the hardware button does",
    ":status      - show phase, mode, direction and override progress",
    ":help        - show this help",
    "exit         - close the emulator",
];

/// Stdin front-end forwarding operator input to the driver thread.
pub struct Session {
    events: Sender<DriverEvent>,
}

impl Session {
    #[must_use]
    pub fn new(events: Sender<DriverEvent>) -> Self {
        Self { events }
    }

    pub fn handle_command(&mut self, line: &str) -> io::Result<Vec<String>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        if trimmed.eq_ignore_ascii_case(":help") {
            return Ok(HELP_TOPICS.iter().map(ToString::to_string).collect());
        }
        if trimmed.eq_ignore_ascii_case(":pause") {
            self.send(DriverEvent::Pause)?;
            return Ok(vec!["OK pause toggled".to_string()]);
        }
        if trimmed.eq_ignore_ascii_case(":status") {
            return self.status().map(|snapshot| render_status(&snapshot));
        }
        if trimmed.starts_with(':') {
            return Ok(vec![format!(
                "ERR unknown command `{trimmed}`; type :help"
            )]);
        }

        let mut command = CommandLine::new();
        if command.push_str(trimmed).is_err() {
            return Ok(vec![format!("ERR {}", ConsoleError::LineOverflow)]);
        }
        self.send(DriverEvent::Command(command))?;
        Ok(vec![format!("OK queued {trimmed}")])
    }

    /// Asks the driver thread to stop.
    pub fn shutdown(&mut self) {
        // Already gone if the send fails.
        let _ = self.events.send(DriverEvent::Shutdown);
    }

    fn status(&mut self) -> io::Result<StatusSnapshot> {
        let (reply, response) = mpsc::channel();
        self.send(DriverEvent::Status(reply))?;
        response
            .recv_timeout(STATUS_TIMEOUT)
            .map_err(|err| io::Error::new(io::ErrorKind::TimedOut, err))
    }

    fn send(&self, event: DriverEvent) -> io::Result<()> {
        self.events
            .send(event)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "signal driver stopped"))
    }
}

fn render_status(snapshot: &StatusSnapshot) -> Vec<String> {
    let formatter = StatusFormatter::new(snapshot);
    let mut phase = String::new();
    let mut mode = String::new();
    let mut progress = String::new();
    // Writing into a String cannot fail.
    let _ = formatter.write_phase_line(&mut phase);
    let _ = formatter.write_mode_line(&mut mode);
    let _ = formatter.write_override_line(&mut progress);
    vec![phase, mode, progress]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver;
    use signal_core::controller::NoopSignalOutput;
    use signal_core::phases::DwellConfig;

    fn session() -> (Session, std::thread::JoinHandle<()>) {
        let slow = DwellConfig::new(Duration::from_secs(60), Duration::from_secs(60))
            .expect("non-zero dwells");
        let (events, handle) = driver::spawn(NoopSignalOutput::new(), slow);
        (Session::new(events), handle)
    }

    fn finish(mut session: Session, handle: std::thread::JoinHandle<()>) {
        session.shutdown();
        handle.join().expect("driver thread exits cleanly");
    }

    #[test]
    fn status_reports_boot_state() {
        let (mut session, handle) = session();
        let lines = session.handle_command(":status").expect("status");
        assert_eq!(
            lines,
            vec![
                "signal phase=red indicators=1/0".to_string(),
                "mode=auto direction=forward paused=false".to_string(),
                "override n/a".to_string(),
            ]
        );
        finish(session, handle);
    }

    #[test]
    fn override_and_pause_reach_the_driver() {
        let (mut session, handle) = session();

        assert_eq!(
            session.handle_command("rgy").expect("queued"),
            vec!["OK queued rgy".to_string()]
        );
        session.handle_command(":pause").expect("paused");

        let lines = session.handle_command(":STATUS").expect("status");
        assert_eq!(lines[1], "mode=manual direction=forward paused=true");
        assert_eq!(lines[2], "override 0/3");
        finish(session, handle);
    }

    #[test]
    fn invalid_override_keeps_auto_mode() {
        let (mut session, handle) = session();
        session.handle_command("RX").expect("queued");

        let lines = session.handle_command(":status").expect("status");
        assert_eq!(lines[1], "mode=auto direction=forward paused=false");
        finish(session, handle);
    }

    #[test]
    fn unknown_meta_command_and_long_lines_are_reported() {
        let (mut session, handle) = session();
        assert_eq!(
            session.handle_command(":reboot").expect("reply"),
            vec!["ERR unknown command `:reboot`; type :help".to_string()]
        );

        let long = "R".repeat(200);
        let reply = session.handle_command(&long).expect("reply");
        assert!(reply[0].starts_with("ERR line longer than"));

        assert_eq!(
            session.handle_command(":help").expect("help").len(),
            HELP_TOPICS.len()
        );
        finish(session, handle);
    }
}
