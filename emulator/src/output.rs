use std::io::{self, Write};

use crossterm::style::Stylize;
use signal_core::controller::SignalOutput;
use signal_core::phases::IndicatorPair;

/// Renders the indicator pair as coloured lamps on stdout.
#[derive(Default)]
pub struct TerminalSignalOutput;

impl TerminalSignalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl SignalOutput for TerminalSignalOutput {
    fn set(&mut self, a: bool, b: bool) {
        let pair = IndicatorPair::new(a, b);
        let red = if a { "●".red().bold() } else { "○".dark_grey() };
        let green = if b { "●".green().bold() } else { "○".dark_grey() };
        let label = pair.phase().map_or("dark", |phase| phase.label());

        let mut stdout = io::stdout().lock();
        // A closed stdout only loses the rendering.
        let _ = writeln!(stdout, "\rsignal {red} {green}  {label} ({pair})");
        let _ = stdout.flush();
    }
}
