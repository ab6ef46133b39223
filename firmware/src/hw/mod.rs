//! GPIO binding for the two-indicator fixture.

use embassy_stm32::gpio::Output;
use signal_core::controller::SignalOutput;

/// Push-pull outputs driving the red (`a`) and green (`b`) lamps; high lights a lamp.
pub struct LedSignalOutput<'d> {
    red: Output<'d>,
    green: Output<'d>,
}

impl<'d> LedSignalOutput<'d> {
    pub fn new(red: Output<'d>, green: Output<'d>) -> Self {
        Self { red, green }
    }
}

impl SignalOutput for LedSignalOutput<'_> {
    fn set(&mut self, a: bool, b: bool) {
        self.red.set_level(a.into());
        self.green.set_level(b.into());
    }
}
