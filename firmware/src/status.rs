//! Status lamp driver.

use dial_core::Indicators;
use embassy_rp::gpio::{Level, Output};

/// The three status lamps, driven combinationally from the pipeline state
/// on every poll tick.
pub struct StatusLeds {
    red: Output<'static>,
    green: Output<'static>,
    yellow: Output<'static>,
}

impl StatusLeds {
    /// Red tracks the pulse line, green the idle line, yellow the
    /// key-down state.
    pub fn new(red: Output<'static>, green: Output<'static>, yellow: Output<'static>) -> Self {
        Self { red, green, yellow }
    }

    /// Mirror the current pipeline indicators onto the lamps.
    pub fn show(&mut self, indicators: Indicators) {
        self.red.set_level(Level::from(indicators.pulse_active));
        self.green.set_level(Level::from(indicators.dial_resting));
        self.yellow.set_level(Level::from(indicators.key_down));
    }
}
