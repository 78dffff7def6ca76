//! Dial contact sampling.

use dial_core::LineSample;
use embedded_hal::digital::InputPin;

/// The dial's two contact lines, sampled once per poll tick.
///
/// Both lines are wired active-low: the contact pulls the line to ground
/// while active, and the internal pull-up holds it high otherwise. The
/// polarity is normalized here so everything downstream works with
/// `true = active`.
pub struct DialLines<I> {
    idle: I,
    pulse: I,
}

impl<I: InputPin> DialLines<I> {
    /// Wrap the idle-detect and pulse-detect inputs.
    pub fn new(idle: I, pulse: I) -> Self {
        Self { idle, pulse }
    }

    /// Read both raw levels. Pin reads on the RP2040 are infallible; a
    /// failing read is treated as inactive.
    pub fn sample(&mut self) -> LineSample {
        LineSample {
            idle: self.idle.is_low().unwrap_or(false),
            pulse: self.pulse.is_low().unwrap_or(false),
        }
    }
}
