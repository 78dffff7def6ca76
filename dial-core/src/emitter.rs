//! Keystroke emitter: turns one digit into a press/release report pair.

use crate::context::HostLink;
use crate::decoder::DialDigit;
use crate::report::{digit_keycode, HidKeyboardReport};

/// Lifecycle of one key report sequence.
///
/// Not a terminal machine: it cycles back to `Waiting` after every
/// completed press/release pair and can be restarted indefinitely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EmitterState {
    /// No keystroke in flight; a new digit can be accepted.
    #[default]
    Waiting,
    /// A press report for this keycode is due on the next ready tick.
    KeyDown(u8),
    /// The press report went out; the release report is due next.
    KeyUp,
}

/// Two-phase HID keystroke sequencer.
///
/// The decoder hands over a digit only while this machine is `Waiting`,
/// which guarantees every accepted digit produces exactly one press report
/// followed by exactly one release report, with no way to issue two
/// presses without an intervening release.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeystrokeEmitter {
    state: EmitterState,
    report: HidKeyboardReport,
}

impl KeystrokeEmitter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: EmitterState::Waiting,
            report: HidKeyboardReport::release(),
        }
    }

    /// Current lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> EmitterState {
        self.state
    }

    /// True if a new digit can be accepted.
    #[inline]
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        matches!(self.state, EmitterState::Waiting)
    }

    /// True while the press report is outstanding (key reported down to
    /// the host, release not yet submitted). Drives the status indicator.
    #[inline]
    #[must_use]
    pub fn key_down(&self) -> bool {
        matches!(self.state, EmitterState::KeyUp)
    }

    /// Accept a digit for emission. Callers must only do this from
    /// `Waiting` (the decoder's gate enforces it); a digit loaded in any
    /// other state is ignored rather than corrupting the sequence.
    pub fn load(&mut self, digit: DialDigit) {
        debug_assert!(self.is_waiting());
        if self.is_waiting() {
            self.state = EmitterState::KeyDown(digit_keycode(digit));
        }
    }

    /// Advance one tick; returns a report to submit, if any.
    ///
    /// Acts only when the transmit channel is free AND the host has
    /// completed its initial LED-state handshake. Until then the machine
    /// holds its state: emission is deferred, never skipped mid-sequence.
    pub fn step(&mut self, link: HostLink) -> Option<HidKeyboardReport> {
        if !link.tx_ready || !link.leds_seen {
            return None;
        }
        match self.state {
            EmitterState::Waiting => None,
            EmitterState::KeyDown(keycode) => {
                self.report = HidKeyboardReport::key_press(keycode);
                self.state = EmitterState::KeyUp;
                Some(self.report)
            }
            EmitterState::KeyUp => {
                self.report = HidKeyboardReport::release();
                self.state = EmitterState::Waiting;
                Some(self.report)
            }
        }
    }

    /// The most recently built report.
    #[inline]
    #[must_use]
    pub const fn report(&self) -> &HidKeyboardReport {
        &self.report
    }
}
