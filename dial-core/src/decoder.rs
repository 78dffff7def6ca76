//! Dial decoder: counts pulses during one rotation and maps them to a digit.

use crate::config::{DialConfig, PulseEdge};

/// A decoded dial digit, 0 through 9.
///
/// Ten pulses encode digit 0; one through nine pulses encode themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DialDigit(u8);

impl DialDigit {
    /// Wrap a digit value. Only 0..=9 are meaningful.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        debug_assert!(value <= 9);
        Self(value)
    }

    /// The digit value, 0..=9.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Where the dial mechanism currently is, tracked off the stable idle line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DialState {
    /// Idle line active: the dial sits at its rest position.
    #[default]
    Resting,
    /// Idle line inactive: the dial is rotating and generating pulses.
    Dialing,
}

/// Outcome of a completed dial rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum Rotation {
    /// A valid pulse train was accepted and decoded.
    Digit(DialDigit),
    /// The operator held the dial past the update-gesture threshold;
    /// the caller must divert into the bootloader and never return.
    FirmwareUpdate,
}

/// State machine over the debounced idle line with a pulse-edge counter.
///
/// Fed once per tick with the current stable idle and pulse levels. The
/// transition from `Dialing` back to `Resting` finalizes the rotation; all
/// out-of-range pulse counts are discarded silently, by policy: a glitching
/// dial must never crash or hang the device.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DialDecoder {
    state: DialState,
    pulse_count: u8,
    prev_pulse: bool,
    release_guard: u16,
}

impl DialDecoder {
    /// New decoder assuming the dial starts at rest with a quiet pulse line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DialState::Resting,
            pulse_count: 0,
            prev_pulse: false,
            // Start at cap so the very first rotation is not guarded off.
            release_guard: u16::MAX,
        }
    }

    /// Current position in the rotation cycle.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> DialState {
        self.state
    }

    /// Pulses observed since the dial left rest.
    #[inline]
    #[must_use]
    pub const fn pulse_count(&self) -> u8 {
        self.pulse_count
    }

    /// Advance one tick with the debounced line levels.
    ///
    /// `emitter_waiting` gates digit delivery: a rotation that completes
    /// while the previous keystroke is still being reported is discarded,
    /// never queued. The firmware-update gesture bypasses every gate.
    pub fn step(
        &mut self,
        idle: bool,
        pulse: bool,
        emitter_waiting: bool,
        cfg: &DialConfig,
    ) -> Option<Rotation> {
        if self.release_guard < cfg.release_guard_ticks {
            self.release_guard += 1;
        }

        let edge = match cfg.pulse_edge {
            PulseEdge::Falling => self.prev_pulse && !pulse,
            PulseEdge::Rising => !self.prev_pulse && pulse,
        };
        self.prev_pulse = pulse;

        match self.state {
            DialState::Resting => {
                if !idle {
                    // Dial left its rest position: a rotation begins.
                    self.state = DialState::Dialing;
                    self.pulse_count = 0;
                }
                None
            }
            DialState::Dialing => {
                if edge {
                    self.pulse_count = self.pulse_count.saturating_add(1);
                }
                if idle {
                    self.state = DialState::Resting;
                    self.finalize(emitter_waiting, cfg)
                } else {
                    None
                }
            }
        }
    }

    fn finalize(&mut self, emitter_waiting: bool, cfg: &DialConfig) -> Option<Rotation> {
        let count = self.pulse_count;

        if count > cfg.update_gesture_pulses {
            // Operator gesture, not an error: unconditionally terminal.
            return Some(Rotation::FirmwareUpdate);
        }

        let guard_elapsed = self.release_guard >= cfg.release_guard_ticks;
        if count >= 1 && count <= cfg.max_digit_pulses && emitter_waiting && guard_elapsed {
            self.release_guard = 0;
            let digit = if count == cfg.max_digit_pulses { 0 } else { count };
            return Some(Rotation::Digit(DialDigit::new(digit)));
        }

        // Counts of 0 and 11..=17, or a busy emitter, or an unexpired
        // guard: drop the rotation without emission.
        None
    }
}

impl Default for DialDecoder {
    fn default() -> Self {
        Self::new()
    }
}
