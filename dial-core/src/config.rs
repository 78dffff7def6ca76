//! Tuning parameters for the dial state machines.
//!
//! All timing thresholds and pulse-count limits live here so they can be
//! adjusted in one place and passed in at initialization instead of being
//! scattered as literals through the state machines.

/// Which edge of the debounced pulse line counts as one dial pulse.
///
/// Pulse contacts differ between dial mechanisms and wiring conventions,
/// so the polarity is a parameter rather than a hard-coded assumption.
/// Validate against real hardware when bringing up a new dial.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseEdge {
    /// Count active-to-inactive transitions (normally-closed contacts).
    #[default]
    Falling,
    /// Count inactive-to-active transitions (normally-open contacts).
    Rising,
}

/// Configuration for the dial decoding pipeline.
///
/// Defaults assume a 100 µs poll tick:
///
/// - 100 debounce ticks ≈ 10 ms, well under one mechanical pulse period
///   (~100 ms at 10 pps) but far above contact-bounce noise.
/// - 1000 release-guard ticks ≈ 100 ms of mandatory rest between accepted
///   rotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DialConfig {
    /// Consecutive disagreeing ticks a raw line must hold before the
    /// debounced value is updated.
    pub debounce_ticks: u16,
    /// Saturation cap of the release guard counter; a rotation is only
    /// accepted once the dial has rested at least this many ticks since
    /// the last accepted rotation.
    pub release_guard_ticks: u16,
    /// Largest pulse count that encodes a digit (10 pulses encode 0).
    pub max_digit_pulses: u8,
    /// Pulse counts above this trigger the firmware-update gesture.
    pub update_gesture_pulses: u8,
    /// Edge of the debounced pulse line that increments the pulse count.
    pub pulse_edge: PulseEdge,
}

impl DialConfig {
    /// Default configuration for a standard 10 pps rotary dial.
    pub const fn new() -> Self {
        Self {
            debounce_ticks: 100,
            release_guard_ticks: 1000,
            max_digit_pulses: 10,
            update_gesture_pulses: 17,
            pulse_edge: PulseEdge::Falling,
        }
    }
}

impl Default for DialConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_const_constructor() {
        assert_eq!(DialConfig::default(), DialConfig::new());
    }

    #[test]
    fn defaults_leave_headroom_between_digit_and_gesture() {
        let cfg = DialConfig::default();
        // Counts of 11..=17 are the discard band between a valid digit
        // and the bootloader gesture.
        assert!(cfg.update_gesture_pulses > cfg.max_digit_pulses);
    }
}
