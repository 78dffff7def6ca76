//! Per-tick orchestration of the debounce, decoder, and emitter machines.
//!
//! One [`PulseDial`] instance is owned by the firmware's polling loop and
//! stepped by exclusive mutable reference once per tick. All state lives in
//! this one context struct; there are no globals and, since the model is
//! strictly single-threaded, no locking.

use crate::config::DialConfig;
use crate::debounce::DebouncedLine;
use crate::decoder::{DialDecoder, DialState, Rotation};
use crate::emitter::KeystrokeEmitter;
use crate::report::HidKeyboardReport;

/// Raw line levels sampled this tick, polarity-normalized (true = active).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineSample {
    /// Idle-detect line: active while the dial sits at rest.
    pub idle: bool,
    /// Pulse-detect line: toggles once per mechanical pulse.
    pub pulse: bool,
}

/// Status of the external USB collaborator, read once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostLink {
    /// The transmit channel has consumed the previous report and can take
    /// another; the emitter must not overwrite an in-flight buffer.
    pub tx_ready: bool,
    /// The host has written its LED output report at least once, i.e. the
    /// initial HID handshake completed.
    pub leds_seen: bool,
}

/// What the polling loop must do after one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum TickAction {
    /// Nothing to submit.
    Idle,
    /// Hand this report to the USB transmit channel.
    SendReport(HidKeyboardReport),
    /// Divert into the firmware-update bootloader; the loop never resumes.
    EnterBootloader,
}

/// Combinational view of the context for the status lamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Indicators {
    /// Debounced pulse line is active (red lamp).
    pub pulse_active: bool,
    /// Debounced idle line is active, dial at rest (green lamp).
    pub dial_resting: bool,
    /// A press report is outstanding (third lamp).
    pub key_down: bool,
}

/// The complete dial-to-keystroke pipeline.
pub struct PulseDial {
    cfg: DialConfig,
    idle_line: DebouncedLine,
    pulse_line: DebouncedLine,
    decoder: DialDecoder,
    emitter: KeystrokeEmitter,
}

impl PulseDial {
    /// New pipeline assuming the dial starts at rest.
    #[must_use]
    pub const fn new(cfg: DialConfig) -> Self {
        Self {
            cfg,
            idle_line: DebouncedLine::new(true),
            pulse_line: DebouncedLine::new(false),
            decoder: DialDecoder::new(),
            emitter: KeystrokeEmitter::new(),
        }
    }

    /// Advance the whole pipeline by one tick.
    ///
    /// Call order matches the signal flow: debounce both lines, step the
    /// decoder on the stable levels, hand any decoded digit to the
    /// emitter, then step the emitter. A firmware-update rotation is
    /// reported immediately and the emitter is not stepped; there is no
    /// continuation after that action.
    pub fn tick(&mut self, sample: LineSample, link: HostLink) -> TickAction {
        let idle = self.idle_line.update(sample.idle, self.cfg.debounce_ticks);
        let pulse = self.pulse_line.update(sample.pulse, self.cfg.debounce_ticks);

        let rotation = self
            .decoder
            .step(idle, pulse, self.emitter.is_waiting(), &self.cfg);

        match rotation {
            Some(Rotation::FirmwareUpdate) => return TickAction::EnterBootloader,
            Some(Rotation::Digit(digit)) => self.emitter.load(digit),
            None => {}
        }

        match self.emitter.step(link) {
            Some(report) => TickAction::SendReport(report),
            None => TickAction::Idle,
        }
    }

    /// Lamp states derived from the current stable signals and emitter.
    #[must_use]
    pub fn indicators(&self) -> Indicators {
        Indicators {
            pulse_active: self.pulse_line.stable(),
            dial_resting: matches!(self.decoder.state(), DialState::Resting),
            key_down: self.emitter.key_down(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &DialConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::report::{KEY_0, KEY_1};
    use std::vec::Vec;

    const READY: HostLink = HostLink {
        tx_ready: true,
        leds_seen: true,
    };

    /// Hold raw levels for `ticks` ticks, collecting every non-idle action.
    fn hold(
        dial: &mut PulseDial,
        idle: bool,
        pulse: bool,
        ticks: u32,
        link: HostLink,
        actions: &mut Vec<TickAction>,
    ) {
        for _ in 0..ticks {
            let action = dial.tick(LineSample { idle, pulse }, link);
            if action != TickAction::Idle {
                actions.push(action);
            }
        }
    }

    /// Long enough for the default 100-tick debounce to commit.
    const SETTLE: u32 = 150;

    /// Run a full rotation with `pulses` pulses against raw (undebounced)
    /// waveforms, then return to rest and settle.
    fn rotate(dial: &mut PulseDial, pulses: u8, link: HostLink) -> Vec<TickAction> {
        let mut actions = Vec::new();
        hold(dial, false, false, SETTLE, link, &mut actions);
        for _ in 0..pulses {
            hold(dial, false, true, SETTLE, link, &mut actions);
            hold(dial, false, false, SETTLE, link, &mut actions);
        }
        hold(dial, true, false, SETTLE, link, &mut actions);
        actions
    }

    fn settled_dial() -> PulseDial {
        let mut dial = PulseDial::new(DialConfig::default());
        let mut actions = Vec::new();
        // Idle line held active 300 ticks: stable idle = active.
        hold(&mut dial, true, false, 300, READY, &mut actions);
        assert!(actions.is_empty());
        assert!(dial.indicators().dial_resting);
        dial
    }

    fn expect_press_release(actions: &[TickAction], keycode: u8) {
        assert_eq!(actions.len(), 2, "expected exactly press + release");
        match actions[0] {
            TickAction::SendReport(r) => {
                assert_eq!(r.keycodes[0], keycode);
                assert_eq!(r.modifier, 0);
            }
            other => panic!("expected press report, got {other:?}"),
        }
        match actions[1] {
            TickAction::SendReport(r) => assert!(r.is_empty()),
            other => panic!("expected release report, got {other:?}"),
        }
    }

    #[test]
    fn three_pulses_emit_digit_three() {
        let mut dial = settled_dial();
        let actions = rotate(&mut dial, 3, READY);
        expect_press_release(&actions, KEY_1 + 2);
    }

    #[test]
    fn ten_pulses_emit_digit_zero() {
        let mut dial = settled_dial();
        let actions = rotate(&mut dial, 10, READY);
        expect_press_release(&actions, KEY_0);
    }

    #[test]
    fn twelve_pulses_are_discarded() {
        let mut dial = settled_dial();
        let actions = rotate(&mut dial, 12, READY);
        assert!(actions.is_empty());
        assert!(dial.indicators().dial_resting);
        assert!(!dial.indicators().key_down);
    }

    #[test]
    fn twenty_pulses_enter_the_bootloader() {
        let mut dial = settled_dial();
        let actions = rotate(&mut dial, 20, READY);
        assert_eq!(actions, [TickAction::EnterBootloader]);
    }

    #[test]
    fn every_digit_maps_to_its_keycode() {
        for (pulses, keycode) in (1..=9u8).map(|n| (n, KEY_1 + n - 1)).chain([(10, KEY_0)]) {
            let mut dial = settled_dial();
            let actions = rotate(&mut dial, pulses, READY);
            expect_press_release(&actions, keycode);
        }
    }

    #[test]
    fn rotation_while_tx_busy_is_discarded_not_queued() {
        let mut dial = settled_dial();
        let busy = HostLink {
            tx_ready: false,
            leds_seen: true,
        };

        // Digit decoded, but the press report is stuck behind a busy
        // transmit channel: the emitter holds in KeyDown.
        let actions = rotate(&mut dial, 4, busy);
        assert!(actions.is_empty());

        // A second full rotation completes while the emitter is busy;
        // it must be dropped entirely.
        let actions = rotate(&mut dial, 7, busy);
        assert!(actions.is_empty());

        // Once the channel frees up, only the first digit's pair appears.
        let mut actions = Vec::new();
        hold(&mut dial, true, false, 10, READY, &mut actions);
        expect_press_release(&actions, KEY_1 + 3);
    }

    #[test]
    fn digits_before_host_handshake_are_dropped() {
        let mut dial = settled_dial();
        let no_handshake = HostLink {
            tx_ready: true,
            leds_seen: false,
        };

        let actions = rotate(&mut dial, 5, no_handshake);
        assert!(actions.is_empty());

        // Later rotations are discarded while the first digit is pinned
        // in the emitter, so nothing is ever double-emitted.
        let actions = rotate(&mut dial, 6, no_handshake);
        assert!(actions.is_empty());

        let mut actions = Vec::new();
        hold(&mut dial, true, false, 10, READY, &mut actions);
        expect_press_release(&actions, KEY_1 + 4);
    }

    #[test]
    fn release_guard_blocks_immediate_redial() {
        // Short debounce keeps the waveforms small; the guard is far
        // longer than both rotations combined.
        let cfg = DialConfig {
            debounce_ticks: 2,
            release_guard_ticks: 5000,
            ..DialConfig::default()
        };
        let mut dial = PulseDial::new(cfg);
        let mut actions = Vec::new();
        hold(&mut dial, true, false, 10, READY, &mut actions);

        // First rotation after power-up is accepted (guard starts elapsed).
        hold(&mut dial, false, false, 10, READY, &mut actions);
        hold(&mut dial, false, true, 10, READY, &mut actions);
        hold(&mut dial, false, false, 10, READY, &mut actions);
        hold(&mut dial, true, false, 10, READY, &mut actions);
        expect_press_release(&actions, KEY_1);

        // Immediate second rotation: guard not yet elapsed, discarded.
        let mut actions = Vec::new();
        hold(&mut dial, false, false, 10, READY, &mut actions);
        hold(&mut dial, false, true, 10, READY, &mut actions);
        hold(&mut dial, false, false, 10, READY, &mut actions);
        hold(&mut dial, true, false, 10, READY, &mut actions);
        assert!(actions.is_empty());
    }

    #[test]
    fn noise_below_debounce_threshold_changes_nothing() {
        let mut dial = settled_dial();
        let mut actions = Vec::new();
        // 99-tick glitches on both lines, well-formed rest in between.
        for _ in 0..20 {
            hold(&mut dial, false, true, 99, READY, &mut actions);
            hold(&mut dial, true, false, 99, READY, &mut actions);
        }
        hold(&mut dial, true, false, SETTLE, READY, &mut actions);
        assert!(actions.is_empty());
        assert!(dial.indicators().dial_resting);
        assert!(!dial.indicators().pulse_active);
    }

    #[test]
    fn indicators_track_stable_lines_and_key_state() {
        let mut dial = settled_dial();
        assert_eq!(
            dial.indicators(),
            Indicators {
                pulse_active: false,
                dial_resting: true,
                key_down: false
            }
        );

        let mut actions = Vec::new();
        hold(&mut dial, false, true, SETTLE, READY, &mut actions);
        let ind = dial.indicators();
        assert!(ind.pulse_active);
        assert!(!ind.dial_resting);
    }

    #[test]
    fn key_down_indicator_spans_the_press_report() {
        let mut dial = settled_dial();
        let busy = HostLink {
            tx_ready: false,
            leds_seen: true,
        };
        let actions = rotate(&mut dial, 2, busy);
        assert!(actions.is_empty());
        assert!(!dial.indicators().key_down);

        // Press goes out on the first ready tick; the indicator holds
        // until the release goes out on the second.
        let press = dial.tick(LineSample { idle: true, pulse: false }, READY);
        assert!(matches!(press, TickAction::SendReport(r) if !r.is_empty()));
        assert!(dial.indicators().key_down);

        let release = dial.tick(LineSample { idle: true, pulse: false }, READY);
        assert!(matches!(release, TickAction::SendReport(r) if r.is_empty()));
        assert!(!dial.indicators().key_down);
    }
}
