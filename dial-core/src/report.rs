//! USB HID boot-keyboard input report layout and digit keycodes.

use crate::decoder::DialDigit;

/// Keycode for the "1" key (HID Keyboard/Keypad usage page).
/// "1" through "9" occupy a contiguous range starting here.
pub const KEY_1: u8 = 0x1E;

/// Keycode for the "0" key, one past "9" in the usage table.
pub const KEY_0: u8 = 0x27;

/// No key pressed.
pub const KEY_NONE: u8 = 0x00;

/// Map a decoded dial digit to its HID keycode.
#[inline]
#[must_use]
pub const fn digit_keycode(digit: DialDigit) -> u8 {
    match digit.value() {
        0 => KEY_0,
        n => KEY_1 + (n - 1),
    }
}

/// USB HID boot keyboard input report.
///
/// This matches the 8-byte wire format of the boot protocol:
/// one modifier byte, one reserved byte, six keycode slots.
///
/// The report buffer is exclusively owned by the keystroke emitter and
/// overwritten in place for each emission; the USB collaborator only ever
/// sees it by value for the duration of one submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(C)]
pub struct HidKeyboardReport {
    /// Modifier bitfield (ctrl/shift/alt/gui); always zero for dial digits.
    pub modifier: u8,
    /// Reserved byte, constant zero.
    pub reserved: u8,
    /// Up to six concurrently pressed keys; the dial uses slot 0 only.
    pub keycodes: [u8; 6],
}

impl HidKeyboardReport {
    /// Size of the report in bytes.
    pub const SIZE: usize = 8;

    /// All-zero report: no modifiers, no keys pressed.
    #[must_use]
    pub const fn release() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [KEY_NONE; 6],
        }
    }

    /// Report with a single key pressed and no modifiers.
    #[must_use]
    pub const fn key_press(keycode: u8) -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [keycode, KEY_NONE, KEY_NONE, KEY_NONE, KEY_NONE, KEY_NONE],
        }
    }

    /// Serialize to the 8-byte wire format.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; Self::SIZE] {
        [
            self.modifier,
            self.reserved,
            self.keycodes[0],
            self.keycodes[1],
            self.keycodes[2],
            self.keycodes[3],
            self.keycodes[4],
            self.keycodes[5],
        ]
    }

    /// True if no key and no modifier is reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == KEY_NONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_keycodes_follow_the_usage_table() {
        assert_eq!(digit_keycode(DialDigit::new(1)), 0x1E);
        assert_eq!(digit_keycode(DialDigit::new(2)), 0x1F);
        assert_eq!(digit_keycode(DialDigit::new(3)), 0x20);
        assert_eq!(digit_keycode(DialDigit::new(9)), 0x26);
        assert_eq!(digit_keycode(DialDigit::new(0)), 0x27);
    }

    #[test]
    fn digit_keycodes_are_distinct() {
        let mut seen = [false; 256];
        for d in 0..=9u8 {
            let code = digit_keycode(DialDigit::new(d)) as usize;
            assert!(!seen[code], "duplicate keycode for digit {d}");
            seen[code] = true;
        }
    }

    #[test]
    fn release_report_is_all_zero() {
        let report = HidKeyboardReport::release();
        assert!(report.is_empty());
        assert_eq!(report.as_bytes(), [0u8; 8]);
    }

    #[test]
    fn press_report_wire_format() {
        let report = HidKeyboardReport::key_press(KEY_0);
        assert!(!report.is_empty());
        assert_eq!(report.as_bytes(), [0, 0, 0x27, 0, 0, 0, 0, 0]);
    }
}
