//! Rotary telephone dial to USB HID keyboard firmware for RP2040.
//!
//! This crate provides the embedded shell around [`dial_core`]: it samples
//! the dial's two contact lines, runs the decoding pipeline once per poll
//! tick, and presents the decoded digits to the host as a USB HID boot
//! keyboard.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Samples the idle-detect and pulse-detect lines every 100 µs
//! 2. Debounces them and decodes one digit per dial rotation
//! 3. Emits the digit as a key press/release report pair over USB HID
//!
//! Winding the dial past 17 pulses (holding it beyond the finger stop) is
//! the operator gesture for rebooting into the RP2040 ROM USB bootloader.
//!
//! # Hardware Configuration
//!
//! | Function       | GPIO | Description                                  |
//! |----------------|------|----------------------------------------------|
//! | Idle detect    | 2    | Active low, closed while the dial rests      |
//! | Pulse detect   | 3    | Active low, toggles once per pulse           |
//! | Red LED        | 13   | Tracks the debounced pulse line              |
//! | Green LED      | 14   | Tracks the debounced idle line               |
//! | Yellow LED     | 15   | Lit while a key is reported down             |
//!
//! Both dial inputs use the internal pull-ups; the dial contacts switch
//! the lines to ground.
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with four tasks:
//!
//! - **USB Task**: Runs the USB device stack
//! - **Dial Task**: The 100 µs polling loop; feeds the watchdog, samples
//!   the lines, steps [`dial_core::PulseDial`], drives the status LEDs
//! - **Report Task**: Receives keystroke reports and writes them to the
//!   HID IN endpoint
//! - **LED Output Task**: Consumes host LED output reports; the first one
//!   completes the host-readiness handshake
//!
//! Reports travel from the dial task to the report task over an
//! embassy-sync [`Signal`](embassy_sync::signal::Signal); a ready flag in
//! [`usb_hid`] guarantees the report buffer is never overwritten while a
//! transfer is in flight.
//!
//! A hardware watchdog with a one second window is fed unconditionally at
//! the top of every poll tick; a wedged loop is recovered by hardware
//! reset.
//!
//! # Modules
//!
//! - [`dial_input`]: Dial contact sampling ([`DialLines`])
//! - [`status`]: Status lamp driver ([`StatusLeds`])
//! - [`usb_hid`]: HID class setup, host handshake, transmit gating
//! - [`firmware_update`]: One-way jump into the ROM bootloader
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)

#![no_std]

// Ensure exactly one panic strategy is selected
#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features - they define conflicting panic handlers");

pub mod dial_input;
pub mod firmware_update;
pub mod status;
pub mod usb_hid;

pub use dial_input::DialLines;
pub use status::StatusLeds;
pub use usb_hid::{configure_usb_hid, KeyboardLedHandler};
