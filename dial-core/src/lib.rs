//! Platform-agnostic rotary dial decoding and HID keystroke state machines.
//!
//! This crate provides the core logic for turning the two noisy digital
//! lines of a rotary telephone dial into USB HID keyboard reports, without
//! any platform-specific dependencies. It can be used both in embedded
//! `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! The crate is organized into several modules:
//!
//! - [`config`]: Tuning parameters ([`DialConfig`], [`PulseEdge`])
//! - [`debounce`]: Raw-line noise filtering ([`DebouncedLine`])
//! - [`decoder`]: Pulse counting and digit decoding ([`DialDecoder`])
//! - [`report`]: HID keyboard report layout ([`HidKeyboardReport`])
//! - [`emitter`]: Press/release report sequencing ([`KeystrokeEmitter`])
//! - [`context`]: Per-tick orchestration ([`PulseDial`])
//!
//! # Data Flow
//!
//! Everything is driven from a single polling loop, once per tick:
//!
//! ```text
//! raw lines -> DebouncedLine -> DialDecoder -> KeystrokeEmitter -> TickAction
//! ```
//!
//! A dial rotation leaves the idle line, generates one pulse per digit
//! position on the pulse line, and returns to rest. On return to rest the
//! decoder maps the pulse count to a digit (10 pulses encode digit 0) and,
//! if the emitter is free, hands it over for a press/release report pair.
//! Over-long pulse trains are the operator gesture for entering the
//! firmware-update bootloader.
//!
//! # Example
//!
//! ```rust
//! use dial_core::{DialConfig, HostLink, LineSample, PulseDial, TickAction};
//!
//! let mut dial = PulseDial::new(DialConfig::default());
//! let link = HostLink { tx_ready: true, leds_seen: true };
//!
//! // Dial at rest: idle line active, pulse line quiet.
//! let action = dial.tick(LineSample { idle: true, pulse: false }, link);
//! assert_eq!(action, TickAction::Idle);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod context;
pub mod debounce;
pub mod decoder;
pub mod emitter;
pub mod report;

// Re-export main types at crate root
pub use config::{DialConfig, PulseEdge};
pub use context::{HostLink, Indicators, LineSample, PulseDial, TickAction};
pub use debounce::DebouncedLine;
pub use decoder::{DialDecoder, DialDigit, DialState, Rotation};
pub use emitter::{EmitterState, KeystrokeEmitter};
pub use report::{digit_keycode, HidKeyboardReport};
