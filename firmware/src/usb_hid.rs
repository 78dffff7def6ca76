//! USB HID keyboard glue: class configuration, host handshake tracking,
//! and transmit gating.

use defmt::{debug, info};
use dial_core::HostLink;
use embassy_usb::class::hid::{Config, HidReaderWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::Builder;
use portable_atomic::{AtomicBool, AtomicU8, Ordering};
use usbd_hid::descriptor::{KeyboardReport, SerializedDescriptor};

/// Set once the previous IN report has been consumed and the endpoint can
/// take another. Cleared by the poll loop when it hands a report off.
static TX_READY: AtomicBool = AtomicBool::new(false);

/// Latched when the host writes its LED output report for the first time;
/// that write is the host-readiness handshake.
static LEDS_SEEN: AtomicBool = AtomicBool::new(false);

/// Most recent LED/lock state byte received from the host.
static LED_STATE: AtomicU8 = AtomicU8::new(0);

/// Snapshot of the USB collaborator status for one poll tick.
pub fn host_link() -> HostLink {
    HostLink {
        tx_ready: TX_READY.load(Ordering::Relaxed),
        leds_seen: LEDS_SEEN.load(Ordering::Relaxed),
    }
}

/// Mark the transmit channel busy; the report buffer now belongs to the
/// USB collaborator until [`mark_tx_ready`] is called.
pub fn claim_tx() {
    TX_READY.store(false, Ordering::Relaxed);
}

/// Mark the transmit channel free again.
pub fn mark_tx_ready() {
    TX_READY.store(true, Ordering::Relaxed);
}

/// The last LED/lock state the host reported.
pub fn host_led_state() -> u8 {
    LED_STATE.load(Ordering::Relaxed)
}

/// HID request handler for the keyboard's LED output report.
///
/// Both control-pipe SET_REPORT requests and OUT-endpoint writes land
/// here; either one counts as the handshake.
pub struct KeyboardLedHandler;

impl RequestHandler for KeyboardLedHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    fn set_report(&mut self, _id: ReportId, data: &[u8]) -> OutResponse {
        if let Some(&leds) = data.first() {
            LED_STATE.store(leds, Ordering::Relaxed);
            if !LEDS_SEEN.swap(true, Ordering::Relaxed) {
                info!("host LED handshake complete (leds={=u8:x})", leds);
            } else {
                debug!("host LED state: {=u8:x}", leds);
            }
        }
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

/// Configure the USB HID boot keyboard class in the USB builder.
///
/// Uses the stock boot-keyboard report descriptor from `usbd-hid`: an
/// 8-byte input report and a 1-byte LED output report. Returns the
/// reader/writer pair; the reader feeds [`KeyboardLedHandler`], the
/// writer carries keystroke reports.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, embassy_rp::usb::Driver<'d, embassy_rp::peripherals::USB>>,
    state: &'d mut State<'d>,
) -> HidReaderWriter<'d, embassy_rp::usb::Driver<'d, embassy_rp::peripherals::USB>, 1, 8> {
    let config = Config {
        report_descriptor: KeyboardReport::desc(),
        request_handler: None,
        poll_ms: 1,
        max_packet_size: 8,
        hid_subclass: embassy_usb::class::hid::HidSubclass::Boot,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::Keyboard,
    };

    HidReaderWriter::new(builder, state, config)
}
