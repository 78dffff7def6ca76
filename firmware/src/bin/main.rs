#![no_std]
#![no_main]

use defmt::{info, warn};
use defmt_rtt as _;
use dial_core::{DialConfig, HidKeyboardReport, PulseDial, TickAction};
use dial_to_keyboard::{configure_usb_hid, firmware_update, usb_hid, DialLines, StatusLeds};
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_rp::watchdog::Watchdog;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use embassy_usb::class::hid::{HidReader, HidWriter, State};
use embassy_usb::{Builder, Config as UsbConfig};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Poll tick period. The 100-tick debounce threshold then gives a 10 ms
/// debounce window, small against the dial's ~100 ms pulse period.
const TICK_PERIOD: Duration = Duration::from_micros(100);

/// Watchdog window; one silent second of the poll loop means a hardware
/// reset.
const WATCHDOG_PERIOD: Duration = Duration::from_millis(1_000);

/// Signal for passing keystroke reports from the dial task to the report task.
/// A Signal (latest value wins) is enough: the transmit-ready gate guarantees
/// at most one report is ever outstanding.
static REPORT_SIGNAL: StaticCell<Signal<CriticalSectionRawMutex, HidKeyboardReport>> =
    StaticCell::new();

/// USB device configuration buffers.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Dial-to-Keyboard starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // Watchdog armed before anything else; only the dial task feeds it.
    let mut watchdog = Watchdog::new(p.WATCHDOG);
    watchdog.start(WATCHDOG_PERIOD);

    let signal = REPORT_SIGNAL.init(Signal::new());

    // --- Dial wiring ---
    // Both contacts switch the lines to ground; pull-ups keep them high
    // while the contacts are open.
    let dial_lines = DialLines::new(
        Input::new(p.PIN_2, Pull::Up), // idle detect
        Input::new(p.PIN_3, Pull::Up), // pulse detect
    );

    let leds = StatusLeds::new(
        Output::new(p.PIN_13, Level::Low), // red: pulse line
        Output::new(p.PIN_14, Level::Low), // green: idle line
        Output::new(p.PIN_15, Level::Low), // yellow: key down
    );

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("Rotary Works");
    usb_config.product = Some("Dial-to-Keyboard");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let hid = configure_usb_hid(&mut builder, hid_state);

    // Build the USB device
    let usb_device = builder.build();

    let (hid_reader, hid_writer) = hid.split();

    spawner.spawn(usb_task(usb_device)).unwrap();
    spawner.spawn(led_output_task(hid_reader)).unwrap();
    spawner.spawn(report_task(hid_writer, signal)).unwrap();
    spawner.spawn(dial_task(dial_lines, leds, watchdog, signal)).unwrap();

    info!("Dial-to-Keyboard initialized, waiting for rotations...");
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Consumes host LED output reports; the first one latches the
/// host-readiness handshake inside [`usb_hid`].
#[embassy_executor::task]
async fn led_output_task(reader: HidReader<'static, Driver<'static, USB>, 1>) {
    let mut handler = dial_to_keyboard::KeyboardLedHandler;
    reader.run(false, &mut handler).await;
}

/// Writes keystroke reports to the HID IN endpoint and frees the transmit
/// gate once each transfer is consumed.
#[embassy_executor::task]
async fn report_task(
    mut writer: HidWriter<'static, Driver<'static, USB>, 8>,
    signal: &'static Signal<CriticalSectionRawMutex, HidKeyboardReport>,
) {
    // Wait for USB to be ready (enumeration complete).
    writer.ready().await;
    usb_hid::mark_tx_ready();
    info!("USB HID ready, keystrokes enabled");

    loop {
        let report = signal.wait().await;
        if let Err(e) = writer.write(&report.as_bytes()).await {
            warn!("HID write failed: {:?}", e);
        }
        usb_hid::mark_tx_ready();
    }
}

/// The polling loop: one tick every `TICK_PERIOD`.
///
/// Each iteration feeds the watchdog unconditionally, samples the dial
/// lines, advances the whole decoding pipeline by one tick, and mirrors
/// the pipeline state onto the status lamps.
#[embassy_executor::task]
async fn dial_task(
    mut lines: DialLines<Input<'static>>,
    mut leds: StatusLeds,
    mut watchdog: Watchdog,
    signal: &'static Signal<CriticalSectionRawMutex, HidKeyboardReport>,
) {
    let mut dial = PulseDial::new(DialConfig::new());
    let mut ticker = Ticker::every(TICK_PERIOD);

    loop {
        // Refreshed before any branch; a wedged tick is recovered by
        // hardware reset within the watchdog window.
        watchdog.feed();

        let sample = lines.sample();
        match dial.tick(sample, usb_hid::host_link()) {
            TickAction::Idle => {}
            TickAction::SendReport(report) => {
                usb_hid::claim_tx();
                signal.signal(report);
            }
            TickAction::EnterBootloader => {
                info!("firmware-update gesture dialed, rebooting to bootloader");
                firmware_update::enter();
            }
        }

        leds.show(dial.indicators());
        ticker.next().await;
    }
}
