//! One-way jump into the RP2040 ROM USB bootloader.

use embassy_rp::rom_data;

/// Reboot into the ROM's USB mass-storage bootloader for reflashing.
///
/// Divergent: the ROM re-enumerates the device as a storage drive and
/// normal operation never resumes. A power cycle or a new firmware image
/// brings the dial back.
pub fn enter() -> ! {
    rom_data::reset_to_usb_boot(0, 0);
    // reset_to_usb_boot does not return, but its signature cannot say so.
    loop {
        cortex_m::asm::wfe();
    }
}
