//! Boot ROM entry for the bootloader-select line.

use wheel_core::BootloaderEntry;

/// Restarts into the RP2040's USB mass-storage bootloader.
pub struct RomBootloader;

impl BootloaderEntry for RomBootloader {
    fn enter_bootloader(&mut self, indicator_mask: u32, disposition: u32) {
        defmt::flush();
        embassy_rp::rom_data::reset_to_usb_boot(indicator_mask, disposition);
        // The ROM call resets the chip and does not come back.
        loop {
            cortex_m::asm::wfi();
        }
    }
}
