//! USB HID racing wheel firmware for RP2040.
//!
//! Board support for running the [`wheel_core`] pipeline on a Raspberry Pi
//! Pico: GPIO and ADC readers, the USB HID report sink, and the boot ROM
//! entry used by the bootloader-select line.
//!
//! # Hardware Configuration
//!
//! The pin table is [`PinConfig::WHEELER_V1`](wheel_core::PinConfig::WHEELER_V1).
//! All digital inputs use the internal pull-ups and are active-low. GPIO 25
//! (on-board LED) is lit by the boot ROM while in bootloader mode.
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with three concurrent tasks:
//!
//! - **USB Task**: Manages the USB device stack
//! - **Tick Task**: Samples every input once per millisecond and assembles a report
//! - **Output Task**: Receives reports and writes them to the HID endpoint
//!
//! Reports pass from the tick task to the output task through an Embassy
//! [`Signal`](embassy_sync::signal::Signal) with "latest value wins"
//! semantics, so a slow or absent host never stalls sampling.
//!
//! # Modules
//!
//! - [`inputs`]: GPIO and ADC readers ([`PicoInputs`])
//! - [`usb_output`]: USB HID output ([`UsbHidOutput`])
//! - [`bootloader`]: boot ROM entry ([`RomBootloader`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`layout-mode-lines`** (default): Read the report layout from the mode-select lines
//! - **`layout-steering-pad`**, **`layout-combined`**, **`layout-gamepad`**: Fix the layout at build time

#![no_std]

#[cfg(any(
    all(feature = "layout-mode-lines", feature = "layout-steering-pad"),
    all(feature = "layout-mode-lines", feature = "layout-combined"),
    all(feature = "layout-mode-lines", feature = "layout-gamepad"),
    all(feature = "layout-steering-pad", feature = "layout-combined"),
    all(feature = "layout-steering-pad", feature = "layout-gamepad"),
    all(feature = "layout-combined", feature = "layout-gamepad"),
))]
compile_error!("Only one `layout-*` feature can be enabled - each selects a different report layout");

#[cfg(not(any(
    feature = "layout-mode-lines",
    feature = "layout-steering-pad",
    feature = "layout-combined",
    feature = "layout-gamepad",
)))]
compile_error!("Enable one `layout-*` feature to select the report layout");

use wheel_core::{LayoutSelection, WheelConfig};

pub mod bootloader;
pub mod inputs;
pub mod usb_output;

pub use bootloader::RomBootloader;
pub use inputs::{PicoInputs, DIGITAL_PINS};
pub use usb_output::{configure_usb_hid, report_descriptor, UsbHidOutput, UsbStateHandler};

#[cfg(feature = "layout-mode-lines")]
const LAYOUT: LayoutSelection = LayoutSelection::ModeLines;
#[cfg(feature = "layout-steering-pad")]
const LAYOUT: LayoutSelection = LayoutSelection::Fixed(wheel_report::ReportKind::SteeringPad);
#[cfg(feature = "layout-combined")]
const LAYOUT: LayoutSelection = LayoutSelection::Fixed(wheel_report::ReportKind::CombinedControls);
#[cfg(feature = "layout-gamepad")]
const LAYOUT: LayoutSelection = LayoutSelection::Fixed(wheel_report::ReportKind::GamePad);

/// Configuration the firmware runs with.
pub static CONFIG: WheelConfig = WheelConfig::WHEELER.with_layout(LAYOUT);
