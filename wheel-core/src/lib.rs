//! Platform-agnostic input sampling for the racing-wheel controller.
//!
//! This crate turns raw pin levels and ADC readings into HID reports. It
//! has no hardware dependencies: boards plug in through the reader traits
//! in [`input`], the bootloader call in [`bootsel`] and the transport in
//! [`output`].
//!
//! # Overview
//!
//! - [`config`]: pin table and tunables ([`PinConfig`], [`WheelConfig`])
//! - [`debounce`]: per-channel debouncing ([`DigitalDebouncer`])
//! - [`quadrature`]: steering encoder decoding ([`QuadratureDecoder`])
//! - [`analog`]: scaling to signed 8-bit axes ([`scale`], [`AnalogSampler`])
//! - [`selector`]: report layout choice ([`ReportSelector`])
//! - [`builder`]: field mapping per layout ([`ReportBuilder`])
//! - [`bootsel`]: bootloader re-entry ([`BootselMonitor`])
//! - [`wheel`]: the sampling tick that ties them together ([`Wheel`])
//!
//! # Example
//!
//! ```rust
//! use wheel_core::{
//!     AnalogInputs, BootloaderEntry, ChannelId, DigitalInputs, TickOutcome, Wheel, WheelConfig,
//! };
//!
//! struct Idle;
//!
//! impl DigitalInputs for Idle {
//!     fn is_high(&mut self, _channel: ChannelId) -> bool {
//!         true
//!     }
//! }
//!
//! impl AnalogInputs for Idle {
//!     fn read(&mut self, _channel: ChannelId) -> u16 {
//!         2048
//!     }
//! }
//!
//! struct NoRom;
//!
//! impl BootloaderEntry for NoRom {
//!     fn enter_bootloader(&mut self, _mask: u32, _disposition: u32) {}
//! }
//!
//! let mut wheel = Wheel::new(&WheelConfig::WHEELER).unwrap();
//! let mut now = 0;
//! let report = loop {
//!     match wheel.tick(&mut Idle, &mut NoRom, now) {
//!         TickOutcome::Report(report) => break report,
//!         _ => now += 1,
//!     }
//! };
//! assert_eq!(report.to_bytes()[0], 0); // steering centered
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log through defmt (for embedded builds)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// Must come first so the macros are visible to the other modules.
#[macro_use]
mod fmt;

pub mod analog;
pub mod bootsel;
pub mod builder;
pub mod config;
pub mod debounce;
pub mod input;
pub mod output;
pub mod quadrature;
pub mod selector;
pub mod wheel;

/// Sampling tick counter. Wraps; only differences are compared.
pub type Tick = u32;

pub use analog::{scale, scale_to, AnalogRange, AnalogSampler, AnalogValue};
pub use bootsel::{BootloaderEntry, BootselMonitor, BootselState};
pub use builder::{HatButtons, ReportBuilder, Sample};
pub use config::{
    AxisCalibration, BootloaderRequest, ChannelId, ConfigError, HatPins, LayoutSelection,
    PedalInput, PinConfig, Role, SteeringCalibration, WheelConfig,
};
pub use debounce::{DebounceTimer, DigitalDebouncer};
pub use input::{AnalogInputs, DigitalInputs};
pub use output::{OutputError, ReportSink};
pub use quadrature::{classify, EncoderState, QuadratureDecoder, Transition};
pub use selector::{ModeLines, ReportSelector};
pub use wheel::{TickOutcome, Wheel};

pub use wheel_report::{ButtonState, Hat, Report, ReportKind};
