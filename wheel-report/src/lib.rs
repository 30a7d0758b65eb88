//! HID report layouts for the racing-wheel controller.
//!
//! This crate defines the binary reports that the controller sends to the
//! host, and nothing about how their values are sampled:
//!
//! - **Types**: field-level values
//!   - [`ButtonState`] - 16-bit button mask
//!   - [`Hat`] - hat switch position and its HID code
//!
//! - **Layouts**: the three fixed report formats
//!   - [`ReportKind`] - which layout is active
//!   - [`SteeringPadReport`], [`CombinedControlsReport`], [`GamePadReport`]
//!   - [`Report`] - one report of any layout
//!
//! - **Encoding**: [`Report::encode`], [`Report::to_bytes`] and
//!   [`Report::decode`] read and write the fixed field offsets.
//!
//! # Wire Format
//!
//! ```text
//! SteeringPad       steering accelerator brake x y z rz rx ry buttons   (11 bytes)
//! CombinedControls  steering accelerator brake x y z rx ry rz buttons   (11 bytes)
//! GamePad           x y z rx ry rz hat buttons                          (9 bytes)
//! ```
//!
//! Axes are `i8`, `hat` is `u8`, `buttons` is a little-endian `u16`.
//!
//! # Example
//!
//! ```
//! use wheel_report::{ButtonState, GamePadReport, Hat, Report, ReportKind};
//!
//! let report = Report::GamePad(GamePadReport {
//!     x: -20,
//!     hat: Hat::Up,
//!     buttons: ButtonState::A,
//!     ..GamePadReport::default()
//! });
//!
//! let bytes = report.to_bytes();
//! assert_eq!(bytes.len(), ReportKind::GamePad.size());
//! assert_eq!(Report::decode(ReportKind::GamePad, &bytes), Ok(report));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod codec;
pub mod layout;
pub mod types;

pub use codec::{DecodeError, EncodeError};
pub use layout::{
    CombinedControlsReport, GamePadReport, Report, ReportBytes, ReportKind, SteeringPadReport,
    MAX_REPORT_SIZE,
};
pub use types::{ButtonState, Hat};
