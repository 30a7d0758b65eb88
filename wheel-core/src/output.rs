//! Report transmitter seam.

use core::future::Future;
use wheel_report::Report;

/// Why a report did not reach the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// The endpoint write failed.
    Io,
    /// The host has not configured the device yet.
    NotReady,
    /// The report's layout differs from the one the host was given.
    Dropped,
}

impl core::fmt::Display for OutputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Io => "endpoint write failed",
            Self::NotReady => "device not configured",
            Self::Dropped => "report layout does not match the descriptor",
        })
    }
}

/// Hands finished reports to the HID transport.
///
/// A failed send loses only that report; the caller carries on with the
/// next tick.
pub trait ReportSink {
    /// Write one report to the host.
    fn send(&mut self, report: &Report) -> impl Future<Output = Result<(), OutputError>>;

    /// Whether the host currently accepts reports.
    fn is_ready(&self) -> bool;
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn test_error_messages() {
        assert_eq!(OutputError::NotReady.to_string(), "device not configured");
        assert_eq!(
            OutputError::Dropped.to_string(),
            "report layout does not match the descriptor"
        );
    }
}
