//! Reader traits for raw digital and analog inputs.

use crate::config::ChannelId;

/// Non-blocking access to raw digital levels.
///
/// Implementations return the electrical level: `true` is high. The
/// pipeline treats a low level as active, matching pulled-up switches.
///
/// # Panics
///
/// Reading a channel the implementation was not configured with is a
/// programming error and may panic.
pub trait DigitalInputs {
    fn is_high(&mut self, channel: ChannelId) -> bool;
}

/// Non-blocking access to raw analog readings.
///
/// Implementations always return some reading; a failed conversion should
/// repeat the last good value rather than surface an error.
pub trait AnalogInputs {
    fn read(&mut self, channel: ChannelId) -> u16;
}
