//! The three report layouts and the `Report` tagged variant.
//!
//! Host drivers bind fields by position, so the field order of each struct
//! is the wire order. The steering layouts differ only in where `rz` sits:
//!
//! ```text
//! SteeringPad       steering accelerator brake x y z rz rx ry buttons(u16)
//! CombinedControls  steering accelerator brake x y z rx ry rz buttons(u16)
//! GamePad           x y z rx ry rz hat(u8) buttons(u16)
//! ```

use crate::codec::{DecodeError, EncodeError, FieldReader, FieldWriter};
use crate::types::{ButtonState, Hat};

/// Largest encoded report, in bytes.
pub const MAX_REPORT_SIZE: usize = 11;

/// Encoded report bytes.
pub type ReportBytes = heapless::Vec<u8, MAX_REPORT_SIZE>;

const _: () = {
    let mut i = 0;
    while i < ReportKind::ALL.len() {
        assert!(ReportKind::ALL[i].size() <= MAX_REPORT_SIZE);
        i += 1;
    }
};

/// Which report layout is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportKind {
    /// Wheel, pedals and sticks, with `rz` before `rx`/`ry`.
    SteeringPad,
    /// Wheel, pedals and sticks, with pedals mirrored onto the trigger axes.
    CombinedControls,
    /// Plain game pad with a hat switch.
    GamePad,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::SteeringPad,
        ReportKind::CombinedControls,
        ReportKind::GamePad,
    ];

    /// Encoded size of this layout in bytes.
    #[inline]
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            ReportKind::SteeringPad => SteeringPadReport::SIZE,
            ReportKind::CombinedControls => CombinedControlsReport::SIZE,
            ReportKind::GamePad => GamePadReport::SIZE,
        }
    }

    /// Whether the layout carries a hat field.
    #[inline]
    #[must_use]
    pub const fn has_hat(self) -> bool {
        matches!(self, ReportKind::GamePad)
    }
}

/// Steering pad report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SteeringPadReport {
    pub steering: i8,
    pub accelerator: i8,
    pub brake: i8,
    /// Left stick X
    pub x: i8,
    /// Left stick Y
    pub y: i8,
    /// Right stick X
    pub z: i8,
    /// Right stick Y
    pub rz: i8,
    /// Left trigger
    pub rx: i8,
    /// Right trigger
    pub ry: i8,
    pub buttons: ButtonState,
}

impl SteeringPadReport {
    pub const SIZE: usize = 11;

    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        let mut w = FieldWriter::new(buf, Self::SIZE)?;
        w.i8(self.steering);
        w.i8(self.accelerator);
        w.i8(self.brake);
        w.i8(self.x);
        w.i8(self.y);
        w.i8(self.z);
        w.i8(self.rz);
        w.i8(self.rx);
        w.i8(self.ry);
        w.u16_le(self.buttons.raw());
        Ok(w.finish())
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = FieldReader::new(bytes, Self::SIZE)?;
        Ok(Self {
            steering: r.i8(),
            accelerator: r.i8(),
            brake: r.i8(),
            x: r.i8(),
            y: r.i8(),
            z: r.i8(),
            rz: r.i8(),
            rx: r.i8(),
            ry: r.i8(),
            buttons: ButtonState(r.u16_le()),
        })
    }
}

/// Combined controls report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CombinedControlsReport {
    pub steering: i8,
    pub accelerator: i8,
    pub brake: i8,
    pub x: i8,
    pub y: i8,
    pub z: i8,
    pub rx: i8,
    pub ry: i8,
    pub rz: i8,
    pub buttons: ButtonState,
}

impl CombinedControlsReport {
    pub const SIZE: usize = 11;

    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        let mut w = FieldWriter::new(buf, Self::SIZE)?;
        w.i8(self.steering);
        w.i8(self.accelerator);
        w.i8(self.brake);
        w.i8(self.x);
        w.i8(self.y);
        w.i8(self.z);
        w.i8(self.rx);
        w.i8(self.ry);
        w.i8(self.rz);
        w.u16_le(self.buttons.raw());
        Ok(w.finish())
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = FieldReader::new(bytes, Self::SIZE)?;
        Ok(Self {
            steering: r.i8(),
            accelerator: r.i8(),
            brake: r.i8(),
            x: r.i8(),
            y: r.i8(),
            z: r.i8(),
            rx: r.i8(),
            ry: r.i8(),
            rz: r.i8(),
            buttons: ButtonState(r.u16_le()),
        })
    }
}

/// Game pad report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GamePadReport {
    pub x: i8,
    pub y: i8,
    pub z: i8,
    pub rx: i8,
    pub ry: i8,
    pub rz: i8,
    pub hat: Hat,
    pub buttons: ButtonState,
}

impl GamePadReport {
    pub const SIZE: usize = 9;

    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        let mut w = FieldWriter::new(buf, Self::SIZE)?;
        w.i8(self.x);
        w.i8(self.y);
        w.i8(self.z);
        w.i8(self.rx);
        w.i8(self.ry);
        w.i8(self.rz);
        w.u8(self.hat.code());
        w.u16_le(self.buttons.raw());
        Ok(w.finish())
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = FieldReader::new(bytes, Self::SIZE)?;
        Ok(Self {
            x: r.i8(),
            y: r.i8(),
            z: r.i8(),
            rx: r.i8(),
            ry: r.i8(),
            rz: r.i8(),
            hat: Hat::from_code(r.u8()),
            buttons: ButtonState(r.u16_le()),
        })
    }
}

/// One report in the active layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    SteeringPad(SteeringPadReport),
    CombinedControls(CombinedControlsReport),
    GamePad(GamePadReport),
}

impl Report {
    /// All axes centered, no buttons, hat centered.
    #[must_use]
    pub fn neutral(kind: ReportKind) -> Self {
        match kind {
            ReportKind::SteeringPad => Report::SteeringPad(SteeringPadReport::default()),
            ReportKind::CombinedControls => {
                Report::CombinedControls(CombinedControlsReport::default())
            }
            ReportKind::GamePad => Report::GamePad(GamePadReport::default()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        match self {
            Report::SteeringPad(_) => ReportKind::SteeringPad,
            Report::CombinedControls(_) => ReportKind::CombinedControls,
            Report::GamePad(_) => ReportKind::GamePad,
        }
    }

    #[inline]
    #[must_use]
    pub const fn buttons(&self) -> ButtonState {
        match self {
            Report::SteeringPad(r) => r.buttons,
            Report::CombinedControls(r) => r.buttons,
            Report::GamePad(r) => r.buttons,
        }
    }

    /// Encode into `buf`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::BufferTooSmall`] if `buf` is shorter than the layout.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        match self {
            Report::SteeringPad(r) => r.encode(buf),
            Report::CombinedControls(r) => r.encode(buf),
            Report::GamePad(r) => r.encode(buf),
        }
    }

    /// Encode into an owned byte vector sized to the layout.
    #[must_use]
    pub fn to_bytes(&self) -> ReportBytes {
        let size = self.kind().size();
        let mut bytes = ReportBytes::new();
        let written = bytes
            .resize_default(size)
            .ok()
            .and_then(|()| self.encode(&mut bytes).ok());
        debug_assert_eq!(written, Some(size));
        bytes
    }

    /// Read a report of `kind` back from its encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Length`] unless `bytes` is exactly the layout size.
    pub fn decode(kind: ReportKind, bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(match kind {
            ReportKind::SteeringPad => Report::SteeringPad(SteeringPadReport::decode(bytes)?),
            ReportKind::CombinedControls => {
                Report::CombinedControls(CombinedControlsReport::decode(bytes)?)
            }
            ReportKind::GamePad => Report::GamePad(GamePadReport::decode(bytes)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(ReportKind::SteeringPad.size(), 11);
        assert_eq!(ReportKind::CombinedControls.size(), 11);
        assert_eq!(ReportKind::GamePad.size(), 9);
        assert!(ReportKind::ALL.iter().all(|k| k.size() <= MAX_REPORT_SIZE));
    }

    #[test]
    fn test_steering_pad_byte_order() {
        let report = Report::SteeringPad(SteeringPadReport {
            steering: 1,
            accelerator: 2,
            brake: 3,
            x: 4,
            y: 5,
            z: 6,
            rz: 7,
            rx: 8,
            ry: 9,
            buttons: ButtonState(0xA00B),
        });
        assert_eq!(
            report.to_bytes().as_slice(),
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, 0x0B, 0xA0]
        );
    }

    #[test]
    fn test_combined_controls_byte_order() {
        let report = Report::CombinedControls(CombinedControlsReport {
            steering: -1,
            accelerator: 2,
            brake: 3,
            x: 4,
            y: 5,
            z: 6,
            rx: 7,
            ry: 8,
            rz: 9,
            buttons: ButtonState::A | ButtonState::GUIDE,
        });
        assert_eq!(
            report.to_bytes().as_slice(),
            &[0xFF, 2, 3, 4, 5, 6, 7, 8, 9, 0x01, 0x01]
        );
    }

    #[test]
    fn test_gamepad_byte_order() {
        let report = Report::GamePad(GamePadReport {
            x: -128,
            y: 127,
            z: 0,
            rx: 1,
            ry: 2,
            rz: 3,
            hat: Hat::Left,
            buttons: ButtonState::B,
        });
        assert_eq!(
            report.to_bytes().as_slice(),
            &[0x80, 0x7F, 0, 1, 2, 3, 6, 0x02, 0x00]
        );
    }

    #[test]
    fn test_neutral_gamepad_has_centered_hat() {
        let bytes = Report::neutral(ReportKind::GamePad).to_bytes();
        assert_eq!(bytes[6], Hat::CENTERED_CODE);
        assert!(bytes.iter().enumerate().all(|(i, &b)| i == 6 || b == 0));
    }

    #[test]
    fn test_to_bytes_matches_encode() {
        for kind in ReportKind::ALL {
            let report = Report::neutral(kind);
            let mut buf = [0xAAu8; MAX_REPORT_SIZE];
            let len = report.encode(&mut buf).unwrap();
            let bytes = report.to_bytes();
            assert_eq!(bytes.len(), kind.size());
            assert_eq!(bytes.as_slice(), &buf[..len]);
        }
    }

    #[test]
    fn test_decode_recovers_fields() {
        let bytes = [10u8, 20, 30, 0xF6, 0xEC, 0xE2, 1, 2, 3, 0x34, 0x12];
        let report = Report::decode(ReportKind::CombinedControls, &bytes).unwrap();
        let Report::CombinedControls(r) = report else {
            panic!("wrong variant");
        };
        assert_eq!(r.steering, 10);
        assert_eq!(r.x, -10);
        assert_eq!(r.z, -30);
        assert_eq!(r.rx, 1);
        assert_eq!(r.rz, 3);
        assert_eq!(r.buttons.raw(), 0x1234);
    }

    #[test]
    fn test_decode_wrong_length() {
        assert_eq!(
            Report::decode(ReportKind::GamePad, &[0u8; 11]),
            Err(DecodeError::Length {
                expected: 9,
                actual: 11
            })
        );
    }

    #[test]
    fn test_encode_into_short_buffer() {
        let mut buf = [0u8; 8];
        assert!(matches!(
            Report::neutral(ReportKind::GamePad).encode(&mut buf),
            Err(EncodeError::BufferTooSmall { needed: 9, available: 8 })
        ));
    }
}
