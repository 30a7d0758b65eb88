//! Fixed-offset byte encoding for report layouts.
//!
//! Every layout is a flat sequence of 8- and 16-bit fields with no padding.
//! 16-bit fields are little-endian, as USB HID transfers them.

/// Error returned when a report does not fit the output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// The output buffer is shorter than the report.
    BufferTooSmall { needed: usize, available: usize },
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall { needed, available } => {
                write!(f, "buffer too small: need {needed} bytes, have {available}")
            }
        }
    }
}

/// Error returned when bytes cannot be read back as a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// The input length does not match the layout size.
    Length { expected: usize, actual: usize },
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Length { expected, actual } => {
                write!(f, "expected {expected} report bytes, got {actual}")
            }
        }
    }
}

/// Sequential writer over a buffer already checked to be large enough.
pub(crate) struct FieldWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> FieldWriter<'a> {
    /// Wrap `buf`, failing if it is shorter than `size`.
    #[inline]
    pub(crate) fn new(buf: &'a mut [u8], size: usize) -> Result<Self, EncodeError> {
        if buf.len() < size {
            return Err(EncodeError::BufferTooSmall {
                needed: size,
                available: buf.len(),
            });
        }
        Ok(Self { buf, pos: 0 })
    }

    #[inline]
    pub(crate) fn u8(&mut self, value: u8) {
        self.buf[self.pos] = value;
        self.pos += 1;
    }

    #[inline]
    pub(crate) fn i8(&mut self, value: i8) {
        self.u8(value as u8);
    }

    #[inline]
    pub(crate) fn u16_le(&mut self, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.u8(lo);
        self.u8(hi);
    }

    /// Number of bytes written.
    #[inline]
    pub(crate) fn finish(self) -> usize {
        self.pos
    }
}

/// Sequential reader over a slice already checked to have the layout size.
pub(crate) struct FieldReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    /// Wrap `bytes`, failing unless its length is exactly `size`.
    #[inline]
    pub(crate) fn new(bytes: &'a [u8], size: usize) -> Result<Self, DecodeError> {
        if bytes.len() != size {
            return Err(DecodeError::Length {
                expected: size,
                actual: bytes.len(),
            });
        }
        Ok(Self { bytes, pos: 0 })
    }

    #[inline]
    pub(crate) fn u8(&mut self) -> u8 {
        let value = self.bytes[self.pos];
        self.pos += 1;
        value
    }

    #[inline]
    pub(crate) fn i8(&mut self) -> i8 {
        self.u8() as i8
    }

    #[inline]
    pub(crate) fn u16_le(&mut self) -> u16 {
        let lo = self.u8();
        let hi = self.u8();
        u16::from_le_bytes([lo, hi])
    }
}
