//! Linear scaling of raw readings into signed 8-bit report axes.

/// Signed 8-bit axis value as carried in reports.
pub type AnalogValue = i8;

/// Inclusive range `[min, max]` of a raw reading.
///
/// A range with `min > max` is inverted: `min` maps to the low end of the
/// target and `max` to the high end, so a pedal wired backwards is fixed by
/// swapping its calibration bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogRange {
    pub min: i32,
    pub max: i32,
}

impl AnalogRange {
    /// Full range of a signed 8-bit axis.
    pub const AXIS: Self = Self::new(i8::MIN as i32, i8::MAX as i32);

    /// Full range of the RP2040's 12-bit ADC.
    pub const ADC_12BIT: Self = Self::new(0, 4095);

    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Same bounds, opposite direction.
    #[must_use]
    pub const fn inverted(self) -> Self {
        Self::new(self.max, self.min)
    }

    /// Signed width `max - min`.
    #[inline]
    #[must_use]
    pub const fn span(self) -> i64 {
        self.max as i64 - self.min as i64
    }

    #[inline]
    #[must_use]
    pub const fn is_degenerate(self) -> bool {
        self.min == self.max
    }

    #[inline]
    const fn lower(self) -> i64 {
        if self.min < self.max {
            self.min as i64
        } else {
            self.max as i64
        }
    }

    #[inline]
    const fn upper(self) -> i64 {
        if self.min < self.max {
            self.max as i64
        } else {
            self.min as i64
        }
    }
}

/// Map `raw` from `raw_range` onto the full axis range `[-128, 127]`.
///
/// Readings outside `raw_range` clamp to the axis ends.
#[inline]
#[must_use]
pub fn scale(raw: i32, raw_range: AnalogRange) -> AnalogValue {
    scale_to(raw, raw_range, AnalogRange::AXIS)
}

/// Map `raw` from `raw_range` onto `target`, clamped to `target` and to the
/// `i8` range. The result is rounded to the nearest step.
///
/// A degenerate `raw_range` has no slope; every reading maps to `target.min`.
#[must_use]
pub fn scale_to(raw: i32, raw_range: AnalogRange, target: AnalogRange) -> AnalogValue {
    let target = AnalogRange::new(
        target.min.clamp(i8::MIN as i32, i8::MAX as i32),
        target.max.clamp(i8::MIN as i32, i8::MAX as i32),
    );
    let (lo, hi) = (target.lower(), target.upper());

    let value = if raw_range.is_degenerate() {
        target.min as i64
    } else {
        let offset = raw as i64 - raw_range.min as i64;
        target.min as i64 + div_round(offset * target.span(), raw_range.span())
    };

    value.clamp(lo, hi) as AnalogValue
}

/// Integer division rounding half away from zero.
#[inline]
const fn div_round(n: i64, d: i64) -> i64 {
    let q = n / d;
    let r = n % d;
    if 2 * r.abs() >= d.abs() {
        q + n.signum() * d.signum()
    } else {
        q
    }
}

/// Scales raw readings of one configured input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogSampler {
    raw_range: AnalogRange,
}

impl AnalogSampler {
    #[must_use]
    pub const fn new(raw_range: AnalogRange) -> Self {
        Self { raw_range }
    }

    #[inline]
    #[must_use]
    pub fn sample(&self, raw: i32) -> AnalogValue {
        scale(raw, self.raw_range)
    }

    #[inline]
    #[must_use]
    pub const fn raw_range(&self) -> AnalogRange {
        self.raw_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adc_endpoints() {
        assert_eq!(scale(0, AnalogRange::ADC_12BIT), -128);
        assert_eq!(scale(4095, AnalogRange::ADC_12BIT), 127);
    }

    #[test]
    fn test_adc_midpoint() {
        assert_eq!(scale(2048, AnalogRange::ADC_12BIT), 0);
        assert_eq!(scale(2047, AnalogRange::ADC_12BIT), -1);
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(scale(-500, AnalogRange::ADC_12BIT), -128);
        assert_eq!(scale(5000, AnalogRange::ADC_12BIT), 127);
        assert_eq!(scale(i32::MAX, AnalogRange::ADC_12BIT), 127);
        assert_eq!(scale(i32::MIN, AnalogRange::ADC_12BIT), -128);
    }

    #[test]
    fn test_inverted_range() {
        let range = AnalogRange::ADC_12BIT.inverted();
        assert_eq!(scale(0, range), 127);
        assert_eq!(scale(4095, range), -128);
        assert_eq!(scale(9000, range), -128);
    }

    #[test]
    fn test_symmetric_encoder_span() {
        let range = AnalogRange::new(-1200, 1200);
        assert_eq!(scale(-1200, range), -128);
        assert_eq!(scale(1200, range), 127);
        assert_eq!(scale(0, range), 0);
        assert_eq!(scale(-3000, range), -128);
    }

    #[test]
    fn test_degenerate_range() {
        let range = AnalogRange::new(100, 100);
        assert_eq!(scale(100, range), -128);
        assert_eq!(scale(-7, range), -128);
    }

    #[test]
    fn test_narrow_target() {
        let target = AnalogRange::new(0, 100);
        assert_eq!(scale_to(0, AnalogRange::ADC_12BIT, target), 0);
        assert_eq!(scale_to(4095, AnalogRange::ADC_12BIT, target), 100);
        assert_eq!(scale_to(10_000, AnalogRange::ADC_12BIT, target), 100);
    }

    #[test]
    fn test_target_wider_than_i8_is_clamped() {
        let target = AnalogRange::new(-1000, 1000);
        assert_eq!(scale_to(4095, AnalogRange::ADC_12BIT, target), 127);
        assert_eq!(scale_to(0, AnalogRange::ADC_12BIT, target), -128);
    }

    #[test]
    fn test_sampler_uses_its_range() {
        let sampler = AnalogSampler::new(AnalogRange::new(1000, 3000));
        assert_eq!(sampler.sample(1000), -128);
        assert_eq!(sampler.sample(3000), 127);
        assert_eq!(sampler.sample(0), -128);
    }
}
