//! Field-level report types: ButtonState, Hat.

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// Debounced button state as a 16-bit mask.
///
/// Bit `i` is logical button `i`. The named constants follow the button
/// order of the wheeler board; layouts that append hat directions to the
/// mask use the bits after the last numbered button.
///
/// # Example
///
/// ```
/// use wheel_report::ButtonState;
///
/// let buttons = ButtonState::A | ButtonState::START;
/// assert!(buttons.contains(ButtonState::A));
/// assert!(!buttons.contains(ButtonState::B));
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonState(pub u16);

impl ButtonState {
    pub const A: Self = Self(1 << 0);
    pub const B: Self = Self(1 << 1);
    pub const X: Self = Self(1 << 2);
    pub const Y: Self = Self(1 << 3);
    pub const LB: Self = Self(1 << 4);
    pub const RB: Self = Self(1 << 5);
    pub const START: Self = Self(1 << 6);
    pub const BACK: Self = Self(1 << 7);
    pub const GUIDE: Self = Self(1 << 8);

    /// Number of addressable buttons.
    pub const CAPACITY: usize = 16;

    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// Mask with the lowest `count` bits set.
    #[inline]
    #[must_use]
    pub const fn low_bits(count: usize) -> Self {
        if count >= Self::CAPACITY {
            Self(u16::MAX)
        } else {
            Self((1u16 << count) - 1)
        }
    }

    /// Check if the given button(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn contains(self, button: ButtonState) -> bool {
        (self.0 & button.0) == button.0
    }

    /// Check whether button `index` is pressed. Out-of-range indices read
    /// as released.
    #[inline]
    #[must_use]
    pub const fn is_pressed(self, index: usize) -> bool {
        index < Self::CAPACITY && (self.0 >> index) & 1 == 1
    }

    /// Set or clear button `index`. Out-of-range indices are ignored.
    #[inline]
    pub fn set(&mut self, index: usize, pressed: bool) {
        if index >= Self::CAPACITY {
            return;
        }
        if pressed {
            self.0 |= 1 << index;
        } else {
            self.0 &= !(1 << index);
        }
    }

    /// Keep only the bits in `mask`.
    #[inline]
    #[must_use]
    pub const fn masked(self, mask: ButtonState) -> Self {
        Self(self.0 & mask.0)
    }

    /// Get the raw u16 value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ButtonState {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ButtonState {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ButtonState {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for ButtonState {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for ButtonState {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

/// Hat switch position.
///
/// Encoded as the HID hat code: 0 is up, increasing clockwise in 45°
/// steps, and [`Hat::CENTERED_CODE`] is the null state.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hat {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    #[default]
    Centered,
}

impl Hat {
    /// Wire value of [`Hat::Centered`].
    pub const CENTERED_CODE: u8 = 8;

    /// Combine four direction buttons into a hat position.
    ///
    /// Opposing directions cancel each other out.
    #[must_use]
    pub const fn from_directions(up: bool, right: bool, down: bool, left: bool) -> Self {
        let vertical = (up as i8) - (down as i8);
        let horizontal = (right as i8) - (left as i8);
        match (vertical, horizontal) {
            (1, 0) => Hat::Up,
            (1, 1) => Hat::UpRight,
            (0, 1) => Hat::Right,
            (-1, 1) => Hat::DownRight,
            (-1, 0) => Hat::Down,
            (-1, -1) => Hat::DownLeft,
            (0, -1) => Hat::Left,
            (1, -1) => Hat::UpLeft,
            _ => Hat::Centered,
        }
    }

    /// HID hat code for this position.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Hat::Up => 0,
            Hat::UpRight => 1,
            Hat::Right => 2,
            Hat::DownRight => 3,
            Hat::Down => 4,
            Hat::DownLeft => 5,
            Hat::Left => 6,
            Hat::UpLeft => 7,
            Hat::Centered => Self::CENTERED_CODE,
        }
    }

    /// Decode a hat code. Every value outside 0..=7 is the null state.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Hat::Up,
            1 => Hat::UpRight,
            2 => Hat::Right,
            3 => Hat::DownRight,
            4 => Hat::Down,
            5 => Hat::DownLeft,
            6 => Hat::Left,
            7 => Hat::UpLeft,
            _ => Hat::Centered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_bitwise_or() {
        let buttons = ButtonState::A | ButtonState::B;
        assert!(buttons.contains(ButtonState::A));
        assert!(buttons.contains(ButtonState::B));
        assert!(!buttons.contains(ButtonState::X));
    }

    #[test]
    fn test_buttons_set_clear_by_index() {
        let mut buttons = ButtonState::NONE;
        buttons.set(3, true);
        assert!(buttons.is_pressed(3));
        assert_eq!(buttons, ButtonState::Y);
        buttons.set(3, false);
        assert!(buttons.is_empty());
    }

    #[test]
    fn test_buttons_out_of_range_index_ignored() {
        let mut buttons = ButtonState::NONE;
        buttons.set(16, true);
        assert!(buttons.is_empty());
        assert!(!ButtonState(u16::MAX).is_pressed(16));
    }

    #[test]
    fn test_low_bits() {
        assert_eq!(ButtonState::low_bits(0), ButtonState::NONE);
        assert_eq!(ButtonState::low_bits(9).raw(), 0x01FF);
        assert_eq!(ButtonState::low_bits(16).raw(), 0xFFFF);
        assert_eq!(ButtonState::low_bits(40).raw(), 0xFFFF);
    }

    #[test]
    fn test_hat_single_directions() {
        assert_eq!(Hat::from_directions(true, false, false, false), Hat::Up);
        assert_eq!(Hat::from_directions(false, true, false, false), Hat::Right);
        assert_eq!(Hat::from_directions(false, false, true, false), Hat::Down);
        assert_eq!(Hat::from_directions(false, false, false, true), Hat::Left);
    }

    #[test]
    fn test_hat_diagonals() {
        assert_eq!(Hat::from_directions(true, true, false, false), Hat::UpRight);
        assert_eq!(Hat::from_directions(false, true, true, false), Hat::DownRight);
        assert_eq!(Hat::from_directions(false, false, true, true), Hat::DownLeft);
        assert_eq!(Hat::from_directions(true, false, false, true), Hat::UpLeft);
    }

    #[test]
    fn test_hat_opposing_directions_cancel() {
        assert_eq!(Hat::from_directions(true, false, true, false), Hat::Centered);
        assert_eq!(Hat::from_directions(false, true, false, true), Hat::Centered);
        assert_eq!(Hat::from_directions(true, true, true, false), Hat::Right);
        assert_eq!(Hat::from_directions(true, true, true, true), Hat::Centered);
    }

    #[test]
    fn test_hat_codes() {
        assert_eq!(Hat::Up.code(), 0);
        assert_eq!(Hat::UpLeft.code(), 7);
        assert_eq!(Hat::Centered.code(), Hat::CENTERED_CODE);
        assert_eq!(Hat::from_code(4), Hat::Down);
        assert_eq!(Hat::from_code(0xFF), Hat::Centered);
    }
}
