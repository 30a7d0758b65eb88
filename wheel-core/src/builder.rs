//! Report assembly from sampled inputs.
//!
//! [`ReportBuilder::build`] is a pure mapping: it never fails, and every
//! field a layout has no source for reads centered (0).

use crate::analog::AnalogValue;
use crate::config::PinConfig;
use wheel_report::{
    ButtonState, CombinedControlsReport, GamePadReport, Hat, Report, ReportKind,
    SteeringPadReport,
};

/// Debounced hat direction buttons; `true` means pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HatButtons {
    pub up: bool,
    pub right: bool,
    pub down: bool,
    pub left: bool,
}

impl HatButtons {
    #[inline]
    #[must_use]
    pub const fn hat(self) -> Hat {
        Hat::from_directions(self.up, self.right, self.down, self.left)
    }

    /// Directions as four button bits: up, right, down, left.
    #[inline]
    const fn bits(self) -> u16 {
        (self.up as u16)
            | (self.right as u16) << 1
            | (self.down as u16) << 2
            | (self.left as u16) << 3
    }
}

/// Scaled and debounced state of one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Encoder position scaled to the axis range.
    pub steering: AnalogValue,
    pub accelerator: AnalogValue,
    pub brake: AnalogValue,
    pub left_x: AnalogValue,
    pub left_y: AnalogValue,
    /// Route the left stick to the right-stick fields.
    pub stick_swap: bool,
    /// Numbered buttons, bit `i` for button `i`.
    pub buttons: ButtonState,
    pub hat: HatButtons,
}

/// Maps a [`Sample`] onto the field layout of a report kind.
///
/// Steering layouts have no hat field, so the hat directions take the four
/// button bits after the numbered buttons. Bits beyond the buttons a layout
/// carries are always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportBuilder {
    button_count: usize,
    hat_present: bool,
}

impl ReportBuilder {
    #[must_use]
    pub const fn new(button_count: usize, hat_present: bool) -> Self {
        Self {
            button_count,
            hat_present,
        }
    }

    /// Builder for the buttons and hat assigned in `pins`.
    #[must_use]
    pub fn for_pins(pins: &PinConfig) -> Self {
        Self::new(pins.buttons.len(), pins.hat.is_some())
    }

    /// Number of button bits carried by `kind`.
    #[must_use]
    pub const fn buttons_in(&self, kind: ReportKind) -> usize {
        if self.hat_present && !kind.has_hat() {
            self.button_count + 4
        } else {
            self.button_count
        }
    }

    #[must_use]
    pub fn build(&self, kind: ReportKind, sample: &Sample) -> Report {
        let (left_x, left_y, right_x, right_y) = if sample.stick_swap {
            (0, 0, sample.left_x, sample.left_y)
        } else {
            (sample.left_x, sample.left_y, 0, 0)
        };
        let buttons = self.buttons(kind, sample);

        match kind {
            ReportKind::SteeringPad => Report::SteeringPad(SteeringPadReport {
                steering: sample.steering,
                accelerator: sample.accelerator,
                brake: sample.brake,
                x: left_x,
                y: left_y,
                z: right_x,
                rz: right_y,
                rx: 0,
                ry: 0,
                buttons,
            }),
            ReportKind::CombinedControls => Report::CombinedControls(CombinedControlsReport {
                steering: sample.steering,
                accelerator: sample.accelerator,
                brake: sample.brake,
                x: left_x,
                y: left_y,
                z: right_x,
                rx: sample.brake,
                ry: sample.accelerator,
                rz: right_y,
                buttons,
            }),
            ReportKind::GamePad => Report::GamePad(GamePadReport {
                x: sample.steering,
                y: left_y,
                z: right_x,
                rx: sample.brake,
                ry: sample.accelerator,
                rz: right_y,
                hat: if self.hat_present {
                    sample.hat.hat()
                } else {
                    Hat::Centered
                },
                buttons,
            }),
        }
    }

    fn buttons(&self, kind: ReportKind, sample: &Sample) -> ButtonState {
        let mut buttons = sample.buttons.masked(ButtonState::low_bits(self.button_count));
        if self.hat_present && !kind.has_hat() && self.button_count < ButtonState::CAPACITY {
            buttons |= ButtonState(sample.hat.bits() << self.button_count);
        }
        buttons.masked(ButtonState::low_bits(self.buttons_in(kind)))
    }
}
