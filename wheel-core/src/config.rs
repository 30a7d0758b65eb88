//! Board pin assignment and pipeline tunables.
//!
//! The configuration is a plain value built once at startup and validated
//! before the first tick. Customize it by creating your own const, the same
//! way [`WheelConfig::WHEELER`] is built.

use crate::analog::AnalogRange;
use crate::Tick;
use wheel_report::{ButtonState, ReportKind};

/// A physical input line (GPIO number).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId(u8);

impl ChannelId {
    /// Number of GPIOs in the RP2040's user bank.
    pub const COUNT: usize = 30;

    /// First ADC-capable GPIO (ADC0).
    pub const FIRST_ADC: u8 = 26;

    /// Highest GPIO exposed as a plain digital pin on the Pico header.
    pub const LAST_DIGITAL: u8 = 22;

    #[must_use]
    pub const fn new(gpio: u8) -> Self {
        Self(gpio)
    }

    #[inline]
    #[must_use]
    pub const fn gpio(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// ADC input number, if this GPIO has one.
    #[inline]
    #[must_use]
    pub const fn adc_channel(self) -> Option<u8> {
        if self.0 >= Self::FIRST_ADC && (self.0 as usize) < Self::COUNT {
            Some(self.0 - Self::FIRST_ADC)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_digital_capable(self) -> bool {
        self.0 <= Self::LAST_DIGITAL
    }
}

/// Logical input role, used to report configuration errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    EncoderClock,
    EncoderData,
    Accelerator,
    Brake,
    LeftStickX,
    LeftStickY,
    Button(u8),
    HatUp,
    HatRight,
    HatDown,
    HatLeft,
    EncoderReset,
    Debug,
    RangeSelect,
    StickSwap,
    Bootsel,
    ModeSelect(u8),
}

/// How a pedal is wired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PedalInput {
    /// Potentiometer on an ADC input.
    Analog(ChannelId),
    /// On/off switch: pressed reads full scale, released reads the minimum.
    Digital(ChannelId),
}

impl PedalInput {
    #[inline]
    #[must_use]
    pub const fn channel(self) -> ChannelId {
        match self {
            PedalInput::Analog(ch) | PedalInput::Digital(ch) => ch,
        }
    }
}

/// Hat switch direction lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HatPins {
    pub up: ChannelId,
    pub right: ChannelId,
    pub down: ChannelId,
    pub left: ChannelId,
}

/// Mapping from logical roles to physical channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub encoder_clock: ChannelId,
    pub encoder_data: ChannelId,
    pub accelerator: PedalInput,
    pub brake: PedalInput,
    pub left_stick_x: ChannelId,
    pub left_stick_y: ChannelId,
    /// Numbered buttons; index `i` drives report button bit `i`.
    pub buttons: &'static [ChannelId],
    pub hat: Option<HatPins>,
    pub encoder_reset: Option<ChannelId>,
    pub debug: Option<ChannelId>,
    pub range_select: Option<ChannelId>,
    pub stick_swap: Option<ChannelId>,
    pub bootsel: Option<ChannelId>,
    pub mode_select: [Option<ChannelId>; 2],
}

const fn gpio(n: u8) -> ChannelId {
    ChannelId::new(n)
}

impl PinConfig {
    /// Pin table of the wheeler board, revision 1.
    ///
    /// | Function | GPIO |
    /// |----------|------|
    /// | Encoder CLK / DT | 16 / 17 |
    /// | Hat up / right / down / left | 12 / 13 / 14 / 15 |
    /// | A, B, X, Y | 18, 19, 20, 21 |
    /// | LB, RB | 6, 7 |
    /// | START, BACK, GUIDE | 8, 9, 10 |
    /// | Brake (switch) | 22 |
    /// | Accelerator | 28 (ADC2) |
    /// | Left stick X / Y | 27 (ADC1) / 26 (ADC0) |
    /// | Encoder reset, debug, range select, stick swap | 2, 3, 4, 5 |
    /// | Bootloader select | 0 |
    /// | Mode select 0 / 1 | 1 / 11 |
    pub const WHEELER_V1: Self = Self {
        encoder_clock: gpio(16),
        encoder_data: gpio(17),
        accelerator: PedalInput::Analog(gpio(28)),
        brake: PedalInput::Digital(gpio(22)),
        left_stick_x: gpio(27),
        left_stick_y: gpio(26),
        buttons: &[
            gpio(18), // A
            gpio(19), // B
            gpio(20), // X
            gpio(21), // Y
            gpio(6),  // LB
            gpio(7),  // RB
            gpio(8),  // START
            gpio(9),  // BACK
            gpio(10), // GUIDE
        ],
        hat: Some(HatPins {
            up: gpio(12),
            right: gpio(13),
            down: gpio(14),
            left: gpio(15),
        }),
        encoder_reset: Some(gpio(2)),
        debug: Some(gpio(3)),
        range_select: Some(gpio(4)),
        stick_swap: Some(gpio(5)),
        bootsel: Some(gpio(0)),
        mode_select: [Some(gpio(1)), Some(gpio(11))],
    };

    /// Visit every assigned channel with its role and whether it is read
    /// through the ADC.
    pub fn for_each_channel(&self, mut f: impl FnMut(Role, ChannelId, bool)) {
        f(Role::EncoderClock, self.encoder_clock, false);
        f(Role::EncoderData, self.encoder_data, false);
        for (role, pedal) in [(Role::Accelerator, self.accelerator), (Role::Brake, self.brake)] {
            f(role, pedal.channel(), matches!(pedal, PedalInput::Analog(_)));
        }
        f(Role::LeftStickX, self.left_stick_x, true);
        f(Role::LeftStickY, self.left_stick_y, true);
        for (i, &ch) in self.buttons.iter().enumerate() {
            f(Role::Button(i as u8), ch, false);
        }
        if let Some(hat) = self.hat {
            f(Role::HatUp, hat.up, false);
            f(Role::HatRight, hat.right, false);
            f(Role::HatDown, hat.down, false);
            f(Role::HatLeft, hat.left, false);
        }
        let optional = [
            (Role::EncoderReset, self.encoder_reset),
            (Role::Debug, self.debug),
            (Role::RangeSelect, self.range_select),
            (Role::StickSwap, self.stick_swap),
            (Role::Bootsel, self.bootsel),
            (Role::ModeSelect(0), self.mode_select[0]),
            (Role::ModeSelect(1), self.mode_select[1]),
        ];
        for (role, ch) in optional {
            if let Some(ch) = ch {
                f(role, ch, false);
            }
        }
    }

    /// Number of report button bits used by the steering layouts, which
    /// carry the hat directions as buttons after the numbered ones.
    #[must_use]
    pub fn steering_button_count(&self) -> usize {
        self.buttons.len() + if self.hat.is_some() { 4 } else { 0 }
    }

    /// Check that every role maps to a distinct channel of the right kind.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steering_button_count() > ButtonState::CAPACITY {
            return Err(ConfigError::TooManyButtons(self.steering_button_count()));
        }

        let mut used: u32 = 0;
        let mut result = Ok(());
        self.for_each_channel(|role, channel, analog| {
            if result.is_err() {
                return;
            }
            result = check_channel(&mut used, role, channel, analog);
        });
        result
    }
}

fn check_channel(
    used: &mut u32,
    role: Role,
    channel: ChannelId,
    analog: bool,
) -> Result<(), ConfigError> {
    if channel.index() >= ChannelId::COUNT {
        return Err(ConfigError::NoSuchChannel { role, channel });
    }
    if analog && channel.adc_channel().is_none() {
        return Err(ConfigError::NotAnalog { role, channel });
    }
    if !analog && !channel.is_digital_capable() {
        return Err(ConfigError::NotDigital { role, channel });
    }
    let bit = 1u32 << channel.index();
    if *used & bit != 0 {
        return Err(ConfigError::DuplicateChannel { role, channel });
    }
    *used |= bit;
    Ok(())
}

/// How the report layout is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutSelection {
    /// Layout fixed at build time.
    Fixed(ReportKind),
    /// Layout read from the mode-select lines at startup.
    ModeLines,
}

/// Encoder counts covered by the full steering axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SteeringCalibration {
    /// Span while the range-select line is inactive.
    pub narrow_counts: i32,
    /// Span while the range-select line is active.
    pub wide_counts: i32,
}

impl SteeringCalibration {
    /// Raw range for the selected span, centered on position 0.
    #[must_use]
    pub const fn range(&self, wide: bool) -> AnalogRange {
        let span = if wide { self.wide_counts } else { self.narrow_counts };
        AnalogRange::new(-(span / 2), span / 2)
    }
}

/// Arguments handed to the platform's bootloader entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootloaderRequest {
    /// GPIO mask the boot ROM drives as an activity indicator.
    pub indicator_mask: u32,
    /// Boot ROM interface disposition code.
    pub disposition: u32,
}

/// Raw ranges of the analog inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisCalibration {
    pub accelerator: AnalogRange,
    pub brake: AnalogRange,
    pub left_stick_x: AnalogRange,
    pub left_stick_y: AnalogRange,
}

/// Complete pipeline configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WheelConfig {
    pub pins: PinConfig,
    pub layout: LayoutSelection,
    /// Ticks a raw level must hold before it is reported.
    pub debounce_ticks: Tick,
    /// Ticks the bootloader line must stay active; 0 triggers on the first active tick.
    pub bootsel_hold_ticks: Tick,
    pub steering: SteeringCalibration,
    pub axes: AxisCalibration,
    pub bootloader: BootloaderRequest,
}

impl WheelConfig {
    /// Default configuration for the wheeler board.
    ///
    /// 5 ms debounce at a 1 kHz tick, 600 PPR encoder (2400 counts per
    /// turn) spanning 270° or 900° of rotation, and the Pico LED (GPIO 25)
    /// as the boot ROM activity light.
    pub const WHEELER: Self = Self {
        pins: PinConfig::WHEELER_V1,
        layout: LayoutSelection::ModeLines,
        debounce_ticks: 5,
        bootsel_hold_ticks: 0,
        steering: SteeringCalibration {
            narrow_counts: 1800,
            wide_counts: 6000,
        },
        axes: AxisCalibration {
            accelerator: AnalogRange::ADC_12BIT,
            brake: AnalogRange::ADC_12BIT,
            left_stick_x: AnalogRange::ADC_12BIT,
            left_stick_y: AnalogRange::ADC_12BIT,
        },
        bootloader: BootloaderRequest {
            indicator_mask: 1 << 25,
            disposition: 0,
        },
    };

    /// Same configuration with a different layout selection.
    #[must_use]
    pub const fn with_layout(mut self, layout: LayoutSelection) -> Self {
        self.layout = layout;
        self
    }

    /// Validate the pin table and calibration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pins.validate()?;

        if self.steering.narrow_counts < 2 || self.steering.wide_counts < 2 {
            return Err(ConfigError::DegenerateRange(Role::EncoderClock));
        }
        let analog = [
            (Role::Accelerator, self.axes.accelerator),
            (Role::Brake, self.axes.brake),
            (Role::LeftStickX, self.axes.left_stick_x),
            (Role::LeftStickY, self.axes.left_stick_y),
        ];
        for (role, range) in analog {
            if range.is_degenerate() {
                return Err(ConfigError::DegenerateRange(role));
            }
        }
        Ok(())
    }
}

/// Startup configuration error. The firmware refuses to run with any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Two roles share one channel.
    DuplicateChannel { role: Role, channel: ChannelId },
    /// Channel number beyond the GPIO bank.
    NoSuchChannel { role: Role, channel: ChannelId },
    /// Analog role on a channel without an ADC input.
    NotAnalog { role: Role, channel: ChannelId },
    /// Digital role on a channel that is ADC-only or board-reserved.
    NotDigital { role: Role, channel: ChannelId },
    /// More buttons than the 16-bit report mask holds.
    TooManyButtons(usize),
    /// Calibration range with zero width.
    DegenerateRange(Role),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DuplicateChannel { role, channel } => {
                write!(f, "{role:?}: GPIO {} already assigned", channel.gpio())
            }
            Self::NoSuchChannel { role, channel } => {
                write!(f, "{role:?}: GPIO {} does not exist", channel.gpio())
            }
            Self::NotAnalog { role, channel } => {
                write!(f, "{role:?}: GPIO {} has no ADC input", channel.gpio())
            }
            Self::NotDigital { role, channel } => {
                write!(f, "{role:?}: GPIO {} is not a digital pin", channel.gpio())
            }
            Self::TooManyButtons(n) => write!(f, "{n} buttons exceed the 16-bit mask"),
            Self::DegenerateRange(role) => write!(f, "{role:?}: calibration range is empty"),
        }
    }
}
