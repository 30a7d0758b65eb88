//! GPIO and ADC readers for the Pico.
//!
//! Inputs are created from the pin table at startup: every digital role
//! gets a pulled-up [`Input`], every analog role an ADC [`Channel`]. Pins
//! the table does not use are left unconfigured.

use defmt::warn;
use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::Peri;
use wheel_core::{AnalogInputs, ChannelId, ConfigError, DigitalInputs, PinConfig};

/// GPIO 0..=22, the Pico's plain digital header pins.
pub const DIGITAL_PINS: usize = ChannelId::LAST_DIGITAL as usize + 1;

/// ADC inputs 0..=3 (GPIO 26..=29).
const ADC_INPUTS: usize = 4;

/// Raw readers for every pin in a [`PinConfig`].
pub struct PicoInputs {
    digital: [Option<Input<'static>>; DIGITAL_PINS],
    adc: Adc<'static, Blocking>,
    analog: [Option<Channel<'static>>; ADC_INPUTS],
    /// Last good conversion per ADC input.
    last: [u16; ADC_INPUTS],
}

impl PicoInputs {
    /// Claim the pins used by `pins`.
    ///
    /// `gpio[n]` is GPIO `n`; `analog[n]` is ADC input `n`. Entries the
    /// table does not reference are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoSuchChannel`] if a role refers to a pin that
    /// was not handed in, or is used twice.
    pub fn new(
        pins: &PinConfig,
        mut gpio: [Option<Peri<'static, AnyPin>>; DIGITAL_PINS],
        adc: Adc<'static, Blocking>,
        mut analog: [Option<Channel<'static>>; ADC_INPUTS],
    ) -> Result<Self, ConfigError> {
        let mut inputs = Self {
            digital: [const { None }; DIGITAL_PINS],
            adc,
            analog: [const { None }; ADC_INPUTS],
            // Mid-scale until the first conversion.
            last: [2048; ADC_INPUTS],
        };

        let mut result = Ok(());
        pins.for_each_channel(|role, channel, is_analog| {
            if result.is_err() {
                return;
            }
            let claimed = match (is_analog, channel.adc_channel()) {
                (true, Some(n)) => {
                    let n = usize::from(n);
                    analog
                        .get_mut(n)
                        .and_then(Option::take)
                        .map(|ch| inputs.analog[n] = Some(ch))
                }
                (true, None) => None,
                (false, _) => {
                    let i = channel.index();
                    gpio.get_mut(i)
                        .and_then(Option::take)
                        .map(|pin| inputs.digital[i] = Some(Input::new(pin, Pull::Up)))
                }
            };
            if claimed.is_none() {
                result = Err(ConfigError::NoSuchChannel { role, channel });
            }
        });
        result.map(|()| inputs)
    }
}

impl DigitalInputs for PicoInputs {
    fn is_high(&mut self, channel: ChannelId) -> bool {
        match self.digital.get(channel.index()) {
            Some(Some(input)) => input.is_high(),
            _ => defmt::panic!("GPIO {} is not configured as an input", channel.gpio()),
        }
    }
}

impl AnalogInputs for PicoInputs {
    fn read(&mut self, channel: ChannelId) -> u16 {
        let Some(n) = channel.adc_channel().map(usize::from) else {
            defmt::panic!("GPIO {} has no ADC input", channel.gpio());
        };
        let Some(Some(adc_channel)) = self.analog.get_mut(n) else {
            defmt::panic!("ADC{} is not configured", n);
        };
        match self.adc.blocking_read(adc_channel) {
            Ok(value) => {
                self.last[n] = value;
                value
            }
            Err(e) => {
                warn!("ADC{} conversion failed: {:?}", n, e);
                self.last[n]
            }
        }
    }
}
