//! The sampling tick: read inputs, assemble one report.

use crate::analog::{scale, AnalogSampler, AnalogValue};
use crate::bootsel::{BootloaderEntry, BootselMonitor, BootselState};
use crate::builder::{HatButtons, ReportBuilder, Sample};
use crate::config::{ChannelId, ConfigError, PedalInput, WheelConfig};
use crate::debounce::DigitalDebouncer;
use crate::input::{AnalogInputs, DigitalInputs};
use crate::quadrature::QuadratureDecoder;
use crate::selector::{ModeLines, ReportSelector};
use crate::Tick;
use wheel_report::{ButtonState, Report, ReportKind};

/// Result of one [`Wheel::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Debouncers are still settling; no layout has been latched yet.
    Settling,
    /// A report in the active layout.
    Report(Report),
    /// The bootloader was requested on this tick.
    Bootloader,
    /// The bootloader was requested earlier; nothing was sampled.
    Halted,
}

/// Input pipeline of the racing wheel.
///
/// Owns all sampling state. Call [`tick`](Self::tick) once per sampling
/// period with a monotonically increasing tick counter.
pub struct Wheel<'c> {
    config: &'c WheelConfig,
    debouncer: DigitalDebouncer<{ ChannelId::COUNT }>,
    encoder: QuadratureDecoder,
    encoder_synced: bool,
    selector: ReportSelector,
    builder: ReportBuilder,
    bootsel: BootselMonitor,
    accelerator: AnalogSampler,
    brake: AnalogSampler,
    left_x: AnalogSampler,
    left_y: AnalogSampler,
    settle_start: Option<Tick>,
    reset_held: bool,
    wide_range: bool,
}

impl<'c> Wheel<'c> {
    /// Validate `config` and set up the pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] in `config`.
    pub fn new(config: &'c WheelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            "config accepted: {=usize} buttons, hat {=bool}, debounce {=u32} ticks",
            config.pins.buttons.len(),
            config.pins.hat.is_some(),
            config.debounce_ticks
        );

        Ok(Self {
            config,
            // Pulled-up lines idle high.
            debouncer: DigitalDebouncer::new(config.debounce_ticks, true),
            encoder: QuadratureDecoder::new(),
            encoder_synced: false,
            selector: ReportSelector::new(config.layout),
            builder: ReportBuilder::for_pins(&config.pins),
            bootsel: BootselMonitor::new(config.bootsel_hold_ticks),
            accelerator: AnalogSampler::new(config.axes.accelerator),
            brake: AnalogSampler::new(config.axes.brake),
            left_x: AnalogSampler::new(config.axes.left_stick_x),
            left_y: AnalogSampler::new(config.axes.left_stick_y),
            settle_start: None,
            reset_held: false,
            wide_range: false,
        })
    }

    /// Run one sampling tick.
    ///
    /// The bootloader line is checked before anything else is read. After a
    /// bootloader request every later tick returns [`TickOutcome::Halted`]
    /// without touching the inputs.
    pub fn tick<I, B>(&mut self, io: &mut I, boot: &mut B, now: Tick) -> TickOutcome
    where
        I: DigitalInputs + AnalogInputs,
        B: BootloaderEntry,
    {
        if self.bootsel.is_triggered() {
            return TickOutcome::Halted;
        }
        if let Some(ch) = self.config.pins.bootsel {
            let active = !io.is_high(ch);
            if self.bootsel.check(active, now, &self.config.bootloader, boot)
                == BootselState::Triggered
            {
                return TickOutcome::Bootloader;
            }
        }

        self.sample_encoder(io);
        let sample = self.sample(io, now);
        let debug = self.is_active(io, self.config.pins.debug, now);
        let lines = self.mode_lines(io, now);

        let kind = match self.selector.active() {
            Some(kind) => kind,
            None => match self.settle(lines, now) {
                Some(kind) => kind,
                None => return TickOutcome::Settling,
            },
        };

        let report = self.builder.build(kind, &sample);

        if debug {
            debug!("report: {:?}", report);
        }
        TickOutcome::Report(report)
    }

    /// Latched report layout, once settling has finished.
    #[inline]
    #[must_use]
    pub fn active_kind(&self) -> Option<ReportKind> {
        self.selector.active()
    }

    /// Drop the latched layout and settle again before the next report.
    pub fn reselect(&mut self) {
        self.selector.reevaluate();
        self.settle_start = None;
    }

    #[inline]
    #[must_use]
    pub fn encoder(&self) -> &QuadratureDecoder {
        &self.encoder
    }

    #[inline]
    #[must_use]
    pub fn bootsel_state(&self) -> BootselState {
        self.bootsel.state()
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &'c WheelConfig {
        self.config
    }

    /// Latch the layout once `debounce_ticks` ticks have passed.
    fn settle(&mut self, lines: ModeLines, now: Tick) -> Option<ReportKind> {
        let start = *self.settle_start.get_or_insert(now);
        if now.wrapping_sub(start) < self.config.debounce_ticks {
            return None;
        }
        Some(self.selector.select(lines))
    }

    /// Read on every tick, latched or not.
    fn mode_lines<I: DigitalInputs>(&mut self, io: &mut I, now: Tick) -> ModeLines {
        let [m0, m1] = self.config.pins.mode_select;
        ModeLines {
            line0: self.is_active(io, m0, now),
            line1: self.is_active(io, m1, now),
        }
    }

    fn sample_encoder<I: DigitalInputs>(&mut self, io: &mut I) {
        let pins = &self.config.pins;
        let a = io.is_high(pins.encoder_clock);
        let b = io.is_high(pins.encoder_data);
        if self.encoder_synced {
            self.encoder.update(a, b);
        } else {
            self.encoder.sync(a, b);
            self.encoder_synced = true;
        }
    }

    fn sample<I>(&mut self, io: &mut I, now: Tick) -> Sample
    where
        I: DigitalInputs + AnalogInputs,
    {
        let pins = self.config.pins;

        let mut buttons = ButtonState::NONE;
        for (i, &ch) in pins.buttons.iter().enumerate() {
            buttons.set(i, self.pressed(io, ch, now));
        }
        let hat = match pins.hat {
            Some(hat) => HatButtons {
                up: self.pressed(io, hat.up, now),
                right: self.pressed(io, hat.right, now),
                down: self.pressed(io, hat.down, now),
                left: self.pressed(io, hat.left, now),
            },
            None => HatButtons::default(),
        };

        let reset = self.is_active(io, pins.encoder_reset, now);
        if reset && !self.reset_held {
            debug!("encoder reset at position {=i32}", self.encoder.position());
            self.encoder.reset_position();
        }
        self.reset_held = reset;

        let wide = self.is_active(io, pins.range_select, now);
        if wide != self.wide_range {
            debug!("steering range: {}", if wide { "wide" } else { "narrow" });
            self.wide_range = wide;
        }
        let stick_swap = self.is_active(io, pins.stick_swap, now);

        Sample {
            steering: scale(self.encoder.position(), self.config.steering.range(wide)),
            accelerator: self.pedal(io, pins.accelerator, self.accelerator, now),
            brake: self.pedal(io, pins.brake, self.brake, now),
            left_x: self.left_x.sample(io.read(pins.left_stick_x).into()),
            left_y: self.left_y.sample(io.read(pins.left_stick_y).into()),
            stick_swap,
            buttons,
            hat,
        }
    }

    fn pedal<I>(
        &mut self,
        io: &mut I,
        input: PedalInput,
        sampler: AnalogSampler,
        now: Tick,
    ) -> AnalogValue
    where
        I: DigitalInputs + AnalogInputs,
    {
        match input {
            PedalInput::Analog(ch) => sampler.sample(io.read(ch).into()),
            PedalInput::Digital(ch) => {
                if self.pressed(io, ch, now) {
                    AnalogValue::MAX
                } else {
                    AnalogValue::MIN
                }
            }
        }
    }

    /// Debounced, active-low read of `channel`.
    fn pressed<I: DigitalInputs>(&mut self, io: &mut I, channel: ChannelId, now: Tick) -> bool {
        !self.debouncer.sample(channel, io.is_high(channel), now)
    }

    /// Like [`pressed`](Self::pressed); an unassigned line is inactive.
    fn is_active<I: DigitalInputs>(
        &mut self,
        io: &mut I,
        channel: Option<ChannelId>,
        now: Tick,
    ) -> bool {
        channel.is_some_and(|ch| self.pressed(io, ch, now))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::config::{LayoutSelection, SteeringCalibration};
    use std::vec::Vec;
    use wheel_report::{CombinedControlsReport, GamePadReport, Hat};

    struct Board {
        high: [bool; ChannelId::COUNT],
        adc: [u16; ChannelId::COUNT],
        reads: usize,
    }

    impl Board {
        fn idle() -> Self {
            Self {
                high: [true; ChannelId::COUNT],
                adc: [2048; ChannelId::COUNT],
                reads: 0,
            }
        }

        fn press(&mut self, gpio: u8) {
            self.high[gpio as usize] = false;
        }

        fn release(&mut self, gpio: u8) {
            self.high[gpio as usize] = true;
        }

        fn phases(&mut self, a: bool, b: bool) {
            self.high[16] = a;
            self.high[17] = b;
        }
    }

    impl DigitalInputs for Board {
        fn is_high(&mut self, channel: ChannelId) -> bool {
            self.reads += 1;
            self.high[channel.index()]
        }
    }

    impl AnalogInputs for Board {
        fn read(&mut self, channel: ChannelId) -> u16 {
            self.reads += 1;
            self.adc[channel.index()]
        }
    }

    #[derive(Default)]
    struct Rom {
        calls: Vec<(u32, u32)>,
    }

    impl BootloaderEntry for Rom {
        fn enter_bootloader(&mut self, indicator_mask: u32, disposition: u32) {
            self.calls.push((indicator_mask, disposition));
        }
    }

    struct Rig<'c> {
        wheel: Wheel<'c>,
        board: Board,
        rom: Rom,
        now: Tick,
    }

    impl<'c> Rig<'c> {
        fn new(config: &'c WheelConfig) -> Self {
            Self {
                wheel: Wheel::new(config).expect("valid config"),
                board: Board::idle(),
                rom: Rom::default(),
                now: 0,
            }
        }

        fn tick(&mut self) -> TickOutcome {
            let outcome = self.wheel.tick(&mut self.board, &mut self.rom, self.now);
            self.now += 1;
            outcome
        }

        fn report(&mut self) -> Report {
            match self.tick() {
                TickOutcome::Report(report) => report,
                other => panic!("expected a report, got {other:?}"),
            }
        }

        /// Tick until the debouncers have promoted the current levels.
        fn settle(&mut self) -> Report {
            for _ in 0..self.wheel.config().debounce_ticks {
                self.tick();
            }
            self.report()
        }
    }

    const SHORT_STEERING: WheelConfig = WheelConfig {
        steering: SteeringCalibration {
            narrow_counts: 4,
            wide_counts: 8,
        },
        ..WheelConfig::WHEELER
    };

    #[test]
    fn test_settles_before_first_report() {
        let mut rig = Rig::new(&WheelConfig::WHEELER);
        for _ in 0..5 {
            assert_eq!(rig.tick(), TickOutcome::Settling);
        }
        assert_eq!(rig.wheel.active_kind(), None);
        // The brake switch is released, so both brake fields read minimum.
        assert_eq!(
            rig.report(),
            Report::CombinedControls(CombinedControlsReport {
                brake: AnalogValue::MIN,
                rx: AnalogValue::MIN,
                ..CombinedControlsReport::default()
            })
        );
        assert_eq!(rig.wheel.active_kind(), Some(ReportKind::CombinedControls));
    }

    #[test]
    fn test_mode_lines_latch_layout() {
        let mut rig = Rig::new(&WheelConfig::WHEELER);
        rig.board.press(11);
        let report = rig.settle();
        assert_eq!(report.kind(), ReportKind::GamePad);

        rig.board.release(11);
        rig.board.press(1);
        for _ in 0..10 {
            assert_eq!(rig.report().kind(), ReportKind::GamePad);
        }
    }

    #[test]
    fn test_reselect_reads_mode_lines_again() {
        let mut rig = Rig::new(&WheelConfig::WHEELER);
        rig.settle();
        rig.board.press(1);
        rig.wheel.reselect();
        assert_eq!(rig.tick(), TickOutcome::Settling);
        let report = rig.settle();
        assert_eq!(report.kind(), ReportKind::SteeringPad);
    }

    #[test]
    fn test_reselect_rejects_mode_line_glitch() {
        let mut rig = Rig::new(&WheelConfig::WHEELER);
        for _ in 0..5 {
            assert_eq!(rig.tick(), TickOutcome::Settling);
        }
        // Glitch on the tick the layout latches.
        rig.board.press(11);
        assert_eq!(rig.report().kind(), ReportKind::CombinedControls);
        rig.board.release(11);
        for _ in 0..1000 {
            rig.report();
        }

        rig.wheel.reselect();
        rig.board.press(11);
        assert_eq!(rig.tick(), TickOutcome::Settling);
        rig.board.release(11);
        assert_eq!(rig.settle().kind(), ReportKind::CombinedControls);
    }

    #[test]
    fn test_fixed_layout_ignores_mode_lines() {
        let config = WheelConfig::WHEELER.with_layout(LayoutSelection::Fixed(ReportKind::SteeringPad));
        let mut rig = Rig::new(&config);
        rig.board.press(11);
        assert_eq!(rig.settle().kind(), ReportKind::SteeringPad);
    }

    #[test]
    fn test_buttons_are_debounced() {
        let mut rig = Rig::new(&WheelConfig::WHEELER);
        rig.settle();

        rig.board.press(18);
        for _ in 0..5 {
            assert_eq!(rig.report().buttons(), ButtonState::NONE);
        }
        assert_eq!(rig.report().buttons(), ButtonState::A);

        // A two-tick glitch never shows up.
        rig.board.press(10);
        rig.report();
        rig.report();
        rig.board.release(10);
        for _ in 0..8 {
            assert_eq!(rig.report().buttons(), ButtonState::A);
        }
    }

    #[test]
    fn test_hat_on_gamepad_and_as_buttons() {
        let mut rig = Rig::new(&WheelConfig::WHEELER);
        rig.board.press(11);
        rig.board.press(12);
        rig.board.press(15);
        let Report::GamePad(report) = rig.settle() else {
            panic!("wrong layout");
        };
        assert_eq!(report.hat, Hat::UpLeft);
        assert_eq!(report.buttons, ButtonState::NONE);

        let config = WheelConfig::WHEELER.with_layout(LayoutSelection::Fixed(ReportKind::SteeringPad));
        let mut rig = Rig::new(&config);
        rig.board.press(12);
        rig.board.press(15);
        assert_eq!(rig.settle().buttons(), ButtonState(1 << 9 | 1 << 12));
    }

    #[test]
    fn test_encoder_drives_steering() {
        let mut rig = Rig::new(&SHORT_STEERING);
        rig.board.phases(true, true);
        rig.settle();

        // 11 -> 10 -> 00
        rig.board.phases(true, false);
        rig.report();
        rig.board.phases(false, false);
        let Report::CombinedControls(report) = rig.report() else {
            panic!("wrong layout");
        };
        assert_eq!(rig.wheel.encoder().position(), 2);
        assert_eq!(report.steering, 127);

        rig.board.phases(true, false);
        let Report::CombinedControls(report) = rig.report() else {
            panic!("wrong layout");
        };
        assert_eq!(rig.wheel.encoder().position(), 1);
        assert_eq!(report.steering, 63);
    }

    #[test]
    fn test_range_select_widens_steering() {
        let mut rig = Rig::new(&SHORT_STEERING);
        rig.settle();
        rig.board.phases(true, false);
        let Report::CombinedControls(narrow) = rig.report() else {
            panic!("wrong layout");
        };
        assert_eq!(narrow.steering, 63);

        rig.board.press(4);
        let report = rig.settle();
        let Report::CombinedControls(wide) = report else {
            panic!("wrong layout");
        };
        assert_eq!(wide.steering, 31);
    }

    #[test]
    fn test_encoder_reset_on_press_edge() {
        let mut rig = Rig::new(&SHORT_STEERING);
        rig.settle();
        rig.board.phases(true, false);
        rig.report();
        assert_eq!(rig.wheel.encoder().position(), 1);

        rig.board.press(2);
        rig.settle();
        assert_eq!(rig.wheel.encoder().position(), 0);

        // Holding the line does not keep clearing new motion.
        rig.board.phases(false, false);
        rig.report();
        assert_eq!(rig.wheel.encoder().position(), 1);
    }

    #[test]
    fn test_pedals_and_stick_swap() {
        let mut rig = Rig::new(&WheelConfig::WHEELER);
        rig.board.adc[28] = 4095;
        rig.board.adc[27] = 0;
        rig.board.press(22);
        rig.board.press(11);
        let Report::GamePad(report) = rig.settle() else {
            panic!("wrong layout");
        };
        assert_eq!((report.ry, report.rx), (127, 127));
        assert_eq!((report.z, report.rz), (0, 0));

        rig.board.press(5);
        let Report::GamePad(report) = rig.settle() else {
            panic!("wrong layout");
        };
        assert_eq!(
            report,
            GamePadReport {
                x: 0,
                y: 0,
                z: -128,
                rx: 127,
                ry: 127,
                rz: 0,
                hat: Hat::Centered,
                buttons: ButtonState::NONE,
            }
        );
    }

    #[test]
    fn test_bootsel_single_tick_halts_pipeline() {
        let mut rig = Rig::new(&WheelConfig::WHEELER);
        rig.settle();

        rig.board.press(0);
        assert_eq!(rig.tick(), TickOutcome::Bootloader);
        assert_eq!(rig.rom.calls, [(1 << 25, 0)]);
        assert_eq!(rig.wheel.bootsel_state(), BootselState::Triggered);

        rig.board.release(0);
        let reads = rig.board.reads;
        for _ in 0..3 {
            assert_eq!(rig.tick(), TickOutcome::Halted);
        }
        assert_eq!(rig.board.reads, reads);
        assert_eq!(rig.rom.calls.len(), 1);
    }

    #[test]
    fn test_bootsel_checked_during_settling() {
        let mut rig = Rig::new(&WheelConfig::WHEELER);
        rig.board.press(0);
        assert_eq!(rig.tick(), TickOutcome::Bootloader);
        assert_eq!(rig.wheel.active_kind(), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = WheelConfig::WHEELER;
        config.pins.debug = Some(ChannelId::new(16));
        assert!(Wheel::new(&config).is_err());
    }
}
