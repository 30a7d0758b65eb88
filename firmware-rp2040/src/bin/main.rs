#![no_std]
#![no_main]

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{AnyPin, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_rp::Peri;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use static_cell::StaticCell;
use wheel_core::{ReportSink, Tick, TickOutcome, Wheel};
use wheel_report::Report;
use wheeler_rp2040::{
    configure_usb_hid, PicoInputs, RomBootloader, UsbHidOutput, UsbStateHandler, CONFIG,
    DIGITAL_PINS,
};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Sampling period.
const TICK: Duration = Duration::from_millis(1);

/// Signal for passing reports from the tick task to the output task.
/// Using Signal instead of Channel provides "latest value wins" semantics:
/// the host only ever needs the most recent report.
static REPORT_SIGNAL: StaticCell<Signal<CriticalSectionRawMutex, Report>> = StaticCell::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();
static USB_HANDLER: StaticCell<UsbStateHandler> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Wheeler starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let mut wheel = match Wheel::new(&CONFIG) {
        Ok(wheel) => wheel,
        Err(e) => defmt::panic!("invalid configuration: {}", e),
    };

    // --- Input Setup ---
    let gpio: [Option<Peri<'static, AnyPin>>; DIGITAL_PINS] = [
        Some(p.PIN_0.into()),
        Some(p.PIN_1.into()),
        Some(p.PIN_2.into()),
        Some(p.PIN_3.into()),
        Some(p.PIN_4.into()),
        Some(p.PIN_5.into()),
        Some(p.PIN_6.into()),
        Some(p.PIN_7.into()),
        Some(p.PIN_8.into()),
        Some(p.PIN_9.into()),
        Some(p.PIN_10.into()),
        Some(p.PIN_11.into()),
        Some(p.PIN_12.into()),
        Some(p.PIN_13.into()),
        Some(p.PIN_14.into()),
        Some(p.PIN_15.into()),
        Some(p.PIN_16.into()),
        Some(p.PIN_17.into()),
        Some(p.PIN_18.into()),
        Some(p.PIN_19.into()),
        Some(p.PIN_20.into()),
        Some(p.PIN_21.into()),
        Some(p.PIN_22.into()),
    ];
    let analog = [
        Some(adc::Channel::new_pin(p.PIN_26, Pull::None)),
        Some(adc::Channel::new_pin(p.PIN_27, Pull::None)),
        Some(adc::Channel::new_pin(p.PIN_28, Pull::None)),
        // ADC3 (GPIO 29) measures VSYS on the Pico.
        None,
    ];
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());

    let mut inputs = match PicoInputs::new(&CONFIG.pins, gpio, adc, analog) {
        Ok(inputs) => inputs,
        Err(e) => defmt::panic!("pin table does not fit the board: {}", e),
    };
    let mut rom = RomBootloader;

    // --- Settle ---
    // The USB descriptor depends on the layout, so it is latched first.
    let mut ticker = Ticker::every(TICK);
    let mut now: Tick = 0;
    let first = loop {
        let outcome = wheel.tick(&mut inputs, &mut rom, now);
        now = now.wrapping_add(1);
        if let TickOutcome::Report(report) = outcome {
            break report;
        }
        ticker.next().await;
    };
    let kind = first.kind();

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("Wheeler");
    usb_config.product = Some("Wheeler Racing Wheel");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );
    builder.handler(USB_HANDLER.init(UsbStateHandler));

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let hid_writer = configure_usb_hid(&mut builder, hid_state, kind);

    // Build the USB device
    let usb_device = builder.build();

    // Create output
    let usb_output = UsbHidOutput::new(hid_writer, kind);

    let signal = REPORT_SIGNAL.init(Signal::new());
    signal.signal(first);

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(output_task(usb_output, signal).unwrap());
    spawner.spawn(tick_task(wheel, inputs, rom, ticker, now, signal).unwrap());

    info!("Wheeler initialized, reporting {:?}", kind);
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Tick task - samples all inputs once per period and signals the report.
#[embassy_executor::task]
async fn tick_task(
    mut wheel: Wheel<'static>,
    mut inputs: PicoInputs,
    mut rom: RomBootloader,
    mut ticker: Ticker,
    mut now: Tick,
    signal: &'static Signal<CriticalSectionRawMutex, Report>,
) {
    loop {
        ticker.next().await;
        match wheel.tick(&mut inputs, &mut rom, now) {
            // Signal the latest report (overwrites any pending value)
            TickOutcome::Report(report) => signal.signal(report),
            TickOutcome::Settling => {}
            TickOutcome::Bootloader | TickOutcome::Halted => return,
        }
        now = now.wrapping_add(1);
    }
}

/// Output task - waits for report signals and sends them to USB HID.
#[embassy_executor::task]
async fn output_task(
    mut output: UsbHidOutput<'static>,
    signal: &'static Signal<CriticalSectionRawMutex, Report>,
) {
    // Wait for USB to be ready
    output.wait_ready().await;
    info!("USB HID ready, sending reports...");

    loop {
        // Wait for the next report (blocks until signaled)
        let report = signal.wait().await;
        if let Err(e) = output.send(&report).await {
            warn!("Output error: {:?}", e);
        }
    }
}
