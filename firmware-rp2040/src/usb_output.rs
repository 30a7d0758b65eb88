//! USB HID report output.

use defmt::info;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{HidWriter, State};
use embassy_usb::{Builder, Handler};
use portable_atomic::{AtomicBool, Ordering};
use wheel_core::{OutputError, ReportSink};
use wheel_report::{Report, ReportKind, MAX_REPORT_SIZE};

/// Largest report, rounded up to a packet size the host accepts.
const MAX_PACKET_SIZE: usize = 16;

const _: () = assert!(MAX_REPORT_SIZE <= MAX_PACKET_SIZE);

/// Set while the host has the device configured.
static CONFIGURED: AtomicBool = AtomicBool::new(false);

/// Steering pad report descriptor.
///
/// steering, accelerator, brake, x, y, z, rz, rx, ry (8-bit signed),
/// 16 buttons.
pub const STEERING_PAD_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x04, // Usage (Joystick)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Simulation controls ---
    0x05, 0x02, //   Usage Page (Simulation Controls)
    0x09, 0xC8, //   Usage (Steering)
    0x09, 0xC4, //   Usage (Accelerator)
    0x09, 0xC5, //   Usage (Brake)
    0x15, 0x80, //   Logical Minimum (-128)
    0x25, 0x7F, //   Logical Maximum (127)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x03, //   Report Count (3)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Sticks and triggers ---
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x32, //   Usage (Z)
    0x09, 0x35, //   Usage (Rz)
    0x09, 0x33, //   Usage (Rx)
    0x09, 0x34, //   Usage (Ry)
    0x95, 0x06, //   Report Count (6)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Buttons (16 buttons) ---
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x10, //   Usage Maximum (Button 16)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x10, //   Report Count (16)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

/// Combined controls report descriptor.
///
/// Same as the steering pad with the axes ordered x, y, z, rx, ry, rz.
pub const COMBINED_CONTROLS_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x04, // Usage (Joystick)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Simulation controls ---
    0x05, 0x02, //   Usage Page (Simulation Controls)
    0x09, 0xC8, //   Usage (Steering)
    0x09, 0xC4, //   Usage (Accelerator)
    0x09, 0xC5, //   Usage (Brake)
    0x15, 0x80, //   Logical Minimum (-128)
    0x25, 0x7F, //   Logical Maximum (127)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x03, //   Report Count (3)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Sticks and triggers ---
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x32, //   Usage (Z)
    0x09, 0x33, //   Usage (Rx)
    0x09, 0x34, //   Usage (Ry)
    0x09, 0x35, //   Usage (Rz)
    0x95, 0x06, //   Report Count (6)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Buttons (16 buttons) ---
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x10, //   Usage Maximum (Button 16)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x10, //   Report Count (16)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

/// Game pad report descriptor.
///
/// x, y, z, rx, ry, rz (8-bit signed), hat switch (8 = centered),
/// 16 buttons.
pub const GAMEPAD_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Gamepad)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Axes ---
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x32, //   Usage (Z)
    0x09, 0x33, //   Usage (Rx)
    0x09, 0x34, //   Usage (Ry)
    0x09, 0x35, //   Usage (Rz)
    0x15, 0x80, //   Logical Minimum (-128)
    0x25, 0x7F, //   Logical Maximum (127)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x06, //   Report Count (6)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Hat switch ---
    0x09, 0x39, //   Usage (Hat Switch)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x07, //   Logical Maximum (7)
    0x35, 0x00, //   Physical Minimum (0)
    0x46, 0x3B, 0x01, //   Physical Maximum (315)
    0x65, 0x14, //   Unit (Degrees)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x42, //   Input (Data, Variable, Absolute, Null State)
    0x65, 0x00, //   Unit (None)
    //
    // --- Buttons (16 buttons) ---
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x10, //   Usage Maximum (Button 16)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x10, //   Report Count (16)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

/// Descriptor matching `kind`'s report bytes.
#[must_use]
pub const fn report_descriptor(kind: ReportKind) -> &'static [u8] {
    match kind {
        ReportKind::SteeringPad => STEERING_PAD_DESCRIPTOR,
        ReportKind::CombinedControls => COMBINED_CONTROLS_DESCRIPTOR,
        ReportKind::GamePad => GAMEPAD_DESCRIPTOR,
    }
}

type UsbDriver<'d> = Driver<'d, USB>;

/// USB HID report output.
///
/// Wraps an embassy-usb HID writer configured for one report layout.
pub struct UsbHidOutput<'d> {
    writer: HidWriter<'d, UsbDriver<'d>, MAX_PACKET_SIZE>,
    kind: ReportKind,
}

impl<'d> UsbHidOutput<'d> {
    /// Create a new USB HID output for reports of `kind`.
    pub fn new(writer: HidWriter<'d, UsbDriver<'d>, MAX_PACKET_SIZE>, kind: ReportKind) -> Self {
        Self { writer, kind }
    }

    /// Wait until the device is ready (USB enumerated).
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
    }
}

impl<'d> ReportSink for UsbHidOutput<'d> {
    async fn send(&mut self, report: &Report) -> Result<(), OutputError> {
        if report.kind() != self.kind {
            return Err(OutputError::Dropped);
        }
        if !self.is_ready() {
            return Err(OutputError::NotReady);
        }
        self.writer
            .write(&report.to_bytes())
            .await
            .map_err(|_| OutputError::Io)
    }

    fn is_ready(&self) -> bool {
        CONFIGURED.load(Ordering::Relaxed)
    }
}

/// Tracks the device state for [`UsbHidOutput::is_ready`].
pub struct UsbStateHandler;

impl Handler for UsbStateHandler {
    fn enabled(&mut self, enabled: bool) {
        CONFIGURED.store(false, Ordering::Relaxed);
        info!("USB device {}", if enabled { "enabled" } else { "disabled" });
    }

    fn reset(&mut self) {
        CONFIGURED.store(false, Ordering::Relaxed);
    }

    fn configured(&mut self, configured: bool) {
        CONFIGURED.store(configured, Ordering::Relaxed);
        info!("USB device configured: {}", configured);
    }
}

/// Configure the USB HID class for reports of `kind`.
///
/// Returns the HID writer for use by the application.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, UsbDriver<'d>>,
    state: &'d mut State<'d>,
    kind: ReportKind,
) -> HidWriter<'d, UsbDriver<'d>, MAX_PACKET_SIZE> {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: report_descriptor(kind),
        request_handler: None,
        poll_ms: 1,
        max_packet_size: MAX_PACKET_SIZE as u16,
        hid_subclass: embassy_usb::class::hid::HidSubclass::No,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}
