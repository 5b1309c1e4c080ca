//! GATT server: HID-over-GATT keyboard, Battery and Device Information
//! services.
//!
//! Services are registered with the SoftDevice's `ServiceBuilder` before
//! the SoftDevice task starts. The HID service exposes:
//!
//! - HID Information, Report Map, HID Control Point, Protocol Mode
//! - Keyboard input report (report ID 1) with CCCD and Report Reference
//! - LED output report (report ID 1), accepted and ignored
//! - Boot Keyboard Input Report with CCCD, and Boot Keyboard Output Report
//!
//! Key reports go to the input report that matches the host's protocol
//! mode.

use defmt::{debug, info};
use nrf_softdevice::ble::gatt_server::builder::ServiceBuilder;
use nrf_softdevice::ble::gatt_server::characteristic::{Attribute, Metadata, Properties};
use nrf_softdevice::ble::gatt_server::{self, RegisterError, WriteOp};
use nrf_softdevice::ble::{Connection, SecurityMode, Uuid};
use nrf_softdevice::Softdevice;

use one_button_keyboard::config::BLE_MANUFACTURER;
use one_button_keyboard::error::{BleError, Error};
use one_button_keyboard::hid::keyboard::{
    KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_ID, KEYBOARD_REPORT_SIZE,
};
use one_button_keyboard::hid::ProtocolMode;

const HID_SERVICE: Uuid = Uuid::new_16(0x1812);
const HID_INFORMATION: Uuid = Uuid::new_16(0x2A4A);
const HID_REPORT_MAP: Uuid = Uuid::new_16(0x2A4B);
const HID_CONTROL_POINT: Uuid = Uuid::new_16(0x2A4C);
const HID_REPORT: Uuid = Uuid::new_16(0x2A4D);
const HID_PROTOCOL_MODE: Uuid = Uuid::new_16(0x2A4E);
const HID_BOOT_KEYBOARD_INPUT: Uuid = Uuid::new_16(0x2A22);
const HID_BOOT_KEYBOARD_OUTPUT: Uuid = Uuid::new_16(0x2A32);
const HID_REPORT_REFERENCE: Uuid = Uuid::new_16(0x2908);

const BATTERY_SERVICE: Uuid = Uuid::new_16(0x180F);
const BATTERY_LEVEL: Uuid = Uuid::new_16(0x2A19);

const DEVICE_INFORMATION_SERVICE: Uuid = Uuid::new_16(0x180A);
const MANUFACTURER_NAME: Uuid = Uuid::new_16(0x2A29);

/// bcdHID 1.11, no country code, remote wake + normally connectable.
const HID_INFO_VALUE: [u8; 4] = [0x11, 0x01, 0x00, 0x03];

/// Report Reference type values.
const REPORT_TYPE_INPUT: u8 = 0x01;
const REPORT_TYPE_OUTPUT: u8 = 0x02;

/// CCCD bit enabling notifications.
const CCCD_NOTIFY: u16 = 0x0001;

/// Writes the central makes that the rest of the firmware cares about.
#[derive(Clone, Copy, defmt::Format)]
pub enum ServerEvent {
    /// Keyboard input report notifications switched on or off.
    KeyboardNotify(bool),
    /// Boot keyboard input notifications switched on or off.
    BootKeyboardNotify(bool),
    /// The host selected boot or report protocol.
    Protocol(ProtocolMode),
    /// Battery level notifications switched on or off.
    BatteryNotify(bool),
}

pub struct HidService {
    input_report: u16,
    input_report_cccd: u16,
    output_report: u16,
    boot_input: u16,
    boot_input_cccd: u16,
    boot_output: u16,
    protocol_mode: u16,
    control_point: u16,
}

impl HidService {
    fn new(sd: &mut Softdevice) -> Result<Self, RegisterError> {
        let mut service = ServiceBuilder::new(sd, HID_SERVICE)?;

        service
            .add_characteristic(
                HID_INFORMATION,
                Attribute::new(HID_INFO_VALUE).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read()),
            )?
            .build();

        service
            .add_characteristic(
                HID_REPORT_MAP,
                Attribute::new(KEYBOARD_REPORT_DESCRIPTOR).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read()),
            )?
            .build();

        let control_point = service
            .add_characteristic(
                HID_CONTROL_POINT,
                Attribute::new([0u8]).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().write_without_response()),
            )?
            .build();

        let protocol_mode = service
            .add_characteristic(
                HID_PROTOCOL_MODE,
                Attribute::new([ProtocolMode::default().as_byte()]).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read().write_without_response()),
            )?
            .build();

        let mut input = service.add_characteristic(
            HID_REPORT,
            Attribute::new([0u8; KEYBOARD_REPORT_SIZE]).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read().notify()),
        )?;
        input.add_descriptor(
            HID_REPORT_REFERENCE,
            Attribute::new([KEYBOARD_REPORT_ID, REPORT_TYPE_INPUT]).security(SecurityMode::JustWorks),
        )?;
        let input = input.build();

        let mut output = service.add_characteristic(
            HID_REPORT,
            Attribute::new([0u8]).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read().write().write_without_response()),
        )?;
        output.add_descriptor(
            HID_REPORT_REFERENCE,
            Attribute::new([KEYBOARD_REPORT_ID, REPORT_TYPE_OUTPUT]).security(SecurityMode::JustWorks),
        )?;
        let output = output.build();

        let boot_input = service
            .add_characteristic(
                HID_BOOT_KEYBOARD_INPUT,
                Attribute::new([0u8; KEYBOARD_REPORT_SIZE]).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read().notify()),
            )?
            .build();

        let boot_output = service
            .add_characteristic(
                HID_BOOT_KEYBOARD_OUTPUT,
                Attribute::new([0u8]).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read().write().write_without_response()),
            )?
            .build();

        let _ = service.build();

        Ok(Self {
            input_report: input.value_handle,
            input_report_cccd: input.cccd_handle,
            output_report: output.value_handle,
            boot_input: boot_input.value_handle,
            boot_input_cccd: boot_input.cccd_handle,
            boot_output: boot_output.value_handle,
            protocol_mode: protocol_mode.value_handle,
            control_point: control_point.value_handle,
        })
    }

    fn on_write(&self, handle: u16, data: &[u8]) -> Option<ServerEvent> {
        if handle == self.input_report_cccd {
            Some(ServerEvent::KeyboardNotify(cccd_notify(data)))
        } else if handle == self.boot_input_cccd {
            Some(ServerEvent::BootKeyboardNotify(cccd_notify(data)))
        } else if handle == self.output_report || handle == self.boot_output {
            debug!("HID LED report: {=[u8]:x}", data);
            None
        } else if handle == self.protocol_mode {
            let mode = ProtocolMode::from_write(data);
            if mode.is_none() {
                info!("HID protocol mode write ignored: {=[u8]:x}", data);
            }
            mode.map(ServerEvent::Protocol)
        } else if handle == self.control_point {
            debug!("HID control point: {=[u8]:x}", data);
            None
        } else {
            None
        }
    }
}

pub struct BatteryService {
    level: u16,
    level_cccd: u16,
}

impl BatteryService {
    fn new(sd: &mut Softdevice) -> Result<Self, RegisterError> {
        let mut service = ServiceBuilder::new(sd, BATTERY_SERVICE)?;
        let level = service
            .add_characteristic(
                BATTERY_LEVEL,
                Attribute::new([100u8]),
                Metadata::new(Properties::new().read().notify()),
            )?
            .build();
        let _ = service.build();

        Ok(Self {
            level: level.value_handle,
            level_cccd: level.cccd_handle,
        })
    }

    fn on_write(&self, handle: u16, data: &[u8]) -> Option<ServerEvent> {
        (handle == self.level_cccd).then(|| ServerEvent::BatteryNotify(cccd_notify(data)))
    }
}

fn register_device_information(sd: &mut Softdevice) -> Result<(), RegisterError> {
    let mut service = ServiceBuilder::new(sd, DEVICE_INFORMATION_SERVICE)?;
    service
        .add_characteristic(
            MANUFACTURER_NAME,
            Attribute::new(BLE_MANUFACTURER.as_bytes()),
            Metadata::new(Properties::new().read()),
        )?
        .build();
    let _ = service.build();
    Ok(())
}

fn cccd_notify(data: &[u8]) -> bool {
    match data {
        [lo, hi, ..] => u16::from_le_bytes([*lo, *hi]) & CCCD_NOTIFY != 0,
        [lo] => u16::from(*lo) & CCCD_NOTIFY != 0,
        [] => false,
    }
}

/// All services of the keyboard.
pub struct Server {
    hid: HidService,
    battery: BatteryService,
}

impl Server {
    /// Register every service. Must run before the SoftDevice task starts.
    pub fn new(sd: &mut Softdevice) -> Result<Self, Error> {
        Self::register(sd).map_err(|_| Error::Ble(BleError::RegisterFailed))
    }

    fn register(sd: &mut Softdevice) -> Result<Self, RegisterError> {
        register_device_information(sd)?;
        let hid = HidService::new(sd)?;
        let battery = BatteryService::new(sd)?;
        Ok(Self { hid, battery })
    }

    /// Push a keyboard report on the input report `mode` uses.
    pub fn notify_keyboard(&self, conn: &Connection, mode: ProtocolMode, report: &[u8]) -> Result<(), Error> {
        let handle = match mode {
            ProtocolMode::Boot => self.hid.boot_input,
            ProtocolMode::Report => self.hid.input_report,
        };
        gatt_server::notify_value(conn, handle, report)
            .map_err(|_| BleError::NotifyFailed)?;
        Ok(())
    }

    /// Every connection starts in report protocol.
    pub fn reset_protocol_mode(&self, sd: &Softdevice) -> Result<(), Error> {
        gatt_server::set_value(sd, self.hid.protocol_mode, &[ProtocolMode::Report.as_byte()])
            .map_err(|_| BleError::SetValueFailed)?;
        Ok(())
    }

    /// Update the readable battery level.
    pub fn set_battery_level(&self, sd: &Softdevice, percent: u8) -> Result<(), Error> {
        gatt_server::set_value(sd, self.battery.level, &[percent])
            .map_err(|_| BleError::SetValueFailed)?;
        Ok(())
    }

    /// Notify the battery level to a subscribed host.
    pub fn notify_battery_level(&self, conn: &Connection, percent: u8) -> Result<(), Error> {
        gatt_server::notify_value(conn, self.battery.level, &[percent])
            .map_err(|_| BleError::NotifyFailed)?;
        Ok(())
    }
}

impl gatt_server::Server for Server {
    type Event = ServerEvent;

    fn on_write(
        &self,
        _conn: &Connection,
        handle: u16,
        _op: WriteOp,
        _offset: usize,
        data: &[u8],
    ) -> Option<Self::Event> {
        self.hid
            .on_write(handle, data)
            .or_else(|| self.battery.on_write(handle, data))
    }
}
