//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Advertising** - connectable, scannable advertising as a HID
//!    keyboard until a host connects.
//! 2. **GATT server** - HID, Battery and Device Information services
//!    (`hid_service`).
//! 3. **Link state** - the current connection and whether the host has
//!    subscribed to key reports, shared with the keyboard link used by
//!    the control loop (`keyboard`).
//!
//! A single host is served at a time; when it disconnects, advertising
//! restarts.

pub mod bonder;
pub mod hid_service;
pub mod keyboard;

use core::cell::{Cell, RefCell};
use core::mem;

use defmt::{info, warn};
use embassy_time::{Duration, Timer};
use nrf_softdevice::ble::{gatt_server, peripheral, Connection};
use nrf_softdevice::{raw, Softdevice};

use one_button_keyboard::advertising;
use one_button_keyboard::config;
use one_button_keyboard::hid::ProtocolMode;

use self::hid_service::{Server, ServerEvent};

/// Connection shared between the BLE task and the keyboard link.
///
/// Both run on the same executor, so plain cells are enough.
pub struct LinkState {
    conn: RefCell<Option<Connection>>,
    keyboard_notify: Cell<bool>,
    boot_keyboard_notify: Cell<bool>,
    protocol: Cell<ProtocolMode>,
    battery_notify: Cell<bool>,
}

impl LinkState {
    pub const fn new() -> Self {
        Self {
            conn: RefCell::new(None),
            keyboard_notify: Cell::new(false),
            boot_keyboard_notify: Cell::new(false),
            protocol: Cell::new(ProtocolMode::Report),
            battery_notify: Cell::new(false),
        }
    }

    /// The live connection, if any.
    pub fn connection(&self) -> Option<Connection> {
        self.conn.borrow().clone()
    }

    /// A host is connected and has subscribed to key reports in its
    /// current protocol mode.
    pub fn keyboard_ready(&self) -> bool {
        self.conn.borrow().is_some()
            && self
                .protocol
                .get()
                .subscribed(self.keyboard_notify.get(), self.boot_keyboard_notify.get())
    }

    pub fn protocol(&self) -> ProtocolMode {
        self.protocol.get()
    }

    /// Connection to notify the battery level on, if subscribed.
    pub fn battery_subscriber(&self) -> Option<Connection> {
        if self.battery_notify.get() {
            self.connection()
        } else {
            None
        }
    }

    fn attach(&self, conn: &Connection) {
        *self.conn.borrow_mut() = Some(conn.clone());
    }

    fn detach(&self) {
        *self.conn.borrow_mut() = None;
        self.keyboard_notify.set(false);
        self.boot_keyboard_notify.set(false);
        self.protocol.set(ProtocolMode::Report);
        self.battery_notify.set(false);
    }

    fn on_event(&self, event: ServerEvent) {
        info!("GATT: {}", event);
        match event {
            ServerEvent::KeyboardNotify(on) => self.keyboard_notify.set(on),
            ServerEvent::BootKeyboardNotify(on) => self.boot_keyboard_notify.set(on),
            ServerEvent::Protocol(mode) => self.protocol.set(mode),
            ServerEvent::BatteryNotify(on) => self.battery_notify.set(on),
        }
    }
}

/// SoftDevice configuration: one peripheral link, our device name.
pub fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: config::BLE_DEVICE_NAME.as_ptr() as _,
            current_len: config::BLE_DEVICE_NAME.len() as u16,
            max_len: config::BLE_DEVICE_NAME.len() as u16,
            // SAFETY: all-zero is "no write access", which is what we want.
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Advertise, serve one host until it disconnects, repeat.
pub async fn run(sd: &'static Softdevice, server: &'static Server, link: &'static LinkState) -> ! {
    let adv_data = advertising::advertisement_data(config::BLE_APPEARANCE_KEYBOARD);
    let scan_data = advertising::scan_response_data(config::BLE_DEVICE_NAME);
    let adv_config = peripheral::Config {
        interval: config::BLE_ADV_INTERVAL,
        ..Default::default()
    };
    let bonder = bonder::bonder();

    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &adv_data,
            scan_data: &scan_data,
        };

        info!("BLE advertising as \"{}\"", config::BLE_DEVICE_NAME);
        let conn = match peripheral::advertise_pairable(sd, adv, &adv_config, bonder).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("BLE advertising failed: {}", e);
                Timer::after(Duration::from_secs(1)).await;
                continue;
            }
        };

        info!("BLE host connected");
        request_conn_params(&conn);
        link.attach(&conn);

        let reason = gatt_server::run(&conn, server, |event| link.on_event(event)).await;

        link.detach();
        if let Err(e) = server.reset_protocol_mode(sd) {
            warn!("Protocol mode not reset: {}", e);
        }
        info!("BLE host disconnected: {}", reason);
    }
}

fn request_conn_params(conn: &Connection) {
    let params = raw::ble_gap_conn_params_t {
        min_conn_interval: config::BLE_CONN_INTERVAL_MIN,
        max_conn_interval: config::BLE_CONN_INTERVAL_MAX,
        slave_latency: config::BLE_SLAVE_LATENCY,
        conn_sup_timeout: config::BLE_SUP_TIMEOUT,
    };
    if let Err(e) = conn.set_conn_params(params) {
        warn!("BLE connection parameter update rejected: {}", e);
    }
}
