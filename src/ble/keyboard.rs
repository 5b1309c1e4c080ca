//! BLE implementation of the keyboard link.

use defmt::warn;
use nrf_softdevice::Softdevice;

use one_button_keyboard::emitter::KeyboardLink;
use one_button_keyboard::error::Error;
use one_button_keyboard::hid::KeyboardReport;
use one_button_keyboard::Key;

use super::hid_service::Server;
use super::LinkState;

/// Keys currently held, mirrored to the connected host.
pub struct BleKeyboard {
    sd: &'static Softdevice,
    server: &'static Server,
    link: &'static LinkState,
    report: KeyboardReport,
}

impl BleKeyboard {
    pub fn new(sd: &'static Softdevice, server: &'static Server, link: &'static LinkState) -> Self {
        Self {
            sd,
            server,
            link,
            report: KeyboardReport::empty(),
        }
    }

    fn send_report(&self) -> Result<(), Error> {
        let conn = self.link.connection().ok_or(Error::NotConnected)?;
        self.server
            .notify_keyboard(&conn, self.link.protocol(), &self.report.to_bytes())
    }
}

impl KeyboardLink for BleKeyboard {
    fn is_connected(&self) -> bool {
        self.link.keyboard_ready()
    }

    fn press(&mut self, key: Key) {
        if !self.report.press(key) {
            return;
        }
        if let Err(e) = self.send_report() {
            warn!("Key report not sent: {}", e);
        }
    }

    fn release_all(&mut self) {
        self.report.release_all();
        if let Err(e) = self.send_report() {
            warn!("Key release not sent: {}", e);
        }
    }

    fn set_battery_level(&mut self, percent: u8) {
        if let Err(e) = self.server.set_battery_level(self.sd, percent) {
            warn!("Battery level not stored: {}", e);
        }
        if let Some(conn) = self.link.battery_subscriber() {
            if let Err(e) = self.server.notify_battery_level(&conn, percent) {
                warn!("Battery level not notified: {}", e);
            }
        }
    }
}
