//! Pairing and bonding for the HID peripheral.
//!
//! Hosts pair with "Just Works" (no display or keypad on our side). Bond
//! keys are kept in RAM for up to `MAX_BONDED_HOSTS` hosts, so a host that
//! reconnects within the same power cycle re-encrypts without pairing
//! again.

use core::cell::RefCell;

use defmt::info;
use heapless::Vec;
use nrf_softdevice::ble::security::{IoCapabilities, SecurityHandler};
use nrf_softdevice::ble::{Connection, EncryptionInfo, IdentityKey, MasterId, SecurityMode};
use static_cell::StaticCell;

use one_button_keyboard::config::MAX_BONDED_HOSTS;

struct HostBond {
    master_id: MasterId,
    key: EncryptionInfo,
}

pub struct Bonder {
    hosts: RefCell<Vec<HostBond, MAX_BONDED_HOSTS>>,
}

impl Bonder {
    fn new() -> Self {
        Self {
            hosts: RefCell::new(Vec::new()),
        }
    }
}

impl SecurityHandler for Bonder {
    fn io_capabilities(&self) -> IoCapabilities {
        IoCapabilities::None
    }

    fn can_bond(&self, _conn: &Connection) -> bool {
        true
    }

    fn on_bonded(
        &self,
        _conn: &Connection,
        master_id: MasterId,
        key: EncryptionInfo,
        _peer_id: IdentityKey,
    ) {
        let mut hosts = self.hosts.borrow_mut();
        if let Some(existing) = hosts.iter_mut().find(|h| h.master_id == master_id) {
            existing.key = key;
            return;
        }

        // Oldest bond makes room.
        if hosts.is_full() {
            hosts.remove(0);
        }

        let _ = hosts.push(HostBond { master_id, key });
        info!("BLE bonded with host ({} known)", hosts.len());
    }

    fn get_key(&self, _conn: &Connection, master_id: MasterId) -> Option<EncryptionInfo> {
        self.hosts
            .borrow()
            .iter()
            .find_map(|h| (h.master_id == master_id).then_some(h.key))
    }

    fn on_security_update(&self, _conn: &Connection, mode: SecurityMode) {
        info!("BLE security mode updated: {}", mode);
    }
}

/// The bonder, created once.
pub fn bonder() -> &'static Bonder {
    static BONDER: StaticCell<Bonder> = StaticCell::new();
    BONDER.init(Bonder::new())
}
