//! BLE advertising payloads.
//!
//! Legacy advertising allows 31 bytes per packet, which is not enough for
//! the flags, appearance, service list and the full device name together.
//! The advertisement carries everything a host filters on; the name goes
//! into the scan response.

use heapless::Vec;

/// Maximum legacy advertising payload.
pub const ADV_PAYLOAD_MAX: usize = 31;

const AD_FLAGS: u8 = 0x01;
const AD_UUID16_COMPLETE: u8 = 0x03;
const AD_NAME_SHORT: u8 = 0x08;
const AD_NAME_COMPLETE: u8 = 0x09;
const AD_APPEARANCE: u8 = 0x19;

/// LE General Discoverable, BR/EDR not supported.
const FLAGS_GENERAL_DISCOVERABLE: u8 = 0x06;

/// HID Service UUID.
pub const UUID_HID_SERVICE: u16 = 0x1812;
/// Battery Service UUID.
pub const UUID_BATTERY_SERVICE: u16 = 0x180F;

pub type Payload = Vec<u8, ADV_PAYLOAD_MAX>;

fn push_field(payload: &mut Payload, ad_type: u8, data: &[u8]) -> bool {
    if payload.len() + 2 + data.len() > ADV_PAYLOAD_MAX {
        return false;
    }
    // Length covers the type byte plus the data.
    let _ = payload.push(data.len() as u8 + 1);
    let _ = payload.push(ad_type);
    let _ = payload.extend_from_slice(data);
    true
}

/// Flags, appearance and the HID and Battery service UUIDs.
pub fn advertisement_data(appearance: [u8; 2]) -> Payload {
    let hid = UUID_HID_SERVICE.to_le_bytes();
    let battery = UUID_BATTERY_SERVICE.to_le_bytes();

    let mut payload = Payload::new();
    push_field(&mut payload, AD_FLAGS, &[FLAGS_GENERAL_DISCOVERABLE]);
    push_field(&mut payload, AD_APPEARANCE, &appearance);
    push_field(
        &mut payload,
        AD_UUID16_COMPLETE,
        &[hid[0], hid[1], battery[0], battery[1]],
    );
    payload
}

/// Device name, cut and marked as shortened when it does not fit.
pub fn scan_response_data(name: &str) -> Payload {
    let room = ADV_PAYLOAD_MAX - 2;
    let bytes = name.as_bytes();

    let mut payload = Payload::new();
    if bytes.len() <= room {
        push_field(&mut payload, AD_NAME_COMPLETE, bytes);
    } else {
        push_field(&mut payload, AD_NAME_SHORT, &bytes[..room]);
    }
    payload
}

/// Data of the first AD structure of type `ad_type` in `payload`.
#[cfg(test)]
pub fn find_field(payload: &[u8], ad_type: u8) -> Option<&[u8]> {
    let mut i = 0;
    while i < payload.len() {
        let len = payload[i] as usize;
        if len == 0 || i + len >= payload.len() {
            break;
        }
        if payload[i + 1] == ad_type {
            return Some(&payload[i + 2..i + 1 + len]);
        }
        i += len + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BLE_APPEARANCE_KEYBOARD, BLE_DEVICE_NAME};

    #[test]
    fn advertisement_lists_hid_and_battery_services() {
        let adv = advertisement_data(BLE_APPEARANCE_KEYBOARD);
        assert_eq!(find_field(&adv, AD_UUID16_COMPLETE), Some(&[0x12, 0x18, 0x0F, 0x18][..]));
        assert_eq!(find_field(&adv, AD_FLAGS), Some(&[0x06][..]));
        assert_eq!(find_field(&adv, AD_APPEARANCE), Some(&[0xC1, 0x03][..]));
    }

    #[test]
    fn device_name_fits_the_scan_response() {
        let scan = scan_response_data(BLE_DEVICE_NAME);
        assert_eq!(find_field(&scan, AD_NAME_COMPLETE), Some(BLE_DEVICE_NAME.as_bytes()));
    }

    #[test]
    fn overlong_name_is_shortened() {
        let name = "A keyboard name far longer than one packet";
        let scan = scan_response_data(name);
        assert_eq!(scan.len(), ADV_PAYLOAD_MAX);
        assert_eq!(find_field(&scan, AD_NAME_COMPLETE), None);
        assert_eq!(find_field(&scan, AD_NAME_SHORT), Some(&name.as_bytes()[..29]));
    }

    #[test]
    fn find_field_stops_on_truncated_structure() {
        // Length byte claims more data than there is.
        let data = [0x05, AD_NAME_COMPLETE, b'a'];
        assert_eq!(find_field(&data, AD_NAME_COMPLETE), None);
    }
}
