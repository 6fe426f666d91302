//! Fixed binary layout of the settings image
//!
//! Fields are stored back to back in declaration order with no padding.
//! Integers and floats are little-endian. Text fields occupy their full
//! width; content ends at the first NUL byte or at the end of the field.
//!
//! ```text
//! offset  width  field
//! ──────  ─────  ─────────────────
//!      0      4  magic ("Air\0")
//!      4     32  ssid
//!     36     64  psk
//!    100     32  name
//!    132      4  poll_interval_s   u32
//!    136     16  station_id
//!    152     16  station_key
//!    168    128  fingerprint
//!    296    256  mqtt_broker
//!    552     32  mqtt_topic
//!    584     32  mqtt_user
//!    616     32  mqtt_password
//!    648      2  mqtt_port         u16
//!    650      4  temp_adjust       f32
//!    654      4  rad_adjust        f32
//!    658      4  uv_adjust         f32
//!    662      4  altitude_m        f32
//!    666      1  eco_mode          u8
//!    667      1  in_eco_mode       0 = false, else true
//! ```

use core::str;

use heapless::String;

use super::types::*;

pub const MAGIC_OFFSET: usize = 0;
pub const SSID_OFFSET: usize = MAGIC_OFFSET + MAGIC_LEN;
pub const PSK_OFFSET: usize = SSID_OFFSET + SSID_LEN;
pub const NAME_OFFSET: usize = PSK_OFFSET + PSK_LEN;
pub const POLL_INTERVAL_OFFSET: usize = NAME_OFFSET + NAME_LEN;
pub const STATION_ID_OFFSET: usize = POLL_INTERVAL_OFFSET + 4;
pub const STATION_KEY_OFFSET: usize = STATION_ID_OFFSET + ID_LEN;
pub const FINGERPRINT_OFFSET: usize = STATION_KEY_OFFSET + KEY_LEN;
pub const MQTT_BROKER_OFFSET: usize = FINGERPRINT_OFFSET + FINGERPRINT_LEN;
pub const MQTT_TOPIC_OFFSET: usize = MQTT_BROKER_OFFSET + SERVER_LEN;
pub const MQTT_USER_OFFSET: usize = MQTT_TOPIC_OFFSET + NAME_LEN;
pub const MQTT_PASSWORD_OFFSET: usize = MQTT_USER_OFFSET + NAME_LEN;
pub const MQTT_PORT_OFFSET: usize = MQTT_PASSWORD_OFFSET + NAME_LEN;
pub const TEMP_ADJUST_OFFSET: usize = MQTT_PORT_OFFSET + 2;
pub const RAD_ADJUST_OFFSET: usize = TEMP_ADJUST_OFFSET + 4;
pub const UV_ADJUST_OFFSET: usize = RAD_ADJUST_OFFSET + 4;
pub const ALTITUDE_OFFSET: usize = UV_ADJUST_OFFSET + 4;
pub const ECO_MODE_OFFSET: usize = ALTITUDE_OFFSET + 4;
pub const IN_ECO_MODE_OFFSET: usize = ECO_MODE_OFFSET + 1;

/// Serialized size of [`Settings`] in bytes
pub const SETTINGS_SIZE: usize = IN_ECO_MODE_OFFSET + 1;

const _: () = assert!(SETTINGS_SIZE == 668);

/// Reasons a stored image cannot be decoded
///
/// Only the marker decides validity. Once it matches, every other byte
/// pattern decodes to some record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// Marker bytes are not [`SETTINGS_MAGIC`]
    BadMagic,
}

impl Settings {
    /// Write the full image of this record into `buffer`
    pub fn encode(&self, buffer: &mut [u8; SETTINGS_SIZE]) {
        buffer[MAGIC_OFFSET..SSID_OFFSET].copy_from_slice(&self.magic);
        put_str(buffer, SSID_OFFSET, &self.ssid);
        put_str(buffer, PSK_OFFSET, &self.psk);
        put_str(buffer, NAME_OFFSET, &self.name);
        put_bytes(buffer, POLL_INTERVAL_OFFSET, &self.poll_interval_s.to_le_bytes());
        put_str(buffer, STATION_ID_OFFSET, &self.station_id);
        put_str(buffer, STATION_KEY_OFFSET, &self.station_key);
        put_str(buffer, FINGERPRINT_OFFSET, &self.fingerprint);
        put_str(buffer, MQTT_BROKER_OFFSET, &self.mqtt_broker);
        put_str(buffer, MQTT_TOPIC_OFFSET, &self.mqtt_topic);
        put_str(buffer, MQTT_USER_OFFSET, &self.mqtt_user);
        put_str(buffer, MQTT_PASSWORD_OFFSET, &self.mqtt_password);
        put_bytes(buffer, MQTT_PORT_OFFSET, &self.mqtt_port.to_le_bytes());
        put_bytes(buffer, TEMP_ADJUST_OFFSET, &self.temp_adjust.to_le_bytes());
        put_bytes(buffer, RAD_ADJUST_OFFSET, &self.rad_adjust.to_le_bytes());
        put_bytes(buffer, UV_ADJUST_OFFSET, &self.uv_adjust.to_le_bytes());
        put_bytes(buffer, ALTITUDE_OFFSET, &self.altitude_m.to_le_bytes());
        buffer[ECO_MODE_OFFSET] = self.eco_mode;
        buffer[IN_ECO_MODE_OFFSET] = self.in_eco_mode as u8;
    }

    /// Read a record from a full image
    ///
    /// The marker is checked first, so an uninitialized medium always
    /// reports [`LayoutError::BadMagic`].
    pub fn decode(buffer: &[u8; SETTINGS_SIZE]) -> Result<Self, LayoutError> {
        let magic = get_array::<MAGIC_LEN>(buffer, MAGIC_OFFSET);
        if magic != SETTINGS_MAGIC {
            return Err(LayoutError::BadMagic);
        }

        Ok(Self {
            magic,
            ssid: get_str(buffer, SSID_OFFSET),
            psk: get_str(buffer, PSK_OFFSET),
            name: get_str(buffer, NAME_OFFSET),
            poll_interval_s: u32::from_le_bytes(get_array(buffer, POLL_INTERVAL_OFFSET)),
            station_id: get_str(buffer, STATION_ID_OFFSET),
            station_key: get_str(buffer, STATION_KEY_OFFSET),
            fingerprint: get_str(buffer, FINGERPRINT_OFFSET),
            mqtt_broker: get_str(buffer, MQTT_BROKER_OFFSET),
            mqtt_topic: get_str(buffer, MQTT_TOPIC_OFFSET),
            mqtt_user: get_str(buffer, MQTT_USER_OFFSET),
            mqtt_password: get_str(buffer, MQTT_PASSWORD_OFFSET),
            mqtt_port: u16::from_le_bytes(get_array(buffer, MQTT_PORT_OFFSET)),
            temp_adjust: f32::from_le_bytes(get_array(buffer, TEMP_ADJUST_OFFSET)),
            rad_adjust: f32::from_le_bytes(get_array(buffer, RAD_ADJUST_OFFSET)),
            uv_adjust: f32::from_le_bytes(get_array(buffer, UV_ADJUST_OFFSET)),
            altitude_m: f32::from_le_bytes(get_array(buffer, ALTITUDE_OFFSET)),
            eco_mode: buffer[ECO_MODE_OFFSET],
            in_eco_mode: buffer[IN_ECO_MODE_OFFSET] != 0,
        })
    }
}

fn put_bytes(buffer: &mut [u8; SETTINGS_SIZE], offset: usize, bytes: &[u8]) {
    buffer[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// Write text up to its first NUL and NUL-fill the rest of its `N`-byte field
fn put_str<const N: usize>(buffer: &mut [u8; SETTINGS_SIZE], offset: usize, value: &String<N>) {
    let field = &mut buffer[offset..offset + N];
    let bytes = until_nul(value.as_bytes());
    field[..bytes.len()].copy_from_slice(bytes);
    field[bytes.len()..].fill(0);
}

fn get_array<const W: usize>(buffer: &[u8; SETTINGS_SIZE], offset: usize) -> [u8; W] {
    let mut out = [0u8; W];
    out.copy_from_slice(&buffer[offset..offset + W]);
    out
}

/// Read text up to the first NUL, keeping the longest valid UTF-8 prefix
fn get_str<const N: usize>(buffer: &[u8; SETTINGS_SIZE], offset: usize) -> String<N> {
    let raw = until_nul(&buffer[offset..offset + N]);
    let text = match str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => {
            let valid = &raw[..e.valid_up_to()];
            // valid_up_to() always marks a UTF-8 boundary
            str::from_utf8(valid).unwrap_or_default()
        }
    };
    fixed_str(text)
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..len]
}
