//! Settings record definition
//!
//! One flat record holds everything the station needs to come up on the
//! network and report. Text fields are fixed-capacity strings whose
//! capacity equals their width on the medium.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Marker length in bytes
pub const MAGIC_LEN: usize = 4;

/// Wi-Fi SSID length
pub const SSID_LEN: usize = 32;

/// Wi-Fi passphrase length
pub const PSK_LEN: usize = 64;

/// Device name, MQTT topic, user and password length
pub const NAME_LEN: usize = 32;

/// Server address length
pub const SERVER_LEN: usize = 256;

/// Weather-service station ID length
pub const ID_LEN: usize = 16;

/// Weather-service station key length
pub const KEY_LEN: usize = 16;

/// TLS certificate fingerprint length
pub const FINGERPRINT_LEN: usize = 128;

/// Marker identifying an initialized settings image
pub const SETTINGS_MAGIC: [u8; MAGIC_LEN] = *b"Air\0";

/// Hostname used while no device name is configured
pub const DEFAULT_HOSTNAME: &str = "ESP-SOLAR";

pub const DEFAULT_POLL_INTERVAL_S: u32 = 300;
pub const DEFAULT_MQTT_TOPIC: &str = "jeedom";
pub const DEFAULT_MQTT_PORT: u16 = 1883;
pub const DEFAULT_TEMP_ADJUST: f32 = 0.0;
pub const DEFAULT_RAD_ADJUST: f32 = 1.0;
pub const DEFAULT_UV_ADJUST: f32 = 1.0;
pub const DEFAULT_ALTITUDE_M: f32 = 0.0;
pub const DEFAULT_ECO_MODE: u8 = 1;

/// Persistent device settings
///
/// Always fully populated: either decoded from the medium or produced by
/// [`Settings::default`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// Validity marker, [`SETTINGS_MAGIC`] when initialized
    pub magic: [u8; MAGIC_LEN],
    /// Wi-Fi network name
    pub ssid: String<SSID_LEN>,
    /// Wi-Fi passphrase
    pub psk: String<PSK_LEN>,
    /// Device name
    pub name: String<NAME_LEN>,
    /// Interval between reports (seconds)
    pub poll_interval_s: u32,
    /// Weather-service station ID
    pub station_id: String<ID_LEN>,
    /// Weather-service station key
    pub station_key: String<KEY_LEN>,
    /// Weather-service TLS certificate fingerprint
    pub fingerprint: String<FINGERPRINT_LEN>,
    /// MQTT broker address
    pub mqtt_broker: String<SERVER_LEN>,
    /// MQTT topic
    pub mqtt_topic: String<NAME_LEN>,
    /// MQTT account user
    pub mqtt_user: String<NAME_LEN>,
    /// MQTT account password
    pub mqtt_password: String<NAME_LEN>,
    /// MQTT broker port
    pub mqtt_port: u16,
    /// Temperature offset (°C)
    pub temp_adjust: f32,
    /// Solar radiation multiplier
    pub rad_adjust: f32,
    /// UV index multiplier
    pub uv_adjust: f32,
    /// Altitude above sea level (m)
    pub altitude_m: f32,
    /// Power-saving mode level
    pub eco_mode: u8,
    /// Whether the device was in power-saving mode when it last shut down
    pub in_eco_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            magic: SETTINGS_MAGIC,
            ssid: String::new(),
            psk: String::new(),
            name: String::new(),
            poll_interval_s: DEFAULT_POLL_INTERVAL_S,
            station_id: String::new(),
            station_key: String::new(),
            fingerprint: String::new(),
            mqtt_broker: String::new(),
            mqtt_topic: fixed_str(DEFAULT_MQTT_TOPIC),
            mqtt_user: String::new(),
            mqtt_password: String::new(),
            mqtt_port: DEFAULT_MQTT_PORT,
            temp_adjust: DEFAULT_TEMP_ADJUST,
            rad_adjust: DEFAULT_RAD_ADJUST,
            uv_adjust: DEFAULT_UV_ADJUST,
            altitude_m: DEFAULT_ALTITUDE_M,
            eco_mode: DEFAULT_ECO_MODE,
            in_eco_mode: false,
        }
    }
}

impl Settings {
    /// Check the marker only
    pub fn magic_is_valid(&self) -> bool {
        self.magic == SETTINGS_MAGIC
    }

    /// Network hostname: the device name, or [`DEFAULT_HOSTNAME`] if unset
    pub fn hostname(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_HOSTNAME
        } else {
            &self.name
        }
    }

    /// Wi-Fi can be joined once an SSID is configured
    pub fn has_wifi_credentials(&self) -> bool {
        !self.ssid.is_empty()
    }

    /// MQTT reporting is on once a broker is configured
    pub fn mqtt_enabled(&self) -> bool {
        !self.mqtt_broker.is_empty()
    }

    /// Weather-service uploads need both station ID and key
    pub fn wunderground_enabled(&self) -> bool {
        !self.station_id.is_empty() && !self.station_key.is_empty()
    }
}

/// Copy `value` into a fixed-capacity string
///
/// Text stops at the first NUL, since the stored field ends there. Input
/// longer than `N` bytes is cut at the last UTF-8 character boundary that
/// fits.
pub fn fixed_str<const N: usize>(value: &str) -> String<N> {
    let value = value.split('\0').next().unwrap_or_default();
    let mut end = value.len().min(N);
    while !value.is_char_boundary(end) {
        end -= 1;
    }

    let mut out = String::new();
    // Cannot overflow: end <= N
    let _ = out.push_str(&value[..end]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.magic_is_valid());
        assert_eq!(settings.ssid, "");
        assert_eq!(settings.psk, "");
        assert_eq!(settings.name, "");
        assert_eq!(settings.poll_interval_s, 300);
        assert_eq!(settings.station_id, "");
        assert_eq!(settings.station_key, "");
        assert_eq!(settings.fingerprint, "");
        assert_eq!(settings.mqtt_broker, "");
        assert_eq!(settings.mqtt_topic, "jeedom");
        assert_eq!(settings.mqtt_user, "");
        assert_eq!(settings.mqtt_password, "");
        assert_eq!(settings.mqtt_port, 1883);
        assert_eq!(settings.temp_adjust, 0.0);
        assert_eq!(settings.rad_adjust, 1.0);
        assert_eq!(settings.uv_adjust, 1.0);
        assert_eq!(settings.altitude_m, 0.0);
        assert_eq!(settings.eco_mode, 1);
        assert!(!settings.in_eco_mode);
    }

    #[test]
    fn test_fixed_str_truncates() {
        let long = "abcdefghijklmnopqrstuvwxyz0123456789";
        let name: String<NAME_LEN> = fixed_str(long);
        assert_eq!(name.len(), NAME_LEN);
        assert_eq!(name, &long[..NAME_LEN]);
    }

    #[test]
    fn test_fixed_str_respects_char_boundary() {
        // 'é' is two bytes, so the third one would straddle the limit
        let name: String<5> = fixed_str("ééé");
        assert_eq!(name, "éé");
    }

    #[test]
    fn test_fixed_str_stops_at_nul() {
        let name: String<NAME_LEN> = fixed_str("ab\0cd");
        assert_eq!(name, "ab");

        let empty: String<NAME_LEN> = fixed_str("\0tail");
        assert_eq!(empty, "");
    }

    #[test]
    fn test_hostname_fallback() {
        let mut settings = Settings::default();
        assert_eq!(settings.hostname(), DEFAULT_HOSTNAME);

        settings.name = fixed_str("roof-station");
        assert_eq!(settings.hostname(), "roof-station");
    }

    #[test]
    fn test_service_flags() {
        let mut settings = Settings::default();
        assert!(!settings.has_wifi_credentials());
        assert!(!settings.mqtt_enabled());
        assert!(!settings.wunderground_enabled());

        settings.ssid = fixed_str("home");
        settings.mqtt_broker = fixed_str("192.168.1.10");
        settings.station_id = fixed_str("IMADRID42");
        assert!(settings.has_wifi_credentials());
        assert!(settings.mqtt_enabled());
        assert!(!settings.wunderground_enabled());

        settings.station_key = fixed_str("s3cr3t");
        assert!(settings.wunderground_enabled());
    }
}
