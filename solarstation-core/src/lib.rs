//! Board-agnostic settings persistence for the Solar Station
//!
//! The device keeps one fixed-size settings record in non-volatile memory:
//!
//! - Wi-Fi credentials and device name
//! - Weather-service station ID, key and certificate fingerprint
//! - MQTT broker, topic and credentials
//! - Sensor calibration offsets and altitude
//! - Power-saving mode
//!
//! [`settings::SettingsStore`] loads the record at startup, falls back to
//! (and persists) defaults when the stored image is missing or corrupt, and
//! saves it back on request.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod settings;

pub use settings::{LoadOutcome, Settings, SettingsStore};
