//! Solar Station Hardware Abstraction Layer
//!
//! This crate defines the non-volatile byte store that the settings core
//! persists into. Any medium that can be addressed as a flat byte range
//! (a real EEPROM, an emulated EEPROM in NOR flash, plain RAM on the host)
//! implements [`Eeprom`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  solarstation-core (SettingsStore)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  solarstation-hal (this crate - traits) │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  FlashEeprom  │       │   RamEeprom   │
//! │  (NorFlash)   │       │  (host/sim)   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Types
//!
//! - [`eeprom::Eeprom`] - begin/read/write/commit/end byte store
//! - [`eeprom::Session`] - scoped session that always ends on drop
//! - [`flash::FlashEeprom`] - EEPROM emulation over `embedded-storage` NOR flash
//! - [`ram::RamEeprom`] - in-memory store for host tests and simulation

#![no_std]
#![deny(unsafe_code)]

pub mod eeprom;
pub mod flash;
pub mod ram;

// Re-export key types at crate root for convenience
pub use eeprom::{Eeprom, EepromError, Session};
pub use flash::FlashEeprom;
pub use ram::RamEeprom;
