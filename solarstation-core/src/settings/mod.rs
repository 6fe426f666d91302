//! Device settings
//!
//! The record type, its fixed on-medium layout, and the store that loads
//! and saves it.

pub mod layout;
pub mod store;
pub mod types;

pub use layout::{LayoutError, SETTINGS_SIZE};
pub use store::{InvalidReason, LoadOutcome, SettingsStore, SETTINGS_OFFSET};
pub use types::*;
