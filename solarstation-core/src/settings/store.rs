//! Settings persistence
//!
//! Loads the settings record from the byte store at startup and saves it
//! back on request. A missing or corrupt image is replaced by defaults,
//! which are written back immediately so the medium is valid afterwards.

use solarstation_hal::{Eeprom, EepromError, Session};

use super::layout::{LayoutError, SETTINGS_SIZE};
use super::types::Settings;

/// Byte offset of the settings image on the medium
pub const SETTINGS_OFFSET: usize = 0;

/// Session length covering the whole image
const SESSION_SIZE: usize = SETTINGS_OFFSET + SETTINGS_SIZE;

/// Why a stored image was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidReason {
    /// The medium could not be read
    Storage(EepromError),
    /// The image did not decode
    Layout(LayoutError),
}

impl From<EepromError> for InvalidReason {
    fn from(e: EepromError) -> Self {
        InvalidReason::Storage(e)
    }
}

impl From<LayoutError> for InvalidReason {
    fn from(e: LayoutError) -> Self {
        InvalidReason::Layout(e)
    }
}

/// Which branch a load took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadOutcome {
    /// Stored settings were valid and are now in memory
    Restored,
    /// Stored settings were rejected; defaults were applied and saved
    Defaulted(InvalidReason),
}

impl LoadOutcome {
    /// Whether stored settings were kept
    pub fn is_restored(&self) -> bool {
        matches!(self, LoadOutcome::Restored)
    }
}

/// Owner of the device settings and the medium they live on
///
/// A store only exists after a load, so the record it exposes is always
/// either what was stored or the complete default set. Every operation
/// opens and ends its own storage session.
pub struct SettingsStore<E: Eeprom> {
    storage: E,
    settings: Settings,
}

impl<E: Eeprom> SettingsStore<E> {
    /// Load settings from `storage`
    ///
    /// Never fails: unreadable or invalid content is replaced by defaults,
    /// which are persisted before returning.
    pub fn load(storage: E) -> Self {
        Self::open(storage).0
    }

    /// Load settings from `storage`, also reporting which branch ran
    pub fn open(storage: E) -> (Self, LoadOutcome) {
        let mut store = Self {
            storage,
            settings: Settings::default(),
        };
        let outcome = store.reload();
        (store, outcome)
    }

    /// Re-read settings from the medium, discarding in-memory changes
    pub fn reload(&mut self) -> LoadOutcome {
        match read_settings(&mut self.storage) {
            Ok(settings) => {
                info!("Loaded settings from storage");
                debug!(
                    "  poll interval {}s, MQTT port {}, eco mode {}",
                    settings.poll_interval_s,
                    settings.mqtt_port,
                    settings.eco_mode
                );
                self.settings = settings;
                LoadOutcome::Restored
            }
            Err(reason) => {
                warn!("Stored settings rejected: {:?}, using defaults", reason);
                self.settings = Settings::default();
                self.save();
                LoadOutcome::Defaulted(reason)
            }
        }
    }

    /// Write the in-memory settings to the medium
    ///
    /// Failures are logged and otherwise ignored; use
    /// [`SettingsStore::try_save`] to observe them.
    pub fn save(&mut self) {
        if let Err(e) = self.try_save() {
            warn!("Failed to save settings: {:?}", e);
        }
    }

    /// Write the in-memory settings to the medium and commit
    pub fn try_save(&mut self) -> Result<(), EepromError> {
        let mut image = [0u8; SETTINGS_SIZE];
        self.settings.encode(&mut image);

        let mut session = Session::open(&mut self.storage, SESSION_SIZE)?;
        session.write(SETTINGS_OFFSET, &image)?;
        session.commit()?;

        debug!("Saved {} bytes of settings", SETTINGS_SIZE);
        Ok(())
    }

    /// Factory reset: apply defaults and save them
    pub fn reset(&mut self) {
        info!("Restoring default settings");
        self.settings = Settings::default();
        self.save();
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable access for the application; call [`SettingsStore::save`]
    /// to persist changes
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Underlying medium
    pub fn storage(&self) -> &E {
        &self.storage
    }

    /// Mutable access to the medium; writes bypass the in-memory settings
    pub fn storage_mut(&mut self) -> &mut E {
        &mut self.storage
    }

    /// Consume the store and return the underlying medium
    pub fn into_storage(self) -> E {
        self.storage
    }
}

fn read_settings<E: Eeprom>(storage: &mut E) -> Result<Settings, InvalidReason> {
    let mut image = [0u8; SETTINGS_SIZE];
    {
        let mut session = Session::open(storage, SESSION_SIZE)?;
        session.read(SETTINGS_OFFSET, &mut image)?;
    }

    Ok(Settings::decode(&image)?)
}
