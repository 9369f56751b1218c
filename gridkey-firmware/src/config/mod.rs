//! Keymap persistence
//!
//! Saves and loads the keymap through the `FlashStorage` trait. Two
//! records are written on every save: the keymap itself (the editable
//! model) and its flattened export (the record the keyboard firmware
//! reads). Loading only ever needs the keymap record.

use defmt::*;

use gridkey_core::keymap::Keymap;
use gridkey_hal::{FlashError, FlashStorage, StorageKey};

/// Largest serialized keymap: every cell assigned an 8-byte label
const MAX_KEYMAP_SIZE: usize = 1536;

/// Largest serialized export, position labels included
const MAX_EXPORT_SIZE: usize = 2048;

/// Keymap persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash operation failed
    Flash(FlashError),
    /// Deserialization failed
    Deserialize,
    /// Serialization failed
    Serialize,
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

/// Keymap persistence manager
pub struct ConfigPersistence<F> {
    storage: F,
}

impl<F: FlashStorage> ConfigPersistence<F> {
    pub fn new(storage: F) -> Self {
        Self { storage }
    }

    /// Load the keymap from flash
    pub async fn load(&mut self) -> Result<Keymap, ConfigError> {
        let mut buffer = [0u8; MAX_KEYMAP_SIZE];
        let len = self.storage.read(StorageKey::Keymap, &mut buffer).await?;

        debug!("Read {} bytes of keymap from flash", len);

        let keymap = Keymap::from_bytes(&buffer[..len]).map_err(|_| ConfigError::Deserialize)?;
        info!("Loaded keymap: {} assignments", keymap.assigned_count());
        Ok(keymap)
    }

    /// Save the keymap and its firmware-facing export
    ///
    /// The export is derived and written second; if that write fails the
    /// keymap record is already durable and a later save can repair the
    /// export.
    pub async fn save(&mut self, keymap: &Keymap) -> Result<(), ConfigError> {
        let mut buffer = [0u8; MAX_KEYMAP_SIZE];
        let bytes = keymap
            .to_bytes(&mut buffer)
            .map_err(|_| ConfigError::Serialize)?;
        self.storage.write(StorageKey::Keymap, bytes).await?;

        let mut export_buffer = [0u8; MAX_EXPORT_SIZE];
        let export = keymap.export();
        let export_bytes = export
            .to_bytes(&mut export_buffer)
            .map_err(|_| ConfigError::Serialize)?;
        self.storage
            .write(StorageKey::KeymapExport, export_bytes)
            .await?;

        info!("Saved keymap: {} assignments", keymap.assigned_count());
        Ok(())
    }
}
