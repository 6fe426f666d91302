//! EEPROM emulation on NOR flash
//!
//! Many parts (ESP8266, RP2040) have no true EEPROM, so a single
//! erase-aligned flash region is mirrored in RAM while a session is open.
//! Reads and writes touch only the RAM copy; a commit erases the region
//! and programs the whole copy back.
//!
//! Works with any blocking driver implementing
//! [`embedded_storage::nor_flash::NorFlash`].

use embedded_storage::nor_flash::{NorFlash, NorFlashError, NorFlashErrorKind};

use crate::eeprom::{Eeprom, EepromError};

/// Emulated EEPROM of `N` bytes at a fixed flash address
///
/// `N` must be a multiple of the flash erase size and `base` must be
/// erase-aligned.
pub struct FlashEeprom<F, const N: usize> {
    flash: F,
    base: u32,
    buffer: [u8; N],
    session: Option<usize>,
    dirty: bool,
}

impl<F: NorFlash, const N: usize> FlashEeprom<F, N> {
    /// Create an emulated EEPROM at `base`
    ///
    /// Fails with [`EepromError::Misaligned`] if the region does not cover
    /// whole erase sectors, or [`EepromError::TooLarge`] if it runs past the
    /// end of the flash.
    pub fn new(flash: F, base: u32) -> Result<Self, EepromError> {
        if base as usize % F::ERASE_SIZE != 0 || N % F::ERASE_SIZE != 0 {
            return Err(EepromError::Misaligned);
        }
        match (base as usize).checked_add(N) {
            Some(end) if end <= flash.capacity() => {}
            _ => return Err(EepromError::TooLarge),
        }

        Ok(Self {
            flash,
            base,
            buffer: [0; N],
            session: None,
            dirty: false,
        })
    }

    /// Give back the flash driver
    pub fn release(self) -> F {
        self.flash
    }

    /// Flash address of the region
    pub fn base(&self) -> u32 {
        self.base
    }

    fn range(&self, offset: usize, len: usize) -> Result<core::ops::Range<usize>, EepromError> {
        let size = self.session.ok_or(EepromError::NotStarted)?;
        match offset.checked_add(len) {
            Some(end) if end <= size => Ok(offset..end),
            _ => Err(EepromError::OutOfBounds),
        }
    }
}

impl<F: NorFlash, const N: usize> Eeprom for FlashEeprom<F, N> {
    fn capacity(&self) -> usize {
        N
    }

    fn begin(&mut self, size: usize) -> Result<(), EepromError> {
        if self.session.is_some() {
            return Err(EepromError::AlreadyStarted);
        }
        if size > N {
            return Err(EepromError::TooLarge);
        }

        self.flash
            .read(self.base, &mut self.buffer)
            .map_err(flash_error)?;
        self.session = Some(size);
        self.dirty = false;
        Ok(())
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), EepromError> {
        let range = self.range(offset, buffer.len())?;
        buffer.copy_from_slice(&self.buffer[range]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError> {
        let range = self.range(offset, data.len())?;
        self.buffer[range].copy_from_slice(data);
        self.dirty = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), EepromError> {
        if self.session.is_none() {
            return Err(EepromError::NotStarted);
        }
        if !self.dirty {
            return Ok(());
        }

        // Whole region is reprogrammed so bytes past the session survive
        let end = self.base + N as u32;
        self.flash.erase(self.base, end).map_err(flash_error)?;
        self.flash
            .write(self.base, &self.buffer)
            .map_err(flash_error)?;
        self.dirty = false;
        Ok(())
    }

    fn end(&mut self) {
        self.session = None;
        self.dirty = false;
    }
}

fn flash_error<E: NorFlashError>(e: E) -> EepromError {
    match e.kind() {
        NorFlashErrorKind::NotAligned => EepromError::Misaligned,
        NorFlashErrorKind::OutOfBounds => EepromError::OutOfBounds,
        _ => EepromError::Flash,
    }
}
