//! RAM-backed byte store
//!
//! Behaves like an emulated EEPROM: a session copies the cells into a
//! staging buffer and only [`Eeprom::commit`] copies them back. Used for
//! host-side tests and simulation, where the "medium" can be seeded and
//! inspected directly.

use crate::eeprom::{Eeprom, EepromError};

/// Value of an erased cell
pub const ERASED: u8 = 0xFF;

/// In-memory byte store of `N` bytes
#[derive(Debug, Clone)]
pub struct RamEeprom<const N: usize> {
    cells: [u8; N],
    staging: [u8; N],
    session: Option<usize>,
    dirty: bool,
    commits: usize,
}

impl<const N: usize> Default for RamEeprom<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RamEeprom<N> {
    /// Create an erased store (all cells `0xFF`)
    pub const fn new() -> Self {
        Self::from_bytes([ERASED; N])
    }

    /// Create a store with all cells zero
    pub const fn zeroed() -> Self {
        Self::from_bytes([0; N])
    }

    /// Create a store with the given contents
    pub const fn from_bytes(cells: [u8; N]) -> Self {
        Self {
            cells,
            staging: [0; N],
            session: None,
            dirty: false,
            commits: 0,
        }
    }

    /// Durable contents
    pub fn raw(&self) -> &[u8; N] {
        &self.cells
    }

    /// Mutable access to the durable contents, bypassing sessions
    pub fn raw_mut(&mut self) -> &mut [u8; N] {
        &mut self.cells
    }

    /// Overwrite every durable cell with `byte`
    pub fn fill(&mut self, byte: u8) {
        self.cells.fill(byte);
    }

    /// Number of commits that reached the cells
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    /// Whether a session is currently open
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    fn range(&self, offset: usize, len: usize) -> Result<core::ops::Range<usize>, EepromError> {
        let size = self.session.ok_or(EepromError::NotStarted)?;
        match offset.checked_add(len) {
            Some(end) if end <= size => Ok(offset..end),
            _ => Err(EepromError::OutOfBounds),
        }
    }
}

impl<const N: usize> Eeprom for RamEeprom<N> {
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

        self.staging[..size].copy_from_slice(&self.cells[..size]);
        self.session = Some(size);
        self.dirty = false;
        Ok(())
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), EepromError> {
        let range = self.range(offset, buffer.len())?;
        buffer.copy_from_slice(&self.staging[range]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError> {
        let range = self.range(offset, data.len())?;
        self.staging[range].copy_from_slice(data);
        self.dirty = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), EepromError> {
        let size = self.session.ok_or(EepromError::NotStarted)?;
        if self.dirty {
            self.cells[..size].copy_from_slice(&self.staging[..size]);
            self.dirty = false;
            self.commits += 1;
        }
        Ok(())
    }

    fn end(&mut self) {
        self.session = None;
        self.dirty = false;
    }
}
