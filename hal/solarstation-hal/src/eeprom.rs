//! Non-volatile byte store abstraction
//!
//! Models the classic EEPROM access pattern used by small microcontrollers:
//! open a session over the first `size` bytes, read and write inside it,
//! commit to make the writes durable, then end the session.

/// Errors from byte store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError {
    /// Access outside the open session range
    OutOfBounds,
    /// Operation requires an open session
    NotStarted,
    /// A session is already open
    AlreadyStarted,
    /// Requested session is larger than the medium
    TooLarge,
    /// Region is not aligned to the medium's erase or write granularity
    Misaligned,
    /// The underlying driver reported a failure
    Flash,
}

/// Byte-addressable non-volatile storage
///
/// Writes are staged until [`Eeprom::commit`]. Ending a session without
/// committing discards staged writes.
pub trait Eeprom {
    /// Total number of addressable bytes
    fn capacity(&self) -> usize;

    /// Open a session over bytes `0..size`
    fn begin(&mut self, size: usize) -> Result<(), EepromError>;

    /// Read `buffer.len()` bytes starting at `offset`
    ///
    /// # Arguments
    /// * `offset` - Byte offset inside the session
    /// * `buffer` - Buffer to read data into
    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), EepromError>;

    /// Stage `data` at `offset`
    ///
    /// # Arguments
    /// * `offset` - Byte offset inside the session
    /// * `data` - Data to write
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError>;

    /// Make all staged writes durable
    fn commit(&mut self) -> Result<(), EepromError>;

    /// Close the session
    fn end(&mut self);
}

impl<E: Eeprom + ?Sized> Eeprom for &mut E {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn begin(&mut self, size: usize) -> Result<(), EepromError> {
        (**self).begin(size)
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), EepromError> {
        (**self).read(offset, buffer)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError> {
        (**self).write(offset, data)
    }

    fn commit(&mut self) -> Result<(), EepromError> {
        (**self).commit()
    }

    fn end(&mut self) {
        (**self).end()
    }
}

/// An open storage session
///
/// The session is ended when this value is dropped, including on early
/// return through `?`, so a session is never held across calls.
pub struct Session<'a, E: Eeprom + ?Sized> {
    eeprom: &'a mut E,
    size: usize,
}

impl<'a, E: Eeprom + ?Sized> Session<'a, E> {
    /// Begin a session of `size` bytes
    pub fn open(eeprom: &'a mut E, size: usize) -> Result<Self, EepromError> {
        eeprom.begin(size)?;
        Ok(Self { eeprom, size })
    }

    /// Session length in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Read bytes at `offset` within the session
    pub fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), EepromError> {
        self.check_range(offset, buffer.len())?;
        self.eeprom.read(offset, buffer)
    }

    /// Stage bytes at `offset` within the session
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError> {
        self.check_range(offset, data.len())?;
        self.eeprom.write(offset, data)
    }

    /// Commit staged writes
    pub fn commit(&mut self) -> Result<(), EepromError> {
        self.eeprom.commit()
    }

    fn check_range(&self, offset: usize, len: usize) -> Result<(), EepromError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.size => Ok(()),
            _ => Err(EepromError::OutOfBounds),
        }
    }
}

impl<E: Eeprom + ?Sized> Drop for Session<'_, E> {
    fn drop(&mut self) {
        self.eeprom.end();
    }
}
