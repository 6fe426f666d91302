//! FlashEeprom against a simulated NOR flash

use embedded_storage::nor_flash::{ErrorType, NorFlash, NorFlashErrorKind, ReadNorFlash};
use solarstation_hal::{Eeprom, EepromError, FlashEeprom, Session};

const SECTOR: usize = 256;
const SECTORS: usize = 4;

/// NOR flash model: erase sets bytes to 0xFF, programming can only clear bits
struct MockFlash {
    mem: [u8; SECTOR * SECTORS],
    erases: usize,
    writes: usize,
}

impl MockFlash {
    fn new() -> Self {
        Self {
            mem: [0xFF; SECTOR * SECTORS],
            erases: 0,
            writes: 0,
        }
    }
}

impl ErrorType for MockFlash {
    type Error = NorFlashErrorKind;
}

impl ReadNorFlash for MockFlash {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        let end = start + bytes.len();
        if end > self.mem.len() {
            return Err(NorFlashErrorKind::OutOfBounds);
        }
        bytes.copy_from_slice(&self.mem[start..end]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.mem.len()
    }
}

impl NorFlash for MockFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = SECTOR;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        let (from, to) = (from as usize, to as usize);
        if from % SECTOR != 0 || to % SECTOR != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }
        if to > self.mem.len() {
            return Err(NorFlashErrorKind::OutOfBounds);
        }
        self.mem[from..to].fill(0xFF);
        self.erases += 1;
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        if start % Self::WRITE_SIZE != 0 || bytes.len() % Self::WRITE_SIZE != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }
        if start + bytes.len() > self.mem.len() {
            return Err(NorFlashErrorKind::OutOfBounds);
        }
        for (cell, byte) in self.mem[start..].iter_mut().zip(bytes) {
            *cell &= *byte;
        }
        self.writes += 1;
        Ok(())
    }
}

#[test]
fn test_rejects_misaligned_region() {
    let result = FlashEeprom::<_, 256>::new(MockFlash::new(), 100);
    assert!(matches!(result, Err(EepromError::Misaligned)));

    let result = FlashEeprom::<_, 300>::new(MockFlash::new(), 0);
    assert!(matches!(result, Err(EepromError::Misaligned)));
}

#[test]
fn test_rejects_region_past_end() {
    let result = FlashEeprom::<_, 512>::new(MockFlash::new(), (SECTOR * 3) as u32);
    assert!(matches!(result, Err(EepromError::TooLarge)));
}

#[test]
fn test_fresh_flash_reads_erased() {
    let mut eeprom = FlashEeprom::<_, 256>::new(MockFlash::new(), SECTOR as u32).unwrap();
    let mut session = Session::open(&mut eeprom, 16).unwrap();

    let mut buffer = [0u8; 16];
    session.read(0, &mut buffer).unwrap();
    assert_eq!(buffer, [0xFF; 16]);
}

#[test]
fn test_commit_reprograms_region() {
    let mut eeprom = FlashEeprom::<_, 256>::new(MockFlash::new(), SECTOR as u32).unwrap();

    for value in [0x0Fu8, 0xF0] {
        let mut session = Session::open(&mut eeprom, 8).unwrap();
        session.write(2, &[value; 4]).unwrap();
        session.commit().unwrap();
    }

    // Second value only reads back correctly if the sector was erased first
    let mut session = Session::open(&mut eeprom, 8).unwrap();
    let mut buffer = [0u8; 4];
    session.read(2, &mut buffer).unwrap();
    assert_eq!(buffer, [0xF0; 4]);
    drop(session);

    let flash = eeprom.release();
    assert_eq!(flash.erases, 2);
    assert_eq!(flash.writes, 2);
    assert_eq!(&flash.mem[SECTOR + 2..SECTOR + 6], &[0xF0; 4]);
    // Neighbouring sectors are untouched
    assert!(flash.mem[..SECTOR].iter().all(|&b| b == 0xFF));
}

#[test]
fn test_clean_commit_does_not_touch_flash() {
    let mut eeprom = FlashEeprom::<_, 256>::new(MockFlash::new(), 0).unwrap();
    {
        let mut session = Session::open(&mut eeprom, 8).unwrap();
        session.commit().unwrap();
    }
    let flash = eeprom.release();
    assert_eq!(flash.erases, 0);
    assert_eq!(flash.writes, 0);
}

#[test]
fn test_end_discards_uncommitted() {
    let mut eeprom = FlashEeprom::<_, 256>::new(MockFlash::new(), 0).unwrap();
    eeprom.begin(8).unwrap();
    eeprom.write(0, &[0; 8]).unwrap();
    eeprom.end();

    eeprom.begin(8).unwrap();
    let mut buffer = [0u8; 8];
    eeprom.read(0, &mut buffer).unwrap();
    assert_eq!(buffer, [0xFF; 8]);
}
