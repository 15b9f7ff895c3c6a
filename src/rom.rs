use std::fs;
use std::ops::Deref;
use std::path::Path;

use crate::chip8::MAX_ROM_BYTES;
use crate::error::Chip8Error;

/// A Chip-8 program image, as read from disk.
#[derive(Debug, Clone)]
pub struct Rom {
    code: Vec<u8>,
}

impl Rom {
    /// Returns a new Chip-8 ROM.
    ///
    /// This function returns Err if `code.len() > MAX_ROM_BYTES || code.is_empty()`.
    pub fn with_code(code: Vec<u8>) -> Result<Self, Chip8Error> {
        if code.is_empty() {
            return Err(Chip8Error::RomEmpty);
        }
        if code.len() > MAX_ROM_BYTES {
            return Err(Chip8Error::RomTooLarge {
                size: code.len(),
                max: MAX_ROM_BYTES,
            });
        }
        Ok(Rom { code })
    }

    /// Reads a raw ROM file. There is no header; the bytes are loaded verbatim.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Chip8Error> {
        let code = fs::read(path)?;
        Self::with_code(code)
    }
}

impl Deref for Rom {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.code
    }
}
