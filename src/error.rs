use std::io;

use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("ROM size incorrect. Max size is {max} bytes but {size} bytes were provided")]
    RomTooLarge { size: usize, max: usize },

    #[error("ROM is empty")]
    RomEmpty,

    #[error("error reading Chip-8 ROM: {0}")]
    Io(#[from] io::Error),

    #[error("program counter {0:#05X} is past the end of memory")]
    PcOutOfBounds(u16),

    #[error("access of {len} bytes at {addr:#05X} is past the end of memory")]
    MemoryOutOfBounds { addr: usize, len: usize },

    #[error("call stack overflow")]
    StackOverflow,

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("invalid key index {0:#04X}")]
    InvalidKey(u8),
}
