//! A CHIP-8 interpreter.
//!
//! [`Chip8`] holds the whole machine and executes one instruction per
//! [`Chip8::cycle`]. Loading ROM files, presentation and input live outside
//! the core: see [`rom`] and [`term`].

pub mod chip8;
pub mod config;
pub mod error;
mod font;
pub mod instr;
pub mod rom;
pub mod term;

pub use crate::chip8::Chip8;
pub use crate::config::{AddFlag, Config};
pub use crate::error::Chip8Error;
pub use crate::rom::Rom;
