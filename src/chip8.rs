use std::ops::Range;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{AddFlag, Config};
use crate::error::Chip8Error;
use crate::font::{FONTSET, FONT_OFFSET, GLYPH_BYTES, KEY_LABELS};
use crate::instr::Instr;

// Number of bytes in the Chip8's memory.
pub const MEM_BYTES: usize = 4096;
// Where programs are loaded, and where execution starts.
pub const ROM_OFFSET: usize = 0x200;
// Maximum allowed bytes of a user's ROM.
pub const MAX_ROM_BYTES: usize = MEM_BYTES - ROM_OFFSET;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
pub const DISPLAY_PIXELS: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

const STACK_DEPTH: usize = 16;
// Flag register.
const VF: usize = 0x0F;

/// One byte per pixel, 0 or 1, row-major.
pub type Framebuffer = [u8; DISPLAY_PIXELS];

/// One slot of the hex keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    label: char,
    pressed: bool,
}

impl Key {
    pub fn label(&self) -> char {
        self.label
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

/// A Chip8 interpreter.
///
/// The host owns the machine and drives it: [`Chip8::cycle`] at whatever
/// instruction rate it likes, [`Chip8::tick_timers`] at 60 Hz, and
/// [`Chip8::set_key`] as input arrives. The framebuffer is read back through
/// [`Chip8::display`] for presentation.
#[derive(Debug, Clone)]
pub struct Chip8 {
    memory: [u8; MEM_BYTES],
    registers: [u8; 16],
    stack: [u16; STACK_DEPTH],
    pc: u16,
    index: u16,
    dt: u8,
    st: u8,
    sp: u8,
    display: Framebuffer,
    keypad: [Key; 16],
    add_flag: AddFlag,
    rng: StdRng,
}

impl Chip8 {
    /// Returns a new Chip8 interpreter with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut chip8 = Chip8 {
            memory: [0; MEM_BYTES],
            registers: [0; 16],
            stack: [0; STACK_DEPTH],
            pc: 0,
            index: 0,
            dt: 0,
            st: 0,
            sp: 0,
            display: [0; DISPLAY_PIXELS],
            keypad: [Key { label: ' ', pressed: false }; 16],
            add_flag: config.add_flag,
            rng,
        };
        chip8.reset();
        chip8
    }

    /// Puts the machine back into its power-on state: everything zeroed, the
    /// font in place and the PC at the start of program space. Any loaded
    /// program is discarded.
    pub fn reset(&mut self) {
        self.memory.fill(0);
        self.registers.fill(0);
        self.stack.fill(0);
        self.index = 0;
        self.dt = 0;
        self.st = 0;
        self.sp = 0;
        self.display.fill(0);

        self.memory[FONT_OFFSET..FONT_OFFSET + FONTSET.len()].copy_from_slice(&FONTSET);
        self.pc = ROM_OFFSET as u16;
        for (key, label) in self.keypad.iter_mut().zip(KEY_LABELS) {
            *key = Key { label, pressed: false };
        }
        debug!("machine reset");
    }

    /// Loads the provided bytes into program space.
    ///
    /// Fails without touching memory if `code` does not fit.
    pub fn load(&mut self, code: &[u8]) -> Result<(), Chip8Error> {
        if code.len() > MAX_ROM_BYTES {
            return Err(Chip8Error::RomTooLarge {
                size: code.len(),
                max: MAX_ROM_BYTES,
            });
        }
        self.memory[ROM_OFFSET..ROM_OFFSET + code.len()].copy_from_slice(code);
        info!("loaded {} byte program at {:#05X}", code.len(), ROM_OFFSET);
        Ok(())
    }

    /// Runs `cycles` instructions, stopping at the first fault.
    pub fn run(&mut self, cycles: usize) -> Result<(), Chip8Error> {
        for _ in 0..cycles {
            self.cycle()?;
        }
        Ok(())
    }

    /// Fetches, decodes and executes one instruction.
    ///
    /// The PC moves past the instruction before it executes, so jumps, calls
    /// and skips adjust that default. A faulting instruction leaves the
    /// machine exactly as it was before the cycle.
    pub fn cycle(&mut self) -> Result<(), Chip8Error> {
        let pc = self.pc;
        let opcode = self.fetch()?;
        let instr = Instr::decode(opcode);
        trace!("{pc:#05X}: {opcode:04X} {instr:?}");

        self.pc += 2;
        if let Err(e) = self.execute(instr) {
            self.pc = pc;
            return Err(e);
        }
        Ok(())
    }

    /// Counts both timers down by one, stopping at zero.
    pub fn tick_timers(&mut self) {
        self.dt = self.dt.saturating_sub(1);
        self.st = self.st.saturating_sub(1);
    }

    /// Marks key `index` (0x0..=0xF) as pressed or released.
    pub fn set_key(&mut self, index: u8, pressed: bool) -> Result<(), Chip8Error> {
        let key = self
            .keypad
            .get_mut(index as usize)
            .ok_or(Chip8Error::InvalidKey(index))?;
        key.pressed = pressed;
        Ok(())
    }

    pub fn display(&self) -> &Framebuffer {
        &self.display
    }

    /// Whether the pixel at (`x`, `y`) is lit. Out-of-range coordinates are never lit.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT && self.display[y * DISPLAY_WIDTH + x] == 1
    }

    pub fn memory(&self) -> &[u8; MEM_BYTES] {
        &self.memory
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.registers
    }

    pub fn stack(&self) -> &[u16; STACK_DEPTH] {
        &self.stack
    }

    pub fn keypad(&self) -> &[Key; 16] {
        &self.keypad
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    pub fn delay_timer(&self) -> u8 {
        self.dt
    }

    pub fn sound_timer(&self) -> u8 {
        self.st
    }

    // Reads the big-endian opcode at the PC.
    fn fetch(&self) -> Result<u16, Chip8Error> {
        let pc = self.pc as usize;
        if pc + 1 >= MEM_BYTES {
            return Err(Chip8Error::PcOutOfBounds(self.pc));
        }
        Ok(u16::from_be_bytes([self.memory[pc], self.memory[pc + 1]]))
    }

    // The `len` bytes of memory starting at I, if they all exist.
    fn index_range(&self, len: usize) -> Result<Range<usize>, Chip8Error> {
        let addr = self.index as usize;
        if addr + len > MEM_BYTES {
            return Err(Chip8Error::MemoryOutOfBounds { addr, len });
        }
        Ok(addr..addr + len)
    }

    fn key(&self, index: u8) -> Result<&Key, Chip8Error> {
        self.keypad
            .get(index as usize)
            .ok_or(Chip8Error::InvalidKey(index))
    }

    // Every arm checks what can fail before it writes anything.
    fn execute(&mut self, instr: Instr) -> Result<(), Chip8Error> {
        match instr {
            Instr::Cls => {
                self.display.fill(0);
            }

            Instr::Ret => {
                if self.sp == 0 {
                    return Err(Chip8Error::StackUnderflow);
                }
                self.pc = self.stack[self.sp as usize];
                self.sp -= 1;
            }

            Instr::Sys(addr) => {
                debug!("ignoring SYS {addr:#05X}");
            }

            Instr::Jump(addr) => {
                self.pc = addr;
            }

            // slot 0 is never written; sp counts frames in use
            Instr::Call(addr) => {
                if self.sp as usize >= STACK_DEPTH - 1 {
                    return Err(Chip8Error::StackOverflow);
                }
                self.sp += 1;
                self.stack[self.sp as usize] = self.pc;
                self.pc = addr;
            }

            Instr::SkipEqImm { x, kk } => {
                if self.registers[x] == kk {
                    self.pc += 2;
                }
            }

            Instr::SkipNeImm { x, kk } => {
                if self.registers[x] != kk {
                    self.pc += 2;
                }
            }

            Instr::SkipEqReg { x, y } => {
                if self.registers[x] == self.registers[y] {
                    self.pc += 2;
                }
            }

            Instr::LoadImm { x, kk } => {
                self.registers[x] = kk;
            }

            // no carry flag
            Instr::AddImm { x, kk } => {
                self.registers[x] = self.registers[x].wrapping_add(kk);
            }

            Instr::Move { x, y } => {
                self.registers[x] = self.registers[y];
            }

            Instr::Or { x, y } => {
                self.registers[x] |= self.registers[y];
            }

            Instr::And { x, y } => {
                self.registers[x] &= self.registers[y];
            }

            Instr::Xor { x, y } => {
                self.registers[x] ^= self.registers[y];
            }

            // In the ALU ops below VF is written before Vx, so when x is F
            // the result wins over the flag.
            Instr::Add { x, y } => {
                let (sum, carried) = self.registers[x].overflowing_add(self.registers[y]);
                self.registers[VF] = match self.add_flag {
                    AddFlag::Carry => carried as u8,
                    AddFlag::AlwaysSet => 1,
                };
                self.registers[x] = sum;
            }

            Instr::Sub { x, y } => {
                let (vx, vy) = (self.registers[x], self.registers[y]);
                self.registers[VF] = (vx > vy) as u8;
                self.registers[x] = vx.wrapping_sub(vy);
            }

            Instr::Shr { x } => {
                let vx = self.registers[x];
                self.registers[VF] = vx & 0x01;
                self.registers[x] = vx >> 1;
            }

            Instr::SubN { x, y } => {
                let (vx, vy) = (self.registers[x], self.registers[y]);
                self.registers[VF] = (vy > vx) as u8;
                self.registers[x] = vy.wrapping_sub(vx);
            }

            Instr::Shl { x } => {
                let vx = self.registers[x];
                self.registers[VF] = vx >> 7;
                self.registers[x] = vx << 1;
            }

            Instr::SkipNeReg { x, y } => {
                if self.registers[x] != self.registers[y] {
                    self.pc += 2;
                }
            }

            Instr::LoadIndex(addr) => {
                self.index = addr;
            }

            Instr::JumpV0(addr) => {
                self.pc = addr + self.registers[0x00] as u16;
            }

            Instr::Rand { x, kk } => {
                let r: u8 = self.rng.gen();
                self.registers[x] = r & kk;
            }

            Instr::Draw { x, y, n } => self.draw(x, y, n)?,

            Instr::SkipKey { x } => {
                if self.key(self.registers[x])?.pressed {
                    self.pc += 2;
                }
            }

            Instr::SkipNotKey { x } => {
                if !self.key(self.registers[x])?.pressed {
                    self.pc += 2;
                }
            }

            Instr::LoadDelay { x } => {
                self.registers[x] = self.dt;
            }

            // Re-run this instruction until something is pressed. Lowest key wins.
            Instr::WaitKey { x } => match self.keypad.iter().position(Key::is_pressed) {
                Some(key) => self.registers[x] = key as u8,
                None => self.pc -= 2,
            },

            Instr::SetDelay { x } => {
                self.dt = self.registers[x];
            }

            Instr::SetSound { x } => {
                self.st = self.registers[x];
            }

            Instr::AddIndex { x } => {
                self.index = self.index.wrapping_add(self.registers[x] as u16);
            }

            Instr::Glyph { x } => {
                let digit = (self.registers[x] & 0x0F) as usize;
                self.index = (FONT_OFFSET + digit * GLYPH_BYTES) as u16;
            }

            Instr::Bcd { x } => {
                let range = self.index_range(3)?;
                let val = self.registers[x];
                self.memory[range].copy_from_slice(&[val / 100, val / 10 % 10, val % 10]);
            }

            Instr::StoreRegs { x } => {
                let range = self.index_range(x + 1)?;
                self.memory[range].copy_from_slice(&self.registers[..=x]);
            }

            Instr::LoadRegs { x } => {
                let range = self.index_range(x + 1)?;
                self.registers[..=x].copy_from_slice(&self.memory[range]);
            }

            Instr::Unknown(opcode) => {
                debug!("ignoring unknown opcode {opcode:04X}");
            }
        }
        Ok(())
    }

    // Dxyn: XOR an 8-pixel-wide, n-row sprite from memory[I..] onto the
    // screen. The origin wraps, the sprite itself is clipped at the edges.
    fn draw(&mut self, x: usize, y: usize, n: u8) -> Result<(), Chip8Error> {
        let sprite = self.index_range(n as usize)?;
        let x_pos = self.registers[x] as usize % DISPLAY_WIDTH;
        let y_pos = self.registers[y] as usize % DISPLAY_HEIGHT;

        self.registers[VF] = 0;

        for (row, addr) in sprite.enumerate() {
            let screen_y = y_pos + row;
            if screen_y >= DISPLAY_HEIGHT {
                break;
            }
            let sprite_byte = self.memory[addr];
            for col in 0..8 {
                if sprite_byte & (0x80 >> col) == 0 {
                    continue;
                }
                let screen_x = x_pos + col;
                if screen_x >= DISPLAY_WIDTH {
                    break;
                }
                let pixel = &mut self.display[screen_y * DISPLAY_WIDTH + screen_x];
                if *pixel == 1 {
                    self.registers[VF] = 1;
                }
                *pixel ^= 1;
            }
        }
        Ok(())
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
