use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, queue, style, terminal};

use crate::chip8::{Chip8, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::Chip8Error;

// Most terminals only report presses, so a key counts as held for this long
// after its last press (or auto-repeat) event.
const KEY_HOLD: Duration = Duration::from_millis(150);

/// Maps the left-hand block of a QWERTY keyboard onto the hex keypad:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// Q W E R  ->  4 5 6 D
/// A S D F      7 8 9 E
/// Z X C V      A 0 B F
/// ```
pub fn keypad_index(code: KeyCode) -> Option<u8> {
    let KeyCode::Char(c) = code else {
        return None;
    };
    match c.to_ascii_lowercase() {
        '1' => Some(0x1),
        '2' => Some(0x2),
        '3' => Some(0x3),
        '4' => Some(0xC),
        'q' => Some(0x4),
        'w' => Some(0x5),
        'e' => Some(0x6),
        'r' => Some(0xD),
        'a' => Some(0x7),
        's' => Some(0x8),
        'd' => Some(0x9),
        'f' => Some(0xE),
        'z' => Some(0xA),
        'x' => Some(0x0),
        'c' => Some(0xB),
        'v' => Some(0xF),
        _ => None,
    }
}

/// Draws the framebuffer in the terminal and feeds key presses back into the
/// keypad. The terminal is restored when this is dropped.
pub struct Terminal {
    out: Stdout,
    last_press: [Option<Instant>; 16],
}

impl Terminal {
    pub fn new() -> Result<Self, Chip8Error> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )?;
        Ok(Terminal {
            out,
            last_press: [None; 16],
        })
    }

    /// Drains pending input events into `chip8`'s keypad.
    ///
    /// Returns `false` once the user asked to quit (Escape or Ctrl-C).
    pub fn poll_input(&mut self, chip8: &mut Chip8) -> Result<bool, Chip8Error> {
        let now = Instant::now();
        while event::poll(Duration::ZERO)? {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            else {
                continue;
            };
            if code == KeyCode::Esc
                || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
            {
                return Ok(false);
            }
            if let Some(index) = keypad_index(code) {
                self.last_press[index as usize] = match kind {
                    KeyEventKind::Release => None,
                    KeyEventKind::Press | KeyEventKind::Repeat => Some(now),
                };
            }
        }

        for (index, pressed_at) in self.last_press.iter_mut().enumerate() {
            if pressed_at.is_some_and(|t| now.duration_since(t) >= KEY_HOLD) {
                *pressed_at = None;
            }
            chip8.set_key(index as u8, pressed_at.is_some())?;
        }
        Ok(true)
    }

    /// Redraws the whole screen plus a status line.
    pub fn render(&mut self, chip8: &Chip8) -> Result<(), Chip8Error> {
        queue!(self.out, cursor::MoveTo(0, 0))?;
        for y in 0..DISPLAY_HEIGHT {
            let row: String = (0..DISPLAY_WIDTH)
                .map(|x| if chip8.pixel(x, y) { "\u{2588}\u{2588}" } else { "  " })
                .collect();
            queue!(self.out, style::Print(row), cursor::MoveToNextLine(1))?;
        }
        let status = format!(
            "PC {:03X}  I {:03X}  DT {:02X}  ST {:02X}  [Esc] quit",
            chip8.pc(),
            chip8.index(),
            chip8.delay_timer(),
            chip8.sound_timer()
        );
        queue!(
            self.out,
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(status)
        )?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
