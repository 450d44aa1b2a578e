use crate::keypad::{Keypad, CHIP8_KEY_COUNT};
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::warn;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

/// map the left-hand side of a qwerty keyboard onto the COSMAC VIP hex
/// keypad layout
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00), // x
    ('1', 0x01), // 1
    ('2', 0x02), // 2
    ('3', 0x03), // 3
    ('q', 0x04), // q
    ('w', 0x05), // w
    ('e', 0x06), // e
    ('a', 0x07), // a
    ('s', 0x08), // s
    ('d', 0x09), // d
    ('z', 0x0a), // z
    ('c', 0x0b), // c
    ('4', 0x0c), // 4
    ('r', 0x0d), // r
    ('f', 0x0e), // f
    ('v', 0x0f), // v
];

/// what the emulator should do after reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// reads keypresses
pub trait Input {
    /// bring the keypad up to date with whatever the user has done since the
    /// last call
    fn update(&mut self, keypad: &mut Keypad) -> Result<Control, io::Error>;
}

/// Terminal keyboard input, using crossterm. Terminals report presses (and
/// auto-repeats) but never releases, so a press holds its key down for a
/// number of updates and then lets go.
pub struct StdinInput {
    keymap: HashMap<char, u8>,
    hold_frames: u32,
    held: [u32; CHIP8_KEY_COUNT],
}

impl StdinInput {
    pub fn new(hold_frames: u32) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            hold_frames,
            held: [0; CHIP8_KEY_COUNT],
        })
    }

    fn press(&mut self, key: char) {
        match self.keymap.get(&key.to_ascii_lowercase()) {
            Some(&mapped_key) => self.held[mapped_key as usize] = self.hold_frames,
            None => warn!("can't map {:?} to a COSMAC key", key),
        }
    }

    fn read_stdin(&mut self) -> Result<Control, io::Error> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                match evt.code {
                    KeyCode::Esc => return Ok(Control::Quit),
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(Control::Quit)
                    }
                    KeyCode::Char(key) => self.press(key),
                    other => warn!("ignoring key {:?}", other),
                }
            }
        }
        Ok(Control::Continue)
    }

    fn age(&mut self, keypad: &mut Keypad) {
        for (key, frames) in self.held.iter_mut().enumerate() {
            keypad.set(key as u8, *frames > 0);
            *frames = frames.saturating_sub(1);
        }
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for StdinInput {
    fn update(&mut self, keypad: &mut Keypad) -> Result<Control, io::Error> {
        let control = self.read_stdin()?;
        self.age(keypad);
        Ok(control)
    }
}

/// dummy Input implementation for testing: holds the given keys down, and
/// optionally asks to quit after a number of updates
pub struct DummyInput {
    keys: Vec<u8>,
    updates: usize,
    quit_after: Option<usize>,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        DummyInput {
            keys: Vec::from(keys),
            updates: 0,
            quit_after: None,
        }
    }

    pub fn quit_after(mut self, updates: usize) -> Self {
        self.quit_after = Some(updates);
        self
    }
}

impl Input for DummyInput {
    fn update(&mut self, keypad: &mut Keypad) -> Result<Control, io::Error> {
        if self.quit_after == Some(self.updates) {
            return Ok(Control::Quit);
        }
        self.updates += 1;
        keypad.release_all();
        for &key in &self.keys {
            keypad.press(key);
        }
        Ok(Control::Continue)
    }
}
