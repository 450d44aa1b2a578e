/// number of keys on the COSMAC VIP hex keypad
pub const CHIP8_KEY_COUNT: usize = 16;

/// Current up/down state of the 16 hex keys. Written by whatever handles
/// input; the interpreter only ever reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    down: [bool; CHIP8_KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// key is the low nibble of `key`
    pub fn press(&mut self, key: u8) {
        self.down[(key & 0x0f) as usize] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.down[(key & 0x0f) as usize] = false;
    }

    pub fn set(&mut self, key: u8, down: bool) {
        self.down[(key & 0x0f) as usize] = down;
    }

    pub fn release_all(&mut self) {
        self.down = [false; CHIP8_KEY_COUNT];
    }

    pub fn is_down(&self, key: u8) -> bool {
        self.down[(key & 0x0f) as usize]
    }

    /// lowest-numbered key held down among 0x0..=0xe
    pub fn first_down(&self) -> Option<u8> {
        (0x0..0xf).find(|&k| self.down[k as usize])
    }
}
