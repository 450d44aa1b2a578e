use crate::error::Fault;
use std::ops::Range;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the addressable memory. Every access is bounds-checked; going
/// past the end of RAM is a fault, never a wrap-around.
pub trait MemoryMap {
    /// write a chunk of bytes into RAM
    fn write(&mut self, data: &[u8], addr: u16) -> Result<(), Fault> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// get a big-endian two-byte word (instructions)
    fn get_word(&self, addr: u16) -> Result<u16, Fault> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    fn get_byte(&self, addr: u16) -> Result<u8, Fault> {
        Ok(self.get_ro_slice(addr, 1)?[0])
    }

    fn set_byte(&mut self, addr: u16, value: u8) -> Result<(), Fault> {
        self.get_rw_slice(addr, 1)?[0] = value;
        Ok(())
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Fault>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Fault>;
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// where the hex digit glyphs live, and how many bytes each takes
pub const CHIP8_FONT_ADDR: u16 = 0x050;
pub const CHIP8_GLYPH_BYTES: u16 = 5;

/// Defines the CHIP-8 memory map:
///   0x0000-0x004f  unused
///   0x0050-0x009f  font (16 glyphs, 5 bytes each)
///   0x00a0-0x01ff  unused
///   0x0200-0x0fff  program and whatever data it writes
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
}

fn range(addr: u16, len: usize) -> Result<Range<usize>, Fault> {
    let start = addr as usize;
    let end = start + len;
    if end > CHIP8_RAM_SIZE_BYTES {
        return Err(Fault::AddressOutOfRange { addr: start, len });
    }
    Ok(start..end)
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Fault> {
        let r = range(addr, len)?;
        Ok(&mut self.bytes[r])
    }
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Fault> {
        let r = range(addr, len)?;
        Ok(&self.bytes[r])
    }
}

impl Chip8MemoryMap {
    /// zeroed RAM with the font baked in
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice(),
        };
        mm.load_font();
        mm
    }

    /// back to power-on contents
    pub fn clear(&mut self) {
        self.bytes.fill(0);
        self.load_font();
    }

    fn load_font(&mut self) {
        let start = CHIP8_FONT_ADDR as usize;
        self.bytes[start..start + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
    }

    /// load a CHIP-8 program at 0x200, verbatim. Programs too big for RAM
    /// are rejected before anything is written.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Fault> {
        self.write(program, CHIP8_PROGRAM_ADDR)
    }

    /// address of the glyph for `digit`; only 0x0-0xf land in the font
    pub fn glyph_addr(digit: u8) -> u16 {
        CHIP8_FONT_ADDR + digit as u16 * CHIP8_GLYPH_BYTES
    }

    /// the whole address space, read-only
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

pub const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed() {
        let m = Chip8MemoryMap::new();
        // NB. memory is zeroed from 0x200 because before that we bake in the font
        assert_eq!(m.bytes[0x200..], [0; 0xe00]);
        assert_eq!(m.bytes[..0x50], [0; 0x50]);
    }

    #[test]
    fn test_font_location() {
        let m = Chip8MemoryMap::new();
        assert_eq!(m.bytes[0x50..0xa0], CHIP8_FONT);
        assert_eq!(Chip8MemoryMap::glyph_addr(0xa), 0x82);
        assert_eq!(m.get_ro_slice(0x82, 5), Ok(&[0xF0, 0x90, 0xF0, 0x90, 0x90][..]));
    }

    #[test]
    fn test_write_slice_ok() -> Result<(), Fault> {
        let mut dst = Chip8MemoryMap::new();
        dst.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x308)?;
        assert_eq!(
            dst.bytes[0x300..0x310],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]
        );
        Ok(())
    }

    #[test]
    fn test_read_word() -> Result<(), Fault> {
        let mut m = Chip8MemoryMap::new();
        m.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x400)?;
        assert_eq!(m.get_word(0x404)?, 0x0405);
        Ok(())
    }

    #[test]
    fn test_last_byte_ok() -> Result<(), Fault> {
        let mut m = Chip8MemoryMap::new();
        m.set_byte(0xfff, 0xaa)?;
        assert_eq!(m.get_byte(0xfff)?, 0xaa);
        Ok(())
    }

    #[test]
    fn test_read_too_much_faults() {
        let m = Chip8MemoryMap::new();
        assert_eq!(
            m.get_word(0xfff),
            Err(Fault::AddressOutOfRange { addr: 0xfff, len: 2 })
        );
        assert!(m.get_byte(0x1000).is_err());
    }

    #[test]
    fn test_write_too_much_faults_and_writes_nothing() {
        let mut dst = Chip8MemoryMap::new();
        assert_eq!(
            dst.write(&[0xff; 8], 4089),
            Err(Fault::AddressOutOfRange { addr: 4089, len: 8 })
        );
        assert_eq!(dst.bytes[4089..], [0; 7]);
    }

    #[test]
    fn test_program_load_ok() -> Result<(), Fault> {
        let mut dst = Chip8MemoryMap::new();
        dst.load_program(&[0x00, 0xe0])?; // clear screen
        assert_eq!(dst.get_ro_slice(0x200, 2)?, &[0x00, 0xe0]);
        Ok(())
    }

    #[test]
    fn test_program_fills_ram_exactly() {
        let mut dst = Chip8MemoryMap::new();
        assert!(dst.load_program(&[0x12; 0xe00]).is_ok());
        assert!(dst.load_program(&[0x12; 0xe01]).is_err());
    }

    #[test]
    fn test_clear_restores_font() -> Result<(), Fault> {
        let mut m = Chip8MemoryMap::new();
        m.write(&[0xff; 16], 0x50)?;
        m.load_program(&[1, 2, 3])?;
        m.clear();
        assert_eq!(m.bytes[0x50..0xa0], CHIP8_FONT);
        assert_eq!(m.get_ro_slice(0x200, 3)?, &[0, 0, 0]);
        Ok(())
    }
}
