/// internal resolution of the CHIP-8 display
pub const CHIP8_DISPLAY_WIDTH: usize = 64;
pub const CHIP8_DISPLAY_HEIGHT: usize = 32;

/// a lit cell has every bit set, so a single XOR with it both toggles the
/// cell and leaves it holding the new state
pub const PIXEL_ON: u32 = u32::MAX;
pub const PIXEL_OFF: u32 = 0;

/// Monochrome 64x32 pixel grid, row-major: cell (x, y) is at y * 64 + x.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    cells: Box<[u32]>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            cells: vec![PIXEL_OFF; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT].into_boxed_slice(),
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(PIXEL_OFF);
    }

    /// is the pixel at (x, y) lit? coordinates wrap
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.cells[Self::offset(x, y)] == PIXEL_ON
    }

    /// linear view of the cells, for whatever is presenting them
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    fn offset(x: usize, y: usize) -> usize {
        (y % CHIP8_DISPLAY_HEIGHT) * CHIP8_DISPLAY_WIDTH + (x % CHIP8_DISPLAY_WIDTH)
    }

    /// XOR an 8-pixel-wide sprite onto the grid with its top left corner at
    /// (x, y). Each byte of `sprite` is one row, msb leftmost. Both the
    /// starting position and every drawn pixel wrap around the edges.
    ///
    /// Returns true if any lit pixel was switched off.
    pub fn draw_sprite(&mut self, sprite: &[u8], x: u8, y: u8) -> bool {
        let x0 = x as usize % CHIP8_DISPLAY_WIDTH;
        let y0 = y as usize % CHIP8_DISPLAY_HEIGHT;
        let mut collision = false;
        for (row, &bits) in sprite.iter().enumerate() {
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let cell = &mut self.cells[Self::offset(x0 + col, y0 + row)];
                *cell ^= PIXEL_ON;
                if *cell == PIXEL_OFF {
                    collision = true;
                }
            }
        }
        collision
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
