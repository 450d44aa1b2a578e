/// # interpreter
///
/// The CHIP-8 machine state, as seen by a CHIP-8 program:
///  V0-VF  16 8bit general purpose registers; VF doubles as the carry,
///         borrow, shifted-out-bit and sprite collision flag
///  I      16bit index register, used for every memory access a program makes
///  PC     program counter                     -- 0x200
///  stack  up to 16 return addresses, kept outside of addressable memory
///  DT     delay timer, counts down to 0 once per cycle
///  ST     sound timer, ditto; the tone plays while it is non-zero
/// plus the framebuffer and the keypad state, owned here so a presentation
/// layer can sample the one and feed the other between cycles.
///
/// Each call to .cycle() fetches, decodes and executes exactly one
/// instruction and then ticks the timers. Nothing blocks: FX0A "waits" for
/// a key by rewinding PC so that it is executed again next cycle.
use crate::error::{Chip8Error, Fault};
use crate::framebuffer::FrameBuffer;
use crate::instruction::{Instruction, Opcode};
use crate::keypad::Keypad;
use crate::memory::{Chip8MemoryMap, MemoryMap, CHIP8_PROGRAM_ADDR};
use log::{debug, error, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

/// maximum depth of nested subroutine calls
pub const CHIP8_STACK_DEPTH: usize = 16;

/// the flag register
const VF: usize = 0xf;

pub struct Chip8Interpreter {
    memory: Chip8MemoryMap,
    program: Vec<u8>,
    v: [u8; 16],
    i: u16,
    program_counter: u16,
    stack: Vec<u16>,
    delay_timer: u8,
    sound_timer: u8,
    framebuffer: FrameBuffer,
    keypad: Keypad,
    rng: StdRng,
    fault: Option<Fault>,
}

impl Chip8Interpreter {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// an interpreter whose CXNN results are repeatable
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Chip8Interpreter {
            memory: Chip8MemoryMap::new(),
            program: Vec::new(),
            v: [0; 16],
            i: 0x0000,
            program_counter: CHIP8_PROGRAM_ADDR,
            stack: Vec::with_capacity(CHIP8_STACK_DEPTH),
            delay_timer: 0x00,
            sound_timer: 0x00,
            framebuffer: FrameBuffer::new(),
            keypad: Keypad::new(),
            rng,
            fault: None,
        }
    }

    /// read a chip8 program and load it at 0x200
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        let mut buf = Vec::new();
        let len = reader.read_to_end(&mut buf)?;
        self.load_bytes(&buf)?;
        Ok(len)
    }

    /// load a chip8 program at 0x200. Nothing is validated except that the
    /// program fits in RAM.
    pub fn load_bytes(&mut self, program: &[u8]) -> Result<(), Fault> {
        self.memory.load_program(program)?;
        self.program = program.to_vec();
        debug!("loaded {} byte program at 0x{:03x}", program.len(), CHIP8_PROGRAM_ADDR);
        Ok(())
    }

    /// back to power-on state, with the last loaded program in place again
    pub fn reset(&mut self) -> Result<(), Fault> {
        self.memory.clear();
        self.memory.load_program(&self.program)?;
        self.v = [0; 16];
        self.i = 0x0000;
        self.program_counter = CHIP8_PROGRAM_ADDR;
        self.stack.clear();
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.framebuffer.clear();
        self.keypad.release_all();
        self.fault = None;
        debug!("reset");
        Ok(())
    }

    /// Run one fetch/decode/execute cycle, then tick the timers.
    ///
    /// A fault stops the machine: PC is left pointing at the offending
    /// instruction and every later call returns the same fault without
    /// touching any state, until `reset`.
    pub fn cycle(&mut self) -> Result<(), Fault> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        let pc = self.program_counter;
        if let Err(fault) = self.step() {
            error!("halted: {}", fault);
            self.program_counter = pc;
            self.fault = Some(fault.clone());
            return Err(fault);
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), Fault> {
        let pc = self.program_counter;
        let word = self.fetch()?;
        let instr = Instruction::decode(Opcode(word)).ok_or(Fault::UnknownInstruction { word, pc })?;
        trace!("{:03x}: {:04x}  {}", pc, word, instr);
        self.execute(instr)?;
        self.tick_timers();
        Ok(())
    }

    /// read the big-endian word at PC and move PC past it
    pub fn fetch(&mut self) -> Result<u16, Fault> {
        let word = self.memory.get_word(self.program_counter)?;
        self.program_counter = self.program_counter.wrapping_add(2);
        Ok(word)
    }

    fn tick_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter = self.program_counter.wrapping_add(2);
        }
    }

    /// Execute a single decoded instruction. Expects PC to already have moved
    /// past it, as `fetch` leaves it. Faults are raised before any state is
    /// changed.
    pub fn execute(&mut self, instr: Instruction) -> Result<(), Fault> {
        use Instruction::*;
        let here = self.program_counter.wrapping_sub(2);
        match instr {
            Sys(_) => {}
            ClearScreen => self.framebuffer.clear(),
            Return => {
                self.program_counter = self.stack.pop().ok_or(Fault::StackUnderflow { pc: here })?;
            }
            Jump(addr) => self.program_counter = addr,
            Call(addr) => {
                if self.stack.len() == CHIP8_STACK_DEPTH {
                    return Err(Fault::StackOverflow { pc: here });
                }
                self.stack.push(self.program_counter);
                self.program_counter = addr;
            }
            SkipEqImm(x, nn) => self.skip_if(self.v[x as usize] == nn),
            SkipNeImm(x, nn) => self.skip_if(self.v[x as usize] != nn),
            SkipEqReg(x, y) => self.skip_if(self.v[x as usize] == self.v[y as usize]),
            SkipNeReg(x, y) => self.skip_if(self.v[x as usize] != self.v[y as usize]),
            LoadImm(x, nn) => self.v[x as usize] = nn,
            AddImm(x, nn) => self.v[x as usize] = self.v[x as usize].wrapping_add(nn),
            Copy(x, y) => self.v[x as usize] = self.v[y as usize],
            Or(x, y) => self.v[x as usize] |= self.v[y as usize],
            And(x, y) => self.v[x as usize] &= self.v[y as usize],
            Xor(x, y) => self.v[x as usize] ^= self.v[y as usize],
            // flag is written last so it survives when X is VF
            AddReg(x, y) => {
                let (sum, carry) = self.v[x as usize].overflowing_add(self.v[y as usize]);
                self.v[x as usize] = sum;
                self.v[VF] = carry as u8;
            }
            SubReg(x, y) => {
                let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
                self.v[x as usize] = vx.wrapping_sub(vy);
                self.v[VF] = (vx >= vy) as u8;
            }
            SubRegReverse(x, y) => {
                let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
                self.v[x as usize] = vy.wrapping_sub(vx);
                self.v[VF] = (vy >= vx) as u8;
            }
            ShiftRight(x) => {
                let vx = self.v[x as usize];
                self.v[x as usize] = vx >> 1;
                self.v[VF] = vx & 0x01;
            }
            ShiftLeft(x) => {
                let vx = self.v[x as usize];
                self.v[x as usize] = vx << 1;
                self.v[VF] = vx >> 7;
            }
            SetIndex(addr) => self.i = addr,
            JumpOffset(addr) => self.program_counter = addr + self.v[0] as u16,
            Random(x, nn) => self.v[x as usize] = self.rng.gen::<u8>() & nn,
            Draw(x, y, n) => {
                let sprite = self.memory.get_ro_slice(self.i, n as usize)?;
                let collision =
                    self.framebuffer
                        .draw_sprite(sprite, self.v[x as usize], self.v[y as usize]);
                self.v[VF] = collision as u8;
            }
            SkipKeyDown(x) => self.skip_if(self.keypad.is_down(self.v[x as usize])),
            SkipKeyUp(x) => self.skip_if(!self.keypad.is_down(self.v[x as usize])),
            GetDelayTimer(x) => self.v[x as usize] = self.delay_timer,
            WaitKey(x) => match self.keypad.first_down() {
                Some(key) => self.v[x as usize] = key,
                None => self.program_counter = here,
            },
            SetDelayTimer(x) => self.delay_timer = self.v[x as usize],
            SetSoundTimer(x) => self.sound_timer = self.v[x as usize],
            AddIndex(x) => self.i = self.i.wrapping_add(self.v[x as usize] as u16),
            LoadFontAddr(x) => self.i = Chip8MemoryMap::glyph_addr(self.v[x as usize]),
            StoreBcd(x) => {
                let vx = self.v[x as usize];
                let digits = self.memory.get_rw_slice(self.i, 3)?;
                digits.copy_from_slice(&[vx / 100, vx / 10 % 10, vx % 10]);
            }
            DumpRegisters(x) => {
                let n = x as usize + 1;
                self.memory
                    .get_rw_slice(self.i, n)?
                    .copy_from_slice(&self.v[..n]);
            }
            LoadRegisters(x) => {
                let n = x as usize + 1;
                self.v[..n].copy_from_slice(self.memory.get_ro_slice(self.i, n)?);
            }
        }
        Ok(())
    }

    pub fn pc(&self) -> u16 {
        self.program_counter
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    /// value of register V`x`, x being the low nibble
    pub fn register(&self, x: u8) -> u8 {
        self.v[(x & 0x0f) as usize]
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// should a tone be playing right now?
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    /// the fault that halted the machine, if any
    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }
}

impl Default for Chip8Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
