use crate::display::Display;
use crate::error::Fault;
use crate::input::{Control, Input};
use crate::interpreter::Chip8Interpreter;
use crate::sound::Sound;
use log::{debug, info};
use spin_sleep::LoopHelper;
use std::error::Error;

/// how the main loop is paced and when it gives up
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// cycles (and so timer ticks and frames) per second
    pub hz: f64,
    /// stop after this many cycles
    pub max_cycles: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hz: 60.0,
            max_cycles: None,
        }
    }
}

/// why the main loop finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stop {
    Quit,
    CycleLimit,
    Fault(Fault),
}

/// Ties an interpreter to the outside world. Every frame: read input into
/// the keypad, run one cycle, show the framebuffer, follow the sound timer.
pub struct Emulator<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
}

impl<'a> Emulator<'a> {
    pub fn new(
        interpreter: Chip8Interpreter,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
    ) -> Self {
        Emulator {
            interpreter,
            display,
            input,
            sound,
        }
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    /// one frame; Some(reason) if the loop should stop
    pub fn frame(&mut self) -> Result<Option<Stop>, Box<dyn Error>> {
        if self.input.update(self.interpreter.keypad_mut())? == Control::Quit {
            return Ok(Some(Stop::Quit));
        }
        let result = self.interpreter.cycle();
        self.display.draw(self.interpreter.framebuffer())?;
        match result {
            Ok(()) => {
                self.sound.gate(self.interpreter.sound_active())?;
                Ok(None)
            }
            Err(fault) => {
                self.sound.gate(false)?;
                Ok(Some(Stop::Fault(fault)))
            }
        }
    }

    /// run frames at `config.hz` until something stops us
    pub fn main_loop(&mut self, config: &Config) -> Result<Stop, Box<dyn Error>> {
        let mut loop_helper = LoopHelper::builder()
            .report_interval_s(5.0)
            .build_with_target_rate(config.hz);
        let mut cycles: u64 = 0;
        debug!("running at {}Hz", config.hz);
        let stop = loop {
            if config.max_cycles == Some(cycles) {
                break Stop::CycleLimit;
            }
            loop_helper.loop_start();
            if let Some(stop) = self.frame()? {
                break stop;
            }
            cycles += 1;
            if let Some(rate) = loop_helper.report_rate() {
                debug!("{:.1} cycles/s", rate);
            }
            loop_helper.loop_sleep();
        };
        self.sound.gate(false)?;
        info!("stopped after {} cycles: {:?}", cycles, stop);
        Ok(stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DummyDisplay;
    use crate::input::DummyInput;
    use crate::sound::Mute;

    const FAST: f64 = 100_000.0;

    fn interpreter(program: &[u8]) -> Chip8Interpreter {
        let mut i = Chip8Interpreter::with_seed(1);
        i.load_bytes(program).unwrap();
        i
    }

    #[test]
    fn test_cycle_limit() -> Result<(), Box<dyn Error>> {
        let (mut display, mut input, mut sound) = (DummyDisplay::new(), DummyInput::new(&[]), Mute::new());
        // JP 0x200
        let mut emu = Emulator::new(interpreter(&[0x12, 0x00]), &mut display, &mut input, &mut sound);
        let config = Config { hz: FAST, max_cycles: Some(10) };
        assert_eq!(emu.main_loop(&config)?, Stop::CycleLimit);
        assert_eq!(emu.interpreter().pc(), 0x200);
        assert_eq!(display.frames, 10);
        Ok(())
    }

    #[test]
    fn test_quit() -> Result<(), Box<dyn Error>> {
        let (mut display, mut sound) = (DummyDisplay::new(), Mute::new());
        let mut input = DummyInput::new(&[]).quit_after(3);
        let mut emu = Emulator::new(interpreter(&[0x12, 0x00]), &mut display, &mut input, &mut sound);
        let config = Config { hz: FAST, max_cycles: None };
        assert_eq!(emu.main_loop(&config)?, Stop::Quit);
        assert_eq!(display.frames, 3);
        Ok(())
    }

    #[test]
    fn test_fault_stops_loop() -> Result<(), Box<dyn Error>> {
        let (mut display, mut input, mut sound) = (DummyDisplay::new(), DummyInput::new(&[]), Mute::new());
        // V0 = 1; RET
        let mut emu = Emulator::new(interpreter(&[0x60, 0x01, 0x00, 0xee]), &mut display, &mut input, &mut sound);
        let config = Config { hz: FAST, max_cycles: None };
        assert_eq!(
            emu.main_loop(&config)?,
            Stop::Fault(Fault::StackUnderflow { pc: 0x202 })
        );
        assert_eq!(display.frames, 2);
        Ok(())
    }

    #[test]
    fn test_keys_and_sound() -> Result<(), Box<dyn Error>> {
        let (mut display, mut sound) = (DummyDisplay::new(), Mute::new());
        let mut input = DummyInput::new(&[0x7]);
        // LD V0, K; LD ST, V0; JP 0x204
        let mut emu = Emulator::new(
            interpreter(&[0xf0, 0x0a, 0xf0, 0x18, 0x12, 0x04]),
            &mut display,
            &mut input,
            &mut sound,
        );
        emu.frame()?;
        assert_eq!(emu.interpreter().register(0), 0x7);
        emu.frame()?;
        assert_eq!(emu.interpreter().sound_timer(), 6);
        let config = Config { hz: FAST, max_cycles: Some(10) };
        emu.main_loop(&config)?;
        assert_eq!(emu.interpreter().sound_timer(), 0);
        assert_eq!(sound.beeps, 1);
        assert!(!sound.is_beeping());
        Ok(())
    }
}
