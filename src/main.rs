use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use log::error;

use chip8vm::display::MonoTermDisplay;
use chip8vm::emulator::{Config, Emulator, Stop};
use chip8vm::input::StdinInput;
use chip8vm::interpreter::Chip8Interpreter;
use chip8vm::sound::{Mute, SimpleBeep, Sound};

#[derive(Parser, Debug)]
#[command(name = "chip8vm")]
#[command(about = "CHIP-8 interpreter in the terminal", long_about = None)]
struct Args {
    /// Path to a CHIP-8 program
    rom: PathBuf,

    /// Cycles per second; the timers tick once per cycle
    #[arg(long, default_value_t = 60.0)]
    hz: f64,

    /// Stop after this many cycles
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Sound the PC speaker while the sound timer runs
    #[arg(long)]
    beep: bool,

    /// Frames a keypress holds its key down for
    #[arg(long, default_value_t = 6)]
    key_hold: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    // load a program
    let mut interpreter = Chip8Interpreter::new();
    let mut f = File::open(&args.rom)?;
    interpreter.load_program(&mut f)?;

    // initialise
    let mut sound: Box<dyn Sound> = if args.beep {
        Box::new(SimpleBeep::new())
    } else {
        Box::new(Mute::new())
    };
    let stop = {
        let mut display = MonoTermDisplay::new()?;
        let mut input = StdinInput::new(args.key_hold)?;
        let mut emulator = Emulator::new(interpreter, &mut display, &mut input, sound.as_mut());
        let config = Config {
            hz: args.hz,
            max_cycles: args.max_cycles,
        };
        emulator.main_loop(&config)?
    };

    // terminal is back to normal by now
    if let Stop::Fault(fault) = stop {
        error!("{}: {}", args.rom.display(), fault);
        return Err(fault.into());
    }
    Ok(())
}
