//!
//! ## Design
//!
//! * the interpreter core is self-contained: memory, registers, stack,
//!   timers, framebuffer and keypad all live in one `Chip8Interpreter`, so
//!   any number of them can run side by side (handy for testing)
//! * one instruction per `.cycle()`; timers tick once per cycle, so the
//!   cycle rate is the timer rate (nominally 60Hz, decided by the caller)
//! * nothing blocks; FX0A re-runs itself every cycle until a key is down
//! * any fault (unknown instruction, stack over/underflow, memory access
//!   outside the 4K) halts the interpreter until it is reset
//! * abstract display, input and sound so alternatives can be plugged in;
//!   starting with TUI in-console
//!
//! Model
//!
//! Emulator
//!  |-- display, input, sound, config
//!  |-- interpreter
//!  |    |-- memory (font at 0x50, program at 0x200)
//!  |    |-- instruction decoder
//!  |    `-- framebuffer, keypad
//!  `-- main loop, once per frame
//!       |-- input.update(keypad)
//!       |-- interpreter.cycle()
//!       |-- display.draw(framebuffer)
//!       |-- sound.gate(sound timer > 0)
//!       `-- sleep until the next frame
pub mod display;
pub mod emulator;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod keypad;
pub mod memory;
pub mod sound;
