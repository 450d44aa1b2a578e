use std::io;
use thiserror::Error;

/// Fatal conditions raised by the interpreter core. None of these can be
/// recovered from inside the core; once one is raised the interpreter stops
/// advancing until it is reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("unknown instruction 0x{word:04x} at pc 0x{pc:03x}")]
    UnknownInstruction { word: u16, pc: u16 },

    #[error("stack overflow: CALL at pc 0x{pc:03x} with 16 return addresses already pushed")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: RET at pc 0x{pc:03x} with an empty stack")]
    StackUnderflow { pc: u16 },

    #[error("memory access of {len} byte(s) at 0x{addr:04x} is outside the 4K address space")]
    AddressOutOfRange { addr: usize, len: usize },
}

/// Anything that can go wrong outside of instruction execution, e.g. while
/// reading a program from disk
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Fault(#[from] Fault),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_instruction_message() {
        let f = Fault::UnknownInstruction {
            word: 0xe0ff,
            pc: 0x20a,
        };
        assert_eq!(
            f.to_string(),
            "unknown instruction 0xe0ff at pc 0x20a"
        );
    }

    #[test]
    fn test_fault_converts() {
        let e: Chip8Error = Fault::StackUnderflow { pc: 0x200 }.into();
        assert!(matches!(e, Chip8Error::Fault(Fault::StackUnderflow { pc: 0x200 })));
    }
}
