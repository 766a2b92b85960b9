use std::io;

use thiserror::Error;

/// Conditions that end a run of the machine.
///
/// Errors from [`Chip8::step`](crate::Chip8::step) leave the program counter after the
/// faulting instruction, so stepping again skips it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to read program: {0}")]
    Unreadable(#[from] io::Error),

    #[error("program is {size} bytes but at most {max} bytes fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("unrecognized instruction {0:#06X}")]
    UnrecognizedInstruction(u16),

    #[error("call stack exhausted: more than 16 nested calls")]
    StackOverflow,

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("address {0:#06X} is outside addressable memory")]
    AddressOutOfRange(usize),

    #[error("key {0:#04X} is not on the keypad")]
    InvalidKey(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
