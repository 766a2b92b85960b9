//! # vm8
//! A CHIP-8 virtual machine: 16 registers, 4KB of memory, a 64x32 monochrome
//! display, a 16 key keypad and two 60Hz timers.
//!
//! The machine only executes instructions. Reading roms from disk, drawing frames
//! and polling keys are up to the caller, through [`Chip8`].

pub use chip8::Chip8;
pub use config::{Config, Quirks, SpriteEdges, SubtractFlag, TimerPolicy};
pub use constants::{CLOCK_SPEED, TIMER_FREQUENCY};
pub use error::{Error, Result};
pub use state::FrameBuffer;

mod chip8;
pub mod config;
pub mod constants;
mod error;
mod instruction;
pub mod memory;
mod opcode;
mod operations;
pub mod state;
