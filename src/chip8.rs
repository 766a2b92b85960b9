use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::{Config, TimerPolicy};
use crate::error::{Error, Result};
use crate::instruction;
use crate::memory::Memory;
use crate::operations::Context;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the `config` it was built with
///  - the random number generator behind `Cxnn`
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8<R: RngCore = StdRng> {
    state: State,
    config: Config,
    rng: R,
}

impl Chip8 {
    /// A machine whose random numbers come from `config.seed`, or the OS without one
    pub fn new(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8::with_rng(config, rng)
    }
}

impl<R: RngCore> Chip8<R> {
    /// A machine drawing random numbers from `rng`; `config.seed` is ignored
    pub fn with_rng(config: Config, rng: R) -> Self {
        Chip8 {
            state: State::new(),
            config,
            rng,
        }
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `path` the location of a raw program image
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("loading {}", path.display());
        self.reset();
        let mut file = File::open(path)?;
        self.load_rom(&mut file)
    }

    /// Load a rom from a reader
    ///
    /// The machine is reset first, so a failed load leaves it freshly initialised.
    ///
    /// # Arguments
    /// * `reader` a reader that yields a raw program image
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<()> {
        self.reset();
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        self.state.memory.load_program(&program)
    }

    /// Load a rom that's already in memory
    pub fn load_bytes(&mut self, program: &[u8]) -> Result<()> {
        self.reset();
        self.state.memory.load_program(program)
    }

    /// Throws away all state, leaving only the font in memory
    pub fn reset(&mut self) {
        self.state = State::new();
    }

    /// Executes a single instruction
    /// - gets and executes the next opcode
    /// - counts the timers down too if they're tied to instructions and it completed
    pub fn step(&mut self) -> Result<()> {
        let op = self.get_op()?;
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        let mut context = Context::new(self.config.quirks, &mut self.rng);
        let completed = instruction::execute(op, &mut self.state, &mut context)?;
        if completed && self.config.timers == TimerPolicy::PerInstruction {
            self.state.tick_timers();
        }
        Ok(())
    }

    /// Executes `budget` instructions, stopping at the first error
    pub fn run(&mut self, budget: usize) -> Result<()> {
        for _ in 0..budget {
            self.step()?;
        }
        Ok(())
    }

    /// Counts the delay and sound timers down once; call at 60Hz
    pub fn tick_timers(&mut self) {
        self.state.tick_timers();
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the keypad index 0..F
    /// * `pressed` whether it's held down
    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<()> {
        let slot = self
            .state
            .keys
            .get_mut(key as usize)
            .ok_or(Error::InvalidKey(key))?;
        *slot = pressed;
        Ok(())
    }

    pub fn key_press(&mut self, key: u8) -> Result<()> {
        self.set_key(key, true)
    }

    pub fn key_release(&mut self, key: u8) -> Result<()> {
        self.set_key(key, false)
    }

    /// Returns the FrameBuffer if the display should be redrawn, marking it as seen
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.screen.take_dirty() {
            Some(*self.state.screen.pixels())
        } else {
            None
        }
    }

    /// The current FrameBuffer, drawn or not
    pub fn frame(&self) -> &FrameBuffer {
        self.state.screen.pixels()
    }

    /// Whether the FrameBuffer changed since it was last taken
    pub fn is_dirty(&self) -> bool {
        self.state.screen.is_dirty()
    }

    /// Register Vidx; None past VF
    pub fn register(&self, idx: usize) -> Option<u8> {
        self.state.v.get(idx).copied()
    }

    pub fn index(&self) -> u16 {
        self.state.i
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn sp(&self) -> usize {
        self.state.sp
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Result<u16> {
        self.state.memory.word(self.state.pc)
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
