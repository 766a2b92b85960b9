use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::error;

use vm8::{Config, Quirks, SpriteEdges, SubtractFlag, TimerPolicy, CLOCK_SPEED};

mod keymap;
mod run;

#[derive(Parser)]
#[command(name = "chip8", version, about = "Runs CHIP-8 programs")]
struct Args {
    /// Raw program image, loaded at 0x200
    rom: PathBuf,

    /// Size of each pixel on screen
    #[arg(long, default_value_t = 10)]
    scale: usize,

    /// Instructions executed per second
    #[arg(long, default_value_t = CLOCK_SPEED)]
    speed: u32,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Drop sprite pixels that run off the screen instead of wrapping them
    #[arg(long)]
    clip_sprites: bool,

    /// Only set VF on subtraction when the result is strictly positive
    #[arg(long)]
    strict_vf: bool,

    /// When the delay and sound timers count down
    #[arg(long, value_enum, default_value_t = Timers::Wallclock)]
    timers: Timers,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Timers {
    /// 60 times a second
    Wallclock,
    /// After every instruction
    PerInstruction,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            quirks: Quirks {
                subtract_flag: if self.strict_vf {
                    SubtractFlag::StrictGreater
                } else {
                    SubtractFlag::NoBorrow
                },
                sprite_edges: if self.clip_sprites {
                    SpriteEdges::Clip
                } else {
                    SpriteEdges::Wrap
                },
            },
            timers: match self.timers {
                Timers::Wallclock => TimerPolicy::Wallclock,
                Timers::PerInstruction => TimerPolicy::PerInstruction,
            },
            seed: self.seed,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let frontend = run::Frontend {
        scale: args.scale,
        speed: args.speed,
    };

    if let Err(e) = run::run(&args.rom, args.config(), frontend) {
        error!("{}", e);
        std::process::exit(1);
    }
}
