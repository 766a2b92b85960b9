use std::error::Error;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use vm8::{Chip8, Config, TimerPolicy, TIMER_FREQUENCY};
use vm8_display::Display;

use crate::keymap::keymap;

/// How the program is presented
pub struct Frontend {
    /// the size multiplier for each pixel
    pub scale: usize,
    /// instructions executed per second
    pub speed: u32,
}

impl Frontend {
    /// Instructions executed between two timer ticks
    fn cycles_per_frame(&self) -> usize {
        (self.speed / TIMER_FREQUENCY).max(1) as usize
    }
}

/// Runs the rom at `rom` until the window is closed or the program fails.
///
/// Frames are paced at the timer frequency: each frame executes a batch of
/// instructions, ticks the timers, and redraws if the screen changed.
pub fn run(rom: &Path, config: Config, frontend: Frontend) -> Result<(), Box<dyn Error>> {
    let mut chip8 = Chip8::new(config);
    chip8.load_file(rom)?;
    info!("loaded {}", rom.display());

    // Get SDL2 context
    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl, "vm8", frontend.scale)?;
    let mut events = sdl.event_pump()?;

    // Set initial timing
    let frame_time = Duration::from_secs(1) / TIMER_FREQUENCY;
    let cycles_per_frame = frontend.cycles_per_frame();
    debug!("{} instructions per frame", cycles_per_frame);

    // Whether or not the frame rate should be respected
    let mut fast_forward = false;

    'event: loop {
        let frame_start = Instant::now();

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_press(kc)?,
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Escape, _) => break 'event,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_release(kc)?,
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        chip8.run(cycles_per_frame)?;
        if config.timers == TimerPolicy::Wallclock {
            chip8.tick_timers();
        }

        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.take_frame() {
            display.render(&frame)?;
        }

        // Handle timing
        let elapsed = frame_start.elapsed();
        if !fast_forward && frame_time > elapsed {
            thread::sleep(frame_time - elapsed);
        }
    }

    info!("window closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_per_frame() {
        let frontend = Frontend {
            scale: 10,
            speed: 600,
        };
        assert_eq!(frontend.cycles_per_frame(), 10);
    }

    #[test]
    fn test_slow_clock_still_runs() {
        let frontend = Frontend { scale: 10, speed: 1 };
        assert_eq!(frontend.cycles_per_frame(), 1);
    }
}
