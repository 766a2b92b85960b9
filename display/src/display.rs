use log::debug;
use sdl2::pixels::PixelFormatEnum;

use vm8::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use vm8::FrameBuffer;

/// Bytes per pixel in an RGB24 texture
const CHANNELS: usize = 3;

/// # Display
/// The display is composed of 64x32 black/white pixels.
/// The on/off state of these pixels is encoded as true/false in a 2d array of 64x32 bools.
/// The display only gets a call to `render` when the FrameBuffer is updated.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    width: usize,
    height: usize,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `title` the window title
    /// * `scale` the size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, title: &str, scale: usize) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window(
                title,
                (DISPLAY_WIDTH * scale) as u32,
                (DISPLAY_HEIGHT * scale) as u32,
            )
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        debug!("opened {}x{} window", DISPLAY_WIDTH * scale, DISPLAY_HEIGHT * scale);

        Ok(Display {
            canvas,
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
        })
    }

    /// Formats a FrameBuffer for rendering as an SDL2 texture.
    ///
    /// An SDL2 texture is a 1D array of ints that represent concatenated rows of RGB pixels.
    ///
    /// This creates a black and white rendering by:
    /// - Flattening the 2D frame buffer into a 1D array by concatenating its rows
    /// - Mapping each pixel from its binary state to 0 or 255 intensity
    /// - Triplicating each element of that 1D array to represent the RGB values of each pixel
    ///
    /// # Arguments
    /// * `frame` a FrameBuffer
    fn frame_to_sdl_texture(frame: &FrameBuffer) -> Vec<u8> {
        frame
            .iter()
            .flat_map(|row| row.iter())
            .map(|&lit| if lit { 255 } else { 0 })
            .flat_map(|intensity| std::iter::repeat(intensity).take(CHANNELS))
            .collect()
    }

    /// Formats the FrameBuffer as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                self.width as u32,
                self.height as u32,
            )
            .map_err(|e| e.to_string())?;

        let pixels = Display::frame_to_sdl_texture(frame);
        let stride = self.width * CHANNELS;
        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            // rows may be padded out past width * CHANNELS
            for (row, line) in pixels.chunks(stride).enumerate() {
                let offset = row * pitch;
                buffer[offset..offset + line.len()].copy_from_slice(line);
            }
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}
