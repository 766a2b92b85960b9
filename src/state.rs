use crate::config::SpriteEdges;
use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, PROGRAM_START, REGISTER_COUNT, STACK_SIZE,
};
use crate::error::{Error, Result};
use crate::memory::Memory;

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// The machine's internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is also the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, starting at 0x200
///
/// Pointer
/// - (sp) the number of return addresses on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound) counting down to 0
///
/// ## Memory
/// - 16 entry stack of return addresses
/// - 4096 bytes of addressable memory, kept apart from the registers
/// - 64x32 single bit frame buffer and a flag marking it as changed
///
/// ## Input
/// - the pressed status of keys 0..F, written only from outside the machine
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: usize,
    pub stack: [u16; STACK_SIZE],
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub keys: [bool; KEY_COUNT],
    pub memory: Memory,
    pub screen: Screen,
}

impl State {
    pub fn new() -> Self {
        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_SIZE],
            delay_timer: 0,
            sound_timer: 0,
            keys: [false; KEY_COUNT],
            memory: Memory::new(),
            screen: Screen::new(),
        }
    }

    /// Writes the result of an operation to Vx and its flag to VF.
    ///
    /// VF is written last so the flag survives when x is F.
    pub fn set_with_flag(&mut self, x: usize, value: u8, flag: u8) {
        self.v[x] = value;
        self.v[0xF] = flag;
    }

    /// Steps over the next instruction when `condition` holds
    pub fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(0x2);
        }
    }

    /// Push a return address, failing if the stack is full
    pub fn push(&mut self, addr: u16) -> Result<()> {
        let slot = self.stack.get_mut(self.sp).ok_or(Error::StackOverflow)?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    /// Pop the most recent return address
    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    /// Counts both timers down towards 0
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// Whether key `key` is held; anything off the keypad never is
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    /// The lowest key currently held, if any
    pub fn pressed_key(&self) -> Option<u8> {
        self.keys.iter().position(|&pressed| pressed).map(|k| k as u8)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// # Screen
/// 64x32 monochrome pixels plus a flag recording whether they changed since a
/// renderer last looked at them.
#[derive(Copy, Clone)]
pub struct Screen {
    pixels: FrameBuffer,
    dirty: bool,
}

impl Screen {
    pub fn new() -> Self {
        Screen {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            dirty: false,
        }
    }

    pub fn pixels(&self) -> &FrameBuffer {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y][x]
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the dirty flag and clears it
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.dirty = true;
    }

    /// XORs an 8 pixel wide sprite onto the screen with its top left corner at x, y.
    ///
    /// The corner itself always wraps onto the screen; pixels running past an edge
    /// wrap or are dropped according to `edges`.
    /// Returns whether any pixel was turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8], edges: SpriteEdges) -> bool {
        let origin_x = x as usize % DISPLAY_WIDTH;
        let origin_y = y as usize % DISPLAY_HEIGHT;
        let mut collision = false;

        for (row, byte) in rows.iter().enumerate() {
            let y = match position(origin_y + row, DISPLAY_HEIGHT, edges) {
                Some(y) => y,
                None => break,
            };
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let x = match position(origin_x + bit, DISPLAY_WIDTH, edges) {
                    Some(x) => x,
                    None => break,
                };
                let pixel = &mut self.pixels[y][x];
                collision |= *pixel;
                *pixel = !*pixel;
                self.dirty = true;
            }
        }

        collision
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

fn position(offset: usize, size: usize, edges: SpriteEdges) -> Option<usize> {
    match edges {
        SpriteEdges::Wrap => Some(offset % size),
        SpriteEdges::Clip if offset < size => Some(offset),
        SpriteEdges::Clip => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = State::new();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.sp, 0);
        assert_eq!(state.v, [0; 16]);
        assert!(!state.screen.is_dirty());
    }

    #[test]
    fn test_push_pop() {
        let mut state = State::new();
        state.push(0x0232).unwrap();
        state.push(0x0456).unwrap();
        assert_eq!(state.sp, 2);
        assert_eq!(state.stack[0], 0x0232);
        assert_eq!(state.pop().unwrap(), 0x0456);
        assert_eq!(state.pop().unwrap(), 0x0232);
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_push_past_capacity() {
        let mut state = State::new();
        for addr in 0..STACK_SIZE as u16 {
            state.push(addr).unwrap();
        }
        assert!(matches!(state.push(0xABC), Err(Error::StackOverflow)));
        assert_eq!(state.sp, STACK_SIZE);
        assert_eq!(state.stack[STACK_SIZE - 1], STACK_SIZE as u16 - 1);
    }

    #[test]
    fn test_pop_empty() {
        let mut state = State::new();
        assert!(matches!(state.pop(), Err(Error::StackUnderflow)));
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_tick_timers_stops_at_zero() {
        let mut state = State::new();
        state.delay_timer = 2;
        state.sound_timer = 1;
        state.tick_timers();
        assert_eq!((state.delay_timer, state.sound_timer), (1, 0));
        state.tick_timers();
        state.tick_timers();
        assert_eq!((state.delay_timer, state.sound_timer), (0, 0));
    }

    #[test]
    fn test_pressed_key_is_lowest() {
        let mut state = State::new();
        assert_eq!(state.pressed_key(), None);
        state.keys[0xC] = true;
        state.keys[0x5] = true;
        assert_eq!(state.pressed_key(), Some(0x5));
    }

    #[test]
    fn test_off_keypad_is_not_pressed() {
        let mut state = State::new();
        state.keys = [true; KEY_COUNT];
        assert!(state.is_pressed(0xF));
        assert!(!state.is_pressed(0x10));
    }

    #[test]
    fn test_set_with_flag_into_vf() {
        let mut state = State::new();
        state.set_with_flag(0xF, 0x42, 1);
        assert_eq!(state.v[0xF], 1);
    }

    #[test]
    fn test_clear_marks_dirty() {
        let mut screen = Screen::new();
        screen.draw_sprite(0, 0, &[0xFF], SpriteEdges::Wrap);
        screen.take_dirty();
        screen.clear();
        assert!(screen.is_dirty());
        assert!(screen.pixels().iter().flatten().all(|&p| !p));
    }

    #[test]
    fn test_take_dirty() {
        let mut screen = Screen::new();
        screen.draw_sprite(0, 0, &[0x80], SpriteEdges::Wrap);
        assert!(screen.take_dirty());
        assert!(!screen.is_dirty());
    }

    #[test]
    fn test_draw_sprite_rows() {
        let mut screen = Screen::new();
        let collision = screen.draw_sprite(8, 2, &[0b1010_1011, 0b1000_0000], SpriteEdges::Wrap);
        assert!(!collision);
        let row: Vec<bool> = screen.pixels()[2][8..16].to_vec();
        assert_eq!(
            row,
            vec![true, false, true, false, true, false, true, true]
        );
        assert!(screen.pixel(8, 3));
        assert!(!screen.pixel(9, 3));
        assert!(!screen.pixel(8, 4));
    }

    #[test]
    fn test_draw_sprite_collides() {
        let mut screen = Screen::new();
        screen.draw_sprite(0, 0, &[0x80], SpriteEdges::Wrap);
        assert!(screen.draw_sprite(0, 0, &[0xC0], SpriteEdges::Wrap));
        assert!(!screen.pixel(0, 0));
        assert!(screen.pixel(1, 0));
    }

    #[test]
    fn test_draw_sprite_wraps() {
        let mut screen = Screen::new();
        screen.draw_sprite(62, 31, &[0xF0, 0xF0], SpriteEdges::Wrap);
        assert!(screen.pixel(62, 31));
        assert!(screen.pixel(63, 31));
        assert!(screen.pixel(0, 31));
        assert!(screen.pixel(1, 31));
        assert!(screen.pixel(62, 0));
        assert!(screen.pixel(1, 0));
    }

    #[test]
    fn test_draw_sprite_clips() {
        let mut screen = Screen::new();
        screen.draw_sprite(62, 31, &[0xF0, 0xF0], SpriteEdges::Clip);
        assert!(screen.pixel(62, 31));
        assert!(screen.pixel(63, 31));
        assert!(!screen.pixel(0, 31));
        assert!(!screen.pixel(62, 0));
        assert_eq!(screen.pixels().iter().flatten().filter(|&&p| p).count(), 2);
    }

    #[test]
    fn test_draw_origin_wraps_even_when_clipping() {
        let mut screen = Screen::new();
        screen.draw_sprite(64 + 3, 32 + 1, &[0x80], SpriteEdges::Clip);
        assert!(screen.pixel(3, 1));
    }

    #[test]
    fn test_empty_sprite_leaves_screen_clean() {
        let mut screen = Screen::new();
        assert!(!screen.draw_sprite(0, 0, &[0x00, 0x00], SpriteEdges::Wrap));
        assert!(!screen.is_dirty());
    }
}
