use rand::{Rng, RngCore};

use crate::config::Quirks;
use crate::error::Result;
use crate::memory::glyph_addr;
use crate::opcode::Opcode;
use crate::state::State;

/// What an operation may touch besides the machine state
pub struct Context<'a> {
    pub quirks: Quirks,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> Context<'a> {
    pub fn new(quirks: Quirks, rng: &'a mut dyn RngCore) -> Self {
        Context { quirks, rng }
    }
}

/// An instruction's effect. The pc already points at the next instruction when it runs.
pub type Operation = fn(op: &dyn Opcode, state: &mut State, context: &mut Context) -> Result<()>;

/// clear
pub fn clr(_op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.screen.clear();
    Ok(())
}

/// PC = STACK.pop()
pub fn rts(_op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.pc = state.pop()?;
    Ok(())
}

/// PC = nnn
pub fn jump(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.pc = op.nnn();
    Ok(())
}

/// STACK.push(PC); PC = nnn
pub fn call(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.push(state.pc)?;
    state.pc = op.nnn();
    Ok(())
}

/// if Vx == nn then pc += 2
pub fn ske(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.skip_if(state.v[op.x()] == op.nn());
    Ok(())
}

/// if Vx != nn then pc += 2
pub fn skne(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.skip_if(state.v[op.x()] != op.nn());
    Ok(())
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.skip_if(state.v[op.x()] == state.v[op.y()]);
    Ok(())
}

/// Vx = nn
pub fn load(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.v[op.x()] = op.nn();
    Ok(())
}

/// Vx += nn
/// Add nn to Vx; allow for overflow but implicitly drop it, VF is untouched
pub fn add(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.v[op.x()] = state.v[op.x()].wrapping_add(op.nn());
    Ok(())
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.v[op.x()] = state.v[op.y()];
    Ok(())
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.v[op.x()] |= state.v[op.y()];
    Ok(())
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.v[op.x()] &= state.v[op.y()];
    Ok(())
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.v[op.x()] ^= state.v[op.y()];
    Ok(())
}

/// Vx += Vy; VF = overflow
pub fn addr(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    let (res, over) = state.v[op.x()].overflowing_add(state.v[op.y()]);
    state.set_with_flag(op.x(), res, u8::from(over));
    Ok(())
}

/// Vx -= Vy; VF = !borrow
pub fn sub(op: &dyn Opcode, state: &mut State, context: &mut Context) -> Result<()> {
    let (vx, vy) = (state.v[op.x()], state.v[op.y()]);
    let flag = context.quirks.subtract_flag.flag(vx, vy);
    state.set_with_flag(op.x(), vx.wrapping_sub(vy), flag);
    Ok(())
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    let vx = state.v[op.x()];
    state.set_with_flag(op.x(), vx >> 1, vx & 0x1);
    Ok(())
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn(op: &dyn Opcode, state: &mut State, context: &mut Context) -> Result<()> {
    let (vx, vy) = (state.v[op.x()], state.v[op.y()]);
    let flag = context.quirks.subtract_flag.flag(vy, vx);
    state.set_with_flag(op.x(), vy.wrapping_sub(vx), flag);
    Ok(())
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    let vx = state.v[op.x()];
    state.set_with_flag(op.x(), vx << 1, vx >> 7);
    Ok(())
}

/// if Vx != Vy then pc +=2
pub fn skrne(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.skip_if(state.v[op.x()] != state.v[op.y()]);
    Ok(())
}

/// I = nnn
pub fn loadi(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.i = op.nnn();
    Ok(())
}

/// PC = V0 + nnn
pub fn jumpi(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.pc = u16::from(state.v[0x0]) + op.nnn();
    Ok(())
}

/// Vx = rand_byte & nn
pub fn rand(op: &dyn Opcode, state: &mut State, context: &mut Context) -> Result<()> {
    let rand_byte: u8 = context.rng.gen();
    state.v[op.x()] = rand_byte & op.nn();
    Ok(())
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position Vx, Vy on the FrameBuffer.
/// Sets VF if any pixels were erased
pub fn draw(op: &dyn Opcode, state: &mut State, context: &mut Context) -> Result<()> {
    let (x, y) = (state.v[op.x()], state.v[op.y()]);
    let sprite = state.memory.slice(state.i, op.n() as usize)?;
    let collision = state
        .screen
        .draw_sprite(x, y, sprite, context.quirks.sprite_edges);
    state.v[0xF] = u8::from(collision);
    Ok(())
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.skip_if(state.is_pressed(state.v[op.x()]));
    Ok(())
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.skip_if(!state.is_pressed(state.v[op.x()]));
    Ok(())
}

/// Vx = DT
pub fn moved(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.v[op.x()] = state.delay_timer;
    Ok(())
}

/// await keypress for Vx
/// Without a held key the pc is wound back so this instruction runs again next step
pub fn keyd(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    match state.pressed_key() {
        Some(key) => state.v[op.x()] = key,
        None => state.pc = state.pc.wrapping_sub(0x2),
    }
    Ok(())
}

/// DT = Vx
pub fn loads(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.delay_timer = state.v[op.x()];
    Ok(())
}

/// ST = Vx
pub fn ld(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.sound_timer = state.v[op.x()];
    Ok(())
}

/// I += Vx
pub fn addi(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.i = state.i.wrapping_add(u16::from(state.v[op.x()]));
    Ok(())
}

/// I = FONT_ADDR + Vx * 5
/// Set I to the memory address of the glyph for the digit in Vx
pub fn ldspr(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state.i = glyph_addr(state.v[op.x()]);
    Ok(())
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    let vx = state.v[op.x()];
    let bcd = [vx / 100, vx / 10 % 10, vx % 10];
    state.memory.slice_mut(state.i, 3)?.copy_from_slice(&bcd);
    Ok(())
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    state
        .memory
        .slice_mut(state.i, op.x() + 1)?
        .copy_from_slice(&state.v[..=op.x()]);
    Ok(())
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: &dyn Opcode, state: &mut State, _context: &mut Context) -> Result<()> {
    let bytes = state.memory.slice(state.i, op.x() + 1)?;
    state.v[..=op.x()].copy_from_slice(bytes);
    Ok(())
}
