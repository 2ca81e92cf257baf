use log::{trace, warn};
use rand::Rng;

use crate::machine::config::{ADDRESS_MASK, FLAG_REGISTER, FONT_GLYPH_SIZE, MEMORY_SIZE};
use crate::machine::error::Chip8Error;
use crate::machine::instruction::Instruction;
use crate::machine::quirks::{Chip8Quirks, VmConfig};
use crate::machine::state::{clear_display, first_pressed_key, EmulatorState};

/// One fetch/decode/execute step. PC is advanced past the fetched word
/// before the instruction runs, so jumps and skips act on the new value.
pub fn execute_cycle(state: &mut EmulatorState, config: &VmConfig) -> Result<(), Chip8Error> {
    let pc = state.pc();
    if pc > (MEMORY_SIZE - 2) {
        return Err(Chip8Error::ProgramCounterOutOfBounds(pc));
    }

    let opcode = state.memory.read_word(pc)?;
    state.registers.pc += 2;

    execute_opcode(state, opcode, config)
}

/// Decode and run `opcode` against the current state without fetching.
pub fn execute_opcode(
    state: &mut EmulatorState,
    opcode: u16,
    config: &VmConfig,
) -> Result<(), Chip8Error> {
    state.op = opcode;

    match Instruction::decode(opcode) {
        Ok(instruction) => {
            trace!("0x{:03x}: {opcode:04x} {instruction}", state.pc().wrapping_sub(2));
            execute_instruction(state, instruction, config.quirks)
        }
        Err(error) if config.strict => Err(error),
        Err(_) => {
            warn!(
                "skipping unimplemented opcode 0x{opcode:04x} at 0x{:03x}",
                state.pc().wrapping_sub(2)
            );
            Ok(())
        }
    }
}

/// Decrements both 60 Hz timers. Driven by the host loop, not by
/// `execute_cycle`.
pub fn tick_timers(state: &mut EmulatorState) {
    state.delay_timer = state.delay_timer.saturating_sub(1);
    state.sound_timer = state.sound_timer.saturating_sub(1);
}

fn skip_next_if(state: &mut EmulatorState, condition: bool) {
    if condition {
        state.registers.pc += 2;
    }
}

pub fn execute_instruction(
    state: &mut EmulatorState,
    instruction: Instruction,
    quirks: Chip8Quirks,
) -> Result<(), Chip8Error> {
    let v = &mut state.registers.v;

    match instruction {
        Instruction::ClearScreen => clear_display(state),
        Instruction::Return => {
            state.registers.pc = state.stack.pop()?;
        }
        Instruction::Jump { nnn } => state.registers.pc = nnn,
        Instruction::Call { nnn } => {
            state.stack.push(state.registers.pc)?;
            state.registers.pc = nnn;
        }
        Instruction::SkipIfEqualByte { x, kk } => {
            let condition = v[x] == kk;
            skip_next_if(state, condition);
        }
        Instruction::SkipIfNotEqualByte { x, kk } => {
            let condition = v[x] != kk;
            skip_next_if(state, condition);
        }
        Instruction::SkipIfEqualRegister { x, y } => {
            let condition = v[x] == v[y];
            skip_next_if(state, condition);
        }
        Instruction::LoadByte { x, kk } => v[x] = kk,
        Instruction::AddByte { x, kk } => v[x] = v[x].wrapping_add(kk),
        Instruction::Load { x, y } => v[x] = v[y],
        Instruction::Or { x, y } => v[x] |= v[y],
        Instruction::And { x, y } => v[x] &= v[y],
        Instruction::Xor { x, y } => v[x] ^= v[y],
        Instruction::AddRegister { x, y } => {
            let (result, carry) = v[x].overflowing_add(v[y]);
            v[x] = result;
            v[FLAG_REGISTER] = u8::from(carry);
        }
        Instruction::Sub { x, y } => {
            let no_borrow = v[x] >= v[y];
            v[x] = v[x].wrapping_sub(v[y]);
            v[FLAG_REGISTER] = u8::from(no_borrow);
        }
        Instruction::ShiftRight { x, y } => {
            let value = if quirks.shift_uses_vy { v[y] } else { v[x] };
            v[x] = value >> 1;
            v[FLAG_REGISTER] = value & 0x1;
        }
        Instruction::SubReverse { x, y } => {
            let no_borrow = v[y] >= v[x];
            v[x] = v[y].wrapping_sub(v[x]);
            v[FLAG_REGISTER] = u8::from(no_borrow);
        }
        Instruction::ShiftLeft { x, y } => {
            let value = if quirks.shift_uses_vy { v[y] } else { v[x] };
            v[x] = value << 1;
            v[FLAG_REGISTER] = (value & 0x80) >> 7;
        }
        Instruction::SkipIfNotEqualRegister { x, y } => {
            let condition = v[x] != v[y];
            skip_next_if(state, condition);
        }
        Instruction::LoadIndex { nnn } => state.registers.i = nnn,
        Instruction::JumpOffset { nnn } => {
            state.registers.pc = (nnn + v[0] as u16) & ADDRESS_MASK;
        }
        Instruction::Random { x, kk } => {
            let byte: u8 = state.rng.gen();
            state.registers.v[x] = byte & kk;
        }
        Instruction::Draw { x, y, n } => draw_sprite(state, x, y, n)?,
        Instruction::SkipIfKeyPressed { x } => {
            let condition = state.keypad.is_pressed((v[x] & 0x0F) as usize);
            skip_next_if(state, condition);
        }
        Instruction::SkipIfKeyNotPressed { x } => {
            let condition = !state.keypad.is_pressed((v[x] & 0x0F) as usize);
            skip_next_if(state, condition);
        }
        Instruction::LoadDelayTimer { x } => v[x] = state.delay_timer,
        Instruction::WaitForKey { x } => match first_pressed_key(state) {
            Some(key) => state.registers.v[x] = key,
            None => state.registers.pc = state.registers.pc.saturating_sub(2),
        },
        Instruction::SetDelayTimer { x } => state.delay_timer = v[x],
        Instruction::SetSoundTimer { x } => state.sound_timer = v[x],
        Instruction::AddIndex { x } => {
            state.registers.i = state.registers.i.wrapping_add(v[x] as u16) & ADDRESS_MASK;
        }
        Instruction::LoadFontSprite { x } => {
            state.registers.i = ((v[x] & 0x0F) as usize * FONT_GLYPH_SIZE) as u16;
        }
        Instruction::StoreBcd { x } => {
            let value = v[x];
            let index = state.registers.i as usize;
            state.memory.write(index, value / 100)?;
            state.memory.write(index + 1, (value % 100) / 10)?;
            state.memory.write(index + 2, value % 10)?;
        }
        Instruction::StoreRegisters { x } => {
            let index = state.registers.i as usize;
            state.memory.load(index, &state.registers.v[..=x])?;
            advance_index_after_transfer(state, x, quirks);
        }
        Instruction::LoadRegisters { x } => {
            let index = state.registers.i as usize;
            let bytes = state.memory.slice(index, x + 1)?;
            state.registers.v[..=x].copy_from_slice(bytes);
            advance_index_after_transfer(state, x, quirks);
        }
    }

    Ok(())
}

fn advance_index_after_transfer(state: &mut EmulatorState, x: usize, quirks: Chip8Quirks) {
    if quirks.load_store_increment_i {
        state.registers.i = state.registers.i.wrapping_add(x as u16 + 1) & ADDRESS_MASK;
    }
}

/// XORs an n-row sprite from memory[I..I+n] onto the display at (Vx, Vy).
/// Every coordinate wraps; VF ends up 1 iff some lit pixel was erased.
fn draw_sprite(state: &mut EmulatorState, x: usize, y: usize, n: u8) -> Result<(), Chip8Error> {
    let x_start = state.registers.v[x] as usize;
    let y_start = state.registers.v[y] as usize;
    let sprite = state.memory.slice(state.registers.i as usize, n as usize)?;

    let mut collision = false;
    for (row, sprite_row) in sprite.iter().enumerate() {
        for bit in 0..8 {
            if (sprite_row >> (7 - bit)) & 0x1 == 0 {
                continue;
            }
            collision |= state.display.toggle(x_start + bit, y_start + row);
        }
    }

    state.registers.v[FLAG_REGISTER] = u8::from(collision);
    state.should_draw = true;

    Ok(())
}
