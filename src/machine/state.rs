use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::machine::config::{FONT_BYTES, MAX_ROM_SIZE, PROGRAM_START};
use crate::machine::display::DisplayBuffer;
use crate::machine::error::Chip8Error;
use crate::machine::keypad::Keypad;
use crate::machine::memory::{CallStack, Memory, Registers};
use crate::machine::quirks::VmConfig;

/// The whole machine. Operations take it by `&mut` explicitly; there is no
/// global VM.
#[derive(Debug, Clone)]
pub struct EmulatorState {
    pub memory: Memory,
    pub registers: Registers,
    pub stack: CallStack,
    pub keypad: Keypad,
    pub display: DisplayBuffer,
    pub delay_timer: u8,
    pub sound_timer: u8,
    /// Set by draw/clear, cleared by the host once it has presented.
    pub should_draw: bool,
    /// Last opcode fetched or executed.
    pub op: u16,
    pub rom_path: Option<PathBuf>,
    pub(crate) rng: StdRng,
}

impl EmulatorState {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            memory: Memory::default(),
            registers: Registers::default(),
            stack: CallStack::default(),
            keypad: Keypad::default(),
            display: DisplayBuffer::default(),
            delay_timer: 0,
            sound_timer: 0,
            should_draw: true,
            op: 0,
            rom_path: None,
            rng,
        }
    }

    pub fn pc(&self) -> usize {
        self.registers.pc as usize
    }
}

/// Fresh machine with the font loaded and, if given, the ROM at 0x200.
pub fn create_state(
    rom_path: Option<&Path>,
    config: &VmConfig,
) -> Result<EmulatorState, Chip8Error> {
    let mut state = EmulatorState::new(config.seed);
    reset_state(&mut state, rom_path)?;
    Ok(state)
}

/// Zeroes everything except the RNG, reloads the font and the ROM.
pub fn reset_state(state: &mut EmulatorState, rom_path: Option<&Path>) -> Result<(), Chip8Error> {
    state.memory.clear();
    state.registers = Registers::default();
    state.stack.clear();
    state.keypad.release_all();
    clear_display(state);

    state.delay_timer = 0;
    state.sound_timer = 0;
    state.op = 0;

    load_font(state);
    debug!("state reset, font loaded at 0x000");

    if let Some(path) = rom_path {
        state.rom_path = Some(path.to_path_buf());
    }

    if let Some(path) = state.rom_path.clone() {
        load_rom(state, &path)?;
    }

    Ok(())
}

pub fn clear_display(state: &mut EmulatorState) {
    state.display.clear();
    state.should_draw = true;
}

pub fn load_font(state: &mut EmulatorState) {
    // 80 bytes at address zero always fit.
    let _ = state.memory.load(0, &FONT_BYTES);
}

pub fn load_rom(state: &mut EmulatorState, path: &Path) -> Result<(), Chip8Error> {
    let rom_bytes = fs::read(path)?;
    load_rom_bytes(state, &rom_bytes)?;
    state.rom_path = Some(path.to_path_buf());
    info!("loaded {} ({} bytes)", path.display(), rom_bytes.len());
    Ok(())
}

/// Copies `rom_bytes` to 0x200 and points PC at it. Oversized images are
/// rejected before memory is touched.
pub fn load_rom_bytes(state: &mut EmulatorState, rom_bytes: &[u8]) -> Result<(), Chip8Error> {
    if rom_bytes.len() > MAX_ROM_SIZE {
        return Err(Chip8Error::RomTooLarge {
            size: rom_bytes.len(),
            max: MAX_ROM_SIZE,
        });
    }

    state.memory.load(PROGRAM_START, rom_bytes)?;
    state.registers.pc = PROGRAM_START as u16;
    debug!(
        "rom occupies 0x{:03x}..0x{:03x}",
        PROGRAM_START,
        PROGRAM_START + rom_bytes.len()
    );

    Ok(())
}

pub fn first_pressed_key(state: &EmulatorState) -> Option<u8> {
    state.keypad.first_pressed()
}

pub fn set_key_state(state: &mut EmulatorState, key_index: usize, is_pressed: bool) {
    state.keypad.set_key(key_index, is_pressed);
}
