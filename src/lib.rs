pub mod machine;

pub use machine::app::{
    run_emulator_app, run_emulator_headless, run_host_loop, Frontend, HeadlessFrontend, HostEvent,
};
pub use machine::config::{
    FONT_BYTES, FRAME_INTERVAL, MAX_ROM_SIZE, MEMORY_SIZE, PIXEL_OFF, PIXEL_ON, PROGRAM_START,
    SCREEN_HEIGHT, SCREEN_WIDTH, STACK_DEPTH,
};
pub use machine::cpu::{execute_cycle, execute_instruction, execute_opcode, tick_timers};
pub use machine::display::DisplayBuffer;
pub use machine::error::Chip8Error;
pub use machine::instruction::Instruction;
pub use machine::keypad::Keypad;
pub use machine::memory::{CallStack, Memory, Registers};
pub use machine::quirks::{
    load_quirks_profile, load_quirks_profile_from_env, Chip8Quirks, VmConfig, MODERN_QUIRKS,
    ORIGINAL_QUIRKS,
};
pub use machine::state::{
    clear_display, create_state, first_pressed_key, load_font, load_rom, load_rom_bytes,
    reset_state, set_key_state, EmulatorState,
};
