use std::path::Path;
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::machine::config::{FRAME_INTERVAL, PIXEL_ON, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::machine::cpu::{execute_cycle, tick_timers};
use crate::machine::error::Chip8Error;
use crate::machine::quirks::VmConfig;
use crate::machine::state::{create_state, set_key_state, EmulatorState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Key { key: usize, pressed: bool },
    Quit,
}

/// The I/O side of the host loop: produces key events, presents frames.
pub trait Frontend {
    fn poll_events(&mut self) -> Vec<HostEvent>;

    /// `frame` is row-major, one colour per pixel, `SCREEN_WIDTH * SCREEN_HEIGHT` long.
    fn present(&mut self, frame: &[u32]);
}

/// Runs frame ticks until the frontend asks to quit, `max_frames` is
/// reached, or the machine faults. Each tick is: one instruction, one
/// timer tick, input, redraw, then `frame_interval` of sleep.
pub fn run_host_loop<F: Frontend>(
    state: &mut EmulatorState,
    config: &VmConfig,
    frontend: &mut F,
    frame_interval: Duration,
    max_frames: Option<usize>,
) -> Result<usize, Chip8Error> {
    let mut frames = 0;

    while max_frames.map_or(true, |limit| frames < limit) {
        execute_cycle(state, config)?;
        tick_timers(state);

        let mut quit = false;
        for event in frontend.poll_events() {
            match event {
                HostEvent::Key { key, pressed } => set_key_state(state, key, pressed),
                HostEvent::Quit => quit = true,
            }
        }

        frontend.present(&state.display.to_rgba());
        state.should_draw = false;
        frames += 1;

        if quit {
            info!("stop requested after {frames} frames");
            break;
        }

        if !frame_interval.is_zero() {
            thread::sleep(frame_interval);
        }
    }

    debug!("host loop finished at pc=0x{:03x}", state.pc());
    Ok(frames)
}

/// Frontend with no window: replays scripted events and keeps the last frame.
#[derive(Debug, Default)]
pub struct HeadlessFrontend {
    script: Vec<(usize, HostEvent)>,
    polls: usize,
    pub frames_presented: usize,
    pub last_frame: Vec<u32>,
}

impl HeadlessFrontend {
    /// `script` pairs a frame number with an event delivered on that frame's poll.
    pub fn with_script(script: Vec<(usize, HostEvent)>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }
}

impl Frontend for HeadlessFrontend {
    fn poll_events(&mut self) -> Vec<HostEvent> {
        let frame = self.polls;
        self.polls += 1;
        self.script
            .iter()
            .filter(|(at, _)| *at == frame)
            .map(|(_, event)| *event)
            .collect()
    }

    fn present(&mut self, frame: &[u32]) {
        self.frames_presented += 1;
        self.last_frame = frame.to_vec();
    }
}

pub fn run_emulator_headless(
    config: &VmConfig,
    rom_path: &Path,
    max_frames: usize,
) -> Result<EmulatorState, Chip8Error> {
    if max_frames == 0 {
        return Err(Chip8Error::InvalidArgument("max_frames must be > 0"));
    }

    let mut state = create_state(Some(rom_path), config)?;
    let mut frontend = HeadlessFrontend::default();
    run_host_loop(
        &mut state,
        config,
        &mut frontend,
        Duration::ZERO,
        Some(max_frames),
    )?;

    Ok(state)
}

struct RaylibFrontend {
    rl: raylib::RaylibHandle,
    thread: raylib::RaylibThread,
    scale: i32,
}

const KEY_MAP: [(raylib::prelude::KeyboardKey, usize); 16] = {
    use raylib::prelude::KeyboardKey;
    [
        (KeyboardKey::KEY_ONE, 0x1),
        (KeyboardKey::KEY_TWO, 0x2),
        (KeyboardKey::KEY_THREE, 0x3),
        (KeyboardKey::KEY_FOUR, 0xC),
        (KeyboardKey::KEY_Q, 0x4),
        (KeyboardKey::KEY_W, 0x5),
        (KeyboardKey::KEY_E, 0x6),
        (KeyboardKey::KEY_R, 0xD),
        (KeyboardKey::KEY_A, 0x7),
        (KeyboardKey::KEY_S, 0x8),
        (KeyboardKey::KEY_D, 0x9),
        (KeyboardKey::KEY_F, 0xE),
        (KeyboardKey::KEY_Z, 0xA),
        (KeyboardKey::KEY_X, 0x0),
        (KeyboardKey::KEY_C, 0xB),
        (KeyboardKey::KEY_V, 0xF),
    ]
};

impl Frontend for RaylibFrontend {
    fn poll_events(&mut self) -> Vec<HostEvent> {
        use raylib::prelude::KeyboardKey;

        let mut events: Vec<HostEvent> = KEY_MAP
            .iter()
            .map(|(key, mapped)| HostEvent::Key {
                key: *mapped,
                pressed: self.rl.is_key_down(*key),
            })
            .collect();

        if self.rl.window_should_close() || self.rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
            events.push(HostEvent::Quit);
        }

        events
    }

    fn present(&mut self, frame: &[u32]) {
        use raylib::prelude::{Color, RaylibDraw};

        let scale = self.scale;
        let mut d = self.rl.begin_drawing(&self.thread);
        d.clear_background(Color::BLACK);
        for (index, colour) in frame.iter().enumerate() {
            if *colour != PIXEL_ON {
                continue;
            }
            let x = (index % SCREEN_WIDTH) as i32;
            let y = (index / SCREEN_WIDTH) as i32;
            d.draw_rectangle(x * scale, y * scale, scale, scale, Color::WHITE);
        }
    }
}

pub fn run_emulator_app(
    config: &VmConfig,
    rom_path: &Path,
    scale: usize,
) -> Result<EmulatorState, Chip8Error> {
    if scale == 0 {
        return Err(Chip8Error::InvalidArgument("scale must be > 0"));
    }

    // ROM problems surface before a window ever opens.
    let mut state = create_state(Some(rom_path), config)?;

    let width = (SCREEN_WIDTH * scale) as i32;
    let height = (SCREEN_HEIGHT * scale) as i32;
    let (mut rl, thread) = raylib::init()
        .size(width, height)
        .title("chip8-vm")
        .build();
    rl.set_exit_key(None);

    let mut frontend = RaylibFrontend {
        rl,
        thread,
        scale: scale as i32,
    };

    info!("running {} at {:?} per frame", rom_path.display(), FRAME_INTERVAL);
    run_host_loop(&mut state, config, &mut frontend, FRAME_INTERVAL, None)?;

    Ok(state)
}
