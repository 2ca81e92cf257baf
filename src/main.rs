use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use chip8_vm::{
    load_quirks_profile, load_quirks_profile_from_env, run_emulator_app, run_emulator_headless,
    Chip8Error, VmConfig,
};

#[derive(Debug, Parser)]
#[command(name = "chip8-vm")]
#[command(about = "Run a CHIP-8 ROM")]
struct Args {
    /// ROM image, loaded at 0x200
    rom: PathBuf,

    /// Treat unknown opcodes as fatal instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Quirk profile; falls back to CHIP8_QUIRKS, then "original"
    #[arg(long, value_parser = ["original", "modern"])]
    quirks: Option<String>,

    #[arg(long, default_value_t = 12)]
    scale: usize,

    /// Seed for the RND instruction
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    headless: bool,

    #[arg(long, default_value_t = 2000)]
    max_frames: usize,
}

fn build_config(args: &Args) -> Result<VmConfig, Chip8Error> {
    let quirks = match &args.quirks {
        Some(profile) => load_quirks_profile(profile)
            .map_err(|_| Chip8Error::InvalidArgument("quirks must be original or modern"))?,
        None => {
            let (profile, quirks) = load_quirks_profile_from_env()
                .map_err(|_| Chip8Error::InvalidArgument("CHIP8_QUIRKS must be original or modern"))?;
            info!("using {profile} quirks");
            quirks
        }
    };

    Ok(VmConfig {
        quirks,
        strict: args.strict,
        seed: args.seed,
    })
}

fn run(args: &Args) -> Result<(), Chip8Error> {
    let config = build_config(args)?;

    if args.headless {
        let state = run_emulator_headless(&config, &args.rom, args.max_frames)?;
        println!(
            "headless finished: pc=0x{:03x} lit_pixels={}",
            state.pc(),
            state.display.lit_count()
        );
        return Ok(());
    }

    run_emulator_app(&config, &args.rom, args.scale)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("chip8-vm: {err}");
            ExitCode::FAILURE
        }
    }
}
