use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info};

use chip8vm::term::Terminal;
use chip8vm::{AddFlag, Chip8, Chip8Error, Config, Rom};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// A Chip-8 interpreter for the terminal.
struct Cli {
    /// The binary ROM file to run
    #[arg(long, value_name = "BINARY")]
    rom: PathBuf,

    /// Instructions executed per frame
    #[arg(long, default_value_t = 10)]
    cycles_per_frame: usize,

    /// Frames per second; the timers tick once per frame
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    fps: u32,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Always set VF after 8xy4, regardless of carry
    #[arg(long)]
    legacy_add_flag: bool,
}

fn main() {
    env_logger::init();
    let args = Cli::parse();

    if let Err(e) = run(&args) {
        error!("{e}");
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(args: &Cli) -> Result<(), Chip8Error> {
    let rom = Rom::from_file(&args.rom)?;

    let mut config = Config::default();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if args.legacy_add_flag {
        config = config.with_add_flag(AddFlag::AlwaysSet);
    }

    let mut chip8 = Chip8::with_config(config);
    chip8.load(&rom)?;
    info!("running {}", args.rom.display());

    let frame = Duration::from_secs(1) / args.fps;
    let mut term = Terminal::new()?;
    let mut deadline = Instant::now();
    while term.poll_input(&mut chip8)? {
        chip8.run(args.cycles_per_frame)?;
        chip8.tick_timers();
        term.render(&chip8)?;

        deadline += frame;
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        } else {
            // running behind; don't try to catch up
            deadline = now;
        }
    }
    Ok(())
}
