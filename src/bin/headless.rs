use std::env;
use std::process::ExitCode;
use std::time::Instant;

use famicore::{Joypad, NES, NullSink, Rom};

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(rom_path) = args.next() else {
        eprintln!("usage: headless <rom-path> [frames]");
        return ExitCode::FAILURE;
    };
    let frames: u64 = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(60);

    let rom = match Rom::load(&rom_path) {
        Ok(rom) => rom,
        Err(err) => {
            eprintln!("{rom_path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut nes = NES::new(
        Box::new(NullSink),
        Box::new(Joypad::new()),
        Box::new(Joypad::new()),
    );
    nes.insert_cartridge(&rom);

    let start = Instant::now();
    for frame in 0..frames {
        if let Err(err) = nes.run_frame() {
            eprintln!("frame {frame}: {err}");
            return ExitCode::FAILURE;
        }
    }

    println!("{frames} frames in {:.2?}", start.elapsed());
    ExitCode::SUCCESS
}
