use std::process::ExitCode;
use std::sync::mpsc;

use flappy_term::assets::{Assets, BuiltinAssets};
use flappy_term::audio::Sfx;
use flappy_term::config::{Geometry, SIZE};
use flappy_term::driver::FrameDriver;
use flappy_term::render::TerminalFrontend;
use flappy_term::term::Terminal;
use flappy_term::{Game, Result, input};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("flappy-term: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Before touching the terminal, so a bad asset is reported plainly.
    let assets = Assets::load(&BuiltinAssets)?;
    let geometry = Geometry::from_assets(&assets, SIZE)?;

    let seed: u64 = rand::random();
    log::info!("canvas {SIZE}x{SIZE}, distortion {}, seed {seed}", geometry.distortion);
    let mut game = Game::new(geometry, StdRng::seed_from_u64(seed));

    let sfx = match Sfx::new() {
        Ok(sfx) => Some(sfx),
        Err(e) => {
            log::warn!("running without sound: {e}");
            None
        }
    };

    let term = Terminal::enter()?;
    let (tx, rx) = mpsc::channel();
    input::spawn_reader(tx, term.key_releases)?;

    let mut frontend = TerminalFrontend::new(assets, SIZE as usize, sfx, term.cols, term.rows);
    FrameDriver::new(rx).run(&mut game, &mut frontend)
}
