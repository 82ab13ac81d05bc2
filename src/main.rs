//! Brickfall headless runner
//!
//! Plays a session on autopilot at a fixed 60 fps and prints a JSON summary.
//!
//! ```text
//! brickfall [--seconds N] [--seed N] [--tuning FILE] [--levels FILE] [--scores FILE]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::process;

    use clap::Parser;
    use serde::Serialize;

    use brickfall::persistence::{FileStore, HighScoreStore, MemoryStore};
    use brickfall::sim::{EventKind, GamePhase, LevelDef, builtin_levels, levels_from_json};
    use brickfall::{Game, HighScore, Tuning};

    const FRAME_DT: f32 = 1.0 / 60.0;

    /// Play a Brickfall session on autopilot and print a JSON summary
    #[derive(Debug, Parser)]
    #[command(name = "brickfall", version)]
    struct Options {
        /// Simulated seconds to play before stopping
        #[arg(long, value_name = "SECONDS", default_value_t = 120.0)]
        seconds: f32,
        /// Seed for power-up rolls
        #[arg(long, default_value_t = 12345)]
        seed: u64,
        /// JSON file overriding tuning values
        #[arg(long, value_name = "FILE")]
        tuning: Option<PathBuf>,
        /// JSON file with the level set
        #[arg(long, value_name = "FILE")]
        levels: Option<PathBuf>,
        /// JSON file the high score is kept in (memory only when omitted)
        #[arg(long, value_name = "FILE")]
        scores: Option<PathBuf>,
    }

    #[derive(Serialize)]
    struct RunSummary {
        seed: u64,
        ticks: u64,
        phase: GamePhase,
        level: usize,
        score: u64,
        lives: u8,
        high_score: HighScore,
        events: BTreeMap<String, u32>,
    }

    fn load_tuning(path: Option<&Path>) -> Result<Tuning, String> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
        Tuning::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
    }

    fn load_levels(path: Option<&Path>) -> Result<Vec<LevelDef>, String> {
        let Some(path) = path else {
            return Ok(builtin_levels());
        };
        let json = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
        levels_from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
    }

    /// Autopilot until the time runs out or the session ends
    fn run<S: HighScoreStore>(mut game: Game<S>, opts: &Options) -> RunSummary {
        game.input_mut().autopilot = true;
        let frames = (opts.seconds.max(0.0) / FRAME_DT).round() as u64;
        let mut events: BTreeMap<String, u32> = BTreeMap::new();
        let mut ticks = 0;

        for _ in 0..frames {
            if game.state().phase == GamePhase::Start {
                game.input_mut().start = true;
            }
            for event in game.step(FRAME_DT) {
                if matches!(event.kind, EventKind::LevelComplete | EventKind::NewHighScore) {
                    log::info!("{:?} (score {})", event.kind, game.state().score);
                }
                *events.entry(format!("{:?}", event.kind)).or_default() += 1;
            }
            ticks += 1;
            if matches!(game.state().phase, GamePhase::GameOver | GamePhase::Win) {
                break;
            }
        }
        game.flush();

        let state = game.state();
        RunSummary {
            seed: opts.seed,
            ticks,
            phase: state.phase,
            level: state.level,
            score: state.score,
            lives: state.lives,
            high_score: game.saved_high_score(),
            events,
        }
    }

    pub fn main() {
        brickfall::platform::init_logging();
        log::info!("Brickfall (headless) starting...");

        let opts = Options::parse();
        let setup = load_tuning(opts.tuning.as_deref())
            .and_then(|tuning| Ok((tuning, load_levels(opts.levels.as_deref())?)));
        let (tuning, levels) = match setup {
            Ok(setup) => setup,
            Err(e) => {
                log::error!("{e}");
                process::exit(1);
            }
        };

        let summary = match opts.scores.as_deref() {
            Some(path) => run(Game::new(tuning, levels, opts.seed, FileStore::new(path)), &opts),
            None => run(Game::new(tuning, levels, opts.seed, MemoryStore::new()), &opts),
        };

        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                log::error!("Could not encode summary: {e}");
                process::exit(1);
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `brickfall::Game` directly
}
