mod board;
mod config;
mod direction;
mod error;
mod grid;
mod r#move; // r# to allow reserved keyword as name
mod state;
mod stats;
mod tile;
pub mod utils;

use std::{
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
  thread::{sleep, spawn},
  time::Duration,
};

pub use board::{Board, Error as BoardError};
pub use config::GridConfig;
pub use direction::{Direction, DirectionError};
pub use error::GridError;
pub use grid::Grid;
use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rayon::prelude::{IntoParallelIterator, ParallelIterator};
pub use r#move::MoveRecord; // r# to allow reserved keyword as name
pub use state::Outcome;
pub use stats::Stats;
pub use tile::{value_of, Position, Tile, TileId, MAX_LEVEL};
use utils::do_run;

#[cfg(all(feature = "jemalloc", not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

pub type Level = u8;
pub type Score = u64;

/// Play a single game with random moves until it ends or time runs out.
fn play_random_game(
  config: GridConfig,
  end: &AtomicBool,
  stats: &mut Stats,
) -> Result<(), GridError> {
  let mut grid = Grid::new(config)?;
  let mut rng = match config.seed {
    Some(seed) => StdRng::seed_from_u64(!seed),
    None => StdRng::from_entropy(),
  };

  while do_run(end) {
    let direction = *Direction::ALL.choose(&mut rng).unwrap_or(&Direction::Up);

    let outcome = grid.update(direction)?;
    stats.record_move();

    if outcome.is_end() {
      stats.finish_game(outcome, grid.score(), grid.highest_level().unwrap_or(0));
      break;
    }
  }

  Ok(())
}

/// Play random games on `threads` threads for `time_limit` seconds.
///
/// Each thread derives its own seed from `config.seed`, so seeded runs are
/// reproducible up to where the time limit cuts them.
///
/// # Errors
/// Returns an error if the config is invalid or the thread pool can't be built.
pub fn perf(
  time_limit: u64,
  threads: usize,
  config: GridConfig,
) -> Result<Stats, Box<dyn std::error::Error>> {
  config.validate()?;

  let time_limit = Duration::from_secs(time_limit);
  let end = Arc::new(AtomicBool::new(false));

  {
    let end = end.clone();
    spawn(move || {
      sleep(time_limit);
      end.store(true, Ordering::Release);
    });
  }

  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(threads)
    .thread_name(|index| format!("game-{index}"))
    .build()?;

  let stats = pool.install(|| {
    (0..threads)
      .into_par_iter()
      .map(|thread| -> Result<Stats, GridError> {
        let mut stats = Stats::new();
        let mut game: u64 = 0;

        while do_run(&end) {
          let config = GridConfig {
            seed: config.seed.map(|seed| seed ^ ((thread as u64) << 32) ^ game),
            ..config
          };

          play_random_game(config, &end, &mut stats)?;
          game += 1;
        }

        debug!("thread {thread} finished {} games", stats.games);

        Ok(stats)
      })
      .try_reduce(Stats::new, |a, b| Ok(a + b))
  })?;

  Ok(stats)
}
