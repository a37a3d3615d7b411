use std::{
  fmt,
  ops::{Add, AddAssign},
};

use super::{state::Outcome, tile::value_of, utils::format_number, Level, Score};

/// Totals collected over a batch of played games.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Stats {
  pub games: u32,
  pub moves: u64,
  pub wins: u32,
  pub losses: u32,
  pub best_score: Score,
  pub highest_level: Level,
}
impl Stats {
  pub fn new() -> Stats {
    Stats::default()
  }

  pub fn record_move(&mut self) {
    self.moves += 1;
  }

  /// Account for a finished game.
  pub fn finish_game(&mut self, outcome: Outcome, score: Score, highest_level: Level) {
    self.games += 1;

    match outcome {
      Outcome::Won => self.wins += 1,
      Outcome::Lost => self.losses += 1,
      Outcome::Continues => {}
    }

    self.best_score = self.best_score.max(score);
    self.highest_level = self.highest_level.max(highest_level);
  }
}
impl fmt::Display for Stats {
  #[allow(clippy::cast_precision_loss)]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
      f,
      "Games played: {} ({} won, {} lost)",
      self.games, self.wins, self.losses
    )?;
    writeln!(
      f,
      "Moves made: {} ({})",
      self.moves,
      format_number(self.moves as f32)
    )?;
    write!(
      f,
      "Best score: {}, highest tile: {}",
      self.best_score,
      value_of(self.highest_level)
    )
  }
}
impl Add for Stats {
  type Output = Stats;

  fn add(self, other: Stats) -> Self::Output {
    Stats {
      games: self.games + other.games,
      moves: self.moves + other.moves,
      wins: self.wins + other.wins,
      losses: self.losses + other.losses,
      best_score: self.best_score.max(other.best_score),
      highest_level: self.highest_level.max(other.highest_level),
    }
  }
}
impl AddAssign for Stats {
  fn add_assign(&mut self, other: Stats) {
    *self = *self + other;
  }
}
