use crate::{
  board::{MAX_SIZE, MIN_SIZE},
  error::GridError,
  tile::MAX_LEVEL,
  Level,
};

pub const DEFAULT_BOARD_SIZE: u8 = 4;
pub const DEFAULT_WIN_LEVEL: Level = 10;

/// Settings a `Grid` is created with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridConfig {
  /// Side length of the board
  pub board_size: u8,
  /// Level that wins the game, 10 is the 2048 tile
  pub win_level: Level,
  /// Seed for tile spawning, random when `None`
  pub seed: Option<u64>,
}

impl Default for GridConfig {
  fn default() -> Self {
    GridConfig {
      board_size: DEFAULT_BOARD_SIZE,
      win_level: DEFAULT_WIN_LEVEL,
      seed: None,
    }
  }
}

impl GridConfig {
  pub fn with_seed(seed: u64) -> Self {
    GridConfig {
      seed: Some(seed),
      ..Default::default()
    }
  }

  /// Check the config describes a playable game.
  ///
  /// # Errors
  /// Returns an error if the board size or the winning level is out of range.
  pub fn validate(&self) -> Result<(), GridError> {
    let size = usize::from(self.board_size);

    if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
      return Err(GridError::InvalidConfig(format!(
        "board size {size} is outside of {MIN_SIZE}..={MAX_SIZE}"
      )));
    }

    if !(1..=MAX_LEVEL).contains(&self.win_level) {
      return Err(GridError::InvalidConfig(format!(
        "winning level {} is outside of 1..={MAX_LEVEL}",
        self.win_level
      )));
    }

    Ok(())
  }
}
