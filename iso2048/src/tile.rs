use std::fmt;

use super::{Level, Score};

/// Highest level that still has a letter in the text form of a board (`z`).
pub const MAX_LEVEL: Level = 25;

/// Identity of a tile, stable while the tile only slides around.
pub type TileId = u32;

/// Represents a position on the board.
///
/// `x` grows to the right, `y` grows upwards.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Position {
  /// x coordinate
  pub x: u8,
  /// y coordinate
  pub y: u8,
}
impl Position {
  pub fn new(x: u8, y: u8) -> Position {
    Position { x, y }
  }

  /// Flat index of the position, `x + y * size`.
  pub fn index(self, size: u8) -> usize {
    usize::from(size) * usize::from(self.y) + usize::from(self.x)
  }
}
impl fmt::Debug for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}
impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{self:?}")
  }
}

/// A single piece on the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tile {
  pub id: TileId,
  pub level: Level,
  pub position: Position,
}
impl Tile {
  /// Value shown to the player, `2^(level + 1)`.
  pub fn value(&self) -> Score {
    value_of(self.level)
  }

  pub fn char(&self) -> char {
    level_char(self.level)
  }
}

/// Value of a tile of the given level.
///
/// Merging two tiles of level `L` scores `value_of(L)`.
pub fn value_of(level: Level) -> Score {
  1 << (u32::from(level) + 1)
}

pub(crate) fn level_char(level: Level) -> char {
  if level > MAX_LEVEL {
    return '*';
  }

  char::from(b'a' + level)
}

pub(crate) fn char_level(c: char) -> Option<Level> {
  match c {
    'a'..='z' => Some(c as u8 - b'a'),
    _ => None,
  }
}
