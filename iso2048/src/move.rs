use std::fmt;

use super::{
  tile::{Position, TileId},
  Level,
};

/// Displacement of one tile during a single update.
///
/// Tiles that stayed in place are recorded too, with `from == to`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
  /// Tile that moved
  pub tile: TileId,
  pub from: Position,
  pub to: Position,
  /// Level after the move, one higher than before if merged
  pub level: Level,
  pub merged: bool,
  /// Where the tile merged into started this update
  pub absorbed_from: Option<Position>,
}
impl MoveRecord {
  pub fn is_shift(&self) -> bool {
    self.from != self.to
  }
}
impl fmt::Debug for MoveRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "(#{}: {:?} -> {:?}, {}",
      self.tile, self.from, self.to, self.level
    )?;

    match self.absorbed_from {
      Some(absorbed) => write!(f, ", merged with {absorbed:?})"),
      None if self.merged => write!(f, ", merged)"),
      None => write!(f, ")"),
    }
  }
}
