/// Result of a single update, read by whoever owns the game.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Outcome {
  Continues,
  /// The winning level was reached for the first time in this update.
  Won,
  /// The board is full and nothing can merge.
  Lost,
}
impl Outcome {
  pub fn is_end(self) -> bool {
    !matches!(self, Self::Continues)
  }
}
