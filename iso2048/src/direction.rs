use std::{fmt, ops::Not, str::FromStr};

/// Direction of a single move.
///
/// `Up` and `Right` push tiles towards the high coordinates,
/// `Down` and `Left` towards zero.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
  Up,
  Right,
  Down,
  Left,
}

#[derive(Debug)]
pub struct DirectionError(String);
impl fmt::Display for DirectionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unknown direction: {:?}", self.0)
  }
}
impl std::error::Error for DirectionError {}

impl Direction {
  pub const ALL: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
  ];

  /// Unit displacement `(dx, dy)` of one step in this direction.
  pub fn offset(self) -> (i8, i8) {
    match self {
      Direction::Up => (0, 1),
      Direction::Right => (1, 0),
      Direction::Down => (0, -1),
      Direction::Left => (-1, 0),
    }
  }

  /// Whether the board has to be walked from the high coordinates down.
  pub fn towards_high(self) -> bool {
    matches!(self, Direction::Up | Direction::Right)
  }

  pub fn char(self) -> char {
    match self {
      Direction::Up => 'w',
      Direction::Right => 'd',
      Direction::Down => 's',
      Direction::Left => 'a',
    }
  }

  pub fn from_char(c: char) -> Result<Self, DirectionError> {
    match c.to_ascii_lowercase() {
      'w' | 'k' => Ok(Direction::Up),
      'd' | 'l' => Ok(Direction::Right),
      's' | 'j' => Ok(Direction::Down),
      'a' | 'h' => Ok(Direction::Left),
      _ => Err(DirectionError(c.to_string())),
    }
  }
}
impl Not for Direction {
  type Output = Self;

  fn not(self) -> Self::Output {
    match self {
      Direction::Up => Direction::Down,
      Direction::Right => Direction::Left,
      Direction::Down => Direction::Up,
      Direction::Left => Direction::Right,
    }
  }
}
impl fmt::Display for Direction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}",
      match self {
        Direction::Up => "up",
        Direction::Right => "right",
        Direction::Down => "down",
        Direction::Left => "left",
      }
    )
  }
}
impl FromStr for Direction {
  type Err = DirectionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    let mut chars = s.chars();

    if let (Some(c), None) = (chars.next(), chars.next()) {
      return Direction::from_char(c);
    }

    match s.to_ascii_lowercase().as_str() {
      "up" => Ok(Direction::Up),
      "right" => Ok(Direction::Right),
      "down" => Ok(Direction::Down),
      "left" => Ok(Direction::Left),
      _ => Err(DirectionError(s.to_owned())),
    }
  }
}
