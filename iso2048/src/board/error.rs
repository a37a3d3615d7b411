use std::{error, fmt};

use crate::Level;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
  TooSmall {
    size: usize,
  },
  TooLarge {
    size: usize,
  },
  NotSquare {
    height: usize,
    line: usize,
    width: usize,
  },
  InvalidLevel {
    level: Level,
  },
  InvalidTile {
    line: usize,
    tile: char,
  },
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Error::TooSmall { size } => write!(f, "board too small: {size}, but minimum is 2"),
      Error::TooLarge { size } => write!(f, "board too large: {size}, but maximum is 16"),
      Error::NotSquare {
        height,
        line,
        width,
      } => {
        write!(
          f,
          "board is not a square: line {line} is {width} tiles wide, but {height} was expected"
        )
      }
      Error::InvalidLevel { level } => write!(f, "tile level {level} is out of range"),
      Error::InvalidTile { line, tile } => write!(f, "unexpected tile {tile:?} on line {line}"),
    }
  }
}
impl error::Error for Error {}
