use std::{error::Error, fmt::Display};

use crate::board;

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum GridError {
  NoFreeCells,
  InvalidConfig(String),
  MisshapedBoard(board::Error),
}

impl Error for GridError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      GridError::MisshapedBoard(error) => Some(error),
      _ => None,
    }
  }
}

impl Display for GridError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      GridError::NoFreeCells => write!(f, "no free cells left to spawn a tile"),
      GridError::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
      GridError::MisshapedBoard(error) => write!(f, "{error}"),
    }
  }
}

impl From<board::Error> for GridError {
  fn from(error: board::Error) -> Self {
    GridError::MisshapedBoard(error)
  }
}
