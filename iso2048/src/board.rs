mod error;

use std::{fmt, str::FromStr};

pub use error::Error;

use super::{
  direction::Direction,
  tile::{char_level, Position, Tile, TileId, MAX_LEVEL},
  Level,
};

pub const MIN_SIZE: usize = 2;
pub const MAX_SIZE: usize = 16;

/// A square board of optional tiles.
///
/// Every stored tile knows its own position, and that position always matches
/// the cell it is stored in.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
  size: u8,
  data: Box<[Option<Tile>]>,
}

impl Board {
  /// Create a new board from rows of levels.
  ///
  /// The first row is the top of the board (`y = size - 1`). Tiles get ids
  /// in the order they are read.
  ///
  /// # Errors
  /// Returns an error if the board is not a square, has an unsupported size
  /// or contains a level above [`MAX_LEVEL`].
  pub fn new(rows: Vec<Vec<Option<Level>>>) -> Result<Board, Error> {
    let height = rows.len();

    if height < MIN_SIZE {
      return Err(Error::TooSmall { size: height });
    }
    if height > MAX_SIZE {
      return Err(Error::TooLarge { size: height });
    }

    for (index, row) in rows.iter().enumerate() {
      if row.len() != height {
        return Err(Error::NotSquare {
          height,
          line: index + 1,
          width: row.len(),
        });
      }
    }

    #[allow(clippy::cast_possible_truncation)]
    let size = height as u8;
    let mut board = Board::new_empty(size);
    let mut id: TileId = 0;

    for (line, row) in rows.into_iter().enumerate() {
      #[allow(clippy::cast_possible_truncation)]
      let y = size - 1 - line as u8;

      for (x, level) in row.into_iter().enumerate() {
        let Some(level) = level else {
          continue;
        };

        if level > MAX_LEVEL {
          return Err(Error::InvalidLevel { level });
        }

        #[allow(clippy::cast_possible_truncation)]
        let position = Position::new(x as u8, y);
        board.insert(Tile {
          id,
          level,
          position,
        });
        id += 1;
      }
    }

    Ok(board)
  }

  /// Create an empty board of the given size.
  ///
  /// # Panics
  /// Panics if the size is outside of `MIN_SIZE..=MAX_SIZE`.
  pub fn new_empty(size: u8) -> Board {
    assert!(
      (MIN_SIZE..=MAX_SIZE).contains(&usize::from(size)),
      "unsupported board size {size}"
    );

    let data = vec![None; usize::from(size).pow(2)].into_boxed_slice();

    Board { size, data }
  }

  /// Get the size of the board.
  pub fn size(&self) -> u8 {
    self.size
  }

  /// Check whether the position lies on the board.
  pub fn contains(&self, ptr: Position) -> bool {
    ptr.x < self.size && ptr.y < self.size
  }

  /// Convert a raw index to `Position`.
  #[allow(clippy::cast_possible_truncation)]
  pub fn get_ptr_from_index(&self, index: usize) -> Position {
    let size = usize::from(self.size);

    Position {
      x: (index % size) as u8,
      y: (index / size) as u8,
    }
  }

  /// Get the tile at the given position.
  ///
  /// Positions outside of the board are simply empty.
  pub fn get_tile(&self, ptr: Position) -> Option<&Tile> {
    if !self.contains(ptr) {
      return None;
    }

    self.data[ptr.index(self.size)].as_ref()
  }

  /// Position one step from `ptr` in the given direction, `None` past the edge.
  pub fn neighbor(&self, ptr: Position, direction: Direction) -> Option<Position> {
    let (dx, dy) = direction.offset();

    let next = Position {
      x: ptr.x.checked_add_signed(dx)?,
      y: ptr.y.checked_add_signed(dy)?,
    };

    self.contains(next).then_some(next)
  }

  /// Place a tile at its own position.
  ///
  /// # Panics
  /// Panics at attempt to overwrite an occupied cell or to place a tile off the board.
  pub fn insert(&mut self, tile: Tile) {
    let ptr = tile.position;

    assert!(
      self.contains(ptr),
      "attempted to insert tile {tile:?} outside of board of size {}",
      self.size
    );

    let index = ptr.index(self.size);

    assert!(
      self.data[index].is_none(),
      "attempted to overwrite tile {:?} at {ptr} with {tile:?} at board \n{self}",
      self.data[index]
    );

    self.data[index] = Some(tile);
  }

  /// Take the tile out of the given cell.
  pub fn remove(&mut self, ptr: Position) -> Option<Tile> {
    if !self.contains(ptr) {
      return None;
    }

    self.data[ptr.index(self.size)].take()
  }

  /// Move a tile to an empty cell, keeping its identity and level.
  ///
  /// # Panics
  /// Panics if there is no tile at `from` or `to` is occupied.
  pub fn relocate(&mut self, from: Position, to: Position) {
    if from == to {
      return;
    }

    let Some(mut tile) = self.remove(from) else {
      panic!("attempted to move missing tile from {from} at board \n{self}");
    };

    tile.position = to;
    self.insert(tile);
  }

  /// Remove every tile.
  pub fn clear(&mut self) {
    self.data.iter_mut().for_each(|cell| *cell = None);
  }

  /// Get iterator over all tiles on the board.
  pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
    self.data.iter().flatten()
  }

  /// Get all empty cells of the board.
  pub fn free_positions(&self) -> Vec<Position> {
    self
      .data
      .iter()
      .enumerate()
      .filter(|(.., tile)| tile.is_none())
      .map(|(index, ..)| self.get_ptr_from_index(index))
      .collect()
  }

  pub fn tile_count(&self) -> usize {
    self.data.iter().filter(|tile| tile.is_some()).count()
  }

  pub fn is_full(&self) -> bool {
    self.data.iter().all(Option::is_some)
  }

  /// Levels of all cells in index order, ignoring tile identity.
  pub fn levels(&self) -> Vec<Option<Level>> {
    self
      .data
      .iter()
      .map(|tile| tile.map(|tile| tile.level))
      .collect()
  }

  pub fn highest_level(&self) -> Option<Level> {
    self.tiles().map(|tile| tile.level).max()
  }

  /// Order in which the cells have to be resolved for a move.
  ///
  /// Cells closest to the target edge come first, so every tile sees its
  /// neighbours already compacted.
  pub fn traversal(&self, direction: Direction) -> Vec<Position> {
    let coords: Vec<u8> = if direction.towards_high() {
      (0..self.size).rev().collect()
    } else {
      (0..self.size).collect()
    };

    coords
      .iter()
      .flat_map(|&x| coords.iter().map(move |&y| Position { x, y }))
      .collect()
  }

  /// Get iterator over the occupied orthogonal neighbours of a cell.
  pub fn adjacent_tiles(&self, ptr: Position) -> impl Iterator<Item = &Tile> + '_ {
    Direction::ALL
      .into_iter()
      .filter_map(move |direction| self.neighbor(ptr, direction))
      .filter_map(move |next| self.get_tile(next))
  }

  /// Check if any two orthogonally adjacent tiles share a level.
  pub fn has_mergeable_neighbors(&self) -> bool {
    self.tiles().any(|tile| {
      self
        .adjacent_tiles(tile.position)
        .any(|other| other.level == tile.level)
    })
  }

  /// Full board without a single possible merge.
  pub fn is_locked(&self) -> bool {
    self.is_full() && !self.has_mergeable_neighbors()
  }

  /// Render the displayed tile values as a table.
  pub fn pretty(&self) -> String {
    let width = self
      .tiles()
      .map(|tile| tile.value().to_string().len())
      .max()
      .unwrap_or(1)
      .max(4);

    let mut output = String::new();

    for y in (0..self.size).rev() {
      let row = (0..self.size)
        .map(|x| match self.get_tile(Position { x, y }) {
          Some(tile) => format!("{:>width$}", tile.value()),
          None => format!("{:>width$}", "."),
        })
        .collect::<Vec<_>>()
        .join(" ");

      output.push_str(&row);
      output.push('\n');
    }

    output
  }
}

impl FromStr for Board {
  type Err = Error;

  /// Parse a string into a board.
  ///
  /// Expects the same format, that is produced by [`Board::to_string`]:
  /// one line per row, top row first, `-` for an empty cell and a letter
  /// for a tile (`a` is level 0).
  ///
  /// ```rust
  /// # use iso2048_lib::{Board, Position};
  /// let board: Board = "----\n----\n--a-\nbbbc".parse().unwrap();
  ///
  /// assert_eq!(board.size(), 4);
  /// assert_eq!(board.tile_count(), 5);
  /// assert_eq!(board.get_tile(Position::new(3, 0)).unwrap().level, 2);
  /// assert_eq!(board.get_tile(Position::new(2, 1)).unwrap().value(), 2);
  /// ```
  ///
  /// # Errors
  /// Returns an error if the board is not a square, has an unsupported size
  /// or contains an unknown character.
  fn from_str(input_string: &str) -> Result<Board, Self::Err> {
    let rows = input_string
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .enumerate()
      .map(|(line, row)| {
        row
          .chars()
          .map(|tile| match tile {
            '-' | '.' => Ok(None),
            _ => char_level(tile).map(Some).ok_or(Error::InvalidTile {
              line: line + 1,
              tile,
            }),
          })
          .collect::<Result<Vec<_>, _>>()
      })
      .collect::<Result<Vec<_>, _>>()?;

    Board::new(rows)
  }
}

impl fmt::Display for Board {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for y in (0..self.size).rev() {
      (0..self.size)
        .map(|x| self.get_tile(Position { x, y }).map_or('-', Tile::char))
        .try_for_each(|c| write!(f, "{c}"))?;

      writeln!(f)?;
    }

    Ok(())
  }
}
