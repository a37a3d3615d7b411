use std::fmt;

use log::{debug, info, trace};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use super::{
  board::Board,
  config::GridConfig,
  direction::Direction,
  error::GridError,
  r#move::MoveRecord,
  state::Outcome,
  tile::{value_of, Position, Tile, TileId},
  Level, Score,
};

/// The game itself: a board plus everything that happened on it.
///
/// All rules live here. An owner feeds it one [`Direction`] per gesture
/// through [`Grid::update`] and reads the board, the move transcript, the
/// freshly spawned tile and the score back afterwards.
pub struct Grid {
  config: GridConfig,
  board: Board,
  moves: Vec<MoveRecord>,
  new_tile: Option<Tile>,
  score: Score,
  done: bool,
  next_id: TileId,
  rng: StdRng,
}

impl Grid {
  /// Create a new game with two starting tiles.
  ///
  /// # Errors
  /// Returns an error if the config is invalid.
  pub fn new(config: GridConfig) -> Result<Grid, GridError> {
    let mut grid = Grid::empty(config)?;
    grid.init()?;

    Ok(grid)
  }

  /// Continue a game from an existing board.
  ///
  /// The board size overrides the one in `config`. Nothing is spawned.
  ///
  /// # Errors
  /// Returns an error if the config is invalid.
  pub fn from_board(board: Board, config: GridConfig) -> Result<Grid, GridError> {
    let config = GridConfig {
      board_size: board.size(),
      ..config
    };

    let mut grid = Grid::empty(config)?;

    grid.next_id = board.tiles().map(|tile| tile.id + 1).max().unwrap_or(0);
    grid.done = board
      .highest_level()
      .is_some_and(|level| level >= config.win_level);
    grid.board = board;

    Ok(grid)
  }

  fn empty(config: GridConfig) -> Result<Grid, GridError> {
    config.validate()?;

    let rng = match config.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };

    Ok(Grid {
      board: Board::new_empty(config.board_size),
      moves: Vec::new(),
      new_tile: None,
      score: 0,
      done: false,
      next_id: 0,
      rng,
      config,
    })
  }

  /// Start over with two random tiles.
  ///
  /// The starting tiles are not reported as new.
  ///
  /// # Errors
  /// Only fails if the board can't hold two tiles, which a valid config rules out.
  pub fn init(&mut self) -> Result<(), GridError> {
    self.board.clear();
    self.moves.clear();
    self.score = 0;
    self.done = false;

    self.generate_tile()?;
    self.generate_tile()?;
    self.new_tile = None;

    Ok(())
  }

  /// Spawn a level 0 or 1 tile on a uniformly chosen free cell.
  ///
  /// # Errors
  /// Returns [`GridError::NoFreeCells`] if the board is full.
  pub fn generate_tile(&mut self) -> Result<Tile, GridError> {
    let position = *self
      .board
      .free_positions()
      .choose(&mut self.rng)
      .ok_or(GridError::NoFreeCells)?;

    let level = self.rng.gen_range(0..=1);
    let tile = self.create_tile(position, level);

    debug!("spawned {} at {position}", tile.value());

    self.new_tile = Some(tile);

    Ok(tile)
  }

  fn create_tile(&mut self, position: Position, level: Level) -> Tile {
    let tile = Tile {
      id: self.next_id,
      level,
      position,
    };

    self.next_id += 1;
    self.board.insert(tile);

    tile
  }

  /// Where the tile slides to, and whether it merges there.
  ///
  /// Cells in `merged` hold tiles created by a merge in the current update
  /// and can't be merged into again.
  fn move_target(&self, tile: &Tile, direction: Direction, merged: &[bool]) -> (Position, bool) {
    let mut target = tile.position;

    while let Some(next) = self.board.neighbor(target, direction) {
      if self.board.get_tile(next).is_some() {
        break;
      }
      target = next;
    }

    match self.board.neighbor(target, direction) {
      Some(next)
        if !merged[next.index(self.board.size())]
          && self
            .board
            .get_tile(next)
            .is_some_and(|other| other.level == tile.level) =>
      {
        (next, true)
      }
      _ => (target, false),
    }
  }

  /// Resolve one move.
  ///
  /// Slides every tile towards the edge, merges equal pairs at most once,
  /// spawns a tile if anything changed and reports whether the game ended.
  /// A grid that is already done keeps accepting moves.
  ///
  /// # Errors
  /// Fails only if a tile had to be spawned on a full board, which a
  /// changed board can't be.
  pub fn update(&mut self, direction: Direction) -> Result<Outcome, GridError> {
    self.moves.clear();

    let size = self.board.size();
    let mut merged = vec![false; usize::from(size).pow(2)];
    let mut won = false;

    for from in self.board.traversal(direction) {
      let Some(&tile) = self.board.get_tile(from) else {
        continue;
      };

      let (to, merge) = self.move_target(&tile, direction, &merged);

      if !merge {
        self.board.relocate(from, to);

        if from != to {
          trace!("slid {} from {from} to {to}", tile.value());
        }

        self.moves.push(MoveRecord {
          tile: tile.id,
          from,
          to,
          level: tile.level,
          merged: false,
          absorbed_from: None,
        });
        continue;
      }

      let level = tile.level + 1;

      self.board.remove(from);
      let absorbed_from = self.board.remove(to).and_then(|absorbed| {
        let index = self
          .moves
          .iter()
          .position(|record| record.tile == absorbed.id)?;

        Some(self.moves.remove(index).from)
      });
      self.create_tile(to, level);
      merged[to.index(size)] = true;

      self.score += value_of(tile.level);

      debug!("merged into {} at {to}", value_of(level));

      self.moves.push(MoveRecord {
        tile: tile.id,
        from,
        to,
        level,
        merged: true,
        absorbed_from,
      });

      if level == self.config.win_level && !self.done {
        self.done = true;
        won = true;
      }
    }

    if self.moves.iter().any(MoveRecord::is_shift) {
      self.generate_tile()?;
    } else {
      self.new_tile = None;
    }

    let outcome = if won {
      info!("reached {} with score {}", value_of(self.config.win_level), self.score);
      Outcome::Won
    } else if self.is_game_over() {
      info!("no moves left, final score {}", self.score);
      Outcome::Lost
    } else {
      Outcome::Continues
    };

    Ok(outcome)
  }

  /// Full board with no equal neighbours anywhere.
  pub fn is_game_over(&self) -> bool {
    self.board.is_locked()
  }

  pub fn board(&self) -> &Board {
    &self.board
  }

  /// Transcript of the last update, at most one record per destination cell.
  pub fn moves(&self) -> &[MoveRecord] {
    &self.moves
  }

  /// Tile spawned by the last update, if any.
  pub fn new_tile(&self) -> Option<&Tile> {
    self.new_tile.as_ref()
  }

  pub fn score(&self) -> Score {
    self.score
  }

  /// Whether the winning level has been reached. Never resets during a game.
  pub fn is_done(&self) -> bool {
    self.done
  }

  pub fn highest_level(&self) -> Option<Level> {
    self.board.highest_level()
  }
}

impl fmt::Display for Grid {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "score: {}", self.score)?;
    write!(f, "{}", self.board.pretty())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SEED: u64 = 42;

  fn grid(data: &str) -> Grid {
    Grid::from_board(data.parse().unwrap(), GridConfig::with_seed(SEED)).unwrap()
  }

  /// Levels of the row `y`, `None` for empty cells.
  fn row(grid: &Grid, y: u8) -> Vec<Option<Level>> {
    (0..grid.board().size())
      .map(|x| grid.board().get_tile(Position::new(x, y)).map(|tile| tile.level))
      .collect()
  }

  fn column(grid: &Grid, x: u8) -> Vec<Option<Level>> {
    (0..grid.board().size())
      .map(|y| grid.board().get_tile(Position::new(x, y)).map(|tile| tile.level))
      .collect()
  }

  fn assert_unique_destinations(grid: &Grid) {
    let mut destinations: Vec<_> = grid.moves().iter().map(|record| record.to).collect();
    let count = destinations.len();

    destinations.sort_by_key(|ptr| (ptr.x, ptr.y));
    destinations.dedup();

    assert_eq!(destinations.len(), count, "moves: {:?}", grid.moves());
  }

  #[test]
  fn test_init_spawns_two_tiles() {
    for seed in 0..50 {
      let grid = Grid::new(GridConfig::with_seed(seed)).unwrap();

      assert_eq!(grid.board().tile_count(), 2);
      assert!(grid.board().tiles().all(|tile| tile.level <= 1));
      assert!(grid.new_tile().is_none());
      assert!(grid.moves().is_empty());
      assert_eq!(grid.score(), 0);
      assert!(!grid.is_done());
    }
  }

  #[test]
  fn test_same_seed_same_game() {
    let mut a = Grid::new(GridConfig::with_seed(SEED)).unwrap();
    let mut b = Grid::new(GridConfig::with_seed(SEED)).unwrap();

    for direction in Direction::ALL.iter().cycle().take(40) {
      assert_eq!(a.update(*direction).unwrap(), b.update(*direction).unwrap());
      assert_eq!(a.board(), b.board());
    }
    assert_eq!(a.score(), b.score());
  }

  #[test]
  fn test_row_merges_towards_left() {
    let mut grid = grid("----\n----\n----\nbbbc");

    let outcome = grid.update(Direction::Left).unwrap();

    assert_eq!(outcome, Outcome::Continues);
    assert_eq!(grid.score(), 4);
    assert_eq!(&row(&grid, 0)[..3], &[Some(2), Some(1), Some(2)]);
    assert_eq!(grid.board().tile_count(), 4); // 4 - 1 merge + 1 spawn
    assert!(grid.new_tile().is_some());

    let moves = grid.moves();
    assert_eq!(moves.len(), 3);
    assert_eq!(
      moves[0],
      MoveRecord {
        tile: 1,
        from: Position::new(1, 0),
        to: Position::new(0, 0),
        level: 2,
        merged: true,
        absorbed_from: Some(Position::new(0, 0)),
      }
    );
    assert_eq!(moves[1].from, Position::new(2, 0));
    assert_eq!(moves[1].to, Position::new(1, 0));
    assert_eq!(moves[1].level, 1);
    assert_eq!(moves[2].from, Position::new(3, 0));
    assert_eq!(moves[2].to, Position::new(2, 0));
    assert_eq!(moves[2].level, 2);
    assert_unique_destinations(&grid);
  }

  #[test]
  fn test_lone_tile_slides_to_edge() {
    let mut grid = grid("----\n----\n----\na---");
    let id = grid.board().get_tile(Position::new(0, 0)).unwrap().id;

    grid.update(Direction::Right).unwrap();

    assert_eq!(
      grid.moves(),
      &[MoveRecord {
        tile: id,
        from: Position::new(0, 0),
        to: Position::new(3, 0),
        level: 0,
        merged: false,
        absorbed_from: None,
      }]
    );

    let moved = grid.board().get_tile(Position::new(3, 0)).unwrap();
    assert_eq!(moved.id, id);
    assert_eq!(moved.position, Position::new(3, 0));

    let spawned = grid.new_tile().unwrap();
    assert_ne!(spawned.position, Position::new(3, 0));
    assert_eq!(grid.board().get_tile(spawned.position), Some(spawned));
  }

  #[test]
  fn test_noop_move_spawns_nothing() {
    let mut grid = grid("----\n----\na---\nab--");
    let before = grid.board().clone();

    let outcome = grid.update(Direction::Left).unwrap();

    assert_eq!(outcome, Outcome::Continues);
    assert_eq!(grid.board(), &before);
    assert!(grid.new_tile().is_none());
    assert_eq!(grid.score(), 0);
    assert_eq!(grid.moves().len(), 3);
    assert!(grid.moves().iter().all(|record| !record.is_shift()));
  }

  #[test]
  fn test_moves_are_rebuilt_every_update() {
    let mut grid = grid("----\n----\n----\n---a");

    for direction in [
      Direction::Left,
      Direction::Up,
      Direction::Right,
      Direction::Down,
      Direction::Left,
    ] {
      let before = grid.board().tile_count();
      grid.update(direction).unwrap();

      // one record per tile, except those merged away
      let merges = grid.moves().iter().filter(|record| record.merged).count();
      assert_eq!(grid.moves().len(), before - merges);
      assert_unique_destinations(&grid);
    }
  }

  #[test]
  fn test_no_chained_merge() {
    let mut grid = grid("----\n----\n----\nbbc-");

    grid.update(Direction::Left).unwrap();

    assert_eq!(&row(&grid, 0)[..2], &[Some(2), Some(2)]);
    assert_eq!(grid.score(), 4);
    assert_unique_destinations(&grid);
  }

  #[test]
  fn test_four_equal_merge_pairwise() {
    let mut grid = grid("----\n----\n----\naaaa");

    grid.update(Direction::Left).unwrap();

    assert_eq!(&row(&grid, 0)[..2], &[Some(1), Some(1)]);
    assert_eq!(grid.score(), 4);
    assert_eq!(grid.moves().iter().filter(|record| record.merged).count(), 2);
    assert_unique_destinations(&grid);
  }

  #[test]
  fn test_column_merges_upwards() {
    let mut grid = grid("a---\na---\n----\nb---");

    grid.update(Direction::Up).unwrap();

    assert_eq!(&column(&grid, 0)[2..], &[Some(1), Some(1)]);
    assert_eq!(grid.score(), 2);
  }

  #[test]
  fn test_merge_removes_one_tile() {
    let mut grid = grid("----\n--a-\n----\n--a-");

    grid.update(Direction::Down).unwrap();

    // one merge, one spawn
    assert_eq!(grid.board().tile_count(), 2);
    assert_eq!(grid.board().get_tile(Position::new(2, 0)).unwrap().level, 1);
    assert_eq!(grid.score(), 2);
  }

  #[test]
  fn test_win_flag_is_set_on_grid() {
    let mut grid = grid("----\n----\n----\njj--");
    assert!(!grid.is_done());

    let outcome = grid.update(Direction::Left).unwrap();

    assert_eq!(outcome, Outcome::Won);
    assert!(grid.is_done());
    assert_eq!(grid.score(), 1024);
    assert_eq!(grid.highest_level(), Some(10));

    // still playable, and the flag stays
    let outcome = grid.update(Direction::Right).unwrap();

    assert_eq!(outcome, Outcome::Continues);
    assert!(grid.is_done());
    assert_eq!(grid.highest_level(), Some(10));
  }

  #[test]
  fn test_custom_win_level() {
    let config = GridConfig {
      win_level: 3,
      ..GridConfig::with_seed(SEED)
    };
    let mut grid = Grid::from_board("---\n---\ncc-".parse().unwrap(), config).unwrap();

    assert_eq!(grid.update(Direction::Left).unwrap(), Outcome::Won);
    assert!(grid.is_done());
  }

  #[test]
  fn test_locked_board_is_lost() {
    let mut grid = grid("abab\nbaba\nabab\nbaba");

    for direction in Direction::ALL {
      assert_eq!(grid.update(direction).unwrap(), Outcome::Lost);
      assert!(grid.new_tile().is_none());
      assert_eq!(grid.score(), 0);
    }
  }

  #[test]
  fn test_free_cell_is_never_lost() {
    let mut grid = grid("abab\nbaba\nabab\nbab-");

    assert!(!grid.is_game_over());
    assert_eq!(grid.update(Direction::Left).unwrap(), Outcome::Continues);
  }

  #[test]
  fn test_full_board_with_merge_is_not_over() {
    let mut grid = grid("abab\nbaba\nabab\nbabb");

    assert!(grid.board().is_full());
    assert!(!grid.is_game_over());

    grid.update(Direction::Left).unwrap();

    assert_eq!(grid.score(), 4);
    assert_eq!(grid.new_tile().unwrap().position, Position::new(3, 0));
    assert!(grid.board().is_full());
  }

  #[test]
  fn test_generate_tile_on_full_board_fails() {
    let mut grid = grid("ab\nba");

    assert_eq!(grid.generate_tile(), Err(GridError::NoFreeCells));
    assert_eq!(grid.board().tile_count(), 4);
  }

  #[test]
  fn test_new_tiles_get_fresh_ids() {
    let mut grid = grid("----\n----\n----\na--a");
    let ids: Vec<_> = grid.board().tiles().map(|tile| tile.id).collect();

    grid.update(Direction::Left).unwrap();

    let spawned = grid.new_tile().unwrap();
    assert!(!ids.contains(&spawned.id));
    assert!(spawned.level <= 1);
  }

  #[test]
  fn test_merge_keeps_absorbed_slide() {
    let mut grid = grid("----\n----\n----\n-a-a");
    let id = grid.board().get_tile(Position::new(3, 0)).unwrap().id;

    grid.update(Direction::Left).unwrap();

    assert_eq!(
      grid.moves(),
      &[MoveRecord {
        tile: id,
        from: Position::new(3, 0),
        to: Position::new(0, 0),
        level: 1,
        merged: true,
        absorbed_from: Some(Position::new(1, 0)),
      }]
    );
    assert_eq!(
      format!("{:?}", grid.moves()[0]),
      format!("(#{id}: (3, 0) -> (0, 0), 1, merged with (1, 0))")
    );
  }

  #[test]
  fn test_spawns_cover_levels_and_cells() {
    let mut grid = grid("---\n---\n---");
    let mut levels = [0; 2];

    for _ in 0..9 {
      let tile = grid.generate_tile().unwrap();
      levels[usize::from(tile.level)] += 1;
    }

    assert!(grid.board().is_full());
    assert_eq!(grid.generate_tile(), Err(GridError::NoFreeCells));

    let mut positions = Vec::new();
    for seed in 0..200 {
      let grid = Grid::new(GridConfig::with_seed(seed)).unwrap();

      for tile in grid.board().tiles() {
        levels[usize::from(tile.level)] += 1;
        positions.push(tile.position);
      }
    }

    positions.sort_by_key(|position| (position.x, position.y));
    positions.dedup();

    assert!(levels.iter().all(|&count| count > 0), "levels: {levels:?}");
    assert_eq!(positions.len(), 16);
  }
}
