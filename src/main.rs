#![warn(clippy::pedantic)]
#![allow(clippy::similar_names)]

use std::{fs, time::Instant};

use clap::{value_parser, Arg, ArgMatches, Command};
use env_logger::Env;
use iso2048_lib::{
  utils::{format_number, parse_board, to_notation},
  Direction, Grid, GridConfig, Outcome,
};
use log::{debug, info};

type Error = Box<dyn std::error::Error>;

fn main() {
  env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

  let matches = Command::new("iso2048")
    .version("0.3")
    .about("Tile merging puzzle on a square grid")
    .arg(
      Arg::new("size")
        .short('s')
        .long("size")
        .value_name("SIZE")
        .help("Side length of the board (default is 4)")
        .takes_value(true)
        .value_parser(value_parser!(u8)),
    )
    .arg(
      Arg::new("win-level")
        .short('w')
        .long("win-level")
        .value_name("LEVEL")
        .help("Tile level that wins the game (default is 10, the 2048 tile)")
        .takes_value(true)
        .value_parser(value_parser!(u8)),
    )
    .arg(
      Arg::new("seed")
        .long("seed")
        .help("Seed for tile spawning")
        .takes_value(true)
        .value_parser(value_parser!(u64)),
    )
    .arg(
      Arg::new("load")
        .short('l')
        .long("load")
        .value_name("FILE")
        .conflicts_with("size")
        .help("Continue from a board stored in FILE")
        .takes_value(true),
    )
    .arg(
      Arg::new("perf")
        .short('p')
        .long("perf")
        .value_name("SECONDS")
        .conflicts_with("load")
        .help("Benchmark random play instead of playing")
        .takes_value(true)
        .value_parser(value_parser!(u64)),
    )
    .arg(
      Arg::new("threads")
        .short('t')
        .long("threads")
        .help("How many threads to benchmark on (default is the number of CPUs)")
        .takes_value(true)
        .value_parser(value_parser!(usize)),
    )
    .arg(
      Arg::new("quiet")
        .short('q')
        .long("quiet")
        .help("Don't print the move transcript"),
    )
    .get_matches();

  let config = config_from(&matches);

  let result = if let Some(&seconds) = matches.get_one::<u64>("perf") {
    let threads = matches
      .get_one::<usize>("threads")
      .copied()
      .unwrap_or_else(num_cpus::get);

    run_perf(seconds, threads, config)
  } else {
    let quiet = matches.is_present("quiet");

    match matches.get_one::<String>("load") {
      Some(path) => load_grid(path, config).and_then(|grid| run(grid, quiet)),
      None => Grid::new(config)
        .map_err(Error::from)
        .and_then(|grid| run(grid, quiet)),
    }
  };

  if let Err(err) = result {
    println!("Error: {err}");
    std::process::exit(1);
  }
}

fn config_from(matches: &ArgMatches) -> GridConfig {
  let default = GridConfig::default();

  GridConfig {
    board_size: matches
      .get_one::<u8>("size")
      .copied()
      .unwrap_or(default.board_size),
    win_level: matches
      .get_one::<u8>("win-level")
      .copied()
      .unwrap_or(default.win_level),
    seed: matches.get_one::<u64>("seed").copied(),
  }
}

fn load_grid(path: &str, config: GridConfig) -> Result<Grid, Error> {
  let input = fs::read_to_string(path)?;
  let board = parse_board(&input)?;

  info!("loaded board {}", to_notation(&board));

  Ok(Grid::from_board(board, config)?)
}

fn run_perf(seconds: u64, threads: usize, config: GridConfig) -> Result<(), Error> {
  println!("Playing random games on {threads} threads for {seconds} s\n");

  let start = Instant::now();
  let stats = iso2048_lib::perf(seconds, threads, config)?;
  let elapsed = start.elapsed().as_millis().max(1);

  println!("{stats}");

  let per_second = u128::from(stats.moves) * 1000 / elapsed; // * 1000 to account for milliseconds

  #[allow(clippy::cast_precision_loss)]
  let readable = format_number(per_second as f32);

  println!("moves/s = {per_second} ({readable})");

  Ok(())
}

/// One line of player input.
#[derive(Debug, PartialEq)]
enum Input {
  Quit,
  Move(Direction),
  Invalid(String),
}

/// Interpret a line read from stdin, `None` once the input is gone.
///
/// An empty line ends the game too: at the end of piped input the reader
/// keeps producing empty lines.
fn parse_input(line: Option<&str>) -> Input {
  let Some(line) = line.map(str::trim) else {
    return Input::Quit;
  };

  if line.is_empty() || line.starts_with('$') || line.eq_ignore_ascii_case("q") {
    return Input::Quit;
  }

  match line.parse() {
    Ok(direction) => Input::Move(direction),
    Err(err) => Input::Invalid(format!("{err}")),
  }
}

fn run(mut grid: Grid, quiet: bool) -> Result<(), Error> {
  use text_io::try_read;

  let prefix = '!';

  println!("{grid}");
  println!("move with w/a/s/d (or up/left/down/right), $ or an empty line to quit");

  loop {
    let line: Option<String> = try_read!("{}\n").ok();

    let direction = match parse_input(line.as_deref()) {
      Input::Move(direction) => direction,
      Input::Quit => {
        println!("{}", to_notation(grid.board()));
        return Ok(());
      }
      Input::Invalid(err) => {
        println!("Invalid input: {err}");
        continue;
      }
    };

    debug!("moving {direction}");

    let outcome = grid.update(direction)?;

    if !quiet {
      grid
        .moves()
        .iter()
        .filter(|record| record.is_shift())
        .for_each(|record| println!("{record:?}"));
    }

    if let Some(tile) = grid.new_tile() {
      println!("{prefix}{} at {}", tile.value(), tile.position);
    } else {
      println!("{prefix}nothing moved");
    }

    println!("{grid}");

    match outcome {
      Outcome::Continues => {}
      Outcome::Won => {
        println!("You win!\n$");
        return Ok(());
      }
      Outcome::Lost => {
        println!("No moves left, game over!\n$");
        return Ok(());
      }
    }
  }
}
