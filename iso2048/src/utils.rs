use std::sync::atomic::{AtomicBool, Ordering};

/// Check if a timed run should continue.
#[inline]
pub(crate) fn do_run(end: &AtomicBool) -> bool {
  !end.load(Ordering::Acquire)
}

/// Format a number into a readable string with SI suffix.
///
/// # Examples
/// ```rust
/// # use iso2048_lib::utils::format_number;
///
/// assert_eq!(format_number(0.0), "0");
/// assert_eq!(format_number(1.1), "1.1");
/// assert_eq!(format_number(1000.0), "1k");
/// assert_eq!(format_number(50000.0), "50k");
/// assert_eq!(format_number(1250000.0), "1.25M");
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_number(input: f32) -> String {
  const SUFFIXES: [&str; 5] = ["", "k", "M", "G", "T"];

  let exponent = if input < 1.0 {
    0
  } else {
    (input.log(1000.0).floor() as usize).min(SUFFIXES.len() - 1)
  };

  let scaled = input / 1000f32.powi(exponent as i32);

  let digits = format!("{scaled:.2}");
  let digits = digits.trim_end_matches('0').trim_end_matches('.');

  format!("{digits}{}", SUFFIXES[exponent])
}

#[cfg(feature = "notation")]
pub use notation::{parse_board, parse_notation, to_notation};

#[cfg(feature = "notation")]
mod notation {
  use std::error::Error;

  use once_cell::sync::Lazy;
  use regex::{Captures, Regex};

  use crate::Board;

  static EMPTY_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("the regex is valid"));
  static EMPTY_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("the regex is valid"));

  /// Expands a compact board notation to the plain text form of a board
  ///
  /// Expects `size|data`, where data is the rows from the top separated by `/`.
  /// Each row holds tile letters, `-` or a number giving a count of `-`, and
  /// missing cells at the end of a row are empty.
  ///
  /// ```rust
  /// # use iso2048_lib::utils::parse_notation;
  /// assert_eq!(parse_notation("3|/1a/c2").unwrap(), "---\n-a-\nc--");
  /// ```
  ///
  /// # Errors
  /// Returns an error if the format is incorrect or the size doesn't match
  /// the row count or a row length.
  pub fn parse_notation(input: &str) -> Result<String, Box<dyn Error>> {
    let (prefix, data) = input.trim().split_once('|').ok_or("Incorrect format")?;

    let size: usize = prefix.parse()?;

    let parts: Vec<_> = data.split('/').collect();

    if parts.len() != size {
      return Err(format!("Expected {size} rows, found {}", parts.len()).into());
    }

    let parse_row = |part: &str| -> Result<String, Box<dyn Error>> {
      let too_long = || format!("Row {part:?} is longer than {size}");

      // measure before expanding, the counts come straight from user input
      let mut length = 0usize;
      let mut last = 0;
      for count in EMPTY_COUNT.find_iter(part) {
        length += part[last..count.start()].chars().count();
        length = length
          .checked_add(count.as_str().parse()?)
          .filter(|&length| length <= size)
          .ok_or_else(too_long)?;
        last = count.end();
      }
      length += part[last..].chars().count();

      if length > size {
        return Err(too_long().into());
      }

      let expanded = EMPTY_COUNT.replace_all(part, |captures: &Captures| {
        captures[0]
          .parse()
          .map_or_else(|_| String::new(), |count| "-".repeat(count))
      });

      Ok(expanded.into_owned() + &"-".repeat(size - length))
    };

    parts
      .into_iter()
      .map(parse_row)
      .collect::<Result<Vec<_>, _>>()
      .map(|rows| rows.join("\n"))
  }

  /// Parses a board given either in the compact notation or as plain text
  ///
  /// # Errors
  /// Returns an error if neither form can be parsed.
  pub fn parse_board(input: &str) -> Result<Board, Box<dyn Error>> {
    let text = if input.contains('|') {
      parse_notation(input)?
    } else {
      input.to_owned()
    };

    Ok(text.parse()?)
  }

  /// Converts a board to the compact notation
  ///
  /// ```rust
  /// # use iso2048_lib::{utils::to_notation, Board};
  /// let board: Board = "----\n----\n--a-\nbbbc".parse().unwrap();
  ///
  /// assert_eq!(to_notation(&board), "4|//2a/bbbc");
  /// ```
  #[must_use]
  pub fn to_notation(board: &Board) -> String {
    let data = board
      .to_string()
      .lines()
      .map(|row| {
        EMPTY_RUN
          .replace_all(row.trim_end_matches('-'), |captures: &Captures| {
            captures[0].len().to_string()
          })
          .into_owned()
      })
      .collect::<Vec<_>>()
      .join("/");

    format!("{}|{}", board.size(), data)
  }

}
