//! Shared utilities.
//!
//! Line-oriented text helpers shared by the marker, services and shim readers,
//! plus test fixtures.

#[cfg(test)]
pub mod testutil;

/// Iterate the meaningful lines of a line-oriented text file.
///
/// Everything after a `#` is a comment. Lines are trimmed and blank lines are
/// skipped.
pub fn content_lines(text: &str) -> impl Iterator<Item = &str> {
  text
    .lines()
    .map(|line| line.split_once('#').map_or(line, |(before, _)| before).trim())
    .filter(|line| !line.is_empty())
}
