//! # Notice Module
//!
//! Canonical notice rendering: turning the raw multi-line notice text into a
//! comment-prefixed block bounded by separator lines, and recognizing the
//! separator lines of pre-existing blocks.
//!
//! The block is built once at startup and reused for every file in a run, so
//! all files end up with an identical header.

/// Number of prefix characters in an emitted separator line.
pub const SEPARATOR_WIDTH: usize = 78;

/// Minimum run of prefix characters for a line to be recognized as a
/// separator. Existing headers bordered by shorter runs than the emitted 78
/// are still detected, as long as they reach this threshold.
pub const SEPARATOR_MIN: usize = 10;

/// Comment prefix character used when neither the CLI nor the config file
/// chooses one.
pub const DEFAULT_PREFIX: char = '#';

/// A canonical notice rendered as a comment block.
///
/// Each line of the raw text is stripped of surrounding whitespace and
/// prefixed with `"<prefix> "`; a blank input line renders as the bare prefix
/// character. The rendered insertion form wraps the lines in two separator
/// lines of [`SEPARATOR_WIDTH`] prefix characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeBlock {
  prefix: char,
  lines: Vec<String>,
  rendered: String,
}

impl NoticeBlock {
  /// Builds the block from raw notice text.
  pub fn new(prefix: char, text: &str) -> Self {
    let lines: Vec<String> = text.lines().map(|raw| comment_line(prefix, raw)).collect();

    let sep = separator(prefix);
    let mut rendered = String::with_capacity((lines.len() + 2) * (SEPARATOR_WIDTH + 1));
    rendered.push_str(&sep);
    rendered.push('\n');
    for line in &lines {
      rendered.push_str(line);
      rendered.push('\n');
    }
    rendered.push_str(&sep);
    rendered.push('\n');

    Self { prefix, lines, rendered }
  }

  /// The comment prefix character this block was rendered with.
  pub const fn prefix(&self) -> char {
    self.prefix
  }

  /// The comment-prefixed notice lines, without the surrounding separators.
  #[allow(dead_code)] // Used by library consumers and tests, not in the CLI binary
  pub fn lines(&self) -> &[String] {
    &self.lines
  }

  /// The full insertion form: separator, notice lines, separator, each line
  /// newline-terminated.
  pub fn rendered(&self) -> &str {
    &self.rendered
  }
}

/// Renders a single raw notice line as a comment line.
fn comment_line(prefix: char, raw: &str) -> String {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    prefix.to_string()
  } else {
    format!("{prefix} {trimmed}")
  }
}

/// The canonical separator line: the prefix character repeated
/// [`SEPARATOR_WIDTH`] times, without a trailing newline.
pub fn separator(prefix: char) -> String {
  String::from(prefix).repeat(SEPARATOR_WIDTH)
}

/// Whether a line reads as a header separator: its stripped form starts with
/// at least [`SEPARATOR_MIN`] repeats of the prefix character.
pub fn is_separator(line: &str, prefix: char) -> bool {
  line.trim().chars().take_while(|&c| c == prefix).count() >= SEPARATOR_MIN
}
