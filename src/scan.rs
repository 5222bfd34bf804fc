//! # Scan Module
//!
//! The line-oriented state machine that decides, line by line, whether the
//! current line belongs to a pre-existing header block, an exempted preamble,
//! or the file body.
//!
//! The transition logic lives in [`advance`], a pure function from
//! `(mode, state, line, line number)` to `(next state, action)`, so every
//! transition can be unit tested without any file I/O. [`HeaderScanner`] is a
//! thin stateful wrapper around it used by the rewriter.

use std::sync::LazyLock;

use regex::Regex;

use crate::notice::is_separator;

/// Lines exempt from header replacement: a shebang or a source-encoding
/// declaration. Only consulted within the first [`EXEMPT_WINDOW`] lines.
static EXEMPT_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(#!|[ \t\f]*#.*?coding[:=][ \t]*[-_.a-zA-Z0-9]+)").expect("exempt regex must compile")
});

/// Number of leading lines inspected for exemption. An exempt line counts
/// toward the window without displacing it.
pub const EXEMPT_WINDOW: u64 = 2;

/// Whether the scanner is inserting a notice or stripping one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteMode {
  /// Insert the canonical block, replacing any existing header.
  Insert,
  /// Remove the existing header block entirely.
  Remove,
}

/// Per-file scan state.
///
/// `Body` is the terminal state in both modes: the remainder of the file
/// after the header region, copied through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
  /// Still at the top of the file, before any header decision.
  Head,
  /// Inside a pre-existing header block, consuming it.
  Copyright,
  /// Past the header region; every remaining line passes through.
  Body,
}

/// What should be written out for the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  /// Write the line through unchanged.
  Emit,
  /// Discard the line.
  Drop,
  /// Write the rendered notice block, then the line unchanged.
  NoticeThenEmit,
  /// Write the rendered notice block and discard the line (the closing
  /// separator of a replaced header).
  Notice,
}

/// Whether a line is exempt from being treated as the start of a header.
pub fn is_exempt(line: &str) -> bool {
  EXEMPT_RE.is_match(line)
}

/// Advances the state machine by one line.
///
/// `line_no` is 1-based. The function is pure: given the same inputs it
/// always produces the same transition.
pub fn advance(mode: RewriteMode, state: ScanState, line: &str, line_no: u64, prefix: char) -> (ScanState, Action) {
  match (mode, state) {
    (_, ScanState::Body) => (ScanState::Body, Action::Emit),

    (RewriteMode::Insert, ScanState::Head) => {
      if is_separator(line, prefix) {
        // Start of an existing header; it is being replaced, so the old
        // opening separator is not emitted.
        (ScanState::Copyright, Action::Drop)
      } else if line_no <= EXEMPT_WINDOW && is_exempt(line) {
        (ScanState::Head, Action::Emit)
      } else {
        (ScanState::Body, Action::NoticeThenEmit)
      }
    }
    (RewriteMode::Insert, ScanState::Copyright) => {
      if is_separator(line, prefix) {
        // The closing separator is consumed; the rendered block carries its
        // own closing separator.
        (ScanState::Body, Action::Notice)
      } else {
        (ScanState::Copyright, Action::Drop)
      }
    }

    (RewriteMode::Remove, ScanState::Head) => {
      if is_separator(line, prefix) {
        (ScanState::Copyright, Action::Drop)
      } else {
        (ScanState::Head, Action::Emit)
      }
    }
    (RewriteMode::Remove, ScanState::Copyright) => {
      if is_separator(line, prefix) {
        (ScanState::Body, Action::Drop)
      } else {
        (ScanState::Copyright, Action::Drop)
      }
    }
  }
}

/// Final classification of a completed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
  /// The scan ran to completion.
  Completed,
  /// Insert mode never reached a body line, so no notice was written. The
  /// output equals the input (empty file, or nothing but exempt lines).
  NoBody,
  /// An opening separator was found but never closed. The partial output is
  /// unusable and the original file must be kept.
  UnterminatedHeader,
}

/// Stateful wrapper over [`advance`] tracking the current state, the line
/// counter, and whether an existing header was encountered.
#[derive(Debug)]
pub struct HeaderScanner {
  mode: RewriteMode,
  prefix: char,
  state: ScanState,
  line_no: u64,
  saw_header: bool,
}

impl HeaderScanner {
  pub const fn new(mode: RewriteMode, prefix: char) -> Self {
    Self {
      mode,
      prefix,
      state: ScanState::Head,
      line_no: 0,
      saw_header: false,
    }
  }

  /// Feeds the next line and returns the action to take for it.
  pub fn push(&mut self, line: &str) -> Action {
    self.line_no += 1;
    let (next, action) = advance(self.mode, self.state, line, self.line_no, self.prefix);
    if matches!(next, ScanState::Copyright) {
      self.saw_header = true;
    }
    self.state = next;
    action
  }

  /// Number of lines fed so far.
  pub const fn line_no(&self) -> u64 {
    self.line_no
  }

  #[allow(dead_code)] // Used by library consumers and tests, not in the CLI binary
  pub const fn state(&self) -> ScanState {
    self.state
  }

  /// Whether the scan passed through an existing header block.
  pub const fn saw_header(&self) -> bool {
    self.saw_header
  }

  /// Classifies the scan after the last line has been fed.
  pub const fn finish(&self) -> ScanOutcome {
    match (self.mode, self.state) {
      (_, ScanState::Copyright) => ScanOutcome::UnterminatedHeader,
      (RewriteMode::Insert, ScanState::Head) => ScanOutcome::NoBody,
      _ => ScanOutcome::Completed,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SEP: &str = "##############################################################################";

  #[test]
  fn test_exempt_shebang() {
    assert!(is_exempt("#!/usr/bin/env python\n"));
    assert!(is_exempt("#!/bin/sh\n"));
  }

  #[test]
  fn test_exempt_encoding_declaration() {
    assert!(is_exempt("# -*- coding: utf-8 -*-\n"));
    assert!(is_exempt("# coding=latin-1\n"));
  }

  #[test]
  fn test_plain_comment_is_not_exempt() {
    assert!(!is_exempt("# hello\n"));
    assert!(!is_exempt("import sys\n"));
  }

  #[test]
  fn test_insert_head_separator_enters_copyright() {
    let (state, action) = advance(RewriteMode::Insert, ScanState::Head, SEP, 1, '#');
    assert_eq!(state, ScanState::Copyright);
    assert_eq!(action, Action::Drop);
  }

  #[test]
  fn test_insert_head_exempt_line_passes_through() {
    let (state, action) = advance(RewriteMode::Insert, ScanState::Head, "#!/usr/bin/env python\n", 1, '#');
    assert_eq!(state, ScanState::Head);
    assert_eq!(action, Action::Emit);
  }

  #[test]
  fn test_insert_head_exempt_window_closes_after_line_two() {
    // The same shebang text on line 3 is an ordinary line: the notice goes in
    // ahead of it.
    let (state, action) = advance(RewriteMode::Insert, ScanState::Head, "#!/usr/bin/env python\n", 3, '#');
    assert_eq!(state, ScanState::Body);
    assert_eq!(action, Action::NoticeThenEmit);
  }

  #[test]
  fn test_insert_head_body_line_inserts_notice() {
    let (state, action) = advance(RewriteMode::Insert, ScanState::Head, "import sys\n", 1, '#');
    assert_eq!(state, ScanState::Body);
    assert_eq!(action, Action::NoticeThenEmit);
  }

  #[test]
  fn test_insert_copyright_consumes_until_separator() {
    let (state, action) = advance(RewriteMode::Insert, ScanState::Copyright, "# old notice\n", 2, '#');
    assert_eq!(state, ScanState::Copyright);
    assert_eq!(action, Action::Drop);

    let (state, action) = advance(RewriteMode::Insert, ScanState::Copyright, SEP, 3, '#');
    assert_eq!(state, ScanState::Body);
    assert_eq!(action, Action::Notice);
  }

  #[test]
  fn test_short_separator_run_is_detected() {
    // Ten repeats is the detection threshold even though 78 are emitted.
    let (state, _) = advance(RewriteMode::Insert, ScanState::Head, "##########\n", 1, '#');
    assert_eq!(state, ScanState::Copyright);

    let (state, action) = advance(RewriteMode::Insert, ScanState::Head, "#########\n", 1, '#');
    assert_eq!(state, ScanState::Body);
    assert_eq!(action, Action::NoticeThenEmit);
  }

  #[test]
  fn test_body_is_terminal() {
    for mode in [RewriteMode::Insert, RewriteMode::Remove] {
      let (state, action) = advance(mode, ScanState::Body, SEP, 40, '#');
      assert_eq!(state, ScanState::Body);
      assert_eq!(action, Action::Emit);
    }
  }

  #[test]
  fn test_remove_head_emits_ordinary_lines() {
    let (state, action) = advance(RewriteMode::Remove, ScanState::Head, "import sys\n", 1, '#');
    assert_eq!(state, ScanState::Head);
    assert_eq!(action, Action::Emit);
  }

  #[test]
  fn test_remove_drops_header_and_both_separators() {
    let mut scanner = HeaderScanner::new(RewriteMode::Remove, '#');
    assert_eq!(scanner.push(SEP), Action::Drop);
    assert_eq!(scanner.push("# old notice\n"), Action::Drop);
    assert_eq!(scanner.push(SEP), Action::Drop);
    assert_eq!(scanner.push("import sys\n"), Action::Emit);
    assert_eq!(scanner.finish(), ScanOutcome::Completed);
    assert!(scanner.saw_header());
  }

  #[test]
  fn test_remove_without_header_passes_file_through() {
    let mut scanner = HeaderScanner::new(RewriteMode::Remove, '#');
    assert_eq!(scanner.push("import sys\n"), Action::Emit);
    assert_eq!(scanner.push("print()\n"), Action::Emit);
    assert_eq!(scanner.finish(), ScanOutcome::Completed);
    assert!(!scanner.saw_header());
  }

  #[test]
  fn test_scanner_full_insert_sequence() {
    let mut scanner = HeaderScanner::new(RewriteMode::Insert, '#');
    assert_eq!(scanner.push("#!/usr/bin/env python\n"), Action::Emit);
    assert_eq!(scanner.push("# hello\n"), Action::NoticeThenEmit);
    assert_eq!(scanner.push("import sys\n"), Action::Emit);
    assert_eq!(scanner.finish(), ScanOutcome::Completed);
    assert!(!scanner.saw_header());
  }

  #[test]
  fn test_unterminated_header_is_flagged() {
    let mut scanner = HeaderScanner::new(RewriteMode::Insert, '#');
    scanner.push(SEP);
    scanner.push("# trailing junk with no closing separator\n");
    assert_eq!(scanner.finish(), ScanOutcome::UnterminatedHeader);
  }

  #[test]
  fn test_empty_file_has_no_insertion_point() {
    let scanner = HeaderScanner::new(RewriteMode::Insert, '#');
    assert_eq!(scanner.finish(), ScanOutcome::NoBody);
  }

  #[test]
  fn test_shebang_only_file_has_no_insertion_point() {
    let mut scanner = HeaderScanner::new(RewriteMode::Insert, '#');
    assert_eq!(scanner.push("#!/usr/bin/env python\n"), Action::Emit);
    assert_eq!(scanner.finish(), ScanOutcome::NoBody);
  }
}
