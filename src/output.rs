//! # Output Module
//!
//! This module centralizes all user-facing output for the restamp tool.
//! It provides consistent formatting, colors, and symbols for terminal
//! output.
//!
//! ## Design Goals
//!
//! - **Informative**: Show actionable information without requiring flags
//! - **Scannable**: Use formatting to make output easy to parse visually
//! - **Progressive**: More detail with `-v`, silence with `-q`
//! - **Scriptable**: Keep stdout predictable for piping/automation

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileAction, FileEvent, RunSummary, Severity};

/// Symbols used in output
pub mod symbols {
  /// Success/rewritten
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure/restored
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Replaced existing header
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Maximum number of files to show per list before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Events grouped by the action taken, for rendering.
#[derive(Debug, Default)]
pub struct CategorizedEvents<'a> {
  pub inserted: Vec<&'a FileEvent>,
  pub replaced: Vec<&'a FileEvent>,
  pub removed: Vec<&'a FileEvent>,
  pub restored: Vec<&'a FileEvent>,
}

impl<'a> CategorizedEvents<'a> {
  pub fn from_events(events: &'a [FileEvent]) -> Self {
    let mut categorized = Self::default();
    for event in events {
      match event.action {
        FileAction::Inserted => categorized.inserted.push(event),
        FileAction::Replaced => categorized.replaced.push(event),
        FileAction::Removed => categorized.removed.push(event),
        FileAction::Restored => categorized.restored.push(event),
        FileAction::Unchanged => {}
      }
    }
    categorized
  }
}

/// Print the initial "Rewriting N files..." or "Stripping N files..."
/// message.
pub fn print_start_message(file_count: usize, removing: bool) {
  if is_quiet() {
    return;
  }

  let verb = if removing { "Stripping notices from" } else { "Rewriting" };
  let files_word = if file_count == 1 { "file" } else { "files" };

  println!("{} {} {}...", verb, file_count, files_word);
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the dry-run listing: one matched path per line.
///
/// The bare paths go to stdout even in quiet mode so the listing stays
/// scriptable; only the trailing count respects quiet.
pub fn print_dry_run_listing(files: &[std::path::PathBuf], root: &Path) {
  let mut sorted: Vec<_> = files.iter().collect();
  sorted.sort();

  for file in &sorted {
    println!("{}", make_relative_path(file, Some(root)));
  }

  if !is_quiet() {
    let count = sorted.len();
    println!();
    println!("{} {} matched (dry run, nothing written)", count, if count == 1 { "file" } else { "files" });
  }
}

/// Print a list of files that were rewritten, under a colored header.
fn print_action_list(header_symbol: &str, label: &str, events: &[&FileEvent], root: &Path) {
  if events.is_empty() {
    return;
  }

  let mut sorted: Vec<_> = events.to_vec();
  sorted.sort_by(|a, b| a.path.cmp(&b.path));

  let count = sorted.len();
  println!(
    "{} {} {} {}:",
    header_symbol.if_supports_color(Stream::Stdout, |s| s.green()),
    count,
    if count == 1 { "file" } else { "files" },
    label
  );

  let show_all = is_verbose();
  let effective_limit = if show_all { count } else { DEFAULT_FILE_LIST_LIMIT };

  for event in sorted.iter().take(effective_limit) {
    println!("  {}", make_relative_path(&event.path, Some(root)));
  }

  if !show_all && count > effective_limit {
    println!("  ... and {} more (use -v to see all)", count - effective_limit);
  }
}

/// Print the categorized results of a run.
pub fn print_results(categorized: &CategorizedEvents<'_>, root: &Path) {
  if is_quiet() {
    return;
  }

  print_action_list(symbols::SUCCESS, "had the notice inserted", &categorized.inserted, root);
  if !categorized.replaced.is_empty() {
    if !categorized.inserted.is_empty() {
      print_blank_line();
    }
    print_action_list(symbols::UPDATED, "had their notice replaced", &categorized.replaced, root);
  }
  if !categorized.removed.is_empty() {
    print_action_list(symbols::SUCCESS, "had their notice stripped", &categorized.removed, root);
  }

  if !categorized.restored.is_empty() {
    print_blank_line();
    let count = categorized.restored.len();
    println!(
      "{} {} {} restored after a failed rewrite:",
      symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
      count,
      if count == 1 { "file" } else { "files" }
    );
    for event in &categorized.restored {
      let tag = match event.severity {
        Severity::Warning => "warning",
        _ => "error",
      };
      let reason = event.message.as_deref().unwrap_or("unknown failure");
      println!("  {} ({}: {})", make_relative_path(&event.path, Some(root)), tag, reason);
    }
  }
}

/// Print the end-of-run summary line.
pub fn print_summary(summary: &RunSummary) {
  if is_quiet() {
    return;
  }

  let elapsed_ms = summary.elapsed.as_millis();
  println!(
    "{} files processed in {}ms: {} rewritten, {} unchanged, {} restored",
    summary.total,
    elapsed_ms,
    summary.rewritten(),
    summary.unchanged,
    summary.restored
  );
}

/// Render a path relative to the workspace root when possible.
fn make_relative_path(path: &Path, root: Option<&Path>) -> String {
  if let Some(root) = root
    && let Ok(relative) = path.strip_prefix(root)
    && !relative.as_os_str().is_empty()
  {
    return relative.display().to_string();
  }
  path.display().to_string()
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;
  use crate::report::Severity;

  fn event(path: &str, action: FileAction) -> FileEvent {
    FileEvent {
      path: PathBuf::from(path),
      severity: Severity::Info,
      action,
      message: None,
    }
  }

  #[test]
  fn test_categorize_groups_by_action() {
    let events = vec![
      event("a.py", FileAction::Inserted),
      event("b.py", FileAction::Replaced),
      event("c.py", FileAction::Unchanged),
      event("d.py", FileAction::Restored),
    ];

    let categorized = CategorizedEvents::from_events(&events);
    assert_eq!(categorized.inserted.len(), 1);
    assert_eq!(categorized.replaced.len(), 1);
    assert_eq!(categorized.removed.len(), 0);
    assert_eq!(categorized.restored.len(), 1);
  }

  #[test]
  fn test_make_relative_path_strips_root() {
    let path = PathBuf::from("/work/tree/pkg/mod.py");
    assert_eq!(make_relative_path(&path, Some(Path::new("/work/tree"))), "pkg/mod.py");
  }

  #[test]
  fn test_make_relative_path_outside_root_stays_absolute() {
    let path = PathBuf::from("/elsewhere/mod.py");
    assert_eq!(make_relative_path(&path, Some(Path::new("/work/tree"))), "/elsewhere/mod.py");
  }
}
