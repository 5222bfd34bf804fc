//! # Report Module
//!
//! Structured per-file events collected over a run. The rewrite loop records
//! one event per file into a [`RunReport`] sink; the output module renders
//! the collected events and the derived [`RunSummary`] at the end of the run.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Severity of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Info,
  Warning,
  Error,
}

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
  /// The notice block was inserted; no header existed before.
  Inserted,
  /// An existing header was replaced by the notice block.
  Replaced,
  /// An existing header was stripped.
  Removed,
  /// The file content was left as it was.
  Unchanged,
  /// The rewrite failed and the original content was restored.
  Restored,
}

/// A single structured event: file path, severity, action, and an optional
/// human-readable message.
#[derive(Debug, Clone)]
pub struct FileEvent {
  pub path: PathBuf,
  pub severity: Severity,
  pub action: FileAction,
  pub message: Option<String>,
}

/// Sink collecting the events of one run.
#[derive(Debug, Default)]
pub struct RunReport {
  events: Vec<FileEvent>,
}

impl RunReport {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records a successful action on a file.
  pub fn record_action(&mut self, path: &Path, action: FileAction) {
    self.events.push(FileEvent {
      path: path.to_path_buf(),
      severity: Severity::Info,
      action,
      message: None,
    });
  }

  /// Records a recoverable problem; the file was restored.
  pub fn record_warning(&mut self, path: &Path, message: impl Into<String>) {
    self.events.push(FileEvent {
      path: path.to_path_buf(),
      severity: Severity::Warning,
      action: FileAction::Restored,
      message: Some(message.into()),
    });
  }

  /// Records a per-file failure; the file was restored.
  pub fn record_error(&mut self, path: &Path, message: impl Into<String>) {
    self.events.push(FileEvent {
      path: path.to_path_buf(),
      severity: Severity::Error,
      action: FileAction::Restored,
      message: Some(message.into()),
    });
  }

  pub fn events(&self) -> &[FileEvent] {
    &self.events
  }

  /// Derives the end-of-run summary.
  pub fn summary(&self, elapsed: Duration) -> RunSummary {
    RunSummary::from_events(&self.events, elapsed)
  }
}

/// Aggregated counts for the end-of-run summary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
  /// Total number of files processed.
  pub total: usize,
  /// Files that had the notice inserted.
  pub inserted: usize,
  /// Files that had an existing header replaced.
  pub replaced: usize,
  /// Files that had their header stripped.
  pub removed: usize,
  /// Files left untouched.
  pub unchanged: usize,
  /// Files restored after a failed rewrite.
  pub restored: usize,
  /// Wall-clock duration of the run.
  pub elapsed: Duration,
}

impl RunSummary {
  pub fn from_events(events: &[FileEvent], elapsed: Duration) -> Self {
    let count = |action: FileAction| events.iter().filter(|e| e.action == action).count();

    Self {
      total: events.len(),
      inserted: count(FileAction::Inserted),
      replaced: count(FileAction::Replaced),
      removed: count(FileAction::Removed),
      unchanged: count(FileAction::Unchanged),
      restored: count(FileAction::Restored),
      elapsed,
    }
  }

  /// Number of files whose on-disk content changed.
  pub const fn rewritten(&self) -> usize {
    self.inserted + self.replaced + self.removed
  }
}
