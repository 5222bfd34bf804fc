//! # Discovery Module
//!
//! Candidate file enumeration: a recursive walk under the root directory,
//! filtered by positive and negative file-name globs. A file is a candidate
//! when its basename matches at least one positive pattern and none of the
//! negative patterns.
//!
//! The returned collection is unordered; callers that need a stable order
//! sort it themselves.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Leading marker that flags a pattern as negative (exclude).
pub const NEGATE_MARKER: char = '~';

/// Pattern parse failures, reported before any file I/O happens.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
  /// Patterns apply to basenames only, so path separators are rejected.
  #[error("pattern '{0}' must be a bare file name (no path separators)")]
  PathSeparator(String),

  /// The glob itself does not parse.
  #[error("pattern '{pattern}' is not a valid glob: {source}")]
  Glob {
    pattern: String,
    source: glob::PatternError,
  },
}

/// Compiled positive/negative basename globs.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
  positive: Vec<glob::Pattern>,
  negative: Vec<glob::Pattern>,
}

impl PatternSet {
  /// Compiles raw pattern strings. A leading [`NEGATE_MARKER`] makes a
  /// pattern negative; the marker is not part of the glob.
  pub fn parse(patterns: &[String]) -> Result<Self, PatternError> {
    let mut positive = Vec::new();
    let mut negative = Vec::new();

    for raw in patterns {
      let (negated, body) = match raw.strip_prefix(NEGATE_MARKER) {
        Some(rest) => (true, rest),
        None => (false, raw.as_str()),
      };

      if body.contains(['/', '\\']) {
        return Err(PatternError::PathSeparator(raw.clone()));
      }

      let pattern = glob::Pattern::new(body).map_err(|source| PatternError::Glob {
        pattern: raw.clone(),
        source,
      })?;

      if negated {
        negative.push(pattern);
      } else {
        positive.push(pattern);
      }
    }

    Ok(Self { positive, negative })
  }

  /// Whether a basename is selected by this set.
  pub fn matches(&self, file_name: &str) -> bool {
    self.positive.iter().any(|p| p.matches(file_name)) && !self.negative.iter().any(|p| p.matches(file_name))
  }
}

/// Enumerates candidate files under `root`.
///
/// Unreadable directory entries are logged and skipped rather than aborting
/// the walk. Symlinks are not followed.
pub fn enumerate(root: &Path, patterns: &PatternSet) -> Result<Vec<PathBuf>> {
  let mut files = Vec::new();

  for entry in WalkDir::new(root) {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) => {
        warn!("skipping unreadable entry under {}: {}", root.display(), e);
        continue;
      }
    };

    if !entry.file_type().is_file() {
      continue;
    }

    let Some(name) = entry.file_name().to_str() else {
      continue;
    };

    if patterns.matches(name) {
      files.push(entry.into_path());
    }
  }

  debug!("discovered {} candidate files under {}", files.len(), root.display());
  Ok(files)
}
