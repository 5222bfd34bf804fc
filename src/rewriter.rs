//! # Rewriter Module
//!
//! Per-file rewriting with backup-then-restore semantics. A file is either
//! fully rewritten or left byte-for-byte identical to its original content;
//! no partial rewrite ever survives.
//!
//! The original is renamed to a backup path, streamed through the
//! [`HeaderScanner`] into a fresh file at the original path, and the backup
//! is removed on success. Any failure (undecodable line, unterminated header,
//! I/O error) restores the backup via a scoped guard, so every exit path is
//! covered without manual bookkeeping.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::notice::NoticeBlock;
use crate::scan::{Action, HeaderScanner, RewriteMode, ScanOutcome};

/// Suffix appended to the original file name while a rewrite is in flight.
const BACKUP_SUFFIX: &str = ".orig";

/// What a rewrite should do to each file.
#[derive(Debug, Clone, Copy)]
pub enum RewriteOp<'a> {
  /// Insert the canonical block, replacing any existing header.
  Insert(&'a NoticeBlock),
  /// Strip the existing header block.
  Remove {
    /// Comment prefix character used for separator detection.
    prefix: char,
  },
}

impl RewriteOp<'_> {
  const fn mode(&self) -> RewriteMode {
    match self {
      Self::Insert(_) => RewriteMode::Insert,
      Self::Remove { .. } => RewriteMode::Remove,
    }
  }

  const fn prefix(&self) -> char {
    match self {
      Self::Insert(block) => block.prefix(),
      Self::Remove { prefix } => *prefix,
    }
  }
}

/// How a successful rewrite changed the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
  /// No header existed; the notice block was inserted.
  Inserted,
  /// An existing header was replaced by the notice block.
  Replaced,
  /// An existing header was stripped.
  Removed,
  /// The output equals the input (nothing to remove, or no insertion point).
  Unchanged,
}

/// Per-file rewrite failures. All of them leave the file restored to its
/// original content.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
  /// A line could not be decoded as UTF-8.
  #[error("{path}:{line}: line is not valid UTF-8; file restored")]
  Decode { path: PathBuf, line: u64 },

  /// A header separator was opened but never closed.
  #[error("{path}: header separator is never closed; file left unchanged")]
  UnterminatedHeader { path: PathBuf },

  /// Reading, writing, or renaming failed partway through.
  #[error("failed to rewrite {path}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl RewriteError {
  /// The file the failure belongs to.
  #[allow(dead_code)] // Used by library consumers and tests, not in the CLI binary
  pub fn path(&self) -> &Path {
    match self {
      Self::Decode { path, .. } | Self::UnterminatedHeader { path } | Self::Io { path, .. } => path,
    }
  }
}

/// Holds the renamed original and restores it on drop unless the rewrite was
/// committed.
struct BackupGuard<'a> {
  original: &'a Path,
  backup: PathBuf,
  committed: bool,
}

impl<'a> BackupGuard<'a> {
  /// Moves the original aside, claiming the backup path.
  fn take(original: &'a Path) -> std::io::Result<Self> {
    let backup = backup_path(original);
    fs::rename(original, &backup)?;
    trace!("moved {} to {}", original.display(), backup.display());
    Ok(Self {
      original,
      backup,
      committed: false,
    })
  }

  fn backup(&self) -> &Path {
    &self.backup
  }

  /// Declares the rewrite complete and discards the backup. The guard is
  /// disarmed first so a failed removal can never trigger a restore over the
  /// freshly written file.
  fn commit(mut self) {
    self.committed = true;
    if let Err(e) = fs::remove_file(&self.backup) {
      debug!("could not remove backup {}: {}", self.backup.display(), e);
    }
  }
}

impl Drop for BackupGuard<'_> {
  fn drop(&mut self) {
    if self.committed {
      return;
    }
    // Best effort: drop whatever was partially written, then put the
    // original back in place.
    let _ = fs::remove_file(self.original);
    if let Err(e) = fs::rename(&self.backup, self.original) {
      debug!("could not restore {} from backup: {}", self.original.display(), e);
    }
  }
}

/// The backup path for a file: its name with [`BACKUP_SUFFIX`] appended.
fn backup_path(path: &Path) -> PathBuf {
  let mut name = OsString::from(path.as_os_str());
  name.push(BACKUP_SUFFIX);
  PathBuf::from(name)
}

/// Rewrites a single file in place.
///
/// Streams the file line by line through the header state machine and writes
/// the transformed stream back to the original path. Lines are carried as raw
/// bytes, so the body of the file (including line endings) is preserved
/// byte-for-byte.
///
/// # Errors
///
/// Returns a [`RewriteError`] on an undecodable line, an unterminated header,
/// or an I/O failure. In every error case the file has already been restored
/// to its original content.
pub fn rewrite_file(path: &Path, op: RewriteOp<'_>) -> Result<RewriteOutcome, RewriteError> {
  let io_err = |source: std::io::Error| RewriteError::Io {
    path: path.to_path_buf(),
    source,
  };

  let guard = BackupGuard::take(path).map_err(io_err)?;
  let mut reader = BufReader::new(File::open(guard.backup()).map_err(io_err)?);
  let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);

  let mut scanner = HeaderScanner::new(op.mode(), op.prefix());
  let mut raw = Vec::with_capacity(256);

  loop {
    raw.clear();
    let n = reader.read_until(b'\n', &mut raw).map_err(io_err)?;
    if n == 0 {
      break;
    }

    let line = std::str::from_utf8(&raw).map_err(|_| RewriteError::Decode {
      path: path.to_path_buf(),
      line: scanner.line_no() + 1,
    })?;

    match scanner.push(line) {
      Action::Emit => writer.write_all(&raw).map_err(io_err)?,
      Action::Drop => {}
      Action::NoticeThenEmit => {
        if let RewriteOp::Insert(block) = op {
          writer.write_all(block.rendered().as_bytes()).map_err(io_err)?;
        }
        writer.write_all(&raw).map_err(io_err)?;
      }
      Action::Notice => {
        if let RewriteOp::Insert(block) = op {
          writer.write_all(block.rendered().as_bytes()).map_err(io_err)?;
        }
      }
    }
  }

  let outcome = match scanner.finish() {
    ScanOutcome::UnterminatedHeader => {
      // The partial output is missing the consumed header lines; the guard
      // puts the original back when it drops.
      return Err(RewriteError::UnterminatedHeader {
        path: path.to_path_buf(),
      });
    }
    ScanOutcome::NoBody => {
      debug!("{}: no insertion point, content unchanged", path.display());
      RewriteOutcome::Unchanged
    }
    ScanOutcome::Completed => match op.mode() {
      RewriteMode::Insert => {
        if scanner.saw_header() {
          RewriteOutcome::Replaced
        } else {
          RewriteOutcome::Inserted
        }
      }
      RewriteMode::Remove => {
        if scanner.saw_header() {
          RewriteOutcome::Removed
        } else {
          RewriteOutcome::Unchanged
        }
      }
    },
  };

  writer.flush().map_err(io_err)?;
  drop(writer);
  guard.commit();

  Ok(outcome)
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  fn notice() -> NoticeBlock {
    NoticeBlock::new('#', "Copyright X")
  }

  #[test]
  fn test_backup_path_appends_suffix() {
    assert_eq!(backup_path(Path::new("/tmp/a.py")), PathBuf::from("/tmp/a.py.orig"));
  }

  #[test]
  fn test_insert_into_plain_file() {
    let dir = tempdir().expect("tempdir");
    let file = dir.path().join("plain.py");
    fs::write(&file, "import sys\n").expect("write");

    let block = notice();
    let outcome = rewrite_file(&file, RewriteOp::Insert(&block)).expect("rewrite");
    assert_eq!(outcome, RewriteOutcome::Inserted);

    let content = fs::read_to_string(&file).expect("read");
    assert_eq!(content, format!("{}import sys\n", block.rendered()));
  }

  #[test]
  fn test_backup_is_removed_after_success() {
    let dir = tempdir().expect("tempdir");
    let file = dir.path().join("a.py");
    fs::write(&file, "x = 1\n").expect("write");

    let block = notice();
    rewrite_file(&file, RewriteOp::Insert(&block)).expect("rewrite");
    assert!(!backup_path(&file).exists());
  }

  #[test]
  fn test_decode_error_restores_original_bytes() {
    let dir = tempdir().expect("tempdir");
    let file = dir.path().join("bad.py");
    let original: &[u8] = b"import sys\n\xff\xfe broken\nprint()\n";
    fs::write(&file, original).expect("write");

    let block = notice();
    let err = rewrite_file(&file, RewriteOp::Insert(&block)).expect_err("must fail");
    match err {
      RewriteError::Decode { line, .. } => assert_eq!(line, 2),
      other => panic!("unexpected error: {other}"),
    }

    assert_eq!(fs::read(&file).expect("read"), original);
    assert!(!backup_path(&file).exists());
  }

  #[test]
  fn test_unterminated_header_restores_original() {
    let dir = tempdir().expect("tempdir");
    let file = dir.path().join("open.py");
    let original = format!("{}\n# never closed\n", "#".repeat(78));
    fs::write(&file, &original).expect("write");

    let block = notice();
    let err = rewrite_file(&file, RewriteOp::Insert(&block)).expect_err("must fail");
    assert!(matches!(err, RewriteError::UnterminatedHeader { .. }));

    assert_eq!(fs::read_to_string(&file).expect("read"), original);
    assert!(!backup_path(&file).exists());
  }

  #[test]
  fn test_remove_without_header_is_unchanged() {
    let dir = tempdir().expect("tempdir");
    let file = dir.path().join("plain.py");
    fs::write(&file, "import sys\n").expect("write");

    let outcome = rewrite_file(&file, RewriteOp::Remove { prefix: '#' }).expect("rewrite");
    assert_eq!(outcome, RewriteOutcome::Unchanged);
    assert_eq!(fs::read_to_string(&file).expect("read"), "import sys\n");
  }

  #[test]
  fn test_missing_file_is_an_io_error() {
    let dir = tempdir().expect("tempdir");
    let file = dir.path().join("absent.py");

    let block = notice();
    let err = rewrite_file(&file, RewriteOp::Insert(&block)).expect_err("must fail");
    assert!(matches!(err, RewriteError::Io { .. }));
  }
}
