//! # Configuration Module
//!
//! Optional `.restamp.toml` support. The config file can carry the raw
//! notice text, the comment prefix character, and default patterns, so a
//! project can pin its canonical header without repeating it on every
//! invocation. CLI arguments always win over config values.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

/// Default config file name, looked up in the search root.
pub const CONFIG_FILE_NAME: &str = ".restamp.toml";

/// Configuration loaded from a `.restamp.toml` file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
  /// Raw notice text to insert. Rendered into a comment block at startup.
  #[serde(default)]
  pub notice: Option<String>,

  /// Comment prefix character for notice lines and separators.
  #[serde(default)]
  pub prefix: Option<char>,

  /// Default file-name globs; a leading `~` marks a pattern as negative.
  #[serde(default)]
  pub patterns: Vec<String>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  Read { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  Parse { path: PathBuf, source: toml::de::Error },
}

/// Loads configuration for a run.
///
/// An explicitly given path must exist and parse. Without one, the default
/// file in the root is loaded if present; a missing default file is not an
/// error. `no_config` disables the lookup entirely.
pub fn load_config(explicit: Option<&Path>, root: &Path, no_config: bool) -> Result<Option<Config>, ConfigError> {
  if no_config {
    debug!("config file lookup disabled");
    return Ok(None);
  }

  let path = match explicit {
    Some(path) => path.to_path_buf(),
    None => {
      let candidate = root.join(CONFIG_FILE_NAME);
      if !candidate.is_file() {
        return Ok(None);
      }
      candidate
    }
  };

  let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
    path: path.clone(),
    source,
  })?;
  let config: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
    path: path.clone(),
    source,
  })?;

  debug!("loaded config from {}", path.display());
  Ok(Some(config))
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_missing_default_config_is_not_an_error() {
    let dir = tempdir().expect("tempdir");
    let config = load_config(None, dir.path(), false).expect("load");
    assert!(config.is_none());
  }

  #[test]
  fn test_no_config_flag_skips_existing_file() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(CONFIG_FILE_NAME), "prefix = \"#\"").expect("write");
    let config = load_config(None, dir.path(), true).expect("load");
    assert!(config.is_none());
  }

  #[test]
  fn test_load_full_config() {
    let dir = tempdir().expect("tempdir");
    let raw = r#"
notice = """
Copyright X
All rights reserved.
"""
prefix = ";"
patterns = ["*.lisp", "~scratch.lisp"]
"#;
    fs::write(dir.path().join(CONFIG_FILE_NAME), raw).expect("write");

    let config = load_config(None, dir.path(), false).expect("load").expect("present");
    assert_eq!(config.prefix, Some(';'));
    assert_eq!(config.patterns, vec!["*.lisp", "~scratch.lisp"]);
    assert!(config.notice.expect("notice").starts_with("Copyright X"));
  }

  #[test]
  fn test_unknown_key_is_rejected() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(CONFIG_FILE_NAME), "noitce = \"typo\"").expect("write");
    let err = load_config(None, dir.path(), false).expect_err("must fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
  }

  #[test]
  fn test_explicit_missing_path_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("elsewhere.toml");
    let err = load_config(Some(&missing), dir.path(), false).expect_err("must fail");
    assert!(matches!(err, ConfigError::Read { .. }));
  }
}
