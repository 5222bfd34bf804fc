//! # Stamp Command
//!
//! The single command of the restamp tool: discover candidate files under a
//! root directory and rewrite their leading notice block (or strip it in
//! remove mode).

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::config::{Config, load_config};
use crate::discovery::{self, PatternSet};
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::notice::{DEFAULT_PREFIX, NoticeBlock};
use crate::output::{
  CategorizedEvents, print_blank_line, print_dry_run_listing, print_results, print_start_message, print_summary,
};
use crate::report::{FileAction, RunReport};
use crate::rewriter::{RewriteError, RewriteOp, RewriteOutcome, rewrite_file};
use crate::{info_log, verbose_log};

/// Patterns used when neither the CLI nor the config file provides any.
const DEFAULT_PATTERNS: &[&str] = &["*.py", "~__init__.py"];

/// Exit code for zero discovered files.
const EXIT_NO_FILES: i32 = 1;

/// Exit code for configuration/usage errors reported before any file I/O.
const EXIT_USAGE: i32 = 2;

/// Arguments for the stamp command
#[derive(Args, Debug, Default)]
pub struct StampArgs {
  /// Directory searched recursively for candidate files
  #[arg(value_name = "ROOT")]
  pub root: PathBuf,

  /// File name globs; a leading `~` excludes matches
  ///
  /// [default: *.py ~__init__.py]
  #[arg(value_name = "PATTERN")]
  pub patterns: Vec<String>,

  /// List matched files without rewriting anything
  #[arg(long, short = 'n')]
  pub dry_run: bool,

  /// Strip the notice block instead of inserting one
  #[arg(long, short = 'r')]
  pub remove: bool,

  /// File containing the raw notice text
  #[arg(long, short = 'f', value_name = "FILE")]
  pub notice_file: Option<PathBuf>,

  /// Comment prefix character for notice lines and separators
  #[arg(long, value_name = "CHAR")]
  pub prefix: Option<char>,

  /// Path to config file (default: .restamp.toml in the root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

/// Reports a configuration/usage error and terminates before any file I/O.
fn usage_error(message: impl std::fmt::Display) -> ! {
  eprintln!("ERROR: {message}");
  process::exit(EXIT_USAGE);
}

/// Run the stamp command with the given arguments
pub fn run_stamp(args: StampArgs) -> Result<()> {
  // Initialize tracing subscriber for structured logging
  init_tracing(args.quiet, args.verbose);

  // Set verbose mode for output formatting and the info_log! macro
  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  if !args.root.is_dir() {
    usage_error(format_args!("root '{}' is not a directory", args.root.display()));
  }

  // Load configuration file if present
  let config = match load_config(args.config.as_deref(), &args.root, args.no_config) {
    Ok(config) => config.unwrap_or_default(),
    Err(e) => usage_error(e),
  };

  let patterns = resolve_patterns(&args, &config);
  debug!("using patterns: {:?}", patterns);

  // Pattern validation happens before any file I/O
  let pattern_set = match PatternSet::parse(&patterns) {
    Ok(set) => set,
    Err(e) => usage_error(e),
  };

  let prefix = args.prefix.or(config.prefix).unwrap_or(DEFAULT_PREFIX);
  if prefix.is_whitespace() {
    usage_error("the comment prefix must not be a whitespace character");
  }

  let mut files = discovery::enumerate(&args.root, &pattern_set)?;
  if files.is_empty() {
    eprintln!("WARNING: no files under '{}' matched {:?}", args.root.display(), patterns);
    process::exit(EXIT_NO_FILES);
  }
  // Discovery order is not guaranteed; sort for stable output and processing.
  files.sort();

  if args.dry_run {
    print_dry_run_listing(&files, &args.root);
    return Ok(());
  }

  // The notice block is rendered once and reused for every file.
  let notice = if args.remove {
    None
  } else {
    Some(NoticeBlock::new(prefix, &resolve_notice_text(&args, &config)))
  };
  let op = match &notice {
    Some(block) => RewriteOp::Insert(block),
    None => RewriteOp::Remove { prefix },
  };

  print_start_message(files.len(), args.remove);

  let start_time = Instant::now();
  let mut report = RunReport::new();

  for path in &files {
    match rewrite_file(path, op) {
      Ok(RewriteOutcome::Inserted) => {
        info_log!("Inserted notice into: {}", path.display());
        report.record_action(path, FileAction::Inserted);
      }
      Ok(RewriteOutcome::Replaced) => {
        info_log!("Replaced notice in: {}", path.display());
        report.record_action(path, FileAction::Replaced);
      }
      Ok(RewriteOutcome::Removed) => {
        info_log!("Stripped notice from: {}", path.display());
        report.record_action(path, FileAction::Removed);
      }
      Ok(RewriteOutcome::Unchanged) => {
        verbose_log!("Unchanged: {}", path.display());
        report.record_action(path, FileAction::Unchanged);
      }
      Err(e @ RewriteError::UnterminatedHeader { .. }) => {
        eprintln!("WARNING: {e}");
        report.record_warning(path, e.to_string());
      }
      Err(e) => {
        // Decode and I/O failures are isolated per file; the run continues.
        eprintln!("ERROR: {e}");
        report.record_error(path, e.to_string());
      }
    }
  }

  let summary = report.summary(start_time.elapsed());
  let categorized = CategorizedEvents::from_events(report.events());

  print_blank_line();
  print_results(&categorized, &args.root);
  print_blank_line();
  print_summary(&summary);

  Ok(())
}

/// Patterns from the CLI, falling back to the config file, falling back to
/// the built-in defaults.
fn resolve_patterns(args: &StampArgs, config: &Config) -> Vec<String> {
  if !args.patterns.is_empty() {
    args.patterns.clone()
  } else if !config.patterns.is_empty() {
    config.patterns.clone()
  } else {
    DEFAULT_PATTERNS.iter().map(|p| (*p).to_string()).collect()
  }
}

/// Raw notice text from `--notice-file`, falling back to the config file.
/// Insert mode cannot run without one.
fn resolve_notice_text(args: &StampArgs, config: &Config) -> String {
  if let Some(path) = &args.notice_file {
    match std::fs::read_to_string(path) {
      Ok(text) => return text,
      Err(e) => usage_error(format_args!("failed to read notice file '{}': {}", path.display(), e)),
    }
  }

  match &config.notice {
    Some(text) => text.clone(),
    None => usage_error("no notice text configured; pass --notice-file or set `notice` in .restamp.toml"),
  }
}
