//! # restamp
//!
//! A tool that rewrites the leading comment block of source files to contain a
//! canonical legal/copyright notice, replacing any previous notice and
//! inserting one if absent.
//!
//! `restamp` treats any line beginning with the comment-prefix character as a
//! comment; it never parses language syntax. Everything outside the detected
//! header region is preserved byte-for-byte, and a file is only ever left on
//! disk fully rewritten or fully original.
//!
//! ## Features
//!
//! * Recursively discover candidate files by positive/negative file-name globs
//! * Insert, replace, or strip a separator-bounded notice block
//! * Preserve shebang and encoding-declaration lines ahead of the notice
//! * Per-file backup-then-restore, so a decode failure never corrupts a file
//! * Dry-run mode that lists the files a run would touch
//!
//! ## Usage as a Library
//!
//! This crate can be used as a library in your Rust projects:
//!
//! ```rust,no_run
//! use restamp::notice::NoticeBlock;
//! use restamp::rewriter::{RewriteOp, rewrite_file};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Render the canonical block once; it is reused for every file.
//!     let block = NoticeBlock::new('#', "Copyright (c) Example Corp\nAll rights reserved.");
//!
//!     let outcome = rewrite_file(Path::new("src/workflow.py"), RewriteOp::Insert(&block))?;
//!     println!("{outcome:?}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`scan`] - The line-oriented header state machine
//! * [`rewriter`] - Atomic per-file rewriting with rollback
//! * [`notice`] - Canonical notice block rendering
//! * [`discovery`] - Candidate file enumeration
//! * [`report`] - Structured per-file run events
//! * [`logging`] - Logging utilities for verbose output
//!
//! [`scan`]: crate::scan
//! [`rewriter`]: crate::rewriter
//! [`notice`]: crate::notice
//! [`discovery`]: crate::discovery
//! [`report`]: crate::report
//! [`logging`]: crate::logging

// Re-export modules for public API
pub mod discovery;
pub mod logging;
pub mod notice;
pub mod report;
pub mod rewriter;
pub mod scan;
