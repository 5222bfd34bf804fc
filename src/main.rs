//! # restamp
//!
//! A tool that rewrites the leading comment block of source files to a
//! canonical copyright notice.

mod cli;
mod config;
mod discovery;
mod logging;
mod notice;
mod output;
mod report;
mod rewriter;
mod scan;

use anyhow::Result;

use crate::cli::{Cli, run_stamp};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run_stamp(cli.args)
}
