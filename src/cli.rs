// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI structure is a plain Rust struct and clap
// generates the parsing code (plus --help and --version) from its attributes.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "linkscan",
    version,
    about = "Check links in markdown files for 404 errors and invalid references",
    long_about = "linkscan walks a directory of markdown files, extracts every link, \
                  and verifies external URLs over HTTP and relative paths against the \
                  filesystem. Useful in CI pipelines to keep documentation honest."
)]
pub struct Cli {
    /// Directory to check (default: current directory)
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Check only external (http/https) links
    #[arg(long)]
    pub external_only: bool,

    /// Check only internal (relative path) links
    #[arg(long)]
    pub internal_only: bool,

    /// Do not report fragment-only links such as `#section`
    #[arg(long)]
    pub ignore_fragments: bool,
}

// The three flags are orthogonal filters. Passing --external-only together
// with --internal-only is allowed; each side then skips its own category and
// nothing gets checked. No mutual-exclusion enforcement on purpose.
