// src/main.rs
// =============================================================================
// Entry point. One sequential pipeline:
//
// 1. Parse command-line arguments with clap
// 2. Discover markdown files under the target directory
// 3. Extract link occurrences per file, classify and validate each one
// 4. Print a summary and exit (0 = clean, 1 = broken links or missing
//    directory, 2 = unexpected error)
//
// async only because the external checks go through reqwest; everything runs
// one await at a time, no concurrent work.
// =============================================================================

mod checker;
mod cli;
mod extract;
mod report;
mod scan;

use anyhow::Result;
use clap::Parser;
use std::fs;

use checker::{classify, LinkKind, UrlChecker};
use cli::Cli;
use extract::Extractor;
use report::RunSummary;
use scan::ScanError;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let files = match scan::find_markdown_files(&cli.directory) {
        Ok(files) => files,
        Err(ScanError::DirectoryNotFound(path)) => {
            report::log_error(&format!("Directory does not exist: {}", path.display()));
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };

    report::log_info(&format!("Checking links in: {}", cli.directory.display()));
    report::log_info(&format!("Found {} markdown files", files.len()));

    let extractor = Extractor::new();
    let mut url_checker = UrlChecker::new()?;
    let mut summary = RunSummary::default();

    for file in &files {
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                // A single unreadable file never aborts the run
                report::log_error(&format!("Cannot read {}: {}", file.display(), e));
                continue;
            }
        };

        let links = extractor.extract(&content);
        if links.is_empty() {
            continue;
        }

        let display_path = file.strip_prefix(&cli.directory).unwrap_or(file);
        report::file_header(display_path);

        for occurrence in links {
            summary.total += 1;
            let url = occurrence.url.as_str();

            match classify(url) {
                LinkKind::Skippable => {
                    report::skipped_line(occurrence.line, url, "Skipped (mail or phone link)");
                }
                LinkKind::Fragment => {
                    // Fragments are never checked; the flag only silences
                    // their report lines
                    if !cli.ignore_fragments {
                        report::skipped_line(occurrence.line, url, "Skipped (fragment link)");
                    }
                }
                LinkKind::External => {
                    if cli.internal_only {
                        report::skipped_line(occurrence.line, url, "Skipped (--internal-only)");
                        continue;
                    }
                    let outcome = url_checker.check(url).await;
                    report::outcome_line(occurrence.line, url, &outcome);
                    if !outcome.ok {
                        summary.broken += 1;
                    }
                }
                LinkKind::Relative => {
                    if cli.external_only {
                        report::skipped_line(occurrence.line, url, "Skipped (--external-only)");
                        continue;
                    }
                    let outcome = checker::path::check_relative(url, file);
                    report::outcome_line(occurrence.line, url, &outcome);
                    if !outcome.ok {
                        summary.broken += 1;
                    }
                }
            }
        }
    }

    summary.print();

    if summary.broken > 0 {
        report::log_error(&format!("Found {} broken links", summary.broken));
        Ok(1)
    } else {
        report::log_success("All links are working!");
        Ok(0)
    }
}
