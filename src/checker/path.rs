// src/checker/path.rs
// =============================================================================
// Relative path verification.
//
// A relative target is resolved against the directory of the document that
// references it. `./x`, `../x`, and a bare `x` all resolve the same way: join
// onto the parent directory and let the filesystem handle any `..` hops.
// Fragments (#...) and queries (?...) are stripped before resolving.
// =============================================================================

use std::io::ErrorKind;
use std::path::Path;

use super::CheckOutcome;

/// Check whether a relative link target exists on disk.
///
/// `document` is the path of the file containing the link.
pub fn check_relative(target: &str, document: &Path) -> CheckOutcome {
    let cleaned = strip_fragment_and_query(target);

    if cleaned.is_empty() {
        // "?query" or a stray "#..." that reached this branch: nothing left
        // to resolve, treat like a fragment
        return CheckOutcome::valid("Fragment link (not checked)");
    }

    let relative = cleaned.strip_prefix("./").unwrap_or(cleaned);
    let base = document.parent().unwrap_or_else(|| Path::new("."));
    let resolved = base.join(relative);

    match std::fs::metadata(&resolved) {
        Ok(_) => CheckOutcome::valid("File exists"),
        Err(e) if e.kind() == ErrorKind::NotFound => CheckOutcome::invalid("File not found"),
        Err(e) => CheckOutcome::invalid(format!("Path error: {e}")),
    }
}

fn strip_fragment_and_query(target: &str) -> &str {
    let without_fragment = target.split('#').next().unwrap_or("");
    without_fragment.split('?').next().unwrap_or("")
}
