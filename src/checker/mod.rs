// src/checker/mod.rs
// =============================================================================
// Classification & validation stage.
//
// Submodules:
// - http: probes external URLs over HTTP with retry/backoff and dedup
// - path: resolves relative targets against the referencing document
//
// This file holds the pieces shared by both: the link classifier and the
// single outcome type every check produces.
// =============================================================================

pub mod http;
pub mod path;

pub use http::UrlChecker;

/// What a raw link target is, decided purely from its text.
///
/// Total and deterministic: every non-empty string maps to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// http:// or https://, validated over the network.
    External,
    /// mailto: or tel:, never checked, reported as skipped.
    Skippable,
    /// Starts with '#': an in-document anchor, never checked.
    Fragment,
    /// Everything else is treated as a filesystem path relative to the
    /// referencing document.
    Relative,
}

/// Classify a raw link target. Pure, no I/O.
pub fn classify(url: &str) -> LinkKind {
    if url.starts_with("http://") || url.starts_with("https://") {
        LinkKind::External
    } else if url.starts_with("mailto:") || url.starts_with("tel:") {
        LinkKind::Skippable
    } else if url.starts_with('#') {
        LinkKind::Fragment
    } else {
        LinkKind::Relative
    }
}

/// The result of validating one link, external or internal.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub ok: bool,
    pub message: String,
}

impl CheckOutcome {
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}
