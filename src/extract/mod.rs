// src/extract/mod.rs
// =============================================================================
// Extraction stage: pull link targets out of markdown text, line by line.
//
// Four patterns, tried independently on every line:
// - Inline:       [text](url)
// - ReferenceDef: [label]: url
// - Autolink:     <http(s)://url>
// - Bare:         http(s)://url terminated by whitespace or ) ]
//
// All four run on each line, so one physical link can be reported more than
// once (an inline http link is also a bare match). Over-counting is accepted;
// external URLs get deduplicated later, but only to avoid repeat network
// calls, never for count accuracy.
// =============================================================================

use regex::Regex;

/// A link target found in a document, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOccurrence {
    pub url: String,
    pub line: usize,
}

/// Which textual shape matched. The kind decides which capture group holds
/// the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternKind {
    Inline,
    ReferenceDef,
    Autolink,
    Bare,
}

struct LinkPattern {
    kind: PatternKind,
    regex: Regex,
}

impl LinkPattern {
    fn new(kind: PatternKind, pattern: &str) -> Self {
        let regex = Regex::new(pattern).expect("hard-coded link pattern compiles");
        Self { kind, regex }
    }

    /// Every target this pattern finds on one line.
    fn targets<'a>(&self, line: &'a str) -> Vec<&'a str> {
        let group = match self.kind {
            PatternKind::Inline | PatternKind::ReferenceDef => 2,
            PatternKind::Autolink => 1,
            PatternKind::Bare => 0,
        };

        self.regex
            .captures_iter(line)
            .filter_map(|caps| caps.get(group).map(|m| m.as_str()))
            .collect()
    }
}

/// Extracts link occurrences from markdown content.
///
/// Compiled once per run; the patterns are a fixed ordered list, so the
/// occurrences for a line always come out in the same order.
pub struct Extractor {
    patterns: Vec<LinkPattern>,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            patterns: vec![
                LinkPattern::new(PatternKind::Inline, r"\[([^\]]+)\]\(([^)]+)\)"),
                LinkPattern::new(PatternKind::ReferenceDef, r"\[([^\]]+)\]:\s*(\S+)"),
                LinkPattern::new(PatternKind::Autolink, r"<(https?://[^>]+)>"),
                LinkPattern::new(PatternKind::Bare, r"https?://[^\s)\]]+"),
            ],
        }
    }

    /// All link occurrences in `content`, ordered by line number.
    pub fn extract(&self, content: &str) -> Vec<LinkOccurrence> {
        let mut links = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            for pattern in &self.patterns {
                for target in pattern.targets(line) {
                    let url = target.trim();
                    if !url.is_empty() {
                        links.push(LinkOccurrence {
                            url: url.to_string(),
                            line: line_number,
                        });
                    }
                }
            }
        }

        links
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
