//! Namespace pattern matching: exact, prefix, suffix and multi-segment
//! wildcard forms.

use serde::{Deserialize, Serialize};

/// Pattern classification, computed once at construction so the scan loop
/// dispatches on a tag instead of re-inspecting the pattern string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum PatternKind {
    /// No `*`: case-insensitive equality.
    Exact(String),
    /// Bare `*`: any non-blank candidate.
    Any,
    /// `X*`: candidate starts with `X` and extends past it, so `System.*`
    /// matches `System.Text` but not the literal token `System`.
    Prefix(String),
    /// `*X`: candidate ends with `X`.
    Suffix(String),
    /// A `*` in the middle or multiple `*`s: ordered, non-overlapping,
    /// consecutive segment matching. Not a full glob engine.
    Segments {
        segments: Vec<String>,
        anchored_start: bool,
        anchored_end: bool,
    },
}

/// Matches namespace candidates against a package's published namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespacePattern {
    raw: String,
    kind: PatternKind,
}

impl NamespacePattern {
    pub fn new(pattern: &str) -> Self {
        let raw = pattern.trim().to_string();
        let kind = classify(&raw);
        Self { raw, kind }
    }

    /// The original pattern string.
    pub fn pattern(&self) -> &str {
        &self.raw
    }

    pub fn is_wildcard(&self) -> bool {
        !matches!(self.kind, PatternKind::Exact(_))
    }

    /// Test a namespace candidate. Blank candidates never match.
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return false;
        }
        match &self.kind {
            PatternKind::Exact(pattern) => candidate.eq_ignore_ascii_case(pattern),
            PatternKind::Any => true,
            PatternKind::Prefix(stem) => {
                candidate.len() > stem.len() && starts_with_ignore_case(candidate, stem)
            }
            PatternKind::Suffix(stem) => ends_with_ignore_case(candidate, stem),
            PatternKind::Segments {
                segments,
                anchored_start,
                anchored_end,
            } => match_segments(candidate, segments, *anchored_start, *anchored_end),
        }
    }
}

fn classify(raw: &str) -> PatternKind {
    if !raw.contains('*') {
        return PatternKind::Exact(raw.to_string());
    }
    if raw == "*" {
        return PatternKind::Any;
    }
    let stars = raw.matches('*').count();
    if stars == 1 {
        if let Some(stem) = raw.strip_suffix('*') {
            return PatternKind::Prefix(stem.to_string());
        }
        if let Some(stem) = raw.strip_prefix('*') {
            return PatternKind::Suffix(stem.to_string());
        }
    }
    let parts: Vec<&str> = raw.split('*').collect();
    let anchored_start = parts.first().is_some_and(|p| !p.is_empty());
    let anchored_end = parts.last().is_some_and(|p| !p.is_empty());
    let segments = parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();
    PatternKind::Segments {
        segments,
        anchored_start,
        anchored_end,
    }
}

/// Ordered left-to-right segment matching without overlap. A leading or
/// trailing empty segment in the pattern relaxes anchoring at that end.
fn match_segments(
    candidate: &str,
    segments: &[String],
    anchored_start: bool,
    anchored_end: bool,
) -> bool {
    if segments.is_empty() {
        // Pattern was all stars.
        return true;
    }

    let last = segments.len() - 1;
    let mut pos = 0usize;
    for (i, segment) in segments.iter().enumerate() {
        if i == 0 && anchored_start {
            if !starts_with_ignore_case(candidate, segment) {
                return false;
            }
            pos = segment.len();
            continue;
        }
        if i == last && anchored_end {
            if !ends_with_ignore_case(candidate, segment) {
                return false;
            }
            // The anchored tail must not overlap the previous match.
            return candidate.len() - segment.len() >= pos;
        }
        match find_ignore_ascii_case(candidate, segment, pos) {
            Some(found) => pos = found + segment.len(),
            None => return false,
        }
    }
    true
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn ends_with_ignore_case(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len()
        && s.get(s.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

fn find_ignore_ascii_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if from + n.len() > h.len() {
        return None;
    }
    (from..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}
