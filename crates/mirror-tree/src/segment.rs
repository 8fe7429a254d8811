//! URL segment filtering.
//!
//! Folder names are taken from page URL segments, so the filter here
//! defines the whole character repertoire of the mirrored tree:
//! lowercase, `&` spelled out as `-and-`, separator punctuation turned
//! into dashes, everything else outside `[a-z0-9-]` dropped, dash runs
//! collapsed, and edge dashes trimmed.

use regex::Regex;
use std::sync::LazyLock;

/// Trailing `-N` uniqueness suffix. Stripped before trying the next
/// candidate so retries never stack suffixes (`page-2-3`).
static NUMERIC_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-[0-9]+$").expect("pattern is valid"));

/// Placeholder segment CMS hosts give brand-new pages before a real
/// segment has been generated from the title.
pub const NEW_PAGE_PLACEHOLDER: &str = "new-page";

/// Characters treated as word separators and turned into dashes.
const SEPARATORS: &[char] = &['_', '.', '+', '/', '\\', '?', '#', '=', ':', ',', ';'];

/// Filters arbitrary display text into URL segments.
///
/// The default filter is ASCII-only; [`SegmentFilter::multibyte`] keeps
/// unicode alphanumerics instead of dropping them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentFilter {
    allow_multibyte: bool,
}

impl SegmentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn multibyte() -> Self {
        Self {
            allow_multibyte: true,
        }
    }

    /// Filter `input` into a segment. Returns an empty string when
    /// nothing survives; callers decide the fallback.
    pub fn filter(&self, input: &str) -> String {
        let mut raw = String::with_capacity(input.len() + 8);
        for ch in input.chars() {
            if ch == '&' {
                raw.push_str("-and-");
            } else if ch == '-' || ch.is_whitespace() || SEPARATORS.contains(&ch) {
                raw.push('-');
            } else if ch.is_ascii_alphanumeric() {
                raw.push(ch.to_ascii_lowercase());
            } else if self.allow_multibyte && ch.is_alphanumeric() {
                for lowered in ch.to_lowercase() {
                    raw.push(lowered);
                }
            }
        }

        let mut out = String::with_capacity(raw.len());
        let mut previous_dash = false;
        for ch in raw.chars() {
            if ch == '-' {
                if !previous_dash && !out.is_empty() {
                    out.push('-');
                }
                previous_dash = true;
            } else {
                out.push(ch);
                previous_dash = false;
            }
        }
        while out.ends_with('-') {
            out.pop();
        }
        out
    }
}

/// Strip a trailing `-N` uniqueness suffix, returning the bare stem.
/// A segment that is nothing but a suffix is returned unchanged.
pub fn strip_numeric_suffix(segment: &str) -> &str {
    match NUMERIC_SUFFIX.find(segment) {
        Some(found) if found.start() > 0 => &segment[..found.start()],
        _ => segment,
    }
}

/// Attach the `-N` uniqueness suffix to a stem.
pub fn with_numeric_suffix(stem: &str, n: usize) -> String {
    format!("{stem}-{n}")
}
