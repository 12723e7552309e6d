// ABOUTME: Noise filter for extracted article text.
// ABOUTME: Drops recommendation/related/trending lines, very short lines and wiki section markers.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// Lines whose trimmed length is at or below this are treated as noise.
pub const MIN_LINE_CHARS: usize = 20;

const NOISE_KEYWORDS: &[&str] = &[
    // Japanese
    "おすすめ",
    "関連記事",
    "人気記事",
    // Recommendations
    "Recommended",
    "Recommended for you",
    "You may also like",
    "Suggested",
    "Suggested for you",
    "Editor’s picks",
    "Top picks",
    // Related articles
    "Related articles",
    "Related stories",
    "Related content",
    "More on this topic",
    "More like this",
    "In case you missed it",
    "ICYMI",
    // Popular articles
    "Popular articles",
    "Most popular",
    "Trending",
    "Trending now",
    "Most read",
    "Top stories",
    "Hot right now",
];

static NOISE_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostFirst)
        .build(NOISE_KEYWORDS)
        .unwrap()
});

static SECTION_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"==.*?==").unwrap());

/// Returns true if the line contains any noise keyword, ignoring case.
pub fn is_noise_line(line: &str) -> bool {
    NOISE_MATCHER.is_match(line)
}

/// Remove noise lines from article text.
pub fn clean_text(text: &str) -> String {
    let kept: Vec<&str> = text
        .split('\n')
        .filter(|line| !is_noise_line(line))
        .filter(|line| line.trim().chars().count() > MIN_LINE_CHARS)
        .collect();

    let joined = kept.join("\n");
    SECTION_MARKER_RE.replace_all(&joined, "").trim().to_string()
}
