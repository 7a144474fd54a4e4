//! Candidate identity heuristics: name and email pulled from resume text
//! with regular expressions, no LLM involved.

use std::sync::LazyLock;

use regex::Regex;

/// Returned when no name or email can be found.
pub const NOT_FOUND: &str = "Not found";

/// Only this many leading characters are searched for a name header.
const NAME_HEADER_WINDOW: usize = 200;
const MIN_NAME_LEN: usize = 5;

/// Words that mark a section header rather than a person's name.
const RESUME_HEADER_WORDS: &[&str] = &[
    "curriculum",
    "resume",
    "summary",
    "objective",
    "experience",
    "education",
    "skills",
    "profile",
];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});

static LEADING_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z]+(?: [A-Z][a-zA-Z'-]+)*").expect("valid leading name regex")
});

static LABELED_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?i:name|candidate)\s*[:\n]\s*([A-Z][a-z]+(?: [A-Z][a-zA-Z'-]+)*)")
        .expect("valid labeled name regex")
});

/// First email address anywhere in the text.
pub fn extract_email(text: &str) -> String {
    EMAIL_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

/// Candidate name: a capitalized header at the very start of the text, or a
/// `Name:` / `Candidate:` label anywhere.
pub fn extract_name(text: &str) -> String {
    leading_name(text)
        .or_else(|| labeled_name(text))
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

fn leading_name(text: &str) -> Option<String> {
    let window = match text.char_indices().nth(NAME_HEADER_WINDOW) {
        Some((end, _)) => &text[..end],
        None => text,
    };
    let candidate = LEADING_NAME_RE.find(window)?.as_str();
    if candidate.len() < MIN_NAME_LEN {
        return None;
    }
    let lower = candidate.to_lowercase();
    if RESUME_HEADER_WORDS.iter().any(|w| lower.contains(w)) {
        return None;
    }
    Some(candidate.to_string())
}

fn labeled_name(text: &str) -> Option<String> {
    LABELED_NAME_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
