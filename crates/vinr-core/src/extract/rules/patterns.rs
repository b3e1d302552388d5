//! Compiled regex patterns and keyword sets for vehicle field extraction.

use lazy_static::lazy_static;
use regex::Regex;

use super::tables::{
    BANNED_MODEL_TERMS, MAKER_RULES, MODEL_ANCHOR_KEYWORDS, MODEL_KEYWORDS, VIN_KEYWORDS,
    YEAR_KEYWORDS,
};
use crate::extract::text::KeywordSet;

/// Alternation of `words` that tolerates whitespace between every character,
/// so `차명` also matches `차 명`.
fn spaced_alternation(words: &[&str]) -> String {
    let alternatives: Vec<String> = words
        .iter()
        .map(|w| {
            w.chars()
                .map(|c| regex::escape(&c.to_string()))
                .collect::<Vec<_>>()
                .join(r"\s*")
        })
        .collect();
    format!("(?:{})", alternatives.join("|"))
}

lazy_static! {
    // Label keywords
    pub static ref VIN_LABELS: KeywordSet = KeywordSet::new(VIN_KEYWORDS);
    pub static ref YEAR_LABELS: KeywordSet = KeywordSet::new(YEAR_KEYWORDS);

    // Maker rules, compiled in priority order
    pub static ref MAKER_PATTERNS: Vec<(Regex, &'static str)> = MAKER_RULES
        .iter()
        .map(|r| (Regex::new(&format!("(?i){}", r.pattern)).unwrap(), r.label))
        .collect();

    // VIN: runs of VIN-ish characters, possibly split by spaces, dashes or newlines
    pub static ref VIN_CANDIDATE: Regex = Regex::new(
        r"[A-Za-z0-9\-\s]{16,20}"
    ).unwrap();

    // Year-month: 2023.05, 2023-5, 2023/05, 2023 05, 202305, 2023년 5월.
    // No digit may follow the month, so 2023.13 is not read as January.
    pub static ref YEAR_MONTH: Regex = Regex::new(
        r"((?:19|20)[0-9]{2})(?:\s*년)?(?:\s*[./\-]\s*|\s+)?(1[0-2]|0?[1-9])(?:\s*월)?(?:[^0-9]|$)"
    ).unwrap();

    pub static ref YEAR_MONTH_LABELED: Regex = Regex::new(
        r"(?i)(?:제작\s*(?:연월|년월|월|연도|년도)|MFD|MFG\.?|Manufactured(?:\s*Date)?)\s*[:\-]?\s*((?:19|20)[0-9]{2})(?:\s*년)?(?:\s*[./\-]\s*|\s+)?(1[0-2]|0?[1-9])(?:\s*월)?(?:[^0-9]|$)"
    ).unwrap();

    pub static ref YEAR_WITH_SUFFIX: Regex = Regex::new(
        r"\b((?:19|20)[0-9]{2})\s*년\b"
    ).unwrap();

    pub static ref YEAR_BARE: Regex = Regex::new(
        r"\b((?:19|20)[0-9]{2})\b"
    ).unwrap();

    // Model labels, tolerating spaces inside the label ("차 명", "모델 명")
    pub static ref MODEL_LABEL: Regex = Regex::new(
        &spaced_alternation(MODEL_KEYWORDS)
    ).unwrap();

    pub static ref MODEL_LABELED_VALUE: Regex = Regex::new(
        &format!(r"{}\s*[:：]?\s*([^\n\r]+)", spaced_alternation(MODEL_KEYWORDS))
    ).unwrap();

    pub static ref MODEL_LINE_VALUE: Regex = Regex::new(
        &format!(r"{}\s*[:：]?\s*(.*)", spaced_alternation(MODEL_KEYWORDS))
    ).unwrap();

    // Any model-ish label, including vehicle class (차종)
    pub static ref MODEL_ANCHOR: Regex = Regex::new(
        &spaced_alternation(MODEL_ANCHOR_KEYWORDS)
    ).unwrap();

    // "차종: 승용" fragments, the bare class marker and repeated model labels
    pub static ref MODEL_NOISE: Regex = Regex::new(
        &format!(r"(?i)(?:차종\s*[:：]?\s*\S+)|\b승용\b|{}\s*[:：]?", spaced_alternation(MODEL_KEYWORDS))
    ).unwrap();

    pub static ref MODEL_WINDOW_LINE: Regex = Regex::new(
        r"^[가-힣A-Za-z0-9\- ]{2,20}$"
    ).unwrap();

    pub static ref MODEL_TOKEN_HANGUL: Regex = Regex::new(
        r"^[가-힣]{2,15}$"
    ).unwrap();

    pub static ref MODEL_TOKEN_LATIN: Regex = Regex::new(
        r"^[A-Za-z0-9\-]{2,15}$"
    ).unwrap();

    pub static ref TOKEN_PUNCTUATION: Regex = Regex::new(
        r"[()\[\]{},:：]"
    ).unwrap();

    pub static ref TOKEN_DISALLOWED: Regex = Regex::new(
        r"[^가-힣A-Za-z0-9\- ]"
    ).unwrap();

    pub static ref BANNED_MODEL_TERM: Regex = Regex::new(
        &format!("(?i){}", BANNED_MODEL_TERMS.join("|"))
    ).unwrap();
}
