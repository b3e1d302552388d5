//! Text normalization helpers for OCR output.

use regex::Regex;

/// OCR text split into trimmed, non-empty lines.
///
/// The raw text is kept alongside the lines because several rules scan the
/// whole block (multi-line VIN candidates, global model label search).
#[derive(Debug, Clone)]
pub struct Document<'t> {
    text: &'t str,
    lines: Vec<&'t str>,
}

impl<'t> Document<'t> {
    pub fn new(text: &'t str) -> Self {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        Self { text, lines }
    }

    /// The unmodified input text.
    pub fn text(&self) -> &'t str {
        self.text
    }

    pub fn lines(&self) -> &[&'t str] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&'t str> {
        self.lines.get(index).copied()
    }

    /// Up to `count` lines following `index`.
    pub fn lines_after(&self, index: usize, count: usize) -> &[&'t str] {
        let start = (index + 1).min(self.lines.len());
        let end = (start + count).min(self.lines.len());
        &self.lines[start..end]
    }
}

/// Remove every whitespace character.
pub fn squash_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Collapse whitespace runs into single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text after the first ASCII or full-width colon, trimmed.
pub fn value_after_colon(line: &str) -> Option<&str> {
    line.split_once([':', '：']).map(|(_, rest)| rest.trim())
}

/// A label keyword such as `차대번호` or `vin`.
#[derive(Debug, Clone)]
pub struct Keyword {
    pattern: Regex,
    squashed: String,
}

impl Keyword {
    fn new(word: &'static str) -> Self {
        let pattern = Regex::new(&format!("(?i){}", regex::escape(word)))
            .expect("escaped keyword is a valid pattern");

        Self {
            pattern,
            squashed: squash_whitespace(&word.to_lowercase()),
        }
    }

    /// Case-insensitive match, also tolerating spaces OCR inserted inside the label.
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
            || squash_whitespace(&line.to_lowercase()).contains(&self.squashed)
    }

    /// Value following this label on `line`.
    ///
    /// Text after a colon wins; otherwise the text after the keyword itself.
    /// When neither is found (the label only matched once spaces were
    /// removed) the whole line is returned.
    pub fn value_after<'l>(&self, line: &'l str) -> &'l str {
        if let Some(value) = value_after_colon(line) {
            return value;
        }

        match self.pattern.find(line) {
            Some(m) => line[m.end()..].trim(),
            None => line.trim(),
        }
    }
}

/// Ordered set of label keywords.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    pub fn new(words: &[&'static str]) -> Self {
        Self {
            keywords: words.iter().copied().map(Keyword::new).collect(),
        }
    }

    /// Keywords present on `line`, in set order.
    pub fn labels_in(&self, line: &str) -> Vec<&Keyword> {
        self.keywords.iter().filter(|k| k.matches(line)).collect()
    }

    pub fn contains_any(&self, line: &str) -> bool {
        self.keywords.iter().any(|k| k.matches(line))
    }
}
