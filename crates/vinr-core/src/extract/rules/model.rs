//! Model name extraction.
//!
//! Model names are free text with no dictionary to check against, so the
//! extractor leans on the `차명` / `모델명` labels and, failing those, on the
//! shape and position of short standalone tokens.

use super::patterns::{
    BANNED_MODEL_TERM, MODEL_ANCHOR, MODEL_LABEL, MODEL_LABELED_VALUE, MODEL_LINE_VALUE,
    MODEL_NOISE, MODEL_TOKEN_HANGUL, MODEL_TOKEN_LATIN, MODEL_WINDOW_LINE, TOKEN_DISALLOWED,
    TOKEN_PUNCTUATION,
};
use super::{ExtractionMatch, FallbackChain, FieldExtractor};
use crate::extract::text::{collapse_whitespace, Document};
use crate::models::vehicle::Field;

/// Default maximum model name length, in characters.
pub const DEFAULT_MODEL_MAX_CHARS: usize = 40;

/// Lines after a label inspected by the window fallback.
const WINDOW_LINES: usize = 3;

/// Model name extractor.
#[derive(Debug, Clone)]
pub struct ModelExtractor {
    max_chars: usize,
}

impl ModelExtractor {
    pub fn new() -> Self {
        Self {
            max_chars: DEFAULT_MODEL_MAX_CHARS,
        }
    }

    /// Set the maximum model name length.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    fn clean(&self, value: &str) -> Option<String> {
        let cleaned = clean_model_value_to(value, self.max_chars);
        (!cleaned.is_empty()).then_some(cleaned)
    }

    /// First label anywhere in the text, with whatever follows it.
    fn from_labeled_value(&self, doc: &Document<'_>) -> Option<String> {
        let caps = MODEL_LABELED_VALUE.captures(doc.text())?;
        self.clean(&caps[1])
    }

    /// Each label line in turn: its trailing content (or the next line when
    /// the label stands alone), then a short plain line shortly after it.
    fn from_label_lines(&self, doc: &Document<'_>) -> Option<String> {
        label_lines(doc).find_map(|i| {
            self.value_on_label_line(doc, i)
                .or_else(|| self.value_in_window(doc, i))
        })
    }

    fn value_on_label_line(&self, doc: &Document<'_>, i: usize) -> Option<String> {
        let line = doc.line(i)?;
        let mut value = MODEL_LINE_VALUE
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map_or("", |m| m.as_str().trim());
        if value.is_empty() {
            value = doc.line(i + 1).unwrap_or_default();
        }
        self.clean(value)
    }

    fn value_in_window(&self, doc: &Document<'_>, i: usize) -> Option<String> {
        doc.lines_after(i, WINDOW_LINES)
            .iter()
            .filter_map(|line| self.clean(line))
            .find(|value| MODEL_WINDOW_LINE.is_match(value))
    }

    /// Standalone token lines that are not sticker boilerplate, nearest to
    /// the last label if any label is present.
    fn from_token_heuristic(&self, doc: &Document<'_>) -> Option<String> {
        let mut candidates: Vec<(usize, String)> = doc
            .lines()
            .iter()
            .enumerate()
            .filter_map(|(i, line)| standalone_token(line).map(|token| (i, token)))
            .collect();

        let last_anchor = doc.lines().iter().rposition(|l| MODEL_ANCHOR.is_match(l));
        if let Some(anchor) = last_anchor {
            // Stable: on equal distance the earlier line wins.
            candidates.sort_by_key(|(i, _)| i.abs_diff(anchor));
        }

        candidates.into_iter().next().map(|(_, token)| token)
    }
}

impl Default for ModelExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ModelExtractor {
    type Output = String;

    fn extract(&self, doc: &Document<'_>) -> Option<ExtractionMatch<String>> {
        FallbackChain::new(Field::Model)
            .then("labeled-value", 0.95, |doc| self.from_labeled_value(doc))
            .then("labeled-line", 0.85, |doc| self.from_label_lines(doc))
            .then("token-heuristic", 0.4, |doc| self.from_token_heuristic(doc))
            .run(doc)
    }
}

fn label_lines<'d>(doc: &'d Document<'_>) -> impl Iterator<Item = usize> + 'd {
    doc.lines()
        .iter()
        .enumerate()
        .filter(|(_, line)| MODEL_LABEL.is_match(line))
        .map(|(i, _)| i)
}

/// The line reduced to a single Hangul or Latin/digit token, if it is one
/// and is not boilerplate.
fn standalone_token(line: &str) -> Option<String> {
    let spaced = TOKEN_PUNCTUATION.replace_all(line, " ");
    let collapsed = collapse_whitespace(&spaced);
    let token = TOKEN_DISALLOWED.replace_all(&collapsed, "");

    if BANNED_MODEL_TERM.is_match(&token) {
        return None;
    }
    (MODEL_TOKEN_HANGUL.is_match(&token) || MODEL_TOKEN_LATIN.is_match(&token))
        .then(|| token.into_owned())
}

/// Strip class markers and label repeats, then truncate to `max_chars`.
pub fn clean_model_value_to(value: &str, max_chars: usize) -> String {
    let stripped = MODEL_NOISE.replace_all(value, "");
    let truncated: String = stripped.trim().chars().take(max_chars).collect();
    truncated.trim().to_string()
}

/// Clean a model value with the default length limit.
pub fn clean_model_value(value: &str) -> String {
    clean_model_value_to(value, DEFAULT_MODEL_MAX_CHARS)
}

/// Extract a model name from text.
pub fn extract_model(text: &str) -> Option<String> {
    ModelExtractor::new()
        .extract(&Document::new(text))
        .map(|m| m.value)
}
