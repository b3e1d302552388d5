//! VIN (Vehicle Identification Number) extraction and validation.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use super::patterns::{VIN_CANDIDATE, VIN_LABELS};
use super::{ExtractionMatch, FallbackChain, FieldExtractor};
use crate::error::ExtractionError;
use crate::extract::text::Document;
use crate::models::vehicle::Field;

/// Length of a VIN.
pub const VIN_LENGTH: usize = 17;

/// A validated 17-character VIN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vin(String);

impl Vin {
    /// Clean an OCR candidate and validate it.
    ///
    /// Everything outside `[A-Za-z0-9]` is dropped, letters are uppercased
    /// and the usual OCR confusions are undone (`O` → `0`, `I` → `1`). The
    /// result must be exactly 17 characters from the VIN alphabet; there is
    /// no truncation or padding.
    pub fn parse(candidate: &str) -> Result<Self, ExtractionError> {
        let cleaned: String = candidate
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| match c.to_ascii_uppercase() {
                'O' => '0',
                'I' => '1',
                c => c,
            })
            .collect();

        if cleaned.len() != VIN_LENGTH {
            return Err(ExtractionError::VinLength(cleaned.len()));
        }
        if let Some(bad) = cleaned.chars().find(|c| !is_vin_char(*c)) {
            return Err(ExtractionError::VinCharacter(bad));
        }

        Ok(Self(cleaned))
    }

    /// World Manufacturer Identifier: the first three characters.
    pub fn wmi(&self) -> &str {
        &self.0[..3]
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for Vin {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Vin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// `[A-HJ-NPR-Z0-9]`: uppercase letters except I, O and Q, plus digits.
pub fn is_vin_char(c: char) -> bool {
    c.is_ascii_digit() || (c.is_ascii_uppercase() && !matches!(c, 'I' | 'O' | 'Q'))
}

/// Clean a VIN candidate, returning `None` if it does not validate.
pub fn clean_vin_candidate(candidate: &str) -> Option<String> {
    match Vin::parse(candidate) {
        Ok(vin) => Some(vin.into_string()),
        Err(e) => {
            trace!("rejected VIN candidate {:?}: {}", candidate, e);
            None
        }
    }
}

/// VIN field extractor.
#[derive(Debug, Clone, Default)]
pub struct VinExtractor;

impl VinExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Value after a VIN label, or the following line when the label and
    /// value were split apart.
    fn from_labeled_line(doc: &Document<'_>) -> Option<String> {
        for (i, line) in doc.lines().iter().enumerate() {
            for label in VIN_LABELS.labels_in(line) {
                let vin = clean_vin_candidate(label.value_after(line))
                    .or_else(|| doc.line(i + 1).and_then(clean_vin_candidate));
                if vin.is_some() {
                    return vin;
                }
            }
        }
        None
    }

    fn from_candidate_scan(doc: &Document<'_>) -> Option<String> {
        VIN_CANDIDATE
            .find_iter(doc.text())
            .find_map(|m| clean_vin_candidate(m.as_str()))
    }
}

impl FieldExtractor for VinExtractor {
    type Output = String;

    fn extract(&self, doc: &Document<'_>) -> Option<ExtractionMatch<String>> {
        FallbackChain::new(Field::Vin)
            .then("labeled-line", 0.95, Self::from_labeled_line)
            .then("candidate-scan", 0.7, Self::from_candidate_scan)
            .run(doc)
    }
}

/// Extract a VIN from text.
pub fn extract_vin(text: &str) -> Option<String> {
    VinExtractor::new()
        .extract(&Document::new(text))
        .map(|m| m.value)
}
