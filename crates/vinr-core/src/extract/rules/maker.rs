//! Manufacturer resolution from brand names, with a WMI fallback.

use super::patterns::MAKER_PATTERNS;
use super::tables::wmi_maker;
use super::vin::Vin;
use super::{ExtractionMatch, FallbackChain};
use crate::extract::text::Document;
use crate::models::vehicle::Field;

/// Maker resolver.
///
/// A printed brand name is preferred over the WMI inferred from the VIN, so
/// the VIN is only consulted when no brand pattern matches.
#[derive(Debug, Clone)]
pub struct MakerResolver {
    wmi_fallback: bool,
}

impl MakerResolver {
    pub fn new() -> Self {
        Self { wmi_fallback: true }
    }

    /// Set whether the VIN's WMI may be used when no brand name is found.
    pub fn with_wmi_fallback(mut self, enabled: bool) -> Self {
        self.wmi_fallback = enabled;
        self
    }

    /// Resolve the maker for a document whose VIN (possibly empty) is known.
    pub fn resolve(&self, doc: &Document<'_>, vin: &str) -> Option<ExtractionMatch<String>> {
        FallbackChain::new(Field::Maker)
            .then("brand-pattern", 0.9, |doc| {
                maker_from_text(doc.text()).map(str::to_string)
            })
            .then_if(self.wmi_fallback, "wmi", 0.6, move |_| {
                maker_from_vin(vin).map(str::to_string)
            })
            .run(doc)
    }
}

impl Default for MakerResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Label of the first brand pattern matching anywhere in `text`.
pub fn maker_from_text(text: &str) -> Option<&'static str> {
    MAKER_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, label)| *label)
}

/// Label for the WMI of a VIN; nothing when `vin` does not validate.
pub fn maker_from_vin(vin: &str) -> Option<&'static str> {
    let vin = Vin::parse(vin).ok()?;
    wmi_maker(vin.wmi())
}

/// Resolve a maker from text and an optional VIN.
pub fn resolve_maker(text: &str, vin: &str) -> Option<String> {
    MakerResolver::new()
        .resolve(&Document::new(text), vin)
        .map(|m| m.value)
}
