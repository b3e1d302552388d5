//! Rule-based field extractors for vehicle plate text.

pub mod chain;
pub mod maker;
pub mod model;
pub mod patterns;
pub mod tables;
pub mod vin;
pub mod year;

pub use chain::FallbackChain;
pub use maker::{resolve_maker, MakerResolver};
pub use model::{clean_model_value, extract_model, ModelExtractor};
pub use vin::{clean_vin_candidate, extract_vin, Vin, VinExtractor};
pub use year::{normalize_year, YearExtractor};

use crate::extract::text::Document;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from a document.
    fn extract(&self, doc: &Document<'_>) -> Option<ExtractionMatch<Self::Output>>;
}

/// An extracted value with the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Name of the fallback strategy that matched.
    pub strategy: &'static str,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, strategy: &'static str) -> Self {
        Self {
            value,
            confidence,
            strategy,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractionMatch<U> {
        ExtractionMatch {
            value: f(self.value),
            confidence: self.confidence,
            strategy: self.strategy,
        }
    }
}
