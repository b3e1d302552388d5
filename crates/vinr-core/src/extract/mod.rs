//! Vehicle field extraction module.

mod parser;
pub mod rules;
pub mod text;

pub use parser::{ExtractionResult, FieldSource, VehicleInfoParser};

use crate::models::vehicle::ExtractedRecord;

/// Trait for vehicle plate extractors.
pub trait VehicleExtractor {
    /// Extract vehicle data from sticker-area text and, optionally, text
    /// read from the VIN area alone.
    fn extract(&self, sticker: &str, vin_area: Option<&str>) -> ExtractionResult;

    /// Extract only the four-field record.
    fn extract_record(&self, sticker: &str, vin_area: Option<&str>) -> ExtractedRecord {
        self.extract(sticker, vin_area).record
    }
}
