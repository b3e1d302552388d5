//! Vehicle info parser: runs the field rules over one or two OCR texts and
//! applies the sticker/VIN-area merge policy.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::vehicle::{ExtractedRecord, Field, TextSource, YearMonth};

use super::rules::{
    model::DEFAULT_MODEL_MAX_CHARS, ExtractionMatch, FieldExtractor, MakerResolver,
    ModelExtractor, VinExtractor, YearExtractor,
};
use super::text::Document;
use super::VehicleExtractor;

/// Provenance of one extracted field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSource {
    /// Which OCR text the value was read from.
    pub text: TextSource,
    /// Strategy that produced the value.
    pub strategy: &'static str,
    /// Confidence assigned to that strategy.
    pub confidence: f32,
}

/// Result of vehicle field extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted record; missing fields are empty strings.
    pub record: ExtractedRecord,
    /// Provenance of every non-empty field.
    pub sources: BTreeMap<Field, FieldSource>,
    /// Fields left empty.
    pub missing_fields: Vec<Field>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Whether the VIN-area text contributed to the record.
    pub used_vin_area: bool,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Fields read from a single OCR text.
#[derive(Debug, Default)]
struct Pass {
    record: ExtractedRecord,
    sources: BTreeMap<Field, FieldSource>,
}

impl Pass {
    fn set(&mut self, field: Field, text: TextSource, found: Option<ExtractionMatch<String>>) {
        if let Some(m) = found {
            self.record.set(field, m.value);
            self.sources.insert(
                field,
                FieldSource {
                    text,
                    strategy: m.strategy,
                    confidence: m.confidence,
                },
            );
        }
    }

    /// Take the VIN from `other` and fill whatever else is still empty.
    fn merge_vin_area(&mut self, other: Pass) {
        self.record.set(Field::Vin, other.record.get(Field::Vin));
        let mut taken = vec![Field::Vin];
        taken.extend(self.record.fill_missing_from(
            &other.record,
            &[Field::Maker, Field::Year, Field::Model],
        ));

        for field in taken {
            if let Some(source) = other.sources.get(&field) {
                self.sources.insert(field, source.clone());
            }
        }
    }
}

/// Rule-based vehicle plate parser.
#[derive(Debug, Clone)]
pub struct VehicleInfoParser {
    /// Month used by the future-date guard; the local clock when unset.
    reference_date: Option<YearMonth>,
    /// Whether the maker may be inferred from the VIN's WMI.
    wmi_fallback: bool,
    /// Whether VIN-area text is consulted when the sticker has no VIN.
    vin_area_fallback: bool,
    /// Maximum model name length.
    model_max_chars: usize,
}

impl VehicleInfoParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            reference_date: None,
            wmi_fallback: true,
            vin_area_fallback: true,
            model_max_chars: DEFAULT_MODEL_MAX_CHARS,
        }
    }

    /// Create a parser from the extraction section of the configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_wmi_fallback(config.wmi_fallback)
            .with_vin_area_fallback(config.vin_area_fallback)
            .with_model_max_chars(config.model_max_chars)
    }

    /// Fix the month treated as "now" instead of reading the clock.
    pub fn with_reference_date(mut self, date: YearMonth) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Set WMI fallback for the maker.
    pub fn with_wmi_fallback(mut self, enabled: bool) -> Self {
        self.wmi_fallback = enabled;
        self
    }

    /// Set whether VIN-area text is used.
    pub fn with_vin_area_fallback(mut self, enabled: bool) -> Self {
        self.vin_area_fallback = enabled;
        self
    }

    /// Set maximum model name length.
    pub fn with_model_max_chars(mut self, max_chars: usize) -> Self {
        self.model_max_chars = max_chars;
        self
    }

    /// Parse a single text.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        self.extract(text, None)
    }

    fn parse_document(&self, text: &str, source: TextSource, today: YearMonth) -> Pass {
        let doc = Document::new(text);
        let mut pass = Pass::default();

        pass.set(Field::Vin, source, VinExtractor::new().extract(&doc));

        let maker = MakerResolver::new()
            .with_wmi_fallback(self.wmi_fallback)
            .resolve(&doc, pass.record.get(Field::Vin));
        pass.set(Field::Maker, source, maker);

        let year = YearExtractor::new(today)
            .extract(&doc)
            .map(|m| m.map(|date| date.to_string()));
        pass.set(Field::Year, source, year);

        let model = ModelExtractor::new()
            .with_max_chars(self.model_max_chars)
            .extract(&doc);
        pass.set(Field::Model, source, model);

        pass
    }
}

impl Default for VehicleInfoParser {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleExtractor for VehicleInfoParser {
    fn extract(&self, sticker: &str, vin_area: Option<&str>) -> ExtractionResult {
        let start = Instant::now();
        let today = self.reference_date.unwrap_or_else(YearMonth::current);
        let mut warnings = Vec::new();
        let mut used_vin_area = false;

        info!(
            "Parsing vehicle text ({} characters, VIN-area text: {})",
            sticker.len(),
            vin_area.is_some()
        );

        let mut pass = self.parse_document(sticker, TextSource::Primary, today);

        let vin_area = vin_area
            .filter(|_| self.vin_area_fallback)
            .filter(|text| !text.trim().is_empty());

        if !pass.record.has(Field::Vin) {
            if let Some(text) = vin_area {
                let fallback = self.parse_document(text, TextSource::Secondary, today);
                if fallback.record.has(Field::Vin) {
                    debug!("VIN taken from VIN-area text");
                    pass.merge_vin_area(fallback);
                    used_vin_area = true;
                    warnings.push("VIN recovered from VIN-area text".to_string());
                } else {
                    debug!("VIN-area text has no VIN; keeping sticker result");
                }
            }
        }

        let missing_fields = pass.record.missing_fields();
        for field in &missing_fields {
            warnings.push(format!("Could not extract {field}"));
        }

        debug!(
            "Extracted {} of {} fields",
            Field::ALL.len() - missing_fields.len(),
            Field::ALL.len()
        );

        ExtractionResult {
            record: pass.record,
            sources: pass.sources,
            missing_fields,
            warnings,
            used_vin_area,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parser() -> VehicleInfoParser {
        VehicleInfoParser::new().with_reference_date(YearMonth::new(2024, 6).unwrap())
    }

    fn record(vin: &str, maker: &str, year: &str, model: &str) -> ExtractedRecord {
        ExtractedRecord {
            vin: vin.to_string(),
            maker: maker.to_string(),
            year: year.to_string(),
            model: model.to_string(),
        }
    }

    #[test]
    fn test_full_sticker() {
        let text = "차대번호: KMHXX00000X000000\n제작연월: 2023.05\n모델명: 그랜저\n현대자동차";
        let result = parser().parse(text);

        assert_eq!(
            result.record,
            record("KMHXX00000X000000", "현대", "2023.05", "그랜저")
        );
        assert!(result.missing_fields.is_empty());
        assert!(result.warnings.is_empty());
        assert!(!result.used_vin_area);
        assert_eq!(result.sources[&Field::Vin].strategy, "labeled-line");
        assert_eq!(result.sources[&Field::Maker].strategy, "brand-pattern");
    }

    #[test]
    fn test_vin_area_supplies_vin_only() {
        let sticker = "제작연월: 2022.11\n모델명: 쏘렌토\n기아";
        let vin_area = "VIN KNAXX00000X000000";

        let result = parser().extract(sticker, Some(vin_area));

        assert_eq!(
            result.record,
            record("KNAXX00000X000000", "기아", "2022.11", "쏘렌토")
        );
        assert!(result.used_vin_area);
        assert_eq!(result.sources[&Field::Vin].text, TextSource::Secondary);
        assert_eq!(result.sources[&Field::Maker].text, TextSource::Primary);
        assert_eq!(result.warnings, vec!["VIN recovered from VIN-area text"]);
    }

    #[test]
    fn test_sticker_maker_kept_over_vin_area_maker() {
        let sticker = "제작연월: 2022.11\n모델명: 쏘렌토\n기아";
        let vin_area = "VIN KMHXX00000X000000\n현대";

        let result = parser().extract(sticker, Some(vin_area));

        assert_eq!(
            result.record,
            record("KMHXX00000X000000", "기아", "2022.11", "쏘렌토")
        );
        assert_eq!(result.sources[&Field::Maker].text, TextSource::Primary);
        assert_eq!(result.sources[&Field::Vin].text, TextSource::Secondary);
    }

    #[test]
    fn test_vin_area_fills_missing_maker() {
        let result = parser().extract("모델명: 아반떼", Some("차대번호 KMHXX00000X000000"));

        assert_eq!(result.record, record("KMHXX00000X000000", "현대", "", "아반떼"));
        assert_eq!(
            result.sources[&Field::Maker],
            FieldSource {
                text: TextSource::Secondary,
                strategy: "wmi",
                confidence: 0.6,
            }
        );
        assert_eq!(result.missing_fields, vec![Field::Year]);
    }

    #[test]
    fn test_vin_area_without_vin_is_ignored() {
        let result = parser().extract("모델명: 아반떼", Some("현대자동차"));

        assert_eq!(result.record, record("", "", "", "아반떼"));
        assert!(!result.used_vin_area);
        assert_eq!(
            result.missing_fields,
            vec![Field::Vin, Field::Maker, Field::Year]
        );
    }

    #[test]
    fn test_vin_area_not_consulted_when_sticker_has_vin() {
        let sticker = "차대번호 KMHXX00000X000000";
        let result = parser().extract(sticker, Some("VIN KNAXX00000X000000"));

        assert_eq!(result.record.vin, "KMHXX00000X000000");
        assert!(!result.used_vin_area);
    }

    #[test]
    fn test_vin_area_fallback_disabled() {
        let result = parser()
            .with_vin_area_fallback(false)
            .extract("모델명: 아반떼", Some("VIN KMHXX00000X000000"));

        assert_eq!(result.record.vin, "");
        assert!(!result.used_vin_area);
    }

    #[test]
    fn test_future_date_is_dropped() {
        let result = parser().parse("제작연월: 2024.07\n모델명: 캐스퍼");

        assert_eq!(result.record.year, "");
        assert!(result.warnings.contains(&"Could not extract Year".to_string()));
    }

    #[test]
    fn test_from_config() {
        let config = ExtractionConfig {
            wmi_fallback: false,
            vin_area_fallback: true,
            model_max_chars: 3,
        };
        let result = VehicleInfoParser::from_config(&config)
            .with_reference_date(YearMonth::new(2024, 6).unwrap())
            .parse("VIN KMHXX00000X000000\n모델명: 팰리세이드");

        assert_eq!(result.record, record("KMHXX00000X000000", "", "", "팰리세"));
    }

    #[test]
    fn test_empty_text_yields_empty_record() {
        let result = parser().parse("");

        assert!(result.record.is_empty());
        assert_eq!(result.missing_fields, Field::ALL.to_vec());
        assert_eq!(result.warnings.len(), 4);
    }

    #[test]
    fn test_details_serialize_field_keys() {
        let result = parser().parse("모델명: 아반떼");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["record"]["Model"], "아반떼");
        assert_eq!(json["sources"]["Model"]["text"], "primary");
        assert_eq!(json["missing_fields"][0], "VIN");
    }
}
