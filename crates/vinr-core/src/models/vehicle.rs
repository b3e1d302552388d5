//! Vehicle record produced by the extraction engine.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// The four fields recovered from a registration sticker or VIN plate.
///
/// Every field is either a validated value or an empty string. Serialized
/// keys are `VIN`, `Maker`, `Year` and `Model`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// 17-character VIN over `[A-HJ-NPR-Z0-9]`.
    #[serde(rename = "VIN", default)]
    pub vin: String,

    /// Canonical manufacturer label.
    #[serde(rename = "Maker", default)]
    pub maker: String,

    /// `YYYY` or `YYYY.MM`.
    #[serde(rename = "Year", default)]
    pub year: String,

    /// Free-text model name.
    #[serde(rename = "Model", default)]
    pub model: String,
}

/// Field selector for [`ExtractedRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "VIN")]
    Vin,
    #[serde(rename = "Maker")]
    Maker,
    #[serde(rename = "Year")]
    Year,
    #[serde(rename = "Model")]
    Model,
}

impl Field {
    /// All fields in extraction order.
    pub const ALL: [Field; 4] = [Field::Vin, Field::Maker, Field::Year, Field::Model];

    /// Name used in serialized output and messages.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Vin => "VIN",
            Field::Maker => "Maker",
            Field::Year => "Year",
            Field::Model => "Model",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ExtractedRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a field by selector.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Vin => &self.vin,
            Field::Maker => &self.maker,
            Field::Year => &self.year,
            Field::Model => &self.model,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Vin => &mut self.vin,
            Field::Maker => &mut self.maker,
            Field::Year => &mut self.year,
            Field::Model => &mut self.model,
        }
    }

    /// Overwrite a field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    /// True when a field holds a value.
    pub fn has(&self, field: Field) -> bool {
        !self.get(field).is_empty()
    }

    /// True when no field could be extracted.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| !self.has(*f))
    }

    /// Fields left empty, in extraction order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL.into_iter().filter(|f| !self.has(*f)).collect()
    }

    /// Copy the given fields from `other` where this record is still empty.
    ///
    /// Returns the fields that were actually filled.
    pub fn fill_missing_from(&mut self, other: &ExtractedRecord, fields: &[Field]) -> Vec<Field> {
        let mut filled = Vec::new();
        for &field in fields {
            if !self.has(field) && other.has(field) {
                self.set(field, other.get(field));
                filled.push(field);
            }
        }
        filled
    }
}

/// Where a merged field came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// Sticker-area OCR text.
    #[default]
    Primary,
    /// VIN-area OCR text.
    Secondary,
}

/// Calendar month used as "now" by the future-date guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Create a year-month, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The current month on the local clock.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Year and month of a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl FromStr for YearMonth {
    type Err = ExtractionError;

    /// Parse `YYYY-MM`, `YYYY.MM` or `YYYY/MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ExtractionError::YearMonth(s.to_string());
        let (year, month) = s.trim().split_once(['-', '.', '/']).ok_or_else(err)?;
        if year.len() != 4 {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Normalized manufacture date: a year, optionally with a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufactureDate {
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

impl ManufactureDate {
    pub fn year(year: i32) -> Self {
        Self { year, month: None }
    }

    pub fn year_month(year: i32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
        }
    }

    /// True when this date lies after `now`, compared at month granularity.
    ///
    /// A year-only date is only in the future when its year is.
    pub fn is_after(&self, now: YearMonth) -> bool {
        match self.month {
            Some(month) => self.year > now.year || (self.year == now.year && month > now.month),
            None => self.year > now.year,
        }
    }
}

impl fmt::Display for ManufactureDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(month) => write!(f, "{}.{:02}", self.year, month),
            None => write!(f, "{}", self.year),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_serializes_with_service_keys() {
        let record = ExtractedRecord {
            vin: "KMHXX00000X000000".to_string(),
            maker: "현대".to_string(),
            year: "2023.05".to_string(),
            model: "그랜저".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "VIN": "KMHXX00000X000000",
                "Maker": "현대",
                "Year": "2023.05",
                "Model": "그랜저",
            })
        );
    }

    #[test]
    fn test_empty_record_is_fully_populated() {
        let json = serde_json::to_string(&ExtractedRecord::new()).unwrap();
        assert_eq!(json, r#"{"VIN":"","Maker":"","Year":"","Model":""}"#);
    }

    #[test]
    fn test_missing_fields() {
        let mut record = ExtractedRecord::new();
        assert!(record.is_empty());
        record.set(Field::Year, "2020");
        assert_eq!(
            record.missing_fields(),
            vec![Field::Vin, Field::Maker, Field::Model]
        );
    }

    #[test]
    fn test_fill_missing_keeps_existing_values() {
        let mut primary = ExtractedRecord {
            maker: "기아".to_string(),
            ..Default::default()
        };
        let secondary = ExtractedRecord {
            maker: "현대".to_string(),
            year: "2021".to_string(),
            ..Default::default()
        };

        let filled = primary.fill_missing_from(&secondary, &[Field::Maker, Field::Year, Field::Model]);

        assert_eq!(filled, vec![Field::Year]);
        assert_eq!(primary.maker, "기아");
        assert_eq!(primary.year, "2021");
    }

    #[test]
    fn test_year_month_parsing() {
        assert_eq!("2024-06".parse::<YearMonth>(), Ok(YearMonth { year: 2024, month: 6 }));
        assert_eq!("2024.12".parse::<YearMonth>(), Ok(YearMonth { year: 2024, month: 12 }));
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("24-01".parse::<YearMonth>().is_err());
        assert!("2024".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_manufacture_date_display() {
        assert_eq!(ManufactureDate::year_month(2023, 5).to_string(), "2023.05");
        assert_eq!(ManufactureDate::year(2019).to_string(), "2019");
    }

    #[test]
    fn test_manufacture_date_future_check() {
        let now = YearMonth { year: 2024, month: 6 };
        assert!(ManufactureDate::year_month(2024, 7).is_after(now));
        assert!(!ManufactureDate::year_month(2024, 6).is_after(now));
        assert!(ManufactureDate::year(2025).is_after(now));
        assert!(!ManufactureDate::year(2024).is_after(now));
    }
}
