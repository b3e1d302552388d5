//! Manufacture date normalization with a future-date guard.

use regex::Captures;
use tracing::trace;

use super::patterns::{YEAR_BARE, YEAR_LABELS, YEAR_MONTH, YEAR_MONTH_LABELED, YEAR_WITH_SUFFIX};
use super::{ExtractionMatch, FallbackChain, FieldExtractor};
use crate::extract::text::Document;
use crate::models::vehicle::{Field, ManufactureDate, YearMonth};

/// Manufacture year extractor.
#[derive(Debug, Clone)]
pub struct YearExtractor {
    today: YearMonth,
}

impl YearExtractor {
    /// Create an extractor that treats `today` as the current month.
    pub fn new(today: YearMonth) -> Self {
        Self { today }
    }

    /// Date on a labeled line, or on the line after a bare label.
    fn from_labeled_line(&self, doc: &Document<'_>) -> Option<ManufactureDate> {
        for (i, line) in doc.lines().iter().enumerate() {
            for label in YEAR_LABELS.labels_in(line) {
                let mut value = label.value_after(line);
                if value.is_empty() {
                    value = doc.line(i + 1).unwrap_or_default();
                }
                if let Some(date) = normalize_year(value, doc.text(), self.today) {
                    return Some(date);
                }
            }
        }
        None
    }
}

impl FieldExtractor for YearExtractor {
    type Output = ManufactureDate;

    fn extract(&self, doc: &Document<'_>) -> Option<ExtractionMatch<ManufactureDate>> {
        FallbackChain::new(Field::Year)
            .then("labeled-line", 0.9, |doc| self.from_labeled_line(doc))
            .then("full-text", 0.6, |doc| normalize_year("", doc.text(), self.today))
            .run(doc)
    }
}

/// Normalize a candidate value to a manufacture date.
///
/// The value is searched first; only if it holds no date at all is the full
/// text searched, labeled dates before unlabeled ones. The first pattern to
/// match decides: a date after `today` is discarded rather than replaced by a
/// later, weaker match.
pub fn normalize_year(value: &str, full_text: &str, today: YearMonth) -> Option<ManufactureDate> {
    let date = date_in_value(value).or_else(|| date_in_text(full_text))?;

    if date.is_after(today) {
        trace!("discarding future manufacture date {} (today {})", date, today);
        return None;
    }
    Some(date)
}

fn date_in_value(value: &str) -> Option<ManufactureDate> {
    if let Some(caps) = YEAR_MONTH.captures(value) {
        return year_month(&caps);
    }
    YEAR_WITH_SUFFIX
        .captures(value)
        .or_else(|| YEAR_BARE.captures(value))
        .and_then(|caps| caps[1].parse().ok())
        .map(ManufactureDate::year)
}

fn date_in_text(text: &str) -> Option<ManufactureDate> {
    match YEAR_MONTH_LABELED.captures(text) {
        Some(caps) => year_month(&caps),
        None => date_in_value(text),
    }
}

fn year_month(caps: &Captures<'_>) -> Option<ManufactureDate> {
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    (1..=12)
        .contains(&month)
        .then(|| ManufactureDate::year_month(year, month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NOW: YearMonth = YearMonth {
        year: 2024,
        month: 6,
    };

    fn norm(value: &str) -> String {
        normalize_year(value, value, NOW)
            .map(|d| d.to_string())
            .unwrap_or_default()
    }

    fn extract(text: &str) -> Option<String> {
        YearExtractor::new(NOW)
            .extract(&Document::new(text))
            .map(|m| m.value.to_string())
    }

    #[test]
    fn test_future_guard_month_granularity() {
        assert_eq!(norm("2025.01"), "");
        assert_eq!(norm("2024.05"), "2024.05");
        assert_eq!(norm("2024.06"), "2024.06");
        assert_eq!(norm("2024.07"), "");
    }

    #[test]
    fn test_future_guard_year_only() {
        assert_eq!(norm("2025년"), "");
        assert_eq!(norm("2024년"), "2024");
        assert_eq!(norm("2030"), "");
    }

    #[test]
    fn test_formats() {
        assert_eq!(norm("2023.5"), "2023.05");
        assert_eq!(norm("2023-11"), "2023.11");
        assert_eq!(norm("2023/02"), "2023.02");
        assert_eq!(norm("2023 09"), "2023.09");
        assert_eq!(norm("2023년 9월"), "2023.09");
        assert_eq!(norm("1998.12"), "1998.12");
        assert_eq!(norm("2019 년"), "2019");
        assert_eq!(norm("2019년식"), "");
        assert_eq!(norm("MY 2018"), "2018");
        assert_eq!(norm("no date here"), "");
        assert_eq!(norm("2023.13"), "2023");
    }

    #[test]
    fn test_value_takes_precedence_over_full_text() {
        let date = normalize_year("2020.03", "제작연월: 2021.04", NOW).unwrap();
        assert_eq!(date.to_string(), "2020.03");
    }

    #[test]
    fn test_labeled_date_beats_unlabeled_in_full_text() {
        let text = "정기검사 2019.01\nMFD: 2021.08";
        assert_eq!(normalize_year("", text, NOW).unwrap().to_string(), "2021.08");
    }

    #[test]
    fn test_out_of_range_month_falls_back_to_year() {
        let date = normalize_year("", "제작연월: 2023.13", NOW).unwrap();
        assert_eq!(date, ManufactureDate::year(2023));
    }

    #[test]
    fn test_future_value_is_not_replaced_by_full_text() {
        assert_eq!(normalize_year("2027.01", "제작연월 2020.01", NOW), None);
    }

    #[test]
    fn test_extract_labeled_line() {
        let text = "차대번호: KMHXX00000X000000\n제작연월: 2023.05\n모델명: 그랜저";
        assert_eq!(extract(text).as_deref(), Some("2023.05"));
    }

    #[test]
    fn test_extract_label_on_previous_line() {
        let text = "제작 연월\n2022년 11월";
        assert_eq!(extract(text).as_deref(), Some("2022.11"));
    }

    #[test]
    fn test_extract_without_label() {
        let hit = YearExtractor::new(NOW)
            .extract(&Document::new("HYUNDAI\n2017"))
            .unwrap();
        assert_eq!(hit.value, ManufactureDate::year(2017));
        assert_eq!(hit.strategy, "full-text");
    }

    #[test]
    fn test_extract_future_everywhere() {
        assert_eq!(extract("제작연월: 2029.01"), None);
    }
}
