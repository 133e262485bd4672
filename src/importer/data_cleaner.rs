// ==========================================
// Offshore Logistics - Data Cleaner
// ==========================================
// Scope: cell text → typed values
//   - numbers: thousands separators, currency sign, (x) = -x
//   - dates: spreadsheet serials and common text layouts
//   - month buckets: "2024-01", "Jan-24", "January 2024", dates
//   - bulk transfer direction
// Failures are ImportError values; the caller decides whether a
// failure rejects the row or only nulls the field
// ==========================================

use crate::domain::types::{TransferDirection, YearMonth};
use crate::engine::text_match::{contains_any_phrase, tokenize};
use crate::importer::error::{ImportError, ImportResult};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Largest serial a spreadsheet can hold (9999-12-31).
pub const MAX_SERIAL_DATE: f64 = 2_958_465.0;
/// Serial of 1950-01-01; a bare number below this in a date cell is
/// more likely a year or a count than a date.
pub const MIN_CELL_SERIAL: f64 = 18_264.0;
/// Serial 60 is the fictitious 1900-02-29.
const LEAP_BUG_SERIAL: f64 = 60.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d", "%d-%b-%Y", "%d-%b-%y", "%b %d, %Y",
    "%B %d, %Y", "%Y%m%d",
];

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const OFFLOAD_MARKERS: &[&str] = &[
    "offload", "off load", "off loaded", "offloaded", "discharge", "discharged", "deliver",
    "delivered", "delivery", "unload", "unloaded",
];
const ONLOAD_MARKERS: &[&str] = &[
    "onload", "on load", "onloaded", "load", "loaded", "loading", "backload", "backloaded",
];

pub struct DataCleaner;

impl DataCleaner {
    /// Parse a numeric cell.
    ///
    /// `"1,250.5"` → 1250.5, `"$3,000"` → 3000, `"(12.5)"` → -12.5
    pub fn parse_number(&self, raw: &str) -> Option<f64> {
        let mut text: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ',' | '$' | ' '))
            .collect();
        let negative = text.starts_with('(') && text.ends_with(')');
        if negative {
            text = text[1..text.len() - 1].to_string();
        }
        let value = text.parse::<f64>().ok().filter(|v| v.is_finite())?;
        Some(if negative { -value } else { value })
    }

    pub fn number_field(&self, row: usize, field: &str, raw: &str) -> ImportResult<f64> {
        self.parse_number(raw)
            .ok_or_else(|| ImportError::TypeConversionError {
                row,
                field: field.to_string(),
                value: raw.to_string(),
            })
    }

    /// Spreadsheet serial → timestamp.
    ///
    /// Day 1 is 1900-01-01 (baseline 1899-12-31). Serials after 60 are
    /// shifted one day back to absorb the phantom 1900-02-29. The
    /// fractional part is the time of day.
    pub fn serial_to_datetime(&self, serial: f64) -> Option<NaiveDateTime> {
        if !serial.is_finite() || !(1.0..=MAX_SERIAL_DATE + 1.0).contains(&serial) {
            return None;
        }
        let days = serial.trunc();
        let base = if days < LEAP_BUG_SERIAL {
            NaiveDate::from_ymd_opt(1899, 12, 31)?
        } else {
            NaiveDate::from_ymd_opt(1899, 12, 30)?
        };
        let date = base.checked_add_signed(Duration::days(days as i64))?;
        let seconds = ((serial - days) * 86_400.0).round() as i64;
        date.and_time(NaiveTime::MIN)
            .checked_add_signed(Duration::seconds(seconds))
    }

    /// Parse a date/time cell: serial number, then text layouts.
    pub fn parse_datetime(&self, raw: &str) -> Option<NaiveDateTime> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        // YYYYMMDD is numeric too but far beyond the serial range
        if text.len() == 8 && text.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(d) = NaiveDate::parse_from_str(text, "%Y%m%d") {
                return Some(d.and_time(NaiveTime::MIN));
            }
        }
        if let Ok(serial) = text.parse::<f64>() {
            if serial < MIN_CELL_SERIAL {
                return None;
            }
            return self.serial_to_datetime(serial);
        }
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
                return Some(dt);
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
                return Some(d.and_time(NaiveTime::MIN));
            }
        }
        None
    }

    pub fn datetime_field(&self, row: usize, field: &str, raw: &str) -> ImportResult<NaiveDateTime> {
        self.parse_datetime(raw)
            .ok_or_else(|| ImportError::DateFormatError {
                row,
                field: field.to_string(),
                value: raw.to_string(),
            })
    }

    /// Parse a month bucket.
    pub fn parse_month(&self, raw: &str) -> Option<YearMonth> {
        let text = raw.trim();
        if let Ok(ym) = text.parse::<YearMonth>() {
            return Some(ym);
        }
        let tokens = tokenize(text);
        if tokens.len() == 2 {
            if let Some(ym) = month_from_pair(&tokens[0], &tokens[1])
                .or_else(|| month_from_pair(&tokens[1], &tokens[0]))
            {
                return Some(ym);
            }
        }
        self.parse_datetime(text)
            .map(|dt| YearMonth::from_date(dt.date()))
    }

    pub fn month_field(&self, row: usize, field: &str, raw: &str) -> ImportResult<YearMonth> {
        self.parse_month(raw)
            .ok_or_else(|| ImportError::DateFormatError {
                row,
                field: field.to_string(),
                value: raw.to_string(),
            })
    }

    /// Bulk transfer direction from free text; offload markers take precedence.
    pub fn parse_direction(&self, raw: &str) -> TransferDirection {
        if contains_any_phrase(raw, OFFLOAD_MARKERS) {
            TransferDirection::Offload
        } else if contains_any_phrase(raw, ONLOAD_MARKERS) {
            TransferDirection::Onload
        } else {
            TransferDirection::Unknown
        }
    }
}

fn month_number(token: &str) -> Option<u32> {
    if let Ok(n) = token.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    if token.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|m| token.starts_with(m))
        .map(|idx| idx as u32 + 1)
}

fn year_number(token: &str) -> Option<i32> {
    if !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match token.len() {
        4 => token.parse().ok(),
        // "Jan-24", "01/24"
        2 => token.parse::<i32>().ok().map(|y| 2000 + y),
        _ => None,
    }
}

fn month_from_pair(month_token: &str, year_token: &str) -> Option<YearMonth> {
    let month = month_number(month_token)?;
    let year = year_number(year_token)?;
    YearMonth::new(year, month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_number() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_number("1,250.5"), Some(1250.5));
        assert_eq!(cleaner.parse_number(" $3,000 "), Some(3000.0));
        assert_eq!(cleaner.parse_number("(12.5)"), Some(-12.5));
        assert_eq!(cleaner.parse_number("abc"), None);
        assert_eq!(cleaner.parse_number(""), None);
    }

    #[test]
    fn test_serial_dates() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.serial_to_datetime(1.0).unwrap().date(), ymd(1900, 1, 1));
        assert_eq!(cleaner.serial_to_datetime(59.0).unwrap().date(), ymd(1900, 2, 28));
        assert_eq!(cleaner.serial_to_datetime(61.0).unwrap().date(), ymd(1900, 3, 1));
        assert_eq!(cleaner.serial_to_datetime(45292.0).unwrap().date(), ymd(2024, 1, 1));
        assert!(cleaner.serial_to_datetime(0.0).is_none());
        assert!(cleaner.serial_to_datetime(-5.0).is_none());
    }

    #[test]
    fn test_serial_fraction_is_time_of_day() {
        let cleaner = DataCleaner;
        let dt = cleaner.serial_to_datetime(45292.75).unwrap();
        assert_eq!(dt, ymd(2024, 1, 1).and_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn test_text_dates() {
        let cleaner = DataCleaner;
        let expected = ymd(2024, 3, 15).and_hms_opt(0, 0, 0).unwrap();
        for text in ["2024-03-15", "03/15/2024", "20240315", "15-Mar-2024", "45366"] {
            assert_eq!(cleaner.parse_datetime(text), Some(expected), "{}", text);
        }
        assert_eq!(
            cleaner.parse_datetime("2024-03-15 06:30"),
            Some(ymd(2024, 3, 15).and_hms_opt(6, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_invalid_date_is_error_not_panic() {
        let cleaner = DataCleaner;
        assert!(cleaner.parse_datetime("next tuesday").is_none());
        let err = cleaner.datetime_field(7, "event_start", "TBD").unwrap_err();
        assert!(matches!(err, ImportError::DateFormatError { row: 7, .. }));
    }

    #[test]
    fn test_bare_year_is_not_a_serial() {
        let cleaner = DataCleaner;
        assert!(cleaner.parse_datetime("2024").is_none());
        assert!(cleaner.parse_datetime("12").is_none());
        assert!(cleaner.parse_month("2024").is_none());
        let err = cleaner.datetime_field(4, "manifest_date", "2024").unwrap_err();
        assert_eq!(err.raw_value(), Some("2024"));
        // the conversion itself still covers the full serial range
        assert!(cleaner.serial_to_datetime(2024.0).is_some());
    }

    #[test]
    fn test_month_buckets() {
        let cleaner = DataCleaner;
        let jan = YearMonth::new(2024, 1).unwrap();
        for text in ["2024-01", "Jan-24", "January 2024", "01/2024", "2024-01-17", "45292"] {
            assert_eq!(cleaner.parse_month(text), Some(jan), "{}", text);
        }
        assert!(cleaner.parse_month("Q1").is_none());
    }

    #[test]
    fn test_direction() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_direction("Offload"), TransferDirection::Offload);
        assert_eq!(cleaner.parse_direction("Off-Load"), TransferDirection::Offload);
        assert_eq!(cleaner.parse_direction("Discharged to rig"), TransferDirection::Offload);
        assert_eq!(cleaner.parse_direction("Onload"), TransferDirection::Onload);
        assert_eq!(cleaner.parse_direction("Backload"), TransferDirection::Onload);
        assert_eq!(cleaner.parse_direction("Transfer"), TransferDirection::Unknown);
    }
}
