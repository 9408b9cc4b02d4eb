//! Typed cell values.
//!
//! Spreadsheet cells hold heterogeneous values. Every consumer matches on
//! [`CellValue`] explicitly rather than guessing at a stringly-typed form.

use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Textual forms that mean "no value" in exported spreadsheets
const NULL_TOKENS: &[&str] = &["nan", "NaN", "NaT", "None", "none", "null", "NULL", "<NA>"];

/// A single cell value read from a sheet
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell
    Empty,
    /// Text cell
    Text(String),
    /// Integer cell
    Int(i64),
    /// Floating point cell
    Float(f64),
    /// Boolean cell
    Bool(bool),
    /// Native date/time cell
    DateTime(NaiveDateTime),
    /// Cell holding a spreadsheet error such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    /// Uniform text representation used for transport
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => format_float(*f),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => {
                if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            CellValue::Error(e) => format!("#ERROR: {}", e),
        }
    }

    /// Normalized key form: the trimmed text representation.
    ///
    /// Numeric and textual keys compare equal when their text matches, so
    /// `42` stored as a number and `"42"` stored as text find each other.
    /// Returns `None` for cells that cannot act as a key.
    pub fn key_text(&self) -> Option<String> {
        if self.is_null_like() {
            return None;
        }
        match self {
            CellValue::Error(_) => None,
            other => Some(other.to_text().trim().to_string()),
        }
    }

    /// Check whether the cell is empty or holds a textual "nothing"
    pub fn is_null_like(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Float(f) => f.is_nan(),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                trimmed.is_empty() || NULL_TOKENS.contains(&trimmed)
            }
            _ => false,
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Error(e) => CellValue::Error(format!("{:?}", e)),
            Data::DateTime(dt) => {
                if dt.is_duration() {
                    return CellValue::Float(dt.as_f64());
                }
                match dt.as_datetime() {
                    Some(ndt) => CellValue::DateTime(ndt),
                    None => CellValue::Float(dt.as_f64()),
                }
            }
            Data::DateTimeIso(s) => match parse_iso(s) {
                Some(ndt) => CellValue::DateTime(ndt),
                None => CellValue::Text(s.clone()),
            },
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// Format floats without a trailing `.0` for whole numbers
fn format_float(f: f64) -> String {
    if f.is_nan() {
        String::new()
    } else if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn test_to_text() {
        assert_eq!(CellValue::Empty.to_text(), "");
        assert_eq!(CellValue::Text("hello".to_string()).to_text(), "hello");
        assert_eq!(CellValue::Int(42).to_text(), "42");
        assert_eq!(CellValue::Float(3.5).to_text(), "3.5");
        assert_eq!(CellValue::Float(10.0).to_text(), "10");
        assert_eq!(CellValue::Bool(true).to_text(), "true");
    }

    #[test]
    fn test_datetime_to_text() {
        let midnight = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(CellValue::DateTime(midnight).to_text(), "2024-01-15");

        let afternoon = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap();
        assert_eq!(
            CellValue::DateTime(afternoon).to_text(),
            "2024-01-15 14:30:05"
        );
    }

    #[test]
    fn test_key_text_numeric_and_text_agree() {
        assert_eq!(CellValue::Float(1001.0).key_text(), Some("1001".to_string()));
        assert_eq!(CellValue::Int(1001).key_text(), Some("1001".to_string()));
        assert_eq!(
            CellValue::Text(" 1001 ".to_string()).key_text(),
            Some("1001".to_string())
        );
    }

    #[test]
    fn test_key_text_rejects_null_like() {
        assert_eq!(CellValue::Empty.key_text(), None);
        assert_eq!(CellValue::Text("   ".to_string()).key_text(), None);
        assert_eq!(CellValue::Text("NaN".to_string()).key_text(), None);
        assert_eq!(CellValue::Float(f64::NAN).key_text(), None);
        assert_eq!(CellValue::Error("Div0".to_string()).key_text(), None);
    }

    #[test]
    fn test_from_calamine_native_date() {
        let serial = Data::DateTime(ExcelDateTime::new(
            45306.0,
            ExcelDateTimeType::DateTime,
            false,
        ));
        assert_eq!(
            CellValue::from(&serial),
            CellValue::DateTime(
                NaiveDate::from_ymd_opt(2024, 1, 15)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_from_calamine_duration_stays_numeric() {
        let duration = Data::DateTime(ExcelDateTime::new(
            1.5,
            ExcelDateTimeType::TimeDelta,
            false,
        ));
        assert_eq!(CellValue::from(&duration), CellValue::Float(1.5));
    }

    #[test]
    fn test_from_calamine_data() {
        assert_eq!(CellValue::from(&Data::Empty), CellValue::Empty);
        assert_eq!(CellValue::from(&Data::Int(7)), CellValue::Int(7));
        assert_eq!(
            CellValue::from(&Data::String("x".to_string())),
            CellValue::Text("x".to_string())
        );
        assert_eq!(
            CellValue::from(&Data::DateTimeIso("2024-01-20".to_string())),
            CellValue::DateTime(
                NaiveDate::from_ymd_opt(2024, 1, 20)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            )
        );
        assert_eq!(
            CellValue::from(&Data::DateTimeIso("not a date".to_string())),
            CellValue::Text("not a date".to_string())
        );
    }
}
