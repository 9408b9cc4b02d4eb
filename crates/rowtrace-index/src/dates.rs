//! Date normalization.
//!
//! [`DateNormalizer::normalize`] is total: every input produces a string,
//! which is one of
//!
//! - [`NONE_SENTINEL`] for empty or null-like cells,
//! - the date rendered with the configured output format,
//! - [`UNPARSEABLE_PREFIX`] followed by the original cell text.
//!
//! Recognition order: native date cells, then compact 8-digit dates
//! (`YYYYMMDD` after stripping every non-digit), then the textual patterns
//! below in order.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};
use rowtrace_data::CellValue;

/// Returned for empty and null-like cells
pub const NONE_SENTINEL: &str = "None";

/// Prefix of the diagnostic returned when nothing matches
pub const UNPARSEABLE_PREFIX: &str = "Unparseable date: ";

/// Date-and-time patterns, tried before the date-only ones
const DATETIME_PATTERNS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only patterns; day-first orderings precede month-first ones
const DATE_PATTERNS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
];

/// Converts raw date cells into one fixed output format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateNormalizer {
    output_format: String,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::new("%Y-%m-%d")
    }
}

impl DateNormalizer {
    pub fn new(output_format: impl Into<String>) -> Self {
        Self {
            output_format: output_format.into(),
        }
    }

    pub fn output_format(&self) -> &str {
        &self.output_format
    }

    /// Normalize one cell value. Never fails.
    pub fn normalize(&self, value: &CellValue) -> String {
        if value.is_null_like() {
            return NONE_SENTINEL.to_string();
        }

        let original = value.to_text();

        let parsed = match value {
            CellValue::DateTime(dt) => Some(*dt),
            _ => Self::parse_text(&original),
        };

        parsed
            .and_then(|dt| self.render(&dt))
            .unwrap_or_else(|| unparseable(&original))
    }

    /// Normalize raw text, treating blank and null-like tokens as missing
    pub fn normalize_text(&self, text: &str) -> String {
        self.normalize(&CellValue::Text(text.to_string()))
    }

    /// Check whether a normalized string is one of the two sentinels
    pub fn is_sentinel(normalized: &str) -> bool {
        normalized == NONE_SENTINEL || normalized.starts_with(UNPARSEABLE_PREFIX)
    }

    fn parse_text(text: &str) -> Option<NaiveDateTime> {
        let trimmed = text.trim();

        if let Some(dt) = Self::parse_compact(trimmed) {
            return Some(dt);
        }

        for pattern in DATETIME_PATTERNS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
                return Some(dt);
            }
        }

        for pattern in DATE_PATTERNS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, pattern) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        None
    }

    /// `YYYYMMDD` once every non-digit is removed
    fn parse_compact(text: &str) -> Option<NaiveDateTime> {
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() != 8 {
            return None;
        }

        let year: i32 = digits[0..4].parse().ok()?;
        let month: u32 = digits[4..6].parse().ok()?;
        let day: u32 = digits[6..8].parse().ok()?;

        NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
    }

    /// Format with the configured pattern; an invalid pattern yields `None`
    fn render(&self, dt: &NaiveDateTime) -> Option<String> {
        let mut out = String::new();
        write!(out, "{}", dt.format(&self.output_format)).ok()?;
        Some(out)
    }
}

fn unparseable(original: &str) -> String {
    format!("{}{}", UNPARSEABLE_PREFIX, original)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn normalizer() -> DateNormalizer {
        DateNormalizer::default()
    }

    #[test]
    fn test_null_like_inputs() {
        let n = normalizer();
        assert_eq!(n.normalize(&CellValue::Empty), "None");
        assert_eq!(n.normalize(&CellValue::Float(f64::NAN)), "None");
        assert_eq!(n.normalize_text(""), "None");
        assert_eq!(n.normalize_text("   "), "None");
        assert_eq!(n.normalize_text("NaN"), "None");
        assert_eq!(n.normalize_text("NaT"), "None");
        assert_eq!(n.normalize_text("None"), "None");
        assert_eq!(n.normalize_text("null"), "None");
    }

    #[test]
    fn test_native_datetime() {
        let dt = NaiveDate::from_ymd_opt(2023, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        assert_eq!(normalizer().normalize(&CellValue::DateTime(dt)), "2023-12-31");
    }

    #[test]
    fn test_compact_digits() {
        let n = normalizer();
        assert_eq!(n.normalize_text("20240115"), "2024-01-15");
        assert_eq!(n.normalize(&CellValue::Int(20240115)), "2024-01-15");
        assert_eq!(n.normalize(&CellValue::Float(20240115.0)), "2024-01-15");
        // Separators are stripped before the digit count
        assert_eq!(n.normalize_text("2024/01/15"), "2024-01-15");
    }

    #[test]
    fn test_invalid_compact_date_is_diagnostic() {
        assert_eq!(
            normalizer().normalize_text("20240230"),
            "Unparseable date: 20240230"
        );
    }

    #[test]
    fn test_textual_patterns() {
        let n = normalizer();
        assert_eq!(n.normalize_text("2024-01-20"), "2024-01-20");
        assert_eq!(n.normalize_text("20/01/2024"), "2024-01-20");
        assert_eq!(n.normalize_text("01/20/2024"), "2024-01-20");
        assert_eq!(n.normalize_text("20.01.2024"), "2024-01-20");
        assert_eq!(n.normalize_text("20 Jan 2024"), "2024-01-20");
        assert_eq!(n.normalize_text("20 January 2024"), "2024-01-20");
        assert_eq!(n.normalize_text("Jan 20, 2024"), "2024-01-20");
        assert_eq!(n.normalize_text("20-Jan-2024"), "2024-01-20");
        assert_eq!(n.normalize_text("2024-01-20 08:15:00"), "2024-01-20");
        assert_eq!(n.normalize_text("2024-01-20T08:15:00"), "2024-01-20");
        assert_eq!(n.normalize_text("  2024-1-5  "), "2024-01-05");
    }

    #[test]
    fn test_day_first_wins_when_ambiguous() {
        assert_eq!(normalizer().normalize_text("03/04/2024"), "2024-04-03");
    }

    #[test]
    fn test_garbage() {
        let n = normalizer();
        assert_eq!(n.normalize_text("garbage"), "Unparseable date: garbage");
        assert_eq!(
            n.normalize(&CellValue::Bool(true)),
            "Unparseable date: true"
        );
        assert_eq!(n.normalize(&CellValue::Int(45306)), "Unparseable date: 45306");
    }

    #[test]
    fn test_custom_output_format() {
        let n = DateNormalizer::new("%d %b %Y");
        assert_eq!(n.normalize_text("20240115"), "15 Jan 2024");
    }

    #[test]
    fn test_invalid_output_format_does_not_panic() {
        let n = DateNormalizer::new("%Q %Y");
        assert_eq!(n.normalize_text("20240115"), "Unparseable date: 20240115");
    }

    #[test]
    fn test_is_sentinel() {
        assert!(DateNormalizer::is_sentinel("None"));
        assert!(DateNormalizer::is_sentinel("Unparseable date: x"));
        assert!(!DateNormalizer::is_sentinel("2024-01-15"));
    }

    fn random_input(rng: &mut StdRng) -> CellValue {
        const FRAGMENTS: &[&str] = &[
            "2024", "01", "15", "/", "-", ".", " ", "Jan", "February", ",", ":", "T", "x", "é",
            "NaN", "99", "0", "💥", "31", "12",
        ];

        match rng.gen_range(0..6) {
            0 => CellValue::Empty,
            1 => CellValue::Int(rng.gen()),
            2 => CellValue::Float(f64::from_bits(rng.gen())),
            3 => {
                let days = rng.gen_range(1..800_000);
                match NaiveDate::from_num_days_from_ce_opt(days)
                    .and_then(|d| d.and_hms_opt(rng.gen_range(0..24), rng.gen_range(0..60), 0))
                {
                    Some(dt) => CellValue::DateTime(dt),
                    None => CellValue::Empty,
                }
            }
            4 => {
                let digits: String = (0..8)
                    .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
                    .collect();
                CellValue::Text(digits)
            }
            _ => {
                let len = rng.gen_range(0..8);
                let text: String = (0..len)
                    .map(|_| FRAGMENTS[rng.gen_range(0..FRAGMENTS.len())])
                    .collect();
                CellValue::Text(text)
            }
        }
    }

    #[test]
    fn test_normalize_is_total() {
        let n = normalizer();
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..10_000 {
            let input = random_input(&mut rng);
            let out = n.normalize(&input);

            let valid_date = NaiveDate::parse_from_str(&out, "%Y-%m-%d").is_ok();
            assert!(
                out == NONE_SENTINEL || out.starts_with(UNPARSEABLE_PREFIX) || valid_date,
                "unexpected output {:?} for {:?}",
                out,
                input
            );
        }
    }

    #[test]
    fn test_eight_digit_inputs_are_valid_or_diagnostic() {
        let n = normalizer();
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..2_000 {
            let digits: String = (0..8)
                .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
                .collect();
            let out = n.normalize_text(&digits);

            if out.starts_with(UNPARSEABLE_PREFIX) {
                assert_eq!(out, format!("Unparseable date: {}", digits));
            } else {
                let date = NaiveDate::parse_from_str(&out, "%Y-%m-%d").unwrap();
                assert_eq!(date.format("%Y%m%d").to_string(), digits);
            }
        }
    }
}
