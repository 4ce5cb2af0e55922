//! Tolerant parsing of spreadsheet-style date and amount values.
//!
//! Every function here is total over its input: malformed data comes back
//! as a structured [`ParseFailure`], never a panic. Callers pick the
//! fallback — the join defaults amounts to zero and dates to a reference
//! date, and counts each recovery in its quality report.

use std::fmt;

use chrono::{Duration, NaiveDate};

use crate::value::FieldValue;

/// Extra formats tried after ISO `YYYY-MM-DD`, in order. Day-first
/// variants come before month-first, matching the source system's locale.
const FALLBACK_FORMATS: &[&str] = &["%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d %b %Y"];

/// Largest day serial accepted before declaring the value out of range.
const MAX_SERIAL: f64 = 2_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseFailure {
    /// Blank or absent input.
    Empty,
    /// Text that no known format recognizes.
    Unrecognized(String),
    /// A numeric value outside the representable range.
    OutOfRange(f64),
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty value"),
            Self::Unrecognized(s) => write!(f, "unrecognized value '{s}'"),
            Self::OutOfRange(n) => write!(f, "value {n} out of range"),
        }
    }
}

/// Day-serial epoch used by common spreadsheet exports (serial 25569 is
/// 1970-01-01).
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap()
}

/// Parse a date from a loosely-typed cell.
///
/// Accepts ISO `YYYY-MM-DD` verbatim, numeric day serials from the
/// spreadsheet epoch (`epoch + round(n)` days), and a short chain of
/// common textual formats. Everything else is a structured failure.
pub fn parse_date(value: &FieldValue) -> Result<NaiveDate, ParseFailure> {
    match value {
        FieldValue::Empty => Err(ParseFailure::Empty),
        FieldValue::Number(n) => {
            let days = n.round();
            if !days.is_finite() || days.abs() > MAX_SERIAL {
                return Err(ParseFailure::OutOfRange(*n));
            }
            serial_epoch()
                .checked_add_signed(Duration::days(days as i64))
                .ok_or(ParseFailure::OutOfRange(*n))
        }
        FieldValue::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(ParseFailure::Empty);
            }
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Ok(d);
            }
            for format in FALLBACK_FORMATS {
                if let Ok(d) = NaiveDate::parse_from_str(s, format) {
                    return Ok(d);
                }
            }
            Err(ParseFailure::Unrecognized(s.to_string()))
        }
    }
}

/// Parse a monetary amount into whole currency units.
///
/// Numbers round to the nearest unit. Text is stripped of every character
/// other than digits, `.` and `-` before conversion, so `"Rp 2,500"`
/// parses as 2500. Total failure is an error; the join layer applies the
/// documented zero-value default and counts the recovery.
pub fn parse_amount(value: &FieldValue) -> Result<i64, ParseFailure> {
    match value {
        FieldValue::Empty => Err(ParseFailure::Empty),
        FieldValue::Number(n) => {
            if !n.is_finite() {
                return Err(ParseFailure::OutOfRange(*n));
            }
            Ok(n.round() as i64)
        }
        FieldValue::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            if cleaned.is_empty() {
                return Err(ParseFailure::Empty);
            }
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|n| n.round() as i64)
                .ok_or_else(|| ParseFailure::Unrecognized(s.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn iso_date_verbatim() {
        let v = FieldValue::Text("2023-12-31".into());
        assert_eq!(parse_date(&v).unwrap(), date("2023-12-31"));
    }

    #[test]
    fn day_serial_from_epoch() {
        assert_eq!(
            parse_date(&FieldValue::Number(25569.0)).unwrap(),
            date("1970-01-01")
        );
        assert_eq!(
            parse_date(&FieldValue::Number(45291.0)).unwrap(),
            date("2023-12-31")
        );
        // Fractional serials carry a time-of-day component; round it away.
        assert_eq!(
            parse_date(&FieldValue::Number(45290.75)).unwrap(),
            date("2023-12-31")
        );
    }

    #[test]
    fn fallback_formats() {
        assert_eq!(
            parse_date(&FieldValue::Text("31/12/2023".into())).unwrap(),
            date("2023-12-31")
        );
        assert_eq!(
            parse_date(&FieldValue::Text("12/31/2023".into())).unwrap(),
            date("2023-12-31")
        );
        assert_eq!(
            parse_date(&FieldValue::Text("31 Dec 2023".into())).unwrap(),
            date("2023-12-31")
        );
    }

    #[test]
    fn bad_dates_fail_structurally() {
        assert_eq!(parse_date(&FieldValue::Empty), Err(ParseFailure::Empty));
        assert_eq!(
            parse_date(&FieldValue::Text("soon".into())),
            Err(ParseFailure::Unrecognized("soon".into()))
        );
        assert!(matches!(
            parse_date(&FieldValue::Number(1e12)),
            Err(ParseFailure::OutOfRange(_))
        ));
    }

    #[test]
    fn amounts_from_numbers() {
        assert_eq!(parse_amount(&FieldValue::Number(2500.0)).unwrap(), 2500);
        assert_eq!(parse_amount(&FieldValue::Number(2500.4)).unwrap(), 2500);
        assert_eq!(parse_amount(&FieldValue::Number(-99.5)).unwrap(), -100);
    }

    #[test]
    fn amounts_from_locale_text() {
        assert_eq!(
            parse_amount(&FieldValue::Text("Rp 2,500".into())).unwrap(),
            2500
        );
        assert_eq!(
            parse_amount(&FieldValue::Text("1,234.56".into())).unwrap(),
            1235
        );
        assert_eq!(parse_amount(&FieldValue::Text("-450".into())).unwrap(), -450);
    }

    #[test]
    fn bad_amounts_fail_structurally() {
        assert_eq!(parse_amount(&FieldValue::Empty), Err(ParseFailure::Empty));
        assert_eq!(
            parse_amount(&FieldValue::Text("n/a".into())),
            Err(ParseFailure::Empty)
        );
        assert_eq!(
            parse_amount(&FieldValue::Text("1.2.3".into())),
            Err(ParseFailure::Unrecognized("1.2.3".into()))
        );
    }
}
