//! Text formatting for table cells
//!
//! Pure functions: no state, no terminal access. Widths are terminal display
//! columns, so a wide CJK or emoji character counts as two, and every padded
//! cell is truncated rather than allowed to push later columns out of
//! alignment.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};
use itertools::Itertools;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Comma-grouped number with at most two decimals, trailing zeros trimmed.
///
/// `1234567.891` becomes `1,234,567.89`; `42.0` becomes `42`.
pub fn commaf(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let grouped = group_thousands(int_part);

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value.is_sign_negative() && !is_zero {
        "-"
    } else {
        ""
    };

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// Comma-grouped whole number, e.g. `12,349`.
pub fn commas(value: u64) -> String {
    group_thousands(&value.to_string())
}

fn group_thousands(digits: &str) -> String {
    digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .join(",")
}

/// Percent with two decimals, e.g. `-2.00%`.
pub fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Epoch seconds rendered in local time as `15:04:05 Jan 02`.
pub fn timestamp(epoch: i64) -> String {
    timestamp_in(epoch, &Local)
}

/// Epoch seconds rendered in the given time zone.
pub fn timestamp_in<Tz>(epoch: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::from_timestamp(epoch, 0).map_or_else(
        || "-".to_string(),
        |utc| utc.with_timezone(tz).format("%H:%M:%S %b %d").to_string(),
    )
}

/// Display columns `text` occupies.
pub fn width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Left-align `text` in a cell of `width` columns.
pub fn pad_right(text: &str, width: usize) -> String {
    let fitted = fit(text, width);
    let fill = width.saturating_sub(self::width(&fitted));
    format!("{fitted}{}", " ".repeat(fill))
}

/// Right-align `text` in a cell of `width` columns.
pub fn pad_left(text: &str, width: usize) -> String {
    let fitted = fit(text, width);
    let fill = width.saturating_sub(self::width(&fitted));
    format!("{}{fitted}", " ".repeat(fill))
}

/// Truncate `text` to at most `width` columns.
///
/// A wide character that would straddle the limit is dropped whole.
pub fn fit(text: &str, width: usize) -> String {
    text.chars()
        .scan(0, |used, c| {
            *used += c.width().unwrap_or(0);
            (*used <= width).then_some(c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_commaf_groups_thousands() {
        assert_eq!(commaf(1_234_567.891), "1,234,567.89");
        assert_eq!(commaf(999.0), "999");
        assert_eq!(commaf(1000.5), "1,000.5");
        assert_eq!(commaf(0.0), "0");
    }

    #[test]
    fn test_commaf_negative_values() {
        assert_eq!(commaf(-12_345.6), "-12,345.6");
        assert_eq!(commaf(-0.001), "0");
    }

    #[test]
    fn test_commaf_non_finite() {
        assert_eq!(commaf(f64::NAN), "-");
        assert_eq!(commaf(f64::INFINITY), "-");
    }

    #[test]
    fn test_commas() {
        assert_eq!(commas(0), "0");
        assert_eq!(commas(876), "876");
        assert_eq!(commas(12_349), "12,349");
        assert_eq!(commas(1_000_000), "1,000,000");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(-2.0), "-2.00%");
        assert_eq!(percent(3.456), "3.46%");
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(timestamp_in(1_514_764_800, &Utc), "00:00:00 Jan 01");
    }

    #[test]
    fn test_padding_and_truncation() {
        assert_eq!(pad_right("BTC", 6), "BTC   ");
        assert_eq!(pad_left("1.5", 6), "   1.5");
        assert_eq!(pad_right("Bitcoin Cash", 7), "Bitcoin");
        assert_eq!(pad_left("€€€", 2), "€€");
    }

    #[test]
    fn test_wide_characters_count_as_two_columns() {
        assert_eq!(width("比特币"), 6);
        assert_eq!(pad_right("比特币", 8), "比特币  ");
        assert_eq!(width(&pad_right("比特币 Cash", 9)), 9);
        assert_eq!(fit("比特币", 5), "比特");
        assert_eq!(pad_left("🚀", 4), "  🚀");
    }
}
