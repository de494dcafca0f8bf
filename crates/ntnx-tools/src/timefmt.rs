//! Natural-language time parsing for log collection windows
//!
//! Accepted inputs are tried against an ordered list of patterns and the
//! first one that parses wins:
//!
//! | # | pattern              | example                  |
//! |---|----------------------|--------------------------|
//! | 1 | `%d %B %Y %I %p`     | `31 march 2025 12 AM`    |
//! | 2 | `%d %B %Y %I:%M %p`  | `31 march 2025 12:00 AM` |
//! | 3 | `%d %B %I %p`        | `31 march 12 AM`         |
//! | 4 | `%d %B %I:%M %p`     | `31 march 12:00 AM`      |
//!
//! Month names and AM/PM are case-insensitive. Without a year the
//! reference year is used; without minutes the time is on the hour.
//! All times are taken as UTC.

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::NaiveDateTime;

use crate::error::ToolError;

/// One accepted input shape
#[derive(Debug, Clone, Copy)]
pub struct TimePattern {
    pub format: &'static str,
    pub has_year: bool,
    pub has_minute: bool,
}

pub const TIME_PATTERNS: [TimePattern; 4] = [
    TimePattern {
        format: "%d %B %Y %I %p",
        has_year: true,
        has_minute: false,
    },
    TimePattern {
        format: "%d %B %Y %I:%M %p",
        has_year: true,
        has_minute: true,
    },
    TimePattern {
        format: "%d %B %I %p",
        has_year: false,
        has_minute: false,
    },
    TimePattern {
        format: "%d %B %I:%M %p",
        has_year: false,
        has_minute: true,
    },
];

/// Wire format expected by the log collection API
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

impl TimePattern {
    fn apply(&self, input: &str, year: i32) -> Option<NaiveDateTime> {
        let mut parsed = Parsed::new();
        parse(&mut parsed, input, StrftimeItems::new(self.format)).ok()?;
        if !self.has_year {
            parsed.set_year(i64::from(year)).ok()?;
        }
        if !self.has_minute {
            parsed.set_minute(0).ok()?;
        }
        parsed.to_naive_datetime_with_offset(0).ok()
    }
}

/// Parse one time string, filling a missing year with `year`
pub fn parse_time(input: &str, year: i32) -> Result<NaiveDateTime, ToolError> {
    let normalized = input.split_whitespace().collect::<Vec<_>>().join(" ");

    TIME_PATTERNS
        .iter()
        .find_map(|pattern| pattern.apply(&normalized, year))
        .ok_or_else(|| ToolError::TimeFormat(input.to_string()))
}

/// Parse a collection window; the end must be strictly after the start
pub fn parse_window(
    start: &str,
    end: &str,
    year: i32,
) -> Result<(NaiveDateTime, NaiveDateTime), ToolError> {
    let start = parse_time(start, year)?;
    let end = parse_time(end, year)?;

    if end <= start {
        return Err(ToolError::validation("End time must be after start time"));
    }
    Ok((start, end))
}

pub fn to_iso8601(time: &NaiveDateTime) -> String {
    time.format(ISO_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso(input: &str, year: i32) -> String {
        to_iso8601(&parse_time(input, year).unwrap())
    }

    #[test]
    fn test_every_pattern() {
        assert_eq!(iso("31 march 2025 12 AM", 2030), "2025-03-31T00:00:00Z");
        assert_eq!(iso("31 march 2025 12:30 PM", 2030), "2025-03-31T12:30:00Z");
        assert_eq!(iso("31 march 3 PM", 2026), "2026-03-31T15:00:00Z");
        assert_eq!(iso("1 january 9:05 AM", 2026), "2026-01-01T09:05:00Z");
    }

    #[test]
    fn test_case_and_spacing_are_ignored() {
        assert_eq!(iso("31 MARCH 2025 1 am", 2030), "2025-03-31T01:00:00Z");
        assert_eq!(iso("  31   March  2025 1:00   pm ", 2030), "2025-03-31T13:00:00Z");
    }

    #[test]
    fn test_unrecognised_formats() {
        for input in [
            "yesterday",
            "2025-03-31",
            "31 march",
            "31 march 25:00 PM",
            "30 february 1 AM",
            "",
        ] {
            let err = parse_time(input, 2025).unwrap_err();
            assert!(matches!(err, ToolError::TimeFormat(_)), "{input}");
        }
    }

    #[test]
    fn test_year_is_injected_and_compared_with_date() {
        // 12 AM is midnight, so this is a one-hour window on the same day
        let (start, end) = parse_window("31 march 12 AM", "31 march 1 AM", 2026).unwrap();
        assert_eq!(to_iso8601(&start), "2026-03-31T00:00:00Z");
        assert_eq!(to_iso8601(&end), "2026-03-31T01:00:00Z");

        let err = parse_window("31 march 1 AM", "31 march 12 AM", 2026).unwrap_err();
        assert_eq!(err.to_string(), "End time must be after start time");
    }

    #[test]
    fn test_window_with_explicit_year() {
        let (start, end) =
            parse_window("31 march 2025 12:00 AM", "31 march 2025 1:00 AM", 2030).unwrap();
        assert_eq!(to_iso8601(&start), "2025-03-31T00:00:00Z");
        assert_eq!(to_iso8601(&end), "2025-03-31T01:00:00Z");
    }

    #[test]
    fn test_equal_times_are_rejected() {
        assert!(parse_window("1 april 2025 3 PM", "1 april 2025 3:00 PM", 2030).is_err());
    }

    #[test]
    fn test_later_date_earlier_hour_is_valid() {
        assert!(parse_window("30 march 11 PM", "31 march 1 AM", 2026).is_ok());
    }

    #[test]
    fn test_bad_start_reported_before_end() {
        let err = parse_window("soon", "later", 2025).unwrap_err();
        assert!(err.to_string().contains("soon"));
    }
}
