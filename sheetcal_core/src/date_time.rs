//! Strict parsing of the sheet's date and time cells.
//!
//! Dates are `M/D/YYYY` with one or two digit month and day. Times are 24-hour `H:MM` or `HH:MM`.
//! Anything else is treated as absent.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$").unwrap());
static TIME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]{1,2}):([0-9]{2})$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ParsedDate {
    /// Get the calendar date, if the components name a real day.
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ParsedTime {
    pub hour: u32,
    pub minute: u32,
}

impl ParsedTime {
    /// Place this time on a given day.
    pub fn on(self, date: NaiveDate) -> Option<NaiveDateTime> {
        date.and_hms_opt(self.hour, self.minute, 0)
    }

    /// Format as a 12-hour clock label like `9:00 AM` or `12:30 PM`.
    pub fn to_12h(self) -> String {
        let hour = match self.hour % 12 {
            0 => 12,
            hour => hour,
        };
        let meridiem = if self.hour >= 12 { "PM" } else { "AM" };
        format!("{hour}:{:02} {meridiem}", self.minute)
    }
}

/// Parse a `M/D/YYYY` date cell.
///
/// Zero components are rejected here, impossible days like `2/30/2024` only later by [`ParsedDate::to_date`].
pub fn parse_date(text: &str) -> Option<ParsedDate> {
    let captures = DATE_REGEX.captures(text.trim())?;
    let month: u32 = captures[1].parse().ok()?;
    let day: u32 = captures[2].parse().ok()?;
    let year: i32 = captures[3].parse().ok()?;
    if month == 0 || day == 0 || year == 0 {
        return None;
    }
    Some(ParsedDate { year, month, day })
}

/// Parse a 24-hour `H:MM` time cell.
pub fn parse_time(text: &str) -> Option<ParsedTime> {
    let captures = TIME_REGEX.captures(text.trim())?;
    let hour: u32 = captures[1].parse().ok()?;
    let minute: u32 = captures[2].parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(ParsedTime { hour, minute })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use test_case::test_case;

    use crate::date_time::{parse_date, parse_time, ParsedDate, ParsedTime};

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 3/5/2024 "),
            Some(ParsedDate {
                year: 2024,
                month: 3,
                day: 5
            })
        );
        assert_eq!(
            parse_date("12/31/1999"),
            Some(ParsedDate {
                year: 1999,
                month: 12,
                day: 31
            })
        );
    }

    #[test_case(""; "empty")]
    #[test_case("2024-03-05"; "iso")]
    #[test_case("3/5/24"; "short year")]
    #[test_case("003/5/2024"; "three digit month")]
    #[test_case("0/5/2024"; "zero month")]
    #[test_case("3/0/2024"; "zero day")]
    #[test_case("3/5/0000"; "zero year")]
    #[test_case("March 5, 2024"; "words")]
    fn test_parse_date_rejects(text: &str) {
        assert_eq!(parse_date(text), None);
    }

    #[test]
    fn test_to_date_rejects_impossible_days() {
        assert_eq!(parse_date("13/40/2024").and_then(ParsedDate::to_date), None);
        assert_eq!(parse_date("2/30/2024").and_then(ParsedDate::to_date), None);
        assert_eq!(
            parse_date("2/29/2024").and_then(ParsedDate::to_date),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(
            parse_time("9:00"),
            Some(ParsedTime { hour: 9, minute: 0 })
        );
        assert_eq!(
            parse_time(" 23:59 "),
            Some(ParsedTime {
                hour: 23,
                minute: 59
            })
        );
        assert_eq!(parse_time("09:05"), Some(ParsedTime { hour: 9, minute: 5 }));
    }

    #[test_case(""; "empty")]
    #[test_case("24:00"; "hour out of range")]
    #[test_case("12:60"; "minute out of range")]
    #[test_case("9:5"; "single digit minute")]
    #[test_case("9am"; "meridiem")]
    #[test_case("9:00 PM"; "twelve hour")]
    #[test_case("100:00"; "three digit hour")]
    fn test_parse_time_rejects(text: &str) {
        assert_eq!(parse_time(text), None);
    }

    #[test_case(0, 0 => "12:00 AM")]
    #[test_case(0, 30 => "12:30 AM")]
    #[test_case(9, 0 => "9:00 AM")]
    #[test_case(11, 59 => "11:59 AM")]
    #[test_case(12, 0 => "12:00 PM")]
    #[test_case(12, 30 => "12:30 PM")]
    #[test_case(13, 5 => "1:05 PM")]
    #[test_case(17, 0 => "5:00 PM")]
    #[test_case(23, 59 => "11:59 PM")]
    fn test_to_12h(hour: u32, minute: u32) -> String {
        ParsedTime { hour, minute }.to_12h()
    }

    #[test]
    fn test_to_12h_covers_every_minute() {
        for hour in 0..24 {
            for minute in 0..60 {
                let text = format!("{hour}:{minute:02}");
                let label = parse_time(&text).unwrap().to_12h();
                let (clock, meridiem) = label.split_once(' ').unwrap();
                let (label_hour, label_minute) = clock.split_once(':').unwrap();
                let label_hour: u32 = label_hour.parse().unwrap();
                assert!((1..=12).contains(&label_hour), "{text} -> {label}");
                assert_eq!(label_hour % 12, hour % 12, "{text} -> {label}");
                assert_eq!(label_minute, format!("{minute:02}"));
                assert_eq!(meridiem, if hour >= 12 { "PM" } else { "AM" });
            }
        }
    }
}
