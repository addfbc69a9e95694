//! Departure times.
//!
//! Schedules list departures as "HH:MM" strings with no date attached; the
//! applicable dates come from the schedule's weekday set and validity window.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: &'static str,
}

impl TimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A departure time of day, minute precision.
///
/// # Examples
///
/// ```
/// use transit_server::domain::DepartureTime;
///
/// let t = DepartureTime::parse_hhmm("06:45").unwrap();
/// assert_eq!(t.to_string(), "06:45");
///
/// assert!(DepartureTime::parse_hhmm("6:45").is_err());
/// assert!(DepartureTime::parse_hhmm("24:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DepartureTime(NaiveTime);

impl DepartureTime {
    /// Parse a time from "HH:MM" format.
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        // Must be exactly 5 characters: HH:MM
        if s.len() != 5 {
            return Err(TimeError::new(s, "expected HH:MM format"));
        }

        let bytes = s.as_bytes();

        if bytes[2] != b':' {
            return Err(TimeError::new(s, "expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new(s, "invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new(s, "hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new(s, "invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new(s, "minute must be 0-59"));
        }

        let time =
            NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new(s, "invalid time"))?;

        Ok(Self(time))
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

impl TryFrom<String> for DepartureTime {
    type Error = TimeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_hhmm(&s)
    }
}

impl From<DepartureTime> for String {
    fn from(t: DepartureTime) -> Self {
        t.to_string()
    }
}

impl fmt::Debug for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DepartureTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        let t = DepartureTime::parse_hhmm("00:00").unwrap();
        assert_eq!((t.hour(), t.minute()), (0, 0));

        let t = DepartureTime::parse_hhmm("23:59").unwrap();
        assert_eq!((t.hour(), t.minute()), (23, 59));

        let t = DepartureTime::parse_hhmm("06:05").unwrap();
        assert_eq!((t.hour(), t.minute()), (6, 5));
    }

    #[test]
    fn parse_invalid_format() {
        // Wrong length
        assert!(DepartureTime::parse_hhmm("0630").is_err());
        assert!(DepartureTime::parse_hhmm("6:30").is_err());
        assert!(DepartureTime::parse_hhmm("06:300").is_err());

        // Missing colon
        assert!(DepartureTime::parse_hhmm("06-30").is_err());
        assert!(DepartureTime::parse_hhmm("06.30").is_err());

        // Non-digits
        assert!(DepartureTime::parse_hhmm("ab:cd").is_err());
        assert!(DepartureTime::parse_hhmm("0a:30").is_err());
    }

    #[test]
    fn parse_out_of_range() {
        assert!(DepartureTime::parse_hhmm("24:00").is_err());
        assert!(DepartureTime::parse_hhmm("12:60").is_err());
        assert!(DepartureTime::parse_hhmm("99:99").is_err());
    }

    #[test]
    fn error_names_the_input() {
        let err = DepartureTime::parse_hhmm("25:00").unwrap_err();
        assert_eq!(err.to_string(), "invalid time \"25:00\": hour must be 0-23");
    }

    #[test]
    fn ordering_is_chronological() {
        let early = DepartureTime::parse_hhmm("05:30").unwrap();
        let late = DepartureTime::parse_hhmm("22:15").unwrap();
        assert!(early < late);
    }

    #[test]
    fn serde_uses_hhmm_string() {
        let t = DepartureTime::parse_hhmm("07:05").unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"07:05\"");

        let back: DepartureTime = serde_json::from_str("\"07:05\"").unwrap();
        assert_eq!(back, t);

        assert!(serde_json::from_str::<DepartureTime>("\"7:05\"").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every valid HH:MM string parses and displays back unchanged
        #[test]
        fn display_roundtrip(h in 0u32..24, m in 0u32..60) {
            let s = format!("{h:02}:{m:02}");
            let t = DepartureTime::parse_hhmm(&s).unwrap();
            prop_assert_eq!(t.to_string(), s);
            prop_assert_eq!((t.hour(), t.minute()), (h, m));
        }

        /// Ordering agrees with minutes from midnight
        #[test]
        fn ordering_matches_minutes(a in 0u32..1440, b in 0u32..1440) {
            let ta = DepartureTime::parse_hhmm(&format!("{:02}:{:02}", a / 60, a % 60)).unwrap();
            let tb = DepartureTime::parse_hhmm(&format!("{:02}:{:02}", b / 60, b % 60)).unwrap();
            prop_assert_eq!(ta.cmp(&tb), a.cmp(&b));
        }

        /// Hours past 23 are always rejected
        #[test]
        fn hour_overflow_rejected(h in 24u32..100, m in 0u32..60) {
            let text = format!("{h:02}:{m:02}");
            prop_assert!(DepartureTime::parse_hhmm(&text).is_err());
        }
    }
}
