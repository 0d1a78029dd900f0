//! Time-of-day with a UTC offset (`TIME WITH TIME ZONE`)

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, NaiveTime, TimeDelta, Timelike};

use crate::constants::SqlType;
use crate::error::{Error, Result};

/// A wall-clock time paired with the offset it was recorded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetTime {
    time: NaiveTime,
    offset: FixedOffset,
}

impl OffsetTime {
    /// Create a time in the given offset
    pub fn new(time: NaiveTime, offset: FixedOffset) -> Self {
        Self { time, offset }
    }

    /// Local wall-clock time
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Offset from UTC
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The same instant expressed as UTC wall-clock time
    pub fn to_utc(&self) -> NaiveTime {
        self.time - TimeDelta::seconds(self.offset.local_minus_utc() as i64)
    }

    /// The same instant expressed in another offset
    pub fn with_offset(&self, offset: FixedOffset) -> Self {
        Self {
            time: self.to_utc() + TimeDelta::seconds(offset.local_minus_utc() as i64),
            offset,
        }
    }
}

impl fmt::Display for OffsetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time.format("%H:%M:%S"))?;
        if self.time.nanosecond() > 0 {
            write!(f, "{}", self.time.format("%.f"))?;
        }
        write!(f, "{}", self.offset)
    }
}

impl FromStr for OffsetTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidFormat {
            target: SqlType::TimeWithTimeZone,
            value: s.to_string(),
        };

        let s = s.trim();
        let split = s.rfind(['+', '-']).ok_or_else(invalid)?;
        let (time, offset) = s.split_at(split);
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M:%S%.f").map_err(|_| invalid())?;
        let offset = parse_offset(offset).ok_or_else(invalid)?;
        Ok(Self::new(time, offset))
    }
}

/// Parse an offset of the form `+hh:mm`, `-hh:mm` or `+hh`
pub(crate) fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, body) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = match body.split_once(':') {
        Some((h, m)) => (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?),
        None => (body.parse::<i32>().ok()?, 0),
    };
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3_600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3_600).unwrap()
    }

    #[test]
    fn test_offset_time_display() {
        let t = OffsetTime::new(NaiveTime::from_hms_opt(10, 30, 0).unwrap(), offset(2));
        assert_eq!(t.to_string(), "10:30:00+02:00");

        let frac = OffsetTime::new(
            NaiveTime::from_hms_milli_opt(1, 2, 3, 500).unwrap(),
            offset(-5),
        );
        assert_eq!(frac.to_string(), "01:02:03.500-05:00");
    }

    #[test]
    fn test_offset_time_parse() {
        let t: OffsetTime = "10:30:00+02:00".parse().unwrap();
        assert_eq!(t.time(), NaiveTime::from_hms_opt(10, 30, 0).unwrap());
        assert_eq!(t.offset(), offset(2));

        let neg: OffsetTime = "23:59:59.25-03:30".parse().unwrap();
        assert_eq!(neg.offset().local_minus_utc(), -(3 * 3_600 + 30 * 60));

        assert!("10:30:00".parse::<OffsetTime>().is_err());
        assert!("25:00:00+01:00".parse::<OffsetTime>().is_err());
    }

    #[test]
    fn test_offset_time_shift() {
        let t = OffsetTime::new(NaiveTime::from_hms_opt(1, 0, 0).unwrap(), offset(2));
        assert_eq!(t.to_utc(), NaiveTime::from_hms_opt(23, 0, 0).unwrap());

        let shifted = t.with_offset(offset(-1));
        assert_eq!(shifted.time(), NaiveTime::from_hms_opt(22, 0, 0).unwrap());
        assert_eq!(shifted.offset(), offset(-1));
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("+05:30").unwrap().local_minus_utc(), 19_800);
        assert_eq!(parse_offset("-08").unwrap().local_minus_utc(), -28_800);
        assert!(parse_offset("05:00").is_none());
        assert!(parse_offset("+15:00").is_none());
    }
}
