//! SQL interval values
//!
//! The engine has two interval families: year-month intervals are an exact
//! count of months, day-time intervals are an exact count of seconds plus a
//! nanosecond fraction. Both render and parse the SQL literal forms, e.g.
//! `2-6` and `3 04:05:06.5`.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;

use crate::constants::SqlType;
use crate::error::{Error, Result};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Year-month interval, stored as a signed number of months
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IntervalYearMonth {
    months: i64,
}

impl IntervalYearMonth {
    /// Create an interval of `years` and `months`; both carry their own sign.
    ///
    /// Fails with [`Error::NumericOutOfRange`] when the month count does not
    /// fit an `i64`.
    pub fn new(years: i64, months: i64) -> Result<Self> {
        years
            .checked_mul(12)
            .and_then(|m| m.checked_add(months))
            .map(Self::from_months)
            .ok_or_else(|| Error::NumericOutOfRange {
                target: SqlType::IntervalYearToMonth,
                value: format!("{} years {} months", years, months),
            })
    }

    /// Create an interval from a total month count
    pub fn from_months(months: i64) -> Self {
        Self { months }
    }

    /// Whole years
    pub fn years(&self) -> i64 {
        self.months / 12
    }

    /// Months beyond the whole years
    pub fn months(&self) -> i64 {
        self.months % 12
    }

    /// Total month count
    pub fn total_months(&self) -> i64 {
        self.months
    }
}

impl fmt::Display for IntervalYearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.months < 0 { "-" } else { "" };
        let abs = self.months.unsigned_abs();
        write!(f, "{}{}-{}", sign, abs / 12, abs % 12)
    }
}

impl FromStr for IntervalYearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidFormat {
            target: SqlType::IntervalYearToMonth,
            value: s.to_string(),
        };

        let (negative, body) = split_sign(s.trim());
        let (years, months) = body.split_once('-').ok_or_else(invalid)?;
        let years: i64 = years.parse().map_err(|_| invalid())?;
        let months: i64 = months.parse().map_err(|_| invalid())?;
        if !(0..12).contains(&months) {
            return Err(invalid());
        }

        let total = years
            .checked_mul(12)
            .and_then(|m| m.checked_add(months))
            .ok_or_else(invalid)?;
        Ok(Self::from_months(if negative { -total } else { total }))
    }
}

/// Day-time interval, stored as signed seconds plus a nanosecond fraction
/// carrying the same sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IntervalDaySecond {
    seconds: i64,
    nanos: i32,
}

impl IntervalDaySecond {
    /// Create an interval; `nanos` is normalised into `seconds`
    pub fn new(seconds: i64, nanos: i64) -> Self {
        let total = seconds as i128 * NANOS_PER_SECOND as i128 + nanos as i128;
        Self {
            seconds: (total / NANOS_PER_SECOND as i128) as i64,
            nanos: (total % NANOS_PER_SECOND as i128) as i32,
        }
    }

    /// Create an interval of whole seconds
    pub fn from_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// Create an interval from a `chrono` duration
    pub fn from_duration(duration: TimeDelta) -> Self {
        Self::new(duration.num_seconds(), duration.subsec_nanos() as i64)
    }

    /// Convert to a `chrono` duration; `None` beyond the range `TimeDelta`
    /// can hold
    pub fn to_duration(&self) -> Option<TimeDelta> {
        TimeDelta::try_seconds(self.seconds)?.checked_add(&TimeDelta::nanoseconds(self.nanos as i64))
    }

    /// Whole days
    pub fn days(&self) -> i64 {
        self.seconds / 86_400
    }

    /// Hours beyond the whole days
    pub fn hours(&self) -> i64 {
        (self.seconds % 86_400) / 3_600
    }

    /// Minutes beyond the whole hours
    pub fn minutes(&self) -> i64 {
        (self.seconds % 3_600) / 60
    }

    /// Seconds beyond the whole minutes
    pub fn seconds(&self) -> i64 {
        self.seconds % 60
    }

    /// Total whole seconds
    pub fn total_seconds(&self) -> i64 {
        self.seconds
    }

    /// Nanosecond fraction
    pub fn nanos(&self) -> i32 {
        self.nanos
    }

    fn is_negative(&self) -> bool {
        self.seconds < 0 || self.nanos < 0
    }
}

impl fmt::Display for IntervalDaySecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let secs = self.seconds.unsigned_abs();
        write!(
            f,
            "{}{} {:02}:{:02}:{:02}",
            sign,
            secs / 86_400,
            (secs % 86_400) / 3_600,
            (secs % 3_600) / 60,
            secs % 60
        )?;
        let nanos = self.nanos.unsigned_abs();
        if nanos > 0 {
            let fraction = format!("{:09}", nanos);
            write!(f, ".{}", fraction.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

impl FromStr for IntervalDaySecond {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidFormat {
            target: SqlType::IntervalDayToSecond,
            value: s.to_string(),
        };

        let (negative, body) = split_sign(s.trim());
        let (days, clock) = match body.split_once(' ') {
            Some((d, rest)) => (d.parse::<i64>().map_err(|_| invalid())?, rest.trim()),
            None => (0, body),
        };

        let (clock, fraction) = match clock.split_once('.') {
            Some((c, frac)) => (c, Some(frac)),
            None => (clock, None),
        };

        let mut parts = clock.split(':');
        let mut next = |max: i64| -> Result<i64> {
            let v: i64 = parts
                .next()
                .ok_or_else(invalid)?
                .parse()
                .map_err(|_| invalid())?;
            if !(0..max).contains(&v) {
                return Err(invalid());
            }
            Ok(v)
        };
        let hours = next(24)?;
        let minutes = next(60)?;
        let seconds = next(60)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        let nanos = match fraction {
            Some(frac) if !frac.is_empty() && frac.len() <= 9 && frac.bytes().all(|b| b.is_ascii_digit()) => {
                format!("{:0<9}", frac).parse::<i64>().map_err(|_| invalid())?
            }
            Some(_) => return Err(invalid()),
            None => 0,
        };

        let seconds = days
            .checked_mul(86_400)
            .and_then(|s| s.checked_add(hours * 3_600 + minutes * 60 + seconds))
            .ok_or_else(invalid)?;
        Ok(if negative {
            Self::new(-seconds, -nanos)
        } else {
            Self::new(seconds, nanos)
        })
    }
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_month_parts() {
        let iv = IntervalYearMonth::new(2, 6).unwrap();
        assert_eq!(iv.total_months(), 30);
        assert_eq!(iv.years(), 2);
        assert_eq!(iv.months(), 6);
        assert_eq!(iv.to_string(), "2-6");
    }

    #[test]
    fn test_year_month_parse() {
        assert_eq!("2-6".parse::<IntervalYearMonth>().unwrap().total_months(), 30);
        assert_eq!("-1-3".parse::<IntervalYearMonth>().unwrap().total_months(), -15);
        assert_eq!(IntervalYearMonth::from_months(-15).to_string(), "-1-3");
        assert!("1-12".parse::<IntervalYearMonth>().is_err());
        assert!("abc".parse::<IntervalYearMonth>().is_err());
    }

    #[test]
    fn test_day_second_display() {
        let iv = IntervalDaySecond::new(3 * 86_400 + 4 * 3_600 + 5 * 60 + 6, 500_000_000);
        assert_eq!(iv.to_string(), "3 04:05:06.5");
        assert_eq!(iv.days(), 3);
        assert_eq!(iv.hours(), 4);
        assert_eq!(iv.minutes(), 5);
        assert_eq!(iv.seconds(), 6);
        assert_eq!(IntervalDaySecond::from_seconds(60).to_string(), "0 00:01:00");
    }

    #[test]
    fn test_day_second_parse() {
        let iv: IntervalDaySecond = "3 04:05:06.5".parse().unwrap();
        assert_eq!(iv.total_seconds(), 273_906);
        assert_eq!(iv.nanos(), 500_000_000);

        let neg: IntervalDaySecond = "-0 00:00:01.25".parse().unwrap();
        assert_eq!(neg.total_seconds(), -1);
        assert_eq!(neg.nanos(), -250_000_000);
        assert_eq!(neg.to_string(), "-0 00:00:01.25");

        let clock_only: IntervalDaySecond = "01:00:00".parse().unwrap();
        assert_eq!(clock_only.total_seconds(), 3_600);

        assert!("1 25:00:00".parse::<IntervalDaySecond>().is_err());
        assert!("1 00:00".parse::<IntervalDaySecond>().is_err());
        assert!("1 00:00:00.x".parse::<IntervalDaySecond>().is_err());
    }

    #[test]
    fn test_day_second_duration() {
        let iv = IntervalDaySecond::from_duration(TimeDelta::milliseconds(1_500));
        assert_eq!(iv.total_seconds(), 1);
        assert_eq!(iv.nanos(), 500_000_000);
        assert_eq!(iv.to_duration(), Some(TimeDelta::milliseconds(1_500)));
        assert_eq!(IntervalDaySecond::from_seconds(i64::MAX).to_duration(), None);
    }

    #[test]
    fn test_year_month_overflow() {
        assert!(matches!(
            IntervalYearMonth::new(i64::MAX / 6, 0),
            Err(Error::NumericOutOfRange { .. })
        ));
        assert!(matches!(
            IntervalYearMonth::new(i64::MAX / 12, 12),
            Err(Error::NumericOutOfRange { .. })
        ));
        assert!(matches!(
            "900000000000000000-0".parse::<IntervalYearMonth>(),
            Err(Error::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_day_second_overflow() {
        assert!(matches!(
            "900000000000000000 00:00:00".parse::<IntervalDaySecond>(),
            Err(Error::InvalidFormat { .. })
        ));
        assert!(matches!(
            "-900000000000000000 23:59:59".parse::<IntervalDaySecond>(),
            Err(Error::InvalidFormat { .. })
        ));
    }
}
