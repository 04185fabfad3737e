//! TTL Module
//!
//! Normalizes the accepted TTL shapes (integer seconds, calendar intervals,
//! or the configured default) into a number of seconds.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Months, TimeDelta, Utc};

use crate::error::{CacheError, Result};

// == Interval ==
/// A calendar-relative interval, resolved against the wall clock.
///
/// Years and months follow calendar arithmetic, so `P1M` is 28 to 31 days
/// depending on when it is resolved. Parses from ISO-8601 durations such as
/// `PT2S`, `P1DT12H` or `P2W`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interval {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Counts backwards from now instead of forwards
    pub invert: bool,
}

impl Interval {
    pub fn seconds(seconds: u32) -> Self {
        Self {
            seconds,
            ..Self::default()
        }
    }

    pub fn minutes(minutes: u32) -> Self {
        Self {
            minutes,
            ..Self::default()
        }
    }

    pub fn days(days: u32) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    pub fn months(months: u32) -> Self {
        Self {
            months,
            ..Self::default()
        }
    }

    pub fn with_years(mut self, years: u32) -> Self {
        self.years = years;
        self
    }

    pub fn with_months(mut self, months: u32) -> Self {
        self.months = months;
        self
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    pub fn with_hours(mut self, hours: u32) -> Self {
        self.hours = hours;
        self
    }

    pub fn with_minutes(mut self, minutes: u32) -> Self {
        self.minutes = minutes;
        self
    }

    pub fn with_seconds(mut self, seconds: u32) -> Self {
        self.seconds = seconds;
        self
    }

    /// Flips the direction of the interval.
    pub fn inverted(mut self) -> Self {
        self.invert = !self.invert;
        self
    }

    // == Apply ==
    /// Returns the instant reached by adding this interval to `now`.
    pub fn apply(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let overflow = || CacheError::InvalidTtl(format!("Interval {} is out of range", self));

        let months = self
            .years
            .checked_mul(12)
            .and_then(|m| m.checked_add(self.months))
            .ok_or_else(overflow)?;
        let delta = TimeDelta::try_days(i64::from(self.days))
            .and_then(|d| d.checked_add(&TimeDelta::try_hours(i64::from(self.hours))?))
            .and_then(|d| d.checked_add(&TimeDelta::try_minutes(i64::from(self.minutes))?))
            .and_then(|d| d.checked_add(&TimeDelta::try_seconds(i64::from(self.seconds))?))
            .ok_or_else(overflow)?;

        let target = if self.invert {
            now.checked_sub_months(Months::new(months))
                .and_then(|t| t.checked_sub_signed(delta))
        } else {
            now.checked_add_months(Months::new(months))
                .and_then(|t| t.checked_add_signed(delta))
        };
        target.ok_or_else(overflow)
    }

    // == Seconds From ==
    /// Number of whole seconds between `now` and `now + self`.
    pub fn seconds_from(&self, now: DateTime<Utc>) -> Result<i64> {
        Ok((self.apply(now)? - now).num_seconds())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invert {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        for (value, unit) in [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')] {
            if value > 0 {
                write!(f, "{}{}", value, unit)?;
            }
        }
        let time = [(self.hours, 'H'), (self.minutes, 'M'), (self.seconds, 'S')];
        if time.iter().any(|(value, _)| *value > 0) {
            f.write_str("T")?;
            for (value, unit) in time {
                if value > 0 {
                    write!(f, "{}{}", value, unit)?;
                }
            }
        } else if self.years == 0 && self.months == 0 && self.days == 0 {
            f.write_str("T0S")?;
        }
        Ok(())
    }
}

impl FromStr for Interval {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CacheError::InvalidTtl(format!("Malformed interval '{}'", s));

        let (invert, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let rest = rest.strip_prefix('P').ok_or_else(invalid)?;
        let (date, time) = match rest.split_once('T') {
            Some((_, "")) => return Err(invalid()),
            Some((date, time)) => (date, time),
            None => (rest, ""),
        };

        let date = designated_values(date, &['Y', 'M', 'W', 'D']).ok_or_else(invalid)?;
        let time = designated_values(time, &['H', 'M', 'S']).ok_or_else(invalid)?;
        if date.is_empty() && time.is_empty() {
            return Err(invalid());
        }

        let mut interval = Interval {
            invert,
            ..Interval::default()
        };
        for (unit, value) in date {
            match unit {
                'Y' => interval.years = value,
                'M' => interval.months = value,
                'W' | 'D' => {
                    let days = if unit == 'W' {
                        value.checked_mul(7).ok_or_else(invalid)?
                    } else {
                        value
                    };
                    interval.days = interval.days.checked_add(days).ok_or_else(invalid)?;
                }
                _ => return Err(invalid()),
            }
        }
        for (unit, value) in time {
            match unit {
                'H' => interval.hours = value,
                'M' => interval.minutes = value,
                'S' => interval.seconds = value,
                _ => return Err(invalid()),
            }
        }
        Ok(interval)
    }
}

/// Splits `10D2H`-style runs into (designator, value) pairs.
///
/// Designators must appear at most once and in the order given by `units`.
fn designated_values(part: &str, units: &[char]) -> Option<Vec<(char, u32)>> {
    let mut values = Vec::new();
    let mut digits = String::new();
    let mut next_unit = 0;

    for c in part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            return None;
        }
        let position = units[next_unit..].iter().position(|u| *u == c)? + next_unit;
        values.push((c, digits.parse().ok()?));
        digits.clear();
        next_unit = position + 1;
    }

    if digits.is_empty() {
        Some(values)
    } else {
        None
    }
}

// == TTL ==
/// Time-to-live accepted by write operations.
///
/// Passing no TTL at all (`None` at the call site) selects the configured
/// default of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Absolute number of seconds; zero or negative means "do not keep"
    Seconds(i64),
    /// Calendar interval resolved against the current time
    Interval(Interval),
}

impl Ttl {
    /// Resolves the TTL to seconds against the current wall-clock time.
    pub fn resolve(&self) -> Result<i64> {
        self.resolve_at(Utc::now())
    }

    /// Resolves the TTL to seconds against a fixed point in time.
    pub fn resolve_at(&self, now: DateTime<Utc>) -> Result<i64> {
        match self {
            Ttl::Seconds(seconds) => Ok(*seconds),
            Ttl::Interval(interval) => interval.seconds_from(now),
        }
    }
}

// == Resolve TTL ==
/// Effective TTL in seconds, falling back to `default_ttl` when none is given.
pub fn resolve_ttl(ttl: Option<&Ttl>, default_ttl: i64) -> Result<i64> {
    match ttl {
        Some(ttl) => ttl.resolve(),
        None => Ok(default_ttl),
    }
}

impl From<i64> for Ttl {
    fn from(seconds: i64) -> Self {
        Ttl::Seconds(seconds)
    }
}

impl From<i32> for Ttl {
    fn from(seconds: i32) -> Self {
        Ttl::Seconds(i64::from(seconds))
    }
}

impl From<u64> for Ttl {
    fn from(seconds: u64) -> Self {
        Ttl::Seconds(i64::try_from(seconds).unwrap_or(i64::MAX))
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Ttl::from(duration.as_secs())
    }
}

impl From<Interval> for Ttl {
    fn from(interval: Interval) -> Self {
        Ttl::Interval(interval)
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Seconds(seconds) => write!(f, "{}", seconds),
            Ttl::Interval(interval) => write!(f, "{}", interval),
        }
    }
}

impl FromStr for Ttl {
    type Err = CacheError;

    /// Parses a strict decimal integer or an ISO-8601 interval.
    ///
    /// Anything that only looks like a number after trimming or coercion
    /// (`" 1"`, `"12foo"`, `"025"`, `"2.5"`) is rejected.
    fn from_str(s: &str) -> Result<Self> {
        if s.starts_with('P') || s.starts_with("-P") {
            return s.parse().map(Ttl::Interval);
        }

        let digits = s.strip_prefix('-').unwrap_or(s);
        let well_formed = !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && (digits == "0" || !digits.starts_with('0'));
        if !well_formed {
            return Err(CacheError::InvalidTtl(format!("Malformed TTL '{}'", s)));
        }

        s.parse::<i64>()
            .map(Ttl::Seconds)
            .map_err(|_| CacheError::InvalidTtl(format!("TTL '{}' is out of range", s)))
    }
}
