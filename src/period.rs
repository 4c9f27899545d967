//! ISO-8601 period strings.
//!
//! Timeout-style configuration values are written as ISO-8601 periods
//! ("PT5M", "P1DT2H30M"). A [`Period`] wraps the parsed value as a
//! [`std::time::Duration`] and re-emits the canonical ISO form on display.
//! Parsing is pure string manipulation, no locale or calendar lookups.
//!
//! Year and month designators are rejected: they have no fixed length in
//! seconds, and every timeout this crate carries is expressible without
//! them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * 60;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;
const SECS_PER_WEEK: u64 = 7 * SECS_PER_DAY;

/// A fixed-length span of time parsed from an ISO-8601 period string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(Duration);

impl Period {
    /// Period of exactly `secs` seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    /// Period of exactly `minutes` minutes.
    pub const fn from_minutes(minutes: u64) -> Self {
        Self(Duration::from_secs(minutes * SECS_PER_MINUTE))
    }

    /// The wrapped duration, for handing to timers and lock acquisition.
    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl From<Period> for Duration {
    fn from(period: Period) -> Self {
        period.0
    }
}

/// Why a period string failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodParseError {
    reason: String,
}

impl PeriodParseError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for PeriodParseError {}

impl FromStr for Period {
    type Err = PeriodParseError;

    /// Parses `PnW`, `PnD`, `PTnHnMnS`, and combined date-time forms such
    /// as `P1DT2H30M`. Designators may be lowercase. At least one component
    /// must be present; `Y` and `M` in the date part are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let body = upper
            .strip_prefix('P')
            .ok_or_else(|| PeriodParseError::new("period must start with 'P'"))?;
        if body.is_empty() {
            return Err(PeriodParseError::new("period has no components"));
        }

        let (date_part, time_part) = match body.split_once('T') {
            Some((date, time)) => {
                if time.is_empty() {
                    return Err(PeriodParseError::new("'T' must be followed by a time component"));
                }
                (date, Some(time))
            }
            None => (body, None),
        };

        let mut total_secs: u64 = 0;
        let mut saw_component = false;

        for (value, designator) in components(date_part)? {
            let secs_per_unit = match designator {
                'W' => SECS_PER_WEEK,
                'D' => SECS_PER_DAY,
                'Y' | 'M' => {
                    return Err(PeriodParseError::new(format!(
                        "'{designator}' periods have no fixed length; use weeks or smaller"
                    )));
                }
                other => {
                    return Err(PeriodParseError::new(format!(
                        "unknown date designator '{other}'"
                    )));
                }
            };
            total_secs = add_component(total_secs, value, secs_per_unit)?;
            saw_component = true;
        }

        if let Some(time_part) = time_part {
            for (value, designator) in components(time_part)? {
                let secs_per_unit = match designator {
                    'H' => SECS_PER_HOUR,
                    'M' => SECS_PER_MINUTE,
                    'S' => 1,
                    other => {
                        return Err(PeriodParseError::new(format!(
                            "unknown time designator '{other}'"
                        )));
                    }
                };
                total_secs = add_component(total_secs, value, secs_per_unit)?;
                saw_component = true;
            }
        }

        if !saw_component {
            return Err(PeriodParseError::new("period has no components"));
        }

        Ok(Period(Duration::from_secs(total_secs)))
    }
}

/// Split a period part into `(value, designator)` pairs.
fn components(part: &str) -> Result<Vec<(u64, char)>, PeriodParseError> {
    let mut out = Vec::new();
    let mut digits = String::new();

    for c in part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if c.is_ascii_alphabetic() {
            if digits.is_empty() {
                return Err(PeriodParseError::new(format!(
                    "designator '{c}' has no value"
                )));
            }
            let value = digits
                .parse::<u64>()
                .map_err(|_| PeriodParseError::new(format!("value '{digits}' out of range")))?;
            out.push((value, c));
            digits.clear();
        } else {
            return Err(PeriodParseError::new(format!(
                "unexpected character '{c}' in period"
            )));
        }
    }

    if !digits.is_empty() {
        return Err(PeriodParseError::new(format!(
            "trailing value '{digits}' has no designator"
        )));
    }

    Ok(out)
}

fn add_component(total: u64, value: u64, secs_per_unit: u64) -> Result<u64, PeriodParseError> {
    value
        .checked_mul(secs_per_unit)
        .and_then(|secs| total.checked_add(secs))
        .ok_or_else(|| PeriodParseError::new("period overflows"))
}

impl fmt::Display for Period {
    /// Canonical ISO form: largest units first, `PT0S` for zero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut secs = self.0.as_secs();
        if secs == 0 {
            return write!(f, "PT0S");
        }

        let days = secs / SECS_PER_DAY;
        secs %= SECS_PER_DAY;
        let hours = secs / SECS_PER_HOUR;
        secs %= SECS_PER_HOUR;
        let minutes = secs / SECS_PER_MINUTE;
        secs %= SECS_PER_MINUTE;

        write!(f, "P")?;
        if days > 0 {
            write!(f, "{days}D")?;
        }
        if hours > 0 || minutes > 0 || secs > 0 {
            write!(f, "T")?;
            if hours > 0 {
                write!(f, "{hours}H")?;
            }
            if minutes > 0 {
                write!(f, "{minutes}M")?;
            }
            if secs > 0 {
                write!(f, "{secs}S")?;
            }
        }
        Ok(())
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
