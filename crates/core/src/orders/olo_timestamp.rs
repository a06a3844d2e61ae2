//! Olo's compact `YYYYMMDD HH:MM` timestamp and the time zone it is read in.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use thiserror::Error;

use crate::constants::OLO_TIMESTAMP_FORMAT;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OloTimestampError {
    #[error("expected `YYYYMMDD HH:MM`, got {0:?}")]
    Malformed(String),

    #[error("{0:?} is not a valid calendar date and time")]
    OutOfRange(String),

    #[error("{value} does not exist in time zone {zone}")]
    NonexistentLocalTime { value: String, zone: String },

    #[error("unknown time zone {0:?}")]
    UnknownTimeZone(String),
}

/// A wall-clock reading in Olo's compact format. Carries no offset; use
/// [`OloTimestamp::at`] to pin it to a [`PlatformTimeZone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OloTimestamp(NaiveDateTime);

impl OloTimestamp {
    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Resolves the wall-clock reading to an instant in `zone`.
    pub fn at(&self, zone: &PlatformTimeZone) -> Result<DateTime<FixedOffset>, OloTimestampError> {
        zone.localize(self.0)
    }

    /// The minute containing `instant`, as read on a clock in `zone`.
    pub fn from_instant(instant: DateTime<Utc>, zone: &PlatformTimeZone) -> Self {
        let naive = zone.wall_clock(instant);
        let floored = naive
            .date()
            .and_hms_opt(naive.hour(), naive.minute(), 0)
            .unwrap_or(naive);
        Self(floored)
    }
}

// Callers have already checked every byte is an ASCII digit.
fn digits(part: &str) -> u32 {
    part.bytes()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

impl FromStr for OloTimestamp {
    type Err = OloTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_shaped = bytes.len() == 14
            && bytes.iter().enumerate().all(|(i, b)| match i {
                8 => *b == b' ',
                11 => *b == b':',
                _ => b.is_ascii_digit(),
            });
        if !well_shaped {
            return Err(OloTimestampError::Malformed(s.to_string()));
        }

        let (date_part, time_part) = (&s[..8], &s[9..]);
        let year = digits(&date_part[..4]) as i32;
        let month = digits(&date_part[4..6]);
        let day = digits(&date_part[6..]);
        let hour = digits(&time_part[..2]);
        let minute = digits(&time_part[3..]);

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| OloTimestampError::OutOfRange(s.to_string()))?;
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| OloTimestampError::OutOfRange(s.to_string()))?;
        Ok(Self(date.and_time(time)))
    }
}

impl fmt::Display for OloTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(OLO_TIMESTAMP_FORMAT))
    }
}

/// The zone Olo wall-clock readings are interpreted in.
///
/// Payloads never say which zone they were written in. `Local` assumes the
/// platform's clock matches the deployment's; `Named` pins an IANA zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformTimeZone {
    #[default]
    Local,
    Named(Tz),
}

impl PlatformTimeZone {
    /// Ambiguous readings (DST fall-back) resolve to the earlier instant;
    /// readings inside a DST gap are rejected.
    pub fn localize(&self, naive: NaiveDateTime) -> Result<DateTime<FixedOffset>, OloTimestampError> {
        let resolved = match self {
            PlatformTimeZone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            PlatformTimeZone::Named(tz) => tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
        };
        resolved.ok_or_else(|| OloTimestampError::NonexistentLocalTime {
            value: naive.format(OLO_TIMESTAMP_FORMAT).to_string(),
            zone: self.to_string(),
        })
    }

    pub fn wall_clock(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            PlatformTimeZone::Local => instant.with_timezone(&Local).naive_local(),
            PlatformTimeZone::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }
}

impl FromStr for PlatformTimeZone {
    type Err = OloTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("local") {
            return Ok(PlatformTimeZone::Local);
        }
        trimmed
            .parse::<Tz>()
            .map(PlatformTimeZone::Named)
            .map_err(|_| OloTimestampError::UnknownTimeZone(trimmed.to_string()))
    }
}

impl fmt::Display for PlatformTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformTimeZone::Local => f.write_str("local"),
            PlatformTimeZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_york() -> PlatformTimeZone {
        PlatformTimeZone::Named(chrono_tz::America::New_York)
    }

    #[test]
    fn parses_into_local_wall_clock() {
        let ts: OloTimestamp = "20240315 14:30".parse().unwrap();
        let local = ts.at(&PlatformTimeZone::Local).unwrap();

        let expected = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(local.naive_local(), expected);
    }

    #[test]
    fn rejects_malformed_shapes() {
        for input in [
            "",
            "2024-03-15 14:30",
            "20240315T14:30",
            "20240315 1430",
            "20240315 14:3a",
            "20240315  14:30",
            " 20240315 14:30",
        ] {
            assert_eq!(
                input.parse::<OloTimestamp>(),
                Err(OloTimestampError::Malformed(input.to_string())),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn rejects_impossible_dates_and_times() {
        for input in ["20241315 14:30", "20240230 10:00", "20240315 24:00", "20240315 12:60"] {
            assert!(matches!(
                input.parse::<OloTimestamp>(),
                Err(OloTimestampError::OutOfRange(_))
            ));
        }
    }

    #[test]
    fn named_zone_applies_offset() {
        let ts: OloTimestamp = "20240315 14:30".parse().unwrap();
        let instant = ts.at(&new_york()).unwrap().with_timezone(&Utc);
        assert_eq!(instant.to_rfc3339(), "2024-03-15T18:30:00+00:00");
    }

    #[test]
    fn dst_gap_is_an_error() {
        let ts: OloTimestamp = "20240310 02:30".parse().unwrap();
        assert!(matches!(
            ts.at(&new_york()),
            Err(OloTimestampError::NonexistentLocalTime { .. })
        ));
    }

    #[test]
    fn dst_overlap_picks_earlier_instant() {
        let ts: OloTimestamp = "20241103 01:30".parse().unwrap();
        let instant = ts.at(&new_york()).unwrap().with_timezone(&Utc);
        assert_eq!(instant.to_rfc3339(), "2024-11-03T05:30:00+00:00");
    }

    #[test]
    fn display_uses_platform_format() {
        let ts: OloTimestamp = "20240105 09:07".parse().unwrap();
        assert_eq!(ts.to_string(), "20240105 09:07");
    }

    #[test]
    fn from_instant_floors_to_the_minute() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 59).unwrap();
        let ts = OloTimestamp::from_instant(instant, &new_york());
        assert_eq!(ts.to_string(), "20240315 14:30");
    }

    #[test]
    fn time_zone_setting_parses() {
        assert_eq!("".parse::<PlatformTimeZone>().unwrap(), PlatformTimeZone::Local);
        assert_eq!("Local".parse::<PlatformTimeZone>().unwrap(), PlatformTimeZone::Local);
        assert_eq!("America/New_York".parse::<PlatformTimeZone>().unwrap(), new_york());
        assert_eq!(
            "Mars/Olympus".parse::<PlatformTimeZone>(),
            Err(OloTimestampError::UnknownTimeZone("Mars/Olympus".to_string()))
        );
    }
}
