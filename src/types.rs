use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone};
use chrono_tz::Tz;
use clap::ValueEnum;
use serde::Serialize;
use tracing::warn;

/// One of the seven selectable formatting granularities, used independently
/// for the date side and the time side of a [`Selection`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleToken {
    #[default]
    Default,
    Short,
    Medium,
    Long,
    Full,
    Numeric,
    #[value(name = "2-digit")]
    #[serde(rename = "2-digit")]
    TwoDigit,
}

impl StyleToken {
    pub fn class(self) -> StyleClass {
        match self {
            StyleToken::Default => StyleClass::Default,
            StyleToken::Short => StyleClass::Aggregate(AggregateStyle::Short),
            StyleToken::Medium => StyleClass::Aggregate(AggregateStyle::Medium),
            StyleToken::Long => StyleClass::Aggregate(AggregateStyle::Long),
            StyleToken::Full => StyleClass::Aggregate(AggregateStyle::Full),
            StyleToken::Numeric => StyleClass::Field(FieldStyle::Numeric),
            StyleToken::TwoDigit => StyleClass::Field(FieldStyle::TwoDigit),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StyleToken::Default => "Default",
            StyleToken::Short => "Short",
            StyleToken::Medium => "Medium",
            StyleToken::Long => "Long",
            StyleToken::Full => "Full",
            StyleToken::Numeric => "Numeric",
            StyleToken::TwoDigit => "2-Digit",
        }
    }
}

impl fmt::Display for StyleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-field style, applied to each calendar or clock field individually.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldStyle {
    Numeric,
    #[serde(rename = "2-digit")]
    TwoDigit,
}

/// Named style applied to the whole date or time phrase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregateStyle {
    Short,
    Medium,
    Long,
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleClass {
    Default,
    Aggregate(AggregateStyle),
    Field(FieldStyle),
}

impl StyleClass {
    /// Field-level and aggregate styles cannot be requested together.
    /// `Default` never conflicts.
    pub fn conflicts_with(self, other: StyleClass) -> bool {
        matches!(
            (self, other),
            (StyleClass::Field(_), StyleClass::Aggregate(_))
                | (StyleClass::Aggregate(_), StyleClass::Field(_))
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Date,
    Time,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Date => Side::Time,
            Side::Time => Side::Date,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Date => f.write_str("date"),
            Side::Time => f.write_str("time"),
        }
    }
}

/// The validated pair of date-style and time-style tokens.
///
/// Only [`crate::reconcile::normalize`] produces new selections from user
/// edits, so a field-level token never sits beside an aggregate one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub date: StyleToken,
    pub time: StyleToken,
}

impl Selection {
    #[cfg(test)]
    pub fn new(date: StyleToken, time: StyleToken) -> Self {
        Selection { date, time }
    }

    pub fn get(&self, side: Side) -> StyleToken {
        match side {
            Side::Date => self.date,
            Side::Time => self.time,
        }
    }

    pub(crate) fn set(&mut self, side: Side, token: StyleToken) {
        match side {
            Side::Date => self.date = token,
            Side::Time => self.time = token,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.date.class().conflicts_with(self.time.class())
    }
}

pub const DEFAULT_HOUR: u32 = 16;
pub const DEFAULT_MINUTE: u32 = 30;

/// The host's IANA time zone, or UTC when it cannot be determined.
pub fn system_zone() -> Tz {
    let name = match iana_time_zone::get_timezone() {
        Ok(name) => name,
        Err(e) => {
            warn!("cannot determine the system time zone ({e}), using UTC");
            return Tz::UTC;
        }
    };
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!(zone = %name, "unknown system time zone, using UTC");
        Tz::UTC
    })
}

/// The instant on display, kept as its two independently edited halves plus
/// the zone the wall-clock reading belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointInTime {
    date: NaiveDate,
    time: NaiveTime,
    zone: Tz,
}

impl PointInTime {
    /// A wall-clock reading in UTC.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        PointInTime {
            date,
            time,
            zone: Tz::UTC,
        }
    }

    pub fn with_zone(mut self, zone: Tz) -> Self {
        self.zone = zone;
        self
    }

    /// Today's local date at 16:30 in the system time zone.
    pub fn today() -> Self {
        let time = NaiveTime::from_hms_opt(DEFAULT_HOUR, DEFAULT_MINUTE, 0).unwrap_or_default();
        PointInTime::new(Local::now().date_naive(), time).with_zone(system_zone())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn set_time(&mut self, time: NaiveTime) {
        self.time = time;
    }

    pub fn set_zone(&mut self, zone: Tz) {
        self.zone = zone;
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Offset from UTC in effect at this wall-clock reading. A reading that
    /// falls in a DST gap takes the offset in effect at the same UTC reading;
    /// an ambiguous one takes the earlier offset.
    pub fn utc_offset_seconds(&self) -> i32 {
        let naive = self.naive();
        let offset = match self.zone.from_local_datetime(&naive).earliest() {
            Some(dt) => *dt.offset(),
            None => self.zone.offset_from_utc_datetime(&naive),
        };
        offset.fix().local_minus_utc()
    }
}

impl fmt::Display for PointInTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.naive().format("%Y-%m-%d %H:%M"))
    }
}
