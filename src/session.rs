use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::intl::{self, LocaleDescription, describe_locale};
use crate::reconcile::normalize;
use crate::types::{PointInTime, Selection, Side, StyleToken};

pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";
pub const TIME_INPUT_FORMAT: &str = "%H:%M";

pub fn parse_date(s: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(s, DATE_INPUT_FORMAT).map_err(|_| CommandError::BadDate(s.to_string()))
}

pub fn parse_time(s: &str) -> Result<NaiveTime, CommandError> {
    NaiveTime::parse_from_str(s, TIME_INPUT_FORMAT).map_err(|_| CommandError::BadTime(s.to_string()))
}

pub fn parse_zone(s: &str) -> Result<Tz, CommandError> {
    s.parse::<Tz>().map_err(|_| CommandError::BadZone(s.to_string()))
}

/// One row of the output table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocaleEntry {
    pub locale: String,
    #[serde(flatten)]
    pub description: LocaleDescription,
    pub formatted: String,
}

impl LocaleEntry {
    /// `en-US · English (United States)`
    pub fn label(&self) -> String {
        format!("{} · {}", self.locale, self.description.display_name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),
    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    BadDate(String),
    #[error("invalid time `{0}`, expected HH:MM")]
    BadTime(String),
    #[error("invalid time zone `{0}`, expected an IANA name such as Europe/Paris")]
    BadZone(String),
    #[error("invalid style `{0}`, expected one of: default, short, medium, long, full, numeric, 2-digit")]
    BadStyle(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Date(NaiveDate),
    Time(NaiveTime),
    Zone(Tz),
    Style(Side, StyleToken),
    Show,
    Remarks,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;
        let arg = words.next();
        if let Some(extra) = words.next() {
            return Err(CommandError::UnexpectedArgument(extra.to_string()));
        }

        let need = |label: &'static str| arg.ok_or(CommandError::MissingArgument(label));
        let style = |label: &'static str| -> Result<StyleToken, CommandError> {
            let raw = need(label)?;
            <StyleToken as ValueEnum>::from_str(raw, true).map_err(|_| CommandError::BadStyle(raw.to_string()))
        };

        let bare = |command: Command| match arg {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        };

        match name {
            "date" => Ok(Command::Date(parse_date(need("date")?)?)),
            "time" => Ok(Command::Time(parse_time(need("time")?)?)),
            "zone" => Ok(Command::Zone(parse_zone(need("zone")?)?)),
            "date-style" => Ok(Command::Style(Side::Date, style("date-style")?)),
            "time-style" => Ok(Command::Style(Side::Time, style("time-style")?)),
            "show" => bare(Command::Show),
            "remarks" => bare(Command::Remarks),
            "help" | "?" => bare(Command::Help),
            "quit" | "exit" => bare(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// The user's current choices and the locales they are rendered for.
#[derive(Clone, Debug)]
pub struct Session {
    selection: Selection,
    instant: PointInTime,
    locales: Vec<String>,
}

impl Session {
    pub fn new(instant: PointInTime, locales: Vec<String>) -> Self {
        Session {
            selection: Selection::default(),
            instant,
            locales,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn instant(&self) -> &PointInTime {
        &self.instant
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn set_style(&mut self, side: Side, token: StyleToken) {
        let before = self.selection;
        self.selection = normalize(before, side, token);
        debug_assert!(self.selection.is_valid());
        debug!(%side, %token, ?before, after = ?self.selection, "style changed");
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.instant.set_date(date);
        debug!(instant = %self.instant, "date changed");
    }

    pub fn set_time(&mut self, time: NaiveTime) {
        self.instant.set_time(time);
        debug!(instant = %self.instant, "time changed");
    }

    pub fn set_zone(&mut self, zone: Tz) {
        self.instant.set_zone(zone);
        debug!(%zone, offset = self.instant.utc_offset_seconds(), "time zone changed");
    }

    /// Apply an edit command. Returns `true` when the table needs to be shown
    /// again.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Date(date) => self.set_date(date),
            Command::Time(time) => self.set_time(time),
            Command::Zone(zone) => self.set_zone(zone),
            Command::Style(side, token) => self.set_style(side, token),
            Command::Show => {}
            Command::Remarks | Command::Help | Command::Quit => return false,
        }
        true
    }

    /// Recompute every row from scratch for the current instant and selection.
    pub fn entries(&self) -> intl::Result<Vec<LocaleEntry>> {
        self.locales
            .iter()
            .map(|locale| {
                let description = describe_locale(locale)?;
                let formatted = intl::format(locale, &self.instant, self.selection)?;
                Ok(LocaleEntry {
                    locale: locale.clone(),
                    description,
                    formatted,
                })
            })
            .collect()
    }
}
