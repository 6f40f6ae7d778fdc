use chrono::{Datelike, Timelike};
use icu::calendar::{Gregorian, Iso};
use icu::datetime::fieldsets::zone::{SpecificLong, SpecificShort};
use icu::datetime::fieldsets::{T, YMD, YMDE, YMDET, YMDT};
use icu::datetime::input::{Date, DateTime, Time, ZonedDateTime};
use icu::datetime::options::{Alignment, Length, TimePrecision, YearStyle};
use icu::datetime::{DateTimeFormatter, FixedCalendarDateTimeFormatter, NoCalendarFormatter};
use icu::locale::Locale as IcuLocale;
use icu::time::TimeZoneInfo;
use icu::time::zone::models::AtTime;
use icu::time::zone::{IanaParser, UtcOffset};
use tracing::trace;

use super::{IntlError, Result, parse_locale};
use crate::reconcile::{FormatRequest, build_request};
use crate::types::{AggregateStyle, FieldStyle, PointInTime, Selection};

/// Format `instant` for `locale` the way `selection` asks.
pub fn format(locale: &str, instant: &PointInTime, selection: Selection) -> Result<String> {
    let request = build_request(selection);
    format_request(locale, instant, &request)
}

fn format_request(locale: &str, instant: &PointInTime, request: &FormatRequest) -> Result<String> {
    let icu_locale = parse_locale(locale)?;
    let shape = Shape::for_request(request);
    let out = render(shape, &icu_locale, instant)?;
    trace!(locale, ?shape, %instant, formatted = %out, "formatted");
    Ok(out)
}

// ICU builds patterns from field sets plus a handful of options, rather than
// from per-field widths, so a request is first reduced to one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Date {
        length: Length,
        year_style: YearStyle,
        alignment: Alignment,
    },
    /// Date with weekday, used for the `full` date style.
    DateWithWeekday,
    Time {
        length: Length,
        precision: TimePrecision,
        alignment: Alignment,
        zone: Option<ZoneName>,
    },
    DateTime {
        length: Length,
        year_style: YearStyle,
        alignment: Alignment,
        precision: TimePrecision,
        zone: Option<ZoneName>,
    },
    DateWithWeekdayTime {
        precision: TimePrecision,
        zone: Option<ZoneName>,
    },
}

/// Specific (standard or daylight) zone name appended to the time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ZoneName {
    /// `PST`, or `GMT+1` where the locale has no abbreviation.
    Short,
    /// `Pacific Standard Time`
    Long,
}

fn style_length(style: AggregateStyle) -> Length {
    match style {
        AggregateStyle::Short => Length::Short,
        AggregateStyle::Medium => Length::Medium,
        AggregateStyle::Long | AggregateStyle::Full => Length::Long,
    }
}

fn style_precision(style: AggregateStyle) -> TimePrecision {
    match style {
        AggregateStyle::Short => TimePrecision::Minute,
        AggregateStyle::Medium | AggregateStyle::Long | AggregateStyle::Full => {
            TimePrecision::Second
        }
    }
}

fn style_zone(style: AggregateStyle) -> Option<ZoneName> {
    match style {
        AggregateStyle::Short | AggregateStyle::Medium => None,
        AggregateStyle::Long => Some(ZoneName::Short),
        AggregateStyle::Full => Some(ZoneName::Long),
    }
}

fn padded(field: Option<FieldStyle>) -> bool {
    field == Some(FieldStyle::TwoDigit)
}

fn alignment(pad: bool) -> Alignment {
    if pad { Alignment::Column } else { Alignment::Auto }
}

impl Shape {
    fn for_request(req: &FormatRequest) -> Shape {
        if req.is_aggregate() {
            return Shape::for_styles(req.date_style, req.time_style);
        }

        let year_style = if padded(req.year) {
            YearStyle::Auto
        } else {
            YearStyle::Full
        };
        let date_pad = padded(req.month) || padded(req.day);
        let time_pad = padded(req.hour);
        let precision = if req.second.is_some() {
            TimePrecision::Second
        } else if req.minute.is_some() {
            TimePrecision::Minute
        } else {
            TimePrecision::Hour
        };

        match (req.has_date_fields(), req.has_time_fields()) {
            (true, true) => Shape::DateTime {
                length: Length::Short,
                year_style,
                alignment: alignment(date_pad || time_pad),
                precision,
                zone: None,
            },
            (false, true) => Shape::Time {
                length: Length::Short,
                precision,
                alignment: alignment(time_pad),
                zone: None,
            },
            // An empty bag formats as a numeric date.
            (true, false) | (false, false) => Shape::Date {
                length: Length::Short,
                year_style,
                alignment: alignment(date_pad),
            },
        }
    }

    fn for_styles(date: Option<AggregateStyle>, time: Option<AggregateStyle>) -> Shape {
        match (date, time) {
            (Some(AggregateStyle::Full), Some(t)) => Shape::DateWithWeekdayTime {
                precision: style_precision(t),
                zone: style_zone(t),
            },
            (Some(d), Some(t)) => Shape::DateTime {
                length: style_length(d),
                year_style: YearStyle::Auto,
                alignment: Alignment::Auto,
                precision: style_precision(t),
                zone: style_zone(t),
            },
            (Some(AggregateStyle::Full), None) => Shape::DateWithWeekday,
            (Some(d), None) => Shape::Date {
                length: style_length(d),
                year_style: YearStyle::Auto,
                alignment: Alignment::Auto,
            },
            (None, Some(t)) => Shape::Time {
                length: style_length(t),
                precision: style_precision(t),
                alignment: Alignment::Auto,
                zone: style_zone(t),
            },
            (None, None) => Shape::Date {
                length: Length::Short,
                year_style: YearStyle::Full,
                alignment: Alignment::Auto,
            },
        }
    }
}

fn load_error<E: std::fmt::Debug>(what: &'static str, locale: &IcuLocale) -> impl FnOnce(E) -> IntlError {
    let locale = locale.to_string();
    move |e| IntlError::Load {
        what,
        locale,
        detail: format!("{e:?}"),
    }
}

fn out_of_range<E: std::fmt::Debug>(instant: &PointInTime) -> impl FnOnce(E) -> IntlError {
    let instant = instant.to_string();
    move |e| IntlError::OutOfRange {
        instant,
        detail: format!("{e:?}"),
    }
}

fn zone_at(
    instant: &PointInTime,
    date: Date<Iso>,
    time: Time,
) -> Result<TimeZoneInfo<AtTime>> {
    let offset =
        UtcOffset::try_from_seconds(instant.utc_offset_seconds()).map_err(out_of_range(instant))?;
    Ok(IanaParser::new()
        .parse(instant.zone().name())
        .with_offset(Some(offset))
        .at_date_time_iso(DateTime { date, time }))
}

fn render(shape: Shape, locale: &IcuLocale, instant: &PointInTime) -> Result<String> {
    let d = instant.date();
    let t = instant.time();
    let date = Date::try_new_iso(d.year(), d.month() as u8, d.day() as u8)
        .map_err(out_of_range(instant))?;
    let time = Time::try_new(t.hour() as u8, t.minute() as u8, 0, 0)
        .map_err(out_of_range(instant))?;

    let out = match shape {
        Shape::Date {
            length,
            year_style,
            alignment,
        } => {
            let fs = YMD::for_length(length)
                .with_year_style(year_style)
                .with_alignment(alignment);
            let formatter =
                DateTimeFormatter::try_new(locale.into(), fs).map_err(load_error("date", locale))?;
            formatter.format(&date).to_string()
        }
        Shape::DateWithWeekday => {
            let formatter = DateTimeFormatter::try_new(locale.into(), YMDE::long())
                .map_err(load_error("date", locale))?;
            formatter.format(&date).to_string()
        }
        Shape::Time {
            length,
            precision,
            alignment,
            zone: None,
        } => {
            let fs = T::for_length(length)
                .with_time_precision(precision)
                .with_alignment(alignment);
            let formatter =
                NoCalendarFormatter::try_new(locale.into(), fs).map_err(load_error("time", locale))?;
            formatter.format(&time).to_string()
        }
        // A zoned input carries a date, so a calendar is needed even though
        // no date field is shown.
        Shape::Time {
            length,
            precision,
            alignment,
            zone: Some(name),
        } => {
            let fs = T::for_length(length)
                .with_time_precision(precision)
                .with_alignment(alignment);
            let input = ZonedDateTime {
                date: date.to_calendar(Gregorian),
                time,
                zone: zone_at(instant, date, time)?,
            };
            match name {
                ZoneName::Short => {
                    FixedCalendarDateTimeFormatter::<Gregorian, _>::try_new(
                        locale.into(),
                        fs.with_zone(SpecificShort),
                    )
                    .map_err(load_error("time", locale))?
                    .format(&input)
                    .to_string()
                }
                ZoneName::Long => {
                    FixedCalendarDateTimeFormatter::<Gregorian, _>::try_new(
                        locale.into(),
                        fs.with_zone(SpecificLong),
                    )
                    .map_err(load_error("time", locale))?
                    .format(&input)
                    .to_string()
                }
            }
        }
        Shape::DateTime {
            length,
            year_style,
            alignment,
            precision,
            zone,
        } => {
            let fs = YMDT::for_length(length)
                .with_year_style(year_style)
                .with_alignment(alignment)
                .with_time_precision(precision);
            match zone {
                None => DateTimeFormatter::try_new(locale.into(), fs)
                    .map_err(load_error("date/time", locale))?
                    .format(&DateTime { date, time })
                    .to_string(),
                Some(name) => {
                    let input = ZonedDateTime {
                        date,
                        time,
                        zone: zone_at(instant, date, time)?,
                    };
                    match name {
                        ZoneName::Short => {
                            DateTimeFormatter::try_new(locale.into(), fs.with_zone(SpecificShort))
                                .map_err(load_error("date/time", locale))?
                                .format(&input)
                                .to_string()
                        }
                        ZoneName::Long => {
                            DateTimeFormatter::try_new(locale.into(), fs.with_zone(SpecificLong))
                                .map_err(load_error("date/time", locale))?
                                .format(&input)
                                .to_string()
                        }
                    }
                }
            }
        }
        Shape::DateWithWeekdayTime { precision, zone } => {
            let fs = YMDET::long().with_time_precision(precision);
            match zone {
                None => DateTimeFormatter::try_new(locale.into(), fs)
                    .map_err(load_error("date/time", locale))?
                    .format(&DateTime { date, time })
                    .to_string(),
                Some(name) => {
                    let input = ZonedDateTime {
                        date,
                        time,
                        zone: zone_at(instant, date, time)?,
                    };
                    match name {
                        ZoneName::Short => {
                            DateTimeFormatter::try_new(locale.into(), fs.with_zone(SpecificShort))
                                .map_err(load_error("date/time", locale))?
                                .format(&input)
                                .to_string()
                        }
                        ZoneName::Long => {
                            DateTimeFormatter::try_new(locale.into(), fs.with_zone(SpecificLong))
                                .map_err(load_error("date/time", locale))?
                                .format(&input)
                                .to_string()
                        }
                    }
                }
            }
        }
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StyleToken;
    use chrono::{NaiveDate, NaiveTime};

    fn instant() -> PointInTime {
        PointInTime::new(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
        )
        .with_zone(chrono_tz::America::Los_Angeles)
    }

    fn shape_of(date: StyleToken, time: StyleToken) -> Shape {
        Shape::for_request(&build_request(Selection::new(date, time)))
    }

    fn fmt(locale: &str, date: StyleToken, time: StyleToken) -> String {
        format(locale, &instant(), Selection::new(date, time)).unwrap()
    }

    #[test]
    fn shapes_for_field_level_selections() {
        assert_eq!(
            shape_of(StyleToken::Numeric, StyleToken::Default),
            Shape::Date {
                length: Length::Short,
                year_style: YearStyle::Full,
                alignment: Alignment::Auto,
            }
        );
        assert_eq!(
            shape_of(StyleToken::TwoDigit, StyleToken::Default),
            Shape::Date {
                length: Length::Short,
                year_style: YearStyle::Auto,
                alignment: Alignment::Column,
            }
        );
        assert_eq!(
            shape_of(StyleToken::Default, StyleToken::Numeric),
            Shape::Time {
                length: Length::Short,
                precision: TimePrecision::Second,
                alignment: Alignment::Auto,
                zone: None,
            }
        );
        assert_eq!(
            shape_of(StyleToken::Numeric, StyleToken::TwoDigit),
            Shape::DateTime {
                length: Length::Short,
                year_style: YearStyle::Full,
                alignment: Alignment::Column,
                precision: TimePrecision::Minute,
                zone: None,
            }
        );
    }

    #[test]
    fn shapes_for_aggregate_selections() {
        assert_eq!(
            shape_of(StyleToken::Full, StyleToken::Default),
            Shape::DateWithWeekday
        );
        assert_eq!(
            shape_of(StyleToken::Full, StyleToken::Short),
            Shape::DateWithWeekdayTime {
                precision: TimePrecision::Minute,
                zone: None,
            }
        );
        assert_eq!(
            shape_of(StyleToken::Default, StyleToken::Long),
            Shape::Time {
                length: Length::Long,
                precision: TimePrecision::Second,
                alignment: Alignment::Auto,
                zone: Some(ZoneName::Short),
            }
        );
        assert_eq!(
            shape_of(StyleToken::Medium, StyleToken::Short),
            Shape::DateTime {
                length: Length::Medium,
                year_style: YearStyle::Auto,
                alignment: Alignment::Auto,
                precision: TimePrecision::Minute,
                zone: None,
            }
        );
        assert_eq!(
            shape_of(StyleToken::Full, StyleToken::Full),
            Shape::DateWithWeekdayTime {
                precision: TimePrecision::Second,
                zone: Some(ZoneName::Long),
            }
        );
    }

    #[test]
    fn default_fallback_shape() {
        assert_eq!(
            shape_of(StyleToken::Default, StyleToken::Default),
            Shape::DateTime {
                length: Length::Short,
                year_style: YearStyle::Full,
                alignment: Alignment::Auto,
                precision: TimePrecision::Minute,
                zone: None,
            }
        );
    }

    #[test]
    fn empty_request_formats_a_date() {
        let shape = Shape::for_request(&FormatRequest::default());
        assert!(matches!(shape, Shape::Date { .. }));
    }

    #[test]
    fn en_us_numeric_date() {
        let out = fmt("en-US", StyleToken::Numeric, StyleToken::Default);
        assert!(out.contains("2024"), "{out}");
        assert!(!out.contains(':'), "{out}");
    }

    #[test]
    fn en_us_two_digit_date_pads_month_and_day() {
        let out = fmt("en-US", StyleToken::TwoDigit, StyleToken::Default);
        assert!(out.starts_with("03/05"), "{out}");
    }

    #[test]
    fn de_de_numeric_keeps_locale_padding() {
        let out = fmt("de-DE", StyleToken::Numeric, StyleToken::Default);
        assert_eq!(out, "05.03.2024");
    }

    #[test]
    fn en_us_full_date_names_weekday() {
        let out = fmt("en-US", StyleToken::Full, StyleToken::Default);
        assert!(out.contains("Tuesday"), "{out}");
        assert!(out.contains("March"), "{out}");
    }

    #[test]
    fn time_only_field_level_shows_seconds() {
        let out = fmt("en-US", StyleToken::Default, StyleToken::Numeric);
        assert!(out.contains("4:30:00"), "{out}");
        assert!(!out.contains("2024"), "{out}");
    }

    #[test]
    fn short_time_style_stops_at_minutes() {
        let out = fmt("en-GB", StyleToken::Default, StyleToken::Short);
        assert!(out.contains("16:30"), "{out}");
        assert!(!out.contains("16:30:00"), "{out}");
    }

    #[test]
    fn long_time_style_names_the_zone() {
        let medium = fmt("en-US", StyleToken::Default, StyleToken::Medium);
        let long = fmt("en-US", StyleToken::Default, StyleToken::Long);
        assert_ne!(long, medium);
        assert!(long.contains("4:30:00"), "{long}");
        assert!(long.contains("PST"), "{long}");
        assert!(!medium.contains("PST"), "{medium}");
    }

    #[test]
    fn full_time_style_spells_out_the_zone() {
        let out = fmt("en-US", StyleToken::Default, StyleToken::Full);
        assert!(out.contains("Pacific Standard Time"), "{out}");
    }

    #[test]
    fn zone_name_follows_daylight_saving() {
        let mut summer = instant();
        summer.set_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        let selection = Selection::new(StyleToken::Default, StyleToken::Full);
        let out = format("en-US", &summer, selection).unwrap();
        assert!(out.contains("Pacific Daylight Time"), "{out}");
    }

    #[test]
    fn date_with_long_time_carries_the_zone() {
        let out = fmt("en-US", StyleToken::Medium, StyleToken::Long);
        assert!(out.contains("2024"), "{out}");
        assert!(out.contains("PST"), "{out}");

        let out = fmt("en-US", StyleToken::Full, StyleToken::Full);
        assert!(out.contains("Tuesday"), "{out}");
        assert!(out.contains("Pacific Standard Time"), "{out}");
    }

    #[test]
    fn utc_instant_names_utc_or_gmt() {
        let utc = PointInTime::new(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
        );
        let selection = Selection::new(StyleToken::Default, StyleToken::Long);
        let out = format("en-GB", &utc, selection).unwrap();
        assert!(out.contains("16:30:00"), "{out}");
        assert!(out.contains("UTC") || out.contains("GMT"), "{out}");
    }

    #[test]
    fn default_fallback_has_date_and_time() {
        let out = fmt("de-DE", StyleToken::Default, StyleToken::Default);
        assert!(out.contains("2024"), "{out}");
        assert!(out.contains("16:30"), "{out}");
    }

    #[test]
    fn malformed_locale_fails() {
        let err = format("not a locale", &instant(), Selection::default()).unwrap_err();
        assert!(matches!(err, IntlError::InvalidLocale { .. }));
    }
}
