use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use crate::session::{LocaleEntry, Session};
use crate::types::{PointInTime, Selection};

pub const REMARKS: &str = "\
Date and time samples are formatted with ICU4X (the Unicode project's
internationalization library), using CLDR locale data.

NOTE: the Numeric and 2-Digit styles cannot be combined with the Short,
Medium, Long and Full styles. Choosing one kind on one side resets the
other side to Default.

Dates and times are formatted differently across locales. Some of the
locale-dependent elements are:
  - positioning of day, month and year
  - use of 12-hour vs 24-hour clocks
  - month names and capitalization
  - time zone names (the Long and Full time styles add one)
  - the calendar itself (th-TH, for example, counts Buddhist years)

Numeric and 2-Digit are requests, not guarantees: each locale keeps its
own padding conventions, so de-DE shows 05.03.2024 even for Numeric.";

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn render_table(entries: &[LocaleEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![header_cell("Locale"), header_cell("Format")]);
    for entry in entries {
        table.add_row(vec![Cell::new(entry.label()), Cell::new(&entry.formatted)]);
    }
    table
}

pub fn status_line(instant: &PointInTime, selection: Selection) -> String {
    format!(
        "{instant} {}  date style: {}  time style: {}",
        instant.zone(),
        selection.date,
        selection.time
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    instant: String,
    time_zone: &'static str,
    selection: Selection,
    entries: &'a [LocaleEntry],
}

pub fn render_json(session: &Session, entries: &[LocaleEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        instant: session.instant().to_string(),
        time_zone: session.instant().zone().name(),
        selection: session.selection(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intl::LocaleDescription;
    use crate::types::{Side, StyleToken};
    use chrono::{NaiveDate, NaiveTime};

    fn entries() -> Vec<LocaleEntry> {
        vec![
            LocaleEntry {
                locale: "en-US".to_string(),
                description: LocaleDescription {
                    language: "English".to_string(),
                    region: Some("United States".to_string()),
                },
                formatted: "3/5/2024, 4:30 PM".to_string(),
            },
            LocaleEntry {
                locale: "sw".to_string(),
                description: LocaleDescription {
                    language: "Swahili".to_string(),
                    region: None,
                },
                formatted: "5/3/2024 16:30".to_string(),
            },
        ]
    }

    #[test]
    fn table_has_one_row_per_locale() {
        let mut table = render_table(&entries());
        table.set_content_arrangement(ContentArrangement::Disabled);
        assert_eq!(table.row_iter().count(), 2);
        let text = table.to_string();
        assert!(text.contains("Locale"));
        assert!(text.contains("en-US · English (United States)"));
        assert!(text.contains("sw · Swahili"));
        assert!(text.contains("3/5/2024, 4:30 PM"));
    }

    #[test]
    fn status_line_uses_labels() {
        let instant = PointInTime::new(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
        );
        let line = status_line(&instant, Selection::new(StyleToken::TwoDigit, StyleToken::Default));
        assert_eq!(line, "2024-03-05 16:30 UTC  date style: 2-Digit  time style: Default");
    }

    #[test]
    fn remarks_cover_zones_and_padding() {
        assert!(REMARKS.contains("time zone names"));
        assert!(REMARKS.contains("padding conventions"));
        assert!(REMARKS.contains("05.03.2024"));
    }

    #[test]
    fn json_report_shape() {
        let instant = PointInTime::new(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
        )
        .with_zone(chrono_tz::Europe::Berlin);
        let mut session = Session::new(instant, vec![]);
        session.set_style(Side::Time, StyleToken::Full);
        let json = render_json(&session, &entries()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["instant"], "2024-03-05 16:30");
        assert_eq!(value["timeZone"], "Europe/Berlin");
        assert_eq!(value["selection"]["date"], "default");
        assert_eq!(value["selection"]["time"], "full");
        assert_eq!(value["entries"][1]["region"], serde_json::Value::Null);
        assert_eq!(value["entries"][0]["formatted"], "3/5/2024, 4:30 PM");
    }
}
