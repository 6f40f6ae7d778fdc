use serde::Serialize;
use tracing::debug;

use crate::types::{AggregateStyle, FieldStyle, Selection, Side, StyleClass, StyleToken};

/// Apply a user edit to one side of the selection.
///
/// The edited side always takes the new token. If that leaves a field-level
/// token next to an aggregate one, the side that was not edited falls back to
/// `Default`.
pub fn normalize(current: Selection, changed: Side, token: StyleToken) -> Selection {
    let mut next = current;
    next.set(changed, token);

    let other = changed.other();
    let other_token = next.get(other);
    if token.class().conflicts_with(other_token.class()) {
        debug!(
            %changed,
            %token,
            reset = %other,
            was = %other_token,
            "incompatible styles, resetting other side"
        );
        next.set(other, StyleToken::Default);
    }
    next
}

/// Options handed to the date/time formatter, shaped like an
/// `Intl.DateTimeFormat` options bag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<FieldStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<FieldStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<FieldStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<FieldStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute: Option<FieldStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<FieldStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_style: Option<AggregateStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_style: Option<AggregateStyle>,
}

impl FormatRequest {
    pub fn has_date_fields(&self) -> bool {
        self.year.is_some() || self.month.is_some() || self.day.is_some()
    }

    pub fn has_time_fields(&self) -> bool {
        self.hour.is_some() || self.minute.is_some() || self.second.is_some()
    }

    pub fn is_aggregate(&self) -> bool {
        self.date_style.is_some() || self.time_style.is_some()
    }

    fn with_date_fields(mut self, style: FieldStyle) -> Self {
        self.year = Some(style);
        self.month = Some(style);
        self.day = Some(style);
        self
    }
}

/// Build the formatter options for a selection.
///
/// Field-level tokens win over aggregate ones, so an unreconciled selection
/// still maps to exactly one shape.
pub fn build_request(selection: Selection) -> FormatRequest {
    use StyleClass::{Aggregate, Default as Unset, Field};

    let base = FormatRequest::default();
    match (selection.date.class(), selection.time.class()) {
        (Field(date), Field(time)) => FormatRequest {
            hour: Some(time),
            minute: Some(time),
            ..base.with_date_fields(date)
        },
        (Field(date), _) => base.with_date_fields(date),
        // NOTE: the time-only shape asks for seconds, the combined one above does not.
        (_, Field(time)) => FormatRequest {
            hour: Some(time),
            minute: Some(time),
            second: Some(time),
            ..base
        },
        (Aggregate(date), Aggregate(time)) => FormatRequest {
            date_style: Some(date),
            time_style: Some(time),
            ..base
        },
        (Unset, Aggregate(time)) => FormatRequest {
            time_style: Some(time),
            ..base
        },
        (Aggregate(date), Unset) => FormatRequest {
            date_style: Some(date),
            ..base
        },
        (Unset, Unset) => FormatRequest {
            year: Some(FieldStyle::Numeric),
            month: Some(FieldStyle::Numeric),
            day: Some(FieldStyle::Numeric),
            hour: Some(FieldStyle::Numeric),
            minute: Some(FieldStyle::TwoDigit),
            ..base
        },
    }
}
