//! Turn sheet rows into calendar widget events.
//!
//! Every row is classified by the shape of its time cells and placed on the calendar following one rule table:
//!
//! | shape      | all day | start          | end                          | label              |
//! |------------|---------|----------------|------------------------------|--------------------|
//! | TBA        | yes     | midnight       | none                         | `TBA`              |
//! | task       | yes     | midnight       | none                         | `Due by <start>` or empty |
//! | timed      | no      | start time     | end time, dropped if not after start | `<start>–<end>` |
//! | start only | no      | start time     | 23:59 the same day           | `<start>`          |
//! | residual   | yes     | midnight       | none                         | empty              |

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{
    date_time::{parse_date, parse_time, ParsedDate, ParsedTime},
    row::{
        truthy, Row, CANCELED_FIELD, CATEGORY_FIELD, DATE_FIELDS, END_FIELDS, LOCATION_FIELD,
        START_FIELDS, TITLE_FIELDS,
    },
};

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static DEFAULT_TITLE: &str = "Event";
static DEFAULT_CATEGORY: &str = "Other";
static TASK_CATEGORY: &str = "task";
static TBA_LABEL: &str = "TBA";

pub static CLASS_CANCELED: &str = "is-canceled";
pub static CLASS_PAST: &str = "is-past";

/// How the time cells of a row were filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeShape {
    /// Neither start nor end time.
    Tba,
    /// The category is `task`, whatever the times.
    Task,
    /// Both start and end time.
    Timed,
    /// Start time without end time.
    StartOnly,
    /// End time without start time.
    Residual,
}

impl TimeShape {
    fn detect(is_task: bool, start: Option<ParsedTime>, end: Option<ParsedTime>) -> Self {
        match (is_task, start, end) {
            (true, _, _) => TimeShape::Task,
            (false, None, None) => TimeShape::Tba,
            (false, Some(_), Some(_)) => TimeShape::Timed,
            (false, Some(_), None) => TimeShape::StartOnly,
            (false, None, Some(_)) => TimeShape::Residual,
        }
    }

    /// Get the CSS class marking this shape, the residual shape has none.
    pub fn class_name(self) -> Option<&'static str> {
        match self {
            TimeShape::Tba => Some("is-tba"),
            TimeShape::Task => Some("is-task"),
            TimeShape::Timed => Some("is-timed"),
            TimeShape::StartOnly => Some("is-start-only"),
            TimeShape::Residual => None,
        }
    }
}

/// An event in the shape the calendar widget consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDescriptor {
    pub title: String,
    pub start: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDateTime>,
    pub all_day: bool,
    pub extended_props: ExtendedProps,
    pub class_names: Vec<String>,
}

/// Widget metadata which is not part of the core event fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedProps {
    pub location: String,
    pub category: String,
    pub canceled: bool,
    pub is_tba: bool,
    pub is_task: bool,
    pub is_timed: bool,
    pub is_start_only: bool,
    pub time_label: String,
}

impl EventDescriptor {
    /// Get the shape this event was classified as.
    pub fn shape(&self) -> TimeShape {
        let props = &self.extended_props;
        if props.is_task {
            TimeShape::Task
        } else if props.is_tba {
            TimeShape::Tba
        } else if props.is_timed {
            TimeShape::Timed
        } else if props.is_start_only {
            TimeShape::StartOnly
        } else {
            TimeShape::Residual
        }
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.class_names.iter().any(|name| name == class_name)
    }
}

/// Where a row lands on the calendar.
struct Placement {
    all_day: bool,
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
    time_label: String,
}

fn place(
    shape: TimeShape,
    date: NaiveDate,
    start_time: Option<ParsedTime>,
    end_time: Option<ParsedTime>,
) -> Option<Placement> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    let all_day = |time_label: String| Placement {
        all_day: true,
        start: midnight,
        end: None,
        time_label,
    };
    let placement = match (shape, start_time, end_time) {
        (TimeShape::Tba, _, _) => all_day(String::from(TBA_LABEL)),
        (TimeShape::Task, Some(start_time), _) => {
            all_day(format!("Due by {}", start_time.to_12h()))
        }
        (TimeShape::Timed, Some(start_time), Some(end_time)) => Placement {
            all_day: false,
            start: start_time.on(date)?,
            end: Some(end_time.on(date)?),
            time_label: format!("{}–{}", start_time.to_12h(), end_time.to_12h()),
        },
        (TimeShape::StartOnly, Some(start_time), _) => Placement {
            all_day: false,
            start: start_time.on(date)?,
            end: Some(date.and_hms_opt(23, 59, 0)?),
            time_label: start_time.to_12h(),
        },
        _ => all_day(String::new()),
    };
    Some(Placement {
        end: placement.end.filter(|end| *end > placement.start),
        ..placement
    })
}

/// Whether an event is over at `now`.
///
/// All-day events last until the very end of their (last) day.
pub fn is_past_event(
    all_day: bool,
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> bool {
    let reference = end.unwrap_or(start);
    if all_day {
        return reference
            .date()
            .and_hms_milli_opt(23, 59, 59, 999)
            .is_some_and(|end_of_day| end_of_day < now);
    }
    reference < now
}

/// Replace every run of whitespace by a single `-`.
pub(crate) fn hyphenate(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), "-").into_owned()
}

/// Get the CSS class of a category, e.g. `cat-board-meeting` for `Board  Meeting`.
pub fn category_class(category: &str) -> String {
    format!("cat-{}", hyphenate(category).to_lowercase())
}

/// Classify a single row.
///
/// Returns `None` if the row has no valid date, every other missing or malformed cell falls back to a default.
pub fn classify_row(row: &Row, now: NaiveDateTime) -> Option<EventDescriptor> {
    let Some(date) = row
        .first_of(&DATE_FIELDS)
        .and_then(parse_date)
        .and_then(ParsedDate::to_date)
    else {
        debug!("Skipping row without a valid date: {row:?}");
        return None;
    };
    let start_time = row.first_of(&START_FIELDS).and_then(parse_time);
    let end_time = row.first_of(&END_FIELDS).and_then(parse_time);

    let title = row.text_or(&TITLE_FIELDS, DEFAULT_TITLE);
    let location = row.text_or(&[LOCATION_FIELD], "");
    let category = row.text_or(&[CATEGORY_FIELD], DEFAULT_CATEGORY);
    let canceled = truthy(row.get(CANCELED_FIELD));
    let is_task = category.eq_ignore_ascii_case(TASK_CATEGORY);

    let shape = TimeShape::detect(is_task, start_time, end_time);
    let placement = place(shape, date, start_time, end_time)?;

    let mut class_names = vec![category_class(&category)];
    class_names.extend(shape.class_name().map(String::from));
    if canceled {
        class_names.push(String::from(CLASS_CANCELED));
    }
    if is_past_event(placement.all_day, placement.start, placement.end, now) {
        class_names.push(String::from(CLASS_PAST));
    }

    Some(EventDescriptor {
        title,
        start: placement.start,
        end: placement.end,
        all_day: placement.all_day,
        extended_props: ExtendedProps {
            location,
            category,
            canceled,
            is_tba: shape == TimeShape::Tba,
            is_task,
            is_timed: shape == TimeShape::Timed,
            is_start_only: shape == TimeShape::StartOnly,
            time_label: placement.time_label,
        },
        class_names,
    })
}

/// Classify every row, keeping the order and dropping rejected rows.
pub fn classify_rows<'a>(
    rows: impl IntoIterator<Item = &'a Row>,
    now: NaiveDateTime,
) -> Vec<EventDescriptor> {
    rows.into_iter()
        .filter_map(|row| classify_row(row, now))
        .collect()
}
