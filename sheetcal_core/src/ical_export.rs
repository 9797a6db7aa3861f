//! Render calendar events as an iCalendar feed.

use chrono::NaiveDateTime;
use ical::{
    generator::{IcalCalendar, IcalCalendarBuilder, IcalEvent, Property},
    ical_param, ical_property,
};

use crate::event::{hyphenate, EventDescriptor};

static PROD_ID: &str = "-//sheetcal//Published sheet events//EN";
static UID_DOMAIN: &str = "sheetcal";
static DATE_FORMAT: &str = "%Y%m%d";
static DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Build the calendar from the events.
///
/// `stamp` is written as the DTSTAMP of every event.
pub fn to_ical(events: &[EventDescriptor], stamp: NaiveDateTime) -> IcalCalendar {
    let stamp = stamp.format(DATE_TIME_FORMAT).to_string();
    let mut calendar = IcalCalendarBuilder::version("2.0")
        .gregorian()
        .prodid(PROD_ID)
        .build();
    for event in events {
        calendar.events.push(get_event(event, &stamp));
    }
    calendar
}

/// Build a single VEVENT.
fn get_event(event: &EventDescriptor, stamp: &str) -> IcalEvent {
    let props = &event.extended_props;
    let mut ical_event = IcalEvent::new();
    ical_event.properties.push(ical_property!("UID", escape_text(&uid(event))));
    ical_event.properties.push(ical_property!("DTSTAMP", stamp));
    if event.all_day {
        let first_day = event.start.date();
        let last_day = event.end.map_or(first_day, |end| end.date());
        ical_event.properties.push(ical_property!(
            "DTSTART",
            first_day.format(DATE_FORMAT).to_string(),
            ical_param!("VALUE", "DATE")
        ));
        if let Some(day_after) = last_day.succ_opt() {
            ical_event.properties.push(ical_property!(
                "DTEND",
                day_after.format(DATE_FORMAT).to_string(),
                ical_param!("VALUE", "DATE")
            ));
        }
    } else {
        ical_event.properties.push(ical_property!(
            "DTSTART",
            event.start.format(DATE_TIME_FORMAT).to_string()
        ));
        if let Some(end) = event.end {
            ical_event.properties.push(ical_property!(
                "DTEND",
                end.format(DATE_TIME_FORMAT).to_string()
            ));
        }
    }
    ical_event
        .properties
        .push(ical_property!("SUMMARY", escape_text(&event.title)));
    if !props.location.is_empty() {
        ical_event
            .properties
            .push(ical_property!("LOCATION", escape_text(&props.location)));
    }
    if !props.time_label.is_empty() {
        ical_event
            .properties
            .push(ical_property!("DESCRIPTION", escape_text(&props.time_label)));
    }
    ical_event
        .properties
        .push(ical_property!("CATEGORIES", escape_text(&props.category)));
    if props.canceled {
        ical_event
            .properties
            .push(ical_property!("STATUS", "CANCELLED"));
    }
    ical_event
        .properties
        .push(ical_property!("TRANSP", "TRANSPARENT"));
    ical_event
}

/// Escape a TEXT value so it stays inside its content line.
fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace(['\r', '\n'], "\\n")
}

/// Get a unique id for an event.
///
/// Events of the same title and category starting at the same time share an id.
fn uid(event: &EventDescriptor) -> String {
    let start = event.start.format(DATE_TIME_FORMAT);
    let title = hyphenate(&event.title);
    let category = hyphenate(&event.extended_props.category);
    format!("{start}_{title}_{category}@{UID_DOMAIN}")
}
