//! This client fetches the published sheet and parses it into calendar events.

use anyhow::Result;
use bitmask_enum::bitmask;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use reqwest::Response;

use crate::{
    event::{classify_rows, EventDescriptor, TimeShape, CLASS_PAST},
    row::Row,
};

#[bitmask]
pub enum EventKindBitmask {
    Tba,
    Task,
    Timed,
    StartOnly,
    Canceled,
    Past,
}

impl From<&EventDescriptor> for EventKindBitmask {
    fn from(event: &EventDescriptor) -> Self {
        let mut event_kind_bitmask = match event.shape() {
            TimeShape::Tba => EventKindBitmask::Tba,
            TimeShape::Task => EventKindBitmask::Task,
            TimeShape::Timed => EventKindBitmask::Timed,
            TimeShape::StartOnly => EventKindBitmask::StartOnly,
            TimeShape::Residual => EventKindBitmask::none(),
        };
        if event.extended_props.canceled {
            event_kind_bitmask |= EventKindBitmask::Canceled;
        }
        if event.has_class(CLASS_PAST) {
            event_kind_bitmask |= EventKindBitmask::Past;
        }
        event_kind_bitmask
    }
}

/// Get the events of a published sheet.
///
/// `url` must point to the CSV export of the sheet.
pub async fn get(url: &str, now: NaiveDateTime) -> Result<Vec<EventDescriptor>> {
    let response = get_response(url).await?;
    let events = events_from_csv(&response.text().await?, now)?;
    info!("Read {} events from {url}", events.len());
    Ok(events)
}

/// Get the CSV response from the spreadsheet host.
async fn get_response(url: &str) -> Result<Response> {
    let client = reqwest::Client::new();
    debug!("Fetching {url}");
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response)
}

/// Parse a CSV document and classify its rows.
pub fn events_from_csv(csv: &str, now: NaiveDateTime) -> Result<Vec<EventDescriptor>> {
    let rows = parse(csv)?;
    let events = classify_rows(&rows, now);
    if events.len() < rows.len() {
        debug!("Skipped {} rows without a valid date", rows.len() - events.len());
    }
    Ok(events)
}

/// Parse a CSV document with a header row into rows.
///
/// Short records are allowed, their missing trailing cells are simply absent.
pub fn parse(csv: &str) -> Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(csv.as_bytes());
    let headers = reader.headers()?.clone();
    let mut rows = vec![];
    for record_result in reader.records() {
        let record = record_result?;
        let mut row = Row::new();
        for (name, value) in headers.iter().zip(record.iter()) {
            row.insert(name, value);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Drop every event of an excluded kind.
pub fn filter(
    events: Vec<EventDescriptor>,
    excluded_event_kinds: EventKindBitmask,
) -> Vec<EventDescriptor> {
    events
        .into_iter()
        .filter(|event| (EventKindBitmask::from(event) & excluded_event_kinds).is_none())
        .collect()
}
