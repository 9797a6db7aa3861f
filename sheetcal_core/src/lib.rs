//! This crate turns the rows of a published spreadsheet into calendar events.
//!
//! The sheet is read as CSV. Each row becomes one event for a web calendar widget, or is skipped if its date is
//! unusable. The same events can be exported as an iCalendar feed.

pub use ical;

pub mod config_check;
pub mod date_time;
pub mod event;
pub mod ical_export;
pub mod row;
pub mod sheet_client;
