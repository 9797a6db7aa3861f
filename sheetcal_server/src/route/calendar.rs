use axum::{
    extract::{Query, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use sheetcal_core::{ical::generator::Emitter, ical_export, sheet_client::EventKindBitmask};

use crate::route::{handle, AppState, ExcludeQueryParams};

/// Handle iCalendar feed requests.
pub async fn handler(
    State(state): State<AppState>,
    Query(query_params): Query<ExcludeQueryParams>,
) -> Result<Response, (StatusCode, String)> {
    let events = handle(&state, EventKindBitmask::from(&query_params)).await?;
    let stamp = chrono::Local::now().naive_local();
    let ical_calendar = ical_export::to_ical(&events, stamp);
    let response = ([(CONTENT_TYPE, "text/calendar")], ical_calendar.generate()).into_response();
    Ok(response)
}
