use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use sheetcal_core::{event::EventDescriptor, sheet_client::EventKindBitmask};

use crate::route::{handle, AppState, ExcludeQueryParams};

/// Handle event list requests of the calendar widget.
pub async fn handler(
    State(state): State<AppState>,
    Query(query_params): Query<ExcludeQueryParams>,
) -> Result<Json<Vec<EventDescriptor>>, (StatusCode, String)> {
    let events = handle(&state, EventKindBitmask::from(&query_params)).await?;
    Ok(Json(events))
}
