pub mod calendar;
pub mod events;

use axum::http::StatusCode;
use serde::Deserialize;
use sheetcal_core::{event::EventDescriptor, sheet_client, sheet_client::EventKindBitmask};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub csv_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeQueryParams {
    #[serde(default)]
    exclude_tba: bool,
    #[serde(default)]
    exclude_task: bool,
    #[serde(default)]
    exclude_timed: bool,
    #[serde(default)]
    exclude_start_only: bool,
    #[serde(default)]
    exclude_canceled: bool,
    #[serde(default)]
    exclude_past: bool,
}

impl From<&ExcludeQueryParams> for EventKindBitmask {
    fn from(value: &ExcludeQueryParams) -> Self {
        let mut event_kind_bitmask = EventKindBitmask::none();
        if value.exclude_tba {
            event_kind_bitmask |= EventKindBitmask::Tba;
        }
        if value.exclude_task {
            event_kind_bitmask |= EventKindBitmask::Task;
        }
        if value.exclude_timed {
            event_kind_bitmask |= EventKindBitmask::Timed;
        }
        if value.exclude_start_only {
            event_kind_bitmask |= EventKindBitmask::StartOnly;
        }
        if value.exclude_canceled {
            event_kind_bitmask |= EventKindBitmask::Canceled;
        }
        if value.exclude_past {
            event_kind_bitmask |= EventKindBitmask::Past;
        }
        event_kind_bitmask
    }
}

/// Fetch the sheet and keep the events which are not excluded.
pub async fn handle(
    state: &AppState,
    excluded_event_kinds: EventKindBitmask,
) -> Result<Vec<EventDescriptor>, (StatusCode, String)> {
    let now = chrono::Local::now().naive_local();
    let events = sheet_client::get(&state.csv_url, now)
        .await
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    Ok(sheet_client::filter(events, excluded_event_kinds))
}

#[cfg(test)]
mod tests {
    use sheetcal_core::sheet_client::EventKindBitmask;

    use super::*;

    #[test]
    fn test_from_query_params_for_exclude_event_kind() {
        let exclude_query_params = ExcludeQueryParams::default();
        let exclude_from_query_params = EventKindBitmask::from(&exclude_query_params);
        assert_eq!(exclude_from_query_params, EventKindBitmask::none());
        let exclude_query_params = ExcludeQueryParams {
            exclude_task: true,
            ..Default::default()
        };
        let exclude_from_query_params = EventKindBitmask::from(&exclude_query_params);
        assert_eq!(exclude_from_query_params, EventKindBitmask::Task);
        let exclude_query_params = ExcludeQueryParams {
            exclude_tba: false,
            exclude_task: false,
            exclude_timed: true,
            exclude_start_only: true,
            exclude_canceled: false,
            exclude_past: true,
        };
        let exclude_from_query_params = EventKindBitmask::from(&exclude_query_params);
        assert_eq!(
            exclude_from_query_params,
            EventKindBitmask::Timed
                .or(EventKindBitmask::StartOnly)
                .or(EventKindBitmask::Past)
        );
    }
}
