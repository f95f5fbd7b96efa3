use crate::params::event::IndexParams;
use crate::{AppState, Error};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use domain::{ActivityRecord, EventStore};

use log::*;

/// GET the most recent activity records, newest event first
#[utoipa::path(
    get,
    path = "/api/events",
    params(IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved recent activity records", body = [ActivityRecord]),
        (status = 503, description = "Event store unavailable")
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse, Error> {
    // A query string that cannot be decoded at all is treated like an absent limit
    let params = match query {
        Ok(Query(pairs)) => IndexParams::from_pairs(pairs),
        Err(e) => {
            debug!("Ignoring undecodable events query: {e}");
            IndexParams::default()
        }
    };

    let config = &app_state.config;
    let limit = params.effective_limit(config.events_default_limit, config.events_max_limit);
    debug!("GET the {limit} most recent activity records");

    let records = app_state.event_store_ref().list_recent(limit).await?;

    Ok(Json(records))
}
