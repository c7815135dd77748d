use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::models::{EventInput, EventResponse, NewEvent};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, no_content, ok};
use crate::validation::validate_event;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub filtro: Option<String>,
}

fn parse_event(payload: Result<Json<Value>, JsonRejection>) -> Result<NewEvent, AppError> {
    let Json(body) = payload?;
    let input = EventInput::from_value(&body);
    validate_event(&input)?;
    Ok(NewEvent::try_from(input)?)
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, AppError> {
    let filter = params.filtro.filter(|f| !f.is_empty());
    let events = state
        .events
        .list(filter.as_deref())
        .await
        .map_err(AppError::storage("Failed to fetch events"))?;

    debug!(count = events.len(), filter = ?filter, "Listed events");
    let body: Vec<EventResponse> = events.into_iter().map(EventResponse::from).collect();
    Ok(ok(body))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let event = state
        .events
        .get_by_id(id)
        .await
        .map_err(AppError::storage("Failed to fetch event"))?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    Ok(ok(EventResponse::from(event)))
}

pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let new_event = parse_event(payload)?;

    let id = state
        .events
        .create(&new_event)
        .await
        .map_err(AppError::storage("Failed to create event"))?;

    // Not atomic with the insert; a concurrent delete surfaces here.
    let event = state
        .events
        .get_by_id(id)
        .await
        .map_err(AppError::storage("Failed to fetch created event"))?
        .ok_or_else(|| AppError::Internal("Created event not found".to_string()))?;

    info!(id, "Event created");
    Ok(created(EventResponse::from(event)))
}

/// Full replace. A missing row is detected by the re-fetch, not by the
/// affected-row count, since MySQL reports 0 for an update that changes nothing.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let new_event = parse_event(payload)?;

    let affected = state
        .events
        .update_by_id(id, &new_event)
        .await
        .map_err(AppError::storage("Failed to update event"))?;
    debug!(id, affected, "Event update executed");

    let event = state
        .events
        .get_by_id(id)
        .await
        .map_err(AppError::storage("Failed to fetch updated event"))?
        .ok_or_else(|| AppError::NotFound("Event not found after update".to_string()))?;

    info!(id, "Event updated");
    Ok(ok(EventResponse::from(event)))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let affected = state
        .events
        .delete_by_id(id)
        .await
        .map_err(AppError::storage("Failed to delete event"))?;

    info!(id, affected, "Event delete executed");
    Ok(no_content())
}
