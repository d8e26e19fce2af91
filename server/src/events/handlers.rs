//! Event Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::types::{CreateEventRequest, EventResponse, UpdateEventRequest};
use crate::api::AppState;
use crate::clubs::types::FollowResponse;
use crate::error::ApiResult;
use crate::permissions::Identity;

/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state.access.list_events(&identity).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    let event = state.access.create_event(&identity, body).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

/// GET /api/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<EventResponse>> {
    let event = state.access.get_event(&identity, id).await?;
    Ok(Json(event.into()))
}

/// PUT|PATCH /api/events/{id}
pub async fn update_event(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    let event = state.access.update_event(&identity, id, body).await?;
    Ok(Json(event.into()))
}

/// DELETE /api/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.access.delete_event(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/events/{id}/toggle-follow
pub async fn toggle_follow(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FollowResponse>> {
    let followed = state.access.toggle_event_follow(&identity, id).await?;
    Ok(Json(FollowResponse { followed }))
}

/// GET /api/me/followed-events
pub async fn my_followed_events(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state.access.my_followed_events(&identity).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}
