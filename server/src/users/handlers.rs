//! Account Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::types::{
    AdminCreateUserRequest, AdminUpdateUserRequest, RegisterRequest, UpdateMeRequest,
    UserResponse,
};
use crate::api::AppState;
use crate::error::ApiResult;
use crate::permissions::Identity;

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state.access.register(&identity, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse::new(user, state.media_base())),
    ))
}

/// GET /api/users/me
pub async fn get_me(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<UserResponse>> {
    let user = state.access.me(&identity).await?;
    Ok(Json(UserResponse::new(user, state.media_base())))
}

/// PUT|PATCH /api/users/me
pub async fn update_me(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<UpdateMeRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.access.update_me(&identity, body).await?;
    Ok(Json(UserResponse::new(user, state.media_base())))
}

/// GET /api/admin/users
pub async fn admin_list_users(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let media = state.media_base();
    let users = state.access.admin_list_users(&identity).await?;
    Ok(Json(
        users
            .into_iter()
            .map(|u| UserResponse::new(u, media))
            .collect(),
    ))
}

/// POST /api/admin/users
pub async fn admin_create_user(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<AdminCreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state.access.admin_create_user(&identity, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse::new(user, state.media_base())),
    ))
}

/// GET /api/admin/users/{id}
pub async fn admin_get_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.access.admin_get_user(&identity, id).await?;
    Ok(Json(UserResponse::new(user, state.media_base())))
}

/// PUT|PATCH /api/admin/users/{id}
pub async fn admin_update_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(body): Json<AdminUpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.access.admin_update_user(&identity, id, body).await?;
    Ok(Json(UserResponse::new(user, state.media_base())))
}

/// DELETE /api/admin/users/{id}
pub async fn admin_delete_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.access.admin_delete_user(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
