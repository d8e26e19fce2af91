//! Club and Club Post Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::types::{
    AdminClubResponse, ClubDetail, ClubSummary, CreateClubRequest, CreatePostRequest,
    FollowResponse, LikeResponse, PostResponse, UpdateClubRequest, UpdatePostRequest,
};
use crate::api::AppState;
use crate::error::ApiResult;
use crate::permissions::Identity;

// ============================================================================
// Public club endpoints
// ============================================================================

/// GET /api/clubs
pub async fn list_clubs(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<ClubSummary>>> {
    let media = state.media_base();
    let clubs = state.access.list_clubs(&identity).await?;
    Ok(Json(
        clubs.into_iter().map(|c| ClubSummary::new(c, media)).collect(),
    ))
}

/// GET /api/clubs/{id}
pub async fn get_club(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ClubDetail>> {
    let (club, posts) = state.access.get_club(&identity, id).await?;
    Ok(Json(ClubDetail::new(club, posts, state.media_base())))
}

/// POST /api/clubs/{id}/follow
pub async fn toggle_follow(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FollowResponse>> {
    let followed = state.access.toggle_club_follow(&identity, id).await?;
    Ok(Json(FollowResponse { followed }))
}

// ============================================================================
// Club posts
// ============================================================================

/// GET /api/clubs/{id}/posts
pub async fn list_posts(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let media = state.media_base();
    let posts = state.access.list_club_posts(&identity, id).await?;
    Ok(Json(
        posts.into_iter().map(|p| PostResponse::new(p, media)).collect(),
    ))
}

/// POST /api/clubs/{id}/posts
pub async fn create_post(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(body): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let post = state.access.create_post(&identity, id, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(PostResponse::new(post, state.media_base())),
    ))
}

/// POST /api/posts/{id}/like
pub async fn toggle_like(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LikeResponse>> {
    let liked = state.access.toggle_post_like(&identity, id).await?;
    Ok(Json(LikeResponse { liked }))
}

/// GET /api/me/liked-posts
pub async fn my_liked_posts(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let media = state.media_base();
    let posts = state.access.my_liked_posts(&identity).await?;
    Ok(Json(
        posts.into_iter().map(|p| PostResponse::new(p, media)).collect(),
    ))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/admin/clubs
pub async fn admin_list_clubs(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<AdminClubResponse>>> {
    let media = state.media_base();
    let clubs = state.access.admin_list_clubs(&identity).await?;
    Ok(Json(
        clubs
            .into_iter()
            .map(|c| AdminClubResponse::new(c, media))
            .collect(),
    ))
}

/// POST /api/admin/clubs
pub async fn admin_create_club(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<CreateClubRequest>,
) -> ApiResult<(StatusCode, Json<AdminClubResponse>)> {
    let club = state.access.create_club(&identity, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(AdminClubResponse::new(club, state.media_base())),
    ))
}

/// GET /api/admin/clubs/{id}
pub async fn admin_get_club(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AdminClubResponse>> {
    let club = state.access.admin_get_club(&identity, id).await?;
    Ok(Json(AdminClubResponse::new(club, state.media_base())))
}

/// PUT|PATCH /api/admin/clubs/{id}
pub async fn admin_update_club(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateClubRequest>,
) -> ApiResult<Json<AdminClubResponse>> {
    let club = state.access.update_club(&identity, id, body).await?;
    Ok(Json(AdminClubResponse::new(club, state.media_base())))
}

/// DELETE /api/admin/clubs/{id}
pub async fn admin_delete_club(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.access.delete_club(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/posts/{id}
pub async fn admin_get_post(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PostResponse>> {
    let post = state.access.get_post(&identity, id).await?;
    Ok(Json(PostResponse::new(post, state.media_base())))
}

/// PUT|PATCH /api/admin/posts/{id}
pub async fn admin_update_post(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let post = state.access.update_post(&identity, id, body).await?;
    Ok(Json(PostResponse::new(post, state.media_base())))
}

/// DELETE /api/admin/posts/{id}
pub async fn admin_delete_post(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.access.delete_post(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
