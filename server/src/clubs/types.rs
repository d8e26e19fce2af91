//! Club Type Definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::{Club, ClubPost};
use crate::util::{deserialize_double_option, media_url};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClubRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Partial club update. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateClubRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    /// Send a string to set, `null` to clear, or omit to leave unchanged.
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub image: Option<Option<String>>,
    pub content: Option<String>,
    pub files: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub file: Option<String>,
    #[serde(default = "default_true")]
    pub is_public: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub file: Option<Option<String>>,
    pub is_public: Option<bool>,
}

const fn default_true() -> bool {
    true
}

// ============================================================================
// Response Types
// ============================================================================

/// Public club representation.
#[derive(Debug, Serialize)]
pub struct ClubSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub followers_count: i64,
    pub is_followed: bool,
}

impl ClubSummary {
    pub fn new(club: Club, media_base: Option<&str>) -> Self {
        Self {
            id: club.id,
            name: club.name,
            description: club.description,
            image: club.image.as_deref().map(|r| media_url(media_base, r)),
            followers_count: club.followers_count,
            is_followed: club.is_followed,
        }
    }
}

/// Club with its posts, newest first.
#[derive(Debug, Serialize)]
pub struct ClubDetail {
    #[serde(flatten)]
    pub club: ClubSummary,
    pub content: String,
    pub files: Vec<String>,
    pub posts: Vec<PostResponse>,
}

impl ClubDetail {
    pub fn new(club: Club, posts: Vec<ClubPost>, media_base: Option<&str>) -> Self {
        let content = club.content.clone();
        let files = club.files.0.iter().map(|f| media_url(media_base, f)).collect();
        Self {
            club: ClubSummary::new(club, media_base),
            content,
            files,
            posts: posts
                .into_iter()
                .map(|p| PostResponse::new(p, media_base))
                .collect(),
        }
    }
}

/// Administrative club representation.
#[derive(Debug, Serialize)]
pub struct AdminClubResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub content: String,
    pub files: Vec<String>,
    pub followers_count: i64,
    pub created_by: Uuid,
    pub created_by_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminClubResponse {
    pub fn new(club: Club, media_base: Option<&str>) -> Self {
        Self {
            id: club.id,
            name: club.name,
            description: club.description,
            image: club.image.as_deref().map(|r| media_url(media_base, r)),
            content: club.content,
            files: club.files.0.iter().map(|f| media_url(media_base, f)).collect(),
            followers_count: club.followers_count,
            created_by: club.created_by,
            created_by_username: club.created_by_username,
            created_at: club.created_at,
            updated_at: club.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub club: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub file: Option<String>,
    pub is_public: bool,
    pub created_by: Uuid,
    pub author_username: String,
    pub likes_count: i64,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
}

impl PostResponse {
    pub fn new(post: ClubPost, media_base: Option<&str>) -> Self {
        Self {
            id: post.id,
            club: post.club_id,
            title: post.title,
            content: post.content,
            image: post.image.as_deref().map(|r| media_url(media_base, r)),
            file: post.file.as_deref().map(|r| media_url(media_base, r)),
            is_public: post.is_public,
            created_by: post.created_by,
            author_username: post.author_username,
            likes_count: post.likes_count,
            is_liked: post.is_liked,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub followed: bool,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
}
