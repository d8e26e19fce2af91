//! Database Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// User model.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub is_admin: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Club as seen by a particular viewer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub content: String,
    pub files: Json<Vec<String>>,
    pub created_by: Uuid,
    pub created_by_username: String,
    pub followers_count: i64,
    /// Whether the viewer follows this club (false for anonymous viewers).
    pub is_followed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Club post as seen by a particular viewer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ClubPost {
    pub id: Uuid,
    pub club_id: Uuid,
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
    pub updated_at: DateTime<Utc>,
}

/// Event as seen by a particular viewer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_by: Uuid,
    pub created_by_username: String,
    pub followers_count: i64,
    pub is_followed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Write models
// ============================================================================

/// New user row. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub is_admin: bool,
    pub profile_image: Option<String>,
}

/// Partial user update; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    /// Written to `is_admin`, `is_superuser` and `is_staff` alike.
    pub is_admin: Option<bool>,
    /// `Some(None)` clears the image.
    pub profile_image: Option<Option<String>>,
}

/// New club row. `created_by` is always the acting identity.
#[derive(Debug, Clone)]
pub struct NewClub {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub content: String,
    pub files: Vec<String>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct ClubChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<Option<String>>,
    pub content: Option<String>,
    pub files: Option<Vec<String>>,
}

/// New club post row.
#[derive(Debug, Clone)]
pub struct NewClubPost {
    pub club_id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub file: Option<String>,
    pub is_public: bool,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct ClubPostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<Option<String>>,
    pub file: Option<Option<String>>,
    pub is_public: Option<bool>,
}

/// New event row.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
}
