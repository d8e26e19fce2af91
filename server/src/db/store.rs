//! Storage contract used by the access layer.
//!
//! Two implementations exist: [`PgStore`](super::PgStore) for production and
//! [`MemoryStore`](super::MemoryStore) for development without a database and
//! for tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{
    Club, ClubChanges, ClubPost, ClubPostChanges, Event, EventChanges, NewClub, NewClubPost,
    NewEvent, NewUser, User, UserChanges,
};
use crate::permissions::ResourceKind;

/// Storage error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was violated.
    #[error("{0} already exists")]
    Conflict(String),

    /// Database error.
    #[error("Database error")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                let what = match db_err.constraint() {
                    Some(c) if c.starts_with("users") => "Username",
                    Some(c) if c.starts_with("clubs") => "Club name",
                    _ => "Record",
                };
                return Self::Conflict(what.to_string());
            }
        }
        Self::Database(err)
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A user-membership set attached to an entity.
///
/// This is the only thing that distinguishes club follows, event follows and
/// post likes; the toggle itself is implemented once per store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Membership {
    ClubFollowers,
    EventFollowers,
    PostLikes,
}

impl Membership {
    /// Resource kind owning the set.
    #[must_use]
    pub const fn resource(self) -> ResourceKind {
        match self {
            Self::ClubFollowers => ResourceKind::Club,
            Self::EventFollowers => ResourceKind::Event,
            Self::PostLikes => ResourceKind::ClubPost,
        }
    }

    /// `(parent table, membership table, parent key column)`.
    #[must_use]
    pub const fn tables(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::ClubFollowers => ("clubs", "club_followers", "club_id"),
            Self::EventFollowers => ("events", "event_followers", "event_id"),
            Self::PostLikes => ("club_posts", "post_likes", "post_id"),
        }
    }
}

/// Persistent storage for users, clubs, posts and events.
///
/// Read operations take an optional `viewer` used to compute
/// `is_followed` / `is_liked`.
#[async_trait]
pub trait Store: Send + Sync {
    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Insert a user. Duplicate usernames fail with [`StoreError::Conflict`].
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>>;

    /// Returns `false` when no such user existed.
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;

    // ------------------------------------------------------------------
    // Clubs
    // ------------------------------------------------------------------

    async fn list_clubs(&self, viewer: Option<Uuid>) -> StoreResult<Vec<Club>>;

    async fn find_club(&self, id: Uuid, viewer: Option<Uuid>) -> StoreResult<Option<Club>>;

    /// Insert a club. Duplicate names fail with [`StoreError::Conflict`].
    async fn insert_club(&self, club: NewClub) -> StoreResult<Club>;

    async fn update_club(
        &self,
        id: Uuid,
        changes: ClubChanges,
        viewer: Option<Uuid>,
    ) -> StoreResult<Option<Club>>;

    /// Delete a club together with its posts.
    async fn delete_club(&self, id: Uuid) -> StoreResult<bool>;

    // ------------------------------------------------------------------
    // Club posts
    // ------------------------------------------------------------------

    /// Posts of one club, newest first.
    async fn list_club_posts(&self, club_id: Uuid, viewer: Option<Uuid>)
        -> StoreResult<Vec<ClubPost>>;

    async fn find_post(&self, id: Uuid, viewer: Option<Uuid>) -> StoreResult<Option<ClubPost>>;

    async fn insert_post(&self, post: NewClubPost) -> StoreResult<ClubPost>;

    async fn update_post(
        &self,
        id: Uuid,
        changes: ClubPostChanges,
        viewer: Option<Uuid>,
    ) -> StoreResult<Option<ClubPost>>;

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool>;

    /// Posts liked by `user_id`, newest first.
    async fn list_liked_posts(&self, user_id: Uuid) -> StoreResult<Vec<ClubPost>>;

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// All events ordered by date.
    async fn list_events(&self, viewer: Option<Uuid>) -> StoreResult<Vec<Event>>;

    async fn find_event(&self, id: Uuid, viewer: Option<Uuid>) -> StoreResult<Option<Event>>;

    async fn insert_event(&self, event: NewEvent) -> StoreResult<Event>;

    async fn update_event(
        &self,
        id: Uuid,
        changes: EventChanges,
        viewer: Option<Uuid>,
    ) -> StoreResult<Option<Event>>;

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool>;

    /// Events followed by `user_id`, ordered by date.
    async fn list_followed_events(&self, user_id: Uuid) -> StoreResult<Vec<Event>>;

    // ------------------------------------------------------------------
    // Memberships
    // ------------------------------------------------------------------

    /// Atomically flip `user_id`'s presence in the set.
    ///
    /// Returns `Some(true)` if the user is now a member, `Some(false)` if not,
    /// and `None` if the target entity does not exist.
    async fn toggle_membership(
        &self,
        set: Membership,
        target: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<bool>>;

    // ------------------------------------------------------------------
    // Token revocation
    // ------------------------------------------------------------------

    /// Blacklist a refresh token ID. Returns `false` if it was already revoked.
    async fn revoke_token(&self, jti: Uuid, expires_at: DateTime<Utc>) -> StoreResult<bool>;

    async fn is_token_revoked(&self, jti: Uuid) -> StoreResult<bool>;
}
