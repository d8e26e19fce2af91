//! `PostgreSQL` store.
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).
//!
//! All query functions include error context logging to aid debugging.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::error;
use uuid::Uuid;

use super::models::{
    Club, ClubChanges, ClubPost, ClubPostChanges, Event, EventChanges, NewClub, NewClubPost,
    NewEvent, NewUser, User, UserChanges,
};
use super::store::{Membership, Store, StoreResult};

/// Log and return a database error with context.
///
/// This helper ensures all database errors are logged with relevant context
/// before being propagated, making production debugging easier.
macro_rules! db_error {
    ($query:expr) => {
        |e| {
            error!(query = $query, error = %e, "Database query failed");
            e
        }
    };
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

// ============================================================================
// Projections
// ============================================================================

/// Club projection; `$1` is the viewer (nullable).
const CLUB_SELECT: &str = r"
    SELECT c.id, c.name, c.description, c.image, c.content, c.files, c.created_by,
           u.username AS created_by_username,
           (SELECT COUNT(*) FROM club_followers f WHERE f.club_id = c.id) AS followers_count,
           EXISTS(
               SELECT 1 FROM club_followers f WHERE f.club_id = c.id AND f.user_id = $1
           ) AS is_followed,
           c.created_at, c.updated_at
    FROM clubs c
    JOIN users u ON u.id = c.created_by
";

/// Club post projection; `$1` is the viewer (nullable).
const POST_SELECT: &str = r"
    SELECT p.id, p.club_id, p.title, p.content, p.image, p.file, p.is_public, p.created_by,
           u.username AS author_username,
           (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS likes_count,
           EXISTS(
               SELECT 1 FROM post_likes l WHERE l.post_id = p.id AND l.user_id = $1
           ) AS is_liked,
           p.created_at, p.updated_at
    FROM club_posts p
    JOIN users u ON u.id = p.created_by
";

/// Event projection; `$1` is the viewer (nullable).
const EVENT_SELECT: &str = r"
    SELECT e.id, e.title, e.description, e.date, e.created_by,
           u.username AS created_by_username,
           (SELECT COUNT(*) FROM event_followers f WHERE f.event_id = e.id) AS followers_count,
           EXISTS(
               SELECT 1 FROM event_followers f WHERE f.event_id = e.id AND f.user_id = $1
           ) AS is_followed,
           e.created_at, e.updated_at
    FROM events e
    JOIN users u ON u.id = e.created_by
";

/// Store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append `, column = value` for every `Some` entry.
fn push_set<'a, T>(builder: &mut QueryBuilder<'a, Postgres>, column: &str, value: Option<T>)
where
    T: 'a + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres> + Send,
{
    if let Some(value) = value {
        builder.push(", ").push(column).push(" = ").push_bind(value);
    }
}

#[async_trait]
impl Store for PgStore {
    // ========================================================================
    // User Queries
    // ========================================================================

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY username")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error!("list_users"))?;
        Ok(users)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error!("find_user", user_id = %id))?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error!("find_user_by_username", username = %username))?;
        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (id, username, email, password_hash, is_admin, profile_image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            ",
        )
        .bind(Uuid::now_v7())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(&user.profile_image)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let mut builder = QueryBuilder::new("UPDATE users SET updated_at = NOW()");
        push_set(&mut builder, "username", changes.username);
        push_set(&mut builder, "email", changes.email);
        push_set(&mut builder, "password_hash", changes.password_hash);
        for flag in ["is_admin", "is_superuser", "is_staff"] {
            push_set(&mut builder, flag, changes.is_admin);
        }
        push_set(&mut builder, "profile_image", changes.profile_image);
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING *");

        let user = builder
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error!("delete_user", user_id = %id))?;
        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Club Queries
    // ========================================================================

    async fn list_clubs(&self, viewer: Option<Uuid>) -> StoreResult<Vec<Club>> {
        let clubs = sqlx::query_as::<_, Club>(&format!("{CLUB_SELECT} ORDER BY c.name"))
            .bind(viewer)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error!("list_clubs"))?;
        Ok(clubs)
    }

    async fn find_club(&self, id: Uuid, viewer: Option<Uuid>) -> StoreResult<Option<Club>> {
        let club = sqlx::query_as::<_, Club>(&format!("{CLUB_SELECT} WHERE c.id = $2"))
            .bind(viewer)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error!("find_club", club_id = %id))?;
        Ok(club)
    }

    async fn insert_club(&self, club: NewClub) -> StoreResult<Club> {
        let id = Uuid::now_v7();
        sqlx::query(
            r"
            INSERT INTO clubs (id, name, description, image, content, files, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(id)
        .bind(&club.name)
        .bind(&club.description)
        .bind(&club.image)
        .bind(&club.content)
        .bind(Json(&club.files))
        .bind(club.created_by)
        .execute(&self.pool)
        .await?;

        let created = self.find_club(id, Some(club.created_by)).await?;
        created.ok_or_else(|| sqlx::Error::RowNotFound.into())
    }

    async fn update_club(
        &self,
        id: Uuid,
        changes: ClubChanges,
        viewer: Option<Uuid>,
    ) -> StoreResult<Option<Club>> {
        let mut builder = QueryBuilder::new("UPDATE clubs SET updated_at = NOW()");
        push_set(&mut builder, "name", changes.name);
        push_set(&mut builder, "description", changes.description);
        push_set(&mut builder, "image", changes.image);
        push_set(&mut builder, "content", changes.content);
        push_set(&mut builder, "files", changes.files.map(Json));
        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING id");

        let updated: Option<Uuid> = builder
            .build_query_scalar()
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(id) => self.find_club(id, viewer).await,
            None => Ok(None),
        }
    }

    async fn delete_club(&self, id: Uuid) -> StoreResult<bool> {
        // club_posts and memberships go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM clubs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error!("delete_club", club_id = %id))?;
        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Club Post Queries
    // ========================================================================

    async fn list_club_posts(
        &self,
        club_id: Uuid,
        viewer: Option<Uuid>,
    ) -> StoreResult<Vec<ClubPost>> {
        let posts = sqlx::query_as::<_, ClubPost>(&format!(
            "{POST_SELECT} WHERE p.club_id = $2 ORDER BY p.created_at DESC, p.id DESC"
        ))
        .bind(viewer)
        .bind(club_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error!("list_club_posts", club_id = %club_id))?;
        Ok(posts)
    }

    async fn find_post(&self, id: Uuid, viewer: Option<Uuid>) -> StoreResult<Option<ClubPost>> {
        let post = sqlx::query_as::<_, ClubPost>(&format!("{POST_SELECT} WHERE p.id = $2"))
            .bind(viewer)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error!("find_post", post_id = %id))?;
        Ok(post)
    }

    async fn insert_post(&self, post: NewClubPost) -> StoreResult<ClubPost> {
        let id = Uuid::now_v7();
        sqlx::query(
            r"
            INSERT INTO club_posts (id, club_id, title, content, image, file, is_public, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(id)
        .bind(post.club_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.image)
        .bind(&post.file)
        .bind(post.is_public)
        .bind(post.created_by)
        .execute(&self.pool)
        .await
        .map_err(db_error!("insert_post", club_id = %post.club_id))?;

        let created = self.find_post(id, Some(post.created_by)).await?;
        created.ok_or_else(|| sqlx::Error::RowNotFound.into())
    }

    async fn update_post(
        &self,
        id: Uuid,
        changes: ClubPostChanges,
        viewer: Option<Uuid>,
    ) -> StoreResult<Option<ClubPost>> {
        let mut builder = QueryBuilder::new("UPDATE club_posts SET updated_at = NOW()");
        push_set(&mut builder, "title", changes.title);
        push_set(&mut builder, "content", changes.content);
        push_set(&mut builder, "image", changes.image);
        push_set(&mut builder, "file", changes.file);
        push_set(&mut builder, "is_public", changes.is_public);
        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING id");

        let updated: Option<Uuid> = builder
            .build_query_scalar()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error!("update_post", post_id = %id))?;

        match updated {
            Some(id) => self.find_post(id, viewer).await,
            None => Ok(None),
        }
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM club_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error!("delete_post", post_id = %id))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_liked_posts(&self, user_id: Uuid) -> StoreResult<Vec<ClubPost>> {
        let posts = sqlx::query_as::<_, ClubPost>(&format!(
            "{POST_SELECT}
             WHERE p.id IN (SELECT post_id FROM post_likes WHERE user_id = $1)
             ORDER BY p.created_at DESC, p.id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error!("list_liked_posts", user_id = %user_id))?;
        Ok(posts)
    }

    // ========================================================================
    // Event Queries
    // ========================================================================

    async fn list_events(&self, viewer: Option<Uuid>) -> StoreResult<Vec<Event>> {
        let events =
            sqlx::query_as::<_, Event>(&format!("{EVENT_SELECT} ORDER BY e.date, e.id"))
                .bind(viewer)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error!("list_events"))?;
        Ok(events)
    }

    async fn find_event(&self, id: Uuid, viewer: Option<Uuid>) -> StoreResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!("{EVENT_SELECT} WHERE e.id = $2"))
            .bind(viewer)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error!("find_event", event_id = %id))?;
        Ok(event)
    }

    async fn insert_event(&self, event: NewEvent) -> StoreResult<Event> {
        let id = Uuid::now_v7();
        sqlx::query(
            r"
            INSERT INTO events (id, title, description, date, created_by)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(event.created_by)
        .execute(&self.pool)
        .await
        .map_err(db_error!("insert_event"))?;

        let created = self.find_event(id, Some(event.created_by)).await?;
        created.ok_or_else(|| sqlx::Error::RowNotFound.into())
    }

    async fn update_event(
        &self,
        id: Uuid,
        changes: EventChanges,
        viewer: Option<Uuid>,
    ) -> StoreResult<Option<Event>> {
        let mut builder = QueryBuilder::new("UPDATE events SET updated_at = NOW()");
        push_set(&mut builder, "title", changes.title);
        push_set(&mut builder, "description", changes.description);
        push_set(&mut builder, "date", changes.date);
        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING id");

        let updated: Option<Uuid> = builder
            .build_query_scalar()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error!("update_event", event_id = %id))?;

        match updated {
            Some(id) => self.find_event(id, viewer).await,
            None => Ok(None),
        }
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error!("delete_event", event_id = %id))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_followed_events(&self, user_id: Uuid) -> StoreResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "{EVENT_SELECT}
             WHERE e.id IN (SELECT event_id FROM event_followers WHERE user_id = $1)
             ORDER BY e.date, e.id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error!("list_followed_events", user_id = %user_id))?;
        Ok(events)
    }

    // ========================================================================
    // Membership Queries
    // ========================================================================

    /// Check-and-flip inside one transaction.
    ///
    /// The parent row is locked `FOR UPDATE` first, so concurrent toggles on
    /// the same entity are serialized and each one observes the previous
    /// one's result.
    async fn toggle_membership(
        &self,
        set: Membership,
        target: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<bool>> {
        let (parent, members, key) = set.tables();
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> =
            sqlx::query_scalar(&format!("SELECT id FROM {parent} WHERE id = $1 FOR UPDATE"))
                .bind(target)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error!("toggle_membership.lock", table = parent, target = %target))?;

        if locked.is_none() {
            return Ok(None);
        }

        let removed = sqlx::query(&format!(
            "DELETE FROM {members} WHERE {key} = $1 AND user_id = $2"
        ))
        .bind(target)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error!("toggle_membership.delete", table = members, target = %target))?
        .rows_affected();

        let now_member = if removed == 0 {
            sqlx::query(&format!(
                "INSERT INTO {members} ({key}, user_id) VALUES ($1, $2)"
            ))
            .bind(target)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error!("toggle_membership.insert", table = members, target = %target))?;
            true
        } else {
            false
        };

        tx.commit().await?;
        Ok(Some(now_member))
    }

    // ========================================================================
    // Revoked Token Queries
    // ========================================================================

    async fn revoke_token(&self, jti: Uuid, expires_at: DateTime<Utc>) -> StoreResult<bool> {
        // Expired tokens fail validation on their own
        let pruned = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await
            .map_err(db_error!("prune_revoked_tokens"))?;
        if pruned.rows_affected() > 0 {
            tracing::debug!(count = pruned.rows_affected(), "Pruned expired revoked tokens");
        }

        let result = sqlx::query(
            r"
            INSERT INTO revoked_tokens (jti, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (jti) DO NOTHING
            ",
        )
        .bind(jti)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(db_error!("revoke_token", jti = %jti))?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_token_revoked(&self, jti: Uuid) -> StoreResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE jti = $1)")
                .bind(jti)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error!("is_token_revoked", jti = %jti))?;
        Ok(result.0)
    }
}
