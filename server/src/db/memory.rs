//! In-process store.
//!
//! Used when no `DATABASE_URL` is configured and by the test suites. All state
//! sits behind one `RwLock`, so every operation (the membership toggle
//! included) is atomic with respect to every other.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{
    Club, ClubChanges, ClubPost, ClubPostChanges, Event, EventChanges, NewClub, NewClubPost,
    NewEvent, NewUser, User, UserChanges,
};
use super::store::{Membership, Store, StoreError, StoreResult};

#[derive(Debug, Clone)]
struct ClubRecord {
    id: Uuid,
    name: String,
    description: String,
    image: Option<String>,
    content: String,
    files: Vec<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct PostRecord {
    id: Uuid,
    club_id: Uuid,
    title: String,
    content: String,
    image: Option<String>,
    file: Option<String>,
    is_public: bool,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct EventRecord {
    id: Uuid,
    title: String,
    description: String,
    date: DateTime<Utc>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Newest first, same tie-break as the SQL `ORDER BY`.
fn newest_first(mut posts: Vec<ClubPost>) -> Vec<ClubPost> {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    posts
}

fn by_date(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    events
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    clubs: HashMap<Uuid, ClubRecord>,
    posts: HashMap<Uuid, PostRecord>,
    events: HashMap<Uuid, EventRecord>,
    /// `(set, target)` -> members
    memberships: HashMap<(Membership, Uuid), BTreeSet<Uuid>>,
    /// jti -> token expiry
    revoked_tokens: HashMap<Uuid, DateTime<Utc>>,
}

impl Tables {
    fn members(&self, set: Membership, target: Uuid) -> Option<&BTreeSet<Uuid>> {
        self.memberships.get(&(set, target))
    }

    fn count(&self, set: Membership, target: Uuid) -> i64 {
        self.members(set, target)
            .map_or(0, |m| i64::try_from(m.len()).unwrap_or(i64::MAX))
    }

    fn contains(&self, set: Membership, target: Uuid, viewer: Option<Uuid>) -> bool {
        viewer.is_some_and(|v| self.members(set, target).is_some_and(|m| m.contains(&v)))
    }

    fn username(&self, id: Uuid) -> String {
        self.users
            .get(&id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn target_exists(&self, set: Membership, target: Uuid) -> bool {
        match set {
            Membership::ClubFollowers => self.clubs.contains_key(&target),
            Membership::EventFollowers => self.events.contains_key(&target),
            Membership::PostLikes => self.posts.contains_key(&target),
        }
    }

    fn club_view(&self, club: &ClubRecord, viewer: Option<Uuid>) -> Club {
        Club {
            id: club.id,
            name: club.name.clone(),
            description: club.description.clone(),
            image: club.image.clone(),
            content: club.content.clone(),
            files: Json(club.files.clone()),
            created_by: club.created_by,
            created_by_username: self.username(club.created_by),
            followers_count: self.count(Membership::ClubFollowers, club.id),
            is_followed: self.contains(Membership::ClubFollowers, club.id, viewer),
            created_at: club.created_at,
            updated_at: club.updated_at,
        }
    }

    fn post_view(&self, post: &PostRecord, viewer: Option<Uuid>) -> ClubPost {
        ClubPost {
            id: post.id,
            club_id: post.club_id,
            title: post.title.clone(),
            content: post.content.clone(),
            image: post.image.clone(),
            file: post.file.clone(),
            is_public: post.is_public,
            created_by: post.created_by,
            author_username: self.username(post.created_by),
            likes_count: self.count(Membership::PostLikes, post.id),
            is_liked: self.contains(Membership::PostLikes, post.id, viewer),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }

    fn event_view(&self, event: &EventRecord, viewer: Option<Uuid>) -> Event {
        Event {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            created_by: event.created_by,
            created_by_username: self.username(event.created_by),
            followers_count: self.count(Membership::EventFollowers, event.id),
            is_followed: self.contains(Membership::EventFollowers, event.id, viewer),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }

    fn remove_post(&mut self, id: Uuid) -> bool {
        self.memberships.remove(&(Membership::PostLikes, id));
        self.posts.remove(&id).is_some()
    }

    fn remove_club(&mut self, id: Uuid) -> bool {
        if self.clubs.remove(&id).is_none() {
            return false;
        }
        let post_ids: Vec<Uuid> = self
            .posts
            .values()
            .filter(|p| p.club_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in post_ids {
            self.remove_post(post_id);
        }
        self.memberships.remove(&(Membership::ClubFollowers, id));
        true
    }

    fn remove_event(&mut self, id: Uuid) -> bool {
        self.memberships.remove(&(Membership::EventFollowers, id));
        self.events.remove(&id).is_some()
    }
}

/// Store keeping everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("Username".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            is_admin: user.is_admin,
            is_staff: false,
            is_superuser: false,
            profile_image: user.profile_image,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        if let Some(ref username) = changes.username {
            if tables
                .users
                .values()
                .any(|u| u.id != id && &u.username == username)
            {
                return Err(StoreError::Conflict("Username".to_string()));
            }
        }

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = Some(hash);
        }
        if let Some(is_admin) = changes.is_admin {
            user.is_admin = is_admin;
            user.is_superuser = is_admin;
            user.is_staff = is_admin;
        }
        if let Some(image) = changes.profile_image {
            user.profile_image = image;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }

        // Mirror the ON DELETE CASCADE foreign keys.
        let clubs: Vec<Uuid> = tables
            .clubs
            .values()
            .filter(|c| c.created_by == id)
            .map(|c| c.id)
            .collect();
        for club in clubs {
            tables.remove_club(club);
        }
        let posts: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.created_by == id)
            .map(|p| p.id)
            .collect();
        for post in posts {
            tables.remove_post(post);
        }
        let events: Vec<Uuid> = tables
            .events
            .values()
            .filter(|e| e.created_by == id)
            .map(|e| e.id)
            .collect();
        for event in events {
            tables.remove_event(event);
        }
        for members in tables.memberships.values_mut() {
            members.remove(&id);
        }
        Ok(true)
    }

    async fn list_clubs(&self, viewer: Option<Uuid>) -> StoreResult<Vec<Club>> {
        let tables = self.tables.read().await;
        let mut clubs: Vec<Club> = tables
            .clubs
            .values()
            .map(|c| tables.club_view(c, viewer))
            .collect();
        clubs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(clubs)
    }

    async fn find_club(&self, id: Uuid, viewer: Option<Uuid>) -> StoreResult<Option<Club>> {
        let tables = self.tables.read().await;
        Ok(tables.clubs.get(&id).map(|c| tables.club_view(c, viewer)))
    }

    async fn insert_club(&self, club: NewClub) -> StoreResult<Club> {
        let mut tables = self.tables.write().await;
        if tables.clubs.values().any(|c| c.name == club.name) {
            return Err(StoreError::Conflict("Club name".to_string()));
        }

        let now = Utc::now();
        let record = ClubRecord {
            id: Uuid::now_v7(),
            name: club.name,
            description: club.description,
            image: club.image,
            content: club.content,
            files: club.files,
            created_by: club.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.clubs.insert(record.id, record.clone());
        Ok(tables.club_view(&record, Some(record.created_by)))
    }

    async fn update_club(
        &self,
        id: Uuid,
        changes: ClubChanges,
        viewer: Option<Uuid>,
    ) -> StoreResult<Option<Club>> {
        let mut tables = self.tables.write().await;
        if let Some(ref name) = changes.name {
            if tables.clubs.values().any(|c| c.id != id && &c.name == name) {
                return Err(StoreError::Conflict("Club name".to_string()));
            }
        }

        let Some(club) = tables.clubs.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            club.name = name;
        }
        if let Some(description) = changes.description {
            club.description = description;
        }
        if let Some(image) = changes.image {
            club.image = image;
        }
        if let Some(content) = changes.content {
            club.content = content;
        }
        if let Some(files) = changes.files {
            club.files = files;
        }
        club.updated_at = Utc::now();

        let club = club.clone();
        Ok(Some(tables.club_view(&club, viewer)))
    }

    async fn delete_club(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.remove_club(id))
    }

    async fn list_club_posts(
        &self,
        club_id: Uuid,
        viewer: Option<Uuid>,
    ) -> StoreResult<Vec<ClubPost>> {
        let tables = self.tables.read().await;
        let posts = tables
            .posts
            .values()
            .filter(|p| p.club_id == club_id)
            .map(|p| tables.post_view(p, viewer))
            .collect();
        Ok(newest_first(posts))
    }

    async fn find_post(&self, id: Uuid, viewer: Option<Uuid>) -> StoreResult<Option<ClubPost>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).map(|p| tables.post_view(p, viewer)))
    }

    async fn insert_post(&self, post: NewClubPost) -> StoreResult<ClubPost> {
        let mut tables = self.tables.write().await;
        if !tables.clubs.contains_key(&post.club_id) {
            return Err(StoreError::Database(sqlx::Error::RowNotFound));
        }

        let now = Utc::now();
        let record = PostRecord {
            id: Uuid::now_v7(),
            club_id: post.club_id,
            title: post.title,
            content: post.content,
            image: post.image,
            file: post.file,
            is_public: post.is_public,
            created_by: post.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(record.id, record.clone());
        Ok(tables.post_view(&record, Some(record.created_by)))
    }

    async fn update_post(
        &self,
        id: Uuid,
        changes: ClubPostChanges,
        viewer: Option<Uuid>,
    ) -> StoreResult<Option<ClubPost>> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.posts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(image) = changes.image {
            post.image = image;
        }
        if let Some(file) = changes.file {
            post.file = file;
        }
        if let Some(is_public) = changes.is_public {
            post.is_public = is_public;
        }
        post.updated_at = Utc::now();

        let post = post.clone();
        Ok(Some(tables.post_view(&post, viewer)))
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.remove_post(id))
    }

    async fn list_liked_posts(&self, user_id: Uuid) -> StoreResult<Vec<ClubPost>> {
        let tables = self.tables.read().await;
        let posts = tables
            .posts
            .values()
            .filter(|p| tables.contains(Membership::PostLikes, p.id, Some(user_id)))
            .map(|p| tables.post_view(p, Some(user_id)))
            .collect();
        Ok(newest_first(posts))
    }

    async fn list_events(&self, viewer: Option<Uuid>) -> StoreResult<Vec<Event>> {
        let tables = self.tables.read().await;
        let events = tables
            .events
            .values()
            .map(|e| tables.event_view(e, viewer))
            .collect();
        Ok(by_date(events))
    }

    async fn find_event(&self, id: Uuid, viewer: Option<Uuid>) -> StoreResult<Option<Event>> {
        let tables = self.tables.read().await;
        Ok(tables.events.get(&id).map(|e| tables.event_view(e, viewer)))
    }

    async fn insert_event(&self, event: NewEvent) -> StoreResult<Event> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let record = EventRecord {
            id: Uuid::now_v7(),
            title: event.title,
            description: event.description,
            date: event.date,
            created_by: event.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.events.insert(record.id, record.clone());
        Ok(tables.event_view(&record, Some(record.created_by)))
    }

    async fn update_event(
        &self,
        id: Uuid,
        changes: EventChanges,
        viewer: Option<Uuid>,
    ) -> StoreResult<Option<Event>> {
        let mut tables = self.tables.write().await;
        let Some(event) = tables.events.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            event.title = title;
        }
        if let Some(description) = changes.description {
            event.description = description;
        }
        if let Some(date) = changes.date {
            event.date = date;
        }
        event.updated_at = Utc::now();

        let event = event.clone();
        Ok(Some(tables.event_view(&event, viewer)))
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.remove_event(id))
    }

    async fn list_followed_events(&self, user_id: Uuid) -> StoreResult<Vec<Event>> {
        let tables = self.tables.read().await;
        let events = tables
            .events
            .values()
            .filter(|e| tables.contains(Membership::EventFollowers, e.id, Some(user_id)))
            .map(|e| tables.event_view(e, Some(user_id)))
            .collect();
        Ok(by_date(events))
    }

    async fn toggle_membership(
        &self,
        set: Membership,
        target: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<bool>> {
        let mut tables = self.tables.write().await;
        if !tables.target_exists(set, target) {
            return Ok(None);
        }

        let members = tables.memberships.entry((set, target)).or_default();
        if members.remove(&user_id) {
            Ok(Some(false))
        } else {
            members.insert(user_id);
            Ok(Some(true))
        }
    }

    async fn revoke_token(&self, jti: Uuid, expires_at: DateTime<Utc>) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        tables.revoked_tokens.retain(|_, exp| *exp >= now);

        if tables.revoked_tokens.contains_key(&jti) {
            return Ok(false);
        }
        tables.revoked_tokens.insert(jti, expires_at);
        Ok(true)
    }

    async fn is_token_revoked(&self, jti: Uuid) -> StoreResult<bool> {
        Ok(self.tables.read().await.revoked_tokens.contains_key(&jti))
    }
}
