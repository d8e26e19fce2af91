//! Club post operations.

use uuid::Uuid;
use validator::Validate;

use super::{acting_user, not_found, ResourceAccess};
use crate::clubs::types::{CreatePostRequest, UpdatePostRequest};
use crate::db::{ClubPost, ClubPostChanges, Membership, NewClubPost};
use crate::error::ApiResult;
use crate::permissions::{Action, Identity, ResourceKind};

impl ResourceAccess {
    /// Posts of one club, newest first.
    pub async fn list_club_posts(
        &self,
        identity: &Identity,
        club_id: Uuid,
    ) -> ApiResult<Vec<ClubPost>> {
        self.authorize(identity, Action::List, ResourceKind::ClubPost)?;
        let viewer = identity.user_id();

        if self.store.find_club(club_id, viewer).await?.is_none() {
            return Err(not_found(ResourceKind::Club));
        }
        Ok(self.store.list_club_posts(club_id, viewer).await?)
    }

    pub async fn get_post(&self, identity: &Identity, id: Uuid) -> ApiResult<ClubPost> {
        self.authorize(identity, Action::Inspect, ResourceKind::ClubPost)?;
        self.store
            .find_post(id, identity.user_id())
            .await?
            .ok_or_else(|| not_found(ResourceKind::ClubPost))
    }

    /// Publish a post under `club_id`, authored by the caller.
    #[tracing::instrument(skip_all, fields(club_id = %club_id))]
    pub async fn create_post(
        &self,
        identity: &Identity,
        club_id: Uuid,
        req: CreatePostRequest,
    ) -> ApiResult<ClubPost> {
        self.authorize(identity, Action::Create, ResourceKind::ClubPost)?;
        req.validate()?;
        let actor = acting_user(identity)?;

        if self.store.find_club(club_id, None).await?.is_none() {
            return Err(not_found(ResourceKind::Club));
        }

        let post = self
            .store
            .insert_post(NewClubPost {
                club_id,
                title: req.title,
                content: req.content,
                image: req.image,
                file: req.file,
                is_public: req.is_public,
                created_by: actor.id,
            })
            .await?;

        tracing::info!(post_id = %post.id, created_by = %actor.id, "Post created");
        Ok(post)
    }

    #[tracing::instrument(skip_all, fields(post_id = %id))]
    pub async fn update_post(
        &self,
        identity: &Identity,
        id: Uuid,
        req: UpdatePostRequest,
    ) -> ApiResult<ClubPost> {
        self.authorize(identity, Action::Update, ResourceKind::ClubPost)?;
        req.validate()?;

        let changes = ClubPostChanges {
            title: req.title,
            content: req.content,
            image: req.image,
            file: req.file,
            is_public: req.is_public,
        };

        self.store
            .update_post(id, changes, identity.user_id())
            .await?
            .ok_or_else(|| not_found(ResourceKind::ClubPost))
    }

    #[tracing::instrument(skip_all, fields(post_id = %id))]
    pub async fn delete_post(&self, identity: &Identity, id: Uuid) -> ApiResult<()> {
        self.authorize(identity, Action::Delete, ResourceKind::ClubPost)?;

        if !self.store.delete_post(id).await? {
            return Err(not_found(ResourceKind::ClubPost));
        }

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Like or unlike. Returns whether the caller now likes the post.
    #[tracing::instrument(skip_all, fields(post_id = %id))]
    pub async fn toggle_post_like(&self, identity: &Identity, id: Uuid) -> ApiResult<bool> {
        self.toggle(identity, Membership::PostLikes, id).await
    }

    /// Posts the caller liked, newest first.
    pub async fn my_liked_posts(&self, identity: &Identity) -> ApiResult<Vec<ClubPost>> {
        self.authorize(identity, Action::ListOwnMemberships, ResourceKind::ClubPost)?;
        let actor = acting_user(identity)?;
        Ok(self.store.list_liked_posts(actor.id).await?)
    }
}
