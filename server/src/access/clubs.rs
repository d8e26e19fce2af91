//! Club operations.

use futures::future::try_join;
use uuid::Uuid;
use validator::Validate;

use super::{acting_user, not_found, ResourceAccess};
use crate::clubs::types::{CreateClubRequest, UpdateClubRequest};
use crate::db::{Club, ClubChanges, ClubPost, Membership, NewClub};
use crate::error::ApiResult;
use crate::permissions::{Action, Identity, ResourceKind};

impl ResourceAccess {
    /// Public club list.
    pub async fn list_clubs(&self, identity: &Identity) -> ApiResult<Vec<Club>> {
        self.authorize(identity, Action::List, ResourceKind::Club)?;
        Ok(self.store.list_clubs(identity.user_id()).await?)
    }

    /// Public club detail with its posts, newest first.
    pub async fn get_club(&self, identity: &Identity, id: Uuid) -> ApiResult<(Club, Vec<ClubPost>)> {
        self.authorize(identity, Action::Retrieve, ResourceKind::Club)?;
        let viewer = identity.user_id();

        let (club, posts) = try_join(
            self.store.find_club(id, viewer),
            self.store.list_club_posts(id, viewer),
        )
        .await?;
        let club = club.ok_or_else(|| not_found(ResourceKind::Club))?;

        Ok((club, posts))
    }

    pub async fn admin_list_clubs(&self, identity: &Identity) -> ApiResult<Vec<Club>> {
        self.authorize(identity, Action::Inspect, ResourceKind::Club)?;
        Ok(self.store.list_clubs(identity.user_id()).await?)
    }

    pub async fn admin_get_club(&self, identity: &Identity, id: Uuid) -> ApiResult<Club> {
        self.authorize(identity, Action::Inspect, ResourceKind::Club)?;
        self.store
            .find_club(id, identity.user_id())
            .await?
            .ok_or_else(|| not_found(ResourceKind::Club))
    }

    #[tracing::instrument(skip_all, fields(name = %req.name))]
    pub async fn create_club(&self, identity: &Identity, req: CreateClubRequest) -> ApiResult<Club> {
        self.authorize(identity, Action::Create, ResourceKind::Club)?;
        req.validate()?;
        let actor = acting_user(identity)?;

        let club = self
            .store
            .insert_club(NewClub {
                name: req.name,
                description: req.description,
                image: req.image,
                content: req.content,
                files: req.files,
                created_by: actor.id,
            })
            .await?;

        tracing::info!(club_id = %club.id, created_by = %actor.id, "Club created");
        Ok(club)
    }

    #[tracing::instrument(skip_all, fields(club_id = %id))]
    pub async fn update_club(
        &self,
        identity: &Identity,
        id: Uuid,
        req: UpdateClubRequest,
    ) -> ApiResult<Club> {
        self.authorize(identity, Action::Update, ResourceKind::Club)?;
        req.validate()?;

        let changes = ClubChanges {
            name: req.name,
            description: req.description,
            image: req.image,
            content: req.content,
            files: req.files,
        };

        self.store
            .update_club(id, changes, identity.user_id())
            .await?
            .ok_or_else(|| not_found(ResourceKind::Club))
    }

    /// Delete a club and, with it, all of its posts.
    #[tracing::instrument(skip_all, fields(club_id = %id))]
    pub async fn delete_club(&self, identity: &Identity, id: Uuid) -> ApiResult<()> {
        self.authorize(identity, Action::Delete, ResourceKind::Club)?;

        if !self.store.delete_club(id).await? {
            return Err(not_found(ResourceKind::Club));
        }

        tracing::info!(club_id = %id, "Club deleted");
        Ok(())
    }

    /// Follow or unfollow. Returns whether the caller now follows the club.
    #[tracing::instrument(skip_all, fields(club_id = %id))]
    pub async fn toggle_club_follow(&self, identity: &Identity, id: Uuid) -> ApiResult<bool> {
        self.toggle(identity, Membership::ClubFollowers, id).await
    }
}
