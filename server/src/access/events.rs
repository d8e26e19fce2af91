//! Event operations.

use uuid::Uuid;
use validator::Validate;

use super::{acting_user, not_found, ResourceAccess};
use crate::db::{Event, EventChanges, Membership, NewEvent};
use crate::error::ApiResult;
use crate::events::types::{CreateEventRequest, UpdateEventRequest};
use crate::permissions::{Action, Identity, ResourceKind};

impl ResourceAccess {
    /// All events ordered by date.
    pub async fn list_events(&self, identity: &Identity) -> ApiResult<Vec<Event>> {
        self.authorize(identity, Action::List, ResourceKind::Event)?;
        Ok(self.store.list_events(identity.user_id()).await?)
    }

    pub async fn get_event(&self, identity: &Identity, id: Uuid) -> ApiResult<Event> {
        self.authorize(identity, Action::Retrieve, ResourceKind::Event)?;
        self.store
            .find_event(id, identity.user_id())
            .await?
            .ok_or_else(|| not_found(ResourceKind::Event))
    }

    #[tracing::instrument(skip_all, fields(title = %req.title))]
    pub async fn create_event(
        &self,
        identity: &Identity,
        req: CreateEventRequest,
    ) -> ApiResult<Event> {
        self.authorize(identity, Action::Create, ResourceKind::Event)?;
        req.validate()?;
        let actor = acting_user(identity)?;

        let event = self
            .store
            .insert_event(NewEvent {
                title: req.title,
                description: req.description,
                date: req.date,
                created_by: actor.id,
            })
            .await?;

        tracing::info!(event_id = %event.id, created_by = %actor.id, "Event created");
        Ok(event)
    }

    #[tracing::instrument(skip_all, fields(event_id = %id))]
    pub async fn update_event(
        &self,
        identity: &Identity,
        id: Uuid,
        req: UpdateEventRequest,
    ) -> ApiResult<Event> {
        self.authorize(identity, Action::Update, ResourceKind::Event)?;
        req.validate()?;

        let changes = EventChanges {
            title: req.title,
            description: req.description,
            date: req.date,
        };

        self.store
            .update_event(id, changes, identity.user_id())
            .await?
            .ok_or_else(|| not_found(ResourceKind::Event))
    }

    #[tracing::instrument(skip_all, fields(event_id = %id))]
    pub async fn delete_event(&self, identity: &Identity, id: Uuid) -> ApiResult<()> {
        self.authorize(identity, Action::Delete, ResourceKind::Event)?;

        if !self.store.delete_event(id).await? {
            return Err(not_found(ResourceKind::Event));
        }

        tracing::info!(event_id = %id, "Event deleted");
        Ok(())
    }

    /// Follow or unfollow. Returns whether the caller now follows the event.
    #[tracing::instrument(skip_all, fields(event_id = %id))]
    pub async fn toggle_event_follow(&self, identity: &Identity, id: Uuid) -> ApiResult<bool> {
        self.toggle(identity, Membership::EventFollowers, id).await
    }

    /// Events the caller follows, ordered by date.
    pub async fn my_followed_events(&self, identity: &Identity) -> ApiResult<Vec<Event>> {
        self.authorize(identity, Action::ListOwnMemberships, ResourceKind::Event)?;
        let actor = acting_user(identity)?;
        Ok(self.store.list_followed_events(actor.id).await?)
    }
}
