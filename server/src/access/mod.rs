//! Resource Access Layer
//!
//! Every operation follows the same order: ask the permission evaluator,
//! validate the input, then touch the store. Handlers never talk to the
//! store directly.

mod clubs;
mod events;
mod posts;
mod users;


use std::sync::Arc;

use uuid::Uuid;

use crate::db::{Membership, Store};
use crate::error::{ApiError, ApiResult};
use crate::permissions::{AccessError, AccessPolicy, Action, AuthUser, Identity, ResourceKind};

/// Gatekeeper in front of the [`Store`].
#[derive(Clone)]
pub struct ResourceAccess {
    store: Arc<dyn Store>,
    policy: AccessPolicy,
}

impl ResourceAccess {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, policy: AccessPolicy) -> Self {
        Self { store, policy }
    }

    fn authorize(
        &self,
        identity: &Identity,
        action: Action,
        resource: ResourceKind,
    ) -> ApiResult<()> {
        Ok(self.policy.authorize(identity, action, resource)?)
    }

    /// Flip the caller's membership in `set` on `target`.
    async fn toggle(&self, identity: &Identity, set: Membership, target: Uuid) -> ApiResult<bool> {
        let resource = set.resource();
        self.authorize(identity, Action::ToggleMembership, resource)?;
        let actor = acting_user(identity)?;

        let now_member = self
            .store
            .toggle_membership(set, target, actor.id)
            .await?
            .ok_or_else(|| not_found(resource))?;

        tracing::info!(
            user_id = %actor.id,
            target = %target,
            set = ?set,
            now_member,
            "Membership toggled"
        );
        Ok(now_member)
    }
}

/// The authenticated account behind a write. Ownership is always stamped
/// from here, never from the request body.
fn acting_user(identity: &Identity) -> ApiResult<&AuthUser> {
    identity
        .auth_user()
        .ok_or(ApiError::Access(AccessError::Unauthorized))
}

const fn not_found(resource: ResourceKind) -> ApiError {
    ApiError::NotFound(match resource {
        ResourceKind::Club => "Club",
        ResourceKind::ClubPost => "Post",
        ResourceKind::Event => "Event",
        ResourceKind::User => "User",
    })
}
