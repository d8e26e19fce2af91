//! Permission evaluator.
//!
//! Pure predicates deciding whether a role may perform an action on a kind
//! of resource. No I/O happens here.

use serde::Serialize;
use thiserror::Error;

use super::identity::{Identity, Role};

/// Kind of resource an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Club,
    ClubPost,
    Event,
    User,
}

impl ResourceKind {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Club, Self::ClubPost, Self::Event, Self::User]
    }
}

/// Action requested against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// List the public representation.
    List,
    /// Fetch one public representation.
    Retrieve,
    /// Read the administrative representation (owner, timestamps).
    Inspect,
    Create,
    Update,
    Delete,
    /// Follow a club/event or like a post on one's own behalf.
    ToggleMembership,
    /// Open account registration.
    Register,
    /// Read one's own account.
    ViewSelf,
    /// Self-service profile update.
    UpdateSelf,
    /// List the events one follows or the posts one liked.
    ListOwnMemberships,
}

impl Action {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::List,
            Self::Retrieve,
            Self::Inspect,
            Self::Create,
            Self::Update,
            Self::Delete,
            Self::ToggleMembership,
            Self::Register,
            Self::ViewSelf,
            Self::UpdateSelf,
            Self::ListOwnMemberships,
        ]
    }

    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}

/// Authorization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No identity where one is required.
    #[error("Authentication required")]
    Unauthorized,

    /// Identity lacks the required role.
    #[error("You do not have permission to perform this action")]
    Forbidden,
}

/// Deployment-level knobs for the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Whether listing/retrieving events needs an authenticated identity.
    pub events_require_auth_to_read: bool,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            events_require_auth_to_read: true,
        }
    }
}

impl AccessPolicy {
    /// Decide whether `role` may perform `action` on `resource`.
    #[must_use]
    pub const fn allows(&self, role: Role, action: Action, resource: ResourceKind) -> bool {
        if role.is_admin() {
            return true;
        }
        let authenticated = matches!(role, Role::User);

        match action {
            Action::List | Action::Retrieve => match resource {
                ResourceKind::Club | ResourceKind::ClubPost => true,
                ResourceKind::Event => authenticated || !self.events_require_auth_to_read,
                ResourceKind::User => false,
            },
            Action::ToggleMembership => {
                authenticated
                    && matches!(
                        resource,
                        ResourceKind::Club | ResourceKind::ClubPost | ResourceKind::Event
                    )
            }
            Action::Register => matches!(resource, ResourceKind::User),
            Action::ViewSelf | Action::UpdateSelf => {
                authenticated && matches!(resource, ResourceKind::User)
            }
            Action::ListOwnMemberships => {
                authenticated && matches!(resource, ResourceKind::ClubPost | ResourceKind::Event)
            }
            Action::Inspect | Action::Create | Action::Update | Action::Delete => false,
        }
    }

    /// Like [`allows`](Self::allows) but reports the failure kind.
    ///
    /// Anonymous callers get [`AccessError::Unauthorized`], everyone else
    /// [`AccessError::Forbidden`].
    pub fn authorize(
        &self,
        identity: &Identity,
        action: Action,
        resource: ResourceKind,
    ) -> Result<(), AccessError> {
        let role = identity.role();
        if self.allows(role, action, resource) {
            return Ok(());
        }

        tracing::warn!(
            user_id = ?identity.user_id(),
            ?role,
            ?action,
            ?resource,
            "Access denied"
        );

        match role {
            Role::Anonymous => Err(AccessError::Unauthorized),
            Role::User | Role::Admin => Err(AccessError::Forbidden),
        }
    }
}
