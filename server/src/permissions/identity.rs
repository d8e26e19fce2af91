//! Request principal.
//!
//! The underlying account carries three independent privilege flags
//! (`is_admin`, `is_staff`, `is_superuser`). They are collapsed into a single
//! [`Role`] here so nothing downstream ever ORs booleans again.

use serde::Serialize;
use uuid::Uuid;

use crate::db::User;

/// Effective role of a request principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// No (valid) credentials were presented.
    Anonymous,
    /// Regular authenticated account.
    User,
    /// Account holding any of the privilege flags.
    Admin,
}

impl Role {
    /// Compute the role of an authenticated account from its stored flags.
    ///
    /// Any single flag is sufficient for [`Role::Admin`].
    #[must_use]
    pub const fn from_flags(is_admin: bool, is_staff: bool, is_superuser: bool) -> Self {
        if is_admin || is_staff || is_superuser {
            Self::Admin
        } else {
            Self::User
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Authenticated account attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Effective role (never [`Role::Anonymous`]).
    pub role: Role,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: Role::from_flags(user.is_admin, user.is_staff, user.is_superuser),
        }
    }
}

/// The principal making a request.
///
/// Passed explicitly into every access-layer operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(AuthUser),
}

impl Identity {
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Anonymous => Role::Anonymous,
            Self::Authenticated(user) => user.role,
        }
    }

    /// ID of the authenticated account, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user.id),
        }
    }

    #[must_use]
    pub const fn auth_user(&self) -> Option<&AuthUser> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self::Authenticated(AuthUser::from(user))
    }
}
