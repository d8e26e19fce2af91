//! User Type Definitions

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::User;
use crate::permissions::Role;
use crate::util::{deserialize_double_option, media_url};

/// Letters, digits and `@ . + - _`.
pub static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

// ============================================================================
// Request Types
// ============================================================================

/// Open registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        regex(path = *USERNAME_REGEX, message = "Username may only contain letters, digits and @.+-_")
    )]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,
    pub profile_image: Option<String>,
}

/// Self-service profile update. The admin flag is not accepted here.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        regex(path = *USERNAME_REGEX, message = "Username may only contain letters, digits and @.+-_")
    )]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub profile_image: Option<Option<String>>,
}

/// Account created by an administrator. The password is optional; an account
/// without one cannot log in.
#[derive(Debug, Deserialize, Validate)]
pub struct AdminCreateUserRequest {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        regex(path = *USERNAME_REGEX, message = "Username may only contain letters, digits and @.+-_")
    )]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: Option<String>,
    #[serde(default, alias = "is_superuser")]
    pub is_admin: bool,
    pub profile_image: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        regex(path = *USERNAME_REGEX, message = "Username may only contain letters, digits and @.+-_")
    )]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: Option<String>,
    #[serde(alias = "is_superuser")]
    pub is_admin: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub profile_image: Option<Option<String>>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Account representation. The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Effective admin status, from any of the privilege flags.
    pub is_admin: bool,
    pub profile_image: Option<String>,
}

impl UserResponse {
    pub fn new(user: User, media_base: Option<&str>) -> Self {
        Self {
            id: user.id,
            is_admin: Role::from_flags(user.is_admin, user.is_staff, user.is_superuser).is_admin(),
            username: user.username,
            email: user.email,
            profile_image: user.profile_image.as_deref().map(|r| media_url(media_base, r)),
        }
    }
}
