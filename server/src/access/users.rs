//! Account operations.
//!
//! Plaintext passwords stop here: they are hashed before any store call.

use uuid::Uuid;
use validator::Validate;

use super::{acting_user, not_found, ResourceAccess};
use crate::auth::hash_password;
use crate::db::{NewUser, User, UserChanges};
use crate::error::ApiResult;
use crate::permissions::{Action, Identity, ResourceKind};
use crate::users::types::{
    AdminCreateUserRequest, AdminUpdateUserRequest, RegisterRequest, UpdateMeRequest,
};

fn hash_optional(password: Option<&str>) -> ApiResult<Option<String>> {
    Ok(password.map(hash_password).transpose()?)
}

impl ResourceAccess {
    /// Open registration. New accounts never carry a privilege flag.
    #[tracing::instrument(skip_all, fields(username = %req.username))]
    pub async fn register(&self, identity: &Identity, req: RegisterRequest) -> ApiResult<User> {
        self.authorize(identity, Action::Register, ResourceKind::User)?;
        req.validate()?;

        let user = self
            .store
            .insert_user(NewUser {
                password_hash: Some(hash_password(&req.password)?),
                username: req.username,
                email: req.email.unwrap_or_default(),
                is_admin: false,
                profile_image: req.profile_image,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// The caller's own account.
    pub async fn me(&self, identity: &Identity) -> ApiResult<User> {
        self.authorize(identity, Action::ViewSelf, ResourceKind::User)?;
        let actor = acting_user(identity)?;

        self.store
            .find_user(actor.id)
            .await?
            .ok_or_else(|| not_found(ResourceKind::User))
    }

    /// Self-service profile update. The admin flag cannot be changed here.
    #[tracing::instrument(skip_all)]
    pub async fn update_me(&self, identity: &Identity, req: UpdateMeRequest) -> ApiResult<User> {
        self.authorize(identity, Action::UpdateSelf, ResourceKind::User)?;
        req.validate()?;
        let actor = acting_user(identity)?;

        let changes = UserChanges {
            password_hash: hash_optional(req.password.as_deref())?,
            username: req.username,
            email: req.email,
            is_admin: None,
            profile_image: req.profile_image,
        };

        let user = self
            .store
            .update_user(actor.id, changes)
            .await?
            .ok_or_else(|| not_found(ResourceKind::User))?;

        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    pub async fn admin_list_users(&self, identity: &Identity) -> ApiResult<Vec<User>> {
        self.authorize(identity, Action::List, ResourceKind::User)?;
        Ok(self.store.list_users().await?)
    }

    pub async fn admin_get_user(&self, identity: &Identity, id: Uuid) -> ApiResult<User> {
        self.authorize(identity, Action::Retrieve, ResourceKind::User)?;
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| not_found(ResourceKind::User))
    }

    #[tracing::instrument(skip_all, fields(username = %req.username))]
    pub async fn admin_create_user(
        &self,
        identity: &Identity,
        req: AdminCreateUserRequest,
    ) -> ApiResult<User> {
        self.authorize(identity, Action::Create, ResourceKind::User)?;
        req.validate()?;

        let user = self
            .store
            .insert_user(NewUser {
                password_hash: hash_optional(req.password.as_deref())?,
                username: req.username,
                email: req.email.unwrap_or_default(),
                is_admin: req.is_admin,
                profile_image: req.profile_image,
            })
            .await?;

        tracing::info!(user_id = %user.id, is_admin = user.is_admin, "User created by admin");
        Ok(user)
    }

    #[tracing::instrument(skip_all, fields(user_id = %id))]
    pub async fn admin_update_user(
        &self,
        identity: &Identity,
        id: Uuid,
        req: AdminUpdateUserRequest,
    ) -> ApiResult<User> {
        self.authorize(identity, Action::Update, ResourceKind::User)?;
        req.validate()?;

        let changes = UserChanges {
            password_hash: hash_optional(req.password.as_deref())?,
            username: req.username,
            email: req.email,
            is_admin: req.is_admin,
            profile_image: req.profile_image,
        };

        self.store
            .update_user(id, changes)
            .await?
            .ok_or_else(|| not_found(ResourceKind::User))
    }

    #[tracing::instrument(skip_all, fields(user_id = %id))]
    pub async fn admin_delete_user(&self, identity: &Identity, id: Uuid) -> ApiResult<()> {
        self.authorize(identity, Action::Delete, ResourceKind::User)?;

        if !self.store.delete_user(id).await? {
            return Err(not_found(ResourceKind::User));
        }

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
