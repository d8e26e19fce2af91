//! Permission system types and utilities.
//!
//! Every request carries an [`Identity`]; the [`AccessPolicy`] decides what
//! that identity may do with each [`ResourceKind`].

pub mod identity;
pub mod policy;

pub use identity::{AuthUser, Identity, Role};
pub use policy::{AccessError, AccessPolicy, Action, ResourceKind};
