//! `Clubhub` Server
//!
//! Community backend: clubs and their posts, events, and user accounts.
//! Every request resolves to an [`Identity`](permissions::Identity) that the
//! access layer checks before touching storage.

pub mod access;
pub mod api;
pub mod auth;
pub mod clubs;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod permissions;
pub mod users;
pub mod util;
