//! Typed client for the cloud-disk file storage and sharing API.
//!
//! - [`api`]: one async function per backend operation, all sharing the
//!   `{code, msg, data}` envelope handling in [`api::client`].
//! - [`auth`]: bearer token persistence behind [`auth::TokenStorage`] and
//!   unverified claim decoding.
//! - [`session`]: login/logout/restore on top of both.
//! - [`config`]: base URL and timeout from the environment.

pub mod api;
pub mod auth;
pub mod config;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, ApiError};
pub use auth::{token_payload, TokenClaims, TokenStorage, TokenStore};
pub use config::ClientConfig;
pub use session::{Session, SessionError};
