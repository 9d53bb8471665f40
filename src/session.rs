//! Login session: an API client paired with the persisted bearer token.
//!
//! Login and registration store the returned token, logout clears it, and
//! `restore` checks a token left over from an earlier run.

use thiserror::Error;

use crate::api::{self, ApiClient, ApiError};
use crate::api::types::LoginResult;
use crate::auth::{StorageError, TokenClaims, TokenStorage, TokenStore};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Not logged in")]
    NotLoggedIn,
}

pub struct Session<S: TokenStorage> {
    api: ApiClient,
    tokens: TokenStore<S>,
}

impl<S: TokenStorage> Session<S> {
    pub fn new(api: ApiClient, storage: S) -> Self {
        Self {
            api,
            tokens: TokenStore::new(storage),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn tokens(&self) -> &TokenStore<S> {
        &self.tokens
    }

    /// Log in and persist the returned token.
    pub async fn login(&self, name: &str, password: &str) -> Result<LoginResult, SessionError> {
        let result = api::login(&self.api, name, password).await?;
        self.tokens.set_token(&result.token)?;
        log::info!("Logged in as {}", result.name);
        Ok(result)
    }

    /// Register a new account and persist the returned token.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        code: &str,
    ) -> Result<LoginResult, SessionError> {
        let result = api::register(&self.api, name, email, password, code).await?;
        self.tokens.set_token(&result.token)?;
        log::info!("Registered and logged in as {}", result.name);
        Ok(result)
    }

    /// Forget the stored token. There is no server-side logout endpoint.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.tokens.clear_token()?;
        log::info!("Logged out");
        Ok(())
    }

    pub fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.tokens.get_token()?)
    }

    /// Stored token, or [`SessionError::NotLoggedIn`].
    pub fn require_token(&self) -> Result<String, SessionError> {
        self.token()?.ok_or(SessionError::NotLoggedIn)
    }

    /// Unverified claims of the stored token, for display only.
    pub fn claims(&self) -> Result<Option<TokenClaims>, SessionError> {
        Ok(self.token()?.as_deref().and_then(TokenClaims::from_token))
    }

    /// Check a previously stored token against the backend.
    ///
    /// Returns `false` when no token is stored. A token the backend rejects
    /// is cleared so the next call starts logged out. When the backend
    /// cannot be reached the token is kept and the error returned.
    pub async fn restore(&self) -> Result<bool, SessionError> {
        let token = match self.token()? {
            Some(token) => token,
            None => {
                log::info!("No stored token, session restore skipped");
                return Ok(false);
            }
        };

        match api::probe_token(&self.api, &token).await {
            Ok(()) => {
                log::info!("Stored token accepted");
                Ok(true)
            }
            Err(e) if e.is_unreachable() => {
                log::warn!("Backend unreachable, keeping stored token: {}", e);
                Err(e.into())
            }
            Err(e) => {
                log::info!("Stored token rejected ({}), clearing it", e);
                self.tokens.clear_token()?;
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use serde_json::json;

    use super::*;
    use crate::auth::MemoryStorage;
    use crate::testing::{closed_addr, err_envelope, ok_envelope, MockBackend};

    fn token_for(name: &str) -> String {
        let enc = |s: &str| base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(s.as_bytes());
        format!(
            "{}.{}.sig",
            enc(r#"{"alg":"HS256","typ":"JWT"}"#),
            enc(&json!({"Id": 1, "Identity": "u-1", "Name": name}).to_string())
        )
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let token = token_for("alice");
        let mock = MockBackend::new()
            .route(
                "/api/users/login",
                200,
                ok_envelope(json!({"token": token.clone(), "name": "alice"})),
            )
            .start()
            .await;

        let session = Session::new(mock.client(), MemoryStorage::new());
        assert!(matches!(session.require_token(), Err(SessionError::NotLoggedIn)));

        session.login("alice", "pw").await.unwrap();
        assert_eq!(session.require_token().unwrap(), token);

        let claims = session.claims().unwrap().unwrap();
        assert_eq!(claims.name.as_deref(), Some("alice"));
        assert_eq!(claims.identity.as_deref(), Some("u-1"));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_previous_token() {
        let mock = MockBackend::respond(200, err_envelope(1, "用户名或密码错误"))
            .start()
            .await;

        let session = Session::new(mock.client(), MemoryStorage::new());
        session.tokens().set_token("old").unwrap();

        let err = session.login("alice", "bad").await.unwrap_err();
        assert_eq!(err.to_string(), "用户名或密码错误");
        assert_eq!(session.token().unwrap().as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_register_stores_token() {
        let mock = MockBackend::respond(200, ok_envelope(json!({"token": "t.p.s", "name": "bob"})))
            .start()
            .await;
        let session = Session::new(mock.client(), MemoryStorage::new());
        session.register("bob", "b@x.y", "pw", "123456").await.unwrap();
        assert_eq!(session.token().unwrap().as_deref(), Some("t.p.s"));
    }

    #[tokio::test]
    async fn test_logout_clears_token() {
        let session = Session::new(ApiClient::new(&closed_addr()), MemoryStorage::new());
        session.tokens().set_token("t").unwrap();
        session.logout().unwrap();
        assert!(session.token().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_without_token() {
        let session = Session::new(ApiClient::new(&closed_addr()), MemoryStorage::new());
        assert!(!session.restore().await.unwrap());
    }

    #[tokio::test]
    async fn test_restore_keeps_accepted_token() {
        let mock = MockBackend::respond(200, ok_envelope(json!({"list": [], "count": 0})))
            .start()
            .await;
        let session = Session::new(mock.client(), MemoryStorage::new());
        session.tokens().set_token("good").unwrap();

        assert!(session.restore().await.unwrap());
        assert_eq!(session.token().unwrap().as_deref(), Some("good"));
        assert_eq!(mock.last_request().authorization.as_deref(), Some("Bearer good"));
    }

    #[tokio::test]
    async fn test_restore_clears_rejected_token() {
        let mock = MockBackend::respond(401, "").start().await;
        let session = Session::new(mock.client(), MemoryStorage::new());
        session.tokens().set_token("stale").unwrap();

        assert!(!session.restore().await.unwrap());
        assert!(session.token().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_clears_token_rejected_by_envelope() {
        let mock = MockBackend::respond(200, err_envelope(401, "token 无效"))
            .start()
            .await;
        let session = Session::new(mock.client(), MemoryStorage::new());
        session.tokens().set_token("stale").unwrap();

        assert!(!session.restore().await.unwrap());
        assert!(session.token().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_unreachable_backend_keeps_token() {
        let session = Session::new(ApiClient::new(&closed_addr()), MemoryStorage::new());
        session.tokens().set_token("t").unwrap();

        let err = session.restore().await.unwrap_err();
        assert!(matches!(err, SessionError::Api(ApiError::Network(_))));
        assert_eq!(session.token().unwrap().as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn test_restore_gateway_error_keeps_token() {
        let mock = MockBackend::respond(503, "").start().await;
        let session = Session::new(mock.client(), MemoryStorage::new());
        session.tokens().set_token("t").unwrap();

        assert!(session.restore().await.is_err());
        assert_eq!(session.token().unwrap().as_deref(), Some("t"));
    }
}
