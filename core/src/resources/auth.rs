use crate::envelope::decode;
use crate::error::ApiError;
use crate::executor::Executor;
use crate::token;
use crate::types::{Credentials, NewUser, TokenPair, User};

use super::{rejected, require_text};

/// Sign-in, sign-up and session teardown.
pub struct AuthApi<'a> {
    executor: &'a Executor,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(executor: &'a Executor) -> Self {
        Self { executor }
    }

    /// Exchange credentials for tokens and persist them.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let email = require_text(email, "email")?;
        if password.is_empty() {
            return Err(rejected("password is required"));
        }

        let tokens: TokenPair = self
            .executor
            .post("/auth/login", &Credentials { email, password })
            .await
            .and_then(decode)
            .inspect_err(|error| tracing::error!(%error, "login failed"))?;

        token::save_tokens(self.executor.tokens(), &tokens)
            .await
            .inspect_err(|error| tracing::error!(%error, "could not persist tokens"))?;
        tracing::info!("signed in");
        Ok(tokens)
    }

    pub async fn register(&self, user: &NewUser) -> Result<User, ApiError> {
        require_text(&user.email, "email")?;
        if user.password.is_empty() {
            return Err(rejected("password is required"));
        }
        self.executor
            .post("/auth/register", user)
            .await
            .and_then(decode)
            .inspect_err(|error| tracing::error!(%error, "registration failed"))
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.executor
            .get("/auth/me")
            .await
            .and_then(decode)
            .inspect_err(|error| tracing::error!(%error, "failed to load current user"))
    }

    /// Forget both tokens. No request is sent.
    pub async fn logout(&self) -> Result<(), ApiError> {
        token::clear_tokens(self.executor.tokens())
            .await
            .inspect_err(|error| tracing::error!(%error, "could not clear tokens"))?;
        tracing::info!("signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::*;
    use crate::config::ClientConfig;
    use crate::testing::ScriptedTransport;
    use crate::token::{MemoryTokenStore, TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

    fn setup() -> (Arc<ScriptedTransport>, Arc<MemoryTokenStore>, Executor) {
        let transport = ScriptedTransport::new();
        let store = Arc::new(MemoryTokenStore::new());
        let exec = Executor::new(
            ClientConfig::new("http://localhost:8000"),
            transport.clone(),
            store.clone(),
        );
        (transport, store, exec)
    }

    #[tokio::test]
    async fn login_stores_both_tokens() {
        let (transport, store, exec) = setup();
        transport.push_json(
            200,
            json!({"access_token": "acc", "refresh_token": "ref", "token_type": "bearer"}),
        );

        let tokens = AuthApi::new(&exec).login(" pat@example.com ", "secret").await.unwrap();
        assert_eq!(tokens.access_token, "acc");

        let sent = transport.requests();
        assert_eq!(sent[0].path, "http://localhost:8000/api/v1/auth/login");
        let body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"email": "pat@example.com", "password": "secret"}));

        assert_eq!(store.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(), Some("acc"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).await.unwrap().as_deref(), Some("ref"));
    }

    #[tokio::test]
    async fn failed_login_keeps_existing_tokens() {
        let (transport, store, exec) = setup();
        store.set(ACCESS_TOKEN_KEY, "old").await.unwrap();
        transport.push_json(401, json!({"detail": "Incorrect email or password"}));

        let err = AuthApi::new(&exec).login("pat@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect email or password");
        assert_eq!(store.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn blank_credentials_never_reach_network() {
        let (transport, _store, exec) = setup();
        let auth = AuthApi::new(&exec);

        assert!(matches!(auth.login("  ", "pw").await, Err(ApiError::Validation(_))));
        assert!(matches!(auth.login("a@b.c", "").await, Err(ApiError::Validation(_))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn logout_clears_tokens_without_request() {
        let (transport, store, exec) = setup();
        store.set(ACCESS_TOKEN_KEY, "acc").await.unwrap();
        store.set(REFRESH_TOKEN_KEY, "ref").await.unwrap();

        AuthApi::new(&exec).logout().await.unwrap();

        assert_eq!(store.get(ACCESS_TOKEN_KEY).await.unwrap(), None);
        assert_eq!(store.get(REFRESH_TOKEN_KEY).await.unwrap(), None);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn current_user_sends_stored_token() {
        let (transport, store, exec) = setup();
        store.set(ACCESS_TOKEN_KEY, "acc").await.unwrap();
        transport.push_json(200, json!({"id": 1, "email": "pat@example.com", "full_name": "Pat"}));

        let user = AuthApi::new(&exec).current_user().await.unwrap();
        assert_eq!(user.full_name.as_deref(), Some("Pat"));
        assert_eq!(transport.requests()[0].header("authorization"), Some("Bearer acc"));
    }
}
