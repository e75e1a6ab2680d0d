//! Entry point handed to screens.
//!
//! # Design
//! `ClinicClient` wraps one `Executor` and hands out borrowed resource
//! clients (`client.doctors().list(..)`). It holds no state of its own beyond
//! the executor, so cloning it is cheap and every clone shares the same
//! transport and token store.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::executor::Executor;
use crate::http::HttpMethod;
use crate::resources::{AppointmentsApi, AuthApi, ChatApi, DoctorsApi, JournalApi};
use crate::token::TokenStore;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct ClinicClient {
    executor: Executor,
}

impl ClinicClient {
    /// Client using the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Ok(Self {
            executor: Executor::with_reqwest(config, tokens)?,
        })
    }

    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            executor: Executor::new(config, transport, tokens),
        }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.executor)
    }

    pub fn doctors(&self) -> DoctorsApi<'_> {
        DoctorsApi::new(&self.executor)
    }

    pub fn journal(&self) -> JournalApi<'_> {
        JournalApi::new(&self.executor)
    }

    pub fn appointments(&self) -> AppointmentsApi<'_> {
        AppointmentsApi::new(&self.executor)
    }

    pub fn chat(&self) -> ChatApi<'_> {
        ChatApi::new(&self.executor)
    }

    /// Probe `GET /health` outside the API prefix.
    pub async fn health_check(&self) -> Result<(), ApiError> {
        self.executor
            .execute_unprefixed(HttpMethod::Get, "/health")
            .await
            .map(drop)
            .inspect_err(|error| tracing::error!(%error, "health check failed"))
    }
}
