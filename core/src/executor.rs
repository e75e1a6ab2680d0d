//! Async half of the request executor.
//!
//! # Design
//! `Executor` owns the three things every call needs: the resolved
//! `ClientConfig`, a `Transport`, and the `TokenStore` it reads the access
//! token from. It is cheap to clone and shares all three behind `Arc`s.
//!
//! One call is one attempt. The transport future is raced against the
//! configured timeout with `tokio::time::timeout`, so whichever side loses is
//! dropped on the spot: no timer outlives a fast response and no response is
//! awaited after the deadline.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::request::{build_request, parse_response, RequestDescriptor};
use crate::token::{self, TokenStore};
use crate::transport::{ReqwestTransport, Transport};

#[derive(Clone)]
pub struct Executor {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
}

impl Executor {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            tokens,
        }
    }

    /// Executor using the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn with_reqwest(
        config: ClientConfig,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::new(config, Arc::new(transport), tokens))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &dyn TokenStore {
        self.tokens.as_ref()
    }

    /// Perform one call against `config.api_root() + descriptor.endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Timeout` when no response arrives in time,
    /// `ApiError::Network` when the transport fails, and `ApiError::Server`
    /// for non-2xx responses.
    pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<Value, ApiError> {
        let token = token::read_access_token(self.tokens.as_ref()).await;
        let request = build_request(&self.config, &descriptor, token.as_deref())?;
        self.dispatch(request).await
    }

    /// Like `execute`, but against `base_url + path`, outside the API prefix.
    pub(crate) async fn execute_unprefixed(
        &self,
        method: HttpMethod,
        path: &str,
    ) -> Result<Value, ApiError> {
        let descriptor = RequestDescriptor::new(method, path);
        let token = token::read_access_token(self.tokens.as_ref()).await;
        let mut request = build_request(&self.config, &descriptor, token.as_deref())?;
        request.path = format!("{}{}", self.config.base_url, path);
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<Value, ApiError> {
        let method = request.method;
        let url = request.path.clone();
        tracing::debug!(
            %method,
            %url,
            authenticated = request.header("authorization").is_some(),
            "sending request"
        );

        let outcome = tokio::time::timeout(self.config.timeout, self.transport.send(request)).await;
        let response = match outcome {
            Err(_elapsed) => {
                tracing::error!(
                    %method,
                    %url,
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    "request timed out"
                );
                return Err(ApiError::Timeout {
                    timeout: self.config.timeout,
                });
            }
            Ok(Err(source)) => {
                tracing::error!(
                    %method,
                    %url,
                    error = %source,
                    "request failed before a response arrived"
                );
                return Err(ApiError::Network {
                    base_url: self.config.base_url.clone(),
                    source,
                });
            }
            Ok(Ok(response)) => response,
        };

        tracing::debug!(%method, %url, status = response.status, "received response");
        parse_response(&response)
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value, ApiError> {
        let descriptor = RequestDescriptor::new(HttpMethod::Get, endpoint);
        self.execute(descriptor).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &B,
    ) -> Result<Value, ApiError> {
        let descriptor = RequestDescriptor::new(HttpMethod::Post, endpoint).json(payload)?;
        self.execute(descriptor).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &B,
    ) -> Result<Value, ApiError> {
        let descriptor = RequestDescriptor::new(HttpMethod::Put, endpoint).json(payload)?;
        self.execute(descriptor).await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &B,
    ) -> Result<Value, ApiError> {
        let descriptor = RequestDescriptor::new(HttpMethod::Patch, endpoint).json(payload)?;
        self.execute(descriptor).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Value, ApiError> {
        let descriptor = RequestDescriptor::new(HttpMethod::Delete, endpoint);
        self.execute(descriptor).await
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
