//! Go.Data API client
//!
//! Implements [`DestinationSystem`]. Go.Data requires a logged-in user for
//! every call, so the client logs in on first use and keeps the access token
//! for the rest of the run. [`DestinationSystem::login`] returns that same
//! session, which means the user logs in exactly once per client.

use super::models::{ActivateOutbreakRequest, LoginRequest, LoginResponse};
use crate::adapters::retry::retry_request;
use crate::adapters::traits::{DestinationSystem, UserSession};
use crate::config::{secret_string, GoDataConfig, SecretString};
use crate::domain::ids::OutbreakId;
use crate::domain::{BridgeError, CaseSubmission, GoDataError, Outbreak, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Cached login
struct Session {
    access_token: SecretString,
    user_id: String,
}

/// Go.Data client
pub struct GoDataClient {
    /// Base URL of the Go.Data instance, without a trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// Go.Data configuration
    config: GoDataConfig,

    /// Set by the first successful login
    session: OnceCell<Session>,
}

impl GoDataClient {
    /// Create a new Go.Data client
    ///
    /// No request is made until the first API call.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: GoDataConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            tracing::warn!(base_url = %base_url, "TLS verification disabled for Go.Data");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            BridgeError::Configuration(format!("Failed to build Go.Data HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url,
            client,
            config,
            session: OnceCell::new(),
        })
    }

    /// Get the base URL of the Go.Data instance
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if a session has been established
    pub fn is_authenticated(&self) -> bool {
        self.session.initialized()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Log in on first use, then return the cached session
    async fn session(&self) -> Result<&Session> {
        self.session
            .get_or_try_init(|| async {
                let url = self.url("users/login");
                tracing::info!(email = %self.config.email, "Logging in to Go.Data");

                let response: LoginResponse = retry_request(&self.config.retry, || async {
                    let body = LoginRequest {
                        email: &self.config.email,
                        password: self.config.password.expose_secret().as_ref(),
                    };
                    let resp = send(self.client.post(&url).json(&body)).await?;
                    let resp = check_status(resp, "users/login").await?;
                    decode(resp, "users/login").await
                })
                .await
                .map_err(|e| match e {
                    BridgeError::GoData(GoDataError::ClientError { status, message })
                        if status == 400 || status == 401 =>
                    {
                        BridgeError::GoData(GoDataError::AuthenticationFailed(message))
                    }
                    other => other,
                })?;

                tracing::info!(user_id = %response.user_id, "Go.Data login succeeded");

                Ok::<_, BridgeError>(Session {
                    access_token: secret_string(response.id),
                    user_id: response.user_id,
                })
            })
            .await
    }

    /// Attach the access token to a request
    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let session = self.session().await?;
        Ok(request.header(
            "Authorization",
            session.access_token.expose_secret().as_ref(),
        ))
    }
}

async fn send(request: RequestBuilder) -> Result<Response> {
    request
        .send()
        .await
        .map_err(|e| BridgeError::GoData(GoDataError::ConnectionFailed(e.to_string())))
}

/// Turn a non-success status into a [`GoDataError`]
async fn check_status(resp: Response, path: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = format!("{path}: {body}");
    let error = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GoDataError::AuthenticationFailed(message)
        }
        s if s.is_server_error() => GoDataError::ServerError {
            status: s.as_u16(),
            message,
        },
        s => GoDataError::ClientError {
            status: s.as_u16(),
            message,
        },
    };
    Err(BridgeError::GoData(error))
}

async fn decode<T: serde::de::DeserializeOwned>(resp: Response, path: &str) -> Result<T> {
    resp.json::<T>()
        .await
        .map_err(|e| BridgeError::GoData(GoDataError::InvalidResponse(format!("{path}: {e}"))))
}

#[async_trait]
impl DestinationSystem for GoDataClient {
    async fn get_outbreaks(&self) -> Result<Vec<Outbreak>> {
        let url = self.url("outbreaks");

        retry_request(&self.config.retry, || async {
            let request = self.authorized(self.client.get(&url)).await?;
            let resp = check_status(send(request).await?, "outbreaks").await?;
            decode::<Vec<Outbreak>>(resp, "outbreaks").await
        })
        .await
    }

    async fn login(&self) -> Result<UserSession> {
        let session = self.session().await?;
        Ok(UserSession {
            user_id: session.user_id.clone(),
        })
    }

    async fn activate_outbreak_for_user(
        &self,
        user_id: &str,
        outbreak: &OutbreakId,
    ) -> Result<()> {
        let path = format!("users/{user_id}");
        let url = self.url(&path);

        tracing::debug!(user_id = %user_id, outbreak = %outbreak, "Activating outbreak");

        retry_request(&self.config.retry, || async {
            let body = ActivateOutbreakRequest {
                active_outbreak_id: outbreak.as_str(),
            };
            let request = self.authorized(self.client.put(&url).json(&body)).await?;
            check_status(send(request).await?, &path).await?;
            Ok(())
        })
        .await
    }

    /// Sent exactly once: Go.Data may have stored the case even when the
    /// response is an error or never arrives.
    async fn create_outbreak_case(
        &self,
        outbreak: &OutbreakId,
        case: &CaseSubmission,
    ) -> Result<()> {
        let path = format!("outbreaks/{outbreak}/cases");
        let request = self
            .authorized(self.client.post(self.url(&path)).json(case))
            .await?;
        check_status(send(request).await?, &path).await?;
        Ok(())
    }
}
