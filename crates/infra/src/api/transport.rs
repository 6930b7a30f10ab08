//! Authenticated request execution against the control plane
//!
//! The transport owns authentication and the `/v1` path prefix, and hands
//! back whatever the server answered - raw body plus status code. Which
//! status counts as success for a given operation is the typed client's
//! call, not the transport's.

use std::sync::Arc;

use lattice_domain::{LatticeError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::auth::AccessTokenProvider;
use crate::config::{ControlPlaneConfig, USER_AGENT};
use crate::http::HttpClient;

/// Raw control plane response: status code plus unparsed body.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Executes one authenticated HTTP request per call against the `/v1` API.
pub struct ApiTransport {
    http: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    v1_base: String,
}

impl ApiTransport {
    pub fn new(config: &ControlPlaneConfig, auth: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.request_timeout)
            .retry_policy(config.retry.clone())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http, auth, v1_base: format!("{}/v1", config.base_url.trim_end_matches('/')) })
    }

    /// GET without a body.
    pub async fn get(&self, path: &str) -> Result<RawResponse> {
        self.send::<()>(Method::GET, path, None).await
    }

    /// DELETE without a body.
    pub async fn delete(&self, path: &str) -> Result<RawResponse> {
        self.send::<()>(Method::DELETE, path, None).await
    }

    /// POST with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, payload: &B) -> Result<RawResponse> {
        self.send(Method::POST, path, Some(payload)).await
    }

    /// PATCH with a JSON body.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<RawResponse> {
        self.send(Method::PATCH, path, Some(payload)).await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
    ) -> Result<RawResponse> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/{}", self.v1_base, path);

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json");
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }

        let response = self.http.send(builder).await?;
        let status = response.status();
        let body = response.text().await.map_err(|err| {
            LatticeError::Transport(format!("failed to read response body: {err}"))
        })?;

        debug!(%method, %url, status = status.as_u16(), "control plane response");
        Ok(RawResponse { status, body })
    }
}
