use super::{
    types::{
        AuthCallBody, ErrorBody, Session, SignInEmailRequest, SignInSocialRequest,
        SignUpEmailRequest,
    },
    AuthClient, AuthError, AuthResponse,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::{
    header::{COOKIE, ORIGIN, SET_COOKIE},
    HeaderMap, HeaderValue, StatusCode,
};
use reqwest::{redirect::Policy, Client, Method, RequestBuilder};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// [`AuthClient`] backed by the auth service's REST API.
#[derive(Debug, Clone)]
pub struct HttpAuthClient {
    client: Client,
    base_url: String,
    origin: HeaderValue,
}

impl HttpAuthClient {
    /// Build a client for the API rooted at `base_url`; `app_url` is sent as
    /// the `Origin` of every call. Form posts reach here only after the
    /// router has matched the browser's origin against the same URL.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or `app_url` has no
    /// usable origin.
    pub fn new(base_url: Url, app_url: Url, timeout: Duration) -> Result<Self> {
        let origin = app_url.origin().ascii_serialization();
        let origin = HeaderValue::from_str(&origin)
            .with_context(|| format!("Invalid app origin: {origin}"))?;

        // Social sign-in answers with a provider URL; never follow it here.
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .context("Failed to build auth HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            origin,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, headers: &HeaderMap) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, self.endpoint(path))
            .header(ORIGIN, self.origin.clone());

        for name in [COOKIE.as_str(), FORWARDED_FOR] {
            if let Some(value) = headers.get(name) {
                builder = builder.header(name, value.clone());
            }
        }

        builder
    }

    async fn post<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        headers: &HeaderMap,
        body: &B,
    ) -> Result<AuthResponse, AuthError> {
        let response = self
            .request(Method::POST, path, headers)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let cookies: Vec<HeaderValue> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .cloned()
            .collect();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(rejection(status, &bytes));
        }

        let body: AuthCallBody = if bytes.iter().all(u8::is_ascii_whitespace) {
            AuthCallBody::default()
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|err| AuthError::InvalidResponse(format!("{path}: {err}")))?
        };

        debug!(path, cookies = cookies.len(), "auth call succeeded");

        Ok(AuthResponse {
            cookies,
            redirect_url: body.url,
            user: body.user,
        })
    }
}

fn rejection(status: StatusCode, bytes: &[u8]) -> AuthError {
    let body: ErrorBody = serde_json::from_slice(bytes).unwrap_or_default();
    let message = body
        .message
        .filter(|m| !m.trim().is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

    warn!(status = status.as_u16(), code = ?body.code, "auth service rejected the call");

    AuthError::Rejected {
        status: status.as_u16(),
        code: body.code,
        message,
    }
}

#[async_trait]
impl AuthClient for HttpAuthClient {
    #[instrument(skip_all)]
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>, AuthError> {
        // No cookie means no session; skip the round trip.
        if !headers.contains_key(COOKIE) {
            return Ok(None);
        }

        let response = self
            .request(Method::GET, "get-session", headers)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(rejection(status, &bytes));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice::<Option<Session>>(&bytes)
            .map_err(|err| AuthError::InvalidResponse(format!("get-session: {err}")))
    }

    #[instrument(skip_all)]
    async fn sign_in_email(
        &self,
        headers: &HeaderMap,
        request: &SignInEmailRequest,
    ) -> Result<AuthResponse, AuthError> {
        self.post("sign-in/email", headers, request).await
    }

    #[instrument(skip_all, fields(provider = %request.provider))]
    async fn sign_in_social(
        &self,
        headers: &HeaderMap,
        request: &SignInSocialRequest,
    ) -> Result<AuthResponse, AuthError> {
        let response = self.post("sign-in/social", headers, request).await?;
        if response.redirect_url.is_none() {
            return Err(AuthError::InvalidResponse(
                "sign-in/social: missing provider url".to_string(),
            ));
        }
        Ok(response)
    }

    #[instrument(skip_all)]
    async fn sign_up_email(
        &self,
        headers: &HeaderMap,
        request: &SignUpEmailRequest,
    ) -> Result<AuthResponse, AuthError> {
        self.post("sign-up/email", headers, request).await
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, headers: &HeaderMap) -> Result<AuthResponse, AuthError> {
        self.post("sign-out", headers, &serde_json::json!({})).await
    }
}
