//! Client side of the external auth service.
//!
//! The auth service owns users, password hashing, session tokens and OAuth.
//! This module only forwards calls to it. [`AuthClient`] is the seam handlers
//! depend on; [`HttpAuthClient`] is the production implementation.
//!
//! ## Cookies
//!
//! The browser never talks to the auth service directly. Each call forwards
//! the incoming `Cookie` header, and every `Set-Cookie` header in the reply is
//! returned in [`AuthResponse::cookies`] so the handler can relay it.

mod client;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod stub;

pub use client::HttpAuthClient;
pub use types::{Session, SessionMeta, User};

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue};
use thiserror::Error;

use self::types::{SignInEmailRequest, SignInSocialRequest, SignUpEmailRequest};

/// Where the auth flows send the browser after success.
pub const CALLBACK_URL: &str = "/dashboard";

#[derive(Debug, Error)]
pub enum AuthError {
    /// The auth service answered with a non-2xx status.
    #[error("{message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("auth service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected auth service response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    /// Message safe to show the user: the service's own message for a
    /// rejection, `fallback` for anything else.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Result of a successful call that may change the session.
#[derive(Debug, Clone, Default)]
pub struct AuthResponse {
    /// `Set-Cookie` values to relay to the browser.
    pub cookies: Vec<HeaderValue>,
    /// Provider URL for social sign-in.
    pub redirect_url: Option<String>,
    pub user: Option<User>,
}

#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Session bound to the cookies in `headers`, or `None` when signed out.
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>, AuthError>;

    async fn sign_in_email(
        &self,
        headers: &HeaderMap,
        request: &SignInEmailRequest,
    ) -> Result<AuthResponse, AuthError>;

    async fn sign_in_social(
        &self,
        headers: &HeaderMap,
        request: &SignInSocialRequest,
    ) -> Result<AuthResponse, AuthError>;

    async fn sign_up_email(
        &self,
        headers: &HeaderMap,
        request: &SignUpEmailRequest,
    ) -> Result<AuthResponse, AuthError>;

    async fn sign_out(&self, headers: &HeaderMap) -> Result<AuthResponse, AuthError>;
}
