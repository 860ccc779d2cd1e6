//! In-memory [`AuthClient`] for handler tests.

use super::{
    types::{Session, SessionMeta, SignInEmailRequest, SignInSocialRequest, SignUpEmailRequest, User},
    AuthClient, AuthError, AuthResponse,
};
use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    GetSession,
    SignInEmail { email: String, password: String },
    SignInSocial { provider: String },
    SignUpEmail { name: String, email: String, password: String },
    SignOut,
}

/// How the stub answers mutating calls.
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Succeed,
    Reject(String),
    Unreachable,
}

pub(crate) struct StubAuthClient {
    session: Option<Session>,
    session_fails: bool,
    outcome: Outcome,
    calls: Mutex<Vec<Call>>,
}

pub(crate) const SESSION_COOKIE: &str = "better-auth.session_token=stub; Path=/; HttpOnly";

pub(crate) fn sample_session() -> Session {
    Session {
        session: SessionMeta {
            id: "s1".to_string(),
            user_id: "u1".to_string(),
            token: "stub".to_string(),
            expires_at: "2026-11-01T00:00:00.000Z".to_string(),
            created_at: None,
            updated_at: None,
            ip_address: None,
            user_agent: None,
        },
        user: User {
            id: "u1".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            email_verified: true,
            image: None,
            created_at: None,
            updated_at: None,
        },
    }
}

impl StubAuthClient {
    pub(crate) fn signed_out() -> Self {
        Self {
            session: None,
            session_fails: false,
            outcome: Outcome::Succeed,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn signed_in() -> Self {
        Self {
            session: Some(sample_session()),
            ..Self::signed_out()
        }
    }

    pub(crate) fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub(crate) fn with_failing_session(mut self) -> Self {
        self.session_fails = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Calls other than session lookups.
    pub(crate) fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| *call != Call::GetSession)
            .collect()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn respond(&self, redirect_url: Option<String>) -> Result<AuthResponse, AuthError> {
        match &self.outcome {
            Outcome::Succeed => Ok(AuthResponse {
                cookies: vec![HeaderValue::from_static(SESSION_COOKIE)],
                redirect_url,
                user: self.session.as_ref().map(|s| s.user.clone()),
            }),
            Outcome::Reject(message) => Err(AuthError::Rejected {
                status: 401,
                code: None,
                message: message.clone(),
            }),
            Outcome::Unreachable => Err(AuthError::InvalidResponse("stub unreachable".to_string())),
        }
    }
}

#[async_trait]
impl AuthClient for StubAuthClient {
    async fn get_session(&self, _headers: &HeaderMap) -> Result<Option<Session>, AuthError> {
        self.record(Call::GetSession);
        if self.session_fails {
            return Err(AuthError::InvalidResponse("stub session failure".to_string()));
        }
        Ok(self.session.clone())
    }

    async fn sign_in_email(
        &self,
        _headers: &HeaderMap,
        request: &SignInEmailRequest,
    ) -> Result<AuthResponse, AuthError> {
        self.record(Call::SignInEmail {
            email: request.email.clone(),
            password: request.password.clone(),
        });
        self.respond(None)
    }

    async fn sign_in_social(
        &self,
        _headers: &HeaderMap,
        request: &SignInSocialRequest,
    ) -> Result<AuthResponse, AuthError> {
        self.record(Call::SignInSocial {
            provider: request.provider.clone(),
        });
        self.respond(Some(
            "https://github.com/login/oauth/authorize?client_id=stub".to_string(),
        ))
    }

    async fn sign_up_email(
        &self,
        _headers: &HeaderMap,
        request: &SignUpEmailRequest,
    ) -> Result<AuthResponse, AuthError> {
        self.record(Call::SignUpEmail {
            name: request.name.clone(),
            email: request.email.clone(),
            password: request.password.clone(),
        });
        self.respond(None)
    }

    async fn sign_out(&self, _headers: &HeaderMap) -> Result<AuthResponse, AuthError> {
        self.record(Call::SignOut);
        self.respond(None)
    }
}
