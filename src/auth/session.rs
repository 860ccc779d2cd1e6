//! Session retrieval for request handlers.

use super::{AuthClient, Session};
use axum::http::HeaderMap;
use tracing::error;

/// Resolve the session bound to the request's cookies.
///
/// Any failure talking to the auth service is logged and treated as "no
/// session", so guarded pages fall back to the sign-in flow.
pub async fn current_session(auth: &dyn AuthClient, headers: &HeaderMap) -> Option<Session> {
    match auth.get_session(headers).await {
        Ok(session) => session,
        Err(err) => {
            error!("Failed to retrieve session: {err}");
            None
        }
    }
}
