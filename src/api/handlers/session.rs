use crate::auth::{session::current_session, AuthClient, Session};
use axum::{extract::Extension, http::HeaderMap, response::Json};
use std::sync::Arc;
use tracing::instrument;

#[utoipa::path(
    get,
    path= "/api/session",
    responses (
        (status = 200, description = "Current session, or null when signed out", body = Option<Session>)
    ),
    tag = "session",
)]
/// Session bound to the request's cookies, `null` when signed out.
#[instrument(skip_all)]
pub async fn session(
    headers: HeaderMap,
    Extension(auth): Extension<Arc<dyn AuthClient>>,
) -> Json<Option<Session>> {
    Json(current_session(auth.as_ref(), &headers).await)
}
