use super::{page, render_failed};
use crate::{
    auth::{session::current_session, AuthClient},
    views::Views,
};
use axum::{extract::Extension, http::HeaderMap, http::StatusCode, response::Response};
use std::sync::Arc;
use tracing::instrument;

/// `GET /welcome`: server-rendered greeting for the current session.
#[instrument(skip_all)]
pub async fn welcome(
    headers: HeaderMap,
    Extension(auth): Extension<Arc<dyn AuthClient>>,
    Extension(views): Extension<Arc<Views>>,
) -> Response {
    let session = current_session(auth.as_ref(), &headers).await;
    match views.welcome(session.as_ref()) {
        Ok(html) => page(StatusCode::OK, Vec::new(), html),
        Err(err) => render_failed(&err),
    }
}
