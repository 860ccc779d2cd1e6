use super::{flash, page, render_failed, see_other, take_toast, FAILED_SIGN_OUT, SIGNED_OUT};
use crate::{
    api::AppConfig,
    auth::{session::current_session, AuthClient, CALLBACK_URL},
    views::{Toast, Views},
};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, error, instrument};

pub const SIGN_IN_URL: &str = "/sign-in";

/// `GET /dashboard`
#[instrument(skip_all)]
pub async fn dashboard(
    headers: HeaderMap,
    Extension(auth): Extension<Arc<dyn AuthClient>>,
    Extension(views): Extension<Arc<Views>>,
    Extension(config): Extension<Arc<AppConfig>>,
) -> Response {
    let Some(session) = current_session(auth.as_ref(), &headers).await else {
        debug!("No session, redirecting to sign-in");
        return Redirect::temporary(SIGN_IN_URL).into_response();
    };

    let (toast, cookies) = take_toast(&headers, &config);
    match views.dashboard(&session, toast.as_ref()) {
        Ok(html) => page(StatusCode::OK, cookies, html),
        Err(err) => render_failed(&err),
    }
}

/// `POST /sign-out`
#[instrument(skip_all)]
pub async fn sign_out(
    headers: HeaderMap,
    Extension(auth): Extension<Arc<dyn AuthClient>>,
    Extension(config): Extension<Arc<AppConfig>>,
) -> Response {
    match auth.sign_out(&headers).await {
        Ok(response) => {
            let mut cookies = response.cookies;
            cookies.extend(flash(&config, &Toast::success(SIGNED_OUT)));
            see_other(SIGN_IN_URL, cookies)
        }
        Err(err) => {
            error!("Sign-out failed: {err}");
            let cookies = flash(&config, &Toast::error(FAILED_SIGN_OUT))
                .into_iter()
                .collect();
            see_other(CALLBACK_URL, cookies)
        }
    }
}
