use crate::auth::CALLBACK_URL;
use axum::response::Redirect;

/// `GET /` sends the browser to the dashboard, which bounces anonymous
/// visitors to sign-in.
pub async fn root() -> Redirect {
    Redirect::temporary(CALLBACK_URL)
}
