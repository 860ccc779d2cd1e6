use super::{
    flash, page, render_failed, see_other, sign_in::failure_status, take_toast, ACCOUNT_CREATED,
    FAILED_SIGN_UP,
};
use crate::{
    api::AppConfig,
    auth::{session::current_session, types::SignUpEmailRequest, AuthClient, CALLBACK_URL},
    forms::{FieldErrors, SignUpForm},
    views::{Toast, Views},
};
use axum::{
    extract::{Extension, Form},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{error, instrument, warn};

fn render(
    views: &Views,
    status: StatusCode,
    form: &SignUpForm,
    errors: &FieldErrors,
    toast: Option<&Toast>,
    cookies: Vec<HeaderValue>,
) -> Response {
    match views.sign_up(form, errors, toast) {
        Ok(html) => page(status, cookies, html),
        Err(err) => render_failed(&err),
    }
}

/// `GET /sign-up`
#[instrument(skip_all)]
pub async fn sign_up_page(
    headers: HeaderMap,
    Extension(auth): Extension<Arc<dyn AuthClient>>,
    Extension(views): Extension<Arc<Views>>,
    Extension(config): Extension<Arc<AppConfig>>,
) -> Response {
    if current_session(auth.as_ref(), &headers).await.is_some() {
        return Redirect::temporary(CALLBACK_URL).into_response();
    }

    let (toast, cookies) = take_toast(&headers, &config);
    render(
        &views,
        StatusCode::OK,
        &SignUpForm::default(),
        &FieldErrors::default(),
        toast.as_ref(),
        cookies,
    )
}

/// `POST /sign-up`
#[instrument(skip_all)]
pub async fn sign_up(
    headers: HeaderMap,
    Extension(auth): Extension<Arc<dyn AuthClient>>,
    Extension(views): Extension<Arc<Views>>,
    Extension(config): Extension<Arc<AppConfig>>,
    Form(form): Form<SignUpForm>,
) -> Response {
    if let Err(errors) = form.validate() {
        return render(
            &views,
            StatusCode::UNPROCESSABLE_ENTITY,
            &form,
            &errors,
            None,
            Vec::new(),
        );
    }

    let request = SignUpEmailRequest {
        name: form.name.clone(),
        email: form.email.clone(),
        password: form.password.clone(),
        callback_url: CALLBACK_URL.to_string(),
    };

    match auth.sign_up_email(&headers, &request).await {
        Ok(response) => {
            let mut cookies = response.cookies;
            cookies.extend(flash(&config, &Toast::success(ACCOUNT_CREATED)));
            see_other(CALLBACK_URL, cookies)
        }
        Err(err) => {
            if err.is_rejection() {
                warn!("Sign-up rejected: {err}");
            } else {
                error!("Sign-up failed: {err}");
            }
            let toast = Toast::error(err.user_message(FAILED_SIGN_UP));
            render(
                &views,
                failure_status(&err),
                &form,
                &FieldErrors::default(),
                Some(&toast),
                Vec::new(),
            )
        }
    }
}
