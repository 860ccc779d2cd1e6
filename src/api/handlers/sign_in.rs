use super::{
    flash, page, render_failed, see_other, take_toast, FAILED_GITHUB, FAILED_SIGN_IN, SIGNED_IN,
};
use crate::{
    api::AppConfig,
    auth::{
        session::current_session,
        types::{SignInEmailRequest, SignInSocialRequest},
        AuthClient, AuthError, CALLBACK_URL,
    },
    forms::{FieldErrors, SignInForm},
    views::{Toast, Views},
};
use axum::{
    extract::{Extension, Form},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, instrument, warn};

pub const GITHUB: &str = "github";

#[derive(Debug, Deserialize)]
pub struct SocialForm {
    #[serde(default)]
    pub provider: String,
}

fn render(
    views: &Views,
    status: StatusCode,
    form: &SignInForm,
    errors: &FieldErrors,
    toast: Option<&Toast>,
    cookies: Vec<HeaderValue>,
) -> Response {
    match views.sign_in(form, errors, toast) {
        Ok(html) => page(status, cookies, html),
        Err(err) => render_failed(&err),
    }
}

/// Status for a failed auth call: the service's refusal is the client's
/// problem, anything else is ours.
pub(crate) const fn failure_status(err: &AuthError) -> StatusCode {
    if err.is_rejection() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    }
}

/// `GET /sign-in`
#[instrument(skip_all)]
pub async fn sign_in_page(
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
        &SignInForm::default(),
        &FieldErrors::default(),
        toast.as_ref(),
        cookies,
    )
}

/// `POST /sign-in`
#[instrument(skip_all)]
pub async fn sign_in(
    headers: HeaderMap,
    Extension(auth): Extension<Arc<dyn AuthClient>>,
    Extension(views): Extension<Arc<Views>>,
    Extension(config): Extension<Arc<AppConfig>>,
    Form(form): Form<SignInForm>,
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

    let request = SignInEmailRequest {
        email: form.email.clone(),
        password: form.password.clone(),
        callback_url: CALLBACK_URL.to_string(),
    };

    match auth.sign_in_email(&headers, &request).await {
        Ok(response) => {
            let mut cookies = response.cookies;
            cookies.extend(flash(&config, &Toast::success(SIGNED_IN)));
            see_other(CALLBACK_URL, cookies)
        }
        Err(err) => {
            if err.is_rejection() {
                warn!("Sign-in rejected: {err}");
            } else {
                error!("Sign-in failed: {err}");
            }
            let toast = Toast::error(err.user_message(FAILED_SIGN_IN));
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

/// `POST /sign-in/social`: start the OAuth flow and send the browser to the
/// provider.
#[instrument(skip_all)]
pub async fn sign_in_social(
    headers: HeaderMap,
    Extension(auth): Extension<Arc<dyn AuthClient>>,
    Extension(views): Extension<Arc<Views>>,
    Form(social): Form<SocialForm>,
) -> Response {
    if social.provider != GITHUB {
        warn!(provider = %social.provider, "Unsupported social provider");
        let toast = Toast::error(FAILED_GITHUB);
        return render(
            &views,
            StatusCode::BAD_REQUEST,
            &SignInForm::default(),
            &FieldErrors::default(),
            Some(&toast),
            Vec::new(),
        );
    }

    let request = SignInSocialRequest {
        provider: GITHUB.to_string(),
        callback_url: CALLBACK_URL.to_string(),
    };

    match auth.sign_in_social(&headers, &request).await {
        Ok(response) => match response.redirect_url {
            // The state cookie must reach the browser before the provider
            // redirects back.
            Some(url) => see_other(&url, response.cookies),
            None => see_other(CALLBACK_URL, response.cookies),
        },
        Err(err) => {
            error!("Social sign-in failed: {err}");
            let toast = Toast::error(FAILED_GITHUB);
            render(
                &views,
                failure_status(&err),
                &SignInForm::default(),
                &FieldErrors::default(),
                Some(&toast),
                Vec::new(),
            )
        }
    }
}
