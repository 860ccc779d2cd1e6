//! Request guards that run before the form handlers.

use crate::api::AppConfig;
use axum::{
    body::Body,
    extract::{ConnectInfo, Extension},
    http::{
        header::{ORIGIN, REFERER},
        HeaderValue, Method, Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{net::SocketAddr, sync::Arc};
use tracing::warn;
use url::Url;

pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Reject state-changing requests whose `Origin` (or `Referer` when the
/// browser sent no `Origin`) is not the app itself.
///
/// Calls to the auth service carry the app's own origin, so a cross-site form
/// post has to be stopped here or it would sign the browser in.
pub async fn same_origin(
    Extension(config): Extension<Arc<AppConfig>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if is_safe(request.method()) {
        return next.run(request).await;
    }

    let headers = request.headers();
    let source = headers
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            headers
                .get(REFERER)
                .and_then(|value| value.to_str().ok())
                .and_then(|referer| Url::parse(referer).ok())
                .map(|referer| referer.origin().ascii_serialization())
        });

    match source {
        Some(origin) if origin == config.origin() => next.run(request).await,
        source => {
            warn!(
                method = %request.method(),
                path = request.uri().path(),
                origin = source.as_deref().unwrap_or("none"),
                "cross-origin request rejected"
            );
            (StatusCode::FORBIDDEN, "Forbidden").into_response()
        }
    }
}

const fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Replace any client-supplied `x-forwarded-for` with the connection's peer
/// address, the value relayed to the auth service for rate limiting.
pub async fn client_address(mut request: Request<Body>, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    let headers = request.headers_mut();
    headers.remove(FORWARDED_FOR);
    if let Some(value) = peer.and_then(|ip| HeaderValue::from_str(&ip).ok()) {
        headers.insert(FORWARDED_FOR, value);
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::handlers::test_support::{app, body_text, post_form, APP_ORIGIN},
        auth::stub::StubAuthClient,
    };
    use axum::{routing::get, Router};
    use tower::ServiceExt;

    fn cross_site(
        uri: &str,
        body: &str,
        origin: Option<&str>,
        referer: Option<&str>,
    ) -> Request<Body> {
        let mut request = post_form(uri, body);
        let headers = request.headers_mut();
        headers.remove(ORIGIN);
        if let Some(origin) = origin {
            headers.insert(ORIGIN, HeaderValue::from_str(origin).expect("valid origin"));
        }
        if let Some(referer) = referer {
            headers.insert(REFERER, HeaderValue::from_str(referer).expect("valid referer"));
        }
        request
    }

    #[tokio::test]
    async fn foreign_origin_never_reaches_the_auth_service() -> anyhow::Result<()> {
        let auth = Arc::new(StubAuthClient::signed_out());
        let body = "email=john%40example.com&password=Password1";

        for request in [
            cross_site("/sign-in", body, Some("https://evil.example"), None),
            cross_site("/sign-in", body, Some("null"), None),
            cross_site("/sign-in", body, None, Some("https://evil.example/login")),
            cross_site("/sign-in", body, None, None),
            cross_site(
                "/sign-up",
                "name=Jo&email=a%40b.com&password=Password1",
                Some("http://localhost:3001"),
                None,
            ),
            cross_site("/sign-out", "", Some("https://evil.example"), None),
            cross_site(
                "/sign-in/social",
                "provider=github",
                Some("https://evil.example"),
                None,
            ),
        ] {
            let response = app(&auth).oneshot(request).await?;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }

        assert!(auth.calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn same_origin_referer_is_accepted() -> anyhow::Result<()> {
        let auth = Arc::new(StubAuthClient::signed_out());
        let request = cross_site(
            "/sign-in",
            "email=john%40example.com&password=Password1",
            None,
            Some(&format!("{APP_ORIGIN}/sign-in")),
        );
        let response = app(&auth).oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(auth.mutations().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn safe_methods_skip_the_origin_check() -> anyhow::Result<()> {
        let auth = Arc::new(StubAuthClient::signed_out());
        let request = Request::builder()
            .uri("/sign-in")
            .header(ORIGIN, "https://evil.example")
            .body(Body::empty())?;
        let response = app(&auth).oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }

    async fn echo_forwarded_for(headers: axum::http::HeaderMap) -> String {
        headers
            .get_all(FORWARDED_FOR)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn echo() -> Router {
        Router::new()
            .route("/", get(echo_forwarded_for))
            .layer(axum::middleware::from_fn(client_address))
    }

    #[tokio::test]
    async fn forwarded_for_comes_from_the_peer() -> anyhow::Result<()> {
        let mut request = Request::builder()
            .uri("/")
            .header(FORWARDED_FOR, "1.2.3.4")
            .body(Body::empty())?;
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 7], 52_000))));

        let response = echo().oneshot(request).await?;
        assert_eq!(body_text(response).await, "10.0.0.7");
        Ok(())
    }

    #[tokio::test]
    async fn spoofed_forwarded_for_is_dropped_without_a_peer() -> anyhow::Result<()> {
        let request = Request::builder()
            .uri("/")
            .header(FORWARDED_FOR, "1.2.3.4")
            .body(Body::empty())?;
        let response = echo().oneshot(request).await?;
        assert_eq!(body_text(response).await, "");
        Ok(())
    }
}
