#![allow(clippy::needless_for_each)]

use crate::{
    api::handlers::{health::__path_health, session::__path_session},
    auth::{AuthClient, Session, SessionMeta, User},
    db::DatabaseHandle,
    views::Views,
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    response::Json,
    middleware::from_fn,
    routing::{get, post},
    Extension, Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{debug_span, info, warn, Span};
use ulid::Ulid;
use url::Url;
use utoipa::OpenApi;

pub mod handlers;
pub mod middleware;

/// Settings shared by every handler.
#[derive(Debug, Clone)]
pub struct AppConfig {
    app_url: Url,
    origin: String,
    cookie_secure: bool,
}

impl AppConfig {
    #[must_use]
    pub fn new(app_url: Url) -> Self {
        // Browsers drop `Secure` cookies set over plain http.
        let cookie_secure = app_url.scheme() == "https";
        let origin = app_url.origin().ascii_serialization();
        Self {
            app_url,
            origin,
            cookie_secure,
        }
    }

    #[must_use]
    pub const fn app_url(&self) -> &Url {
        &self.app_url
    }

    /// `scheme://host[:port]` that form posts must come from.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub const fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, session),
    components(
        schemas(handlers::health::Health, Session, SessionMeta, User)
    ),
    tags(
        (name = "better-demo", description = "Authentication demo"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi())
}

/// Build the application router.
pub fn router(
    config: AppConfig,
    auth: Arc<dyn AuthClient>,
    views: Arc<Views>,
    database: Arc<DatabaseHandle>,
) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/sign-in",
            get(handlers::sign_in_page).post(handlers::sign_in),
        )
        .route("/sign-in/social", post(handlers::sign_in_social))
        .route(
            "/sign-up",
            get(handlers::sign_up_page).post(handlers::sign_up),
        )
        .route("/dashboard", get(handlers::dashboard))
        .route("/sign-out", post(handlers::sign_out))
        .route("/welcome", get(handlers::welcome))
        .route("/api/session", get(handlers::session))
        .route("/openapi.json", get(openapi_json))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(Arc::new(config)))
                .layer(Extension(auth))
                .layer(Extension(views))
                .layer(from_fn(middleware::client_address))
                .layer(from_fn(middleware::same_origin)),
        )
        .route("/health", get(handlers::health).options(handlers::health))
        .layer(Extension(database))
}

/// Run the server until ctrl-c or SIGTERM, then close the database client.
///
/// # Errors
/// Returns an error if the server fails to bind or serve.
pub async fn new(
    port: u16,
    config: AppConfig,
    auth: Arc<dyn AuthClient>,
    views: Arc<Views>,
    database: Arc<DatabaseHandle>,
) -> Result<()> {
    // Pages work without the database, so a failed ping only degrades /health.
    if database.connect().await.is_err() {
        warn!("Starting without MongoDB, /health will report it");
    }

    let app = router(config, auth, views, database.clone());

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    database.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let method = request.method();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    // Headers carry session cookies; keep them out of spans.
    debug_span!("http-request", %method, path, request_id)
}
