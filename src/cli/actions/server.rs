use crate::{
    api::{self, AppConfig},
    auth::HttpAuthClient,
    db::DatabaseHandle,
    views::Views,
};
use anyhow::{Context, Result};
use std::{sync::Arc, time::Duration};
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub app_url: Url,
    pub auth_url: Url,
    pub auth_timeout: Duration,
    pub mongodb_uri: String,
}

/// Execute the server action.
///
/// # Errors
/// Returns an error if the auth client or templates cannot be built, or the
/// server fails to bind.
pub async fn execute(args: Args) -> Result<()> {
    debug!(
        app_url = %args.app_url,
        auth_url = %args.auth_url,
        timeout_seconds = args.auth_timeout.as_secs(),
        "Configuring server"
    );

    let auth = HttpAuthClient::new(args.auth_url, args.app_url.clone(), args.auth_timeout)
        .context("Failed to build auth service client")?;

    let views = Views::new().context("Failed to load page templates")?;

    let database = Arc::new(DatabaseHandle::new(args.mongodb_uri));

    let config = AppConfig::new(args.app_url);

    api::new(args.port, config, Arc::new(auth), Arc::new(views), database).await
}
