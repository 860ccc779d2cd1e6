use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::time::Duration;
use url::Url;

pub const ARG_APP_URL: &str = "app-url";
pub const ARG_AUTH_URL: &str = "auth-url";
pub const ARG_AUTH_TIMEOUT: &str = "auth-timeout";

#[derive(Debug, Clone)]
pub struct Options {
    pub app_url: Url,
    pub auth_url: Url,
    pub auth_timeout: Duration,
}

impl Options {
    /// Parse auth service arguments from matches.
    ///
    /// # Errors
    /// Returns an error if a URL is missing or malformed.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let read_url = |id: &str| -> Result<Url> {
            let raw = matches
                .get_one::<String>(id)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))?;
            let url = Url::parse(raw.trim()).with_context(|| format!("invalid --{id}: {raw}"))?;
            if url.host_str().is_none() {
                anyhow::bail!("--{id} must include a host: {raw}");
            }
            Ok(url)
        };

        let timeout = matches
            .get_one::<u64>(ARG_AUTH_TIMEOUT)
            .copied()
            .unwrap_or(10);

        Ok(Self {
            app_url: read_url(ARG_APP_URL)?,
            auth_url: read_url(ARG_AUTH_URL)?,
            auth_timeout: Duration::from_secs(timeout),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_APP_URL)
                .long(ARG_APP_URL)
                .help("Public base URL of this application")
                .long_help(
                    "Public base URL of this application. Sent as Origin to the auth service; https enables Secure cookies.",
                )
                .env("BETTER_DEMO_APP_URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new(ARG_AUTH_URL)
                .long(ARG_AUTH_URL)
                .help("Base URL of the auth service API")
                .env("BETTER_DEMO_AUTH_URL")
                .default_value("http://localhost:4000/api/auth"),
        )
        .arg(
            Arg::new(ARG_AUTH_TIMEOUT)
                .long(ARG_AUTH_TIMEOUT)
                .help("Timeout in seconds for calls to the auth service")
                .env("BETTER_DEMO_AUTH_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..=120)),
        )
}
