//! Map validated CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, database, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if an argument is present but unusable (bad URL or scheme).
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(3000);

    let auth_opts = auth::Options::parse(matches)?;
    let database_opts = database::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        app_url: auth_opts.app_url,
        auth_url: auth_opts.auth_url,
        auth_timeout: auth_opts.auth_timeout,
        mongodb_uri: database_opts.uri,
    }))
}
