use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::Result;

/// Parse the process arguments, install tracing at the requested level and
/// resolve the action to run.
///
/// # Errors
///
/// Returns an error if telemetry cannot be installed or the options are invalid.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let logging = commands::logging::Options::parse(&matches);
    telemetry::init(logging.level)?;

    dispatch::handler(&matches)
}
