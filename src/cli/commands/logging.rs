use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names accepted in `BETTER_DEMO_LOG_LEVEL`, indexed by `-v` count.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// `None` keeps the subscriber's default (errors only).
    pub level: Option<Level>,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        let count = matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0);
        Self {
            level: level_for(count),
        }
    }
}

/// `-v` count to tracing level; anything past `-vvvv` is trace.
#[must_use]
pub const fn level_for(count: u8) -> Option<Level> {
    match count {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

/// Accepts a level name or its count, so the env var reads either way.
fn parse_verbosity(value: &str) -> Result<u8, String> {
    let value = value.trim();
    if let Ok(count) = value.parse::<u8>() {
        return if count <= 5 {
            Ok(count)
        } else {
            Err(format!("verbosity must be 0-5, got {count}"))
        };
    }

    LEVEL_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(value))
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| format!("unknown log level {value:?}, expected one of {LEVEL_NAMES:?}"))
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Repeat to log more: -v warn, -vv info, -vvv debug, -vvvv trace")
            .env("BETTER_DEMO_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(parse_verbosity),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_and_counts_parse() {
        assert_eq!(parse_verbosity("INFO"), Ok(2));
        assert_eq!(parse_verbosity(" trace "), Ok(4));
        assert_eq!(parse_verbosity("3"), Ok(3));
        assert!(parse_verbosity("9").is_err());
        assert!(parse_verbosity("loud").is_err());
    }

    #[test]
    fn counts_map_to_levels() {
        assert_eq!(level_for(0), None);
        assert_eq!(level_for(1), Some(Level::WARN));
        assert_eq!(level_for(2), Some(Level::INFO));
        assert_eq!(level_for(3), Some(Level::DEBUG));
        assert_eq!(level_for(4), Some(Level::TRACE));
        assert_eq!(level_for(9), Some(Level::TRACE));
    }

    #[test]
    fn options_read_the_flag_count() {
        temp_env::with_vars([("BETTER_DEMO_LOG_LEVEL", None::<&str>)], || {
            let matches = with_args(Command::new("test")).get_matches_from(["test", "-vv"]);
            assert_eq!(
                Options::parse(&matches),
                Options {
                    level: Some(Level::INFO)
                }
            );
        });
    }
}
