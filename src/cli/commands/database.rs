use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

pub const ARG_MONGODB_URI: &str = "mongodb-uri";

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/better-demo";

#[derive(Debug, Clone)]
pub struct Options {
    pub uri: String,
}

impl Options {
    /// Parse database arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the connection string does not use a MongoDB scheme.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let uri = matches
            .get_one::<String>(ARG_MONGODB_URI)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string());

        if !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://")) {
            anyhow::bail!("--{ARG_MONGODB_URI} must start with mongodb:// or mongodb+srv://");
        }

        Ok(Self { uri })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_MONGODB_URI)
            .long(ARG_MONGODB_URI)
            .help("MongoDB connection string")
            .env("MONGODB_URI")
            .default_value(DEFAULT_MONGODB_URI),
    )
}
