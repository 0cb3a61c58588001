use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Browse and query a captured recursive directory listing
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// File holding the output of a recursive long listing
    pub listing: PathBuf,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Run this session line instead of reading standard input. May be repeated
    #[clap(long = "command", short = 'c', value_name = "LINE")]
    pub commands: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_commands() {
        let cli = Cli::try_parse_from(["lsfind", "listing.txt", "-c", "cd sub", "-c", "find"]).unwrap();
        assert_eq!(cli.listing, PathBuf::from("listing.txt"));
        assert_eq!(cli.commands, vec!["cd sub", "find"]);
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn listing_is_required() {
        assert!(Cli::try_parse_from(["lsfind"]).is_err());
    }
}
