use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Listing file the tree is built from
    pub listing: PathBuf,
    /// Session lines to run instead of reading standard input
    pub commands: Vec<String>,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            listing: cli.listing,
            commands: cli.commands,
        }
    }
}
