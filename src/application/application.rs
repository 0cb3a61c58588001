use std::io::{self, IsTerminal};

use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::filesystem::{ListingError, Tree};
use crate::session::Session;

pub struct Application;

impl Application {
    pub fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        debug!("Runtime config: {:?}", app_config);

        let tree = Tree::from_listing_path(&app_config.listing).context(ListingSnafu)?;
        info!("Loaded listing with {} nodes", tree.node_count());
        let mut session = Session::new(tree);

        let mut output = io::stdout().lock();
        let mut errors = io::stderr().lock();
        if app_config.commands.is_empty() {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            session
                .run(stdin.lock(), &mut output, &mut errors, prompt)
                .context(SessionIoSnafu)?;
        } else {
            let script = app_config.commands.join("\n");
            session
                .run(script.as_bytes(), &mut output, &mut errors, false)
                .context(SessionIoSnafu)?;
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the listing"))]
    ListingError { source: ListingError },
    #[snafu(display("Critical failure encountered during the session"))]
    SessionIoError { source: io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_listing_fails_before_the_session() {
        let config = RuntimeConfig {
            listing: PathBuf::from("/this/listing/does/not/exist"),
            commands: vec!["pwd".to_string()],
        };
        let result = Application::run(config);
        assert!(matches!(
            result,
            Err(ApplicationError::ListingError {
                source: ListingError::OpenError { .. }
            })
        ));
    }
}
