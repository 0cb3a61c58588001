use clap::Parser as _;
use tracing::debug;
use tracing_subscriber::util::SubscriberInitExt as _;

use lsfind::{
    application::{Application, ApplicationError, logging},
    cli::Cli,
};

#[snafu::report]
fn main() -> Result<(), ApplicationError> {
    let cli_args = Cli::parse();
    let colors = supports_color::on(supports_color::Stream::Stderr).is_some();
    setup_tracing(&cli_args, colors);
    colored::control::set_override(colors);
    debug!("Parsed CLI arguments: {cli_args:?}");

    Application::run(cli_args)?;
    Ok(())
}

fn setup_tracing(cli_args: &Cli, colors: bool) {
    if let Some(subscriber) = logging::subscriber(cli_args.log_level, colors, std::io::stderr) {
        subscriber.init();
    }
}
