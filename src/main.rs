use clap::Parser as _;
use foldertree::{
    application::{Application, ApplicationError},
    cli::Cli,
};
use tracing::debug;

#[compio::main]
#[snafu::report]
async fn main() -> Result<(), ApplicationError> {
    let cli_args = Cli::parse();
    setup_tracing(&cli_args);
    debug!("Parsed CLI arguments: {cli_args:?}");

    Application::run(cli_args).await?;

    Ok(())
}

fn setup_tracing(cli_args: &Cli) {
    if let Some(filter) = cli_args.log_level.to_level_filter() {
        tracing_subscriber::fmt()
            .with_max_level(filter)
            .with_writer(std::io::stderr)
            .without_time()
            .compact()
            .init();
    }
}
