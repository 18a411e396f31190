use clap::Parser;
use hive_deploy::{cli::Cli, errors::DeployError};

#[tokio::main]
async fn main() -> Result<(), DeployError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    cli.command.clone().run(&cli).await
}
