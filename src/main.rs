use clap::Parser;
use vpc_overlap::aws::ProcessRunner;
use vpc_overlap::commands;
use vpc_overlap::config::{init_logging, Cli};
use vpc_overlap::BoxError;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli.log_config)?;
    //
    log::info!("#Start main()");

    let mut stdout = std::io::stdout().lock();
    commands::run(&ProcessRunner, &cli, &mut stdout).await?;

    log::info!("#End main()");
    Ok(())
}
