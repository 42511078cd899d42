use std::path::Path;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let cli = novelfetch::cli::Cli::parse();
    novelfetch::logging::init(Path::new(&cli.log_file)).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    novelfetch::download::run(cli.download)
        .await
        .context("download")?;

    Ok(())
}
