use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use shipinit::{process_env, EnvloadConfig, SsmParameterStore, DEFAULT_ENV};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shipinit")]
#[command(version = shipinit::VERSION)]
#[command(about = "container initialization commands")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print SSM parameters `{env}.{service}.*` as shell export lines
    Envload(EnvloadArgs),
}

#[derive(Args)]
struct EnvloadArgs {
    /// ECS cluster name
    #[arg(long, default_value = DEFAULT_ENV)]
    env: String,

    /// ECS service name
    #[arg(long)]
    service_name: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the exports, so logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .try_init();

    let cli = Cli::parse();
    debug!(version = shipinit::VERSION, revision = shipinit::REVISION, "starting");

    let result = match cli.command {
        Command::Envload(args) => envload(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn envload(args: EnvloadArgs) -> Result<()> {
    let config = EnvloadConfig::new(args.env, args.service_name)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    shipinit::envload(
        &config,
        process_env,
        SsmParameterStore::connect,
        &mut out,
    )
    .await?;

    Ok(())
}
