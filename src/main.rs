//! speedcheck - Application Entry Point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use speedcheck::{
    cli::{Cli, Commands},
    AppResult, BenchmarkRunner, Config, DowncastChecker, RunReport,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("error[{}]: {}", err.error_code(), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = cli.apply(Config::from_env()?)?;
    init_tracing(cli.verbose, &config)?;

    config.validate()?;
    tracing::debug!(?config, "Configuration loaded");

    match cli.command() {
        Commands::Run => {
            let runner = BenchmarkRunner::new(config);
            match runner.run().await? {
                RunReport::Completed(result) => {
                    tracing::debug!(?result, "Run completed");
                }
                RunReport::MissingInputs(missing) => {
                    tracing::debug!(count = missing.len(), "Run skipped");
                }
            }
        }
        Commands::Downcast(_) => {
            let checker = DowncastChecker::new(config);
            let analysis = checker.run().await?;
            tracing::debug!(literals = analysis.assessments.len(), "Downcast completed");
        }
    }

    Ok(())
}

/// Initialize tracing; stdout is reserved for the progress report
fn init_tracing(verbose: bool, config: &Config) -> AppResult<()> {
    let filter = if verbose {
        EnvFilter::new(&config.logging.filter)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config.logging.filter.clone().into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(anyhow::Error::from)?;

    Ok(())
}
