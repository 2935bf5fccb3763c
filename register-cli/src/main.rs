//! trust-register: command-line front end for the register simulation
//!
//! Every invocation opens the configured store, resumes the persisted session
//! and runs one command. The advisor is only contacted by `ask`.

mod commands;
mod config;

use std::path::PathBuf;

use clap::Parser;
use register::{CitizenRecord, RngEntropy};
use tracing::{debug, info};

use commands::Commands;
use config::Config;

#[derive(Parser)]
#[command(name = "trust-register")]
#[command(about = "Simulated public reliability register with a critical advisor")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "trust-register.yaml")]
    config: PathBuf,

    /// Data directory (overrides config file)
    #[arg(short, long, env = "TRUST_REGISTER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Advisor model (overrides config file)
    #[arg(long, env = "TRUST_REGISTER_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trust_register=info".parse()?)
                .add_directive("register=info".parse()?)
                .add_directive("advisor=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config)?;

    // Apply CLI overrides
    if let Some(data_dir) = cli.data_dir {
        config.register.storage.data_dir = data_dir;
    }
    if let Some(model) = cli.model {
        config.advisor.model = Some(model);
    }

    debug!(
        backend = ?config.register.storage.backend,
        data_dir = %config.register.storage.data_dir.display(),
        provider = ?config.advisor.provider,
        "Configuration resolved"
    );

    let store = config.register.open_store()?;
    let mut record = CitizenRecord::open(store, &config.register, Box::new(RngEntropy::from_os()))?;
    info!(session = ?record.session(), "Record opened");

    let output = commands::execute_command(&mut record, &config.advisor, cli.command).await?;
    println!("{}", output);

    Ok(())
}
