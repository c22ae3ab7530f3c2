/*
[INPUT]:  CLI arguments, optional YAML configuration file, environment
[OUTPUT]: Interactive wallet login session
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or startup flow
*/

mod cli;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use wallet_auth_adapter::{LocalKeyAuthFactory, auth::ConsentPrompt};
use wallet_auth_demo::{AppConfig, SessionOrchestrator};

#[derive(Parser, Debug)]
#[command(name = "wallet-auth-demo", version, about = "Wallet login demo with profile and balance")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[arg(long = "dry-run")]
    dry_run: bool,
    /// Print the effective configuration with secrets masked, then exit
    #[arg(long = "print-config")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let _guard = init_tracing(&args.log_level, args.log_file.as_deref())?;

    let config = AppConfig::load(args.config_path.as_deref()).context("load config")?;
    let chain = config.chain_config();
    info!(
        chain_id = %chain.chain_id,
        chain = %chain.display_name,
        client_id_set = !config.client_id.is_empty(),
        dry_run = args.dry_run,
        "starting wallet-auth-demo"
    );

    if args.print_config {
        let yaml = config
            .redacted()
            .to_yaml()
            .context("serialize config")?;
        println!("{yaml}");
        return Ok(());
    }

    if args.dry_run {
        config.ui.validate().context("validate ui config")?;
        chain.chain_id_u64().context("validate chain id")?;
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let factory = LocalKeyAuthFactory::new(config.local_wallet_settings(), config.rpc_client_config())
        .with_consent(consent_prompt());
    let mut orchestrator = SessionOrchestrator::new(config, Arc::new(factory));

    if let Err(err) = orchestrator.initialize().await {
        err.report("initialize");
    }

    cli::interactive::run_interactive(&mut orchestrator).await
}

fn init_tracing(log_level: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("initialize tracing subscriber")?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("initialize tracing subscriber")?;
            Ok(None)
        }
    }
}

/// Login confirmation shown in place of the hosted login modal
///
/// Declining or pressing Esc reports the same message as a dismissed modal.
fn consent_prompt() -> ConsentPrompt {
    Arc::new(|| {
        match Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Sign in with the configured local wallet?")
            .default(true)
            .interact_opt()
        {
            Ok(Some(true)) => Ok(()),
            Ok(Some(false) | None) => Err("User closed the modal".to_string()),
            Err(err) => Err(format!("consent prompt failed: {err}")),
        }
    })
}
