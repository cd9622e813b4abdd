use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use cffc_api::{CffcClient, ClientConfig, HttpResource, RemoteResource};
use cffc_types::Route;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Terminal admin client for the CFFC cultivation backend.
///
/// Backend settings are read from `CFFC_API_BASE`, `CFFC_HTTP_HOST`,
/// `CFFC_HTTP_PORT` and `CFFC_HTTP_TIMEOUT_SECS`; flags win over the
/// environment.
#[derive(Debug, Parser)]
#[command(name = "cffc", version, about)]
struct Cli {
    /// Base URL of the backend, e.g. http://127.0.0.1:8080
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Section to open first (#strain, #substrate, #lifecycle, #generation,
    /// #vendor, #stage, #ingredient)
    #[arg(long, default_value = "#strain")]
    route: Route,

    /// Log file; the terminal belongs to the UI, so logs never go to stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    init_tracing(&log_path, &cli.log_level)?;

    let config = resolve_config(&cli)?;
    info!(base_url = %config.base_url, timeout = ?config.timeout, route = %cli.route, "starting");

    let client = CffcClient::new(config).context("failed to configure the backend client")?;
    let resource: Arc<dyn RemoteResource> = Arc::new(HttpResource::new(client));
    cffc_tui::run(resource, cli.route).await
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("invalid backend settings in the environment")?;
    if let Some(base) = cli.api_base.as_deref() {
        config = config.with_base_url(base.trim());
    }
    if let Some(seconds) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(seconds));
    }
    Ok(config)
}

fn default_log_path() -> PathBuf {
    dirs_next::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("cffc")
        .join("cffc.log")
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

fn init_tracing(path: &Path, level: &str) -> Result<()> {
    let file = open_log_file(path)?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level '{level}'"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow!(error))
}
