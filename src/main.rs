//! Thermodash CLI
//!
//! Command-line interface for the temperature dashboard:
//! - Live terminal dashboard (default)
//! - Line-per-update output for non-interactive terminals
//! - One-shot snapshot of the current readings
//! - Backend health check
//! - Default config generation

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use thermodash::config::{generate_default_config, Config};
use thermodash::model::{format_temperature, DashboardState, TimeRange};
use thermodash::{
    init_logging, DashboardController, FetchOutcome, HttpSampleSource, LogTarget,
    FETCH_FAILURE_MESSAGE,
};

#[derive(Parser)]
#[command(name = "thermodash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live temperature dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides config and THERMODASH_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Initial range: 1h, 6h or 24h
    #[arg(short, long, global = true)]
    pub range: Option<TimeRange>,

    /// Poll interval in milliseconds
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the live dashboard (default)
    Watch {
        /// Print one line per update instead of the full-screen dashboard
        #[arg(long)]
        plain: bool,
    },

    /// Fetch once and print the readings
    Snapshot {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Check backend health
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Commands::Watch { plain: false });

    if let Commands::Config { output } = &command {
        return write_default_config(output.as_deref());
    }

    let config = resolve_config(&cli)?;

    let target = match &command {
        Commands::Watch { plain: false } => LogTarget::FileOnly,
        _ => LogTarget::Console,
    };
    init_logging(&config.logging, target).context("failed to initialize logging")?;

    tracing::info!("Thermodash v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(base_url = %config.source.base_url, "Using backend");

    let source = Arc::new(
        HttpSampleSource::new(config.source.to_http_config())
            .context("failed to create HTTP client")?,
    );

    match &command {
        Commands::Status => status(&source).await,
        Commands::Snapshot { format } => {
            let controller = DashboardController::new(
                source,
                config.polling.interval(),
                config.polling.default_range,
            );
            snapshot(&controller, format).await
        }
        Commands::Watch { plain } => {
            let controller = Arc::new(DashboardController::new(
                source,
                config.polling.interval(),
                config.polling.default_range,
            ));
            if *plain {
                watch_plain(controller).await
            } else {
                thermodash::tui::run(controller)
                    .await
                    .context("terminal dashboard failed")
            }
        }
        Commands::Config { .. } => Ok(()),
    }
}

/// Config file, then environment, then command-line flags
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };

    if let Some(url) = &cli.api_url {
        config.source.base_url = url.clone();
    }
    if let Some(range) = cli.range {
        config.polling.default_range = range;
    }
    if let Some(interval) = cli.interval_ms {
        anyhow::ensure!(interval > 0, "--interval-ms must be greater than zero");
        config.polling.interval_ms = interval;
    }

    config.validate()?;
    Ok(config)
}

fn write_default_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Config written to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

async fn status(source: &HttpSampleSource) -> anyhow::Result<()> {
    println!("Thermodash v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Backend: {}", source.config().base_url);

    match source.health().await {
        Ok(report) => {
            println!("Status: {}", report.status);
            if let Some(connected) = report.store_connected {
                println!(
                    "Data store: {}",
                    if connected { "connected" } else { "disconnected" }
                );
            }
            if !report.is_ok() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            println!("Status: unreachable ({})", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn snapshot(controller: &DashboardController, format: &str) -> anyhow::Result<()> {
    if controller.fetch_once().await == FetchOutcome::Failed {
        eprintln!("{}", FETCH_FAILURE_MESSAGE);
        std::process::exit(1);
    }

    let state = controller.state();

    match format {
        "json" => {
            let body = serde_json::json!({
                "range": state.active_range,
                "last_updated": state.last_updated,
                "points": state.point_count(),
                "latest_temperature": state.latest_temperature(),
                "average_temperature": state.average_temperature(),
                "samples": state.samples,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        _ => print_table(&state),
    }

    Ok(())
}

fn print_table(state: &DashboardState) {
    println!("{:<25} {:>12}", "Time", "Temperature");
    println!("{}", "-".repeat(38));

    for sample in &state.samples {
        let time = sample
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        println!("{:<25} {:>10.2}°C", time, sample.temperature);
    }

    println!();
    println!("Range: {}", state.active_range.label());
    println!("Data points: {}", state.point_count());
    println!(
        "Current temperature: {}",
        format_temperature(state.latest_temperature())
    );
    println!(
        "Average temperature: {}",
        format_temperature(state.average_temperature())
    );
}

async fn watch_plain(controller: Arc<DashboardController>) -> anyhow::Result<()> {
    let mut updates = controller.subscribe();
    let poll = controller.start();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                println!("{}", summary_line(&state));
            }
        }
    }

    poll.shutdown().await;
    Ok(())
}

fn summary_line(state: &DashboardState) -> String {
    if let Some(error) = &state.error {
        return format!("[{}] {}", state.active_range, error);
    }

    let updated = state
        .last_updated
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--".to_string());

    format!(
        "[{}] {} | points={} current={} average={}",
        state.active_range,
        updated,
        state.point_count(),
        format_temperature(state.latest_temperature()),
        format_temperature(state.average_temperature()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_file() -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[source]\nbase_url = \"http://sensor:5000\"\n").unwrap();
        file
    }

    fn cli(file: &tempfile::NamedTempFile, extra: &[&str]) -> Cli {
        let path = file.path().to_string_lossy().to_string();
        let mut args = vec!["thermodash".to_string(), "--config".to_string(), path];
        args.extend(extra.iter().map(|a| a.to_string()));
        Cli::parse_from(args)
    }

    #[test]
    fn test_flags_override_config_file() {
        let file = config_file();
        let config = resolve_config(&cli(
            &file,
            &["--api-url", "http://10.0.0.7:5000", "--range", "6h", "snapshot"],
        ))
        .unwrap();

        assert_eq!(config.source.base_url, "http://10.0.0.7:5000");
        assert_eq!(config.polling.default_range, TimeRange::Last6Hours);
    }

    #[test]
    fn test_empty_api_url_flag_rejected() {
        let file = config_file();
        let err = resolve_config(&cli(&file, &["--api-url", "", "snapshot"])).unwrap_err();

        assert_eq!(err.to_string(), "Invalid value for source.base_url: ''");
    }

    #[test]
    fn test_zero_interval_flag_rejected() {
        let file = config_file();
        assert!(resolve_config(&cli(&file, &["--interval-ms", "0"])).is_err());
    }
}
