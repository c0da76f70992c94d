//! `privacyguard-tui`: terminal dashboard for the PrivacyGuard service.
//!
//! Built on [ratatui](https://ratatui.rs). Status, privacy tools,
//! automation, interfaces, activity reports and both logs are drawn as
//! reorderable sections fed by `privacyguard-core`'s
//! [`Dashboard`](privacyguard_core::Dashboard) engine, which refreshes on a
//! timer and on demand.
//!
//! Logs are written to a file (default `/tmp/privacyguard-tui.log`) to
//! avoid corrupting the terminal UI.

mod action;
mod app;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use privacyguard_core::{Dashboard, FileStore, ThemePreference, ViewContext};

use crate::app::App;

/// Terminal dashboard for the PrivacyGuard network privacy service.
#[derive(Parser, Debug)]
#[command(name = "privacyguard-tui", version, about)]
struct Cli {
    /// Control API base URL (e.g., http://localhost:8001/api)
    #[arg(short = 'u', long, env = "PRIVACYGUARD_URL")]
    api_url: Option<String>,

    /// Seconds between background refreshes
    #[arg(short = 'i', long)]
    interval: Option<u64>,

    /// Accept self-signed TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Config file (defaults to the platform config dir)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log file path (defaults to /tmp/privacyguard-tui.log)
    #[arg(long, default_value = "/tmp/privacyguard-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Logging to stdout/stderr would corrupt the
/// TUI. The returned guard must live until exit so logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "privacyguard_tui={log_level},privacyguard_core={log_level},privacyguard_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("privacyguard-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Merge CLI flags over the config file. Flags win.
fn load_settings(cli: &Cli) -> Result<privacyguard_config::Config> {
    let mut cfg = match &cli.config {
        Some(path) => privacyguard_config::load_config_from(path)?,
        None => privacyguard_config::load_config_or_default(),
    };
    if let Some(url) = &cli.api_url {
        cfg.api.base_url.clone_from(url);
    }
    if let Some(secs) = cli.interval {
        cfg.refresh.interval_secs = secs;
    }
    if cli.insecure {
        cfg.api.insecure = true;
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched
    tui::install_hooks(&cli.log_file)?;

    let _log_guard = setup_tracing(&cli);

    let settings = load_settings(&cli)?;
    let config = settings.to_dashboard_config()?;

    info!(
        url = %config.api_url,
        interval_secs = config.refresh_interval.as_secs(),
        "starting privacyguard-tui"
    );

    let (dashboard, events) = Dashboard::new(config.clone())?;
    let store = FileStore::open(settings.store_path());
    let view = ViewContext::new(Box::new(store), &config, ThemePreference::ambient());

    let mut app = App::new(dashboard, events, view);
    app.run().await?;

    Ok(())
}
