//! PageBridge - page-context extraction and cross-context messaging
//!
//! Main entry point for the PageBridge CLI.

mod cli;
mod cmd_bridge;
mod cmd_page;
mod setup;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pagebridge_config::{ConfigLoader, LoggingConfig};

use crate::cli::{Cli, Commands};
use crate::cmd_bridge::BridgeArgs;
use crate::setup::{Components, check_config, load_config};

/// Initialize tracing.
///
/// Console output goes to stderr so command output on stdout stays clean.
/// With `logging.dir` set, a daily-rotated file layer is added; the returned
/// guard must live until exit.
fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let Some(dir) = config.dir.as_deref() else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console)
            .init();
        return Ok(None);
    };

    let log_dir = ConfigLoader::expand_path(dir);
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pagebridge")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();
    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Validate = cli.command {
        return cmd_page::validate(&cli.config);
    }

    let config = load_config(&cli.config)?;
    let _guard = init_tracing(&config.logging)?;
    check_config(&config)?;
    let components = Components::from_config(&config);

    match cli.command {
        Commands::Extract { file, url } => cmd_page::extract(&components, &file, &url),
        Commands::Fill {
            file,
            url,
            text,
            selector,
            paste_handled,
        } => cmd_page::fill(
            &components,
            &file,
            &url,
            &text,
            selector.as_deref(),
            paste_handled,
        ),
        Commands::Profiles { format } => cmd_page::profiles(&components, &format),
        Commands::Bridge {
            file,
            url,
            kind,
            payload,
            timeout_ms,
            silent,
        } => {
            let args = BridgeArgs {
                file: Path::new(&file),
                url: &url,
                kind: &kind,
                payload: payload.as_deref(),
                timeout_ms,
                silent,
            };
            cmd_bridge::run(&components, args).await
        }
        Commands::Validate => cmd_page::validate(&cli.config),
    }
}
