//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A configuration banner printed once at startup

use anyhow::Result;
use simplelog::*;
use std::fs::OpenOptions;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to open the file or a logger was already installed
pub fn init_logger(log_file_path: &str) -> Result<()> {
    // Append: CLI subcommands share the file with a running bot
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at application startup.
///
/// The bot token is never printed; only which variable supplied it.
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("⚙️  Configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match config::TOKEN_VARS.iter().find(|name| std::env::var(name).is_ok_and(|v| !v.trim().is_empty())) {
        Some(name) => log::info!("✅ Bot token: provided by {}", name),
        None => log::error!("❌ Bot token: none of {:?} is set", config::TOKEN_VARS),
    }

    log::info!("🗄️  DATABASE_PATH: {}", config::DATABASE_PATH.as_str());
    log::info!("📝 LOG_FILE_PATH: {}", config::LOG_FILE_PATH.as_str());
    match config::BOT_API_URL.as_deref() {
        Some(url) => log::info!("🌐 BOT_API_URL: {}", url),
        None => log::info!("🌐 BOT_API_URL: default (api.telegram.org)"),
    }
    log::info!(
        "⏳ Session TTL: {}s, sweep every {}s",
        config::session::ttl().as_secs(),
        config::session::sweep_interval().as_secs()
    );
    log::info!("💾 Commit timeout: {}s", config::commit::timeout().as_secs());
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
