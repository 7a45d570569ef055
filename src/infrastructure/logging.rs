//! Logging system configuration and initialization
//!
//! - Console output and/or a non-blocking log file
//! - Optional JSON formatting for the file layer
//! - `RUST_LOG` overrides the configured filter entirely
//! - Old log files beyond `max_files` are removed on startup

use anyhow::{Result, anyhow};
use chrono::Local;
use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "listing-scout";

lazy_static! {
    // Keeps the non-blocking file writer alive for the life of the process.
    static ref LOG_GUARDS: Mutex<Vec<tracing_appender::non_blocking::WorkerGuard>> =
        Mutex::new(Vec::new());
}

struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f %:z"))
    }
}

/// `logs/` next to the executable, or under the working directory.
pub fn get_log_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
        .join("logs")
}

/// Build the filter: `RUST_LOG` when set, else the configured level with
/// noisy dependencies capped by `module_filters` unless tracing everything.
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| anyhow!("Invalid log level '{}': {}", config.level, e))?;

    if !config.level.to_lowercase().contains("trace") {
        let mut modules: Vec<_> = config.module_filters.iter().collect();
        modules.sort();
        for (module, level) in modules {
            let directive = format!("{module}={level}")
                .parse()
                .map_err(|e| anyhow!("Invalid module filter '{}={}': {}", module, level, e))?;
            filter = filter.add_directive(directive);
        }
    }

    let own = format!("listing_scout={}", config.level)
        .parse()
        .map_err(|e| anyhow!("Invalid log level '{}': {}", config.level, e))?;
    Ok(filter.add_directive(own))
}

/// Initialize logging with custom configuration
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(config)?;
    let registry = Registry::default().with(env_filter);

    let console_layer = config.console_output.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stdout)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
    });

    let log_dir = config.log_dir.clone().unwrap_or_else(get_log_directory);

    match (config.file_output, config.json_format) {
        (false, _) => {
            if console_layer.is_none() {
                return Err(anyhow!("No logging output configured"));
            }
            registry.with(console_layer).try_init()?;
        }
        (true, json) => {
            std::fs::create_dir_all(&log_dir)
                .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;
            cleanup_old_logs(&log_dir, config.max_files.saturating_sub(1) as usize)?;

            let stamp = Local::now().format("%Y%m%dT%H%M%S");
            let file_name = format!("{LOG_FILE_PREFIX}-{stamp}.log");
            let (file_writer, guard) = non_blocking(rolling::never(&log_dir, &file_name));
            LOG_GUARDS
                .lock()
                .map_err(|_| anyhow!("Log guard registry poisoned"))?
                .push(guard);

            if json {
                let file_layer = fmt::Layer::new()
                    .json()
                    .with_writer(file_writer)
                    .with_timer(LocalTimeFormatter)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false);
                registry.with(console_layer).with(file_layer).try_init()?;
            } else {
                let file_layer = fmt::Layer::new()
                    .with_writer(file_writer)
                    .with_timer(LocalTimeFormatter)
                    .with_target(false)
                    .with_ansi(false);
                registry.with(console_layer).with(file_layer).try_init()?;
            }
            info!("Log file: {:?}", log_dir.join(&file_name));
        }
    }

    info!("Logging system initialized (level: {})", config.level);
    Ok(())
}

/// Keep the `keep` newest `listing-scout-*.log` files, delete the rest.
pub fn cleanup_old_logs(log_dir: &Path, keep: usize) -> Result<usize> {
    if !log_dir.exists() {
        return Ok(0);
    }

    let mut log_files = Vec::new();
    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_ours = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX) && n.ends_with(".log"));
        if !is_ours {
            continue;
        }
        if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
            log_files.push((path, modified));
        }
    }

    // Newest first
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in log_files.iter().skip(keep) {
        match std::fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => warn!("Failed to remove old log file {:?}: {}", path, e),
        }
    }
    Ok(removed)
}
