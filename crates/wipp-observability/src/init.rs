// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output always; with the `file-logging` feature and a
//! [`LogOutput::Directory`] destination, JSON log files are also written into a
//! timestamped run folder:
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── wipp.log
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LogOutput, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps file writers alive; logs are flushed when this is dropped.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder of the file logs, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Filter directive combining the configured level with per-crate debug flags.
pub fn build_filter(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> String {
    debug_flags.to_filter_string_with_default(&config.level.to_lowercase())
}

/// Install the global tracing subscriber.
///
/// # Errors
/// Fails on an unparsable filter, when a global subscriber is already
/// installed, or when file output is requested without `file-logging`.
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = build_filter(debug_flags, config);
    let env_filter =
        EnvFilter::try_new(&filter).with_context(|| format!("Invalid log filter: {}", filter))?;

    #[cfg_attr(not(feature = "file-logging"), allow(unused_mut))]
    let mut layers: Vec<BoxedLayer> = vec![console_layer(&config.format, env_filter)];

    #[cfg_attr(not(feature = "file-logging"), allow(unused_mut))]
    let mut guard = LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: Vec::new(),
        log_dir: None,
    };

    if let LogOutput::Directory(base_log_dir) = &config.output {
        #[cfg(feature = "file-logging")]
        {
            let (layer, file_guard, run_folder) = file_layer(base_log_dir, &filter)?;
            layers.push(layer);
            guard._file_guards.push(file_guard);
            guard.log_dir = Some(run_folder);
        }
        #[cfg(not(feature = "file-logging"))]
        anyhow::bail!(
            "Logging to {} requires the `file-logging` feature",
            base_log_dir.display()
        );
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context("Global tracing subscriber already installed")?;

    Ok(guard)
}

/// Initialize console logging at `info`, honouring debug flags.
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, &LoggingConfig::default())
}

fn console_layer(format: &LogFormat, filter: EnvFilter) -> BoxedLayer {
    match format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(filter)
            .boxed(),
    }
}

#[cfg(feature = "file-logging")]
fn file_layer(
    base_log_dir: &Path,
    filter: &str,
) -> Result<(BoxedLayer, tracing_appender::non_blocking::WorkerGuard, PathBuf)> {
    use chrono::Utc;
    use tracing_appender::rolling;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = base_log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    cleanup_old_logs(base_log_dir, None, None)?;

    let appender = rolling::daily(&run_folder, "wipp.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(EnvFilter::new(filter))
        .boxed();

    Ok((layer, guard, run_folder))
}

/// Remove run folders older than `retention_days` (default 30), then keep at
/// most `retention_runs` (default 10) of the remaining ones.
#[cfg(feature = "file-logging")]
pub fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: Option<u64>,
    retention_runs: Option<usize>,
) -> Result<()> {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

    if !base_log_dir.exists() {
        return Ok(());
    }

    let retention_days = retention_days.unwrap_or(30);
    let retention_runs = retention_runs.unwrap_or(10);
    let cutoff_date = Utc::now() - chrono::Duration::days(retention_days as i64);

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(timestamp_str) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix("run_"))
        else {
            continue;
        };
        if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp_str, "%Y%m%d_%H%M%S") {
            runs.push((path, Utc.from_utc_datetime(&naive)));
        }
    }

    // Oldest first
    runs.sort_by_key(|(_, dt)| *dt);

    let mut kept = Vec::new();
    for (path, dt) in runs {
        if dt < cutoff_date {
            if let Err(e) = std::fs::remove_dir_all(&path) {
                tracing::warn!("Failed to remove old log directory {}: {}", path.display(), e);
            }
        } else {
            kept.push(path);
        }
    }

    if kept.len() > retention_runs {
        let to_remove = kept.len() - retention_runs;
        for path in kept.iter().take(to_remove) {
            if let Err(e) = std::fs::remove_dir_all(path) {
                tracing::warn!("Failed to remove old log directory {}: {}", path.display(), e);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_lowercases_level() {
        let flags = CrateDebugFlags::default();
        let config = LoggingConfig::new("WARN", LogFormat::Text);
        assert_eq!(build_filter(&flags, &config), "warn");
    }

    #[test]
    fn test_build_filter_with_flags() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-wipp-register".to_string()]);
        let config = LoggingConfig::default();
        assert_eq!(build_filter(&flags, &config), "wipp_register=debug,info");
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let flags = CrateDebugFlags::default();
        let config = LoggingConfig::new("wipp_register=loud", LogFormat::Text);
        assert!(init_logging(&flags, &config).is_err());
    }

    #[cfg(not(feature = "file-logging"))]
    #[test]
    fn test_directory_output_requires_feature() {
        let flags = CrateDebugFlags::default();
        let config = LoggingConfig::default()
            .with_output(LogOutput::Directory(PathBuf::from("./logs")));
        let err = init_logging(&flags, &config).err().expect("should fail");
        assert!(err.to_string().contains("file-logging"));
    }

    #[cfg(feature = "file-logging")]
    #[test]
    fn test_cleanup_keeps_most_recent_runs() {
        let dir = tempfile::tempdir().unwrap();
        let today = chrono::Utc::now();
        let mut names = Vec::new();
        for minutes in 0..4 {
            let stamp = (today - chrono::Duration::minutes(minutes)).format("%Y%m%d_%H%M%S");
            let name = format!("run_{}", stamp);
            std::fs::create_dir_all(dir.path().join(&name)).unwrap();
            names.push(name);
        }
        std::fs::create_dir_all(dir.path().join("run_20000101_000000")).unwrap();
        std::fs::create_dir_all(dir.path().join("not_a_run")).unwrap();

        cleanup_old_logs(dir.path(), Some(30), Some(2)).unwrap();

        assert!(!dir.path().join("run_20000101_000000").exists());
        assert!(dir.path().join("not_a_run").exists());
        // names[0] and names[1] are the newest
        assert!(dir.path().join(&names[0]).exists());
        assert!(dir.path().join(&names[1]).exists());
        assert!(!dir.path().join(&names[3]).exists());
    }
}
