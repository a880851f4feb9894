use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::LoggingConfig;
use crate::constants::{APP_NAME, LOG_FILE_NAME};

/// Log setup built from [`LoggingConfig`].
///
/// Records go through the `log` facade; when logging is enabled they are
/// formatted with a timestamp and appended to the log file.
#[derive(Debug, Clone)]
pub struct Logger {
    enabled: bool,
    level: log::LevelFilter,
    log_file: Option<PathBuf>,
}

impl Logger {
    pub fn from_config(config: &LoggingConfig) -> Result<Self> {
        if !config.enabled {
            return Ok(Self {
                enabled: false,
                level: log::LevelFilter::Off,
                log_file: None,
            });
        }

        Ok(Self {
            enabled: true,
            level: config.level_filter()?,
            log_file: Some(Self::get_log_file_path()?),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn level(&self) -> log::LevelFilter {
        self.level
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Build the dispatch without installing it
    pub fn dispatch(&self) -> Result<fern::Dispatch> {
        let mut dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{}] {} {}: {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(self.level);

        if let Some(path) = &self.log_file {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
            }
            let file = fern::log_file(path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
            dispatch = dispatch.chain(file);
        }

        Ok(dispatch)
    }

    /// Install as the global logger; fails if one is already set.
    ///
    /// A disabled logger installs nothing and leaves the global slot free.
    pub fn install(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.dispatch()?.apply().context("Failed to install logger")?;
        Ok(())
    }

    /// Get the log file path under the user's local data directory
    pub fn get_log_file_path() -> Result<PathBuf> {
        dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
            .map(|dir| dir.join(APP_NAME).join(LOG_FILE_NAME))
    }
}
