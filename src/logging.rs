use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::app_dirs::AppDirs;

pub const LOG_ENV: &str = "GLIMPSE_LOG";

/// Where logs should go, if anywhere. The terminal belongs to the TUI, so
/// logging is file-only and off unless asked for.
pub fn log_target(cli_path: Option<&Path>) -> Option<PathBuf> {
    match cli_path {
        Some(p) => Some(p.to_path_buf()),
        None if std::env::var_os(LOG_ENV).is_some() => Some(AppDirs::log_path()),
        None => None,
    }
}

/// Install a file-backed subscriber filtered by `GLIMPSE_LOG` (default `info`)
pub fn init(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| io::Error::other(err.to_string()))
}
