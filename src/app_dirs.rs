use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "glimpse";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", APP_NAME) {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("glimpse_config.json")
        }
    }

    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
                .join("glimpse.log")
        } else if let Some(pd) = ProjectDirs::from("", "", APP_NAME) {
            pd.data_local_dir().join("glimpse.log")
        } else {
            PathBuf::from("glimpse.log")
        }
    }
}
