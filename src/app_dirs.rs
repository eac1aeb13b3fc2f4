use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application path resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.ding-log.csv`, or the platform data dir when HOME is unset.
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".ding-log.csv"))
        } else {
            ProjectDirs::from("", "", "ding")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("ding-log.csv"))
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ding").map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }
}
