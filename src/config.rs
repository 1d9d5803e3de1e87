use crate::error::AppError;
use photo_upload::storage::app_data_dir;
use photo_upload::PhotoUploadConfig;
use std::path::{Path, PathBuf};

/// Name of the optional settings file in the app data directory
pub const CONFIG_FILE_NAME: &str = "photo-upload.toml";

pub fn config_path() -> PathBuf {
    app_data_dir().join(CONFIG_FILE_NAME)
}

/// Reads the upload settings; a missing file means defaults
pub fn load_upload_config_from(path: &Path) -> Result<PhotoUploadConfig, AppError> {
    if !path.exists() {
        log::debug!("No config at {:?}, using defaults", path);
        return Ok(PhotoUploadConfig::default());
    }
    let text = std::fs::read_to_string(path)?;
    Ok(PhotoUploadConfig::from_toml(&text)?)
}

/// Loads the settings from the app data directory, falling back to defaults
pub fn load_upload_config() -> PhotoUploadConfig {
    let path = config_path();
    match load_upload_config_from(&path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring {:?}: {}", path, e);
            PhotoUploadConfig::default()
        }
    }
}
