use std::fmt;

/// Central error types for the photo upload demo
#[derive(Debug)]
pub enum AppError {
    /// Filesystem error
    Filesystem(std::io::Error),
    /// Invalid `photo-upload.toml`
    Config(photo_upload::ConfigError),
    /// A capture flow ended with `on_error`
    Upload(photo_upload::UploadError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Upload(e) => write!(f, "Upload error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

impl From<photo_upload::ConfigError> for AppError {
    fn from(e: photo_upload::ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<photo_upload::UploadError> for AppError {
    fn from(e: photo_upload::UploadError) -> Self {
        AppError::Upload(e)
    }
}

/// User-friendly error messages for UI
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Filesystem(_) => {
                "Error accessing files. Please check app permissions.".to_string()
            }
            AppError::Config(_) => "The upload settings could not be read.".to_string(),
            AppError::Upload(e) => e.user_message(),
        }
    }
}
