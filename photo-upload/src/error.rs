use std::fmt;

/// Error type for the resize collaborator
#[derive(Debug)]
pub enum ResizeError {
    /// The image reference was neither a data URI, a file URI nor a path
    InvalidUri(String),
    /// The source bytes could not be decoded as an image
    Decode(String),
    /// The resized image could not be encoded in the requested format
    Encode(String),
    /// Writing the output file failed
    Io(std::io::Error),
    /// The blocking worker panicked or was cancelled
    Join(String),
}

impl fmt::Display for ResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeError::InvalidUri(msg) => write!(f, "Invalid image uri: {}", msg),
            ResizeError::Decode(msg) => write!(f, "Image decode error: {}", msg),
            ResizeError::Encode(msg) => write!(f, "Image encode error: {}", msg),
            ResizeError::Io(e) => write!(f, "IO error: {}", e),
            ResizeError::Join(msg) => write!(f, "Resize task failed: {}", msg),
        }
    }
}

impl std::error::Error for ResizeError {}

impl From<std::io::Error> for ResizeError {
    fn from(err: std::io::Error) -> Self {
        ResizeError::Io(err)
    }
}

/// Error type for the file-read collaborator
#[derive(Debug)]
pub enum FileReadError {
    Io(std::io::Error),
    /// Content was requested as UTF-8 text but is not valid UTF-8
    Utf8(String),
}

impl fmt::Display for FileReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileReadError::Io(e) => write!(f, "IO error: {}", e),
            FileReadError::Utf8(msg) => write!(f, "File is not valid UTF-8: {}", msg),
        }
    }
}

impl std::error::Error for FileReadError {}

impl From<std::io::Error> for FileReadError {
    fn from(err: std::io::Error) -> Self {
        FileReadError::Io(err)
    }
}

/// Everything that can end a capture flow with `on_error`
#[derive(Debug)]
pub enum UploadError {
    /// Error payload reported by the picker, passed through unchanged
    Picker(String),
    /// The picker reported success but delivered no image data
    MissingData,
    Resize(ResizeError),
    FileRead(FileReadError),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Picker(msg) => write!(f, "ImagePicker Error: {}", msg),
            UploadError::MissingData => write!(f, "Image picker returned no image data"),
            UploadError::Resize(e) => write!(f, "Resize failed: {}", e),
            UploadError::FileRead(e) => write!(f, "Reading resized image failed: {}", e),
        }
    }
}

impl std::error::Error for UploadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UploadError::Resize(e) => Some(e),
            UploadError::FileRead(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResizeError> for UploadError {
    fn from(err: ResizeError) -> Self {
        UploadError::Resize(err)
    }
}

impl From<FileReadError> for UploadError {
    fn from(err: FileReadError) -> Self {
        UploadError::FileRead(err)
    }
}

impl UploadError {
    /// Short message suitable for showing next to the upload surface
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Picker(msg) => msg.clone(),
            UploadError::MissingData => "No photo was returned.".to_string(),
            UploadError::Resize(_) => "Error processing image.".to_string(),
            UploadError::FileRead(_) => {
                "Error accessing files. Please check app permissions.".to_string()
            }
        }
    }
}

/// Error type for loading and storing a [`crate::PhotoUploadConfig`]
#[derive(Debug)]
pub enum ConfigError {
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Config serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err)
    }
}
