use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HEIGHT: u32 = 300;
pub const DEFAULT_WIDTH: u32 = 300;
pub const DEFAULT_QUALITY: u8 = 80;
pub const DEFAULT_PICKER_TITLE: &str = "Select Photo";

/// Output encoding requested from the resizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    #[default]
    #[serde(alias = "JPG")]
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Webp => "WEBP",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of one upload component, fixed at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoUploadConfig {
    /// Target height of the resized image
    pub height: u32,
    /// Target width of the resized image
    pub width: u32,
    pub format: OutputFormat,
    /// Encoder quality, 0-100
    pub quality: u8,
    /// Title shown by the native picker dialog
    pub picker_title: String,
    /// Extra CSS declarations for the tappable container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_style: Option<String>,
    /// Shallow override applied on top of the built-in picker options
    pub custom_picker_options: serde_json::Map<String, serde_json::Value>,
}

impl Default for PhotoUploadConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            format: OutputFormat::Jpeg,
            quality: DEFAULT_QUALITY,
            picker_title: DEFAULT_PICKER_TITLE.to_string(),
            container_style: None,
            custom_picker_options: serde_json::Map::new(),
        }
    }
}

impl PhotoUploadConfig {
    /// Converts to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads from a TOML string; missing keys keep their defaults
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Target height; 0 counts as unset
    pub fn effective_height(&self) -> u32 {
        or_default(self.height, DEFAULT_HEIGHT)
    }

    /// Target width; 0 counts as unset
    pub fn effective_width(&self) -> u32 {
        or_default(self.width, DEFAULT_WIDTH)
    }

    /// Quality clamped to the encoder range; 0 counts as unset
    pub fn effective_quality(&self) -> u8 {
        or_default(self.quality, DEFAULT_QUALITY).min(100)
    }
}

fn or_default<T: Default + PartialEq>(value: T, default: T) -> T {
    if value == T::default() {
        default
    } else {
        value
    }
}

/// Reference to a displayable image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    pub uri: String,
}

/// Final output of a successful flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoSelection {
    /// Base64 of the resized file as read back from disk
    pub base64: String,
    pub source: ImageSource,
}

/// Argument handed to a custom preview render function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub source: Option<ImageSource>,
}

/// View state owned by one component instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// True while a picker flow is open; taps are ignored meanwhile
    pub button_disabled: bool,
    /// Most recently resized image, for the preview
    pub avatar_source: Option<ImageSource>,
}

/// Raw reply of the native picker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PickerResponse {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub did_cancel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_button: Option<String>,
    /// Base64 encoded image bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Rotation of the picked image in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_rotation: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vertical: Option<bool>,
}

/// Classification of a [`PickerResponse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome<'a> {
    Cancelled,
    Errored(&'a str),
    CustomButton(&'a str),
    Picked(&'a str),
    MissingData,
}

impl PickerResponse {
    pub fn cancelled() -> Self {
        Self {
            did_cancel: true,
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn custom_button(name: impl Into<String>) -> Self {
        Self {
            custom_button: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn picked(data: impl Into<String>, original_rotation: Option<i32>) -> Self {
        Self {
            data: Some(data.into()),
            original_rotation,
            ..Default::default()
        }
    }

    /// Classifies the reply: cancel wins over error, error over custom button.
    /// Empty strings count as absent.
    pub fn outcome(&self) -> PickerOutcome<'_> {
        if self.did_cancel {
            return PickerOutcome::Cancelled;
        }
        if let Some(error) = self.error.as_deref().filter(|e| !e.is_empty()) {
            return PickerOutcome::Errored(error);
        }
        if let Some(button) = self.custom_button.as_deref().filter(|b| !b.is_empty()) {
            return PickerOutcome::CustomButton(button);
        }
        match self.data.as_deref().filter(|d| !d.is_empty()) {
            Some(data) => PickerOutcome::Picked(data),
            None => PickerOutcome::MissingData,
        }
    }
}

/// Arguments of one resize call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeRequest {
    /// `data:` URI, `file://` URI or plain path
    pub image_uri: String,
    pub height: u32,
    pub width: u32,
    pub format: OutputFormat,
    pub quality: u8,
    /// Clockwise rotation in degrees, a multiple of 90
    pub rotation: i32,
}

/// Result of the resize collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizedImage {
    pub uri: String,
    pub path: String,
    pub name: String,
    pub size: u64,
}
