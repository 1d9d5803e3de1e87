//! Options handed to the native picker.
//!
//! The picker receives a JSON object. The fields the component itself relies on
//! are typed; anything else a caller puts into its override object is carried
//! in [`PickerOptions::extra`] and forwarded untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Storage directory below the app data dir where the picker keeps photos
pub const DEFAULT_STORAGE_PATH: &str = "images";

/// Where the picker stores taken photos.
///
/// Both keys are optional on the wire: an override object that names only
/// `path` is forwarded as is, without `skipBackup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_backup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            skip_backup: Some(true),
            path: Some(DEFAULT_STORAGE_PATH.to_string()),
            extra: Map::new(),
        }
    }
}

/// Extra entry in the picker dialog; tapping it ends the flow with its `name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomButton {
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerOptions {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_options: Option<StorageOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_button_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_photo_button_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choose_from_library_button_title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_buttons: Vec<CustomButton>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// When set the picker must not return base64 data
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_data: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PickerOptions {
    /// Built-in options: the title plus storage in `images` without backup
    pub fn defaults(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            storage_options: Some(StorageOptions::default()),
            cancel_button_title: None,
            take_photo_button_title: None,
            choose_from_library_button_title: None,
            custom_buttons: Vec::new(),
            media_type: None,
            no_data: false,
            extra: Map::new(),
        }
    }

    /// Applies a caller override object on top of `self`.
    ///
    /// This is a shallow merge: every top-level key of `overrides` replaces the
    /// key of the same name, so an override `storageOptions` replaces the whole
    /// default object. Keys the typed fields do not know, and keys missing
    /// from a partial `storageOptions`, pass through unchanged. Only a value of
    /// the wrong JSON type (for example a string `storageOptions`) makes the
    /// override unusable; it is then dropped and the unmerged options are
    /// returned.
    pub fn merged(&self, overrides: &Map<String, Value>) -> Self {
        if overrides.is_empty() {
            return self.clone();
        }

        let mut merged = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => return self.clone(),
        };
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }

        match serde_json::from_value(Value::Object(merged)) {
            Ok(options) => options,
            Err(e) => {
                log::warn!("Ignoring invalid custom picker options: {}", e);
                self.clone()
            }
        }
    }

    /// JSON handed over to the native side
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
