//! # Photo Upload
//!
//! A photo picker component: the user taps, picks a photo from the camera or
//! gallery, the photo is resized and compressed, and the caller receives both
//! a displayable image uri and the base64 encoded file.
//!
//! This crate provides:
//! - The capture flow (picker → rotation fix → resize → read back → callbacks)
//! - Default collaborators: an Android picker driven over JNI, a resizer built
//!   on `image`, and a local file reader
//! - A Dioxus `PhotoUpload` component (feature `components`)
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use photo_upload::{handler, PhotoUploadConfig, PhotoUploadFlow, PhotoUploadHandlers, PhotoUploadServices};
//!
//! let flow = PhotoUploadFlow::new(
//!     PhotoUploadConfig::default(),
//!     PhotoUploadServices::native(),
//!     PhotoUploadHandlers {
//!         on_photo_select: handler(|selection| upload(selection.base64)),
//!         ..Default::default()
//!     },
//! );
//! flow.initiate_capture(&mut state).await;
//! ```

use std::future::Future;
use std::pin::Pin;

pub mod error;
pub mod file_reader;
pub mod flow;
pub mod models;
pub mod options;
pub mod picker;
pub mod resizer;
pub mod services;
pub mod storage;
pub mod style;

#[cfg(feature = "components")]
pub mod components;

/// Future returned by the collaborator traits; the flow runs on one thread
pub type LocalFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

pub use error::{ConfigError, FileReadError, ResizeError, UploadError};
pub use file_reader::{normalize_read_path, Encoding, FileReader, LocalFileReader, Platform};
pub use flow::{
    handler, CaptureOutcome, Handler, PhotoUploadFlow, PhotoUploadHandlers, ViewStateCell,
    CANCEL_MESSAGE,
};
pub use models::{
    ImagePreview, ImageSource, OutputFormat, PhotoSelection, PhotoUploadConfig, PickerOutcome,
    PickerResponse, ResizeRequest, ResizedImage, ViewState,
};
pub use options::{CustomButton, PickerOptions, StorageOptions};
pub use picker::{AndroidPickerConfig, ImagePicker, NativeImagePicker, PickerError};
pub use resizer::{rotation_correction, ImageCrateResizer, ImageResizer};
pub use services::PhotoUploadServices;
pub use style::{merge_style, DEFAULT_CONTAINER_STYLE};

#[cfg(feature = "components")]
pub use components::PhotoUpload;
