//! The capture flow behind one tap.
//!
//! `picker -> resizer -> file reader -> on_photo_select`, run as one task with
//! three suspension points. Every outcome is reported through the optional
//! handlers in [`PhotoUploadHandlers`]; an absent handler is skipped.

use crate::error::UploadError;
use crate::file_reader::{normalize_read_path, Encoding};
use crate::models::{
    ImageSource, PhotoSelection, PhotoUploadConfig, PickerOutcome, PickerResponse, ResizeRequest,
    ResizedImage, ViewState,
};
use crate::options::PickerOptions;
use crate::resizer::{inline_jpeg_uri, rotation_correction};
use crate::services::PhotoUploadServices;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Message handed to `on_cancel`
pub const CANCEL_MESSAGE: &str = "User cancelled image picker";

pub type Handler<T> = Rc<dyn Fn(T)>;

/// Wraps a closure as an optional handler
pub fn handler<T>(f: impl Fn(T) + 'static) -> Option<Handler<T>> {
    let f: Handler<T> = Rc::new(f);
    Some(f)
}

/// Caller hooks, all optional
#[derive(Clone, Default)]
pub struct PhotoUploadHandlers {
    /// A flow started (useful for loading indicators)
    pub on_start: Option<Handler<()>>,
    /// Raw picker reply, before it is classified
    pub on_response: Option<Handler<PickerResponse>>,
    pub on_cancel: Option<Handler<String>>,
    pub on_error: Option<Handler<UploadError>>,
    pub on_tap_custom_button: Option<Handler<String>>,
    pub on_resized_image_uri: Option<Handler<ResizedImage>>,
    pub on_photo_select: Option<Handler<PhotoSelection>>,
    /// Called with a snapshot after every view-state update
    pub on_after_render: Option<Handler<ViewState>>,
}

fn emit<T>(handler: &Option<Handler<T>>, value: T) {
    if let Some(handler) = handler {
        handler(value);
    }
}

/// Storage of the component's view state.
///
/// Both methods return `None` once the owning component is gone; updates are
/// then dropped silently.
pub trait ViewStateCell {
    fn update(&mut self, f: &mut dyn FnMut(&mut ViewState)) -> Option<ViewState>;
    fn snapshot(&self) -> Option<ViewState>;
}

impl ViewStateCell for Rc<RefCell<ViewState>> {
    fn update(&mut self, f: &mut dyn FnMut(&mut ViewState)) -> Option<ViewState> {
        let mut state = self.borrow_mut();
        f(&mut state);
        Some(state.clone())
    }

    fn snapshot(&self) -> Option<ViewState> {
        Some(self.borrow().clone())
    }
}

impl ViewStateCell for Weak<RefCell<ViewState>> {
    fn update(&mut self, f: &mut dyn FnMut(&mut ViewState)) -> Option<ViewState> {
        self.upgrade()?.update(f)
    }

    fn snapshot(&self) -> Option<ViewState> {
        self.upgrade()?.snapshot()
    }
}

/// How a call to [`PhotoUploadFlow::initiate_capture`] ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A flow was already running (or the component is gone)
    Ignored,
    Cancelled,
    /// `on_error` was called
    Failed,
    CustomButton(String),
    Selected(ImageSource),
}

#[derive(Clone)]
pub struct PhotoUploadFlow {
    pub config: PhotoUploadConfig,
    pub services: PhotoUploadServices,
    pub handlers: PhotoUploadHandlers,
}

impl PhotoUploadFlow {
    pub fn new(
        config: PhotoUploadConfig,
        services: PhotoUploadServices,
        handlers: PhotoUploadHandlers,
    ) -> Self {
        Self {
            config,
            services,
            handlers,
        }
    }

    /// Built-in picker options with the caller's override applied
    pub fn picker_options(&self) -> PickerOptions {
        PickerOptions::defaults(self.config.picker_title.clone())
            .merged(&self.config.custom_picker_options)
    }

    fn set_state(&self, state: &mut impl ViewStateCell, mut f: impl FnMut(&mut ViewState)) {
        match state.update(&mut f) {
            Some(snapshot) => emit(&self.handlers.on_after_render, snapshot),
            None => log::debug!("View state is gone, update dropped"),
        }
    }

    fn fail(&self, error: UploadError) -> CaptureOutcome {
        emit(&self.handlers.on_error, error);
        CaptureOutcome::Failed
    }

    /// Runs one tap: picker, rotation, resize, read back, notify.
    ///
    /// A tap while `button_disabled` is set does nothing. `button_disabled` is
    /// cleared as soon as the picker replies, whatever the reply is.
    pub async fn initiate_capture(&self, state: &mut impl ViewStateCell) -> CaptureOutcome {
        match state.snapshot() {
            Some(current) if !current.button_disabled => {}
            _ => {
                log::debug!("Picker already open, tap ignored");
                return CaptureOutcome::Ignored;
            }
        }

        self.set_state(state, |s| s.button_disabled = true);
        emit(&self.handlers.on_start, ());

        let options = self.picker_options();
        let response = self.services.picker.show(&options).await;

        self.set_state(state, |s| s.button_disabled = false);
        emit(&self.handlers.on_response, response.clone());

        let data = match response.outcome() {
            PickerOutcome::Cancelled => {
                log::info!("{}", CANCEL_MESSAGE);
                emit(&self.handlers.on_cancel, CANCEL_MESSAGE.to_string());
                return CaptureOutcome::Cancelled;
            }
            PickerOutcome::Errored(error) => {
                log::warn!("ImagePicker Error: {}", error);
                return self.fail(UploadError::Picker(error.to_string()));
            }
            PickerOutcome::CustomButton(button) => {
                log::info!("User tapped custom button: {}", button);
                emit(&self.handlers.on_tap_custom_button, button.to_string());
                return CaptureOutcome::CustomButton(button.to_string());
            }
            PickerOutcome::MissingData => {
                log::warn!("Picker reported success without image data");
                return self.fail(UploadError::MissingData);
            }
            PickerOutcome::Picked(data) => data,
        };

        let request = ResizeRequest {
            image_uri: inline_jpeg_uri(data),
            height: self.config.effective_height(),
            width: self.config.effective_width(),
            format: self.config.format,
            quality: self.config.effective_quality(),
            rotation: rotation_correction(response.original_rotation),
        };
        log::debug!(
            "Resizing to {}x{} {} q{} rotation {}",
            request.width,
            request.height,
            request.format,
            request.quality,
            request.rotation
        );

        let resized = match self.services.resizer.resize(request).await {
            Ok(resized) => resized,
            Err(e) => {
                log::error!("Resizing picked image failed: {}", e);
                return self.fail(e.into());
            }
        };
        emit(&self.handlers.on_resized_image_uri, resized.clone());

        let read_path = normalize_read_path(self.services.platform, &resized.uri);
        let base64 = match self
            .services
            .file_reader
            .read_file(&read_path, Encoding::Base64)
            .await
        {
            Ok(base64) => base64,
            Err(e) => {
                log::error!("Reading resized image {} failed: {}", read_path, e);
                return self.fail(e.into());
            }
        };

        // the preview keeps the uri as the resizer returned it
        let source = ImageSource { uri: resized.uri };
        let stored = source.clone();
        self.set_state(state, move |s| s.avatar_source = Some(stored.clone()));

        emit(
            &self.handlers.on_photo_select,
            PhotoSelection {
                base64,
                source: source.clone(),
            },
        );
        CaptureOutcome::Selected(source)
    }
}
