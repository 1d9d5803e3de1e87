use crate::file_reader::{FileReader, LocalFileReader, Platform};
use crate::picker::{ImagePicker, NativeImagePicker};
use crate::resizer::{ImageCrateResizer, ImageResizer};
use crate::storage::default_output_dir;
use std::rc::Rc;

/// The three collaborators a capture flow talks to, plus the platform whose
/// path quirks apply.
///
/// Provide one as Dioxus context to replace the native defaults.
#[derive(Clone)]
pub struct PhotoUploadServices {
    pub picker: Rc<dyn ImagePicker>,
    pub resizer: Rc<dyn ImageResizer>,
    pub file_reader: Rc<dyn FileReader>,
    pub platform: Platform,
}

impl PhotoUploadServices {
    pub fn new(
        picker: Rc<dyn ImagePicker>,
        resizer: Rc<dyn ImageResizer>,
        file_reader: Rc<dyn FileReader>,
        platform: Platform,
    ) -> Self {
        Self {
            picker,
            resizer,
            file_reader,
            platform,
        }
    }

    /// Native picker, `image` based resizer writing to the app's `images`
    /// directory, local filesystem reader
    pub fn native() -> Self {
        Self::new(
            Rc::new(NativeImagePicker::default()),
            Rc::new(ImageCrateResizer::new(default_output_dir())),
            Rc::new(LocalFileReader),
            Platform::current(),
        )
    }
}
