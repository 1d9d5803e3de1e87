use crate::error::AppError;
use dioxus::prelude::*;
use photo_upload::{
    ImagePreview, PhotoSelection, PhotoUpload, PhotoUploadConfig, PickerResponse, ResizedImage,
    UploadError,
};

/// Shows one upload surface and what its callbacks reported
#[component]
pub fn UploadScreen(config: PhotoUploadConfig) -> Element {
    let mut status = use_signal(|| None::<String>);
    let mut error = use_signal(|| None::<String>);
    let mut selection = use_signal(|| None::<PhotoSelection>);
    let mut resized = use_signal(|| None::<ResizedImage>);
    let mime = config.format.mime_type();

    rsx! {
        div { style: "padding: 16px; max-width: 600px; margin: 0 auto; min-height: 100vh; background: #f5f5f5;",
            h1 { style: "color: #0066cc; text-align: center; margin-bottom: 24px; margin-top: 48px; font-size: 28px; font-weight: 700;",
                "📷 Photo Upload"
            }

            if let Some(err) = error() {
                div { style: "background: #fee; border: 1px solid #fcc; color: #c33; padding: 12px; margin-bottom: 16px; border-radius: 8px; font-size: 14px;",
                    "⚠️ {err}"
                }
            }

            div { class: "card", style: "height: 320px; margin-bottom: 16px;",
                PhotoUpload {
                    container_style: config.container_style.clone().unwrap_or_default(),
                    picker_title: config.picker_title.clone(),
                    height: config.height,
                    width: config.width,
                    format: config.format,
                    quality: config.quality,
                    custom_picker_options: config.custom_picker_options.clone(),
                    on_start: move |_| {
                        error.set(None);
                        status.set(Some("⏳ Waiting for picker...".to_string()));
                    },
                    on_response: move |response: PickerResponse| {
                        log::debug!("Picker response: {:?}", response.file_name);
                    },
                    on_cancel: move |message: String| status.set(Some(message)),
                    on_error: move |e: UploadError| {
                        status.set(None);
                        error.set(Some(AppError::from(e).user_message()));
                    },
                    on_tap_custom_button: move |button: String| {
                        status.set(Some(format!("Custom button: {}", button)));
                    },
                    on_resized_image_uri: move |image: ResizedImage| {
                        status.set(Some("🔄 Reading resized photo...".to_string()));
                        resized.set(Some(image));
                    },
                    on_photo_select: move |photo: PhotoSelection| {
                        status.set(Some("✅ Photo ready".to_string()));
                        selection.set(Some(photo));
                    },
                    render_image: move |preview: ImagePreview| {
                        // the webview cannot load file:// uris, show the bytes that were read back
                        let data_url = preview
                            .source
                            .and(selection())
                            .map(|photo| format!("data:{};base64,{}", mime, photo.base64));
                        rsx! {
                            if let Some(url) = data_url {
                                img {
                                    src: "{url}",
                                    alt: "Selected photo",
                                    style: "width: 160px; height: 160px; object-fit: cover; border-radius: 50%; margin-bottom: 12px;",
                                }
                            }
                        }
                    },
                    div { style: "font-size: 16px; color: #555;",
                        if selection().is_some() {
                            "🔁 Tap to change photo"
                        } else {
                            "📷 Tap to select a photo"
                        }
                    }
                }
            }

            if let Some(message) = status() {
                div { style: "padding: 12px; background: #e3f2fd; border-radius: 8px; color: #0066cc; font-size: 13px; margin-bottom: 16px;",
                    "{message}"
                }
            }

            if let Some(photo) = selection() {
                div { class: "card",
                    h2 { style: "margin: 0 0 12px 0; font-size: 18px; color: #333;", "Result" }
                    p { style: "font-size: 12px; color: #666; word-break: break-all; margin: 0 0 6px 0;",
                        "URI: {photo.source.uri}"
                    }
                    p { style: "font-size: 12px; color: #666; margin: 0;",
                        "Base64: "
                        {photo.base64.len().to_string()}
                        " characters"
                    }
                    if let Some(image) = resized() {
                        p { style: "font-size: 12px; color: #666; margin: 6px 0 0 0;",
                            "File: {image.name} ({image.size} bytes)"
                        }
                    }
                }
            }
        }
    }
}
