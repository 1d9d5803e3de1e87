//! Dioxus component wrapping the capture flow
//!
//! The component renders one tappable container. Collaborators are taken from
//! a [`PhotoUploadServices`] context when the app provides one, otherwise the
//! native defaults are used.

use crate::flow::{handler, Handler, PhotoUploadFlow, PhotoUploadHandlers, ViewStateCell};
use crate::models::{
    ImagePreview, OutputFormat, PhotoSelection, PhotoUploadConfig, PickerResponse, ResizedImage,
    ViewState, DEFAULT_HEIGHT, DEFAULT_PICKER_TITLE, DEFAULT_QUALITY, DEFAULT_WIDTH,
};
use crate::services::PhotoUploadServices;
use crate::style::container_style as merged_container_style;
use crate::UploadError;
use dioxus::prelude::*;

impl ViewStateCell for Signal<ViewState> {
    fn update(&mut self, f: &mut dyn FnMut(&mut ViewState)) -> Option<ViewState> {
        // fails once the owning scope is dropped
        let mut state = self.try_write().ok()?;
        f(&mut state);
        Some((*state).clone())
    }

    fn snapshot(&self) -> Option<ViewState> {
        self.try_peek().ok().map(|state| (*state).clone())
    }
}

fn forward<T: 'static>(event_handler: Option<EventHandler<T>>) -> Option<Handler<T>> {
    event_handler.and_then(|h| handler(move |value: T| h.call(value)))
}

/// Services provided by the app, or the native defaults
fn services_from_context() -> PhotoUploadServices {
    try_consume_context::<PhotoUploadServices>().unwrap_or_else(PhotoUploadServices::native)
}

/// The tappable container for one view-state snapshot
fn surface(
    style: &str,
    current: &ViewState,
    render_image: Option<Callback<ImagePreview, Element>>,
    children: Element,
    on_tap: EventHandler<MouseEvent>,
) -> Element {
    let preview = render_image.map(|render| {
        render.call(ImagePreview {
            source: current.avatar_source.clone(),
        })
    });

    rsx! {
        button {
            r#type: "button",
            style: "{style}",
            disabled: current.button_disabled,
            onclick: move |evt| on_tap.call(evt),
            if let Some(preview) = preview {
                {preview}
            }
            {children}
        }
    }
}

/// Photo picker surface: tap, pick, resize, get base64 back
///
/// # Example
/// ```rust,ignore
/// PhotoUpload {
///     width: 512,
///     height: 512,
///     on_photo_select: move |selection: PhotoSelection| {
///         // upload selection.base64
///     },
///     render_image: move |preview: ImagePreview| rsx! {
///         if let Some(source) = preview.source {
///             img { src: "{source.uri}", style: "width: 96px; height: 96px;" }
///         }
///     },
///     "Tap to choose a photo"
/// }
/// ```
#[component]
pub fn PhotoUpload(
    /// CSS declarations merged over the default centering style
    #[props(default, into)]
    container_style: String,
    #[props(default = DEFAULT_PICKER_TITLE.to_string(), into)] picker_title: String,
    #[props(default = DEFAULT_HEIGHT)] height: u32,
    #[props(default = DEFAULT_WIDTH)] width: u32,
    #[props(default)] format: OutputFormat,
    #[props(default = DEFAULT_QUALITY)] quality: u8,
    /// Keys replacing the built-in picker options
    #[props(default)]
    custom_picker_options: serde_json::Map<String, serde_json::Value>,
    #[props(default)] on_start: Option<EventHandler<()>>,
    #[props(default)] on_response: Option<EventHandler<PickerResponse>>,
    #[props(default)] on_cancel: Option<EventHandler<String>>,
    #[props(default)] on_error: Option<EventHandler<UploadError>>,
    #[props(default)] on_tap_custom_button: Option<EventHandler<String>>,
    #[props(default)] on_resized_image_uri: Option<EventHandler<ResizedImage>>,
    #[props(default)] on_photo_select: Option<EventHandler<PhotoSelection>>,
    #[props(default)] on_after_render: Option<EventHandler<ViewState>>,
    /// Renders the preview of the last resized image
    #[props(default)]
    render_image: Option<Callback<ImagePreview, Element>>,
    #[props(default = VNode::empty())] children: Element,
) -> Element {
    let state = use_signal(ViewState::default);
    let services = use_hook(services_from_context);

    // configuration is fixed by the first render
    let flow = use_hook(|| {
        let config = PhotoUploadConfig {
            height,
            width,
            format,
            quality,
            picker_title: picker_title.clone(),
            container_style: Some(container_style.clone()).filter(|s| !s.trim().is_empty()),
            custom_picker_options: custom_picker_options.clone(),
        };
        let handlers = PhotoUploadHandlers {
            on_start: forward(on_start),
            on_response: forward(on_response),
            on_cancel: forward(on_cancel),
            on_error: forward(on_error),
            on_tap_custom_button: forward(on_tap_custom_button),
            on_resized_image_uri: forward(on_resized_image_uri),
            on_photo_select: forward(on_photo_select),
            on_after_render: forward(on_after_render),
        };
        PhotoUploadFlow::new(config, services.clone(), handlers)
    });

    let style = merged_container_style(flow.config.container_style.as_deref());
    let on_tap = EventHandler::new(move |_: MouseEvent| {
        let flow = flow.clone();
        spawn(async move {
            let mut state = state;
            flow.initiate_capture(&mut state).await;
        });
    });

    surface(&style, &state(), render_image, children, on_tap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FileReadError, ResizeError};
    use crate::file_reader::{Encoding, FileReader, Platform};
    use crate::models::{ImageSource, ResizeRequest};
    use crate::options::PickerOptions;
    use crate::picker::ImagePicker;
    use crate::resizer::ImageResizer;
    use crate::LocalFuture;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct CancellingPicker;

    impl ImagePicker for CancellingPicker {
        fn show<'a>(&'a self, _options: &'a PickerOptions) -> LocalFuture<'a, PickerResponse> {
            Box::pin(async { PickerResponse::cancelled() })
        }
    }

    struct FailingResizer;

    impl ImageResizer for FailingResizer {
        fn resize(
            &self,
            _request: ResizeRequest,
        ) -> LocalFuture<'_, Result<ResizedImage, ResizeError>> {
            Box::pin(async { Err(ResizeError::InvalidUri("unused".to_string())) })
        }
    }

    struct FailingReader;

    impl FileReader for FailingReader {
        fn read_file<'a>(
            &'a self,
            _path: &'a str,
            _encoding: Encoding,
        ) -> LocalFuture<'a, Result<String, FileReadError>> {
            Box::pin(async {
                Err(FileReadError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "unused",
                )))
            })
        }
    }

    fn test_services() -> PhotoUploadServices {
        PhotoUploadServices::new(
            Rc::new(CancellingPicker),
            Rc::new(FailingResizer),
            Rc::new(FailingReader),
            Platform::Ios,
        )
    }

    fn render(app: fn() -> Element, services: Option<PhotoUploadServices>) -> String {
        let mut dom = VirtualDom::new(app);
        if let Some(services) = services {
            dom = dom.with_root_context(services);
        }
        dom.rebuild_in_place();
        dioxus_ssr::render(&dom)
    }

    fn is_disabled(html: &str) -> bool {
        html.contains("disabled")
            && !html.contains("disabled=false")
            && !html.contains("disabled=\"false\"")
    }

    fn noop_tap() -> EventHandler<MouseEvent> {
        EventHandler::new(|_: MouseEvent| {})
    }

    fn busy_surface() -> Element {
        let state = ViewState {
            button_disabled: true,
            avatar_source: None,
        };
        surface(DEFAULT_STYLE, &state, None, rsx! { "Pick" }, noop_tap())
    }

    fn idle_surface() -> Element {
        surface(DEFAULT_STYLE, &ViewState::default(), None, rsx! { "Pick" }, noop_tap())
    }

    fn preview_surface() -> Element {
        let state = ViewState {
            button_disabled: false,
            avatar_source: Some(ImageSource {
                uri: "file:///cache/avatar.jpg".to_string(),
            }),
        };
        let render_image = Callback::new(|preview: ImagePreview| {
            let src = preview.source.map(|source| source.uri).unwrap_or_default();
            rsx! { img { src: "{src}" } }
        });
        surface(
            DEFAULT_STYLE,
            &state,
            Some(render_image),
            rsx! { span { "child" } },
            noop_tap(),
        )
    }

    const DEFAULT_STYLE: &str = crate::style::DEFAULT_CONTAINER_STYLE;

    fn styled_upload() -> Element {
        rsx! {
            PhotoUpload { container_style: "padding: 8px; flex: 2;", "Tap here" }
        }
    }

    fn bare_upload() -> Element {
        rsx! {
            PhotoUpload { "Choose" }
        }
    }

    #[derive(Clone, Default)]
    struct SeenPlatform(Rc<RefCell<Option<Platform>>>);

    fn platform_recorder() -> Element {
        let seen = use_context::<SeenPlatform>();
        use_hook(|| *seen.0.borrow_mut() = Some(services_from_context().platform));
        rsx! {}
    }

    #[derive(Clone, Default)]
    struct SignalSlot(Rc<RefCell<Option<Signal<ViewState>>>>);

    fn signal_owner() -> Element {
        let slot = use_context::<SignalSlot>();
        let state = use_signal(ViewState::default);
        use_hook(|| *slot.0.borrow_mut() = Some(state));
        rsx! {}
    }

    #[test]
    fn test_button_disabled_while_flow_open() {
        assert!(is_disabled(&render(busy_surface, None)));
        assert!(!is_disabled(&render(idle_surface, None)));
    }

    #[test]
    fn test_preview_gets_avatar_source_before_children() {
        let html = render(preview_surface, None);
        let img = html.find("file:///cache/avatar.jpg").unwrap();
        let child = html.find("<span>child</span>").unwrap();
        assert!(img < child);
    }

    #[test]
    fn test_photo_upload_merges_style_and_renders_children() {
        let html = render(styled_upload, Some(test_services()));
        assert!(html.starts_with("<button"));
        assert!(html.contains("justify-content: center"));
        assert!(html.contains("padding: 8px"));
        assert!(html.contains("flex: 2"));
        assert!(!html.contains("flex: 1"));
        assert!(html.contains("Tap here"));
        assert!(!is_disabled(&html));
    }

    #[test]
    fn test_photo_upload_renders_without_services_context() {
        let html = render(bare_upload, None);
        assert!(html.contains("Choose"));
    }

    #[test]
    fn test_services_come_from_context_when_provided() {
        let seen = SeenPlatform::default();
        let mut dom = VirtualDom::new(platform_recorder)
            .with_root_context(seen.clone())
            .with_root_context(test_services());
        dom.rebuild_in_place();
        assert_eq!(*seen.0.borrow(), Some(Platform::Ios));

        let seen = SeenPlatform::default();
        let mut dom = VirtualDom::new(platform_recorder).with_root_context(seen.clone());
        dom.rebuild_in_place();
        assert_eq!(*seen.0.borrow(), Some(Platform::current()));
    }

    #[test]
    fn test_signal_state_updates_until_dropped() {
        let slot = SignalSlot::default();
        let mut dom = VirtualDom::new(signal_owner).with_root_context(slot.clone());
        dom.rebuild_in_place();
        let mut state = (*slot.0.borrow()).unwrap();

        let updated = dom.in_runtime(|| state.update(&mut |s| s.button_disabled = true));
        assert_eq!(updated.map(|s| s.button_disabled), Some(true));
        let snapshot = dom.in_runtime(|| state.snapshot());
        assert_eq!(snapshot.map(|s| s.button_disabled), Some(true));

        drop(dom);
        assert!(state.update(&mut |s| s.button_disabled = false).is_none());
        assert!(state.snapshot().is_none());
    }
}
