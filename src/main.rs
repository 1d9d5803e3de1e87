use dioxus::prelude::*;
use photo_upload::PhotoUploadServices;

mod components;
mod config;
mod error;

use components::UploadScreen;

fn main() {
    init_logging();
    dioxus::launch(App);
}

fn init_logging() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("photo-upload"),
    );

    #[cfg(not(target_os = "android"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[component]
fn App() -> Element {
    use_context_provider(PhotoUploadServices::native);
    let upload_config = use_hook(config::load_upload_config);

    rsx! {
        div { style: "display: flex; flex-direction: column; height: 100vh; font-family: sans-serif;",
            div { style: "flex: 1; overflow-y: auto;",
                UploadScreen { config: upload_config }
            }
        }
    }
}
