// Platform-specific photo picker
//
// On Android the picker dialog (camera, gallery, custom buttons) lives in
// MainActivity and is driven over JNI: the options go in as JSON, the reply
// comes back as JSON once the user is done. On other platforms the picker
// replies with an error response.

use crate::models::PickerResponse;
use crate::options::PickerOptions;
use crate::LocalFuture;
use base64::Engine;

/// Presents a native photo-selection UI and yields exactly one reply.
///
/// Picker failures are not a separate channel: they come back as a response
/// whose `error` field is set.
pub trait ImagePicker {
    fn show<'a>(&'a self, options: &'a PickerOptions) -> LocalFuture<'a, PickerResponse>;
}

#[derive(Debug, Clone)]
pub enum PickerError {
    /// A JNI call into the activity failed
    Jni(String),
    Timeout(String),
    /// The activity replied with something that is not a picker response
    InvalidResponse(String),
    PlatformNotSupported(String),
}

impl std::fmt::Display for PickerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickerError::Jni(msg) => write!(f, "JNI error: {}", msg),
            PickerError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            PickerError::InvalidResponse(msg) => write!(f, "Invalid picker response: {}", msg),
            PickerError::PlatformNotSupported(msg) => write!(f, "Platform not supported: {}", msg),
        }
    }
}

impl std::error::Error for PickerError {}

const DEFAULT_MAIN_ACTIVITY_CLASS: &str = "dev/dioxus/main/MainActivity";

/// Polling interval and attempts while waiting for the user (60 seconds)
#[cfg_attr(not(target_os = "android"), allow(dead_code))]
const POLL_INTERVAL_MS: u64 = 100;
#[cfg_attr(not(target_os = "android"), allow(dead_code))]
const POLL_ATTEMPTS: u32 = 600;

/// Configuration for the picker on Android
///
/// This allows customization of the MainActivity class name for different apps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndroidPickerConfig {
    /// Fully qualified class name in slash format (e.g., "com/example/myapp/MainActivity")
    pub main_activity_class: String,
}

impl Default for AndroidPickerConfig {
    fn default() -> Self {
        Self {
            main_activity_class: DEFAULT_MAIN_ACTIVITY_CLASS.to_string(),
        }
    }
}

/// The picker backed by the platform's own dialog
#[derive(Debug, Clone, Default)]
pub struct NativeImagePicker {
    pub config: AndroidPickerConfig,
}

impl NativeImagePicker {
    pub fn new(config: AndroidPickerConfig) -> Self {
        Self { config }
    }
}

impl ImagePicker for NativeImagePicker {
    fn show<'a>(&'a self, options: &'a PickerOptions) -> LocalFuture<'a, PickerResponse> {
        Box::pin(async move {
            let response = match show_native(&self.config, options).await {
                Ok(response) => response,
                Err(e) => {
                    log::warn!("Native picker failed: {}", e);
                    return PickerResponse::error(e.to_string());
                }
            };

            if options.no_data {
                return response;
            }
            attach_image_data(response).await
        })
    }
}

/// Fills `data` from the picked file when the native side only sent a path
async fn attach_image_data(mut response: PickerResponse) -> PickerResponse {
    if response.data.is_some() {
        return response;
    }
    let Some(path) = response.path.clone() else {
        return response;
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            log::debug!("Read {} bytes of picked image {}", bytes.len(), path);
            response.data = Some(base64::engine::general_purpose::STANDARD.encode(bytes));
            response
        }
        Err(e) => PickerResponse::error(format!("Reading picked image failed: {}", e)),
    }
}

#[cfg(target_os = "android")]
async fn show_native(
    config: &AndroidPickerConfig,
    options: &PickerOptions,
) -> Result<PickerResponse, PickerError> {
    let options_json = options
        .to_json()
        .map_err(|e| PickerError::InvalidResponse(format!("Options not serializable: {}", e)))?;
    let config = config.clone();

    tokio::task::spawn_blocking(move || android::show_image_picker(&config, &options_json))
        .await
        .map_err(|e| PickerError::Jni(format!("Picker task failed: {}", e)))?
}

#[cfg(not(target_os = "android"))]
async fn show_native(
    _config: &AndroidPickerConfig,
    _options: &PickerOptions,
) -> Result<PickerResponse, PickerError> {
    Err(PickerError::PlatformNotSupported(
        "Image picker not available on this platform".to_string(),
    ))
}

#[cfg(target_os = "android")]
mod android {
    use super::{AndroidPickerConfig, PickerError, POLL_ATTEMPTS, POLL_INTERVAL_MS};
    use crate::models::PickerResponse;
    use jni::objects::{JClass, JObject, JString, JValue};
    use jni::JNIEnv;
    use ndk_context::android_context;

    fn jni_err(what: &str) -> impl Fn(jni::errors::Error) -> PickerError + '_ {
        move |e| PickerError::Jni(format!("{} failed: {}", what, e))
    }

    fn get_app_class_loader<'a>(env: &mut JNIEnv<'a>) -> Result<JObject<'a>, PickerError> {
        let at_cls = env
            .find_class("android/app/ActivityThread")
            .map_err(jni_err("find ActivityThread"))?;
        let at = env
            .call_static_method(
                &at_cls,
                "currentActivityThread",
                "()Landroid/app/ActivityThread;",
                &[],
            )
            .and_then(|v| v.l())
            .map_err(jni_err("currentActivityThread"))?;

        let app = env
            .call_method(&at, "getApplication", "()Landroid/app/Application;", &[])
            .and_then(|v| v.l())
            .map_err(jni_err("getApplication"))?;

        // Before the application is bound only the system context has a loader
        let owner = if app.is_null() {
            env.call_method(&at, "getSystemContext", "()Landroid/app/ContextImpl;", &[])
                .and_then(|v| v.l())
                .map_err(jni_err("getSystemContext"))?
        } else {
            app
        };

        env.call_method(&owner, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
            .and_then(|v| v.l())
            .map_err(jni_err("getClassLoader"))
    }

    fn load_class<'a>(
        env: &mut JNIEnv<'a>,
        loader: &JObject<'a>,
        fq_slash: &str,
    ) -> Result<JClass<'a>, PickerError> {
        // ClassLoader.loadClass wants the dotted name
        let name: JString = env
            .new_string(fq_slash.replace('/', "."))
            .map_err(jni_err("new_string"))?;
        let cls_obj = env
            .call_method(
                loader,
                "loadClass",
                "(Ljava/lang/String;)Ljava/lang/Class;",
                &[JValue::Object(&JObject::from(name))],
            )
            .and_then(|v| v.l())
            .map_err(jni_err("ClassLoader.loadClass"))?;
        Ok(JClass::from(cls_obj))
    }

    fn companion_instance<'a>(
        env: &mut JNIEnv<'a>,
        cls: &JClass<'a>,
        config: &AndroidPickerConfig,
        signature: &str,
    ) -> Result<JObject<'a>, PickerError> {
        let comp_signature = format!("L{}$Companion;", config.main_activity_class);
        let companion = env
            .get_static_field(cls, "Companion", &comp_signature)
            .and_then(|v| v.l())
            .map_err(jni_err("MainActivity.Companion"))?;
        if companion.is_null() {
            return Err(PickerError::Jni(
                "MainActivity.Companion is null, activity not initialized?".to_string(),
            ));
        }
        env.call_method(&companion, "getInstance", signature, &[])
            .and_then(|v| v.l())
            .map_err(jni_err("Companion.getInstance"))
    }

    fn get_activity_instance<'a>(
        env: &mut JNIEnv<'a>,
        config: &AndroidPickerConfig,
    ) -> Result<(JObject<'a>, JClass<'a>), PickerError> {
        let loader = get_app_class_loader(env)?;
        let cls = load_class(env, &loader, &config.main_activity_class)?;
        let signature = format!("()L{};", config.main_activity_class);

        // `@JvmStatic getInstance()`, then the static `instance` field, then the Companion
        let instance = match env
            .call_static_method(&cls, "getInstance", &signature, &[])
            .and_then(|v| v.l())
        {
            Ok(instance) => instance,
            Err(_) => {
                if env.exception_check().unwrap_or(false) {
                    let _ = env.exception_clear();
                }
                match env
                    .get_static_field(&cls, "instance", &signature)
                    .and_then(|v| v.l())
                {
                    Ok(instance) if !instance.is_null() => instance,
                    _ => {
                        if env.exception_check().unwrap_or(false) {
                            let _ = env.exception_clear();
                        }
                        companion_instance(env, &cls, config, &signature)?
                    }
                }
            }
        };

        if instance.is_null() {
            return Err(PickerError::Jni(
                "MainActivity instance is null - Activity not initialized?".to_string(),
            ));
        }
        Ok((instance, cls))
    }

    fn read_static_string(
        env: &mut JNIEnv<'_>,
        cls: &JClass<'_>,
        method: &str,
    ) -> Result<Option<String>, PickerError> {
        let obj = env
            .call_static_method(cls, method, "()Ljava/lang/String;", &[])
            .and_then(|v| v.l())
            .map_err(jni_err(method))?;
        if obj.is_null() {
            return Ok(None);
        }
        let value: String = env
            .get_string((&obj).into())
            .map_err(jni_err("String conversion"))?
            .into();
        Ok(Some(value))
    }

    /// Opens the activity's picker dialog and blocks until it replies
    pub(super) fn show_image_picker(
        config: &AndroidPickerConfig,
        options_json: &str,
    ) -> Result<PickerResponse, PickerError> {
        let vm_ptr = android_context().vm() as *mut *const jni::sys::JNIInvokeInterface_;
        let vm = unsafe { jni::JavaVM::from_raw(vm_ptr) }.map_err(jni_err("JavaVM"))?;
        let mut env = vm
            .attach_current_thread()
            .map_err(jni_err("JNI attach"))?;

        let (activity, main_cls) = get_activity_instance(&mut env, config)?;

        env.call_static_method(&main_cls, "clearLastPickerResponse", "()V", &[])
            .map_err(jni_err("clearLastPickerResponse"))?;

        let options = env
            .new_string(options_json)
            .map_err(jni_err("new_string"))?;
        env.call_method(
            &activity,
            "showImagePicker",
            "(Ljava/lang/String;)V",
            &[JValue::Object(&JObject::from(options))],
        )
        .map_err(jni_err("showImagePicker"))?;

        for _ in 0..POLL_ATTEMPTS {
            std::thread::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS));

            if let Some(json) = read_static_string(&mut env, &main_cls, "getLastPickerResponse")? {
                log::debug!("Picker replied: {} bytes", json.len());
                return serde_json::from_str(&json)
                    .map_err(|e| PickerError::InvalidResponse(e.to_string()));
            }
        }

        Err(PickerError::Timeout(
            "Image picker timeout - no selection made".to_string(),
        ))
    }
}
