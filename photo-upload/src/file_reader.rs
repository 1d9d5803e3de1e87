use crate::error::FileReadError;
use crate::LocalFuture;
use base64::Engine;

/// Prefix the Android resizer puts in front of app-private paths
pub const ANDROID_STORAGE_MARKER: &str = "file:/data";
pub const ANDROID_DATA_ROOT: &str = "/data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Base64,
    Utf8,
}

/// Reads a file by path and returns its encoded contents
pub trait FileReader {
    fn read_file<'a>(
        &'a self,
        path: &'a str,
        encoding: Encoding,
    ) -> LocalFuture<'a, Result<String, FileReadError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Other
        }
    }
}

/// Path the resized image is read back from.
///
/// On Android the first `file:/data` is rewritten to `/data`; elsewhere the
/// uri is returned as is.
pub fn normalize_read_path(platform: Platform, uri: &str) -> String {
    match platform {
        Platform::Android => uri.replacen(ANDROID_STORAGE_MARKER, ANDROID_DATA_ROOT, 1),
        Platform::Ios | Platform::Other => uri.to_string(),
    }
}

/// Strips a `file://` or `file:` scheme. Returns `None` for other schemes.
pub fn uri_to_path(uri: &str) -> Option<&str> {
    if let Some(path) = uri.strip_prefix("file://") {
        return Some(path);
    }
    if let Some(path) = uri.strip_prefix("file:") {
        return Some(path);
    }
    match uri.split_once("://") {
        Some(_) => None,
        None => Some(uri),
    }
}

/// Reads from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileReader;

impl FileReader for LocalFileReader {
    fn read_file<'a>(
        &'a self,
        path: &'a str,
        encoding: Encoding,
    ) -> LocalFuture<'a, Result<String, FileReadError>> {
        Box::pin(async move {
            let fs_path = uri_to_path(path).ok_or_else(|| {
                FileReadError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("Unsupported uri scheme: {}", path),
                ))
            })?;
            let bytes = tokio::fs::read(fs_path).await?;

            match encoding {
                Encoding::Base64 => Ok(base64::engine::general_purpose::STANDARD.encode(bytes)),
                Encoding::Utf8 => {
                    String::from_utf8(bytes).map_err(|e| FileReadError::Utf8(e.to_string()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_android_path_is_rewritten() {
        assert_eq!(
            normalize_read_path(
                Platform::Android,
                "file:/data/user/0/com.example/cache/abc.jpg"
            ),
            "/data/user/0/com.example/cache/abc.jpg"
        );
    }

    #[test]
    fn test_only_first_marker_is_rewritten() {
        assert_eq!(
            normalize_read_path(Platform::Android, "file:/data/x/file:/data/y.jpg"),
            "/data/x/file:/data/y.jpg"
        );
    }

    #[test]
    fn test_other_platforms_keep_uri() {
        let uri = "file:/data/user/0/com.example/cache/abc.jpg";
        assert_eq!(normalize_read_path(Platform::Ios, uri), uri);
        assert_eq!(normalize_read_path(Platform::Other, uri), uri);
    }

    #[test]
    fn test_uri_to_path() {
        assert_eq!(uri_to_path("file:///tmp/a.jpg"), Some("/tmp/a.jpg"));
        assert_eq!(uri_to_path("file:/data/a.jpg"), Some("/data/a.jpg"));
        assert_eq!(uri_to_path("/tmp/a.jpg"), Some("/tmp/a.jpg"));
        assert_eq!(uri_to_path("content://media/1"), None);
    }

    #[tokio::test]
    async fn test_read_file_encodings() {
        let path = std::env::temp_dir().join(format!("{}.txt", uuid::Uuid::new_v4()));
        std::fs::write(&path, "hello").unwrap();
        let uri = format!("file://{}", path.display());

        let reader = LocalFileReader;
        assert_eq!(
            reader.read_file(&uri, Encoding::Base64).await.unwrap(),
            "aGVsbG8="
        );
        assert_eq!(
            reader
                .read_file(&path.to_string_lossy(), Encoding::Utf8)
                .await
                .unwrap(),
            "hello"
        );
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_read_missing_file_fails() {
        let result = LocalFileReader
            .read_file("/nonexistent/resized.jpg", Encoding::Base64)
            .await;
        assert!(matches!(result, Err(FileReadError::Io(_))));
    }
}
