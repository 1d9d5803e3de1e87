use crate::error::ResizeError;
use crate::file_reader::uri_to_path;
use crate::models::{OutputFormat, ResizeRequest, ResizedImage};
use crate::LocalFuture;
use base64::Engine;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Takes an encoded image plus target box, format, quality and rotation and
/// produces a resized image on disk.
pub trait ImageResizer {
    fn resize(&self, request: ResizeRequest) -> LocalFuture<'_, Result<ResizedImage, ResizeError>>;
}

/// Correction angle for the rotation the picker reported.
///
/// 90 → 90, 180 → -180, 270 → -90, anything else → 0.
pub fn rotation_correction(original_rotation: Option<i32>) -> i32 {
    match original_rotation {
        Some(90) => 90,
        // a few devices report 180
        Some(180) => -180,
        // front camera (selfie) shots
        Some(270) => -90,
        _ => 0,
    }
}

/// Frames base64 image data as an inline `data:` URI
pub fn inline_jpeg_uri(base64_data: &str) -> String {
    format!("data:image/jpeg;base64,{}", base64_data)
}

/// Resizer built on the `image` crate, writing into `output_dir`
#[derive(Debug, Clone)]
pub struct ImageCrateResizer {
    pub output_dir: PathBuf,
}

impl ImageCrateResizer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl ImageResizer for ImageCrateResizer {
    fn resize(&self, request: ResizeRequest) -> LocalFuture<'_, Result<ResizedImage, ResizeError>> {
        let output_dir = self.output_dir.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || resize_to_file(&request, &output_dir))
                .await
                .map_err(|e| ResizeError::Join(e.to_string()))?
        })
    }
}

/// Loads the bytes behind a `data:` URI, `file://` URI or plain path
fn load_source_bytes(image_uri: &str) -> Result<Vec<u8>, ResizeError> {
    if let Some(rest) = image_uri.strip_prefix("data:") {
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ResizeError::InvalidUri("data uri without payload".to_string()))?;
        if !header.ends_with(";base64") {
            return Err(ResizeError::InvalidUri(format!(
                "data uri is not base64 encoded: {}",
                header
            )));
        }
        // pickers may hand over line-wrapped base64
        let payload: Vec<u8> = payload
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        return base64::engine::general_purpose::STANDARD
            .decode(&payload)
            .map_err(|e| ResizeError::Decode(format!("Invalid base64 payload: {}", e)));
    }

    let path = uri_to_path(image_uri)
        .ok_or_else(|| ResizeError::InvalidUri(image_uri.chars().take(64).collect()))?;
    Ok(std::fs::read(path)?)
}

fn apply_rotation(img: DynamicImage, rotation: i32) -> DynamicImage {
    match rotation.rem_euclid(360) {
        0 => img,
        90 => img.rotate90(),
        180 => img.rotate180(),
        270 => img.rotate270(),
        other => {
            log::warn!("Ignoring rotation of {} degrees, not a multiple of 90", other);
            img
        }
    }
}

/// Fits the image into the target box keeping the aspect ratio; never upscales
fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    let max_width = max_width.max(1);
    let max_height = max_height.max(1);
    let ratio =
        (original_width as f32 / max_width as f32).max(original_height as f32 / max_height as f32);

    if ratio > 1.0 {
        let new_width = ((original_width as f32 / ratio) as u32).max(1);
        let new_height = ((original_height as f32 / ratio) as u32).max(1);
        (new_width, new_height)
    } else {
        (original_width, original_height)
    }
}

fn encode(img: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>, ResizeError> {
    let mut buffer = Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg => {
            let rgb = img.to_rgb8();
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut buffer,
                quality.clamp(1, 100),
            );
            rgb.write_with_encoder(encoder)
                .map_err(|e| ResizeError::Encode(e.to_string()))?;
        }
        OutputFormat::Png => img
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| ResizeError::Encode(e.to_string()))?,
        // the webp encoder of `image` is lossless only, quality does not apply
        OutputFormat::Webp => img
            .write_to(&mut buffer, ImageFormat::WebP)
            .map_err(|e| ResizeError::Encode(e.to_string()))?,
    }
    Ok(buffer.into_inner())
}

fn resize_to_file(request: &ResizeRequest, output_dir: &Path) -> Result<ResizedImage, ResizeError> {
    let bytes = load_source_bytes(&request.image_uri)?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| ResizeError::Decode(format!("Failed to load image: {}", e)))?;

    let img = apply_rotation(img, request.rotation);
    let (width, height) =
        calculate_resize_dimensions(img.width(), img.height(), request.width, request.height);
    let img = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    let encoded = encode(&img, request.format, request.quality)?;

    std::fs::create_dir_all(output_dir)?;
    let name = format!("{}.{}", uuid::Uuid::new_v4(), request.format.extension());
    let path = output_dir.join(&name);
    std::fs::write(&path, &encoded)?;

    log::debug!(
        "Resized image written to {:?} ({}x{}, {} bytes)",
        path,
        width,
        height,
        encoded.len()
    );

    let path = path.to_string_lossy().to_string();
    Ok(ResizedImage {
        uri: format!("file://{}", path),
        path,
        name,
        size: encoded.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("photo-upload-{}", uuid::Uuid::new_v4()))
    }

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, _| {
            if x == 0 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn data_uri(bytes: &[u8]) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }

    fn request(image_uri: String, format: OutputFormat, rotation: i32) -> ResizeRequest {
        ResizeRequest {
            image_uri,
            height: 300,
            width: 300,
            format,
            quality: 80,
            rotation,
        }
    }

    #[test]
    fn test_rotation_correction_table() {
        assert_eq!(rotation_correction(Some(90)), 90);
        assert_eq!(rotation_correction(Some(180)), -180);
        assert_eq!(rotation_correction(Some(270)), -90);
        assert_eq!(rotation_correction(Some(0)), 0);
        assert_eq!(rotation_correction(Some(45)), 0);
        assert_eq!(rotation_correction(None), 0);
    }

    #[test]
    fn test_inline_jpeg_uri() {
        assert_eq!(inline_jpeg_uri("AAAA"), "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn test_resize_dimensions() {
        // Image larger than max
        let (w, h) = calculate_resize_dimensions(2000, 1500, 1024, 1024);
        assert!(w <= 1024);
        assert!(h <= 1024);
        assert_eq!(w, 1024);

        // Image smaller than max
        let (w, h) = calculate_resize_dimensions(800, 600, 1024, 1024);
        assert_eq!(w, 800);
        assert_eq!(h, 600);
    }

    #[test]
    fn test_resize_png_data_uri_to_jpeg() {
        let dir = temp_dir();
        let resized = resize_to_file(
            &request(data_uri(&sample_png(600, 400)), OutputFormat::Jpeg, 0),
            &dir,
        )
        .unwrap();

        assert!(resized.uri.starts_with("file://"));
        assert!(resized.name.ends_with(".jpg"));
        let written = std::fs::read(&resized.path).unwrap();
        assert_eq!(written.len() as u64, resized.size);

        let img = image::load_from_memory(&written).unwrap();
        assert_eq!(img.dimensions(), (300, 200));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_rotation_swaps_dimensions() {
        let dir = temp_dir();
        let resized = resize_to_file(
            &request(data_uri(&sample_png(40, 20)), OutputFormat::Png, -90),
            &dir,
        )
        .unwrap();

        let img = image::open(&resized.path).unwrap();
        assert_eq!(img.dimensions(), (20, 40));
        // red column at x = 0 ends up as the bottom row after a counter-clockwise turn
        assert_eq!(img.to_rgb8().get_pixel(5, 39), &Rgb([255, 0, 0]));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_resize_from_file_uri() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let source = dir.join("source.png");
        std::fs::write(&source, sample_png(10, 10)).unwrap();

        let resized = resize_to_file(
            &request(
                format!("file://{}", source.display()),
                OutputFormat::Webp,
                180,
            ),
            &dir,
        )
        .unwrap();
        assert!(resized.name.ends_with(".webp"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_invalid_payload_is_decode_error() {
        let dir = temp_dir();
        let result = resize_to_file(
            &request(
                "data:image/jpeg;base64,bm90IGFuIGltYWdl".to_string(),
                OutputFormat::Jpeg,
                0,
            ),
            &dir,
        );
        assert!(matches!(result, Err(ResizeError::Decode(_))));
    }

    #[test]
    fn test_line_wrapped_base64_payload() {
        let dir = temp_dir();
        let uri = data_uri(&sample_png(8, 8));
        let (header, payload) = uri.split_once(',').unwrap();
        let wrapped: Vec<String> = payload
            .as_bytes()
            .chunks(16)
            .map(|line| String::from_utf8(line.to_vec()).unwrap())
            .collect();
        let uri = format!("{},{}\n", header, wrapped.join("\n"));

        let resized = resize_to_file(&request(uri, OutputFormat::Jpeg, 0), &dir).unwrap();
        assert!(Path::new(&resized.path).exists());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_image_crate_resizer_runs_blocking() {
        let dir = temp_dir();
        let resizer = ImageCrateResizer::new(&dir);
        let resized = resizer
            .resize(request(data_uri(&sample_png(8, 8)), OutputFormat::Jpeg, 90))
            .await
            .unwrap();
        assert!(Path::new(&resized.path).exists());
        let _ = std::fs::remove_dir_all(dir);
    }
}
