use bytes::Bytes;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageError, ImageFormat, ImageReader, Rgba, RgbaImage};
use quill_core::models::{ThumbnailMethod, TransformSpec, TransformSpecError};
use std::io::Cursor;

#[derive(Debug, thiserror::Error)]
pub enum DeriveError {
    #[error("Unreadable image: {0}")]
    UnreadableImage(#[source] ImageError),

    #[error("Invalid transform parameters: {0}")]
    InvalidTransformParameters(#[from] TransformSpecError),

    #[error("Unsupported output format for extension {0:?}")]
    UnsupportedFormat(String),

    #[error("Failed to encode derived image: {0}")]
    Encode(#[source] ImageError),

    #[error("Thumbnail task failed: {0}")]
    Task(String),
}

/// One encoded derived image
#[derive(Debug, Clone)]
pub struct DerivedImage {
    pub spec: TransformSpec,
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

/// Geometric transforms for thumbnails
///
/// All methods are deterministic functions of the source pixels and the
/// spec; the same input always yields the same output bytes.
pub struct ThumbnailDeriver;

impl ThumbnailDeriver {
    /// Decode an image, guessing the format from its content.
    pub fn decode(data: &[u8]) -> Result<DynamicImage, DeriveError> {
        ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| DeriveError::UnreadableImage(ImageError::IoError(e)))?
            .decode()
            .map_err(DeriveError::UnreadableImage)
    }

    /// Apply one transform to a decoded image.
    pub fn derive(img: &DynamicImage, spec: &TransformSpec) -> Result<DynamicImage, DeriveError> {
        spec.validate()?;

        let derived = match spec.method {
            ThumbnailMethod::Resize => {
                let filter = Self::select_filter(img.dimensions(), (spec.width, spec.height));
                img.resize_exact(spec.width, spec.height, filter)
            }
            ThumbnailMethod::Crop => {
                let filter = Self::select_filter(img.dimensions(), (spec.width, spec.height));
                img.resize_to_fill(spec.width, spec.height, filter)
            }
            ThumbnailMethod::Fill => Self::fill(img, spec.width, spec.height),
            ThumbnailMethod::PercentScale => {
                let (width, height) = Self::percent_dimensions(img.dimensions(), spec.percent);
                let filter = Self::select_filter(img.dimensions(), (width, height));
                img.resize_exact(width, height, filter)
            }
        };

        Ok(derived)
    }

    /// Scale to fit inside the target box and center on a white canvas of exactly that size.
    fn fill(img: &DynamicImage, target_width: u32, target_height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();

        let scale_width = target_width as f64 / orig_width as f64;
        let scale_height = target_height as f64 / orig_height as f64;
        let scale = scale_width.min(scale_height);

        let scaled_width = ((orig_width as f64 * scale).round() as u32).clamp(1, target_width);
        let scaled_height = ((orig_height as f64 * scale).round() as u32).clamp(1, target_height);

        let filter = Self::select_filter((orig_width, orig_height), (scaled_width, scaled_height));
        let resized = img.resize_exact(scaled_width, scaled_height, filter);

        let background = Rgba([255u8, 255u8, 255u8, 255u8]);
        let mut canvas =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(target_width, target_height, background));

        let x_offset = (target_width - scaled_width) / 2;
        let y_offset = (target_height - scaled_height) / 2;
        imageops::overlay(&mut canvas, &resized, x_offset as i64, y_offset as i64);

        canvas
    }

    fn percent_dimensions((width, height): (u32, u32), percent: u8) -> (u32, u32) {
        let factor = percent as f64 / 100.0;
        let scaled = |d: u32| ((d as f64 * factor).round() as u32).max(1);
        (scaled(width), scaled(height))
    }

    /// Pick a resampling filter by how much the image shrinks.
    fn select_filter(
        (orig_width, orig_height): (u32, u32),
        (new_width, new_height): (u32, u32),
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Output format for a stored file extension.
    pub fn format_for_extension(extension: &str) -> Option<ImageFormat> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Encode in `format`, converting the pixel layout to one the encoder accepts.
    pub fn encode(img: &DynamicImage, format: ImageFormat) -> Result<Bytes, DeriveError> {
        let converted = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
            ImageFormat::Gif | ImageFormat::WebP => DynamicImage::ImageRgba8(img.to_rgba8()),
            _ => img.clone(),
        };

        let (width, height) = converted.dimensions();
        let mut buffer = Vec::with_capacity(width as usize * height as usize * 3);
        converted
            .write_to(&mut Cursor::new(&mut buffer), format)
            .map_err(DeriveError::Encode)?;

        Ok(Bytes::from(buffer))
    }

    /// Decode once and derive every spec, encoding in the format matching `extension`.
    pub fn derive_all(
        data: &[u8],
        extension: &str,
        specs: &[TransformSpec],
    ) -> Result<Vec<DerivedImage>, DeriveError> {
        for spec in specs {
            spec.validate()?;
        }

        let format = Self::format_for_extension(extension)
            .ok_or_else(|| DeriveError::UnsupportedFormat(extension.to_string()))?;
        let img = Self::decode(data)?;

        specs
            .iter()
            .map(|spec| {
                let derived = Self::derive(&img, spec)?;
                let (width, height) = derived.dimensions();
                tracing::debug!(
                    method = %spec.method,
                    width = width,
                    height = height,
                    "Derived thumbnail"
                );
                Ok(DerivedImage {
                    spec: *spec,
                    width,
                    height,
                    data: Self::encode(&derived, format)?,
                })
            })
            .collect()
    }

    /// [`derive_all`](Self::derive_all) on the blocking thread pool.
    pub async fn derive_all_blocking(
        data: Bytes,
        extension: String,
        specs: Vec<TransformSpec>,
    ) -> Result<Vec<DerivedImage>, DeriveError> {
        tokio::task::spawn_blocking(move || Self::derive_all(&data, &extension, &specs))
            .await
            .map_err(|e| DeriveError::Task(e.to_string()))?
    }
}
