use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use quill_processing::UploadedFile;

/// Encode a solid-color image of the given size.
pub fn create_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 80, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format)
        .expect("Failed to encode test image");
    out.into_inner()
}

pub fn png_upload(name: &str, width: u32, height: u32) -> UploadedFile {
    UploadedFile::new(
        name,
        Some("image/png".to_string()),
        create_test_image(width, height, ImageFormat::Png),
    )
}

pub fn jpeg_upload(name: &str, width: u32, height: u32) -> UploadedFile {
    UploadedFile::new(
        name,
        Some("image/jpeg".to_string()),
        create_test_image(width, height, ImageFormat::Jpeg),
    )
}
