use std::io::Cursor;
use std::path::Path;

use base64::{Engine, prelude::BASE64_STANDARD};
use image::{DynamicImage, ImageFormat, ImageResult};

/// Re-encodes an uploaded image for inline display.
///
/// The image keeps its detected format; undetected or unwritable formats fall
/// back to JPEG.
pub fn preview_data_uri(image_bytes: &[u8]) -> ImageResult<String> {
    let format = image::guess_format(image_bytes).ok();
    let image = image::load_from_memory(image_bytes)?;
    encode_data_uri(&image, format)
}

pub fn encode_data_uri(image: &DynamicImage, format: Option<ImageFormat>) -> ImageResult<String> {
    let encoded = format.and_then(|f| encode(image, f).ok().map(|bytes| (bytes, f)));
    let (bytes, format) = match encoded {
        Some(encoded) => encoded,
        None => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            (encode(&rgb, ImageFormat::Jpeg)?, ImageFormat::Jpeg)
        }
    };
    Ok(data_uri(format.to_mime_type(), &bytes))
}

/// Embeds a file from disk as a JPEG data URI, or returns an empty string if it is missing.
pub fn file_data_uri(image_path: &Path) -> String {
    match std::fs::read(image_path) {
        Ok(bytes) => data_uri("image/jpeg", &bytes),
        Err(_) => String::new(),
    }
}

fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes))
}

fn encode(image: &DynamicImage, format: ImageFormat) -> ImageResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format)?;
    Ok(buf.into_inner())
}
