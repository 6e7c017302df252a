//! Image encoding and decoding at the clipboard and file boundaries.

use documenta_core::{ImageData, ImageFormat};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("Image decoding failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Stored image bytes are not valid base64")]
    Corrupt,
    #[error("Not a PNG, JPEG or WebP image")]
    UnknownFormat,
}

/// RGBA8 pixels with their dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Encode RGBA8 pixels as PNG.
pub fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, ImagingError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba)?;
    }
    Ok(png_data)
}

/// Wrap encoded image bytes as a block payload.
///
/// The format comes from the magic bytes, falling back to the file
/// extension when `hint` is given. The bytes are decoded once to learn the
/// pixel size and reject truncated files.
pub fn image_data(data: &[u8], hint: Option<&Path>) -> Result<ImageData, ImagingError> {
    let format = ImageFormat::from_magic_bytes(data)
        .or_else(|| {
            hint.and_then(|p| p.extension())
                .and_then(|ext| ext.to_str())
                .and_then(ImageFormat::from_extension)
        })
        .ok_or(ImagingError::UnknownFormat)?;

    let decoded = image::load_from_memory_with_format(data, codec_format(format))?;
    Ok(ImageData::new(data, decoded.width(), decoded.height(), format))
}

/// Decode a stored image into RGBA8 pixels.
pub fn decode_rgba(stored: &ImageData) -> Result<RgbaImage, ImagingError> {
    let data = stored.data().ok_or(ImagingError::Corrupt)?;
    let rgba = image::load_from_memory_with_format(&data, codec_format(stored.format))?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(RgbaImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

fn codec_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::WebP => image::ImageFormat::WebP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn checker() -> Vec<u8> {
        vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 0,
        ]
    }

    fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 10, 10]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_png_payload() {
        let png = encode_png(2, 2, &checker()).unwrap();
        let data = image_data(&png, None).unwrap();
        assert_eq!(data.format, ImageFormat::Png);
        assert_eq!((data.width, data.height), (2, 2));
        assert_eq!(data.data_size(), png.len());
    }

    #[test]
    fn test_decode_restores_pixels() {
        let png = encode_png(2, 2, &checker()).unwrap();
        let decoded = decode_rgba(&ImageData::png(&png, 2, 2)).unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 2));
        assert_eq!(decoded.pixels, checker());
    }

    #[test]
    fn test_jpeg_payload() {
        let bytes = jpeg(4, 3);
        let data = image_data(&bytes, Some(Path::new("shot.jpg"))).unwrap();
        assert_eq!(data.format, ImageFormat::Jpeg);
        assert_eq!((data.width, data.height), (4, 3));
        assert!(data.data_uri().starts_with("data:image/jpeg;base64,"));

        let rgba = decode_rgba(&data).unwrap();
        assert_eq!(rgba.pixels.len(), 4 * 3 * 4);
    }

    #[test]
    fn test_unknown_or_garbage_is_error() {
        assert!(matches!(
            image_data(b"not an image", Some(Path::new("notes.txt"))),
            Err(ImagingError::UnknownFormat)
        ));
        // Extension says PNG, bytes disagree.
        assert!(matches!(
            image_data(b"not an image", Some(Path::new("shot.png"))),
            Err(ImagingError::Decode(_))
        ));
    }
}
