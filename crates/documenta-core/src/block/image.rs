//! Raster image payload for screenshot blocks.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Encoding of the stored image bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    /// PNG format.
    Png,
    /// JPEG format.
    Jpeg,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// Encoded image bytes plus their pixel dimensions.
///
/// The bytes are kept base64-encoded so the payload drops straight into
/// project JSON and `data:` URIs without a second encoding pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub format: ImageFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    data_base64: String,
}

impl ImageData {
    /// Wrap already-encoded image bytes.
    pub fn new(data: &[u8], width: u32, height: u32, format: ImageFormat) -> Self {
        Self {
            format,
            width,
            height,
            data_base64: STANDARD.encode(data),
        }
    }

    /// Wrap PNG bytes.
    pub fn png(data: &[u8], width: u32, height: u32) -> Self {
        Self::new(data, width, height, ImageFormat::Png)
    }

    /// Decode the raw image bytes.
    pub fn data(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.data_base64).ok()
    }

    /// The base64 form of the image bytes.
    pub fn data_base64(&self) -> &str {
        &self.data_base64
    }

    /// `data:` URI suitable for an `<img src>` attribute.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.data_base64)
    }

    /// Size of the decoded image bytes.
    pub fn data_size(&self) -> usize {
        let padding = self.data_base64.bytes().rev().take_while(|&b| b == b'=').count();
        (self.data_base64.len() / 4 * 3).saturating_sub(padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_extension("png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("webp"), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_extension("gif"), None);
    }

    #[test]
    fn test_magic_bytes() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(ImageFormat::from_magic_bytes(&png), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(b"RIFF\0\0\0\0WEBPVP8 "),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF8"), None);
        assert_eq!(ImageFormat::from_magic_bytes(&[0x89]), None);
    }

    #[test]
    fn test_data_roundtrip_and_uri() {
        let img = ImageData::png(&[1, 2, 3], 2, 2);
        assert_eq!(img.data(), Some(vec![1, 2, 3]));
        assert_eq!(img.data_uri(), "data:image/png;base64,AQID");
    }

    #[test]
    fn test_data_size_ignores_padding() {
        assert_eq!(ImageData::png(&[1, 2, 3], 1, 1).data_size(), 3);
        assert_eq!(ImageData::png(&[1, 2, 3, 4], 1, 1).data_size(), 4);
        assert_eq!(ImageData::png(&[1, 2, 3, 4, 5], 1, 1).data_size(), 5);
        assert_eq!(ImageData::png(&[], 1, 1).data_size(), 0);
    }

    #[test]
    fn test_jpeg_data_uri() {
        let img = ImageData::new(&[0xFF, 0xD8, 0xFF], 1, 1, ImageFormat::Jpeg);
        assert_eq!(img.data_uri(), "data:image/jpeg;base64,/9j/");
    }
}
