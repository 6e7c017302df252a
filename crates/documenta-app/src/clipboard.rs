//! System clipboard: writing export payloads and grabbing images.

use crate::imaging::{self, ImagingError};
use documenta_core::{CaptureError, CapturedImage, ClipboardPayload, ImageData, ScreenCapture};
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Failed to access clipboard: {0}")]
    Access(#[from] arboard::Error),
    #[error("Clipboard image could not be prepared: {0}")]
    Image(#[from] ImagingError),
}

/// What a single clipboard write carries.
#[derive(Debug, PartialEq)]
enum Flavour<'a> {
    /// The image as pixels.
    Image(&'a ImageData),
    /// HTML with the plain text as alternate. `dropped` is the image that
    /// stays inline in the HTML but misses the pixel slot.
    Html { dropped: Option<&'a ImageData> },
}

/// The clipboard holds one flavour per write. HTML wins unless the canvas
/// holds only images.
fn flavour(payload: &ClipboardPayload, images_only: bool) -> Flavour<'_> {
    match &payload.image {
        Some(image) if images_only => Flavour::Image(image),
        image => Flavour::Html {
            dropped: image.as_ref(),
        },
    }
}

/// Write a payload to the clipboard.
pub fn copy_payload(payload: &ClipboardPayload, images_only: bool) -> Result<(), ClipboardError> {
    let mut clipboard = arboard::Clipboard::new()?;

    match flavour(payload, images_only) {
        Flavour::Image(image) => {
            let rgba = imaging::decode_rgba(image)?;
            clipboard.set_image(arboard::ImageData {
                width: rgba.width as usize,
                height: rgba.height as usize,
                bytes: Cow::Owned(rgba.pixels),
            })?;
            log::info!("Image copied to clipboard ({}x{})", rgba.width, rgba.height);
        }
        Flavour::Html { dropped } => {
            if let Some(image) = dropped {
                log::debug!(
                    "Image slot skipped: {}x{} image is only inline in the HTML",
                    image.width,
                    image.height
                );
            }
            clipboard.set_html(payload.html.as_str(), Some(payload.text.as_str()))?;
            log::info!("Copied {} characters of text to clipboard", payload.text.len());
        }
    }
    Ok(())
}

/// Takes "screenshots" from the image currently on the clipboard, which is
/// where OS screen-grab tools leave their output.
#[derive(Default)]
pub struct ClipboardCapture;

impl ScreenCapture for ClipboardCapture {
    fn capture_full_screen(&mut self) -> Result<CapturedImage, CaptureError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| CaptureError::Unavailable(e.to_string()))?;
        let img = clipboard
            .get_image()
            .map_err(|e| CaptureError::Unavailable(e.to_string()))?;

        let width = img.width as u32;
        let height = img.height as u32;
        let png = imaging::encode_png(width, height, &img.bytes)
            .map_err(|e| CaptureError::Encode(e.to_string()))?;

        log::info!("Captured screenshot: {}x{}", width, height);
        Ok(CapturedImage { width, height, png })
    }
}
