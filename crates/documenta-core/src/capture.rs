//! Screen-capture collaborator boundary.

use crate::block::{BlockContent, ImageData};
use std::time::Duration;
use thiserror::Error;

/// Pause before grabbing the screen so menus and overlays can close.
pub const CAPTURE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No image available: {0}")]
    Unavailable(String),
    #[error("Failed to encode capture: {0}")]
    Encode(String),
}

/// A captured screen image, PNG-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl CapturedImage {
    pub fn into_image_data(self) -> ImageData {
        ImageData::png(&self.png, self.width, self.height)
    }
}

impl From<CapturedImage> for BlockContent {
    fn from(capture: CapturedImage) -> Self {
        BlockContent::Image(capture.into_image_data())
    }
}

/// Source of full-screen captures.
pub trait ScreenCapture {
    fn capture_full_screen(&mut self) -> Result<CapturedImage, CaptureError>;
}
