//! Content blocks placed on the canvas.

mod image;

pub use image::{ImageData, ImageFormat};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a block.
pub type BlockId = Uuid;

/// Handle returned when a block is added; identifies it for the rest of its life.
pub type BlockHandle = BlockId;

/// Height hint for text and code editors before layout reports a real one.
pub const DEFAULT_EDITOR_HEIGHT: f64 = 100.0;

/// The kind of a block. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Image,
    Text,
    Code,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Image => "image",
            BlockKind::Text => "text",
            BlockKind::Code => "code",
        }
    }
}

/// Payload of a block, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum BlockContent {
    Image(ImageData),
    Text(String),
    Code(String),
}

impl BlockContent {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Image(_) => BlockKind::Image,
            BlockContent::Text(_) => BlockKind::Text,
            BlockContent::Code(_) => BlockKind::Code,
        }
    }
}

/// One unit of canvas content.
///
/// The payload can be edited in place but the variant never changes, so a
/// block's kind is stable for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub(crate) id: BlockId,
    content: BlockContent,
    /// Rendered height, used for drop hit testing.
    height: f64,
}

impl ContentBlock {
    /// Create a block with a fresh id.
    pub fn new(content: BlockContent) -> Self {
        let height = match &content {
            BlockContent::Image(img) => img.height as f64,
            BlockContent::Text(_) | BlockContent::Code(_) => DEFAULT_EDITOR_HEIGHT,
        };
        Self {
            id: Uuid::new_v4(),
            content,
            height,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    pub fn content(&self) -> &BlockContent {
        &self.content
    }

    /// Text buffer of a text or code block.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            BlockContent::Text(s) | BlockContent::Code(s) => Some(s),
            BlockContent::Image(_) => None,
        }
    }

    /// Mutable text buffer of a text or code block.
    pub fn text_mut(&mut self) -> Option<&mut String> {
        match &mut self.content {
            BlockContent::Text(s) | BlockContent::Code(s) => Some(s),
            BlockContent::Image(_) => None,
        }
    }

    /// Replace the buffer of a text or code block.
    /// Returns false for image blocks, which are left untouched.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        match self.text_mut() {
            Some(buf) => {
                *buf = text.into();
                true
            }
            None => false,
        }
    }

    pub fn image(&self) -> Option<&ImageData> {
        match &self.content {
            BlockContent::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Record the rendered height. Negative values are treated as zero.
    pub fn set_height(&mut self, height: f64) {
        self.height = height.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_content() {
        let text = ContentBlock::new(BlockContent::Text("hi".into()));
        let code = ContentBlock::new(BlockContent::Code("x = 1".into()));
        let img = ContentBlock::new(BlockContent::Image(ImageData::png(&[0; 4], 2, 40)));

        assert_eq!(text.kind(), BlockKind::Text);
        assert_eq!(code.kind(), BlockKind::Code);
        assert_eq!(img.kind(), BlockKind::Image);
        assert_ne!(text.id(), code.id());
    }

    #[test]
    fn test_default_heights() {
        let text = ContentBlock::new(BlockContent::Text(String::new()));
        let img = ContentBlock::new(BlockContent::Image(ImageData::png(&[0; 4], 2, 40)));
        assert_eq!(text.height(), DEFAULT_EDITOR_HEIGHT);
        assert_eq!(img.height(), 40.0);
    }

    #[test]
    fn test_edit_text_keeps_kind() {
        let mut code = ContentBlock::new(BlockContent::Code("a".into()));
        code.text_mut().unwrap().push_str("bc");
        assert_eq!(code.text(), Some("abc"));
        assert!(code.set_text("print(1)"));
        assert_eq!(code.kind(), BlockKind::Code);
        assert_eq!(code.text(), Some("print(1)"));
    }

    #[test]
    fn test_image_has_no_text() {
        let mut img = ContentBlock::new(BlockContent::Image(ImageData::png(&[0; 4], 1, 1)));
        assert!(img.text().is_none());
        assert!(!img.set_text("nope"));
        assert_eq!(img.kind(), BlockKind::Image);
    }

    #[test]
    fn test_content_json_shape() {
        let json = serde_json::to_string(&BlockContent::Text("Hello".into())).unwrap();
        assert_eq!(json, r#"{"kind":"text","payload":"Hello"}"#);
    }
}
