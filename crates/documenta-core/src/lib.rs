//! Documenta Core Library
//!
//! Content blocks, their ordering, drag reordering and export for the
//! Documenta document composer. Nothing here depends on a GUI toolkit.

pub mod block;
pub mod capture;
pub mod drag;
pub mod export;
pub mod layout;
pub mod storage;
pub mod store;

pub use block::{BlockContent, BlockHandle, BlockId, BlockKind, ContentBlock, ImageData, ImageFormat};
pub use capture::{CAPTURE_DELAY, CaptureError, CapturedImage, ScreenCapture};
pub use drag::{DragGesture, DragOutcome, DragState, MIN_DRAG_DISTANCE};
pub use export::{
    ClipboardPayload, ExportError, Snapshot, export_html_document, html_document,
    to_clipboard_payload, to_html, to_plain_text,
};
pub use layout::{Span, StackLayout};
pub use store::ContentStore;
