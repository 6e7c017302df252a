//! Export of a store snapshot to plain text, HTML and clipboard payloads.

use crate::block::{BlockContent, ContentBlock, ImageData};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Text emitted for an image block in plain-text output.
pub const IMAGE_PLACEHOLDER: &str = "[Image]";

/// Separator between blocks in plain-text output.
pub const TEXT_SEPARATOR: &str = "\n\n";

/// Title of an exported HTML document.
pub const DOCUMENT_TITLE: &str = "Documenta Export";

const CODE_STYLE: &str = "background-color: #f0f0f0; font-family: 'Courier New'";

const DOCUMENT_STYLE: &str = concat!(
    "        body { font-family: Arial, sans-serif; margin: 20px; }\n",
    "        pre { background-color: #f0f0f0; padding: 10px; border-radius: 5px; }\n",
    "        img { max-width: 100%; }",
);

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only, point-in-time copy of the store's sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    blocks: Vec<ContentBlock>,
}

impl Snapshot {
    pub fn new(blocks: Vec<ContentBlock>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Everything written to the system clipboard on copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardPayload {
    pub text: String,
    pub html: String,
    /// The last image in the snapshot; the clipboard has a single image slot.
    pub image: Option<ImageData>,
}

fn block_text(content: &BlockContent) -> &str {
    match content {
        BlockContent::Image(_) => IMAGE_PLACEHOLDER,
        BlockContent::Text(text) | BlockContent::Code(text) => text,
    }
}

fn block_html(content: &BlockContent) -> String {
    match content {
        BlockContent::Image(img) => format!("<img src=\"{}\">", img.data_uri()),
        BlockContent::Text(text) => format!("<p>{}</p>", html_escape::encode_text(text)),
        BlockContent::Code(code) => format!(
            "<pre style=\"{}\">{}</pre>",
            CODE_STYLE,
            html_escape::encode_text(code)
        ),
    }
}

/// Plain-text rendering: each block's text, separated by a blank line.
pub fn to_plain_text(snapshot: &Snapshot) -> String {
    snapshot
        .blocks()
        .iter()
        .map(|block| block_text(block.content()))
        .collect::<Vec<_>>()
        .join(TEXT_SEPARATOR)
}

/// HTML fragment: one element per block, in order.
///
/// Text and code are HTML-escaped so user input cannot break the markup.
pub fn to_html(snapshot: &Snapshot) -> String {
    snapshot
        .blocks()
        .iter()
        .map(|block| block_html(block.content()))
        .collect()
}

/// Text, HTML and the last image, ready for the clipboard.
pub fn to_clipboard_payload(snapshot: &Snapshot) -> ClipboardPayload {
    let image = snapshot
        .blocks()
        .iter()
        .rev()
        .find_map(|block| block.image().cloned());

    ClipboardPayload {
        text: to_plain_text(snapshot),
        html: to_html(snapshot),
        image,
    }
}

/// A complete standalone HTML document wrapping [`to_html`].
pub fn html_document(snapshot: &Snapshot) -> String {
    format!(
        "<!DOCTYPE html>
<html>
<head>
    <meta charset=\"UTF-8\">
    <title>{DOCUMENT_TITLE}</title>
    <style>
{DOCUMENT_STYLE}
    </style>
</head>
<body>
    {}
</body>
</html>",
        to_html(snapshot)
    )
}

/// Write the HTML document to `path`, replacing any existing file.
/// Returns the document that was written.
pub fn export_html_document(snapshot: &Snapshot, path: &Path) -> Result<String, ExportError> {
    let html = html_document(snapshot);
    fs::write(path, &html).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Exported {} blocks to {}", snapshot.len(), path.display());
    Ok(html)
}
