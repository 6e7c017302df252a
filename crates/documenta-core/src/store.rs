//! Ordered content store: the blocks on the canvas and their order.

use crate::block::{BlockContent, BlockId, ContentBlock, ImageData};
use crate::export::Snapshot;
use crate::layout::StackLayout;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// The canvas document: every block, keyed by id, plus their order.
///
/// `order` is the only source of truth for render and export order. All
/// mutation goes through the methods below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentStore {
    /// Unique project identifier.
    pub id: String,
    /// Project name.
    pub name: String,
    blocks: HashMap<BlockId, ContentBlock>,
    /// Block ids, top to bottom.
    order: Vec<BlockId>,
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            blocks: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Append a block at the end of the sequence.
    pub fn append(&mut self, content: BlockContent) -> BlockId {
        let block = ContentBlock::new(content);
        let id = block.id();
        log::debug!("append {} block {}", block.kind().as_str(), id);
        self.order.push(id);
        self.blocks.insert(id, block);
        id
    }

    pub fn add_text(&mut self, text: impl Into<String>) -> BlockId {
        self.append(BlockContent::Text(text.into()))
    }

    pub fn add_code(&mut self, code: impl Into<String>) -> BlockId {
        self.append(BlockContent::Code(code.into()))
    }

    pub fn add_image(&mut self, image: ImageData) -> BlockId {
        self.append(BlockContent::Image(image))
    }

    /// Remove a block. Returns `None` if it is not in the store.
    pub fn remove(&mut self, id: BlockId) -> Option<ContentBlock> {
        let removed = self.blocks.remove(&id)?;
        self.order.retain(|&block_id| block_id != id);
        log::debug!("removed block {}", id);
        Some(removed)
    }

    /// Remove every block (new project).
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.order.clear();
    }

    /// Move a block so it ends up at `target` in the resulting sequence.
    ///
    /// `target` is clamped to the valid range, so `len` or anything past it
    /// means "last". Returns false if the block is not in the store.
    pub fn move_block(&mut self, id: BlockId, target: usize) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        self.order.remove(from);
        let to = target.min(self.order.len());
        self.order.insert(to, id);
        log::debug!("moved block {} from {} to {}", id, from, to);
        true
    }

    /// Move a block to a drop index measured in the sequence as it was
    /// before the block was lifted out.
    ///
    /// Lifting the source shifts every later index down by one, so a drop
    /// index past the source is decremented before inserting.
    pub fn move_to_drop_index(&mut self, id: BlockId, drop_index: usize) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        let target = if drop_index > from {
            drop_index - 1
        } else {
            drop_index
        };
        self.move_block(id, target)
    }

    /// Layout of the current sequence built from each block's height hint.
    pub fn layout(&self) -> StackLayout {
        StackLayout::from_heights(self.blocks_ordered().map(ContentBlock::height))
    }

    /// Drop index for a vertical offset into the rendered stack.
    pub fn index_for_position(&self, y: f64) -> usize {
        self.layout().index_for_position(y)
    }

    /// The block rendered under `y`, if any.
    pub fn block_at_position(&self, y: f64) -> Option<BlockId> {
        self.layout()
            .index_at(y)
            .and_then(|idx| self.order.get(idx).copied())
    }

    /// Get a block by id.
    pub fn get(&self, id: BlockId) -> Option<&ContentBlock> {
        self.blocks.get(&id)
    }

    /// Get a mutable reference to a block, for editing its payload.
    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut ContentBlock> {
        self.blocks.get_mut(&id)
    }

    /// Position of a block in the sequence.
    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.order.iter().position(|&block_id| block_id == id)
    }

    /// Id of the block at `index`.
    pub fn id_at(&self, index: usize) -> Option<BlockId> {
        self.order.get(index).copied()
    }

    /// Block ids in order.
    pub fn ids(&self) -> &[BlockId] {
        &self.order
    }

    /// Blocks in order, top to bottom.
    pub fn blocks_ordered(&self) -> impl Iterator<Item = &ContentBlock> {
        self.order.iter().filter_map(|id| self.blocks.get(id))
    }

    /// Owned copy of the sequence for export.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.blocks_ordered().cloned().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Serialize the project to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a project from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
