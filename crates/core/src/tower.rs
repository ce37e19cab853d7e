//! Tower module - the fixed 54-block layout
//!
//! Blocks are laid out bottom to top, three per layer. Content is bound once
//! at construction: each tier's shuffled bag fills the layer band of the same
//! tier (hard items in the foundation, easy items at the top).

use crate::catalog::Catalog;
use crate::rng::{SessionRng, TierBag};
use crate::types::{
    BlockId, ContentId, DifficultyTier, Orientation, BLOCKS_PER_LAYER, TOTAL_BLOCKS,
    TOWER_LAYERS,
};

/// A single block of the tower
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub id: BlockId,
    /// 1-based, bottom to top
    pub layer: u8,
    /// Position within the layer (0..3)
    pub slot: u8,
    pub orientation: Orientation,
    pub tier: DifficultyTier,
    pub content_id: ContentId,
    pub removed: bool,
}

/// Why a block could not be removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockNotRemovable {
    Unknown(BlockId),
    AlreadyRemoved(BlockId),
}

/// Ordered collection of all blocks
#[derive(Debug, Clone)]
pub struct Tower {
    blocks: Vec<Block>,
}

impl Tower {
    /// Build the tower and bind content by layer band.
    ///
    /// The catalog must already be validated (one full band per tier).
    pub fn build(catalog: &Catalog, rng: &mut SessionRng) -> Self {
        let mut bags = DifficultyTier::ALL.map(|tier| TierBag::new(catalog, tier, rng));
        let mut blocks = Vec::with_capacity(TOTAL_BLOCKS);

        for layer in 1..=TOWER_LAYERS {
            let Some(tier) = DifficultyTier::for_layer(layer) else {
                continue;
            };
            let bag = &mut bags[tier.index()];
            for slot in 0..BLOCKS_PER_LAYER {
                let Some(content_id) = bag.draw() else {
                    break;
                };
                blocks.push(Block {
                    id: blocks.len() as BlockId,
                    layer,
                    slot,
                    orientation: Orientation::for_layer(layer),
                    tier,
                    content_id,
                    removed: false,
                });
            }
        }

        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id as usize)
    }

    /// Mark a block removed. Removal is permanent.
    pub fn mark_removed(&mut self, id: BlockId) -> Result<(), BlockNotRemovable> {
        let block = self
            .blocks
            .get_mut(id as usize)
            .ok_or(BlockNotRemovable::Unknown(id))?;
        if block.removed {
            return Err(BlockNotRemovable::AlreadyRemoved(id));
        }
        block.removed = true;
        Ok(())
    }

    /// Check that a block exists and is still standing
    pub fn check_removable(&self, id: BlockId) -> Result<&Block, BlockNotRemovable> {
        let block = self.get(id).ok_or(BlockNotRemovable::Unknown(id))?;
        if block.removed {
            return Err(BlockNotRemovable::AlreadyRemoved(id));
        }
        Ok(block)
    }

    pub fn remaining(&self) -> usize {
        self.blocks.iter().filter(|b| !b.removed).count()
    }

    pub fn removed_count(&self) -> usize {
        self.blocks.len() - self.remaining()
    }

    pub fn blocks_in_layer(&self, layer: u8) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(move |b| b.layer == layer)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
