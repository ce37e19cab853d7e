//! Content catalog - the static registry of tips and questions
//!
//! Every block in the tower is bound to exactly one catalog item, and each
//! difficulty tier fills exactly one layer band, so a valid catalog holds
//! [`BLOCKS_PER_BAND`] items per tier ([`CATALOG_SIZE`] in total).
//!
//! The built-in catalog ships as JSON inside the crate; [`Catalog::from_json`]
//! accepts a replacement with the same shape:
//!
//! ```json
//! {"id": 7, "kind": "question", "category": "data", "difficulty": "easy",
//!  "body": "How many bits are in one byte?", "options": ["4", "8"],
//!  "correct_index": 1, "explanation": "A byte is eight bits."}
//! ```

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::error::CatalogError;
use crate::types::{ContentId, DifficultyTier, BLOCKS_PER_BAND, CATALOG_SIZE};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// What a content item asks of the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    /// Informational; the block is removed as soon as it is revealed
    Tip,
    /// Multiple choice; the block is removed once an answer is submitted
    Question {
        options: Vec<String>,
        correct_index: usize,
        explanation: String,
    },
}

/// A single learning item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: ContentId,
    pub category: String,
    pub difficulty: DifficultyTier,
    pub body: String,
    pub kind: ContentKind,
}

impl ContentItem {
    pub fn tip(id: ContentId, category: &str, difficulty: DifficultyTier, body: &str) -> Self {
        Self {
            id,
            category: category.to_string(),
            difficulty,
            body: body.to_string(),
            kind: ContentKind::Tip,
        }
    }

    pub fn question(
        id: ContentId,
        category: &str,
        difficulty: DifficultyTier,
        body: &str,
        options: &[&str],
        correct_index: usize,
        explanation: &str,
    ) -> Self {
        Self {
            id,
            category: category.to_string(),
            difficulty,
            body: body.to_string(),
            kind: ContentKind::Question {
                options: options.iter().map(|o| o.to_string()).collect(),
                correct_index,
                explanation: explanation.to_string(),
            },
        }
    }

    pub fn is_question(&self) -> bool {
        matches!(self.kind, ContentKind::Question { .. })
    }

    /// Answer options (empty for tips)
    pub fn options(&self) -> &[String] {
        match &self.kind {
            ContentKind::Question { options, .. } => options,
            ContentKind::Tip => &[],
        }
    }

    pub fn correct_index(&self) -> Option<usize> {
        match &self.kind {
            ContentKind::Question { correct_index, .. } => Some(*correct_index),
            ContentKind::Tip => None,
        }
    }

    pub fn explanation(&self) -> Option<&str> {
        match &self.kind {
            ContentKind::Question { explanation, .. } => Some(explanation),
            ContentKind::Tip => None,
        }
    }

    /// Whether `selected` is the right answer. Always false for tips.
    pub fn is_correct(&self, selected: usize) -> bool {
        self.correct_index() == Some(selected)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if let ContentKind::Question {
            options,
            correct_index,
            ..
        } = &self.kind
        {
            if options.len() < 2 {
                return Err(CatalogError::InvalidQuestion {
                    id: self.id,
                    reason: "fewer than two options",
                });
            }
            if *correct_index >= options.len() {
                return Err(CatalogError::InvalidQuestion {
                    id: self.id,
                    reason: "correct_index out of range",
                });
            }
        }
        Ok(())
    }
}

/// Catalog file entry (wire shape)
#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    id: ContentId,
    kind: EntryKind,
    category: String,
    difficulty: String,
    body: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_index: Option<usize>,
    #[serde(default)]
    explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum EntryKind {
    Tip,
    Question,
}

impl TryFrom<CatalogEntry> for ContentItem {
    type Error = CatalogError;

    fn try_from(entry: CatalogEntry) -> Result<Self, Self::Error> {
        let difficulty = DifficultyTier::from_str(&entry.difficulty)
            .ok_or_else(|| CatalogError::UnknownDifficulty(entry.id, entry.difficulty))?;

        let kind = match entry.kind {
            EntryKind::Tip => ContentKind::Tip,
            EntryKind::Question => ContentKind::Question {
                options: entry.options,
                correct_index: entry.correct_index.ok_or(CatalogError::InvalidQuestion {
                    id: entry.id,
                    reason: "missing correct_index",
                })?,
                explanation: entry.explanation.unwrap_or_default(),
            },
        };

        Ok(Self {
            id: entry.id,
            category: entry.category,
            difficulty,
            body: entry.body,
            kind,
        })
    }
}

/// Validated, immutable registry of content items
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<ContentItem>,
    index: HashMap<ContentId, usize>,
}

impl Catalog {
    /// The catalog bundled with the crate
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse and validate a JSON array of catalog entries
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        let items = entries
            .into_iter()
            .map(ContentItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_items(items)
    }

    /// Validate a list of items and build the lookup index
    pub fn from_items(items: Vec<ContentItem>) -> Result<Self, CatalogError> {
        if items.len() < CATALOG_SIZE {
            return Err(CatalogError::TooFewItems {
                found: items.len(),
                required: CATALOG_SIZE,
            });
        }

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
            item.validate()?;
        }

        let tier_count =
            |tier: DifficultyTier| items.iter().filter(|i| i.difficulty == tier).count();
        if let Some(tier) = DifficultyTier::ALL.into_iter().find(|&t| tier_count(t) == 0) {
            return Err(CatalogError::EmptyTier(tier));
        }
        for tier in DifficultyTier::ALL {
            let found = tier_count(tier);
            if found != BLOCKS_PER_BAND {
                return Err(CatalogError::TierSizeMismatch {
                    tier,
                    found,
                    required: BLOCKS_PER_BAND,
                });
            }
        }

        let index = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.id, pos))
            .collect();

        Ok(Self { items, index })
    }

    pub fn get(&self, id: ContentId) -> Option<&ContentItem> {
        self.index.get(&id).map(|&pos| &self.items[pos])
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items of one tier, in catalog order
    pub fn by_tier(&self, tier: DifficultyTier) -> impl Iterator<Item = &ContentItem> {
        self.items.iter().filter(move |i| i.difficulty == tier)
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.items.iter().map(|i| i.category.as_str()).collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}
