//! Lightweight references to selectable project items.

use serde::{Deserialize, Serialize};

/// Object type of a selectable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Cabinet,
    Ru,
}

impl ItemType {
    pub fn name(&self) -> &'static str {
        match self {
            ItemType::Cabinet => "cabinet",
            ItemType::Ru => "ru",
        }
    }
}

/// Identity handle for a cabinet or RU.
///
/// Holds ids only, never the entity, so it cannot go stale in content after
/// the project is replaced; it can only stop resolving.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Owning cabinet id (the cabinet's own id for cabinet refs)
    pub parent_id: String,
    pub item_id: String,
}

impl ItemRef {
    pub fn new(item_type: ItemType, parent_id: &str, item_id: &str) -> Self {
        Self {
            item_type,
            parent_id: parent_id.to_string(),
            item_id: item_id.to_string(),
        }
    }

    /// Reference to a cabinet (its own parent).
    pub fn cabinet(cabinet_id: &str) -> Self {
        Self::new(ItemType::Cabinet, cabinet_id, cabinet_id)
    }

    /// Reference to an RU inside `cabinet_id`.
    pub fn ru(cabinet_id: &str, ru_id: &str) -> Self {
        Self::new(ItemType::Ru, cabinet_id, ru_id)
    }

    /// Reference to the cabinet owning this item.
    pub fn parent(&self) -> Self {
        Self::cabinet(&self.parent_id)
    }

    pub fn is_ru(&self) -> bool {
        self.item_type == ItemType::Ru
    }
}
