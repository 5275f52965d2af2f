//! Cabinets and their rack-unit slots.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::RU_HEIGHT_INCHES;
use crate::error::ProjectError;
use crate::model::Populator;

/// Outer dimensions of a cabinet, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RackDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl RackDimensions {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        debug_assert!(
            width > 0.0 && height > 0.0 && depth > 0.0,
            "cabinet dimensions must be positive, got {}x{}x{}",
            width,
            height,
            depth
        );
        Self {
            width,
            height,
            depth,
        }
    }
}

/// One rack-unit slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuData {
    /// Derived from the cabinet id and location, see [`ru_id`]
    pub id: String,
    /// 1-based slot number, counted from the bottom of the opening
    pub location: u32,
    /// Populator starting at this slot. Slots covered by a multi-RU
    /// populator below them stay empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub populator: Option<Arc<Populator>>,
}

/// Id of the RU at `location` (1-based) inside `cabinet_id`.
pub fn ru_id(cabinet_id: &str, location: u32) -> String {
    format!("{}-ru-{}", cabinet_id, location)
}

/// Opening offset that centers `ru_count` units vertically in a cabinet of
/// the given height.
pub fn centered_opening_offset(height: f32, ru_count: u32) -> f32 {
    (height - ru_count as f32 * RU_HEIGHT_INCHES) / 2.0
}

/// A laid-out run of slots: a populated slot together with the slots its
/// populator covers, or a single empty slot.
#[derive(Debug, Clone, Copy)]
pub struct SlotRun<'a> {
    /// 0-based index of the first slot
    pub index: usize,
    /// Number of slots in the run (at least 1)
    pub span: usize,
    /// The slot holding the populator reference
    pub ru: &'a RuData,
}

impl SlotRun<'_> {
    /// Whether the run covers the slot at `index`.
    pub fn covers(&self, index: usize) -> bool {
        index >= self.index && index < self.index + self.span
    }
}

/// A rack enclosure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cabinet {
    pub id: String,
    pub name: String,
    pub ru_count: u32,
    pub dimensions: RackDimensions,
    #[serde(default)]
    pub rail_depth: f32,
    /// Distance from the bottom of the cabinet to the bottom of the opening
    pub opening_offset: f32,
    pub ru_data: Vec<RuData>,
}

impl Cabinet {
    /// Create an empty cabinet with a random id and a centered opening.
    pub fn new(name: &str, ru_count: u32, dimensions: RackDimensions) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        let cabinet = Self {
            ru_data: empty_slots(&id, ru_count),
            id,
            name: name.to_string(),
            ru_count,
            dimensions,
            rail_depth: 0.0,
            opening_offset: centered_opening_offset(dimensions.height, ru_count),
        };
        debug_assert_eq!(cabinet.ru_data.len(), ru_count as usize);
        cabinet
    }

    /// Builder: replace the id, re-deriving every RU id.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        for ru in &mut self.ru_data {
            ru.id = ru_id(id, ru.location);
        }
        self
    }

    /// Builder: set the rail depth.
    pub fn with_rail_depth(mut self, rail_depth: f32) -> Self {
        self.rail_depth = rail_depth;
        self
    }

    /// Builder: override the centered opening offset.
    pub fn with_opening_offset(mut self, opening_offset: f32) -> Self {
        self.opening_offset = opening_offset;
        self
    }

    /// Builder: place a populator, panicking in debug builds if it does not fit.
    pub fn with_populator(mut self, slot: usize, populator: Arc<Populator>) -> Self {
        let placed = self.place(slot, populator);
        debug_assert!(placed.is_ok(), "invalid placement: {:?}", placed);
        self
    }

    /// Index of the RU with the given id.
    pub fn slot_index(&self, ru_id: &str) -> Option<usize> {
        self.ru_data.iter().position(|ru| ru.id == ru_id)
    }

    pub fn ru(&self, ru_id: &str) -> Option<&RuData> {
        self.ru_data.iter().find(|ru| ru.id == ru_id)
    }

    /// Slots grouped into runs, bottom slot first. Slots covered by a
    /// multi-RU populator are folded into the run of that populator.
    pub fn slot_runs(&self) -> Vec<SlotRun<'_>> {
        let mut runs = Vec::with_capacity(self.ru_data.len());
        let mut index = 0;
        while index < self.ru_data.len() {
            let ru = &self.ru_data[index];
            let remaining = self.ru_data.len() - index;
            let span = ru
                .populator
                .as_ref()
                .map_or(1, |p| p.ru_span() as usize)
                .clamp(1, remaining);
            runs.push(SlotRun { index, span, ru });
            index += span;
        }
        runs
    }

    /// The run containing the RU with the given id, if any.
    pub fn run_containing(&self, ru_id: &str) -> Option<SlotRun<'_>> {
        let index = self.slot_index(ru_id)?;
        self.slot_runs().into_iter().find(|run| run.covers(index))
    }

    /// Put `populator` into the slot at `slot` (0-based), replacing whatever
    /// populator started there.
    pub fn place(&mut self, slot: usize, populator: Arc<Populator>) -> Result<(), ProjectError> {
        self.check_slot(slot)?;
        let span = populator.ru_span() as usize;
        if slot + span > self.ru_data.len() {
            return Err(ProjectError::SpanOverflow {
                cabinet: self.id.clone(),
                slot,
                span: populator.ru_span(),
            });
        }

        let wanted = slot..slot + span;
        let conflict = self
            .slot_runs()
            .into_iter()
            .filter(|run| run.index != slot && run.ru.populator.is_some())
            .find(|run| run.index < wanted.end && wanted.start < run.index + run.span)
            .map(|run| run.index);
        if let Some(occupied) = conflict {
            return Err(ProjectError::SlotOccupied {
                cabinet: self.id.clone(),
                slot: occupied,
            });
        }

        log::debug!(
            "Placed '{}' ({}U) at {} of cabinet '{}'",
            populator.name(),
            span,
            self.ru_data[slot].location,
            self.name
        );
        self.ru_data[slot].populator = Some(populator);
        Ok(())
    }

    /// Remove the populator starting at `slot`, returning it.
    pub fn clear_slot(&mut self, slot: usize) -> Result<Option<Arc<Populator>>, ProjectError> {
        self.check_slot(slot)?;
        Ok(self.ru_data[slot].populator.take())
    }

    /// Check the structural invariants of the cabinet.
    pub fn validate(&self) -> Result<(), ProjectError> {
        if self.ru_data.len() != self.ru_count as usize {
            return Err(ProjectError::RuCountMismatch {
                cabinet: self.id.clone(),
                expected: self.ru_count,
                found: self.ru_data.len(),
            });
        }

        let mut covered_until = 0;
        for (index, ru) in self.ru_data.iter().enumerate() {
            let Some(populator) = &ru.populator else {
                continue;
            };
            if index < covered_until {
                return Err(ProjectError::SlotOccupied {
                    cabinet: self.id.clone(),
                    slot: index,
                });
            }
            let span = populator.ru_span() as usize;
            if index + span > self.ru_data.len() {
                return Err(ProjectError::SpanOverflow {
                    cabinet: self.id.clone(),
                    slot: index,
                    span: populator.ru_span(),
                });
            }
            covered_until = index + span;
        }
        Ok(())
    }

    fn check_slot(&self, slot: usize) -> Result<(), ProjectError> {
        if slot >= self.ru_data.len() {
            return Err(ProjectError::SlotOutOfRange {
                cabinet: self.id.clone(),
                slot,
                ru_count: self.ru_count,
            });
        }
        Ok(())
    }
}

fn empty_slots(cabinet_id: &str, ru_count: u32) -> Vec<RuData> {
    (1..=ru_count)
        .map(|location| RuData {
            id: ru_id(cabinet_id, location),
            location,
            populator: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Accessory, AccessoryKind, PopulatorInfo};

    fn blank(span: u32) -> Arc<Populator> {
        Arc::new(Populator::Accessory(Accessory {
            info: PopulatorInfo::new(&format!("blank-{}u", span), "Blank", span, 0.5),
            kind: AccessoryKind::Blank,
        }))
    }

    fn rack() -> Cabinet {
        Cabinet::new("Rack", 42, RackDimensions::new(24.0, 84.0, 42.0)).with_id("cab")
    }

    #[test]
    fn test_new_cabinet_centers_opening() {
        let cabinet = rack();
        assert_eq!(cabinet.ru_data.len(), 42);
        assert!((cabinet.opening_offset - (84.0 - 42.0 * 1.75) / 2.0).abs() < 0.0001);
        assert_eq!(cabinet.ru_data[0].id, "cab-ru-1");
        assert_eq!(cabinet.ru_data[41].location, 42);
    }

    #[test]
    fn test_random_ids_are_unique() {
        let dims = RackDimensions::new(24.0, 84.0, 42.0);
        let a = Cabinet::new("A", 1, dims);
        let b = Cabinet::new("B", 1, dims);
        assert_ne!(a.id, b.id);
        assert!(a.ru_data[0].id.starts_with(&a.id));
    }

    #[test]
    fn test_opening_offset_override() {
        let cabinet = rack().with_opening_offset(2.0);
        assert_eq!(cabinet.opening_offset, 2.0);
    }

    #[test]
    fn test_slot_runs_fold_covered_slots() {
        let cabinet = rack().with_populator(0, blank(6));
        let runs = cabinet.slot_runs();

        assert_eq!(runs.len(), 42 - 5);
        assert_eq!(runs[0].index, 0);
        assert_eq!(runs[0].span, 6);
        assert_eq!(runs[1].index, 6);
        assert_eq!(runs[1].span, 1);
    }

    #[test]
    fn test_run_containing_covered_slot() {
        let cabinet = rack().with_populator(2, blank(3));
        let run = cabinet.run_containing("cab-ru-4").unwrap();
        assert_eq!(run.index, 2);
        assert_eq!(run.ru.id, "cab-ru-3");
    }

    #[test]
    fn test_place_rejects_overlap_and_overflow() {
        let mut cabinet = rack().with_populator(0, blank(2));

        assert_eq!(
            cabinet.place(1, blank(1)),
            Err(ProjectError::SlotOccupied {
                cabinet: "cab".to_string(),
                slot: 0
            })
        );
        assert!(matches!(
            cabinet.place(40, blank(3)),
            Err(ProjectError::SpanOverflow { .. })
        ));
        assert!(matches!(
            cabinet.place(42, blank(1)),
            Err(ProjectError::SlotOutOfRange { .. })
        ));

        // Replacing the populator at the same slot is allowed
        assert!(cabinet.place(0, blank(1)).is_ok());
        assert!(cabinet.place(1, blank(1)).is_ok());
    }

    #[test]
    fn test_clear_slot() {
        let mut cabinet = rack().with_populator(5, blank(1));
        let removed = cabinet.clear_slot(5).unwrap();
        assert!(removed.is_some());
        assert!(cabinet.ru_data[5].populator.is_none());
    }

    #[test]
    fn test_validate_detects_mismatch_and_overlap() {
        let mut cabinet = rack();
        cabinet.ru_data.pop();
        assert!(matches!(
            cabinet.validate(),
            Err(ProjectError::RuCountMismatch { found: 41, .. })
        ));

        let mut cabinet = rack().with_populator(0, blank(3));
        cabinet.ru_data[1].populator = Some(blank(1));
        assert!(matches!(
            cabinet.validate(),
            Err(ProjectError::SlotOccupied { slot: 1, .. })
        ));
    }
}
