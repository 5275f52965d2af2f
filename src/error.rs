//! Error types for project construction and mutation.

use thiserror::Error;

/// Errors raised when building or editing a project.
///
/// None of these surface from the resolvers: a rejected mode change or
/// selection is a no-op, not an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectError {
    /// Two elevations hold cabinets with the same id
    #[error("Duplicate cabinet id: {id}")]
    DuplicateCabinetId {
        /// The repeated cabinet id
        id: String,
    },

    /// The RU list does not match the declared RU count
    #[error("Cabinet {cabinet} declares {expected} RUs but holds {found}")]
    RuCountMismatch {
        /// Cabinet id
        cabinet: String,
        /// Declared RU count
        expected: u32,
        /// Actual number of RU entries
        found: usize,
    },

    /// Slot index outside the cabinet
    #[error("Slot {slot} is out of range for cabinet {cabinet} ({ru_count} RUs)")]
    SlotOutOfRange {
        /// Cabinet id
        cabinet: String,
        /// 0-based slot index
        slot: usize,
        /// Number of RUs in the cabinet
        ru_count: u32,
    },

    /// A populator would extend past the top slot
    #[error("Populator spanning {span} RUs does not fit at slot {slot} of cabinet {cabinet}")]
    SpanOverflow {
        /// Cabinet id
        cabinet: String,
        /// 0-based slot index
        slot: usize,
        /// Populator RU span
        span: u32,
    },

    /// A slot is already occupied (or covered) by another populator
    #[error("Slot {slot} of cabinet {cabinet} is already occupied")]
    SlotOccupied {
        /// Cabinet id
        cabinet: String,
        /// 0-based slot index
        slot: usize,
    },

    /// Cabinet id not present in the project
    #[error("Cabinet not found: {id}")]
    UnknownCabinet {
        /// The missing cabinet id
        id: String,
    },

    /// RU id not present in its cabinet
    #[error("RU not found: {id}")]
    UnknownRu {
        /// The missing RU id
        id: String,
    },

    /// Populator id not present in the library
    #[error("Populator not found in library: {id}")]
    UnknownPopulator {
        /// The missing catalog id
        id: String,
    },

    /// Populator assignment needs exactly one active RU
    #[error("Assigning a populator requires exactly one active RU, found {active}")]
    NoSingleActiveRu {
        /// Number of active RU items
        active: usize,
    },
}
