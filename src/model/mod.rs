//! Project data model: elevations, cabinets, RU slots and populators.

mod cabinet;
mod item_ref;
mod populator;
mod project;

pub use cabinet::{Cabinet, RackDimensions, RuData, SlotRun, centered_opening_offset, ru_id};
pub use item_ref::{ItemRef, ItemType};
pub use populator::{
    Accessory, AccessoryKind, Device, DeviceKind, MountLocation, Populator, PopulatorInfo, Port,
    PortGroup,
};
pub use project::{Elevation, Project, ProjectLoadError};
