//! Built-in sample project used when no project file is given.

use crate::error::ProjectError;
use crate::library::PopulatorLibrary;
use crate::model::{Cabinet, Project, RackDimensions};

/// Standard 42U cabinet, 24" wide, 84" tall and 42" deep.
pub fn standard_cabinet(name: &str) -> Cabinet {
    Cabinet::new(name, 42, RackDimensions::new(24.0, 84.0, 42.0)).with_rail_depth(29.0)
}

/// Two populated 42U racks named "Rack 1" and "Rack 2".
pub fn two_rack_project(library: &PopulatorLibrary) -> Result<Project, ProjectError> {
    let mut rack1 = standard_cabinet("Rack 1");
    let mut rack2 = standard_cabinet("Rack 2");

    let place = |cabinet: &mut Cabinet, slot: usize, id: &str| -> Result<(), ProjectError> {
        match library.get(id) {
            Some(populator) => cabinet.place(slot, populator),
            None => {
                log::warn!("Sample populator '{}' missing from library", id);
                Ok(())
            }
        }
    };

    // Slots are 0-based from the bottom
    place(&mut rack1, 0, "router-edge")?;
    place(&mut rack1, 2, "firewall")?;
    place(&mut rack1, 40, "switch-48p")?;
    place(&mut rack2, 38, "d-ring-2u")?;
    place(&mut rack2, 40, "switch-24p")?;
    place(&mut rack2, 41, "blank-1u")?;

    Project::from_cabinets(vec![rack1, rack2])
}
