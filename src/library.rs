//! Populator library: the catalog devices and accessories are placed from.

use std::sync::Arc;

use rackelev_layout::Rectangle;

use crate::model::{
    Accessory, AccessoryKind, Device, DeviceKind, MountLocation, Populator, PopulatorInfo,
    PortGroup,
};

/// A library section as shown in the build library panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryGroup {
    pub label: &'static str,
    /// Matches [`Populator::item_type`]
    pub item_type: &'static str,
}

/// Library sections in display order.
pub const LIBRARY_GROUPS: &[LibraryGroup] = &[
    LibraryGroup {
        label: "Switches",
        item_type: "switch",
    },
    LibraryGroup {
        label: "Routers",
        item_type: "router",
    },
    LibraryGroup {
        label: "Firewalls",
        item_type: "firewall",
    },
    LibraryGroup {
        label: "Accessories",
        item_type: "accessory",
    },
];

/// Read-only catalog of populators.
#[derive(Debug, Clone, Default)]
pub struct PopulatorLibrary {
    entries: Vec<Arc<Populator>>,
}

impl PopulatorLibrary {
    pub fn new(entries: Vec<Populator>) -> Self {
        Self {
            entries: entries.into_iter().map(Arc::new).collect(),
        }
    }

    /// Shared handle to the populator with the given catalog id.
    pub fn get(&self, id: &str) -> Option<Arc<Populator>> {
        self.entries.iter().find(|p| p.id() == id).map(Arc::clone)
    }

    /// Populators of one library group, in catalog order.
    pub fn group(&self, item_type: &str) -> impl Iterator<Item = &Arc<Populator>> {
        self.entries.iter().filter(move |p| p.item_type() == item_type)
    }

    /// Non-empty groups with their populators.
    pub fn grouped(&self) -> Vec<(LibraryGroup, Vec<Arc<Populator>>)> {
        LIBRARY_GROUPS
            .iter()
            .map(|group| (*group, self.group(group.item_type).cloned().collect::<Vec<_>>()))
            .filter(|(_, entries)| !entries.is_empty())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Populator>> {
        self.entries.iter()
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        let front_ports = |count| {
            PortGroup::numbered(
                MountLocation::Front,
                "ge-0/0/",
                count,
                Rectangle::new(1.0, 0.2, 15.0, 1.3),
            )
        };
        Self::new(vec![
            Populator::Device(Device {
                info: PopulatorInfo::new("switch-48p", "48-Port Switch", 1, 16.0)
                    .with_part_number("SW-48G"),
                kind: DeviceKind::Switch,
                port_groups: vec![front_ports(48)],
            }),
            Populator::Device(Device {
                info: PopulatorInfo::new("switch-24p", "24-Port Switch", 1, 12.0)
                    .with_part_number("SW-24G"),
                kind: DeviceKind::Switch,
                port_groups: vec![front_ports(24)],
            }),
            Populator::Device(Device {
                info: PopulatorInfo::new("router-edge", "Edge Router", 2, 18.0)
                    .with_part_number("RT-2000"),
                kind: DeviceKind::Router,
                port_groups: vec![PortGroup::numbered(
                    MountLocation::Rear,
                    "xe-",
                    8,
                    Rectangle::new(2.0, 0.5, 10.0, 2.0),
                )],
            }),
            Populator::Device(Device {
                info: PopulatorInfo::new("firewall", "Perimeter Firewall", 1, 14.0),
                kind: DeviceKind::Firewall,
                port_groups: vec![front_ports(8)],
            }),
            Populator::Accessory(Accessory {
                info: PopulatorInfo::new("blank-1u", "Blank Panel", 1, 0.5),
                kind: AccessoryKind::Blank,
            }),
            Populator::Accessory(Accessory {
                info: PopulatorInfo::new("brush-1u", "Brush Panel", 1, 0.5),
                kind: AccessoryKind::Brush,
            }),
            Populator::Accessory(Accessory {
                info: PopulatorInfo::new("d-ring-2u", "D-Ring Cable Manager", 2, 4.0)
                    .with_mount(MountLocation::Rear),
                kind: AccessoryKind::DRing,
            }),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_shares_entries() {
        let library = PopulatorLibrary::builtin();
        let a = library.get("router-edge").unwrap();
        let b = library.get("router-edge").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.ru_span(), 2);
        assert!(library.get("nonexistent").is_none());
    }

    #[test]
    fn test_grouping_follows_section_order() {
        let library = PopulatorLibrary::builtin();
        let groups = library.grouped();
        let labels: Vec<_> = groups.iter().map(|(group, _)| group.label).collect();
        assert_eq!(labels, vec!["Switches", "Routers", "Firewalls", "Accessories"]);

        let (_, switches) = &groups[0];
        assert_eq!(switches.len(), 2);
        let (_, accessories) = &groups[3];
        assert_eq!(accessories.len(), 3);
        assert_eq!(
            groups.iter().map(|(_, entries)| entries.len()).sum::<usize>(),
            library.len()
        );
    }

    #[test]
    fn test_empty_groups_are_skipped() {
        let library = PopulatorLibrary::new(vec![Populator::Accessory(Accessory {
            info: PopulatorInfo::new("blank", "Blank", 1, 0.5),
            kind: AccessoryKind::Blank,
        })]);
        let groups = library.grouped();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0.item_type, "accessory");
    }
}
