//! Devices and accessories that occupy rack units.

use rackelev_layout::Rectangle;
use serde::{Deserialize, Serialize};

/// Which face of the cabinet a populator is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MountLocation {
    #[default]
    Front,
    Rear,
}

/// Kind of active device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Switch,
    Router,
    Firewall,
}

/// Kind of passive accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessoryKind {
    Blank,
    Brush,
    DRing,
}

/// Attributes shared by every populator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulatorInfo {
    /// Catalog id
    pub id: String,
    /// Display name, used as the RU label
    pub name: String,
    /// Face the populator is mounted on
    #[serde(default)]
    pub mount: MountLocation,
    /// Manufacturer part number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    /// Number of consecutive RUs occupied (at least 1)
    pub ru_span: u32,
    /// Depth in inches
    pub depth: f32,
}

impl PopulatorInfo {
    pub fn new(id: &str, name: &str, ru_span: u32, depth: f32) -> Self {
        debug_assert!(ru_span >= 1, "ru_span must be at least 1");
        Self {
            id: id.to_string(),
            name: name.to_string(),
            mount: MountLocation::Front,
            part_number: None,
            ru_span: ru_span.max(1),
            depth,
        }
    }

    /// Builder: set the mount face.
    pub fn with_mount(mut self, mount: MountLocation) -> Self {
        self.mount = mount;
        self
    }

    /// Builder: set the part number.
    pub fn with_part_number(mut self, part_number: &str) -> Self {
        self.part_number = Some(part_number.to_string());
        self
    }
}

/// A single network port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub label: String,
}

/// A group of ports laid out on one face of a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortGroup {
    /// Face the ports are on
    pub face: MountLocation,
    pub ports: Vec<Port>,
    /// Sub-rectangle of the device face, in inches from its top-left corner
    pub layout: Rectangle,
}

impl PortGroup {
    /// Create a group of `count` ports labelled `prefix1..prefixN`.
    pub fn numbered(face: MountLocation, prefix: &str, count: usize, layout: Rectangle) -> Self {
        let ports = (1..=count)
            .map(|i| Port {
                label: format!("{}{}", prefix, i),
            })
            .collect();
        Self {
            face,
            ports,
            layout,
        }
    }
}

/// An active device such as a switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(flatten)]
    pub info: PopulatorInfo,
    pub kind: DeviceKind,
    #[serde(default)]
    pub port_groups: Vec<PortGroup>,
}

/// A passive accessory such as a blanking panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accessory {
    #[serde(flatten)]
    pub info: PopulatorInfo,
    pub kind: AccessoryKind,
}

/// Anything that can be placed into a rack unit.
///
/// Populators are catalog values; RU slots hold shared references to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "populator", rename_all = "lowercase")]
pub enum Populator {
    Device(Device),
    Accessory(Accessory),
}

impl Populator {
    /// Shared attributes.
    pub fn info(&self) -> &PopulatorInfo {
        match self {
            Populator::Device(device) => &device.info,
            Populator::Accessory(accessory) => &accessory.info,
        }
    }

    pub fn id(&self) -> &str {
        &self.info().id
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    /// Number of RUs occupied, never less than one.
    pub fn ru_span(&self) -> u32 {
        self.info().ru_span.max(1)
    }

    pub fn mount(&self) -> MountLocation {
        self.info().mount
    }

    /// Library grouping this populator belongs to.
    pub fn item_type(&self) -> &'static str {
        match self {
            Populator::Device(device) => match device.kind {
                DeviceKind::Switch => "switch",
                DeviceKind::Router => "router",
                DeviceKind::Firewall => "firewall",
            },
            Populator::Accessory(_) => "accessory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ru_span_never_zero() {
        let mut info = PopulatorInfo::new("blank-1u", "Blank", 1, 0.5);
        info.ru_span = 0;
        let accessory = Populator::Accessory(Accessory {
            info,
            kind: AccessoryKind::Blank,
        });
        assert_eq!(accessory.ru_span(), 1);
    }

    #[test]
    fn test_item_type() {
        let router = Populator::Device(Device {
            info: PopulatorInfo::new("rtr", "Edge Router", 2, 18.0),
            kind: DeviceKind::Router,
            port_groups: Vec::new(),
        });
        assert_eq!(router.item_type(), "router");
        assert_eq!(router.name(), "Edge Router");
    }

    #[test]
    fn test_numbered_ports() {
        let group = PortGroup::numbered(
            MountLocation::Front,
            "ge-0/0/",
            4,
            Rectangle::new(1.0, 0.2, 8.0, 1.0),
        );
        assert_eq!(group.ports.len(), 4);
        assert_eq!(group.ports[3].label, "ge-0/0/4");
    }

    #[test]
    fn test_json_shape() {
        let device = Populator::Device(Device {
            info: PopulatorInfo::new("sw", "Core Switch", 1, 16.0).with_part_number("CS-48"),
            kind: DeviceKind::Switch,
            port_groups: Vec::new(),
        });
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["populator"], "device");
        assert_eq!(json["kind"], "switch");
        assert_eq!(json["part_number"], "CS-48");

        let back: Populator = serde_json::from_value(json).unwrap();
        assert_eq!(back, device);
    }
}
