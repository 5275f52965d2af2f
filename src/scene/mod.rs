//! Scene graph produced by the layout engine.
//!
//! A [`Scene`] is an immutable tree of rectangular regions in device pixels.
//! It carries everything a rendering adapter needs to draw the elevations and
//! everything a click handler needs to call the selection resolver; nothing
//! in it refers back to the previous layout.

mod layout;

use rackelev_layout::{Point, Rectangle, Size};
use serde::Serialize;

use crate::model::{ItemRef, ItemType, MountLocation};
use crate::session::Orientation;

pub use layout::{layout, layout_at};

/// Kind of a laid out region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    Cabinet,
    /// The 19" device opening inside a cabinet
    Opening,
    Ru,
}

/// One rectangle of the scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    /// Stable id (cabinet id, `{cabinet}-opening` or RU id)
    pub id: String,
    pub kind: RegionKind,
    /// Absolute position and size in device pixels
    pub bounds: Rectangle,
    /// Selection handle, present for cabinet and RU regions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemRef>,
    /// Clickable in the current edit mode
    pub interactive: bool,
    /// Currently selected
    pub active: bool,
    /// Number of RU slots the region covers (flex weight), 0 for non-RU regions
    pub span: u32,
    /// Populator name for populated RU regions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Mount face of the populator for populated RU regions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount: Option<MountLocation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Region>,
}

impl Region {
    /// Declared object type (cabinet or RU); `None` for openings.
    pub fn object_type(&self) -> Option<ItemType> {
        self.item.as_ref().map(|item| item.item_type)
    }

    /// Item to hand to the selection resolver when this region is clicked.
    pub fn click_target(&self) -> Option<&ItemRef> {
        if self.interactive {
            self.item.as_ref()
        } else {
            None
        }
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Region>) {
        out.push(self);
        for child in &self.children {
            child.collect(out);
        }
    }
}

/// The laid out scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Scale the scene was laid out at
    pub scale: f32,
    pub orientation: Orientation,
    /// Bounding size of all regions including cabinet margins
    pub size: Size,
    /// Top-level regions (cabinets, or the single focused RU)
    pub regions: Vec<Region>,
}

impl Scene {
    /// A scene without regions.
    pub fn empty(scale: f32, orientation: Orientation) -> Self {
        Self {
            scale,
            orientation,
            size: Size::zero(),
            regions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// All regions, depth first in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        let mut all = Vec::new();
        for region in &self.regions {
            region.collect(&mut all);
        }
        all.into_iter()
    }

    /// Region with the given id.
    pub fn find(&self, id: &str) -> Option<&Region> {
        self.iter().find(|region| region.id == id)
    }

    /// Regions of one kind.
    pub fn regions_of(&self, kind: RegionKind) -> impl Iterator<Item = &Region> {
        self.iter().filter(move |region| region.kind == kind)
    }

    /// Innermost clickable region under `point`.
    pub fn hit_test(&self, point: Point) -> Option<&Region> {
        self.iter()
            .filter(|region| region.interactive && region.bounds.contains(point))
            .last()
    }

    /// Selection handle for a region id taken from this scene.
    pub fn item_for(&self, id: &str) -> Option<ItemRef> {
        self.find(id).and_then(|region| region.item.clone())
    }
}
