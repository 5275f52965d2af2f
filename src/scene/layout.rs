//! The scene layout engine.
//!
//! Pure function of (project, session): every call lays the scene out from
//! scratch. Cabinets sit side by side on a shared baseline (bottom aligned),
//! each surrounded by a fixed margin. Inside each cabinet the 19" opening is
//! centered horizontally and raised by the cabinet's opening offset; inside
//! the opening RU runs are stacked from the bottom up, one weight unit per
//! covered slot.

use rackelev_layout::{Rectangle, Size, distribute};

use super::{Region, RegionKind, Scene};
use crate::constants::{
    CABINET_MARGIN_INCHES, PIXELS_PER_INCH, RACK_OPENING_WIDTH_INCHES, RU_HEIGHT_INCHES,
};
use crate::model::{Cabinet, ItemRef, ItemType, Project, SlotRun};
use crate::session::{Mode, SessionState, ViewMode};

/// Lay out the scene at the session's scale.
pub fn layout(project: &Project, session: &SessionState) -> Scene {
    layout_at(project, session, session.scale)
}

/// Lay out the scene at an explicit scale (used by the bootstrap pass).
pub fn layout_at(project: &Project, session: &SessionState, scale: f32) -> Scene {
    let units = Units::new(scale);
    match session.edit_mode.ru_view {
        ViewMode::Single => layout_single_ru(project, session, units),
        ViewMode::Multi => layout_cabinets(project, session, units),
    }
}

/// Inch to pixel conversion at a fixed scale.
#[derive(Debug, Clone, Copy)]
struct Units {
    scale: f32,
}

impl Units {
    fn new(scale: f32) -> Self {
        Self { scale }
    }

    #[inline]
    fn px(&self, inches: f32) -> f32 {
        inches * PIXELS_PER_INCH * self.scale
    }

    fn margin(&self) -> f32 {
        self.px(CABINET_MARGIN_INCHES)
    }

    fn opening_width(&self) -> f32 {
        self.px(RACK_OPENING_WIDTH_INCHES)
    }

    fn ru_height(&self, units: usize) -> f32 {
        self.px(units as f32 * RU_HEIGHT_INCHES)
    }
}

/// Cabinets shown for the current cabinet view.
fn visible_cabinets<'a>(project: &'a Project, session: &SessionState) -> Vec<&'a Cabinet> {
    match session.edit_mode.cab_view {
        ViewMode::Multi => project.cabinets().collect(),
        ViewMode::Single => {
            let focused = session
                .edit_mode
                .single_mode_object
                .as_ref()
                .and_then(|item| project.cabinet(&item.parent_id));
            match focused {
                Some(cabinet) => vec![cabinet],
                None => {
                    if session.edit_mode.single_mode_object.is_some() {
                        log::warn!("Focused cabinet no longer exists, showing the first one");
                    }
                    project.cabinets().take(1).collect()
                }
            }
        }
    }
}

fn layout_cabinets(project: &Project, session: &SessionState, units: Units) -> Scene {
    let cabinets = visible_cabinets(project, session);
    let margin = units.margin();

    let scene_height = cabinets
        .iter()
        .map(|c| units.px(c.dimensions.height) + margin * 2.0)
        .fold(0.0_f32, f32::max);

    let mut cursor = 0.0;
    let mut regions = Vec::with_capacity(cabinets.len());
    for cabinet in cabinets {
        let width = units.px(cabinet.dimensions.width);
        let height = units.px(cabinet.dimensions.height);
        let bounds = Rectangle::new(cursor + margin, scene_height - margin - height, width, height);
        cursor += width + margin * 2.0;
        regions.push(cabinet_region(cabinet, bounds, session, units));
    }

    Scene {
        scale: units.scale,
        orientation: session.orientation,
        size: Size::new(cursor, scene_height),
        regions,
    }
}

fn cabinet_region(cabinet: &Cabinet, bounds: Rectangle, session: &SessionState, units: Units) -> Region {
    let opening_width = units.opening_width();
    let opening_height = units.ru_height(cabinet.ru_count as usize);
    let opening = Rectangle::new(
        bounds.x + (bounds.width - opening_width) / 2.0,
        bounds.bottom() - units.px(cabinet.opening_offset) - opening_height,
        opening_width,
        opening_height,
    );

    let runs = cabinet.slot_runs();
    let weights: Vec<f32> = runs.iter().map(|run| run.span as f32).collect();
    let slots = distribute(opening, &weights);
    let rus = runs
        .iter()
        .zip(slots)
        .map(|(run, slot)| ru_region(cabinet, run, slot, session))
        .collect();

    Region {
        id: cabinet.id.clone(),
        kind: RegionKind::Cabinet,
        bounds,
        item: Some(ItemRef::cabinet(&cabinet.id)),
        interactive: session.edit_mode.mode == Mode::Cab,
        active: session.is_active(&cabinet.id),
        span: 0,
        label: Some(cabinet.name.clone()),
        mount: None,
        children: vec![Region {
            id: format!("{}-opening", cabinet.id),
            kind: RegionKind::Opening,
            bounds: opening,
            item: None,
            interactive: false,
            active: false,
            span: 0,
            label: None,
            mount: None,
            children: rus,
        }],
    }
}

fn ru_region(cabinet: &Cabinet, run: &SlotRun<'_>, bounds: Rectangle, session: &SessionState) -> Region {
    let populator = run.ru.populator.as_deref();
    Region {
        id: run.ru.id.clone(),
        kind: RegionKind::Ru,
        bounds,
        item: Some(ItemRef::ru(&cabinet.id, &run.ru.id)),
        interactive: session.edit_mode.mode == Mode::Ru,
        active: session.is_active(&run.ru.id),
        span: run.span as u32,
        label: populator.map(|p| p.name().to_string()),
        mount: populator.map(|p| p.mount()),
        children: Vec::new(),
    }
}

fn layout_single_ru(project: &Project, session: &SessionState, units: Units) -> Scene {
    let empty = Scene::empty(units.scale, session.orientation);
    let Some(focus) = session.edit_mode.single_mode_object.as_ref() else {
        log::warn!("Single RU view without a focused RU");
        return empty;
    };
    if focus.item_type != ItemType::Ru {
        log::warn!("Single RU view focused on a {}", focus.item_type.name());
        return empty;
    }
    let Some(cabinet) = project.cabinet(&focus.parent_id) else {
        log::warn!("Focused RU '{}' belongs to a missing cabinet", focus.item_id);
        return empty;
    };
    let Some(run) = cabinet.run_containing(&focus.item_id) else {
        log::warn!("Focused RU '{}' no longer exists", focus.item_id);
        return empty;
    };

    let margin = units.margin();
    let bounds = Rectangle::new(margin, margin, units.opening_width(), units.ru_height(run.span));
    Scene {
        scale: units.scale,
        orientation: session.orientation,
        size: bounds.expanded(margin).size(),
        regions: vec![ru_region(cabinet, &run, bounds, session)],
    }
}
