//! Deterministic auto-layout for diagram objects.
//!
//! A pure function from reference-resolved plan objects to placement
//! rectangles. Objects are grouped by semantic role: actors across the top
//! row, internal objects in a middle grid, external objects across the
//! bottom row, and groups as fixed-size background areas.
//!
//! The geometry is intentionally fixed: areas do not adapt to the objects
//! they contain and no collision avoidance is performed. Given the same
//! objects in the same order the output is bit-identical; there is no
//! randomness and no iterative relaxation.

use indexmap::IndexMap;

use floe_core::content::{DiagramObject, Shape};
use floe_core::geometry::{Point, Rect, Size};
use floe_core::plan::{ObjectType, PlanObject};

use crate::refs::RefTable;

const X_SPACING: i32 = 280;
const Y_SPACING: i32 = 220;

const BOX_SIZE: (i32, i32) = (200, 150);
const ACTOR_SIZE: (i32, i32) = (150, 150);
const AREA_SIZE: (i32, i32) = (600, 400);

const ACTOR_ROW_Y: i32 = 50;
const GRID_TOP_Y: i32 = 250;
const EXTERNAL_ROW_MARGIN: i32 = 50;
const AREA_ORIGIN: (i32, i32) = (50, 200);

/// Compute placement rectangles for every plan object with a resolved
/// remote id, keyed by that remote id.
///
/// Objects whose ref does not resolve are left off the canvas; the model
/// entities still exist, they just have no visual placement.
pub fn layout(objects: &[PlanObject], refs: &RefTable) -> IndexMap<String, DiagramObject> {
    let actors: Vec<&PlanObject> = objects
        .iter()
        .filter(|o| o.object_type == ObjectType::Actor)
        .collect();
    let groups: Vec<&PlanObject> = objects
        .iter()
        .filter(|o| o.object_type == ObjectType::Group)
        .collect();
    let externals: Vec<&PlanObject> = objects
        .iter()
        .filter(|o| o.external && o.object_type != ObjectType::Actor)
        .collect();
    let internals: Vec<&PlanObject> = objects
        .iter()
        .filter(|o| {
            !o.external && o.object_type != ObjectType::Actor && o.object_type != ObjectType::Group
        })
        .collect();

    // All rows share one horizontal center, derived from the widest row.
    let widest = actors.len().max(internals.len()).max(externals.len());
    let center_x = widest as i32 * X_SPACING / 2 + 100;

    let mut placed = IndexMap::new();

    place_row(
        &mut placed,
        &actors,
        refs,
        center_x,
        ACTOR_ROW_Y,
        ACTOR_SIZE,
    );

    let columns = (internals.len() as i32).max(3);
    for (i, object) in internals.iter().enumerate() {
        let Some(model_id) = refs.resolve(object.ref_name()) else {
            continue;
        };

        let i = i as i32;
        let row = i / columns;
        let column = i % columns;

        // The partial last row is re-centered using only its own objects.
        let row_columns = columns.min(internals.len() as i32 - row * columns);
        let offset_x = center_x - row_columns * X_SPACING / 2 + X_SPACING / 2;

        let rect = rect(
            offset_x + column * X_SPACING,
            GRID_TOP_Y + row * Y_SPACING,
            BOX_SIZE,
        );
        placed.insert(
            model_id.to_string(),
            DiagramObject::new(
                object.ref_name(),
                model_id,
                object.object_type.as_str(),
                Shape::Box,
                rect,
            ),
        );
    }

    // Bottom row sits below however many rows the grid consumed. The
    // empty-grid case rounds toward a single-row offset, matching floor
    // division.
    let grid_rows = (internals.len() as i32 - 1).div_euclid(columns) + 1;
    let external_y = GRID_TOP_Y + grid_rows * Y_SPACING + EXTERNAL_ROW_MARGIN;
    place_row(&mut placed, &externals, refs, center_x, external_y, BOX_SIZE);

    // Groups render as background areas at a fixed offset, replacing any
    // row placement they may have received above.
    for object in groups {
        let Some(model_id) = refs.resolve(object.ref_name()) else {
            continue;
        };
        let area = rect(AREA_ORIGIN.0, AREA_ORIGIN.1, AREA_SIZE);
        placed.insert(
            model_id.to_string(),
            DiagramObject::new(object.ref_name(), model_id, "group", Shape::Area, area),
        );
    }

    placed
}

/// Place a horizontal row of objects centered around `center_x`.
fn place_row(
    placed: &mut IndexMap<String, DiagramObject>,
    items: &[&PlanObject],
    refs: &RefTable,
    center_x: i32,
    y: i32,
    size: (i32, i32),
) {
    let total_width = items.len() as i32 * X_SPACING;
    let offset_x = center_x - total_width / 2 + X_SPACING / 2;

    for (i, object) in items.iter().enumerate() {
        let Some(model_id) = refs.resolve(object.ref_name()) else {
            continue;
        };
        let rect = rect(offset_x + i as i32 * X_SPACING, y, size);
        placed.insert(
            model_id.to_string(),
            DiagramObject::new(
                object.ref_name(),
                model_id,
                object.object_type.as_str(),
                Shape::Box,
                rect,
            ),
        );
    }
}

fn rect(x: i32, y: i32, size: (i32, i32)) -> Rect {
    Rect::new(
        Point::new(x as f32, y as f32),
        Size::new(size.0 as f32, size.1 as f32),
    )
}
