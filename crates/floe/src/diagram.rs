//! Diagram content projection.
//!
//! Composes the auto-layout output with the created connections to build
//! the diagram's visual payload. A connection is drawn only when both of
//! its endpoints received a placement; otherwise it is omitted from the
//! canvas while the underlying model connection still exists.

use indexmap::IndexMap;
use log::debug;

use floe_core::content::{DiagramConnection, DiagramContent};
use floe_core::plan::PlanObject;

use crate::layout;
use crate::refs::RefTable;
use crate::summary::CreatedConnection;

/// Build the full visual payload for one diagram.
pub fn project_content(
    objects: &[PlanObject],
    connections: &[CreatedConnection],
    refs: &RefTable,
) -> DiagramContent {
    let placed = layout::layout(objects, refs);

    let mut diagram_connections = IndexMap::new();
    for connection in connections {
        let origin_model = refs.resolve(&connection.origin_ref);
        let target_model = refs.resolve(&connection.target_ref);
        let (Some(origin_model), Some(target_model)) = (origin_model, target_model) else {
            continue;
        };

        let (Some(origin), Some(target)) = (placed.get(origin_model), placed.get(target_model))
        else {
            debug!(
                connection = connection.name;
                "Skipping connection line, endpoint not placed on canvas"
            );
            continue;
        };

        diagram_connections.insert(
            connection.id.clone(),
            DiagramConnection {
                id: format!("dconn_{}_{}", connection.origin_ref, connection.target_ref),
                model_id: connection.id.clone(),
                origin_id: origin.id.clone(),
                target_id: target.id.clone(),
                line_shape: "curved".to_string(),
                label_position: 0.5,
                points: Vec::new(),
            },
        );
    }

    DiagramContent {
        objects: placed,
        connections: diagram_connections,
        comments: IndexMap::new(),
    }
}
