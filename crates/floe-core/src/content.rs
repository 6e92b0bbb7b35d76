//! Derived diagram-content types.
//!
//! These are never declared in a plan; they are produced by the layout
//! engine and the content projector, then sent to the remote store as the
//! diagram's visual payload.

use indexmap::IndexMap;
use serde::Serialize;

use crate::geometry::Rect;

/// How a diagram object renders on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Ordinary grid cell, used for apps, systems, stores and actors.
    Box,
    /// Background region, used for groups.
    Area,
}

/// A positioned object on the diagram canvas.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramObject {
    /// Diagram-local id, derived from the object's plan ref.
    pub id: String,

    /// Remote id of the underlying model object.
    pub model_id: String,

    #[serde(rename = "type")]
    pub object_type: String,

    pub shape: Shape,

    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DiagramObject {
    /// Build a positioned object from a placement rectangle.
    pub fn new(
        ref_name: &str,
        model_id: impl Into<String>,
        object_type: impl Into<String>,
        shape: Shape,
        rect: Rect,
    ) -> Self {
        Self {
            id: format!("dobj_{ref_name}"),
            model_id: model_id.into(),
            object_type: object_type.into(),
            shape,
            x: rect.origin().x(),
            y: rect.origin().y(),
            width: rect.size().width(),
            height: rect.size().height(),
        }
    }
}

/// A routed connection line between two placed diagram objects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramConnection {
    /// Diagram-local id, derived from the endpoint refs.
    pub id: String,

    /// Remote id of the underlying model connection.
    pub model_id: String,

    /// Diagram-local id of the origin object.
    pub origin_id: String,

    /// Diagram-local id of the target object.
    pub target_id: String,

    pub line_shape: String,

    /// Relative position of the label along the line, 0.0 to 1.0.
    pub label_position: f32,

    /// Explicit routing points; empty means the renderer routes the line.
    pub points: Vec<(f32, f32)>,
}

/// The full visual payload of one diagram.
///
/// Objects are keyed by model object id and connections by model
/// connection id, matching the remote content endpoint's wire format.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagramContent {
    pub objects: IndexMap<String, DiagramObject>,
    pub connections: IndexMap<String, DiagramConnection>,
    pub comments: IndexMap<String, serde_json::Value>,
}
