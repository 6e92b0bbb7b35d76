//! The run summary: a complete audit trail of one push.

use indexmap::IndexMap;
use serde::Serialize;

/// Record of one created model object.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedObject {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub id: String,
    pub name: String,
}

/// Record of one created model connection, kept with its ref pair so the
/// diagram projector can look both endpoints up later.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedConnection {
    pub id: String,
    pub name: String,
    pub origin_ref: String,
    pub target_ref: String,
}

/// Record of the created diagram.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedDiagram {
    pub id: String,
    pub name: String,
}

/// Record of one created flow.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedFlow {
    pub id: String,
    pub name: String,
    pub steps: usize,
}

/// Everything one run resolved and created.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub objects_created: Vec<CreatedObject>,
    pub connections_created: Vec<CreatedConnection>,
    pub diagram_created: Option<CreatedDiagram>,
    pub flows_created: Vec<CreatedFlow>,
    pub ref_to_id_mapping: IndexMap<String, String>,
}

impl RunSummary {
    /// Render the summary as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
