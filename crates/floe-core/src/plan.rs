//! The plan schema: the declarative JSON input describing what to create.
//!
//! A [`Plan`] lists model objects and connections by short local refs,
//! optionally together with a diagram and interaction flows. Refs are
//! plan-local only; they are never sent to the remote store. Field names
//! follow the JSON wire format (camelCase per item, with the top-level
//! `existing_refs` seed map in snake_case).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The declarative input: everything one run will create remotely.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Plan {
    /// Model objects to create, in declaration order.
    #[serde(default)]
    pub objects: Vec<PlanObject>,

    /// Model connections to create, in declaration order.
    #[serde(default)]
    pub connections: Vec<PlanConnection>,

    /// Optional diagram to create and populate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram: Option<DiagramSpec>,

    /// Optional interaction flows to attach to the diagram.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flows: Vec<Flow>,

    /// Pre-existing `ref -> remote id` pairs seeding the reference table.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub existing_refs: IndexMap<String, String>,
}

/// A model object declared in the plan.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanObject {
    /// Plan-local reference, used for parent and connection linking.
    /// Falls back to the object name when absent.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub object_ref: Option<String>,

    pub name: String,

    #[serde(rename = "type")]
    pub object_type: ObjectType,

    /// Ref of the parent object, if any. Unset means top level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<String>,

    /// External objects render on the bottom row of the layout.
    #[serde(default)]
    pub external: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technology_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<IndexMap<String, String>>,
}

impl PlanObject {
    /// The ref other plan items use to address this object.
    pub fn ref_name(&self) -> &str {
        self.object_ref.as_deref().unwrap_or(&self.name)
    }
}

/// The kind of a model object.
///
/// Unknown kinds are preserved verbatim and passed through to the remote
/// store; layout treats them as internal boxes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    App,
    System,
    Store,
    Actor,
    Group,
    Component,
    Root,
    #[serde(untagged)]
    Other(String),
}

impl ObjectType {
    /// The wire name of this object type.
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::App => "app",
            ObjectType::System => "system",
            ObjectType::Store => "store",
            ObjectType::Actor => "actor",
            ObjectType::Group => "group",
            ObjectType::Component => "component",
            ObjectType::Root => "root",
            ObjectType::Other(name) => name,
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model connection declared in the plan.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanConnection {
    pub name: String,

    /// Ref of the connection's origin object.
    pub origin_ref: String,

    /// Ref of the connection's target object.
    pub target_ref: String,

    #[serde(default)]
    pub direction: Direction,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technology_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<IndexMap<String, String>>,
}

/// Direction of a connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Outgoing,
    Bidirectional,
}

/// A diagram to create.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSpec {
    pub name: String,

    /// Remote diagram type, e.g. `context-diagram` or `app-diagram`.
    #[serde(rename = "type", default = "DiagramSpec::default_type")]
    pub diagram_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
}

impl DiagramSpec {
    fn default_type() -> String {
        "context-diagram".to_string()
    }
}

/// An ordered sequence of interaction steps attached to a diagram.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub name: String,

    /// Diagram binding: the sentinel `_new_` binds to the diagram created
    /// in this run, any other value is taken as a literal remote diagram id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_all_steps: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_connection_names: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<IndexMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<FlowStep>,
}

/// One step inside a flow (or inside a branch path of a branching step).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowStep {
    pub id: String,

    /// Position within the flow (or within the enclosing path). Must be
    /// unique per nesting level.
    pub index: i64,

    #[serde(rename = "type")]
    pub step_type: StepType,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via_id: Option<String>,

    /// Branch paths, only meaningful for `alternate-path` and
    /// `parallel-path` steps: path id to named sub-sequence.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, FlowPath>,
}

/// A named branch inside an alternate-path or parallel-path step.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlowPath {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<FlowStep>,
}

/// The kind of a flow step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepType {
    Outgoing,
    Reply,
    SelfAction,
    AlternatePath,
    ParallelPath,
    #[serde(untagged)]
    Other(String),
}

impl StepType {
    /// The wire name of this step type.
    pub fn as_str(&self) -> &str {
        match self {
            StepType::Outgoing => "outgoing",
            StepType::Reply => "reply",
            StepType::SelfAction => "self-action",
            StepType::AlternatePath => "alternate-path",
            StepType::ParallelPath => "parallel-path",
            StepType::Other(name) => name,
        }
    }

    /// Whether this step carries branch paths.
    pub fn is_branching(&self) -> bool {
        matches!(self, StepType::AlternatePath | StepType::ParallelPath)
    }
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structurally invalid plan. Raised before any remote call is made.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("object #{index} has an empty name")]
    UnnamedObject { index: usize },

    #[error("connection #{index} has an empty name")]
    UnnamedConnection { index: usize },

    #[error("connection \"{name}\" is missing an origin or target ref")]
    IncompleteConnection { name: String },

    #[error("ref \"{ref_name}\" is declared by more than one object")]
    DuplicateRef { ref_name: String },

    #[error("parent refs form a cycle involving \"{ref_name}\"")]
    ParentCycle { ref_name: String },

    #[error("flow \"{flow}\" repeats step index {index}")]
    DuplicateStepIndex { flow: String, index: i64 },
}

impl Plan {
    /// Check structural invariants that must hold before anything is
    /// created remotely.
    ///
    /// Duplicate refs are rejected here rather than silently overwriting
    /// the reference table later: a duplicate would otherwise double-create
    /// the object and leave the ref pointing at only one of the copies.
    ///
    /// # Errors
    ///
    /// Returns the first [`PlanError`] found. Parent cycles are detected
    /// separately by the dependency-ordering pass.
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut seen = indexmap::IndexSet::new();
        for (index, object) in self.objects.iter().enumerate() {
            if object.name.is_empty() {
                return Err(PlanError::UnnamedObject { index });
            }
            if !seen.insert(object.ref_name().to_string()) {
                return Err(PlanError::DuplicateRef {
                    ref_name: object.ref_name().to_string(),
                });
            }
        }

        for (index, connection) in self.connections.iter().enumerate() {
            if connection.name.is_empty() {
                return Err(PlanError::UnnamedConnection { index });
            }
            if connection.origin_ref.is_empty() || connection.target_ref.is_empty() {
                return Err(PlanError::IncompleteConnection {
                    name: connection.name.clone(),
                });
            }
        }

        for flow in &self.flows {
            validate_step_indices(&flow.name, &flow.steps)?;
        }

        Ok(())
    }
}

fn validate_step_indices(flow_name: &str, steps: &[FlowStep]) -> Result<(), PlanError> {
    let mut seen = indexmap::IndexSet::new();
    for step in steps {
        if !seen.insert(step.index) {
            return Err(PlanError::DuplicateStepIndex {
                flow: flow_name.to_string(),
                index: step.index,
            });
        }
        for path in step.paths.values() {
            validate_step_indices(flow_name, &path.steps)?;
        }
    }
    Ok(())
}
