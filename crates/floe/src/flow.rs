//! Flow step resolution.
//!
//! The remote store has no knowledge of plan-local refs, so every step's
//! `originRef`/`targetRef` must be resolved to remote ids before the flow
//! is created. Branching steps (alternate-path, parallel-path) carry named
//! sub-sequences; resolution recurses through each branch with the same
//! rule. An unresolved ref is logged and leaves the id absent — the remote
//! store rejects such a step and the failure surfaces as an API error on
//! flow creation.

use indexmap::IndexMap;
use log::warn;
use serde::Serialize;

use floe_core::plan::{Flow, FlowStep};

use crate::refs::RefTable;

/// Wire payload for creating a flow, steps keyed by step id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowPayload {
    pub name: String,

    pub diagram_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_all_steps: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_connection_names: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<IndexMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_id: Option<String>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub steps: IndexMap<String, StepPayload>,
}

/// A reference-resolved flow step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPayload {
    pub id: String,

    pub index: i64,

    #[serde(rename = "type")]
    pub step_type: String,

    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub via_id: Option<String>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathPayload>,
}

/// A resolved branch of an alternate-path or parallel-path step.
#[derive(Debug, Clone, Serialize)]
pub struct PathPayload {
    pub name: String,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub steps: IndexMap<String, StepPayload>,
}

/// Resolve a flow's step refs against the reference table, binding it to
/// the given diagram.
pub fn resolve_flow(flow: &Flow, refs: &RefTable, diagram_id: &str) -> FlowPayload {
    FlowPayload {
        name: flow.name.clone(),
        diagram_id: diagram_id.to_string(),
        index: flow.index,
        pinned: flow.pinned,
        show_all_steps: flow.show_all_steps,
        show_connection_names: flow.show_connection_names,
        labels: flow.labels.clone(),
        handle_id: flow.handle_id.clone(),
        steps: resolve_steps(&flow.name, &flow.steps, refs),
    }
}

fn resolve_steps(
    flow_name: &str,
    steps: &[FlowStep],
    refs: &RefTable,
) -> IndexMap<String, StepPayload> {
    steps
        .iter()
        .map(|step| (step.id.clone(), resolve_step(flow_name, step, refs)))
        .collect()
}

fn resolve_step(flow_name: &str, step: &FlowStep, refs: &RefTable) -> StepPayload {
    StepPayload {
        id: step.id.clone(),
        index: step.index,
        step_type: step.step_type.as_str().to_string(),
        description: step.description.clone(),
        detailed_description: step.detailed_description.clone(),
        origin_id: resolve_endpoint(flow_name, step, "originRef", step.origin_ref.as_deref(), refs),
        target_id: resolve_endpoint(flow_name, step, "targetRef", step.target_ref.as_deref(), refs),
        via_id: step.via_id.clone(),
        paths: step
            .paths
            .iter()
            .map(|(path_id, path)| {
                (
                    path_id.clone(),
                    PathPayload {
                        name: path.name.clone(),
                        steps: resolve_steps(flow_name, &path.steps, refs),
                    },
                )
            })
            .collect(),
    }
}

fn resolve_endpoint(
    flow_name: &str,
    step: &FlowStep,
    field: &str,
    ref_name: Option<&str>,
    refs: &RefTable,
) -> Option<String> {
    let ref_name = ref_name?;
    match refs.resolve(ref_name) {
        Some(id) => Some(id.to_string()),
        None => {
            warn!(
                flow = flow_name,
                step = step.id,
                field,
                ref_name;
                "Flow step ref not found, leaving id unset"
            );
            None
        }
    }
}
