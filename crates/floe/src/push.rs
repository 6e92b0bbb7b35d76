//! The sequential push orchestrator.
//!
//! One run is fully sequential: every remote call blocks because each
//! later phase depends on ids produced earlier (objects before
//! connections, connections and the diagram before its content, the
//! diagram before flows). The reference table is the only shared mutable
//! state — written while objects are created, read by everything after.
//!
//! Failure policy: object, connection, and diagram creation failures abort
//! the run. Diagram-content population and per-flow creation failures are
//! caught and logged so the remaining phases still execute.

use log::{info, warn};

use floe_core::plan::{Flow, Plan};

use crate::diagram::project_content;
use crate::error::FloeError;
use crate::flow::resolve_flow;
use crate::order::creation_order;
use crate::refs::RefTable;
use crate::store::{ConnectionPayload, DiagramPayload, ModelStore, ObjectPayload};
use crate::summary::{
    CreatedConnection, CreatedDiagram, CreatedFlow, CreatedObject, RunSummary,
};

/// Sentinel `diagramRef` binding a flow to the diagram created in this run.
const NEW_DIAGRAM_REF: &str = "_new_";

/// Drives one plan through the remote store.
pub struct Pusher<'a, S: ModelStore> {
    store: &'a S,
    landscape: String,
}

impl<'a, S: ModelStore> Pusher<'a, S> {
    /// Create a pusher targeting the given landscape.
    pub fn new(store: &'a S, landscape: impl Into<String>) -> Self {
        Self {
            store,
            landscape: landscape.into(),
        }
    }

    /// Execute the plan: validate, create objects in dependency order,
    /// then connections, then the diagram with its content, then flows.
    ///
    /// # Errors
    ///
    /// Returns [`FloeError::MalformedPlan`] before any remote call when
    /// the plan is structurally invalid, and any object/connection/diagram
    /// creation failure as-is.
    pub fn push(&self, plan: &Plan) -> Result<RunSummary, FloeError> {
        plan.validate()?;
        let ordered = creation_order(&plan.objects)?;

        info!(landscape = self.landscape; "Fetching landscape root object");
        let root_id = self.store.root_object_id(&self.landscape)?;
        info!(root_id; "Root object resolved");

        let mut refs = RefTable::seeded(&plan.existing_refs);
        let mut objects_created = Vec::with_capacity(ordered.len());

        for object in ordered {
            let parent_id = match &object.parent_ref {
                None => root_id.clone(),
                Some(parent_ref) => match refs.resolve(parent_ref) {
                    Some(id) => id.to_string(),
                    None => {
                        warn!(
                            parent_ref,
                            object = object.ref_name();
                            "Parent ref not found, using landscape root"
                        );
                        root_id.clone()
                    }
                },
            };

            info!(
                object_type:% = object.object_type,
                name = object.name;
                "Creating object"
            );
            let payload = ObjectPayload::from_plan(object, parent_id);
            let id = self.store.create_object(&self.landscape, &payload)?;

            refs.insert(object.ref_name(), id.clone());
            objects_created.push(CreatedObject {
                ref_name: object.ref_name().to_string(),
                id,
                name: object.name.clone(),
            });
        }

        let mut connections_created = Vec::new();
        for connection in &plan.connections {
            let Some(origin_id) = refs.resolve(&connection.origin_ref).map(str::to_string) else {
                warn!(
                    origin_ref = connection.origin_ref,
                    connection = connection.name;
                    "Origin ref not found, skipping connection"
                );
                continue;
            };
            let Some(target_id) = refs.resolve(&connection.target_ref).map(str::to_string) else {
                warn!(
                    target_ref = connection.target_ref,
                    connection = connection.name;
                    "Target ref not found, skipping connection"
                );
                continue;
            };

            info!(
                origin = connection.origin_ref,
                target = connection.target_ref,
                name = connection.name;
                "Creating connection"
            );
            let payload = ConnectionPayload::from_plan(connection, origin_id, target_id);
            let id = self.store.create_connection(&self.landscape, &payload)?;

            connections_created.push(CreatedConnection {
                id,
                name: connection.name.clone(),
                origin_ref: connection.origin_ref.clone(),
                target_ref: connection.target_ref.clone(),
            });
        }

        let mut diagram_created = None;
        if let Some(spec) = &plan.diagram {
            info!(name = spec.name; "Creating diagram");
            let payload = DiagramPayload::from_spec(spec, root_id.clone());
            let diagram_id = self.store.create_diagram(&self.landscape, &payload)?;

            if !objects_created.is_empty() || !connections_created.is_empty() {
                info!(
                    objects = objects_created.len(),
                    connections = connections_created.len();
                    "Populating diagram content"
                );
                let content = project_content(&plan.objects, &connections_created, &refs);
                match self
                    .store
                    .set_diagram_content(&self.landscape, &diagram_id, &content)
                {
                    Ok(()) => info!("Diagram content populated"),
                    Err(err) => {
                        warn!(err:%; "Failed to populate diagram content, continuing")
                    }
                }
            }

            diagram_created = Some(CreatedDiagram {
                id: diagram_id,
                name: spec.name.clone(),
            });
        }

        let mut flows_created = Vec::new();
        for flow in &plan.flows {
            let Some(diagram_id) = flow_diagram_id(flow, diagram_created.as_ref()) else {
                warn!(flow = flow.name; "Flow has no diagram id, skipping");
                continue;
            };

            let payload = resolve_flow(flow, &refs, &diagram_id);
            info!(name = flow.name, steps = flow.steps.len(); "Creating flow");
            match self.store.create_flow(&self.landscape, &payload) {
                Ok(id) => flows_created.push(CreatedFlow {
                    id,
                    name: flow.name.clone(),
                    steps: flow.steps.len(),
                }),
                Err(err) => {
                    warn!(flow = flow.name, err:%; "Failed to create flow, continuing")
                }
            }
        }

        Ok(RunSummary {
            objects_created,
            connections_created,
            diagram_created,
            flows_created,
            ref_to_id_mapping: refs.as_map().clone(),
        })
    }
}

/// Resolve which remote diagram a flow attaches to.
fn flow_diagram_id(flow: &Flow, created: Option<&CreatedDiagram>) -> Option<String> {
    match flow.diagram_ref.as_deref() {
        Some(NEW_DIAGRAM_REF) => created
            .map(|diagram| diagram.id.clone())
            .or_else(|| flow.diagram_id.clone()),
        Some(literal) => Some(literal.to_string()),
        None => flow.diagram_id.clone(),
    }
}
