//! Dry-run rendering.
//!
//! Renders the intended creation plan as text without touching a
//! [`crate::store::ModelStore`]: objects in the same dependency order the
//! real run uses, connections with their ref pairs, and flow steps with
//! their branch paths expanded.

use floe_core::plan::{FlowStep, Plan, PlanError, StepType};

use crate::order::creation_order;

/// Render the dry-run report for a plan.
///
/// # Errors
///
/// Returns [`PlanError`] when the plan fails validation or its parent refs
/// form a cycle — the same checks a real run performs up front.
pub fn render_plan(plan: &Plan, landscape: &str) -> Result<String, PlanError> {
    plan.validate()?;
    let ordered = creation_order(&plan.objects)?;

    let mut out = String::new();
    out.push_str("=== DRY RUN ===\n");
    out.push_str(&format!("Landscape: {landscape}\n"));

    out.push_str(&format!("\nObjects to create ({}):\n", ordered.len()));
    for object in &ordered {
        out.push_str(&format!(
            "  [{}] {} (ref: {})\n",
            object.object_type,
            object.name,
            object.ref_name()
        ));
    }

    out.push_str(&format!(
        "\nConnections to create ({}):\n",
        plan.connections.len()
    ));
    for connection in &plan.connections {
        out.push_str(&format!(
            "  {} --({})--> {}\n",
            connection.origin_ref, connection.name, connection.target_ref
        ));
    }

    if let Some(diagram) = &plan.diagram {
        out.push_str(&format!(
            "\nDiagram: {} ({})\n",
            diagram.name, diagram.diagram_type
        ));
    }

    if !plan.flows.is_empty() {
        out.push_str(&format!("\nFlows to create ({}):\n", plan.flows.len()));
        for flow in &plan.flows {
            let diagram = flow
                .diagram_ref
                .as_deref()
                .or(flow.diagram_id.as_deref())
                .unwrap_or("?");
            out.push_str(&format!("  Flow: {} (on diagram: {diagram})\n", flow.name));
            render_steps(&mut out, &flow.steps, 2);
        }
    }

    Ok(out)
}

fn render_steps(out: &mut String, steps: &[FlowStep], depth: usize) {
    let indent = "  ".repeat(depth);
    for step in steps {
        let origin = step.origin_ref.as_deref().unwrap_or("");
        let target = step.target_ref.as_deref().unwrap_or("");

        match &step.step_type {
            StepType::Outgoing | StepType::Reply => {
                out.push_str(&format!(
                    "{indent}[{}] ({}) {origin} → {target}: {}\n",
                    step.index, step.step_type, step.description
                ));
            }
            StepType::SelfAction => {
                out.push_str(&format!(
                    "{indent}[{}] ({}) {origin}: {}\n",
                    step.index, step.step_type, step.description
                ));
            }
            StepType::AlternatePath | StepType::ParallelPath => {
                let names: Vec<&str> =
                    step.paths.values().map(|path| path.name.as_str()).collect();
                out.push_str(&format!(
                    "{indent}[{}] ({}) {} → paths: {}\n",
                    step.index,
                    step.step_type,
                    step.description,
                    names.join(", ")
                ));
                for path in step.paths.values() {
                    render_steps(out, &path.steps, depth + 1);
                }
            }
            StepType::Other(_) => {
                out.push_str(&format!(
                    "{indent}[{}] ({}) {}\n",
                    step.index, step.step_type, step.description
                ));
            }
        }
    }
}
