//! End-to-end tests for the push pipeline against an in-memory store.

use std::cell::{Cell, RefCell};

use floe::store::{
    ConnectionPayload, DiagramPayload, Landscape, ModelStore, ObjectPayload,
};
use floe::flow::FlowPayload;
use floe::{FloeError, Pusher};
use floe_core::content::DiagramContent;
use floe_core::plan::{
    Direction, Flow, FlowStep, ObjectType, Plan, PlanConnection, PlanObject, StepType,
};
use indexmap::IndexMap;

/// Records every call so tests can assert on ordering and payloads.
#[derive(Default)]
struct RecordingStore {
    calls: RefCell<Vec<String>>,
    next_id: Cell<u32>,
    objects: RefCell<Vec<ObjectPayload>>,
    connections: RefCell<Vec<ConnectionPayload>>,
    flows: RefCell<Vec<FlowPayload>>,
    content: RefCell<Option<DiagramContent>>,
    fail_content: Cell<bool>,
}

impl RecordingStore {
    fn next(&self, prefix: &str) -> String {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        format!("{prefix}-{n}")
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ModelStore for RecordingStore {
    fn root_object_id(&self, _landscape: &str) -> Result<String, FloeError> {
        self.calls.borrow_mut().push("root".to_string());
        Ok("m-root".to_string())
    }

    fn create_object(
        &self,
        _landscape: &str,
        payload: &ObjectPayload,
    ) -> Result<String, FloeError> {
        self.calls
            .borrow_mut()
            .push(format!("object:{}", payload.name));
        self.objects.borrow_mut().push(payload.clone());
        Ok(self.next("obj"))
    }

    fn create_connection(
        &self,
        _landscape: &str,
        payload: &ConnectionPayload,
    ) -> Result<String, FloeError> {
        self.calls
            .borrow_mut()
            .push(format!("connection:{}", payload.name));
        self.connections.borrow_mut().push(payload.clone());
        Ok(self.next("conn"))
    }

    fn create_diagram(
        &self,
        _landscape: &str,
        payload: &DiagramPayload,
    ) -> Result<String, FloeError> {
        self.calls
            .borrow_mut()
            .push(format!("diagram:{}", payload.name));
        Ok(self.next("dia"))
    }

    fn set_diagram_content(
        &self,
        _landscape: &str,
        _diagram_id: &str,
        content: &DiagramContent,
    ) -> Result<(), FloeError> {
        self.calls.borrow_mut().push("content".to_string());
        if self.fail_content.get() {
            return Err(FloeError::Api {
                operation: "populate diagram content".to_string(),
                status: 422,
                body: "bad content".to_string(),
            });
        }
        *self.content.borrow_mut() = Some(content.clone());
        Ok(())
    }

    fn create_flow(&self, _landscape: &str, payload: &FlowPayload) -> Result<String, FloeError> {
        self.calls
            .borrow_mut()
            .push(format!("flow:{}", payload.name));
        self.flows.borrow_mut().push(payload.clone());
        Ok(self.next("flow"))
    }

    fn list_landscapes(&self, _organization: &str) -> Result<Vec<Landscape>, FloeError> {
        Ok(Vec::new())
    }
}

fn object(ref_name: &str, object_type: ObjectType, external: bool) -> PlanObject {
    PlanObject {
        object_ref: Some(ref_name.to_string()),
        name: ref_name.to_string(),
        object_type,
        parent_ref: None,
        external,
        status: None,
        caption: None,
        description: None,
        technology_ids: Vec::new(),
        team_ids: Vec::new(),
        domain_id: None,
        labels: None,
    }
}

fn connection(name: &str, origin: &str, target: &str) -> PlanConnection {
    PlanConnection {
        name: name.to_string(),
        origin_ref: origin.to_string(),
        target_ref: target.to_string(),
        direction: Direction::Outgoing,
        status: None,
        description: None,
        technology_ids: Vec::new(),
        tag_ids: Vec::new(),
        labels: None,
    }
}

fn context_plan() -> Plan {
    Plan {
        objects: vec![
            object("user", ObjectType::Actor, false),
            object("api", ObjectType::App, false),
            object("db", ObjectType::Store, true),
        ],
        connections: vec![
            connection("Uses", "user", "api"),
            connection("Reads", "api", "db"),
        ],
        diagram: Some(floe_core::plan::DiagramSpec {
            name: "System Context".to_string(),
            diagram_type: "context-diagram".to_string(),
            description: None,
            status: None,
            index: None,
        }),
        flows: vec![Flow {
            name: "Lookup".to_string(),
            diagram_ref: Some("_new_".to_string()),
            diagram_id: None,
            index: None,
            pinned: None,
            show_all_steps: None,
            show_connection_names: None,
            labels: None,
            handle_id: None,
            steps: vec![FlowStep {
                id: "s1".to_string(),
                index: 0,
                step_type: StepType::Outgoing,
                description: "query".to_string(),
                detailed_description: None,
                origin_ref: Some("user".to_string()),
                target_ref: Some("api".to_string()),
                via_id: None,
                paths: IndexMap::new(),
            }],
        }],
        existing_refs: IndexMap::new(),
    }
}

#[test]
fn test_full_pipeline_sequence_and_summary() {
    let store = RecordingStore::default();
    let summary = Pusher::new(&store, "ls-1")
        .push(&context_plan())
        .expect("push succeeds");

    // Strictly sequential: root, objects, connections, diagram, content, flows.
    assert_eq!(
        store.calls(),
        vec![
            "root",
            "object:user",
            "object:api",
            "object:db",
            "connection:Uses",
            "connection:Reads",
            "diagram:System Context",
            "content",
            "flow:Lookup",
        ]
    );

    // Bijective ref -> id mapping for the three objects.
    assert_eq!(summary.ref_to_id_mapping.len(), 3);
    let mut ids: Vec<&String> = summary.ref_to_id_mapping.values().collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);

    assert_eq!(summary.objects_created.len(), 3);
    assert_eq!(summary.connections_created.len(), 2);
    assert_eq!(summary.flows_created.len(), 1);
    let diagram = summary.diagram_created.expect("diagram created");
    assert_eq!(diagram.name, "System Context");

    // Root-level objects hang off the landscape root.
    for payload in store.objects.borrow().iter() {
        assert_eq!(payload.parent_id, "m-root");
    }

    // Layout: actor row, internal grid, external row below the grid.
    let content = store.content.borrow();
    let content = content.as_ref().expect("content was populated");
    assert_eq!(content.objects.len(), 3);
    assert_eq!(content.connections.len(), 2);

    let user_id = &summary.ref_to_id_mapping["user"];
    let api_id = &summary.ref_to_id_mapping["api"];
    let db_id = &summary.ref_to_id_mapping["db"];
    assert_eq!(content.objects[user_id].y, 50.0);
    assert_eq!(content.objects[api_id].y, 250.0);
    assert_eq!(content.objects[db_id].y, 520.0);

    // Flow steps were resolved to remote ids before creation.
    let flows = store.flows.borrow();
    let step = &flows[0].steps["s1"];
    assert_eq!(step.origin_id.as_ref(), Some(user_id));
    assert_eq!(step.target_id.as_ref(), Some(api_id));
}

#[test]
fn test_child_with_unknown_parent_falls_back_to_root() {
    let mut plan = Plan::default();
    let mut child = object("svc", ObjectType::App, false);
    child.parent_ref = Some("nowhere".to_string());
    plan.objects.push(child);

    let store = RecordingStore::default();
    let summary = Pusher::new(&store, "ls-1").push(&plan).expect("push succeeds");

    assert_eq!(summary.objects_created.len(), 1);
    assert_eq!(store.objects.borrow()[0].parent_id, "m-root");
}

#[test]
fn test_child_parent_resolved_at_any_depth() {
    let mut plan = Plan::default();
    let mut grandchild = object("gc", ObjectType::Component, false);
    grandchild.parent_ref = Some("c".to_string());
    let mut child = object("c", ObjectType::App, false);
    child.parent_ref = Some("r".to_string());
    // Declared deepest-first on purpose.
    plan.objects = vec![grandchild, child, object("r", ObjectType::System, false)];

    let store = RecordingStore::default();
    let summary = Pusher::new(&store, "ls-1").push(&plan).expect("push succeeds");

    let objects = store.objects.borrow();
    assert_eq!(objects[0].name, "r");
    assert_eq!(objects[1].name, "c");
    assert_eq!(objects[2].name, "gc");
    assert_eq!(objects[1].parent_id, summary.ref_to_id_mapping["r"]);
    assert_eq!(objects[2].parent_id, summary.ref_to_id_mapping["c"]);
}

#[test]
fn test_unresolved_connection_skipped() {
    let plan = Plan {
        objects: vec![object("api", ObjectType::App, false)],
        connections: vec![
            connection("Uses", "ghost", "api"),
            connection("Self", "api", "api"),
        ],
        ..Plan::default()
    };

    let store = RecordingStore::default();
    let summary = Pusher::new(&store, "ls-1").push(&plan).expect("push succeeds");

    assert_eq!(summary.connections_created.len(), 1);
    assert_eq!(summary.connections_created[0].name, "Self");
}

#[test]
fn test_content_failure_does_not_stop_flows() {
    let store = RecordingStore::default();
    store.fail_content.set(true);

    let summary = Pusher::new(&store, "ls-1")
        .push(&context_plan())
        .expect("content failure is non-fatal");

    assert!(summary.diagram_created.is_some());
    assert_eq!(summary.flows_created.len(), 1);
    assert!(store.calls().contains(&"flow:Lookup".to_string()));
}

#[test]
fn test_existing_refs_seed_resolution() {
    let mut plan = Plan::default();
    plan.existing_refs
        .insert("legacy-db".to_string(), "m-77".to_string());
    plan.objects.push(object("api", ObjectType::App, false));
    plan.connections.push(connection("Reads", "api", "legacy-db"));

    let store = RecordingStore::default();
    let summary = Pusher::new(&store, "ls-1").push(&plan).expect("push succeeds");

    assert_eq!(summary.connections_created.len(), 1);
    assert_eq!(store.connections.borrow()[0].target_id, "m-77");
    assert_eq!(summary.ref_to_id_mapping["legacy-db"], "m-77");
}

#[test]
fn test_malformed_plan_makes_no_remote_calls() {
    let plan = Plan {
        objects: vec![
            object("api", ObjectType::App, false),
            object("api", ObjectType::App, false),
        ],
        ..Plan::default()
    };

    let store = RecordingStore::default();
    let err = Pusher::new(&store, "ls-1")
        .push(&plan)
        .expect_err("duplicate refs must fail");

    assert!(matches!(err, FloeError::MalformedPlan(_)));
    assert!(store.calls().is_empty());
}
