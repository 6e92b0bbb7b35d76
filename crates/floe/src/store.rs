//! The remote modeling service capability.
//!
//! [`ModelStore`] is the seam between the push engine and the outside
//! world: everything the engine needs from the remote service, expressed
//! as create/read operations. [`HttpStore`] implements it over the
//! service's REST API. Tests substitute their own in-memory
//! implementation.
//!
//! All operations are create-only and non-idempotent: nothing here
//! updates or deletes remote entities, and no retry is performed.

use indexmap::IndexMap;
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use floe_core::content::DiagramContent;
use floe_core::plan::{DiagramSpec, Direction, PlanConnection, PlanObject};

use crate::error::FloeError;
use crate::flow::FlowPayload;

/// Default API base URL; override via configuration.
pub const DEFAULT_BASE_URL: &str = "https://api.icepanel.io/v1";

/// A landscape visible to the caller's organization.
#[derive(Debug, Clone, Deserialize)]
pub struct Landscape {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Wire payload for creating a model object.
///
/// Only fields the remote store understands appear here; plan-local refs
/// never reach the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPayload {
    pub name: String,

    #[serde(rename = "type")]
    pub object_type: String,

    pub parent_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub external: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub technology_ids: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_ids: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<IndexMap<String, String>>,
}

impl ObjectPayload {
    /// Build the wire payload for a plan object with its resolved parent.
    pub fn from_plan(object: &PlanObject, parent_id: impl Into<String>) -> Self {
        Self {
            name: object.name.clone(),
            object_type: object.object_type.as_str().to_string(),
            parent_id: parent_id.into(),
            caption: object.caption.clone(),
            description: object.description.clone(),
            external: object.external,
            status: object.status.clone(),
            technology_ids: object.technology_ids.clone(),
            team_ids: object.team_ids.clone(),
            domain_id: object.domain_id.clone(),
            labels: object.labels.clone(),
        }
    }
}

/// Wire payload for creating a model connection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPayload {
    pub name: String,
    pub origin_id: String,
    pub target_id: String,
    pub direction: Direction,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub technology_ids: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<IndexMap<String, String>>,
}

impl ConnectionPayload {
    /// Build the wire payload for a plan connection with both endpoints
    /// resolved to remote ids.
    pub fn from_plan(
        connection: &PlanConnection,
        origin_id: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            name: connection.name.clone(),
            origin_id: origin_id.into(),
            target_id: target_id.into(),
            direction: connection.direction,
            description: connection.description.clone(),
            status: connection.status.clone(),
            technology_ids: connection.technology_ids.clone(),
            tag_ids: connection.tag_ids.clone(),
            labels: connection.labels.clone(),
        }
    }
}

/// Wire payload for creating a diagram.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramPayload {
    pub name: String,

    #[serde(rename = "type")]
    pub diagram_type: String,

    /// Root model object the diagram hangs off.
    pub model_id: String,

    pub index: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl DiagramPayload {
    /// Build the wire payload for the plan's diagram.
    pub fn from_spec(spec: &DiagramSpec, root_id: impl Into<String>) -> Self {
        Self {
            name: spec.name.clone(),
            diagram_type: spec.diagram_type.clone(),
            model_id: root_id.into(),
            index: spec.index.unwrap_or(0),
            description: spec.description.clone(),
            status: spec.status.clone(),
        }
    }
}

/// Create/read operations against the remote modeling service.
pub trait ModelStore {
    /// The id of the landscape's root model object.
    fn root_object_id(&self, landscape: &str) -> Result<String, FloeError>;

    /// Create a model object, returning its remote id.
    fn create_object(&self, landscape: &str, payload: &ObjectPayload) -> Result<String, FloeError>;

    /// Create a model connection, returning its remote id.
    fn create_connection(
        &self,
        landscape: &str,
        payload: &ConnectionPayload,
    ) -> Result<String, FloeError>;

    /// Create a diagram, returning its remote id.
    fn create_diagram(
        &self,
        landscape: &str,
        payload: &DiagramPayload,
    ) -> Result<String, FloeError>;

    /// Replace a diagram's visual content.
    fn set_diagram_content(
        &self,
        landscape: &str,
        diagram_id: &str,
        content: &DiagramContent,
    ) -> Result<(), FloeError>;

    /// Create a flow, returning its remote id.
    fn create_flow(&self, landscape: &str, payload: &FlowPayload) -> Result<String, FloeError>;

    /// Landscapes visible to the given organization.
    fn list_landscapes(&self, organization: &str) -> Result<Vec<Landscape>, FloeError>;
}

/// [`ModelStore`] implementation over the service's REST API.
pub struct HttpStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpStore {
    /// Build a store talking to `base_url`, authenticating every request
    /// with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FloeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FloeError::remote("client setup", err))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    fn get(&self, path: &str, operation: &str) -> Result<Value, FloeError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url; "GET");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("Authorization", format!("ApiKey {}", self.api_key))
            .send()
            .map_err(|err| FloeError::remote(operation, err))?;

        Self::parse(response, operation)
    }

    fn send_json<B: Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        operation: &str,
        body: &B,
    ) -> Result<Value, FloeError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url, method:% = method; "Sending request");

        let response = self
            .client
            .request(method, &url)
            .header("Accept", "application/json")
            .header("Authorization", format!("ApiKey {}", self.api_key))
            .json(body)
            .send()
            .map_err(|err| FloeError::remote(operation, err))?;

        Self::parse(response, operation)
    }

    fn parse(response: reqwest::blocking::Response, operation: &str) -> Result<Value, FloeError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FloeError::Api {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .map_err(|err| FloeError::remote(operation, err))
    }

    /// Pull the created entity's id out of a creation response. Responses
    /// wrap the entity under a resource key, but older API versions return
    /// it bare.
    fn created_id(value: &Value, wrapper: &str, operation: &str) -> Result<String, FloeError> {
        let entity = value.get(wrapper).unwrap_or(value);
        entity
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| FloeError::remote(operation, "response missing entity id"))
    }
}

impl ModelStore for HttpStore {
    fn root_object_id(&self, landscape: &str) -> Result<String, FloeError> {
        let path =
            format!("/landscapes/{landscape}/versions/latest/model/objects?filter[type]=root");
        let value = self.get(&path, "fetch root object")?;

        let objects = value
            .get("modelObjects")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        objects
            .first()
            .and_then(|object| object.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| FloeError::MissingRoot {
                landscape: landscape.to_string(),
            })
    }

    fn create_object(&self, landscape: &str, payload: &ObjectPayload) -> Result<String, FloeError> {
        let path = format!("/landscapes/{landscape}/versions/latest/model/objects");
        let value = self.send_json(reqwest::Method::POST, &path, "create object", payload)?;
        Self::created_id(&value, "modelObject", "create object")
    }

    fn create_connection(
        &self,
        landscape: &str,
        payload: &ConnectionPayload,
    ) -> Result<String, FloeError> {
        let path = format!("/landscapes/{landscape}/versions/latest/model/connections");
        let value = self.send_json(reqwest::Method::POST, &path, "create connection", payload)?;
        Self::created_id(&value, "modelConnection", "create connection")
    }

    fn create_diagram(
        &self,
        landscape: &str,
        payload: &DiagramPayload,
    ) -> Result<String, FloeError> {
        let path = format!("/landscapes/{landscape}/versions/latest/diagrams");
        let value = self.send_json(reqwest::Method::POST, &path, "create diagram", payload)?;
        Self::created_id(&value, "diagram", "create diagram")
    }

    fn set_diagram_content(
        &self,
        landscape: &str,
        diagram_id: &str,
        content: &DiagramContent,
    ) -> Result<(), FloeError> {
        let path = format!("/landscapes/{landscape}/versions/latest/diagrams/{diagram_id}/content");
        self.send_json(reqwest::Method::PUT, &path, "populate diagram content", content)?;
        Ok(())
    }

    fn create_flow(&self, landscape: &str, payload: &FlowPayload) -> Result<String, FloeError> {
        let path = format!("/landscapes/{landscape}/versions/latest/flows");
        let value = self.send_json(reqwest::Method::POST, &path, "create flow", payload)?;
        Self::created_id(&value, "flow", "create flow")
    }

    fn list_landscapes(&self, organization: &str) -> Result<Vec<Landscape>, FloeError> {
        let path = format!("/organizations/{organization}/landscapes");
        let value = self.get(&path, "list landscapes")?;

        let listing = value.get("landscapes").unwrap_or(&value).clone();
        parse_value(listing, "list landscapes")
    }
}

fn parse_value<T: DeserializeOwned>(value: Value, operation: &str) -> Result<T, FloeError> {
    serde_json::from_value(value).map_err(|err| FloeError::remote(operation, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use floe_core::plan::ObjectType;

    #[test]
    fn test_object_payload_has_no_refs() {
        let object = PlanObject {
            object_ref: Some("api".to_string()),
            name: "API Server".to_string(),
            object_type: ObjectType::App,
            parent_ref: Some("platform".to_string()),
            external: false,
            status: Some("live".to_string()),
            caption: None,
            description: None,
            technology_ids: Vec::new(),
            team_ids: Vec::new(),
            domain_id: None,
            labels: None,
        };

        let payload = ObjectPayload::from_plan(&object, "m-root");
        let json = serde_json::to_value(&payload).expect("serializes");

        assert_eq!(json["name"], "API Server");
        assert_eq!(json["type"], "app");
        assert_eq!(json["parentId"], "m-root");
        assert_eq!(json["status"], "live");
        assert!(json.get("ref").is_none());
        assert!(json.get("parentRef").is_none());
        // Empty optional lists are omitted entirely.
        assert!(json.get("technologyIds").is_none());
    }

    #[test]
    fn test_connection_payload_direction() {
        let connection = PlanConnection {
            name: "Reads".to_string(),
            origin_ref: "api".to_string(),
            target_ref: "db".to_string(),
            direction: Direction::Bidirectional,
            status: None,
            description: None,
            technology_ids: Vec::new(),
            tag_ids: Vec::new(),
            labels: None,
        };

        let payload = ConnectionPayload::from_plan(&connection, "m-1", "m-2");
        let json = serde_json::to_value(&payload).expect("serializes");

        assert_eq!(json["originId"], "m-1");
        assert_eq!(json["targetId"], "m-2");
        assert_eq!(json["direction"], "bidirectional");
        assert!(json.get("originRef").is_none());
    }

    #[test]
    fn test_created_id_handles_wrapped_and_bare() {
        let wrapped = serde_json::json!({"modelObject": {"id": "m-1"}});
        let bare = serde_json::json!({"id": "m-2"});

        assert_eq!(
            HttpStore::created_id(&wrapped, "modelObject", "create object").unwrap(),
            "m-1"
        );
        assert_eq!(
            HttpStore::created_id(&bare, "modelObject", "create object").unwrap(),
            "m-2"
        );
    }

    #[test]
    fn test_diagram_payload_defaults_index() {
        let spec = DiagramSpec {
            name: "System Context".to_string(),
            diagram_type: "context-diagram".to_string(),
            description: None,
            status: None,
            index: None,
        };

        let payload = DiagramPayload::from_spec(&spec, "m-root");
        assert_eq!(payload.index, 0);
        assert_eq!(payload.model_id, "m-root");
    }
}
